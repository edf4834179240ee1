// Value types passed between the pipeline stages

use serde::{Deserialize, Serialize};

// Raw joystick position as scraped from the status page
// Usually within [-1.0, 1.0] on both axes, but nothing enforces it
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct JoystickSample {
    pub x: f64,
    pub y: f64,
}

impl JoystickSample {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// Joystick vector after deadzone removal and turn attenuation
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShapedVector {
    pub x: f64,
    pub y: f64,
}

/// Wheel speed command for the robot, each side in [-500, 500]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DriveCommand {
    pub left: i16,
    pub right: i16,
}

impl DriveCommand {
    pub fn new(left: i16, right: i16) -> Self {
        Self { left, right }
    }

    pub fn stop() -> Self {
        Self::default()
    }
}
