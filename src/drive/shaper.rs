// Joystick shaping: radial deadzone plus gentler turning

use crate::config::{DEADZONE, TURN_SCALE};
use crate::messages::{JoystickSample, ShapedVector};

/// Shorten the vector (x, y) by `distance`, keeping its direction.
///
/// Vectors shorter than `distance` collapse to (0, 0), which gives a round
/// deadzone around a poorly centred stick.
pub fn reduce_distance(x: f64, y: f64, distance: f64) -> (f64, f64) {
    let old_distance = (x * x + y * y).sqrt();
    let new_distance = (old_distance - distance).max(0.0);

    // Zero-length input has no direction to keep
    let scale = if old_distance == 0.0 {
        0.0
    } else {
        new_distance / old_distance
    };

    (x * scale, y * scale)
}

/// Apply the deadzone and halve the turning (x) component
pub fn shape(sample: JoystickSample) -> ShapedVector {
    let (x, y) = reduce_distance(sample.x, sample.y, DEADZONE);
    ShapedVector {
        x: x * TURN_SCALE,
        y,
    }
}
