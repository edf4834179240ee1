// Differential-drive mixing
//
// Joystick "up" reports negative y, so forward motion comes from -y.
// x steers by speeding one side up and slowing the other down.

use crate::config::{DRIVE_SCALE, MAX_DRIVE};
use crate::messages::{DriveCommand, ShapedVector};

/// Scale one side to wheel units, truncate toward zero and clamp
fn to_wheel_speed(value: f64) -> i16 {
    // `as` truncates toward zero (and saturates, NaN becomes 0)
    let speed = (value * DRIVE_SCALE) as i32;
    speed.clamp(-MAX_DRIVE, MAX_DRIVE) as i16
}

/// Convert a shaped joystick vector into left/right wheel speeds
pub fn mix(vector: ShapedVector) -> DriveCommand {
    let left = -vector.y + vector.x;
    let right = -vector.y - vector.x;

    DriveCommand {
        left: to_wheel_speed(left),
        right: to_wheel_speed(right),
    }
}
