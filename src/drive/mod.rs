// Drive pipeline for a differential-drive robot
//
// Provides:
// - Joystick shaping (deadzone, turn attenuation)
// - Differential-drive mixing into clamped wheel speeds
// - The 5-byte drive command frame
// - Byte channels (serial, TCP, file) and a driver that stops the robot on drop

pub mod channel;
pub mod codec;
mod driver;
pub mod mixer;
pub mod shaper;

pub use channel::{Channel, ChannelError};
pub use codec::{CodecError, FRAME_LEN, OPCODE_DRIVE_DIRECT, decode, decode_all, encode};
pub use driver::RobotDriver;
pub use mixer::mix;
pub use shaper::shape;

use crate::messages::{DriveCommand, JoystickSample};

/// Full conversion from a raw joystick sample to a wheel command
pub fn joystick_to_command(sample: JoystickSample) -> DriveCommand {
    mix(shape(sample))
}
