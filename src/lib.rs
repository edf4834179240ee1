// Joystick-to-robot drive bridge
//
// Polls a joystick status page over HTTP, turns the (x, y) position into a
// differential-drive command and streams it to the robot as 5-byte frames.

pub mod cli;
pub mod config;
pub mod drive;
pub mod joystick;
pub mod messages;
pub mod runtime;
