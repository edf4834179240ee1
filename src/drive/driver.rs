// Robot driver: encodes wheel commands onto the channel
//
// Dropping the driver sends a zero command, so the robot stops on every way
// out of the drive loop.

use tracing::{debug, info, warn};

use super::channel::{Channel, Result};
use super::codec::encode;
use crate::messages::DriveCommand;

pub struct RobotDriver {
    channel: Channel,
}

impl RobotDriver {
    pub fn new(channel: Channel) -> Self {
        Self { channel }
    }

    /// Send one wheel command
    pub fn send(&mut self, cmd: DriveCommand) -> Result<()> {
        let frame = encode(cmd);
        debug!("Drive left={}, right={}", cmd.left, cmd.right);
        self.channel.write_frame(&frame)
    }

    /// Stop both wheels
    pub fn stop(&mut self) -> Result<()> {
        info!("Stopping robot on {}", self.channel.label());
        self.send(DriveCommand::stop())
    }
}

impl Drop for RobotDriver {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            warn!("Failed to stop robot on drop: {}", e);
        }
    }
}
