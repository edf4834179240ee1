// Byte channel to the robot
//
// One writable sink chosen at startup: a serial port, a TCP stream to a
// serial bridge, or a file when no robot is attached. Nothing is ever read
// back.

use std::fs::File;
use std::io::Write;
use std::net::TcpStream;

use serialport::{DataBits, FlowControl, Parity, StopBits};
use tracing::{debug, info};

use super::codec::FRAME_LEN;
use crate::config::{ChannelConfig, SERIAL_BAUDRATE, SERIAL_TIMEOUT};

/// Errors opening or writing the channel
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChannelError>;

/// The single open sink drive frames go to
pub struct Channel {
    sink: Box<dyn Write + Send>,
    label: String,
}

impl Channel {
    /// Open the sink described by `config`
    pub fn open(config: &ChannelConfig) -> Result<Self> {
        info!("Opening robot channel: {}", config);
        let sink: Box<dyn Write + Send> = match config {
            ChannelConfig::Serial { path } => Box::new(
                serialport::new(path, SERIAL_BAUDRATE)
                    .data_bits(DataBits::Eight)
                    .stop_bits(StopBits::One)
                    .parity(Parity::None)
                    .flow_control(FlowControl::None)
                    .timeout(SERIAL_TIMEOUT)
                    .open()?,
            ),
            ChannelConfig::Tcp { host, port } => {
                let stream = TcpStream::connect((host.as_str(), *port))?;
                // Frames are tiny, don't let Nagle hold them back
                stream.set_nodelay(true)?;
                Box::new(stream)
            }
            ChannelConfig::File { path } => Box::new(File::create(path)?),
        };

        Ok(Self {
            sink,
            label: config.to_string(),
        })
    }

    /// Wrap an arbitrary writer
    pub fn from_writer(writer: impl Write + Send + 'static, label: impl Into<String>) -> Self {
        Self {
            sink: Box::new(writer),
            label: label.into(),
        }
    }

    /// Write one whole frame
    pub fn write_frame(&mut self, frame: &[u8; FRAME_LEN]) -> Result<()> {
        debug!("Write to {}: {:02X?}", self.label, frame);
        self.sink.write_all(frame)?;
        self.sink.flush()?;
        Ok(())
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}
