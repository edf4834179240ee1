// Tunables, defaults and channel selection
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// Motion shaping
pub const DEADZONE: f64 = 0.1; // radius removed from every joystick vector
pub const TURN_SCALE: f64 = 0.5; // x-axis attenuation, makes turning gentler

// Drive mixing
pub const DRIVE_SCALE: f64 = 500.0;
pub const MAX_DRIVE: i32 = 500; // wheel speed limit accepted by the robot, mm/s

// Joystick server
pub const DEFAULT_JOYSTICK_URL: &str = "http://127.0.0.1:3000/joysticks/1";
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(2);

// Robot link
pub const DEFAULT_TCP_PORT: u16 = 2364;
pub const SERIAL_BAUDRATE: u32 = 57_600;
pub const SERIAL_TIMEOUT: Duration = Duration::from_millis(100);

/// Configuration errors, all detected once at startup
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("No robot channel configured (use --serial, --host or --file)")]
    NoChannel,

    #[error("Only one robot channel may be configured, got: {}", .selected.join(", "))]
    AmbiguousChannel { selected: Vec<&'static str> },
}

/// Where drive frames are written
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelConfig {
    /// Local serial device, 57600 8N1
    Serial { path: String },
    /// TCP stream to a serial bridge
    Tcp { host: String, port: u16 },
    /// Plain file, for running without a robot attached
    File { path: PathBuf },
}

impl ChannelConfig {
    /// Resolve the command-line options into exactly one channel.
    ///
    /// Configuring more than one sink is rejected instead of letting one
    /// silently override the others.
    pub fn resolve(
        serial: Option<String>,
        host: Option<String>,
        port: u16,
        file: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let mut selected = Vec::new();
        if serial.is_some() {
            selected.push("serial");
        }
        if host.is_some() {
            selected.push("tcp");
        }
        if file.is_some() {
            selected.push("file");
        }
        if selected.len() > 1 {
            return Err(ConfigError::AmbiguousChannel { selected });
        }

        match (serial, host, file) {
            (Some(path), None, None) => Ok(Self::Serial { path }),
            (None, Some(host), None) => Ok(Self::Tcp { host, port }),
            (None, None, Some(path)) => Ok(Self::File { path }),
            _ => Err(ConfigError::NoChannel),
        }
    }
}

impl fmt::Display for ChannelConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serial { path } => write!(f, "serial {} @ {} baud", path, SERIAL_BAUDRATE),
            Self::Tcp { host, port } => write!(f, "tcp {}:{}", host, port),
            Self::File { path } => write!(f, "file {}", path.display()),
        }
    }
}
