// Command-line interface
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::config::{ChannelConfig, DEFAULT_JOYSTICK_URL, DEFAULT_TCP_PORT};
use crate::drive::{Channel, RobotDriver, decode_all};
use crate::joystick::HttpJoystick;
use crate::runtime::{self, RuntimeError};

#[derive(Debug, Parser)]
#[command(name = "joystick-drive", version, about = "Drive a robot from a web joystick")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Poll the joystick and stream drive commands to the robot
    Drive(DriveArgs),
    /// Print the commands stored in a file channel dump as JSON lines
    Decode {
        /// File written by `drive --file`
        path: PathBuf,
    },
}

#[derive(Debug, Args)]
pub struct DriveArgs {
    /// Joystick status page
    #[arg(long, default_value = DEFAULT_JOYSTICK_URL)]
    pub url: String,

    /// Serial device connected to the robot (57600 8N1)
    #[arg(long, value_name = "PATH")]
    pub serial: Option<String>,

    /// Host of a TCP serial bridge
    #[arg(long)]
    pub host: Option<String>,

    /// Port of the TCP serial bridge
    #[arg(long, default_value_t = DEFAULT_TCP_PORT)]
    pub port: u16,

    /// Write frames to a file instead of a robot
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Minimum time between polls, 0 polls back-to-back
    #[arg(long, default_value_t = 0)]
    pub period_ms: u64,
}

impl Cli {
    pub async fn execute(self) -> Result<(), RuntimeError> {
        match self.command {
            Command::Drive(args) => drive(args).await,
            Command::Decode { path } => decode(&path, &mut std::io::stdout().lock()),
        }
    }
}

async fn drive(args: DriveArgs) -> Result<(), RuntimeError> {
    let config = ChannelConfig::resolve(args.serial, args.host, args.port, args.file)?;
    let source = HttpJoystick::new()?;
    let driver = RobotDriver::new(Channel::open(&config)?);

    runtime::run(
        &source,
        &args.url,
        driver,
        Duration::from_millis(args.period_ms),
    )
    .await
}

fn decode(path: &Path, out: &mut impl Write) -> Result<(), RuntimeError> {
    let bytes = std::fs::read(path)?;
    let commands = decode_all(&bytes)?;
    info!("Decoded {} frame(s) from {}", commands.len(), path.display());

    for cmd in commands {
        serde_json::to_writer(&mut *out, &cmd)?;
        writeln!(out)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;
    use crate::drive::encode;
    use crate::messages::DriveCommand;

    #[test]
    fn test_drive_defaults() {
        let cli = Cli::try_parse_from(["joystick-drive", "drive", "--host", "10.50.1.50"]).unwrap();
        let Command::Drive(args) = cli.command else {
            panic!("expected drive command");
        };
        assert_eq!(args.url, DEFAULT_JOYSTICK_URL);
        assert_eq!(args.host.as_deref(), Some("10.50.1.50"));
        assert_eq!(args.port, 2364);
        assert_eq!(args.period_ms, 0);
        assert!(args.serial.is_none() && args.file.is_none());
    }

    #[test]
    fn test_drive_options() {
        let cli = Cli::try_parse_from([
            "joystick-drive",
            "drive",
            "--url",
            "http://joy.local/joysticks/2",
            "--serial",
            "/dev/ttyUSB0",
            "--period-ms",
            "20",
        ])
        .unwrap();
        let Command::Drive(args) = cli.command else {
            panic!("expected drive command");
        };
        assert_eq!(args.url, "http://joy.local/joysticks/2");
        assert_eq!(args.serial.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(args.period_ms, 20);
    }

    #[tokio::test]
    async fn test_drive_rejects_two_channels() {
        let cli = Cli::try_parse_from([
            "joystick-drive",
            "drive",
            "--serial",
            "COM6",
            "--file",
            "out.bin",
        ])
        .unwrap();
        let result = cli.execute().await;
        assert!(matches!(
            result,
            Err(RuntimeError::Config(ConfigError::AmbiguousChannel { .. }))
        ));
    }

    #[tokio::test]
    async fn test_drive_without_channel() {
        let cli = Cli::try_parse_from(["joystick-drive", "drive"]).unwrap();
        assert!(matches!(
            cli.execute().await,
            Err(RuntimeError::Config(ConfigError::NoChannel))
        ));
    }

    #[test]
    fn test_decode_prints_json_lines() {
        let path = std::env::temp_dir().join(format!("joystick-drive-decode-{}.bin", std::process::id()));
        let mut bytes = encode(DriveCommand::new(-50, -50)).to_vec();
        bytes.extend_from_slice(&encode(DriveCommand::stop()));
        std::fs::write(&path, &bytes).unwrap();

        let mut out = Vec::new();
        decode(&path, &mut out).unwrap();
        std::fs::remove_file(&path).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "{\"left\":-50,\"right\":-50}\n{\"left\":0,\"right\":0}\n"
        );

        // Each line reads back as a command
        let parsed: Vec<DriveCommand> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(parsed, vec![DriveCommand::new(-50, -50), DriveCommand::stop()]);
    }
}
