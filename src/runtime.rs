// Drive loop: fetch joystick -> shape -> mix -> encode -> write, forever
//
// There is no recovery inside the loop. The first error ends it, and the
// RobotDriver going out of scope sends the final stop command. Ctrl-C and
// SIGTERM end the loop the same way.

use std::time::Duration;

use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::config::ConfigError;
use crate::drive::{ChannelError, CodecError, RobotDriver, joystick_to_command};
use crate::joystick::{JoystickError, JoystickSource, fetch_sample};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("Joystick error: {0}")]
    Joystick(#[from] JoystickError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Frame decode error: {0}")]
    Codec(#[from] CodecError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One pass through the pipeline
async fn drive_once<S: JoystickSource>(
    source: &S,
    url: &str,
    driver: &mut RobotDriver,
) -> Result<(), RuntimeError> {
    let sample = fetch_sample(source, url).await?;
    let cmd = joystick_to_command(sample);

    info!("L:{:4} R:{:4}", cmd.left, cmd.right);

    driver.send(cmd)?;
    Ok(())
}

/// Loop until an error; `period` of zero means back-to-back iterations
async fn drive_loop<S: JoystickSource>(
    source: &S,
    url: &str,
    driver: &mut RobotDriver,
    period: Duration,
) -> Result<(), RuntimeError> {
    if period.is_zero() {
        loop {
            drive_once(source, url, driver).await?;
        }
    }

    let mut tick = interval(period);
    tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        tick.tick().await;
        drive_once(source, url, driver).await?;
    }
}

/// Resolves when the process is asked to stop
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Ctrl-C received"),
        _ = terminate => info!("SIGTERM received"),
    }
}

/// Drive the robot from the joystick until an error or `shutdown` resolves.
///
/// The driver is consumed; its drop sends the stop command on every exit
/// path.
pub async fn run_until<S, F>(
    source: &S,
    url: &str,
    mut driver: RobotDriver,
    period: Duration,
    shutdown: F,
) -> Result<(), RuntimeError>
where
    S: JoystickSource,
    F: Future<Output = ()>,
{
    info!("Drive loop started, polling {}", url);
    if !period.is_zero() {
        info!("Loop period: {}ms", period.as_millis());
    }

    tokio::select! {
        result = drive_loop(source, url, &mut driver, period) => result,
        _ = shutdown => {
            info!("Shutting down drive loop");
            Ok(())
        }
    }
}

/// Drive the robot until an error, Ctrl-C or SIGTERM
pub async fn run<S: JoystickSource>(
    source: &S,
    url: &str,
    driver: RobotDriver,
    period: Duration,
) -> Result<(), RuntimeError> {
    run_until(source, url, driver, period, shutdown_signal()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::drive::{Channel, decode_all};
    use crate::messages::DriveCommand;
    use std::collections::VecDeque;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn commands(&self) -> Vec<DriveCommand> {
            decode_all(&self.0.lock().unwrap()).unwrap()
        }
    }

    /// Serves queued pages, then reports a page without a machine tag
    struct ScriptedJoystick {
        pages: Mutex<VecDeque<String>>,
    }

    impl ScriptedJoystick {
        fn new(pages: &[&str]) -> Self {
            Self {
                pages: Mutex::new(pages.iter().map(|p| p.to_string()).collect()),
            }
        }
    }

    impl JoystickSource for ScriptedJoystick {
        async fn fetch_raw(&self, _url: &str) -> crate::joystick::Result<String> {
            let page = self.pages.lock().unwrap().pop_front();
            Ok(page.unwrap_or_else(|| "<html>server restarting</html>".to_string()))
        }
    }

    /// Never returns a page
    struct StalledJoystick;

    impl JoystickSource for StalledJoystick {
        async fn fetch_raw(&self, _url: &str) -> crate::joystick::Result<String> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_error_ends_loop_and_stops_robot() {
        let source = ScriptedJoystick::new(&[
            "<!-- Machine 0.0 0.2 -->",
            "<!-- Machine 1.0 0.0 -->",
            "<!-- Machine 0.0 -1.0 -->",
        ]);
        let buf = SharedBuf::default();
        let driver = RobotDriver::new(Channel::from_writer(buf.clone(), "memory"));

        let result = run_until(
            &source,
            "http://joystick/1",
            driver,
            Duration::ZERO,
            std::future::pending(),
        )
        .await;

        assert!(matches!(
            result,
            Err(RuntimeError::Joystick(JoystickError::MissingMachineTag))
        ));
        assert_eq!(
            buf.commands(),
            vec![
                DriveCommand::new(-50, -50),
                DriveCommand::new(225, -225),
                DriveCommand::new(450, 450),
                DriveCommand::stop(),
            ]
        );
    }

    #[tokio::test]
    async fn test_shutdown_stops_robot() {
        let buf = SharedBuf::default();
        let driver = RobotDriver::new(Channel::from_writer(buf.clone(), "memory"));

        let result = run_until(
            &StalledJoystick,
            "http://joystick/1",
            driver,
            Duration::ZERO,
            async {},
        )
        .await;

        assert!(result.is_ok());
        assert_eq!(buf.commands(), vec![DriveCommand::stop()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_loop() {
        let source = ScriptedJoystick::new(&["<!-- Machine 0.0 0.05 -->", "<!-- Machine 0.0 0.05 -->"]);
        let buf = SharedBuf::default();
        let driver = RobotDriver::new(Channel::from_writer(buf.clone(), "memory"));

        let result = run_until(
            &source,
            "http://joystick/1",
            driver,
            Duration::from_millis(20),
            std::future::pending(),
        )
        .await;

        assert!(result.is_err());
        assert_eq!(
            buf.commands(),
            vec![DriveCommand::stop(), DriveCommand::stop(), DriveCommand::stop()]
        );
    }
}
