use clap::Parser;
use tracing_subscriber::EnvFilter;

use joystick_drive::cli::Cli;

#[tokio::main]
async fn main() {
    // Setup logging (set RUST_LOG=info or debug)
    // Logs go to stderr so `decode` output stays clean on stdout
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.execute().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
