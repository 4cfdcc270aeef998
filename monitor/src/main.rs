/*!
# Gamepad Monitor Application

Terminal monitor for handheld RC gamepad UDP telemetry. Binds the configured
port, decodes each valid packet through the `gamepad` crate and redraws the
key state whenever a new packet arrives.

## Usage

### Watch a Retroid gamepad
```bash
monitor watch --device retroid --port 12121
```

### JSON output for piping into other tools
```bash
monitor watch --device skydroid --port 12121 --json
```

### Config-file driven
```bash
monitor config --output monitor.toml
monitor --config monitor.toml
```
*/

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use crossbeam_channel::{bounded, RecvTimeoutError};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

mod config;
mod display;

use config::AppConfig;
use gamepad::{ButtonLabels, GamepadReceiver, Protocol, Retroid, Skydroid};

/// Supported gamepad device families
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    /// Retroid handheld (Lite3 transmitter)
    Retroid,
    /// Skydroid X30 transmitter
    Skydroid,
}

#[derive(Parser)]
#[command(name = "monitor")]
#[command(about = "Terminal monitor for RC gamepad UDP telemetry")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long, default_value = "monitor.toml")]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Watch a gamepad and render its key state
    Watch {
        /// Device family to decode
        #[arg(short, long, value_enum, default_value_t = DeviceFamily::Retroid)]
        device: DeviceFamily,

        /// UDP port to listen on (must match the transmitter)
        #[arg(short, long, default_value = "12121")]
        port: u16,

        /// Emit one JSON object per update instead of the boxed display
        #[arg(long)]
        json: bool,
    },

    /// Generate a configuration file
    Config {
        /// Output path for configuration file
        #[arg(short, long, default_value = "monitor.toml")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log to stderr so stdout stays clean for the rendered/JSON output
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Watch { device, port, json }) => run_watch_for(device, port, json),

        Some(Commands::Config { output }) => {
            let config = AppConfig::new();
            config.save_to_file(&output)?;
            println!("Generated configuration file: {}", output.display());
            println!("Edit the file to customize settings, then run:");
            println!("   monitor --config {}", output.display());
            Ok(())
        }

        None => {
            let config = AppConfig::load_from_file(&cli.config)
                .with_context(|| format!("Cannot load config {}", cli.config.display()))?;
            run_watch_for(
                config.monitor.device,
                config.monitor.udp_port,
                config.monitor.json_output,
            )
        }
    }
}

/// Dispatch to the family-specific watch loop
fn run_watch_for(device: DeviceFamily, port: u16, json: bool) -> Result<()> {
    info!("Watching {:?} gamepad on UDP port {}", device, port);
    match device {
        DeviceFamily::Retroid => run_watch::<Retroid>(port, json, display::render_retroid),
        DeviceFamily::Skydroid => run_watch::<Skydroid>(port, json, display::render_skydroid),
    }
}

/// Receive loop wiring: the receiver's callback only signals the update
/// count over a bounded channel; rendering happens here on the main thread
/// so the hot path never waits on the terminal.
fn run_watch<P: Protocol>(
    port: u16,
    json: bool,
    render: impl Fn(&P::Keys, &ButtonLabels) -> String,
) -> Result<()>
where
    P::Keys: Serialize,
{
    let mut receiver = GamepadReceiver::<P>::new(port);
    receiver
        .start()
        .with_context(|| format!("Cannot listen on UDP port {}", port))?;

    let (update_tx, update_rx) = bounded::<u64>(64);
    receiver.set_update_callback(move |count| {
        // Dropping a signal is fine: the next render reads the latest keys
        let _ = update_tx.try_send(count);
    });

    let running = Arc::new(AtomicBool::new(true));
    let running_ctrlc = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_ctrlc.store(false, Ordering::SeqCst);
    })?;

    while running.load(Ordering::SeqCst) {
        match update_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(count) => {
                let keys = receiver.get_keys();
                if json {
                    let line = serde_json::json!({
                        "count": count,
                        "keys": keys,
                    });
                    println!("{}", line);
                } else {
                    print!("{}", render(&keys, receiver.button_labels()));
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                warn!("Receiver stopped unexpectedly");
                break;
            }
        }
    }

    info!(
        "Shutting down after {} packets received",
        receiver.packet_count()
    );
    receiver.stop();
    Ok(())
}
