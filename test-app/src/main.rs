// sdriq test application -- CLI tool for exercising an SDR-IQ receiver
// attached to a serial port or reachable through a serial-to-TCP bridge.
//
// Usage:
//   sdriq-test-app --port /dev/ttyUSB0 info
//   sdriq-test-app --port /dev/ttyUSB0 status
//   sdriq-test-app --port /dev/ttyUSB0 freq 14010000
//   sdriq-test-app --port /dev/ttyUSB0 rate
//   sdriq-test-app --port /dev/ttyUSB0 gain fixed -- -10
//   sdriq-test-app --port /dev/ttyUSB0 gain manual 51 --attenuator
//   sdriq-test-app --host 192.168.0.10:50000 capture --seconds 5
//   sdriq-test-app --port /dev/ttyUSB0 capture --blocks 10

use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sdriq::{RfGain, SdriqBuilder, SdriqReceiver};

/// sdriq test application -- exercises an SDR-IQ from the command line.
#[derive(Parser)]
#[command(name = "sdriq-test-app", version, about)]
struct Cli {
    /// Serial port path (e.g. /dev/ttyUSB0, COM3).
    #[arg(long)]
    port: Option<String>,

    /// Serial-to-TCP bridge address (e.g. 192.168.0.10:50000).
    /// Used instead of --port for remote receivers.
    #[arg(long)]
    host: Option<String>,

    /// Override the default 230400 baud rate. Serial only.
    #[arg(long)]
    baud: Option<u32>,

    /// Per-command reply timeout in milliseconds.
    #[arg(long, default_value_t = 500)]
    timeout_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read and print the device identity.
    Info,
    /// Read and print the receiver status.
    Status,
    /// Get or set the center frequency in hertz.
    Freq {
        /// Frequency to set; omit to read the current value.
        hz: Option<u32>,
    },
    /// Get or set the ADC sample rate in hertz.
    Rate {
        /// Sample rate to set; omit to read the current value.
        hz: Option<u32>,
    },
    /// Get or set the RF gain.
    Gain {
        #[command(subcommand)]
        action: GainCommand,
    },
    /// Start a capture, let it run, then stop it.
    Capture {
        /// One-shot block count; 0 captures contiguously.
        #[arg(long, default_value_t = 0)]
        blocks: u16,

        /// How long to leave the capture running.
        #[arg(long, default_value_t = 2)]
        seconds: u64,
    },
}

#[derive(Subcommand)]
enum GainCommand {
    /// Read the current gain setting.
    Get,
    /// Fixed gain mode: 0, -10, -20, or -30 dB.
    Fixed { db: i8 },
    /// Manual AD8370 gain mode: 0..=127.
    Manual {
        gain: u8,
        /// Also engage the front-end 10 dB attenuator.
        #[arg(long)]
        attenuator: bool,
    },
}

async fn connect(cli: &Cli) -> Result<SdriqReceiver> {
    let mut builder = SdriqBuilder::new().timeout(Duration::from_millis(cli.timeout_ms));
    if let Some(baud) = cli.baud {
        builder = builder.baud_rate(baud);
    }
    builder = match (&cli.port, &cli.host) {
        (Some(port), None) => builder.serial_port(port),
        (None, Some(host)) => builder.tcp_addr(host),
        (Some(_), Some(_)) => bail!("--port and --host are mutually exclusive"),
        (None, None) => bail!("one of --port or --host is required"),
    };
    builder.build().await.context("failed to connect")
}

async fn run(cli: Cli) -> Result<()> {
    let mut rx = connect(&cli).await?;

    let result = execute(&cli.command, &mut rx).await;
    if let Err(e) = rx.close().await {
        tracing::warn!(error = %e, "close failed");
    }
    result
}

async fn execute(command: &Command, rx: &mut SdriqReceiver) -> Result<()> {
    match command {
        Command::Info => {
            let info = rx.device_info().await?;
            println!("model:             {}", info.model);
            println!("serial:            {}", info.serial);
            println!("interface version: {}", info.interface_version);
            println!("boot code version: {}", info.bootcode_version);
            println!("firmware version:  {}", info.firmware_version);
        }
        Command::Status => {
            let status = rx.status().await?;
            println!("status: {status}");
        }
        Command::Freq { hz: Some(hz) } => {
            rx.set_frequency(*hz).await?;
            println!("frequency set to {hz} Hz");
        }
        Command::Freq { hz: None } => {
            println!("frequency: {} Hz", rx.frequency().await?);
        }
        Command::Rate { hz: Some(hz) } => {
            rx.set_sample_rate(*hz).await?;
            println!("sample rate set to {hz} Hz");
        }
        Command::Rate { hz: None } => {
            println!("sample rate: {} Hz", rx.sample_rate().await?);
        }
        Command::Gain { action } => match action {
            GainCommand::Get => println!("gain: {:?}", rx.rf_gain().await?),
            GainCommand::Fixed { db } => {
                rx.set_rf_gain(RfGain::Fixed(*db)).await?;
                println!("fixed gain set to {db} dB");
            }
            GainCommand::Manual { gain, attenuator } => {
                rx.set_rf_gain(RfGain::Manual {
                    gain: *gain,
                    attenuator: *attenuator,
                })
                .await?;
                println!("manual gain set to {gain} (attenuator: {attenuator})");
            }
        },
        Command::Capture { blocks, seconds } => {
            rx.start_capture(*blocks).await?;
            println!("capture running ({})", rx.capture_state().name());
            tokio::time::sleep(Duration::from_secs(*seconds)).await;
            rx.stop_capture().await?;
            println!("capture stopped");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    run(Cli::parse()).await
}
