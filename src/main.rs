//! kasa-cloud-gateway - TP-Link Kasa cloud smart-plug control
//!
//! Logs in to the vendor cloud with the configured account, lists the
//! registered devices, and toggles relay state through each device's own
//! cloud endpoint.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kasa_cloud_gateway::{CloudConfig, CloudGateway};

#[derive(Parser)]
#[command(
    name = "kasa-cloud-gateway",
    about = "Control TP-Link Kasa smart plugs through the vendor cloud"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// List devices registered to the account.
    Devices,
    /// Turn a device's relay on.
    On { device_id: String },
    /// Turn a device's relay off.
    Off { device_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(format!(
                    "kasa_cloud_gateway={}",
                    cli.log_level
                ))
            }),
        )
        .init();

    let config = CloudConfig::load()?;
    let gateway = CloudGateway::new(config)?;

    match cli.command {
        Commands::Devices => {
            let devices = gateway.get_devices().await?;
            if devices.is_empty() {
                println!("no devices registered to this account");
            } else {
                for device in devices {
                    println!(
                        "{}  {}  {}",
                        device.device_id,
                        device.alias.as_deref().unwrap_or("-"),
                        device.device_model.as_deref().unwrap_or("-"),
                    );
                }
            }
        }
        Commands::On { device_id } => gateway.turn_device_on(&device_id).await?,
        Commands::Off { device_id } => gateway.turn_device_off(&device_id).await?,
    }

    Ok(())
}
