//! xled — command-line client for xled LED-strip controllers.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use xled_core::config::XledConfig;
use xled_core::{Device, HttpTransport, Mode};

mod cmd;

#[derive(Parser)]
#[command(name = "xled", about = "Control an xled LED-strip controller over HTTP")]
struct Cli {
    /// Device host or host:port (overrides config)
    #[arg(short, long, global = true)]
    address: Option<String>,

    /// Connect timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    connect_timeout_ms: Option<u64>,

    /// Read timeout in milliseconds (overrides config)
    #[arg(long, global = true)]
    read_timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the device descriptor and session
    Info,
    /// Show current brightness, color, saturation, and mode
    State,
    /// Show the firmware version
    Firmware,
    /// Read or set brightness (0-100)
    Brightness {
        #[arg(value_parser = clap::value_parser!(u8).range(0..=100))]
        value: Option<u8>,
    },
    /// Read or set the RGB color
    Color {
        #[arg(num_args = 3, value_names = ["RED", "GREEN", "BLUE"])]
        rgb: Option<Vec<u8>>,
    },
    /// Set the color in HSV (hue 0-359, saturation and value 0-255)
    Hsv { hue: u16, saturation: u8, value: u8 },
    /// Read or set saturation (0-255)
    Saturation { value: Option<u8> },
    /// Read or set the operating mode
    Mode { mode: Option<Mode> },
    /// Select the active movie
    Movie { id: u32 },
    /// Rename the device
    Name { name: String },
    /// End the session on the device
    Logout,
}

fn connect(cli: &Cli) -> Result<Device> {
    let mut config = XledConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "failed to load config, using defaults");
        XledConfig::default()
    });
    if let Some(address) = &cli.address {
        config.device.address = address.clone();
    }
    if let Some(ms) = cli.connect_timeout_ms {
        config.timeouts.connect_ms = ms;
    }
    if let Some(ms) = cli.read_timeout_ms {
        config.timeouts.read_ms = ms;
    }
    if config.device.address.is_empty() {
        bail!(
            "no device address: pass --address or set device.address in {}",
            XledConfig::file_path().display()
        );
    }

    let transport = HttpTransport::new(config.timeouts());
    Ok(Device::with_transport(config.device.address, transport))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let device = connect(&cli).context("failed to set up device connection")?;

    match cli.command {
        Command::Info => cmd::info::cmd_info(&device),
        Command::State => cmd::info::cmd_state(&device),
        Command::Firmware => cmd::info::cmd_firmware(&device),
        Command::Brightness { value } => cmd::set::cmd_brightness(&device, value),
        Command::Color { rgb } => cmd::set::cmd_color(&device, rgb.as_deref()),
        Command::Hsv {
            hue,
            saturation,
            value,
        } => cmd::set::report("hsv", &device.set_color_hsv(hue, saturation, value)),
        Command::Saturation { value } => cmd::set::cmd_saturation(&device, value),
        Command::Mode { mode } => cmd::set::cmd_mode(&device, mode),
        Command::Movie { id } => cmd::set::report("movie", &device.set_current_movie(id)),
        Command::Name { name } => cmd::set::report("name", &device.set_device_name(&name)),
        Command::Logout => cmd::set::report("logout", &device.logout()),
    }
}
