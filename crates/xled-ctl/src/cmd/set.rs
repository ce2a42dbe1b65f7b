//! Commands that read a value, or change it when one is given.

use anyhow::{bail, Result};
use xled_core::{Device, Mode, Reply};

/// Print a command reply; non-2xx or transport failures are errors.
pub fn report(label: &str, reply: &Reply) -> Result<()> {
    if reply.is_success() {
        println!("{}: ok", label);
        tracing::debug!(reply = %reply, "command reply");
        Ok(())
    } else {
        bail!("{} failed:\n{}", label, reply)
    }
}

pub fn cmd_brightness(device: &Device, value: Option<u8>) -> Result<()> {
    match value {
        Some(v) => report("brightness", &device.set_brightness(v)),
        None => {
            println!("{}", device.brightness());
            Ok(())
        }
    }
}

pub fn cmd_color(device: &Device, rgb: Option<&[u8]>) -> Result<()> {
    match rgb {
        Some(&[red, green, blue]) => report("color", &device.set_color(red, green, blue)),
        Some(other) => bail!("expected RED GREEN BLUE, got {} values", other.len()),
        None => {
            let c = device.color();
            println!("{} {} {}", c.red, c.green, c.blue);
            Ok(())
        }
    }
}

pub fn cmd_saturation(device: &Device, value: Option<u8>) -> Result<()> {
    match value {
        Some(v) => report("saturation", &device.set_saturation(v)),
        None => {
            println!("{}", device.saturation());
            Ok(())
        }
    }
}

pub fn cmd_mode(device: &Device, mode: Option<Mode>) -> Result<()> {
    match mode {
        Some(m) => report("mode", &device.set_mode(m)),
        None => {
            let current = device.mode();
            println!("{}", if current.is_empty() { "unknown" } else { current.as_str() });
            Ok(())
        }
    }
}
