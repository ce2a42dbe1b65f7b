//! Read-only commands: descriptor, session, current state, firmware.

use anyhow::Result;
use xled_core::Device;

pub fn cmd_info(device: &Device) -> Result<()> {
    let d = device.descriptor();
    let s = device.session();

    println!("═══════════════════════════════════════");
    println!("  {} ({})", d.device_name, device.address());
    println!("═══════════════════════════════════════");
    println!("  Product            : {} [{}]", d.product_name, d.product_code);
    println!("  Hardware version   : {}", d.hardware_version);
    println!("  Hardware ID        : {}", d.hw_id);
    println!("  Firmware family    : {}", d.fw_family);
    println!("  MAC                : {}", d.mac);
    println!("  UUID               : {}", d.uuid);
    println!("  Uptime             : {}", d.uptime);
    println!(
        "  LEDs               : {} of {} ({}, {} bytes/LED, type {})",
        d.led_count, d.max_supported_leds, d.led_profile, d.bytes_per_led, d.led_type
    );
    println!(
        "  Frame rate         : {} (measured {:.2})",
        d.frame_rate, d.measured_frame_rate
    );
    println!(
        "  Movies             : {} max, capacity {}",
        d.max_movies, d.movie_capacity
    );
    println!("  Flash size         : {}", d.flash_size);
    println!("  Wire type          : {}", d.wire_type);
    println!("  Copyright          : {}", d.copyright);
    println!();
    println!("  Session");
    println!("  ┌─ authenticated : {}", s.is_authenticated());
    println!("  │  expires in    : {}s", s.token_expires_in());
    println!(
        "  └─ status       : {} {}",
        s.status_code(),
        s.status_message().unwrap_or("-")
    );

    Ok(())
}

pub fn cmd_state(device: &Device) -> Result<()> {
    let color = device.color();

    println!("═══════════════════════════════════════");
    println!("  LED State");
    println!("═══════════════════════════════════════");
    println!("  Mode       : {}", device.mode());
    println!("  Brightness : {}", device.brightness());
    println!("  Saturation : {}", device.saturation());
    println!(
        "  Color      : rgb({}, {}, {}) hsv({}, {}, {})",
        color.red, color.green, color.blue, color.hue, color.saturation, color.value
    );

    Ok(())
}

pub fn cmd_firmware(device: &Device) -> Result<()> {
    let version = device.firmware_version();
    if version.is_empty() {
        println!("Firmware version unavailable.");
    } else {
        println!("{}", version);
    }
    Ok(())
}
