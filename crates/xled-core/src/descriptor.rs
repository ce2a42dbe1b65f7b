//! Static device attributes reported by the gestalt endpoint.

use serde::Deserialize;

use crate::decode;

/// Snapshot of hardware/firmware identity. Every field defaults to zero or
/// empty when the device omits it or the query fails.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeviceDescriptor {
    #[serde(deserialize_with = "decode::text")]
    pub product_name: String,
    #[serde(deserialize_with = "decode::int")]
    pub hardware_version: u32,
    #[serde(deserialize_with = "decode::int")]
    pub bytes_per_led: u32,
    #[serde(deserialize_with = "decode::text")]
    pub hw_id: String,
    #[serde(deserialize_with = "decode::int")]
    pub flash_size: u32,
    #[serde(deserialize_with = "decode::int")]
    pub led_type: u32,
    #[serde(deserialize_with = "decode::text")]
    pub product_code: String,
    #[serde(deserialize_with = "decode::text")]
    pub fw_family: String,
    #[serde(deserialize_with = "decode::text")]
    pub device_name: String,
    #[serde(deserialize_with = "decode::int")]
    pub uptime: u64,
    #[serde(deserialize_with = "decode::text")]
    pub mac: String,
    #[serde(deserialize_with = "decode::text")]
    pub uuid: String,
    #[serde(rename = "max_supported_led", deserialize_with = "decode::int")]
    pub max_supported_leds: u32,
    #[serde(rename = "number_of_led", deserialize_with = "decode::int")]
    pub led_count: u32,
    #[serde(deserialize_with = "decode::text")]
    pub led_profile: String,
    #[serde(deserialize_with = "decode::int")]
    pub frame_rate: u32,
    #[serde(deserialize_with = "decode::float")]
    pub measured_frame_rate: f32,
    #[serde(deserialize_with = "decode::int")]
    pub movie_capacity: u32,
    #[serde(deserialize_with = "decode::int")]
    pub max_movies: u32,
    #[serde(deserialize_with = "decode::int")]
    pub wire_type: u32,
    #[serde(deserialize_with = "decode::text")]
    pub copyright: String,
}

impl DeviceDescriptor {
    pub fn from_body(body: Option<&str>) -> Self {
        decode::parse_or_default(body)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct FirmwareVersion {
    #[serde(deserialize_with = "decode::text")]
    pub version: String,
}
