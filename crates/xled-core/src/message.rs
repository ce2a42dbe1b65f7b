//! Request payloads for the xled endpoints, and the LED operating modes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Fixed challenge sent with every login.
pub const LOGIN_CHALLENGE: &str = "twinkly";

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub challenge: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct VerifyRequest<'a> {
    #[serde(rename = "challenge-response")]
    pub challenge_response: &'a str,
}

/// `{}` for endpoints that take no arguments.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Empty {}

/// Body shared by the brightness and saturation writes.
#[derive(Debug, Clone, Serialize)]
pub struct LevelRequest {
    pub mode: &'static str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub value: u8,
}

impl LevelRequest {
    /// Enabled, absolute level.
    pub fn absolute(value: u8) -> Self {
        Self {
            mode: "enabled",
            kind: "A",
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RgbRequest {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HsvRequest {
    pub hue: u16,
    pub saturation: u8,
    pub value: u8,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct MovieRequest {
    pub id: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceNameRequest<'a> {
    pub name: &'a str,
}

// ── Mode ──────────────────────────────────────────────────────────────────────

/// LED operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// LEDs off
    Off,
    /// Single static color
    Color,
    /// Cycles through built-in effects
    Demo,
    /// One predefined effect
    Effect,
    /// Plays the uploaded movie
    Movie,
    /// Plays the stored playlist
    Playlist,
    /// Real-time frames over UDP
    Rt,
}

impl Mode {
    pub const ALL: [Mode; 7] = [
        Mode::Off,
        Mode::Color,
        Mode::Demo,
        Mode::Effect,
        Mode::Movie,
        Mode::Playlist,
        Mode::Rt,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Off => "off",
            Mode::Color => "color",
            Mode::Demo => "demo",
            Mode::Effect => "effect",
            Mode::Movie => "movie",
            Mode::Playlist => "playlist",
            Mode::Rt => "rt",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown mode {0:?} (expected one of off, color, demo, effect, movie, playlist, rt)")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mode::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}
