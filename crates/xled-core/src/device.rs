//! Authenticated conversation with one device.
//!
//! Construction logs in and fetches the descriptor. Mutating commands send
//! a verify with the current challenge-response right before their own
//! request; the firmware expects that handshake before accepting state
//! changes. Queries only attach the token.
//!
//! A `Device` is not meant to be shared between threads. Login takes
//! `&mut self` and replaces the whole session.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::decode;
use crate::descriptor::{DeviceDescriptor, FirmwareVersion};
use crate::dispatch::{HttpTransport, Reply, Request, Transport};
use crate::message::{
    DeviceNameRequest, Empty, HsvRequest, LevelRequest, LoginRequest, ModeRequest, MovieRequest,
    RgbRequest, VerifyRequest, LOGIN_CHALLENGE,
};
use crate::session::{Diagnostic, Session};
use crate::Mode;

pub const AUTH_HEADER: &str = "X-Auth-Token";

/// Endpoint paths under the device base URL.
pub mod endpoint {
    pub const LOGIN: &str = "/xled/v1/login";
    pub const VERIFY: &str = "/xled/v1/verify";
    pub const LOGOUT: &str = "/xled/v1/logout";
    pub const GESTALT: &str = "/xled/v1/gestalt";
    pub const FW_VERSION: &str = "/xled/v1/fw/version";
    pub const DEVICE_NAME: &str = "/xled/v1/device_name";
    pub const BRIGHTNESS: &str = "/xled/v1/led/out/brightness";
    pub const COLOR: &str = "/xled/v1/led/color";
    pub const SATURATION_READ: &str = "/xled/v1/led/out/saturation";
    pub const SATURATION_WRITE: &str = "/xled/v1/led/saturation";
    pub const MODE: &str = "/xled/v1/led/mode";
    pub const MOVIES: &str = "/xled/v1/led/movies";
}

/// Current color as reported by the device.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Color {
    #[serde(deserialize_with = "decode::int")]
    pub red: u8,
    #[serde(deserialize_with = "decode::int")]
    pub green: u8,
    #[serde(deserialize_with = "decode::int")]
    pub blue: u8,
    #[serde(deserialize_with = "decode::int")]
    pub hue: u16,
    #[serde(deserialize_with = "decode::int")]
    pub saturation: u8,
    #[serde(deserialize_with = "decode::int")]
    pub value: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LevelReply {
    #[serde(deserialize_with = "decode::int")]
    value: u8,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModeReply {
    #[serde(deserialize_with = "decode::text")]
    mode: String,
}

#[derive(Debug)]
pub struct Device<T: Transport = HttpTransport> {
    address: String,
    transport: T,
    session: Session,
    descriptor: DeviceDescriptor,
}

impl Device<HttpTransport> {
    /// Connect over plain HTTP with default timeouts.
    pub fn connect(address: impl Into<String>) -> Self {
        Self::with_transport(address, HttpTransport::default())
    }
}

impl<T: Transport> Device<T> {
    /// Log in and fetch the descriptor. Never fails; an unreachable device
    /// yields an unauthenticated session and an empty descriptor.
    pub fn with_transport(address: impl Into<String>, transport: T) -> Self {
        let mut device = Self {
            address: address.into(),
            transport,
            session: Session::default(),
            descriptor: DeviceDescriptor::default(),
        };
        device.login();
        device.descriptor = device.fetch_descriptor();
        tracing::info!(
            address = %device.address,
            name = %device.descriptor.device_name,
            authenticated = device.session.is_authenticated(),
            "device connected"
        );
        device
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Point later requests at a different address. The session is kept.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = address.into();
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Descriptor fetched at construction.
    pub fn descriptor(&self) -> &DeviceDescriptor {
        &self.descriptor
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Session ───────────────────────────────────────────────────────────────

    /// Send the login challenge and replace the session with the result.
    pub fn login(&mut self) -> Reply {
        let request = match json_request(self.url(endpoint::LOGIN), &LoginRequest {
            challenge: LOGIN_CHALLENGE,
        }) {
            Ok(request) => request,
            Err(reply) => return reply,
        };
        let reply = self.transport.dispatch(&request);

        let decoded = Session::parse(reply.json_body());
        for diagnostic in &decoded.diagnostics {
            match diagnostic {
                Diagnostic::EmptyToken { body } => tracing::warn!(
                    address = %self.address,
                    reply = %body,
                    "authentication token is empty"
                ),
                Diagnostic::Undecodable(error) => tracing::debug!(
                    address = %self.address,
                    error = %error,
                    "login reply not decodable"
                ),
            }
        }
        self.session = decoded.value;
        reply
    }

    /// Echo the challenge-response back to the device.
    pub fn verify(&self) -> Reply {
        self.post(endpoint::VERIFY, &VerifyRequest {
            challenge_response: self.session.challenge_response(),
        })
    }

    /// End the session on the device. The local session is left as is, so
    /// further mutating calls will be rejected by the device.
    pub fn logout(&self) -> Reply {
        self.mutate(endpoint::LOGOUT, &Empty {})
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// JSON body of a fresh gestalt query.
    pub fn device_info(&self) -> Option<String> {
        self.post(endpoint::GESTALT, &Empty {})
            .json_body()
            .map(str::to_string)
    }

    /// Decode a fresh gestalt query. Does not replace `descriptor()`.
    pub fn fetch_descriptor(&self) -> DeviceDescriptor {
        DeviceDescriptor::from_body(self.device_info().as_deref())
    }

    pub fn firmware_version(&self) -> String {
        self.query_post::<FirmwareVersion>(endpoint::FW_VERSION).version
    }

    /// Brightness 0..=100. A 404 reads as 0.
    pub fn brightness(&self) -> u8 {
        let reply = self.get(endpoint::BRIGHTNESS);
        if reply.status() == Some(404) {
            return 0;
        }
        decode::parse_or_default::<LevelReply>(reply.json_body()).value
    }

    pub fn color(&self) -> Color {
        decode::parse_or_default(self.color_reply().json_body())
    }

    /// Raw reply of the color query.
    pub fn color_reply(&self) -> Reply {
        self.get(endpoint::COLOR)
    }

    /// Saturation 0..=255.
    pub fn saturation(&self) -> u8 {
        self.query_get::<LevelReply>(endpoint::SATURATION_READ).value
    }

    /// Mode name as reported, empty when unknown.
    pub fn mode(&self) -> String {
        self.query_get::<ModeReply>(endpoint::MODE).mode
    }

    // ── Commands ──────────────────────────────────────────────────────────────

    pub fn set_brightness(&self, value: u8) -> Reply {
        self.mutate(endpoint::BRIGHTNESS, &LevelRequest::absolute(value))
    }

    pub fn set_color(&self, red: u8, green: u8, blue: u8) -> Reply {
        self.mutate(endpoint::COLOR, &RgbRequest { red, green, blue })
    }

    /// Hue 0..=359, saturation and value 0..=255.
    pub fn set_color_hsv(&self, hue: u16, saturation: u8, value: u8) -> Reply {
        self.mutate(endpoint::COLOR, &HsvRequest {
            hue,
            saturation,
            value,
        })
    }

    pub fn set_saturation(&self, value: u8) -> Reply {
        self.mutate(endpoint::SATURATION_WRITE, &LevelRequest::absolute(value))
    }

    pub fn set_mode(&self, mode: Mode) -> Reply {
        self.mutate(endpoint::MODE, &ModeRequest { mode })
    }

    pub fn set_current_movie(&self, id: u32) -> Reply {
        self.mutate(endpoint::MOVIES, &MovieRequest { id })
    }

    pub fn set_device_name(&self, name: &str) -> Reply {
        self.mutate(endpoint::DEVICE_NAME, &DeviceNameRequest { name })
    }

    // ── Plumbing ──────────────────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    fn authorized(&self, request: Request) -> Request {
        request.with_header(AUTH_HEADER, self.session.token())
    }

    fn get(&self, path: &str) -> Reply {
        let request = self.authorized(Request::get(self.url(path)));
        self.transport.dispatch(&request)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Reply {
        match json_request(self.url(path), body) {
            Ok(request) => self.transport.dispatch(&self.authorized(request)),
            Err(reply) => reply,
        }
    }

    fn mutate<B: Serialize>(&self, path: &str, body: &B) -> Reply {
        self.verify();
        self.post(path, body)
    }

    fn query_get<R: DeserializeOwned + Default>(&self, path: &str) -> R {
        decode::parse_or_default(self.get(path).json_body())
    }

    fn query_post<R: DeserializeOwned + Default>(&self, path: &str) -> R {
        decode::parse_or_default(self.post(path, &Empty {}).json_body())
    }
}

fn json_request<B: Serialize>(url: String, body: &B) -> Result<Request, Reply> {
    serde_json::to_string(body)
        .map(|json| Request::post(url, json))
        .map_err(|e| Reply::Failed(e.to_string()))
}
