//! Session state decoded from a login reply.

use serde::Deserialize;

use crate::decode;

/// Device status codes carried in the `code` field of login/verify replies.
pub const STATUS_MESSAGES: &[(u32, &str)] = &[
    (1000, "Ok"),
    (1001, "Error"),
    (1101, "Invalid argument value"),
    (1102, "Error"),
    (1103, "Error - value too long? Or missing required object key?"),
    (1104, "Error - malformed JSON on input?"),
    (1105, "Invalid argument key"),
    (1107, "Ok?"),
    (1108, "Ok?"),
    (1205, "Error with firmware upgrade - SHA1SUM does not match"),
];

/// Look up the message for a device status code.
pub fn status_message(code: u32) -> Option<&'static str> {
    STATUS_MESSAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, message)| *message)
}

/// Authentication state for one device connection.
///
/// Immutable once built. A login replaces the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: String,
    token_expires_in: u64,
    challenge_response: String,
    status_code: u32,
    status_message: Option<&'static str>,
}

/// Something worth reporting about a decoded session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The body could not be decoded; all fields are defaults.
    Undecodable(String),
    /// No token was issued. Carries the body as received.
    EmptyToken { body: String },
}

/// A decoded value plus anything the caller may want to report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded<T> {
    pub value: T,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginReply {
    #[serde(deserialize_with = "decode::text")]
    authentication_token: String,
    #[serde(deserialize_with = "decode::int")]
    authentication_token_expires_in: u64,
    #[serde(rename = "challenge-response", deserialize_with = "decode::text")]
    challenge_response: String,
    #[serde(deserialize_with = "decode::int")]
    code: u32,
}

impl From<LoginReply> for Session {
    fn from(reply: LoginReply) -> Self {
        Self {
            status_message: status_message(reply.code),
            token: reply.authentication_token,
            token_expires_in: reply.authentication_token_expires_in,
            challenge_response: reply.challenge_response,
            status_code: reply.code,
        }
    }
}

impl Session {
    /// Decode a login reply body. Never fails: anything that is not a JSON
    /// object yields an all-default session plus diagnostics.
    pub fn parse(body: Option<&str>) -> Decoded<Session> {
        let mut diagnostics = Vec::new();
        let session = match decode::parse::<LoginReply>(body) {
            Ok(reply) => Session::from(reply),
            Err(e) => {
                diagnostics.push(Diagnostic::Undecodable(e.to_string()));
                Session::default()
            }
        };
        if session.token.is_empty() {
            diagnostics.push(Diagnostic::EmptyToken {
                body: body.unwrap_or_default().to_string(),
            });
        }
        Decoded {
            value: session,
            diagnostics,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Token lifetime in seconds as reported at login.
    pub fn token_expires_in(&self) -> u64 {
        self.token_expires_in
    }

    pub fn challenge_response(&self) -> &str {
        &self.challenge_response
    }

    pub fn status_code(&self) -> u32 {
        self.status_code
    }

    pub fn status_message(&self) -> Option<&'static str> {
        self.status_message
    }

    pub fn is_authenticated(&self) -> bool {
        !self.token.is_empty()
    }
}
