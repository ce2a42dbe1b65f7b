//! Single-shot HTTP exchange reduced to one `Reply`.
//!
//! A dispatch never fails past this module. Transport problems come back as
//! `Reply::Timeout` or `Reply::Failed`; non-2xx statuses come back as an
//! ordinary `Reply::Http` for the caller to inspect.

use std::fmt;
use std::time::Duration;

use crate::decode::extract_json_body;

/// Reason phrases rendered in the status line. Other codes render empty.
const REASON_PHRASES: &[(u16, &str)] = &[
    (200, "OK"),
    (400, "Bad Request"),
    (401, "Unauthorized"),
    (404, "Not Found"),
    (500, "Internal Server Error"),
];

pub fn reason_phrase(status: u16) -> &'static str {
    REASON_PHRASES
        .iter()
        .find(|(code, _)| *code == status)
        .map(|(_, phrase)| *phrase)
        .unwrap_or("")
}

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON: &str = "application/json";

// ── Request ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One outbound request. Header names are unique, compared without case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub url: String,
    headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(Method::Post, url).with_body(body)
    }

    /// Set a header, replacing any existing one with the same name.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.headers.retain(|(n, _)| !n.eq_ignore_ascii_case(&name));
        self.headers.push((name, value.into()));
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Headers as sent: a JSON content type is added when a body is present
    /// and the caller set none.
    pub fn outgoing_headers(&self) -> Vec<(String, String)> {
        let mut headers = self.headers.clone();
        if self.body.is_some() && self.header(CONTENT_TYPE).is_none() {
            headers.push((CONTENT_TYPE.to_string(), JSON.to_string()));
        }
        headers
    }

    /// Body bytes to write, if any. Empty bodies are not written.
    pub fn outgoing_body(&self) -> Option<&str> {
        self.body.as_deref().filter(|b| !b.is_empty())
    }
}

// ── Reply ─────────────────────────────────────────────────────────────────────

/// Outcome of one dispatch.
///
/// `Display` renders the composite text form:
/// `HTTP/1.1 <code> <reason>` then one `Name: value` line per header, a blank
/// line, and the body with line breaks removed. Failures render as
/// `Timeout: <msg>` or `Exception: <msg>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Http {
        status: u16,
        headers: Vec<(String, String)>,
        body: String,
    },
    Timeout(String),
    Failed(String),
}

impl Reply {
    /// Build an HTTP reply, flattening the body onto one line.
    pub fn http(status: u16, headers: Vec<(String, String)>, body: &str) -> Self {
        Reply::Http {
            status,
            headers,
            body: body.split(['\n', '\r']).collect(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Reply::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status(), Some(200..=299))
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Reply::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The JSON object in the body, from the first `{` to the end.
    pub fn json_body(&self) -> Option<&str> {
        self.body().and_then(extract_json_body)
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Http {
                status,
                headers,
                body,
            } => {
                writeln!(f, "HTTP/1.1 {} {}", status, reason_phrase(*status))?;
                for (name, value) in headers {
                    writeln!(f, "{}: {}", name, value)?;
                }
                writeln!(f)?;
                f.write_str(body)
            }
            Reply::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Reply::Failed(msg) => write!(f, "Exception: {}", msg),
        }
    }
}

// ── Transport ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub connect: Duration,
    pub read: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_millis(5000),
            read: Duration::from_millis(5000),
        }
    }
}

/// Performs exactly one exchange per call. Implementations must not panic
/// or retry; every outcome is folded into the returned `Reply`.
pub trait Transport {
    fn dispatch(&self, request: &Request) -> Reply;
}

/// Blocking HTTP transport. Each dispatch opens and closes its own
/// connection.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    timeouts: Timeouts,
}

impl HttpTransport {
    pub fn new(timeouts: Timeouts) -> Self {
        Self { timeouts }
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    fn exchange(&self, request: &Request) -> Result<Reply, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(self.timeouts.connect)
            .timeout(self.timeouts.connect + self.timeouts.read)
            .pool_max_idle_per_host(0)
            .build()?;

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut builder = client.request(method, &request.url);
        for (name, value) in request.outgoing_headers() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.outgoing_body() {
            builder = builder.body(body.as_bytes().to_vec());
        }

        let response = builder.send()?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let bytes = response.bytes()?;
        Ok(Reply::http(status, headers, &String::from_utf8_lossy(&bytes)))
    }
}

impl Transport for HttpTransport {
    fn dispatch(&self, request: &Request) -> Reply {
        tracing::debug!(
            method = request.method.as_str(),
            url = %request.url,
            "dispatching request"
        );
        match self.exchange(request) {
            Ok(reply) => {
                tracing::debug!(status = ?reply.status(), url = %request.url, "reply received");
                reply
            }
            Err(e) if e.is_timeout() => {
                tracing::debug!(error = %e, url = %request.url, "request timed out");
                Reply::Timeout(e.to_string())
            }
            Err(e) => {
                tracing::debug!(error = %e, url = %request.url, "request failed");
                Reply::Failed(e.to_string())
            }
        }
    }
}
