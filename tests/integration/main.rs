//! xled integration test harness.
//!
//! Every test drives `xled-core` over real HTTP against a fake controller
//! served by axum on 127.0.0.1. The fake records each request it receives
//! and answers from a per-route table that tests can override.
//!
//!   cargo test --test integration

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use tokio::sync::oneshot;


// ── Fake device ───────────────────────────────────────────────────────────────

pub const TOKEN: &str = "ABC123";
pub const CHALLENGE_RESPONSE: &str = "xyz";

pub const LOGIN_BODY: &str = r#"{"authentication_token":"ABC123","authentication_token_expires_in":14400,"challenge-response":"xyz","code":1000}"#;

pub const GESTALT_BODY: &str = r#"{"product_name":"Twinkly","hardware_version":"100","bytes_per_led":3,"hw_id":"0012a3b4","flash_size":64,"led_type":14,"product_code":"TWS250STP-B","fw_family":"F","device_name":"Twinkly_ABCDEF","uptime":"8570370","mac":"98:cd:ac:12:34:56","uuid":"00000000-0000-0000-0000-000000000000","max_supported_led":510,"number_of_led":250,"led_profile":"RGB","frame_rate":23.77,"measured_frame_rate":23.26,"movie_capacity":5397,"max_movies":55,"wire_type":1,"copyright":"LEDWORKS 2021","code":1000}"#;

/// One request as the fake device saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub auth_token: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl Recorded {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}

/// Canned answer for one route.
#[derive(Debug, Clone)]
pub struct Canned {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl Canned {
    pub fn ok(body: &str) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Default)]
struct DeviceState {
    routes: HashMap<(String, String), Canned>,
    log: Vec<Recorded>,
}

type Shared = Arc<Mutex<DeviceState>>;

/// Fake controller. Shuts down when dropped.
pub struct FakeDevice {
    pub addr: SocketAddr,
    state: Shared,
    _shutdown: oneshot::Sender<()>,
}

impl FakeDevice {
    /// Start a fake with the default route table.
    pub fn start() -> Result<Self> {
        Self::start_with(&[])
    }

    /// Start a fake, overriding routes before the client's first request.
    pub fn start_with(overrides: &[(&str, &str, Canned)]) -> Result<Self> {
        let state: Shared = Arc::default();
        {
            let mut s = state.lock().unwrap();
            for (method, path, canned) in default_routes().into_iter().chain(
                overrides
                    .iter()
                    .map(|(m, p, c)| (m.to_string(), p.to_string(), c.clone())),
            ) {
                s.routes.insert((method, path), canned);
            }
        }

        let listener = std::net::TcpListener::bind("127.0.0.1:0").context("bind fake device")?;
        listener.set_nonblocking(true)?;
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let app = Router::new().fallback(handle).with_state(state.clone());
        std::thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("fake device runtime");
            rt.block_on(async move {
                let listener =
                    tokio::net::TcpListener::from_std(listener).expect("fake device listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .ok();
            });
        });

        Ok(Self {
            addr,
            state,
            _shutdown: shutdown_tx,
        })
    }

    /// Address in the form the client expects (`host:port`).
    pub fn address(&self) -> String {
        self.addr.to_string()
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn set_route(&self, method: &str, path: &str, canned: Canned) {
        self.state
            .lock()
            .unwrap()
            .routes
            .insert((method.to_string(), path.to_string()), canned);
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Recorded> {
        self.state.lock().unwrap().log.clone()
    }

    /// `METHOD path` for each request received so far.
    pub fn calls(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path))
            .collect()
    }

    pub fn clear(&self) {
        self.state.lock().unwrap().log.clear();
    }
}

fn default_routes() -> Vec<(String, String, Canned)> {
    let ok = r#"{"code":1000}"#;
    [
        ("POST", "/xled/v1/login", Canned::ok(LOGIN_BODY)),
        ("POST", "/xled/v1/verify", Canned::ok(ok)),
        ("POST", "/xled/v1/gestalt", Canned::ok(GESTALT_BODY)),
        ("POST", "/xled/v1/fw/version", Canned::ok(r#"{"version":"2.8.18","code":1000}"#)),
        ("POST", "/xled/v1/logout", Canned::ok(ok)),
        ("GET", "/xled/v1/led/out/brightness", Canned::ok(r#"{"mode":"enabled","value":64,"code":1000}"#)),
        ("POST", "/xled/v1/led/out/brightness", Canned::ok(ok)),
        ("GET", "/xled/v1/led/color", Canned::ok(
            "{\"hue\":0,\"saturation\":255,\"value\":255,\n\"red\":255,\"green\":0,\"blue\":0,\"code\":1000}\n",
        )),
        ("POST", "/xled/v1/led/color", Canned::ok(ok)),
        ("GET", "/xled/v1/led/out/saturation", Canned::ok(r#"{"mode":"enabled","value":180,"code":1000}"#)),
        ("POST", "/xled/v1/led/saturation", Canned::ok(ok)),
        ("GET", "/xled/v1/led/mode", Canned::ok(r#"{"mode":"movie","code":1000}"#)),
        ("POST", "/xled/v1/led/mode", Canned::ok(ok)),
        ("POST", "/xled/v1/led/movies", Canned::ok(ok)),
        ("POST", "/xled/v1/device_name", Canned::ok(ok)),
    ]
    .into_iter()
    .map(|(m, p, c)| (m.to_string(), p.to_string(), c))
    .collect()
}

async fn handle(
    State(state): State<Shared>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let recorded = Recorded {
        method: method.as_str().to_string(),
        path: uri.path().to_string(),
        auth_token: header("x-auth-token"),
        content_type: header("content-type"),
        body: String::from_utf8_lossy(&body).into_owned(),
    };

    let canned = {
        let mut s = state.lock().unwrap();
        let canned = s
            .routes
            .get(&(recorded.method.clone(), recorded.path.clone()))
            .cloned()
            .unwrap_or_else(|| Canned::status(404, r#"{"code":1104}"#));
        s.log.push(recorded);
        canned
    };

    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }

    let status = StatusCode::from_u16(canned.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (
        status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

// ── Harness checks ────────────────────────────────────────────────────────────

#[test]
fn test_fake_device_answers_and_records() {
    let fake = FakeDevice::start().expect("fake device");
    let transport = xled_core::HttpTransport::default();
    let reply = xled_core::Transport::dispatch(
        &transport,
        &xled_core::Request::get(fake.url("/xled/v1/led/mode")),
    );

    assert_eq!(reply.status(), Some(200), "{reply}");
    assert_eq!(fake.calls(), vec!["GET /xled/v1/led/mode"]);
}
