//! xled-core — session handling, request dispatch, and typed commands for
//! the xled HTTP control API of networked LED-strip controllers.

pub mod config;
pub mod decode;
pub mod descriptor;
pub mod device;
pub mod dispatch;
pub mod message;
pub mod session;

pub use descriptor::DeviceDescriptor;
pub use device::{Color, Device};
pub use dispatch::{HttpTransport, Method, Reply, Request, Timeouts, Transport};
pub use message::Mode;
pub use session::{Diagnostic, Session};
