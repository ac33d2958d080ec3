//! relay-core - connection registry and session machinery for the relay
//!
//! This crate holds the transport-independent core of the relay: the
//! wire protocol types, the per-device session state machine, the
//! process-wide connection registry with its admission rules, and the
//! per-session keepalive scheduler. The HTTP/WebSocket surface lives in
//! relay-server.

pub mod error;
pub mod keepalive;
pub mod protocol;
pub mod registry;
pub mod session;

pub use error::{AdmissionError, SessionError};
pub use keepalive::{KeepaliveHandle, spawn_keepalive};
pub use protocol::{ClientMessage, ServerMessage};
pub use registry::{ConnectionRegistry, OutboundSender};
pub use session::{ChannelId, DeviceSession, SessionState};
