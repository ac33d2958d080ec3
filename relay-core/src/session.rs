//! Device session state machine
//!
//! A session tracks one physical connection's lifecycle:
//! `Pending -> Active -> Closed`, where `Active` is reached only through
//! registry admission and `Closed` is terminal.

use std::fmt;

use uuid::Uuid;

use crate::error::SessionError;
use crate::keepalive::KeepaliveHandle;

/// Identifier for one physical transport connection.
///
/// A device that reconnects gets a fresh `ChannelId` even though its
/// device identifier stays the same; the registry uses this to tell a
/// superseded session from the one that replaced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelId(Uuid);

impl ChannelId {
    /// Generate a fresh channel identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChannelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Lifecycle state of a device session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake seen, not yet admitted by the registry
    Pending,
    /// Admitted and registered
    Active,
    /// Disconnected or rejected (terminal)
    Closed,
}

/// One device's live connection
pub struct DeviceSession {
    device_id: String,
    channel_id: ChannelId,
    state: SessionState,
    keepalive: Option<KeepaliveHandle>,
}

impl DeviceSession {
    /// Create a session in `Pending` state with a fresh channel id
    pub fn new(device_id: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            channel_id: ChannelId::new(),
            state: SessionState::Pending,
            keepalive: None,
        }
    }

    /// The client-supplied device identifier
    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// The identifier of this physical connection
    pub fn channel_id(&self) -> ChannelId {
        self.channel_id
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Transition `Pending -> Active`. Called only after successful
    /// registry admission.
    pub fn activate(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Pending => {
                self.state = SessionState::Active;
                Ok(())
            }
            other => Err(SessionError::InvalidState {
                expected: "Pending".to_string(),
                actual: format!("{:?}", other),
            }),
        }
    }

    /// Attach the session's background keepalive task. The handle is
    /// exclusively owned here and cancelled on close.
    pub fn set_keepalive(&mut self, handle: KeepaliveHandle) {
        self.keepalive = Some(handle);
    }

    /// Transition to `Closed`, cancelling the keepalive task if one is
    /// attached. Idempotent: repeated calls after the first are no-ops.
    ///
    /// Returns whether this call performed the close.
    pub fn close(&mut self) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        self.state = SessionState::Closed;
        if let Some(handle) = self.keepalive.take() {
            handle.cancel();
        }
        true
    }
}
