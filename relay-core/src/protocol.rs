//! WebSocket protocol message types
//!
//! Both the embedded web page and native device clients use the same
//! protocol. Messages are internally tagged JSON; identifier fields keep
//! the `deviceId` wire name clients already send.

use serde::{Deserialize, Serialize};

/// Messages sent from device to server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Advisory re-registration of the device identifier
    Register {
        /// Identifier the device claims; validated against the one from
        /// the connection handshake
        #[serde(rename = "deviceId")]
        device_id: String,
    },

    /// Opaque payload to broadcast to every connected device
    Message {
        /// Arbitrary payload, relayed untouched
        payload: serde_json::Value,
    },

    /// Liveness ping carrying the client's clock
    Heartbeat {
        /// Client-side timestamp, echoed only into logs
        timestamp: String,
    },
}

/// Messages sent from server to device
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Broadcast payload - device-originated or the periodic server counter
    Message {
        /// Arbitrary payload, relayed untouched
        payload: serde_json::Value,
    },

    /// Reply to a client heartbeat
    HeartbeatAck {
        /// Always true; present for client-side sanity checks
        received: bool,
        /// Server-side timestamp in ISO 8601 format
        timestamp: String,
    },
}

impl ServerMessage {
    /// Broadcast wrapper around an opaque payload
    pub fn message(payload: serde_json::Value) -> Self {
        Self::Message { payload }
    }

    /// Acknowledgement for a client heartbeat, stamped with server time
    pub fn heartbeat_ack(timestamp: impl Into<String>) -> Self {
        Self::HeartbeatAck {
            received: true,
            timestamp: timestamp.into(),
        }
    }
}
