//! Connection registry: device identifier to live channel bookkeeping
//!
//! The registry is the only shared mutable state in the relay. It
//! enforces one live connection per device identifier: admission runs a
//! check-then-set under a single write lock, so of any number of
//! concurrent connects for the same device exactly one is admitted.
//! The lock covers only the map mutation and is never held across I/O.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::error::AdmissionError;
use crate::protocol::ServerMessage;
use crate::session::ChannelId;

/// Sending half of a connection's outbound queue.
///
/// The receiving half is drained by the connection's writer task.
/// `is_closed` on the sender doubles as the channel-liveness predicate:
/// once the writer is gone, the entry is stale.
pub type OutboundSender = mpsc::UnboundedSender<ServerMessage>;

struct RegisteredChannel {
    channel_id: ChannelId,
    sender: OutboundSender,
}

/// Process-wide map of admitted device sessions.
///
/// Constructed once at startup and shared via `Arc`; all mutation goes
/// through [`admit`](Self::admit) and [`release`](Self::release).
pub struct ConnectionRegistry {
    devices: RwLock<HashMap<String, RegisteredChannel>>,
}

impl ConnectionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            devices: RwLock::new(HashMap::new()),
        }
    }

    /// Admit a connection for `device_id`, registering its outbound queue.
    ///
    /// An existing entry whose channel is still live rejects the
    /// newcomer. An entry whose channel already closed without a matching
    /// release (the cleanup lost an ordering race) is treated as absent
    /// and replaced.
    pub async fn admit(
        &self,
        device_id: &str,
        channel_id: ChannelId,
        sender: OutboundSender,
    ) -> Result<(), AdmissionError> {
        if device_id.is_empty() {
            return Err(AdmissionError::MissingIdentifier);
        }

        let mut devices = self.devices.write().await;
        if let Some(existing) = devices.get(device_id) {
            if !existing.sender.is_closed() {
                return Err(AdmissionError::DuplicateDevice(device_id.to_string()));
            }
            debug!(
                device_id = %device_id,
                stale_channel = %existing.channel_id,
                "replacing stale registry entry"
            );
        }
        devices.insert(
            device_id.to_string(),
            RegisteredChannel { channel_id, sender },
        );
        Ok(())
    }

    /// Remove the mapping for `device_id`, but only if it still points at
    /// `channel_id`: a superseded session releasing late must not evict
    /// the entry of the session that replaced it. Idempotent.
    pub async fn release(&self, device_id: &str, channel_id: ChannelId) {
        let mut devices = self.devices.write().await;
        if devices
            .get(device_id)
            .is_some_and(|entry| entry.channel_id == channel_id)
        {
            devices.remove(device_id);
            debug!(device_id = %device_id, channel_id = %channel_id, "released registry entry");
        }
    }

    /// Fan a message out to every registered session, including whoever
    /// sent it. Best-effort per recipient: a failed send is logged and
    /// skipped, never propagated. Returns how many queues accepted the
    /// message.
    pub async fn broadcast(&self, message: &ServerMessage) -> usize {
        let devices = self.devices.read().await;
        let mut delivered = 0;
        for (device_id, channel) in devices.iter() {
            match channel.sender.send(message.clone()) {
                Ok(()) => delivered += 1,
                Err(_) => {
                    warn!(device_id = %device_id, "dropping broadcast for dead channel");
                }
            }
        }
        delivered
    }

    /// Whether `device_id` currently maps to a live channel
    pub async fn is_connected(&self, device_id: &str) -> bool {
        self.devices
            .read()
            .await
            .get(device_id)
            .is_some_and(|entry| !entry.sender.is_closed())
    }

    /// Number of registered devices
    pub async fn device_count(&self) -> usize {
        self.devices.read().await.len()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
