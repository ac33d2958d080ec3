//! Per-session periodic keepalive emitter
//!
//! Each admitted session owns one background task that pushes an
//! incrementing counter message down the session's own outbound queue at
//! a fixed interval. The task terminates itself once the queue closes
//! and honors cancellation from the session's close path, whichever
//! fires first.

use std::time::Duration;

use serde_json::json;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::protocol::ServerMessage;
use crate::registry::OutboundSender;

/// Default emission interval: two hours
pub const DEFAULT_KEEPALIVE_INTERVAL: Duration = Duration::from_secs(2 * 60 * 60);

/// Ownership token for one session's keepalive task
pub struct KeepaliveHandle {
    token: CancellationToken,
    task: JoinHandle<()>,
}

impl KeepaliveHandle {
    /// Cancel the task. Safe to call more than once.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the task has run to completion
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

/// Spawn the periodic emitter for one session.
///
/// The first emission happens one full interval after spawn. Send
/// failure is treated as the authoritative liveness signal: the task
/// stops, not skips, when the outbound queue is gone.
pub fn spawn_keepalive(
    device_id: String,
    sender: OutboundSender,
    interval: Duration,
) -> KeepaliveHandle {
    let token = CancellationToken::new();
    let task_token = token.clone();

    let task = tokio::spawn(async move {
        let mut counter: u64 = 0;
        loop {
            tokio::select! {
                _ = task_token.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            if sender.is_closed() {
                break;
            }

            let text = format!("Server message to {}: {}", device_id, counter);
            if sender.send(ServerMessage::message(json!(text))).is_err() {
                break;
            }
            counter += 1;
        }
        debug!(device_id = %device_id, "keepalive task stopped");
    });

    KeepaliveHandle { token, task }
}
