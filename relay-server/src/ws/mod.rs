//! WebSocket endpoint binding transport events to the registry

mod connection;

pub use connection::{ConnectQuery, ws_handler};
