//! WebSocket wire protocol.

pub mod types;

pub use types::{ClientFrame, ServerFrame, decode_server_frame};
