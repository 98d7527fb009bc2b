//! # catalog-realtime
//!
//! The live half of the catalog notification client: a WebSocket subscriber
//! driven by an explicit lifecycle state machine, a reconciling in-memory
//! store, and the [`session::NotificationSession`] that owns both and fronts
//! the mutation gateway.

pub mod events;
pub mod lifecycle;
pub mod message;
pub mod session;
pub mod store;

mod subscriber;

pub use events::SessionEvent;
pub use lifecycle::ConnectionStatus;
pub use session::NotificationSession;
pub use store::NotificationStore;
