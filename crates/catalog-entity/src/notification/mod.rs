//! Notification domain entities.

pub mod count;
pub mod kind;
pub mod model;

pub use count::NotificationCount;
pub use kind::NotificationKind;
pub use model::Notification;
