//! Connection lifecycle state machine.
//!
//! Every transition of the live subscription is a pure function from
//! (state, event) to (state, effects). The subscriber task feeds events in
//! and executes the returned [`Effect`]s; nothing in here touches I/O, so
//! the whole protocol is testable without a socket.

use serde::{Deserialize, Serialize};

/// Connection status of the live subscription, as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No transport; an automatic retry may be pending.
    Disconnected,
    /// Identity resolution or transport establishment in progress.
    Connecting,
    /// Subscribed to the live topic and receiving frames.
    Connected,
    /// A failure that automatic retries do not recover; awaiting a manual
    /// reconnect.
    Error,
}

impl ConnectionStatus {
    /// Return the status as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
        }
    }
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Inputs to the lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    /// The task wants to start a connection attempt.
    ConnectRequested,
    /// The authenticated user was resolved.
    IdentityResolved,
    /// Identity resolution failed.
    IdentityFailed,
    /// The WebSocket handshake completed.
    TransportOpened,
    /// The server acknowledged the topic subscription.
    SubscribeAcked,
    /// The transport dropped, failed to open, or went silent.
    TransportClosed,
    /// The server reported a protocol-level failure.
    ProtocolError,
    /// The consumer asked for a reconnect.
    ReconnectRequested,
    /// The session is tearing down.
    ShutdownRequested,
}

/// Side effects the subscriber task must execute after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Resolve the authenticated user via the backend.
    ResolveIdentity,
    /// Open the WebSocket transport.
    OpenTransport,
    /// Send the subscribe frame for the per-user topic.
    SendSubscribe,
    /// Re-fetch the snapshot (first successful connection only).
    RefreshSnapshot,
    /// Forget the topic subscription (send unsubscribe if still possible).
    ClearSubscription,
    /// Close and drop the transport.
    CloseTransport,
}

/// The lifecycle state machine for one session's live subscription.
///
/// Tracks the public status plus the bookkeeping the protocol needs: the
/// automatic-retry attempt counter, whether a subscription is held, and
/// whether the one-time post-connect snapshot refresh has already fired.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    status: ConnectionStatus,
    attempts: u32,
    subscribed: bool,
    snapshot_refreshed: bool,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    /// A fresh machine in `disconnected`.
    pub fn new() -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            attempts: 0,
            subscribed: false,
            snapshot_refreshed: false,
        }
    }

    /// Current public status.
    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Automatic reconnect attempts since the last successful connect.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Whether a topic subscription is currently held.
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Apply one event and return the effects to execute, in order.
    pub fn apply(&mut self, event: LifecycleEvent) -> Vec<Effect> {
        use ConnectionStatus::*;

        match event {
            LifecycleEvent::ShutdownRequested => {
                let mut effects = Vec::new();
                if self.subscribed {
                    self.subscribed = false;
                    effects.push(Effect::ClearSubscription);
                    effects.push(Effect::CloseTransport);
                }
                self.status = Disconnected;
                effects
            }

            LifecycleEvent::ConnectRequested => match self.status {
                Disconnected => {
                    self.status = Connecting;
                    vec![Effect::ResolveIdentity]
                }
                // Already connecting or connected; nothing to do. `error`
                // only leaves via an explicit reconnect request.
                Connecting | Connected | Error => Vec::new(),
            },

            LifecycleEvent::IdentityResolved => match self.status {
                Connecting => vec![Effect::OpenTransport],
                _ => Vec::new(),
            },

            LifecycleEvent::IdentityFailed => match self.status {
                Connecting => {
                    self.status = Error;
                    Vec::new()
                }
                _ => Vec::new(),
            },

            LifecycleEvent::TransportOpened => match self.status {
                // The idempotent-subscribe rule: never send a second
                // subscribe while one is held.
                Connecting if !self.subscribed => vec![Effect::SendSubscribe],
                _ => Vec::new(),
            },

            LifecycleEvent::SubscribeAcked => match self.status {
                Connecting => {
                    self.status = Connected;
                    self.subscribed = true;
                    self.attempts = 0;
                    if self.snapshot_refreshed {
                        Vec::new()
                    } else {
                        self.snapshot_refreshed = true;
                        vec![Effect::RefreshSnapshot]
                    }
                }
                // A duplicate ack while connected is a logged no-op.
                _ => Vec::new(),
            },

            LifecycleEvent::TransportClosed => match self.status {
                Connecting | Connected => {
                    let mut effects = Vec::new();
                    if self.subscribed {
                        self.subscribed = false;
                        effects.push(Effect::ClearSubscription);
                    }
                    self.status = Disconnected;
                    self.attempts = self.attempts.saturating_add(1);
                    effects
                }
                // A close while faulted does not re-enter the retry loop;
                // recovery from `error` is manual.
                Error => {
                    if self.subscribed {
                        self.subscribed = false;
                        vec![Effect::ClearSubscription]
                    } else {
                        Vec::new()
                    }
                }
                Disconnected => Vec::new(),
            },

            LifecycleEvent::ProtocolError => match self.status {
                Disconnected => Vec::new(),
                _ => {
                    self.status = Error;
                    Vec::new()
                }
            },

            LifecycleEvent::ReconnectRequested => match self.status {
                // A connect attempt is already in flight; re-entering would
                // risk a second subscription.
                Connecting => Vec::new(),
                _ => {
                    let mut effects = Vec::new();
                    if self.subscribed {
                        self.subscribed = false;
                        effects.push(Effect::ClearSubscription);
                    }
                    if self.status == Connected {
                        effects.push(Effect::CloseTransport);
                    }
                    self.status = Connecting;
                    self.attempts = 0;
                    effects.push(Effect::ResolveIdentity);
                    effects
                }
            },
        }
    }
}
