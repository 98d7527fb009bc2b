//! Background task that owns the WebSocket transport.
//!
//! One task per session. It resolves the authenticated user, dials the
//! socket, subscribes to the per-user topic, pumps frames into the shared
//! store, and retries with exponential backoff when the transport drops.
//! All protocol decisions live in [`crate::lifecycle`]; this module only
//! executes the effects.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::watch;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, info, warn};

use catalog_client::{CredentialProvider, NotificationBackend};
use catalog_core::config::realtime::RealtimeConfig;
use catalog_core::types::UserId;

use crate::lifecycle::{ConnectionStatus, Effect, Lifecycle, LifecycleEvent};
use crate::message::types::{ClientFrame, ServerFrame, decode_server_frame};
use crate::session::SessionShared;

type Transport = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Exponential backoff with a capped exponent and a capped delay.
fn backoff_delay(config: &RealtimeConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    let initial = config.reconnect_initial_delay_ms.max(1);
    let delay = initial.saturating_mul(1u64 << exponent);
    Duration::from_millis(delay.min(config.reconnect_max_delay_ms.max(initial)))
}

/// Per-user delivery topic.
fn notification_topic(user_id: UserId) -> String {
    format!("notifications:{user_id}")
}

/// Why an established connection ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectionEnd {
    /// The transport dropped, errored, or went silent; retry automatically.
    Dropped,
    /// The server reported a protocol failure; halt until a manual reconnect.
    Faulted,
    /// A manual reconnect asked for a fresh transport.
    Restart,
    /// The session is tearing down.
    Shutdown,
}

/// Outcome of parking in the halted state.
enum ParkOutcome {
    Reconnect,
    Shutdown,
}

/// The live-subscription driver for one session.
pub(crate) struct SubscriberTask {
    pub(crate) shared: Arc<SessionShared>,
    pub(crate) backend: Arc<dyn NotificationBackend>,
    pub(crate) credentials: Arc<dyn CredentialProvider>,
    pub(crate) config: RealtimeConfig,
    pub(crate) ws_url: String,
}

impl SubscriberTask {
    /// Drive the subscription until shutdown.
    ///
    /// Each loop iteration is one connection attempt: resolve identity,
    /// open the transport, subscribe, then pump frames until the
    /// connection ends. The lifecycle machine decides what each ending
    /// means; faulted attempts park until a manual reconnect arrives.
    pub(crate) async fn run(
        self,
        mut shutdown_rx: watch::Receiver<bool>,
        mut reconnect_rx: watch::Receiver<u64>,
    ) {
        let mut lifecycle = Lifecycle::new();
        info!(url = %self.ws_url, "Live subscriber started");

        loop {
            if *shutdown_rx.borrow() {
                self.apply(&mut lifecycle, LifecycleEvent::ShutdownRequested);
                break;
            }

            if lifecycle.status() == ConnectionStatus::Error {
                info!("Automatic retries stopped; waiting for a manual reconnect");
                match wait_for_manual(&mut shutdown_rx, &mut reconnect_rx).await {
                    ParkOutcome::Reconnect => {
                        self.apply(&mut lifecycle, LifecycleEvent::ReconnectRequested);
                    }
                    ParkOutcome::Shutdown => {
                        self.apply(&mut lifecycle, LifecycleEvent::ShutdownRequested);
                        break;
                    }
                }
                continue;
            }

            let attempt = lifecycle.attempts();
            if attempt > 0 {
                let delay = backoff_delay(&self.config, attempt);
                debug!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Backing off before reconnect attempt"
                );
                tokio::select! {
                    _ = time::sleep(delay) => {}
                    changed = shutdown_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        continue;
                    }
                    changed = reconnect_rx.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        self.apply(&mut lifecycle, LifecycleEvent::ReconnectRequested);
                        continue;
                    }
                }
            }

            self.apply(&mut lifecycle, LifecycleEvent::ConnectRequested);
            if lifecycle.status() != ConnectionStatus::Connecting {
                continue;
            }

            // The per-user topic needs the id, so identity comes first.
            let user = match self.backend.current_user().await {
                Ok(user) => user,
                Err(e) => {
                    warn!(error = %e, "Identity resolution failed; live updates halted");
                    self.apply(&mut lifecycle, LifecycleEvent::IdentityFailed);
                    continue;
                }
            };
            self.apply(&mut lifecycle, LifecycleEvent::IdentityResolved);
            let topic = notification_topic(user.id);

            let mut transport = match self.open_transport().await {
                Ok(transport) => transport,
                Err(e) => {
                    warn!(error = %e, url = %self.ws_url, "WebSocket connect failed");
                    self.apply(&mut lifecycle, LifecycleEvent::TransportClosed);
                    continue;
                }
            };

            let effects = self.apply(&mut lifecycle, LifecycleEvent::TransportOpened);
            if effects.contains(&Effect::SendSubscribe)
                && !self.send_subscribe(&mut transport, &topic).await
            {
                self.apply(&mut lifecycle, LifecycleEvent::TransportClosed);
                continue;
            }

            let end = self
                .drive_connection(
                    &mut transport,
                    &mut lifecycle,
                    &mut shutdown_rx,
                    &mut reconnect_rx,
                )
                .await;
            match end {
                ConnectionEnd::Dropped => {
                    self.apply(&mut lifecycle, LifecycleEvent::TransportClosed);
                }
                ConnectionEnd::Faulted => {
                    // ProtocolError already applied inside the pump.
                    let _ = transport.close(None).await;
                    self.apply(&mut lifecycle, LifecycleEvent::TransportClosed);
                }
                ConnectionEnd::Restart => {
                    let effects = self.apply(&mut lifecycle, LifecycleEvent::ReconnectRequested);
                    let goodbye_topic = effects
                        .contains(&Effect::ClearSubscription)
                        .then_some(topic.as_str());
                    self.send_goodbye(&mut transport, goodbye_topic).await;
                }
                ConnectionEnd::Shutdown => {
                    let effects = self.apply(&mut lifecycle, LifecycleEvent::ShutdownRequested);
                    let goodbye_topic = effects
                        .contains(&Effect::ClearSubscription)
                        .then_some(topic.as_str());
                    self.send_goodbye(&mut transport, goodbye_topic).await;
                    break;
                }
            }
        }

        self.shared.update_status(ConnectionStatus::Disconnected, 0);
        info!("Live subscriber stopped");
    }

    /// Apply one lifecycle event and publish the resulting status.
    fn apply(&self, lifecycle: &mut Lifecycle, event: LifecycleEvent) -> Vec<Effect> {
        let effects = lifecycle.apply(event);
        self.shared
            .update_status(lifecycle.status(), lifecycle.attempts());
        effects
    }

    async fn open_transport(
        &self,
    ) -> Result<Transport, tokio_tungstenite::tungstenite::Error> {
        // Token travels as a query parameter; never log the full URL.
        let url = match self.credentials.bearer_token().await {
            Some(token) => format!("{}?token={token}", self.ws_url),
            None => self.ws_url.clone(),
        };
        let (transport, response) = connect_async(&url).await?;
        debug!(status = %response.status(), "WebSocket handshake complete");
        Ok(transport)
    }

    async fn send_subscribe(&self, transport: &mut Transport, topic: &str) -> bool {
        let frame = ClientFrame::Subscribe {
            topic: topic.to_string(),
        }
        .encode();
        match transport.send(Message::text(frame)).await {
            Ok(()) => {
                debug!(topic = %topic, "Subscribe frame sent");
                true
            }
            Err(e) => {
                warn!(error = %e, "Failed to send subscribe frame");
                false
            }
        }
    }

    /// Best-effort unsubscribe and close on a transport being discarded.
    async fn send_goodbye(&self, transport: &mut Transport, topic: Option<&str>) {
        if let Some(topic) = topic {
            let frame = ClientFrame::Unsubscribe {
                topic: topic.to_string(),
            }
            .encode();
            let _ = transport.send(Message::text(frame)).await;
        }
        let _ = transport.close(None).await;
    }

    /// Pump frames until the connection ends one way or another.
    ///
    /// The liveness window restarts on every inbound message; a silent
    /// socket is indistinguishable from a dead one and gets dropped.
    async fn drive_connection(
        &self,
        transport: &mut Transport,
        lifecycle: &mut Lifecycle,
        shutdown_rx: &mut watch::Receiver<bool>,
        reconnect_rx: &mut watch::Receiver<u64>,
    ) -> ConnectionEnd {
        let liveness = Duration::from_secs(self.config.liveness_timeout_seconds.max(1));
        loop {
            tokio::select! {
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        return ConnectionEnd::Shutdown;
                    }
                }
                changed = reconnect_rx.changed() => {
                    return match changed {
                        Ok(()) => ConnectionEnd::Restart,
                        Err(_) => ConnectionEnd::Shutdown,
                    };
                }
                next = time::timeout(liveness, transport.next()) => match next {
                    Err(_) => {
                        warn!(
                            timeout_s = self.config.liveness_timeout_seconds,
                            "No traffic within the liveness window; dropping transport"
                        );
                        return ConnectionEnd::Dropped;
                    }
                    Ok(None) => {
                        debug!("Server closed the connection");
                        return ConnectionEnd::Dropped;
                    }
                    Ok(Some(Err(e))) => {
                        warn!(error = %e, "Transport error");
                        return ConnectionEnd::Dropped;
                    }
                    Ok(Some(Ok(message))) => {
                        if let Some(end) = self.handle_message(transport, lifecycle, message).await {
                            return end;
                        }
                    }
                },
            }
        }
    }

    async fn handle_message(
        &self,
        transport: &mut Transport,
        lifecycle: &mut Lifecycle,
        message: Message,
    ) -> Option<ConnectionEnd> {
        match message {
            Message::Text(raw) => self.handle_frame(transport, lifecycle, raw.as_str()).await,
            Message::Ping(payload) => {
                if transport.send(Message::Pong(payload)).await.is_err() {
                    return Some(ConnectionEnd::Dropped);
                }
                None
            }
            Message::Close(_) => {
                debug!("Close frame received");
                Some(ConnectionEnd::Dropped)
            }
            Message::Pong(_) | Message::Binary(_) | Message::Frame(_) => None,
        }
    }

    async fn handle_frame(
        &self,
        transport: &mut Transport,
        lifecycle: &mut Lifecycle,
        raw: &str,
    ) -> Option<ConnectionEnd> {
        let frame = match decode_server_frame(raw) {
            Ok(frame) => frame,
            Err(e) => {
                // Unknown frames are skipped; the stream stays up.
                debug!(error = %e, "Discarding undecodable frame");
                return None;
            }
        };

        match frame {
            ServerFrame::Subscribed { topic } => {
                info!(topic = %topic, "Subscription acknowledged");
                let effects = self.apply(lifecycle, LifecycleEvent::SubscribeAcked);
                if effects.contains(&Effect::RefreshSnapshot) {
                    self.refresh_snapshot().await;
                }
                None
            }
            ServerFrame::Notification { notification } => {
                let id = notification.id;
                if self.shared.merge_live(notification) {
                    debug!(notification_id = %id, "Live notification merged");
                } else {
                    debug!(notification_id = %id, "Duplicate notification dropped");
                }
                None
            }
            ServerFrame::Ping { timestamp } => {
                let pong = ClientFrame::Pong { timestamp }.encode();
                if transport.send(Message::text(pong)).await.is_err() {
                    return Some(ConnectionEnd::Dropped);
                }
                None
            }
            ServerFrame::Error { code, message } => {
                warn!(code = %code, message = %message, "Server reported a subscription failure");
                self.apply(lifecycle, LifecycleEvent::ProtocolError);
                Some(ConnectionEnd::Faulted)
            }
        }
    }

    /// One-time post-connect snapshot refresh, covering the gap between
    /// the initial load and the subscription becoming active.
    async fn refresh_snapshot(&self) {
        match self.backend.fetch_all().await {
            Ok(notifications) => {
                debug!(count = notifications.len(), "Post-connect snapshot loaded");
                self.shared.replace_snapshot(notifications);
            }
            Err(e) => {
                warn!(error = %e, "Post-connect snapshot refresh failed");
            }
        }
    }
}

/// Park until the consumer asks for a reconnect or the session shuts down.
async fn wait_for_manual(
    shutdown_rx: &mut watch::Receiver<bool>,
    reconnect_rx: &mut watch::Receiver<u64>,
) -> ParkOutcome {
    loop {
        tokio::select! {
            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    return ParkOutcome::Shutdown;
                }
            }
            changed = reconnect_rx.changed() => {
                return match changed {
                    Ok(()) => ParkOutcome::Reconnect,
                    Err(_) => ParkOutcome::Shutdown,
                };
            }
        }
    }
}
