//! The per-console event loop: one subscription, one projection, one task.
//!
//! ```text
//! connect:  subscribe ──> list (reconcile) ──> apply buffered + live events
//!                 ^                                   │
//!                 └──── SubscriptionDropped ──────────┘
//! ```
//!
//! Subscribing before the reconciliation query means no write can fall between the two: anything
//! committed after the snapshot is already buffered on the subscription, and anything before it
//! is in the snapshot. Replaying a buffered event the snapshot already contains is harmless.

use super::{OrderProjection, Signal, ViewKind};
use crate::clients::OrderClient;
use crate::model::Order;
use crate::order_actor::OrderError;
use crate::report::Window;
use actor_framework::{FrameworkError, Subscription};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

/// Pause before reconnecting after the store failed to answer.
const RECONNECT_DELAY: Duration = Duration::from_millis(100);

pub struct Console {
    orders: OrderClient,
    projection: OrderProjection,
    subscription: Option<Subscription<Order>>,
}

impl Console {
    /// A disconnected console. Call [`connect`](Self::connect) or [`run`](Self::run).
    pub fn new(orders: OrderClient, kind: ViewKind) -> Self {
        Self {
            orders,
            projection: OrderProjection::new(kind),
            subscription: None,
        }
    }

    pub fn projection(&self) -> &OrderProjection {
        &self.projection
    }

    pub fn set_window(&mut self, window: Window) {
        self.projection.set_window(window);
    }

    pub fn is_connected(&self) -> bool {
        self.subscription.is_some()
    }

    /// Subscribes, then reconciles against a full snapshot.
    ///
    /// On failure the console stays disconnected and the projection keeps its last state.
    #[instrument(skip(self), fields(view = %self.projection.kind()))]
    pub async fn connect(&mut self) -> Result<(), OrderError> {
        let subscription = self.orders.subscribe(self.projection.filter());
        let snapshot = self.orders.snapshot().await?;
        self.projection.reconcile(snapshot);
        self.subscription = Some(subscription);
        info!(
            rows = self.projection.len(),
            pending = self.projection.pending_count(),
            "Console reconciled"
        );
        Ok(())
    }

    /// Drops the subscription. The projection stays as it was until the next `connect`.
    pub fn disconnect(&mut self) {
        if self.subscription.take().is_some() {
            debug!(view = %self.projection.kind(), "Console disconnected");
        }
    }

    /// Waits for one change event and applies it.
    ///
    /// Connects first when disconnected. A lagged subscription is replaced by a fresh
    /// subscribe-and-reconcile before this returns, so the caller never sees a stale projection.
    pub async fn next_signal(&mut self) -> Result<Option<Signal>, OrderError> {
        let Some(subscription) = self.subscription.as_mut() else {
            self.connect().await?;
            return Ok(None);
        };

        match subscription.recv().await {
            Ok(event) => Ok(self.projection.apply(event)),
            Err(FrameworkError::SubscriptionDropped { missed }) => {
                warn!(view = %self.projection.kind(), missed, "Change feed dropped, reconciling");
                self.subscription = None;
                self.connect().await?;
                Ok(None)
            }
            Err(e) => {
                self.subscription = None;
                Err(OrderError::from(e))
            }
        }
    }

    /// Applies everything already buffered without waiting. Returns the signals raised.
    pub async fn catch_up(&mut self) -> Result<Vec<Signal>, OrderError> {
        let mut signals = Vec::new();
        if self.subscription.is_none() {
            self.connect().await?;
        }
        while let Some(subscription) = self.subscription.as_mut() {
            match subscription.try_recv() {
                Ok(Some(event)) => signals.extend(self.projection.apply(event)),
                Ok(None) => break,
                Err(FrameworkError::SubscriptionDropped { missed }) => {
                    warn!(view = %self.projection.kind(), missed, "Change feed dropped, reconciling");
                    self.subscription = None;
                    self.connect().await?;
                }
                Err(e) => {
                    self.subscription = None;
                    return Err(OrderError::from(e));
                }
            }
        }
        Ok(signals)
    }

    /// Drives the console until `shutdown` fires or nobody listens for signals any more.
    ///
    /// Store outages are not fatal: the loop waits briefly and reconnects.
    #[instrument(skip_all, fields(view = %self.projection.kind()))]
    pub async fn run(
        mut self,
        signals: mpsc::Sender<Signal>,
        mut shutdown: oneshot::Receiver<()>,
    ) -> OrderProjection {
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                result = self.next_signal() => match result {
                    Ok(Some(signal)) => {
                        if signals.send(signal).await.is_err() {
                            debug!("Signal receiver gone");
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!(error = %e, "Console lost the store, retrying");
                        tokio::select! {
                            _ = &mut shutdown => break,
                            _ = tokio::time::sleep(RECONNECT_DELAY) => {}
                        }
                    }
                },
            }
        }
        self.disconnect();
        info!("Console stopped");
        self.projection
    }
}
