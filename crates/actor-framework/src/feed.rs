//! # Change Feed
//!
//! Every [`ResourceActor`](crate::ResourceActor) publishes a [`ChangeEvent`] after each committed
//! write. Subscribers get a [`Subscription`]: a pull-based stream of events backed by a bounded
//! `tokio::sync::broadcast` buffer.
//!
//! ## Delivery contract
//!
//! - **At-most-once, best effort.** A subscriber that falls more than the buffer capacity behind
//!   loses the overflow and receives [`FrameworkError::SubscriptionDropped`] instead. Nothing is
//!   replayed.
//! - **Per-row order.** The actor is the single writer, so events for one row arrive in write
//!   order. Nothing stronger is promised across rows.
//! - **Full rows.** Each event carries the complete row snapshot, so consumers overwrite by id
//!   instead of patching fields. Applying an event twice is harmless.
//!
//! Because of the first point, a subscriber must run a full reconciliation query
//! ([`ResourceClient::list`](crate::ResourceClient::list)) after subscribing, and again after
//! every `SubscriptionDropped`.
//!
//! ```rust
//! use actor_framework::{ChangeEvent, Operation};
//!
//! let event = ChangeEvent { operation: Operation::Insert, row: 7u32 };
//! let json = serde_json::to_string(&event).unwrap();
//! assert_eq!(json, r#"{"operation":"insert","row":7}"#);
//! ```

use crate::error::FrameworkError;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::warn;

/// The kind of write that produced a [`ChangeEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Insert,
    Update,
    Delete,
}

/// A row-level change notification. For `Delete` the row is the last value before removal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeEvent<T> {
    pub operation: Operation,
    pub row: T,
}

/// Subscriber-side predicate. Events whose row fails the filter are skipped.
pub type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

/// A live subscription to one resource's change feed.
pub struct Subscription<T> {
    receiver: broadcast::Receiver<ChangeEvent<T>>,
    filter: Option<Filter<T>>,
}

impl<T> fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("pending", &self.receiver.len())
            .field("filtered", &self.filter.is_some())
            .finish()
    }
}

impl<T: Clone + Send + 'static> Subscription<T> {
    pub(crate) fn new(receiver: broadcast::Receiver<ChangeEvent<T>>, filter: Option<Filter<T>>) -> Self {
        Self { receiver, filter }
    }

    fn accepts(&self, event: &ChangeEvent<T>) -> bool {
        match &self.filter {
            Some(filter) => filter(&event.row),
            None => true,
        }
    }

    /// Waits for the next event that passes the filter.
    ///
    /// # Errors
    /// - [`FrameworkError::SubscriptionDropped`] if buffered events were lost. The subscription
    ///   stays usable, but the caller must reconcile before trusting incremental state again.
    /// - [`FrameworkError::ActorClosed`] once the publishing actor has shut down.
    pub async fn recv(&mut self) -> Result<ChangeEvent<T>, FrameworkError> {
        loop {
            match self.receiver.recv().await {
                Ok(event) if self.accepts(&event) => return Ok(event),
                Ok(_) => continue,
                Err(RecvError::Lagged(missed)) => {
                    warn!(missed, "Subscriber lagged");
                    return Err(FrameworkError::SubscriptionDropped { missed });
                }
                Err(RecvError::Closed) => return Err(FrameworkError::ActorClosed),
            }
        }
    }

    /// Non-blocking variant of [`recv`](Self::recv). `Ok(None)` means nothing is buffered.
    pub fn try_recv(&mut self) -> Result<Option<ChangeEvent<T>>, FrameworkError> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) if self.accepts(&event) => return Ok(Some(event)),
                Ok(_) => continue,
                Err(TryRecvError::Empty) => return Ok(None),
                Err(TryRecvError::Lagged(missed)) => {
                    warn!(missed, "Subscriber lagged");
                    return Err(FrameworkError::SubscriptionDropped { missed });
                }
                Err(TryRecvError::Closed) => return Err(FrameworkError::ActorClosed),
            }
        }
    }

    /// Turns the subscription into a `Stream`. The stream ends when the actor shuts down; a
    /// lag surfaces as an `Err` item and the stream keeps going.
    pub fn into_stream(self) -> impl Stream<Item = Result<ChangeEvent<T>, FrameworkError>> + Send {
        futures::stream::unfold(self, |mut sub| async move {
            match sub.recv().await {
                Err(FrameworkError::ActorClosed) => None,
                item => Some((item, sub)),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn event(operation: Operation, row: u32) -> ChangeEvent<u32> {
        ChangeEvent { operation, row }
    }

    #[tokio::test]
    async fn test_filter_skips_rows() {
        let (tx, rx) = broadcast::channel(8);
        let mut sub = Subscription::new(rx, Some(Arc::new(|row: &u32| row % 2 == 0)));

        tx.send(event(Operation::Insert, 1)).unwrap();
        tx.send(event(Operation::Insert, 2)).unwrap();

        let received = sub.recv().await.unwrap();
        assert_eq!(received.row, 2);
        assert_eq!(sub.try_recv().unwrap(), None);
    }

    #[tokio::test]
    async fn test_lag_reports_dropped_then_resumes() {
        let (tx, rx) = broadcast::channel(2);
        let mut sub = Subscription::new(rx, None);

        for row in 0..5 {
            tx.send(event(Operation::Update, row)).unwrap();
        }

        match sub.recv().await {
            Err(FrameworkError::SubscriptionDropped { missed }) => assert_eq!(missed, 3),
            other => panic!("expected SubscriptionDropped, got {:?}", other),
        }
        // The two most recent events are still buffered.
        assert_eq!(sub.recv().await.unwrap().row, 3);
        assert_eq!(sub.recv().await.unwrap().row, 4);
    }

    #[tokio::test]
    async fn test_stream_ends_when_publisher_closes() {
        let (tx, rx) = broadcast::channel(4);
        let sub = Subscription::new(rx, None);
        tx.send(event(Operation::Delete, 9)).unwrap();
        drop(tx);

        let items: Vec<_> = sub.into_stream().collect().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().operation, Operation::Delete);
    }
}
