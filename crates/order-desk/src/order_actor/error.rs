//! Error types for the order store and everything built on it.

use crate::model::OrderId;
use actor_framework::FrameworkError;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Malformed or empty input. The caller must fix the request; never retried.
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    /// The store did not answer (closed, dropped or timed out). Safe to retry with backoff,
    /// but the write may still have landed.
    #[error("Order store unavailable: {0}")]
    StoreUnavailable(String),

    /// A change feed subscriber fell behind. Reconcile before trusting the projection again.
    #[error("Subscription dropped, {missed} change events lost")]
    SubscriptionDropped { missed: u64 },

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// Pending orders must be completed before they can be purged.
    #[error("Order {0} is still pending and cannot be purged")]
    PurgeRejected(OrderId),
}

impl OrderError {
    /// Whether a caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            OrderError::StoreUnavailable(_) | OrderError::SubscriptionDropped { .. }
        )
    }
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::StoreUnavailable(msg)
    }
}

impl From<FrameworkError> for OrderError {
    fn from(e: FrameworkError) -> Self {
        match e {
            FrameworkError::ActorClosed
            | FrameworkError::ActorDropped
            | FrameworkError::Timeout(_) => OrderError::StoreUnavailable(e.to_string()),
            FrameworkError::NotFound(id) => OrderError::NotFound(id),
            FrameworkError::SubscriptionDropped { missed } => {
                OrderError::SubscriptionDropped { missed }
            }
            FrameworkError::EntityError(inner) => match inner.downcast::<OrderError>() {
                Ok(domain) => *domain,
                Err(other) => OrderError::InvalidOrder(other.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_framework_errors_map_to_domain() {
        let timeout = OrderError::from(FrameworkError::Timeout(Duration::from_millis(5)));
        assert!(matches!(timeout, OrderError::StoreUnavailable(_)));
        assert!(timeout.is_retryable());

        let id = OrderId::generate();
        let rejected = OrderError::from(FrameworkError::EntityError(Box::new(
            OrderError::PurgeRejected(id),
        )));
        assert_eq!(rejected, OrderError::PurgeRejected(id));
        assert!(!rejected.is_retryable());

        let missing = OrderError::from(FrameworkError::NotFound("order_x".into()));
        assert_eq!(missing, OrderError::NotFound("order_x".into()));
    }
}
