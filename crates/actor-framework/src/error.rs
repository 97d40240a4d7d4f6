//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, as opposed to the domain errors an entity returns
//! from its hooks (those travel inside [`FrameworkError::EntityError`]).

use std::time::Duration;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Subscription dropped, {missed} change events lost")]
    SubscriptionDropped { missed: u64 },
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Transport-level failures: the request may or may not have landed and can be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            FrameworkError::ActorClosed
                | FrameworkError::ActorDropped
                | FrameworkError::Timeout(_)
                | FrameworkError::SubscriptionDropped { .. }
        )
    }
}
