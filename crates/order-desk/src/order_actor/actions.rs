//! Custom actions for the order store.
//!
//! Orders have exactly one mutable field, so the only action is a targeted status write.
//! It is handled by [`ActorEntity::handle_action`](actor_framework::ActorEntity::handle_action)
//! in [`entity`](super::entity).

use crate::model::OrderStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderAction {
    /// Unconditional set of `status`. Keyed by id only, so racing writers resolve
    /// last-write-wins.
    SetStatus(OrderStatus),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderActionResult {
    SetStatus(Transition),
}

/// Outcome of a status write. Both are successes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The row moved to the target status and a change event went out.
    Applied,
    /// The row already held the target (or, for purges, was already gone). Nothing changed.
    StaleWrite,
}
