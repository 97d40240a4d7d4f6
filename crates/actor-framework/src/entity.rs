//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract every resource (orders, menu items, …) implements to be
//! managed by the generic [`ResourceActor`](crate::ResourceActor). It names the associated types
//! for IDs, payloads, actions, context and errors, and provides the lifecycle hooks
//! (`on_create`, `on_update`, `on_delete`, `handle_action`) the actor calls while it owns a row.
//!
//! # Architecture Note
//! The actor loop is written *once* against this trait. A resource only describes how a row is
//! built, how it may change and what it refuses; storage, sequencing and change publication are
//! the actor's job.
//!
//! Associated types keep the API honest: an order store accepts a `NewOrder` payload and you
//! cannot hand it a menu payload by mistake.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! Both default to `Ok(())`. Override them to validate or to refuse a write.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by `ResourceActor`.
///
/// # Equality
/// Entities are `PartialEq` so the actor can tell an effective write from a no-op. A request that
/// leaves a row equal to its previous value is acknowledged but publishes no change event.
///
/// # Async & Context
/// Hooks are `async` so they may call other actors. `Context` is injected into every hook at
/// `run()` time ("late binding"), which keeps construction free of dependency cycles.
#[async_trait]
pub trait ActorEntity: Clone + PartialEq + Send + Sync + 'static {
    /// The unique identifier for this entity. Generated by the actor's id function.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Resource-specific operations beyond CRUD.
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per resource, shared by every hook. Clients downcast
    /// [`FrameworkError::EntityError`](crate::FrameworkError::EntityError) back to it.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the generated id and the payload.
    /// Called synchronously before `on_create`; nothing is stored if it fails.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the row is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called before the row is removed. Returning an error keeps the row.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
