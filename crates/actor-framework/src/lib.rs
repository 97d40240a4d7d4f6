//! # Actor Framework
//!
//! Building blocks for single-writer resource stores with a live change feed, on top of Tokio.
//! It pairs a **Resource-Oriented** API (create, get, list, update, delete, plus custom actions)
//! with the **Actor Model** (one task owns the rows, everyone else sends messages).
//!
//! ## Why a resource actor?
//!
//! - **Atomic writes without locks**: the actor applies one request at a time, so a row is
//!   either fully written or not written at all, and racing writers resolve last-write-wins.
//! - **A change feed for free**: the actor is the only writer, so it is the one place that
//!   knows exactly when a row changed. It publishes a [`ChangeEvent`] after every commit.
//! - **Uniform API**: every resource gets the same client surface and the same tracing.
//!
//! **Further Reading**:
//! - [Actors with Tokio](https://ryhl.io/blog/actors-with-tokio/) - the pattern this crate follows
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain rules: how a row is built, changed and guarded
//! 2. **Runtime Layer** ([`ResourceActor`]) - request processing, storage, change publication
//! 3. **Interface Layer** ([`ResourceClient`], [`Subscription`]) - typed requests with deadlines,
//!    and pull-based feed consumption
//!
//! ## Feed Semantics
//!
//! Delivery is best effort and at most once. A subscriber that lags past the buffer receives
//! [`FrameworkError::SubscriptionDropped`] and must re-run [`ResourceClient::list`] before it
//! trusts its local copy again. See the [`feed`] module.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from a queue of expectations and can inject change
//! events, so client-side logic is testable without spawning actors.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod feed;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use feed::{ChangeEvent, Filter, Operation, Subscription};
pub use message::{ResourceRequest, Response};
