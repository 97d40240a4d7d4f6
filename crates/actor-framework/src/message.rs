//! # Generic Messages
//!
//! The request envelope sent from a [`ResourceClient`](crate::ResourceClient) to its
//! [`ResourceActor`](crate::ResourceActor), plus the one-shot response alias.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// # The CRUD Pattern
/// The variants map onto the lifecycle of a stored row:
///
/// - **Create**: a single atomic insert built from [`ActorEntity::Create`].
/// - **Get**: fetch one row by id.
/// - **List**: fetch every row; this is the reconciliation query change-feed subscribers run
///   after (re)connecting.
/// - **Update**: mutate a row through [`ActorEntity::Update`].
/// - **Delete**: remove a row, subject to the entity's `on_delete` guard.
/// - **Action**: a resource-specific [`ActorEntity::Action`] against one row.
///
/// Requests are keyed by id only; none carries a version or compare token, so concurrent writers
/// to the same row resolve last-write-wins in the order the actor receives them.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
