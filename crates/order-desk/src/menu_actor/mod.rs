//! # Menu Actor
//!
//! The menu catalog. Ingestion reads it to price and check cart lines; admins switch dishes on
//! and off. Staleness is fine: orders snapshot name and price when they are placed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`MenuItem`]
//! - [`error`] - [`MenuError`] type for type-safe error handling
//! - [`actions`] - [`MenuAction`] and [`MenuActionResult`]
//! - [`new()`] - Factory function that creates the actor and client

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{MenuItem, MenuItemId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Menu actor and its client. Ids count up from `menu_1`.
pub fn new(
    buffer_size: usize,
    feed_capacity: usize,
) -> (ResourceActor<MenuItem>, ResourceClient<MenuItem>) {
    let mut next = 0;
    ResourceActor::new(buffer_size, feed_capacity, move || {
        next += 1;
        MenuItemId(next)
    })
}
