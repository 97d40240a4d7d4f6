//! # Order Actor
//!
//! The order store: one [`ResourceActor`] owning every [`Order`] row and publishing the `orders`
//! change feed.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`error`] - [`OrderError`], the error taxonomy shared by ingestion, status and consoles
//! - [`actions`] - [`OrderAction::SetStatus`] and its [`Transition`] result
//! - [`new()`] - Factory function that creates the actor and client
//!
//! ## Writes
//!
//! | Write | Source | Change event |
//! |-------|--------|--------------|
//! | insert | [`IngestionService`](crate::ingestion::IngestionService) | `Insert` |
//! | `SetStatus` to a new status | [`StatusController`](crate::status::StatusController) | `Update` |
//! | `SetStatus` to the current status | same | none (`StaleWrite`) |
//! | delete of a done order | same | `Delete` |
//!
//! ## Usage
//!
//! ```rust
//! use order_desk::order_actor;
//! use order_desk::clients::OrderClient;
//! use order_desk::model::{LineItem, NewOrder, OrderStatus};
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, generic_client) = order_actor::new(32, 256);
//!     let client = OrderClient::new(generic_client);
//!     tokio::spawn(actor.run(()));
//!
//!     let id = client
//!         .insert(NewOrder {
//!             table_label: "A1".into(),
//!             items: vec![LineItem::new("Phở", 2, Decimal::from(45_000))],
//!             note: None,
//!             total: Decimal::from(90_000),
//!         })
//!         .await?;
//!     client.set_status(id, OrderStatus::Done).await?;
//!     Ok(())
//! }
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::model::{Order, OrderId};
use actor_framework::{ResourceActor, ResourceClient};

/// Creates a new Order actor and its client. Ids are random UUIDs.
pub fn new(
    buffer_size: usize,
    feed_capacity: usize,
) -> (ResourceActor<Order>, ResourceClient<Order>) {
    ResourceActor::new(buffer_size, feed_capacity, OrderId::generate)
}
