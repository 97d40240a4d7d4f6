//! Typed wrappers around the generic [`ResourceClient`](actor_framework::ResourceClient).
//!
//! Shared `get`, `list` and `delete` come from [`ActorClient`](actor_framework::ActorClient);
//! each wrapper adds the resource's own writes and maps framework errors into its error type.

pub mod menu_client;
pub mod order_client;

pub use menu_client::MenuClient;
pub use order_client::OrderClient;
