//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the order desk.
//!
//! ## The OrderSystem Pattern
//!
//! [`OrderSystem`] owns the two store actors and the services built on their clients:
//!
//! ```rust,ignore
//! impl OrderSystem {
//!     pub fn new(config: &DeskConfig) -> Self {
//!         // 1. Create actors (no dependencies yet)
//!         let (menu_actor, menu_client) = menu_actor::new(config.store_buffer, config.feed_capacity);
//!         let (order_actor, order_client) = order_actor::new(config.store_buffer, config.feed_capacity);
//!
//!         // 2. Start actors
//!         let menu_handle = tokio::spawn(menu_actor.run(()));
//!         let order_handle = tokio::spawn(order_actor.run(()));
//!
//!         // 3. Wire services to the clients
//!         // ...
//!     }
//! }
//! ```
//!
//! ## Who Talks to Whom
//!
//! ```text
//! ordering client ──> IngestionService ──> MenuClient (quote)
//!                                      └─> OrderClient (insert) ──> order actor
//! operator ─────────> StatusController ──> OrderClient (set status / delete)
//! order actor ──(orders change feed)──> Console (kitchen | admin | customer)
//! ```
//!
//! Services never share mutable state. Every write goes through the order actor and every
//! console learns about it from the feed.
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of the request channels
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Actors log their final state** and exit
//! 4. **Await completion** - [`OrderSystem::shutdown`] joins the actor tasks
//!
//! Consoles hold a client clone of their own, so stop them before shutting the system down.
//!
//! ## Observability & Tracing
//!
//! See the [`tracing`](self::tracing) module and [`setup_tracing`].

pub mod order_system;
pub mod tracing;

pub use self::order_system::*;
pub use self::tracing::*;
