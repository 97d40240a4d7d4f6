//! # Order Desk
//!
//! Live order state for a restaurant: tables place orders, the kitchen completes them, admins
//! reopen, purge and report on them, and every console sees the same converged view.
//!
//! - [`model`]: orders, menu items and the customer cart
//! - [`order_actor`] / [`menu_actor`]: the stores, built on [`actor_framework::ResourceActor`]
//! - [`clients`]: typed wrappers around the store clients
//! - [`ingestion`]: validation and the single atomic insert of a new order
//! - [`status`]: the `pending ⇄ done → deleted` state machine, with retries
//! - [`projection`]: per-console projections fed by the `orders` change feed
//! - [`report`]: the pure revenue aggregation
//! - [`receipt`]: export for the receipt printer
//! - [`config`] and [`lifecycle`]: runtime settings, startup, shutdown, tracing

pub mod clients;
pub mod config;
pub mod ingestion;
pub mod lifecycle;
pub mod menu_actor;
pub mod model;
pub mod order_actor;
pub mod projection;
pub mod receipt;
pub mod report;
pub mod retry;
pub mod status;
