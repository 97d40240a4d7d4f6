//! # Observability & Tracing
//!
//! [`setup_tracing`] initializes structured logging for the whole desk.
//!
//! ## Configuration
//!
//! Compact format without module paths (`with_target(false)`); actors log an `entity_type`
//! field instead. Levels come from `RUST_LOG`.
//!
//! ## What Gets Traced
//!
//! - **Actor lifecycle**: `Actor started`, `Shutdown` with the final row count
//! - **Committed writes**: `Created`, `Action ok`, `Deleted` at `info`, each followed by a
//!   `Published` line at `debug` with the number of feed receivers
//! - **Rejected requests**: validation failures and refused purges at `warn`
//! - **Consoles**: `Console reconciled` with row and pending counts, and a `warn` whenever a
//!   subscription drops and the console reconciles again
//!
//! ## Usage Examples
//!
//! ```bash
//! RUST_LOG=info cargo run -p order-desk
//! RUST_LOG=debug cargo run -p order-desk          # request payloads
//! RUST_LOG=order_desk=debug,actor_framework=info cargo run -p order-desk
//! ```
//!
//! ## Workflow Trace Example
//!
//! ```text
//! INFO place_order:submit: Created entity_type="Order" id=order_5b0f… size=1
//! INFO place_order:submit: Order placed id=order_5b0f… total=90000
//! INFO kitchen: New order id=order_5b0f… table="A1"
//! INFO complete:set_status: Action ok entity_type="Order" id=order_5b0f…
//! INFO complete:set_status: Status changed id=order_5b0f… target=done
//! ```

/// Installs the global subscriber. Call once, at the top of `main`.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
