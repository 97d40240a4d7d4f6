//! Domain data: orders, menu items and the customer cart.

pub mod cart;
pub mod menu;
pub mod order;

pub use cart::Cart;
pub use menu::*;
pub use order::*;

/// Table label shown for orders placed without a table.
pub const TAKEAWAY: &str = "Takeaway";

/// Normalizes an optional table label; a missing or blank label means takeaway.
pub fn table_label_or_takeaway(label: Option<&str>) -> String {
    match label.map(str::trim) {
        Some(label) if !label.is_empty() => label.to_string(),
        _ => TAKEAWAY.to_string(),
    }
}
