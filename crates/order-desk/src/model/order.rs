//! Customer orders: the central row of the order store.
//!
//! # Actor Framework
//! [`Order`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait (see
//! [`order_actor`](crate::order_actor)), allowing it to be managed by a
//! [`ResourceActor`](actor_framework::ResourceActor).
//!
//! Everything except `status` is fixed when the row is created. Corrections are new orders.

use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;

/// Highest spice level a kitchen will cook.
pub const MAX_SPICE_LEVEL: u8 = 7;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    /// A fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Done,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Pending => write!(f, "pending"),
            OrderStatus::Done => write!(f, "done"),
        }
    }
}

/// One line of an order. Name and price are snapshots taken at ordering time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<u8>,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            spice_level: None,
        }
    }

    pub fn with_spice(mut self, level: u8) -> Self {
        self.spice_level = Some(level);
        self
    }

    /// `quantity * unit_price`, or `None` when it does not fit a `Decimal`.
    pub fn amount(&self) -> Option<Decimal> {
        self.unit_price.checked_mul(Decimal::from(self.quantity))
    }

    /// Per-line rules shared by ingestion and the store.
    fn check(&self, index: usize) -> Result<(), OrderError> {
        if self.name.trim().is_empty() {
            return Err(invalid(format!("item {index} has no name")));
        }
        if self.quantity == 0 {
            return Err(invalid(format!("{}: quantity must be positive", self.name)));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(invalid(format!(
                "{}: unit price must not be negative",
                self.name
            )));
        }
        if matches!(self.spice_level, Some(level) if level > MAX_SPICE_LEVEL) {
            return Err(invalid(format!(
                "{}: spice level must be between 0 and {MAX_SPICE_LEVEL}",
                self.name
            )));
        }
        Ok(())
    }
}

fn invalid(reason: impl Into<String>) -> OrderError {
    OrderError::InvalidOrder(reason.into())
}

/// Sum of line amounts. The only way an order total is ever computed.
///
/// # Errors
/// `InvalidOrder` when a line amount or the sum overflows.
pub fn items_total(items: &[LineItem]) -> Result<Decimal, OrderError> {
    items
        .iter()
        .try_fold(Decimal::ZERO, |total, item| {
            item.amount().and_then(|amount| total.checked_add(amount))
        })
        .ok_or_else(|| invalid("total overflows"))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub table_label: String,
    pub items: Vec<LineItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::Pending
    }

    pub fn is_done(&self) -> bool {
        self.status == OrderStatus::Done
    }

    /// Recomputes the total from the stored lines.
    pub fn items_total(&self) -> Result<Decimal, OrderError> {
        items_total(&self.items)
    }
}

/// Store payload for a single atomic insert. Built by ingestion after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub table_label: String,
    pub items: Vec<LineItem>,
    pub note: Option<String>,
    pub total: Decimal,
}

impl NewOrder {
    /// Checks the table label and every line, without looking at `total`.
    pub fn check_lines(&self) -> Result<(), OrderError> {
        if self.table_label.trim().is_empty() {
            return Err(invalid("table label must not be empty"));
        }
        if self.items.is_empty() {
            return Err(invalid("order must contain at least one item"));
        }
        self.items
            .iter()
            .enumerate()
            .try_for_each(|(index, item)| item.check(index))
    }

    /// Every rule a stored order satisfies, including `total == Σ quantity × unit_price`.
    ///
    /// # Errors
    /// `InvalidOrder` naming the first rule the payload breaks.
    pub fn check(&self) -> Result<(), OrderError> {
        self.check_lines()?;
        let expected = items_total(&self.items)?;
        if self.total != expected {
            return Err(invalid(format!(
                "total {} does not match line items ({})",
                self.total, expected
            )));
        }
        Ok(())
    }
}

/// Order rows have no editable fields; `status` changes go through
/// [`OrderAction`](crate::order_actor::OrderAction).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderUpdate {}

/// Line items arrive on the wire in the same shape they are stored.
pub type LineItemRequest = LineItem;

/// Order creation call, as submitted by an ordering client.
///
/// There is deliberately no `total` field: the server computes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub table_label: String,
    pub items: Vec<LineItemRequest>,
    #[serde(default)]
    pub note: Option<String>,
}

/// Successful creation: the generated id and the server-computed total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderPlaced {
    pub id: OrderId,
    pub total: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_total_sums_quantity_times_price() {
        let items = vec![
            LineItem::new("Phở", 2, Decimal::from(45_000)),
            LineItem::new("Trà đá", 3, Decimal::new(2_500, 0)),
            LineItem::new("Mì cay", 1, Decimal::new(3_950_050, 2)).with_spice(4),
        ];
        assert_eq!(items_total(&items), Ok(Decimal::new(13_750_050, 2)));
        assert_eq!(items_total(&[]), Ok(Decimal::ZERO));
    }

    #[test]
    fn test_items_total_reports_overflow() {
        let gold = LineItem::new("Gold", 2, Decimal::MAX);
        assert_eq!(gold.amount(), None);
        assert!(matches!(
            items_total(&[gold]),
            Err(OrderError::InvalidOrder(msg)) if msg == "total overflows"
        ));

        let halves = vec![
            LineItem::new("Gold", 1, Decimal::MAX),
            LineItem::new("Silver", 1, Decimal::ONE),
        ];
        assert!(items_total(&halves).is_err());
    }

    #[test]
    fn test_order_request_wire_shape() {
        let json = r#"{
            "table_label": "A1",
            "items": [{"name": "Phở", "quantity": 2, "unit_price": "45000"}]
        }"#;
        let request: OrderRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.table_label, "A1");
        assert_eq!(request.items[0].spice_level, None);
        assert_eq!(request.note, None);
        assert_eq!(request.items[0].amount(), Some(Decimal::from(90_000)));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&OrderStatus::Done).unwrap(), r#""done""#);
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
    }
}
