//! # Ingestion Service
//!
//! The only writer of new orders. A request is validated, its total computed here from the line
//! items, and the full row written in one insert. Nothing is written when validation fails.
//!
//! Submissions are never retried from here: there is no idempotency key, so a retried insert
//! can produce a duplicate order. A caller that retries after `StoreUnavailable` accepts that.

use crate::clients::{MenuClient, OrderClient};
use crate::menu_actor::MenuError;
use crate::model::{
    items_total, Cart, LineItem, NewOrder, OrderPlaced, OrderRequest,
};
use crate::order_actor::OrderError;
use rust_decimal::Decimal;
use tracing::{debug, info, instrument, warn};

/// Validates an order request and builds the store payload with the server-side total.
///
/// # Errors
/// `InvalidOrder` naming the first rule the request breaks.
pub fn validate(request: OrderRequest) -> Result<NewOrder, OrderError> {
    let note = request
        .note
        .map(|note| note.trim().to_string())
        .filter(|note| !note.is_empty());
    let mut order = NewOrder {
        table_label: request.table_label.trim().to_string(),
        items: request.items,
        note,
        total: Decimal::ZERO,
    };
    order.check_lines()?;
    order.total = items_total(&order.items)?;
    Ok(order)
}

fn invalid(reason: impl Into<String>) -> OrderError {
    OrderError::InvalidOrder(reason.into())
}

fn menu_error(e: MenuError) -> OrderError {
    match e {
        MenuError::ActorCommunicationError(reason) => OrderError::StoreUnavailable(reason),
        other => OrderError::InvalidOrder(other.to_string()),
    }
}

#[derive(Clone)]
pub struct IngestionService {
    orders: OrderClient,
    menu: MenuClient,
}

impl IngestionService {
    pub fn new(orders: OrderClient, menu: MenuClient) -> Self {
        Self { orders, menu }
    }

    /// Places an order. Returns the generated id and the computed total.
    #[instrument(skip(self, request), fields(table = %request.table_label))]
    pub async fn submit(&self, request: OrderRequest) -> Result<OrderPlaced, OrderError> {
        let order = match validate(request) {
            Ok(order) => order,
            Err(e) => {
                warn!(error = %e, "Rejected order");
                return Err(e);
            }
        };
        let total = order.total;
        let id = self.orders.insert(order).await?;
        info!(%id, %total, "Order placed");
        Ok(OrderPlaced { id, total })
    }

    /// Places the contents of a cart, priced from the current menu.
    ///
    /// Each line must exist and be available. A spice level is only accepted for
    /// spice-adjustable dishes. Names and prices are copied into the order as they are now.
    #[instrument(skip(self, cart, note), fields(portions = cart.len()))]
    pub async fn submit_cart(
        &self,
        table_label: &str,
        cart: &Cart,
        note: Option<String>,
    ) -> Result<OrderPlaced, OrderError> {
        if cart.is_empty() {
            return Err(invalid("cart is empty"));
        }

        let mut items = Vec::new();
        for (item_id, quantity) in cart.entries() {
            let item = self.menu.quote(item_id).await.map_err(menu_error)?;
            let spice_level = cart.spice_level(item_id);
            if spice_level.is_some() && !item.spice_adjustable {
                return Err(invalid(format!("{} does not take a spice level", item.name)));
            }
            debug!(%item_id, quantity, price = %item.price, "Priced cart line");
            items.push(LineItem {
                name: item.name,
                quantity,
                unit_price: item.price,
                spice_level,
            });
        }

        self.submit(OrderRequest {
            table_label: table_label.to_string(),
            items,
            note,
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(items: Vec<LineItem>) -> OrderRequest {
        OrderRequest {
            table_label: " A1 ".into(),
            items,
            note: Some("   ".into()),
        }
    }

    #[test]
    fn test_validate_computes_total_and_normalizes() {
        let order = validate(request(vec![
            LineItem::new("Phở", 2, Decimal::from(45_000)),
            LineItem::new("Trà đá", 1, Decimal::ZERO),
        ]))
        .unwrap();

        assert_eq!(order.total, Decimal::from(90_000));
        assert_eq!(order.table_label, "A1");
        assert_eq!(order.note, None);
    }

    #[test]
    fn test_validate_rejects_bad_lines() {
        let cases = vec![
            vec![],
            vec![LineItem::new("Phở", 0, Decimal::from(45_000))],
            vec![LineItem::new("Phở", 1, Decimal::from(-1))],
            vec![LineItem::new("  ", 1, Decimal::ONE)],
            vec![LineItem::new("Mì cay", 1, Decimal::ONE).with_spice(8)],
        ];
        for items in cases {
            assert!(
                matches!(validate(request(items.clone())), Err(OrderError::InvalidOrder(_))),
                "accepted {:?}",
                items
            );
        }
    }

    #[test]
    fn test_validate_rejects_overflowing_total() {
        let result = validate(request(vec![LineItem::new("Gold", 2, Decimal::MAX)]));
        assert_eq!(result, Err(OrderError::InvalidOrder("total overflows".into())));
    }

    #[test]
    fn test_validate_rejects_blank_table() {
        let mut req = request(vec![LineItem::new("Phở", 1, Decimal::ONE)]);
        req.table_label = "  ".into();
        assert!(matches!(validate(req), Err(OrderError::InvalidOrder(_))));
    }
}
