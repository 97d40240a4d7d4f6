//! One-way receipt export for completed orders.
//!
//! The printer side renders this however it likes; the payment QR image is only referenced by
//! URL, never generated here.

use crate::model::{Order, OrderId};
use crate::order_actor::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spice_level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Receipt {
    pub order_id: OrderId,
    pub table_label: String,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<ReceiptLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    pub total: Decimal,
    pub payment_reference: String,
    pub payment_qr_url: String,
}

impl Receipt {
    /// Builds the export for a done order.
    ///
    /// # Errors
    /// `InvalidOrder` if the order is still pending.
    pub fn for_order(
        order: &Order,
        payment_reference: impl Into<String>,
        payment_qr_url: impl Into<String>,
    ) -> Result<Self, OrderError> {
        if !order.is_done() {
            return Err(OrderError::InvalidOrder(format!(
                "{} is still pending, only done orders get a receipt",
                order.id
            )));
        }

        Ok(Self {
            order_id: order.id,
            table_label: order.table_label.clone(),
            created_at: order.created_at,
            lines: order
                .items
                .iter()
                .map(|item| {
                    let amount = item.amount().ok_or_else(|| {
                        OrderError::InvalidOrder(format!("{}: amount overflows", item.name))
                    })?;
                    Ok(ReceiptLine {
                        name: item.name.clone(),
                        quantity: item.quantity,
                        unit_price: item.unit_price,
                        amount,
                        spice_level: item.spice_level,
                    })
                })
                .collect::<Result<_, OrderError>>()?,
            note: order.note.clone(),
            total: order.total,
            payment_reference: payment_reference.into(),
            payment_qr_url: payment_qr_url.into(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
