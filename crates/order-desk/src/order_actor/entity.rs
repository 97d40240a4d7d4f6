//! Entity trait implementation for the Order domain type.
//!
//! Creation is the only place line items and totals are written, so the total invariant is
//! checked here once and never again. After that the row only changes through
//! [`OrderAction::SetStatus`].

use super::actions::{OrderAction, OrderActionResult, Transition};
use super::error::OrderError;
use crate::model::{NewOrder, Order, OrderId, OrderStatus, OrderUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = NewOrder;
    type Update = OrderUpdate;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = ();
    type Error = OrderError;

    /// Builds a pending order stamped with the store's clock.
    ///
    /// # Errors
    /// `InvalidOrder` for any payload that breaks [`NewOrder::check`]: blank table, no items, a
    /// bad line, or a `total` that is not the sum of the line amounts.
    fn from_create_params(id: OrderId, params: NewOrder) -> Result<Self, Self::Error> {
        params.check()?;

        Ok(Self {
            id,
            table_label: params.table_label,
            items: params.items,
            note: params.note,
            total: params.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        })
    }

    async fn on_update(&mut self, update: OrderUpdate, _ctx: &()) -> Result<(), Self::Error> {
        match update {}
    }

    /// Only resolved orders may be removed.
    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        match self.status {
            OrderStatus::Done => Ok(()),
            OrderStatus::Pending => Err(OrderError::PurgeRejected(self.id)),
        }
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &(),
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::SetStatus(target) if self.status == target => {
                Ok(OrderActionResult::SetStatus(Transition::StaleWrite))
            }
            OrderAction::SetStatus(target) => {
                self.status = target;
                Ok(OrderActionResult::SetStatus(Transition::Applied))
            }
        }
    }
}
