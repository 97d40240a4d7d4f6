//! # Status Controller
//!
//! Applies the order state machine against the store:
//!
//! ```text
//!            complete
//!   pending ---------> done ---purge---> (deleted)
//!           <---------
//!             reopen
//! ```
//!
//! Every transition is one targeted write keyed by id, with no read first and no compare token.
//! Two consoles completing the same order both succeed; the second sees
//! [`Transition::StaleWrite`]. Purging a pending order is refused by the store itself
//! ([`OrderError::PurgeRejected`]), whoever the caller is.
//!
//! Transport failures are retried with the configured [`RetryPolicy`] before they surface.

use crate::clients::OrderClient;
use crate::model::{OrderId, OrderStatus};
use crate::order_actor::{OrderError, Transition};
use crate::retry::RetryPolicy;
use actor_framework::ActorClient;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// A status transition call as it arrives on the wire:
/// `{"id": ..., "target_status": "done"}` or `{"id": ..., "purge": true}`.
///
/// A payload carrying both `target_status` and `purge` matches neither shape and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged, deny_unknown_fields)]
pub enum StatusCommand {
    SetStatus {
        id: OrderId,
        target_status: OrderStatus,
    },
    Purge {
        id: OrderId,
        purge: bool,
    },
}

impl StatusCommand {
    pub fn id(&self) -> OrderId {
        match self {
            StatusCommand::SetStatus { id, .. } | StatusCommand::Purge { id, .. } => *id,
        }
    }
}

#[derive(Clone)]
pub struct StatusController {
    orders: OrderClient,
    retry: RetryPolicy,
}

impl StatusController {
    pub fn new(orders: OrderClient, retry: RetryPolicy) -> Self {
        Self { orders, retry }
    }

    /// `pending -> done`. The order starts counting towards revenue.
    pub async fn complete(&self, id: OrderId) -> Result<Transition, OrderError> {
        self.set_status(id, OrderStatus::Done).await
    }

    /// `done -> pending`. The order drops out of revenue again.
    pub async fn reopen(&self, id: OrderId) -> Result<Transition, OrderError> {
        self.set_status(id, OrderStatus::Pending).await
    }

    #[instrument(skip(self))]
    async fn set_status(&self, id: OrderId, target: OrderStatus) -> Result<Transition, OrderError> {
        let orders = &self.orders;
        let transition = self
            .retry
            .run(move || orders.set_status(id, target))
            .await?;
        match transition {
            Transition::Applied => info!(%id, %target, "Status changed"),
            Transition::StaleWrite => debug!(%id, %target, "Status already set"),
        }
        Ok(transition)
    }

    /// `done -> deleted`. Irreversible.
    ///
    /// An order that is already gone counts as [`Transition::StaleWrite`], so racing purges (or a
    /// retry after a purge that did land) converge without error.
    #[instrument(skip(self))]
    pub async fn purge(&self, id: OrderId) -> Result<Transition, OrderError> {
        let orders = &self.orders;
        match self.retry.run(move || orders.delete(id)).await {
            Ok(()) => {
                info!(%id, "Order purged");
                Ok(Transition::Applied)
            }
            Err(OrderError::NotFound(_)) => {
                debug!(%id, "Order already purged");
                Ok(Transition::StaleWrite)
            }
            Err(e) => Err(e),
        }
    }

    /// Dispatches a wire command.
    pub async fn apply(&self, command: StatusCommand) -> Result<Transition, OrderError> {
        match command {
            StatusCommand::SetStatus { id, target_status } => self.set_status(id, target_status).await,
            StatusCommand::Purge { id, purge: true } => self.purge(id).await,
            StatusCommand::Purge { purge: false, .. } => Err(OrderError::InvalidOrder(
                "purge command must set purge to true".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Order;
    use crate::order_actor::OrderActionResult;
    use actor_framework::mock::MockClient;
    use actor_framework::FrameworkError;
    use std::time::Duration;

    fn controller(mock: &MockClient<Order>) -> StatusController {
        StatusController::new(
            OrderClient::new(mock.client()),
            RetryPolicy::new(3, Duration::from_millis(1)),
        )
    }

    #[tokio::test]
    async fn test_complete_retries_transient_failures() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::generate();
        mock.expect_action(id)
            .return_err(FrameworkError::Timeout(Duration::from_millis(5)));
        mock.expect_action(id)
            .return_ok(OrderActionResult::SetStatus(Transition::Applied));

        let result = controller(&mock).complete(id).await;

        assert_eq!(result, Ok(Transition::Applied));
        mock.verify();
    }

    #[tokio::test]
    async fn test_purge_of_missing_order_is_stale_write() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::generate();
        mock.expect_delete(id)
            .return_err(FrameworkError::NotFound(id.to_string()));

        assert_eq!(controller(&mock).purge(id).await, Ok(Transition::StaleWrite));
        mock.verify();
    }

    #[tokio::test]
    async fn test_purge_rejection_is_not_retried() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::generate();
        mock.expect_delete(id)
            .return_err(FrameworkError::EntityError(Box::new(OrderError::PurgeRejected(id))));

        assert_eq!(
            controller(&mock).purge(id).await,
            Err(OrderError::PurgeRejected(id))
        );
        mock.verify();
    }

    #[test]
    fn test_status_command_wire_shapes() {
        let id = OrderId::generate();
        let set: StatusCommand = serde_json::from_value(serde_json::json!({
            "id": id,
            "target_status": "done",
        }))
        .unwrap();
        assert_eq!(
            set,
            StatusCommand::SetStatus {
                id,
                target_status: OrderStatus::Done
            }
        );

        let purge: StatusCommand =
            serde_json::from_value(serde_json::json!({ "id": id, "purge": true })).unwrap();
        assert_eq!(purge, StatusCommand::Purge { id, purge: true });
        assert_eq!(purge.id(), id);
    }

    #[test]
    fn test_status_command_rejects_mixed_payload() {
        let id = OrderId::generate();
        let mixed = serde_json::from_value::<StatusCommand>(serde_json::json!({
            "id": id,
            "target_status": "done",
            "purge": true,
        }));
        assert!(mixed.is_err());

        let stray = serde_json::from_value::<StatusCommand>(serde_json::json!({
            "id": id,
            "purge": true,
            "reason": "closing",
        }));
        assert!(stray.is_err());
    }
}
