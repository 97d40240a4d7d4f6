//! # Order Client
//!
//! Provides a high-level API for interacting with the order store.
//! It wraps a `ResourceClient<Order>` and exposes domain-specific methods; every failure comes
//! back as an [`OrderError`].
use crate::model::{NewOrder, Order, OrderId, OrderStatus};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError, Transition};
use actor_framework::{ActorClient, Filter, FrameworkError, ResourceClient, Subscription};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        OrderError::from(e)
    }
}

impl OrderClient {
    /// Single atomic insert of a validated order.
    #[instrument(skip(self, params), fields(table = %params.table_label, items = params.items.len()))]
    pub async fn insert(&self, params: NewOrder) -> Result<OrderId, OrderError> {
        debug!(total = %params.total, "Sending request");
        self.inner.create(params).await.map_err(OrderError::from)
    }

    /// Unconditional status write keyed by id.
    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: OrderId,
        target: OrderStatus,
    ) -> Result<Transition, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::SetStatus(target))
            .await
        {
            Ok(OrderActionResult::SetStatus(transition)) => Ok(transition),
            Err(e) => Err(OrderError::from(e)),
        }
    }

    /// Full reconciliation query: every row currently in the store.
    pub async fn snapshot(&self) -> Result<Vec<Order>, OrderError> {
        self.list().await
    }

    /// Opens a change feed subscription on `orders`.
    pub fn subscribe(&self, filter: Option<Filter<Order>>) -> Subscription<Order> {
        self.inner.subscribe(filter)
    }
}
