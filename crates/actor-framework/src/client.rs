//! # Generic Client
//!
//! The caller-side handle for a [`ResourceActor`](crate::ResourceActor).

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::feed::{ChangeEvent, Filter, Subscription};
use crate::message::{ResourceRequest, Response};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot};

/// A type-safe client for interacting with a `ResourceActor`.
///
/// * **Cloneable** – holds a request sender and a feed sender, so cloning is inexpensive.
/// * **Bounded waits** – with [`with_timeout`](Self::with_timeout) every request/response call
///   gives up after the deadline with [`FrameworkError::Timeout`]. A timed-out write may still
///   land; callers must not assume either outcome.
/// * **Change feed** – [`subscribe`](Self::subscribe) never blocks and never talks to the actor.
pub struct ResourceClient<T: ActorEntity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    feed: broadcast::Sender<ChangeEvent<T>>,
    timeout: Option<Duration>,
}

impl<T: ActorEntity> Clone for ResourceClient<T> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            feed: self.feed.clone(),
            timeout: self.timeout,
        }
    }
}

impl<T: ActorEntity> ResourceClient<T> {
    pub fn new(
        sender: mpsc::Sender<ResourceRequest<T>>,
        feed: broadcast::Sender<ChangeEvent<T>>,
    ) -> Self {
        Self {
            sender,
            feed,
            timeout: None,
        }
    }

    /// Returns a copy of this client whose requests give up after `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    async fn request<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, FrameworkError> {
        let (respond_to, response) = oneshot::channel();
        let exchange = async {
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| FrameworkError::ActorClosed)?;
            response.await.map_err(|_| FrameworkError::ActorDropped)?
        };
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, exchange)
                .await
                .map_err(|_| FrameworkError::Timeout(limit))?,
            None => exchange.await,
        }
    }

    pub async fn create(&self, params: T::Create) -> Result<T::Id, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Create { params, respond_to })
            .await
    }

    pub async fn get(&self, id: T::Id) -> Result<Option<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    /// Every stored row, in no particular order. This is the reconciliation query.
    pub async fn list(&self) -> Result<Vec<T>, FrameworkError> {
        self.request(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    pub async fn update(&self, id: T::Id, update: T::Update) -> Result<T, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Update {
            id,
            update,
            respond_to,
        })
        .await
    }

    pub async fn delete(&self, id: T::Id) -> Result<(), FrameworkError> {
        self.request(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }

    pub async fn perform_action(
        &self,
        id: T::Id,
        action: T::Action,
    ) -> Result<T::ActionResult, FrameworkError> {
        self.request(|respond_to| ResourceRequest::Action {
            id,
            action,
            respond_to,
        })
        .await
    }

    /// Opens a new subscription to this resource's change feed.
    ///
    /// Only events published after this call are delivered. Run [`list`](Self::list) afterwards
    /// to establish the starting state.
    pub fn subscribe(&self, filter: Option<Filter<T>>) -> Subscription<T> {
        Subscription::new(self.feed.subscribe(), filter)
    }
}
