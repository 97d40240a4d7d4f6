//! # Generic Actor Server
//!
//! `ResourceActor` is the store half of a resource: it owns the rows, processes requests one at a
//! time and publishes a change event after every committed write.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::feed::{ChangeEvent, Operation};
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Concurrency Model
/// Each actor processes its own messages *sequentially*. That makes every request an atomic step
/// against `store` without a `Mutex`: a create either stores the complete row or nothing, and two
/// writers racing on one row are applied one after the other (last write wins).
///
/// # Change Feed
/// After a write commits the actor publishes a [`ChangeEvent`] on its broadcast feed:
///
/// | Request | Event |
/// |---------|-------|
/// | Create  | `Insert` with the new row |
/// | Update / Action that changed the row | `Update` with the new row |
/// | Update / Action that left the row equal | none |
/// | Delete  | `Delete` with the removed row |
///
/// Publishing never blocks the actor. Slow subscribers lose events and are told so on their side.
///
/// # Usage Pattern
///
/// ```rust
/// use actor_framework::{ActorEntity, Operation, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug, PartialEq)] struct Ticket { id: u32, open: bool }
/// #[derive(Debug)] struct TicketCreate;
/// #[derive(Debug)] enum TicketUpdate {}
/// #[derive(Debug)] enum TicketAction { Close }
/// #[derive(Debug, thiserror::Error)] #[error("ticket error")] struct TicketError;
///
/// #[async_trait]
/// impl ActorEntity for Ticket {
///     type Id = u32; type Create = TicketCreate; type Update = TicketUpdate;
///     type Action = TicketAction; type ActionResult = (); type Context = (); type Error = TicketError;
///     fn from_create_params(id: u32, _: TicketCreate) -> Result<Self, Self::Error> {
///         Ok(Self { id, open: true })
///     }
///     async fn on_update(&mut self, update: TicketUpdate, _: &()) -> Result<(), Self::Error> {
///         match update {}
///     }
///     async fn handle_action(&mut self, _: TicketAction, _: &()) -> Result<(), Self::Error> {
///         self.open = false;
///         Ok(())
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let mut next = 0;
///     let (actor, client) = ResourceActor::<Ticket>::new(10, 16, move || { next += 1; next });
///     tokio::spawn(actor.run(()));
///
///     let mut feed = client.subscribe(None);
///     let id = client.create(TicketCreate).await.unwrap();
///     client.perform_action(id, TicketAction::Close).await.unwrap();
///
///     assert_eq!(feed.recv().await.unwrap().operation, Operation::Insert);
///     assert_eq!(feed.recv().await.unwrap().operation, Operation::Update);
/// }
/// ```
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn FnMut() -> T::Id + Send>,
    feed: broadcast::Sender<ChangeEvent<T>>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - Capacity of the request channel. Callers wait when it is full.
    /// * `feed_capacity` - How many change events a subscriber may fall behind before it is told
    ///   its subscription dropped.
    /// * `next_id_fn` - Generates the id of each created row.
    pub fn new(
        buffer_size: usize,
        feed_capacity: usize,
        next_id_fn: impl FnMut() -> T::Id + Send + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (feed, _) = broadcast::channel(feed_capacity);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
            feed: feed.clone(),
        };
        let client = ResourceClient::new(sender, feed);
        (actor, client)
    }

    fn publish(&self, operation: Operation, row: T) {
        // An error only means nobody is subscribed right now.
        let receivers = self.feed.send(ChangeEvent { operation, row }).unwrap_or(0);
        debug!(?operation, receivers, "Published");
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// # Context Injection
    /// `context` is handed to every entity hook. Pass other clients here rather than at
    /// construction time.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = (self.next_id_fn)();

                    match T::from_create_params(id.clone(), params) {
                        Ok(mut item) => {
                            if let Err(e) = item.on_create(&context).await {
                                warn!(entity_type, error = %e, "on_create failed");
                                let _ =
                                    respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                                continue;
                            }
                            self.store.insert(id.clone(), item.clone());
                            info!(entity_type, %id, size = self.store.len(), "Created");
                            self.publish(Operation::Insert, item);
                            let _ = respond_to.send(Ok(id));
                        }
                        Err(e) => {
                            warn!(entity_type, error = %e, "Create failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    let found = item.is_some();
                    debug!(entity_type, %id, found, "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { respond_to } => {
                    let rows: Vec<T> = self.store.values().cloned().collect();
                    debug!(entity_type, size = rows.len(), "List");
                    let _ = respond_to.send(Ok(rows));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    // Hooks work on a copy so a failed update leaves the stored row untouched.
                    let mut next = item.clone();
                    if let Err(e) = next.on_update(update, &context).await {
                        warn!(entity_type, %id, error = %e, "Update failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if next != *item {
                        *item = next.clone();
                        info!(entity_type, %id, "Updated");
                        self.publish(Operation::Update, next.clone());
                    } else {
                        debug!(entity_type, %id, "Update left row unchanged");
                    }
                    let _ = respond_to.send(Ok(next));
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete failed");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    if let Some(removed) = self.store.remove(&id) {
                        info!(entity_type, %id, size = self.store.len(), "Deleted");
                        self.publish(Operation::Delete, removed);
                    }
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let mut next = item.clone();
                    let result = next
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) if next != *item => {
                            *item = next.clone();
                            info!(entity_type, %id, "Action ok");
                            self.publish(Operation::Update, next);
                        }
                        Ok(_) => debug!(entity_type, %id, "Action left row unchanged"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }
}
