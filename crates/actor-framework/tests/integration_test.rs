use actor_framework::{ActorEntity, FrameworkError, Operation, ResourceActor};
use async_trait::async_trait;
use std::sync::Arc;

// --- Test Entity ---

#[derive(Clone, Debug, PartialEq)]
struct Ticket {
    id: u32,
    title: String,
    closed: bool,
}

#[derive(Debug)]
struct TicketCreate {
    title: String,
}

#[derive(Debug)]
struct TicketUpdate {
    title: Option<String>,
}

#[derive(Debug)]
enum TicketAction {
    Close,
}

#[derive(Debug, thiserror::Error)]
enum TicketError {
    #[error("empty title")]
    EmptyTitle,
    #[error("open tickets cannot be deleted")]
    StillOpen,
}

#[async_trait]
impl ActorEntity for Ticket {
    type Id = u32;
    type Create = TicketCreate;
    type Update = TicketUpdate;
    type Action = TicketAction;
    type ActionResult = bool;
    type Context = ();
    type Error = TicketError;

    fn from_create_params(id: u32, params: TicketCreate) -> Result<Self, Self::Error> {
        if params.title.is_empty() {
            return Err(TicketError::EmptyTitle);
        }
        Ok(Self {
            id,
            title: params.title,
            closed: false,
        })
    }

    async fn on_update(&mut self, update: TicketUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(title) = update.title {
            if title.is_empty() {
                return Err(TicketError::EmptyTitle);
            }
            self.title = title;
        }
        Ok(())
    }

    async fn on_delete(&self, _ctx: &()) -> Result<(), Self::Error> {
        if self.closed {
            Ok(())
        } else {
            Err(TicketError::StillOpen)
        }
    }

    async fn handle_action(&mut self, action: TicketAction, _ctx: &()) -> Result<bool, Self::Error> {
        match action {
            TicketAction::Close => {
                let changed = !self.closed;
                self.closed = true;
                Ok(changed)
            }
        }
    }
}

fn spawn_ticket_actor(feed_capacity: usize) -> actor_framework::ResourceClient<Ticket> {
    let mut next = 0;
    let (actor, client) = ResourceActor::new(10, feed_capacity, move || {
        next += 1;
        next
    });
    tokio::spawn(actor.run(()));
    client
}

// --- Tests ---

#[tokio::test]
async fn test_framework_full_lifecycle() {
    let client = spawn_ticket_actor(16);

    let id = client
        .create(TicketCreate {
            title: "Broken chair".into(),
        })
        .await
        .unwrap();
    assert_eq!(id, 1);

    let changed = client.perform_action(id, TicketAction::Close).await.unwrap();
    assert!(changed);
    let changed_again = client.perform_action(id, TicketAction::Close).await.unwrap();
    assert!(!changed_again);

    let updated = client
        .update(
            id,
            TicketUpdate {
                title: Some("Broken table".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.title, "Broken table");

    client.delete(id).await.unwrap();
    assert!(client.get(id).await.unwrap().is_none());
    assert!(client.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_feed_publishes_committed_writes_only() {
    let client = spawn_ticket_actor(16);
    let mut feed = client.subscribe(None);

    let id = client
        .create(TicketCreate {
            title: "Leak".into(),
        })
        .await
        .unwrap();
    client.perform_action(id, TicketAction::Close).await.unwrap();
    // Same target again: acknowledged, nothing published.
    client.perform_action(id, TicketAction::Close).await.unwrap();
    // Rejected create: nothing stored, nothing published.
    assert!(client
        .create(TicketCreate { title: String::new() })
        .await
        .is_err());
    client.delete(id).await.unwrap();

    let insert = feed.recv().await.unwrap();
    assert_eq!(insert.operation, Operation::Insert);
    assert!(!insert.row.closed);

    let update = feed.recv().await.unwrap();
    assert_eq!(update.operation, Operation::Update);
    assert!(update.row.closed);

    let delete = feed.recv().await.unwrap();
    assert_eq!(delete.operation, Operation::Delete);
    assert_eq!(delete.row.id, id);

    assert!(feed.try_recv().unwrap().is_none());
}

#[tokio::test]
async fn test_failed_hooks_leave_row_untouched() {
    let client = spawn_ticket_actor(16);
    let id = client
        .create(TicketCreate {
            title: "Noise".into(),
        })
        .await
        .unwrap();

    let result = client
        .update(
            id,
            TicketUpdate {
                title: Some(String::new()),
            },
        )
        .await;
    assert!(matches!(result, Err(FrameworkError::EntityError(_))));

    // on_delete refuses open tickets.
    let result = client.delete(id).await;
    match result {
        Err(FrameworkError::EntityError(e)) => {
            assert!(matches!(e.downcast_ref::<TicketError>(), Some(TicketError::StillOpen)))
        }
        other => panic!("expected entity error, got {:?}", other),
    }

    let stored = client.get(id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Noise");

    assert!(matches!(
        client.delete(99).await,
        Err(FrameworkError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_filtered_subscription_and_lag() {
    let client = spawn_ticket_actor(2);
    let mut only_even = client.subscribe(Some(Arc::new(|t: &Ticket| t.id % 2 == 0)));
    let mut slow = client.subscribe(None);

    for n in 0..4 {
        client
            .create(TicketCreate {
                title: format!("t{n}"),
            })
            .await
            .unwrap();
    }

    // Capacity 2 with 4 events: both subscribers lagged behind the ring buffer.
    assert!(matches!(
        slow.recv().await,
        Err(FrameworkError::SubscriptionDropped { missed: 2 })
    ));
    assert_eq!(slow.recv().await.unwrap().row.id, 3);
    assert_eq!(slow.recv().await.unwrap().row.id, 4);

    assert!(matches!(
        only_even.recv().await,
        Err(FrameworkError::SubscriptionDropped { .. })
    ));
    assert_eq!(only_even.recv().await.unwrap().row.id, 4);
}

#[tokio::test]
async fn test_closed_actor_reports_transient_error() {
    let (actor, client) = ResourceActor::<Ticket>::new(10, 4, || 1);
    drop(actor);

    let err = client.list().await.unwrap_err();
    assert!(matches!(err, FrameworkError::ActorClosed));
    assert!(err.is_transient());
}
