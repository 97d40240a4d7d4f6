//! Full-system tests (Pattern 3): real actors, real services, real consoles.

use actor_framework::ActorClient;
use order_desk::config::DeskConfig;
use order_desk::lifecycle::OrderSystem;
use order_desk::model::{Cart, LineItem, MenuItemCreate, OrderRequest, OrderStatus};
use order_desk::order_actor::{OrderError, Transition};
use order_desk::projection::{Console, Signal};
use order_desk::report::Window;
use rust_decimal::Decimal;
use std::time::Duration;

fn pho_request(table: &str, quantity: u32) -> OrderRequest {
    OrderRequest {
        table_label: table.into(),
        items: vec![LineItem::new("Phở", quantity, Decimal::from(45_000))],
        note: None,
    }
}

async fn next_signal(console: &mut Console) -> Option<Signal> {
    tokio::time::timeout(Duration::from_secs(2), console.next_signal())
        .await
        .expect("console waited too long")
        .expect("console failed")
}

#[tokio::test]
async fn test_placed_order_reaches_kitchen() {
    let system = OrderSystem::new(&DeskConfig::default());
    let mut kitchen = system.kitchen_console();
    kitchen.connect().await.unwrap();

    let placed = system.ingestion.submit(pho_request("A1", 2)).await.unwrap();
    assert_eq!(placed.total, Decimal::from(90_000));

    let Some(Signal::NewOrder(order)) = next_signal(&mut kitchen).await else {
        panic!("expected a new-order signal");
    };
    assert_eq!(order.id, placed.id);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total, Decimal::from(90_000));
    assert_eq!(kitchen.projection().active().len(), 1);

    drop(kitchen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_racing_completions_converge() {
    let system = OrderSystem::new(&DeskConfig::default());
    let placed = system.ingestion.submit(pho_request("A1", 2)).await.unwrap();

    let first_admin = system.status.clone();
    let second_admin = system.status.clone();
    let (a, b) = tokio::join!(
        first_admin.complete(placed.id),
        second_admin.complete(placed.id)
    );

    let mut outcomes = vec![a.unwrap(), b.unwrap()];
    outcomes.sort_by_key(|t| *t == Transition::StaleWrite);
    assert_eq!(outcomes, vec![Transition::Applied, Transition::StaleWrite]);

    let stored = system.order_client.get(placed.id).await.unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Done);

    let mut admin = system.admin_console(Window::AllTime);
    admin.connect().await.unwrap();
    let report = admin.projection().report(&chrono::Utc::now());
    assert_eq!(report.order_count(), 1);
    assert_eq!(report.total_revenue, Decimal::from(90_000));

    drop((first_admin, second_admin, admin));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_reconnect_reconciles_missed_changes() {
    let system = OrderSystem::new(&DeskConfig::default());
    let first = system.ingestion.submit(pho_request("B2", 1)).await.unwrap();
    let mut customer = system.customer_console("B2");
    customer.connect().await.unwrap();
    assert_eq!(customer.projection().len(), 1);

    customer.disconnect();
    system.status.complete(first.id).await.unwrap();
    system.status.purge(first.id).await.unwrap();
    let second = system.ingestion.submit(pho_request("B2", 3)).await.unwrap();
    system.ingestion.submit(pho_request("C3", 1)).await.unwrap();

    customer.connect().await.unwrap();

    let mut expected: Vec<_> = system
        .order_client
        .snapshot()
        .await
        .unwrap()
        .into_iter()
        .filter(|o| o.table_label == "B2")
        .collect();
    expected.sort_by_key(|o| o.id);
    assert_eq!(customer.projection().rows(), expected);
    let history = customer.projection().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].id, second.id);

    drop(customer);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_order_is_rejected_without_a_row() {
    let system = OrderSystem::new(&DeskConfig::default());

    let result = system
        .ingestion
        .submit(OrderRequest {
            table_label: "A1".into(),
            items: vec![],
            note: None,
        })
        .await;

    assert!(matches!(result, Err(OrderError::InvalidOrder(_))));
    assert!(system.order_client.snapshot().await.unwrap().is_empty());
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_lagging_console_reconciles() {
    let config = DeskConfig {
        feed_capacity: 2,
        ..DeskConfig::default()
    };
    let system = OrderSystem::new(&config);
    let mut kitchen = system.kitchen_console();
    kitchen.connect().await.unwrap();

    for table in ["A1", "A2", "A3", "A4", "A5"] {
        system.ingestion.submit(pho_request(table, 1)).await.unwrap();
    }

    // The feed overflowed: the console reconciles instead of signalling.
    assert_eq!(next_signal(&mut kitchen).await, None);
    assert!(kitchen.is_connected());
    assert_eq!(kitchen.projection().pending_count(), 5);

    drop(kitchen);
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_pending_order_cannot_be_purged() {
    let system = OrderSystem::new(&DeskConfig::default());
    let placed = system.ingestion.submit(pho_request("A1", 1)).await.unwrap();

    assert_eq!(
        system.status.purge(placed.id).await,
        Err(OrderError::PurgeRejected(placed.id))
    );
    assert!(system.order_client.get(placed.id).await.unwrap().is_some());

    system.status.complete(placed.id).await.unwrap();
    assert_eq!(
        system.status.purge(placed.id).await,
        Ok(Transition::Applied)
    );
    assert_eq!(
        system.status.purge(placed.id).await,
        Ok(Transition::StaleWrite)
    );
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_cart_is_priced_from_menu() {
    let system = OrderSystem::new(&DeskConfig::default());
    let pho = system
        .menu_client
        .create_item(MenuItemCreate::new("Phở", Decimal::from(45_000), "Noodles").spice_adjustable())
        .await
        .unwrap();
    let tea = system
        .menu_client
        .create_item(MenuItemCreate::new("Trà đá", Decimal::from(5_000), "Drinks"))
        .await
        .unwrap();

    let cart = Cart::new().add(pho).add(pho).with_spice(pho, 2).add(tea);
    let placed = system
        .ingestion
        .submit_cart("A1", &cart, None)
        .await
        .unwrap();
    assert_eq!(placed.total, Decimal::from(95_000));

    // Switched off: the same cart no longer goes through.
    assert!(!system.menu_client.toggle_availability(tea).await.unwrap());
    let result = system.ingestion.submit_cart("A1", &cart, None).await;
    assert!(matches!(result, Err(OrderError::InvalidOrder(_))));

    // Price changes do not touch stored orders.
    system
        .menu_client
        .update_item(
            pho,
            order_desk::model::MenuItemUpdate {
                price: Some(Decimal::from(50_000)),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let stored = system.order_client.get(placed.id).await.unwrap().unwrap();
    assert_eq!(stored.total, Decimal::from(95_000));
    assert_eq!(stored.items[0].spice_level, Some(2));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_change_feed_as_stream() {
    use futures::StreamExt;

    let system = OrderSystem::new(&DeskConfig::default());
    let stream = system.order_client.subscribe(None).into_stream();
    tokio::pin!(stream);

    let placed = system.ingestion.submit(pho_request("A1", 1)).await.unwrap();
    system.status.complete(placed.id).await.unwrap();
    system.status.complete(placed.id).await.unwrap();

    let insert = stream.next().await.unwrap().unwrap();
    let update = stream.next().await.unwrap().unwrap();
    assert_eq!(insert.row.status, OrderStatus::Pending);
    assert_eq!(update.row.status, OrderStatus::Done);
    let json = serde_json::to_value(&update).unwrap();
    assert_eq!(json["operation"], "update");

    system.shutdown().await.unwrap();
}
