//! # Order Desk Demo
//!
//! Runs one service day in miniature:
//! 1. Starts the [`OrderSystem`] and seeds a menu.
//! 2. Brings up a kitchen console (alerts on new orders) and an admin console.
//! 3. Places a cart order for table A1 and a takeaway order.
//! 4. Completes the first order from two consoles at once, then reports and prints a receipt.
//! 5. Purges the completed order and shuts everything down.
//!
//! `RUST_LOG=info cargo run -p order-desk` shows the flow.

use actor_framework::ActorClient;
use chrono::Local;
use order_desk::config::DeskConfig;
use order_desk::lifecycle::{join_or_warn, setup_tracing, OrderSystem};
use order_desk::model::{table_label_or_takeaway, Cart, LineItem, MenuItemCreate, OrderRequest};
use order_desk::projection::Signal;
use order_desk::receipt::Receipt;
use order_desk::report::Window;
use rust_decimal::Decimal;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = DeskConfig::from_env().map_err(|e| e.to_string())?;
    info!(?config, "Starting order desk");
    let system = OrderSystem::new(&config);

    // Menu
    let pho = system
        .menu_client
        .create_item(
            MenuItemCreate::new("Phở bò", Decimal::from(45_000), "Noodles").spice_adjustable(),
        )
        .await
        .map_err(|e| e.to_string())?;
    let tea = system
        .menu_client
        .create_item(MenuItemCreate::new("Trà đá", Decimal::from(5_000), "Drinks"))
        .await
        .map_err(|e| e.to_string())?;

    // Kitchen console runs in the background and forwards alerts.
    let mut kitchen = system.kitchen_console();
    kitchen.connect().await.map_err(|e| e.to_string())?;
    let (signal_tx, mut signal_rx) = mpsc::channel(16);
    let (stop_kitchen, kitchen_stopped) = oneshot::channel();
    let kitchen_task = tokio::spawn(kitchen.run(signal_tx, kitchen_stopped));
    let alerts = tokio::spawn(
        async move {
            while let Some(Signal::NewOrder(order)) = signal_rx.recv().await {
                info!(id = %order.id, table = %order.table_label, total = %order.total, "New order");
            }
        }
        .instrument(tracing::info_span!("kitchen")),
    );

    let mut admin = system.admin_console(Window::Today);
    admin.connect().await.map_err(|e| e.to_string())?;

    // Orders
    let cart = Cart::new().add(pho).add(pho).with_spice(pho, 3).add(tea);
    let placed = async {
        system
            .ingestion
            .submit_cart("A1", &cart, Some("no onions".into()))
            .await
    }
    .instrument(tracing::info_span!("place_order"))
    .await
    .map_err(|e| e.to_string())?;

    let takeaway = system
        .ingestion
        .submit(OrderRequest {
            table_label: table_label_or_takeaway(None),
            items: vec![LineItem::new("Bánh mì", 1, Decimal::from(30_000))],
            note: None,
        })
        .await
        .map_err(|e| e.to_string())?;
    info!(id = %takeaway.id, total = %takeaway.total, "Takeaway placed");

    // Two consoles race to complete the same order; both succeed.
    let (first, second) = async {
        tokio::join!(
            system.status.complete(placed.id),
            system.status.complete(placed.id)
        )
    }
    .instrument(tracing::info_span!("complete"))
    .await;
    info!(?first, ?second, "Completion results");

    admin.catch_up().await.map_err(|e| e.to_string())?;
    let report = admin.projection().report(&Local::now());
    info!(
        revenue = %report.total_revenue,
        orders = report.order_count(),
        pending = admin.projection().pending_count(),
        "Today's report"
    );

    if let Some(order) = system
        .order_client
        .get(placed.id)
        .await
        .map_err(|e| e.to_string())?
    {
        let receipt = Receipt::for_order(&order, "A1-0001", "https://pay.example/qr/A1-0001.png")
            .map_err(|e| e.to_string())?;
        let json = receipt.to_json().map_err(|e| e.to_string())?;
        info!(%json, "Receipt");
    }

    match system.status.purge(takeaway.id).await {
        Ok(transition) => info!(?transition, "Takeaway purged"),
        Err(e) => warn!(error = %e, "Takeaway not purged"),
    }
    system
        .status
        .purge(placed.id)
        .await
        .map_err(|e| e.to_string())?;

    // Stop consoles before the stores.
    let _ = stop_kitchen.send(());
    if let Some(kitchen) = join_or_warn("kitchen console", kitchen_task).await {
        info!(rows = kitchen.len(), "Kitchen console stopped");
    }
    join_or_warn("kitchen alerts", alerts).await;
    drop(admin);

    system.shutdown().await?;

    info!("Order desk stopped");
    Ok(())
}
