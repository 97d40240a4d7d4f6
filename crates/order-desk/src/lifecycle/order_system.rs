use crate::clients::{MenuClient, OrderClient};
use crate::config::DeskConfig;
use crate::ingestion::IngestionService;
use crate::projection::{Console, ViewKind};
use crate::report::Window;
use crate::status::StatusController;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The runtime orchestrator for the order desk.
///
/// `OrderSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the store actors
/// - **Dependency Wiring**: handing the store clients to ingestion, the status controller and
///   every console
/// - **Configuration**: applying buffer sizes, feed capacity and request deadlines
///
/// # Architecture
///
/// - **Menu Actor**: the catalog ingestion prices carts against
/// - **Order Actor**: the order store and its `orders` change feed
///
/// Neither actor depends on the other (`Context = ()`); coordination lives in the services.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(&DeskConfig::default());
/// let mut kitchen = system.kitchen_console();
/// kitchen.connect().await?;
///
/// let placed = system.ingestion.submit(request).await?;
/// system.status.complete(placed.id).await?;
///
/// drop(kitchen);
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    /// Client for interacting with the Menu actor
    pub menu_client: MenuClient,

    pub ingestion: IngestionService,

    pub status: StatusController,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates and starts the menu and order actors and wires the services to them.
    ///
    /// Every client carries `config.request_timeout`; status transitions retry with
    /// `config.retry_policy()`.
    pub fn new(config: &DeskConfig) -> Self {
        // 1. Create actors (no dependencies)
        let (menu_actor, menu_client) =
            crate::menu_actor::new(config.store_buffer, config.feed_capacity);
        let (order_actor, order_client) =
            crate::order_actor::new(config.store_buffer, config.feed_capacity);

        // 2. Start actors
        let menu_handle = tokio::spawn(menu_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(()));

        let menu_client = MenuClient::new(menu_client.with_timeout(config.request_timeout));
        let order_client = OrderClient::new(order_client.with_timeout(config.request_timeout));

        Self {
            ingestion: IngestionService::new(order_client.clone(), menu_client.clone()),
            status: StatusController::new(order_client.clone(), config.retry_policy()),
            order_client,
            menu_client,
            handles: vec![menu_handle, order_handle],
        }
    }

    /// Pending orders, oldest first, with new-order alerts.
    pub fn kitchen_console(&self) -> Console {
        Console::new(self.order_client.clone(), ViewKind::Kitchen)
    }

    /// Active orders plus revenue over `window`.
    pub fn admin_console(&self, window: Window) -> Console {
        Console::new(self.order_client.clone(), ViewKind::Admin { window })
    }

    /// Order history of one table.
    pub fn customer_console(&self, table: impl Into<String>) -> Console {
        Console::new(
            self.order_client.clone(),
            ViewKind::Customer {
                table: table.into(),
            },
        )
    }

    /// Gracefully shuts down the system.
    ///
    /// Drops the clients held here, then waits for the actor tasks. Consoles and services
    /// cloned out of the system hold their own clients: drop them first, or this waits for them.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all actors shut down cleanly
    /// - `Err(String)` if any actor task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Step 1: Close all channels by dropping clients
        drop(self.ingestion);
        drop(self.status);
        drop(self.order_client);
        drop(self.menu_client);

        // Step 2: Wait for all actor tasks to complete
        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

/// Awaits a background task, logging a panic or cancellation instead of dropping it.
pub async fn join_or_warn<T>(task: &str, handle: JoinHandle<T>) -> Option<T> {
    match handle.await {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(task, error = %e, "Background task failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_join_or_warn_surfaces_failures() {
        let ok = tokio::spawn(async { 7 });
        assert_eq!(join_or_warn("answer", ok).await, Some(7));

        let panicked = tokio::spawn(async { panic!("kitchen fell over") });
        assert_eq!(join_or_warn::<()>("kitchen", panicked).await, None);

        let aborted = tokio::spawn(std::future::pending::<()>());
        aborted.abort();
        assert_eq!(join_or_warn("alerts", aborted).await, None);
    }

    #[tokio::test]
    async fn test_shutdown_joins_actors() {
        let system = OrderSystem::new(&DeskConfig::default());
        let console = system.kitchen_console();
        drop(console);
        assert_eq!(system.shutdown().await, Ok(()));
    }
}
