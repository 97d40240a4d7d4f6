//! # Menu Client
//!
//! Provides a high-level API for interacting with the menu catalog.
use crate::menu_actor::{MenuAction, MenuActionResult, MenuError};
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Client for interacting with the Menu actor.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
}

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<MenuItem> for MenuClient {
    type Error = MenuError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        MenuError::from(e)
    }
}

impl MenuClient {
    #[instrument(skip(self))]
    pub async fn create_item(&self, params: MenuItemCreate) -> Result<MenuItemId, MenuError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(MenuError::from)
    }

    #[instrument(skip(self))]
    pub async fn update_item(
        &self,
        id: MenuItemId,
        update: MenuItemUpdate,
    ) -> Result<MenuItem, MenuError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(MenuError::from)
    }

    /// Switches a dish on or off. Returns the new availability.
    #[instrument(skip(self))]
    pub async fn toggle_availability(&self, id: MenuItemId) -> Result<bool, MenuError> {
        debug!("Toggling availability for {}", id);
        match self
            .inner
            .perform_action(id, MenuAction::ToggleAvailability)
            .await
        {
            Ok(MenuActionResult::ToggleAvailability(available)) => Ok(available),
            Ok(other) => Err(MenuError::ActorCommunicationError(format!(
                "unexpected result {:?}",
                other
            ))),
            Err(e) => Err(MenuError::from(e)),
        }
    }

    /// Current name and price of an orderable item.
    ///
    /// Fails with `NotFound` or `Unavailable` when the item cannot be ordered.
    #[instrument(skip(self))]
    pub async fn quote(&self, id: MenuItemId) -> Result<MenuItem, MenuError> {
        debug!("Quoting {}", id);
        match self.inner.perform_action(id, MenuAction::Quote).await {
            Ok(MenuActionResult::Quote(item)) => Ok(item),
            Ok(other) => Err(MenuError::ActorCommunicationError(format!(
                "unexpected result {:?}",
                other
            ))),
            Err(e) => Err(MenuError::from(e)),
        }
    }

    /// Items customers can order right now, sorted by name.
    #[instrument(skip(self))]
    pub async fn available_items(&self) -> Result<Vec<MenuItem>, MenuError> {
        let mut items: Vec<MenuItem> = self
            .list()
            .await?
            .into_iter()
            .filter(|item| item.is_available)
            .collect();
        items.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(count = items.len(), "Available items");
        Ok(items)
    }
}
