//! Entity trait implementation for the MenuItem domain type.

use super::actions::{MenuAction, MenuActionResult};
use super::error::MenuError;
use crate::model::{MenuItem, MenuItemCreate, MenuItemId, MenuItemUpdate};
use actor_framework::ActorEntity;
use async_trait::async_trait;
use rust_decimal::Decimal;

fn validate(name: &str, price: Decimal) -> Result<(), MenuError> {
    if name.trim().is_empty() {
        return Err(MenuError::ValidationError("name must not be empty".into()));
    }
    if price < Decimal::ZERO {
        return Err(MenuError::ValidationError(format!(
            "price must not be negative, got {}",
            price
        )));
    }
    Ok(())
}

#[async_trait]
impl ActorEntity for MenuItem {
    type Id = MenuItemId;
    type Create = MenuItemCreate;
    type Update = MenuItemUpdate;
    type Action = MenuAction;
    type ActionResult = MenuActionResult;
    type Context = ();
    type Error = MenuError;

    fn from_create_params(id: MenuItemId, params: MenuItemCreate) -> Result<Self, Self::Error> {
        validate(&params.name, params.price)?;
        Ok(Self {
            id,
            name: params.name,
            price: params.price,
            is_available: true,
            category: params.category,
            spice_adjustable: params.spice_adjustable,
        })
    }

    /// Handles updates to the MenuItem entity.
    ///
    /// # Fields Updated
    /// - `name`: Display name
    /// - `price`: Current price (existing orders keep their snapshot)
    /// - `is_available`: Whether the dish can be ordered
    async fn on_update(&mut self, update: MenuItemUpdate, _ctx: &()) -> Result<(), Self::Error> {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(is_available) = update.is_available {
            self.is_available = is_available;
        }
        validate(&self.name, self.price)
    }

    async fn handle_action(
        &mut self,
        action: MenuAction,
        _ctx: &(),
    ) -> Result<MenuActionResult, Self::Error> {
        match action {
            MenuAction::ToggleAvailability => {
                self.is_available = !self.is_available;
                Ok(MenuActionResult::ToggleAvailability(self.is_available))
            }
            MenuAction::Quote if self.is_available => Ok(MenuActionResult::Quote(self.clone())),
            MenuAction::Quote => Err(MenuError::Unavailable(self.name.clone())),
        }
    }
}
