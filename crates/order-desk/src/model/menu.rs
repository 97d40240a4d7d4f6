//! Dishes on the menu.
//!
//! # Actor Framework
//! [`MenuItem`] implements the [`ActorEntity`](actor_framework::ActorEntity) trait (see
//! [`menu_actor`](crate::menu_actor)). Creation takes a [`MenuItemCreate`], edits take a
//! [`MenuItemUpdate`], and availability is flipped through
//! [`MenuAction`](crate::menu_actor::MenuAction).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for menu items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MenuItemId(pub u32);

impl From<u32> for MenuItemId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for MenuItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "menu_{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub name: String,
    pub price: Decimal,
    pub is_available: bool,
    pub category: String,
    /// Whether the kitchen takes a spice level for this dish.
    pub spice_adjustable: bool,
}

/// Payload for creating a menu item. New items start out available.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItemCreate {
    pub name: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub spice_adjustable: bool,
}

impl MenuItemCreate {
    pub fn new(name: impl Into<String>, price: Decimal, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price,
            category: category.into(),
            spice_adjustable: false,
        }
    }

    pub fn spice_adjustable(mut self) -> Self {
        self.spice_adjustable = true;
        self
    }
}

/// Partial edit. `None` fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItemUpdate {
    pub name: Option<String>,
    pub price: Option<Decimal>,
    pub is_available: Option<bool>,
}
