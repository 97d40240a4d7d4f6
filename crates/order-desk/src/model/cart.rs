//! Client-side cart, kept until the customer submits.
//!
//! A cart is a plain value: every operation returns a new cart and never touches the store.
//! [`IngestionService::submit_cart`](crate::ingestion::IngestionService::submit_cart) turns it
//! into line items.

use super::MenuItemId;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    quantities: BTreeMap<MenuItemId, u32>,
    spice_levels: BTreeMap<MenuItemId, u8>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// One more of `item`.
    pub fn add(&self, item: MenuItemId) -> Self {
        let mut next = self.clone();
        *next.quantities.entry(item).or_insert(0) += 1;
        next
    }

    /// One fewer of `item`; the entry disappears at zero along with its spice level.
    pub fn remove_one(&self, item: MenuItemId) -> Self {
        let mut next = self.clone();
        match next.quantities.get_mut(&item) {
            Some(quantity) if *quantity > 1 => *quantity -= 1,
            Some(_) => {
                next.quantities.remove(&item);
                next.spice_levels.remove(&item);
            }
            None => {}
        }
        next
    }

    /// Remembers a spice level for `item`. Range checks happen at submission against the menu.
    pub fn with_spice(&self, item: MenuItemId, level: u8) -> Self {
        let mut next = self.clone();
        next.spice_levels.insert(item, level);
        next
    }

    pub fn quantity(&self, item: MenuItemId) -> u32 {
        self.quantities.get(&item).copied().unwrap_or(0)
    }

    pub fn spice_level(&self, item: MenuItemId) -> Option<u8> {
        self.spice_levels.get(&item).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Total number of portions.
    pub fn len(&self) -> u32 {
        self.quantities.values().sum()
    }

    /// `(item, quantity)` pairs in id order.
    pub fn entries(&self) -> impl Iterator<Item = (MenuItemId, u32)> + '_ {
        self.quantities.iter().map(|(id, quantity)| (*id, *quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_operations_return_new_values() {
        let pho = MenuItemId(1);
        let tea = MenuItemId(2);

        let empty = Cart::new();
        let cart = empty.add(pho).add(pho).add(tea).with_spice(pho, 3);

        assert!(empty.is_empty());
        assert_eq!(cart.quantity(pho), 2);
        assert_eq!(cart.len(), 3);
        assert_eq!(cart.spice_level(pho), Some(3));

        let fewer = cart.remove_one(pho).remove_one(pho);
        assert_eq!(fewer.quantity(pho), 0);
        assert_eq!(fewer.spice_level(pho), None);
        assert_eq!(fewer.entries().collect::<Vec<_>>(), vec![(tea, 1)]);
        // The first cart is untouched.
        assert_eq!(cart.quantity(pho), 2);
    }

    #[test]
    fn test_remove_missing_item_is_noop() {
        let cart = Cart::new().add(MenuItemId(1));
        assert_eq!(cart.remove_one(MenuItemId(9)), cart);
    }
}
