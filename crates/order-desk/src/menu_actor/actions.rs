//! Custom actions for the menu catalog.

use crate::model::MenuItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    /// Flips `is_available`.
    ToggleAvailability,
    /// Read-only price check used at ordering time.
    ///
    /// # Errors
    /// Fails with `Unavailable` if the item is switched off.
    Quote,
}

/// Results from MenuActions - variants match 1:1 with MenuAction
#[derive(Debug, Clone, PartialEq)]
pub enum MenuActionResult {
    /// The availability after the toggle.
    ToggleAvailability(bool),
    /// Snapshot of the item as it can be ordered right now.
    Quote(MenuItem),
}
