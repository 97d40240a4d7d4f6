//! # Console Projections
//!
//! Every console keeps its own copy of the orders it cares about, keyed by id and rebuilt from
//! the `orders` change feed. [`OrderProjection`] is that copy plus its derived views. It does no
//! I/O; [`Console`] wires it to a store.
//!
//! ## Convergence
//!
//! Events carry whole rows and the projection overwrites by id, never patching fields. Applying
//! an event twice changes nothing, and a full [`reconcile`](OrderProjection::reconcile) replaces
//! the map outright, so after any reconciliation the projection equals the store no matter which
//! events were lost or replayed.
//!
//! ## Views
//!
//! | Kind | Rows kept | Derived |
//! |------|-----------|---------|
//! | Kitchen | all | `active()`: pending, oldest first |
//! | Admin | all | `active()` and `report()` for the selected [`Window`] |
//! | Customer | one table | `history()`: newest first |

pub mod console;

pub use console::Console;

use crate::model::{Order, OrderId};
use crate::report::{aggregate, Report, Window};
use actor_framework::{ChangeEvent, Filter, Operation};
use chrono::{DateTime, TimeZone};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewKind {
    Kitchen,
    Admin { window: Window },
    Customer { table: String },
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewKind::Kitchen => write!(f, "kitchen"),
            ViewKind::Admin { .. } => write!(f, "admin"),
            ViewKind::Customer { table } => write!(f, "customer:{}", table),
        }
    }
}

/// Something a console operator should notice.
#[derive(Debug, Clone, PartialEq)]
pub enum Signal {
    /// An order arrived after the console came up.
    NewOrder(Order),
}

#[derive(Debug, Clone)]
pub struct OrderProjection {
    kind: ViewKind,
    orders: HashMap<OrderId, Order>,
    reconciled: bool,
}

impl OrderProjection {
    pub fn new(kind: ViewKind) -> Self {
        Self {
            kind,
            orders: HashMap::new(),
            reconciled: false,
        }
    }

    pub fn kind(&self) -> &ViewKind {
        &self.kind
    }

    /// Selects the report window of an admin view. Other views ignore it.
    pub fn set_window(&mut self, window: Window) {
        if let ViewKind::Admin { window: current } = &mut self.kind {
            *current = window;
        }
    }

    /// Whether the row belongs in this view at all.
    pub fn accepts(&self, order: &Order) -> bool {
        match &self.kind {
            ViewKind::Customer { table } => order.table_label == *table,
            ViewKind::Kitchen | ViewKind::Admin { .. } => true,
        }
    }

    /// Subscription filter matching [`accepts`](Self::accepts), so a customer feed only carries
    /// its own table.
    pub fn filter(&self) -> Option<Filter<Order>> {
        match &self.kind {
            ViewKind::Customer { table } => {
                let table = table.clone();
                Some(Arc::new(move |order: &Order| order.table_label == table))
            }
            ViewKind::Kitchen | ViewKind::Admin { .. } => None,
        }
    }

    /// Replaces the projection with a full snapshot of the store.
    pub fn reconcile(&mut self, snapshot: Vec<Order>) {
        self.orders = snapshot
            .into_iter()
            .filter(|order| self.accepts(order))
            .map(|order| (order.id, order))
            .collect();
        self.reconciled = true;
    }

    pub fn is_reconciled(&self) -> bool {
        self.reconciled
    }

    /// Applies one change event. Returns a signal for orders that are new to this view, but only
    /// once the first reconciliation is done.
    pub fn apply(&mut self, event: ChangeEvent<Order>) -> Option<Signal> {
        let ChangeEvent { operation, row } = event;
        if !self.accepts(&row) {
            return None;
        }
        match operation {
            Operation::Insert => {
                let is_new = self.orders.insert(row.id, row.clone()).is_none();
                (is_new && self.reconciled).then(|| Signal::NewOrder(row))
            }
            Operation::Update => {
                self.orders.insert(row.id, row);
                None
            }
            Operation::Delete => {
                self.orders.remove(&row.id);
                None
            }
        }
    }

    pub fn get(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Every row, sorted by id. Comparable against a store snapshot.
    pub fn rows(&self) -> Vec<Order> {
        let mut rows: Vec<Order> = self.orders.values().cloned().collect();
        rows.sort_by_key(|order| order.id);
        rows
    }

    /// Pending orders, oldest first.
    pub fn active(&self) -> Vec<&Order> {
        let mut active: Vec<&Order> = self.orders.values().filter(|o| o.is_pending()).collect();
        active.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        active
    }

    /// Every row in the view, newest first.
    pub fn history(&self) -> Vec<&Order> {
        let mut history: Vec<&Order> = self.orders.values().collect();
        history.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        history
    }

    pub fn pending_count(&self) -> usize {
        self.orders.values().filter(|o| o.is_pending()).count()
    }

    /// Revenue report over the admin window; other views report over all time.
    pub fn report<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Report {
        let window = match &self.kind {
            ViewKind::Admin { window } => *window,
            ViewKind::Kitchen | ViewKind::Customer { .. } => Window::AllTime,
        };
        aggregate(self.orders.values(), window, now)
    }
}
