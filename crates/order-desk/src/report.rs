//! # Revenue Aggregation
//!
//! [`aggregate`] is a pure function over a slice of orders: no store, no clock. The caller passes
//! `now` in its own time zone, and day and month boundaries are taken in that zone.
//!
//! | Window | From (inclusive) | To (exclusive) |
//! |--------|------------------|----------------|
//! | `today` | local midnight | next local midnight |
//! | `last_7_days` | local midnight six days ago | next local midnight |
//! | `this_month` | first of the local month | first of next month |
//! | `all_time` | unbounded | unbounded |

use crate::model::Order;
use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Window {
    #[default]
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "all_time")]
    AllTime,
}

/// Half-open UTC interval. `None` means unbounded on that side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl Bounds {
    pub const UNBOUNDED: Bounds = Bounds {
        start: None,
        end: None,
    };

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at < end)
    }
}

impl Window {
    pub fn bounds<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Bounds {
        let tz = now.timezone();
        let today = now.date_naive();
        let tomorrow = today.checked_add_days(Days::new(1));
        let midnight = |date: NaiveDate| local_midnight(&tz, date);

        match self {
            Window::Today => Bounds {
                start: Some(midnight(today)),
                end: tomorrow.map(midnight),
            },
            Window::Last7Days => Bounds {
                start: today.checked_sub_days(Days::new(6)).map(midnight),
                end: tomorrow.map(midnight),
            },
            Window::ThisMonth => {
                let first = today.with_day(1);
                let next_first = first.and_then(|first| {
                    if first.month() == 12 {
                        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
                    } else {
                        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
                    }
                });
                Bounds {
                    start: first.map(midnight),
                    end: next_first.map(midnight),
                }
            }
            Window::AllTime => Bounds::UNBOUNDED,
        }
    }
}

/// Start of `date` in `tz`, as a UTC instant.
fn local_midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Utc> {
    let local = date.and_time(NaiveTime::default());
    match tz.from_local_datetime(&local).earliest() {
        Some(start) => start.with_timezone(&Utc),
        // Midnight skipped by a DST jump: the day starts one hour in.
        None => tz
            .from_local_datetime(&(local + chrono::Duration::hours(1)))
            .earliest()
            .map(|start| start.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&local)),
    }
}

/// Output of [`aggregate`]: what a reporting console displays.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Saturates at `Decimal::MAX`.
    pub total_revenue: Decimal,
    /// Done orders inside the window, oldest first.
    pub rows: Vec<Order>,
}

impl Report {
    pub fn order_count(&self) -> usize {
        self.rows.len()
    }
}

/// Sums `total` over the done orders created inside `window`. Inputs are never modified.
pub fn aggregate<'a, Tz, I>(orders: I, window: Window, now: &DateTime<Tz>) -> Report
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'a Order>,
{
    let bounds = window.bounds(now);
    let mut rows: Vec<Order> = orders
        .into_iter()
        .filter(|order| order.is_done() && bounds.contains(order.created_at))
        .cloned()
        .collect();
    rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

    let total_revenue = rows
        .iter()
        .try_fold(Decimal::ZERO, |sum, order| sum.checked_add(order.total))
        .unwrap_or_else(|| {
            warn!(orders = rows.len(), ?window, "Revenue overflows, reporting the maximum");
            Decimal::MAX
        });

    Report {
        total_revenue,
        rows,
    }
}
