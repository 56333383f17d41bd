use chrono::{DateTime, Utc};
use statrs::statistics::Statistics;

use crate::model::{Record, Summary};

/// Summary of the visible rows. The freshness timestamp comes from `all`, so
/// it does not move when the filter hides rows.
pub fn summarize(visible: &[Record], all: &[Record]) -> Summary {
    Summary {
        total_value: total_value(visible),
        total_profit_loss: total_profit_loss(visible),
        average_percent_change: average_percent_change(visible),
        most_recent_timestamp: most_recent_timestamp(all),
    }
}

// Unknown if no record is priced.
pub fn total_value(records: &[Record]) -> Option<f64> {
    let mut priced = records
        .iter()
        .filter_map(|r| r.current_price.map(|p| p * r.quantity as f64))
        .peekable();

    priced.peek()?;
    Some(priced.sum())
}

// Unknown profit counts as zero here, and only here. Folding from +0.0 keeps
// an empty set at "$0.00" rather than negative zero.
pub fn total_profit_loss(records: &[Record]) -> f64 {
    records
        .iter()
        .fold(0.0, |acc, r| acc + r.profit_total.unwrap_or(0.0))
}

pub fn average_percent_change(records: &[Record]) -> Option<f64> {
    let changes: Vec<f64> = records.iter().filter_map(|r| r.percent_change).collect();
    if changes.is_empty() {
        return None;
    }
    Some(changes.mean())
}

pub fn most_recent_timestamp(records: &[Record]) -> Option<DateTime<Utc>> {
    records.iter().filter_map(|r| r.timestamp_utc).max()
}
