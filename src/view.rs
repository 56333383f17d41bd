//! View state and the pipeline that turns it into rows for the screen.
//!
//! Every user or network event is a `ViewEvent`; `ViewState::apply` folds it
//! into a new state. `ViewState::project` runs filter, sort, aggregate and
//! format over the current state and returns plain strings with sign tags.

use std::sync::Arc;

use tracing::{error, info};

use crate::error::LoadError;
use crate::filter::filter;
use crate::format::{self, Cell};
use crate::model::{Record, SortKey, SortState, Summary};
use crate::sort::{activate_column, sort};
use crate::stats::summarize;

#[derive(Debug, Clone)]
pub enum ViewEvent {
    QueryChanged(String),
    ColumnActivated(SortKey),
    LoadStarted,
    LoadFinished(Result<Vec<Record>, LoadError>),
}

#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub records: Arc<Vec<Record>>,
    pub query: String,
    pub sort: SortState,
    pub loading: bool,
    /// Most recent load failure, kept until the next load completes.
    pub notice: Option<LoadError>,
}

impl ViewState {
    pub fn can_reload(&self) -> bool {
        !self.loading
    }

    pub fn apply(self, event: ViewEvent) -> ViewState {
        match event {
            ViewEvent::QueryChanged(query) => ViewState { query, ..self },
            ViewEvent::ColumnActivated(key) => ViewState {
                sort: activate_column(self.sort, key),
                ..self
            },
            ViewEvent::LoadStarted => ViewState {
                loading: true,
                ..self
            },
            ViewEvent::LoadFinished(Ok(records)) => {
                info!(count = records.len(), "record set replaced");
                ViewState {
                    records: Arc::new(records),
                    loading: false,
                    notice: None,
                    ..self
                }
            }
            // Keep the previous record set on failure.
            ViewEvent::LoadFinished(Err(err)) => {
                error!(error = %err, "load failed, keeping {} records", self.records.len());
                ViewState {
                    loading: false,
                    notice: Some(err),
                    ..self
                }
            }
        }
    }

    pub fn project(&self) -> BoardView {
        let visible = filter(&self.records, &self.query);
        let summary = summarize(&visible, &self.records);
        let ordered = sort(&visible, self.sort.key, self.sort.direction);

        BoardView {
            rows: ordered.iter().map(RowView::from_record).collect(),
            summary: SummaryView::from_summary(&summary),
            visible_count: ordered.len(),
            total_count: self.records.len(),
        }
    }
}

/// Everything the presentation layer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardView {
    pub rows: Vec<RowView>,
    pub summary: SummaryView,
    pub visible_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RowView {
    pub item_name: Cell,
    pub source: Cell,
    pub paid_price: Cell,
    pub current_price: Cell,
    pub profit_per_item: Cell,
    pub percent_change: Cell,
    pub quantity: Cell,
    pub profit_total: Cell,
    pub updated_at: Cell,
}

impl RowView {
    pub fn from_record(r: &Record) -> Self {
        RowView {
            item_name: Cell::plain(r.item_name.clone()),
            source: Cell::plain(r.source.clone()),
            // Acquisition and market prices are never coloured.
            paid_price: Cell::plain(format::format_money(r.paid_price)),
            current_price: Cell::plain(format::format_money(r.current_price)),
            profit_per_item: format::money_cell(r.profit_per_item),
            percent_change: format::percent_cell(r.percent_change),
            quantity: Cell::plain(r.quantity.to_string()),
            profit_total: format::money_cell(r.profit_total),
            updated_at: Cell::plain(format::format_timestamp(r.timestamp_utc)),
        }
    }

    pub fn cell(&self, key: SortKey) -> &Cell {
        match key {
            SortKey::ItemName => &self.item_name,
            SortKey::Source => &self.source,
            SortKey::PaidPrice => &self.paid_price,
            SortKey::CurrentPrice => &self.current_price,
            SortKey::ProfitPerItem => &self.profit_per_item,
            SortKey::PercentChange => &self.percent_change,
            SortKey::Quantity => &self.quantity,
            SortKey::ProfitTotal => &self.profit_total,
            SortKey::UpdatedAt => &self.updated_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub total_value: Cell,
    pub total_profit_loss: Cell,
    pub average_percent_change: Cell,
    pub last_updated: Cell,
}

impl SummaryView {
    pub fn from_summary(s: &Summary) -> Self {
        SummaryView {
            total_value: Cell::plain(format::format_money(s.total_value)),
            total_profit_loss: format::money_cell(Some(s.total_profit_loss)),
            average_percent_change: Cell::plain(format::format_percent(s.average_percent_change)),
            last_updated: Cell::plain(format::format_timestamp(s.most_recent_timestamp)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{Sign, PLACEHOLDER};
    use crate::model::SortDirection;

    fn rec(name: &str, profit_total: Option<f64>) -> Record {
        let mut r = Record::new(name, "steam", 1);
        r.profit_total = profit_total;
        r
    }

    fn loaded(records: Vec<Record>) -> ViewState {
        ViewState::default()
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::LoadFinished(Ok(records)))
    }

    #[test]
    fn reload_is_exclusive_while_loading() {
        let s = ViewState::default();
        assert!(s.can_reload());
        let s = s.apply(ViewEvent::LoadStarted);
        assert!(!s.can_reload());
        let s = s.apply(ViewEvent::LoadFinished(Ok(vec![])));
        assert!(s.can_reload());
    }

    #[test]
    fn failure_preserves_records_and_sets_notice() {
        let s = loaded(vec![rec("AK", Some(1.0))])
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::LoadFinished(Err(LoadError::ProviderUnavailable {
                status: 502,
            })));

        assert_eq!(s.records.len(), 1);
        assert!(s.can_reload());
        assert_eq!(s.notice, Some(LoadError::ProviderUnavailable { status: 502 }));
    }

    #[test]
    fn failure_before_any_load_leaves_empty_set() {
        let s = ViewState::default()
            .apply(ViewEvent::LoadStarted)
            .apply(ViewEvent::LoadFinished(Err(LoadError::NetworkFailure(
                "connection refused".into(),
            ))));
        let board = s.project();
        assert!(board.rows.is_empty());
        assert_eq!(board.summary.total_value.text, PLACEHOLDER);
    }

    #[test]
    fn success_clears_notice() {
        let s = ViewState::default()
            .apply(ViewEvent::LoadFinished(Err(LoadError::UnexpectedFormat("x".into()))))
            .apply(ViewEvent::LoadStarted);
        assert!(s.notice.is_some());
        let s = s.apply(ViewEvent::LoadFinished(Ok(vec![])));
        assert_eq!(s.notice, None);
    }

    #[test]
    fn query_and_sort_events() {
        let s = loaded(vec![rec("AK", Some(2.0)), rec("M4", Some(-2.0)), rec("AWP", None)])
            .apply(ViewEvent::QueryChanged("a".into()));
        let names: Vec<_> = s.project().rows.iter().map(|r| r.item_name.text.clone()).collect();
        assert_eq!(names, vec!["AK", "AWP"]);

        let s = s.apply(ViewEvent::ColumnActivated(SortKey::ProfitTotal));
        assert_eq!(s.sort.direction, SortDirection::Ascending);
        let names: Vec<_> = s.project().rows.iter().map(|r| r.item_name.text.clone()).collect();
        assert_eq!(names, vec!["AWP", "AK"]);
    }

    #[test]
    fn summary_classification() {
        let board = loaded(vec![rec("AK", Some(-4.0))]).project();
        assert_eq!(board.summary.total_profit_loss.text, "-$4.00");
        assert_eq!(board.summary.total_profit_loss.sign, Some(Sign::Negative));
        assert_eq!(board.visible_count, 1);
        assert_eq!(board.total_count, 1);
    }
}
