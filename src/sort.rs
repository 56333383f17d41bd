use std::cmp::Ordering;

use feruca::{Collator, Locale, Tailoring};

use crate::model::{Record, SortDirection, SortKey, SortState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SortValue<'a> {
    Text(&'a str),
    Number(f64),
}

pub fn sort_value(record: &Record, key: SortKey) -> Option<SortValue<'_>> {
    match key {
        SortKey::ItemName => Some(SortValue::Text(&record.item_name)),
        SortKey::Source => Some(SortValue::Text(&record.source)),
        SortKey::PaidPrice => record.paid_price.map(SortValue::Number),
        SortKey::CurrentPrice => record.current_price.map(SortValue::Number),
        SortKey::ProfitPerItem => record.profit_per_item.map(SortValue::Number),
        SortKey::PercentChange => record.percent_change.map(SortValue::Number),
        SortKey::Quantity => Some(SortValue::Number(record.quantity as f64)),
        SortKey::ProfitTotal => record.profit_total.map(SortValue::Number),
        SortKey::UpdatedAt => record
            .timestamp_utc
            .map(|ts| SortValue::Number(ts.timestamp_millis() as f64)),
    }
}

/// CLDR root collation with symbols and punctuation kept significant
/// (non-ignorable), which is how `en` collates by default.
pub fn text_collator() -> Collator {
    Collator::new(Tailoring::Cldr(Locale::Root), false, true)
}

/// Ascending order is "unknown first, then natural order"; descending is the
/// exact reverse, so unknowns land last.
pub fn compare(a: &Record, b: &Record, key: SortKey, direction: SortDirection) -> Ordering {
    compare_with(&mut text_collator(), a, b, key, direction)
}

pub fn compare_with(
    collator: &mut Collator,
    a: &Record,
    b: &Record,
    key: SortKey,
    direction: SortDirection,
) -> Ordering {
    let ord = match (sort_value(a, key), sort_value(b, key)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => compare_present(collator, x, y),
    };

    match direction {
        SortDirection::Ascending => ord,
        SortDirection::Descending => ord.reverse(),
    }
}

fn compare_present(collator: &mut Collator, a: SortValue<'_>, b: SortValue<'_>) -> Ordering {
    match (a, b) {
        (SortValue::Text(x), SortValue::Text(y)) => collator.collate(x, y),
        (SortValue::Number(x), SortValue::Number(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        // A key never mixes kinds; keep text after numbers if it ever does.
        (SortValue::Number(_), SortValue::Text(_)) => Ordering::Less,
        (SortValue::Text(_), SortValue::Number(_)) => Ordering::Greater,
    }
}

pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    text_collator().collate(a, b)
}

// slice::sort_by is stable
pub fn sort(records: &[Record], key: SortKey, direction: SortDirection) -> Vec<Record> {
    let mut collator = text_collator();
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_with(&mut collator, a, b, key, direction));
    sorted
}

pub fn activate_column(current: SortState, clicked: SortKey) -> SortState {
    if current.key == clicked {
        SortState {
            key: clicked,
            direction: current.direction.toggled(),
        }
    } else {
        SortState {
            key: clicked,
            direction: SortDirection::Descending,
        }
    }
}
