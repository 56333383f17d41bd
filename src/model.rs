use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub item_name: String,
    pub source: String,

    #[serde(default)]
    pub paid_price: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,

    #[serde(default)]
    pub profit_per_item: Option<f64>,
    #[serde(default)]
    pub profit_total: Option<f64>,
    #[serde(default)]
    pub percent_change: Option<f64>,

    pub quantity: u32,

    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp_utc: Option<DateTime<Utc>>,
}

impl Record {
    pub fn new(item_name: impl Into<String>, source: impl Into<String>, quantity: u32) -> Self {
        Record {
            item_name: item_name.into(),
            source: source.into(),
            paid_price: None,
            current_price: None,
            profit_per_item: None,
            profit_total: None,
            percent_change: None,
            quantity,
            timestamp_utc: None,
        }
    }
}

/// Strings go through `parse_timestamp`; numbers are epoch milliseconds.
/// Any other shape is unknown rather than a decode failure.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(deserializer)?;
    Ok(match raw {
        Value::Null => None,
        Value::String(s) => parse_timestamp(&s),
        Value::Number(n) => {
            let millis = n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64));
            let ts = millis.and_then(DateTime::from_timestamp_millis);
            if ts.is_none() {
                tracing::warn!(timestamp = %n, "timestamp_utc out of range, treating as unknown");
            }
            ts
        }
        other => {
            tracing::warn!(timestamp = %other, "timestamp_utc is not a string or number, treating as unknown");
            None
        }
    })
}

pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    tracing::warn!(timestamp = raw, "unparseable timestamp_utc, treating as unknown");
    None
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    ItemName,
    Source,
    PaidPrice,
    CurrentPrice,
    ProfitPerItem,
    PercentChange,
    Quantity,
    ProfitTotal,
    UpdatedAt,
}

impl SortKey {
    // display order
    pub const ALL: [SortKey; 9] = [
        SortKey::ItemName,
        SortKey::Source,
        SortKey::PaidPrice,
        SortKey::CurrentPrice,
        SortKey::ProfitPerItem,
        SortKey::PercentChange,
        SortKey::Quantity,
        SortKey::ProfitTotal,
        SortKey::UpdatedAt,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SortKey::ItemName => "Item",
            SortKey::Source => "Source",
            SortKey::PaidPrice => "Paid",
            SortKey::CurrentPrice => "Current",
            SortKey::ProfitPerItem => "P/L per item",
            SortKey::PercentChange => "% Change",
            SortKey::Quantity => "Qty",
            SortKey::ProfitTotal => "P/L total",
            SortKey::UpdatedAt => "Updated",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        SortState {
            key: SortKey::ProfitTotal,
            direction: SortDirection::Descending,
        }
    }
}

/// Aggregates over a record set. `None` means unknown.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub total_value: Option<f64>,
    pub total_profit_loss: f64,
    pub average_percent_change: Option<f64>,
    pub most_recent_timestamp: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn missing_optional_fields_are_unknown() {
        let r: Record = serde_json::from_str(
            r#"{"item_name":"AK-47 | Redline","source":"steam","quantity":3}"#,
        )
        .unwrap();
        assert_eq!(r.paid_price, None);
        assert_eq!(r.current_price, None);
        assert_eq!(r.profit_total, None);
        assert_eq!(r.timestamp_utc, None);
        assert_eq!(r.quantity, 3);
    }

    #[test]
    fn explicit_nulls_are_unknown() {
        let r: Record = serde_json::from_str(
            r#"{"item_name":"M4A1-S","source":"csfloat","quantity":1,
                "paid_price":null,"current_price":12.5,"timestamp_utc":null}"#,
        )
        .unwrap();
        assert_eq!(r.paid_price, None);
        assert_eq!(r.current_price, Some(12.5));
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let r = serde_json::from_str::<Record>(
            r#"{"item_name":"x","source":"y","quantity":-1}"#,
        );
        assert!(r.is_err());
    }

    #[test]
    fn timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T12:30:00Z"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T14:30:00+02:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01T12:30:00"), Some(expected));
        assert_eq!(parse_timestamp("2024-03-01 12:30:00.000"), Some(expected));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn non_string_timestamps_do_not_fail_the_record() {
        let r: Record = serde_json::from_str(
            r#"{"item_name":"AWP","source":"steam","quantity":1,"timestamp_utc":1709296200000}"#,
        )
        .unwrap();
        assert_eq!(
            r.timestamp_utc,
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap())
        );

        for raw in ["true", "{}", "[1]", "\"not a date\""] {
            let json = format!(
                r#"{{"item_name":"AWP","source":"steam","quantity":1,"timestamp_utc":{raw}}}"#
            );
            let r: Record = serde_json::from_str(&json).unwrap();
            assert_eq!(r.timestamp_utc, None, "input {raw}");
        }
    }

    #[test]
    fn direction_toggles() {
        assert_eq!(SortDirection::Ascending.toggled(), SortDirection::Descending);
        assert_eq!(SortDirection::Descending.toggled(), SortDirection::Ascending);
    }
}
