use chrono::{DateTime, Local, TimeZone, Timelike, Utc};

pub const PLACEHOLDER: &str = "—";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    Positive,
    Negative,
    Neutral,
}

pub fn classify(value: Option<f64>) -> Option<Sign> {
    let v = value?;
    if v > 0.0 {
        Some(Sign::Positive)
    } else if v < 0.0 {
        Some(Sign::Negative)
    } else {
        Some(Sign::Neutral)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub text: String,
    pub sign: Option<Sign>,
}

impl Cell {
    pub fn plain(text: impl Into<String>) -> Self {
        Cell {
            text: text.into(),
            sign: None,
        }
    }
}

/// Canadian dollars, en-CA grouping: `$1,234.50`, `-$3.00`. Negative values
/// keep their sign even when they round to zero (`-$0.00`).
pub fn format_money(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    let cents = (v.abs() * 100.0).round() as u64;
    let negative = v.is_sign_negative();
    format!(
        "{}${}.{:02}",
        if negative { "-" } else { "" },
        group_thousands(cents / 100),
        cents % 100
    )
}

pub fn format_percent(value: Option<f64>) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return PLACEHOLDER.to_string();
    };
    let sign = if v > 0.0 { "+" } else { "" };
    format!("{sign}{v:.2}%")
}

pub fn format_timestamp(value: Option<DateTime<Utc>>) -> String {
    format_timestamp_in(value, &Local)
}

/// en-CA style: `2024-03-01, 2:05:09 p.m.`
pub fn format_timestamp_in<Tz: TimeZone>(value: Option<DateTime<Utc>>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let Some(ts) = value else {
        return PLACEHOLDER.to_string();
    };
    let local = ts.with_timezone(tz);
    let (pm, hour) = local.hour12();
    format!(
        "{}, {}:{:02}:{:02} {}",
        local.format("%Y-%m-%d"),
        hour,
        local.minute(),
        local.second(),
        if pm { "p.m." } else { "a.m." }
    )
}

pub fn money_cell(value: Option<f64>) -> Cell {
    Cell {
        text: format_money(value),
        sign: classify(value),
    }
}

pub fn percent_cell(value: Option<f64>) -> Cell {
    Cell {
        text: format_percent(value),
        sign: classify(value),
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn money() {
        assert_eq!(format_money(Some(0.0)), "$0.00");
        assert_eq!(format_money(Some(12.5)), "$12.50");
        assert_eq!(format_money(Some(1234567.891)), "$1,234,567.89");
        assert_eq!(format_money(Some(-3.0)), "-$3.00");
        assert_eq!(format_money(Some(-0.001)), "-$0.00");
        assert_eq!(format_money(Some(-0.0)), "-$0.00");
        assert_eq!(format_money(Some(999.999)), "$1,000.00");
        assert_eq!(format_money(None), PLACEHOLDER);
    }

    #[test]
    fn percent() {
        assert_eq!(format_percent(Some(4.0)), "+4.00%");
        assert_eq!(format_percent(Some(-2.346)), "-2.35%");
        assert_eq!(format_percent(Some(0.0)), "0.00%");
        assert_eq!(format_percent(None), PLACEHOLDER);
    }

    #[test]
    fn classification() {
        assert_eq!(classify(Some(0.01)), Some(Sign::Positive));
        assert_eq!(classify(Some(-7.0)), Some(Sign::Negative));
        assert_eq!(classify(Some(0.0)), Some(Sign::Neutral));
        assert_eq!(classify(None), None);
        assert_eq!(money_cell(None), Cell::plain(PLACEHOLDER));
    }

    #[test]
    fn timestamps() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 1, 14, 5, 9).unwrap();
        assert_eq!(format_timestamp_in(Some(ts), &Utc), "2024-03-01, 2:05:09 p.m.");

        let toronto = FixedOffset::west_opt(5 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in(Some(ts), &toronto),
            "2024-03-01, 9:05:09 a.m."
        );

        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(
            format_timestamp_in(Some(midnight), &Utc),
            "2024-03-01, 12:00:00 a.m."
        );
        assert_eq!(format_timestamp_in(None, &Utc), PLACEHOLDER);
    }
}
