//! Sales domain types.
//!
//! `SaleRecord` is the wire shape accepted by the training endpoints. Dates stay
//! as raw strings until feature building so that an unparsable date surfaces as
//! `ForecastError::InvalidDate` instead of a JSON rejection.

use crate::domain::errors::ForecastError;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// A single historical sale as received from the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub sale_date: String,
    #[serde(deserialize_with = "deserialize_amount")]
    pub total_amount: f64,
}

impl SaleRecord {
    pub fn new(sale_date: impl Into<String>, total_amount: f64) -> Self {
        Self {
            sale_date: sale_date.into(),
            total_amount,
        }
    }

    /// Calendar date of the sale.
    ///
    /// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and RFC 3339 timestamps;
    /// the time component is discarded.
    pub fn date(&self) -> Result<NaiveDate, ForecastError> {
        parse_sale_date(&self.sale_date)
    }
}

pub fn parse_sale_date(raw: &str) -> Result<NaiveDate, ForecastError> {
    let value = raw.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(ts.date());
        }
    }

    Err(ForecastError::InvalidDate {
        value: raw.to_string(),
    })
}

// Upstream backends serialise decimal columns as strings ("129.90").
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            _ => Err(serde::de::Error::custom(format!(
                "invalid total_amount '{}'",
                s
            ))),
        },
    }
}

/// Statistics of the whole training set, kept as the trend proxy for future rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrainingSummary {
    pub mean_amount: f64,
    pub stddev_amount: f64,
    pub record_count: usize,
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// One forecasted day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub date: NaiveDate,
    pub predicted_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<f64>,
}
