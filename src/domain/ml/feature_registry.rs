use chrono::{Datelike, NaiveDate};
use std::fmt;
use std::str::FromStr;

/// Ordered list of feature names for the calendar-only feature set.
pub const CALENDAR_FEATURE_NAMES: &[&str] = &["day_of_week", "day_of_month", "month"];

/// Ordered list of feature names for the calendar + trend feature set.
/// Column order is part of the model contract: training and forecast rows
/// must be laid out identically.
pub const TREND_FEATURE_NAMES: &[&str] = &[
    "day_of_week",
    "day_of_month",
    "month",
    "is_weekend",
    "sales_moving_avg_7d",
    "sales_moving_std_7d",
];

/// Which columns a feature row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureMode {
    /// Day of week, day of month, month.
    Calendar,
    /// Calendar columns plus weekend flag and trailing 7-sample mean/stddev.
    #[default]
    Trend,
}

impl FeatureMode {
    pub fn feature_names(&self) -> &'static [&'static str] {
        match self {
            FeatureMode::Calendar => CALENDAR_FEATURE_NAMES,
            FeatureMode::Trend => TREND_FEATURE_NAMES,
        }
    }

    pub fn width(&self) -> usize {
        self.feature_names().len()
    }
}

impl FromStr for FeatureMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "calendar" => Ok(FeatureMode::Calendar),
            "trend" => Ok(FeatureMode::Trend),
            _ => Err(format!(
                "Invalid feature mode: {}. Must be 'calendar' or 'trend'",
                s
            )),
        }
    }
}

impl fmt::Display for FeatureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureMode::Calendar => write!(f, "calendar"),
            FeatureMode::Trend => write!(f, "trend"),
        }
    }
}

/// Features derived for a single day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    /// Monday = 0 .. Sunday = 6
    pub day_of_week: u32,
    pub day_of_month: u32,
    pub month: u32,
    pub is_weekend: bool,
    pub trailing_mean: f64,
    pub trailing_stddev: f64,
}

impl FeatureVector {
    pub fn new(date: NaiveDate, trailing_mean: f64, trailing_stddev: f64) -> Self {
        let day_of_week = date.weekday().num_days_from_monday();
        Self {
            day_of_week,
            day_of_month: date.day(),
            month: date.month(),
            is_weekend: day_of_week >= 5,
            trailing_mean,
            trailing_stddev,
        }
    }

    /// Flattens into a model row following `mode.feature_names()` order.
    pub fn to_row(&self, mode: FeatureMode) -> Vec<f64> {
        let mut row = vec![
            self.day_of_week as f64,
            self.day_of_month as f64,
            self.month as f64,
        ];
        if mode == FeatureMode::Trend {
            row.push(if self.is_weekend { 1.0 } else { 0.0 });
            row.push(self.trailing_mean);
            row.push(self.trailing_stddev);
        }
        row
    }
}
