use std::{fmt, ops::Deref};

use chrono::NaiveDate;
use itertools::Itertools;
use serde::Serialize;

use crate::dataset::Dataset;

/// A summary bound: numeric for data columns, a calendar date for the
/// date column
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Number(f64),
    Date(NaiveDate),
}
impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bound::Number(value) => write!(f, "{}", value),
            Bound::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}
impl Serialize for Bound {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Bound::Number(value) => serializer.serialize_f64(*value),
            Bound::Date(date) => serializer.collect_str(&date.format("%Y-%m-%d")),
        }
    }
}

/// Descriptive statistics for one column. Statistics that are undefined
/// for the column or the available count are `None`.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
    pub min: Option<Bound>,
    pub p25: Option<f64>,
    pub median: Option<f64>,
    pub p75: Option<f64>,
    pub max: Option<Bound>,
}

/// Per-column statistics: the date row first, then one row per numeric
/// column in document order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SummaryTable(Vec<SummaryRow>);
impl Deref for SummaryTable {
    type Target = Vec<SummaryRow>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
impl SummaryTable {
    /// Saves the table to a CSV file
    pub fn to_csv(&self, filename: &str) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_path(filename)?;
        wtr.write_record([
            "Column", "Count", "Mean", "Std Dev", "Min", "25%", "Median", "75%", "Max",
        ])?;
        let stat = |x: Option<f64>| x.map(|v| v.to_string()).unwrap_or_default();
        let bound = |x: Option<Bound>| x.map(|v| v.to_string()).unwrap_or_default();
        for row in self.iter() {
            wtr.write_record([
                row.column.clone(),
                row.count.to_string(),
                stat(row.mean),
                stat(row.std_dev),
                bound(row.min),
                stat(row.p25),
                stat(row.median),
                stat(row.p75),
                bound(row.max),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}
impl fmt::Display for SummaryTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<12} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            "COLUMN", "COUNT", "MEAN", "STD", "MIN", "25%", "MEDIAN", "75%", "MAX"
        )?;
        let stat = |x: Option<f64>| x.map(|v| format!("{:.3}", v)).unwrap_or_default();
        let bound = |x: Option<Bound>| x.map(|v| v.to_string()).unwrap_or_default();
        for row in self.iter() {
            writeln!(
                f,
                "{:<12} {:>8} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
                row.column,
                row.count,
                stat(row.mean),
                stat(row.std_dev),
                bound(row.min),
                stat(row.p25),
                stat(row.median),
                stat(row.p75),
                bound(row.max),
            )?;
        }
        Ok(())
    }
}

impl Dataset {
    /// Computes the descriptive-statistics table over the filtered data
    pub fn summarize(&self) -> SummaryTable {
        let mut rows = vec![self.date_summary()];
        for (idx, column) in self.columns.iter().enumerate() {
            let mut values: Vec<f64> = self
                .records
                .iter()
                .map(|record| record.values[idx])
                .filter(|value| !value.is_nan())
                .collect();
            values.sort_by(f64::total_cmp);
            rows.push(numeric_summary(column, &values));
        }
        SummaryTable(rows)
    }
    /// The date column row: count of non-missing dates and the min/max
    /// calendar dates, everything else undefined
    fn date_summary(&self) -> SummaryRow {
        let dates: Vec<NaiveDate> = self
            .records
            .iter()
            .filter_map(|record| record.date)
            .map(|stamp| stamp.date())
            .collect();
        let minmax = dates.iter().copied().minmax().into_option();
        SummaryRow {
            column: self.date_column.clone(),
            count: dates.len(),
            mean: None,
            std_dev: None,
            min: minmax.map(|(min, _)| Bound::Date(min)),
            p25: None,
            median: None,
            p75: None,
            max: minmax.map(|(_, max)| Bound::Date(max)),
        }
    }
}

fn numeric_summary(column: &str, sorted: &[f64]) -> SummaryRow {
    let count = sorted.len();
    if count == 0 {
        return SummaryRow {
            column: column.to_string(),
            count,
            mean: None,
            std_dev: None,
            min: None,
            p25: None,
            median: None,
            p75: None,
            max: None,
        };
    }
    let mean = sorted.iter().sum::<f64>() / count as f64;
    SummaryRow {
        column: column.to_string(),
        count,
        mean: Some(mean),
        std_dev: std_dev(sorted, mean),
        min: Some(Bound::Number(sorted[0])),
        p25: Some(percentile(sorted, 0.25)),
        median: Some(percentile(sorted, 0.5)),
        p75: Some(percentile(sorted, 0.75)),
        max: Some(Bound::Number(sorted[count - 1])),
    }
}

/// Sample standard deviation, N-1 denominator; undefined below two values
fn std_dev(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let sum_sq = values
        .iter()
        .map(|value| value - mean)
        .fold(0f64, |acc, diff| acc + diff * diff);
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Linear-interpolation percentile at rank `q * (n - 1)` over sorted values
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}
