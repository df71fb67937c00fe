use std::{fmt, ops::Deref};

use serde::Serialize;
use strum_macros::{Display, EnumString};

use crate::{
    dataset::{Dataset, RentalRecord, SEASON_COLUMN, WEATHER_COLUMN},
    labels::Category,
};

#[derive(thiserror::Error, Debug)]
pub enum AggregateError {
    #[error("unknown column {0:?}")]
    UnknownColumn(String),
}

/// Aggregate applied to the value column within each category group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum Aggregate {
    Mean,
    Count,
}

/// One `(category label, value)` series, ready to drive a bar chart
#[derive(Debug, Clone, Serialize)]
pub struct AggregatedSeries {
    pub category: String,
    pub value: String,
    pub op: Aggregate,
    pub entries: Vec<(String, f64)>,
}
impl Deref for AggregatedSeries {
    type Target = Vec<(String, f64)>;

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}
impl fmt::Display for AggregatedSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} of {} by {}:", self.op, self.value, self.category)?;
        for (label, value) in self.entries.iter() {
            writeln!(f, "  - {:<12} {:>10.3}", label, value)?;
        }
        Ok(())
    }
}

impl Dataset {
    /// Groups rows by a category column and aggregates a value column
    /// within each group.
    ///
    /// Entries come out in first-seen order; categories absent from the
    /// data are omitted and rows with a missing category are excluded.
    pub fn aggregate_by(
        &self,
        category_column: &str,
        value_column: &str,
        op: Aggregate,
    ) -> Result<AggregatedSeries, AggregateError> {
        let category: fn(&RentalRecord) -> &Category = match category_column {
            SEASON_COLUMN => |record| &record.season,
            WEATHER_COLUMN => |record| &record.weather,
            _ => return Err(AggregateError::UnknownColumn(category_column.to_string())),
        };
        let value_idx = self
            .column_index(value_column)
            .ok_or_else(|| AggregateError::UnknownColumn(value_column.to_string()))?;

        let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
        for record in self.records() {
            let key = match category(record).group_key() {
                Some(key) => key,
                None => continue,
            };
            let value = record.values[value_idx];
            match groups.iter_mut().find(|(label, _)| *label == key) {
                Some((_, values)) => values.push(value),
                None => groups.push((key, vec![value])),
            }
        }

        let entries = groups
            .into_iter()
            .map(|(label, values)| (label, apply(op, &values)))
            .collect();
        Ok(AggregatedSeries {
            category: category_column.to_string(),
            value: value_column.to_string(),
            op,
            entries,
        })
    }
}

/// `Count` counts rows; `Mean` skips missing values
fn apply(op: Aggregate, values: &[f64]) -> f64 {
    match op {
        Aggregate::Count => values.len() as f64,
        Aggregate::Mean => {
            let finite: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
            if finite.is_empty() {
                f64::NAN
            } else {
                finite.iter().sum::<f64>() / finite.len() as f64
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        dataset::fixtures::{record, two_rows},
        interval::DateInterval,
        labels::UnmappedPolicy,
    };

    #[test]
    fn filtered_january_yields_spring_only() {
        let mut dataset = two_rows();
        dataset.map_labels(UnmappedPolicy::Tag);
        let interval = DateInterval::new(
            NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2011, 1, 31).unwrap(),
        )
        .unwrap();
        let filtered = dataset.filter(&interval);
        assert_eq!(filtered.len(), 1);
        let series = filtered
            .aggregate_by("season", "cnt", Aggregate::Mean)
            .unwrap();
        assert_eq!(series.entries, vec![(String::from("Spring"), 10.0)]);
    }

    #[test]
    fn mean_by_season_in_first_seen_order() {
        let mut dataset = two_rows();
        dataset.records.push(record((2011, 1, 6), 1, 1, 30.0));
        dataset.map_labels(UnmappedPolicy::Tag);
        let series = dataset
            .aggregate_by("season", "cnt", Aggregate::Mean)
            .unwrap();
        assert_eq!(
            series.entries,
            vec![(String::from("Spring"), 20.0), (String::from("Fall"), 50.0)]
        );
    }

    #[test]
    fn counts_sum_to_the_grouped_rows() {
        let mut dataset = two_rows();
        dataset.records.push(record((2011, 3, 1), 2, 3, 12.0));
        dataset.map_labels(UnmappedPolicy::Tag);
        let series = dataset
            .aggregate_by("weathersit", "cnt", Aggregate::Count)
            .unwrap();
        let total: f64 = series.iter().map(|(_, count)| count).sum();
        assert_eq!(total, dataset.len() as f64);
    }

    #[test]
    fn unmapped_weather_is_dropped_under_the_strict_policy() {
        let mut dataset = two_rows();
        dataset.records.push(record((2011, 3, 1), 2, 9, 12.0));
        dataset.map_labels(UnmappedPolicy::Drop);
        let series = dataset
            .aggregate_by("weathersit", "cnt", Aggregate::Count)
            .unwrap();
        assert!(series.iter().all(|(label, _)| !label.contains("unknown")));
        let total: f64 = series.iter().map(|(_, count)| count).sum();
        assert_eq!(total, (dataset.len() - 1) as f64);
    }

    #[test]
    fn unmapped_weather_is_tagged_under_the_corrected_policy() {
        let mut dataset = two_rows();
        dataset.records.push(record((2011, 3, 1), 2, 9, 12.0));
        dataset.map_labels(UnmappedPolicy::Tag);
        let series = dataset
            .aggregate_by("weathersit", "cnt", Aggregate::Count)
            .unwrap();
        assert!(series
            .iter()
            .any(|(label, count)| label == "unknown(9)" && *count == 1.0));
    }

    #[test]
    fn only_observed_categories_appear() {
        let mut dataset = two_rows();
        dataset.map_labels(UnmappedPolicy::Tag);
        let series = dataset
            .aggregate_by("season", "cnt", Aggregate::Mean)
            .unwrap();
        assert_eq!(series.len(), 2);
        assert!(series
            .iter()
            .all(|(label, _)| label == "Spring" || label == "Fall"));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let dataset = two_rows();
        assert!(matches!(
            dataset.aggregate_by("holiday", "cnt", Aggregate::Mean),
            Err(AggregateError::UnknownColumn(column)) if column == "holiday"
        ));
        assert!(matches!(
            dataset.aggregate_by("season", "rentals", Aggregate::Mean),
            Err(AggregateError::UnknownColumn(column)) if column == "rentals"
        ));
    }

    #[test]
    fn mean_skips_missing_values() {
        let mut dataset = two_rows();
        dataset.records.push(record((2011, 1, 6), 1, 1, f64::NAN));
        dataset.map_labels(UnmappedPolicy::Tag);
        let series = dataset
            .aggregate_by("season", "cnt", Aggregate::Mean)
            .unwrap();
        assert_eq!(series.entries[0], (String::from("Spring"), 10.0));
    }

    #[test]
    fn aggregate_op_parses_from_the_command_line() {
        assert_eq!("mean".parse::<Aggregate>().unwrap(), Aggregate::Mean);
        assert_eq!("count".parse::<Aggregate>().unwrap(), Aggregate::Count);
        assert!("median".parse::<Aggregate>().is_err());
    }
}
