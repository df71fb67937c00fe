//! Batch pipeline over a bike-rental dataset: load a CSV of hourly
//! rental records, filter the rows to an inclusive date interval, map
//! the `season` and `weathersit` codes to display labels, then compute
//! a descriptive-statistics table and grouped aggregations for charting.
//!
//! ```no_run
//! use rental_stats::{Aggregate, DatasetLoader, DateInterval, UnmappedPolicy};
//!
//! # fn main() -> Result<(), rental_stats::Error> {
//! let dataset = DatasetLoader::default().source("hour.csv").load()?;
//! let interval = dataset.date_range().unwrap();
//! let mut filtered = dataset.filter(&interval);
//! filtered.map_labels(UnmappedPolicy::Tag);
//! let summary = filtered.summarize();
//! let by_season = filtered.aggregate_by("season", "cnt", Aggregate::Mean)?;
//! # Ok(())
//! # }
//! ```

mod aggregate;
mod dataset;
mod error;
mod interval;
mod labels;
#[cfg(feature = "plot")]
pub mod plot;
mod summary;

pub use aggregate::{Aggregate, AggregateError, AggregatedSeries};
pub use dataset::{Dataset, DatasetError, DatasetLoader, RentalRecord};
pub use error::Error;
pub use interval::{DateInterval, IntervalError};
pub use labels::{Category, LabelMap, UnmappedPolicy};
pub use summary::{Bound, SummaryRow, SummaryTable};
