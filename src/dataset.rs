use std::{
    fs::File,
    io::Read,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use itertools::Itertools;

use crate::{
    interval::DateInterval,
    labels::{Category, LabelMap, UnmappedPolicy},
};

pub(crate) const SEASON_COLUMN: &str = "season";
pub(crate) const WEATHER_COLUMN: &str = "weathersit";

#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    #[error("failed to read the dataset at {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse the CSV data")]
    Csv(#[from] csv::Error),
    #[error("expected column {0:?} is missing from the dataset")]
    MissingColumn(String),
    #[error("invalid date {value:?} in column {column:?} at row {row}")]
    Date {
        row: usize,
        column: String,
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("invalid category code {value:?} in column {column:?} at row {row}")]
    Code {
        row: usize,
        column: String,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("invalid numeric value {value:?} in column {column:?} at row {row}")]
    Number {
        row: usize,
        column: String,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// One dataset row: the parsed date, the two category cells and the
/// numeric covariates in document order
#[derive(Debug, Clone)]
pub struct RentalRecord {
    pub date: Option<NaiveDateTime>,
    pub season: Category,
    pub weather: Category,
    pub values: Vec<f64>,
}

/// The loaded record set with its numeric column names in document order
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub(crate) date_column: String,
    pub(crate) columns: Vec<String>,
    pub(crate) records: Vec<RentalRecord>,
}
impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    pub fn date_column(&self) -> &str {
        &self.date_column
    }
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
    /// Min/max dates present in the data, the default interval when the
    /// user has not chosen one yet
    pub fn date_range(&self) -> Option<DateInterval> {
        self.records
            .iter()
            .filter_map(|record| record.date)
            .map(|stamp| stamp.date())
            .minmax()
            .into_option()
            .map(|(start, end)| DateInterval { start, end })
    }
    /// Retains the rows whose date falls inside the interval, both bounds
    /// included. Rows are compared on their calendar-date component so an
    /// end-of-interval timestamp late in the day is still kept.
    pub fn filter(&self, interval: &DateInterval) -> Dataset {
        let records = self
            .records
            .iter()
            .filter(|record| {
                record
                    .date
                    .map(|stamp| interval.contains(stamp.date()))
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        Dataset {
            date_column: self.date_column.clone(),
            columns: self.columns.clone(),
            records,
        }
    }
    /// Replaces the `season` and `weathersit` codes with display labels
    pub fn map_labels(&mut self, policy: UnmappedPolicy) {
        let season = LabelMap::season();
        let weather = LabelMap::weather();
        for record in self.records.iter_mut() {
            record.season = season.apply(&record.season, policy);
            record.weather = weather.apply(&record.weather, policy);
        }
    }
}

/// Builder for loading a rental dataset from a CSV source
pub struct DatasetLoader {
    path: PathBuf,
    date_column: String,
}
impl Default for DatasetLoader {
    fn default() -> Self {
        Self {
            path: PathBuf::from("hour.csv"),
            date_column: String::from("dteday"),
        }
    }
}
impl DatasetLoader {
    pub fn source<P: AsRef<Path>>(self, path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn date_column<S: Into<String>>(self, column: S) -> Self {
        Self {
            date_column: column.into(),
            ..self
        }
    }
    /// Loads the dataset from the source path
    pub fn load(self) -> Result<Dataset, DatasetError> {
        let file = File::open(&self.path).map_err(|source| DatasetError::Io {
            path: self.path.clone(),
            source,
        })?;
        log::info!("loading {:?}...", self.path);
        let now = Instant::now();
        let dataset = self.load_from_reader(file)?;
        log::info!(
            "... {} records loaded in {}ms",
            dataset.len(),
            now.elapsed().as_millis()
        );
        Ok(dataset)
    }
    /// Loads from any CSV reader, e.g. fixture data in tests or a body
    /// fetched over the network by the caller
    pub fn load_from_reader<R: Read>(self, reader: R) -> Result<Dataset, DatasetError> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let position = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };
        let date_idx = position(&self.date_column)?;
        let season_idx = position(SEASON_COLUMN)?;
        let weather_idx = position(WEATHER_COLUMN)?;
        let special = [date_idx, season_idx, weather_idx];

        let columns: Vec<String> = headers
            .iter()
            .enumerate()
            .filter(|(idx, _)| !special.contains(idx))
            .map(|(_, header)| header.clone())
            .collect();

        let mut records = Vec::new();
        for (row, result) in rdr.records().enumerate() {
            let record = result?;
            let date = parse_date(record.get(date_idx).unwrap_or(""), row, &self.date_column)?;
            let season = parse_code(record.get(season_idx).unwrap_or(""), row, SEASON_COLUMN)?;
            let weather = parse_code(record.get(weather_idx).unwrap_or(""), row, WEATHER_COLUMN)?;
            let mut values = Vec::with_capacity(columns.len());
            for (idx, cell) in record.iter().enumerate() {
                if special.contains(&idx) {
                    continue;
                }
                values.push(parse_number(cell, row, &headers[idx])?);
            }
            records.push(RentalRecord {
                date,
                season,
                weather,
                values,
            });
        }
        Ok(Dataset {
            date_column: self.date_column,
            columns,
            records,
        })
    }
}

/// An empty cell is a missing date; `%Y-%m-%d %H:%M:%S` and bare
/// `%Y-%m-%d` are both accepted
fn parse_date(cell: &str, row: usize, column: &str) -> Result<Option<NaiveDateTime>, DatasetError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(cell, "%Y-%m-%d %H:%M:%S") {
        return Ok(Some(stamp));
    }
    NaiveDate::parse_from_str(cell, "%Y-%m-%d")
        .map(|date| Some(date.and_time(NaiveTime::MIN)))
        .map_err(|source| DatasetError::Date {
            row,
            column: column.to_string(),
            value: cell.to_string(),
            source,
        })
}

fn parse_code(cell: &str, row: usize, column: &str) -> Result<Category, DatasetError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(Category::Missing);
    }
    cell.parse::<i64>()
        .map(Category::Code)
        .map_err(|source| DatasetError::Code {
            row,
            column: column.to_string(),
            value: cell.to_string(),
            source,
        })
}

fn parse_number(cell: &str, row: usize, column: &str) -> Result<f64, DatasetError> {
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>().map_err(|source| DatasetError::Number {
        row,
        column: column.to_string(),
        value: cell.to_string(),
        source,
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub(crate) fn record(
        date: (i32, u32, u32),
        season: i64,
        weather: i64,
        cnt: f64,
    ) -> RentalRecord {
        RentalRecord {
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2)
                .map(|d| d.and_time(NaiveTime::MIN)),
            season: Category::Code(season),
            weather: Category::Code(weather),
            values: vec![cnt],
        }
    }

    /// Two-row dataset with a single `cnt` column
    pub(crate) fn two_rows() -> Dataset {
        Dataset {
            date_column: String::from("dteday"),
            columns: vec![String::from("cnt")],
            records: vec![
                record((2011, 1, 5), 1, 1, 10.0),
                record((2011, 6, 10), 3, 2, 50.0),
            ],
        }
    }
}
