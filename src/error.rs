use crate::{aggregate::AggregateError, dataset::DatasetError, interval::IntervalError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `dataset` module")]
    Dataset(#[from] DatasetError),
    #[error("Error in the `interval` module")]
    Interval(#[from] IntervalError),
    #[error("Error in the `aggregate` module")]
    Aggregate(#[from] AggregateError),
}
