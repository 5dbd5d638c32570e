//! Closing price charts of Alpha Vantage time series

mod datetime;
mod error;
pub mod render;

pub use datetime::{parse_date, DateRange, DATE_FORMAT};
pub use error::Error;
pub use render::{open, render, slice, ChartKind, RenderRequest, Rendered, DEFAULT_OUTPUT};

pub type Result<T> = std::result::Result<T, Error>;
