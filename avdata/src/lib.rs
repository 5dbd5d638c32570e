//! Client of the Alpha Vantage time series api
//!
//! One request per call, the response body is inspected for the
//! api's error markers and turned into a date indexed table.

pub mod cli;
pub mod error;
pub mod model;

pub use cli::{AvClient, AvConfig, DEFAULT_BASE_URL};
pub use error::Error;
pub use model::{Bar, Function, TimeSeries};

pub type Result<T> = std::result::Result<T, Error>;
