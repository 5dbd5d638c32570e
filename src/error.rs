use chrono::NaiveDate;
use std::fmt;

#[derive(Debug)]
pub enum Error {
    // nothing left after slicing to the requested range
    NoData,
    DateFormat(String),
    DateOrder { start: NaiveDate, end: NaiveDate },
    ChartKind(String),
    Draw(String),
    Open(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::NoData => f.write_str("no data in range"),
            Error::DateFormat(ref s) => write!(f, "invalid date format: {:?}", s),
            Error::DateOrder { start, end } => {
                write!(f, "end date {} is before start date {}", end, start)
            }
            Error::ChartKind(ref s) => write!(f, "invalid chart kind: {:?}", s),
            Error::Draw(ref s) => write!(f, "draw error: {}", s),
            Error::Open(ref s) => write!(f, "open error: {}", s),
        }
    }
}

impl std::error::Error for Error {}

impl From<opener::OpenError> for Error {
    fn from(err: opener::OpenError) -> Error {
        Error::Open(format!("{}", err))
    }
}
