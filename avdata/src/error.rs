use std::fmt;

#[derive(Debug)]
pub enum Error {
    // transport level failure: connect, timeout, body read
    Reqwest(reqwest::Error),
    // non-2xx http status
    Status(u16),
    // "Note" marker, or "Information" about call frequency
    RateLimited(String),
    // "Error Message" marker
    Api(String),
    // no recognizable time series in payload
    Unexpected(String),
    // body is not json
    Json(serde_json::Error),
    // dates or fields not numeric
    Parse(String),
    Client(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Reqwest(ref err) => write!(f, "Reqwest error: {}", err),
            Error::Status(code) => write!(f, "HTTP status error: {}", code),
            Error::RateLimited(ref s) => write!(f, "Rate limited: {}", s),
            Error::Api(ref s) => write!(f, "API error: {}", s),
            Error::Unexpected(ref s) => write!(f, "Unexpected response: {}", s),
            Error::Json(ref err) => write!(f, "Json error: {}", err),
            Error::Parse(ref s) => write!(f, "Parse error: {}", s),
            Error::Client(ref s) => write!(f, "Client error: {}", s),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Reqwest(ref err) => Some(err),
            Error::Json(ref err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Error {
        Error::Reqwest(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Error {
        Error::Json(err)
    }
}

impl From<chrono::ParseError> for Error {
    fn from(err: chrono::ParseError) -> Error {
        Error::Parse(format!("{}", err))
    }
}
