#[derive(Debug)]
pub struct Error(pub String);

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Error {
        Error(format!("{}", err))
    }
}

impl From<avdata::Error> for Error {
    fn from(err: avdata::Error) -> Error {
        Error(format!("{}", err))
    }
}

impl From<stockchart::Error> for Error {
    fn from(err: stockchart::Error) -> Error {
        Error(format!("{}", err))
    }
}
