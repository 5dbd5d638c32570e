mod error;
pub mod prompt;

pub use error::Error;
pub use prompt::{Prompter, Query};
pub type Result<T> = std::result::Result<T, Error>;

use avdata::{AvClient, Function, TimeSeries};
use log::{debug, warn};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use stockchart::{RenderRequest, Rendered};

/// source of time series tables
pub trait Fetch {
    fn fetch(
        &self,
        symbol: &str,
        function: Function,
        interval: Option<&str>,
    ) -> avdata::Result<TimeSeries>;
}

impl Fetch for AvClient {
    fn fetch(
        &self,
        symbol: &str,
        function: Function,
        interval: Option<&str>,
    ) -> avdata::Result<TimeSeries> {
        self.time_series(symbol, function, interval)
    }
}

#[derive(Debug, Clone)]
pub struct Options {
    pub output: PathBuf,
    pub open: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            output: PathBuf::from(stockchart::DEFAULT_OUTPUT),
            open: true,
        }
    }
}

/// how one session ended
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Aborted,
    FetchFailed,
    NoData,
    Rendered(Rendered),
}

/// user facing text of a failed fetch
pub fn fetch_failure_message(err: &avdata::Error) -> String {
    use avdata::Error::*;
    match err {
        RateLimited(_) => "API call limit reached. Please wait and try again later.".to_owned(),
        Api(_) => "Error: Invalid stock symbol or function. Please check input".to_owned(),
        Unexpected(_) => {
            "Unexpected API response or response format. No time series data found.".to_owned()
        }
        Reqwest(e) => format!("Networking error: {}", e),
        Status(code) => format!("Networking error: HTTP status {}", code),
        Client(s) => format!("Networking error: {}", s),
        Json(_) | Parse(_) => {
            "Error occured while attempting to parse API response. Please try again.".to_owned()
        }
    }
}

/// prompt, fetch once, then render once
///
/// fetch and render failures end the session with a message,
/// only io and drawing errors are returned
pub fn run_session<R, W, F>(input: R, output: W, fetcher: &F, opts: &Options) -> Result<Outcome>
where
    R: BufRead,
    W: Write,
    F: Fetch,
{
    let mut prompter = Prompter::new(input, output);
    let query = match prompter.query()? {
        Some(q) => q,
        None => return Ok(Outcome::Aborted),
    };
    debug!("query: {:?}", query);

    let series = match fetcher.fetch(&query.symbol, query.function, query.interval.as_deref()) {
        Ok(series) => series,
        Err(err) => {
            warn!("fetch failed: {}", err);
            prompter.say(&fetch_failure_message(&err))?;
            return Ok(Outcome::FetchFailed);
        }
    };

    let req = RenderRequest {
        symbol: query.symbol,
        range: query.range,
        kind: query.kind,
        output: opts.output.clone(),
    };
    let rendered = match stockchart::render(&series, &req) {
        Ok(rendered) => rendered,
        Err(stockchart::Error::NoData) => {
            prompter.say("No data available for the selected date range.")?;
            return Ok(Outcome::NoData);
        }
        Err(err) => return Err(err.into()),
    };
    prompter.say(&format!("Chart saved to {}", rendered.path.display()))?;
    if opts.open {
        if let Err(err) = stockchart::open(&rendered.path) {
            prompter.say(&format!("Could not open chart: {}", err))?;
        }
    }
    Ok(Outcome::Rendered(rendered))
}
