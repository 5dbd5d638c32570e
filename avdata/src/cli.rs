use crate::error::Error;
use crate::model::{Function, TimeSeries};
use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// where and how to call the api
#[derive(Debug, Clone, PartialEq)]
pub struct AvConfig {
    pub base_url: String,
    pub api_key: String,
}

impl AvConfig {
    pub fn new(api_key: &str) -> Self {
        AvConfig {
            base_url: DEFAULT_BASE_URL.to_owned(),
            api_key: api_key.to_owned(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_owned();
        self
    }
}

pub struct AvClient {
    config: AvConfig,
    client: Client,
}

impl AvClient {
    pub fn new(config: AvConfig) -> Self {
        AvClient {
            config,
            client: Client::new(),
        }
    }

    pub fn config(&self) -> &AvConfig {
        &self.config
    }

    /// build the query url of one time series request
    pub fn request_url(
        &self,
        symbol: &str,
        function: Function,
        interval: Option<&str>,
    ) -> Result<Url, Error> {
        let mut params = vec![
            ("function", function.as_str()),
            ("symbol", symbol),
            ("apikey", self.config.api_key.as_str()),
            ("datatype", "json"),
        ];
        if let Some(interval) = interval {
            params.push(("interval", interval));
        }
        Url::parse_with_params(&self.config.base_url, &params)
            .map_err(|e| Error::Client(format!("invalid base url {}: {}", self.config.base_url, e)))
    }

    /// fetch one time series table with a single GET
    pub fn time_series(
        &self,
        symbol: &str,
        function: Function,
        interval: Option<&str>,
    ) -> Result<TimeSeries, Error> {
        let url = self.request_url(symbol, function, interval)?;
        debug!("request: {}", self.masked(url.as_str()));
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }
        let body = response.text()?;
        let series = TimeSeries::from_payload(&body)?;
        info!("fetched {} rows of {} for {}", series.len(), series.name(), symbol);
        Ok(series)
    }

    fn masked(&self, url: &str) -> String {
        if self.config.api_key.is_empty() {
            return url.to_owned();
        }
        url.replace(&self.config.api_key, "***")
    }
}
