use crate::error::Error;
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use serde_derive::*;
use serde_json::{Map, Value};
use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeBounds;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DATETIME_MINUTE_FORMAT: &str = "%Y-%m-%d %H:%M";

const TIME_SERIES_MARKER: &str = "Time Series";
const NOTE_KEY: &str = "Note";
const ERROR_MESSAGE_KEY: &str = "Error Message";
const INFORMATION_KEY: &str = "Information";

/// time series function of alpha vantage api
///
/// selects the granularity of returned series
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Function {
    #[serde(rename = "TIME_SERIES_INTRADAY")]
    Intraday,
    #[serde(rename = "TIME_SERIES_DAILY")]
    Daily,
    #[serde(rename = "TIME_SERIES_DAILY_ADJUSTED")]
    DailyAdjusted,
    #[serde(rename = "TIME_SERIES_WEEKLY")]
    Weekly,
    #[serde(rename = "TIME_SERIES_WEEKLY_ADJUSTED")]
    WeeklyAdjusted,
    #[serde(rename = "TIME_SERIES_MONTHLY")]
    Monthly,
    #[serde(rename = "TIME_SERIES_MONTHLY_ADJUSTED")]
    MonthlyAdjusted,
}

impl Function {
    /// all functions in menu order
    pub const ALL: [Function; 7] = [
        Function::Intraday,
        Function::Daily,
        Function::DailyAdjusted,
        Function::Weekly,
        Function::WeeklyAdjusted,
        Function::Monthly,
        Function::MonthlyAdjusted,
    ];

    pub fn as_str(&self) -> &'static str {
        match *self {
            Function::Intraday => "TIME_SERIES_INTRADAY",
            Function::Daily => "TIME_SERIES_DAILY",
            Function::DailyAdjusted => "TIME_SERIES_DAILY_ADJUSTED",
            Function::Weekly => "TIME_SERIES_WEEKLY",
            Function::WeeklyAdjusted => "TIME_SERIES_WEEKLY_ADJUSTED",
            Function::Monthly => "TIME_SERIES_MONTHLY",
            Function::MonthlyAdjusted => "TIME_SERIES_MONTHLY_ADJUSTED",
        }
    }

    /// numeric key shown in the selection menu, 1 based
    pub fn menu_key(&self) -> usize {
        Function::ALL
            .iter()
            .position(|f| f == self)
            .map(|i| i + 1)
            .unwrap_or_default()
    }

    pub fn from_menu_key(key: &str) -> Option<Function> {
        let idx: usize = key.trim().parse().ok()?;
        if idx == 0 {
            return None;
        }
        Function::ALL.get(idx - 1).copied()
    }

    pub fn is_intraday(&self) -> bool {
        *self == Function::Intraday
    }

    pub fn is_adjusted(&self) -> bool {
        match *self {
            Function::DailyAdjusted | Function::WeeklyAdjusted | Function::MonthlyAdjusted => true,
            _ => false,
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// enable parse api name to function
impl FromStr for Function {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Function::ALL
            .iter()
            .find(|f| f.as_str() == s)
            .copied()
            .ok_or_else(|| Error::Client(format!("invalid function: {}", s)))
    }
}

/// one row of time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub adjusted_close: Option<f64>,
    pub dividend_amount: Option<f64>,
    pub split_coefficient: Option<f64>,
}

impl Bar {
    // every field must be numeric, unknown fields are checked then dropped
    fn from_fields(ts: &str, fields: &Map<String, Value>) -> Result<Self, Error> {
        let mut values = BTreeMap::new();
        for (key, value) in fields {
            let name = field_name(key);
            let num = parse_number(value).ok_or_else(|| {
                Error::Parse(format!("non-numeric field {:?} at {}: {}", key, ts, value))
            })?;
            values.insert(name, num);
        }
        let required = |name: &str| {
            values
                .get(name)
                .copied()
                .ok_or_else(|| Error::Parse(format!("missing field {:?} at {}", name, ts)))
        };
        Ok(Bar {
            open: required("open")?,
            high: required("high")?,
            low: required("low")?,
            close: required("close")?,
            volume: required("volume")?,
            adjusted_close: values.get("adjusted close").copied(),
            dividend_amount: values.get("dividend amount").copied(),
            split_coefficient: values.get("split coefficient").copied(),
        })
    }
}

// "4. close" -> "close"
fn field_name(key: &str) -> String {
    let name = match key.find(". ") {
        Some(idx) if key[..idx].chars().all(|c| c.is_ascii_digit()) => &key[idx + 2..],
        _ => key,
    };
    name.trim().to_lowercase()
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_f64(),
        _ => None,
    }
}

/// parse series key, daily keys are taken at midnight
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, Error> {
    let s = s.trim();
    match s.len() {
        10 => {
            let d = NaiveDate::parse_from_str(s, DATE_FORMAT)?;
            d.and_hms_opt(0, 0, 0)
                .ok_or_else(|| Error::Parse(format!("invalid date: {}", s)))
        }
        16 => Ok(NaiveDateTime::parse_from_str(s, DATETIME_MINUTE_FORMAT)?),
        19 => Ok(NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)?),
        _ => Err(Error::Parse(format!("invalid timestamp format: {}", s))),
    }
}

/// date indexed table of bars, ascending and unique by construction
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    name: String,
    bars: BTreeMap<NaiveDateTime, Bar>,
}

impl TimeSeries {
    pub fn new(name: impl Into<String>, bars: BTreeMap<NaiveDateTime, Bar>) -> Self {
        TimeSeries {
            name: name.into(),
            bars,
        }
    }

    /// inspect a raw response body
    ///
    /// markers are checked before the series itself, so a payload
    /// carrying "Note" is rate limited whatever else it contains
    pub fn from_payload(body: &str) -> Result<Self, Error> {
        let payload: Value = serde_json::from_str(body)?;
        let obj = match payload {
            Value::Object(obj) => obj,
            other => {
                return Err(Error::Unexpected(format!(
                    "top level is not an object: {}",
                    type_name(&other)
                )))
            }
        };
        if let Some(note) = obj.get(NOTE_KEY) {
            return Err(Error::RateLimited(marker_text(note)));
        }
        if let Some(msg) = obj.get(ERROR_MESSAGE_KEY) {
            return Err(Error::Api(marker_text(msg)));
        }
        if let Some(info) = obj.get(INFORMATION_KEY) {
            let info = marker_text(info);
            if is_throttle_notice(&info) {
                return Err(Error::RateLimited(info));
            }
            warn!("Alpha Vantage information: {}", info);
        }
        if let Some(symbol) = obj
            .get("Meta Data")
            .and_then(|m| m.get("2. Symbol"))
            .and_then(Value::as_str)
        {
            debug!("payload symbol: {}", symbol);
        }

        let mut keys = obj.keys().filter(|k| k.contains(TIME_SERIES_MARKER));
        let key = match (keys.next(), keys.next()) {
            (Some(key), None) => key.clone(),
            (None, _) => {
                return Err(Error::Unexpected(
                    "no time series field in response".to_owned(),
                ))
            }
            (Some(a), Some(b)) => {
                return Err(Error::Unexpected(format!(
                    "ambiguous time series fields: {:?}, {:?}",
                    a, b
                )))
            }
        };
        let rows = match obj.get(&key) {
            Some(Value::Object(rows)) => rows,
            _ => {
                return Err(Error::Unexpected(format!(
                    "time series field {:?} is not an object",
                    key
                )))
            }
        };

        let mut bars = BTreeMap::new();
        for (ts, fields) in rows {
            let fields = match fields {
                Value::Object(fields) => fields,
                _ => {
                    return Err(Error::Unexpected(format!(
                        "row {} of {:?} is not an object",
                        ts, key
                    )))
                }
            };
            let dt = parse_timestamp(ts)?;
            if bars.insert(dt, Bar::from_fields(ts, fields)?).is_some() {
                return Err(Error::Parse(format!("duplicate timestamp: {}", ts)));
            }
        }
        Ok(TimeSeries::new(key, bars))
    }

    /// name of the series field, e.g. "Time Series (Daily)"
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, ts: &NaiveDateTime) -> Option<&Bar> {
        self.bars.get(ts)
    }

    /// ascending iteration
    pub fn iter(&self) -> btree_map::Iter<'_, NaiveDateTime, Bar> {
        self.bars.iter()
    }

    pub fn range<R>(&self, range: R) -> btree_map::Range<'_, NaiveDateTime, Bar>
    where
        R: RangeBounds<NaiveDateTime>,
    {
        self.bars.range(range)
    }

    pub fn first(&self) -> Option<(&NaiveDateTime, &Bar)> {
        self.bars.iter().next()
    }

    pub fn last(&self) -> Option<(&NaiveDateTime, &Bar)> {
        self.bars.iter().next_back()
    }
}

fn marker_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn is_throttle_notice(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("call frequency") || msg.contains("rate limit")
}

fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
