//! Rendering of closing prices
//!
//! The table is already ascending, slicing keeps that order.
//! Points are placed by position on the x axis, so daily and
//! intraday series share one layout and gaps such as weekends
//! are not drawn.

use crate::{DateRange, Error, Result};
use avdata::{Bar, TimeSeries};
use chrono::{NaiveDateTime, Timelike};
use log::{debug, info, warn};
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::FontTransform;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const DEFAULT_OUTPUT: &str = "stock_chart.svg";

const CHART_SIZE: (u32, u32) = (1000, 500);
const MAX_X_LABELS: usize = 12;
const FONT: &str = "sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
        }
    }
}

/// case insensitive, surrounding whitespace ignored
impl FromStr for ChartKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match &s.trim().to_lowercase()[..] {
            "line" => Ok(ChartKind::Line),
            "bar" => Ok(ChartKind::Bar),
            _ => Err(Error::ChartKind(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub symbol: String,
    pub range: DateRange,
    pub kind: ChartKind,
    pub output: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub path: PathBuf,
    pub points: usize,
}

/// rows whose calendar date lies in the range, ascending
pub fn slice<'a>(series: &'a TimeSeries, range: &DateRange) -> Vec<(NaiveDateTime, &'a Bar)> {
    let from = range.start().and_hms_opt(0, 0, 0);
    let until = range.end().succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0));
    match (from, until) {
        (Some(from), Some(until)) => series
            .range(from..until)
            .map(|(ts, bar)| (*ts, bar))
            .collect(),
        // end is the last representable date
        _ => series
            .iter()
            .filter(|(ts, _)| range.include(ts))
            .map(|(ts, bar)| (*ts, bar))
            .collect(),
    }
}

/// draw the sliced closing prices and save them
///
/// An empty slice is reported as `Error::NoData` and leaves the
/// output path untouched.
pub fn render(series: &TimeSeries, req: &RenderRequest) -> Result<Rendered> {
    let points = slice(series, &req.range);
    debug!(
        "{} of {} rows in range {}",
        points.len(),
        series.len(),
        req.range
    );
    if points.is_empty() {
        return Err(Error::NoData);
    }
    draw(&points, req)?;
    info!("{} chart of {} saved to {}", req.kind, req.symbol, req.output.display());
    Ok(Rendered {
        path: req.output.clone(),
        points: points.len(),
    })
}

/// open the artifact with the default viewer of the os
pub fn open(path: &Path) -> Result<()> {
    opener::open(path).map_err(|e| {
        warn!("failed to open {}: {}", path.display(), e);
        Error::from(e)
    })
}

pub fn title(symbol: &str, range: &DateRange) -> String {
    format!(
        "Stock Data for {} ({} to {})",
        symbol,
        range.start(),
        range.end()
    )
}

fn draw_err<E: fmt::Display>(err: E) -> Error {
    Error::Draw(format!("{}", err))
}

fn draw(points: &[(NaiveDateTime, &Bar)], req: &RenderRequest) -> Result<()> {
    let n = points.len() as u32;
    let intraday = points
        .iter()
        .any(|(ts, _)| ts.num_seconds_from_midnight() != 0);
    let labels: Vec<String> = points
        .iter()
        .map(|(ts, _)| {
            if intraday {
                ts.format("%Y-%m-%d %H:%M").to_string()
            } else {
                ts.format("%Y-%m-%d").to_string()
            }
        })
        .collect();
    let (y_lo, y_hi) = y_bounds(points.iter().map(|(_, bar)| bar.close), req.kind);

    let root = SVGBackend::new(&req.output, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title(&req.symbol, &req.range), (FONT, 22))
        .margin(10)
        .x_label_area_size(if intraday { 120 } else { 90 })
        .y_label_area_size(70)
        .build_cartesian_2d((0u32..n).into_segmented(), y_lo..y_hi)
        .map_err(draw_err)?;

    let label_of = |v: &SegmentValue<u32>| match v {
        SegmentValue::Exact(i) | SegmentValue::CenterOf(i) => {
            labels.get(*i as usize).cloned().unwrap_or_default()
        }
        SegmentValue::Last => String::new(),
    };
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Closing Price (USD)")
        .x_labels(points.len().min(MAX_X_LABELS))
        .x_label_formatter(&label_of)
        .x_label_style((FONT, 12).into_font().transform(FontTransform::Rotate90))
        .draw()
        .map_err(draw_err)?;

    let legend = format!("{} Closing Price", req.symbol);
    match req.kind {
        ChartKind::Line => {
            chart
                .draw_series(LineSeries::new(
                    points
                        .iter()
                        .enumerate()
                        .map(|(i, (_, bar))| (SegmentValue::CenterOf(i as u32), bar.close)),
                    &BLUE,
                ))
                .map_err(draw_err)?
                .label(legend)
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
        }
        ChartKind::Bar => {
            chart
                .draw_series(
                    Histogram::vertical(&chart)
                        .style(BLUE.filled())
                        .margin(1)
                        .data(
                            points
                                .iter()
                                .enumerate()
                                .map(|(i, (_, bar))| (i as u32, bar.close)),
                        ),
                )
                .map_err(draw_err)?
                .label(legend)
                .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], BLUE.filled()));
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

// bars grow from zero, a line only needs some headroom
fn y_bounds<I: Iterator<Item = f64>>(closes: I, kind: ChartKind) -> (f64, f64) {
    let (min, max) = closes.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), c| {
        (lo.min(c), hi.max(c))
    });
    let span = max - min;
    let pad = if span > 0.0 {
        span * 0.05
    } else if max != 0.0 {
        max.abs() * 0.05
    } else {
        1.0
    };
    match kind {
        ChartKind::Bar if min >= 0.0 => (0.0, max + pad),
        _ => (min - pad, max + pad),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn bar(close: f64) -> Bar {
        Bar {
            open: close,
            high: close,
            low: close,
            close,
            volume: 1000.0,
            adjusted_close: None,
            dividend_amount: None,
            split_coefficient: None,
        }
    }

    fn ten_days() -> TimeSeries {
        let mut bars = BTreeMap::new();
        for day in 1..=10 {
            let ts = NaiveDate::from_ymd_opt(2024, 1, day)
                .and_then(|d| d.and_hms_opt(0, 0, 0))
                .unwrap();
            bars.insert(ts, bar(100.0 + day as f64));
        }
        TimeSeries::new("Time Series (Daily)", bars)
    }

    #[test]
    fn test_chart_kind_parse() {
        assert_eq!(ChartKind::Line, "  LINE ".parse::<ChartKind>().unwrap());
        assert_eq!(ChartKind::Bar, "Bar".parse::<ChartKind>().unwrap());
        assert!("bars".parse::<ChartKind>().is_err());
        assert!("".parse::<ChartKind>().is_err());
    }

    #[test]
    fn test_chart_kind_rename() {
        assert_eq!("\"line\"", serde_json::to_string(&ChartKind::Line).unwrap());
        assert_eq!(
            ChartKind::Bar,
            serde_json::from_str::<ChartKind>("\"bar\"").unwrap()
        );
    }

    #[test]
    fn test_slice_inclusive() -> Result<()> {
        let series = ten_days();
        let range = DateRange::parse("2024-01-03", "2024-01-05")?;
        let days: Vec<String> = slice(&series, &range)
            .iter()
            .map(|(ts, _)| ts.date().to_string())
            .collect();
        assert_eq!(vec!["2024-01-03", "2024-01-04", "2024-01-05"], days);
        Ok(())
    }

    #[test]
    fn test_slice_intraday_end_date() -> Result<()> {
        let mut bars = BTreeMap::new();
        for s in &["2024-01-04 19:55:00", "2024-01-05 09:30:00", "2024-01-05 20:00:00", "2024-01-06 04:00:00"] {
            bars.insert(
                NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap(),
                bar(1.0),
            );
        }
        let series = TimeSeries::new("Time Series (5min)", bars);
        let range = DateRange::parse("2024-01-05", "2024-01-05")?;
        assert_eq!(2, slice(&series, &range).len());
        Ok(())
    }

    #[test]
    fn test_slice_outside() -> Result<()> {
        let series = ten_days();
        let range = DateRange::parse("2023-01-01", "2023-12-31")?;
        assert!(slice(&series, &range).is_empty());
        Ok(())
    }

    #[test]
    fn test_title() -> Result<()> {
        let range = DateRange::parse("2024-01-03", "2024-01-05")?;
        assert_eq!(
            "Stock Data for IBM (2024-01-03 to 2024-01-05)",
            title("IBM", &range)
        );
        Ok(())
    }

    #[test]
    fn test_y_bounds() {
        let (lo, hi) = y_bounds(vec![10.0, 20.0].into_iter(), ChartKind::Line);
        assert!((lo - 9.5).abs() < 1e-9);
        assert!((hi - 20.5).abs() < 1e-9);
        let (lo, _) = y_bounds(vec![10.0, 20.0].into_iter(), ChartKind::Bar);
        assert_eq!(0.0, lo);
        // flat series still gets a non-empty range
        let (lo, hi) = y_bounds(vec![5.0].into_iter(), ChartKind::Line);
        assert!(lo < 5.0 && hi > 5.0);
    }
}
