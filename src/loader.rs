use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use csv::StringRecord;
use thiserror::Error;
use tracing::debug;

use crate::data::Bar;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("input file contains no valid rows")]
    Empty,

    #[error("unable to infer timestamp from record: {0:?}")]
    Timestamp(StringRecord),

    #[error("failed to parse numeric field '{field}' from value '{value}'")]
    ParseNumber { field: &'static str, value: String },

    #[error("row has too few columns for a bar: {0:?}")]
    TruncatedRow(StringRecord),

    #[error("unknown time zone '{0}'")]
    UnknownTimezone(String),

    #[error("bar {index} does not come strictly after the bar before it")]
    NonIncreasingTimestamp { index: usize },

    #[error("bar {index} has inconsistent prices: {reason}")]
    InconsistentBar { index: usize, reason: String },
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.trim()
        .parse::<Tz>()
        .map_err(|_| LoaderError::UnknownTimezone(name.to_string()).into())
}

pub fn load_bars_from_csv<P: AsRef<Path>>(path: P, tz: Tz) -> Result<Vec<Bar>> {
    let path_ref = path.as_ref();
    let file = File::open(path_ref).with_context(|| format!("failed to open {:?}", path_ref))?;
    load_bars(file, tz)
}

/// Read bars from CSV rows of `date[,time],open,high,low,close[,volume]`.
///
/// Naive timestamps are interpreted in `tz`. Bars come back sorted by time with
/// `index` set to their position.
pub fn load_bars<R: Read>(source: R, tz: Tz) -> Result<Vec<Bar>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(source);

    let mut bars = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        if let Some(bar) = parse_record(&record, tz)? {
            bars.push(bar);
        }
    }

    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }

    bars.sort_by_key(|bar| bar.timestamp);
    for (index, bar) in bars.iter_mut().enumerate() {
        bar.index = index;
    }
    debug!(count = bars.len(), "parsed bars");
    Ok(bars)
}

fn parse_record(record: &StringRecord, tz: Tz) -> Result<Option<Bar>> {
    // Skip header rows by checking the first field.
    if let Some(first) = record.get(0) {
        let first = first.trim();
        if ["date", "timestamp", "time", "datetime"]
            .iter()
            .any(|name| first.eq_ignore_ascii_case(name))
        {
            return Ok(None);
        }
    }

    let mut fields: Vec<&str> = record.iter().map(str::trim).collect();
    while fields.last().is_some_and(|f| f.is_empty()) {
        fields.pop();
    }
    if fields.len() < 5 {
        return Err(LoaderError::TruncatedRow(record.clone()).into());
    }

    let (timestamp, offset) = if parse_time(fields[1]).is_ok() {
        let datetime = parse_datetime_pair(fields[0], fields[1])
            .map_err(|_| anyhow!(LoaderError::Timestamp(record.clone())))?;
        (localize(datetime, tz), 2)
    } else {
        parse_datetime_string(fields[0], tz)
            .map(|timestamp| (timestamp, 1))
            .ok_or_else(|| anyhow!(LoaderError::Timestamp(record.clone())))?
    };

    let open = parse_number(fields.get(offset).copied(), "open")?;
    let high = parse_number(fields.get(offset + 1).copied(), "high")?;
    let low = parse_number(fields.get(offset + 2).copied(), "low")?;
    let close = parse_number(fields.get(offset + 3).copied(), "close")?;
    let volume = fields
        .get(offset + 4)
        .copied()
        .map(|value| parse_number(Some(value), "volume"))
        .transpose()?;

    Ok(Some(Bar {
        index: 0,
        timestamp: Some(timestamp),
        open,
        high,
        low,
        close,
        volume,
    }))
}

fn localize(datetime: NaiveDateTime, tz: Tz) -> DateTime<Tz> {
    match tz.from_local_datetime(&datetime) {
        chrono::LocalResult::Single(dt) => dt,
        chrono::LocalResult::Ambiguous(dt, _) => dt,
        chrono::LocalResult::None => tz.from_utc_datetime(&datetime),
    }
}

fn parse_number(value: Option<&str>, field: &'static str) -> Result<f64> {
    let value = value.ok_or_else(|| LoaderError::ParseNumber {
        field,
        value: String::from("<missing>"),
    })?;
    value
        .replace(',', "")
        .parse::<f64>()
        .map_err(|_| LoaderError::ParseNumber {
            field,
            value: value.to_string(),
        })
        .map_err(anyhow::Error::from)
}

fn parse_datetime_pair(date_str: &str, time_str: &str) -> Result<NaiveDateTime> {
    let date = parse_date(date_str)?;
    let time = parse_time(time_str)?;
    Ok(NaiveDateTime::new(date, time))
}

/// Single-field timestamps: full date-times, bare dates, or unix seconds.
fn parse_datetime_string(value: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let patterns = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%m/%d/%Y %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
    ];
    for pattern in &patterns {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(localize(datetime, tz));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(localize(date.and_time(NaiveTime::MIN), tz));
    }

    if let Ok(seconds) = value.parse::<i64>() {
        return DateTime::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&tz));
    }

    None
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    let patterns = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
    for pattern in &patterns {
        if let Ok(date) = NaiveDate::parse_from_str(value, pattern) {
            return Ok(date);
        }
    }
    Err(LoaderError::Timestamp(StringRecord::from(vec![value.to_string()])).into())
}

fn parse_time(value: &str) -> Result<NaiveTime> {
    let patterns = ["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];
    for pattern in &patterns {
        if let Ok(time) = NaiveTime::parse_from_str(value, pattern) {
            return Ok(time);
        }
    }
    Err(LoaderError::Timestamp(StringRecord::from(vec![value.to_string()])).into())
}

/// Check ordering and per-bar OHLC consistency before the series is analysed.
pub fn validate_series(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(LoaderError::Empty.into());
    }

    for pair in bars.windows(2) {
        if let (Some(previous), Some(current)) = (pair[0].timestamp, pair[1].timestamp) {
            if current <= previous {
                return Err(LoaderError::NonIncreasingTimestamp {
                    index: pair[1].index,
                }
                .into());
            }
        }
    }

    for bar in bars {
        let reason = if bar.high < bar.open.max(bar.close) {
            Some(format!(
                "high {} below open/close {}/{}",
                bar.high, bar.open, bar.close
            ))
        } else if bar.low > bar.open.min(bar.close) {
            Some(format!(
                "low {} above open/close {}/{}",
                bar.low, bar.open, bar.close
            ))
        } else if bar.volume.is_some_and(|volume| volume < 0.0) {
            Some(String::from("negative volume"))
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(LoaderError::InconsistentBar {
                index: bar.index,
                reason,
            }
            .into());
        }
    }

    Ok(())
}
