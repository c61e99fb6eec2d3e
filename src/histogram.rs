use crate::normalize::CallRecord;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde_json::Value;
use std::fmt;

pub const HOURS_PER_DAY: usize = 24;

const RECORD_DATE_FIELD: &str = "data";
const RECORD_TIME_FIELD: &str = "hora";
const RECORD_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One hour of one calendar day, rendered as `YYYY-MM-DD HH:00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HourBucket {
    pub date: NaiveDate,
    pub hour: u32,
}

impl HourBucket {
    /// `HH:00`, used as the chart label.
    pub fn hour_label(&self) -> String {
        format!("{:02}:00", self.hour)
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:02}:00", self.date.format("%Y-%m-%d"), self.hour)
    }
}

/// What happened to the records fed to [`aggregate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    pub counted: usize,
    /// Missing or unparseable `data`/`hora`.
    pub malformed: usize,
    /// Valid timestamp on another day.
    pub other_day: usize,
}

/// Calls per hour for a single day. Always holds all 24 hours.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlyHistogram {
    date: NaiveDate,
    counts: [u64; HOURS_PER_DAY],
    stats: AggregationStats,
}

impl HourlyHistogram {
    pub fn empty(date: NaiveDate) -> Self {
        HourlyHistogram {
            date,
            counts: [0; HOURS_PER_DAY],
            stats: AggregationStats::default(),
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn stats(&self) -> AggregationStats {
        self.stats
    }

    #[cfg(test)]
    pub fn count(&self, hour: u32) -> u64 {
        self.counts.get(hour as usize).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn max(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Buckets in chronological order, which is also their key order.
    pub fn iter(&self) -> impl Iterator<Item = (HourBucket, u64)> + '_ {
        self.counts.iter().enumerate().map(move |(hour, &count)| {
            (
                HourBucket {
                    date: self.date,
                    hour: hour as u32,
                },
                count,
            )
        })
    }

    fn record(&mut self, timestamp: NaiveDateTime) {
        if timestamp.date() != self.date {
            self.stats.other_day += 1;
            return;
        }
        self.counts[timestamp.hour() as usize] += 1;
        self.stats.counted += 1;
    }
}

fn record_timestamp(record: &CallRecord) -> Option<NaiveDateTime> {
    let date = record
        .get(RECORD_DATE_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;
    let time = record
        .get(RECORD_TIME_FIELD)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())?;

    NaiveDateTime::parse_from_str(&format!("{} {}", date, time), RECORD_TIMESTAMP_FORMAT).ok()
}

/// Count calls per hour of `date`.
///
/// Records without a usable timestamp are skipped and records from other days
/// are dropped; neither stops the batch.
pub fn aggregate(date: NaiveDate, records: &[CallRecord]) -> HourlyHistogram {
    let mut histogram = HourlyHistogram::empty(date);

    for record in records {
        match record_timestamp(record) {
            Some(timestamp) => histogram.record(timestamp),
            None => histogram.stats.malformed += 1,
        }
    }

    let stats = histogram.stats;
    tracing::debug!(
        counted = stats.counted,
        malformed = stats.malformed,
        other_day = stats.other_day,
        "aggregated {} records for {}",
        records.len(),
        date
    );

    histogram
}
