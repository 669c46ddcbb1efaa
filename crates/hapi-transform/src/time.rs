//! Time axis conversion for HAPI isotime columns.
//!
//! HAPI servers emit a small, closed set of truncated ISO-8601 shapes. The
//! format is inferred from one example by exact segment length and applied
//! to the whole column; anything outside the table is rejected.
//!
//! | date length | pattern      |   | time length | pattern           |
//! |-------------|--------------|---|-------------|-------------------|
//! | 4           | `%Y`         |   | 0           | (none)            |
//! | 6           | `%Y%m`       |   | 2           | `%H`              |
//! | 7           | `%Y-%m`/`%Y%j` |  | 4           | `%H%M`            |
//! | 8           | `%Y-%j`/`%Y%m%d` | | 5         | `%H:%M`           |
//! | 10          | `%Y-%m-%d`   |   | 6           | `%H%M%S`          |
//! |             |              |   | 8           | `%H:%M:%S`        |
//! |             |              |   | > 9         | `%H:%M:%S%.f`     |

use std::fmt;

use chrono::NaiveDateTime;
use chrono::format::{self, Parsed, StrftimeItems};
use tracing::debug;

use crate::error::FormatError;

/// Date segment shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePattern {
    Year,
    /// `YYYYMM`
    YearMonthCompact,
    /// `YYYY-MM`
    YearMonth,
    /// `YYYYDDD`
    YearDayCompact,
    /// `YYYY-DDD`
    YearDay,
    /// `YYYYMMDD`
    YearMonthDayCompact,
    /// `YYYY-MM-DD`
    YearMonthDay,
}

impl DatePattern {
    /// Pick the pattern for a date segment by its exact length. Lengths 7 and
    /// 8 are disambiguated by a `-` at offset 4.
    pub fn for_segment(segment: &str) -> Option<Self> {
        let dash = segment.as_bytes().get(4) == Some(&b'-');
        match segment.len() {
            4 => Some(DatePattern::Year),
            6 => Some(DatePattern::YearMonthCompact),
            7 if dash => Some(DatePattern::YearMonth),
            7 => Some(DatePattern::YearDayCompact),
            8 if dash => Some(DatePattern::YearDay),
            8 => Some(DatePattern::YearMonthDayCompact),
            10 => Some(DatePattern::YearMonthDay),
            _ => None,
        }
    }

    pub fn as_strftime(&self) -> &'static str {
        match self {
            DatePattern::Year => "%Y",
            DatePattern::YearMonthCompact => "%Y%m",
            DatePattern::YearMonth => "%Y-%m",
            DatePattern::YearDayCompact => "%Y%j",
            DatePattern::YearDay => "%Y-%j",
            DatePattern::YearMonthDayCompact => "%Y%m%d",
            DatePattern::YearMonthDay => "%Y-%m-%d",
        }
    }

    pub fn segment_len(&self) -> usize {
        match self {
            DatePattern::Year => 4,
            DatePattern::YearMonthCompact => 6,
            DatePattern::YearMonth | DatePattern::YearDayCompact => 7,
            DatePattern::YearDay | DatePattern::YearMonthDayCompact => 8,
            DatePattern::YearMonthDay => 10,
        }
    }
}

/// Time segment shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimePattern {
    /// No time segment, or nothing after the `T`.
    Absent,
    Hour,
    /// `HHMM`
    HourMinuteCompact,
    /// `HH:MM`
    HourMinute,
    /// `HHMMSS`
    HourMinuteSecondCompact,
    /// `HH:MM:SS`
    HourMinuteSecond,
    /// `HH:MM:SS.` followed by `digits` fractional digits.
    Fractional { digits: usize },
}

impl TimePattern {
    pub fn for_segment(segment: &str) -> Option<Self> {
        match segment.len() {
            0 => Some(TimePattern::Absent),
            2 => Some(TimePattern::Hour),
            4 => Some(TimePattern::HourMinuteCompact),
            5 => Some(TimePattern::HourMinute),
            6 => Some(TimePattern::HourMinuteSecondCompact),
            8 => Some(TimePattern::HourMinuteSecond),
            len if len > 9 => Some(TimePattern::Fractional { digits: len - 9 }),
            _ => None,
        }
    }

    pub fn as_strftime(&self) -> &'static str {
        match self {
            TimePattern::Absent => "",
            TimePattern::Hour => "%H",
            TimePattern::HourMinuteCompact => "%H%M",
            TimePattern::HourMinute => "%H:%M",
            TimePattern::HourMinuteSecondCompact => "%H%M%S",
            TimePattern::HourMinuteSecond => "%H:%M:%S",
            TimePattern::Fractional { .. } => "%H:%M:%S%.f",
        }
    }

    pub fn segment_len(&self) -> usize {
        match self {
            TimePattern::Absent => 0,
            TimePattern::Hour => 2,
            TimePattern::HourMinuteCompact => 4,
            TimePattern::HourMinute => 5,
            TimePattern::HourMinuteSecondCompact => 6,
            TimePattern::HourMinuteSecond => 8,
            TimePattern::Fractional { digits } => 9 + digits,
        }
    }
}

/// Parse-format descriptor inferred from an example timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeFormat {
    pub date: DatePattern,
    pub time: TimePattern,
    /// The example ended in a literal `Z`.
    pub zulu: bool,
}

impl TimeFormat {
    /// Infer the format from one example string.
    pub fn infer(example: &str) -> Result<Self, FormatError> {
        let (body, zulu) = strip_zulu(example);
        let (date, time) = split_segments(body);
        let date = DatePattern::for_segment(date).ok_or_else(|| FormatError::DateLength {
            value: example.to_string(),
            length: date.len(),
        })?;
        let time = TimePattern::for_segment(time).ok_or_else(|| FormatError::TimeLength {
            value: example.to_string(),
            length: time.len(),
        })?;
        Ok(Self { date, time, zulu })
    }

    /// The composed chrono format string, e.g. `%Y-%jT%H:%M:%S%.fZ`.
    pub fn as_strftime(&self) -> String {
        let mut out = self.date.as_strftime().to_string();
        if self.time != TimePattern::Absent {
            out.push('T');
            out.push_str(self.time.as_strftime());
        }
        if self.zulu {
            out.push('Z');
        }
        out
    }

    /// Parse one value. Fields the pattern does not carry default to the
    /// start of their period (January, the 1st, midnight).
    pub fn parse(&self, value: &str) -> Result<NaiveDateTime, String> {
        let (body, zulu) = strip_zulu(value);
        if zulu != self.zulu {
            return Err(if self.zulu {
                "missing trailing Z".to_string()
            } else {
                "unexpected trailing Z".to_string()
            });
        }
        let (date, time) = split_segments(body);
        if date.len() != self.date.segment_len() {
            return Err(format!(
                "date has {} characters, expected {}",
                date.len(),
                self.date.segment_len()
            ));
        }
        if time.len() != self.time.segment_len() {
            return Err(format!(
                "time has {} characters, expected {}",
                time.len(),
                self.time.segment_len()
            ));
        }

        let mut parsed = Parsed::new();
        format::parse(
            &mut parsed,
            date,
            StrftimeItems::new(self.date.as_strftime()),
        )
        .map_err(|err| err.to_string())?;
        if self.time != TimePattern::Absent {
            format::parse(
                &mut parsed,
                time,
                StrftimeItems::new(self.time.as_strftime()),
            )
            .map_err(|err| err.to_string())?;
        }
        self.fill_defaults(&mut parsed)
            .map_err(|err| err.to_string())?;

        let date = parsed.to_naive_date().map_err(|err| err.to_string())?;
        let time = parsed.to_naive_time().map_err(|err| err.to_string())?;
        Ok(date.and_time(time))
    }

    fn fill_defaults(&self, parsed: &mut Parsed) -> format::ParseResult<()> {
        match self.date {
            DatePattern::Year => {
                parsed.set_month(1)?;
                parsed.set_day(1)?;
            }
            DatePattern::YearMonth | DatePattern::YearMonthCompact => parsed.set_day(1)?,
            _ => {}
        }
        match self.time {
            TimePattern::Absent => {
                parsed.set_hour(0)?;
                parsed.set_minute(0)?;
            }
            TimePattern::Hour => parsed.set_minute(0)?,
            _ => {}
        }
        Ok(())
    }

    fn parse_at(&self, index: usize, value: &str) -> Result<NaiveDateTime, FormatError> {
        self.parse(value).map_err(|reason| FormatError::Mismatch {
            index,
            value: value.to_string(),
            format: self.as_strftime(),
            reason,
        })
    }
}

impl fmt::Display for TimeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_strftime())
    }
}

/// Infer the parse format from one example timestamp.
pub fn infer_time_format(example: &str) -> Result<TimeFormat, FormatError> {
    TimeFormat::infer(example)
}

/// Convert a column of timestamps. The format is inferred once from the
/// first element; an empty column converts to an empty result.
pub fn convert_times<S: AsRef<str>>(values: &[S]) -> Result<Vec<NaiveDateTime>, FormatError> {
    let Some(first) = values.first() else {
        debug!("time column is empty");
        return Ok(Vec::new());
    };
    let format = TimeFormat::infer(first.as_ref())?;
    debug!(format = %format, count = values.len(), "inferred time format");
    values
        .iter()
        .enumerate()
        .map(|(index, value)| format.parse_at(index, value.as_ref()))
        .collect()
}

fn strip_zulu(value: &str) -> (&str, bool) {
    match value.strip_suffix('Z') {
        Some(body) => (body, true),
        None => (value, false),
    }
}

fn split_segments(body: &str) -> (&str, &str) {
    match body.split_once('T') {
        Some((date, time)) => (date, time),
        None => (body, ""),
    }
}
