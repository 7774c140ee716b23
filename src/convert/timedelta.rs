//! Duration conversion from free-form duration strings.
//!
//! Accepted text forms (case-insensitive, surrounding whitespace ignored):
//!
//! - unit components, optionally spaced or comma-separated: `1 days`, `2 day`, `1D`,
//!   `1h30min`, `1.5h`, `2 weeks 3 days`
//! - a clock `H:MM`, `H:MM:SS` or `H:MM:SS.fffffffff`, alone or after components:
//!   `1:15:30`, `3 days, 5:30:10`, `1 days 02:00:00`
//! - an optional leading sign applying to the whole duration: `-1 days`
//! - a bare integer, read as nanoseconds: `3`
//!
//! Integer cells are nanoseconds as well.

use std::sync::LazyLock;

use chrono::TimeDelta;
use regex::{Captures, Regex};

use crate::error::ConversionResult;
use crate::types::{Cell, Column, DataType, TypedColumn, Value};

use super::{convert_cells, unparsable, unsupported, ConvertOptions};

const NANOS_PER_MICRO: i128 = 1_000;
const NANOS_PER_MILLI: i128 = 1_000_000;
const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MINUTE: i128 = 60 * NANOS_PER_SECOND;
const NANOS_PER_HOUR: i128 = 60 * NANOS_PER_MINUTE;
const NANOS_PER_DAY: i128 = 24 * NANOS_PER_HOUR;
const NANOS_PER_WEEK: i128 = 7 * NANOS_PER_DAY;

static BARE_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-+]?\d+$").expect("bare integer pattern is valid"));

static DURATION_SHAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        ^([-+])?\s*
        ((?:(?:\d+(?:\.\d*)?|\.\d+)\s*[a-zµ]+\s*,?\s*)*)
        (?:(\d+):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?
        $",
    )
    .expect("duration pattern is valid")
});

static COMPONENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)?(?:\.(\d*))?\s*([a-zµ]+)").expect("component pattern is valid")
});

fn unit_nanos(unit: &str) -> Option<i128> {
    let nanos = match unit.to_lowercase().as_str() {
        "w" | "week" | "weeks" => NANOS_PER_WEEK,
        "d" | "day" | "days" => NANOS_PER_DAY,
        "h" | "hr" | "hrs" | "hour" | "hours" => NANOS_PER_HOUR,
        "m" | "t" | "min" | "mins" | "minute" | "minutes" => NANOS_PER_MINUTE,
        "s" | "sec" | "secs" | "second" | "seconds" => NANOS_PER_SECOND,
        "ms" | "l" | "milli" | "millis" | "millisecond" | "milliseconds" => NANOS_PER_MILLI,
        "us" | "µs" | "u" | "micro" | "micros" | "microsecond" | "microseconds" => NANOS_PER_MICRO,
        "ns" | "n" | "nano" | "nanos" | "nanosecond" | "nanoseconds" => 1,
        _ => return None,
    };
    Some(nanos)
}

/// `whole.frac` units of `unit_nanos` each, rounded to the nearest nanosecond.
fn scaled(whole: &str, frac: &str, unit_nanos: i128) -> Result<i128, String> {
    let whole: i128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| format!("'{whole}' is too large"))?
    };
    let mut total = whole
        .checked_mul(unit_nanos)
        .ok_or_else(overflow)?;
    if !frac.is_empty() {
        let fraction: f64 = format!("0.{frac}")
            .parse()
            .map_err(|_| format!("invalid fraction '{frac}'"))?;
        total = total
            .checked_add((fraction * unit_nanos as f64).round() as i128)
            .ok_or_else(overflow)?;
    }
    Ok(total)
}

fn clock_nanos(caps: &Captures<'_>) -> Result<i128, String> {
    let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
    let hours: i128 = field(3).parse().map_err(|_| "invalid hours".to_string())?;
    let minutes: i128 = field(4).parse().map_err(|_| "invalid minutes".to_string())?;
    let seconds: i128 = match field(5) {
        "" => 0,
        s => s.parse().map_err(|_| "invalid seconds".to_string())?,
    };
    if minutes >= 60 || seconds >= 60 {
        return Err("minutes and seconds must be below 60".to_string());
    }
    // Right-pad to nanoseconds: `.5` is 500ms.
    let frac = field(6);
    let sub_second: i128 = if frac.is_empty() {
        0
    } else {
        format!("{frac:0<9}")
            .parse()
            .map_err(|_| "invalid fraction".to_string())?
    };
    hours
        .checked_mul(NANOS_PER_HOUR)
        .and_then(|h| h.checked_add(minutes * NANOS_PER_MINUTE))
        .and_then(|t| t.checked_add(seconds * NANOS_PER_SECOND))
        .and_then(|t| t.checked_add(sub_second))
        .ok_or_else(overflow)
}

fn overflow() -> String {
    "duration overflows".to_string()
}

fn to_time_delta(nanos: i128) -> Result<TimeDelta, String> {
    i64::try_from(nanos)
        .map(TimeDelta::nanoseconds)
        .map_err(|_| "duration exceeds the nanosecond range".to_string())
}

/// Parse a duration string. See the module docs for the grammar.
pub fn parse_timedelta(text: &str) -> Result<TimeDelta, String> {
    let text = text.trim();
    if BARE_INTEGER.is_match(text) {
        let nanos: i128 = text.parse().map_err(|_| format!("'{text}' is too large"))?;
        return to_time_delta(nanos);
    }

    let caps = DURATION_SHAPE
        .captures(text)
        .ok_or_else(|| "not a recognized duration".to_string())?;
    let components = caps.get(2).map_or("", |m| m.as_str());
    let has_clock = caps.get(3).is_some();
    if components.trim().is_empty() && !has_clock {
        return Err("not a recognized duration".to_string());
    }

    let mut total: i128 = 0;
    for comp in COMPONENT.captures_iter(components) {
        let whole = comp.get(1).map_or("", |m| m.as_str());
        let frac = comp.get(2).map_or("", |m| m.as_str());
        let unit = &comp[3];
        if whole.is_empty() && frac.is_empty() {
            return Err(format!("unit '{unit}' has no value"));
        }
        let per_unit = unit_nanos(unit).ok_or_else(|| format!("unknown unit '{unit}'"))?;
        total = total
            .checked_add(scaled(whole, frac, per_unit)?)
            .ok_or_else(overflow)?;
    }
    if has_clock {
        total = total
            .checked_add(clock_nanos(&caps)?)
            .ok_or_else(overflow)?;
    }

    if caps.get(1).is_some_and(|m| m.as_str() == "-") {
        total = -total;
    }
    to_time_delta(total)
}

/// Convert a column to [`DataType::Timedelta`].
///
/// Text is parsed with [`parse_timedelta`]; integer cells and finite float cells are
/// nanoseconds. Force mode changes nothing.
pub fn to_timedelta(column: &Column, _options: &ConvertOptions) -> ConversionResult<TypedColumn> {
    convert_cells(column, DataType::Timedelta, |row, cell| {
        let delta = match cell {
            Cell::Text(s) => parse_timedelta(s),
            Cell::Integer(i) => Ok(TimeDelta::nanoseconds(*i)),
            Cell::Float(f) if f.is_finite() => to_time_delta(f.round() as i128),
            other => return Err(unsupported(row, other)),
        };
        delta
            .map(Value::Timedelta)
            .map_err(|message| unparsable(row, cell, message))
    })
}
