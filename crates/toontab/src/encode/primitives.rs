//! Scalar rendering rules shared by the tree encoder, the tabular writer,
//! and the stream writer.

use chrono::{DateTime, Datelike, Days, NaiveDate};

use crate::encode::writer::WriteBuffer;
use crate::error::{Error, Result};
use crate::number;

pub(crate) fn write_bool(buf: &mut WriteBuffer, b: bool) {
    buf.push_str(if b { "true" } else { "false" });
}

pub(crate) fn write_null(buf: &mut WriteBuffer) {
    buf.push_str("null");
}

/// Render a double, failing on non-finite values in strict mode and
/// degrading them to `null` otherwise.
pub(crate) fn write_double(buf: &mut WriteBuffer, value: f64, strict: bool) -> Result<()> {
    if !value.is_finite() {
        if strict {
            let what = if value.is_nan() { "NaN" } else { "Inf" };
            return Err(Error::Encoding(format!(
                "{what} values not allowed in strict mode"
            )));
        }
        write_null(buf);
        return Ok(());
    }
    buf.push_str(&number::format_double(value));
    Ok(())
}

/// Keys are quoted when empty or containing `:`, space, or `"`, and when
/// a leading character would make the line read as another construct
/// (comment, list item, array header).
pub(crate) fn write_key(buf: &mut WriteBuffer, key: &str) {
    let needs_quotes = key.is_empty()
        || key.contains(':')
        || key.contains(' ')
        || key.contains('"')
        || key.starts_with(['#', '[', '"'])
        || key.starts_with("//")
        || key == "-"
        || key.starts_with("- ")
        || key.chars().any(|c| (c as u32) < 0x20);
    if needs_quotes {
        buf.push_escaped(key);
    } else {
        buf.push_str(key);
    }
}

/// `YYYY-MM-DD` for a day offset from 1970-01-01, or `None` outside the
/// four-digit-year range.
pub(crate) fn date_string(days: i64) -> Option<String> {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1)?;
    let date = if days >= 0 {
        epoch.checked_add_days(Days::new(days as u64))?
    } else {
        epoch.checked_sub_days(Days::new(days.unsigned_abs()))?
    };
    if !(0..=9999).contains(&date.year()) {
        return None;
    }
    Some(date.format("%Y-%m-%d").to_string())
}

/// `YYYY-MM-DDTHH:MM:SSZ` for a UTC epoch second, or `None` outside the
/// four-digit-year range.
pub(crate) fn timestamp_string(secs: i64) -> Option<String> {
    let dt = DateTime::from_timestamp(secs, 0)?;
    if !(0..=9999).contains(&dt.year()) {
        return None;
    }
    Some(dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

pub(crate) fn write_date(buf: &mut WriteBuffer, days: i64) {
    match date_string(days) {
        Some(s) => buf.push_escaped(&s),
        None => write_null(buf),
    }
}

pub(crate) fn write_timestamp(buf: &mut WriteBuffer, secs: i64) {
    match timestamp_string(secs) {
        Some(s) => buf.push_escaped(&s),
        None => write_null(buf),
    }
}
