// Module name shadows the `serde` crate; use `::serde` for the external crate.
use ::serde::Serializer;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Serialize `DateTime<Utc>` as RFC 3339 with 3-digit fractional seconds.
pub fn to_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Serialize a calendar day as midnight UTC, the shape browser clients parse as a date.
pub fn day_as_utc_midnight<S>(day: &NaiveDate, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_rfc3339_ms(&day.and_time(chrono::NaiveTime::MIN).and_utc(), s)
}

/// `Option` form of [`day_as_utc_midnight`]; `None` serializes as `null`.
pub fn opt_day_as_utc_midnight<S>(day: &Option<NaiveDate>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match day {
        Some(day) => day_as_utc_midnight(day, s),
        None => s.serialize_none(),
    }
}

/// Serialize an `f64` as an integer when it has no fractional part, so `5000` stays `5000`.
pub fn compact_f64<S>(value: &f64, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    const EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;
    if value.fract() == 0.0 && value.abs() < EXACT_LIMIT {
        s.serialize_i64(*value as i64)
    } else {
        s.serialize_f64(*value)
    }
}
