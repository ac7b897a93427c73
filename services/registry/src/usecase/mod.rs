pub mod attendance;
pub mod class;
pub mod department;
pub mod stipend;
pub mod student;
pub mod subject;
pub mod teacher;
pub mod user;

use std::str::FromStr;

use chrono::NaiveDate;
use uuid::Uuid;

use madrasa_domain::date::parse_day;
use madrasa_domain::validate::FieldErrors;

use crate::domain::form::present;

// ── Field readers ────────────────────────────────────────────────────────────
//
// Each reader records a violation in `errors` and returns `None` on failure,
// so a use case can read every field before reporting.

fn text(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<String> {
    match present(value) {
        Some(v) => Some(v.to_owned()),
        None => {
            errors.required(field);
            None
        }
    }
}

fn optional_text(value: &Option<String>) -> Option<String> {
    present(value).map(str::to_owned)
}

/// Required text that must also satisfy `accept`; otherwise records `"{value} {complaint}"`.
fn text_matching(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &Option<String>,
    accept: fn(&str) -> bool,
    complaint: &str,
) -> Option<String> {
    let value = text(errors, field, value)?;
    if accept(&value) {
        Some(value)
    } else {
        errors.add(field, format!("{value} {complaint}"));
        None
    }
}

fn id<T>(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<T>
where
    T: From<Uuid>,
{
    let raw = text(errors, field, value)?;
    match raw.parse::<Uuid>() {
        Ok(uuid) => Some(T::from(uuid)),
        Err(_) => {
            errors.add(field, format!("{field} must be a valid id"));
            None
        }
    }
}

fn day(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<NaiveDate> {
    let raw = text(errors, field, value)?;
    let parsed = parse_day(&raw);
    if parsed.is_none() {
        errors.add(field, format!("{field} must be a valid date"));
    }
    parsed
}

fn parsed<T: FromStr>(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &Option<String>,
) -> Option<T> {
    let raw = text(errors, field, value)?;
    match raw.parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            errors.add(field, format!("'{raw}' is not a permitted value for {field}"));
            None
        }
    }
}

/// Whole number with a lower bound. Integral decimals such as `30.0` are accepted.
fn integer(
    errors: &mut FieldErrors,
    field: &'static str,
    value: &Option<String>,
    min: i32,
) -> Option<i32> {
    let raw = text(errors, field, value)?;
    let number = raw
        .parse::<i32>()
        .ok()
        .or_else(|| {
            raw.parse::<f64>()
                .ok()
                .filter(|n| n.fract() == 0.0 && n.abs() <= f64::from(i32::MAX))
                .map(|n| n as i32)
        });
    match number {
        Some(n) if n >= min => Some(n),
        Some(_) => {
            errors.add(field, format!("{field} must be at least {min}"));
            None
        }
        None => {
            errors.add(field, format!("{field} must be a whole number"));
            None
        }
    }
}

fn non_negative(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<f64> {
    let raw = text(errors, field, value)?;
    match raw.parse::<f64>() {
        Ok(n) if n.is_finite() && n >= 0.0 => Some(n),
        Ok(n) if n.is_finite() => {
            errors.add(field, format!("{field} must not be negative"));
            None
        }
        _ => {
            errors.add(field, format!("{field} must be a number"));
            None
        }
    }
}

/// Render a number the way a client would have typed it: `5000`, not `5000.0`.
fn number_text(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
