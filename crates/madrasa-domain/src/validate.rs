//! Acceptance rules shared by every entity.
//!
//! The predicates are pure and never attached to a storage model; use cases
//! call them explicitly and collect violations into [`FieldErrors`].

use std::collections::BTreeMap;

use serde::Serialize;

/// National identity card: `NNNNN-NNNNNNN-N`.
pub fn is_identity_card(value: &str) -> bool {
    let parts: Vec<&str> = value.split('-').collect();
    matches!(parts.as_slice(), [a, b, c] if all_digits(a, 5) && all_digits(b, 7) && all_digits(c, 1))
}

/// Local mobile number: `03` followed by nine digits.
pub fn is_mobile_number(value: &str) -> bool {
    value.len() == 11 && value.starts_with("03") && value.bytes().all(|b| b.is_ascii_digit())
}

/// Optional `+` followed by 10 to 13 digits.
pub fn is_international_number(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (10..=13).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// True when `value` contains at least `len` consecutive ASCII digits anywhere.
pub fn contains_digit_run(value: &str, len: usize) -> bool {
    let mut run = 0;
    for b in value.bytes() {
        if b.is_ascii_digit() {
            run += 1;
            if run >= len {
                return true;
            }
        } else {
            run = 0;
        }
    }
    false
}

/// Loose email shape: `something@something.something` with no whitespace.
pub fn is_email(value: &str) -> bool {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return false;
    }
    value.match_indices('@').any(|(at, _)| {
        if at == 0 {
            return false;
        }
        let domain = &value[at + 1..];
        domain
            .match_indices('.')
            .any(|(dot, _)| dot > 0 && dot + 1 < domain.len())
    })
}

/// Strict account email: `[A-Za-z0-9._-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}`.
pub fn is_account_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty()
        || !local
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'_' | b'-'))
    {
        return false;
    }
    if !domain
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-'))
    {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty() && tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())
        }
        None => false,
    }
}

fn all_digits(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

/// Field-keyed validation messages, reported together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a violation. The first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn required(&mut self, field: &'static str) {
        self.add(field, format!("{field} is required"));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.keys().copied()
    }

    /// Join every message into one human-readable line.
    pub fn summary(&self) -> String {
        self.0.values().cloned().collect::<Vec<_>>().join(", ")
    }

    /// `Ok(value)` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}
