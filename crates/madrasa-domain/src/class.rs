//! Class shifts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::student::UnknownVariant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shift {
    Morning,
    Evening,
    Night,
    #[serde(rename = "Late Night")]
    LateNight,
}

impl Shift {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Evening => "Evening",
            Self::Night => "Night",
            Self::LateNight => "Late Night",
        }
    }
}

impl FromStr for Shift {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Morning" => Ok(Self::Morning),
            "Evening" => Ok(Self::Evening),
            "Night" => Ok(Self::Night),
            "Late Night" => Ok(Self::LateNight),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Parse a shift list, dropping duplicates while keeping first-seen order.
pub fn parse_shifts<'a, I>(raw: I) -> Result<Vec<Shift>, UnknownVariant>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut shifts = Vec::new();
    for value in raw {
        let shift = value.parse::<Shift>()?;
        if !shifts.contains(&shift) {
            shifts.push(shift);
        }
    }
    Ok(shifts)
}
