//! Student demographic rules: gender, enrolment status and age.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
        }
    }
}

impl FromStr for Gender {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

/// Raised when a wire string names no known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a permitted value")]
pub struct UnknownVariant(pub String);

/// One leave period, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeavePeriod {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
}

/// Status discriminant as written on the wire and in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Active,
    Expelled,
    OnLeave,
}

impl StatusKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Expelled => "Expelled",
            Self::OnLeave => "On Leave",
        }
    }
}

impl FromStr for StatusKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Active" => Ok(Self::Active),
            "Expelled" => Ok(Self::Expelled),
            "On Leave" => Ok(Self::OnLeave),
            other => Err(UnknownVariant(other.to_owned())),
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enrolment status. Each variant carries exactly the data relevant to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StudentStatus {
    #[default]
    Active,
    Expelled {
        expelled_date: NaiveDate,
    },
    OnLeave {
        leave_records: Vec<LeavePeriod>,
    },
}

/// Why a status could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    #[error("expelledDate is required when status is Expelled")]
    MissingExpelledDate,
    #[error("leaveRecords are required when status is On Leave")]
    MissingLeaveRecords,
    #[error("leave period ends before it starts")]
    InvertedLeavePeriod,
}

impl StatusError {
    /// Wire name of the field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingExpelledDate => "expelledDate",
            Self::MissingLeaveRecords | Self::InvertedLeavePeriod => "leaveRecords",
        }
    }
}

impl StudentStatus {
    /// Assemble a status from its discriminant and whatever companion data was supplied.
    ///
    /// Companion data that does not belong to `kind` is dropped.
    pub fn assemble(
        kind: StatusKind,
        expelled_date: Option<NaiveDate>,
        leave_records: Option<Vec<LeavePeriod>>,
    ) -> Result<Self, StatusError> {
        match kind {
            StatusKind::Active => Ok(Self::Active),
            StatusKind::Expelled => expelled_date
                .map(|expelled_date| Self::Expelled { expelled_date })
                .ok_or(StatusError::MissingExpelledDate),
            StatusKind::OnLeave => {
                let leave_records = leave_records
                    .filter(|records| !records.is_empty())
                    .ok_or(StatusError::MissingLeaveRecords)?;
                if leave_records.iter().any(|p| p.to_date < p.from_date) {
                    return Err(StatusError::InvertedLeavePeriod);
                }
                Ok(Self::OnLeave { leave_records })
            }
        }
    }

    pub fn kind(&self) -> StatusKind {
        match self {
            Self::Active => StatusKind::Active,
            Self::Expelled { .. } => StatusKind::Expelled,
            Self::OnLeave { .. } => StatusKind::OnLeave,
        }
    }

    pub fn expelled_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Expelled { expelled_date } => Some(*expelled_date),
            _ => None,
        }
    }

    pub fn leave_records(&self) -> &[LeavePeriod] {
        match self {
            Self::OnLeave { leave_records } => leave_records.as_slice(),
            _ => &[],
        }
    }
}

/// Whole years elapsed between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}
