//! Attendance status values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::student::UnknownVariant;

/// Daily attendance mark. Any status may move to any other; none is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    Present,
    Absent,
    Unhealthy,
    Leave,
    Holiday,
}

impl AttendanceStatus {
    pub const ALL: [Self; 5] = [
        Self::Present,
        Self::Absent,
        Self::Unhealthy,
        Self::Leave,
        Self::Holiday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "Present",
            Self::Absent => "Absent",
            Self::Unhealthy => "Unhealthy",
            Self::Leave => "Leave",
            Self::Holiday => "Holiday",
        }
    }
}

impl FromStr for AttendanceStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| UnknownVariant(s.to_owned()))
    }
}

impl fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_round_trip_every_status_through_its_wire_name() {
        for status in AttendanceStatus::ALL {
            assert_eq!(status.as_str().parse::<AttendanceStatus>(), Ok(status));
        }
    }

    #[test]
    fn should_reject_unknown_status() {
        assert!("Late".parse::<AttendanceStatus>().is_err());
        assert!("present".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn should_serialize_as_wire_name() {
        assert_eq!(
            serde_json::to_string(&AttendanceStatus::Unhealthy).unwrap(),
            "\"Unhealthy\""
        );
    }
}
