//! Newtype wrappers for entity identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generate a fresh time-ordered identifier.
            pub fn generate() -> Self {
                Self(Uuid::now_v7())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.trim().parse()?))
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

uuid_id!(
    /// Identifies a student record.
    StudentId
);
uuid_id!(
    /// Identifies a teacher record.
    TeacherId
);
uuid_id!(
    /// Identifies a class (a teaching group, not a Rust type).
    ClassId
);
uuid_id!(
    /// Identifies a department.
    DepartmentId
);
uuid_id!(
    /// Identifies a subject.
    SubjectId
);
uuid_id!(
    /// Identifies a stipend scheme.
    StipendId
);
uuid_id!(
    /// Identifies a single attendance row.
    AttendanceId
);
uuid_id!(
    /// Identifies a back-office user account.
    UserId
);
