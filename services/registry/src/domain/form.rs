//! Loosely typed inbound field sets.
//!
//! Browser forms send every value as text (multipart) or as whatever JSON
//! scalar the widget produced. A form keeps each field as `Option<String>`:
//! `None` means "not supplied", `Some("")` means "explicitly cleared". Use
//! cases validate the text into typed records.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

macro_rules! field_set {
    ($(#[$doc:meta])* $name:ident { $($field:ident => $wire:literal),* $(,)? }) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Default, PartialEq, Eq)]
        pub struct $name {
            $(pub $field: Option<String>,)*
        }

        impl $name {
            /// Assign a field by wire name. Returns `false` for names outside the set.
            pub fn set(&mut self, wire: &str, value: String) -> bool {
                match wire {
                    $($wire => {
                        self.$field = Some(value);
                        true
                    })*
                    _ => false,
                }
            }

            /// Overlay every field supplied in `patch`.
            pub fn overlay(&mut self, patch: Self) {
                $(if patch.$field.is_some() {
                    self.$field = patch.$field;
                })*
            }

            /// True when no field was supplied.
            pub fn is_empty(&self) -> bool {
                true $(&& self.$field.is_none())*
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
                let mut form = Self::default();
                for (key, value) in raw {
                    form.set(&key, scalar_text(value));
                }
                Ok(form)
            }
        }
    };
}

/// Render any JSON value as form text. `null` becomes the empty string;
/// arrays and objects keep their JSON text.
pub fn scalar_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

field_set!(
    /// Student fields. File slots are not part of the form; they arrive as uploads.
    StudentForm {
        name => "name",
        father_name => "fatherName",
        role_number => "roleNumber",
        registration_number => "registrationNumber",
        father_identity_card => "fatherIdentityCard",
        country => "country",
        current_address => "currentAddress",
        permanent_address => "permanentAddress",
        guardian_name => "guardianName",
        guardian_address => "guardianAddress",
        guardian_phone => "guardianPhone",
        school_history => "schoolHistory",
        last_seminary => "lastSeminary",
        date_of_joining => "dateOfJoining",
        date_of_birth => "dateOfBirth",
        emergency_number => "emergencyNumber",
        qualification => "qualification",
        class => "class",
        department => "department",
        gender => "gender",
        status => "status",
        expelled_date => "expelledDate",
        leave_records => "leaveRecords",
        stipend_id => "stipendId",
        has_stipend => "hasStipend",
    }
);

impl StudentForm {
    /// Like [`StudentForm::set`], also accepting the capitalised `Country` legacy clients send.
    pub fn set_lenient(&mut self, wire: &str, value: String) -> bool {
        match wire {
            "Country" => self.set("country", value),
            _ => self.set(wire, value),
        }
    }
}

field_set!(
    TeacherForm {
        name => "name",
        teacher_id => "teacherId",
        identity_card_no => "identityCardNo",
        age => "age",
        qualification => "qualification",
        subject => "subject",
        experience => "experience",
        contact_number => "contactNumber",
        email => "email",
        address => "address",
        father_name => "fatherName",
        married_status => "marriedStatus",
        emergency_number => "emergencyNumber",
        date_of_birth => "dateOfBirth",
        date_of_joining => "dateOfJoining",
        status => "status",
        salary => "salary",
        period_of_service => "periodOfService",
        increased => "increased",
        total_monthly_salary_after_increment => "totalMonthlySalaryAfterIncrement",
        resident_status => "residentStatus",
    }
);

field_set!(
    ClassForm {
        class_name => "className",
        teacher => "teacher",
        department => "department",
        shift => "shift",
    }
);

field_set!(
    DepartmentForm {
        department_name => "departmentName",
        description => "description",
    }
);

field_set!(
    SubjectForm {
        subject_name => "subjectName",
        description => "description",
    }
);

field_set!(
    StipendForm {
        stipend_name => "stipendName",
        amount => "amount",
    }
);

field_set!(
    AttendanceForm {
        student => "student",
        class => "class",
        date => "date",
        status => "status",
    }
);

field_set!(
    /// Attendance query string. Each lookup reads the subset it needs.
    AttendanceQuery {
        student_id => "studentId",
        class_id => "classId",
        class => "class",
        date => "date",
        start_date => "startDate",
        end_date => "endDate",
        month => "month",
        year => "year",
    }
);

field_set!(
    UserForm {
        name => "name",
        email => "email",
        password => "password",
    }
);

field_set!(
    /// Body of a uniqueness probe.
    UniqueProbe {
        field => "field",
        value => "value",
    }
);

/// Trimmed value of a supplied, non-blank field.
pub fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
