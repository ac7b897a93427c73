use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use madrasa_domain::attendance::AttendanceStatus;
use madrasa_domain::class::Shift;
use madrasa_domain::id::{
    AttendanceId, ClassId, DepartmentId, StipendId, StudentId, SubjectId, TeacherId, UserId,
};
use madrasa_domain::student::{Gender, StudentStatus};

// ── Students ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub father_name: String,
    pub role_number: String,
    pub registration_number: String,
    pub father_identity_card: String,
    pub country: String,
    pub current_address: String,
    pub permanent_address: String,
    pub guardian_name: String,
    pub guardian_address: String,
    pub guardian_phone: String,
    pub school_history: String,
    pub last_seminary: String,
    pub date_of_joining: NaiveDate,
    pub date_of_birth: NaiveDate,
    pub emergency_number: String,
    pub qualification: String,
    pub class_id: ClassId,
    pub department_id: DepartmentId,
    pub gender: Gender,
    pub status: StudentStatus,
    pub stipend_id: Option<StipendId>,
    pub has_stipend: bool,
    pub documents: StudentDocuments,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stored filenames of a student's uploaded files, one per slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDocuments {
    pub photo: Option<String>,
    pub birth_certificate: Option<String>,
    pub b_form: Option<String>,
}

impl StudentDocuments {
    pub fn get(&self, slot: DocumentSlot) -> Option<&str> {
        match slot {
            DocumentSlot::Photo => self.photo.as_deref(),
            DocumentSlot::BirthCertificate => self.birth_certificate.as_deref(),
            DocumentSlot::BForm => self.b_form.as_deref(),
        }
    }

    pub fn set(&mut self, slot: DocumentSlot, filename: Option<String>) {
        match slot {
            DocumentSlot::Photo => self.photo = filename,
            DocumentSlot::BirthCertificate => self.birth_certificate = filename,
            DocumentSlot::BForm => self.b_form = filename,
        }
    }

    /// Every stored file with its slot.
    pub fn iter(&self) -> impl Iterator<Item = (DocumentSlot, &str)> + '_ {
        DocumentSlot::ALL
            .into_iter()
            .filter_map(|slot| self.get(slot).map(|name| (slot, name)))
    }
}

/// Attachment point for an uploaded student file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentSlot {
    Photo,
    BirthCertificate,
    BForm,
}

/// Storage subdirectory a slot writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentCategory {
    Photos,
    Documents,
}

impl DocumentCategory {
    pub fn dir_name(self) -> &'static str {
        match self {
            Self::Photos => "photos",
            Self::Documents => "documents",
        }
    }
}

impl DocumentSlot {
    pub const ALL: [Self; 3] = [Self::Photo, Self::BirthCertificate, Self::BForm];

    /// Multipart field name.
    pub fn field_name(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::BirthCertificate => "birthCertificate",
            Self::BForm => "bForm",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.field_name() == name)
    }

    /// Tag embedded in generated filenames.
    pub fn file_tag(self) -> &'static str {
        match self {
            Self::Photo => "photo",
            Self::BirthCertificate => "birth",
            Self::BForm => "bform",
        }
    }

    pub fn category(self) -> DocumentCategory {
        match self {
            Self::Photo => DocumentCategory::Photos,
            Self::BirthCertificate | Self::BForm => DocumentCategory::Documents,
        }
    }

    /// Whether a file with `content_type` may be stored in this slot.
    pub fn accepts(self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        match self {
            Self::Photo => content_type.starts_with("image/"),
            Self::BirthCertificate | Self::BForm => matches!(
                content_type.as_str(),
                "application/pdf" | "image/jpeg" | "image/png"
            ),
        }
    }

    pub fn rejection_message(self) -> &'static str {
        match self {
            Self::Photo => "only image files are allowed for photos",
            Self::BirthCertificate | Self::BForm => {
                "only PDF, JPEG and PNG files are allowed for documents"
            }
        }
    }
}

/// An accepted file waiting to be written. `extension` includes the dot or is empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub slot: DocumentSlot,
    pub extension: String,
    pub bytes: bytes::Bytes,
}

/// Which student column a uniqueness probe inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudentUniqueField {
    RoleNumber,
    RegistrationNumber,
}

impl StudentUniqueField {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "roleNumber" => Some(Self::RoleNumber),
            "registrationNumber" => Some(Self::RegistrationNumber),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::RoleNumber => "roleNumber",
            Self::RegistrationNumber => "registrationNumber",
        }
    }
}

// ── Teachers ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub teacher_id: String,
    pub identity_card_no: String,
    pub age: i32,
    pub qualification: String,
    pub subject_id: SubjectId,
    pub experience: i32,
    pub contact_number: String,
    pub email: String,
    pub address: String,
    pub father_name: String,
    pub married_status: String,
    pub emergency_number: String,
    pub date_of_birth: NaiveDate,
    pub date_of_joining: NaiveDate,
    pub status: String,
    pub salary: f64,
    pub period_of_service: String,
    pub increased: f64,
    pub total_monthly_salary_after_increment: f64,
    pub resident_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeacherUniqueField {
    TeacherId,
    IdentityCardNo,
    Email,
}

impl TeacherUniqueField {
    pub fn parse(field: &str) -> Option<Self> {
        match field {
            "teacherId" => Some(Self::TeacherId),
            "identityCardNo" => Some(Self::IdentityCardNo),
            "email" => Some(Self::Email),
            _ => None,
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            Self::TeacherId => "teacherId",
            Self::IdentityCardNo => "identityCardNo",
            Self::Email => "email",
        }
    }
}

// ── Classes ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: ClassId,
    pub class_name: String,
    pub teacher_id: TeacherId,
    pub department_id: DepartmentId,
    pub shifts: Vec<Shift>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Catalogue ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Department {
    pub id: DepartmentId,
    pub department_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: SubjectId,
    pub subject_name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Stipend {
    pub id: StipendId,
    pub stipend_name: String,
    pub amount: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Attendance ───────────────────────────────────────────────────────────────

/// One attendance mark for one student on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendance {
    pub id: AttendanceId,
    #[serde(rename = "student")]
    pub student_id: StudentId,
    #[serde(rename = "class")]
    pub class_id: ClassId,
    #[serde(serialize_with = "madrasa_core::serde::day_as_utc_midnight")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "madrasa_core::serde::to_rfc3339_ms")]
    pub updated_at: DateTime<Utc>,
}

/// Conjunctive attendance filter; `None` leaves a dimension unconstrained.
/// `from` and `to` are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub student: Option<StudentId>,
    pub class: Option<ClassId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl AttendanceFilter {
    pub fn matches(&self, record: &Attendance) -> bool {
        self.student.is_none_or(|s| s == record.student_id)
            && self.class.is_none_or(|c| c == record.class_id)
            && self.from.is_none_or(|from| record.date >= from)
            && self.to.is_none_or(|to| record.date <= to)
    }
}

// ── Users ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Populated references ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassRef {
    pub id: ClassId,
    pub class_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRef {
    pub id: DepartmentId,
    pub department_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectRef {
    pub id: SubjectId,
    pub subject_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeacherRef {
    pub id: TeacherId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentRef {
    pub id: StudentId,
    pub name: String,
}

/// A student with its class and department resolved. Dangling references are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentView {
    pub student: Student,
    pub class: Option<ClassRef>,
    pub department: Option<DepartmentRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeacherView {
    pub teacher: Teacher,
    pub subject: Option<SubjectRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassView {
    pub class: Class,
    pub teacher: Option<TeacherRef>,
    pub department: Option<DepartmentRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceView {
    pub attendance: Attendance,
    pub student: Option<StudentRef>,
    pub class: Option<ClassRef>,
}
