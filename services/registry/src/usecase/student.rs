use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

use madrasa_domain::date::{format_day, parse_day};
use madrasa_domain::id::{ClassId, DepartmentId, StipendId, StudentId};
use madrasa_domain::student::{Gender, LeavePeriod, StatusKind, StudentStatus};
use madrasa_domain::validate::{FieldErrors, is_identity_card, is_mobile_number};

use super::{day, id, parsed, text, text_matching};
use crate::domain::form::{StudentForm, UniqueProbe, present};
use crate::domain::repository::{FileStore, StudentRepository};
use crate::domain::types::{
    DocumentSlot, FileUpload, Student, StudentDocuments, StudentUniqueField, StudentView,
};
use crate::error::RegistryError;

const CNIC_COMPLAINT: &str = "is not a valid CNIC format";
const PHONE_COMPLAINT: &str = "is not a valid phone number, format should be 03XXXXXXXXX";

/// Text fields plus accepted files of one create or update request.
#[derive(Debug, Default)]
pub struct StudentSubmission {
    pub form: StudentForm,
    pub uploads: Vec<FileUpload>,
}

// ── Validation ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeavePeriod {
    from_date: Option<String>,
    to_date: Option<String>,
}

fn leave_records(errors: &mut FieldErrors, value: &Option<String>) -> Option<Vec<LeavePeriod>> {
    let raw = present(value)?;
    let Ok(periods) = serde_json::from_str::<Vec<RawLeavePeriod>>(raw) else {
        errors.add(
            "leaveRecords",
            "leaveRecords must be a list of {fromDate, toDate}",
        );
        return None;
    };
    let mut records = Vec::with_capacity(periods.len());
    for period in periods {
        let from = period.from_date.as_deref().and_then(parse_day);
        let to = period.to_date.as_deref().and_then(parse_day);
        match (from, to) {
            (Some(from_date), Some(to_date)) => records.push(LeavePeriod { from_date, to_date }),
            _ => {
                errors.add(
                    "leaveRecords",
                    "every leave period needs a valid fromDate and toDate",
                );
                return None;
            }
        }
    }
    Some(records)
}

fn status(errors: &mut FieldErrors, form: &StudentForm) -> Option<StudentStatus> {
    let kind = match present(&form.status) {
        None => StatusKind::Active,
        Some(raw) => match raw.parse::<StatusKind>() {
            Ok(kind) => kind,
            Err(e) => {
                errors.add("status", e.to_string());
                return None;
            }
        },
    };
    let expelled_date: Option<NaiveDate> = match kind {
        StatusKind::Expelled => present(&form.expelled_date).and_then(|raw| {
            let parsed = parse_day(raw);
            if parsed.is_none() {
                errors.add("expelledDate", "expelledDate must be a valid date");
            }
            parsed
        }),
        _ => None,
    };
    let records = match kind {
        StatusKind::OnLeave => leave_records(errors, &form.leave_records),
        _ => None,
    };
    StudentStatus::assemble(kind, expelled_date, records)
        .map_err(|e| errors.add(e.field(), e.to_string()))
        .ok()
}

fn stipend(errors: &mut FieldErrors, form: &StudentForm) -> Option<Option<StipendId>> {
    match present(&form.stipend_id) {
        None | Some("null") | Some("undefined") => Some(None),
        Some(raw) => match raw.parse() {
            Ok(id) => Some(Some(id)),
            Err(_) => {
                errors.add("stipendId", "stipendId must be a valid id");
                None
            }
        },
    }
}

fn flag(errors: &mut FieldErrors, field: &'static str, value: &Option<String>) -> Option<bool> {
    match present(value).map(str::to_ascii_lowercase).as_deref() {
        None | Some("false") | Some("0") | Some("off") => Some(false),
        Some("true") | Some("1") | Some("on") => Some(true),
        Some(_) => {
            errors.add(field, format!("{field} must be true or false"));
            None
        }
    }
}

/// Validate every field of `form` and assemble a student record.
///
/// All violations are reported together.
pub fn build_student(
    form: &StudentForm,
    student_id: StudentId,
    documents: StudentDocuments,
    created_at: DateTime<Utc>,
) -> Result<Student, FieldErrors> {
    let e = &mut FieldErrors::new();
    let fields = (
        text(e, "name", &form.name),
        text(e, "fatherName", &form.father_name),
        text(e, "roleNumber", &form.role_number),
        text(e, "registrationNumber", &form.registration_number),
        text_matching(
            e,
            "fatherIdentityCard",
            &form.father_identity_card,
            is_identity_card,
            CNIC_COMPLAINT,
        ),
        text(e, "country", &form.country),
        text(e, "currentAddress", &form.current_address),
        text(e, "permanentAddress", &form.permanent_address),
        text(e, "guardianName", &form.guardian_name),
        text(e, "guardianAddress", &form.guardian_address),
        text_matching(
            e,
            "guardianPhone",
            &form.guardian_phone,
            is_mobile_number,
            PHONE_COMPLAINT,
        ),
        text(e, "schoolHistory", &form.school_history),
        text(e, "lastSeminary", &form.last_seminary),
        day(e, "dateOfJoining", &form.date_of_joining),
        day(e, "dateOfBirth", &form.date_of_birth),
        text_matching(
            e,
            "emergencyNumber",
            &form.emergency_number,
            is_mobile_number,
            PHONE_COMPLAINT,
        ),
        text(e, "qualification", &form.qualification),
        id::<ClassId>(e, "class", &form.class),
        id::<DepartmentId>(e, "department", &form.department),
        parsed::<Gender>(e, "gender", &form.gender),
        status(e, form),
        stipend(e, form),
        flag(e, "hasStipend", &form.has_stipend),
    );
    let (
        Some(name),
        Some(father_name),
        Some(role_number),
        Some(registration_number),
        Some(father_identity_card),
        Some(country),
        Some(current_address),
        Some(permanent_address),
        Some(guardian_name),
        Some(guardian_address),
        Some(guardian_phone),
        Some(school_history),
        Some(last_seminary),
        Some(date_of_joining),
        Some(date_of_birth),
        Some(emergency_number),
        Some(qualification),
        Some(class_id),
        Some(department_id),
        Some(gender),
        Some(status),
        Some(stipend_id),
        Some(has_stipend),
    ) = fields
    else {
        return Err(std::mem::take(e));
    };
    Ok(Student {
        id: student_id,
        name,
        father_name,
        role_number,
        registration_number,
        father_identity_card,
        country,
        current_address,
        permanent_address,
        guardian_name,
        guardian_address,
        guardian_phone,
        school_history,
        last_seminary,
        date_of_joining,
        date_of_birth,
        emergency_number,
        qualification,
        class_id,
        department_id,
        gender,
        status,
        stipend_id,
        has_stipend,
        documents,
        created_at,
        updated_at: Utc::now(),
    })
}

/// The form that would reproduce `student` exactly.
pub fn student_form(student: &Student) -> StudentForm {
    let leave_records = match student.status.leave_records() {
        [] => None,
        records => serde_json::to_string(records).ok(),
    };
    StudentForm {
        name: Some(student.name.clone()),
        father_name: Some(student.father_name.clone()),
        role_number: Some(student.role_number.clone()),
        registration_number: Some(student.registration_number.clone()),
        father_identity_card: Some(student.father_identity_card.clone()),
        country: Some(student.country.clone()),
        current_address: Some(student.current_address.clone()),
        permanent_address: Some(student.permanent_address.clone()),
        guardian_name: Some(student.guardian_name.clone()),
        guardian_address: Some(student.guardian_address.clone()),
        guardian_phone: Some(student.guardian_phone.clone()),
        school_history: Some(student.school_history.clone()),
        last_seminary: Some(student.last_seminary.clone()),
        date_of_joining: Some(format_day(student.date_of_joining)),
        date_of_birth: Some(format_day(student.date_of_birth)),
        emergency_number: Some(student.emergency_number.clone()),
        qualification: Some(student.qualification.clone()),
        class: Some(student.class_id.to_string()),
        department: Some(student.department_id.to_string()),
        gender: Some(student.gender.as_str().to_owned()),
        status: Some(student.status.kind().as_str().to_owned()),
        expelled_date: student.status.expelled_date().map(format_day),
        leave_records,
        stipend_id: student.stipend_id.map(|id| id.to_string()),
        has_stipend: Some(student.has_stipend.to_string()),
    }
}

/// File-name stem derived from the student's name: whitespace becomes `_`,
/// anything outside `[A-Za-z0-9_-]` is dropped.
pub fn upload_stem(name: &str) -> String {
    let stem: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-'))
        .collect();
    if stem.is_empty() {
        "Unknown".to_owned()
    } else {
        stem
    }
}

// ── Shared steps ─────────────────────────────────────────────────────────────

async fn ensure_numbers_free<R: StudentRepository>(
    repo: &R,
    student: &Student,
    except: Option<StudentId>,
) -> Result<(), RegistryError> {
    for (field, value) in [
        (StudentUniqueField::RoleNumber, &student.role_number),
        (StudentUniqueField::RegistrationNumber, &student.registration_number),
    ] {
        if repo.field_taken(field, value, except).await? {
            return Err(RegistryError::DuplicateField {
                field: field.wire_name(),
            });
        }
    }
    Ok(())
}

/// Write every upload. On failure, files already written by this call are removed.
async fn store_uploads<F: FileStore>(
    files: &F,
    stem: &str,
    uploads: Vec<FileUpload>,
) -> Result<Vec<(DocumentSlot, String)>, RegistryError> {
    let mut stored = Vec::with_capacity(uploads.len());
    for upload in uploads {
        match files
            .store(upload.slot, stem, &upload.extension, upload.bytes)
            .await
        {
            Ok(filename) => stored.push((upload.slot, filename)),
            Err(e) => {
                discard(files, &stored).await;
                return Err(e);
            }
        }
    }
    Ok(stored)
}

/// Best-effort removal; failures are logged and swallowed.
async fn discard<F: FileStore>(files: &F, stored: &[(DocumentSlot, String)]) {
    for (slot, filename) in stored {
        match files.remove(*slot, filename).await {
            Ok(true) => tracing::debug!(file = %filename, "removed upload"),
            Ok(false) => tracing::warn!(file = %filename, "upload already missing"),
            Err(e) => tracing::warn!(file = %filename, error = ?e, "failed to remove upload"),
        }
    }
}

// ── CreateStudent ────────────────────────────────────────────────────────────

pub struct CreateStudentUseCase<R: StudentRepository, F: FileStore> {
    pub repo: R,
    pub files: F,
}

impl<R: StudentRepository, F: FileStore> CreateStudentUseCase<R, F> {
    pub async fn execute(&self, input: StudentSubmission) -> Result<StudentView, RegistryError> {
        let now = Utc::now();
        let mut student = build_student(
            &input.form,
            StudentId::generate(),
            StudentDocuments::default(),
            now,
        )?;
        ensure_numbers_free(&self.repo, &student, None).await?;

        let stored = store_uploads(&self.files, &upload_stem(&student.name), input.uploads).await?;
        for (slot, filename) in &stored {
            student.documents.set(*slot, Some(filename.clone()));
        }
        if let Err(e) = self.repo.create(&student).await {
            discard(&self.files, &stored).await;
            return Err(e);
        }
        self.repo
            .find(student.id)
            .await?
            .ok_or(RegistryError::StudentNotFound)
    }
}

// ── GetStudent ───────────────────────────────────────────────────────────────

pub struct GetStudentUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> GetStudentUseCase<R> {
    pub async fn execute(&self, id: StudentId) -> Result<StudentView, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::StudentNotFound)
    }
}

// ── ListStudents ─────────────────────────────────────────────────────────────

pub struct ListStudentsUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> ListStudentsUseCase<R> {
    pub async fn execute(&self, class: Option<ClassId>) -> Result<Vec<StudentView>, RegistryError> {
        self.repo.list(class).await
    }
}

// ── UpdateStudent ────────────────────────────────────────────────────────────

pub struct UpdateStudentUseCase<R: StudentRepository, F: FileStore> {
    pub repo: R,
    pub files: F,
}

impl<R: StudentRepository, F: FileStore> UpdateStudentUseCase<R, F> {
    /// Merge the supplied fields over the stored record, then validate the result.
    ///
    /// A new file for a slot replaces the old one; the old file is deleted
    /// before the record is written.
    pub async fn execute(
        &self,
        id: StudentId,
        input: StudentSubmission,
    ) -> Result<StudentView, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::StudentNotFound)?
            .student;

        let mut form = student_form(&existing);
        form.overlay(input.form);
        let mut student = build_student(
            &form,
            existing.id,
            existing.documents.clone(),
            existing.created_at,
        )?;
        ensure_numbers_free(&self.repo, &student, Some(id)).await?;

        let stored = store_uploads(&self.files, &upload_stem(&student.name), input.uploads).await?;
        let replaced: Vec<(DocumentSlot, String)> = stored
            .iter()
            .filter_map(|(slot, _)| existing.documents.get(*slot).map(|old| (*slot, old.to_owned())))
            .collect();
        discard(&self.files, &replaced).await;
        for (slot, filename) in &stored {
            student.documents.set(*slot, Some(filename.clone()));
        }

        if let Err(e) = self.repo.update(&student).await {
            // The replaced files are already gone; the record still names them.
            tracing::warn!(
                student = %id,
                replaced = ?replaced,
                error = ?e,
                "student update failed after removing replaced uploads"
            );
            discard(&self.files, &stored).await;
            return Err(e);
        }
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::StudentNotFound)
    }
}

// ── DeleteStudent ────────────────────────────────────────────────────────────

pub struct DeleteStudentUseCase<R: StudentRepository, F: FileStore> {
    pub repo: R,
    pub files: F,
}

impl<R: StudentRepository, F: FileStore> DeleteStudentUseCase<R, F> {
    /// Remove stored files first, then the record. File failures never block deletion.
    pub async fn execute(&self, id: StudentId) -> Result<(), RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::StudentNotFound)?
            .student;
        let stored: Vec<(DocumentSlot, String)> = existing
            .documents
            .iter()
            .map(|(slot, name)| (slot, name.to_owned()))
            .collect();
        discard(&self.files, &stored).await;

        if !self.repo.delete(id).await? {
            return Err(RegistryError::StudentNotFound);
        }
        Ok(())
    }
}

// ── CheckStudentUnique ───────────────────────────────────────────────────────

pub struct CheckStudentUniqueUseCase<R: StudentRepository> {
    pub repo: R,
}

impl<R: StudentRepository> CheckStudentUniqueUseCase<R> {
    /// Fields outside the allow-list always report unique.
    pub async fn execute(&self, probe: UniqueProbe) -> Result<bool, RegistryError> {
        let Some(field) = probe.field.as_deref().and_then(StudentUniqueField::parse) else {
            return Ok(true);
        };
        let Some(value) = present(&probe.value) else {
            return Ok(true);
        };
        Ok(!self.repo.field_taken(field, value, None).await?)
    }
}
