use chrono::{DateTime, Utc};

use madrasa_domain::date::format_day;
use madrasa_domain::id::{SubjectId, TeacherId};
use madrasa_domain::validate::{
    FieldErrors, contains_digit_run, is_email, is_identity_card, is_international_number,
};

use super::{day, id, integer, non_negative, number_text, text, text_matching};
use crate::domain::form::{TeacherForm, UniqueProbe, present};
use crate::domain::repository::TeacherRepository;
use crate::domain::types::{Teacher, TeacherUniqueField, TeacherView};
use crate::error::RegistryError;

fn is_contact_number(value: &str) -> bool {
    contains_digit_run(value, 10)
}

/// Validate every field of `form` and assemble a teacher record.
pub fn build_teacher(
    form: &TeacherForm,
    teacher_id: TeacherId,
    created_at: DateTime<Utc>,
) -> Result<Teacher, FieldErrors> {
    let e = &mut FieldErrors::new();
    let email = form.email.as_ref().map(|v| v.trim().to_lowercase());
    let fields = (
        text(e, "name", &form.name),
        text(e, "teacherId", &form.teacher_id),
        text_matching(
            e,
            "identityCardNo",
            &form.identity_card_no,
            is_identity_card,
            "is not a valid CNIC",
        ),
        integer(e, "age", &form.age, 18),
        text(e, "qualification", &form.qualification),
        id::<SubjectId>(e, "subject", &form.subject),
        integer(e, "experience", &form.experience, 0),
        text_matching(
            e,
            "contactNumber",
            &form.contact_number,
            is_contact_number,
            "is not a valid phone number",
        ),
        text_matching(e, "email", &email, is_email, "is not a valid email"),
        text(e, "address", &form.address),
        text(e, "fatherName", &form.father_name),
        text(e, "marriedStatus", &form.married_status),
        text_matching(
            e,
            "emergencyNumber",
            &form.emergency_number,
            is_international_number,
            "is not a valid phone number",
        ),
        day(e, "dateOfBirth", &form.date_of_birth),
        day(e, "dateOfJoining", &form.date_of_joining),
        text(e, "status", &form.status),
        non_negative(e, "salary", &form.salary),
        text(e, "periodOfService", &form.period_of_service),
        non_negative(e, "increased", &form.increased),
        non_negative(
            e,
            "totalMonthlySalaryAfterIncrement",
            &form.total_monthly_salary_after_increment,
        ),
        text(e, "residentStatus", &form.resident_status),
    );
    let (
        Some(name),
        Some(staff_id),
        Some(identity_card_no),
        Some(age),
        Some(qualification),
        Some(subject_id),
        Some(experience),
        Some(contact_number),
        Some(email),
        Some(address),
        Some(father_name),
        Some(married_status),
        Some(emergency_number),
        Some(date_of_birth),
        Some(date_of_joining),
        Some(status),
        Some(salary),
        Some(period_of_service),
        Some(increased),
        Some(total_monthly_salary_after_increment),
        Some(resident_status),
    ) = fields
    else {
        return Err(std::mem::take(e));
    };
    Ok(Teacher {
        id: teacher_id,
        name,
        teacher_id: staff_id,
        identity_card_no,
        age,
        qualification,
        subject_id,
        experience,
        contact_number,
        email,
        address,
        father_name,
        married_status,
        emergency_number,
        date_of_birth,
        date_of_joining,
        status,
        salary,
        period_of_service,
        increased,
        total_monthly_salary_after_increment,
        resident_status,
        created_at,
        updated_at: Utc::now(),
    })
}

/// The form that would reproduce `teacher` exactly.
pub fn teacher_form(t: &Teacher) -> TeacherForm {
    TeacherForm {
        name: Some(t.name.clone()),
        teacher_id: Some(t.teacher_id.clone()),
        identity_card_no: Some(t.identity_card_no.clone()),
        age: Some(t.age.to_string()),
        qualification: Some(t.qualification.clone()),
        subject: Some(t.subject_id.to_string()),
        experience: Some(t.experience.to_string()),
        contact_number: Some(t.contact_number.clone()),
        email: Some(t.email.clone()),
        address: Some(t.address.clone()),
        father_name: Some(t.father_name.clone()),
        married_status: Some(t.married_status.clone()),
        emergency_number: Some(t.emergency_number.clone()),
        date_of_birth: Some(format_day(t.date_of_birth)),
        date_of_joining: Some(format_day(t.date_of_joining)),
        status: Some(t.status.clone()),
        salary: Some(number_text(t.salary)),
        period_of_service: Some(t.period_of_service.clone()),
        increased: Some(number_text(t.increased)),
        total_monthly_salary_after_increment: Some(number_text(
            t.total_monthly_salary_after_increment,
        )),
        resident_status: Some(t.resident_status.clone()),
    }
}

async fn ensure_identifiers_free<R: TeacherRepository>(
    repo: &R,
    teacher: &Teacher,
    except: Option<TeacherId>,
) -> Result<(), RegistryError> {
    for (field, value) in [
        (TeacherUniqueField::TeacherId, &teacher.teacher_id),
        (TeacherUniqueField::IdentityCardNo, &teacher.identity_card_no),
        (TeacherUniqueField::Email, &teacher.email),
    ] {
        if repo.field_taken(field, value, except).await? {
            return Err(RegistryError::DuplicateField {
                field: field.wire_name(),
            });
        }
    }
    Ok(())
}

// ── CreateTeacher ────────────────────────────────────────────────────────────

pub struct CreateTeacherUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> CreateTeacherUseCase<R> {
    pub async fn execute(&self, form: TeacherForm) -> Result<TeacherView, RegistryError> {
        let teacher = build_teacher(&form, TeacherId::generate(), Utc::now())?;
        ensure_identifiers_free(&self.repo, &teacher, None).await?;
        self.repo.create(&teacher).await?;
        self.repo
            .find(teacher.id)
            .await?
            .ok_or(RegistryError::TeacherNotFound)
    }
}

// ── GetTeacher ───────────────────────────────────────────────────────────────

pub struct GetTeacherUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> GetTeacherUseCase<R> {
    pub async fn execute(&self, id: TeacherId) -> Result<TeacherView, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::TeacherNotFound)
    }
}

// ── ListTeachers ─────────────────────────────────────────────────────────────

pub struct ListTeachersUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> ListTeachersUseCase<R> {
    pub async fn execute(&self, subject: Option<SubjectId>) -> Result<Vec<TeacherView>, RegistryError> {
        self.repo.list(subject).await
    }
}

// ── UpdateTeacher ────────────────────────────────────────────────────────────

pub struct UpdateTeacherUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> UpdateTeacherUseCase<R> {
    pub async fn execute(&self, id: TeacherId, patch: TeacherForm) -> Result<TeacherView, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::TeacherNotFound)?
            .teacher;
        let mut form = teacher_form(&existing);
        form.overlay(patch);
        let teacher = build_teacher(&form, existing.id, existing.created_at)?;
        ensure_identifiers_free(&self.repo, &teacher, Some(id)).await?;
        self.repo.update(&teacher).await?;
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::TeacherNotFound)
    }
}

// ── DeleteTeacher ────────────────────────────────────────────────────────────

pub struct DeleteTeacherUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> DeleteTeacherUseCase<R> {
    pub async fn execute(&self, id: TeacherId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::TeacherNotFound);
        }
        Ok(())
    }
}

// ── CheckTeacherUnique ───────────────────────────────────────────────────────

pub struct CheckTeacherUniqueUseCase<R: TeacherRepository> {
    pub repo: R,
}

impl<R: TeacherRepository> CheckTeacherUniqueUseCase<R> {
    /// Fields outside the allow-list always report unique.
    pub async fn execute(&self, probe: UniqueProbe) -> Result<bool, RegistryError> {
        let Some(field) = probe.field.as_deref().and_then(TeacherUniqueField::parse) else {
            return Ok(true);
        };
        let Some(value) = present(&probe.value) else {
            return Ok(true);
        };
        Ok(!self.repo.field_taken(field, value, None).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockTeacherRepo {
        teachers: Mutex<Vec<Teacher>>,
    }

    impl TeacherRepository for MockTeacherRepo {
        async fn find(&self, id: TeacherId) -> Result<Option<TeacherView>, RegistryError> {
            let teachers = self.teachers.lock().unwrap();
            Ok(teachers.iter().find(|t| t.id == id).map(|t| TeacherView {
                teacher: t.clone(),
                subject: None,
            }))
        }

        async fn list(&self, _subject: Option<SubjectId>) -> Result<Vec<TeacherView>, RegistryError> {
            Ok(vec![])
        }

        async fn field_taken(
            &self,
            field: TeacherUniqueField,
            value: &str,
            except: Option<TeacherId>,
        ) -> Result<bool, RegistryError> {
            let teachers = self.teachers.lock().unwrap();
            Ok(teachers.iter().any(|t| {
                Some(t.id) != except
                    && match field {
                        TeacherUniqueField::TeacherId => t.teacher_id == value,
                        TeacherUniqueField::IdentityCardNo => t.identity_card_no == value,
                        TeacherUniqueField::Email => t.email.eq_ignore_ascii_case(value),
                    }
            }))
        }

        async fn create(&self, teacher: &Teacher) -> Result<(), RegistryError> {
            self.teachers.lock().unwrap().push(teacher.clone());
            Ok(())
        }

        async fn update(&self, teacher: &Teacher) -> Result<(), RegistryError> {
            let mut teachers = self.teachers.lock().unwrap();
            if let Some(slot) = teachers.iter_mut().find(|t| t.id == teacher.id) {
                *slot = teacher.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: TeacherId) -> Result<bool, RegistryError> {
            let mut teachers = self.teachers.lock().unwrap();
            let before = teachers.len();
            teachers.retain(|t| t.id != id);
            Ok(teachers.len() < before)
        }
    }

    fn valid_form() -> TeacherForm {
        let mut form = TeacherForm::default();
        for (k, v) in [
            ("name", "Maulana Yusuf"),
            ("teacherId", "T-001"),
            ("identityCardNo", "35202-1234567-1"),
            ("age", "40"),
            ("qualification", "Dars-e-Nizami"),
            ("subject", "0190a5a0-0000-7000-8000-000000000003"),
            ("experience", "12"),
            ("contactNumber", "0300-1234567890"),
            ("email", "  Yusuf@Example.COM "),
            ("address", "Lahore"),
            ("fatherName", "Abdullah"),
            ("marriedStatus", "Married"),
            ("emergencyNumber", "+923001234567"),
            ("dateOfBirth", "1984-04-02"),
            ("dateOfJoining", "2012-09-01"),
            ("status", "Permanent"),
            ("salary", "45000"),
            ("periodOfService", "12 years"),
            ("increased", "5000"),
            ("totalMonthlySalaryAfterIncrement", "50000"),
            ("residentStatus", "Resident"),
        ] {
            form.set(k, v.to_owned());
        }
        form
    }

    #[test]
    fn should_lowercase_email_and_parse_numbers() {
        let teacher = build_teacher(&valid_form(), TeacherId::generate(), Utc::now()).unwrap();
        assert_eq!(teacher.email, "yusuf@example.com");
        assert_eq!(teacher.age, 40);
        assert_eq!(teacher.total_monthly_salary_after_increment, 50000.0);
    }

    #[test]
    fn should_enforce_minimums_and_patterns() {
        let mut form = valid_form();
        form.age = Some("17".into());
        form.experience = Some("-1".into());
        form.contact_number = Some("12345".into());
        form.emergency_number = Some("+12".into());
        form.salary = Some("-5".into());
        let errors = build_teacher(&form, TeacherId::generate(), Utc::now()).unwrap_err();
        for field in ["age", "experience", "contactNumber", "emergencyNumber", "salary"] {
            assert!(errors.contains(field), "{field} should be reported");
        }
    }

    #[tokio::test]
    async fn should_reject_email_differing_only_in_case() {
        let usecase = CreateTeacherUseCase {
            repo: MockTeacherRepo::default(),
        };
        usecase.execute(valid_form()).await.unwrap();
        let mut second = valid_form();
        second.teacher_id = Some("T-002".into());
        second.identity_card_no = Some("35202-7654321-1".into());
        second.email = Some("YUSUF@example.com".into());
        let result = usecase.execute(second).await;
        assert!(matches!(
            result,
            Err(RegistryError::DuplicateField { field: "email" })
        ));
    }

    #[tokio::test]
    async fn should_merge_partial_update() {
        let usecase = CreateTeacherUseCase {
            repo: MockTeacherRepo::default(),
        };
        let created = usecase.execute(valid_form()).await.unwrap().teacher;
        let update = UpdateTeacherUseCase { repo: usecase.repo };
        let mut patch = TeacherForm::default();
        patch.salary = Some("47000".into());
        let updated = update.execute(created.id, patch).await.unwrap().teacher;
        assert_eq!(updated.salary, 47000.0);
        assert_eq!(updated.email, created.email);
    }

    #[tokio::test]
    async fn should_probe_teacher_allow_list() {
        let create = CreateTeacherUseCase {
            repo: MockTeacherRepo::default(),
        };
        create.execute(valid_form()).await.unwrap();
        let usecase = CheckTeacherUniqueUseCase { repo: create.repo };
        let probe = |field: &str, value: &str| UniqueProbe {
            field: Some(field.into()),
            value: Some(value.into()),
        };
        assert!(!usecase.execute(probe("email", "YUSUF@example.com")).await.unwrap());
        assert!(!usecase.execute(probe("teacherId", "T-001")).await.unwrap());
        assert!(usecase.execute(probe("name", "Maulana Yusuf")).await.unwrap());
    }

    #[tokio::test]
    async fn should_return_not_found_when_deleting_missing_teacher() {
        let usecase = DeleteTeacherUseCase {
            repo: MockTeacherRepo::default(),
        };
        let result = usecase.execute(TeacherId::generate()).await;
        assert!(matches!(result, Err(RegistryError::TeacherNotFound)));
    }
}
