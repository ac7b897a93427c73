use chrono::Utc;

use madrasa_domain::id::SubjectId;
use madrasa_domain::name::{name_key, normalize_name};

use super::optional_text;
use crate::domain::form::{SubjectForm, present};
use crate::domain::repository::SubjectRepository;
use crate::domain::types::Subject;
use crate::error::RegistryError;

fn subject_name(form: &SubjectForm) -> Result<String, RegistryError> {
    present(&form.subject_name)
        .map(normalize_name)
        .ok_or_else(|| RegistryError::invalid("subjectName", "subjectName is required"))
}

// ── CreateSubject ────────────────────────────────────────────────────────────

pub struct CreateSubjectUseCase<R: SubjectRepository> {
    pub repo: R,
}

impl<R: SubjectRepository> CreateSubjectUseCase<R> {
    pub async fn execute(&self, form: SubjectForm) -> Result<Subject, RegistryError> {
        let subject_name = subject_name(&form)?;
        if self.repo.name_taken(&name_key(&subject_name), None).await? {
            return Err(RegistryError::SubjectExists);
        }
        let now = Utc::now();
        let subject = Subject {
            id: SubjectId::generate(),
            subject_name,
            description: optional_text(&form.description),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&subject).await?;
        Ok(subject)
    }
}

// ── GetSubject ───────────────────────────────────────────────────────────────

pub struct GetSubjectUseCase<R: SubjectRepository> {
    pub repo: R,
}

impl<R: SubjectRepository> GetSubjectUseCase<R> {
    pub async fn execute(&self, id: SubjectId) -> Result<Subject, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::SubjectNotFound)
    }
}

// ── ListSubjects ─────────────────────────────────────────────────────────────

pub struct ListSubjectsUseCase<R: SubjectRepository> {
    pub repo: R,
}

impl<R: SubjectRepository> ListSubjectsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Subject>, RegistryError> {
        self.repo.list().await
    }
}

// ── UpdateSubject ────────────────────────────────────────────────────────────

pub struct UpdateSubjectUseCase<R: SubjectRepository> {
    pub repo: R,
}

impl<R: SubjectRepository> UpdateSubjectUseCase<R> {
    pub async fn execute(&self, id: SubjectId, patch: SubjectForm) -> Result<Subject, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::SubjectNotFound)?;
        let mut form = SubjectForm {
            subject_name: Some(existing.subject_name),
            description: existing.description,
        };
        form.overlay(patch);

        let subject_name = subject_name(&form)?;
        if self
            .repo
            .name_taken(&name_key(&subject_name), Some(id))
            .await?
        {
            return Err(RegistryError::SubjectExists);
        }
        let subject = Subject {
            id,
            subject_name,
            description: optional_text(&form.description),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.repo.update(&subject).await?;
        Ok(subject)
    }
}

// ── DeleteSubject ────────────────────────────────────────────────────────────

pub struct DeleteSubjectUseCase<R: SubjectRepository> {
    pub repo: R,
}

impl<R: SubjectRepository> DeleteSubjectUseCase<R> {
    pub async fn execute(&self, id: SubjectId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::SubjectNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockSubjectRepo {
        subjects: Mutex<Vec<Subject>>,
    }

    impl SubjectRepository for MockSubjectRepo {
        async fn find(&self, id: SubjectId) -> Result<Option<Subject>, RegistryError> {
            Ok(self.subjects.lock().unwrap().iter().find(|s| s.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<Subject>, RegistryError> {
            Ok(self.subjects.lock().unwrap().clone())
        }

        async fn name_taken(&self, key: &str, except: Option<SubjectId>) -> Result<bool, RegistryError> {
            let subjects = self.subjects.lock().unwrap();
            Ok(subjects
                .iter()
                .any(|s| Some(s.id) != except && name_key(&s.subject_name) == key))
        }

        async fn create(&self, subject: &Subject) -> Result<(), RegistryError> {
            self.subjects.lock().unwrap().push(subject.clone());
            Ok(())
        }

        async fn update(&self, _subject: &Subject) -> Result<(), RegistryError> {
            Ok(())
        }

        async fn delete(&self, _id: SubjectId) -> Result<bool, RegistryError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn should_reject_duplicate_subject_ignoring_case() {
        let usecase = CreateSubjectUseCase {
            repo: MockSubjectRepo::default(),
        };
        let form = |name: &str| SubjectForm {
            subject_name: Some(name.into()),
            description: Some("  core text ".into()),
        };
        let created = usecase.execute(form("Tafseer ul  Quran")).await.unwrap();
        assert_eq!(created.subject_name, "Tafseer ul Quran");
        assert_eq!(created.description.as_deref(), Some("core text"));
        let result = usecase.execute(form("tafseer UL quran")).await;
        assert!(matches!(result, Err(RegistryError::SubjectExists)));
    }

    #[tokio::test]
    async fn should_return_subject_not_found_on_delete() {
        let usecase = DeleteSubjectUseCase {
            repo: MockSubjectRepo::default(),
        };
        let result = usecase.execute(SubjectId::generate()).await;
        assert!(matches!(result, Err(RegistryError::SubjectNotFound)));
    }
}
