use chrono::Utc;

use madrasa_domain::id::DepartmentId;
use madrasa_domain::name::{name_key, normalize_name};
use madrasa_domain::validate::FieldErrors;

use super::optional_text;
use crate::domain::form::{DepartmentForm, present};
use crate::domain::repository::DepartmentRepository;
use crate::domain::types::Department;
use crate::error::RegistryError;

fn department_name(form: &DepartmentForm) -> Result<String, RegistryError> {
    let name = present(&form.department_name).map(normalize_name);
    match name {
        Some(name) => Ok(name),
        None => {
            let mut errors = FieldErrors::new();
            errors.required("departmentName");
            Err(errors.into())
        }
    }
}

// ── CreateDepartment ─────────────────────────────────────────────────────────

pub struct CreateDepartmentUseCase<R: DepartmentRepository> {
    pub repo: R,
}

impl<R: DepartmentRepository> CreateDepartmentUseCase<R> {
    pub async fn execute(&self, form: DepartmentForm) -> Result<Department, RegistryError> {
        let department_name = department_name(&form)?;
        if self.repo.name_taken(&name_key(&department_name), None).await? {
            return Err(RegistryError::DepartmentExists);
        }
        let now = Utc::now();
        let department = Department {
            id: DepartmentId::generate(),
            department_name,
            description: optional_text(&form.description),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&department).await?;
        Ok(department)
    }
}

// ── GetDepartment ────────────────────────────────────────────────────────────

pub struct GetDepartmentUseCase<R: DepartmentRepository> {
    pub repo: R,
}

impl<R: DepartmentRepository> GetDepartmentUseCase<R> {
    pub async fn execute(&self, id: DepartmentId) -> Result<Department, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::DepartmentNotFound)
    }
}

// ── ListDepartments ──────────────────────────────────────────────────────────

pub struct ListDepartmentsUseCase<R: DepartmentRepository> {
    pub repo: R,
}

impl<R: DepartmentRepository> ListDepartmentsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Department>, RegistryError> {
        self.repo.list().await
    }
}

// ── UpdateDepartment ─────────────────────────────────────────────────────────

pub struct UpdateDepartmentUseCase<R: DepartmentRepository> {
    pub repo: R,
}

impl<R: DepartmentRepository> UpdateDepartmentUseCase<R> {
    pub async fn execute(
        &self,
        id: DepartmentId,
        patch: DepartmentForm,
    ) -> Result<Department, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::DepartmentNotFound)?;
        let mut form = DepartmentForm {
            department_name: Some(existing.department_name),
            description: existing.description,
        };
        form.overlay(patch);

        let department_name = department_name(&form)?;
        if self
            .repo
            .name_taken(&name_key(&department_name), Some(id))
            .await?
        {
            return Err(RegistryError::DepartmentExists);
        }
        let department = Department {
            id,
            department_name,
            description: optional_text(&form.description),
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.repo.update(&department).await?;
        Ok(department)
    }
}

// ── DeleteDepartment ─────────────────────────────────────────────────────────

pub struct DeleteDepartmentUseCase<R: DepartmentRepository> {
    pub repo: R,
}

impl<R: DepartmentRepository> DeleteDepartmentUseCase<R> {
    pub async fn execute(&self, id: DepartmentId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::DepartmentNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockDepartmentRepo {
        departments: Mutex<Vec<Department>>,
    }

    impl DepartmentRepository for MockDepartmentRepo {
        async fn find(&self, id: DepartmentId) -> Result<Option<Department>, RegistryError> {
            let departments = self.departments.lock().unwrap();
            Ok(departments.iter().find(|d| d.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<Department>, RegistryError> {
            Ok(self.departments.lock().unwrap().clone())
        }

        async fn name_taken(
            &self,
            key: &str,
            except: Option<DepartmentId>,
        ) -> Result<bool, RegistryError> {
            let departments = self.departments.lock().unwrap();
            Ok(departments
                .iter()
                .any(|d| Some(d.id) != except && name_key(&d.department_name) == key))
        }

        async fn create(&self, department: &Department) -> Result<(), RegistryError> {
            self.departments.lock().unwrap().push(department.clone());
            Ok(())
        }

        async fn update(&self, department: &Department) -> Result<(), RegistryError> {
            let mut departments = self.departments.lock().unwrap();
            if let Some(slot) = departments.iter_mut().find(|d| d.id == department.id) {
                *slot = department.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: DepartmentId) -> Result<bool, RegistryError> {
            let mut departments = self.departments.lock().unwrap();
            let before = departments.len();
            departments.retain(|d| d.id != id);
            Ok(departments.len() < before)
        }
    }

    fn named(name: &str) -> DepartmentForm {
        DepartmentForm {
            department_name: Some(name.into()),
            description: None,
        }
    }

    #[tokio::test]
    async fn should_normalize_name_on_create() {
        let usecase = CreateDepartmentUseCase {
            repo: MockDepartmentRepo::default(),
        };
        let created = usecase.execute(named("  Computer   Science ")).await.unwrap();
        assert_eq!(created.department_name, "Computer Science");
    }

    #[tokio::test]
    async fn should_reject_spacing_and_case_variant() {
        let usecase = CreateDepartmentUseCase {
            repo: MockDepartmentRepo::default(),
        };
        usecase.execute(named("  Computer   Science ")).await.unwrap();
        let result = usecase.execute(named("computer science")).await;
        assert!(matches!(result, Err(RegistryError::DepartmentExists)));
    }

    #[tokio::test]
    async fn should_require_name() {
        let usecase = CreateDepartmentUseCase {
            repo: MockDepartmentRepo::default(),
        };
        let result = usecase.execute(named("   ")).await;
        assert!(matches!(result, Err(RegistryError::Invalid(ref e)) if e.contains("departmentName")));
    }

    #[tokio::test]
    async fn should_allow_renaming_to_own_name_and_clear_description() {
        let create = CreateDepartmentUseCase {
            repo: MockDepartmentRepo::default(),
        };
        let created = create
            .execute(DepartmentForm {
                department_name: Some("Hifz".into()),
                description: Some("memorisation".into()),
            })
            .await
            .unwrap();
        let update = UpdateDepartmentUseCase { repo: create.repo };
        let updated = update
            .execute(created.id, DepartmentForm {
                department_name: Some("HIFZ".into()),
                description: Some(String::new()),
            })
            .await
            .unwrap();
        assert_eq!(updated.department_name, "HIFZ");
        assert_eq!(updated.description, None);
    }

    #[tokio::test]
    async fn should_reject_rename_onto_another_department() {
        let create = CreateDepartmentUseCase {
            repo: MockDepartmentRepo::default(),
        };
        create.execute(named("Hifz")).await.unwrap();
        let other = create.execute(named("Nazra")).await.unwrap();
        let update = UpdateDepartmentUseCase { repo: create.repo };
        let result = update.execute(other.id, named(" hifz ")).await;
        assert!(matches!(result, Err(RegistryError::DepartmentExists)));
    }
}
