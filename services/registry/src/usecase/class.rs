use chrono::{DateTime, Utc};

use madrasa_domain::class::{Shift, parse_shifts};
use madrasa_domain::id::{ClassId, DepartmentId, TeacherId};
use madrasa_domain::validate::FieldErrors;

use super::{id, text};
use crate::domain::form::{ClassForm, present};
use crate::domain::repository::ClassRepository;
use crate::domain::types::{Class, ClassView};
use crate::error::RegistryError;

/// Shifts arrive as a JSON array, a comma-separated list or a single name.
fn shifts(errors: &mut FieldErrors, value: &Option<String>) -> Option<Vec<Shift>> {
    let Some(raw) = present(value) else {
        errors.add("shift", "shift must have at least one value");
        return None;
    };
    let names: Vec<String> = if raw.starts_with('[') {
        match serde_json::from_str(raw) {
            Ok(names) => names,
            Err(_) => {
                errors.add("shift", "shift must be a list of shift names");
                return None;
            }
        }
    } else {
        raw.split(',').map(|s| s.trim().to_owned()).collect()
    };
    match parse_shifts(names.iter().map(String::as_str).filter(|s| !s.trim().is_empty())) {
        Ok(shifts) if shifts.is_empty() => {
            errors.add("shift", "shift must have at least one value");
            None
        }
        Ok(shifts) => Some(shifts),
        Err(e) => {
            errors.add("shift", e.to_string());
            None
        }
    }
}

pub fn build_class(
    form: &ClassForm,
    class_id: ClassId,
    created_at: DateTime<Utc>,
) -> Result<Class, FieldErrors> {
    let e = &mut FieldErrors::new();
    let fields = (
        text(e, "className", &form.class_name),
        id::<TeacherId>(e, "teacher", &form.teacher),
        id::<DepartmentId>(e, "department", &form.department),
        shifts(e, &form.shift),
    );
    let (Some(class_name), Some(teacher_id), Some(department_id), Some(shifts)) = fields else {
        return Err(std::mem::take(e));
    };
    Ok(Class {
        id: class_id,
        class_name,
        teacher_id,
        department_id,
        shifts,
        created_at,
        updated_at: Utc::now(),
    })
}

pub fn class_form(class: &Class) -> ClassForm {
    ClassForm {
        class_name: Some(class.class_name.clone()),
        teacher: Some(class.teacher_id.to_string()),
        department: Some(class.department_id.to_string()),
        shift: serde_json::to_string(&class.shifts).ok(),
    }
}

// ── CreateClass ──────────────────────────────────────────────────────────────

pub struct CreateClassUseCase<R: ClassRepository> {
    pub repo: R,
}

impl<R: ClassRepository> CreateClassUseCase<R> {
    pub async fn execute(&self, form: ClassForm) -> Result<ClassView, RegistryError> {
        let class = build_class(&form, ClassId::generate(), Utc::now())?;
        self.repo.create(&class).await?;
        self.repo
            .find(class.id)
            .await?
            .ok_or(RegistryError::ClassNotFound)
    }
}

// ── GetClass ─────────────────────────────────────────────────────────────────

pub struct GetClassUseCase<R: ClassRepository> {
    pub repo: R,
}

impl<R: ClassRepository> GetClassUseCase<R> {
    pub async fn execute(&self, id: ClassId) -> Result<ClassView, RegistryError> {
        self.repo.find(id).await?.ok_or(RegistryError::ClassNotFound)
    }
}

// ── ListClasses ──────────────────────────────────────────────────────────────

pub struct ListClassesUseCase<R: ClassRepository> {
    pub repo: R,
}

impl<R: ClassRepository> ListClassesUseCase<R> {
    pub async fn execute(
        &self,
        department: Option<DepartmentId>,
    ) -> Result<Vec<ClassView>, RegistryError> {
        self.repo.list(department).await
    }
}

// ── UpdateClass ──────────────────────────────────────────────────────────────

pub struct UpdateClassUseCase<R: ClassRepository> {
    pub repo: R,
}

impl<R: ClassRepository> UpdateClassUseCase<R> {
    pub async fn execute(&self, id: ClassId, patch: ClassForm) -> Result<ClassView, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::ClassNotFound)?
            .class;
        let mut form = class_form(&existing);
        form.overlay(patch);
        let class = build_class(&form, existing.id, existing.created_at)?;
        self.repo.update(&class).await?;
        self.repo.find(id).await?.ok_or(RegistryError::ClassNotFound)
    }
}

// ── DeleteClass ──────────────────────────────────────────────────────────────

pub struct DeleteClassUseCase<R: ClassRepository> {
    pub repo: R,
}

impl<R: ClassRepository> DeleteClassUseCase<R> {
    pub async fn execute(&self, id: ClassId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::ClassNotFound);
        }
        Ok(())
    }
}
