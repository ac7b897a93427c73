use chrono::Utc;

use madrasa_domain::id::StipendId;
use madrasa_domain::name::{name_key, normalize_name};
use madrasa_domain::validate::FieldErrors;

use super::{non_negative, number_text};
use crate::domain::form::{StipendForm, present};
use crate::domain::repository::StipendRepository;
use crate::domain::types::Stipend;
use crate::error::RegistryError;

fn validate(form: &StipendForm) -> Result<(String, f64), FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = present(&form.stipend_name).map(normalize_name);
    if name.is_none() {
        errors.required("stipendName");
    }
    let amount = non_negative(&mut errors, "amount", &form.amount);
    match (name, amount) {
        (Some(name), Some(amount)) => Ok((name, amount)),
        _ => Err(errors),
    }
}

// ── CreateStipend ────────────────────────────────────────────────────────────

pub struct CreateStipendUseCase<R: StipendRepository> {
    pub repo: R,
}

impl<R: StipendRepository> CreateStipendUseCase<R> {
    pub async fn execute(&self, form: StipendForm) -> Result<Stipend, RegistryError> {
        let (stipend_name, amount) = validate(&form)?;
        if self.repo.name_taken(&name_key(&stipend_name), None).await? {
            return Err(RegistryError::StipendExists);
        }
        let now = Utc::now();
        let stipend = Stipend {
            id: StipendId::generate(),
            stipend_name,
            amount,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&stipend).await?;
        Ok(stipend)
    }
}

// ── GetStipend ───────────────────────────────────────────────────────────────

pub struct GetStipendUseCase<R: StipendRepository> {
    pub repo: R,
}

impl<R: StipendRepository> GetStipendUseCase<R> {
    pub async fn execute(&self, id: StipendId) -> Result<Stipend, RegistryError> {
        self.repo
            .find(id)
            .await?
            .ok_or(RegistryError::StipendNotFound)
    }
}

// ── ListStipends ─────────────────────────────────────────────────────────────

pub struct ListStipendsUseCase<R: StipendRepository> {
    pub repo: R,
}

impl<R: StipendRepository> ListStipendsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Stipend>, RegistryError> {
        self.repo.list().await
    }
}

// ── UpdateStipend ────────────────────────────────────────────────────────────

pub struct UpdateStipendUseCase<R: StipendRepository> {
    pub repo: R,
}

impl<R: StipendRepository> UpdateStipendUseCase<R> {
    pub async fn execute(&self, id: StipendId, patch: StipendForm) -> Result<Stipend, RegistryError> {
        let existing = self
            .repo
            .find(id)
            .await?
            .ok_or(RegistryError::StipendNotFound)?;
        let mut form = StipendForm {
            stipend_name: Some(existing.stipend_name),
            amount: Some(number_text(existing.amount)),
        };
        form.overlay(patch);

        let (stipend_name, amount) = validate(&form)?;
        if self
            .repo
            .name_taken(&name_key(&stipend_name), Some(id))
            .await?
        {
            return Err(RegistryError::StipendExists);
        }
        let stipend = Stipend {
            id,
            stipend_name,
            amount,
            created_at: existing.created_at,
            updated_at: Utc::now(),
        };
        self.repo.update(&stipend).await?;
        Ok(stipend)
    }
}

// ── DeleteStipend ────────────────────────────────────────────────────────────

pub struct DeleteStipendUseCase<R: StipendRepository> {
    pub repo: R,
}

impl<R: StipendRepository> DeleteStipendUseCase<R> {
    pub async fn execute(&self, id: StipendId) -> Result<(), RegistryError> {
        if !self.repo.delete(id).await? {
            return Err(RegistryError::StipendNotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockStipendRepo {
        stipends: Mutex<Vec<Stipend>>,
    }

    impl StipendRepository for MockStipendRepo {
        async fn find(&self, id: StipendId) -> Result<Option<Stipend>, RegistryError> {
            Ok(self.stipends.lock().unwrap().iter().find(|s| s.id == id).cloned())
        }

        async fn list(&self) -> Result<Vec<Stipend>, RegistryError> {
            Ok(self.stipends.lock().unwrap().clone())
        }

        async fn name_taken(&self, key: &str, except: Option<StipendId>) -> Result<bool, RegistryError> {
            let stipends = self.stipends.lock().unwrap();
            Ok(stipends
                .iter()
                .any(|s| Some(s.id) != except && name_key(&s.stipend_name) == key))
        }

        async fn create(&self, stipend: &Stipend) -> Result<(), RegistryError> {
            self.stipends.lock().unwrap().push(stipend.clone());
            Ok(())
        }

        async fn update(&self, stipend: &Stipend) -> Result<(), RegistryError> {
            let mut stipends = self.stipends.lock().unwrap();
            if let Some(slot) = stipends.iter_mut().find(|s| s.id == stipend.id) {
                *slot = stipend.clone();
            }
            Ok(())
        }

        async fn delete(&self, id: StipendId) -> Result<bool, RegistryError> {
            let mut stipends = self.stipends.lock().unwrap();
            let before = stipends.len();
            stipends.retain(|s| s.id != id);
            Ok(stipends.len() < before)
        }
    }

    fn form(name: &str, amount: &str) -> StipendForm {
        StipendForm {
            stipend_name: Some(name.into()),
            amount: Some(amount.into()),
        }
    }

    #[tokio::test]
    async fn should_store_trimmed_name_and_exact_amount() {
        let usecase = CreateStipendUseCase {
            repo: MockStipendRepo::default(),
        };
        let created = usecase.execute(form(" Merit  Award ", "5000")).await.unwrap();
        let fetched = GetStipendUseCase { repo: usecase.repo }
            .execute(created.id)
            .await
            .unwrap();
        assert_eq!(fetched.stipend_name, "Merit Award");
        assert_eq!(fetched.amount, 5000.0);
    }

    #[tokio::test]
    async fn should_reject_negative_amount() {
        let usecase = CreateStipendUseCase {
            repo: MockStipendRepo::default(),
        };
        let result = usecase.execute(form("Merit Award", "-1")).await;
        assert!(matches!(result, Err(RegistryError::Invalid(ref e)) if e.contains("amount")));
    }

    #[tokio::test]
    async fn should_recheck_name_on_update() {
        let create = CreateStipendUseCase {
            repo: MockStipendRepo::default(),
        };
        create.execute(form("Merit Award", "5000")).await.unwrap();
        let need = create.execute(form("Need Based", "3000")).await.unwrap();
        let update = UpdateStipendUseCase { repo: create.repo };
        let result = update
            .execute(need.id, StipendForm {
                stipend_name: Some("MERIT award".into()),
                amount: None,
            })
            .await;
        assert!(matches!(result, Err(RegistryError::StipendExists)));

        let raised = update
            .execute(need.id, StipendForm {
                stipend_name: None,
                amount: Some("3500".into()),
            })
            .await
            .unwrap();
        assert_eq!(raised.stipend_name, "Need Based");
        assert_eq!(raised.amount, 3500.0);
    }
}
