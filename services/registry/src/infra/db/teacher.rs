use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use madrasa_core::sea_ext::FilterLowerEq;
use madrasa_domain::id::{SubjectId, TeacherId};
use madrasa_registry_schema::teachers;

use super::{refs, unique_violation};
use crate::domain::repository::TeacherRepository;
use crate::domain::types::{Teacher, TeacherUniqueField, TeacherView};
use crate::error::RegistryError;

#[derive(Clone)]
pub struct DbTeacherRepository {
    pub db: DatabaseConnection,
}

impl DbTeacherRepository {
    async fn populate(
        &self,
        models: Vec<teachers::Model>,
    ) -> Result<Vec<TeacherView>, RegistryError> {
        let subjects = refs::subject_refs(&self.db, models.iter().map(|m| m.subject_id)).await?;
        Ok(models
            .into_iter()
            .map(|model| TeacherView {
                subject: subjects.get(&model.subject_id).cloned(),
                teacher: teacher_from_model(model),
            })
            .collect())
    }
}

impl TeacherRepository for DbTeacherRepository {
    async fn find(&self, id: TeacherId) -> Result<Option<TeacherView>, RegistryError> {
        let model = teachers::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find teacher by id")?;
        match model {
            Some(model) => Ok(self.populate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, subject: Option<SubjectId>) -> Result<Vec<TeacherView>, RegistryError> {
        let mut query = teachers::Entity::find().order_by_asc(teachers::Column::Id);
        if let Some(subject) = subject {
            query = query.filter(teachers::Column::SubjectId.eq(subject.0));
        }
        let models = query.all(&self.db).await.context("list teachers")?;
        self.populate(models).await
    }

    async fn field_taken(
        &self,
        field: TeacherUniqueField,
        value: &str,
        except: Option<TeacherId>,
    ) -> Result<bool, RegistryError> {
        let value = value.trim();
        let mut query = match field {
            TeacherUniqueField::TeacherId => {
                teachers::Entity::find().filter(teachers::Column::TeacherId.eq(value))
            }
            TeacherUniqueField::IdentityCardNo => {
                teachers::Entity::find().filter(teachers::Column::IdentityCardNo.eq(value))
            }
            TeacherUniqueField::Email => {
                teachers::Entity::find().filter_lower_eq(teachers::Column::Email, value)
            }
        };
        if let Some(except) = except {
            query = query.filter(teachers::Column::Id.ne(except.0));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check teacher uniqueness")?;
        Ok(count > 0)
    }

    async fn create(&self, teacher: &Teacher) -> Result<(), RegistryError> {
        teacher_active_model(teacher)
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "create teacher"))?;
        Ok(())
    }

    async fn update(&self, teacher: &Teacher) -> Result<(), RegistryError> {
        teacher_active_model(teacher)
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "update teacher"))?;
        Ok(())
    }

    async fn delete(&self, id: TeacherId) -> Result<bool, RegistryError> {
        let result = teachers::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete teacher")?;
        Ok(result.rows_affected > 0)
    }
}

fn write_error(err: DbErr, action: &'static str) -> RegistryError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return RegistryError::TeacherNotFound;
    }
    let field = unique_violation(&err).and_then(|message| {
        [
            ("identity_card_no", "identityCardNo"),
            ("teacher_id", "teacherId"),
            ("email", "email"),
        ]
        .into_iter()
        .find(|(column, _)| message.contains(column))
        .map(|(_, field)| field)
    });
    match field {
        Some(field) => RegistryError::DuplicateField { field },
        None => RegistryError::Internal(anyhow::Error::new(err).context(action)),
    }
}

fn teacher_active_model(t: &Teacher) -> teachers::ActiveModel {
    teachers::ActiveModel {
        id: Set(t.id.0),
        name: Set(t.name.clone()),
        teacher_id: Set(t.teacher_id.clone()),
        identity_card_no: Set(t.identity_card_no.clone()),
        age: Set(t.age),
        qualification: Set(t.qualification.clone()),
        subject_id: Set(t.subject_id.0),
        experience: Set(t.experience),
        contact_number: Set(t.contact_number.clone()),
        email: Set(t.email.clone()),
        address: Set(t.address.clone()),
        father_name: Set(t.father_name.clone()),
        married_status: Set(t.married_status.clone()),
        emergency_number: Set(t.emergency_number.clone()),
        date_of_birth: Set(t.date_of_birth),
        date_of_joining: Set(t.date_of_joining),
        status: Set(t.status.clone()),
        salary: Set(t.salary),
        period_of_service: Set(t.period_of_service.clone()),
        increased: Set(t.increased),
        total_monthly_salary_after_increment: Set(t.total_monthly_salary_after_increment),
        resident_status: Set(t.resident_status.clone()),
        created_at: Set(t.created_at),
        updated_at: Set(t.updated_at),
    }
}

fn teacher_from_model(model: teachers::Model) -> Teacher {
    Teacher {
        id: TeacherId(model.id),
        name: model.name,
        teacher_id: model.teacher_id,
        identity_card_no: model.identity_card_no,
        age: model.age,
        qualification: model.qualification,
        subject_id: SubjectId(model.subject_id),
        experience: model.experience,
        contact_number: model.contact_number,
        email: model.email,
        address: model.address,
        father_name: model.father_name,
        married_status: model.married_status,
        emergency_number: model.emergency_number,
        date_of_birth: model.date_of_birth,
        date_of_joining: model.date_of_joining,
        status: model.status,
        salary: model.salary,
        period_of_service: model.period_of_service,
        increased: model.increased,
        total_monthly_salary_after_increment: model.total_monthly_salary_after_increment,
        resident_status: model.resident_status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use madrasa_testing::fixture::Fixture;
    use serde_json::Value;

    use crate::domain::form::TeacherForm;
    use crate::infra::db::migrated_db;
    use crate::usecase::teacher::build_teacher;

    /// The `maulana_yusuf` fixture as a validated record.
    fn maulana_yusuf() -> Teacher {
        let mut form = TeacherForm::default();
        for (key, value) in Fixture::load("fixtures/teachers/maulana_yusuf.json")
            .as_object()
            .unwrap()
        {
            let text = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            form.set(key, text);
        }
        form.set("subject", SubjectId::generate().to_string());
        build_teacher(&form, TeacherId::generate(), Utc::now()).unwrap()
    }

    #[tokio::test]
    async fn should_map_each_unique_column_to_its_field() {
        let db = migrated_db().await;
        let repo = DbTeacherRepository { db: db.conn.clone() };
        let first = maulana_yusuf();
        repo.create(&first).await.unwrap();

        let mut same_teacher_id = maulana_yusuf();
        same_teacher_id.identity_card_no = "35202-0000000-1".into();
        same_teacher_id.email = "other@example.com".into();
        let mut same_email = maulana_yusuf();
        same_email.teacher_id = "T-999".into();
        same_email.identity_card_no = "35202-0000000-2".into();

        for (teacher, expected) in [(same_teacher_id, "teacherId"), (same_email, "email")] {
            let result = repo.create(&teacher).await;
            assert!(
                matches!(result, Err(RegistryError::DuplicateField { field }) if field == expected),
                "expected DuplicateField({expected}), got {result:?}"
            );
        }
        assert_eq!(repo.list(None).await.unwrap().len(), 1);
    }
}
