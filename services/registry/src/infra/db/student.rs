use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};

use madrasa_domain::id::{ClassId, DepartmentId, StipendId, StudentId};
use madrasa_domain::student::{Gender, LeavePeriod, StatusKind, StudentStatus};
use madrasa_registry_schema::students;

use super::{refs, unique_violation};
use crate::domain::repository::StudentRepository;
use crate::domain::types::{Student, StudentDocuments, StudentUniqueField, StudentView};
use crate::error::RegistryError;

#[derive(Clone)]
pub struct DbStudentRepository {
    pub db: DatabaseConnection,
}

impl DbStudentRepository {
    async fn populate(
        &self,
        models: Vec<students::Model>,
    ) -> Result<Vec<StudentView>, RegistryError> {
        let classes = refs::class_refs(&self.db, models.iter().map(|m| m.class_id)).await?;
        let departments =
            refs::department_refs(&self.db, models.iter().map(|m| m.department_id)).await?;
        models
            .into_iter()
            .map(|model| {
                let class = classes.get(&model.class_id).cloned();
                let department = departments.get(&model.department_id).cloned();
                Ok(StudentView {
                    student: student_from_model(model)?,
                    class,
                    department,
                })
            })
            .collect()
    }
}

impl StudentRepository for DbStudentRepository {
    async fn find(&self, id: StudentId) -> Result<Option<StudentView>, RegistryError> {
        let model = students::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find student by id")?;
        match model {
            Some(model) => Ok(self.populate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, class: Option<ClassId>) -> Result<Vec<StudentView>, RegistryError> {
        let mut query = students::Entity::find().order_by_asc(students::Column::Id);
        if let Some(class) = class {
            query = query.filter(students::Column::ClassId.eq(class.0));
        }
        let models = query.all(&self.db).await.context("list students")?;
        self.populate(models).await
    }

    async fn field_taken(
        &self,
        field: StudentUniqueField,
        value: &str,
        except: Option<StudentId>,
    ) -> Result<bool, RegistryError> {
        let column = match field {
            StudentUniqueField::RoleNumber => students::Column::RoleNumber,
            StudentUniqueField::RegistrationNumber => students::Column::RegistrationNumber,
        };
        let mut query = students::Entity::find().filter(column.eq(value.trim()));
        if let Some(except) = except {
            query = query.filter(students::Column::Id.ne(except.0));
        }
        let count = query
            .count(&self.db)
            .await
            .context("check student uniqueness")?;
        Ok(count > 0)
    }

    async fn create(&self, student: &Student) -> Result<(), RegistryError> {
        student_active_model(student)?
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, "create student"))?;
        Ok(())
    }

    async fn update(&self, student: &Student) -> Result<(), RegistryError> {
        student_active_model(student)?
            .update(&self.db)
            .await
            .map_err(|e| write_error(e, "update student"))?;
        Ok(())
    }

    async fn delete(&self, id: StudentId) -> Result<bool, RegistryError> {
        let result = students::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete student")?;
        Ok(result.rows_affected > 0)
    }
}

fn write_error(err: DbErr, action: &'static str) -> RegistryError {
    if matches!(err, DbErr::RecordNotUpdated) {
        return RegistryError::StudentNotFound;
    }
    match unique_violation(&err) {
        Some(message) if message.contains("registration_number") => {
            RegistryError::DuplicateField {
                field: "registrationNumber",
            }
        }
        Some(message) if message.contains("role_number") => RegistryError::DuplicateField {
            field: "roleNumber",
        },
        _ => RegistryError::Internal(anyhow::Error::new(err).context(action)),
    }
}

fn student_active_model(s: &Student) -> Result<students::ActiveModel, RegistryError> {
    let leave_records =
        serde_json::to_value(s.status.leave_records()).context("encode leave records")?;
    Ok(students::ActiveModel {
        id: Set(s.id.0),
        name: Set(s.name.clone()),
        father_name: Set(s.father_name.clone()),
        role_number: Set(s.role_number.clone()),
        registration_number: Set(s.registration_number.clone()),
        father_identity_card: Set(s.father_identity_card.clone()),
        country: Set(s.country.clone()),
        current_address: Set(s.current_address.clone()),
        permanent_address: Set(s.permanent_address.clone()),
        guardian_name: Set(s.guardian_name.clone()),
        guardian_address: Set(s.guardian_address.clone()),
        guardian_phone: Set(s.guardian_phone.clone()),
        school_history: Set(s.school_history.clone()),
        last_seminary: Set(s.last_seminary.clone()),
        date_of_joining: Set(s.date_of_joining),
        date_of_birth: Set(s.date_of_birth),
        emergency_number: Set(s.emergency_number.clone()),
        qualification: Set(s.qualification.clone()),
        class_id: Set(s.class_id.0),
        department_id: Set(s.department_id.0),
        gender: Set(s.gender.as_str().to_owned()),
        status: Set(s.status.kind().as_str().to_owned()),
        expelled_date: Set(s.status.expelled_date()),
        leave_records: Set(leave_records),
        stipend_id: Set(s.stipend_id.map(|id| id.0)),
        has_stipend: Set(s.has_stipend),
        photo: Set(s.documents.photo.clone()),
        birth_certificate: Set(s.documents.birth_certificate.clone()),
        b_form: Set(s.documents.b_form.clone()),
        created_at: Set(s.created_at),
        updated_at: Set(s.updated_at),
    })
}

fn student_from_model(model: students::Model) -> Result<Student, RegistryError> {
    let gender: Gender = model.gender.parse().context("decode student gender")?;
    let kind: StatusKind = model.status.parse().context("decode student status")?;
    let leave_records: Vec<LeavePeriod> =
        serde_json::from_value(model.leave_records).context("decode leave records")?;
    let status = StudentStatus::assemble(kind, model.expelled_date, Some(leave_records))
        .context("decode student status data")?;
    Ok(Student {
        id: StudentId(model.id),
        name: model.name,
        father_name: model.father_name,
        role_number: model.role_number,
        registration_number: model.registration_number,
        father_identity_card: model.father_identity_card,
        country: model.country,
        current_address: model.current_address,
        permanent_address: model.permanent_address,
        guardian_name: model.guardian_name,
        guardian_address: model.guardian_address,
        guardian_phone: model.guardian_phone,
        school_history: model.school_history,
        last_seminary: model.last_seminary,
        date_of_joining: model.date_of_joining,
        date_of_birth: model.date_of_birth,
        emergency_number: model.emergency_number,
        qualification: model.qualification,
        class_id: ClassId(model.class_id),
        department_id: DepartmentId(model.department_id),
        gender,
        status,
        stipend_id: model.stipend_id.map(StipendId),
        has_stipend: model.has_stipend,
        documents: StudentDocuments {
            photo: model.photo,
            birth_certificate: model.birth_certificate,
            b_form: model.b_form,
        },
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
