use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder,
};

use madrasa_domain::class::Shift;
use madrasa_domain::id::{ClassId, DepartmentId, TeacherId};
use madrasa_registry_schema::classes;

use super::refs;
use crate::domain::repository::ClassRepository;
use crate::domain::types::{Class, ClassView};
use crate::error::RegistryError;

#[derive(Clone)]
pub struct DbClassRepository {
    pub db: DatabaseConnection,
}

impl DbClassRepository {
    async fn populate(&self, models: Vec<classes::Model>) -> Result<Vec<ClassView>, RegistryError> {
        let teachers = refs::teacher_refs(&self.db, models.iter().map(|m| m.teacher_id)).await?;
        let departments =
            refs::department_refs(&self.db, models.iter().map(|m| m.department_id)).await?;
        models
            .into_iter()
            .map(|model| {
                let teacher = teachers.get(&model.teacher_id).cloned();
                let department = departments.get(&model.department_id).cloned();
                Ok(ClassView {
                    class: class_from_model(model)?,
                    teacher,
                    department,
                })
            })
            .collect()
    }
}

impl ClassRepository for DbClassRepository {
    async fn find(&self, id: ClassId) -> Result<Option<ClassView>, RegistryError> {
        let model = classes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find class by id")?;
        match model {
            Some(model) => Ok(self.populate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list(&self, department: Option<DepartmentId>) -> Result<Vec<ClassView>, RegistryError> {
        let mut query = classes::Entity::find().order_by_asc(classes::Column::Id);
        if let Some(department) = department {
            query = query.filter(classes::Column::DepartmentId.eq(department.0));
        }
        let models = query.all(&self.db).await.context("list classes")?;
        self.populate(models).await
    }

    async fn create(&self, class: &Class) -> Result<(), RegistryError> {
        class_active_model(class)?
            .insert(&self.db)
            .await
            .context("create class")?;
        Ok(())
    }

    async fn update(&self, class: &Class) -> Result<(), RegistryError> {
        match class_active_model(class)?.update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(RegistryError::ClassNotFound),
            Err(e) => Err(anyhow::Error::new(e).context("update class").into()),
        }
    }

    async fn delete(&self, id: ClassId) -> Result<bool, RegistryError> {
        let result = classes::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete class")?;
        Ok(result.rows_affected > 0)
    }
}

fn class_active_model(c: &Class) -> Result<classes::ActiveModel, RegistryError> {
    Ok(classes::ActiveModel {
        id: Set(c.id.0),
        class_name: Set(c.class_name.clone()),
        teacher_id: Set(c.teacher_id.0),
        department_id: Set(c.department_id.0),
        shifts: Set(serde_json::to_value(&c.shifts).context("encode shifts")?),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    })
}

fn class_from_model(model: classes::Model) -> Result<Class, RegistryError> {
    let shifts: Vec<Shift> = serde_json::from_value(model.shifts).context("decode shifts")?;
    Ok(Class {
        id: ClassId(model.id),
        class_name: model.class_name,
        teacher_id: TeacherId(model.teacher_id),
        department_id: DepartmentId(model.department_id),
        shifts,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
