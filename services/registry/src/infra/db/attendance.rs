use anyhow::Context as _;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, sea_query::Expr,
};

use madrasa_domain::attendance::AttendanceStatus;
use madrasa_domain::id::{AttendanceId, ClassId, StudentId};
use madrasa_domain::sort::Sort;
use madrasa_registry_schema::attendances;

use super::{refs, unique_violation};
use crate::domain::repository::AttendanceRepository;
use crate::domain::types::{Attendance, AttendanceFilter, AttendanceView};
use crate::error::RegistryError;

#[derive(Clone)]
pub struct DbAttendanceRepository {
    pub db: DatabaseConnection,
}

impl DbAttendanceRepository {
    async fn populate(
        &self,
        models: Vec<attendances::Model>,
    ) -> Result<Vec<AttendanceView>, RegistryError> {
        let students = refs::student_refs(&self.db, models.iter().map(|m| m.student_id)).await?;
        let classes = refs::class_refs(&self.db, models.iter().map(|m| m.class_id)).await?;
        models
            .into_iter()
            .map(|model| {
                let student = students.get(&model.student_id).cloned();
                let class = classes.get(&model.class_id).cloned();
                Ok(AttendanceView {
                    attendance: attendance_from_model(model)?,
                    student,
                    class,
                })
            })
            .collect()
    }
}

impl AttendanceRepository for DbAttendanceRepository {
    async fn find(&self, id: AttendanceId) -> Result<Option<AttendanceView>, RegistryError> {
        let model = attendances::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find attendance by id")?;
        match model {
            Some(model) => Ok(self.populate(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_for_student_on(
        &self,
        student: StudentId,
        date: NaiveDate,
    ) -> Result<Option<Attendance>, RegistryError> {
        let model = attendances::Entity::find()
            .filter(attendances::Column::StudentId.eq(student.0))
            .filter(attendances::Column::Date.eq(date))
            .one(&self.db)
            .await
            .context("find attendance for student on date")?;
        model.map(attendance_from_model).transpose()
    }

    async fn list(
        &self,
        filter: AttendanceFilter,
        order: Sort,
    ) -> Result<Vec<AttendanceView>, RegistryError> {
        let mut query = attendances::Entity::find();
        if let Some(student) = filter.student {
            query = query.filter(attendances::Column::StudentId.eq(student.0));
        }
        if let Some(class) = filter.class {
            query = query.filter(attendances::Column::ClassId.eq(class.0));
        }
        if let Some(from) = filter.from {
            query = query.filter(attendances::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(attendances::Column::Date.lte(to));
        }
        query = match order {
            Sort::Asc => query
                .order_by_asc(attendances::Column::Date)
                .order_by_asc(attendances::Column::Id),
            Sort::Desc => query
                .order_by_desc(attendances::Column::Date)
                .order_by_desc(attendances::Column::Id),
        };
        let models = query.all(&self.db).await.context("list attendance")?;
        self.populate(models).await
    }

    async fn create(&self, attendance: &Attendance) -> Result<bool, RegistryError> {
        let model = attendances::ActiveModel {
            id: Set(attendance.id.0),
            student_id: Set(attendance.student_id.0),
            class_id: Set(attendance.class_id.0),
            date: Set(attendance.date),
            status: Set(attendance.status.as_str().to_owned()),
            created_at: Set(attendance.created_at),
            updated_at: Set(attendance.updated_at),
        };
        match model.insert(&self.db).await {
            Ok(_) => Ok(true),
            Err(e) if unique_violation(&e).is_some() => Ok(false),
            Err(e) => Err(anyhow::Error::new(e).context("create attendance").into()),
        }
    }

    async fn update_status(
        &self,
        id: AttendanceId,
        status: AttendanceStatus,
    ) -> Result<bool, RegistryError> {
        let result = attendances::Entity::update_many()
            .col_expr(attendances::Column::Status, Expr::value(status.as_str()))
            .col_expr(attendances::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(attendances::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update attendance status")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: AttendanceId) -> Result<bool, RegistryError> {
        let result = attendances::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete attendance")?;
        Ok(result.rows_affected > 0)
    }
}

fn attendance_from_model(model: attendances::Model) -> Result<Attendance, RegistryError> {
    let status: AttendanceStatus = model.status.parse().context("decode attendance status")?;
    Ok(Attendance {
        id: AttendanceId(model.id),
        student_id: StudentId(model.student_id),
        class_id: ClassId(model.class_id),
        date: model.date,
        status,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::infra::db::migrated_db;

    fn record(student: StudentId, date: NaiveDate, status: AttendanceStatus) -> Attendance {
        Attendance {
            id: AttendanceId::generate(),
            student_id: student,
            class_id: ClassId::generate(),
            date,
            status,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn should_refuse_second_row_for_same_student_and_day() {
        let db = migrated_db().await;
        let repo = DbAttendanceRepository { db: db.conn.clone() };
        let student = StudentId::generate();
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        let first = record(student, day, AttendanceStatus::Present);

        assert!(repo.create(&first).await.unwrap());
        let inserted = repo
            .create(&record(student, day, AttendanceStatus::Absent))
            .await
            .unwrap();

        assert!(!inserted);
        let stored = repo.find_for_student_on(student, day).await.unwrap().unwrap();
        assert_eq!(stored.id, first.id);
        assert_eq!(stored.status, AttendanceStatus::Present);
    }

    #[tokio::test]
    async fn should_accept_same_student_on_next_day() {
        let db = migrated_db().await;
        let repo = DbAttendanceRepository { db: db.conn.clone() };
        let student = StudentId::generate();
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        assert!(repo.create(&record(student, day, AttendanceStatus::Present)).await.unwrap());
        assert!(
            repo.create(&record(student, day.succ_opt().unwrap(), AttendanceStatus::Leave))
                .await
                .unwrap()
        );
    }
}
