use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub teacher_id: String,
    #[sea_orm(unique)]
    pub identity_card_no: String,
    pub age: i32,
    pub qualification: String,
    pub subject_id: Uuid,
    pub experience: i32,
    pub contact_number: String,
    /// Stored lower-cased.
    #[sea_orm(unique)]
    pub email: String,
    pub address: String,
    pub father_name: String,
    pub married_status: String,
    pub emergency_number: String,
    pub date_of_birth: Date,
    pub date_of_joining: Date,
    pub status: String,
    pub salary: f64,
    pub period_of_service: String,
    pub increased: f64,
    pub total_monthly_salary_after_increment: f64,
    pub resident_status: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
