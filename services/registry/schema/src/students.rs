use sea_orm::entity::prelude::*;

/// Student record. `status` holds the wire name; `expelled_date` and
/// `leave_records` are only meaningful for the matching status.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "students")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub father_name: String,
    #[sea_orm(unique)]
    pub role_number: String,
    #[sea_orm(unique)]
    pub registration_number: String,
    pub father_identity_card: String,
    pub country: String,
    pub current_address: String,
    pub permanent_address: String,
    pub guardian_name: String,
    pub guardian_address: String,
    pub guardian_phone: String,
    pub school_history: String,
    pub last_seminary: String,
    pub date_of_joining: Date,
    pub date_of_birth: Date,
    pub emergency_number: String,
    pub qualification: String,
    #[sea_orm(indexed)]
    pub class_id: Uuid,
    pub department_id: Uuid,
    pub gender: String,
    pub status: String,
    pub expelled_date: Option<Date>,
    /// JSON array of `{fromDate, toDate}`.
    pub leave_records: Json,
    pub stipend_id: Option<Uuid>,
    pub has_stipend: bool,
    pub photo: Option<String>,
    pub birth_certificate: Option<String>,
    pub b_form: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
