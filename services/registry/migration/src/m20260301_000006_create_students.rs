use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Students::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Students::Name).string().not_null())
                    .col(ColumnDef::new(Students::FatherName).string().not_null())
                    .col(ColumnDef::new(Students::RoleNumber).string().not_null())
                    .col(ColumnDef::new(Students::RegistrationNumber).string().not_null())
                    .col(ColumnDef::new(Students::FatherIdentityCard).string().not_null())
                    .col(ColumnDef::new(Students::Country).string().not_null())
                    .col(ColumnDef::new(Students::CurrentAddress).string().not_null())
                    .col(ColumnDef::new(Students::PermanentAddress).string().not_null())
                    .col(ColumnDef::new(Students::GuardianName).string().not_null())
                    .col(ColumnDef::new(Students::GuardianAddress).string().not_null())
                    .col(ColumnDef::new(Students::GuardianPhone).string().not_null())
                    .col(ColumnDef::new(Students::SchoolHistory).string().not_null())
                    .col(ColumnDef::new(Students::LastSeminary).string().not_null())
                    .col(ColumnDef::new(Students::DateOfJoining).date().not_null())
                    .col(ColumnDef::new(Students::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Students::EmergencyNumber).string().not_null())
                    .col(ColumnDef::new(Students::Qualification).string().not_null())
                    .col(ColumnDef::new(Students::ClassId).uuid().not_null())
                    .col(ColumnDef::new(Students::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Students::Gender).string().not_null())
                    .col(
                        ColumnDef::new(Students::Status)
                            .string()
                            .not_null()
                            .default("Active"),
                    )
                    .col(ColumnDef::new(Students::ExpelledDate).date().null())
                    .col(ColumnDef::new(Students::LeaveRecords).json().not_null())
                    .col(ColumnDef::new(Students::StipendId).uuid().null())
                    .col(
                        ColumnDef::new(Students::HasStipend)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Students::Photo).string().null())
                    .col(ColumnDef::new(Students::BirthCertificate).string().null())
                    .col(ColumnDef::new(Students::BForm).string().null())
                    .col(
                        ColumnDef::new(Students::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Students::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Students::Table)
                    .col(Students::RoleNumber)
                    .name("idx_students_role_number")
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Students::Table)
                    .col(Students::RegistrationNumber)
                    .name("idx_students_registration_number")
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .name("idx_students_class_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Students {
    Table,
    Id,
    Name,
    FatherName,
    RoleNumber,
    RegistrationNumber,
    FatherIdentityCard,
    Country,
    CurrentAddress,
    PermanentAddress,
    GuardianName,
    GuardianAddress,
    GuardianPhone,
    SchoolHistory,
    LastSeminary,
    DateOfJoining,
    DateOfBirth,
    EmergencyNumber,
    Qualification,
    ClassId,
    DepartmentId,
    Gender,
    Status,
    ExpelledDate,
    LeaveRecords,
    StipendId,
    HasStipend,
    Photo,
    BirthCertificate,
    BForm,
    CreatedAt,
    UpdatedAt,
}
