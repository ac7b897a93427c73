use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Teachers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Teachers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Teachers::Name).string().not_null())
                    .col(ColumnDef::new(Teachers::TeacherId).string().not_null())
                    .col(ColumnDef::new(Teachers::IdentityCardNo).string().not_null())
                    .col(ColumnDef::new(Teachers::Age).integer().not_null())
                    .col(ColumnDef::new(Teachers::Qualification).string().not_null())
                    .col(ColumnDef::new(Teachers::SubjectId).uuid().not_null())
                    .col(ColumnDef::new(Teachers::Experience).integer().not_null())
                    .col(ColumnDef::new(Teachers::ContactNumber).string().not_null())
                    .col(ColumnDef::new(Teachers::Email).string().not_null())
                    .col(ColumnDef::new(Teachers::Address).string().not_null())
                    .col(ColumnDef::new(Teachers::FatherName).string().not_null())
                    .col(ColumnDef::new(Teachers::MarriedStatus).string().not_null())
                    .col(ColumnDef::new(Teachers::EmergencyNumber).string().not_null())
                    .col(ColumnDef::new(Teachers::DateOfBirth).date().not_null())
                    .col(ColumnDef::new(Teachers::DateOfJoining).date().not_null())
                    .col(ColumnDef::new(Teachers::Status).string().not_null())
                    .col(ColumnDef::new(Teachers::Salary).double().not_null())
                    .col(ColumnDef::new(Teachers::PeriodOfService).string().not_null())
                    .col(ColumnDef::new(Teachers::Increased).double().not_null())
                    .col(
                        ColumnDef::new(Teachers::TotalMonthlySalaryAfterIncrement)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Teachers::ResidentStatus).string().not_null())
                    .col(
                        ColumnDef::new(Teachers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Teachers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        for (name, column) in [
            ("idx_teachers_teacher_id", Teachers::TeacherId),
            ("idx_teachers_identity_card_no", Teachers::IdentityCardNo),
            ("idx_teachers_email", Teachers::Email),
        ] {
            manager
                .create_index(
                    Index::create()
                        .table(Teachers::Table)
                        .col(column)
                        .name(name)
                        .unique()
                        .to_owned(),
                )
                .await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Teachers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Teachers {
    Table,
    Id,
    Name,
    TeacherId,
    IdentityCardNo,
    Age,
    Qualification,
    SubjectId,
    Experience,
    ContactNumber,
    Email,
    Address,
    FatherName,
    MarriedStatus,
    EmergencyNumber,
    DateOfBirth,
    DateOfJoining,
    Status,
    Salary,
    PeriodOfService,
    Increased,
    TotalMonthlySalaryAfterIncrement,
    ResidentStatus,
    CreatedAt,
    UpdatedAt,
}
