use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Stipends::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Stipends::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Stipends::StipendName).string().not_null())
                    .col(ColumnDef::new(Stipends::NameKey).string().not_null())
                    .col(ColumnDef::new(Stipends::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Stipends::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Stipends::UpdatedAt)
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
                    .table(Stipends::Table)
                    .col(Stipends::NameKey)
                    .name("idx_stipends_name_key")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Stipends::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Stipends {
    Table,
    Id,
    StipendName,
    NameKey,
    Amount,
    CreatedAt,
    UpdatedAt,
}
