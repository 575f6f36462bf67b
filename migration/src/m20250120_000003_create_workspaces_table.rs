use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Workspaces::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Workspaces::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Workspaces::Name).string().not_null())
                    .col(ColumnDef::new(Workspaces::Slug).string().not_null().unique_key())
                    .col(ColumnDef::new(Workspaces::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Workspaces::BillingEmail).string())
                    .col(ColumnDef::new(Workspaces::CompanyName).string())
                    .col(ColumnDef::new(Workspaces::VatNumber).string())
                    .col(
                        ColumnDef::new(Workspaces::SubscriptionTier)
                            .string()
                            .not_null()
                            .default("FREE"),
                    )
                    .col(
                        ColumnDef::new(Workspaces::MonthlyEditLimit)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(Workspaces::CurrentMonthEdits)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Workspaces::CreatedAt).timestamp().not_null())
                    .col(ColumnDef::new(Workspaces::UpdatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspaces_owner_id")
                            .from(Workspaces::Table, Workspaces::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Workspaces::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
    Name,
    Slug,
    OwnerId,
    BillingEmail,
    CompanyName,
    VatNumber,
    SubscriptionTier,
    MonthlyEditLimit,
    CurrentMonthEdits,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
