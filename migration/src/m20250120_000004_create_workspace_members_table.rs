use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(WorkspaceMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(WorkspaceMembers::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(WorkspaceMembers::UserId).uuid().not_null())
                    .col(ColumnDef::new(WorkspaceMembers::WorkspaceId).uuid().not_null())
                    .col(ColumnDef::new(WorkspaceMembers::Role).string().not_null())
                    .col(ColumnDef::new(WorkspaceMembers::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_members_user_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_workspace_members_workspace_id")
                            .from(WorkspaceMembers::Table, WorkspaceMembers::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_workspace_members_user_workspace")
                    .table(WorkspaceMembers::Table)
                    .col(WorkspaceMembers::UserId)
                    .col(WorkspaceMembers::WorkspaceId)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(WorkspaceMembers::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum WorkspaceMembers {
    Table,
    Id,
    UserId,
    WorkspaceId,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}
