use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Photos::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Photos::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Photos::WorkspaceId).uuid().not_null())
                    .col(ColumnDef::new(Photos::ProjectId).uuid().not_null())
                    .col(ColumnDef::new(Photos::UploadedBy).uuid().not_null())
                    .col(ColumnDef::new(Photos::Filename).string().not_null())
                    .col(ColumnDef::new(Photos::Url).text().not_null())
                    .col(ColumnDef::new(Photos::Size).big_integer().not_null())
                    .col(ColumnDef::new(Photos::Format).string().not_null())
                    .col(ColumnDef::new(Photos::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_workspace_id")
                            .from(Photos::Table, Photos::WorkspaceId)
                            .to(Workspaces::Table, Workspaces::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_project_id")
                            .from(Photos::Table, Photos::ProjectId)
                            .to(Projects::Table, Projects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photos_uploaded_by")
                            .from(Photos::Table, Photos::UploadedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Photos::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
    WorkspaceId,
    ProjectId,
    UploadedBy,
    Filename,
    Url,
    Size,
    Format,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Workspaces {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Projects {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
