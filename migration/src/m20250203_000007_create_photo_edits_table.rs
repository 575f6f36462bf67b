use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PhotoEdits::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PhotoEdits::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PhotoEdits::PhotoId).uuid().not_null())
                    .col(ColumnDef::new(PhotoEdits::EditedUrl).text().not_null())
                    .col(ColumnDef::new(PhotoEdits::Prompt).text().not_null())
                    .col(ColumnDef::new(PhotoEdits::Model).string().not_null())
                    .col(ColumnDef::new(PhotoEdits::Cost).double().not_null())
                    .col(ColumnDef::new(PhotoEdits::Width).integer())
                    .col(ColumnDef::new(PhotoEdits::Height).integer())
                    .col(ColumnDef::new(PhotoEdits::Format).string().not_null())
                    .col(ColumnDef::new(PhotoEdits::CreatedBy).uuid().not_null())
                    .col(ColumnDef::new(PhotoEdits::CreatedAt).timestamp().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_edits_photo_id")
                            .from(PhotoEdits::Table, PhotoEdits::PhotoId)
                            .to(Photos::Table, Photos::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_photo_edits_created_by")
                            .from(PhotoEdits::Table, PhotoEdits::CreatedBy)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PhotoEdits::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PhotoEdits {
    Table,
    Id,
    PhotoId,
    EditedUrl,
    Prompt,
    Model,
    Cost,
    Width,
    Height,
    Format,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Photos {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
