pub use sea_orm_migration::prelude::*;

mod m20250115_000001_create_users_table;
mod m20250115_000002_create_refresh_tokens_table;
mod m20250120_000003_create_workspaces_table;
mod m20250120_000004_create_workspace_members_table;
mod m20250121_000005_create_projects_table;
mod m20250203_000006_create_photos_table;
mod m20250203_000007_create_photo_edits_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250115_000001_create_users_table::Migration),
            Box::new(m20250115_000002_create_refresh_tokens_table::Migration),
            Box::new(m20250120_000003_create_workspaces_table::Migration),
            Box::new(m20250120_000004_create_workspace_members_table::Migration),
            Box::new(m20250121_000005_create_projects_table::Migration),
            Box::new(m20250203_000006_create_photos_table::Migration),
            Box::new(m20250203_000007_create_photo_edits_table::Migration),
        ]
    }
}
