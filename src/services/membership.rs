use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::workspace;
use crate::entities::workspace_member::{self, Entity as WorkspaceMember};
use crate::error::AppError;

pub async fn find_membership<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    workspace_id: Uuid,
) -> Result<Option<workspace_member::Model>, AppError> {
    let membership = WorkspaceMember::find()
        .filter(workspace_member::Column::UserId.eq(user_id))
        .filter(workspace_member::Column::WorkspaceId.eq(workspace_id))
        .one(db)
        .await?;

    Ok(membership)
}

/// Resolves the workspace a user belongs to. Every user gets exactly one
/// workspace at signup, so the first membership row is authoritative.
pub async fn workspace_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> Result<Option<(workspace::Model, workspace_member::Model)>, AppError> {
    let found = WorkspaceMember::find()
        .filter(workspace_member::Column::UserId.eq(user_id))
        .find_also_related(workspace::Entity)
        .one(db)
        .await?;

    match found {
        Some((member, Some(workspace))) => Ok(Some((workspace, member))),
        _ => Ok(None),
    }
}
