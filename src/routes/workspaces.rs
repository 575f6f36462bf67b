use axum::{extract::State, response::Json, Extension};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::photo::{self, Entity as Photo};
use crate::entities::project::{self, Entity as Project};
use crate::entities::workspace::SubscriptionTier;
use crate::entities::workspace_member::MemberRole;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::services::membership;
use crate::services::provisioning;
use crate::services::quota::QuotaInfo;
use crate::AppState;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceResponse {
    #[schema(value_type = String)]
    id: Uuid,
    name: String,
    slug: String,
    role: MemberRole,
    subscription_tier: SubscriptionTier,
    billing_email: Option<String>,
    company_name: Option<String>,
    vat_number: Option<String>,
    quota: QuotaInfo,
    project_count: u64,
    photo_count: u64,
    #[schema(value_type = String)]
    default_project_id: Uuid,
    created_at: chrono::NaiveDateTime,
}

#[utoipa::path(
    get,
    path = "/workspace",
    responses(
        (status = 200, description = "The caller's workspace with quota and counts", body = WorkspaceResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No workspace provisioned for this user")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Workspace"
)]
pub async fn get_workspace(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<WorkspaceResponse>, AppError> {
    let (workspace, member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    // A workspace should always have at least one project; recreate the
    // default one if every project has been deleted out-of-band.
    let default_project =
        provisioning::ensure_default_project(&state.db, &workspace, auth_user.id).await?;

    let project_count = Project::find()
        .filter(project::Column::WorkspaceId.eq(workspace.id))
        .count(&state.db)
        .await?;

    let photo_count = Photo::find()
        .filter(photo::Column::WorkspaceId.eq(workspace.id))
        .count(&state.db)
        .await?;

    println!(
        "Workspace | GET /workspace | user={} | slug={} | res=200",
        auth_user.email, workspace.slug
    );

    let quota = QuotaInfo::of(&workspace);

    Ok(Json(WorkspaceResponse {
        id: workspace.id,
        name: workspace.name,
        slug: workspace.slug,
        role: member.role,
        subscription_tier: workspace.subscription_tier,
        billing_email: workspace.billing_email,
        company_name: workspace.company_name,
        vat_number: workspace.vat_number,
        quota,
        project_count,
        photo_count,
        default_project_id: default_project.id,
        created_at: workspace.created_at,
    }))
}
