use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use chrono::Datelike;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::photo::{self, Entity as Photo};
use crate::entities::project::{self, Entity as Project, ProjectStatus};
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::pagination::{PaginatedResponse, Pagination};
use crate::services::membership;
use crate::AppState;

const NEW_PROJECT_DESCRIPTION: &str = "Klikk for å endre adresse";

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    #[schema(value_type = String)]
    id: Uuid,
    name: String,
    description: Option<String>,
    status: ProjectStatus,
    photo_count: u64,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
}

impl ProjectResponse {
    fn from_model(project: project::Model, photo_count: u64) -> Self {
        ProjectResponse {
            id: project.id,
            name: project.name,
            description: project.description,
            status: project.status,
            photo_count,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Unnamed projects get a dated Norwegian listing title, same as the editor
/// shows for a fresh property.
fn default_project_name(today: chrono::NaiveDate) -> String {
    format!(
        "Ny eiendom - {}.{}.{}",
        today.day(),
        today.month(),
        today.year()
    )
}

#[utoipa::path(
    post,
    path = "/projects",
    request_body = CreateProjectRequest,
    responses(
        (status = 201, description = "Project created successfully", body = ProjectResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No workspace provisioned for this user")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Project Management"
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), AppError> {
    println!("Create project request for user: {}", auth_user.email);

    let (workspace, _member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let named = payload.name.filter(|n| !n.trim().is_empty());
    let (name, description) = match named {
        Some(name) => (name, payload.description),
        None => (
            default_project_name(chrono::Utc::now().date_naive()),
            payload
                .description
                .or_else(|| Some(NEW_PROJECT_DESCRIPTION.to_string())),
        ),
    };

    let now = chrono::Utc::now().naive_utc();
    let created = project::ActiveModel {
        id: Set(Uuid::new_v4()),
        workspace_id: Set(workspace.id),
        created_by: Set(auth_user.id),
        name: Set(name),
        description: Set(description),
        status: Set(ProjectStatus::Active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    println!("Project '{}' created successfully", created.name);
    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse::from_model(created, 0)),
    ))
}

#[utoipa::path(
    get,
    path = "/projects",
    params(
        Pagination
    ),
    responses(
        (status = 200, description = "Projects in the caller's workspace", body = PaginatedResponse<ProjectResponse>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Project Management"
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(pagination): Query<Pagination>,
) -> Result<Json<PaginatedResponse<ProjectResponse>>, AppError> {
    println!("List projects request for user: {}", auth_user.email);

    let (workspace, _member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let paginator = Project::find()
        .filter(project::Column::WorkspaceId.eq(workspace.id))
        .order_by_desc(project::Column::UpdatedAt)
        .paginate(&state.db, pagination.limit());

    let total_items = paginator.num_items().await?;
    let projects = paginator.fetch_page(pagination.page() - 1).await?;

    // Count photos per project in memory; galleries are small
    let project_ids: Vec<Uuid> = projects.iter().map(|p| p.id).collect();
    let mut photo_counts: HashMap<Uuid, u64> = HashMap::new();
    if !project_ids.is_empty() {
        let photos = Photo::find()
            .filter(photo::Column::ProjectId.is_in(project_ids))
            .all(&state.db)
            .await?;
        for photo in photos {
            *photo_counts.entry(photo.project_id).or_insert(0) += 1;
        }
    }

    let responses: Vec<ProjectResponse> = projects
        .into_iter()
        .map(|p| {
            let count = photo_counts.get(&p.id).copied().unwrap_or(0);
            ProjectResponse::from_model(p, count)
        })
        .collect();

    Ok(Json(PaginatedResponse::new(
        responses,
        total_items,
        pagination.page(),
        pagination.limit(),
    )))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project details", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Project Management"
)]
pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ProjectResponse>, AppError> {
    println!("Get project request for ID: {}", project_id);

    let project = find_project_for_user(&state, &auth_user, project_id).await?;

    let photo_count = Photo::find()
        .filter(photo::Column::ProjectId.eq(project.id))
        .count(&state.db)
        .await?;

    Ok(Json(ProjectResponse::from_model(project, photo_count)))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    request_body = UpdateProjectRequest,
    responses(
        (status = 200, description = "Project updated successfully", body = ProjectResponse),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Project Management"
)]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, AppError> {
    println!("Update project request for ID: {}", project_id);

    let project = find_project_for_user(&state, &auth_user, project_id).await?;

    let mut active_project = project.into_active_model();

    if let Some(name) = payload.name.filter(|n| !n.trim().is_empty()) {
        active_project.name = Set(name);
    }
    if let Some(description) = payload.description {
        active_project.description = Set(Some(description));
    }

    active_project.updated_at = Set(chrono::Utc::now().naive_utc());

    let updated = active_project.update(&state.db).await?;

    let photo_count = Photo::find()
        .filter(photo::Column::ProjectId.eq(updated.id))
        .count(&state.db)
        .await?;

    Ok(Json(ProjectResponse::from_model(updated, photo_count)))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Project archived successfully"),
        (status = 403, description = "Caller may not archive projects"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Project Management"
)]
pub async fn archive_project(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    println!("Archive project request for ID: {}", project_id);

    let (_workspace, member, project) =
        find_project_with_member(&state, &auth_user, project_id).await?;

    if !member.role.can_manage() {
        return Err(AppError::AccessDenied(
            "Only workspace owners and admins can archive projects".to_string(),
        ));
    }

    let mut active_project = project.into_active_model();
    active_project.status = Set(ProjectStatus::Archived);
    active_project.updated_at = Set(chrono::Utc::now().naive_utc());
    active_project.update(&state.db).await?;

    Ok(Json(serde_json::json!({
        "message": "Project archived successfully"
    })))
}

/// Looks up a project and verifies it belongs to the caller's workspace.
/// Cross-workspace ids read as not found rather than forbidden.
async fn find_project_for_user(
    state: &AppState,
    auth_user: &AuthUser,
    project_id: Uuid,
) -> Result<project::Model, AppError> {
    let (_, _, project) = find_project_with_member(state, auth_user, project_id).await?;
    Ok(project)
}

async fn find_project_with_member(
    state: &AppState,
    auth_user: &AuthUser,
    project_id: Uuid,
) -> Result<
    (
        crate::entities::workspace::Model,
        crate::entities::workspace_member::Model,
        project::Model,
    ),
    AppError,
> {
    let (workspace, member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let project = Project::find_by_id(project_id)
        .one(&state.db)
        .await?
        .filter(|p| p.workspace_id == workspace.id)
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    Ok((workspace, member, project))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_name_uses_norwegian_date_format() {
        let date = chrono::NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(default_project_name(date), "Ny eiendom - 5.3.2026");
    }
}
