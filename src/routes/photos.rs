use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::entities::photo::{self, Entity as Photo};
use crate::entities::photo_edit::{self, Entity as PhotoEdit};
use crate::entities::project::Entity as Project;
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::prompts::display_prompt;
use crate::services::membership;
use crate::AppState;

/// Workspace gallery is capped to the most recent photos.
const GALLERY_LIMIT: u64 = 100;

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditSummary {
    #[schema(value_type = String)]
    id: Uuid,
    edited_url: String,
    display_prompt: String,
    model: String,
    cost: f64,
    width: Option<i32>,
    height: Option<i32>,
    format: String,
    created_at: chrono::NaiveDateTime,
}

impl From<photo_edit::Model> for EditSummary {
    fn from(edit: photo_edit::Model) -> Self {
        EditSummary {
            id: edit.id,
            edited_url: edit.edited_url,
            display_prompt: display_prompt(&edit.prompt),
            model: edit.model,
            cost: edit.cost,
            width: edit.width,
            height: edit.height,
            format: edit.format,
            created_at: edit.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GalleryPhotoResponse {
    #[schema(value_type = String)]
    id: Uuid,
    #[schema(value_type = String)]
    project_id: Uuid,
    filename: String,
    url: String,
    size: i64,
    format: String,
    created_at: chrono::NaiveDateTime,
    latest_edit: Option<EditSummary>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPhotoResponse {
    #[schema(value_type = String)]
    id: Uuid,
    #[schema(value_type = String)]
    project_id: Uuid,
    filename: String,
    url: String,
    size: i64,
    format: String,
    created_at: chrono::NaiveDateTime,
    edits: Vec<EditSummary>,
}

#[utoipa::path(
    get,
    path = "/photos",
    responses(
        (status = 200, description = "Recent photos across the workspace with their latest edit", body = [GalleryPhotoResponse]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Photos"
)]
pub async fn list_photos(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Result<Json<Vec<GalleryPhotoResponse>>, AppError> {
    let (workspace, _member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let photos = Photo::find()
        .filter(photo::Column::WorkspaceId.eq(workspace.id))
        .order_by_desc(photo::Column::CreatedAt)
        .limit(GALLERY_LIMIT)
        .all(&state.db)
        .await?;

    // One query for the edits, newest first, then keep the first seen per photo
    let photo_ids: Vec<Uuid> = photos.iter().map(|p| p.id).collect();
    let mut latest_edits: HashMap<Uuid, photo_edit::Model> = HashMap::new();
    if !photo_ids.is_empty() {
        let edits = PhotoEdit::find()
            .filter(photo_edit::Column::PhotoId.is_in(photo_ids))
            .order_by_desc(photo_edit::Column::CreatedAt)
            .all(&state.db)
            .await?;
        for edit in edits {
            latest_edits.entry(edit.photo_id).or_insert(edit);
        }
    }

    let count = photos.len();
    let responses: Vec<GalleryPhotoResponse> = photos
        .into_iter()
        .map(|p| {
            let latest_edit = latest_edits.remove(&p.id).map(EditSummary::from);
            GalleryPhotoResponse {
                id: p.id,
                project_id: p.project_id,
                filename: p.filename,
                url: p.url,
                size: p.size,
                format: p.format,
                created_at: p.created_at,
                latest_edit,
            }
        })
        .collect();

    println!(
        "Photos | GET /photos | workspace={} | count={} | res=200",
        workspace.slug, count
    );

    Ok(Json(responses))
}

#[utoipa::path(
    get,
    path = "/projects/{id}/photos",
    params(
        ("id" = String, Path, description = "Project ID")
    ),
    responses(
        (status = 200, description = "Photos in the project with full edit history", body = [ProjectPhotoResponse]),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Project not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Photos"
)]
pub async fn list_project_photos(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<Vec<ProjectPhotoResponse>>, AppError> {
    let (workspace, _member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let project = Project::find_by_id(project_id)
        .one(&state.db)
        .await?
        .filter(|p| p.workspace_id == workspace.id)
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    let photos = Photo::find()
        .filter(photo::Column::ProjectId.eq(project.id))
        .order_by_desc(photo::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let photo_ids: Vec<Uuid> = photos.iter().map(|p| p.id).collect();
    let mut edits_by_photo: HashMap<Uuid, Vec<EditSummary>> = HashMap::new();
    if !photo_ids.is_empty() {
        let edits = PhotoEdit::find()
            .filter(photo_edit::Column::PhotoId.is_in(photo_ids))
            .order_by_desc(photo_edit::Column::CreatedAt)
            .all(&state.db)
            .await?;
        for edit in edits {
            edits_by_photo
                .entry(edit.photo_id)
                .or_default()
                .push(EditSummary::from(edit));
        }
    }

    let count = photos.len();
    let responses: Vec<ProjectPhotoResponse> = photos
        .into_iter()
        .map(|p| {
            let edits = edits_by_photo.remove(&p.id).unwrap_or_default();
            ProjectPhotoResponse {
                id: p.id,
                project_id: p.project_id,
                filename: p.filename,
                url: p.url,
                size: p.size,
                format: p.format,
                created_at: p.created_at,
                edits,
            }
        })
        .collect();

    println!(
        "Photos | GET /projects/{}/photos | workspace={} | count={} | res=200",
        project.id, workspace.slug, count
    );

    Ok(Json(responses))
}
