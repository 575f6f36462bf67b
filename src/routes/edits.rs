use axum::{
    extract::{Path, Query, State},
    response::Json,
    Extension,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;
use uuid::Uuid;

use crate::entities::photo::{self, Entity as Photo};
use crate::entities::photo_edit::{self, Entity as PhotoEdit};
use crate::entities::project::{self, Entity as Project, ProjectStatus};
use crate::entities::workspace::{self, Entity as Workspace};
use crate::error::AppError;
use crate::middleware::auth::AuthUser;
use crate::prompts::{compose_instruction, display_prompt, enhance_for_room};
use crate::services::fal::{FalImage, COST_PER_IMAGE};
use crate::services::membership;
use crate::services::quota::{self, QuotaInfo};
use crate::utils::images::validate_data_uri;
use crate::AppState;

/// Edit history responses are capped to the most recent entries.
const HISTORY_LIMIT: u64 = 50;

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPhotoRequest {
    #[schema(value_type = String)]
    project_id: Uuid,
    /// Re-edit an existing photo by id
    #[schema(value_type = Option<String>)]
    photo_id: Option<Uuid>,
    /// Or upload a new one as a base64 data URI
    image: Option<String>,
    filename: Option<String>,
    prompt: String,
    room_type: Option<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditPhotoResponse {
    edited_image_url: String,
    applied_prompt: String,
    model: String,
    cost: f64,
    width: Option<i32>,
    height: Option<i32>,
    format: String,
    description: Option<String>,
    #[schema(value_type = Option<String>)]
    photo_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    edit_id: Option<Uuid>,
    quota: QuotaInfo,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct EditHistoryQuery {
    #[param(value_type = Option<String>)]
    project_id: Option<Uuid>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EditHistoryItem {
    #[schema(value_type = String)]
    id: Uuid,
    #[schema(value_type = String)]
    photo_id: Uuid,
    #[schema(value_type = Option<String>)]
    project_id: Option<Uuid>,
    filename: Option<String>,
    original_url: Option<String>,
    edited_url: String,
    display_prompt: String,
    model: String,
    cost: f64,
    width: Option<i32>,
    height: Option<i32>,
    format: String,
    created_at: chrono::NaiveDateTime,
}

enum EditSource {
    Existing(photo::Model),
    New {
        data_uri: String,
        filename: String,
        size: i64,
        format: String,
    },
}

impl EditSource {
    fn image_url(&self) -> &str {
        match self {
            EditSource::Existing(photo) => &photo.url,
            EditSource::New { data_uri, .. } => data_uri,
        }
    }
}

#[utoipa::path(
    post,
    path = "/edit",
    request_body = EditPhotoRequest,
    responses(
        (status = 200, description = "Edited image with quota state", body = EditPhotoResponse),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not edit in this workspace"),
        (status = 404, description = "Project or photo not found"),
        (status = 429, description = "Monthly edit limit reached"),
        (status = 502, description = "Image editing service failed"),
        (status = 504, description = "Image editing service timed out")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Edits"
)]
pub async fn edit_photo(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<EditPhotoRequest>,
) -> Result<Json<EditPhotoResponse>, AppError> {
    let project = Project::find_by_id(payload.project_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

    // Projects in other workspaces read as not found
    let member = membership::find_membership(&state.db, auth_user.id, project.workspace_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;
    if !member.role.can_edit() {
        return Err(AppError::AccessDenied(
            "Viewers cannot edit photos".to_string(),
        ));
    }

    if project.status == ProjectStatus::Archived {
        return Err(AppError::InvalidInput(
            "Cannot edit photos in an archived project".to_string(),
        ));
    }

    let workspace = Workspace::find_by_id(project.workspace_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError(format!(
                "Workspace {} missing for project {}",
                project.workspace_id, project.id
            ))
        })?;

    let prompt = payload.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::InvalidInput("A prompt is required".to_string()));
    }

    let source = match (payload.photo_id, payload.image) {
        (Some(_), Some(_)) => {
            return Err(AppError::InvalidInput(
                "Provide either photoId or image, not both".to_string(),
            ));
        }
        (None, None) => {
            return Err(AppError::InvalidInput(
                "Either photoId or image is required".to_string(),
            ));
        }
        (Some(photo_id), None) => {
            let existing = Photo::find_by_id(photo_id)
                .one(&state.db)
                .await?
                .filter(|p| p.project_id == project.id)
                .ok_or_else(|| AppError::NotFound("Photo not found".to_string()))?;
            EditSource::Existing(existing)
        }
        (None, Some(image)) => {
            let validated = validate_data_uri(&image)?;
            let filename = payload
                .filename
                .filter(|f| !f.trim().is_empty())
                .unwrap_or_else(|| {
                    format!(
                        "photo-{}.{}",
                        chrono::Utc::now().timestamp_millis(),
                        validated.format
                    )
                });
            EditSource::New {
                data_uri: image,
                filename,
                size: validated.size,
                format: validated.format,
            }
        }
    };

    let pre_quota = QuotaInfo::of(&workspace);
    if !pre_quota.has_remaining() {
        println!(
            "Edits | POST /edit | workspace={} | res=429 quota exhausted",
            workspace.slug
        );
        return Err(AppError::QuotaExceeded(
            "Monthly edit limit reached. Upgrade your plan for more edits.".to_string(),
        ));
    }

    let enhanced = enhance_for_room(&prompt, payload.room_type.as_deref());
    let instruction = compose_instruction(&enhanced);

    let result = state.fal.edit_image(&instruction, source.image_url()).await?;
    let description = result.description;
    let image = result
        .images
        .into_iter()
        .next()
        .ok_or_else(|| {
            AppError::UpstreamFailure(
                "No images returned from the image editing service".to_string(),
            )
        })?;

    // The edit succeeded upstream; metering and persistence failures from
    // here on are logged but never turn the response into an error.
    let consumed = match quota::consume_one(&state.db, workspace.id).await {
        Ok(true) => true,
        Ok(false) => {
            eprintln!(
                "Quota consumption lost the race for workspace {}",
                workspace.slug
            );
            false
        }
        Err(e) => {
            eprintln!("Quota consumption failed: {:?}", e);
            false
        }
    };

    let (photo_id, edit_id) = match persist_edit(
        &state.db,
        &workspace,
        &project,
        auth_user.id,
        &source,
        &instruction,
        &state.fal.model,
        &state.fal.output_format,
        &image,
    )
    .await
    {
        Ok(ids) => (Some(ids.0), Some(ids.1)),
        Err(e) => {
            eprintln!("Edit persistence failed, returning result anyway: {:?}", e);
            (None, None)
        }
    };

    let quota = refreshed_quota(&state.db, &workspace, consumed).await;

    println!(
        "Edits | POST /edit | workspace={} | project={} | res=200",
        workspace.slug, project.id
    );

    Ok(Json(EditPhotoResponse {
        edited_image_url: image.url,
        applied_prompt: display_prompt(&instruction),
        model: state.fal.model.clone(),
        cost: COST_PER_IMAGE,
        width: image.width,
        height: image.height,
        format: state.fal.output_format.clone(),
        description,
        photo_id,
        edit_id,
        quota,
    }))
}

#[allow(clippy::too_many_arguments)]
async fn persist_edit(
    db: &DatabaseConnection,
    workspace: &workspace::Model,
    project: &project::Model,
    user_id: Uuid,
    source: &EditSource,
    instruction: &str,
    model: &str,
    output_format: &str,
    image: &FalImage,
) -> Result<(Uuid, Uuid), AppError> {
    let now = chrono::Utc::now().naive_utc();
    let txn = db.begin().await?;

    let photo_id = match source {
        EditSource::Existing(photo) => photo.id,
        EditSource::New {
            data_uri,
            filename,
            size,
            format,
        } => {
            let created = photo::ActiveModel {
                id: Set(Uuid::new_v4()),
                workspace_id: Set(workspace.id),
                project_id: Set(project.id),
                uploaded_by: Set(user_id),
                filename: Set(filename.clone()),
                url: Set(data_uri.clone()),
                size: Set(*size),
                format: Set(format.clone()),
                created_at: Set(now),
            }
            .insert(&txn)
            .await?;
            created.id
        }
    };

    let edit = photo_edit::ActiveModel {
        id: Set(Uuid::new_v4()),
        photo_id: Set(photo_id),
        edited_url: Set(image.url.clone()),
        prompt: Set(instruction.to_string()),
        model: Set(model.to_string()),
        cost: Set(COST_PER_IMAGE),
        width: Set(image.width),
        height: Set(image.height),
        format: Set(output_format.to_string()),
        created_by: Set(user_id),
        created_at: Set(now),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((photo_id, edit.id))
}

/// Re-reads the workspace for a fresh counter. Falls back to the pre-edit
/// snapshot if the read fails, so the response never errors here.
async fn refreshed_quota(
    db: &DatabaseConnection,
    workspace: &workspace::Model,
    consumed: bool,
) -> QuotaInfo {
    match Workspace::find_by_id(workspace.id).one(db).await {
        Ok(Some(fresh)) => QuotaInfo::of(&fresh),
        Ok(None) | Err(_) => {
            let used = workspace.current_month_edits + i32::from(consumed);
            QuotaInfo {
                used,
                limit: workspace.monthly_edit_limit,
                remaining: workspace.monthly_edit_limit - used,
            }
        }
    }
}

#[utoipa::path(
    get,
    path = "/edits",
    params(
        EditHistoryQuery
    ),
    responses(
        (status = 200, description = "Recent edits across the workspace, newest first", body = [EditHistoryItem]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Edits"
)]
pub async fn list_edits(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<EditHistoryQuery>,
) -> Result<Json<Vec<EditHistoryItem>>, AppError> {
    let (workspace, _member) = membership::workspace_for_user(&state.db, auth_user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("No workspace found for this user".to_string()))?;

    let mut finder = PhotoEdit::find()
        .find_also_related(Photo)
        .filter(photo::Column::WorkspaceId.eq(workspace.id));

    if let Some(project_id) = query.project_id {
        finder = finder.filter(photo::Column::ProjectId.eq(project_id));
    }

    let rows = finder
        .order_by_desc(photo_edit::Column::CreatedAt)
        .limit(HISTORY_LIMIT)
        .all(&state.db)
        .await?;

    let count = rows.len();
    let items: Vec<EditHistoryItem> = rows
        .into_iter()
        .map(|(edit, photo)| EditHistoryItem {
            id: edit.id,
            photo_id: edit.photo_id,
            project_id: photo.as_ref().map(|p| p.project_id),
            filename: photo.as_ref().map(|p| p.filename.clone()),
            original_url: photo.map(|p| p.url),
            edited_url: edit.edited_url,
            display_prompt: display_prompt(&edit.prompt),
            model: edit.model,
            cost: edit.cost,
            width: edit.width,
            height: edit.height,
            format: edit.format,
            created_at: edit.created_at,
        })
        .collect();

    println!(
        "Edits | GET /edits | workspace={} | count={} | res=200",
        workspace.slug, count
    );

    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/edits/{id}",
    params(
        ("id" = String, Path, description = "Edit ID")
    ),
    responses(
        (status = 200, description = "Edit deleted successfully"),
        (status = 403, description = "Caller may not delete edits"),
        (status = 404, description = "Edit not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Edits"
)]
pub async fn delete_edit(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(edit_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let edit = PhotoEdit::find_by_id(edit_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Edit not found".to_string()))?;

    let photo = Photo::find_by_id(edit.photo_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Edit not found".to_string()))?;

    let member = membership::find_membership(&state.db, auth_user.id, photo.workspace_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Edit not found".to_string()))?;

    if !member.role.can_edit() {
        return Err(AppError::AccessDenied(
            "You do not have permission to delete edits".to_string(),
        ));
    }

    edit.delete(&state.db).await?;

    println!(
        "Edits | DELETE /edits/{} | workspace={} | res=200",
        edit_id, photo.workspace_id
    );

    Ok(Json(serde_json::json!({
        "message": "Edit deleted successfully"
    })))
}
