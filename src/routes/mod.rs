mod auth;
mod edits;
mod home;
mod photos;
mod projects;
mod prompts;
mod workspaces;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::middleware::auth::auth_middleware;
use crate::AppState;

// Base64 of a 10MB image runs ~13.4MB, plus JSON overhead
const MAX_REQUEST_BODY_BYTES: usize = 20 * 1024 * 1024;

// Define the OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // General endpoints
        home::root,
        home::health,
        // Prompt catalog
        prompts::list_prompts,
        // Authentication endpoints
        auth::signup,
        auth::login,
        auth::refresh,
        auth::logout,
        auth::me,
        auth::providers,
        // Workspace
        workspaces::get_workspace,
        // Project management
        projects::create_project,
        projects::list_projects,
        projects::get_project,
        projects::update_project,
        projects::archive_project,
        // Photos
        photos::list_photos,
        photos::list_project_photos,
        // Edits
        edits::edit_photo,
        edits::list_edits,
        edits::delete_edit,
    ),
    components(
        schemas(
            // Home schemas
            home::HealthResponse,
            // Prompt schemas
            prompts::PromptItem,
            prompts::PromptsResponse,
            crate::prompts::PromptCategory,
            // Auth schemas
            auth::SignupRequest,
            auth::SignupResponse,
            auth::WorkspaceSummary,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::RefreshRequest,
            auth::RefreshResponse,
            auth::LogoutRequest,
            auth::LogoutResponse,
            auth::UserProfile,
            auth::ProvidersResponse,
            crate::services::provisioning::BusinessProfile,
            // Workspace schemas
            workspaces::WorkspaceResponse,
            crate::services::quota::QuotaInfo,
            crate::entities::workspace::SubscriptionTier,
            crate::entities::workspace_member::MemberRole,
            // Project schemas
            projects::CreateProjectRequest,
            projects::UpdateProjectRequest,
            projects::ProjectResponse,
            crate::entities::project::ProjectStatus,
            crate::pagination::PaginatedResponse<projects::ProjectResponse>,
            // Photo schemas
            photos::EditSummary,
            photos::GalleryPhotoResponse,
            photos::ProjectPhotoResponse,
            // Edit schemas
            edits::EditPhotoRequest,
            edits::EditPhotoResponse,
            edits::EditHistoryItem,
        )
    ),
    tags(
        (name = "General", description = "General API information and health"),
        (name = "Prompts", description = "Curated real estate prompt catalog"),
        (name = "Authentication", description = "Signup, login, token refresh, and logout"),
        (name = "Workspace", description = "The caller's workspace, quota, and billing details"),
        (name = "Project Management", description = "Projects grouping photos within a workspace"),
        (name = "Photos", description = "Photo galleries and per-project photo listings"),
        (name = "Edits", description = "AI photo editing and edit history")
    ),
    info(
        title = "EstatePhotoKit API",
        version = "0.1.0",
        description = "A Rust/Axum backend for AI-assisted real estate photo editing with workspaces, projects, and monthly edit quotas",
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

// Add security scheme for JWT Bearer tokens
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.as_mut().unwrap();
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(
                utoipa::openapi::security::Http::new(
                    utoipa::openapi::security::HttpAuthScheme::Bearer,
                ),
            ),
        );
    }
}

pub fn create_routes(state: AppState) -> Router {
    // Swagger UI (stateless)
    let swagger_router: Router = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into();

    // Protected routes that require auth
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me))
        .route("/workspace", get(workspaces::get_workspace))
        .route("/projects", post(projects::create_project))
        .route("/projects", get(projects::list_projects))
        .route("/projects/{id}", get(projects::get_project))
        .route("/projects/{id}", put(projects::update_project))
        .route("/projects/{id}", delete(projects::archive_project))
        .route("/projects/{id}/photos", get(photos::list_project_photos))
        .route("/photos", get(photos::list_photos))
        .route("/edit", post(edits::edit_photo))
        .route("/edits", get(edits::list_edits))
        .route("/edits/{id}", delete(edits::delete_edit))
        .layer(middleware::from_fn(auth_middleware));

    // Public routes (no auth required) and merge all together
    let app_routes = Router::new()
        .route("/", get(home::root))
        .route("/health", get(home::health))
        .route("/prompts", get(prompts::list_prompts))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/providers", get(auth::providers))
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    // Merge Swagger UI (which has no state) with the rest
    Router::new().merge(swagger_router).merge(app_routes)
}
