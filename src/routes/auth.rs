use axum::{extract::State, response::Json};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher};
use base64::{engine::general_purpose, Engine as _};
use jsonwebtoken::{encode, EncodingKey, Header};
use rand::Rng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::env;
use uuid::Uuid;

use crate::entities::refresh_token::{self, Entity as RefreshToken};
use crate::entities::user::{self, Entity as User};
use crate::error::AppError;
use crate::middleware::auth::{get_jwt_secret, AuthUser, Claims};
use crate::services::provisioning::{self, BusinessProfile};
use crate::AppState;

const ACCESS_TOKEN_TTL_SECS: usize = 900;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    email: String,
    password: String,
    name: Option<String>,
    business: Option<BusinessProfile>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WorkspaceSummary {
    #[schema(value_type = String)]
    id: Uuid,
    name: String,
    slug: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    access_token: String,
    refresh_token: String,
    expires_in: usize,
    workspace: WorkspaceSummary,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    access_token: String,
    refresh_token: String,
    expires_in: usize,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct RefreshRequest {
    refresh_token: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct RefreshResponse {
    access_token: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct LogoutRequest {
    refresh_token: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LogoutResponse {
    message: String,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ProvidersResponse {
    credentials: bool,
    google: bool,
}

fn generate_refresh_token() -> String {
    let mut random_bytes = [0u8; 32];
    rand::thread_rng().fill(&mut random_bytes);
    general_purpose::STANDARD.encode(random_bytes)
}

fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn issue_access_token(user: &user::Model) -> Result<String, AppError> {
    let expiration = chrono::Utc::now().timestamp() as usize + ACCESS_TOKEN_TTL_SECS;

    let claims = Claims {
        sub: user.id.to_string(),
        email: user.email.clone(),
        exp: expiration,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::InternalServerError(format!("Token encode error: {}", e)))
}

async fn issue_refresh_token(
    db: &sea_orm::DatabaseConnection,
    user_id: Uuid,
) -> Result<String, AppError> {
    let refresh_token_str = generate_refresh_token();
    let token_hash = hash_token(&refresh_token_str);

    // Refresh tokens live for 1 day
    let refresh_expires_at = chrono::Utc::now().naive_utc() + chrono::Duration::days(1);

    refresh_token::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        token_hash: Set(token_hash),
        expires_at: Set(refresh_expires_at),
        created_at: Set(chrono::Utc::now().naive_utc()),
        revoked: Set(false),
    }
    .insert(db)
    .await?;

    Ok(refresh_token_str)
}

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 200, description = "Account created and workspace provisioned", body = SignupResponse),
        (status = 400, description = "Invalid email or password"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
pub async fn signup(
    State(state): State<AppState>,
    Json(payload): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    println!("Signup attempt for: {}", email);

    if !email.contains('@') {
        return Err(AppError::InvalidInput(
            "A valid email address is required".to_string(),
        ));
    }
    if payload.password.len() < 8 {
        return Err(AppError::InvalidInput(
            "Password must be at least 8 characters".to_string(),
        ));
    }

    let existing = User::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "An account with this email already exists".to_string(),
        ));
    }

    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| AppError::InternalServerError(format!("Password hash error: {}", e)))?
        .to_string();

    let now = chrono::Utc::now().naive_utc();
    let user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        password_hash: Set(password_hash),
        name: Set(payload.name.clone().filter(|n| !n.trim().is_empty())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(&state.db)
    .await?;

    let provisioned =
        provisioning::provision_workspace(&state.db, &user, payload.business.as_ref()).await?;

    let access_token = issue_access_token(&user)?;
    let refresh_token_str = issue_refresh_token(&state.db, user.id).await?;

    println!(
        "Signup complete: {} -> workspace {}",
        user.email, provisioned.workspace.slug
    );

    Ok(Json(SignupResponse {
        access_token,
        refresh_token: refresh_token_str,
        expires_in: ACCESS_TOKEN_TTL_SECS,
        workspace: WorkspaceSummary {
            id: provisioned.workspace.id,
            name: provisioned.workspace.name,
            slug: provisioned.workspace.slug,
        },
    }))
}

#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = payload.email.trim().to_lowercase();
    println!("Login attempt for: {}", email);

    let user = User::find()
        .filter(user::Column::Email.eq(&email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::InternalServerError(format!("Hash parse error: {}", e)))?;

    if Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        println!("Password verification failed");
        return Err(AppError::Unauthorized(
            "Invalid email or password".to_string(),
        ));
    }

    let access_token = issue_access_token(&user)?;
    let refresh_token_str = issue_refresh_token(&state.db, user.id).await?;

    println!("Tokens generated successfully");
    Ok(Json(LoginResponse {
        access_token,
        refresh_token: refresh_token_str,
        expires_in: ACCESS_TOKEN_TTL_SECS,
    }))
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Token refreshed successfully", body = RefreshResponse),
        (status = 401, description = "Invalid or expired refresh token")
    ),
    tag = "Authentication"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    println!("Refresh token request");

    let token_hash = hash_token(&payload.refresh_token);

    let token = RefreshToken::find()
        .filter(refresh_token::Column::TokenHash.eq(&token_hash))
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("Invalid refresh token. Please re-login.".to_string())
        })?;

    if token.revoked {
        println!("Token is revoked");
        return Err(AppError::Unauthorized(
            "User logged out. Please re-login.".to_string(),
        ));
    }

    let now = chrono::Utc::now().naive_utc();
    if token.expires_at < now {
        println!("Token is expired");
        return Err(AppError::Unauthorized(
            "Refresh token expired. Please re-login.".to_string(),
        ));
    }

    let user = User::find_by_id(token.user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized("User not found. Please re-login.".to_string())
        })?;

    let access_token = issue_access_token(&user)?;

    println!("New access token generated");
    Ok(Json(RefreshResponse { access_token }))
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    request_body = LogoutRequest,
    responses(
        (status = 200, description = "Logged out successfully", body = LogoutResponse),
        (status = 404, description = "Refresh token not found")
    ),
    tag = "Authentication"
)]
pub async fn logout(
    State(state): State<AppState>,
    Json(payload): Json<LogoutRequest>,
) -> Result<Json<LogoutResponse>, AppError> {
    println!("Logout request");

    let token_hash = hash_token(&payload.refresh_token);

    let token = RefreshToken::find()
        .filter(refresh_token::Column::TokenHash.eq(&token_hash))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Refresh token not found".to_string()))?;

    let mut active_token: refresh_token::ActiveModel = token.into();
    active_token.revoked = Set(true);
    active_token.update(&state.db).await?;

    println!("Refresh token revoked");
    Ok(Json(LogoutResponse {
        message: "Logged out successfully".to_string(),
    }))
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct UserProfile {
    #[schema(value_type = String)]
    id: Uuid,
    email: String,
    name: Option<String>,
    created_at: chrono::NaiveDateTime,
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "User profile retrieved successfully", body = UserProfile),
        (status = 401, description = "Unauthorized - Invalid or missing token")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Authentication"
)]
pub async fn me(
    State(state): State<AppState>,
    auth_user: axum::Extension<AuthUser>,
) -> Result<Json<UserProfile>, AppError> {
    println!("/auth/me request for: {}", auth_user.email);

    let user = User::find_by_id(auth_user.id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

    Ok(Json(UserProfile {
        id: user.id,
        email: user.email,
        name: user.name,
        created_at: user.created_at,
    }))
}

#[utoipa::path(
    get,
    path = "/auth/providers",
    responses(
        (status = 200, description = "Enabled authentication providers", body = ProvidersResponse)
    ),
    tag = "Authentication"
)]
pub async fn providers() -> Json<ProvidersResponse> {
    let google = env::var("GOOGLE_CLIENT_ID")
        .ok()
        .filter(|v| !v.is_empty())
        .is_some()
        && env::var("GOOGLE_CLIENT_SECRET")
            .ok()
            .filter(|v| !v.is_empty())
            .is_some();

    Json(ProvidersResponse {
        credentials: true,
        google,
    })
}
