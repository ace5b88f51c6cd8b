use std::path::PathBuf;
use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::info;
use uuid::Uuid;

use postcraft_db::Database;
use postcraft_db::models::UserInsert;
use postcraft_types::api::{Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use postcraft_types::models::{User, ValidationError};

use crate::error::{AuthError, Result};

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub token_ttl: chrono::Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
}

pub async fn register(
    State(state): State<AppState>,
    body: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    // Argon2 and the lookups are blocking
    let user = tokio::task::spawn_blocking(move || register_user(&state, &req)).await??;

    info!("Registered user {}", user.username);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User Registered Successfully".to_string(),
            user,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    body: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = body?;
    let token = tokio::task::spawn_blocking(move || login_user(&state, &req)).await??;

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
    }))
}

/// Create an account. The password check runs before any store lookup.
pub fn register_user(state: &AppStateInner, req: &RegisterRequest) -> Result<User> {
    for (field, value) in [
        ("username", &req.username),
        ("email", &req.email),
        ("password", &req.password),
    ] {
        if value.trim().is_empty() {
            return Err(ValidationError::MissingField(field).into());
        }
    }

    if req.password != req.confirm_password {
        return Err(AuthError::PasswordMismatch.into());
    }

    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(AuthError::DuplicateEmail.into());
    }
    if state.db.get_user_by_username(&req.username)?.is_some() {
        return Err(AuthError::DuplicateUsername.into());
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Password hashing failed: {}", e))?
        .to_string();

    // A registration racing this one may claim the email or username first
    let user_id = Uuid::new_v4();
    match state
        .db
        .create_user(&user_id.to_string(), &req.username, &req.email, &password_hash)?
    {
        UserInsert::Created => {}
        UserInsert::EmailTaken => return Err(AuthError::DuplicateEmail.into()),
        UserInsert::UsernameTaken => return Err(AuthError::DuplicateUsername.into()),
    }

    Ok(User {
        id: user_id,
        username: req.username.clone(),
        email: req.email.clone(),
    })
}

/// Check credentials and issue a bearer token valid for `state.token_ttl`.
pub fn login_user(state: &AppStateInner, req: &LoginRequest) -> Result<String> {
    for (field, value) in [("username", &req.username), ("password", &req.password)] {
        if value.is_empty() {
            return Err(ValidationError::MissingField(field).into());
        }
    }

    let user = state
        .db
        .get_user_by_username(&req.username)?
        .ok_or(AuthError::UserNotFound)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("Corrupt password hash for {}: {}", user.username, e))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("Corrupt user id '{}': {}", user.id, e))?;

    let token = create_token(&state.jwt_secret, state.token_ttl, user_id, &user.username)?;
    Ok(token)
}

pub fn create_token(
    secret: &str,
    ttl: chrono::Duration,
    user_id: Uuid,
    username: &str,
) -> anyhow::Result<String> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
