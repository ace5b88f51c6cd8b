use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Template, User};

// -- JWT Claims --

/// Bearer token claims. `exp - iat` is the configured token lifetime.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

/// Absent fields read as empty so the handler reports which one is required.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Older clients send this field as `conformPassword`.
    #[serde(alias = "conformPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

// -- Uploads --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageResponse {
    pub image_url: String,
}

// -- Templates --

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateCreatedResponse {
    pub message: String,
    pub template: Template,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateUpdatedResponse {
    pub message: String,
    pub updated_template: Template,
}

/// Body of every error response, and of responses that carry nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
