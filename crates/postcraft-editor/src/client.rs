use reqwest::{RequestBuilder, Response, StatusCode, multipart};
use tracing::debug;
use uuid::Uuid;

use postcraft_types::api::{
    LoginRequest, LoginResponse, MessageResponse, RegisterRequest, RegisterResponse,
    TemplateCreatedResponse, TemplateUpdatedResponse, UploadImageResponse,
};
use postcraft_types::models::{Template, TemplateDocument, User};

use crate::store::{StoreError, TemplateStore};

/// REST client for the template backend.
///
/// Holds the bearer token from the last successful [`login`](Self::login) and
/// sends it with every request.
#[derive(Debug, Clone)]
pub struct HttpTemplateStore {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpTemplateStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub async fn register(&self, request: &RegisterRequest) -> Result<User, StoreError> {
        let response = self.request(self.http.post(self.url("/register"))).json(request).send().await?;
        let body: RegisterResponse = check(response).await?.json().await?;
        Ok(body.user)
    }

    /// Log in and keep the issued token for later calls.
    pub async fn login(&mut self, username: &str, password: &str) -> Result<String, StoreError> {
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self.http.post(self.url("/login")).json(&request).send().await?;
        let body: LoginResponse = check(response).await?.json().await?;

        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    /// Upload an image; returns the server path to reference from an image section.
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let part = multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = multipart::Form::new().part("image", part);

        let response = self
            .request(self.http.post(self.url("/uploadImage")))
            .multipart(form)
            .send()
            .await?;
        let body: UploadImageResponse = check(response).await?.json().await?;
        Ok(body.image_url)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }
}

impl TemplateStore for HttpTemplateStore {
    async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
        let response = self.request(self.http.get(self.url("/getTemplates"))).send().await?;
        Ok(check(response).await?.json().await?)
    }

    async fn create_template(&self, document: &TemplateDocument) -> Result<Template, StoreError> {
        let response = self
            .request(self.http.post(self.url("/uploadEmailConfig")))
            .json(document)
            .send()
            .await?;
        let body: TemplateCreatedResponse = check(response).await?.json().await?;
        debug!("Created template {}", body.template.id);
        Ok(body.template)
    }

    async fn update_template(&self, id: Uuid, document: &TemplateDocument) -> Result<Template, StoreError> {
        let response = self
            .request(self.http.put(self.url(&format!("/updateEmailTemplate/{id}"))))
            .json(document)
            .send()
            .await?;
        let body: TemplateUpdatedResponse = check(response).await?.json().await?;
        debug!("Updated template {}", id);
        Ok(body.updated_template)
    }

    async fn delete_template(&self, id: Uuid) -> Result<(), StoreError> {
        let response = self
            .request(self.http.delete(self.url(&format!("/deleteEmailTemplate/{id}"))))
            .send()
            .await?;
        check(response).await?;
        debug!("Deleted template {}", id);
        Ok(())
    }
}

/// Pass successful responses through; turn the rest into `StoreError`.
async fn check(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    if status == StatusCode::NOT_FOUND {
        return Err(StoreError::NotFound);
    }

    let message = match response.json::<MessageResponse>().await {
        Ok(body) => body.message,
        Err(_) => status.canonical_reason().unwrap_or("Request failed").to_string(),
    };
    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}
