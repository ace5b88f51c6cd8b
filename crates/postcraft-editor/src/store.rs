use std::future::Future;

use thiserror::Error;
use uuid::Uuid;

use postcraft_types::models::{Template, TemplateDocument};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Template not found")]
    NotFound,

    /// Any other non-success response, with the server's message.
    #[error("{message} (HTTP {status})")]
    Rejected { status: u16, message: String },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

/// Template persistence as seen by the editor. Every call is one round trip;
/// writes replace the whole document.
pub trait TemplateStore {
    fn list_templates(&self) -> impl Future<Output = Result<Vec<Template>, StoreError>> + Send;

    fn create_template(
        &self,
        document: &TemplateDocument,
    ) -> impl Future<Output = Result<Template, StoreError>> + Send;

    fn update_template(
        &self,
        id: Uuid,
        document: &TemplateDocument,
    ) -> impl Future<Output = Result<Template, StoreError>> + Send;

    fn delete_template(&self, id: Uuid) -> impl Future<Output = Result<(), StoreError>> + Send;
}
