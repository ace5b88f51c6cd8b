//! Editing model for email templates.
//!
//! An [`EditableTemplate`] is an immutable revision: every operation returns a
//! new value, so a front end keeps the current revision (or an
//! [`EditSession`] for undo) and threads it through its event handlers.
//! Persistence goes through the [`TemplateStore`] trait; [`HttpTemplateStore`]
//! implements it against the REST backend.

pub mod client;
pub mod editor;
pub mod gallery;
pub mod render;
pub mod section;
pub mod session;
pub mod store;

pub use client::HttpTemplateStore;
pub use editor::{Direction, EditableTemplate, SaveError};
pub use gallery::{ExampleTemplate, example_templates};
pub use section::SectionEdit;
pub use session::EditSession;
pub use store::{StoreError, TemplateStore};
