use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use uuid::Uuid;

/// Public view of an account. The password hash never leaves the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

/// A persisted email template. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(alias = "_id")]
    pub id: Uuid,
    pub title: String,
    pub subject: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
}

impl Template {
    /// The writable part of the template, without store-assigned fields.
    pub fn document(&self) -> TemplateDocument {
        TemplateDocument {
            title: self.title.clone(),
            subject: self.subject.clone(),
            sections: self.sections.clone(),
        }
    }
}

/// Body of create and update requests. Writes always replace the whole document.
/// Missing fields deserialize as empty and are caught by [`TemplateDocument::validate`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateDocument {
    pub title: String,
    pub subject: String,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl TemplateDocument {
    /// Title and subject must be non-empty before a template is persisted.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::MissingField("title"));
        }
        if self.subject.trim().is_empty() {
            return Err(ValidationError::MissingField("subject"));
        }
        Ok(())
    }
}

/// A single content block. Serialized with a `"type"` tag of `"text"` or `"image"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Section {
    Text(TextSection),
    Image(ImageSection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    Text,
    Image,
}

impl Section {
    /// An empty section of the given kind, as appended by the editor.
    pub fn empty(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Text => Section::Text(TextSection::default()),
            SectionKind::Image => Section::Image(ImageSection::default()),
        }
    }

    pub fn kind(&self) -> SectionKind {
        match self {
            Section::Text(_) => SectionKind::Text,
            Section::Image(_) => SectionKind::Image,
        }
    }

    pub fn content(&self) -> &str {
        match self {
            Section::Text(text) => &text.content,
            Section::Image(image) => &image.content,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextSection {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub styles: TextStyles,
}

/// Image content is either a `data:` URI or a URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageSection {
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "imageStyles")]
    pub image_styles: ImageStyles,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageStyles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

/// A CSS length. Bare numbers (`16`, or the string `"16"` sent by number
/// inputs) are pixels; anything else (`"25%"`, `"auto"`) is passed through.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Dimension {
    Pixels(f64),
    Css(String),
}

impl Dimension {
    pub fn px(value: f64) -> Self {
        Dimension::Pixels(value)
    }

    pub fn css(value: impl Into<String>) -> Self {
        Dimension::Css(value.into())
    }
}

/// Whole pixel values go back out as JSON integers (`16`, not `16.0`).
impl Serialize for Dimension {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Dimension::Pixels(value) if value.fract() == 0.0 && value.abs() < i64::MAX as f64 => {
                serializer.serialize_i64(*value as i64)
            }
            Dimension::Pixels(value) => serializer.serialize_f64(*value),
            Dimension::Css(raw) => serializer.serialize_str(raw),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Pixels(value) => write!(f, "{}px", value),
            Dimension::Css(raw) => {
                let raw = raw.trim();
                if raw.parse::<f64>().is_ok() {
                    write!(f, "{}px", raw)
                } else {
                    f.write_str(raw)
                }
            }
        }
    }
}
