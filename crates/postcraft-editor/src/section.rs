use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use postcraft_types::models::{Dimension, ImageSection, Section, TextSection};

/// A single change made through a section's editing controls.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEdit {
    /// Text for text sections, source URL for image sections.
    SetContent(String),
    ToggleBold,
    ToggleUnderline,
    SetColor(String),
    SetFontSize(Dimension),
    SetFontFamily(String),
    SetTextAlign(String),
    /// Embed raw image bytes as a `data:` URI.
    SetImage { mime: String, bytes: Vec<u8> },
    SetWidth(Dimension),
    SetHeight(Dimension),
}

/// Apply `edit` to `section`. Edits for the other variant leave it unchanged.
pub fn apply(section: &Section, edit: &SectionEdit) -> Section {
    match section {
        Section::Text(text) => apply_text(text, edit),
        Section::Image(image) => apply_image(image, edit),
    }
}

fn apply_text(text: &TextSection, edit: &SectionEdit) -> Section {
    let mut next = text.clone();
    let styles = &mut next.styles;
    match edit {
        SectionEdit::SetContent(content) => next.content = content.clone(),
        SectionEdit::ToggleBold => {
            styles.font_weight = Some(toggle(styles.font_weight.as_deref(), "bold", "normal"));
        }
        SectionEdit::ToggleUnderline => {
            styles.text_decoration =
                Some(toggle(styles.text_decoration.as_deref(), "underline", "none"));
        }
        SectionEdit::SetColor(color) => styles.color = Some(color.clone()),
        SectionEdit::SetFontSize(size) => styles.font_size = Some(size.clone()),
        SectionEdit::SetFontFamily(family) => styles.font_family = Some(family.clone()),
        SectionEdit::SetTextAlign(align) => styles.text_align = Some(align.clone()),
        SectionEdit::SetImage { .. } | SectionEdit::SetWidth(_) | SectionEdit::SetHeight(_) => {}
    }
    Section::Text(next)
}

fn apply_image(image: &ImageSection, edit: &SectionEdit) -> Section {
    let mut next = image.clone();
    match edit {
        SectionEdit::SetContent(url) => next.content = url.clone(),
        SectionEdit::SetImage { mime, bytes } => next.content = data_uri(mime, bytes),
        SectionEdit::SetWidth(width) => next.image_styles.width = Some(width.clone()),
        SectionEdit::SetHeight(height) => next.image_styles.height = Some(height.clone()),
        SectionEdit::ToggleBold
        | SectionEdit::ToggleUnderline
        | SectionEdit::SetColor(_)
        | SectionEdit::SetFontSize(_)
        | SectionEdit::SetFontFamily(_)
        | SectionEdit::SetTextAlign(_) => {}
    }
    Section::Image(next)
}

fn toggle(current: Option<&str>, on: &str, off: &str) -> String {
    let next = if current == Some(on) { off } else { on };
    next.to_string()
}

pub fn data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime, B64.encode(bytes))
}
