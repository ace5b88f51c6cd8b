use std::fmt::Write;

use postcraft_types::models::{ImageSection, ImageStyles, Section, TextSection, TextStyles};

/// Full HTML document: title and subject as headings, then each section.
pub fn render_document(title: &str, subject: &str, sections: &[Section]) -> String {
    let title = escape_html(title);
    let subject = escape_html(subject);

    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    let _ = writeln!(html, "<h2>{subject}</h2>");
    for section in sections {
        html.push_str(&render_section(section));
        html.push('\n');
    }
    html.push_str("</body>\n</html>\n");
    html
}

pub fn render_section(section: &Section) -> String {
    match section {
        Section::Text(text) => render_text(text),
        Section::Image(image) => render_image(image),
    }
}

fn render_text(text: &TextSection) -> String {
    format!(
        "<p{}>{}</p>",
        style_attribute(&text_declarations(&text.styles)),
        escape_html(&text.content)
    )
}

fn render_image(image: &ImageSection) -> String {
    format!(
        "<img src=\"{}\" alt=\"\"{} />",
        escape_html(&image.content),
        style_attribute(&image_declarations(&image.image_styles))
    )
}

fn text_declarations(styles: &TextStyles) -> Vec<(&'static str, String)> {
    [
        ("font-size", styles.font_size.as_ref().map(ToString::to_string)),
        ("font-weight", styles.font_weight.clone()),
        ("font-family", styles.font_family.clone()),
        ("text-align", styles.text_align.clone()),
        ("color", styles.color.clone()),
        ("text-decoration", styles.text_decoration.clone()),
    ]
    .into_iter()
    .filter_map(|(property, value)| value.map(|v| (property, v)))
    .collect()
}

fn image_declarations(styles: &ImageStyles) -> Vec<(&'static str, String)> {
    [("width", styles.width.as_ref()), ("height", styles.height.as_ref())]
        .into_iter()
        .filter_map(|(property, value)| value.map(|v| (property, v.to_string())))
        .collect()
}

fn style_attribute(declarations: &[(&'static str, String)]) -> String {
    if declarations.is_empty() {
        return String::new();
    }
    let css: Vec<String> = declarations
        .iter()
        .map(|(property, value)| format!("{property}: {};", value.trim()))
        .collect();
    format!(" style=\"{}\"", escape_html(&css.join(" ")))
}

/// Escape text for element content and double-quoted attribute values.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
