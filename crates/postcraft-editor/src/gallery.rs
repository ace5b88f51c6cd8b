use postcraft_types::models::{
    Dimension, ImageSection, ImageStyles, Section, TemplateDocument, TextSection, TextStyles,
};

/// A built-in starting point offered before any template is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct ExampleTemplate {
    pub id: u32,
    pub document: TemplateDocument,
}

pub fn example_templates() -> Vec<ExampleTemplate> {
    vec![
        ExampleTemplate {
            id: 1,
            document: TemplateDocument {
                title: "Simple Newsletter".to_string(),
                subject: "Welcome to our Newsletter!".to_string(),
                sections: vec![
                    text(
                        "Hello, welcome to our monthly newsletter.",
                        TextStyles {
                            font_size: Some(Dimension::px(16.0)),
                            font_weight: Some("bold".to_string()),
                            font_family: Some("Arial".to_string()),
                            text_align: Some("center".to_string()),
                            color: Some("#000".to_string()),
                            text_decoration: None,
                        },
                    ),
                    image("/assets/newsletter-hero.jpg"),
                    text(
                        "Here we share the latest updates.",
                        TextStyles {
                            font_size: Some(Dimension::px(14.0)),
                            font_family: Some("Arial".to_string()),
                            text_align: Some("left".to_string()),
                            color: Some("#333".to_string()),
                            ..Default::default()
                        },
                    ),
                ],
            },
        },
        ExampleTemplate {
            id: 2,
            document: TemplateDocument {
                title: "Sale Announcement".to_string(),
                subject: "50% OFF Sale Starts Now!".to_string(),
                sections: vec![
                    text(
                        "Hurry up! Our sale is live. Get 50% off on all products.",
                        TextStyles {
                            font_size: Some(Dimension::px(18.0)),
                            font_weight: Some("bold".to_string()),
                            font_family: Some("Arial".to_string()),
                            text_align: Some("center".to_string()),
                            color: Some("#e60000".to_string()),
                            text_decoration: None,
                        },
                    ),
                    image("/assets/sale-banner.png"),
                    text(
                        "Shop now and save big!",
                        TextStyles {
                            font_size: Some(Dimension::px(16.0)),
                            font_family: Some("Arial".to_string()),
                            text_align: Some("left".to_string()),
                            color: Some("#333".to_string()),
                            ..Default::default()
                        },
                    ),
                ],
            },
        },
    ]
}

fn text(content: &str, styles: TextStyles) -> Section {
    Section::Text(TextSection {
        content: content.to_string(),
        styles,
    })
}

fn image(src: &str) -> Section {
    Section::Image(ImageSection {
        content: src.to_string(),
        image_styles: ImageStyles {
            width: Some(Dimension::css("25%")),
            height: Some(Dimension::css("auto")),
        },
    })
}
