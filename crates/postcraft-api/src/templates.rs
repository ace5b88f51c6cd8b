use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::{info, warn};
use uuid::Uuid;

use postcraft_db::models::TemplateRow;
use postcraft_types::api::{MessageResponse, TemplateCreatedResponse, TemplateUpdatedResponse};
use postcraft_types::models::{Template, TemplateDocument};

use crate::auth::AppState;
use crate::error::{ApiError, Result};
use crate::with_db;

/// GET /getTemplates
pub async fn list_templates(State(state): State<AppState>) -> Result<Json<Vec<Template>>> {
    let rows = with_db(&state, |db| db.list_templates()).await?;
    let templates = rows
        .into_iter()
        .filter_map(|row| {
            template_from_row(&row)
                .inspect_err(|e| warn!("Skipping corrupt template '{}': {}", row.id, e))
                .ok()
        })
        .collect();
    Ok(Json(templates))
}

/// POST /uploadEmailConfig: store a new template; id and createdAt are assigned here.
pub async fn create_template(
    State(state): State<AppState>,
    body: std::result::Result<Json<TemplateDocument>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(doc) = body?;
    doc.validate()?;

    let template = Template {
        id: Uuid::new_v4(),
        title: doc.title,
        subject: doc.subject,
        sections: doc.sections,
        created_at: Utc::now(),
    };
    let row = row_from_template(&template)?;
    with_db(&state, move |db| db.insert_template(&row)).await?;

    info!("Template {} created: {}", template.id, template.title);

    Ok(Json(TemplateCreatedResponse {
        message: "Email template saved successfully!".to_string(),
        template,
    }))
}

/// PUT /updateEmailTemplate/{id}: whole-document replacement, last write wins.
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: std::result::Result<Json<TemplateDocument>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let Json(doc) = body?;
    doc.validate()?;

    let sections = serde_json::to_string(&doc.sections).map_err(anyhow::Error::from)?;
    let row = with_db(&state, move |db| {
        db.replace_template(&id.to_string(), &doc.title, &doc.subject, &sections)
    })
    .await?
    .ok_or(ApiError::NotFound)?;

    let updated_template = template_from_row(&row)?;
    info!("Template {} updated", updated_template.id);

    Ok(Json(TemplateUpdatedResponse {
        message: "Email template updated successfully!".to_string(),
        updated_template,
    }))
}

/// DELETE /deleteEmailTemplate/{id}
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;

    let deleted = with_db(&state, move |db| db.delete_template(&id.to_string())).await?;
    if !deleted {
        return Err(ApiError::NotFound);
    }

    info!("Template {} deleted", id);
    Ok(Json(MessageResponse::new("Email template deleted successfully!")))
}

/// Ids that are not UUIDs cannot name a stored template.
fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().map_err(|_| ApiError::NotFound)
}

fn row_from_template(template: &Template) -> anyhow::Result<TemplateRow> {
    Ok(TemplateRow {
        id: template.id.to_string(),
        title: template.title.clone(),
        subject: template.subject.clone(),
        sections: serde_json::to_string(&template.sections)?,
        created_at: template.created_at.to_rfc3339(),
    })
}

fn template_from_row(row: &TemplateRow) -> anyhow::Result<Template> {
    Ok(Template {
        id: row.id.parse()?,
        title: row.title.clone(),
        subject: row.subject.clone(),
        sections: serde_json::from_str(&row.sections)?,
        created_at: DateTime::parse_from_rfc3339(&row.created_at)?.with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use postcraft_types::models::{Dimension, ImageSection, ImageStyles, Section, TextSection};

    #[test]
    fn rows_round_trip_sections() {
        let template = Template {
            id: Uuid::new_v4(),
            title: "Sale".into(),
            subject: "50% off".into(),
            sections: vec![
                Section::Text(TextSection {
                    content: "Hurry".into(),
                    ..Default::default()
                }),
                Section::Image(ImageSection {
                    content: "/uploads/a.png".into(),
                    image_styles: ImageStyles {
                        width: Some(Dimension::css("25%")),
                        height: None,
                    },
                }),
            ],
            created_at: Utc::now(),
        };

        let row = row_from_template(&template).unwrap();
        assert!(row.sections.contains(r#""type":"image""#));
        assert_eq!(template_from_row(&row).unwrap(), template);
    }

    #[test]
    fn non_uuid_ids_are_not_found() {
        assert!(matches!(parse_id("42"), Err(ApiError::NotFound)));
    }
}
