use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use postcraft_types::models::{Section, SectionKind, Template, TemplateDocument, ValidationError};

use crate::gallery::ExampleTemplate;
use crate::render;
use crate::section::{self, SectionEdit};
use crate::store::{StoreError, TemplateStore};

/// Direction of a section move. `Up` moves towards index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Index of the neighbour `index` swaps with, if it exists in `0..len`.
    fn target(self, index: usize, len: usize) -> Option<usize> {
        let target = match self {
            Direction::Up => index.checked_sub(1)?,
            Direction::Down => index.checked_add(1)?,
        };
        (index < len && target < len).then_some(target)
    }
}

#[derive(Debug, Error)]
pub enum SaveError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One revision of a template being edited.
///
/// Operations never mutate: each returns the next revision. Index-based
/// operations with an index outside the section list return an unchanged copy.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditableTemplate {
    stored_id: Option<Uuid>,
    title: String,
    subject: String,
    sections: Vec<Section>,
}

impl EditableTemplate {
    /// Start from nothing.
    pub fn blank() -> Self {
        Self::default()
    }

    /// Deep copy of a gallery example. The copy is unsaved.
    pub fn select_template(example: &ExampleTemplate) -> Self {
        Self::from_document(example.document.clone())
    }

    pub fn from_document(document: TemplateDocument) -> Self {
        Self {
            stored_id: None,
            title: document.title,
            subject: document.subject,
            sections: document.sections,
        }
    }

    /// Copy of a persisted template; saving it updates that template.
    pub fn from_stored(template: &Template) -> Self {
        Self {
            stored_id: Some(template.id),
            ..Self::from_document(template.document())
        }
    }

    pub fn stored_id(&self) -> Option<Uuid> {
        self.stored_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn document(&self) -> TemplateDocument {
        TemplateDocument {
            title: self.title.clone(),
            subject: self.subject.clone(),
            sections: self.sections.clone(),
        }
    }

    pub fn with_title(&self, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..self.clone()
        }
    }

    pub fn with_subject(&self, subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            ..self.clone()
        }
    }

    /// Append an empty section of `kind`.
    pub fn add_section(&self, kind: SectionKind) -> Self {
        self.with_sections(|sections| sections.push(Section::empty(kind)))
    }

    /// Replace the section at `index`.
    pub fn update_section(&self, index: usize, section: Section) -> Self {
        if index >= self.sections.len() {
            return self.clone();
        }
        self.with_sections(|sections| sections[index] = section)
    }

    /// Apply a section-editor command to the section at `index`.
    pub fn edit_section(&self, index: usize, edit: &SectionEdit) -> Self {
        match self.sections.get(index) {
            Some(current) => self.update_section(index, section::apply(current, edit)),
            None => self.clone(),
        }
    }

    /// Remove the section at `index`; later sections shift down by one.
    pub fn delete_section(&self, index: usize) -> Self {
        if index >= self.sections.len() {
            return self.clone();
        }
        self.with_sections(|sections| {
            sections.remove(index);
        })
    }

    /// Swap the section at `index` with its neighbour in `direction`.
    /// Moving the first section up or the last one down changes nothing.
    pub fn move_section(&self, index: usize, direction: Direction) -> Self {
        match direction.target(index, self.sections.len()) {
            Some(target) => self.with_sections(|sections| sections.swap(index, target)),
            None => self.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.document().validate()
    }

    /// Persist this revision: update when it came from the store, create
    /// otherwise. An invalid template never reaches the store.
    pub async fn save<S: TemplateStore>(&self, store: &S) -> Result<Template, SaveError> {
        let document = self.document();
        document.validate()?;

        let saved = match self.stored_id {
            Some(id) => store.update_template(id, &document).await?,
            None => store.create_template(&document).await?,
        };
        debug!("Saved template {} ({} sections)", saved.id, saved.sections.len());
        Ok(saved)
    }

    /// Standalone HTML document for local export.
    pub fn render_artifact(&self) -> String {
        render::render_document(&self.title, &self.subject, &self.sections)
    }

    /// File name for the exported artifact, derived from the title.
    pub fn artifact_file_name(&self) -> String {
        let stem: String = self
            .title
            .trim()
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | ':' | '\0') { '_' } else { c })
            .collect();
        if stem.is_empty() || stem.chars().all(|c| c == '.') {
            "template.html".to_string()
        } else {
            format!("{stem}.html")
        }
    }

    fn with_sections(&self, f: impl FnOnce(&mut Vec<Section>)) -> Self {
        let mut next = self.clone();
        f(&mut next.sections);
        next
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::gallery::example_templates;
    use postcraft_types::models::TextSection;

    fn text(content: &str) -> Section {
        Section::Text(TextSection {
            content: content.to_string(),
            ..Default::default()
        })
    }

    fn contents(template: &EditableTemplate) -> Vec<&str> {
        template.sections().iter().map(Section::content).collect()
    }

    fn abc() -> EditableTemplate {
        EditableTemplate::from_document(TemplateDocument {
            title: "T".into(),
            subject: "S".into(),
            sections: vec![text("a"), text("b"), text("c")],
        })
    }

    /// Records calls; never fails.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingStore {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn stored(&self, id: Uuid, document: &TemplateDocument) -> Template {
            Template {
                id,
                title: document.title.clone(),
                subject: document.subject.clone(),
                sections: document.sections.clone(),
                created_at: chrono::Utc::now(),
            }
        }
    }

    impl TemplateStore for RecordingStore {
        async fn list_templates(&self) -> Result<Vec<Template>, StoreError> {
            self.calls.lock().unwrap().push("list".into());
            Ok(vec![])
        }

        async fn create_template(&self, document: &TemplateDocument) -> Result<Template, StoreError> {
            self.calls.lock().unwrap().push("create".into());
            Ok(self.stored(Uuid::new_v4(), document))
        }

        async fn update_template(&self, id: Uuid, document: &TemplateDocument) -> Result<Template, StoreError> {
            self.calls.lock().unwrap().push(format!("update {id}"));
            Ok(self.stored(id, document))
        }

        async fn delete_template(&self, id: Uuid) -> Result<(), StoreError> {
            self.calls.lock().unwrap().push(format!("delete {id}"));
            Ok(())
        }
    }

    #[test]
    fn select_copies_the_example() {
        let examples = example_templates();
        let edited = EditableTemplate::select_template(&examples[0]).with_title("Mine");

        assert_eq!(edited.stored_id(), None);
        assert_eq!(edited.title(), "Mine");
        assert_eq!(examples[0].document.title, "Simple Newsletter");
        assert_eq!(edited.sections(), examples[0].document.sections.as_slice());
    }

    #[test]
    fn operations_leave_previous_revision_intact() {
        let before = abc();
        let after = before.delete_section(0);

        assert_eq!(contents(&before), vec!["a", "b", "c"]);
        assert_eq!(contents(&after), vec!["b", "c"]);
    }

    #[test]
    fn add_appends_empty_sections() {
        let template = EditableTemplate::blank()
            .add_section(SectionKind::Text)
            .add_section(SectionKind::Image);

        let kinds: Vec<SectionKind> = template.sections().iter().map(Section::kind).collect();
        assert_eq!(kinds, vec![SectionKind::Text, SectionKind::Image]);
        assert!(template.sections().iter().all(|s| s.content().is_empty()));
    }

    #[test]
    fn update_replaces_only_the_target() {
        let template = abc().update_section(1, text("B"));
        assert_eq!(contents(&template), vec!["a", "B", "c"]);
    }

    #[test]
    fn out_of_range_index_is_a_no_op() {
        let template = abc();
        assert_eq!(template.update_section(3, text("x")), template);
        assert_eq!(template.delete_section(7), template);
        assert_eq!(template.edit_section(3, &SectionEdit::ToggleBold), template);
        assert_eq!(template.move_section(5, Direction::Up), template);
    }

    #[test]
    fn delete_shifts_later_sections() {
        let template = abc().delete_section(1);
        assert_eq!(contents(&template), vec!["a", "c"]);
    }

    #[test]
    fn move_swaps_neighbours() {
        let template = abc();
        assert_eq!(contents(&template.move_section(0, Direction::Down)), vec!["b", "a", "c"]);
        assert_eq!(contents(&template.move_section(2, Direction::Up)), vec!["a", "c", "b"]);
    }

    #[test]
    fn move_at_boundaries_keeps_every_section() {
        let template = abc();
        assert_eq!(template.move_section(0, Direction::Up), template);
        assert_eq!(template.move_section(2, Direction::Down), template);
    }

    #[test]
    fn section_count_tracks_adds_and_deletes() {
        // Deterministic mixed sequence of operations
        let mut template = EditableTemplate::blank();
        let mut expected = 0usize;
        for step in 0..60usize {
            template = match step % 5 {
                0 | 1 | 3 => {
                    expected += 1;
                    template.add_section(if step % 2 == 0 { SectionKind::Text } else { SectionKind::Image })
                }
                2 => template.move_section(step % 4, Direction::Down),
                _ => {
                    let len = template.sections().len();
                    if len > 0 {
                        expected -= 1;
                    }
                    template.delete_section(step % len.max(1))
                }
            };
            assert_eq!(template.sections().len(), expected);
        }
    }

    #[test]
    fn moves_compose_like_swaps() {
        let template = abc()
            .move_section(0, Direction::Down)
            .move_section(1, Direction::Down)
            .move_section(0, Direction::Down);
        assert_eq!(contents(&template), vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn invalid_template_never_reaches_the_store() {
        let store = RecordingStore::default();

        let no_title = abc().with_title("");
        assert!(matches!(
            no_title.save(&store).await,
            Err(SaveError::Validation(ValidationError::MissingField("title")))
        ));

        let no_subject = abc().with_subject("  ");
        assert!(matches!(
            no_subject.save(&store).await,
            Err(SaveError::Validation(ValidationError::MissingField("subject")))
        ));

        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn save_creates_then_updates() {
        let store = RecordingStore::default();

        let created = abc().save(&store).await.unwrap();
        assert_eq!(store.calls(), vec!["create".to_string()]);

        let reopened = EditableTemplate::from_stored(&created).with_subject("Changed");
        let updated = reopened.save(&store).await.unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.subject, "Changed");
        assert_eq!(store.calls()[1], format!("update {}", created.id));
    }

    #[test]
    fn artifact_file_name_comes_from_title() {
        assert_eq!(abc().with_title("Spring Sale").artifact_file_name(), "Spring Sale.html");
        assert_eq!(abc().with_title("a/b").artifact_file_name(), "a_b.html");
        assert_eq!(abc().with_title("  ").artifact_file_name(), "template.html");
        assert_eq!(abc().with_title("..").artifact_file_name(), "template.html");
    }
}
