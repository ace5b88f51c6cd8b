use crate::editor::EditableTemplate;

/// In-memory revision history for one editing session.
///
/// Nothing here is persisted; dropping the session discards every unsaved revision.
#[derive(Debug, Clone)]
pub struct EditSession {
    revisions: Vec<EditableTemplate>,
    cursor: usize,
}

impl EditSession {
    pub fn new(initial: EditableTemplate) -> Self {
        Self {
            revisions: vec![initial],
            cursor: 0,
        }
    }

    pub fn current(&self) -> &EditableTemplate {
        &self.revisions[self.cursor]
    }

    /// Record the revision produced by `edit`. Undone revisions are dropped;
    /// an edit that changes nothing is not recorded.
    pub fn apply<F>(&mut self, edit: F) -> &EditableTemplate
    where
        F: FnOnce(&EditableTemplate) -> EditableTemplate,
    {
        let next = edit(self.current());
        if next != *self.current() {
            self.revisions.truncate(self.cursor + 1);
            self.revisions.push(next);
            self.cursor += 1;
        }
        self.current()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.revisions.len()
    }

    pub fn undo(&mut self) -> &EditableTemplate {
        if self.can_undo() {
            self.cursor -= 1;
        }
        self.current()
    }

    pub fn redo(&mut self) -> &EditableTemplate {
        if self.can_redo() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Number of recorded revisions, including the initial one.
    pub fn revision_count(&self) -> usize {
        self.revisions.len()
    }
}
