use crate::models::{TemplateRow, UserInsert, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row};

const USER_COLUMNS: &str = "id, username, password";
const TEMPLATE_COLUMNS: &str = "id, title, subject, sections, created_at";

impl Database {
    // -- Users --

    /// Insert an account. A UNIQUE violation on email or username comes back
    /// as a `UserInsert` variant rather than an error.
    pub fn create_user(&self, id: &str, username: &str, email: &str, password_hash: &str) -> Result<UserInsert> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO users (id, username, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, email, password_hash),
            );
            match inserted {
                Ok(_) => Ok(UserInsert::Created),
                Err(rusqlite::Error::SqliteFailure(err, Some(msg)))
                    if err.code == ErrorCode::ConstraintViolation && msg.contains("users.email") =>
                {
                    Ok(UserInsert::EmailTaken)
                }
                Err(rusqlite::Error::SqliteFailure(err, Some(msg)))
                    if err.code == ErrorCode::ConstraintViolation && msg.contains("users.username") =>
                {
                    Ok(UserInsert::UsernameTaken)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email", email))
    }

    // -- Templates --

    pub fn list_templates(&self) -> Result<Vec<TemplateRow>> {
        self.with_conn(|conn| {
            // rowid breaks ties between templates created in the same instant
            let mut stmt = conn.prepare(&format!(
                "SELECT {TEMPLATE_COLUMNS} FROM templates ORDER BY created_at, rowid"
            ))?;
            let rows = stmt
                .query_map([], template_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn insert_template(&self, row: &TemplateRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO templates (id, title, subject, sections, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                (&row.id, &row.title, &row.subject, &row.sections, &row.created_at),
            )?;
            Ok(())
        })
    }

    /// Replace title, subject and sections of an existing template.
    /// Returns the stored row, or `None` when no template has this id.
    pub fn replace_template(
        &self,
        id: &str,
        title: &str,
        subject: &str,
        sections: &str,
    ) -> Result<Option<TemplateRow>> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE templates SET title = ?2, subject = ?3, sections = ?4 WHERE id = ?1",
                (id, title, subject, sections),
            )?;
            if changed == 0 {
                return Ok(None);
            }
            query_template(conn, id)
        })
    }

    /// Returns `false` when no template has this id.
    pub fn delete_template(&self, id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM templates WHERE id = ?1", [id])?;
            Ok(deleted > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                password: row.get(2)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn query_template(conn: &Connection, id: &str) -> Result<Option<TemplateRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {TEMPLATE_COLUMNS} FROM templates WHERE id = ?1"))?;
    let row = stmt.query_row([id], template_from_row).optional()?;
    Ok(row)
}

fn template_from_row(row: &Row<'_>) -> rusqlite::Result<TemplateRow> {
    Ok(TemplateRow {
        id: row.get(0)?,
        title: row.get(1)?,
        subject: row.get(2)?,
        sections: row.get(3)?,
        created_at: row.get(4)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, title: &str, created_at: &str) -> TemplateRow {
        TemplateRow {
            id: id.to_string(),
            title: title.to_string(),
            subject: "Subject".to_string(),
            sections: "[]".to_string(),
            created_at: created_at.to_string(),
        }
    }

    #[test]
    fn users_are_found_by_username_and_email() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.create_user("u1", "ada", "ada@example.com", "hash").unwrap(), UserInsert::Created);

        let by_name = db.get_user_by_username("ada").unwrap().unwrap();
        assert_eq!(by_name.id, "u1");
        assert_eq!(by_name.password, "hash");

        let by_email = db.get_user_by_email("ada@example.com").unwrap().unwrap();
        assert_eq!(by_email.username, "ada");

        assert!(db.get_user_by_username("grace").unwrap().is_none());
    }

    #[test]
    fn taken_email_and_username_are_reported() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("u1", "ada", "ada@example.com", "hash").unwrap();

        assert_eq!(
            db.create_user("u2", "other", "ada@example.com", "hash").unwrap(),
            UserInsert::EmailTaken
        );
        assert_eq!(
            db.create_user("u3", "ada", "new@example.com", "hash").unwrap(),
            UserInsert::UsernameTaken
        );
        assert!(db.get_user_by_username("other").unwrap().is_none());
    }

    #[test]
    fn reused_user_id_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        db.create_user("u1", "ada", "ada@example.com", "hash").unwrap();
        assert!(db.create_user("u1", "grace", "grace@example.com", "hash").is_err());
    }

    #[test]
    fn templates_list_in_creation_order() {
        let db = Database::open_in_memory().unwrap();
        db.insert_template(&row("b", "Second", "2024-01-02T00:00:00+00:00")).unwrap();
        db.insert_template(&row("a", "First", "2024-01-01T00:00:00+00:00")).unwrap();

        let titles: Vec<String> = db.list_templates().unwrap().into_iter().map(|r| r.title).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn replace_keeps_created_at() {
        let db = Database::open_in_memory().unwrap();
        db.insert_template(&row("a", "Old", "2024-01-01T00:00:00+00:00")).unwrap();

        let updated = db
            .replace_template("a", "New", "New subject", r#"[{"type":"text"}]"#)
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.subject, "New subject");
        assert_eq!(updated.created_at, "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn replace_missing_template_changes_nothing() {
        let db = Database::open_in_memory().unwrap();
        db.insert_template(&row("a", "Kept", "2024-01-01T00:00:00+00:00")).unwrap();

        assert!(db.replace_template("missing", "X", "Y", "[]").unwrap().is_none());
        assert_eq!(db.list_templates().unwrap(), vec![row("a", "Kept", "2024-01-01T00:00:00+00:00")]);
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let db = Database::open_in_memory().unwrap();
        db.insert_template(&row("a", "Gone", "2024-01-01T00:00:00+00:00")).unwrap();

        assert!(db.delete_template("a").unwrap());
        assert!(!db.delete_template("a").unwrap());
        assert!(db.list_templates().unwrap().is_empty());
    }
}
