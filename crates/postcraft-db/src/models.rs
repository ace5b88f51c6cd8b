//! Database rows, one field per SQLite column.

/// `password` is the Argon2 PHC string.
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub password: String,
}

/// Outcome of inserting an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInsert {
    Created,
    EmailTaken,
    UsernameTaken,
}

/// `sections` is the raw JSON array; `created_at` is RFC 3339.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateRow {
    pub id: String,
    pub title: String,
    pub subject: String,
    pub sections: String,
    pub created_at: String,
}
