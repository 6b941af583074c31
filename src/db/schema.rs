//! SQL DDL for the `users` table.
//! Used by tests and first-time deployments; a production table is expected
//! to already exist and is never written to by this service.

/// Portable schema:
/// - `id` INTEGER PRIMARY KEY (rowid alias on SQLite, plain key on PostgreSQL)
/// - `username`/`password` TEXT; the password column holds plaintext
pub const USERS_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT NOT NULL,
    password TEXT NOT NULL
);
"#;
