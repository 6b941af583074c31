use sqlx::FromRow;

use crate::session::SessionUser;

/// Columns pulled back by the credential lookup. The plaintext `password`
/// column participates in the SQL comparison but never leaves the database.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
}

impl From<UserRecord> for SessionUser {
    fn from(row: UserRecord) -> Self {
        SessionUser {
            user_id: row.id,
            username: row.username,
        }
    }
}
