use std::sync::Once;

use sqlx::AnyConnection;
use sqlx::{Connection, Row};

use crate::db::models::UserRecord;
use crate::db::schema::USERS_INIT;
use crate::error::PortalError;
use crate::session::SessionUser;

const AUTH_QUERY: &str =
    "SELECT id, username FROM users WHERE username = $1 AND password = $2";

/// Outcome of a credential check. `Rejected` is an expected result and is
/// kept apart from connectivity or query failures, which surface as
/// `PortalError` and must never read as "wrong password".
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authenticated(SessionUser),
    Rejected,
}

static DRIVERS: Once = Once::new();

/// Read-only access to the `users` table.
///
/// Every call opens its own connection and closes it before returning;
/// there is no pool and nothing is shared across requests. The backend
/// (SQLite or PostgreSQL) is picked from the URL scheme by sqlx's `Any`
/// driver, so the `$1`-style placeholders below must stay valid on both.
#[derive(Clone)]
pub struct CredentialStore {
    database_url: String,
}

impl CredentialStore {
    pub fn new(database_url: impl Into<String>) -> Self {
        DRIVERS.call_once(sqlx::any::install_default_drivers);
        Self {
            database_url: database_url.into(),
        }
    }

    async fn connect(&self) -> Result<AnyConnection, PortalError> {
        Ok(AnyConnection::connect(&self.database_url).await?)
    }

    /// Check a submitted credential pair against the stored rows.
    ///
    /// A single lookup, exact equality on both columns. The table stores
    /// passwords as plaintext and the comparison happens inside the query;
    /// do not add hashing here without first migrating the stored rows. If
    /// the table holds duplicate usernames, the first row the database
    /// returns wins.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthOutcome, PortalError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query_as::<_, UserRecord>(AUTH_QUERY)
            .bind(username)
            .bind(password)
            .fetch_optional(&mut conn)
            .await;
        conn.close().await.ok();

        match row? {
            Some(user) => Ok(AuthOutcome::Authenticated(user.into())),
            None => Ok(AuthOutcome::Rejected),
        }
    }

    /// Count the stored users; backs the `/api/test-db` diagnostic.
    pub async fn user_count(&self) -> Result<i64, PortalError> {
        let mut conn = self.connect().await?;
        let row = sqlx::query("SELECT COUNT(*) FROM users")
            .fetch_one(&mut conn)
            .await;
        conn.close().await.ok();

        Ok(row?.try_get::<i64, _>(0)?)
    }

    /// Execute the bundled DDL statement by statement (sqlx runs a single
    /// command per query). Bootstrap and test setup only; never called on
    /// the request path.
    pub async fn init_schema(&self) -> Result<(), PortalError> {
        let mut conn = self.connect().await?;
        for stmt in USERS_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            if let Err(e) = sqlx::query(s).execute(&mut conn).await {
                conn.close().await.ok();
                return Err(e.into());
            }
        }
        conn.close().await.ok();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seeded_store(tag: &str) -> (CredentialStore, std::path::PathBuf) {
        let mut path = std::env::temp_dir();
        path.push(format!(
            "login-portal-store-{}-{}.sqlite",
            tag,
            std::process::id()
        ));
        let _ = std::fs::remove_file(&path);

        let store = CredentialStore::new(format!("sqlite:{}?mode=rwc", path.display()));
        store.init_schema().await.expect("schema init failed");

        let mut conn = AnyConnection::connect(&store.database_url)
            .await
            .expect("connect failed");
        sqlx::query("INSERT INTO users (id, username, password) VALUES (1, 'alice', 'secret')")
            .execute(&mut conn)
            .await
            .expect("seed failed");
        conn.close().await.ok();

        (store, path)
    }

    #[tokio::test]
    async fn matching_pair_authenticates_with_the_row_identity() {
        let (store, path) = seeded_store("match").await;

        let outcome = store.authenticate("alice", "secret").await.unwrap();
        assert_eq!(
            outcome,
            AuthOutcome::Authenticated(SessionUser {
                user_id: 1,
                username: "alice".to_string(),
            })
        );

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_are_rejected() {
        let (store, path) = seeded_store("reject").await;

        assert_eq!(
            store.authenticate("alice", "wrong").await.unwrap(),
            AuthOutcome::Rejected
        );
        assert_eq!(
            store.authenticate("nobody", "secret").await.unwrap(),
            AuthOutcome::Rejected
        );

        let _ = std::fs::remove_file(path);
    }

    #[tokio::test]
    async fn unreachable_database_is_an_error_not_a_rejection() {
        let store = CredentialStore::new("sqlite:/login-portal-no-such-dir/users.db");

        let err = store.authenticate("alice", "secret").await.unwrap_err();
        assert!(matches!(err, PortalError::Database(_)));
    }

    #[tokio::test]
    async fn user_count_reflects_the_seeded_rows() {
        let (store, path) = seeded_store("count").await;

        assert_eq!(store.user_count().await.unwrap(), 1);

        let _ = std::fs::remove_file(path);
    }
}
