//! # Session Repository
//!
//! Read-only access to the `user` and `session` tables written by the
//! external auth service. The admin routes use it to check that a request
//! carries a live session.
//!
//! ```text
//! token ──► session (token UNIQUE) ──► expiresAt > now ? ──► user
//!                 │                          │
//!                 └── no row ──► None        └── expired ──► None
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// A session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub user_id: String,
}

/// An admin account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
#[sqlx(rename_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub email_verified: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A live session and the user it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActiveSession {
    pub session: Session,
    pub user: User,
}

/// Repository for session lookups.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Creates a new SessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SessionRepository { pool }
    }

    /// Finds the session for `token` if it has not expired.
    pub async fn find_active(&self, token: &str) -> DbResult<Option<ActiveSession>> {
        self.find_active_at(token, Utc::now()).await
    }

    /// Same as [`find_active`](Self::find_active) with an explicit clock.
    pub async fn find_active_at(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> DbResult<Option<ActiveSession>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT id, expiresAt, token, createdAt, updatedAt, ipAddress, userAgent, userId
            FROM session
            WHERE token = ?1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        let Some(session) = session else {
            debug!("No session for token");
            return Ok(None);
        };

        if session.expires_at <= now {
            debug!(session_id = %session.id, expires_at = %session.expires_at, "Session expired");
            return Ok(None);
        }

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, emailVerified, image, createdAt, updatedAt
            FROM user
            WHERE id = ?1
            "#,
        )
        .bind(&session.user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user.map(|user| ActiveSession { session, user }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use chrono::Duration;

    async fn setup_with_session(expires_at: DateTime<Utc>) -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let now = Utc::now();

        sqlx::query(
            "INSERT INTO user (id, name, email, emailVerified, createdAt, updatedAt)
             VALUES ('u1', 'Admin', 'admin@example.org', 1, ?1, ?1)",
        )
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        sqlx::query(
            "INSERT INTO session (id, expiresAt, token, createdAt, updatedAt, userId)
             VALUES ('s1', ?1, 'tok', ?2, ?2, 'u1')",
        )
        .bind(expires_at)
        .bind(now)
        .execute(db.pool())
        .await
        .unwrap();

        db
    }

    #[tokio::test]
    async fn test_find_active_session() {
        let db = setup_with_session(Utc::now() + Duration::hours(1)).await;
        let active = db.sessions().find_active("tok").await.unwrap().unwrap();

        assert_eq!(active.session.id, "s1");
        assert_eq!(active.user.email, "admin@example.org");
        assert!(active.user.email_verified);
    }

    #[tokio::test]
    async fn test_expired_session_is_ignored() {
        let db = setup_with_session(Utc::now() - Duration::minutes(1)).await;
        assert!(db.sessions().find_active("tok").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let db = setup_with_session(Utc::now() + Duration::hours(1)).await;
        assert!(db.sessions().find_active("other").await.unwrap().is_none());
    }
}
