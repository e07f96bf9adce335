//! # Link Repository
//!
//! The sponsor-kid relationship table and the shared code that keeps it in
//! step with sponsor and kid writes.
//!
//! ## Relationship Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Operation                     Effect on sponsorKid                     │
//! │  ─────────                     ────────────────────                     │
//! │  create(kid_ids = [])          nothing                                  │
//! │  create(kid_ids = [a, b, a])   insert (S,a) (S,b)       dupes collapsed │
//! │  update(kid_ids = None)        nothing                                  │
//! │  update(kid_ids = Some([]))    delete every (S,*)                       │
//! │  update(kid_ids = Some([b]))   delete every (S,*), insert (S,b)         │
//! │  delete sponsor S              (S,*) removed by ON DELETE CASCADE       │
//! │  add_link(S, a)                insert (S,a) unless already present      │
//! │  remove_link(S, a)             delete (S,a) if present                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The kid side is the mirror image, with `sponsor_ids`.
//! A partner id that does not exist fails the foreign key and the whole
//! calling transaction rolls back.

use chrono::{DateTime, Utc};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use tracing::debug;

use crate::error::{DbError, DbResult};

// =============================================================================
// Shared Link Maintenance
// =============================================================================

/// The entity whose links are being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LinkOwner<'a> {
    Sponsor(&'a str),
    Kid(&'a str),
}

impl<'a> LinkOwner<'a> {
    fn column(&self) -> &'static str {
        match *self {
            LinkOwner::Sponsor(_) => "sponsorId",
            LinkOwner::Kid(_) => "kidId",
        }
    }

    fn id(&self) -> &'a str {
        match *self {
            LinkOwner::Sponsor(id) | LinkOwner::Kid(id) => id,
        }
    }

    /// Orders `(owner, partner)` as `(sponsor_id, kid_id)`.
    fn pair<'b>(&self, partner: &'b str) -> (&'b str, &'b str)
    where
        'a: 'b,
    {
        match *self {
            LinkOwner::Sponsor(id) => (id, partner),
            LinkOwner::Kid(id) => (partner, id),
        }
    }
}

/// Drops repeated ids, keeping the first occurrence of each.
pub(crate) fn dedupe(ids: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    ids.iter()
        .map(String::as_str)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Inserts one link row per distinct partner id.
///
/// Runs on the caller's connection so it joins the caller's transaction.
/// Returns the number of rows inserted.
pub(crate) async fn attach(
    conn: &mut SqliteConnection,
    owner: LinkOwner<'_>,
    partner_ids: &[String],
    now: DateTime<Utc>,
) -> DbResult<u64> {
    let partners = dedupe(partner_ids);
    if partners.is_empty() {
        return Ok(0);
    }

    debug!(
        owner = %owner.id(),
        column = owner.column(),
        count = partners.len(),
        "Attaching links"
    );

    let mut builder: QueryBuilder<Sqlite> =
        QueryBuilder::new("INSERT INTO sponsorKid (sponsorId, kidId, createdAt) ");
    builder.push_values(partners, |mut row, partner| {
        let (sponsor_id, kid_id) = owner.pair(partner);
        row.push_bind(sponsor_id.to_string())
            .push_bind(kid_id.to_string())
            .push_bind(now);
    });

    let result = builder.build().execute(&mut *conn).await?;
    Ok(result.rows_affected())
}

/// Replaces every link of `owner` with exactly `partner_ids`.
///
/// An empty list removes all links.
pub(crate) async fn replace(
    conn: &mut SqliteConnection,
    owner: LinkOwner<'_>,
    partner_ids: &[String],
    now: DateTime<Utc>,
) -> DbResult<u64> {
    let sql = format!("DELETE FROM sponsorKid WHERE {} = ?1", owner.column());
    let removed = sqlx::query(&sql)
        .bind(owner.id())
        .execute(&mut *conn)
        .await?
        .rows_affected();

    debug!(owner = %owner.id(), removed, "Cleared links before replace");

    attach(conn, owner, partner_ids, now).await
}

// =============================================================================
// Link Repository
// =============================================================================

/// Repository for explicit single-pair link operations.
///
/// ## Usage
/// ```rust,ignore
/// let links = db.links();
/// links.add_link("1", "1718035200123-k3x9q0a").await?;
/// assert!(links.exists("1", "1718035200123-k3x9q0a").await?);
/// ```
#[derive(Debug, Clone)]
pub struct LinkRepository {
    pool: SqlitePool,
}

impl LinkRepository {
    /// Creates a new LinkRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LinkRepository { pool }
    }

    /// Links a sponsor and a kid. A no-op when the pair already exists.
    ///
    /// ## Returns
    /// * `Err(DbError::ForeignKeyViolation)` - either id does not exist
    pub async fn add_link(&self, sponsor_id: &str, kid_id: &str) -> DbResult<()> {
        debug!(sponsor_id = %sponsor_id, kid_id = %kid_id, "Adding link");

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let existing: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM sponsorKid WHERE sponsorId = ?1 AND kidId = ?2")
                .bind(sponsor_id)
                .bind(kid_id)
                .fetch_optional(&mut *tx)
                .await?;

        if existing.is_some() {
            debug!(sponsor_id = %sponsor_id, kid_id = %kid_id, "Link already present");
            return Ok(());
        }

        sqlx::query("INSERT INTO sponsorKid (sponsorId, kidId, createdAt) VALUES (?1, ?2, ?3)")
            .bind(sponsor_id)
            .bind(kid_id)
            .bind(Utc::now())
            .execute(&mut *tx)
            .await?;

        tx.commit().await.map_err(DbError::transaction)?;
        Ok(())
    }

    /// Unlinks a sponsor and a kid. Removing an absent pair is not an error.
    pub async fn remove_link(&self, sponsor_id: &str, kid_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sponsorKid WHERE sponsorId = ?1 AND kidId = ?2")
            .bind(sponsor_id)
            .bind(kid_id)
            .execute(&self.pool)
            .await?;

        debug!(
            sponsor_id = %sponsor_id,
            kid_id = %kid_id,
            removed = result.rows_affected(),
            "Removed link"
        );
        Ok(())
    }

    /// True when the pair is linked.
    pub async fn exists(&self, sponsor_id: &str, kid_id: &str) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sponsorKid WHERE sponsorId = ?1 AND kidId = ?2",
        )
        .bind(sponsor_id)
        .bind(kid_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count > 0)
    }

    /// Total number of link rows.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sponsorKid")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedupe_keeps_first_occurrence() {
        let ids = vec![
            "b".to_string(),
            "a".to_string(),
            "b".to_string(),
            "c".to_string(),
            "a".to_string(),
        ];
        assert_eq!(dedupe(&ids), vec!["b", "a", "c"]);
        assert!(dedupe(&[]).is_empty());
    }

    #[test]
    fn test_owner_pair_order() {
        assert_eq!(LinkOwner::Sponsor("s").pair("k"), ("s", "k"));
        assert_eq!(LinkOwner::Kid("k").pair("s"), ("s", "k"));
        assert_eq!(LinkOwner::Kid("k").column(), "kidId");
    }
}
