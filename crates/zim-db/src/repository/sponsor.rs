//! # Sponsor Repository
//!
//! Database operations for sponsors and their linked kids.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  create / update (one transaction)                      │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    INSERT sponsor            │  UPDATE sponsor SET <present fields>,    │
//! │                              │                    updatedAt             │
//! │                              │  DELETE sponsorKid WHERE sponsorId (*)   │
//! │    INSERT sponsorKid x N     │  INSERT sponsorKid x N              (*)  │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  (*) only when the patch carries kid_ids                                │
//! │                                                                         │
//! │  Any failure (e.g. unknown kid id) drops the transaction: no sponsor   │
//! │  row, no partial links.                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Read Path
//! `get_all` runs exactly two queries (sponsors, then every link joined with
//! its kid) and groups the kids in memory.

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use super::link::{self, LinkOwner};
use super::{KID_COLUMNS, SPONSOR_COLUMNS};
use crate::error::{DbError, DbResult};
use zim_core::{generate_id, Kid, NewSponsor, Sponsor, SponsorPatch, SponsorWithKids, DEFAULT_SPONSORSHIP_TYPE};

/// A kid row tagged with the sponsor it was reached through.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct SponsorKidRow {
    sponsor_id: String,
    #[sqlx(flatten)]
    kid: Kid,
}

/// Repository for sponsor database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = SponsorRepository::new(pool);
///
/// let created = repo.create(NewSponsor::new("Mike", "Daugherty", "", "")).await?;
/// let loaded = repo.get_by_id(&created.sponsor.id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct SponsorRepository {
    pool: SqlitePool,
}

impl SponsorRepository {
    /// Creates a new SponsorRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SponsorRepository { pool }
    }

    /// Creates a sponsor with a freshly generated id and links its kids.
    ///
    /// ## Returns
    /// * `Ok(SponsorWithKids)` - The stored sponsor, reloaded
    /// * `Err(DbError::ForeignKeyViolation)` - A kid id does not exist
    pub async fn create(&self, new: NewSponsor) -> DbResult<SponsorWithKids> {
        let id = generate_id();
        self.insert_with_id(&id, new).await
    }

    /// Creates a sponsor under a caller-chosen id.
    ///
    /// Used by the seeder, whose roster carries its own ids.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - The id is taken
    pub async fn insert_with_id(&self, id: &str, new: NewSponsor) -> DbResult<SponsorWithKids> {
        debug!(id = %id, kids = new.kid_ids.len(), "Creating sponsor");

        let now = Utc::now();
        let sponsorship_type = new
            .sponsorship_type
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| DEFAULT_SPONSORSHIP_TYPE.to_string());

        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        sqlx::query(
            r#"
            INSERT INTO sponsor (
                id, firstName, lastName, phoneNumber, email,
                sponsorshipType, createdAt, updatedAt
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(id)
        .bind(&new.first_name)
        .bind(&new.last_name)
        .bind(&new.phone_number)
        .bind(&new.email)
        .bind(&sponsorship_type)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        link::attach(&mut tx, LinkOwner::Sponsor(id), &new.kid_ids, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("sponsor {} vanished after insert", id)))
    }

    /// Gets a sponsor and its kids.
    ///
    /// ## Returns
    /// * `Ok(Some(SponsorWithKids))` - Sponsor found (`kids` may be empty)
    /// * `Ok(None)` - No sponsor with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<SponsorWithKids>> {
        let sql = format!("SELECT {} FROM sponsor s WHERE s.id = ?1", SPONSOR_COLUMNS);
        let sponsor = sqlx::query_as::<_, Sponsor>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(sponsor) = sponsor else {
            debug!(id = %id, "Sponsor not found");
            return Ok(None);
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM kid k
            INNER JOIN sponsorKid sk ON sk.kidId = k.id
            WHERE sk.sponsorId = ?1
            ORDER BY sk.createdAt, k.name
            "#,
            KID_COLUMNS
        );
        let kids = sqlx::query_as::<_, Kid>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(SponsorWithKids { sponsor, kids }))
    }

    /// Lists every sponsor with its kids, oldest sponsor first.
    pub async fn get_all(&self) -> DbResult<Vec<SponsorWithKids>> {
        let sql = format!(
            "SELECT {} FROM sponsor s ORDER BY s.createdAt, s.id",
            SPONSOR_COLUMNS
        );
        let sponsors = sqlx::query_as::<_, Sponsor>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let sql = format!(
            r#"
            SELECT sk.sponsorId, {}
            FROM sponsorKid sk
            INNER JOIN kid k ON k.id = sk.kidId
            ORDER BY sk.createdAt, k.name
            "#,
            KID_COLUMNS
        );
        let rows = sqlx::query_as::<_, SponsorKidRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut kids_by_sponsor: HashMap<String, Vec<Kid>> = HashMap::new();
        for row in rows {
            kids_by_sponsor.entry(row.sponsor_id).or_default().push(row.kid);
        }

        debug!(count = sponsors.len(), "Loaded sponsors");

        Ok(sponsors
            .into_iter()
            .map(|sponsor| {
                let kids = kids_by_sponsor.remove(&sponsor.id).unwrap_or_default();
                SponsorWithKids { sponsor, kids }
            })
            .collect())
    }

    /// Applies a partial update.
    ///
    /// Only fields present in the patch are written; `updatedAt` always is.
    /// `kid_ids: Some(..)` replaces the whole link set, `None` leaves it.
    ///
    /// ## Returns
    /// * `Ok(Some(SponsorWithKids))` - The updated sponsor, reloaded
    /// * `Ok(None)` - No sponsor with that id (nothing written)
    pub async fn update(&self, id: &str, patch: SponsorPatch) -> DbResult<Option<SponsorWithKids>> {
        debug!(
            id = %id,
            replaces_kids = patch.kid_ids.is_some(),
            "Updating sponsor"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE sponsor SET updatedAt = ");
        builder.push_bind(now);
        if let Some(first_name) = patch.first_name {
            builder.push(", firstName = ").push_bind(first_name);
        }
        if let Some(last_name) = patch.last_name {
            builder.push(", lastName = ").push_bind(last_name);
        }
        if let Some(phone_number) = patch.phone_number {
            builder.push(", phoneNumber = ").push_bind(phone_number);
        }
        if let Some(email) = patch.email {
            builder.push(", email = ").push_bind(email);
        }
        if let Some(sponsorship_type) = patch.sponsorship_type {
            builder.push(", sponsorshipType = ").push_bind(sponsorship_type);
        }
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            debug!(id = %id, "Sponsor not found for update");
            return Ok(None);
        }

        if let Some(kid_ids) = &patch.kid_ids {
            link::replace(&mut tx, LinkOwner::Sponsor(id), kid_ids, now).await?;
        }

        tx.commit().await.map_err(DbError::transaction)?;

        self.get_by_id(id).await
    }

    /// Deletes a sponsor. Its links go with it; its kids stay.
    ///
    /// Deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sponsor WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, deleted = result.rows_affected(), "Deleted sponsor");
        Ok(())
    }

    /// Counts sponsors.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sponsor")
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
    use crate::{Database, DbConfig};
    use zim_core::NewKid;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_defaults_sponsorship_type() {
        let db = setup().await;
        let created = db
            .sponsors()
            .create(NewSponsor::new("Mike", "Daugherty", "303-908-5059", "mike@msdweb.pro"))
            .await
            .unwrap();

        assert_eq!(created.sponsor.sponsorship_type, "individual");
        assert_eq!(created.sponsor.created_at, created.sponsor.updated_at);
        assert!(created.kids.is_empty());
    }

    #[tokio::test]
    async fn test_empty_sponsorship_type_uses_default() {
        let db = setup().await;
        let created = db
            .sponsors()
            .create(NewSponsor::new("A", "B", "", "").sponsorship_type(""))
            .await
            .unwrap();

        assert_eq!(created.sponsor.sponsorship_type, DEFAULT_SPONSORSHIP_TYPE);
    }

    #[tokio::test]
    async fn test_get_by_id_missing() {
        let db = setup().await;
        assert!(db.sponsors().get_by_id("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let db = setup().await;
        let patch = SponsorPatch {
            first_name: Some("Ghost".to_string()),
            kid_ids: Some(vec![]),
            ..Default::default()
        };
        assert!(db.sponsors().update("nope", patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_refreshes_updated_at_only() {
        let db = setup().await;
        let created = db
            .sponsors()
            .create(NewSponsor::new("A", "B", "1", "a@example.org"))
            .await
            .unwrap();

        let updated = db
            .sponsors()
            .update(&created.sponsor.id, SponsorPatch::default())
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.sponsor.first_name, "A");
        assert_eq!(updated.sponsor.created_at, created.sponsor.created_at);
        assert!(updated.sponsor.updated_at >= created.sponsor.updated_at);
    }

    #[tokio::test]
    async fn test_insert_with_duplicate_id() {
        let db = setup().await;
        let repo = db.sponsors();
        repo.insert_with_id("1", NewSponsor::new("A", "B", "", ""))
            .await
            .unwrap();

        let err = repo
            .insert_with_id("1", NewSponsor::new("C", "D", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { .. }));
    }

    #[tokio::test]
    async fn test_get_all_groups_kids() {
        let db = setup().await;
        let kid = db.kids().create(NewKid::new("Malachi")).await.unwrap();
        let with_kid = db
            .sponsors()
            .create(NewSponsor::new("A", "B", "", "").kid_ids(vec![kid.kid.id.clone()]))
            .await
            .unwrap();
        let without = db
            .sponsors()
            .create(NewSponsor::new("C", "D", "", ""))
            .await
            .unwrap();

        let all = db.sponsors().get_all().await.unwrap();
        assert_eq!(all.len(), 2);

        let find = |id: &str| all.iter().find(|s| s.sponsor.id == id).unwrap();
        assert_eq!(find(&with_kid.sponsor.id).kid_ids(), vec![kid.kid.id.as_str()]);
        assert!(find(&without.sponsor.id).kids.is_empty());
    }
}
