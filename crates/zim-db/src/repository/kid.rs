//! # Kid Repository
//!
//! Database operations for kids and their linked sponsors.
//!
//! Mirrors [`SponsorRepository`](super::sponsor::SponsorRepository): create
//! and update run in one transaction with the link writes, `get_all` is two
//! queries grouped in memory.
//!
//! ## Nullable Columns
//! ```text
//! KidPatch field          SQL
//! ──────────────          ───
//! None                    column left out of the UPDATE
//! Some(None)              column = NULL
//! Some(Some(v))           column = v
//! ```

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use tracing::debug;

use super::link::{self, LinkOwner};
use super::{KID_COLUMNS, SPONSOR_COLUMNS};
use crate::error::{DbError, DbResult};
use zim_core::{generate_id, Kid, KidPatch, KidWithSponsors, NewKid, Sponsor};

/// A sponsor row tagged with the kid it was reached through.
#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct KidSponsorRow {
    kid_id: String,
    #[sqlx(flatten)]
    sponsor: Sponsor,
}

/// Repository for kid database operations.
#[derive(Debug, Clone)]
pub struct KidRepository {
    pool: SqlitePool,
}

impl KidRepository {
    /// Creates a new KidRepository.
    pub fn new(pool: SqlitePool) -> Self {
        KidRepository { pool }
    }

    /// Creates a kid and links its sponsors.
    ///
    /// ## Returns
    /// * `Ok(KidWithSponsors)` - The stored kid, reloaded
    /// * `Err(DbError::ForeignKeyViolation)` - A sponsor id does not exist
    pub async fn create(&self, new: NewKid) -> DbResult<KidWithSponsors> {
        let id = generate_id();
        debug!(id = %id, sponsors = new.sponsor_ids.len(), "Creating kid");

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        sqlx::query(
            r#"
            INSERT INTO kid (id, name, birthday, gender, image, createdAt, updatedAt)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(new.birthday)
        .bind(new.gender.as_deref().filter(|g| !g.is_empty()))
        .bind(new.image.as_deref().filter(|i| !i.is_empty()))
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        link::attach(&mut tx, LinkOwner::Kid(&id), &new.sponsor_ids, now).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| DbError::Internal(format!("kid {} vanished after insert", id)))
    }

    /// Gets a kid and its sponsors.
    ///
    /// ## Returns
    /// * `Ok(Some(KidWithSponsors))` - Kid found (`sponsors` may be empty)
    /// * `Ok(None)` - No kid with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<KidWithSponsors>> {
        let sql = format!("SELECT {} FROM kid k WHERE k.id = ?1", KID_COLUMNS);
        let kid = sqlx::query_as::<_, Kid>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(kid) = kid else {
            debug!(id = %id, "Kid not found");
            return Ok(None);
        };

        let sql = format!(
            r#"
            SELECT {}
            FROM sponsor s
            INNER JOIN sponsorKid sk ON sk.sponsorId = s.id
            WHERE sk.kidId = ?1
            ORDER BY sk.createdAt, s.lastName, s.firstName
            "#,
            SPONSOR_COLUMNS
        );
        let sponsors = sqlx::query_as::<_, Sponsor>(&sql)
            .bind(id)
            .fetch_all(&self.pool)
            .await?;

        Ok(Some(KidWithSponsors { kid, sponsors }))
    }

    /// Lists every kid with its sponsors, oldest kid first.
    pub async fn get_all(&self) -> DbResult<Vec<KidWithSponsors>> {
        let sql = format!("SELECT {} FROM kid k ORDER BY k.createdAt, k.id", KID_COLUMNS);
        let kids = sqlx::query_as::<_, Kid>(&sql).fetch_all(&self.pool).await?;

        let sql = format!(
            r#"
            SELECT sk.kidId, {}
            FROM sponsorKid sk
            INNER JOIN sponsor s ON s.id = sk.sponsorId
            ORDER BY sk.createdAt, s.lastName, s.firstName
            "#,
            SPONSOR_COLUMNS
        );
        let rows = sqlx::query_as::<_, KidSponsorRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let mut sponsors_by_kid: HashMap<String, Vec<Sponsor>> = HashMap::new();
        for row in rows {
            sponsors_by_kid.entry(row.kid_id).or_default().push(row.sponsor);
        }

        debug!(count = kids.len(), "Loaded kids");

        Ok(kids
            .into_iter()
            .map(|kid| {
                let sponsors = sponsors_by_kid.remove(&kid.id).unwrap_or_default();
                KidWithSponsors { kid, sponsors }
            })
            .collect())
    }

    /// Applies a partial update.
    ///
    /// `sponsor_ids: Some(..)` replaces the whole link set, `None` leaves it.
    ///
    /// ## Returns
    /// * `Ok(Some(KidWithSponsors))` - The updated kid, reloaded
    /// * `Ok(None)` - No kid with that id (nothing written)
    pub async fn update(&self, id: &str, patch: KidPatch) -> DbResult<Option<KidWithSponsors>> {
        debug!(
            id = %id,
            replaces_sponsors = patch.sponsor_ids.is_some(),
            "Updating kid"
        );

        let now = Utc::now();
        let mut tx = self.pool.begin().await.map_err(DbError::transaction)?;

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE kid SET updatedAt = ");
        builder.push_bind(now);
        if let Some(name) = patch.name {
            builder.push(", name = ").push_bind(name);
        }
        if let Some(birthday) = patch.birthday {
            builder.push(", birthday = ").push_bind(birthday);
        }
        if let Some(gender) = patch.gender {
            builder.push(", gender = ").push_bind(gender);
        }
        if let Some(image) = patch.image {
            builder.push(", image = ").push_bind(image);
        }
        builder.push(" WHERE id = ").push_bind(id.to_string());

        let result = builder.build().execute(&mut *tx).await?;
        if result.rows_affected() == 0 {
            debug!(id = %id, "Kid not found for update");
            return Ok(None);
        }

        if let Some(sponsor_ids) = &patch.sponsor_ids {
            link::replace(&mut tx, LinkOwner::Kid(id), sponsor_ids, now).await?;
        }

        tx.commit().await.map_err(DbError::transaction)?;

        self.get_by_id(id).await
    }

    /// Deletes a kid. Its links go with it; its sponsors stay.
    ///
    /// Deleting an unknown id is not an error.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM kid WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        debug!(id = %id, deleted = result.rows_affected(), "Deleted kid");
        Ok(())
    }

    /// Counts kids.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM kid")
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
    use chrono::NaiveDate;

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_create_kid_with_optional_fields() {
        let db = setup().await;
        let birthday = NaiveDate::from_ymd_opt(2014, 6, 1).unwrap();
        let created = db
            .kids()
            .create(NewKid::new("Malachi").birthday(birthday).gender("male"))
            .await
            .unwrap();

        assert_eq!(created.kid.name, "Malachi");
        assert_eq!(created.kid.birthday, Some(birthday));
        assert_eq!(created.kid.gender.as_deref(), Some("male"));
        assert_eq!(created.kid.image, None);
        assert!(created.sponsors.is_empty());
    }

    #[tokio::test]
    async fn test_empty_strings_stored_as_null() {
        let db = setup().await;
        let created = db
            .kids()
            .create(NewKid::new("Ruth").gender("").image(""))
            .await
            .unwrap();

        assert_eq!(created.kid.gender, None);
        assert_eq!(created.kid.image, None);
    }

    #[tokio::test]
    async fn test_patch_tri_state() {
        let db = setup().await;
        let created = db
            .kids()
            .create(NewKid::new("Tendai").gender("female").image("kids/tendai"))
            .await
            .unwrap();
        let id = created.kid.id.clone();

        let patch = KidPatch {
            gender: Some(None),
            ..Default::default()
        };
        let updated = db.kids().update(&id, patch).await.unwrap().unwrap();

        assert_eq!(updated.kid.gender, None);
        assert_eq!(updated.kid.image.as_deref(), Some("kids/tendai"));
        assert_eq!(updated.kid.name, "Tendai");
    }

    #[tokio::test]
    async fn test_update_missing_returns_none() {
        let db = setup().await;
        let patch = KidPatch {
            name: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert!(db.kids().update("nope", patch).await.unwrap().is_none());
        assert_eq!(db.kids().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_missing_is_ok() {
        let db = setup().await;
        db.kids().delete("nope").await.unwrap();
    }
}
