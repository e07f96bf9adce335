//! # Domain Types
//!
//! Core domain types for sponsors, kids and the links between them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Sponsor      │   │   SponsorKid    │   │      Kid        │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  sponsor_id     │   │  id             │       │
//! │  │  first_name     │   │  kid_id         │──►│  name           │       │
//! │  │  last_name      │   │  created_at     │   │  birthday?      │       │
//! │  │  email, phone   │   └─────────────────┘   │  gender?        │       │
//! │  │  sponsorship    │                         │  image?         │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  Read views (assembled at query time, never stored):                   │
//! │  SponsorWithKids = Sponsor + kids[]                                    │
//! │  KidWithSponsors = Kid + sponsors[]                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Input Types
//! - `Create*Request` / `UpdateKidRequest`: raw JSON bodies, every field optional
//! - `NewSponsor` / `NewKid`: validated creation input (see [`crate::validation`])
//! - `SponsorPatch` / `KidPatch`: partial updates where `None` means "leave unchanged"

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

// =============================================================================
// Sponsor
// =============================================================================

/// A person, family or group that sponsors one or more kids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sponsor {
    /// Unique identifier (see [`crate::id::generate_id`]).
    pub id: String,

    pub first_name: String,

    pub last_name: String,

    /// May be empty.
    pub phone_number: String,

    /// May be empty.
    pub email: String,

    /// Free-form type, `"individual"` unless set.
    pub sponsorship_type: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Kid
// =============================================================================

/// A beneficiary record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Kid {
    pub id: String,

    pub name: String,

    #[ts(as = "Option<String>")]
    pub birthday: Option<NaiveDate>,

    pub gender: Option<String>,

    /// Public id or URL of the hosted image.
    pub image: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Sponsor-Kid Join Row
// =============================================================================

/// One sponsor-kid pair. The pair is the identity; there is no separate id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "camelCase"))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SponsorKid {
    pub sponsor_id: String,
    pub kid_id: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Read Views
// =============================================================================

/// A sponsor together with every kid it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SponsorWithKids {
    #[serde(flatten)]
    pub sponsor: Sponsor,
    pub kids: Vec<Kid>,
}

impl SponsorWithKids {
    /// Ids of the linked kids, in the order they were loaded.
    pub fn kid_ids(&self) -> Vec<&str> {
        self.kids.iter().map(|k| k.id.as_str()).collect()
    }
}

/// A kid together with every sponsor it is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KidWithSponsors {
    #[serde(flatten)]
    pub kid: Kid,
    pub sponsors: Vec<Sponsor>,
}

impl KidWithSponsors {
    /// Ids of the linked sponsors, in the order they were loaded.
    pub fn sponsor_ids(&self) -> Vec<&str> {
        self.sponsors.iter().map(|s| s.id.as_str()).collect()
    }
}

// =============================================================================
// Creation Input
// =============================================================================

/// Raw body of a create-sponsor request.
///
/// Every field is optional here so that a missing field becomes a
/// validation error instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSponsorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub sponsorship_type: Option<String>,
    pub kid_ids: Option<Vec<String>>,
}

/// Validated input for creating a sponsor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSponsor {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub email: String,
    /// `None` (or empty) stores [`crate::DEFAULT_SPONSORSHIP_TYPE`].
    pub sponsorship_type: Option<String>,
    /// Kids to link on creation. Empty means no links.
    pub kid_ids: Vec<String>,
}

impl NewSponsor {
    /// Builds a sponsor with no sponsorship type and no kids.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        phone_number: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        NewSponsor {
            first_name: first_name.into(),
            last_name: last_name.into(),
            phone_number: phone_number.into(),
            email: email.into(),
            sponsorship_type: None,
            kid_ids: Vec::new(),
        }
    }

    /// Sets the sponsorship type.
    pub fn sponsorship_type(mut self, kind: impl Into<String>) -> Self {
        self.sponsorship_type = Some(kind.into());
        self
    }

    /// Sets the kids to link on creation.
    pub fn kid_ids(mut self, ids: Vec<String>) -> Self {
        self.kid_ids = ids;
        self
    }
}

/// Raw body of a create-kid request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKidRequest {
    pub name: Option<String>,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub birthday: Option<String>,
    pub gender: Option<String>,
    pub image: Option<String>,
    pub sponsor_ids: Option<Vec<String>>,
}

/// Validated input for creating a kid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewKid {
    pub name: String,
    pub birthday: Option<NaiveDate>,
    pub gender: Option<String>,
    pub image: Option<String>,
    pub sponsor_ids: Vec<String>,
}

impl NewKid {
    /// Builds a kid with only a name.
    pub fn new(name: impl Into<String>) -> Self {
        NewKid {
            name: name.into(),
            birthday: None,
            gender: None,
            image: None,
            sponsor_ids: Vec::new(),
        }
    }

    pub fn birthday(mut self, birthday: NaiveDate) -> Self {
        self.birthday = Some(birthday);
        self
    }

    pub fn gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn sponsor_ids(mut self, ids: Vec<String>) -> Self {
        self.sponsor_ids = ids;
        self
    }
}

// =============================================================================
// Partial Updates
// =============================================================================

/// Partial update for a sponsor.
///
/// ## Relationship Semantics
/// ```text
/// kid_ids: None            → links untouched
/// kid_ids: Some(vec![])    → every link removed
/// kid_ids: Some(vec![a,b]) → links replaced by exactly {a, b}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SponsorPatch {
    #[ts(optional)]
    pub first_name: Option<String>,
    #[ts(optional)]
    pub last_name: Option<String>,
    #[ts(optional)]
    pub phone_number: Option<String>,
    #[ts(optional)]
    pub email: Option<String>,
    #[ts(optional)]
    pub sponsorship_type: Option<String>,
    #[ts(optional)]
    pub kid_ids: Option<Vec<String>>,
}

impl SponsorPatch {
    /// True when no column of the sponsor row itself changes.
    pub fn has_no_field_changes(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.phone_number.is_none()
            && self.email.is_none()
            && self.sponsorship_type.is_none()
    }
}

/// Raw body of an update-kid request.
///
/// The nullable columns are tri-state: a missing key leaves the column
/// unchanged, `null` clears it, a value sets it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKidRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub birthday: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub image: Option<Option<String>>,
    pub sponsor_ids: Option<Vec<String>>,
}

/// Partial update for a kid. Same relationship semantics as [`SponsorPatch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KidPatch {
    pub name: Option<String>,
    pub birthday: Option<Option<NaiveDate>>,
    pub gender: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub sponsor_ids: Option<Vec<String>>,
}

impl KidPatch {
    /// True when no column of the kid row itself changes.
    pub fn has_no_field_changes(&self) -> bool {
        self.name.is_none()
            && self.birthday.is_none()
            && self.gender.is_none()
            && self.image.is_none()
    }
}

/// Distinguishes a missing key (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sponsor() -> Sponsor {
        let now = Utc::now();
        Sponsor {
            id: "s1".to_string(),
            first_name: "Mike".to_string(),
            last_name: "Daugherty".to_string(),
            phone_number: "303-908-5059".to_string(),
            email: "mike@msdweb.pro".to_string(),
            sponsorship_type: "individual".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_sponsor_view_serializes_flat_camel_case() {
        let view = SponsorWithKids {
            sponsor: sample_sponsor(),
            kids: vec![],
        };
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["firstName"], "Mike");
        assert_eq!(json["sponsorshipType"], "individual");
        assert!(json["kids"].as_array().unwrap().is_empty());
        assert!(json.get("sponsor").is_none());
    }

    #[test]
    fn test_sponsor_patch_distinguishes_absent_and_empty_kid_ids() {
        let absent: SponsorPatch = serde_json::from_str(r#"{"firstName":"Jo"}"#).unwrap();
        assert_eq!(absent.first_name.as_deref(), Some("Jo"));
        assert_eq!(absent.kid_ids, None);

        let empty: SponsorPatch = serde_json::from_str(r#"{"kidIds":[]}"#).unwrap();
        assert_eq!(empty.kid_ids, Some(vec![]));
        assert!(empty.has_no_field_changes());
    }

    #[test]
    fn test_update_kid_request_is_tri_state() {
        let req: UpdateKidRequest = serde_json::from_str(r#"{"gender":null}"#).unwrap();
        assert_eq!(req.gender, Some(None));
        assert_eq!(req.image, None);
        assert_eq!(req.birthday, None);

        let req: UpdateKidRequest = serde_json::from_str(r#"{"image":"kids/malachi"}"#).unwrap();
        assert_eq!(req.image, Some(Some("kids/malachi".to_string())));
    }

    #[test]
    fn test_new_sponsor_builder() {
        let sponsor = NewSponsor::new("Mike", "Daugherty", "303-908-5059", "mike@msdweb.pro")
            .sponsorship_type("family")
            .kid_ids(vec!["k1".to_string()]);

        assert_eq!(sponsor.sponsorship_type.as_deref(), Some("family"));
        assert_eq!(sponsor.kid_ids, vec!["k1".to_string()]);
    }
}
