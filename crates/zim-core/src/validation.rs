//! # Validation Module
//!
//! Turns raw request bodies into validated domain input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin UI (Svelte)                                            │
//! │  └── Basic form checks                                                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: HTTP handler (Rust)                                          │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: required fields, lengths, birthday parsing           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── Composite primary key on sponsorKid                               │
//! │  └── Foreign key constraints (dangling kid/sponsor ids)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here checks that related ids exist. A dangling id is left for the
//! foreign key to reject.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::error::ValidationError;
use crate::types::{
    CreateKidRequest, CreateSponsorRequest, KidPatch, NewKid, NewSponsor, SponsorPatch,
    UpdateKidRequest,
};
use crate::MAX_NAME_LENGTH;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Fields a create-sponsor body must carry.
pub const SPONSOR_REQUIRED_FIELDS: [&str; 4] = ["firstName", "lastName", "phoneNumber", "email"];

// =============================================================================
// Sponsors
// =============================================================================

/// Validates a create-sponsor body.
///
/// ## Rules
/// - `firstName`, `lastName`, `phoneNumber` and `email` must all be present
/// - `firstName` and `lastName` must not be blank
/// - `phoneNumber` and `email` may be empty strings
/// - a missing `kidIds` means no links
///
/// Any failure reports the full required-field list.
///
/// ## Example
/// ```rust
/// use zim_core::types::CreateSponsorRequest;
/// use zim_core::validation::validate_new_sponsor;
///
/// let req = CreateSponsorRequest {
///     first_name: Some("Mike".into()),
///     last_name: Some("Daugherty".into()),
///     phone_number: Some("".into()),
///     email: Some("mike@msdweb.pro".into()),
///     ..Default::default()
/// };
/// assert!(validate_new_sponsor(req).is_ok());
/// ```
pub fn validate_new_sponsor(req: CreateSponsorRequest) -> ValidationResult<NewSponsor> {
    let (first_name, last_name, phone_number, email) =
        match (req.first_name, req.last_name, req.phone_number, req.email) {
            (Some(first), Some(last), Some(phone), Some(email))
                if !first.trim().is_empty() && !last.trim().is_empty() =>
            {
                (first, last, phone, email)
            }
            _ => {
                return Err(ValidationError::MissingFields {
                    fields: SPONSOR_REQUIRED_FIELDS.iter().map(|f| f.to_string()).collect(),
                })
            }
        };

    validate_length("firstName", &first_name)?;
    validate_length("lastName", &last_name)?;

    Ok(NewSponsor {
        first_name,
        last_name,
        phone_number,
        email,
        sponsorship_type: req.sponsorship_type.filter(|t| !t.trim().is_empty()),
        kid_ids: req.kid_ids.unwrap_or_default(),
    })
}

/// Validates a sponsor patch. Only fields that are present are checked.
pub fn validate_sponsor_patch(patch: &SponsorPatch) -> ValidationResult<()> {
    if let Some(first_name) = &patch.first_name {
        validate_length("firstName", first_name)?;
    }
    if let Some(last_name) = &patch.last_name {
        validate_length("lastName", last_name)?;
    }
    Ok(())
}

// =============================================================================
// Kids
// =============================================================================

/// Validates a create-kid body.
///
/// ## Rules
/// - `name` must be present and not blank
/// - `birthday`, if non-empty, must parse (see [`parse_birthday`])
/// - empty `gender` / `image` strings are stored as NULL
pub fn validate_new_kid(req: CreateKidRequest) -> ValidationResult<NewKid> {
    let name = match req.name {
        Some(name) if !name.trim().is_empty() => name,
        _ => {
            return Err(ValidationError::Required {
                field: "name".to_string(),
            })
        }
    };
    validate_length("name", &name)?;

    let birthday = match req.birthday.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(parse_birthday(raw)?),
        _ => None,
    };

    Ok(NewKid {
        name,
        birthday,
        gender: req.gender.filter(|g| !g.is_empty()),
        image: req.image.filter(|i| !i.is_empty()),
        sponsor_ids: req.sponsor_ids.unwrap_or_default(),
    })
}

/// Converts an update-kid body into a [`KidPatch`].
///
/// An empty birthday string leaves the stored birthday unchanged; `null`
/// clears it.
pub fn validate_kid_patch(req: UpdateKidRequest) -> ValidationResult<KidPatch> {
    if let Some(name) = &req.name {
        validate_length("name", name)?;
    }

    let birthday = match req.birthday {
        None => None,
        Some(None) => Some(None),
        Some(Some(raw)) if raw.trim().is_empty() => None,
        Some(Some(raw)) => Some(Some(parse_birthday(raw.trim())?)),
    };

    Ok(KidPatch {
        name: req.name,
        birthday,
        gender: req.gender,
        image: req.image,
        sponsor_ids: req.sponsor_ids,
    })
}

/// Parses a birthday from a date or a timestamp.
///
/// Accepts `YYYY-MM-DD`, RFC 3339 (`2015-04-02T00:00:00.000Z`) and a naive
/// `YYYY-MM-DDTHH:MM:SS[.fff]`. Timestamps keep only their calendar date.
///
/// ## Example
/// ```rust
/// use zim_core::validation::parse_birthday;
///
/// let date = parse_birthday("2015-04-02T00:00:00.000Z").unwrap();
/// assert_eq!(date.to_string(), "2015-04-02");
/// assert!(parse_birthday("next tuesday").is_err());
/// ```
pub fn parse_birthday(raw: &str) -> ValidationResult<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(ts.date());
    }

    Err(ValidationError::InvalidFormat {
        field: "birthday".to_string(),
        reason: format!("'{}' is not a date", raw),
    })
}

// =============================================================================
// Helpers
// =============================================================================

fn validate_length(field: &str, value: &str) -> ValidationResult<()> {
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_NAME_LENGTH,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn full_sponsor_request() -> CreateSponsorRequest {
        CreateSponsorRequest {
            first_name: Some("Mike".to_string()),
            last_name: Some("Daugherty".to_string()),
            phone_number: Some("303-908-5059".to_string()),
            email: Some("mike@msdweb.pro".to_string()),
            sponsorship_type: None,
            kid_ids: None,
        }
    }

    #[test]
    fn test_validate_new_sponsor() {
        let sponsor = validate_new_sponsor(full_sponsor_request()).unwrap();
        assert_eq!(sponsor.first_name, "Mike");
        assert_eq!(sponsor.sponsorship_type, None);
        assert!(sponsor.kid_ids.is_empty());
    }

    #[test]
    fn test_validate_new_sponsor_missing_field() {
        let req = CreateSponsorRequest {
            email: None,
            ..full_sponsor_request()
        };
        let err = validate_new_sponsor(req).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required fields: firstName, lastName, phoneNumber, email"
        );
    }

    #[test]
    fn test_validate_new_sponsor_blank_name() {
        let req = CreateSponsorRequest {
            first_name: Some("   ".to_string()),
            ..full_sponsor_request()
        };
        assert!(matches!(
            validate_new_sponsor(req),
            Err(ValidationError::MissingFields { .. })
        ));
    }

    #[test]
    fn test_validate_new_sponsor_allows_empty_contact() {
        let req = CreateSponsorRequest {
            phone_number: Some(String::new()),
            email: Some(String::new()),
            ..full_sponsor_request()
        };
        let sponsor = validate_new_sponsor(req).unwrap();
        assert_eq!(sponsor.phone_number, "");
        assert_eq!(sponsor.email, "");
    }

    #[test]
    fn test_blank_sponsorship_type_becomes_default() {
        let req = CreateSponsorRequest {
            sponsorship_type: Some(String::new()),
            ..full_sponsor_request()
        };
        assert_eq!(validate_new_sponsor(req).unwrap().sponsorship_type, None);
    }

    #[test]
    fn test_validate_sponsor_patch_length() {
        let patch = SponsorPatch {
            last_name: Some("x".repeat(MAX_NAME_LENGTH + 1)),
            ..Default::default()
        };
        assert!(matches!(
            validate_sponsor_patch(&patch),
            Err(ValidationError::TooLong { .. })
        ));
        assert!(validate_sponsor_patch(&SponsorPatch::default()).is_ok());
    }

    #[test]
    fn test_validate_new_kid() {
        let req = CreateKidRequest {
            name: Some("Malachi".to_string()),
            birthday: Some("2014-06-01".to_string()),
            gender: Some(String::new()),
            image: None,
            sponsor_ids: None,
        };
        let kid = validate_new_kid(req).unwrap();
        assert_eq!(kid.name, "Malachi");
        assert_eq!(kid.birthday, NaiveDate::from_ymd_opt(2014, 6, 1));
        assert_eq!(kid.gender, None);
    }

    #[test]
    fn test_validate_new_kid_requires_name() {
        let err = validate_new_kid(CreateKidRequest::default()).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field: name");
    }

    #[test]
    fn test_validate_kid_patch_birthday_states() {
        let cleared = validate_kid_patch(UpdateKidRequest {
            birthday: Some(None),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(cleared.birthday, Some(None));

        let untouched = validate_kid_patch(UpdateKidRequest {
            birthday: Some(Some(String::new())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(untouched.birthday, None);

        let set = validate_kid_patch(UpdateKidRequest {
            birthday: Some(Some("2016-01-31".to_string())),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(set.birthday, Some(NaiveDate::from_ymd_opt(2016, 1, 31)));
    }

    #[test]
    fn test_parse_birthday_formats() {
        let expected = NaiveDate::from_ymd_opt(2015, 4, 2).unwrap();
        assert_eq!(parse_birthday("2015-04-02").unwrap(), expected);
        assert_eq!(parse_birthday("2015-04-02T00:00:00Z").unwrap(), expected);
        assert_eq!(parse_birthday("2015-04-02T10:30:00.000").unwrap(), expected);
        assert!(parse_birthday("04/02/2015").is_err());
    }
}
