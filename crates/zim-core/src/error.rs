//! # Error Types
//!
//! Domain-specific error types for zim-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  zim-core errors (this file)                                           │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  zim-db errors (separate crate)                                        │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  zim-web errors (in app)                                               │
//! │  └── ApiError         - What the client sees (JSON + status)           │
//! │                                                                         │
//! │  Flow: ValidationError → ApiError(400), DbError → ApiError(500)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Sponsor cannot be found.
    #[error("Sponsor not found: {0}")]
    SponsorNotFound(String),

    /// Kid cannot be found.
    #[error("Kid not found: {0}")]
    KidNotFound(String),

    /// Upload signing was requested without credentials.
    #[error("Media signing is not configured")]
    MediaNotConfigured,

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any store access so a bad request never touches the
/// database.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("Missing required field: {field}")]
    Required { field: String },

    /// Several required fields are missing at once.
    ///
    /// The message lists every required field, not just the missing ones,
    /// so clients get one stable string per endpoint.
    #[error("Missing required fields: {}", fields.join(", "))]
    MissingFields { fields: Vec<String> },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., unparseable birthday).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
