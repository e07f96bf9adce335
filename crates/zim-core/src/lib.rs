//! # zim-core: Pure Domain Logic for the Zim backend
//!
//! This crate holds the domain model shared by the database layer and the
//! HTTP API. Everything here is pure: no database, no network.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Zim Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Admin UI / public site (Svelte)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    zim-web (axum routes)                        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ zim-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ validation│  │  updates  │  │   media   │  │   │
//! │  │   │  Sponsor  │  │  required │  │   Block   │  │  signing  │  │   │
//! │  │   │    Kid    │  │  fields   │  │ UpdatePost│  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    zim-db (Database Layer)                      │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Sponsor, Kid, join rows and read views
//! - [`validation`] - Request validation (required fields, birthdays)
//! - [`id`] - Record identifier generation
//! - [`updates`] - CMS post and layout block model
//! - [`media`] - Signed upload parameters for the image host
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod id;
pub mod media;
pub mod types;
pub mod updates;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, ValidationError};
pub use id::generate_id;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sponsorship type stored when a sponsor is created without one.
pub const DEFAULT_SPONSORSHIP_TYPE: &str = "individual";

/// Maximum length of a person's name field.
pub const MAX_NAME_LENGTH: usize = 200;
