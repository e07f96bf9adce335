//! # zim-db: Database Layer for the Zim backend
//!
//! This crate provides database access for sponsors, kids and the links
//! between them. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Zim Data Flow                                  │
//! │                                                                         │
//! │  HTTP handler (PUT /api/sponsors/{id})                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     zim-db (THIS CRATE)                         │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ SponsorRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ KidRepo       │    │ 001_init.sql │  │   │
//! │  │   │ Connection    │    │ LinkRepo      │    │              │  │   │
//! │  │   │ Management    │    │ SessionRepo   │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (zim.db)                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (sponsor, kid, link, session)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use zim_db::{Database, DbConfig};
//! use zim_core::NewSponsor;
//!
//! let db = Database::new(DbConfig::new("./zim.db")).await?;
//!
//! let sponsor = db
//!     .sponsors()
//!     .create(NewSponsor::new("Mike", "Daugherty", "303-908-5059", "mike@msdweb.pro"))
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::kid::KidRepository;
pub use repository::link::LinkRepository;
pub use repository::session::{ActiveSession, Session, SessionRepository, User};
pub use repository::sponsor::SponsorRepository;
