//! # Repository Module
//!
//! Database repository implementations for the Zim backend.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Layout                                    │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.sponsors().update(id, patch)                               │
//! │       ▼                                                                 │
//! │  SponsorRepository / KidRepository                                     │
//! │  ├── create(new)          ─┐                                           │
//! │  ├── get_by_id(id)         │                                           │
//! │  ├── get_all()             │  link rows written through                │
//! │  ├── update(id, patch)     ├─ link::attach / link::replace             │
//! │  └── delete(id)           ─┘  inside the caller's transaction          │
//! │                                                                         │
//! │  LinkRepository                                                        │
//! │  ├── add_link / remove_link   (explicit single-pair operations)        │
//! │  └── exists / count                                                    │
//! │                                                                         │
//! │  SessionRepository                                                     │
//! │  └── find_active(token)       (read-only, tables owned by auth)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Queries use the runtime `sqlx::query_as` API with `FromRow` types, and
//! `QueryBuilder` where the column list depends on the input.
//!
//! ## Available Repositories
//!
//! - [`SponsorRepository`](sponsor::SponsorRepository) - Sponsor CRUD with kids
//! - [`KidRepository`](kid::KidRepository) - Kid CRUD with sponsors
//! - [`LinkRepository`](link::LinkRepository) - Sponsor-kid pairs
//! - [`SessionRepository`](session::SessionRepository) - Session lookup

pub mod kid;
pub mod link;
pub mod session;
pub mod sponsor;

/// Column list for `SELECT`s that decode into [`zim_core::Sponsor`].
pub(crate) const SPONSOR_COLUMNS: &str =
    "s.id, s.firstName, s.lastName, s.phoneNumber, s.email, s.sponsorshipType, s.createdAt, s.updatedAt";

/// Column list for `SELECT`s that decode into [`zim_core::Kid`].
pub(crate) const KID_COLUMNS: &str =
    "k.id, k.name, k.birthday, k.gender, k.image, k.createdAt, k.updatedAt";
