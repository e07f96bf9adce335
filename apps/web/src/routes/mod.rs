//! HTTP handlers, one module per resource.

pub mod health;
pub mod kids;
pub mod links;
pub mod media;
pub mod sponsors;
pub mod updates;
