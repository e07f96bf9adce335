//! # Record Identifiers
//!
//! Ids look like `1718035200123-k3x9q0a`: the creation time in Unix
//! milliseconds, a dash, then 7 random base-36 characters.
//!
//! There is no collision check. Two ids minted in the same millisecond
//! collide only if their 7 random characters also match (1 in ~78 billion).

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Number of random characters after the timestamp.
pub const ID_RANDOM_LEN: usize = 7;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a new record identifier using the current time.
pub fn generate_id() -> String {
    generate_id_at(Utc::now())
}

/// Generates a record identifier for the given instant.
pub fn generate_id_at(now: DateTime<Utc>) -> String {
    format!("{}-{}", now.timestamp_millis(), random_base36(ID_RANDOM_LEN))
}

/// Draws `len` base-36 characters from the low bits of a v4 UUID.
fn random_base36(len: usize) -> String {
    let mut n = Uuid::new_v4().as_u128();
    let mut out = String::with_capacity(len);
    for _ in 0..len {
        out.push(BASE36[(n % 36) as usize] as char);
        n /= 36;
    }
    out
}
