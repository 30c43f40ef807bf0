//! File identifiers.
//!
//! An identifier is a 128-bit value rendered as 32 lowercase hex characters.
//! It is derived from the filename and the clock, so it is unique but
//! guessable; never use it as an access token.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use ring::digest;

use super::validator::base_name;

pub const ID_LEN: usize = 32;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Derive a new identifier for an upload named `filename`.
pub fn generate(filename: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    // Breaks ties between calls that read the same clock value
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);

    let input = format!("{}-{nanos}-{seq}", base_name(filename));
    let hash = digest::digest(&digest::SHA256, input.as_bytes());
    hex::encode(&hash.as_ref()[..ID_LEN / 2])
}

/// True if `id` is exactly 32 hex digits, in either case.
pub fn is_valid_id(id: &str) -> bool {
    id.len() == ID_LEN && id.bytes().all(|b| b.is_ascii_hexdigit())
}
