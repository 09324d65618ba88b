//! Purchase cancellation keys.
//!
//! Every checkout gets one random 64-character hex key shared by all of its
//! purchase rows. The key doubles as the secret in the cancellation link, so
//! it comes from the operating system RNG.

use crate::{
    entities::{Purchase, purchase},
    errors::Result,
};
use rand::{RngCore, rngs::OsRng};
use sea_orm::{ConnectionTrait, DbErr, prelude::*};
use std::fmt::Write;
use tracing::{debug, warn};

/// Number of random bytes in a key.
pub const KEY_BYTES: usize = 32;

/// Length of the hex-encoded key.
pub const KEY_LENGTH: usize = KEY_BYTES * 2;

/// Produces a fresh random key without consulting the database.
#[must_use]
pub fn random_key() -> String {
    let mut bytes = [0_u8; KEY_BYTES];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .fold(String::with_capacity(KEY_LENGTH), |mut key, byte| {
            let _ = write!(key, "{byte:02x}");
            key
        })
}

/// Whether `key` has the shape of a cancellation key.
#[must_use]
pub fn is_well_formed(key: &str) -> bool {
    key.len() == KEY_LENGTH
        && key
            .bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Generates a key that no stored purchase uses yet.
///
/// When the existence check cannot reach the database the freshly generated
/// key is returned unchecked.
///
/// # Errors
/// Returns an error for storage failures other than an unreachable database.
pub async fn generate_key<C>(db: &C) -> Result<String>
where
    C: ConnectionTrait,
{
    loop {
        let key = random_key();

        match Purchase::find()
            .filter(purchase::Column::Key.eq(key.as_str()))
            .one(db)
            .await
        {
            Ok(None) => return Ok(key),
            Ok(Some(_)) => debug!("Purchase key collision, generating another key"),
            Err(e) if is_transient(&e) => {
                warn!("Skipping purchase key uniqueness check: {e}");
                return Ok(key);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

const fn is_transient(error: &DbErr) -> bool {
    matches!(error, DbErr::Conn(_) | DbErr::ConnectionAcquire(_))
}
