//! CLI command implementations.

pub mod migrate;
pub mod seed;

use secrecy::SecretString;

/// Load the database URL from `BRIGHTNEST_DATABASE_URL`, falling back to the
/// generic `DATABASE_URL`.
pub(crate) fn database_url() -> Option<SecretString> {
    std::env::var("BRIGHTNEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .ok()
}
