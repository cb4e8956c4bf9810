//! Seedline Token - development access tokens
//!
//! Mints short-lived ES256 JWTs for a test user, signed with a private EC
//! JWK, for exercising authenticated API routes locally.

pub mod claims;
pub mod key;
pub mod mint;

// Re-exports
pub use claims::{Claims, TokenOptions};
pub use key::{KeyError, KeySource, PrivateJwk, SIGNING_JWK_ENV, SigningKey};
pub use mint::{mint, verify};

/// Line printed for pasting into an HTTP client
pub fn bearer_line(token: &str) -> String {
    format!("Authorization Bearer: {token}")
}
