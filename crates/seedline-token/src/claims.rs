//! Access-token claim set

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

pub const DEFAULT_AUDIENCE: &str = "authenticated";
pub const DEFAULT_ROLE: &str = "authenticated";
pub const DEFAULT_EMAIL: &str = "user@example.com";
pub const DEFAULT_TTL_MINUTES: i64 = 15;

/// JWT payload as expected by the API gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub aud: String,
    pub role: String,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
    pub app_metadata: Value,
}

/// Everything in the payload except the subject and clock.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenOptions {
    pub audience: String,
    pub role: String,
    pub email: String,
    pub ttl: Duration,
    pub app_metadata: Value,
}

impl Default for TokenOptions {
    fn default() -> Self {
        Self {
            audience: DEFAULT_AUDIENCE.to_string(),
            role: DEFAULT_ROLE.to_string(),
            email: DEFAULT_EMAIL.to_string(),
            ttl: Duration::minutes(DEFAULT_TTL_MINUTES),
            app_metadata: json!({ "custom_claim": "some_value" }),
        }
    }
}

impl Claims {
    /// Claims for `subject` issued at `now` (truncated to whole seconds).
    pub fn new(subject: &str, opts: &TokenOptions, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            sub: subject.to_string(),
            aud: opts.audience.clone(),
            role: opts.role.clone(),
            email: opts.email.clone(),
            iat,
            exp: iat + opts.ttl.num_seconds(),
            app_metadata: opts.app_metadata.clone(),
        }
    }
}
