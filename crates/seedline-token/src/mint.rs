//! ES256 signing and verification

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, Header, TokenData, Validation};

use crate::claims::{Claims, TokenOptions};
use crate::key::SigningKey;

/// Sign a token for `subject`, valid from `now` for `opts.ttl`.
pub fn mint(
    subject: &str,
    key: &SigningKey,
    opts: &TokenOptions,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims::new(subject, opts, now);
    let mut header = Header::new(Algorithm::ES256);
    header.kid = Some(key.kid().to_string());
    log::debug!(
        "Signing token for sub={} kid={} exp={}",
        claims.sub,
        key.kid(),
        claims.exp
    );
    jsonwebtoken::encode(&header, &claims, key.encoding_key())
}

/// Check signature, expiry and audience of a token minted by `key`.
pub fn verify(
    token: &str,
    key: &SigningKey,
    audience: &str,
) -> Result<TokenData<Claims>, jsonwebtoken::errors::Error> {
    let mut validation = Validation::new(Algorithm::ES256);
    validation.set_audience(&[audience]);
    validation.set_required_spec_claims(&["exp", "aud", "sub"]);
    jsonwebtoken::decode(token, &key.decoding_key()?, &validation)
}
