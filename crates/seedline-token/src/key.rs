//! EC P-256 signing key loaded from a private JWK.
//!
//! The JWK fields are kept as-is (kid, use, key_ops, ...) so a key exported
//! by the auth provider can be dropped in unchanged. `jsonwebtoken` wants
//! PKCS#8 DER for ES256; `p256` does the JWK → PKCS#8 conversion and checks
//! that `d` matches the public point.

use std::path::{Path, PathBuf};

use jsonwebtoken::{DecodingKey, EncodingKey};
use p256::pkcs8::EncodePrivateKey;
use serde::{Deserialize, Serialize};

/// Environment variable holding an inline private JWK
pub const SIGNING_JWK_ENV: &str = "SEEDLINE_SIGNING_JWK";

/// Errors from loading a signing key
#[derive(Debug)]
pub enum KeyError {
    /// No key configured anywhere
    Missing,
    Io(PathBuf, std::io::Error),
    Json(serde_json::Error),
    /// Key type, curve or algorithm other than EC / P-256 / ES256
    UnsupportedKey(String),
    /// Key material is not a valid P-256 key pair
    Encoding(String),
}

impl std::fmt::Display for KeyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(
                f,
                "no signing key configured (use --key-file, [token].key_file, or {SIGNING_JWK_ENV})"
            ),
            Self::Io(path, e) => write!(f, "cannot read {}: {e}", path.display()),
            Self::Json(e) => write!(f, "invalid JWK JSON: {e}"),
            Self::UnsupportedKey(what) => write!(f, "unsupported key: {what}"),
            Self::Encoding(reason) => write!(f, "invalid key material: {reason}"),
        }
    }
}

impl std::error::Error for KeyError {}

/// Private EC JWK as exported by WebCrypto / the auth provider.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct PrivateJwk {
    pub kty: String,
    pub kid: String,
    #[serde(rename = "use", default, skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_ops: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    pub d: String,
    pub crv: String,
    pub x: String,
    pub y: String,
}

// `d` stays out of logs
impl std::fmt::Debug for PrivateJwk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrivateJwk")
            .field("kty", &self.kty)
            .field("kid", &self.kid)
            .field("alg", &self.alg)
            .field("crv", &self.crv)
            .finish_non_exhaustive()
    }
}

impl PrivateJwk {
    pub fn from_json(json: &str) -> Result<Self, KeyError> {
        serde_json::from_str(json).map_err(KeyError::Json)
    }

    /// PKCS#8 DER encoding of this key.
    pub fn to_pkcs8_der(&self) -> Result<Vec<u8>, KeyError> {
        if self.kty != "EC" {
            return Err(KeyError::UnsupportedKey(format!("kty {}", self.kty)));
        }
        if self.crv != "P-256" {
            return Err(KeyError::UnsupportedKey(format!("crv {}", self.crv)));
        }
        if let Some(alg) = self.alg.as_deref().filter(|a| *a != "ES256") {
            return Err(KeyError::UnsupportedKey(format!("alg {alg}")));
        }

        // Key material only
        let material = serde_json::json!({
            "kty": self.kty,
            "crv": self.crv,
            "x": self.x.trim_end_matches('='),
            "y": self.y.trim_end_matches('='),
            "d": self.d.trim_end_matches('='),
        });
        let secret = p256::SecretKey::from_jwk_str(&material.to_string())
            .map_err(|e| KeyError::Encoding(e.to_string()))?;
        let der = secret
            .to_pkcs8_der()
            .map_err(|e| KeyError::Encoding(e.to_string()))?;
        Ok(der.as_bytes().to_vec())
    }
}

/// Where to read the private JWK from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    File(PathBuf),
    Inline(String),
}

impl KeySource {
    /// First configured source: explicit path, then config path, then env.
    pub fn resolve(flag: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self, KeyError> {
        if let Some(path) = flag.or(config) {
            return Ok(Self::File(path));
        }
        match std::env::var(SIGNING_JWK_ENV) {
            Ok(json) if !json.trim().is_empty() => Ok(Self::Inline(json)),
            _ => Err(KeyError::Missing),
        }
    }

    pub fn load(&self) -> Result<SigningKey, KeyError> {
        let jwk = match self {
            Self::File(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| KeyError::Io(path.clone(), e))?;
                log::debug!("Loaded signing key from {}", path.display());
                PrivateJwk::from_json(&json)?
            }
            Self::Inline(json) => {
                log::debug!("Loaded signing key from {SIGNING_JWK_ENV}");
                PrivateJwk::from_json(json)?
            }
        };
        SigningKey::from_jwk(&jwk)
    }
}

/// A ready-to-use ES256 signing key.
#[derive(Clone)]
pub struct SigningKey {
    kid: String,
    x: String,
    y: String,
    encoding: EncodingKey,
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningKey")
            .field("kid", &self.kid)
            .finish_non_exhaustive()
    }
}

impl SigningKey {
    pub fn from_jwk(jwk: &PrivateJwk) -> Result<Self, KeyError> {
        let der = jwk.to_pkcs8_der()?;
        Ok(Self {
            kid: jwk.kid.clone(),
            x: jwk.x.clone(),
            y: jwk.y.clone(),
            encoding: EncodingKey::from_ec_der(&der),
        })
    }

    pub fn from_file(path: &Path) -> Result<Self, KeyError> {
        KeySource::File(path.to_path_buf()).load()
    }

    pub fn kid(&self) -> &str {
        &self.kid
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    /// Public half, for verifying tokens this key signed.
    pub fn decoding_key(&self) -> Result<DecodingKey, jsonwebtoken::errors::Error> {
        DecodingKey::from_ec_components(&self.x, &self.y)
    }
}
