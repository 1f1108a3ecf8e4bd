//! GitHub App authentication.
//!
//! The token-creation endpoint only accepts an App JWT: an RS256 token signed
//! with the App's private key, issued by the App id, and valid for at most ten
//! minutes. The private key stays inside the signer; only the short-lived JWT
//! ever reaches the HTTP layer.

use std::fmt;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::github::error::BrokerError;

/// Seconds subtracted from `iat` to tolerate clock drift with GitHub.
const CLOCK_DRIFT_SECONDS: i64 = 60;

/// Lifetime of an App JWT. GitHub rejects anything above ten minutes.
const APP_JWT_TTL_SECONDS: i64 = 600;

/// Signs App JWTs for the token-creation endpoint.
#[cfg_attr(test, mockall::automock)]
pub trait AppTokenSigner: Send + Sync {
    /// Returns a JWT valid from shortly before `now_unix` for ten minutes.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the JWT cannot be encoded.
    fn sign_app_jwt(&self, now_unix: i64) -> Result<String, BrokerError>;
}

#[derive(Debug, Serialize, Deserialize)]
struct AppJwtClaims {
    iat: i64,
    exp: i64,
    iss: String,
}

/// Signer backed by the App's RSA private key.
pub struct RsaAppTokenSigner {
    app_id: String,
    key: EncodingKey,
}

impl RsaAppTokenSigner {
    /// Builds a signer from a PEM-encoded RSA private key.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the App id is blank or the
    /// PEM cannot be parsed as an RSA key.
    pub fn from_pem(app_id: impl Into<String>, pem: &[u8]) -> Result<Self, BrokerError> {
        let issuer: String = app_id.into();
        if issuer.trim().is_empty() {
            return Err(BrokerError::Configuration {
                message: "GitHub App id is required".to_owned(),
            });
        }

        let key = EncodingKey::from_rsa_pem(pem).map_err(|error| BrokerError::Configuration {
            message: format!("invalid GitHub App private key: {error}"),
        })?;

        Ok(Self {
            app_id: issuer,
            key,
        })
    }

    /// Reads the PEM key from `path` and builds a signer.
    ///
    /// # Errors
    ///
    /// Returns [`BrokerError::Configuration`] when the key file cannot be read
    /// or does not hold an RSA private key.
    pub fn from_pem_file(app_id: impl Into<String>, path: &Utf8Path) -> Result<Self, BrokerError> {
        let pem = read_key_file(path)?;
        Self::from_pem(app_id, &pem)
    }

    /// The App id used as the JWT issuer.
    #[must_use]
    pub const fn app_id(&self) -> &str {
        self.app_id.as_str()
    }
}

impl fmt::Debug for RsaAppTokenSigner {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RsaAppTokenSigner")
            .field("app_id", &self.app_id)
            .field("key", &"<redacted>")
            .finish()
    }
}

impl AppTokenSigner for RsaAppTokenSigner {
    fn sign_app_jwt(&self, now_unix: i64) -> Result<String, BrokerError> {
        let claims = AppJwtClaims {
            iat: now_unix.saturating_sub(CLOCK_DRIFT_SECONDS),
            exp: now_unix.saturating_add(APP_JWT_TTL_SECONDS),
            iss: self.app_id.clone(),
        };

        encode(&Header::new(Algorithm::RS256), &claims, &self.key).map_err(|error| {
            BrokerError::Configuration {
                message: format!("failed to encode App JWT: {error}"),
            }
        })
    }
}

fn read_key_file(path: &Utf8Path) -> Result<Vec<u8>, BrokerError> {
    let unreadable = |detail: String| BrokerError::Configuration {
        message: format!("failed to read GitHub App private key '{path}': {detail}"),
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| unreadable("no file name".to_owned()))?;
    let parent = path
        .parent()
        .filter(|dir_path| !dir_path.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));

    let dir = Dir::open_ambient_dir(parent, ambient_authority())
        .map_err(|error| unreadable(error.to_string()))?;
    dir.read(file_name)
        .map_err(|error| unreadable(error.to_string()))
}
