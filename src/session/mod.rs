//! Signed session cookie
//!
//! The cookie carries the session token plus an HMAC-SHA256 signature:
//! `<token>.<base64url signature>`. New cookies are signed with the first
//! configured secret; any configured secret is accepted on the way in, so
//! secrets can be rotated by prepending a new one.

use anyhow::{anyhow, Context, Result};
use axum::http::{header, HeaderMap, HeaderValue};
use data_encoding::BASE64URL_NOPAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::SessionConfig;

type HmacSha256 = Hmac<Sha256>;

const SECONDS_PER_DAY: i64 = 24 * 60 * 60;

/// Signs, verifies and formats the session cookie
#[derive(Clone)]
pub struct SessionCookie {
    name: String,
    signing_key: HmacSha256,
    keys: Vec<HmacSha256>,
    secure: bool,
    max_age_seconds: i64,
}

impl std::fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("keys", &self.keys.len())
            .field("secure", &self.secure)
            .field("max_age_seconds", &self.max_age_seconds)
            .finish()
    }
}

impl SessionCookie {
    /// Build from configuration. Fails when no secret is configured.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        let keys = config
            .secrets
            .iter()
            .map(|secret| {
                HmacSha256::new_from_slice(secret.as_bytes())
                    .map_err(|e| anyhow!("Invalid session secret: {}", e))
            })
            .collect::<Result<Vec<_>>>()?;

        let signing_key = keys
            .first()
            .cloned()
            .context("SESSION_SECRET must be set")?;

        Ok(Self {
            name: config.cookie_name.clone(),
            signing_key,
            keys,
            secure: config.secure,
            max_age_seconds: config.max_age_days * SECONDS_PER_DAY,
        })
    }

    /// Cookie value for a session token
    pub fn sign(&self, token: &str) -> String {
        let mut mac = self.signing_key.clone();
        mac.update(token.as_bytes());
        let signature = mac.finalize().into_bytes();
        format!("{}.{}", token, BASE64URL_NOPAD.encode(&signature))
    }

    /// Session token from a cookie value, if the signature checks out
    pub fn verify(&self, value: &str) -> Option<String> {
        let (token, signature) = value.rsplit_once('.')?;
        if token.is_empty() {
            return None;
        }
        let signature = BASE64URL_NOPAD.decode(signature.as_bytes()).ok()?;

        self.keys
            .iter()
            .any(|key| {
                let mut mac = key.clone();
                mac.update(token.as_bytes());
                mac.verify_slice(&signature).is_ok()
            })
            .then(|| token.to_string())
    }

    /// Verified session token from the request's `Cookie` headers
    pub fn read(&self, headers: &HeaderMap) -> Option<String> {
        headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|cookies| cookies.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .filter(|(name, _)| *name == self.name)
            .find_map(|(_, value)| self.verify(value))
    }

    /// `Set-Cookie` value that stores a signed session token
    pub fn set_cookie(&self, token: &str) -> Result<HeaderValue> {
        self.header(&self.sign(token), self.max_age_seconds)
    }

    /// `Set-Cookie` value that removes the session cookie
    pub fn clear_cookie(&self) -> Result<HeaderValue> {
        self.header("", 0)
    }

    fn header(&self, value: &str, max_age: i64) -> Result<HeaderValue> {
        let mut cookie = format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.name, value, max_age
        );
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).context("Invalid session cookie header")
    }
}
