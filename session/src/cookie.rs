//! Session cookie codec.
//!
//! The cookie value is opaque to everything outside this crate. It is
//! encrypted and authenticated with AES-256-GCM so a client can neither
//! read nor forge a session identifier.
//!
//! # Format
//!
//! ```text
//! base64url( nonce (12) || AES-256-GCM( session uuid (16) || issued_at (8, BE secs) ) )
//! ```
//!
//! The cookie name is bound as associated data, so a token minted for one
//! cookie does not decrypt under another name.

use crate::constants::SESSION_COOKIE_NAME;
use crate::error::{Result, SessionError};
use crate::state::SessionId;
use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng, Payload},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use http::header::{COOKIE, SET_COOKIE};
use http::{HeaderMap, HeaderValue};
use std::fmt;
use std::sync::Arc;

const NONCE_LEN: usize = 12;
const PLAINTEXT_LEN: usize = 16 + 8;

/// Encrypts session identifiers into cookie values and back.
#[derive(Clone)]
pub struct SessionCookieCodec {
    /// Shared across clones; every encryption draws a fresh nonce.
    cipher: Arc<Aes256Gcm>,
    max_age: Duration,
}

impl fmt::Debug for SessionCookieCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookieCodec")
            .field("max_age", &self.max_age)
            .finish_non_exhaustive()
    }
}

impl SessionCookieCodec {
    /// Create a codec from a 32-byte AES-256 key.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Configuration`] if the key is not 32 bytes
    /// or `max_age` is not positive.
    pub fn new(key: &[u8], max_age: Duration) -> Result<Self> {
        if key.len() != 32 {
            return Err(SessionError::Configuration(format!(
                "session key must be exactly 32 bytes, got {}",
                key.len()
            )));
        }
        if max_age <= Duration::zero() {
            return Err(SessionError::Configuration(
                "session max age must be positive".to_string(),
            ));
        }

        let cipher = Aes256Gcm::new_from_slice(key).map_err(|e| {
            SessionError::Configuration(format!("failed to initialize AES-256-GCM cipher: {e}"))
        })?;

        Ok(Self {
            cipher: Arc::new(cipher),
            max_age,
        })
    }

    /// Create a codec with a random key.
    ///
    /// Cookies issued by it are only readable by this process.
    #[must_use]
    pub fn ephemeral(max_age: Duration) -> Self {
        let key = Aes256Gcm::generate_key(OsRng);
        Self {
            cipher: Arc::new(Aes256Gcm::new(&key)),
            max_age: if max_age > Duration::zero() {
                max_age
            } else {
                Duration::seconds(crate::constants::DEFAULT_MAX_AGE_SECS)
            },
        }
    }

    /// Cookie lifetime, also used as the record TTL.
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Encode a session identifier issued at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Configuration`] if encryption fails.
    pub fn encode(&self, id: SessionId, now: DateTime<Utc>) -> Result<String> {
        let mut plaintext = Vec::with_capacity(PLAINTEXT_LEN);
        plaintext.extend_from_slice(id.0.as_bytes());
        plaintext.extend_from_slice(&now.timestamp().to_be_bytes());

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: SESSION_COOKIE_NAME.as_bytes(),
                },
            )
            .map_err(|e| SessionError::Configuration(format!("cookie encryption failed: {e}")))?;

        let mut token = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        token.extend_from_slice(&nonce);
        token.extend_from_slice(&ciphertext);

        Ok(URL_SAFE_NO_PAD.encode(token))
    }

    /// Decode a cookie value back into a session identifier.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MalformedCookie`] if the value is not valid
    /// base64, fails authentication, has the wrong length, or was issued
    /// more than `max_age` ago.
    pub fn decode(&self, value: &str, now: DateTime<Utc>) -> Result<SessionId> {
        let token = URL_SAFE_NO_PAD
            .decode(value.trim())
            .map_err(|e| SessionError::MalformedCookie(format!("invalid base64: {e}")))?;

        if token.len() <= NONCE_LEN {
            return Err(SessionError::MalformedCookie("token too short".to_string()));
        }
        let (nonce_bytes, ciphertext) = token.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher
            .decrypt(
                nonce,
                Payload {
                    msg: ciphertext,
                    aad: SESSION_COOKIE_NAME.as_bytes(),
                },
            )
            .map_err(|_| SessionError::MalformedCookie("authentication failed".to_string()))?;

        if plaintext.len() != PLAINTEXT_LEN {
            return Err(SessionError::MalformedCookie(format!(
                "unexpected payload length {}",
                plaintext.len()
            )));
        }
        let (id_bytes, issued_bytes) = plaintext.split_at(16);

        let id = uuid::Uuid::from_slice(id_bytes)
            .map_err(|e| SessionError::MalformedCookie(format!("invalid session id: {e}")))?;

        let mut issued = [0u8; 8];
        issued.copy_from_slice(issued_bytes);
        let issued_at = DateTime::from_timestamp(i64::from_be_bytes(issued), 0)
            .ok_or_else(|| SessionError::MalformedCookie("invalid issue time".to_string()))?;

        if now.signed_duration_since(issued_at) > self.max_age {
            return Err(SessionError::MalformedCookie("cookie expired".to_string()));
        }

        Ok(SessionId(id))
    }
}

/// Find a cookie's value among the request's `Cookie` headers.
///
/// Returns the first match; headers that are not valid ASCII are skipped.
#[must_use]
pub fn find_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// Append a `Set-Cookie` header for the session token.
///
/// # Errors
///
/// Returns [`SessionError::Configuration`] if the token contains
/// characters not allowed in a header value.
pub fn set_session_cookie(headers: &mut HeaderMap, token: &str, max_age: Duration) -> Result<()> {
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={token}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        max_age.num_seconds()
    );
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| SessionError::Configuration(format!("invalid cookie header: {e}")))?;
    headers.append(SET_COOKIE, value);
    Ok(())
}
