//! Session cookie configuration.
//!
//! Settings come from the process environment through [`mockable::Env`] so
//! they can be exercised without touching real variables:
//!
//! - `SESSION_KEY_FILE`: key material, default `/var/run/secrets/session_key`.
//! - `SESSION_COOKIE_SECURE`: mark the cookie `Secure`, default on.
//! - `SESSION_ALLOW_EPHEMERAL`: fall back to a random key when the file is
//!   unreadable; default on in debug builds, refused in release builds.

use std::path::PathBuf;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use sha2::{Digest, Sha256};
use tracing::warn;
use zeroize::Zeroize;

const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";
const DEFAULT_KEY_PATH: &str = "/var/run/secrets/session_key";
const KEY_MIN_LEN: usize = 64;
const SESSION_TTL_HOURS: i64 = 2;
const FINGERPRINT_BYTES: usize = 8;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Build mode deciding how strictly toggles are validated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Malformed toggles fall back to their defaults with a warning.
    Debug,
    /// Malformed toggles, short keys, and ephemeral keys are errors.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }
}

/// Validated session settings.
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether the cookie carries the `Secure` attribute.
    pub cookie_secure: bool,
}

/// Session configuration failures.
#[derive(Debug, thiserror::Error)]
pub enum SessionConfigError {
    /// A toggle holds something other than a boolean.
    #[error("invalid value for {name}='{value}'; expected 1|0|true|false|yes|no")]
    InvalidFlag {
        /// Variable name.
        name: &'static str,
        /// Rejected value.
        value: String,
    },
    /// The key file could not be read and ephemeral keys are off.
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        /// Key file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// The key file holds too little material for a release build.
    #[error("session key at {path} too short: need >= {KEY_MIN_LEN} bytes, got {length}")]
    KeyTooShort {
        /// Key file path.
        path: PathBuf,
        /// Bytes found.
        length: usize,
    },
    /// Release builds refuse random per-process keys.
    #[error("SESSION_ALLOW_EPHEMERAL must be off in release builds")]
    EphemeralNotAllowed,
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}

fn flag<E: Env>(
    env: &E,
    name: &'static str,
    default: bool,
    mode: BuildMode,
) -> Result<bool, SessionConfigError> {
    let Some(value) = env.string(name) else {
        return Ok(default);
    };
    match (parse_bool(&value), mode) {
        (Some(parsed), _) => Ok(parsed),
        (None, BuildMode::Debug) => {
            warn!(variable = name, value = %value, default, "ignoring malformed session toggle");
            Ok(default)
        }
        (None, BuildMode::Release) => Err(SessionConfigError::InvalidFlag { name, value }),
    }
}

fn load_key(path: PathBuf, mode: BuildMode, allow_ephemeral: bool) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort { path, length });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(source) if allow_ephemeral => {
            warn!(path = %path.display(), error = %source, "using an ephemeral session key");
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

/// Read session settings from the environment.
///
/// # Errors
/// See [`SessionConfigError`].
///
/// # Examples
/// ```rust
/// use mockable::MockEnv;
/// use network_backend::inbound::http::session_config::{
///     BuildMode, session_settings_from_env,
/// };
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "SESSION_KEY_FILE" => Some("/nonexistent/session_key".to_owned()),
///     "SESSION_COOKIE_SECURE" => Some("0".to_owned()),
///     _ => None,
/// });
/// let settings = session_settings_from_env(&env, BuildMode::Debug).expect("debug falls back");
/// assert!(!settings.cookie_secure);
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, COOKIE_SECURE_ENV, true, mode)?;
    let allow_ephemeral = flag(env, ALLOW_EPHEMERAL_ENV, mode == BuildMode::Debug, mode)?;
    if allow_ephemeral && mode == BuildMode::Release {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| DEFAULT_KEY_PATH.to_owned()),
    );
    let key = load_key(path, mode, allow_ephemeral)?;
    Ok(SessionSettings { key, cookie_secure })
}

/// Truncated SHA-256 of the signing key, safe to log.
///
/// Operators compare it across replicas to confirm they share one key.
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}

/// Private cookie session middleware with a two hour lifetime.
#[must_use]
pub fn session_middleware(settings: &SessionSettings) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), settings.key.clone())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .cookie_secure(settings.cookie_secure)
        .session_lifecycle(PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)))
        .build()
}
