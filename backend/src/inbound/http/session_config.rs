//! Session cookie configuration read from `SESSION_*` environment variables.
//!
//! Debug builds tolerate missing or malformed toggles and fall back to safe
//! defaults with a warning. Release builds refuse to start unless every
//! toggle is explicit and a long enough key file is present.

use std::path::PathBuf;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Key, SameSite, time::Duration};
use tracing::{info, warn};
use zeroize::Zeroize;

pub mod fingerprint;
mod parsing;

use parsing::{BoolToggle, debug_warn_or_error, parse_bool_toggle, parse_same_site};

pub const KEY_FILE_ENV: &str = "SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "SESSION_ALLOW_EPHEMERAL";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/session_key";
/// Minimum key file length accepted by release builds.
pub const SESSION_KEY_MIN_LEN: usize = 64;
/// Name of the session cookie issued by the server.
pub const SESSION_COOKIE_NAME: &str = "visa_session";
const SESSION_TTL_HOURS: i64 = 12;

/// Source of session environment variables.
#[cfg_attr(test, mockall::automock)]
pub trait SessionEnv {
    /// Value of `name`, or `None` when unset.
    fn string(&self, name: &str) -> Option<String>;
}

/// Reads the real process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl SessionEnv for ProcessEnv {
    fn string(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Defaults and warnings for missing toggles.
    Debug,
    /// Explicit, valid toggles required.
    Release,
}

impl BuildMode {
    /// Mode matching `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use visa_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    pub(crate) fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    #[error("SESSION_SAMESITE=None requires SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Where the signing key came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    File(PathBuf),
    Ephemeral,
}

/// Validated session cookie settings.
#[derive(Clone)]
pub struct SessionSettings {
    pub key: Key,
    pub key_source: KeySource,
    pub cookie_secure: bool,
    pub same_site: SameSite,
}

impl SessionSettings {
    /// Short fingerprint of the signing key, safe to log.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        fingerprint::key_fingerprint(&self.key)
    }

    /// Log which key is active without revealing it.
    pub fn log_summary(&self) {
        let source = match &self.key_source {
            KeySource::File(path) => path.display().to_string(),
            KeySource::Ephemeral => "ephemeral".to_owned(),
        };
        info!(
            fingerprint = %self.fingerprint(),
            key_source = %source,
            cookie_secure = self.cookie_secure,
            same_site = ?self.same_site,
            "session cookie configured"
        );
    }

    /// Encrypted cookie-session middleware carrying the verified identity.
    #[must_use]
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(
                PersistentSession::default().session_ttl(Duration::hours(SESSION_TTL_HOURS)),
            )
            .build()
    }
}

/// Build session settings from the environment.
///
/// # Examples
///
/// ```rust
/// use visa_backend::inbound::http::session_config::{
///     BuildMode, SessionEnv, session_settings_from_env,
/// };
///
/// struct Toggles(String);
///
/// impl SessionEnv for Toggles {
///     fn string(&self, name: &str) -> Option<String> {
///         match name {
///             "SESSION_KEY_FILE" => Some(self.0.clone()),
///             "SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///             "SESSION_SAMESITE" => Some("Strict".to_owned()),
///             "SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
///             _ => None,
///         }
///     }
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("visa_session_key_doc");
/// std::fs::write(&key_path, vec![b'k'; 64])?;
///
/// let env = Toggles(key_path.display().to_string());
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
///
/// std::fs::remove_file(&key_path)?;
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = parse_bool_toggle(env, mode, BoolToggle::new(COOKIE_SECURE_ENV, true))?;
    let same_site = same_site_from_env(env, mode, cookie_secure)?;
    let allow_ephemeral =
        parse_bool_toggle(env, mode, BoolToggle::new(ALLOW_EPHEMERAL_ENV, false))?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let (key, key_source) = session_key_from_env(env, mode, allow_ephemeral)?;

    Ok(SessionSettings {
        key,
        key_source,
        cookie_secure,
        same_site,
    })
}

fn same_site_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let fallback = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    match env.string(SAMESITE_ENV) {
        Some(value) => parse_same_site(value, mode, cookie_secure, fallback),
        None => debug_warn_or_error(
            mode,
            fallback,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("{SAMESITE_ENV} not set; using {fallback:?}"),
        ),
    }
}

fn session_key_from_env<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<(Key, KeySource), SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if !mode.is_debug() && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok((key, KeySource::File(path)))
        }
        Err(source) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %source,
                "using an ephemeral session key; sessions end on restart"
            );
            Ok((Key::generate(), KeySource::Ephemeral))
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}
