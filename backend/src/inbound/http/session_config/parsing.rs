//! Toggle parsing shared by the session settings loader.

use actix_web::cookie::SameSite;
use tracing::warn;

use super::{BuildMode, SAMESITE_ENV, SessionConfigError, SessionEnv};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";

/// A boolean toggle and the value debug builds fall back to.
pub(super) struct BoolToggle {
    name: &'static str,
    fallback: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, fallback: bool) -> Self {
        Self { name, fallback }
    }
}

/// Debug builds log and use `fallback`; release builds return `error`.
pub(super) fn debug_warn_or_error<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    warn_fn: impl FnOnce(),
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        warn_fn();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_bool_toggle<E: SessionEnv>(
    env: &E,
    mode: BuildMode,
    toggle: BoolToggle,
) -> Result<bool, SessionConfigError> {
    let BoolToggle { name, fallback } = toggle;
    let Some(value) = env.string(name) else {
        return debug_warn_or_error(mode, fallback, SessionConfigError::MissingEnv { name }, || {
            warn!("{name} not set; defaulting to {fallback}");
        });
    };
    match parse_bool(&value) {
        Some(flag) => Ok(flag),
        None => debug_warn_or_error(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name,
                value: value.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, "invalid {name}; defaulting to {fallback}"),
        ),
    }
}

pub(super) fn parse_same_site(
    value: String,
    mode: BuildMode,
    cookie_secure: bool,
    fallback: SameSite,
) -> Result<SameSite, SessionConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => debug_warn_or_error(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SameSite=None without a Secure cookie; browsers may drop the session"),
        ),
        _ => debug_warn_or_error(
            mode,
            fallback,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid {SAMESITE_ENV}; using {fallback:?}"),
        ),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
