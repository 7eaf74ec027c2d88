//! Opaque 24-hex-character document identifiers.
//!
//! Identifiers keep the object-id shape existing clients already store:
//! 4 bytes of creation seconds, 5 bytes of per-process entropy and a 3-byte
//! counter, rendered as lowercase hex.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use mockable::Clock;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Number of hex characters in an identifier.
pub const OBJECT_ID_LEN: usize = 24;

const PROCESS_TAG_MASK: u64 = 0xff_ffff_ffff;
const COUNTER_MASK: u32 = 0x00ff_ffff;

/// Validation errors for identifier text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ObjectIdError {
    #[error("identifier must be {expected} hex characters, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
    #[error("identifier must only contain hex characters")]
    InvalidCharacters,
}

/// Validated identifier text, normalised to lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse identifier text.
    ///
    /// # Examples
    /// ```
    /// use visa_backend::domain::ObjectId;
    ///
    /// let id = ObjectId::parse("65A1F0C2E4B0A1B2C3D4E5F6").expect("valid id");
    /// assert_eq!(id.as_str(), "65a1f0c2e4b0a1b2c3d4e5f6");
    /// assert!(ObjectId::parse("not-an-id").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ObjectIdError> {
        let actual = raw.chars().count();
        if actual != OBJECT_ID_LEN {
            return Err(ObjectIdError::InvalidLength {
                expected: OBJECT_ID_LEN,
                actual,
            });
        }
        if !raw.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ObjectIdError::InvalidCharacters);
        }
        Ok(Self(raw.to_ascii_lowercase()))
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

macro_rules! define_document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(ObjectId);

        impl $name {
            /// Parse identifier text.
            pub fn parse(raw: &str) -> Result<Self, ObjectIdError> {
                ObjectId::parse(raw).map(Self)
            }

            /// Borrow the identifier text.
            #[must_use]
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }
        }

        impl From<ObjectId> for $name {
            fn from(value: ObjectId) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0 .0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ObjectIdError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

define_document_id! {
    /// Identifier of a visa listing.
    ListingId
}

define_document_id! {
    /// Identifier of a visa application.
    ApplicationId
}

/// Thread-safe identifier source shared by the in-process stores.
pub struct ObjectIdGenerator {
    clock: Arc<dyn Clock>,
    process_tag: u64,
    counter: AtomicU32,
}

impl ObjectIdGenerator {
    /// Create a generator seeded with fresh process entropy.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        let mut rng = rand::thread_rng();
        Self {
            clock,
            process_tag: rng.r#gen::<u64>() & PROCESS_TAG_MASK,
            counter: AtomicU32::new(rng.r#gen::<u32>() & COUNTER_MASK),
        }
    }

    /// Produce the next identifier.
    pub fn next_id(&self) -> ObjectId {
        let seconds = self.clock.utc().timestamp().max(0);
        let seconds = u32::try_from(seconds).unwrap_or(u32::MAX);
        let count = self.counter.fetch_add(1, Ordering::Relaxed) & COUNTER_MASK;
        ObjectId(format!(
            "{seconds:08x}{tag:010x}{count:06x}",
            tag = self.process_tag
        ))
    }
}

impl fmt::Debug for ObjectIdGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectIdGenerator")
            .field("process_tag", &self.process_tag)
            .finish_non_exhaustive()
    }
}
