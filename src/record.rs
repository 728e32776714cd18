//! The error record: one immutable value per raised error.
//!
//! # Shape
//!
//! `ErrorRecord<C, K>` is generic over the variant's config payload `C` and
//! its classification marker `K` ([`Internal`] or [`User`]). Per-variant
//! payload typing survives all the way to the handler: a handler for
//! `InvalidArgument` sees `&ErrorRecord<InvalidArgumentArgs, User>`, not an
//! untyped bag of fields.
//!
//! # Immutability
//!
//! Fields are private. Records are produced by a
//! [`Declaration`](crate::Declaration) or by [`ErrorRecord::promote`], and
//! are only ever read afterwards. Promotion consumes its input and yields a
//! new value; nothing is mutated in place.
//!
//! # Wire shape
//!
//! ```text
//! { "type": "internal" | "user", "name", "code", "message",
//!   "userMessage" (user only), "recoverable", "config", "timestamp" }
//! ```
//!
//! `cause` is never serialized and decodes as `None`.
//!
//! Decoding always goes through the variant's
//! [`Declaration`](crate::Declaration::decode), which checks `type`, `name`
//! and `code` against what the variant declares. There is no free-standing
//! `Deserialize` for records, so a payload cannot claim another variant's
//! identity.

use crate::{Class, Classification, Declaration, Internal, RecordError, RecordView, RenderedText, User};
use serde::de::{self, Deserializer};
use serde::ser::{SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Opaque upstream fault attached to a record.
///
/// Shared rather than boxed so records stay cheap to clone.
pub type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// Config sentinel for variants that take no arguments.
///
/// Serializes as a unit value (`null` in JSON).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoConfig;

/// Milliseconds since the Unix epoch. A clock set before 1970 reads as zero.
#[inline]
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}

/// A single error instance.
///
/// See the [module documentation](self) for the overall contract.
#[must_use = "error records should be dispatched, promoted or logged"]
pub struct ErrorRecord<C, K: Class> {
    name: &'static str,
    code: &'static str,
    message: RenderedText,
    user_message: K::UserMessage,
    recoverable: bool,
    config: C,
    cause: Option<Cause>,
    timestamp: u64,
}

impl<C, K: Class> ErrorRecord<C, K> {
    /// Render a declaration against `config`.
    ///
    /// The clock is read once, before either template runs. Both templates
    /// render independently from the same config. A panicking template
    /// unwinds straight through this call.
    pub(crate) fn from_declaration(
        declaration: &Declaration<C, K>,
        config: C,
        cause: Option<Cause>,
    ) -> Self {
        let timestamp = now_millis();
        let message = declaration.message.render(&config);
        let user_message = K::render_user(&declaration.user_message, &config);
        Self {
            name: declaration.name,
            code: declaration.code,
            message,
            user_message,
            recoverable: declaration.recoverable,
            config,
            cause,
            timestamp,
        }
    }

    /// Variant name; the discriminant within its family.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Caller-assigned code.
    #[inline]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    /// Runtime classification tag, fixed by `K`.
    #[inline]
    pub const fn classification(&self) -> Classification {
        K::CLASSIFICATION
    }

    /// Internal message, rendered at construction.
    #[inline]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Caller retry hint. Has no effect on anything in this crate.
    #[inline]
    pub const fn recoverable(&self) -> bool {
        self.recoverable
    }

    /// Arguments passed to the constructor, untouched.
    #[inline]
    pub const fn config(&self) -> &C {
        &self.config
    }

    /// Consume the record and keep only its config.
    #[inline]
    pub fn into_config(self) -> C {
        self.config
    }

    /// Upstream fault supplied at construction, if any.
    #[inline]
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    /// Construction time in milliseconds since the Unix epoch.
    #[inline]
    pub const fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Borrowed structured view for logging.
    ///
    /// The view cannot outlive the record, so loggers consume it on the spot.
    #[inline]
    pub fn view(&self) -> RecordView<'_> {
        RecordView {
            name: self.name,
            code: self.code,
            classification: K::CLASSIFICATION,
            message: self.message.as_str(),
            user_message: K::user_message(&self.user_message),
            recoverable: self.recoverable,
            timestamp: self.timestamp,
            cause: self.cause.as_deref(),
        }
    }

    /// Callback form of [`view`](Self::view).
    #[inline]
    pub fn with_view<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RecordView<'_>) -> R,
    {
        let view = self.view();
        f(&view)
    }
}

impl<C> ErrorRecord<C, Internal> {
    /// Promote to a user-facing record.
    ///
    /// Every field carries over unchanged; the result is classified `user`
    /// and carries `user_message`. The input is consumed, so clone first if
    /// the internal form is still needed.
    pub fn promote(self, user_message: impl Into<RenderedText>) -> ErrorRecord<C, User> {
        let Self {
            name,
            code,
            message,
            user_message: (),
            recoverable,
            config,
            cause,
            timestamp,
        } = self;
        ErrorRecord {
            name,
            code,
            message,
            user_message: user_message.into(),
            recoverable,
            config,
            cause,
            timestamp,
        }
    }
}

impl<C> ErrorRecord<C, User> {
    /// Message safe to show an end user.
    #[inline]
    pub fn user_message(&self) -> &str {
        self.user_message.as_str()
    }
}

impl<C: Clone, K: Class> Clone for ErrorRecord<C, K> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            code: self.code,
            message: self.message.clone(),
            user_message: self.user_message.clone(),
            recoverable: self.recoverable,
            config: self.config.clone(),
            cause: self.cause.clone(),
            timestamp: self.timestamp,
        }
    }
}

/// Causes are opaque, so two records agree on them only when they share
/// the same allocation (or both have none).
impl<C: PartialEq, K: Class> PartialEq for ErrorRecord<C, K> {
    fn eq(&self, other: &Self) -> bool {
        let same_cause = match (&self.cause, &other.cause) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        same_cause
            && self.name == other.name
            && self.code == other.code
            && self.message == other.message
            && self.user_message == other.user_message
            && self.recoverable == other.recoverable
            && self.timestamp == other.timestamp
            && self.config == other.config
    }
}

#[cfg(not(feature = "trusted_debug"))]
impl<C, K: Class> fmt::Debug for ErrorRecord<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("type", &K::CLASSIFICATION)
            .field("name", &self.name)
            .field("code", &self.code)
            .field("message", &"<REDACTED>")
            .field("user_message", &K::user_message(&self.user_message))
            .field("recoverable", &self.recoverable)
            .field("config", &"<REDACTED>")
            .field("cause", &self.cause.as_ref().map(|_| "<PRESENT>"))
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

#[cfg(feature = "trusted_debug")]
impl<C: fmt::Debug, K: Class> fmt::Debug for ErrorRecord<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorRecord")
            .field("type", &K::CLASSIFICATION)
            .field("name", &self.name)
            .field("code", &self.code)
            .field("message", &self.message)
            .field("user_message", &K::user_message(&self.user_message))
            .field("recoverable", &self.recoverable)
            .field("config", &self.config)
            .field("cause", &self.cause)
            .field("timestamp", &self.timestamp)
            .finish()
    }
}

impl<C, K: Class> fmt::Display for ErrorRecord<C, K> {
    /// External display: the user message for user records, and only the
    /// code for internal ones.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match K::user_message(&self.user_message) {
            Some(message) => f.write_str(message),
            None => write!(f, "internal error [{}]", self.code),
        }
    }
}

impl<C, K: Class> Error for ErrorRecord<C, K>
where
    Self: fmt::Debug,
{
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

impl<C: Serialize, K: Class> Serialize for ErrorRecord<C, K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let user_message = K::user_message(&self.user_message);
        let len = if user_message.is_some() { 8 } else { 7 };
        let mut state = serializer.serialize_struct("ErrorRecord", len)?;
        state.serialize_field("type", &K::CLASSIFICATION)?;
        state.serialize_field("name", self.name)?;
        state.serialize_field("code", self.code)?;
        state.serialize_field("message", &self.message)?;
        match user_message {
            Some(message) => state.serialize_field("userMessage", message)?,
            None => state.skip_field("userMessage")?,
        }
        state.serialize_field("recoverable", &self.recoverable)?;
        state.serialize_field("config", &self.config)?;
        state.serialize_field("timestamp", &self.timestamp)?;
        state.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordRepr<C> {
    #[serde(rename = "type")]
    classification: Classification,
    name: String,
    code: String,
    message: String,
    #[serde(default)]
    user_message: Option<String>,
    recoverable: bool,
    config: C,
    timestamp: u64,
}

impl<C> RecordRepr<C> {
    fn into_record<K: Class>(
        self,
        declaration: &Declaration<C, K>,
    ) -> Result<ErrorRecord<C, K>, RecordError> {
        if self.classification != K::CLASSIFICATION {
            return Err(RecordError::ClassificationMismatch {
                expected: K::CLASSIFICATION,
                found: self.classification,
            });
        }
        if self.name != declaration.name {
            return Err(RecordError::NameMismatch {
                expected: declaration.name,
                found: self.name,
            });
        }
        if self.code != declaration.code {
            return Err(RecordError::CodeMismatch {
                expected: declaration.code,
                found: self.code,
            });
        }
        let user_message = K::decode_user_message(self.user_message)?;
        Ok(ErrorRecord {
            name: declaration.name,
            code: declaration.code,
            message: RenderedText::from(self.message),
            user_message,
            recoverable: self.recoverable,
            config: self.config,
            cause: None,
            timestamp: self.timestamp,
        })
    }
}

impl<C, K: Class> ErrorRecord<C, K> {
    /// Decode a serialized record of the variant described by `declaration`.
    pub(crate) fn decode<'de, D>(
        declaration: &Declaration<C, K>,
        deserializer: D,
    ) -> Result<Self, D::Error>
    where
        C: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        RecordRepr::<C>::deserialize(deserializer)?
            .into_record(declaration)
            .map_err(<D::Error as de::Error>::custom)
    }
}
