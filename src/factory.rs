//! Variant declarations and the constructors built from them.
//!
//! A [`Declaration`] is the data half of a variant: its name, code, message
//! templates and recoverable flag. A [`Constructor`] pairs a declaration with
//! the family enum variant that wraps its records. The
//! [`error_family!`](crate::error_family) macro emits one `const`
//! `Constructor` per declared variant; the types here are also usable on
//! their own for one-off variants.
//!
//! # Templates
//!
//! A [`Template`] is either a static literal or a plain function pointer from
//! the variant's config to a `String`. Non-capturing closures coerce to the
//! function pointer, which is what lets declarations live in `const` items.
//! Rendering happens exactly once, when a record is built.
//!
//! # Decoding
//!
//! Serialized records come back through the same declaration that built
//! them: [`Declaration::decode`] and [`Constructor::decode`] reject payloads
//! whose `type`, `name` or `code` belong to some other variant.

use crate::{Cause, Class, ErrorRecord, NoConfig, RenderedText};
use serde::de::{Deserialize, DeserializeSeed, Deserializer};
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Message template for configs of type `C`.
pub enum Template<C> {
    /// Fixed text; renders without allocating.
    Literal(&'static str),
    /// Computed from the config at construction time.
    Render(fn(&C) -> String),
}

impl<C> Template<C> {
    /// Render against `config`.
    #[inline]
    pub fn render(&self, config: &C) -> RenderedText {
        match self {
            Self::Literal(text) => RenderedText::from(*text),
            Self::Render(render) => RenderedText::from(render(config)),
        }
    }

    /// Whether the template is a fixed literal.
    #[inline]
    pub const fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }
}

impl<C> Clone for Template<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Template<C> {}

impl<C> fmt::Debug for Template<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            Self::Render(_) => f.write_str("Render(<fn>)"),
        }
    }
}

/// Declarative description of one variant.
///
/// For `K = Internal` the `user_message` slot is `()`; for `K = User` it is a
/// [`Template`]. The declaration alone therefore decides the classification
/// of every record it produces.
pub struct Declaration<C, K: Class> {
    /// Variant name, unique within its family.
    pub name: &'static str,
    /// Caller-assigned code.
    pub code: &'static str,
    /// Internal message template.
    pub message: Template<C>,
    /// User message template, present only for user-facing variants.
    pub user_message: K::UserTemplate<C>,
    /// Retry hint copied into every record.
    pub recoverable: bool,
}

impl<C, K: Class> Declaration<C, K> {
    /// Build a record from this declaration.
    #[inline]
    pub fn construct(&self, config: C, cause: Option<Cause>) -> ErrorRecord<C, K> {
        ErrorRecord::from_declaration(self, config, cause)
    }

    /// Decode a serialized record of this variant.
    ///
    /// The cause is never serialized, so the result has none.
    pub fn decode<'de, D>(&self, deserializer: D) -> Result<ErrorRecord<C, K>, D::Error>
    where
        C: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        ErrorRecord::decode(self, deserializer)
    }
}

impl<'de, C: Deserialize<'de>, K: Class> DeserializeSeed<'de> for &Declaration<C, K> {
    type Value = ErrorRecord<C, K>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
        self.decode(deserializer)
    }
}

impl<C, K: Class> fmt::Debug for Declaration<C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Declaration")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("classification", &K::CLASSIFICATION)
            .field("message", &self.message)
            .field("recoverable", &self.recoverable)
            .finish()
    }
}

/// Convert anything error-like into a shared [`Cause`].
#[inline]
fn into_cause(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Cause {
    Arc::from(cause.into())
}

/// Constructor for one variant of family `F`.
///
/// `build*` methods return the family enum; `record*` methods return the
/// narrowly typed record.
pub struct Constructor<F, C, K: Class> {
    declaration: Declaration<C, K>,
    wrap: fn(ErrorRecord<C, K>) -> F,
}

impl<F, C, K: Class> Constructor<F, C, K> {
    /// Pair a declaration with the enum variant that wraps its records.
    #[inline]
    pub const fn new(declaration: Declaration<C, K>, wrap: fn(ErrorRecord<C, K>) -> F) -> Self {
        Self { declaration, wrap }
    }

    /// The declaration behind this constructor.
    #[inline]
    pub const fn declaration(&self) -> &Declaration<C, K> {
        &self.declaration
    }

    /// Variant name.
    #[inline]
    pub const fn name(&self) -> &'static str {
        self.declaration.name
    }

    /// Declared code.
    #[inline]
    pub const fn code(&self) -> &'static str {
        self.declaration.code
    }

    /// Build the typed record.
    #[inline]
    pub fn record(&self, config: C) -> ErrorRecord<C, K> {
        self.declaration.construct(config, None)
    }

    /// Build the typed record with an upstream cause.
    #[inline]
    pub fn record_with_cause(
        &self,
        config: C,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> ErrorRecord<C, K> {
        self.declaration.construct(config, Some(into_cause(cause)))
    }

    /// Build a family value.
    #[inline]
    pub fn build(&self, config: C) -> F {
        (self.wrap)(self.record(config))
    }

    /// Build a family value with an upstream cause.
    #[inline]
    pub fn build_with_cause(&self, config: C, cause: impl Into<Box<dyn Error + Send + Sync>>) -> F {
        (self.wrap)(self.record_with_cause(config, cause))
    }

    /// Decode the typed record.
    pub fn decode_record<'de, D>(&self, deserializer: D) -> Result<ErrorRecord<C, K>, D::Error>
    where
        C: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        self.declaration.decode(deserializer)
    }

    /// Decode a family value.
    pub fn decode<'de, D>(&self, deserializer: D) -> Result<F, D::Error>
    where
        C: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        self.decode_record(deserializer).map(self.wrap)
    }
}

impl<F, K: Class> Constructor<F, NoConfig, K> {
    /// Build a family value for a variant that takes no arguments.
    #[inline]
    pub fn bare(&self) -> F {
        self.build(NoConfig)
    }

    /// Build a family value for an argument-free variant, with a cause.
    #[inline]
    pub fn bare_with_cause(&self, cause: impl Into<Box<dyn Error + Send + Sync>>) -> F {
        self.build_with_cause(NoConfig, cause)
    }
}

impl<F, C, K: Class> fmt::Debug for Constructor<F, C, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Constructor").field(&self.declaration).finish()
    }
}
