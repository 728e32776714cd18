//! Rendered message storage with zeroization for owned data.
//!
//! Literal templates are kept as `Cow::Borrowed` and cost nothing. Rendered
//! templates own their buffer, which is wiped when the text drops: internal
//! messages are where connection strings, identifiers and other diagnostic
//! detail end up, and they should not outlive the record that carried them.
//!
//! Borrowed values are assumed static and are not zeroized.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::ops::Deref;
use zeroize::Zeroize;

/// A message rendered once, at record construction.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RenderedText {
    value: Cow<'static, str>,
}

impl RenderedText {
    /// Borrow the text.
    #[inline]
    pub fn as_str(&self) -> &str {
        self.value.as_ref()
    }

    /// Whether the text is backed by a static literal rather than an owned buffer.
    #[inline]
    pub const fn is_static(&self) -> bool {
        matches!(self.value, Cow::Borrowed(_))
    }
}

impl From<&'static str> for RenderedText {
    fn from(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }
}

impl From<String> for RenderedText {
    fn from(value: String) -> Self {
        Self {
            value: Cow::Owned(value),
        }
    }
}

impl From<Cow<'static, str>> for RenderedText {
    fn from(value: Cow<'static, str>) -> Self {
        Self { value }
    }
}

impl Deref for RenderedText {
    type Target = str;

    #[inline]
    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl AsRef<str> for RenderedText {
    #[inline]
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl PartialEq<str> for RenderedText {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for RenderedText {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl fmt::Display for RenderedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for RenderedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl Zeroize for RenderedText {
    fn zeroize(&mut self) {
        if let Cow::Owned(ref mut s) = self.value {
            s.zeroize();
        }
    }
}

impl Drop for RenderedText {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl Serialize for RenderedText {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RenderedText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}
