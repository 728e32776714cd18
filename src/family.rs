//! The family-level view: the union of every record a declaration can
//! produce.
//!
//! [`error_family!`](crate::error_family) implements [`ErrorFamily`] for the
//! enum it generates. The trait is what generic code (loggers, HTTP error
//! mappers, metrics) holds on to when it does not care which family it has.

use crate::{Class, Classification, Declaration, RecordError, RecordView};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Static description of one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VariantInfo {
    /// Variant name.
    pub name: &'static str,
    /// Declared code.
    pub code: &'static str,
    /// Classification every record of this variant is built with.
    pub classification: Classification,
    /// Declared retry hint.
    pub recoverable: bool,
}

impl VariantInfo {
    /// Describe a declaration.
    #[inline]
    pub const fn of<C, K: Class>(declaration: &Declaration<C, K>) -> Self {
        Self {
            name: declaration.name,
            code: declaration.code,
            classification: K::CLASSIFICATION,
            recoverable: declaration.recoverable,
        }
    }
}

/// A closed set of error variants produced by one declaration.
///
/// Only the three required items vary between families; everything else
/// reads through [`view`](Self::view).
pub trait ErrorFamily: Sized {
    /// Fieldless enum with one value per variant; the union of codes.
    type Code: Copy + Eq + fmt::Debug + fmt::Display + FromStr<Err = RecordError> + 'static;

    /// Every variant, in declaration order (internal section first).
    const VARIANTS: &'static [VariantInfo];

    /// Borrowed structured view of the held record.
    fn view(&self) -> RecordView<'_>;

    /// Code of the held variant as a typed value.
    fn error_code(&self) -> Self::Code;

    /// Name of the held variant.
    fn variant_name(&self) -> &'static str;

    /// Code string of the held record.
    #[inline]
    fn code(&self) -> &str {
        self.view().code
    }

    /// Internal message of the held record.
    #[inline]
    fn message(&self) -> &str {
        self.view().message
    }

    /// Classification of the held record.
    #[inline]
    fn classification(&self) -> Classification {
        self.view().classification
    }

    /// Retry hint of the held record.
    #[inline]
    fn recoverable(&self) -> bool {
        self.view().recoverable
    }

    /// Construction time of the held record, in Unix milliseconds.
    #[inline]
    fn timestamp(&self) -> u64 {
        self.view().timestamp
    }

    /// Whether the held record is already safe to show.
    #[inline]
    fn is_user_facing(&self) -> bool {
        self.classification() == Classification::User
    }

    /// Look a variant up by name.
    fn variant(name: &str) -> Option<&'static VariantInfo> {
        Self::VARIANTS.iter().find(|info| info.name == name)
    }

    /// Every declared code string, in declaration order.
    fn codes() -> impl Iterator<Item = &'static str> {
        Self::VARIANTS.iter().map(|info| info.code)
    }
}
