//! Errors raised by this crate's own fallible operations.
//!
//! Building, dispatching and promoting records never fails. The only
//! fallible paths are the ones that accept data from outside the type
//! system: parsing a code string back into a family's `Code` enum, and
//! decoding a serialized record against its variant's declaration.

use crate::Classification;
use thiserror::Error;

/// Failure while parsing codes or decoding records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    /// No variant of the family declares this code.
    #[error("unknown error code `{0}`")]
    UnknownCode(String),

    /// More than one variant of the family declares this code.
    #[error("error code `{0}` is declared by more than one variant")]
    AmbiguousCode(String),

    /// The serialized `name` belongs to a different variant.
    #[error("expected variant `{expected}`, found `{found}`")]
    NameMismatch {
        /// Name declared by the target variant.
        expected: &'static str,
        /// Name carried by the payload.
        found: String,
    },

    /// The serialized `code` is not the one the variant declares.
    #[error("variant declares code `{expected}`, found `{found}`")]
    CodeMismatch {
        /// Code declared by the target variant.
        expected: &'static str,
        /// Code carried by the payload.
        found: String,
    },

    /// The serialized `type` tag does not match the record's static classification.
    #[error("expected a `{expected}` record, found `{found}`")]
    ClassificationMismatch {
        /// Classification required by the target record type.
        expected: Classification,
        /// Classification carried by the payload.
        found: Classification,
    },

    /// A `user` record arrived without its `userMessage`.
    #[error("user record is missing `userMessage`")]
    MissingUserMessage,

    /// An `internal` record arrived carrying a `userMessage`.
    #[error("internal record must not carry `userMessage`")]
    UnexpectedUserMessage,
}
