//! Classification of error records: internal versus user-facing.
//!
//! # Two layers
//!
//! - [`Classification`] is the runtime tag. It is what gets serialized as
//!   `"type"` and what erased views report.
//! - [`Internal`] and [`User`] are zero-sized type-level markers implementing
//!   the sealed [`Class`] trait. Every [`ErrorRecord`](crate::ErrorRecord)
//!   carries one as a type parameter, so the classification is fixed by the
//!   type and cannot drift after construction.
//!
//! The marker decides what a record stores for its user message: `()` for
//! internal records and [`RenderedText`] for user records. "Classification is
//! user if and only if a user message is present" is therefore enforced by
//! the type system rather than checked at runtime.

use crate::{RecordError, RenderedText, Template};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Runtime classification tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Never shown to an end user.
    Internal,
    /// Safe to display.
    User,
}

impl Classification {
    /// Lowercase label, identical to the serialized form.
    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Internal {}
    impl Sealed for super::User {}
}

/// Type-level classification marker.
///
/// Sealed: [`Internal`] and [`User`] are the only implementors.
pub trait Class: sealed::Sealed + Copy + Default + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag for this marker.
    const CLASSIFICATION: Classification;

    /// What a declaration holds for the user message template.
    type UserTemplate<C>;

    /// What a record holds for the rendered user message.
    type UserMessage: Clone + PartialEq + fmt::Debug + Send + Sync + 'static;

    #[doc(hidden)]
    fn render_user<C>(template: &Self::UserTemplate<C>, config: &C) -> Self::UserMessage;

    #[doc(hidden)]
    fn user_message(message: &Self::UserMessage) -> Option<&str>;

    #[doc(hidden)]
    fn decode_user_message(message: Option<String>) -> Result<Self::UserMessage, RecordError>;
}

/// Marker for records that must never reach an end user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Internal;

/// Marker for records that carry a displayable user message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct User;

impl Class for Internal {
    const CLASSIFICATION: Classification = Classification::Internal;
    type UserTemplate<C> = ();
    type UserMessage = ();

    #[inline]
    fn render_user<C>(_template: &(), _config: &C) {}

    #[inline]
    fn user_message(_message: &()) -> Option<&str> {
        None
    }

    fn decode_user_message(message: Option<String>) -> Result<(), RecordError> {
        match message {
            None => Ok(()),
            Some(_) => Err(RecordError::UnexpectedUserMessage),
        }
    }
}

impl Class for User {
    const CLASSIFICATION: Classification = Classification::User;
    type UserTemplate<C> = Template<C>;
    type UserMessage = RenderedText;

    #[inline]
    fn render_user<C>(template: &Template<C>, config: &C) -> RenderedText {
        template.render(config)
    }

    #[inline]
    fn user_message(message: &RenderedText) -> Option<&str> {
        Some(message.as_str())
    }

    fn decode_user_message(message: Option<String>) -> Result<RenderedText, RecordError> {
        message
            .map(RenderedText::from)
            .ok_or(RecordError::MissingUserMessage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_report_their_tag() {
        assert_eq!(Internal::CLASSIFICATION, Classification::Internal);
        assert_eq!(User::CLASSIFICATION, Classification::User);
    }

    #[test]
    fn decode_enforces_presence_rule() {
        assert_eq!(Internal::decode_user_message(None), Ok(()));
        assert_eq!(
            Internal::decode_user_message(Some("shown".into())),
            Err(RecordError::UnexpectedUserMessage)
        );
        assert_eq!(
            User::decode_user_message(None),
            Err(RecordError::MissingUserMessage)
        );
        let decoded = User::decode_user_message(Some("shown".into())).unwrap();
        assert_eq!(decoded.as_str(), "shown");
    }

    #[test]
    fn serialized_form_is_lowercase() {
        assert_eq!(Classification::User.as_str(), "user");
        assert_eq!(Classification::Internal.to_string(), "internal");
    }
}
