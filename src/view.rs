//! Borrowed, structured view of a record for logging.
//!
//! A [`RecordView`] borrows from the record that produced it and cannot
//! outlive it. Loggers take the view, write it out, and drop it. The
//! record's config is deliberately not part of the view; log what you need
//! from it explicitly.
//!
//! [`RecordView::write_to`] truncates every free-text field to
//! [`MAX_FIELD_OUTPUT_LEN`] bytes so an oversized message cannot flood a log
//! sink. [`RecordView::fields`] hands back untruncated key/value pairs for
//! structured loggers that apply their own limits.

use crate::Classification;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;

/// Maximum length for any individual field in formatted output.
pub const MAX_FIELD_OUTPUT_LEN: usize = 1024;

/// Appended to fields cut at [`MAX_FIELD_OUTPUT_LEN`].
pub const TRUNCATION_INDICATOR: &str = "...[TRUNCATED]";

/// Structured view with data borrowed from an [`ErrorRecord`](crate::ErrorRecord).
///
/// # Example
///
/// ```rust
/// use tagged_errors::{Declaration, Internal, NoConfig, Template};
///
/// const TIMEOUT: Declaration<NoConfig, Internal> = Declaration {
///     name: "Timeout",
///     code: "NET_001",
///     message: Template::Literal("upstream timed out"),
///     user_message: (),
///     recoverable: true,
/// };
///
/// let record = TIMEOUT.construct(NoConfig, None);
/// let mut line = String::new();
/// record.view().write_to(&mut line).unwrap();
/// assert!(line.starts_with("[NET_001] internal Timeout [RECOVERABLE]"));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RecordView<'a> {
    /// Variant name.
    pub name: &'a str,
    /// Declared code.
    pub code: &'a str,
    /// Runtime classification tag.
    pub classification: Classification,
    /// Internal message.
    pub message: &'a str,
    /// User message, present only for user records.
    pub user_message: Option<&'a str>,
    /// Retry hint.
    pub recoverable: bool,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Upstream fault, if any.
    pub cause: Option<&'a (dyn Error + Send + Sync + 'static)>,
}

/// Value half of a [`RecordView::fields`] pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// Borrowed text.
    Str(&'a str),
    /// Flag.
    Bool(bool),
    /// Unsigned integer.
    U64(u64),
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::U64(n) => write!(f, "{n}"),
        }
    }
}

impl<'a> RecordView<'a> {
    /// Write a single log line without intermediate allocation for short fields.
    ///
    /// Shape: `[CODE] class Name [RECOVERABLE] message='..' user_message='..' cause='..' at=MILLIS`.
    /// Optional parts are omitted when absent.
    pub fn write_to(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}{} message='{}'",
            truncate_with_indicator(self.code),
            self.classification,
            truncate_with_indicator(self.name),
            if self.recoverable { " [RECOVERABLE]" } else { "" },
            truncate_with_indicator(self.message)
        )?;

        if let Some(user) = self.user_message {
            write!(f, " user_message='{}'", truncate_with_indicator(user))?;
        }

        if let Some(cause) = self.cause {
            let cause = cause.to_string();
            write!(f, " cause='{}'", truncate_with_indicator(&cause))?;
        }

        write!(f, " at={}", self.timestamp)
    }

    /// Key/value pairs for structured loggers.
    ///
    /// Fields are not truncated here. `userMessage` appears only for user
    /// records. The cause is never included since it is not borrowed text.
    pub fn fields(&self) -> SmallVec<[(&'static str, FieldValue<'a>); 8]> {
        let mut fields = SmallVec::new();
        fields.push(("type", FieldValue::Str(self.classification.as_str())));
        fields.push(("name", FieldValue::Str(self.name)));
        fields.push(("code", FieldValue::Str(self.code)));
        fields.push(("message", FieldValue::Str(self.message)));
        if let Some(user) = self.user_message {
            fields.push(("userMessage", FieldValue::Str(user)));
        }
        fields.push(("recoverable", FieldValue::Bool(self.recoverable)));
        fields.push(("timestamp", FieldValue::U64(self.timestamp)));
        fields
    }
}

/// Cut `s` to at most [`MAX_FIELD_OUTPUT_LEN`] bytes on a char boundary,
/// marking the cut with [`TRUNCATION_INDICATOR`].
///
/// Borrows when no truncation is needed.
fn truncate_with_indicator(s: &str) -> Cow<'_, str> {
    if s.len() <= MAX_FIELD_OUTPUT_LEN {
        return Cow::Borrowed(s);
    }

    let max_content_len = MAX_FIELD_OUTPUT_LEN.saturating_sub(TRUNCATION_INDICATOR.len());

    let mut idx = max_content_len;
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }

    if idx == 0 {
        return Cow::Borrowed(TRUNCATION_INDICATOR);
    }

    let mut result = String::with_capacity(idx + TRUNCATION_INDICATOR.len());
    result.push_str(&s[..idx]);
    result.push_str(TRUNCATION_INDICATOR);
    Cow::Owned(result)
}
