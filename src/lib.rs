//! # Tagged Errors
//!
//! Closed families of named, structured error variants with exhaustive
//! handling and a controlled path from internal errors to user-facing ones.
//!
//! ## Design Philosophy
//!
//! 1. **Every error is a record**: name, code, rendered message, config,
//!    optional cause and a timestamp, all fixed at construction
//! 2. **Classification lives in the type**: an internal record has no user
//!    message to leak, and the compiler knows it
//! 3. **Every variant gets handled**: handler sets are struct literals, so a
//!    missing handler is a compile error rather than a runtime surprise
//! 4. **Promotion is a decision**: only internal variants take a promotion
//!    handler, and records that are already user-facing pass through as-is
//! 5. **External display reveals nothing**: `Display` on an internal record
//!    prints its code, never its message
//!
//! ## Quick Start
//!
//! ```rust
//! use serde::Serialize;
//! use tagged_errors::{error_family, ErrorFamily};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize)]
//! pub struct InternalArgs {
//!     pub message: String,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Serialize)]
//! pub struct InvalidArgumentArgs {
//!     pub field: String,
//!     pub value: String,
//! }
//!
//! error_family! {
//!     pub enum AppError in app_errors {
//!         internal {
//!             InternalError(InternalArgs) {
//!                 code: "INTERNAL_001",
//!                 message: |a| format!("Internal error: {}", a.message),
//!             },
//!         }
//!         user {
//!             InvalidArgument(InvalidArgumentArgs) {
//!                 code: "USER_001",
//!                 message: |a| format!("Invalid argument: {} = {}", a.field, a.value),
//!                 user_message: |a| format!("Invalid argument: {} = {}", a.field, a.value),
//!             },
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let err = app_errors::InternalError.build(InternalArgs { message: "test".into() });
//!
//!     // External display (safe for untrusted viewers):
//!     assert_eq!(err.to_string(), "internal error [INTERNAL_001]");
//!
//!     // Internal log line (full context):
//!     let mut line = String::new();
//!     err.view().write_to(&mut line).unwrap();
//!     assert!(line.contains("message='Internal error: test'"));
//!
//!     let shown = err.into_user_facing(&app_errors::Promotion {
//!         InternalError: &|_| "There was an error serving your request".to_string(),
//!     });
//!     assert_eq!(shown.user_message(), "There was an error serving your request");
//! }
//! ```
//!
//! ## Features
//!
//! - `trusted_debug`: show messages and configs in `Debug` output. Off by
//!   default, in which case `Debug` redacts them.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod class;
pub mod error;
pub mod factory;
pub mod family;
pub mod macros;
pub mod record;
pub mod text;
pub mod view;

pub use class::*;
pub use error::*;
pub use factory::*;
pub use family::*;
pub use record::*;
pub use text::*;
pub use view::*;

#[doc(hidden)]
pub mod __private {
    pub use serde;
}
