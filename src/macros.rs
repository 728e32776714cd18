//! The `error_family!` declaration macro.
//!
//! # Usage
//!
//! ```rust
//! use serde::Serialize;
//! use tagged_errors::{error_family, ErrorFamily};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize)]
//! pub struct QueryArgs {
//!     pub table: String,
//! }
//!
//! #[derive(Debug, Clone, PartialEq, Serialize)]
//! pub struct FieldArgs {
//!     pub field: String,
//! }
//!
//! error_family! {
//!     /// Everything the storage layer can fail with.
//!     #[derive(Clone, PartialEq)]
//!     pub enum StoreError in store_errors {
//!         internal {
//!             QueryFailed(QueryArgs) {
//!                 code: "STORE_001",
//!                 message: |a| format!("query against {} failed", a.table),
//!             },
//!             Unavailable {
//!                 code: "STORE_002",
//!                 message: "store unavailable",
//!                 recoverable: true,
//!             },
//!         }
//!         user {
//!             BadField(FieldArgs) {
//!                 code: "STORE_100",
//!                 message: |a| format!("rejected field {}", a.field),
//!                 user_message: |a| format!("The field {} is invalid.", a.field),
//!             },
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let err = store_errors::QueryFailed.build(QueryArgs { table: "users".into() });
//!     assert_eq!(err.message(), "query against users failed");
//!     assert!(!err.is_user_facing());
//!
//!     let status = err.dispatch(&store_errors::Handlers {
//!         QueryFailed: &|_| 500,
//!         Unavailable: &|_| 503,
//!         BadField: &|_| 400,
//!     });
//!     assert_eq!(status, 500);
//!
//!     let shown = err.into_user_facing(&store_errors::Promotion {
//!         QueryFailed: &|_| "Please try again later.".to_string(),
//!         Unavailable: &|_| "We are down for maintenance.".to_string(),
//!     });
//!     assert_eq!(shown.user_message(), "Please try again later.");
//!     assert_eq!(shown.view().message, "query against users failed");
//! }
//! ```
//!
//! # Declaration rules
//!
//! - Invoke at module level. The generated module imports its parent with
//!   `use super::*`, so config types must be nameable from there and must
//!   not share a name with any variant.
//! - Inside a variant body the fields come in the order `code`, `message`,
//!   `user_message`, `recoverable`. `user_message` is required in the `user`
//!   section and rejected in the `internal` section. `recoverable` defaults to
//!   `false`.
//! - `message` and `user_message` are string literals or functions of the
//!   config (closures without captures, or paths to `fn(&Config) -> String`).
//! - Either section may be omitted.
//! - Codes need not be unique. Parsing a code string that several variants
//!   share fails with [`RecordError::AmbiguousCode`](crate::RecordError).
//! - Records decode through their constructor, for example
//!   `store_errors::QueryFailed.decode(deserializer)`, which checks the
//!   payload's `type`, `name` and `code` against the declaration.
//! - Every config must implement `serde::Serialize`. With the
//!   `trusted_debug` feature every config must also implement `Debug`.
//! - `Handlers`, `Promotion`, `UserFacing`, `Code`, `VARIANTS` and `CODES`
//!   are generated inside the module and cannot be used as variant names.
//! - The family gets `Debug`, `Display`, `Error` and `Serialize`
//!   implementations; do not derive `Debug` on it.
//!
//! # Generated items
//!
//! For `pub enum StoreError in store_errors { .. }`:
//!
//! | Item | What it is |
//! |---|---|
//! | `StoreError` | the family enum, one tuple variant per declared variant |
//! | `store_errors::QueryFailed` (value) | the variant's [`Constructor`](crate::Constructor) |
//! | `store_errors::QueryFailed` (type) | the variant's record, `ErrorRecord<QueryArgs, Internal>` |
//! | `store_errors::Code` | the union of codes as a fieldless enum |
//! | `store_errors::Handlers<'a, R>` | one handler per variant, for `StoreError::dispatch` |
//! | `store_errors::Promotion<'a>` | one handler per internal variant, for `StoreError::into_user_facing` |
//! | `store_errors::UserFacing` | the family after promotion; every payload is a user record |
//! | `store_errors::VARIANTS`, `store_errors::CODES` | static metadata |
//!
//! # Rejected at compile time
//!
//! A handler set that misses a variant:
//!
//! ```rust,compile_fail
//! use tagged_errors::error_family;
//!
//! error_family! {
//!     pub enum Small in small {
//!         internal {
//!             A { code: "A", message: "a", },
//!             B { code: "B", message: "b", },
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let err = small::A.bare();
//!     let _ = err.dispatch(&small::Handlers { A: &|_| 1 });
//! }
//! ```
//!
//! A promotion handler for a variant that is already user-facing:
//!
//! ```rust,compile_fail
//! use tagged_errors::error_family;
//!
//! error_family! {
//!     pub enum Mixed in mixed {
//!         internal {
//!             Hidden { code: "H", message: "hidden", },
//!         }
//!         user {
//!             Shown { code: "S", message: "shown", user_message: "Shown.", },
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let err = mixed::Hidden.bare();
//!     let _ = err.into_user_facing(&mixed::Promotion {
//!         Hidden: &|_| String::from("Hidden."),
//!         Shown: &|_| String::from("Shown again."),
//!     });
//! }
//! ```
//!
//! A user message on an internal variant:
//!
//! ```rust,compile_fail
//! use tagged_errors::error_family;
//!
//! error_family! {
//!     pub enum Wrong in wrong {
//!         internal {
//!             Leaky { code: "L", message: "internal", user_message: "shown", },
//!         }
//!     }
//! }
//!
//! fn main() {}
//! ```
//!
//! Reading a user message off an internal record:
//!
//! ```rust,compile_fail
//! use tagged_errors::error_family;
//!
//! error_family! {
//!     pub enum Quiet in quiet {
//!         internal {
//!             Hidden { code: "H", message: "hidden", },
//!         }
//!     }
//! }
//!
//! fn main() {
//!     let record = quiet::Hidden.record(tagged_errors::NoConfig);
//!     let _ = record.user_message();
//! }
//! ```

/// Declare a closed family of error variants.
///
/// See the [module documentation](crate::macros) for syntax and output.
#[macro_export]
macro_rules! error_family {
    (
        @emit
        [$(#[$meta:meta])*] [$vis:vis] $Family:ident $module:ident
        internal [ $( [$(#[$ivm:meta])*] $IVar:ident [$($ICfg:ty)?] [$($ibody:tt)*] )* ]
        user [ $( [$(#[$uvm:meta])*] $UVar:ident [$($UCfg:ty)?] [$($ubody:tt)*] )* ]
    ) => {
        $(#[$meta])*
        $vis enum $Family {
            $( $(#[$ivm])* $IVar($module::$IVar), )*
            $( $(#[$uvm])* $UVar($module::$UVar), )*
        }

        #[doc = ::core::concat!(
            "Constructors, record shapes and handler sets for [`",
            ::core::stringify!($Family),
            "`]."
        )]
        #[allow(non_upper_case_globals, non_snake_case, missing_docs)]
        $vis mod $module {
            #[allow(unused_imports)]
            use super::*;

            $(
                #[doc = ::core::concat!("Builds [`", ::core::stringify!($Family), "::", ::core::stringify!($IVar), "`].")]
                pub const $IVar: $crate::Constructor<
                    super::$Family,
                    $crate::__config_ty!($($ICfg)?),
                    $crate::Internal,
                > = $crate::Constructor::new(
                    $crate::__declaration!(@start internal $IVar [$crate::__config_ty!($($ICfg)?)] $($ibody)*),
                    super::$Family::$IVar,
                );

                #[doc = ::core::concat!("Record held by [`", ::core::stringify!($Family), "::", ::core::stringify!($IVar), "`].")]
                pub type $IVar = $crate::ErrorRecord<$crate::__config_ty!($($ICfg)?), $crate::Internal>;
            )*

            $(
                #[doc = ::core::concat!("Builds [`", ::core::stringify!($Family), "::", ::core::stringify!($UVar), "`].")]
                pub const $UVar: $crate::Constructor<
                    super::$Family,
                    $crate::__config_ty!($($UCfg)?),
                    $crate::User,
                > = $crate::Constructor::new(
                    $crate::__declaration!(@start user $UVar [$crate::__config_ty!($($UCfg)?)] $($ubody)*),
                    super::$Family::$UVar,
                );

                #[doc = ::core::concat!("Record held by [`", ::core::stringify!($Family), "::", ::core::stringify!($UVar), "`].")]
                pub type $UVar = $crate::ErrorRecord<$crate::__config_ty!($($UCfg)?), $crate::User>;
            )*

            /// Every variant, in declaration order.
            pub const VARIANTS: &[$crate::VariantInfo] = &[
                $( $crate::VariantInfo::of($IVar.declaration()), )*
                $( $crate::VariantInfo::of($UVar.declaration()), )*
            ];

            /// Every declared code, in declaration order.
            pub const CODES: &[&str] = &[
                $( $IVar.code(), )*
                $( $UVar.code(), )*
            ];

            /// The union of this family's codes.
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum Code {
                $( $IVar, )*
                $( $UVar, )*
            }

            impl Code {
                /// Every code, in declaration order.
                pub const ALL: &'static [Code] = &[ $( Code::$IVar, )* $( Code::$UVar, )* ];

                /// The declared code string.
                pub const fn as_str(&self) -> &'static str {
                    match self {
                        $( Code::$IVar => $IVar.code(), )*
                        $( Code::$UVar => $UVar.code(), )*
                    }
                }
            }

            impl ::core::str::FromStr for Code {
                type Err = $crate::RecordError;

                /// Codes need not be unique; a string shared by several
                /// variants names none of them and is rejected.
                fn from_str(code: &str) -> ::core::result::Result<Self, Self::Err> {
                    let mut matches = Self::ALL.iter().copied().filter(|known| known.as_str() == code);
                    match (matches.next(), matches.next()) {
                        (::core::option::Option::Some(found), ::core::option::Option::None) => {
                            ::core::result::Result::Ok(found)
                        }
                        (::core::option::Option::Some(_), ::core::option::Option::Some(_)) => {
                            ::core::result::Result::Err($crate::RecordError::AmbiguousCode(
                                ::std::string::ToString::to_string(code),
                            ))
                        }
                        (::core::option::Option::None, _) => ::core::result::Result::Err(
                            $crate::RecordError::UnknownCode(::std::string::ToString::to_string(code)),
                        ),
                    }
                }
            }

            impl ::core::fmt::Display for Code {
                fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                    f.write_str(self.as_str())
                }
            }

            impl $crate::__private::serde::Serialize for Code {
                fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
                where
                    S: $crate::__private::serde::Serializer,
                {
                    serializer.serialize_str(self.as_str())
                }
            }

            #[doc = ::core::concat!(
                "One handler per variant of [`",
                ::core::stringify!($Family),
                "`]. Leaving one out does not compile."
            )]
            pub struct Handlers<'a, R> {
                $( pub $IVar: &'a dyn ::core::ops::Fn(&$IVar) -> R, )*
                $( pub $UVar: &'a dyn ::core::ops::Fn(&$UVar) -> R, )*
            }

            $crate::__promotion! { $( $IVar )* }

            #[doc = ::core::concat!(
                "[`",
                ::core::stringify!($Family),
                "`] after promotion. Every payload carries a user message."
            )]
            pub enum UserFacing {
                $( $IVar($crate::ErrorRecord<$crate::__config_ty!($($ICfg)?), $crate::User>), )*
                $( $UVar($UVar), )*
            }

            impl UserFacing {
                /// Message safe to show an end user.
                pub fn user_message(&self) -> &str {
                    match self {
                        $( Self::$IVar(record) => record.user_message(), )*
                        $( Self::$UVar(record) => record.user_message(), )*
                    }
                }

                /// Borrowed structured view of the held record.
                pub fn view(&self) -> $crate::RecordView<'_> {
                    match self {
                        $( Self::$IVar(record) => record.view(), )*
                        $( Self::$UVar(record) => record.view(), )*
                    }
                }

                /// Name of the held variant.
                pub fn variant_name(&self) -> &'static str {
                    match self {
                        $( Self::$IVar(_) => ::core::stringify!($IVar), )*
                        $( Self::$UVar(_) => ::core::stringify!($UVar), )*
                    }
                }

                /// Code of the held variant.
                pub fn error_code(&self) -> Code {
                    match self {
                        $( Self::$IVar(_) => Code::$IVar, )*
                        $( Self::$UVar(_) => Code::$UVar, )*
                    }
                }
            }

            $crate::__family_impls!(UserFacing { $( $IVar, )* $( $UVar, )* });
        }

        impl $Family {
            /// Run the handler for the held variant and return its result.
            ///
            /// No other handler runs.
            $vis fn dispatch<R>(&self, handlers: &$module::Handlers<'_, R>) -> R {
                match self {
                    $( Self::$IVar(record) => (handlers.$IVar)(record), )*
                    $( Self::$UVar(record) => (handlers.$UVar)(record), )*
                }
            }

            /// Turn the error into its user-facing form.
            ///
            /// User variants pass through unchanged. Internal variants are
            /// promoted with the message their handler returns.
            #[allow(unused_variables)]
            $vis fn into_user_facing(self, promotion: &$module::Promotion<'_>) -> $module::UserFacing {
                match self {
                    $(
                        Self::$IVar(record) => {
                            let user_message = (promotion.$IVar)(&record);
                            $module::UserFacing::$IVar(record.promote(user_message))
                        }
                    )*
                    $( Self::$UVar(record) => $module::UserFacing::$UVar(record), )*
                }
            }
        }

        impl $crate::ErrorFamily for $Family {
            type Code = $module::Code;

            const VARIANTS: &'static [$crate::VariantInfo] = $module::VARIANTS;

            fn view(&self) -> $crate::RecordView<'_> {
                match self {
                    $( Self::$IVar(record) => record.view(), )*
                    $( Self::$UVar(record) => record.view(), )*
                }
            }

            fn error_code(&self) -> $module::Code {
                match self {
                    $( Self::$IVar(_) => $module::Code::$IVar, )*
                    $( Self::$UVar(_) => $module::Code::$UVar, )*
                }
            }

            fn variant_name(&self) -> &'static str {
                match self {
                    $( Self::$IVar(_) => ::core::stringify!($IVar), )*
                    $( Self::$UVar(_) => ::core::stringify!($UVar), )*
                }
            }
        }

        $crate::__family_impls!($Family { $( $IVar, )* $( $UVar, )* });
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $Family:ident in $module:ident {
            internal {
                $( $(#[$ivm:meta])* $IVar:ident $( ( $ICfg:ty ) )? { $($ibody:tt)* } ),* $(,)?
            }
            $(
                user {
                    $( $(#[$uvm:meta])* $UVar:ident $( ( $UCfg:ty ) )? { $($ubody:tt)* } ),* $(,)?
                }
            )?
        }
    ) => {
        $crate::error_family! {
            @emit
            [$(#[$meta])*] [$vis] $Family $module
            internal [ $( [$(#[$ivm])*] $IVar [$($ICfg)?] [$($ibody)*] )* ]
            user [ $( $( [$(#[$uvm])*] $UVar [$($UCfg)?] [$($ubody)*] )* )? ]
        }
    };

    (
        $(#[$meta:meta])*
        $vis:vis enum $Family:ident in $module:ident {
            user {
                $( $(#[$uvm:meta])* $UVar:ident $( ( $UCfg:ty ) )? { $($ubody:tt)* } ),* $(,)?
            }
        }
    ) => {
        $crate::error_family! {
            @emit
            [$(#[$meta])*] [$vis] $Family $module
            internal []
            user [ $( [$(#[$uvm])*] $UVar [$($UCfg)?] [$($ubody)*] )* ]
        }
    };
}

/// Config type of a variant: the declared one, or `NoConfig`.
#[doc(hidden)]
#[macro_export]
macro_rules! __config_ty {
    () => {
        $crate::NoConfig
    };
    ($cfg:ty) => {
        $cfg
    };
}

/// Parses one variant body into a `Declaration` expression.
#[doc(hidden)]
#[macro_export]
macro_rules! __declaration {
    (@start $class:ident $name:ident [$cfg:ty] code: $code:expr, message: $($rest:tt)*) => {
        $crate::__declaration!(@message $class $name [$cfg] [$code] $($rest)*)
    };
    (@start $class:ident $name:ident [$cfg:ty] $($rest:tt)*) => {
        ::core::compile_error!(::core::concat!(
            "`", ::core::stringify!($name), "` must start with `code: ..., message: ...`"
        ))
    };

    (@message $class:ident $name:ident [$cfg:ty] [$code:expr] $m:literal $(, $($rest:tt)*)?) => {
        $crate::__declaration!(
            @user $class $name [$cfg] [$code] [$crate::Template::<$cfg>::Literal($m)] $($($rest)*)?
        )
    };
    (@message $class:ident $name:ident [$cfg:ty] [$code:expr] $m:expr $(, $($rest:tt)*)?) => {
        $crate::__declaration!(
            @user $class $name [$cfg] [$code] [$crate::Template::<$cfg>::Render($m)] $($($rest)*)?
        )
    };

    (@user internal $name:ident [$cfg:ty] [$code:expr] [$msg:expr] user_message: $($rest:tt)*) => {
        ::core::compile_error!(::core::concat!(
            "`", ::core::stringify!($name),
            "` is declared `internal` and cannot carry a `user_message`; declare it in the `user` section"
        ))
    };
    (@user internal $name:ident [$cfg:ty] [$code:expr] [$msg:expr] $($rest:tt)*) => {
        $crate::Declaration::<$cfg, $crate::Internal> {
            name: ::core::stringify!($name),
            code: $code,
            message: $msg,
            user_message: (),
            recoverable: $crate::__declaration!(@recoverable $($rest)*),
        }
    };
    (@user user $name:ident [$cfg:ty] [$code:expr] [$msg:expr] user_message: $u:literal $(, $($rest:tt)*)?) => {
        $crate::Declaration::<$cfg, $crate::User> {
            name: ::core::stringify!($name),
            code: $code,
            message: $msg,
            user_message: $crate::Template::<$cfg>::Literal($u),
            recoverable: $crate::__declaration!(@recoverable $($($rest)*)?),
        }
    };
    (@user user $name:ident [$cfg:ty] [$code:expr] [$msg:expr] user_message: $u:expr $(, $($rest:tt)*)?) => {
        $crate::Declaration::<$cfg, $crate::User> {
            name: ::core::stringify!($name),
            code: $code,
            message: $msg,
            user_message: $crate::Template::<$cfg>::Render($u),
            recoverable: $crate::__declaration!(@recoverable $($($rest)*)?),
        }
    };
    (@user user $name:ident [$cfg:ty] [$code:expr] [$msg:expr] $($rest:tt)*) => {
        ::core::compile_error!(::core::concat!(
            "`", ::core::stringify!($name),
            "` is declared `user` and needs a `user_message`"
        ))
    };

    (@recoverable) => {
        false
    };
    (@recoverable recoverable: $r:expr $(,)?) => {
        $r
    };
}

/// The promotion handler set: one field per internal variant, or an empty
/// marker when there are none.
#[doc(hidden)]
#[macro_export]
macro_rules! __promotion {
    () => {
        /// This family has no internal variants, so promotion needs no handlers.
        #[derive(Debug, Default, Clone, Copy)]
        pub struct Promotion<'a> {
            _marker: ::core::marker::PhantomData<&'a ()>,
        }
    };
    ($( $IVar:ident )+) => {
        /// One handler per internal variant, returning the user message.
        ///
        /// User variants have no field here: they are already user-facing.
        pub struct Promotion<'a> {
            $( pub $IVar: &'a dyn ::core::ops::Fn(&$IVar) -> ::std::string::String, )+
        }
    };
}

/// `Debug`, `Display`, `Error` and `Serialize` for an enum whose every
/// variant holds one record.
#[doc(hidden)]
#[macro_export]
macro_rules! __family_impls {
    ($Enum:ident { $( $Var:ident, )* }) => {
        impl ::core::fmt::Debug for $Enum {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    $( Self::$Var(record) => f.debug_tuple(::core::stringify!($Var)).field(record).finish(), )*
                }
            }
        }

        impl ::core::fmt::Display for $Enum {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                match self {
                    $( Self::$Var(record) => ::core::fmt::Display::fmt(record, f), )*
                }
            }
        }

        impl ::std::error::Error for $Enum {
            fn source(&self) -> ::core::option::Option<&(dyn ::std::error::Error + 'static)> {
                match self {
                    $( Self::$Var(record) => ::std::error::Error::source(record), )*
                }
            }
        }

        impl $crate::__private::serde::Serialize for $Enum {
            fn serialize<S>(&self, serializer: S) -> ::core::result::Result<S::Ok, S::Error>
            where
                S: $crate::__private::serde::Serializer,
            {
                match self {
                    $( Self::$Var(record) => $crate::__private::serde::Serialize::serialize(record, serializer), )*
                }
            }
        }
    };
}
