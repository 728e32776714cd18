//! Property-based tests for tagged_errors
//!
//! These tests use proptest to generate random inputs and verify invariants hold.

use proptest::prelude::*;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use tagged_errors::{
    Classification, ErrorFamily, ErrorRecord, Internal, MAX_FIELD_OUTPUT_LEN, RecordError, User,
    error_family,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub detail: String,
}

error_family! {
    #[derive(Clone, PartialEq)]
    pub enum SampleError in sample {
        internal {
            Hidden(Sample) {
                code: "SAMPLE_001",
                message: |p| format!("hidden: {}", p.detail),
            },
            Flaky {
                code: "SAMPLE_002",
                message: "flaky dependency",
                recoverable: true,
            },
        }
        user {
            Shown(Sample) {
                code: "SAMPLE_100",
                message: |p| format!("shown: {}", p.detail),
                user_message: |p| format!("Problem with {}", p.detail),
            },
        }
    }
}

fn hidden(detail: &str) -> SampleError {
    sample::Hidden.build(Sample { detail: detail.to_owned() })
}

// ============================================================================
// TRUNCATION PROPERTIES
// ============================================================================

proptest! {
    /// Log lines must always be valid UTF-8
    #[test]
    fn log_line_preserves_utf8(s in "\\PC*") {
        let err = hidden(&s);

        let mut buffer = String::new();
        err.view().write_to(&mut buffer).unwrap();

        assert!(std::str::from_utf8(buffer.as_bytes()).is_ok());
    }

    /// Log lines must be bounded regardless of message length
    #[test]
    fn log_line_is_bounded(s in "\\PC{0,10000}") {
        let err = sample::Shown.build(Sample { detail: s });

        let mut buffer = String::new();
        err.view().write_to(&mut buffer).unwrap();

        // two free-text fields plus fixed framing
        assert!(buffer.len() < MAX_FIELD_OUTPUT_LEN * 2 + 200);
    }
}

// ============================================================================
// CONSTRUCTION PROPERTIES
// ============================================================================

proptest! {
    /// Records can be created with arbitrary strings without panicking
    #[test]
    fn construction_never_panics(detail in "\\PC{0,1000}") {
        let _ = hidden(&detail);
        let _ = sample::Shown.build(Sample { detail });
    }

    /// Config is kept exactly as passed
    #[test]
    fn config_is_preserved(detail in "\\PC{0,200}") {
        let args = Sample { detail };
        let record = sample::Hidden.record(args.clone());
        prop_assert_eq!(record.config(), &args);
        prop_assert_eq!(record.into_config(), args);
    }

    /// Section decides classification, for any input
    #[test]
    fn classification_follows_section(detail in "\\PC{0,200}") {
        let internal = sample::Hidden.record(Sample { detail: detail.clone() });
        prop_assert_eq!(internal.classification(), Classification::Internal);
        prop_assert!(internal.view().user_message.is_none());

        let user = sample::Shown.record(Sample { detail: detail.clone() });
        prop_assert_eq!(user.classification(), Classification::User);
        prop_assert_eq!(user.user_message(), format!("Problem with {}", detail));
    }

    /// External display of an internal record is only its code
    #[test]
    fn external_display_leaks_nothing(detail in "\\PC{3,100}") {
        let err = hidden(&detail);
        prop_assert_eq!(err.to_string(), "internal error [SAMPLE_001]");
    }
}

// ============================================================================
// DISPATCH AND PROMOTION PROPERTIES
// ============================================================================

proptest! {
    /// Exactly one handler runs, and it is the one for the held variant
    #[test]
    fn dispatch_runs_one_handler(pick in 0usize..3, detail in "\\PC{0,50}") {
        let err = match pick {
            0 => hidden(&detail),
            1 => sample::Flaky.bare(),
            _ => sample::Shown.build(Sample { detail }),
        };

        let calls = Cell::new(0u32);
        let ran = err.dispatch(&sample::Handlers {
            Hidden: &|_| { calls.set(calls.get() + 1); "Hidden" },
            Flaky: &|_| { calls.set(calls.get() + 1); "Flaky" },
            Shown: &|_| { calls.set(calls.get() + 1); "Shown" },
        });

        prop_assert_eq!(calls.get(), 1);
        prop_assert_eq!(ran, err.variant_name());
    }

    /// Promotion sets the handler's message and leaves every other field alone
    #[test]
    fn promotion_keeps_fields(detail in "\\PC{0,100}", shown in "\\PC{1,100}") {
        let original: ErrorRecord<Sample, Internal> = sample::Hidden.record(Sample { detail });
        let promoted: ErrorRecord<Sample, User> = original.clone().promote(shown.clone());

        prop_assert_eq!(promoted.user_message(), shown.as_str());
        prop_assert_eq!(promoted.name(), original.name());
        prop_assert_eq!(promoted.code(), original.code());
        prop_assert_eq!(promoted.message(), original.message());
        prop_assert_eq!(promoted.config(), original.config());
        prop_assert_eq!(promoted.timestamp(), original.timestamp());
        prop_assert_eq!(promoted.recoverable(), original.recoverable());
    }

    /// User-facing records come back from promotion untouched
    #[test]
    fn promotion_is_identity_for_user_records(detail in "\\PC{0,100}") {
        let err = sample::Shown.build(Sample { detail });
        let SampleError::Shown(before) = err.clone() else {
            unreachable!();
        };

        let after = err.into_user_facing(&sample::Promotion {
            Hidden: &|_| String::from("never"),
            Flaky: &|_| String::from("never"),
        });

        let sample::UserFacing::Shown(after) = after else {
            panic!("variant changed during promotion");
        };
        prop_assert_eq!(after, before);
    }
}

// ============================================================================
// SERIALIZATION PROPERTIES
// ============================================================================

proptest! {
    /// Every field except cause survives JSON
    #[test]
    fn json_round_trip(detail in "\\PC{0,200}") {
        let record = sample::Shown.record(Sample { detail });
        let json = serde_json::to_string(&record).unwrap();
        let back: ErrorRecord<Sample, User> = sample::Shown
            .decode_record(&mut serde_json::Deserializer::from_str(&json))
            .unwrap();
        prop_assert_eq!(back, record);
    }

    /// A record decodes only through the variant that declared it
    #[test]
    fn json_rejects_foreign_variant(detail in "\\PC{0,50}") {
        let json = serde_json::to_value(sample::Hidden.record(Sample { detail })).unwrap();
        let err = sample::Shown.decode_record(json.clone()).unwrap_err();
        prop_assert!(err.to_string().contains("record"));
        let mut forged = json;
        forged["name"] = "Flaky".into();
        prop_assert!(sample::Hidden.decode_record(forged).is_err());
    }

    /// Unknown code strings never parse
    #[test]
    fn unknown_codes_rejected(code in "[A-Z_0-9]{1,12}") {
        prop_assume!(!sample::CODES.contains(&code.as_str()));
        let parsed = code.parse::<sample::Code>();
        prop_assert_eq!(parsed, Err(RecordError::UnknownCode(code)));
    }
}

// ============================================================================
// CONCURRENT PROPERTIES
// ============================================================================

proptest! {
    /// Constructors can be used from many threads at once
    #[test]
    fn concurrent_construction(
        thread_count in 1usize..8,
        errors_per_thread in 1usize..100,
    ) {
        let handles: Vec<_> = (0..thread_count)
            .map(|t| {
                std::thread::spawn(move || {
                    (0..errors_per_thread)
                        .map(|i| hidden(&format!("thread_{}_{}", t, i)))
                        .filter(|e| e.code() == "SAMPLE_001")
                        .count()
                })
            })
            .collect();

        for handle in handles {
            prop_assert_eq!(handle.join().unwrap(), errors_per_thread);
        }
    }
}

// ============================================================================
// UNICODE EDGE CASES
// ============================================================================

proptest! {
    /// Records handle various Unicode categories correctly
    #[test]
    fn unicode_categories_handled(
        ascii in "[a-zA-Z0-9 ]{0,100}",
        cyrillic in "[а-яА-Я ]{0,100}",
        chinese in "[\\u{4E00}-\\u{9FFF}]{0,100}",
    ) {
        let mixed = format!("{} {} {}", ascii, cyrillic, chinese);
        let err = sample::Shown.build(Sample { detail: mixed.clone() });

        let mut buffer = String::new();
        err.view().write_to(&mut buffer).unwrap();

        assert!(std::str::from_utf8(buffer.as_bytes()).is_ok());
        prop_assert_eq!(err.to_string(), format!("Problem with {}", mixed));
    }
}
