// benches/record_performance.rs
//! Benchmarks for record construction, dispatch, promotion and logging.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use serde::Serialize;
use std::fmt::Write;
use tagged_errors::{ErrorFamily, MAX_FIELD_OUTPUT_LEN, error_family};

#[derive(Debug, Clone, Serialize)]
pub struct RequestArgs {
    pub path: String,
}

error_family! {
    pub enum BenchError in bench_errors {
        internal {
            Backend(RequestArgs) {
                code: "BENCH_001",
                message: |a| format!("backend failed for {}", a.path),
            },
            Static {
                code: "BENCH_002",
                message: "static failure",
            },
        }
        user {
            NotFound(RequestArgs) {
                code: "BENCH_404",
                message: |a| format!("no route for {}", a.path),
                user_message: "Page not found.",
            },
        }
    }
}

fn backend() -> BenchError {
    bench_errors::Backend.build(RequestArgs { path: "/api/v1/users".into() })
}

// ============================================================================
// CONSTRUCTION BENCHMARKS
// ============================================================================

fn bench_construct_literal(c: &mut Criterion) {
    c.bench_function("construct_literal_template", |b| {
        b.iter(|| black_box(bench_errors::Static.bare()))
    });
}

fn bench_construct_rendered(c: &mut Criterion) {
    c.bench_function("construct_rendered_template", |b| {
        b.iter(|| black_box(backend()))
    });
}

fn bench_construct_user(c: &mut Criterion) {
    c.bench_function("construct_user_record", |b| {
        b.iter(|| {
            black_box(bench_errors::NotFound.build(RequestArgs { path: "/missing".into() }))
        })
    });
}

fn bench_construct_with_cause(c: &mut Criterion) {
    c.bench_function("construct_with_cause", |b| {
        b.iter(|| {
            let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
            black_box(bench_errors::Static.bare_with_cause(io_err))
        })
    });
}

// ============================================================================
// DISPATCH AND PROMOTION BENCHMARKS
// ============================================================================

fn bench_dispatch(c: &mut Criterion) {
    let err = backend();
    let handlers = bench_errors::Handlers {
        Backend: &|_| 502u16,
        Static: &|_| 500u16,
        NotFound: &|_| 404u16,
    };
    c.bench_function("dispatch", |b| {
        b.iter(|| black_box(black_box(&err).dispatch(&handlers)))
    });
}

fn bench_promotion(c: &mut Criterion) {
    let promotion = bench_errors::Promotion {
        Backend: &|_| String::from("Please try again."),
        Static: &|_| String::from("Please try again."),
    };
    c.bench_function("promote_internal", |b| {
        b.iter_batched(
            backend,
            |err| black_box(err.into_user_facing(&promotion)),
            criterion::BatchSize::SmallInput,
        )
    });
}

// ============================================================================
// LOGGING BENCHMARKS
// ============================================================================

fn bench_view_write(c: &mut Criterion) {
    let err = backend();
    let mut buffer = String::with_capacity(256);
    c.bench_function("view_write_to", |b| {
        b.iter(|| {
            buffer.clear();
            err.view().write_to(&mut buffer).unwrap();
            black_box(buffer.len())
        })
    });
}

fn bench_view_fields(c: &mut Criterion) {
    let err = backend();
    c.bench_function("view_fields", |b| {
        b.iter(|| black_box(err.view().fields().len()))
    });
}

fn bench_log_truncation(c: &mut Criterion) {
    let mut group = c.benchmark_group("log_truncation");
    for size in [64, MAX_FIELD_OUTPUT_LEN, MAX_FIELD_OUTPUT_LEN * 8] {
        let err = bench_errors::Backend.build(RequestArgs { path: "x".repeat(size) });
        group.bench_with_input(BenchmarkId::from_parameter(size), &err, |b, err| {
            let mut buffer = String::new();
            b.iter(|| {
                buffer.clear();
                err.view().write_to(&mut buffer).unwrap();
                black_box(buffer.len())
            })
        });
    }
    group.finish();
}

// ============================================================================
// DISPLAY AND SERIALIZATION BENCHMARKS
// ============================================================================

fn bench_external_display(c: &mut Criterion) {
    let err = backend();
    let mut buffer = String::with_capacity(64);
    c.bench_function("external_display", |b| {
        b.iter(|| {
            buffer.clear();
            write!(buffer, "{}", err).unwrap();
            black_box(buffer.len())
        })
    });
}

fn bench_json(c: &mut Criterion) {
    let err = backend();
    c.bench_function("serialize_json", |b| {
        b.iter(|| black_box(serde_json::to_vec(&err).unwrap()))
    });
}

fn bench_code_parse(c: &mut Criterion) {
    c.bench_function("code_parse", |b| {
        b.iter(|| black_box("BENCH_404".parse::<bench_errors::Code>()))
    });
}

// ============================================================================
// BENCHMARK GROUPS
// ============================================================================

criterion_group!(
    creation_benches,
    bench_construct_literal,
    bench_construct_rendered,
    bench_construct_user,
    bench_construct_with_cause,
);

criterion_group!(dispatch_benches, bench_dispatch, bench_promotion);

criterion_group!(
    logging_benches,
    bench_view_write,
    bench_view_fields,
    bench_log_truncation,
);

criterion_group!(
    display_benches,
    bench_external_display,
    bench_json,
    bench_code_parse,
);

criterion_main!(
    creation_benches,
    dispatch_benches,
    logging_benches,
    display_benches,
);
