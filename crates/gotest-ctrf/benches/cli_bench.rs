// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use gotest_ctrf::config::Config;
use gotest_ctrf::run::execute;

/// A `go test -json` stream of `n` passing tests with one line of output each
fn sample_stream(n: usize) -> String {
    let mut stream = String::new();
    for i in 0..n {
        stream.push_str(&format!(
            r#"{{"Time":"2025-03-02T10:00:00Z","Action":"run","Package":"example.com/bench","Test":"TestCase{i}"}}"#
        ));
        stream.push('\n');
        stream.push_str(&format!(
            r#"{{"Time":"2025-03-02T10:00:00Z","Action":"output","Package":"example.com/bench","Test":"TestCase{i}","Output":"--- PASS: TestCase{i} (0.00s)\n"}}"#
        ));
        stream.push('\n');
        stream.push_str(&format!(
            r#"{{"Time":"2025-03-02T10:00:00Z","Action":"pass","Package":"example.com/bench","Test":"TestCase{i}","Elapsed":0.002}}"#
        ));
        stream.push('\n');
    }
    stream
}

fn pipeline_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    let to_stdout = Config {
        output: "-".into(),
        no_enrich: true,
        quiet: true,
        ..Default::default()
    };

    for size in [100, 1_000, 10_000] {
        let stream = sample_stream(size);
        group.bench_with_input(BenchmarkId::new("execute_to_buffer", size), &stream, |b, stream| {
            b.iter(|| {
                let mut stdout = Vec::with_capacity(stream.len());
                let mut stderr = Vec::new();
                execute(&to_stdout, stream.as_bytes(), &mut stdout, &mut stderr).expect("execute")
            })
        });
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let to_file = Config {
        output: dir.path().join("ctrf-report.json"),
        no_enrich: true,
        quiet: true,
        ..Default::default()
    };
    let stream = sample_stream(1_000);
    group.bench_function("execute_to_file_1000", |b| {
        b.iter(|| {
            execute(&to_file, stream.as_bytes(), &mut std::io::sink(), &mut std::io::sink())
                .expect("execute")
        })
    });

    group.finish();
}

criterion_group!(benches, pipeline_benchmarks);
criterion_main!(benches);
