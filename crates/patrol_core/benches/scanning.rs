//! Benchmarks for the scanning engine.
//!
//! Run with: cargo bench -p `patrol_core`

#![expect(clippy::expect_used, reason = "benchmarks use expect for setup code")]

use std::hint::black_box;
use std::path::Path;

use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use patrol_core::binary::is_binary_sample;
use patrol_core::prelude::*;

/// Sample content with no matches (common case).
const CLEAN_CODE: &str = r"
function main() {
    const config = loadConfig('settings.json');
    const server = createServer(config.host, config.port);
    server.listen();
}
";

/// Sample content with several matching lines.
const RISKY_CODE: &str = r#"
function run(input) {
    const password = "hunter2";
    document.body.innerHTML = input;
    return eval(input);
}
"#;

fn patterns() -> Vec<Pattern> {
    vec![
        Pattern::new("eval-use", r"\beval\s*\(", "Use of eval"),
        Pattern::new("hardcoded-password", r#"(?i)password\s*[:=]\s*["'][^"']+["']"#, "Hardcoded password"),
        Pattern::new("inner-html", r"\.innerHTML\s*=", "Assignment to innerHTML"),
        Pattern::new("shell-exec", r"\b(exec|execSync|spawn)\s*\(", "Shell command execution"),
    ]
}

fn bench_scanner_creation(c: &mut Criterion) {
    let patterns = patterns();
    c.bench_function("scanner_creation", |b| {
        b.iter(|| {
            let scanner = Scanner::from_patterns(black_box(&patterns)).expect("valid patterns");
            black_box(scanner)
        });
    });
}

fn bench_scan_content(c: &mut Criterion) {
    let scanner = Scanner::from_patterns(&patterns()).expect("valid patterns");
    let path = Path::new("example.js");

    let mut group = c.benchmark_group("scan_content");

    for (name, content) in [("clean", CLEAN_CODE), ("risky", RISKY_CODE)] {
        group.throughput(Throughput::Bytes(content.len() as u64));
        group.bench_function(format!("{name}_small"), |b| {
            b.iter(|| black_box(scanner.scan_content(black_box(content), path)));
        });

        // Simulate a larger file by repeating content
        let large = content.repeat(1000);
        group.throughput(Throughput::Bytes(large.len() as u64));
        group.bench_function(format!("{name}_large"), |b| {
            b.iter(|| black_box(scanner.scan_content(black_box(&large), path)));
        });
    }

    group.finish();
}

fn bench_binary_sample(c: &mut Criterion) {
    let text = CLEAN_CODE.repeat(20);
    c.bench_function("binary_sample_text", |b| {
        b.iter(|| black_box(is_binary_sample(black_box(&text))));
    });
}

criterion_group!(benches, bench_scanner_creation, bench_scan_content, bench_binary_sample);
criterion_main!(benches);
