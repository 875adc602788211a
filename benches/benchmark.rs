//! Benchmarks for textshard splitting operations.
//!
//! Run with: `cargo bench`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use textshard::{ChunkConfig, CodeSplitter, MarkdownSplitter, TextSplitter};

fn sample_text(paragraphs: usize) -> String {
    let paragraph = "The quick brown fox jumps over the lazy dog. \
        Pack my box with five dozen liquor jugs. \
        How vexingly quick daft zebras jump!\n\n";
    paragraph.repeat(paragraphs)
}

fn sample_markdown(sections: usize) -> String {
    let section = "## Section\n\nA paragraph of body text that runs on for a while \
        before ending. Another sentence follows it.\n\n- one list item\n- another list item\n\n";
    section.repeat(sections)
}

/// Benchmark plain-text splitting across document sizes.
fn bench_text_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("text_splitter");

    for paragraphs in [10, 100, 1000] {
        let text = sample_text(paragraphs);
        let splitter = TextSplitter::new(ChunkConfig::new(200));

        group.bench_with_input(
            BenchmarkId::new("chunks", text.len()),
            &text,
            |b, text| b.iter(|| std::hint::black_box(splitter.chunks(text).count())),
        );
    }

    group.finish();
}

/// Benchmark Markdown splitting across document sizes.
fn bench_markdown_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("markdown_splitter");

    for sections in [10, 100] {
        let doc = sample_markdown(sections);
        let splitter = MarkdownSplitter::new(ChunkConfig::new(200));

        group.bench_with_input(BenchmarkId::new("chunks", doc.len()), &doc, |b, doc| {
            b.iter(|| std::hint::black_box(splitter.chunks(doc).count()))
        });
    }

    group.finish();
}

/// Benchmark syntax-aware splitting of Rust source.
fn bench_code_splitter(c: &mut Criterion) {
    let mut group = c.benchmark_group("code_splitter");

    let source = include_str!("../src/splitter/mod.rs");
    let splitter =
        CodeSplitter::new(tree_sitter_rust::LANGUAGE, ChunkConfig::new(500)).expect("valid language");

    group.bench_with_input(
        BenchmarkId::new("chunks", source.len()),
        &source,
        |b, source| b.iter(|| std::hint::black_box(splitter.chunks(source).count())),
    );

    group.finish();
}

criterion_group!(
    benches,
    bench_text_splitter,
    bench_markdown_splitter,
    bench_code_splitter
);
criterion_main!(benches);
