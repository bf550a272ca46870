//! This bench builds the outline of a large, deeply nested document.

#![allow(missing_docs)]

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use heading_outline::{Heading, Level, MarkdownDocument, generate_toc};

/// Generates headings that repeatedly descend to `h6` and climb back to `h1`.
fn headings(count: usize) -> Vec<Heading> {
    let levels = (1..=6).chain((2..=5).rev()).cycle();
    levels
        .take(count)
        .enumerate()
        .map(|(i, level)| Heading::new(Level::new(level).unwrap(), format!("Section {i}")))
        .collect()
}

fn markdown(count: usize) -> String {
    headings(count)
        .iter()
        .map(|heading| {
            format!(
                "{} {}\n\nSome text.\n\n",
                "#".repeat(usize::from(heading.level.get())),
                heading.text
            )
        })
        .collect()
}

fn build_outline(c: &mut Criterion) {
    c.bench_function("build outline", |b| {
        b.iter_batched(
            || headings(10_000),
            |mut headings| generate_toc(&mut headings).unwrap(),
            BatchSize::LargeInput,
        );
    });

    let text = markdown(10_000);
    c.bench_function("parse and build markdown outline", |b| {
        b.iter(|| {
            let mut document = MarkdownDocument::parse(&text);
            generate_toc(&mut document).unwrap()
        });
    });
}

criterion_group!(benches, build_outline);
criterion_main!(benches);
