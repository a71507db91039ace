use criterion::{Criterion, criterion_group, criterion_main};
use markdown_cmark_engine::{Options, Parser, parse_document, render_html, render_xml};
mod common;

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parsing");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("parse_document", |b| {
        b.iter(|| {
            let tree = parse_document(std::hint::black_box(&content), Options::DEFAULT);
            std::hint::black_box(tree);
        });
    });

    group.bench_function("streaming_4k_chunks", |b| {
        b.iter(|| {
            let mut parser = Parser::default();
            let bytes = content.as_bytes();
            let mut start = 0;
            while start < bytes.len() {
                let mut end = (start + 4096).min(bytes.len());
                while !content.is_char_boundary(end) {
                    end += 1;
                }
                parser.feed(&content[start..end]).unwrap();
                start = end;
            }
            std::hint::black_box(parser.finish().unwrap());
        });
    });

    group.bench_function("pulldown_cmark_baseline", |b| {
        b.iter(|| {
            let parser = pulldown_cmark::Parser::new(std::hint::black_box(&content));
            let events: Vec<_> = parser.collect();
            std::hint::black_box(events);
        });
    });

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("rendering");
    group.sample_size(10);

    let content = common::generate_large_document();
    let tree = parse_document(&content, Options::DEFAULT);
    group.bench_function("html", |b| {
        b.iter(|| std::hint::black_box(render_html(&tree, tree.root(), Options::DEFAULT)));
    });
    group.bench_function("xml", |b| {
        b.iter(|| std::hint::black_box(render_xml(&tree, tree.root(), Options::SOURCEPOS)));
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_render);
criterion_main!(benches);
