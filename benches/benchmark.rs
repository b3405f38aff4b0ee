//! Performance benchmarks for web2md.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Extraction and conversion of a small synthetic article
//! - Synthetic articles of growing size to show how extraction scales

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use web2md::{extract_content, format_document, html_to_markdown};

const URL: &str = "https://example.com/sample";

const SAMPLE_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Article</title>
    <meta name="author" content="John Doe">
    <meta property="article:published_time" content="2024-02-01">
</head>
<body>
    <nav>
        <a href="/">Home</a>
        <a href="/about">About</a>
    </nav>
    <article>
        <h1>Sample Article Title</h1>
        <p>This is the first paragraph of the article. It contains some meaningful
        content that should survive extraction and end up in the Markdown output.</p>
        <p>Here is a second paragraph with more content. The extraction should
        preserve the text while removing navigation and other boilerplate.</p>
        <table>
            <tr><th>Step</th><th>Duration</th></tr>
            <tr><td>Fetch</td><td>120 ms</td></tr>
            <tr><td>Extract</td><td>4 ms</td></tr>
        </table>
        <p>A third paragraph ensures we have enough content for meaningful
        benchmarking of the <a href="/docs">conversion</a> performance.</p>
    </article>
    <aside>
        <h3>Related Articles</h3>
        <ul>
            <li>Related article 1</li>
            <li>Related article 2</li>
        </ul>
    </aside>
    <footer>
        <p>Copyright 2024</p>
    </footer>
</body>
</html>
"#;

fn bench_extract(c: &mut Criterion) {
    c.bench_function("extract_content", |b| {
        b.iter(|| extract_content(black_box(SAMPLE_HTML), black_box(URL)));
    });
}

fn bench_convert(c: &mut Criterion) {
    let Ok(content) = extract_content(SAMPLE_HTML, URL) else {
        return;
    };

    c.bench_function("html_to_markdown", |b| {
        b.iter(|| html_to_markdown(black_box(content.body())));
    });

    c.bench_function("format_document_with_metadata", |b| {
        b.iter(|| format_document(black_box(&content), true));
    });
}

/// Articles with a growing number of paragraphs
fn bench_article_sizes(c: &mut Criterion) {
    let paragraph = "<p>Long form articles repeat paragraphs like this one, each with \
        enough words to count as real content for the extractor.</p>";

    let mut group = c.benchmark_group("article_size");

    for count in [10_usize, 100, 1000] {
        let html = format!(
            "<html><head><title>Long read</title></head><body><nav>Menu</nav>\
             <article>{}</article><footer>Footer</footer></body></html>",
            paragraph.repeat(count)
        );
        let size_kb = html.len() / 1024;
        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("extract", format!("{count} paragraphs ({size_kb}KB)")),
            &html,
            |b, html| {
                b.iter(|| extract_content(black_box(html), URL));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extract, bench_convert, bench_article_sizes);
criterion_main!(benches);
