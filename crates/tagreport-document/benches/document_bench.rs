// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for report synthesis in the tagreport-document crate.
// Covers the text-only path and the JPEG passthrough path; the image is
// generated in memory so the benchmark needs no fixtures on disk.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use tagreport_core::ReportRequest;
use tagreport_document::ReportBuilder;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Text-only report with enough tags to hit the bottom-of-page truncation.
fn bench_text_report(c: &mut Criterion) {
    let builder = ReportBuilder::default();
    let tags: Vec<String> = (0..80).map(|i| format!("Tag number {i}")).collect();
    let request = ReportRequest::new("Pattern Report").with_tags(tags);

    c.bench_function("text report (80 tags)", |b| {
        b.iter(|| black_box(builder.render_pdf(black_box(&request)).unwrap()));
    });
}

/// Report embedding an 800x600 JPEG, which is passed through untouched.
fn bench_jpeg_report(c: &mut Criterion) {
    let img = RgbImage::from_fn(800, 600, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 64])
    });
    let mut jpeg = Vec::new();
    img.write_with_encoder(JpegEncoder::new_with_quality(&mut jpeg, 80))
        .unwrap();

    let builder = ReportBuilder::default();
    let request = ReportRequest::new("Pattern Report")
        .with_tags(["Red", "Green", "Blue"])
        .with_image_bytes(jpeg);

    c.bench_function("jpeg report (800x600)", |b| {
        b.iter(|| black_box(builder.render_pdf(black_box(&request)).unwrap()));
    });
}

criterion_group!(benches, bench_text_report, bench_jpeg_report);
criterion_main!(benches);
