// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for the geometric transforms in bildwerk-imaging.
// Rotation and skew both warp the full canvas with bilinear sampling, which
// dominates the cost of the Rotate and Skew tabs.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use image::{DynamicImage, Rgb, RgbImage};

use bildwerk_core::SkewFactors;
use bildwerk_imaging::ImageProcessor;

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// A 512x512 synthetic photo: a colour gradient with a bright square.
fn synthetic(size: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(RgbImage::from_fn(size, size, |x, y| {
        if (size / 4..size / 2).contains(&x) && (size / 4..size / 2).contains(&y) {
            Rgb([250, 250, 250])
        } else {
            Rgb([(x % 256) as u8, (y % 256) as u8, 96])
        }
    }))
}

fn bench_rotate(c: &mut Criterion) {
    let img = synthetic(512);
    c.bench_function("rotate 33deg (512x512)", |b| {
        b.iter(|| {
            let out = ImageProcessor::from_dynamic(black_box(img.clone())).rotate(33.0);
            black_box(out.into_dynamic());
        });
    });
}

fn bench_skew(c: &mut Criterion) {
    let img = synthetic(512);
    c.bench_function("skew 25%/-10% (512x512)", |b| {
        b.iter(|| {
            let out = ImageProcessor::from_dynamic(black_box(img.clone()))
                .skew(SkewFactors::new(25.0, -10.0));
            black_box(out.map(ImageProcessor::into_dynamic).ok());
        });
    });
}

criterion_group!(benches, bench_rotate, bench_skew);
criterion_main!(benches);
