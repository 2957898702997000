//! Benchmarks for the sampling and matching hot paths
//!
//! Run: cargo bench
//!
//! - Dominant-color voting over the still-image region
//! - Catalog ranking for one live tick
//! - Full still-image analysis at common photo sizes

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image::{Rgb, RgbImage};
use polish_match::{
    analyze_image,
    color::DominantColorExtractor,
    config::VotingConfig,
    matching::rank_matches,
    sampling::{Region, RegionSampler, SamplingPolicy},
    Catalog, CatalogEntry, Color, Frame, StillImageConfig,
};

fn create_test_frame(width: u32, height: u32, seed: u8) -> Frame {
    Frame::new(RgbImage::from_fn(width, height, |x, y| {
        let r = (x as u8).wrapping_add(seed).wrapping_mul(17);
        let g = (y as u8).wrapping_add(seed).wrapping_mul(31);
        let b = (x as u8).wrapping_add(y as u8).wrapping_add(seed);
        Rgb([r, g, b])
    }))
}

fn create_catalog(size: u64) -> Catalog {
    let entries = (0..size)
        .map(|i| CatalogEntry {
            id: i,
            name: format!("polish {}", i),
            brand: "bench".to_string(),
            collection: None,
            feature: None,
            level: "alto".to_string(),
            color: Color::new(
                (i * 37 % 256) as u8,
                (i * 91 % 256) as u8,
                (i * 53 % 256) as u8,
            ),
        })
        .collect();
    Catalog::new(entries).unwrap()
}

fn bench_dominant_vote(c: &mut Criterion) {
    let mut group = c.benchmark_group("dominant_vote");
    let frame = create_test_frame(200, 200, 7);

    for (width, height) in [(40, 80), (100, 100), (200, 200)] {
        group.throughput(Throughput::Elements(width as u64 * height as u64));
        let sampler = RegionSampler::new(SamplingPolicy::Fixed(Region::new(0, 0, width, height)));
        let extractor = DominantColorExtractor::new(VotingConfig::default());

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &frame,
            |b, frame| {
                b.iter(|| {
                    let sample = sampler.sample(black_box(frame)).unwrap();
                    black_box(extractor.vote(&sample).unwrap())
                })
            },
        );
    }
    group.finish();
}

fn bench_rank_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_matches");
    let color = Color::new(180, 40, 90);

    for size in [26u64, 500, 5000] {
        let catalog = create_catalog(size);
        group.throughput(Throughput::Elements(size));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| black_box(rank_matches(black_box(color), catalog, 4)))
        });
    }
    group.finish();
}

fn bench_analyze_image(c: &mut Criterion) {
    let mut group = c.benchmark_group("analyze_image");
    group.sample_size(20);
    let catalog = create_catalog(26);
    let config = StillImageConfig::default();

    for (width, height) in [(640, 480), (1920, 1080)] {
        let frame = create_test_frame(width, height, 42);
        group.throughput(Throughput::Elements(width as u64 * height as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", width, height)),
            &frame,
            |b, frame| b.iter(|| black_box(analyze_image(black_box(frame), &catalog, &config))),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_dominant_vote, bench_rank_matches, bench_analyze_image);
criterion_main!(benches);
