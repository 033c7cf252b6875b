//! Decoding benchmarks for HSQ containers and the formats stored in them
//!
//! Run with `cargo bench -p arrakis-benches`.

use std::hint::black_box;

use arrakis_benches::{compress, generate_image_like, generate_sprite_sheet, sizes};
use arrakis_types::file::{
	hsq::{Container, LoadMode, decompress},
	palette::Palette,
	spr::{AnimationDialect, File as SprFile},
};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// Benchmark raw bitstream decompression across payload sizes
fn bench_hsq_decompress(c: &mut Criterion) {
	let mut group = c.benchmark_group("hsq_decompress");

	for size in [sizes::SMALL, sizes::MEDIUM, sizes::LARGE] {
		let packed = compress(&generate_image_like(size));
		let stream = packed[6..].to_vec();

		group.throughput(Throughput::Bytes(size as u64));
		group.bench_with_input(BenchmarkId::from_parameter(size), &stream, |b, stream| {
			b.iter(|| black_box(decompress(black_box(stream)).unwrap()));
		});
	}

	group.finish();
}

/// Benchmark the full container path: header check, decompression, size check
fn bench_container_load(c: &mut Criterion) {
	let mut group = c.benchmark_group("hsq_container");

	let data = generate_image_like(sizes::LARGE);
	let packed = compress(&data);

	group.throughput(Throughput::Bytes(data.len() as u64));
	group.bench_function("load_packed", |b| {
		b.iter(|| black_box(Container::load(black_box(&packed)).unwrap()));
	});
	group.bench_function("load_raw", |b| {
		b.iter(|| black_box(Container::load_with(black_box(&data), LoadMode::Raw).unwrap()));
	});

	group.finish();
}

/// Benchmark sprite sheet decoding, packed and unpacked
fn bench_sprite_decode(c: &mut Criterion) {
	let mut group = c.benchmark_group("spr_decode");

	for (frames, width, height) in [(8, 32, 32), (32, 64, 48), (16, 96, 64)] {
		let sheet = generate_sprite_sheet(frames, width, height);
		let packed = compress(&sheet);
		let label = format!("{frames}x{width}x{height}");

		group.throughput(Throughput::Bytes(sheet.len() as u64));
		group.bench_with_input(BenchmarkId::new("unpacked", &label), &sheet, |b, sheet| {
			b.iter(|| {
				black_box(SprFile::from_unpacked(black_box(sheet), &AnimationDialect::Generic).unwrap())
			});
		});
		group.bench_with_input(BenchmarkId::new("packed", &label), &packed, |b, packed| {
			b.iter(|| {
				black_box(SprFile::from_bytes(black_box(packed), &AnimationDialect::Generic).unwrap())
			});
		});
	}

	group.finish();
}

/// Benchmark indexed to RGBA conversion of decoded frames
fn bench_frame_to_rgba(c: &mut Criterion) {
	let mut group = c.benchmark_group("spr_to_rgba");

	let sheet = generate_sprite_sheet(16, 96, 64);
	let sprite = SprFile::from_unpacked(&sheet, &AnimationDialect::Generic).unwrap();
	let palette = Palette::grayscale();
	let pixels: usize = sprite.frames().iter().map(|f| f.pixels().len()).sum();

	group.throughput(Throughput::Elements(pixels as u64));
	group.bench_function("all_frames", |b| {
		b.iter(|| {
			for frame in sprite.frames() {
				black_box(frame.to_rgba(black_box(&palette)));
			}
		});
	});

	group.finish();
}

criterion_group!(
	benches,
	bench_hsq_decompress,
	bench_container_load,
	bench_sprite_decode,
	bench_frame_to_rgba
);
criterion_main!(benches);
