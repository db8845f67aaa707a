//! Benchmarks for the per-frame simulator and rasteriser work.
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use driftfield::prelude::*;

const FRAME_MS: f32 = 1000.0 / 60.0;

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_update");

    for count in [25_usize, 50, 100] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let config = FieldConfig::default().with_max_particles(count);
            let mut field = ParticleField::seeded(config, 1);
            field.resize(1920.0, 1080.0);
            let pointer = Some(Vec2::new(960.0, 540.0));

            b.iter(|| field.update(black_box(FRAME_MS), pointer, black_box(250.0)))
        });
    }

    group.finish();
}

fn bench_connections(c: &mut Criterion) {
    let mut group = c.benchmark_group("connections");

    for count in [25_usize, 50, 100] {
        group.bench_with_input(BenchmarkId::new("particles", count), &count, |b, &count| {
            let config = FieldConfig::default().with_max_particles(count);
            let mut field = ParticleField::seeded(config, 1);
            field.resize(1920.0, 1080.0);

            b.iter(|| black_box(field.connections(Some(Vec2::new(960.0, 540.0)))))
        });
    }

    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");

    group.bench_function("draw_list_1080p", |b| {
        let mut field = ParticleField::seeded(FieldConfig::default(), 1);
        field.resize(1920.0, 1080.0);
        let mut canvas = DrawList::new();

        b.iter(|| {
            canvas.reset();
            field.render(&mut canvas, None);
            black_box(canvas.len())
        })
    });

    group.bench_function("pixels_720p", |b| {
        let config = FieldConfig::default();
        let mut field = ParticleField::seeded(config.clone(), 1);
        field.resize(1280.0, 720.0);
        let mut canvas = PixelCanvas::new(1280, 720, 1.0, config.background);

        b.iter(|| {
            field.render(&mut canvas, Some(Vec2::new(640.0, 360.0)));
            black_box(canvas.as_bytes().len())
        })
    });

    group.finish();
}

criterion_group!(benches, bench_update, bench_connections, bench_render);
criterion_main!(benches);
