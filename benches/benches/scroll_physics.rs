// Copyright 2025 the Greenhouse Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use greenhouse_scroll::config::{ScrollAxes, ScrollConfig};
use greenhouse_scroll::physics::{Deceleration, resist};
use kurbo::Vec2;

fn bench_resistance(c: &mut Criterion) {
    c.bench_function("resist_sweep_1k", |b| {
        b.iter(|| {
            let mut acc = 0.0;
            for i in -500..500 {
                acc += resist(black_box(f64::from(i)), 100.0, 0.998, 320.0);
            }
            black_box(acc)
        });
    });
}

fn bench_deceleration(c: &mut Criterion) {
    let cfg = ScrollConfig::default();
    let mut group = c.benchmark_group("deceleration");
    for &(name, start, velocity) in &[
        ("in_bounds", 100.0, 40.0),
        ("overshoot", 950.0, 60.0),
        ("rebound", -80.0, -10.0),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut d = Deceleration::new(
                    Vec2::new(0.0, start),
                    Vec2::new(0.0, velocity),
                    Vec2::new(0.0, 1_000.0),
                    ScrollAxes::all(),
                );
                let mut ticks = 0_u32;
                while !d.step(cfg.tick, &cfg) {
                    ticks += 1;
                }
                black_box((ticks, d.offset()))
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_resistance, bench_deceleration);
criterion_main!(benches);
