// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartory_geo::geo_types::{LineString, Polygon};
use cartory_geo::{CountryProperties, Feature, Geometry};
use cartory_map::{Atlas, ProjectionConfig, WorldMap};
use cartory_zoom::{ScaleExtent, SurfaceId, ZoomController, ZoomTransform};
use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::Rect;

const FRAME_MS: u64 = 16;

fn atlas(count: usize) -> Atlas {
    let features = (0..count)
        .map(|i| {
            let lon = (i % 36) as f64 * 10.0 - 180.0;
            let lat = (i / 36 % 16) as f64 * 10.0 - 80.0;
            Feature {
                id: None,
                properties: CountryProperties {
                    name: format!("Cell {i}"),
                    subunit: format!("C{i}"),
                    ..CountryProperties::default()
                },
                geometry: Geometry::Shape(
                    Polygon::new(
                        LineString::from(vec![
                            (lon, lat),
                            (lon + 8.0, lat),
                            (lon + 8.0, lat + 8.0),
                            (lon, lat + 8.0),
                            (lon, lat),
                        ]),
                        vec![],
                    )
                    .into(),
                ),
            }
        })
        .collect();
    Atlas::from_features(features)
}

fn bench_transition_frames(c: &mut Criterion) {
    let surface = SurfaceId(1);
    let viewport = Rect::new(0.0, 0.0, 960.0, 500.0);
    let mut group = c.benchmark_group("zoom/transition");
    for (label, target) in [
        ("zoom_only", ZoomTransform::new(-3_840.0, -2_000.0, 9.0)),
        ("far_pan", ZoomTransform::new(-12_000.0, -500.0, 14.0)),
    ] {
        group.bench_function(BenchmarkId::from_parameter(label), |b| {
            b.iter_batched(
                || {
                    let mut zoom = ZoomController::new(ScaleExtent::new(1.0, 18.0));
                    zoom.attach(surface, viewport);
                    zoom
                },
                |mut zoom| {
                    zoom.transition_to(surface, target, 750, 0);
                    let mut now = 0;
                    while zoom.tick(now) {
                        now += FRAME_MS;
                    }
                    black_box(zoom.drain_events().count());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_map(c: &mut Criterion) {
    let mut group = c.benchmark_group("map");
    for count in [64, 256] {
        let atlas = atlas(count);
        group.bench_with_input(BenchmarkId::new("refit", count), &atlas, |b, atlas| {
            let mut map = WorldMap::new(atlas.clone(), ProjectionConfig::default()).unwrap();
            let mut width = 960.0;
            b.iter(|| {
                width = if width == 960.0 { 961.0 } else { 960.0 };
                black_box(map.set_container_width(width));
            });
        });
        group.bench_with_input(
            BenchmarkId::new("click_and_settle", count),
            &atlas,
            |b, atlas| {
                let mut map = WorldMap::new(atlas.clone(), ProjectionConfig::default()).unwrap();
                map.set_container_width(960.0);
                map.mount();
                let mut now = 0;
                let mut index = 0;
                b.iter(|| {
                    index = (index + 1) % count;
                    map.click_country(index, now).unwrap();
                    while map.tick(now) {
                        now += FRAME_MS;
                    }
                    black_box(map.transform());
                });
            },
        );
        group.bench_with_input(BenchmarkId::new("svg", count), &atlas, |b, atlas| {
            let mut map = WorldMap::new(atlas.clone(), ProjectionConfig::default()).unwrap();
            map.set_container_width(960.0);
            b.iter(|| black_box(map.to_svg()));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_transition_frames, bench_map);
criterion_main!(benches);
