// Copyright 2025 the Cartory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use cartory_geo::geo_types::{LineString, Polygon};
use cartory_geo::{Feature, Geometry, SPHERE, Topology, lon_lat};
use cartory_projection::{PathGenerator, Projection, ProjectionKind};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

/// Square cells of `step` degrees covering the globe, each edge sampled with
/// `per_edge` positions.
fn grid_world(step: usize, per_edge: usize) -> Vec<Feature> {
    let mut features = Vec::new();
    for lon in (0..360).step_by(step) {
        for lat in (0..170).step_by(step) {
            let x0 = lon as f64 - 180.0;
            let y0 = lat as f64 - 85.0;
            let d = step as f64;
            let mut ring = Vec::with_capacity(per_edge * 4 + 1);
            for (ax, ay, bx, by) in [
                (x0, y0, x0 + d, y0),
                (x0 + d, y0, x0 + d, y0 + d),
                (x0 + d, y0 + d, x0, y0 + d),
                (x0, y0 + d, x0, y0),
            ] {
                for i in 0..per_edge {
                    let t = i as f64 / per_edge as f64;
                    ring.push(lon_lat(ax + (bx - ax) * t, ay + (by - ay) * t));
                }
            }
            ring.push(lon_lat(x0, y0));
            features.push(Feature {
                geometry: Geometry::Shape(Polygon::new(LineString::new(ring), vec![]).into()),
                ..Feature::default()
            });
        }
    }
    features
}

fn grid_topology(step: i64) -> Value {
    let mut arcs = Vec::new();
    let mut geometries = Vec::new();
    for lon in (-180..180).step_by(step as usize) {
        for lat in (-80..80).step_by(step as usize) {
            arcs.push(json!([
                [lon, lat],
                [lon + step, lat],
                [lon + step, lat + step],
                [lon, lat + step],
                [lon, lat]
            ]));
            let index = arcs.len() - 1;
            geometries.push(json!({
                "type": "Polygon",
                "arcs": [[index]],
                "properties": { "name": format!("{lon}/{lat}"), "subunit": format!("C{index}") }
            }));
        }
    }
    json!({
        "type": "Topology",
        "arcs": arcs,
        "objects": { "countries": { "type": "GeometryCollection", "geometries": geometries } }
    })
}

fn bench_fit_width(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection/fit_width");
    for kind in ProjectionKind::ALL {
        group.bench_function(BenchmarkId::from_parameter(kind.name()), |b| {
            b.iter(|| black_box(Projection::new(kind).fit_width(black_box(960.0), &SPHERE)));
        });
    }
    group.finish();
}

fn bench_world_paths(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection/world_paths");
    let world = grid_world(10, 16);
    let positions: usize = world.iter().map(|f| f.geometry.position_count()).sum();
    group.throughput(Throughput::Elements(positions as u64));
    for kind in [
        ProjectionKind::Equirectangular,
        ProjectionKind::NaturalEarth2,
        ProjectionKind::Mollweide,
    ] {
        let paths = PathGenerator::new(Projection::new(kind).fit_width(960.0, &SPHERE));
        group.bench_with_input(
            BenchmarkId::new("path", kind.name()),
            &world,
            |b, world| {
                b.iter(|| {
                    for feature in world {
                        black_box(paths.path(&feature.geometry));
                    }
                });
            },
        );
        group.bench_with_input(
            BenchmarkId::new("bounds", kind.name()),
            &world,
            |b, world| {
                b.iter(|| {
                    for feature in world {
                        black_box(paths.bounds(&feature.geometry));
                    }
                });
            },
        );
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("topology/decode");
    for step in [20, 10, 5] {
        let value = grid_topology(step);
        let text = value.to_string();
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(step), &text, |b, text| {
            b.iter(|| {
                let topology = Topology::from_json(text).unwrap();
                black_box(topology.features("countries").unwrap());
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit_width, bench_world_paths, bench_decode);
criterion_main!(benches);
