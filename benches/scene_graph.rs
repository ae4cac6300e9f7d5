use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::Vec3;
use scene_loop::camera::Projection;
use scene_loop::config::{CameraConfig, GroupConfig, MeshConfig, SceneConfig, TransformConfig};
use scene_loop::math::Color;
use scene_loop::renderer::FrameData;
use scene_loop::scene::{Geometry, Material, Motion, SceneBuilder};
use scene_loop::scenes::{lit_scene, tabletop_scene};

/// A grid of `count` spinning boxes spread over `count / 10 + 1` groups
fn crowded_scene(count: usize) -> SceneConfig {
    let camera = CameraConfig {
        projection: Projection::Perspective { fov_y_degrees: 60.0, near: 0.1, far: 500.0 },
        position: Vec3::new(0.0, 20.0, 40.0),
        look_at: None,
    };
    let mut config = SceneConfig::new("crowd", camera);
    for g in 0..count / 10 + 1 {
        config = config.with_group(GroupConfig {
            name: format!("row{g}"),
            parent: None,
            transform: TransformConfig::at(Vec3::new(0.0, 0.0, g as f32 * 2.0)),
        });
    }
    for i in 0..count {
        let name = format!("box{i}");
        config = config
            .with_mesh(
                MeshConfig::new(
                    name.clone(),
                    Geometry::Box { width: 1.0, height: 1.0, depth: 1.0 },
                    Material::lambert(Color::from_hex(0xff6347)),
                )
                .under(format!("row{}", i / 10))
                .with_transform(TransformConfig::at(Vec3::new((i % 10) as f32 * 2.0, 0.0, 0.0))),
            )
            .with_motion(name, Motion::Spin { axis: Vec3::Y, rate: 1.0 });
    }
    config
}

fn bench_tessellation(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessellation");
    for segments in [16u32, 64, 256] {
        group.bench_with_input(BenchmarkId::new("sphere", segments), &segments, |b, &s| {
            let sphere = Geometry::Sphere { radius: 1.0, width_segments: s, height_segments: s / 2 };
            b.iter(|| black_box(sphere.tessellate()));
        });
        group.bench_with_input(BenchmarkId::new("torus", segments), &segments, |b, &s| {
            let torus = Geometry::Torus { radius: 1.0, tube: 0.3, radial_segments: s / 4, tubular_segments: s };
            b.iter(|| black_box(torus.tessellate()));
        });
    }
    group.finish();
}

fn bench_frame_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame_update");
    for count in [10usize, 100, 1000] {
        let mut scene = SceneBuilder::build(&crowded_scene(count)).unwrap();
        let mut t = 0.0f32;
        group.bench_with_input(BenchmarkId::new("motions", count), &count, |b, _| {
            b.iter(|| {
                t += 1.0 / 60.0;
                scene.apply_motions(black_box(t));
            });
        });

        let scene = SceneBuilder::build(&crowded_scene(count)).unwrap();
        group.bench_with_input(BenchmarkId::new("world_matrices", count), &count, |b, _| {
            b.iter(|| black_box(scene.graph().world_matrices()));
        });
        group.bench_with_input(BenchmarkId::new("collect_frame", count), &count, |b, _| {
            b.iter(|| black_box(FrameData::collect(&scene).unwrap()));
        });
    }
    group.finish();
}

fn bench_presets(c: &mut Criterion) {
    c.bench_function("build_tabletop", |b| {
        let config = tabletop_scene();
        b.iter(|| black_box(SceneBuilder::build(&config).unwrap()));
    });
    c.bench_function("build_lit", |b| {
        let config = lit_scene();
        b.iter(|| black_box(SceneBuilder::build(&config).unwrap()));
    });
}

criterion_group!(benches, bench_tessellation, bench_frame_update, bench_presets);
criterion_main!(benches);
