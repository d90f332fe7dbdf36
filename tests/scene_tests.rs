// Host-side tests for scene assembly, resource lifetime and the glow texture.
// The scene talks to a counting backend instead of the GPU.

#![allow(dead_code)]
mod color {
    include!("../src/color.rs");
}
mod config {
    include!("../src/config.rs");
}
mod constants {
    include!("../src/constants.rs");
}
mod geometry {
    include!("../src/geometry.rs");
}
mod glow {
    include!("../src/glow.rs");
}
mod particles {
    include!("../src/particles.rs");
}
mod picking {
    include!("../src/picking.rs");
}
mod resources {
    include!("../src/resources.rs");
}
mod scene {
    include!("../src/scene.rs");
}

use std::collections::HashSet;

use config::GlobeConfig;
use constants::*;
use geometry::MeshData;
use glam::{Vec2, Vec3};
use glow::{rasterize_radial, sample_gradient, GLOW_STOPS};
use resources::{
    MaterialDesc, MaterialKind, ResourceId, ResourceKind, ResourceLedger, SceneBackend,
    TextureData,
};
use color::srgb_hex_to_linear;
use scene::SceneGraph;

#[derive(Default)]
struct CountingBackend {
    next: u32,
    live: HashSet<ResourceId>,
    created: usize,
    released: Vec<ResourceId>,
    double_releases: usize,
    instance_writes: usize,
    last_instances: Vec<[f32; 3]>,
    materials: Vec<MaterialDesc>,
}

impl CountingBackend {
    fn alloc(&mut self, kind: ResourceKind) -> ResourceId {
        let id = ResourceId {
            kind,
            index: self.next,
        };
        self.next += 1;
        self.created += 1;
        self.live.insert(id);
        id
    }

    fn live_of(&self, kind: ResourceKind) -> usize {
        self.live.iter().filter(|id| id.kind == kind).count()
    }
}

impl SceneBackend for CountingBackend {
    fn create_geometry(&mut self, _label: &str, mesh: &MeshData) -> ResourceId {
        assert!(!mesh.indices.is_empty());
        self.alloc(ResourceKind::Geometry)
    }

    fn create_instanced_geometry(
        &mut self,
        label: &str,
        mesh: &MeshData,
        _capacity: usize,
    ) -> ResourceId {
        self.create_geometry(label, mesh)
    }

    fn create_material(&mut self, _label: &str, desc: &MaterialDesc) -> ResourceId {
        if let Some(tex) = desc.texture {
            assert!(self.live.contains(&tex), "material references a dead texture");
        }
        self.materials.push(desc.clone());
        self.alloc(ResourceKind::Material)
    }

    fn create_texture(&mut self, _label: &str, data: &TextureData) -> ResourceId {
        assert_eq!(data.pixels.len(), (data.width * data.height * 4) as usize);
        self.alloc(ResourceKind::Texture)
    }

    fn write_instances(&mut self, geometry: ResourceId, positions: &[[f32; 3]]) {
        assert!(self.live.contains(&geometry));
        self.instance_writes += 1;
        self.last_instances = positions.to_vec();
    }

    fn release(&mut self, id: ResourceId) {
        if !self.live.remove(&id) {
            self.double_releases += 1;
        }
        self.released.push(id);
    }
}

fn build(backend: &mut CountingBackend) -> SceneGraph {
    SceneGraph::build(backend, &GlobeConfig::default())
}

fn count(scene: &SceneGraph, kind: MaterialKind) -> usize {
    scene.nodes().iter().filter(|n| n.kind == kind).count()
}

#[test]
fn full_scene_has_every_element() {
    let mut backend = CountingBackend::default();
    let scene = build(&mut backend);

    assert_eq!(count(&scene, MaterialKind::Core), 1);
    assert_eq!(count(&scene, MaterialKind::Halo), 1);
    assert_eq!(count(&scene, MaterialKind::Glow), 1);
    assert_eq!(count(&scene, MaterialKind::Ring), RING_RADII.len());
    assert_eq!(count(&scene, MaterialKind::Filament), FILAMENT_COUNT);
    assert_eq!(count(&scene, MaterialKind::Nucleus), 1);
    assert_eq!(count(&scene, MaterialKind::Particles), 1);
    assert_eq!(scene.nodes().len(), 14);
    assert_eq!(
        scene.particles().map(|p| p.len()),
        Some(PARTICLE_COUNT)
    );

    // Every allocation is tracked for teardown
    assert_eq!(scene.ledger().len(), backend.live.len());
    assert_eq!(scene.ledger().count(ResourceKind::Texture), 1);
    assert_eq!(
        scene.ledger().count(ResourceKind::Geometry),
        backend.live_of(ResourceKind::Geometry)
    );
}

#[test]
fn particle_positions_are_uploaded_at_build() {
    let mut backend = CountingBackend::default();
    let scene = build(&mut backend);
    assert_eq!(backend.instance_writes, 1);
    assert_eq!(backend.last_instances.len(), PARTICLE_COUNT);
    assert_eq!(
        scene.particles().map(|p| p.positions().to_vec()),
        Some(backend.last_instances.clone())
    );
}

#[test]
fn decorations_off_builds_core_glow_and_halo_only() {
    let mut backend = CountingBackend::default();
    let config = GlobeConfig::default().with_decorations(false);
    let mut scene = SceneGraph::build(&mut backend, &config);
    assert_eq!(scene.nodes().len(), 3);
    assert!(scene.particles().is_none());
    assert_eq!(backend.instance_writes, 0);

    scene.animate(&mut backend, 1.0);
    scene.dispose(&mut backend);
    assert!(backend.live.is_empty());
}

#[test]
fn dispose_releases_everything_once() {
    let mut backend = CountingBackend::default();
    let mut scene = build(&mut backend);
    let created = backend.created;

    scene.dispose(&mut backend);
    assert!(backend.live.is_empty());
    assert_eq!(backend.released.len(), created);
    assert_eq!(backend.double_releases, 0);
    assert!(scene.ledger().is_empty());
    assert!(scene.nodes().is_empty());

    // A second dispose is a no-op
    scene.dispose(&mut backend);
    assert_eq!(backend.released.len(), created);
    assert_eq!(backend.double_releases, 0);
}

#[test]
fn repeated_mount_cycles_do_not_leak() {
    let mut backend = CountingBackend::default();
    let mut per_cycle = None;
    for _ in 0..5 {
        let before = backend.created;
        let mut scene = build(&mut backend);
        for frame in 0..10 {
            scene.apply_rotation(Vec2::new(0.01 * frame as f32, 0.02 * frame as f32));
            scene.animate(&mut backend, frame as f32 * CLOCK_STEP);
        }
        scene.dispose(&mut backend);
        assert!(backend.live.is_empty());

        let created = backend.created - before;
        assert_eq!(*per_cycle.get_or_insert(created), created);
    }
    assert_eq!(backend.double_releases, 0);
}

#[test]
fn textures_outlive_the_materials_that_use_them() {
    let mut backend = CountingBackend::default();
    let mut scene = build(&mut backend);
    scene.dispose(&mut backend);

    let texture_at = backend
        .released
        .iter()
        .position(|id| id.kind == ResourceKind::Texture);
    let last_material = backend
        .released
        .iter()
        .rposition(|id| id.kind == ResourceKind::Material);
    assert!(texture_at > last_material);
}

#[test]
fn ledger_releases_in_reverse_order() {
    let mut backend = CountingBackend::default();
    let mut ledger = ResourceLedger::default();
    let a = ledger.track(backend.alloc(ResourceKind::Texture));
    let b = ledger.track(backend.alloc(ResourceKind::Material));
    ledger.release_all(&mut backend);
    assert_eq!(backend.released, vec![b, a]);
    assert!(ledger.is_empty());
}

#[test]
fn children_follow_the_core_rotation() {
    let mut backend = CountingBackend::default();
    let mut scene = build(&mut backend);
    scene.apply_rotation(Vec2::new(0.4, 1.1));

    let core = scene.core();
    let core_m = scene.world_matrix(core);
    let point = Vec3::new(1.0, 2.0, 3.0);
    for (id, node) in scene.nodes().iter().enumerate() {
        if node.parent == Some(core) {
            let m = scene.world_matrix(id);
            assert!((m.transform_point3(point) - core_m.transform_point3(point)).length() < 1e-4);
        }
    }
    assert!(
        scene
            .nodes()
            .iter()
            .filter(|n| n.parent == Some(core))
            .count()
            >= FILAMENT_COUNT + 2
    );
}

#[test]
fn rotation_reaches_core_and_halo_but_not_rings() {
    let mut backend = CountingBackend::default();
    let mut scene = build(&mut backend);
    let rings_before: Vec<_> = scene
        .nodes()
        .iter()
        .filter(|n| n.kind == MaterialKind::Ring)
        .map(|n| n.transform)
        .collect();

    scene.apply_rotation(Vec2::new(0.25, -0.5));
    for node in scene.nodes() {
        match node.kind {
            MaterialKind::Core | MaterialKind::Halo => {
                assert_eq!(node.transform.rotation.x, 0.25);
                assert_eq!(node.transform.rotation.y, -0.5);
            }
            MaterialKind::Glow => assert_eq!(node.transform.rotation, Vec3::ZERO),
            _ => {}
        }
    }
    let rings_after: Vec<_> = scene
        .nodes()
        .iter()
        .filter(|n| n.kind == MaterialKind::Ring)
        .map(|n| n.transform)
        .collect();
    assert_eq!(rings_before, rings_after);
}

#[test]
fn draw_items_are_ordered_by_blend_pass() {
    let mut backend = CountingBackend::default();
    let scene = build(&mut backend);
    let items = scene.draw_items();
    assert_eq!(items.len(), scene.nodes().len());
    assert_eq!(items[0].kind, MaterialKind::Core);
    assert!(items
        .windows(2)
        .all(|w| w[0].kind.draw_order() <= w[1].kind.draw_order()));
    let particles = items
        .iter()
        .find(|i| i.kind == MaterialKind::Particles)
        .map(|i| i.instances);
    assert_eq!(particles, Some(PARTICLE_COUNT as u32));
}

#[test]
fn glow_pulses_and_pick_extent_follows() {
    let mut backend = CountingBackend::default();
    let mut scene = build(&mut backend);
    assert_eq!(scene.pick_targets().glow_half_extent, GLOW_INITIAL_SCALE * 0.5);

    for t in [0.0_f32, 1.0, 3.14, 7.5] {
        scene.animate(&mut backend, t);
        let expected = GLOW_BASE_SCALE + (t * GLOW_PULSE_RATE).sin() * GLOW_PULSE_AMPLITUDE;
        let glow = &scene.nodes()[scene.glow()];
        assert!((glow.transform.scale.x - expected).abs() < 1e-4);
        assert!((scene.pick_targets().glow_half_extent - expected * 0.5).abs() < 1e-4);
    }
    assert_eq!(backend.instance_writes, 1 + 4);
}

#[test]
fn materials_carry_their_colours() {
    let mut backend = CountingBackend::default();
    build(&mut backend);
    let halo = backend
        .materials
        .iter()
        .find(|m| m.kind == MaterialKind::Halo);
    assert_eq!(halo.map(|m| m.opacity), Some(HALO_OPACITY));
    let glow = backend
        .materials
        .iter()
        .find(|m| m.kind == MaterialKind::Glow);
    assert!(glow.and_then(|m| m.texture).is_some());
}

#[test]
fn blend_modes_by_material() {
    use resources::Blend;
    assert_eq!(MaterialKind::Core.blend(), Blend::Opaque);
    assert_eq!(MaterialKind::Glow.blend(), Blend::Normal);
    assert_eq!(MaterialKind::Halo.blend(), Blend::Normal);
    for kind in [
        MaterialKind::Ring,
        MaterialKind::Filament,
        MaterialKind::Nucleus,
        MaterialKind::Particles,
    ] {
        assert_eq!(kind.blend(), Blend::Additive);
    }
}

#[test]
fn hex_colours_convert_to_linear() {
    assert_eq!(srgb_hex_to_linear(0xffffff), [1.0, 1.0, 1.0]);
    assert_eq!(srgb_hex_to_linear(0x000000), [0.0, 0.0, 0.0]);
    let [r, g, b] = srgb_hex_to_linear(0x00aaff);
    assert_eq!(r, 0.0);
    assert!(g > 0.3 && g < 0.5);
    assert_eq!(b, 1.0);
}

#[test]
fn gradient_sampling_clamps_and_interpolates() {
    assert_eq!(sample_gradient(&GLOW_STOPS, -1.0), sample_gradient(&GLOW_STOPS, 0.0));
    assert_eq!(sample_gradient(&GLOW_STOPS, 2.0)[3], 0.0);

    let ring = sample_gradient(&GLOW_STOPS, 0.35);
    for (got, want) in ring.iter().zip([0.0, 1.0, 1.0, 1.0]) {
        assert!((got - want).abs() < 1e-5);
    }

    let mid = sample_gradient(&GLOW_STOPS, 0.15);
    assert!((mid[3] - 0.6).abs() < 1e-5);
    assert_eq!(sample_gradient(&[], 0.5), [0.0; 4]);
}

#[test]
fn glow_texture_fades_to_transparent_edges() {
    let tex = rasterize_radial(64, &GLOW_STOPS);
    assert_eq!((tex.width, tex.height), (64, 64));
    assert_eq!(tex.pixels.len(), 64 * 64 * 4);

    let alpha_at = |x: usize, y: usize| tex.pixels[(y * 64 + x) * 4 + 3];
    assert!(alpha_at(32, 32) > 90 && alpha_at(32, 32) < 115);
    assert_eq!(alpha_at(0, 0), 0);
    assert_eq!(alpha_at(63, 63), 0);
    // Symmetric about the centre
    assert_eq!(alpha_at(10, 32), alpha_at(53, 32));
}
