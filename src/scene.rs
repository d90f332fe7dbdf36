use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use smallvec::SmallVec;

use super::color::srgb_hex_to_linear;
use super::config::GlobeConfig;
use super::constants::*;
use super::geometry::{self, FilamentParams, MeshData};
use super::glow::{rasterize_radial, GLOW_STOPS};
use super::particles::ParticleCloud;
use super::picking::PickTargets;
use super::resources::{MaterialDesc, MaterialKind, ResourceId, ResourceLedger, SceneBackend};

pub type NodeId = usize;

/// Local transform; rotation is XYZ Euler angles in radians.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn rotated(rotation: Vec3) -> Self {
        Self {
            rotation,
            ..Self::default()
        }
    }

    pub fn scaled(scale: f32) -> Self {
        Self {
            scale: Vec3::splat(scale),
            ..Self::default()
        }
    }

    pub fn matrix(&self) -> Mat4 {
        let r = self.rotation;
        Mat4::from_scale_rotation_translation(
            self.scale,
            Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
            self.position,
        )
    }
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub parent: Option<NodeId>,
    pub transform: Transform,
    pub kind: MaterialKind,
    pub geometry: ResourceId,
    pub material: ResourceId,
    /// Scene-owned nodes that take the drag rotation directly.
    pub follows_rotation: bool,
    /// Instance count for instanced geometry, 1 otherwise.
    pub instances: u32,
}

/// One draw call, with the node's world matrix resolved.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub kind: MaterialKind,
    pub geometry: ResourceId,
    pub material: ResourceId,
    pub model: Mat4,
    pub instances: u32,
}

struct SceneBuilder<'a, B: SceneBackend + ?Sized> {
    backend: &'a mut B,
    ledger: ResourceLedger,
    nodes: Vec<SceneNode>,
}

impl<'a, B: SceneBackend + ?Sized> SceneBuilder<'a, B> {
    fn add(
        &mut self,
        name: &'static str,
        parent: Option<NodeId>,
        mesh: &MeshData,
        desc: MaterialDesc,
        transform: Transform,
    ) -> NodeId {
        let geometry = self.ledger.track(self.backend.create_geometry(name, mesh));
        let material = self.ledger.track(self.backend.create_material(name, &desc));
        self.push(parent, desc.kind, geometry, material, transform, 1)
    }

    fn push(
        &mut self,
        parent: Option<NodeId>,
        kind: MaterialKind,
        geometry: ResourceId,
        material: ResourceId,
        transform: Transform,
        instances: u32,
    ) -> NodeId {
        self.nodes.push(SceneNode {
            parent,
            transform,
            kind,
            geometry,
            material,
            follows_rotation: false,
            instances,
        });
        self.nodes.len() - 1
    }
}

/// Arena of scene nodes plus the resources they own.
///
/// Children (filaments, nucleus, particles) are parented to the core, so the
/// core's rotation reaches them through [`SceneGraph::world_matrix`].
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
    ledger: ResourceLedger,
    glow: NodeId,
    particles: Option<(NodeId, ParticleCloud)>,
    glow_scale: f32,
}

impl SceneGraph {
    pub fn build<B: SceneBackend + ?Sized>(backend: &mut B, config: &GlobeConfig) -> Self {
        let mut b = SceneBuilder {
            backend,
            ledger: ResourceLedger::default(),
            nodes: Vec::new(),
        };

        let glow_tex = rasterize_radial(GLOW_TEXTURE_SIZE, &GLOW_STOPS);
        let glow_tex = b.ledger.track(b.backend.create_texture("glow_texture", &glow_tex));
        let glow = b.add(
            "glow",
            None,
            &geometry::billboard_quad(),
            MaterialDesc::new(MaterialKind::Glow, [1.0; 3]).texture(glow_tex),
            Transform::scaled(GLOW_INITIAL_SCALE),
        );

        let core_mesh = geometry::sphere(CORE_RADIUS, CORE_SEGMENTS, CORE_SEGMENTS);
        let core = b.add(
            "core",
            None,
            &core_mesh,
            MaterialDesc::new(MaterialKind::Core, srgb_hex_to_linear(CORE_GLOW_HEX)),
            Transform::default(),
        );
        b.nodes[core].follows_rotation = true;

        let halo_mesh = geometry::sphere(CORE_RADIUS + HALO_THICKNESS, CORE_SEGMENTS, CORE_SEGMENTS);
        let halo = b.add(
            "halo",
            None,
            &halo_mesh,
            MaterialDesc::new(MaterialKind::Halo, srgb_hex_to_linear(HALO_HEX)).opacity(HALO_OPACITY),
            Transform::default(),
        );
        b.nodes[halo].follows_rotation = true;

        let mut particles = None;
        if config.decorations {
            let ring_color = srgb_hex_to_linear(RING_HEX);
            for (i, (&radius, &tilt)) in RING_RADII.iter().zip(RING_TILTS.iter()).enumerate() {
                let direction = if i % 2 == 0 { 1.0 } else { -1.0 };
                let mesh = geometry::torus(
                    radius,
                    RING_TUBE_RADIUS,
                    RING_RADIAL_SEGMENTS,
                    RING_TUBULAR_SEGMENTS,
                );
                b.add(
                    "ring",
                    None,
                    &mesh,
                    MaterialDesc::new(MaterialKind::Ring, ring_color).params([
                        direction * RING_SWEEP_SPEED * (1.0 + 0.2 * i as f32),
                        i as f32 * 2.1,
                        RING_BAND_WIDTH,
                    ]),
                    Transform::rotated(Vec3::new(tilt, 0.0, i as f32 * 0.4)),
                );
            }

            let filament_color = srgb_hex_to_linear(FILAMENT_HEX);
            for i in 0..FILAMENT_COUNT {
                let shape = FilamentParams::spread(i, FILAMENT_COUNT);
                let points = shape.control_points(FILAMENT_CONTROL_POINTS, FILAMENT_BASE_RADIUS);
                let mesh = geometry::closed_tube(
                    &points,
                    FILAMENT_TUBULAR_SEGMENTS,
                    FILAMENT_TUBE_RADIUS,
                    FILAMENT_RADIAL_SEGMENTS,
                );
                b.add(
                    "filament",
                    Some(core),
                    &mesh,
                    MaterialDesc::new(MaterialKind::Filament, filament_color)
                        .params([FILAMENT_FLOW_SPEED, i as f32 * 1.3, 0.0]),
                    Transform::default(),
                );
            }

            b.add(
                "nucleus",
                Some(core),
                &geometry::sphere(NUCLEUS_RADIUS, NUCLEUS_SEGMENTS, NUCLEUS_SEGMENTS),
                MaterialDesc::new(MaterialKind::Nucleus, srgb_hex_to_linear(NUCLEUS_HEX))
                    .params([NUCLEUS_PULSE_RATE, 0.0, 0.0]),
                Transform::default(),
            );

            let cloud = ParticleCloud::new(config.particle_count, config.seed);
            if !cloud.is_empty() {
                let geometry = b.ledger.track(b.backend.create_instanced_geometry(
                    "particles",
                    &geometry::billboard_quad(),
                    cloud.len(),
                ));
                let material = b.ledger.track(b.backend.create_material(
                    "particles",
                    &MaterialDesc::new(MaterialKind::Particles, srgb_hex_to_linear(PARTICLE_HEX))
                        .params([PARTICLE_SIZE, 0.0, 0.0]),
                ));
                b.backend.write_instances(geometry, cloud.positions());
                let node = b.push(
                    Some(core),
                    MaterialKind::Particles,
                    geometry,
                    material,
                    Transform::default(),
                    cloud.len() as u32,
                );
                particles = Some((node, cloud));
            }
        }

        log::info!(
            "[scene] built nodes={} resources={}",
            b.nodes.len(),
            b.ledger.len()
        );

        Self {
            nodes: b.nodes,
            ledger: b.ledger,
            glow,
            particles,
            glow_scale: GLOW_INITIAL_SCALE,
        }
    }

    #[cfg(test)]
    pub fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    #[cfg(test)]
    pub fn core(&self) -> NodeId {
        self.nodes
            .iter()
            .position(|n| n.kind == MaterialKind::Core)
            .unwrap_or_default()
    }

    #[cfg(test)]
    pub fn glow(&self) -> NodeId {
        self.glow
    }

    #[cfg(test)]
    pub fn ledger(&self) -> &ResourceLedger {
        &self.ledger
    }

    #[cfg(test)]
    pub fn particles(&self) -> Option<&ParticleCloud> {
        self.particles.as_ref().map(|(_, cloud)| cloud)
    }

    /// Apply pitch/yaw to the core and every scene-owned node that follows it.
    pub fn apply_rotation(&mut self, rotation: Vec2) {
        for node in self.nodes.iter_mut().filter(|n| n.follows_rotation) {
            node.transform.rotation.x = rotation.x;
            node.transform.rotation.y = rotation.y;
        }
    }

    /// Time-driven CPU work: glow pulse and particle orbits.
    pub fn animate<B: SceneBackend + ?Sized>(&mut self, backend: &mut B, time: f32) {
        self.glow_scale = GLOW_BASE_SCALE + (time * GLOW_PULSE_RATE).sin() * GLOW_PULSE_AMPLITUDE;
        if let Some(glow) = self.nodes.get_mut(self.glow) {
            glow.transform.scale = Vec3::new(self.glow_scale, self.glow_scale, 1.0);
        }

        if let Some((node, cloud)) = &mut self.particles {
            let geometry = self.nodes[*node].geometry;
            backend.write_instances(geometry, cloud.update(time));
        }
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let node = &self.nodes[id];
        let local = node.transform.matrix();
        match node.parent {
            Some(parent) => self.world_matrix(parent) * local,
            None => local,
        }
    }

    /// Draw calls for this frame, ordered opaque → normal → additive.
    pub fn draw_items(&self) -> SmallVec<[DrawItem; 16]> {
        let mut items: SmallVec<[DrawItem; 16]> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(id, node)| DrawItem {
                kind: node.kind,
                geometry: node.geometry,
                material: node.material,
                model: self.world_matrix(id),
                instances: node.instances,
            })
            .collect();
        items.sort_by_key(|item| item.kind.draw_order());
        items
    }

    pub fn pick_targets(&self) -> PickTargets {
        PickTargets {
            core_radius: CORE_RADIUS,
            halo_radius: CORE_RADIUS + HALO_THICKNESS,
            glow_half_extent: self.glow_scale * 0.5,
        }
    }

    /// Release every resource this scene allocated. Safe to call twice.
    pub fn dispose<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        if self.ledger.is_empty() {
            return;
        }
        let released = self.ledger.len();
        self.ledger.release_all(backend);
        self.nodes.clear();
        self.particles = None;
        log::info!("[scene] disposed resources={}", released);
    }
}
