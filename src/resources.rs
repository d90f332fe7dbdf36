use super::geometry::MeshData;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Geometry,
    Material,
    Texture,
}

/// Handle to a GPU-side allocation owned by a [`SceneBackend`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResourceId {
    pub kind: ResourceKind,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Blend {
    Opaque,
    Normal,
    Additive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MaterialKind {
    Core,
    Glow,
    Halo,
    Ring,
    Filament,
    Nucleus,
    Particles,
}

impl MaterialKind {
    pub const ALL: [MaterialKind; 7] = [
        MaterialKind::Core,
        MaterialKind::Glow,
        MaterialKind::Halo,
        MaterialKind::Ring,
        MaterialKind::Filament,
        MaterialKind::Nucleus,
        MaterialKind::Particles,
    ];

    /// Opaque first, then normal-blended, then additive.
    pub fn draw_order(self) -> u8 {
        match self {
            MaterialKind::Core => 0,
            MaterialKind::Glow => 1,
            MaterialKind::Halo => 2,
            MaterialKind::Ring => 3,
            MaterialKind::Filament => 4,
            MaterialKind::Nucleus => 5,
            MaterialKind::Particles => 6,
        }
    }

    pub fn blend(self) -> Blend {
        match self {
            MaterialKind::Core => Blend::Opaque,
            MaterialKind::Glow | MaterialKind::Halo => Blend::Normal,
            _ => Blend::Additive,
        }
    }

    pub fn textured(self) -> bool {
        matches!(self, MaterialKind::Glow)
    }

    pub fn instanced(self) -> bool {
        matches!(self, MaterialKind::Particles)
    }

    pub fn label(self) -> &'static str {
        match self {
            MaterialKind::Core => "core",
            MaterialKind::Glow => "glow",
            MaterialKind::Halo => "halo",
            MaterialKind::Ring => "ring",
            MaterialKind::Filament => "filament",
            MaterialKind::Nucleus => "nucleus",
            MaterialKind::Particles => "particles",
        }
    }
}

/// Shader inputs fixed at creation; `time` is supplied per frame.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialDesc {
    pub kind: MaterialKind,
    pub color: [f32; 3],
    pub opacity: f32,
    pub params: [f32; 3],
    pub texture: Option<ResourceId>,
}

impl MaterialDesc {
    pub fn new(kind: MaterialKind, color: [f32; 3]) -> Self {
        Self {
            kind,
            color,
            opacity: 1.0,
            params: [0.0; 3],
            texture: None,
        }
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn params(mut self, params: [f32; 3]) -> Self {
        self.params = params;
        self
    }

    pub fn texture(mut self, texture: ResourceId) -> Self {
        self.texture = Some(texture);
        self
    }
}

/// Straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// GPU allocation seam. The web build implements it on top of wgpu.
pub trait SceneBackend {
    fn create_geometry(&mut self, label: &str, mesh: &MeshData) -> ResourceId;
    /// Geometry drawn once per instance, with room for `capacity` instance positions.
    fn create_instanced_geometry(&mut self, label: &str, mesh: &MeshData, capacity: usize)
        -> ResourceId;
    fn create_material(&mut self, label: &str, desc: &MaterialDesc) -> ResourceId;
    fn create_texture(&mut self, label: &str, data: &TextureData) -> ResourceId;
    fn write_instances(&mut self, geometry: ResourceId, positions: &[[f32; 3]]);
    fn release(&mut self, id: ResourceId);
}

/// Every allocation made for a scene, released together at teardown.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    live: Vec<ResourceId>,
}

impl ResourceLedger {
    pub fn track(&mut self, id: ResourceId) -> ResourceId {
        self.live.push(id);
        id
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    #[cfg(test)]
    pub fn count(&self, kind: ResourceKind) -> usize {
        self.live.iter().filter(|id| id.kind == kind).count()
    }

    /// Release in reverse creation order so materials go before their textures.
    pub fn release_all<B: SceneBackend + ?Sized>(&mut self, backend: &mut B) {
        while let Some(id) = self.live.pop() {
            backend.release(id);
        }
    }
}
