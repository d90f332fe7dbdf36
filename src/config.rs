use super::constants::{CONTACT_CAMERA_DISTANCE, DEFAULT_CAMERA_DISTANCE, PARTICLE_COUNT, PARTICLE_SEED};

/// Per-mount options for a globe.
#[derive(Clone, Debug, PartialEq)]
pub struct GlobeConfig {
    pub camera_distance: f32,
    pub decorations: bool,
    pub particle_count: usize,
    pub seed: u64,
}

impl Default for GlobeConfig {
    fn default() -> Self {
        Self {
            camera_distance: DEFAULT_CAMERA_DISTANCE,
            decorations: true,
            particle_count: PARTICLE_COUNT,
            seed: PARTICLE_SEED,
        }
    }
}

impl GlobeConfig {
    /// Override the camera distance; non-finite or non-positive values keep the default.
    pub fn with_camera_distance(mut self, distance: Option<f32>) -> Self {
        match distance {
            Some(d) if d.is_finite() && d > 0.0 => self.camera_distance = d,
            Some(d) => log::warn!("[config] ignoring camera distance {}", d),
            None => {}
        }
        self
    }

    pub fn with_decorations(mut self, on: bool) -> Self {
        self.decorations = on;
        self
    }

    /// Build a config from `data-camera-distance` / `data-decorations` attribute values.
    ///
    /// `data-camera-distance="contact"` selects the closer contact-page framing.
    pub fn from_attributes(camera_distance: Option<&str>, decorations: Option<&str>) -> Self {
        let distance = camera_distance.and_then(|s| match s.trim() {
            "contact" => Some(CONTACT_CAMERA_DISTANCE),
            t => t.parse::<f32>().ok().or_else(|| {
                log::warn!("[config] bad data-camera-distance {:?}", s);
                None
            }),
        });
        let decorations = !matches!(
            decorations.map(str::trim),
            Some("off") | Some("false") | Some("0")
        );
        Self::default()
            .with_camera_distance(distance)
            .with_decorations(decorations)
    }
}
