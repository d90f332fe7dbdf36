// Shaders bundled as string constants
pub static CORE_WGSL: &str = include_str!("../shaders/core.wgsl");
pub static GLOW_WGSL: &str = include_str!("../shaders/glow.wgsl");
pub static RING_WGSL: &str = include_str!("../shaders/ring.wgsl");
pub static DECOR_WGSL: &str = include_str!("../shaders/decor.wgsl");
pub static POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
