// Globe tuning constants.
//
// Values are tuned against a fixed per-frame clock step, so changing
// CLOCK_STEP changes the speed of every shader effect.

// Camera
pub const DEFAULT_CAMERA_DISTANCE: f32 = 80.0;
pub const CONTACT_CAMERA_DISTANCE: f32 = 35.0; // contact page variant
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 1000.0;
pub const MAX_PIXEL_RATIO: f64 = 2.0;

// Interaction
pub const DRAG_SENSITIVITY: f32 = 0.01; // radians per CSS pixel
pub const DAMPING_FACTOR: f32 = 0.1; // fraction of remaining distance per frame
pub const IDLE_YAW_PER_FRAME: f32 = 0.005;
pub const IDLE_PITCH_PER_FRAME: f32 = 0.002;

// Animation clock
pub const CLOCK_STEP: f32 = 0.02;

// Core sphere and halo
pub const CORE_RADIUS: f32 = 7.0;
pub const CORE_SEGMENTS: u32 = 64;
pub const CORE_GLOW_HEX: u32 = 0x00aaff;
pub const HALO_THICKNESS: f32 = 0.2;
pub const HALO_HEX: u32 = 0x0088ff;
pub const HALO_OPACITY: f32 = 0.2;

// Glow sprite
pub const GLOW_TEXTURE_SIZE: u32 = 512;
pub const GLOW_INITIAL_SCALE: f32 = 45.0;
pub const GLOW_BASE_SCALE: f32 = 40.0;
pub const GLOW_PULSE_AMPLITUDE: f32 = 2.0;
pub const GLOW_PULSE_RATE: f32 = 0.5;

// Filaments (children of the core, inside it)
pub const FILAMENT_COUNT: usize = 6;
pub const FILAMENT_CONTROL_POINTS: usize = 8;
pub const FILAMENT_TUBE_RADIUS: f32 = 0.06;
pub const FILAMENT_TUBULAR_SEGMENTS: u32 = 96;
pub const FILAMENT_RADIAL_SEGMENTS: u32 = 8;
pub const FILAMENT_BASE_RADIUS: f32 = 3.2;
pub const FILAMENT_FLOW_SPEED: f32 = 2.5;
pub const FILAMENT_HEX: u32 = 0x33ccff;

// Nucleus
pub const NUCLEUS_RADIUS: f32 = 1.2;
pub const NUCLEUS_SEGMENTS: u32 = 32;
pub const NUCLEUS_HEX: u32 = 0x99eeff;
pub const NUCLEUS_PULSE_RATE: f32 = 2.0;

// Orbiting particles
pub const PARTICLE_COUNT: usize = 40;
pub const PARTICLE_RADIUS_MIN: f32 = 8.0;
pub const PARTICLE_RADIUS_MAX: f32 = 13.0;
pub const PARTICLE_SPEED_MIN: f32 = 0.2; // radians per clock unit
pub const PARTICLE_SPEED_MAX: f32 = 0.8;
pub const PARTICLE_SIZE: f32 = 0.35;
pub const PARTICLE_HEX: u32 = 0x88ddff;
pub const PARTICLE_SEED: u64 = 7;

// Photon rings
pub const RING_RADII: [f32; 3] = [9.0, 10.5, 12.5];
pub const RING_TILTS: [f32; 3] = [1.35, 1.2, 1.45]; // pitch in radians
pub const RING_TUBE_RADIUS: f32 = 0.05;
pub const RING_TUBULAR_SEGMENTS: u32 = 160;
pub const RING_RADIAL_SEGMENTS: u32 = 6;
pub const RING_SWEEP_SPEED: f32 = 0.8; // band revolutions in radians per clock unit
pub const RING_BAND_WIDTH: f32 = 0.35; // gaussian sigma in radians
pub const RING_HEX: u32 = 0x00ffff;
