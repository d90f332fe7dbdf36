use glam::Vec2;

use super::constants::{CLOCK_STEP, DAMPING_FACTOR};

/// Size of the host container in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportState {
    pub width: f32,
    pub height: f32,
}

impl ViewportState {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Width over height. A zero-height container yields a degenerate value.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Map a container-relative pixel position to normalized device coordinates.
    #[inline]
    pub fn to_ndc(&self, px: Vec2) -> Vec2 {
        Vec2::new(
            (px.x / self.width) * 2.0 - 1.0,
            1.0 - (px.y / self.height) * 2.0,
        )
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PointerPhase {
    #[default]
    Idle,
    Dragging,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PointerState {
    pub phase: PointerPhase,
    pub previous: Vec2,
    pub hovering: bool,
}

/// Pitch (`x`) and yaw (`y`) of the globe.
///
/// Input only ever writes `target`; `current` follows it through [`RotationState::damp`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotationState {
    pub target: Vec2,
    pub current: Vec2,
}

impl RotationState {
    #[inline]
    pub fn damp(&mut self, factor: f32) {
        self.current += (self.target - self.current) * factor;
    }

    #[inline]
    pub fn damp_default(&mut self) {
        self.damp(DAMPING_FACTOR);
    }
}

/// Fixed-step animation time. Advanced once per frame, never by wall clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationClock {
    pub time: f32,
    pub step: f32,
}

impl Default for AnimationClock {
    fn default() -> Self {
        Self {
            time: 0.0,
            step: CLOCK_STEP,
        }
    }
}

impl AnimationClock {
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.time += self.step;
        self.time
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cursor {
    Default,
    Grab,
    Grabbing,
}

impl Cursor {
    pub fn as_css(self) -> &'static str {
        match self {
            Cursor::Default => "default",
            Cursor::Grab => "grab",
            Cursor::Grabbing => "grabbing",
        }
    }
}
