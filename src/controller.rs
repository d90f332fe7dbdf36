use glam::Vec2;

use super::camera::Camera;
use super::constants::{
    CORE_RADIUS, DRAG_SENSITIVITY, GLOW_INITIAL_SCALE, HALO_THICKNESS, IDLE_PITCH_PER_FRAME,
    IDLE_YAW_PER_FRAME,
};
use super::picking::PickTargets;
use super::state::{AnimationClock, Cursor, PointerPhase, PointerState, RotationState, ViewportState};

/// Interaction and animation state for one mounted globe.
///
/// Pointer callbacks and the frame callback both run on the main thread, so
/// the web layer shares this behind an `Rc<RefCell<_>>`.
#[derive(Clone, Debug)]
pub struct GlobeController {
    pub viewport: ViewportState,
    pub pointer: PointerState,
    pub rotation: RotationState,
    pub clock: AnimationClock,
    pub camera: Camera,
    pub targets: PickTargets,
    frames: u64,
}

impl GlobeController {
    pub fn new(viewport: ViewportState, camera_distance: f32) -> Self {
        Self {
            viewport,
            pointer: PointerState::default(),
            rotation: RotationState::default(),
            clock: AnimationClock::default(),
            camera: Camera::new(camera_distance, viewport),
            targets: PickTargets {
                core_radius: CORE_RADIUS,
                halo_radius: CORE_RADIUS + HALO_THICKNESS,
                glow_half_extent: GLOW_INITIAL_SCALE * 0.5,
            },
            frames: 0,
        }
    }

    #[inline]
    pub fn is_dragging(&self) -> bool {
        self.pointer.phase == PointerPhase::Dragging
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ray-test a container-relative pixel against the pick targets.
    pub fn hit_test(&self, px: Vec2) -> bool {
        let ray = self.camera.screen_ray(&self.viewport, px);
        self.targets.hit(&ray, self.camera.eye())
    }

    pub fn set_pick_targets(&mut self, targets: PickTargets) {
        self.targets = targets;
    }

    /// Start a drag if the pointer is over the globe. Returns the cursor to show.
    pub fn on_pointer_down(&mut self, px: Vec2) -> Option<Cursor> {
        if !self.hit_test(px) {
            return None;
        }
        self.pointer.phase = PointerPhase::Dragging;
        self.pointer.previous = px;
        log::debug!("[pointer] drag start at ({:.1},{:.1})", px.x, px.y);
        Some(Cursor::Grabbing)
    }

    /// Drag continuation; ignored while idle.
    pub fn on_pointer_move(&mut self, px: Vec2) {
        if !self.is_dragging() {
            return;
        }
        let delta = px - self.pointer.previous;
        self.rotation.target.y += delta.x * DRAG_SENSITIVITY;
        self.rotation.target.x += delta.y * DRAG_SENSITIVITY;
        self.pointer.previous = px;
    }

    /// Hover feedback. Returns `None` while dragging so the grabbing cursor stays.
    pub fn on_hover(&mut self, px: Vec2) -> Option<Cursor> {
        if self.is_dragging() {
            return None;
        }
        self.pointer.hovering = self.hit_test(px);
        Some(if self.pointer.hovering {
            Cursor::Grab
        } else {
            Cursor::Default
        })
    }

    /// Release always ends a drag, wherever the pointer is.
    pub fn on_pointer_up(&mut self) -> Cursor {
        if self.is_dragging() {
            log::debug!("[pointer] drag end");
        }
        self.pointer.phase = PointerPhase::Idle;
        Cursor::Default
    }

    pub fn on_resize(&mut self, viewport: ViewportState) {
        self.viewport = viewport;
        self.camera.set_viewport(viewport);
    }

    /// Per-frame rotation update: idle spin, then damping. Returns the rotation to apply.
    pub fn tick(&mut self) -> Vec2 {
        if !self.is_dragging() {
            self.rotation.target.y += IDLE_YAW_PER_FRAME;
            self.rotation.target.x += IDLE_PITCH_PER_FRAME;
        }
        self.rotation.damp_default();
        self.frames += 1;
        self.rotation.current
    }

    /// Advance animation time by one step, after the rotation has been applied.
    pub fn advance_clock(&mut self) -> f32 {
        self.clock.advance()
    }
}
