// Host-side tests for pointer handling, rotation damping and the frame tick.
// The main crate is wasm-only, so we include the pure-Rust modules directly.

#![allow(dead_code)]
mod camera {
    include!("../src/camera.rs");
}
mod config {
    include!("../src/config.rs");
}
mod constants {
    include!("../src/constants.rs");
}
mod controller {
    include!("../src/controller.rs");
}
mod picking {
    include!("../src/picking.rs");
}
mod state {
    include!("../src/state.rs");
}

use config::GlobeConfig;
use constants::*;
use controller::GlobeController;
use glam::Vec2;
use state::{Cursor, RotationState, ViewportState};

const EPS: f32 = 1e-4;

fn controller() -> GlobeController {
    GlobeController::new(ViewportState::new(800.0, 600.0), DEFAULT_CAMERA_DISTANCE)
}

const CENTER: Vec2 = Vec2::new(400.0, 300.0);
const CORNER: Vec2 = Vec2::new(5.0, 5.0);

#[test]
fn pointer_down_on_globe_starts_drag() {
    let mut c = controller();
    assert_eq!(c.on_pointer_down(CENTER), Some(Cursor::Grabbing));
    assert!(c.is_dragging());
}

#[test]
fn pointer_down_on_empty_space_is_ignored() {
    let mut c = controller();
    assert_eq!(c.on_pointer_down(CORNER), None);
    assert!(!c.is_dragging());

    // A move with no drag in progress must not touch the rotation target
    let before = c.rotation.target;
    c.on_pointer_move(Vec2::new(300.0, 100.0));
    assert_eq!(c.rotation.target, before);
}

#[test]
fn drag_moves_target_by_sensitivity() {
    let mut c = controller();
    c.on_pointer_down(CENTER);
    c.on_pointer_move(CENTER + Vec2::new(10.0, 5.0));
    assert!((c.rotation.target.y - 10.0 * DRAG_SENSITIVITY).abs() < EPS);
    assert!((c.rotation.target.x - 5.0 * DRAG_SENSITIVITY).abs() < EPS);

    // Deltas are measured from the previous move, not the press point
    c.on_pointer_move(CENTER + Vec2::new(20.0, 5.0));
    assert!((c.rotation.target.y - 20.0 * DRAG_SENSITIVITY).abs() < EPS);
    assert!((c.rotation.target.x - 5.0 * DRAG_SENSITIVITY).abs() < EPS);
}

#[test]
fn drag_continues_outside_the_globe() {
    let mut c = controller();
    c.on_pointer_down(CENTER);
    c.on_pointer_move(CORNER);
    assert!(c.is_dragging());
    assert!(c.rotation.target.y < 0.0);
}

#[test]
fn pointer_up_always_ends_drag() {
    let mut c = controller();
    c.on_pointer_down(CENTER);
    c.on_pointer_move(CORNER);
    assert_eq!(c.on_pointer_up(), Cursor::Default);
    assert!(!c.is_dragging());

    let before = c.rotation.target;
    c.on_pointer_move(CENTER);
    assert_eq!(c.rotation.target, before);

    // Release without a drag is harmless
    assert_eq!(c.on_pointer_up(), Cursor::Default);
}

#[test]
fn drag_flag_gates_window_moves() {
    let mut c = controller();
    assert!(!c.is_dragging());
    c.on_pointer_down(CORNER);
    assert!(!c.is_dragging());

    c.on_pointer_down(CENTER);
    assert!(c.is_dragging());
    c.on_pointer_move(CENTER + Vec2::new(4.0, 0.0));
    let dragged = c.rotation.target;
    c.on_pointer_up();

    // Once released, the window listener has nothing left to do
    assert!(!c.is_dragging());
    c.on_pointer_move(CENTER + Vec2::new(40.0, 40.0));
    assert_eq!(c.rotation.target, dragged);
}

#[test]
fn hover_reports_cursor_unless_dragging() {
    let mut c = controller();
    assert_eq!(c.on_hover(CENTER), Some(Cursor::Grab));
    assert!(c.pointer.hovering);
    assert_eq!(c.on_hover(CORNER), Some(Cursor::Default));
    assert!(!c.pointer.hovering);

    c.on_pointer_down(CENTER);
    assert_eq!(c.on_hover(CORNER), None);
}

#[test]
fn cursor_css_names() {
    assert_eq!(Cursor::Default.as_css(), "default");
    assert_eq!(Cursor::Grab.as_css(), "grab");
    assert_eq!(Cursor::Grabbing.as_css(), "grabbing");
}

#[test]
fn idle_spin_accumulates_per_frame() {
    let mut c = controller();
    for _ in 0..50 {
        c.tick();
    }
    assert!((c.rotation.target.y - 50.0 * IDLE_YAW_PER_FRAME).abs() < EPS);
    assert!((c.rotation.target.x - 50.0 * IDLE_PITCH_PER_FRAME).abs() < EPS);
    assert_eq!(c.frames(), 50);
}

#[test]
fn no_idle_spin_while_dragging() {
    let mut c = controller();
    c.on_pointer_down(CENTER);
    for _ in 0..10 {
        c.tick();
    }
    assert_eq!(c.rotation.target, Vec2::ZERO);
}

#[test]
fn damping_moves_a_tenth_of_the_gap() {
    let mut r = RotationState {
        target: Vec2::new(1.0, -2.0),
        current: Vec2::ZERO,
    };
    r.damp_default();
    assert!((r.current.x - 0.1).abs() < EPS);
    assert!((r.current.y + 0.2).abs() < EPS);
}

#[test]
fn damping_converges_without_overshoot() {
    let mut c = controller();
    c.on_pointer_down(CENTER);
    c.on_pointer_move(CENTER + Vec2::new(100.0, -50.0));
    let target = c.rotation.target;

    let mut prev_gap = (target - c.rotation.current).length();
    for _ in 0..200 {
        c.tick();
        let gap = (target - c.rotation.current).length();
        assert!(gap <= prev_gap);
        // Never past the target on either axis
        assert!(c.rotation.current.y <= target.y + EPS);
        assert!(c.rotation.current.x >= target.x - EPS);
        prev_gap = gap;
    }
    assert!(prev_gap < 1e-3);
}

#[test]
fn hundred_idle_frames_follow_the_recurrence() {
    let mut c = controller();
    let (mut target, mut current) = (Vec2::ZERO, Vec2::ZERO);
    for _ in 0..100 {
        c.tick();
        c.advance_clock();
        target += Vec2::new(IDLE_PITCH_PER_FRAME, IDLE_YAW_PER_FRAME);
        current += (target - current) * DAMPING_FACTOR;
    }
    assert!((c.rotation.target - target).length() < EPS);
    assert!((c.rotation.current - current).length() < EPS);
    // Damped value trails the target while it keeps moving
    assert!(c.rotation.current.y < c.rotation.target.y);
    assert!((c.clock.time - 100.0 * CLOCK_STEP).abs() < 1e-3);
}

#[test]
fn clock_advances_by_fixed_step() {
    let mut c = controller();
    let t1 = c.advance_clock();
    let t2 = c.advance_clock();
    assert!((t1 - CLOCK_STEP).abs() < 1e-6);
    assert!((t2 - 2.0 * CLOCK_STEP).abs() < 1e-6);
}

#[test]
fn tick_returns_damped_rotation_and_leaves_clock() {
    let mut c = controller();
    let rotation = c.tick();
    assert_eq!(rotation, c.rotation.current);
    assert!(rotation.y > 0.0 && rotation.y < IDLE_YAW_PER_FRAME);
    assert_eq!(c.clock.time, 0.0);
}

#[test]
fn resize_updates_camera_aspect() {
    let mut c = controller();
    assert!((c.camera.aspect - 800.0 / 600.0).abs() < EPS);

    c.on_resize(ViewportState::new(400.0, 300.0));
    assert!((c.camera.aspect - 400.0 / 300.0).abs() < EPS);
    assert_eq!(c.viewport, ViewportState::new(400.0, 300.0));

    let mut c = GlobeController::new(ViewportState::new(800.0, 400.0), DEFAULT_CAMERA_DISTANCE);
    assert!((c.camera.aspect - 2.0).abs() < EPS);
    c.on_resize(ViewportState::new(400.0, 400.0));
    assert!((c.camera.aspect - 1.0).abs() < EPS);
}

#[test]
fn picking_follows_the_resized_viewport() {
    let mut c = controller();
    c.on_resize(ViewportState::new(400.0, 300.0));
    assert!(c.hit_test(Vec2::new(200.0, 150.0)));
    assert!(!c.hit_test(Vec2::new(2.0, 2.0)));
}

#[test]
fn closer_camera_makes_globe_fill_more_of_the_view() {
    let far = controller();
    let near = GlobeController::new(ViewportState::new(800.0, 600.0), CONTACT_CAMERA_DISTANCE);
    let near_top = Vec2::new(400.0, 40.0);
    assert!(!far.hit_test(near_top));
    assert!(near.hit_test(near_top));
}

#[test]
fn viewport_ndc_mapping() {
    let v = ViewportState::new(800.0, 600.0);
    assert_eq!(v.to_ndc(Vec2::new(0.0, 0.0)), Vec2::new(-1.0, 1.0));
    assert_eq!(v.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    assert_eq!(v.to_ndc(Vec2::new(400.0, 300.0)), Vec2::ZERO);
}

#[test]
fn config_from_attributes() {
    let c = GlobeConfig::from_attributes(Some("35"), None);
    assert_eq!(c.camera_distance, 35.0);
    assert!(c.decorations);

    let c = GlobeConfig::from_attributes(None, Some("off"));
    assert_eq!(c.camera_distance, DEFAULT_CAMERA_DISTANCE);
    assert!(!c.decorations);

    assert!(GlobeConfig::from_attributes(None, Some("on")).decorations);
}

#[test]
fn config_contact_keyword_selects_closer_camera() {
    let c = GlobeConfig::from_attributes(Some(" contact "), None);
    assert_eq!(c.camera_distance, CONTACT_CAMERA_DISTANCE);
    assert!(c.camera_distance < GlobeConfig::default().camera_distance);
}

#[test]
fn config_rejects_bad_camera_distance() {
    for bad in ["abc", "-5", "0", "NaN", "inf"] {
        let c = GlobeConfig::from_attributes(Some(bad), None);
        assert_eq!(c.camera_distance, DEFAULT_CAMERA_DISTANCE, "input {bad}");
    }
    let c = GlobeConfig::default().with_camera_distance(Some(f32::NAN));
    assert_eq!(c.camera_distance, DEFAULT_CAMERA_DISTANCE);
    let c = GlobeConfig::default().with_camera_distance(None);
    assert_eq!(c, GlobeConfig::default());
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn constants_are_consistent() {
    assert!(DAMPING_FACTOR > 0.0 && DAMPING_FACTOR < 1.0);
    assert!(CONTACT_CAMERA_DISTANCE < DEFAULT_CAMERA_DISTANCE);
    assert!(DEFAULT_CAMERA_DISTANCE < CAMERA_FAR);
    assert!(PARTICLE_RADIUS_MIN > CORE_RADIUS + HALO_THICKNESS);
    assert!(GLOW_BASE_SCALE - GLOW_PULSE_AMPLITUDE > 2.0 * CORE_RADIUS);
    assert!(NUCLEUS_RADIUS < FILAMENT_BASE_RADIUS);
    assert!(RING_RADII.iter().all(|&r| r > CORE_RADIUS));
}
