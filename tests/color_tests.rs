// Host-side tests for colour-space handling through the sRGB render target.

#![allow(dead_code)]
mod color {
    include!("../src/color.rs");
}

use color::{linear_to_srgb, raw_output, srgb_hex_to_linear, srgb_target_u8, srgb_to_linear};

const CORE_WGSL: &str = include_str!("../shaders/core.wgsl");
const DECOR_WGSL: &str = include_str!("../shaders/decor.wgsl");
const GLOW_WGSL: &str = include_str!("../shaders/glow.wgsl");
const POINTS_WGSL: &str = include_str!("../shaders/points.wgsl");
const RING_WGSL: &str = include_str!("../shaders/ring.wgsl");

/// Body of a WGSL function, from its signature up to the next top-level item.
fn fn_body<'a>(src: &'a str, name: &str) -> &'a str {
    let start = src
        .find(&format!("fn {name}("))
        .unwrap_or_else(|| panic!("{name} not found"));
    let rest = &src[start..];
    let end = rest.find("\n}\n").map_or(rest.len(), |i| i + 3);
    &rest[..end]
}

#[test]
fn core_base_colour_displays_unbrightened() {
    for (value, byte) in [(0.01, 3), (0.03, 8), (0.06, 15), (0.18, 46)] {
        assert_eq!(srgb_target_u8(raw_output(value)), byte, "value {value}");
    }
    // Without the conversion the sRGB target lifts the dark blue a lot
    assert_eq!(srgb_target_u8(0.06), 69);
}

#[test]
fn raw_output_clamps_negative_and_keeps_extremes() {
    assert_eq!(raw_output(-0.5), 0.0);
    assert_eq!(srgb_target_u8(raw_output(0.0)), 0);
    assert_eq!(srgb_target_u8(raw_output(1.0)), 255);
}

#[test]
fn transfer_functions_invert_each_other() {
    for k in 0..=20 {
        let c = k as f32 / 20.0;
        assert!((linear_to_srgb(srgb_to_linear(c)) - c).abs() < 1e-4, "c {c}");
    }
}

#[test]
fn material_hex_goes_through_the_same_curve() {
    let [r, g, b] = srgb_hex_to_linear(0x00aaff);
    assert_eq!(r, 0.0);
    assert!((g - srgb_to_linear(170.0 / 255.0)).abs() < 1e-6);
    assert_eq!(b, 1.0);
    assert_eq!(srgb_target_u8(g), 170);
}

#[test]
fn raw_shaders_convert_their_output() {
    for (src, name) in [
        (CORE_WGSL, "fs_core"),
        (RING_WGSL, "fs_ring"),
        (DECOR_WGSL, "fs_filament"),
        (DECOR_WGSL, "fs_nucleus"),
        (POINTS_WGSL, "fs_points"),
    ] {
        assert!(src.contains("fn raw_output("), "{name} lacks the helper");
        assert!(fn_body(src, name).contains("raw_output("), "{name}");
    }
}

#[test]
fn halo_and_glow_keep_hardware_encoding() {
    assert!(!fn_body(CORE_WGSL, "fs_halo").contains("raw_output("));
    assert!(!fn_body(GLOW_WGSL, "fs_glow").contains("raw_output("));
}
