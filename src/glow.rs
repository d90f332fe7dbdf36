use super::resources::TextureData;

/// Colour stop of a radial gradient: 8-bit RGB plus a 0..1 alpha, like a CSS `rgba()`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub rgb: [u8; 3],
    pub alpha: f32,
}

const fn stop(offset: f32, r: u8, g: u8, b: u8, alpha: f32) -> GradientStop {
    GradientStop {
        offset,
        rgb: [r, g, b],
        alpha,
    }
}

// The core edge sits at ~0.35 of the sprite radius (radius 7 against scale 40).
pub const GLOW_STOPS: [GradientStop; 6] = [
    stop(0.0, 0, 100, 255, 0.4),
    stop(0.3, 0, 150, 255, 0.8),
    stop(0.35, 0, 255, 255, 1.0), // photon ring
    stop(0.45, 0, 120, 255, 0.7),
    stop(0.7, 0, 50, 220, 0.3),
    stop(1.0, 0, 20, 100, 0.0),
];

/// Colour at `t` (clamped to the first/last stop), as `[r, g, b, a]` in 0..1.
pub fn sample_gradient(stops: &[GradientStop], t: f32) -> [f32; 4] {
    let to_rgba = |s: &GradientStop| {
        [
            s.rgb[0] as f32 / 255.0,
            s.rgb[1] as f32 / 255.0,
            s.rgb[2] as f32 / 255.0,
            s.alpha,
        ]
    };
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return [0.0; 4];
    };
    if t <= first.offset {
        return to_rgba(first);
    }
    if t >= last.offset {
        return to_rgba(last);
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.offset && t <= b.offset {
            let span = (b.offset - a.offset).max(f32::EPSILON);
            let f = (t - a.offset) / span;
            let (ca, cb) = (to_rgba(a), to_rgba(b));
            return std::array::from_fn(|i| ca[i] + (cb[i] - ca[i]) * f);
        }
    }
    to_rgba(last)
}

/// Rasterise a centred radial gradient into a square RGBA8 image.
pub fn rasterize_radial(size: u32, stops: &[GradientStop]) -> TextureData {
    let mut pixels = Vec::with_capacity((size * size * 4) as usize);
    let half = size as f32 * 0.5;
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 + 0.5 - half;
            let dy = y as f32 + 0.5 - half;
            let t = (dx * dx + dy * dy).sqrt() / half;
            let c = sample_gradient(stops, t);
            pixels.extend(c.iter().map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8));
        }
    }
    TextureData {
        width: size,
        height: size,
        pixels,
    }
}
