// Colour-space helpers.
//
// Materials are specified as sRGB hex colours and handed to the shaders in
// linear space. The surface view is always an sRGB format, so the hardware
// encodes every fragment from linear to sRGB on write. The raw-output shaders
// (core, rings, filaments, nucleus, particles) produce display values
// directly and call `raw_output` in WGSL, which `raw_output` here mirrors.

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert a `0xRRGGBB` sRGB colour to linear RGB for the shaders.
pub fn srgb_hex_to_linear(hex: u32) -> [f32; 3] {
    let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
    [channel(16), channel(8), channel(0)]
}

#[cfg(test)]
pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Value a raw-output shader writes so that `c` is what reaches the screen.
#[cfg(test)]
pub fn raw_output(c: f32) -> f32 {
    srgb_to_linear(c.max(0.0))
}

/// 8-bit value an sRGB render target stores for a fragment output.
#[cfg(test)]
pub fn srgb_target_u8(fragment: f32) -> u8 {
    (linear_to_srgb(fragment.clamp(0.0, 1.0)) * 255.0).round() as u8
}
