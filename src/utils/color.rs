//! Color helpers.
//!
//! Colors are plain [`Vec3`] RGB triples in `[0, 1]`, in the same space as
//! the hex constants they are built from (no working-space conversion).

use glam::Vec3;

/// Builds an RGB color from hue, saturation and lightness.
///
/// `h` wraps modulo 1; `s` and `l` are clamped to `[0, 1]`.
#[must_use]
pub fn hsl(h: f32, s: f32, l: f32) -> Vec3 {
    let h = h.rem_euclid(1.0);
    let s = s.clamp(0.0, 1.0);
    let l = l.clamp(0.0, 1.0);

    if s == 0.0 {
        return Vec3::splat(l);
    }

    let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let q = 2.0 * l - p;

    Vec3::new(
        hue_to_rgb(q, p, h + 1.0 / 3.0),
        hue_to_rgb(q, p, h),
        hue_to_rgb(q, p, h - 1.0 / 3.0),
    )
}

/// Same as [`hsl`] with the components packed as `[h, s, l]`.
#[must_use]
pub fn hsl_array(hsl_value: [f32; 3]) -> Vec3 {
    hsl(hsl_value[0], hsl_value[1], hsl_value[2])
}

/// Builds an RGB color from a packed `0xRRGGBB` value.
#[must_use]
pub fn hex(value: u32) -> Vec3 {
    let r = (value >> 16) & 0xff;
    let g = (value >> 8) & 0xff;
    let b = value & 0xff;
    Vec3::new(r as f32, g as f32, b as f32) / 255.0
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn zero_saturation_is_grey() {
        assert!(close(hsl(0.1, 0.0, 1.0), Vec3::ONE));
        assert!(close(hsl(0.7, 0.0, 0.25), Vec3::splat(0.25)));
    }

    #[test]
    fn sky_blue_hemisphere_color() {
        assert!(close(hsl(0.6, 1.0, 0.6), Vec3::new(0.2, 0.52, 1.0)));
    }

    #[test]
    fn hue_wraps() {
        assert!(close(hsl(1.6, 1.0, 0.6), hsl(0.6, 1.0, 0.6)));
        assert!(close(hsl(-0.4, 1.0, 0.6), hsl(0.6, 1.0, 0.6)));
    }

    #[test]
    fn hex_unpacks_channels() {
        assert!(close(hex(0xff_00_00), Vec3::X));
        assert!(close(hex(0x00_77_ff), Vec3::new(0.0, 119.0 / 255.0, 1.0)));
    }
}
