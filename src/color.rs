//! Color representations and the two wire conversions the streaming engine
//! uses. Both transforms widen to a 16-bit field; neither changes color
//! space (the `xyb` name is historical, carried over from the bridge's own
//! wire format naming).

use crate::error::HueError;

/// A color value as supplied by the caller, in one of the two semantic
/// variants the Entertainment API accepts. The on-wire color-space byte is
/// set from the streaming session, not from this variant (see
/// [`crate::streaming::ColorSpace`]); `LightColor` is purely an
/// input-validation and conversion choice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightColor {
    Rgb8(u8, u8, u8),
    Xyb(f32, f32, f32),
}

impl LightColor {
    /// Validates the color and converts it to the three big-endian `u16`
    /// values that go on the wire.
    pub fn to_rgb16(self) -> Result<(u16, u16, u16), HueError> {
        match self {
            LightColor::Rgb8(r, g, b) => Ok(rgb8_to_rgb16(r, g, b)),
            LightColor::Xyb(x, y, b) => {
                if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) || !(0.0..=1.0).contains(&b) {
                    return Err(HueError::InvalidColor(format!(
                        "xyb components must be in [0.0, 1.0]: ({x}, {y}, {b})"
                    )));
                }
                Ok(xyb_to_rgb16(x, y, b))
            }
        }
    }
}

/// Converts 8-bit RGB to three 16-bit big-endian values: each octet is
/// divided by 255.0, multiplied by 65535, and truncated toward zero.
pub fn rgb8_to_rgb16(r: u8, g: u8, b: u8) -> (u16, u16, u16) {
    let convert = |v: u8| ((v as f64 / 255.0) * 65535.0) as u16;
    (convert(r), convert(g), convert(b))
}

/// Converts XYB floats (already clamped by the caller, see
/// [`LightColor::to_rgb16`]) to three 16-bit big-endian values: each
/// component is clamped to `[0.0, 1.0]`, multiplied by 65535.0, and
/// truncated toward zero.
pub fn xyb_to_rgb16(x: f32, y: f32, b: f32) -> (u16, u16, u16) {
    let convert = |v: f32| (v.clamp(0.0, 1.0) as f64 * 65535.0) as u16;
    (convert(x), convert(y), convert(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb8_roundtrip() {
        for r in 0..=255u8 {
            let (r16, _, _) = rgb8_to_rgb16(r, 0, 0);
            assert_eq!(r16 as u32, (r as u32 * 65535) / 255);
        }
    }

    #[test]
    fn xyb_bounds() {
        assert_eq!(xyb_to_rgb16(0.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(xyb_to_rgb16(1.0, 1.0, 1.0), (65535, 65535, 65535));
        assert_eq!(xyb_to_rgb16(0.5, 0.5, 0.5), (32767, 32767, 32767));
    }

    #[test]
    fn xyb_clamps_out_of_range() {
        assert_eq!(xyb_to_rgb16(-1.0, 2.0, 0.5), (0, 65535, 32767));
    }

    #[test]
    fn light_color_rejects_out_of_range_xyb() {
        let err = LightColor::Xyb(1.5, 0.0, 0.0).to_rgb16().unwrap_err();
        assert!(matches!(err, HueError::InvalidColor(_)));
    }

    #[test]
    fn light_color_accepts_rgb8_always() {
        assert!(LightColor::Rgb8(255, 0, 128).to_rgb16().is_ok());
    }
}
