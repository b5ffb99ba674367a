//! Color module (CMYK, RGB, Greyscale, Indexed). Scope matches DeviceGray/DeviceRGB/
//! DeviceCMYK + Indexed; CalGray/CalRGB/Lab/DeviceN/Pattern/ICCBased are out of scope and
//! resolve to `ColorSpace::Unsupported`.

/// Color space of a resolved `/ColorSpace` entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorSpace {
    Rgb,
    Cmyk,
    Greyscale,
    /// Indexed color: a base space plus a lookup table, resolved to concrete colors during
    /// image decoding.
    Palette,
    /// CalGray/CalRGB/Lab/DeviceN/Pattern/ICCBased and anything else this crate cannot paint.
    Unsupported,
}

impl From<ColorSpace> for &'static str {
    fn from(val: ColorSpace) -> Self {
        use self::ColorSpace::*;
        match val {
            Rgb => "DeviceRGB",
            Cmyk => "DeviceCMYK",
            Greyscale => "DeviceGray",
            Palette => "Indexed",
            Unsupported => "Unsupported",
        }
    }
}

/// How many bits does a color component have?
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorBits {
    Bit1,
    Bit2,
    Bit4,
    Bit8,
    Bit16,
}

impl From<ColorBits> for i64 {
    fn from(val: ColorBits) -> Self {
        match val {
            ColorBits::Bit1 => 1,
            ColorBits::Bit2 => 2,
            ColorBits::Bit4 => 4,
            ColorBits::Bit8 => 8,
            ColorBits::Bit16 => 16,
        }
    }
}

impl ColorBits {
    pub fn from_bits(bits: i64) -> Option<Self> {
        match bits {
            1 => Some(ColorBits::Bit1),
            2 => Some(ColorBits::Bit2),
            4 => Some(ColorBits::Bit4),
            8 => Some(ColorBits::Bit8),
            16 => Some(ColorBits::Bit16),
            _ => None,
        }
    }
}

/// Wrapper for Rgb, Cmyk and Greyscale color values, resolved from a content stream's
/// color-setting operators (`rg`/`RG`, `k`/`K`, `g`/`G`, `sc`/`scn`/`SC`/`SCN`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Rgb(Rgb),
    Cmyk(Cmyk),
    Greyscale(Greyscale),
}

impl Color {
    /// Renders as an SVG color function string, e.g. `rgb(255,0,0)`.
    pub fn to_svg_string(self) -> String {
        match self {
            Color::Rgb(rgb) => format!(
                "rgb({},{},{})",
                to_u8(rgb.r),
                to_u8(rgb.g),
                to_u8(rgb.b)
            ),
            Color::Cmyk(cmyk) => {
                let Rgb { r, g, b, .. } = cmyk.into_rgb();
                format!("rgb({},{},{})", to_u8(r), to_u8(g), to_u8(b))
            }
            Color::Greyscale(gs) => {
                let v = to_u8(gs.percent);
                format!("rgb({v},{v},{v})")
            }
        }
    }
}

fn to_u8(component: f32) -> u8 {
    (component.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// RGB color, each component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// CMYK color, each component in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cmyk {
    pub c: f32,
    pub m: f32,
    pub y: f32,
    pub k: f32,
}

impl Cmyk {
    pub fn new(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self { c, m, y, k }
    }

    /// Naive CMYK->RGB conversion, matching how most PDF viewers render uncalibrated CMYK.
    pub fn into_rgb(self) -> Rgb {
        Rgb {
            r: (1.0 - self.c) * (1.0 - self.k),
            g: (1.0 - self.m) * (1.0 - self.k),
            b: (1.0 - self.y) * (1.0 - self.k),
        }
    }
}

/// Greyscale color, `0.0` = black, `1.0` = white.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Greyscale {
    pub percent: f32,
}

impl Greyscale {
    pub fn new(percent: f32) -> Self {
        Self { percent }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_to_svg_string() {
        assert_eq!(Color::Rgb(Rgb::new(1.0, 0.0, 0.0)).to_svg_string(), "rgb(255,0,0)");
    }

    #[test]
    fn cmyk_black_is_black() {
        let black = Color::Cmyk(Cmyk::new(0.0, 0.0, 0.0, 1.0));
        assert_eq!(black.to_svg_string(), "rgb(0,0,0)");
    }

    #[test]
    fn greyscale_midpoint() {
        let mid = Color::Greyscale(Greyscale::new(0.5));
        assert_eq!(mid.to_svg_string(), "rgb(128,128,128)");
    }
}
