use crate::foundation::error::{SigformError, SigformResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Largest raster dimension any surface or snapshot may allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

/// Straight-alpha colour written as `#rrggbb` or `#rrggbbaa` in config and session files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub fn parse_hex(s: &str) -> SigformResult<Self> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        fn hex_byte(pair: &str) -> SigformResult<u8> {
            u8::from_str_radix(pair, 16)
                .map_err(|_| SigformError::validation(format!("invalid hex byte \"{pair}\"")))
        }

        if !s.is_ascii() {
            return Err(SigformError::validation("hex color must be ascii"));
        }
        match s.len() {
            6 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: 255,
            }),
            8 => Ok(Self {
                r: hex_byte(&s[0..2])?,
                g: hex_byte(&s[2..4])?,
                b: hex_byte(&s[4..6])?,
                a: hex_byte(&s[6..8])?,
            }),
            _ => Err(SigformError::validation(
                "hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)",
            )),
        }
    }

    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl serde::Serialize for Color {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> serde::Deserialize<'de> for Color {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// Integer pixel dimensions of a raster buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> SigformResult<Self> {
        if width == 0 || height == 0 {
            return Err(SigformError::validation("pixel size must be non-zero"));
        }
        if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
            return Err(SigformError::validation(format!(
                "pixel size too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn byte_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

/// Layout size of a surface in logical (CSS) pixels plus the device pixel density it is shown at.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    pub width: f64,
    pub height: f64,
    pub device_pixel_ratio: f64,
}

impl SurfaceSize {
    pub fn new(width: f64, height: f64, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Physical-to-logical scale. Densities below 1 (or non-finite) are treated as 1.
    pub fn scale(self) -> f64 {
        if self.device_pixel_ratio.is_finite() {
            self.device_pixel_ratio.max(1.0)
        } else {
            1.0
        }
    }

    /// Backing-store size for this layout, clamped to `1..=MAX_RASTER_DIM` on each axis.
    pub fn physical(self) -> PixelSize {
        fn to_px(v: f64) -> u32 {
            if !v.is_finite() || v <= 0.0 {
                return 1;
            }
            (v.round() as u64).clamp(1, u64::from(MAX_RASTER_DIM)) as u32
        }

        let s = self.scale();
        PixelSize {
            width: to_px(self.width * s),
            height: to_px(self.height * s),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
