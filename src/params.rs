//! Parameter Extraction
//!
//! Maps a [`HashDigest`] onto the flat record of visual attributes that
//! drives every layer of the scene. Each field is an independent formula of
//! the digest; none of them may change without changing every artwork ever
//! minted.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::hashing::HashDigest;
use crate::variants::{PatternKind, ShapeKind, TextureKind};

/// An HSL color with integer components, rendered as `hsl(h, s%, l%)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hsl {
    pub hue: u32,
    pub saturation: u32,
    pub lightness: u32,
}

impl Hsl {
    pub const fn new(hue: u32, saturation: u32, lightness: u32) -> Self {
        Self { hue, saturation, lightness }
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.hue, self.saturation, self.lightness)
    }
}

/// The three near-white text tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextTone {
    White,
    Snow,
    Mist,
}

impl TextTone {
    pub fn hex(self) -> &'static str {
        match self {
            TextTone::White => "#ffffff",
            TextTone::Snow => "#f8f9fa",
            TextTone::Mist => "#e9ecef",
        }
    }
}

impl fmt::Display for TextTone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hex())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParameters {
    // palette
    pub primary_hue: u32,
    pub secondary_hue: u32,
    pub tertiary_hue: u32,
    pub bg_color1: Hsl,
    pub bg_color2: Hsl,
    pub bg_color3: Hsl,
    pub accent_color1: Hsl,
    pub accent_color2: Hsl,
    pub accent_color3: Hsl,
    pub text_color: TextTone,
    pub text_shadow_color: Hsl,

    // geometry
    pub pattern_type: u32,
    pub geometric_complexity: u32,
    pub shape_count: u32,
    pub shape_variety: u32,

    // transforms
    pub rotation: u32,
    pub secondary_rotation: u32,
    pub scale: f64,
    pub skew: i32,

    // animation
    pub animation_duration: u32,
    pub animation_delay: f64,
    pub pulse_intensity: f64,

    // effects
    pub noise_intensity: f64,
    pub blur_radius: u32,
    pub glow_intensity: f64,

    // texture and depth
    pub texture_type: u32,
    pub depth_layers: u32,
    pub parallax_offset: u32,

    // artistic
    pub brush_stroke_width: u32,
    pub organic_flow: f64,
    pub symmetry_level: u32,
}

/// Threshold above which the organic layer is drawn.
pub const ORGANIC_FLOW_THRESHOLD: f64 = 0.3;

impl VisualParameters {
    /// Derive every visual attribute from `digest`.
    pub fn extract(digest: &HashDigest) -> Self {
        let p = u64::from(digest.primary);
        let s = u64::from(digest.secondary);
        let c = u64::from(digest.combined);

        Self {
            primary_hue: m(p, 360),
            secondary_hue: m(p + 120 + s % 60, 360),
            tertiary_hue: m(p + 240 + c % 60, 360),

            bg_color1: Hsl::new(m(p, 360), 40 + m(p, 40), 15 + m(p, 15)),
            bg_color2: Hsl::new(m(p + 60, 360), 30 + m(s, 40), 25 + m(s, 20)),
            bg_color3: Hsl::new(m(p + 180, 360), 20 + m(c, 30), 35 + m(c, 15)),

            accent_color1: Hsl::new(m(p + 30, 360), 70 + m(p, 30), 55 + m(p, 25)),
            accent_color2: Hsl::new(m(s + 90, 360), 60 + m(s, 30), 45 + m(s, 30)),
            accent_color3: Hsl::new(m(c + 150, 360), 80 + m(c, 20), 65 + m(c, 20)),

            text_color: match p % 3 {
                0 => TextTone::White,
                1 => TextTone::Snow,
                _ => TextTone::Mist,
            },
            text_shadow_color: Hsl::new(m(p, 360), 50, 10),

            pattern_type: m(p, 8),
            geometric_complexity: 2 + m(s, 6),
            shape_count: 5 + m(p, 12),
            shape_variety: m(s, 5),

            rotation: m(p, 360),
            secondary_rotation: m(s, 360),
            scale: 0.7 + (p % 60) as f64 / 100.0,
            skew: -15 + m(s, 30) as i32,

            animation_duration: 4 + m(p, 8),
            animation_delay: (s % 3) as f64 * 0.5,
            pulse_intensity: 0.2 + (c % 30) as f64 / 100.0,

            noise_intensity: 0.1 + (p % 20) as f64 / 100.0,
            blur_radius: 1 + m(s, 4),
            glow_intensity: 0.3 + (c % 40) as f64 / 100.0,

            texture_type: m(c, 4),
            depth_layers: 3 + m(p, 4),
            parallax_offset: 5 + m(s, 15),

            brush_stroke_width: 1 + m(p, 4),
            organic_flow: (s % 100) as f64 / 100.0,
            symmetry_level: m(c, 3),
        }
    }

    pub fn pattern(&self) -> PatternKind {
        PatternKind::from_selector(self.pattern_type)
    }

    pub fn texture(&self) -> TextureKind {
        TextureKind::from_selector(self.texture_type)
    }

    pub fn shape(&self) -> ShapeKind {
        ShapeKind::from_selector(self.shape_variety)
    }

    pub fn has_organic_layer(&self) -> bool {
        self.organic_flow > ORGANIC_FLOW_THRESHOLD
    }
}

impl From<&HashDigest> for VisualParameters {
    fn from(digest: &HashDigest) -> Self {
        Self::extract(digest)
    }
}

// Modulus results are always below the u32 divisor.
fn m(value: u64, modulus: u32) -> u32 {
    (value % u64::from(modulus)) as u32
}
