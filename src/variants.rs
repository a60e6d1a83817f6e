//! Categorical selectors.
//!
//! Each selector field of [`VisualParameters`] is modelled as a closed enum
//! with one render function per tag. Selector values outside the mapped set
//! fall back explicitly in `from_selector`.

use serde::{Deserialize, Serialize};

use crate::params::VisualParameters;
use crate::svg::{num, polar, CENTER};

/// Tile pattern drawn twice over the background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Circles,
    Mandala,
    FlowingLines,
    Crystalline,
    ArtDeco,
    Tribal,
    Tech,
    DotMatrix,
}

impl PatternKind {
    pub const ALL: [PatternKind; 8] = [
        PatternKind::Circles,
        PatternKind::Mandala,
        PatternKind::FlowingLines,
        PatternKind::Crystalline,
        PatternKind::ArtDeco,
        PatternKind::Tribal,
        PatternKind::Tech,
        PatternKind::DotMatrix,
    ];

    /// Values 7 and above select the dot matrix.
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => PatternKind::Circles,
            1 => PatternKind::Mandala,
            2 => PatternKind::FlowingLines,
            3 => PatternKind::Crystalline,
            4 => PatternKind::ArtDeco,
            5 => PatternKind::Tribal,
            6 => PatternKind::Tech,
            _ => PatternKind::DotMatrix,
        }
    }

    /// `<pattern id="pattern">` definition for this variant.
    pub fn render(self, p: &VisualParameters) -> String {
        let (a1, a2, a3) = (p.accent_color1, p.accent_color2, p.accent_color3);
        let (size_w, size_h, body) = match self {
            PatternKind::Circles => (60, 60, format!(
                r#"<circle cx="30" cy="30" r="15" fill="none" stroke="{a1}" stroke-width="2" opacity="0.3"/>
<circle cx="30" cy="30" r="8" fill="{a2}" opacity="0.2"/>
<circle cx="15" cy="15" r="4" fill="{a3}" opacity="0.4"/>
<circle cx="45" cy="45" r="4" fill="{a3}" opacity="0.4"/>"#
            )),
            PatternKind::Mandala => (80, 80, format!(
                r#"<g transform="translate(40,40)">
<polygon points="0,-20 12,-6 20,0 12,6 0,20 -12,6 -20,0 -12,-6" fill="{a1}" opacity="0.2"/>
<polygon points="0,-12 7,-4 12,0 7,4 0,12 -7,4 -12,0 -7,-4" fill="{a2}" opacity="0.3"/>
<circle cx="0" cy="0" r="6" fill="{a3}" opacity="0.4"/>
</g>"#
            )),
            PatternKind::FlowingLines => (100, 100, format!(
                r#"<path d="M0,50 Q25,20 50,50 T100,50" stroke="{a1}" stroke-width="3" fill="none" opacity="0.2"/>
<path d="M0,25 Q50,5 100,25" stroke="{a2}" stroke-width="2" fill="none" opacity="0.3"/>
<path d="M0,75 Q50,95 100,75" stroke="{a3}" stroke-width="1" fill="none" opacity="0.4"/>"#
            )),
            PatternKind::Crystalline => (70, 70, format!(
                r#"<g transform="translate(35,35)">
<polygon points="0,-25 15,-8 25,0 15,8 0,25 -15,8 -25,0 -15,-8" fill="none" stroke="{a1}" stroke-width="1" opacity="0.3"/>
<polygon points="0,-15 9,-5 15,0 9,5 0,15 -9,5 -15,0 -9,-5" fill="{a2}" opacity="0.15"/>
<line x1="-25" y1="0" x2="25" y2="0" stroke="{a3}" stroke-width="0.5" opacity="0.4"/>
<line x1="0" y1="-25" x2="0" y2="25" stroke="{a3}" stroke-width="0.5" opacity="0.4"/>
</g>"#
            )),
            PatternKind::ArtDeco => (50, 100, format!(
                r#"<polygon points="25,0 40,20 25,40 10,20" fill="{a1}" opacity="0.2"/>
<polygon points="25,50 40,70 25,90 10,70" fill="{a2}" opacity="0.25"/>
<rect x="20" y="15" width="10" height="10" fill="{a3}" opacity="0.3"/>
<rect x="20" y="65" width="10" height="10" fill="{a3}" opacity="0.3"/>"#
            )),
            PatternKind::Tribal => (90, 90, format!(
                r#"<g transform="translate(45,45)">
<path d="M-20,-20 L20,-20 L30,0 L20,20 L-20,20 L-30,0 Z" fill="none" stroke="{a1}" stroke-width="2" opacity="0.3"/>
<circle cx="0" cy="0" r="12" fill="none" stroke="{a2}" stroke-width="1" opacity="0.4"/>
<polygon points="0,-8 4,-4 8,0 4,4 0,8 -4,4 -8,0 -4,-4" fill="{a3}" opacity="0.5"/>
</g>"#
            )),
            PatternKind::Tech => (60, 60, format!(
                r#"<rect x="10" y="10" width="40" height="40" fill="none" stroke="{a1}" stroke-width="1" opacity="0.3"/>
<rect x="20" y="20" width="20" height="20" fill="{a2}" opacity="0.2"/>
<circle cx="15" cy="15" r="3" fill="{a3}" opacity="0.6"/>
<circle cx="45" cy="15" r="3" fill="{a3}" opacity="0.6"/>
<circle cx="15" cy="45" r="3" fill="{a3}" opacity="0.6"/>
<circle cx="45" cy="45" r="3" fill="{a3}" opacity="0.6"/>
<line x1="15" y1="15" x2="45" y2="45" stroke="{a1}" stroke-width="0.5" opacity="0.4"/>
<line x1="45" y1="15" x2="15" y2="45" stroke="{a1}" stroke-width="0.5" opacity="0.4"/>"#
            )),
            PatternKind::DotMatrix => (40, 40, format!(
                r#"<circle cx="20" cy="20" r="6" fill="{a1}" opacity="0.3"/>
<circle cx="20" cy="20" r="3" fill="{a2}" opacity="0.4"/>
<circle cx="10" cy="10" r="2" fill="{a3}" opacity="0.5"/>
<circle cx="30" cy="10" r="2" fill="{a3}" opacity="0.5"/>
<circle cx="10" cy="30" r="2" fill="{a3}" opacity="0.5"/>
<circle cx="30" cy="30" r="2" fill="{a3}" opacity="0.5"/>"#
            )),
        };

        format!(
            "<pattern id=\"pattern\" x=\"0\" y=\"0\" width=\"{size_w}\" height=\"{size_h}\" patternUnits=\"userSpaceOnUse\">\n{body}\n</pattern>"
        )
    }
}

/// Background texture; exactly one is defined per artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureKind {
    Paper,
    Canvas,
    Marble,
    Silk,
}

impl TextureKind {
    pub const ALL: [TextureKind; 4] = [
        TextureKind::Paper,
        TextureKind::Canvas,
        TextureKind::Marble,
        TextureKind::Silk,
    ];

    /// Values 3 and above select silk.
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => TextureKind::Paper,
            1 => TextureKind::Canvas,
            2 => TextureKind::Marble,
            _ => TextureKind::Silk,
        }
    }

    /// Element id the background layer references.
    pub fn element_id(self) -> &'static str {
        match self {
            TextureKind::Paper => "paperTexture",
            TextureKind::Canvas => "canvasTexture",
            TextureKind::Marble => "marbleTexture",
            TextureKind::Silk => "silkTexture",
        }
    }

    pub fn render(self, p: &VisualParameters) -> String {
        let (a1, a2, a3) = (p.accent_color1, p.accent_color2, p.accent_color3);
        let (size, base, body) = match self {
            TextureKind::Paper => (100, p.bg_color1, format!(
                r#"<circle cx="20" cy="30" r="1" fill="{a1}" opacity="0.1"/>
<circle cx="70" cy="60" r="1.5" fill="{a2}" opacity="0.08"/>
<circle cx="40" cy="80" r="0.8" fill="{a3}" opacity="0.12"/>
<circle cx="85" cy="20" r="1.2" fill="{a1}" opacity="0.09"/>"#
            )),
            TextureKind::Canvas => {
                let mut body = String::new();
                for y in [10, 20, 30, 40] {
                    body.push_str(&format!(
                        "<line x1=\"0\" y1=\"{y}\" x2=\"50\" y2=\"{y}\" stroke=\"{a1}\" stroke-width=\"0.3\" opacity=\"0.15\"/>\n"
                    ));
                }
                for x in [10, 20, 30, 40] {
                    body.push_str(&format!(
                        "<line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"50\" stroke=\"{a2}\" stroke-width=\"0.3\" opacity=\"0.1\"/>\n"
                    ));
                }
                body.pop();
                (50, p.bg_color2, body)
            }
            TextureKind::Marble => (200, p.bg_color3, format!(
                r#"<path d="M0,100 Q50,80 100,100 T200,100" stroke="{a1}" stroke-width="3" fill="none" opacity="0.2"/>
<path d="M0,120 Q80,90 160,120 T200,120" stroke="{a2}" stroke-width="2" fill="none" opacity="0.15"/>
<path d="M0,80 Q120,110 200,80" stroke="{a3}" stroke-width="1" fill="none" opacity="0.25"/>"#
            )),
            TextureKind::Silk => (150, p.bg_color1, format!(
                r#"<ellipse cx="75" cy="75" rx="60" ry="30" fill="none" stroke="{a1}" stroke-width="1" opacity="0.1"/>
<ellipse cx="75" cy="75" rx="40" ry="20" fill="none" stroke="{a2}" stroke-width="0.5" opacity="0.15"/>
<ellipse cx="75" cy="75" rx="20" ry="10" fill="{a3}" opacity="0.08"/>"#
            )),
        };

        format!(
            "<pattern id=\"{id}\" x=\"0\" y=\"0\" width=\"{size}\" height=\"{size}\" patternUnits=\"userSpaceOnUse\">\n<rect width=\"{size}\" height=\"{size}\" fill=\"{base}\"/>\n{body}\n</pattern>",
            id = self.element_id(),
        )
    }
}

/// Shape strategy for the geometric layer.
///
/// Only three strategies exist. `shapeVariety` ranges over 0..=4 and values
/// 2, 3 and 4 all select [`ShapeKind::Curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Polygon,
    Ring,
    Curve,
}

impl ShapeKind {
    pub fn from_selector(selector: u32) -> Self {
        match selector {
            0 => ShapeKind::Polygon,
            1 => ShapeKind::Ring,
            2 => ShapeKind::Curve,
            // 3 and 4 have no strategy of their own.
            _ => ShapeKind::Curve,
        }
    }

    /// Render shape `index` anchored at `(x, y)`, where `angle` is its
    /// placement angle on the layout circle.
    pub fn render(self, p: &VisualParameters, index: u32, angle: f64, x: f64, y: f64) -> String {
        let dur = p.animation_duration;
        match self {
            ShapeKind::Polygon => {
                let sides = 3 + index % 6;
                let points: Vec<String> = (0..sides)
                    .map(|j| {
                        let (px, py) = polar(x, y, 20.0, 360.0 / f64::from(sides) * f64::from(j));
                        format!("{},{}", num(px), num(py))
                    })
                    .collect();
                format!(
                    r#"<polygon points="{points}" fill="{fill}" opacity="0.3" filter="url(#glow)" transform="rotate({rot} {x} {y})">
<animateTransform attributeName="transform" type="rotate" values="{a0};{a1};{a0}" dur="{dur}s" repeatCount="indefinite"/>
</polygon>"#,
                    points = points.join(" "),
                    fill = p.accent_color1,
                    rot = num(angle + f64::from(p.rotation)),
                    x = num(x),
                    y = num(y),
                    a0 = num(angle),
                    a1 = num(angle + 360.0),
                )
            }
            ShapeKind::Ring => {
                let r = 15 + index * 3;
                format!(
                    r#"<circle cx="{x}" cy="{y}" r="{r}" fill="none" stroke="{stroke}" stroke-width="{w}" opacity="0.4" filter="url(#glow)">
<animate attributeName="r" values="{r};{r_max};{r}" dur="{dur}s" repeatCount="indefinite"/>
<animate attributeName="opacity" values="0.4;0.8;0.4" dur="{dur}s" repeatCount="indefinite"/>
</circle>"#,
                    x = num(x),
                    y = num(y),
                    r_max = 25 + index * 3,
                    stroke = p.accent_color2,
                    w = p.brush_stroke_width,
                )
            }
            ShapeKind::Curve => {
                let w = p.brush_stroke_width;
                format!(
                    r#"<path d="M{x},{y} Q{qx},{qy} {mx},{y} T{ex},{y}" stroke="{stroke}" stroke-width="{w2}" fill="none" opacity="0.5" filter="url(#glow)">
<animate attributeName="stroke-width" values="{w2};{w4};{w2}" dur="{dur}s" repeatCount="indefinite"/>
</path>"#,
                    x = num(x),
                    y = num(y),
                    qx = num(x + 30.0),
                    qy = num(y - 30.0),
                    mx = num(x + 60.0),
                    ex = num(x + 120.0),
                    stroke = p.accent_color3,
                    w2 = w * 2,
                    w4 = w * 4,
                )
            }
        }
    }
}

/// Position of shape `index` out of `count` on the growing layout spiral.
pub fn shape_anchor(index: u32, count: u32) -> (f64, f64, f64) {
    let angle = 360.0 / f64::from(count) * f64::from(index);
    let radius = 100.0 + f64::from(index) * 30.0;
    let (x, y) = polar(CENTER, CENTER, radius, angle);
    (angle, x, y)
}
