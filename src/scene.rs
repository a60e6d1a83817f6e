//! Scene Composer
//!
//! Builds the artwork as a fixed stack of layers. Parameters decide what a
//! layer contains, never where it sits in the stack.

use serde::Serialize;
use std::fmt;

use crate::hashing::{artwork_digest, HashDigest};
use crate::params::VisualParameters;
use crate::svg::{escape_text, num, CANVAS_SIZE, SVG_NS, XHTML_NS};
use crate::text::{quote_font_size, truncate_quote};
use crate::variants::shape_anchor;

/// Caption of the branding mark.
pub const BRAND_CAPTION: &str = "✦ QUOTE NFT ✦";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Definitions,
    Background,
    GeometricArt,
    OrganicArt,
    Frame,
    QuoteText,
    Author,
    Branding,
    Overlays,
}

impl LayerKind {
    /// Stacking order, bottom first.
    pub const ORDER: [LayerKind; 9] = [
        LayerKind::Definitions,
        LayerKind::Background,
        LayerKind::GeometricArt,
        LayerKind::OrganicArt,
        LayerKind::Frame,
        LayerKind::QuoteText,
        LayerKind::Author,
        LayerKind::Branding,
        LayerKind::Overlays,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LayerKind::Definitions => "definitions",
            LayerKind::Background => "background",
            LayerKind::GeometricArt => "geometric-art",
            LayerKind::OrganicArt => "organic-art",
            LayerKind::Frame => "frame",
            LayerKind::QuoteText => "quote-text",
            LayerKind::Author => "author",
            LayerKind::Branding => "branding",
            LayerKind::Overlays => "overlays",
        }
    }
}

/// One self-contained markup fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer {
    pub kind: LayerKind,
    pub markup: String,
}

impl Layer {
    fn new(kind: LayerKind, markup: String) -> Self {
        Self { kind, markup }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    layers: Vec<Layer>,
}

impl Scene {
    /// Compose every layer for `params`; `text` is the quote and `label`
    /// the author.
    pub fn compose(params: &VisualParameters, text: &str, label: &str) -> Self {
        let display_quote = truncate_quote(text);

        let mut layers = Vec::with_capacity(LayerKind::ORDER.len());
        layers.push(Layer::new(LayerKind::Definitions, definitions(params)));
        layers.push(Layer::new(LayerKind::Background, background(params)));
        layers.push(Layer::new(LayerKind::GeometricArt, geometric_art(params)));
        if params.has_organic_layer() {
            layers.push(Layer::new(LayerKind::OrganicArt, organic_art(params)));
        }
        layers.push(Layer::new(LayerKind::Frame, frame(params)));
        layers.push(Layer::new(LayerKind::QuoteText, quote_text(params, &display_quote)));
        layers.push(Layer::new(LayerKind::Author, author(params, label)));
        layers.push(Layer::new(LayerKind::Branding, branding(params)));
        layers.push(Layer::new(LayerKind::Overlays, overlays(params)));

        Self { layers }
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, kind: LayerKind) -> Option<&Layer> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    pub fn kinds(&self) -> Vec<LayerKind> {
        self.layers.iter().map(|l| l.kind).collect()
    }
}

/// A finished artwork: the scene inside its fixed-size container.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtwork {
    digest: HashDigest,
    params: VisualParameters,
    scene: Scene,
}

impl GeneratedArtwork {
    /// Run the whole pipeline for a quote and its author.
    pub fn generate(quote: &str, author: &str) -> Self {
        let digest = artwork_digest(quote, author);
        let params = VisualParameters::extract(&digest);
        let scene = Scene::compose(&params, quote, author);
        Self { digest, params, scene }
    }

    pub fn digest(&self) -> &HashDigest {
        &self.digest
    }

    pub fn params(&self) -> &VisualParameters {
        &self.params
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn width(&self) -> u32 {
        CANVAS_SIZE
    }

    pub fn height(&self) -> u32 {
        CANVAS_SIZE
    }

    pub fn to_svg(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeneratedArtwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            r#"<svg width="{w}" height="{h}" viewBox="0 0 {w} {h}" xmlns="{SVG_NS}">"#,
            w = self.width(),
            h = self.height(),
        )?;
        for layer in &self.scene.layers {
            writeln!(f, "<!-- {} -->", layer.kind.name())?;
            writeln!(f, "{}", layer.markup)?;
        }
        f.write_str("</svg>\n")
    }
}

fn definitions(p: &VisualParameters) -> String {
    [
        gradients(p),
        p.pattern().render(p),
        filters(p),
        clip_paths(),
        p.texture().render(p),
    ]
    .into_iter()
    .fold(String::from("<defs>\n"), |mut acc, part| {
        acc.push_str(&part);
        acc.push('\n');
        acc
    }) + "</defs>"
}

fn gradients(p: &VisualParameters) -> String {
    let (bg1, bg2, bg3) = (p.bg_color1, p.bg_color2, p.bg_color3);
    let (a1, a2, a3) = (p.accent_color1, p.accent_color2, p.accent_color3);
    let text = p.text_color;
    let dur = p.animation_duration;
    format!(
        r#"<linearGradient id="bgGradient" x1="0%" y1="0%" x2="100%" y2="100%">
<stop offset="0%" style="stop-color:{bg1};stop-opacity:1"/>
<stop offset="50%" style="stop-color:{bg2};stop-opacity:0.9"/>
<stop offset="100%" style="stop-color:{bg3};stop-opacity:1"/>
</linearGradient>
<radialGradient id="depthGradient" cx="50%" cy="30%" r="80%">
<stop offset="0%" style="stop-color:{a1};stop-opacity:0.4"/>
<stop offset="70%" style="stop-color:{a2};stop-opacity:0.2"/>
<stop offset="100%" style="stop-color:{bg1};stop-opacity:0.1"/>
</radialGradient>
<linearGradient id="accentGradient1" x1="0%" y1="0%" x2="100%" y2="0%">
<stop offset="0%" style="stop-color:{a1};stop-opacity:0.8"/>
<stop offset="50%" style="stop-color:{a2};stop-opacity:0.6"/>
<stop offset="100%" style="stop-color:{a3};stop-opacity:0.4"/>
</linearGradient>
<radialGradient id="accentGradient2" cx="30%" cy="70%" r="60%">
<stop offset="0%" style="stop-color:{a2};stop-opacity:0.7"/>
<stop offset="100%" style="stop-color:{a1};stop-opacity:0.2"/>
</radialGradient>
<linearGradient id="textGradient" x1="0%" y1="0%" x2="100%" y2="100%">
<stop offset="0%" style="stop-color:{text};stop-opacity:1"/>
<stop offset="100%" style="stop-color:{a1};stop-opacity:0.9"/>
</linearGradient>
<linearGradient id="shimmer" x1="0%" y1="0%" x2="100%" y2="0%">
<stop offset="0%" style="stop-color:transparent;stop-opacity:0"/>
<stop offset="50%" style="stop-color:{a3};stop-opacity:0.6"/>
<stop offset="100%" style="stop-color:transparent;stop-opacity:0"/>
<animateTransform attributeName="gradientTransform" type="translate" values="-100 0;100 0;-100 0" dur="{dur}s" repeatCount="indefinite"/>
</linearGradient>"#
    )
}

fn filters(p: &VisualParameters) -> String {
    let (a1, a3) = (p.accent_color1, p.accent_color3);
    format!(
        r#"<filter id="glow" x="-50%" y="-50%" width="200%" height="200%">
<feGaussianBlur stdDeviation="{blur}" result="coloredBlur"/>
<feMerge>
<feMergeNode in="coloredBlur"/>
<feMergeNode in="SourceGraphic"/>
</feMerge>
</filter>
<filter id="softBlur" x="-20%" y="-20%" width="140%" height="140%">
<feGaussianBlur stdDeviation="2" result="blur"/>
<feColorMatrix in="blur" type="matrix" values="1 0 0 0 0  0 1 0 0 0  0 0 1 0 0  0 0 0 0.7 0"/>
</filter>
<filter id="emboss" x="-20%" y="-20%" width="140%" height="140%">
<feConvolveMatrix order="3" kernelMatrix="1 1 0 1 0 -1 0 -1 -1"/>
<feColorMatrix type="saturate" values="0"/>
<feOffset dx="2" dy="2"/>
<feFlood flood-color="{a1}" flood-opacity="0.3"/>
<feComposite operator="over"/>
</filter>
<filter id="noise" x="0%" y="0%" width="100%" height="100%">
<feTurbulence baseFrequency="{noise}" numOctaves="3" seed="{seed}" stitchTiles="stitch"/>
<feColorMatrix type="saturate" values="0"/>
<feComponentTransfer>
<feFuncA type="discrete" tableValues="0 0.1 0.2 0.1 0"/>
</feComponentTransfer>
<feComposite operator="multiply"/>
</filter>
<filter id="distort" x="-20%" y="-20%" width="140%" height="140%">
<feTurbulence baseFrequency="0.02" numOctaves="2" result="turbulence"/>
<feDisplacementMap in="SourceGraphic" in2="turbulence" scale="5"/>
</filter>
<filter id="metallic" x="-50%" y="-50%" width="200%" height="200%">
<feGaussianBlur stdDeviation="1" result="blur"/>
<feSpecularLighting result="specOut" lighting-color="{a3}" specularConstant="2" specularExponent="20">
<fePointLight x="250" y="150" z="200"/>
</feSpecularLighting>
<feComposite in="specOut" in2="SourceAlpha" operator="in"/>
<feComposite in="SourceGraphic" operator="over"/>
</filter>"#,
        blur = p.blur_radius,
        noise = num(p.noise_intensity),
        seed = p.rotation,
    )
}

fn clip_paths() -> String {
    r#"<clipPath id="organicClip">
<path d="M50,50 Q150,20 250,50 T450,50 Q450,150 400,250 Q350,350 250,350 Q150,350 100,250 Q50,150 50,50 Z"/>
</clipPath>
<clipPath id="geometricClip">
<polygon points="100,100 400,100 450,200 400,400 100,400 50,200"/>
</clipPath>
<clipPath id="frameClip">
<rect x="20" y="20" width="460" height="460" rx="40" ry="40"/>
</clipPath>"#
        .to_string()
}

fn background(p: &VisualParameters) -> String {
    format!(
        r#"<rect width="100%" height="100%" fill="url(#bgGradient)"/>
<rect width="100%" height="100%" fill="url(#{texture})" opacity="0.4"/>
<rect width="100%" height="100%" fill="url(#depthGradient)"/>
<rect width="100%" height="100%" fill="url(#pattern)" transform="rotate({rot} 250 250)" opacity="0.6"/>
<rect width="100%" height="100%" fill="url(#pattern)" transform="rotate({rot2} 250 250) scale({scale})" opacity="0.3"/>"#,
        texture = p.texture().element_id(),
        rot = p.rotation,
        rot2 = p.secondary_rotation,
        scale = num(p.scale),
    )
}

fn geometric_art(p: &VisualParameters) -> String {
    let shape = p.shape();
    let count = p.geometric_complexity;
    (0..count)
        .map(|i| {
            let (angle, x, y) = shape_anchor(i, count);
            shape.render(p, i, angle, x, y)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn organic_art(p: &VisualParameters) -> String {
    let flow_start = "M50,250 Q150,150 250,250 T450,250";
    let flow_dip = "M50,250 Q150,350 250,250 T450,250";
    let mut out = format!(
        r#"<path d="{flow_start}" stroke="{stroke}" stroke-width="{w}" fill="none" opacity="0.3" filter="url(#softBlur)">
<animate attributeName="d" values="{flow_start};{flow_dip};{flow_start}" dur="{dur}s" repeatCount="indefinite"/>
</path>"#,
        stroke = p.accent_color1,
        w = p.brush_stroke_width * 3,
        dur = p.animation_duration * 2,
    );

    for i in 0..3u32 {
        let x = 100 + i * 150;
        let y = 100 + i * 100;
        let rot = p.rotation + i * 45;
        out.push_str(&format!(
            r#"
<ellipse cx="{x}" cy="{y}" rx="{rx}" ry="{ry}" fill="{fill}" opacity="0.2" filter="url(#softBlur)" transform="rotate({rot} {x} {y})">
<animateTransform attributeName="transform" type="rotate" values="{rot};{rot_end};{rot}" dur="{dur}s" repeatCount="indefinite"/>
</ellipse>"#,
            rx = 20 + i * 10,
            ry = 15 + i * 8,
            fill = p.accent_color2,
            rot_end = rot + 360,
            dur = p.animation_duration * 3,
        ));
    }
    out
}

fn frame(p: &VisualParameters) -> String {
    let (a1, a2) = (p.accent_color1, p.accent_color2);
    format!(
        r#"<rect x="10" y="10" width="480" height="480" fill="none" stroke="url(#accentGradient1)" stroke-width="3" rx="20" ry="20" opacity="0.6"/>
<rect x="20" y="20" width="460" height="460" fill="none" stroke="url(#accentGradient2)" stroke-width="1" rx="15" ry="15" opacity="0.4"/>
<g opacity="0.5">
<path d="M30,30 L60,30 L60,35 L35,35 L35,60 L30,60 Z" fill="{a1}"/>
<path d="M470,30 L440,30 L440,35 L465,35 L465,60 L470,60 Z" fill="{a1}"/>
<path d="M30,470 L60,470 L60,465 L35,465 L35,440 L30,440 Z" fill="{a1}"/>
<path d="M470,470 L440,470 L440,465 L465,465 L465,440 L470,440 Z" fill="{a1}"/>
</g>
<g opacity="0.4">
<circle cx="250" cy="25" r="5" fill="{a2}"/>
<circle cx="25" cy="250" r="5" fill="{a2}"/>
<circle cx="475" cy="250" r="5" fill="{a2}"/>
<circle cx="250" cy="475" r="5" fill="{a2}"/>
</g>"#
    )
}

fn quote_text(p: &VisualParameters, display_quote: &str) -> String {
    let (a1, a2) = (p.accent_color1, p.accent_color2);
    let mark = format!(r#"<span style="font-size: 1.5em; color: {a1}; opacity: 0.7;">"</span>"#);
    format!(
        r#"<rect x="50" y="120" width="400" height="160" fill="{a1}" opacity="0.1" rx="15" ry="15" filter="url(#softBlur)"/>
<foreignObject x="60" y="130" width="380" height="140">
<div xmlns="{XHTML_NS}" style="font-family: 'Georgia', 'Times New Roman', serif; font-size: {size}px; line-height: 1.5; color: {color}; text-align: center; padding: 20px; text-shadow: 2px 2px 4px {shadow}; font-weight: 400; letter-spacing: 0.5px;">{mark}{quote}{mark}</div>
</foreignObject>
<text x="70" y="150" font-family="Georgia, serif" font-size="40" fill="{a2}" opacity="0.3" font-weight="bold">"</text>
<text x="430" y="250" font-family="Georgia, serif" font-size="40" fill="{a2}" opacity="0.3" font-weight="bold">"</text>"#,
        size = quote_font_size(display_quote),
        color = p.text_color,
        shadow = p.text_shadow_color,
        quote = escape_text(display_quote),
    )
}

fn author(p: &VisualParameters, label: &str) -> String {
    format!(
        r#"<rect x="150" y="300" width="200" height="40" fill="url(#accentGradient1)" opacity="0.15" rx="20" ry="20"/>
<text x="250" y="325" font-family="Georgia, serif" font-size="18" font-style="italic" fill="{color}" text-anchor="middle" opacity="0.9" filter="url(#glow)">— {label}</text>
<line x1="180" y1="335" x2="320" y2="335" stroke="{a2}" stroke-width="1" opacity="0.5"/>"#,
        color = p.text_color,
        label = escape_text(label),
        a2 = p.accent_color2,
    )
}

fn branding(p: &VisualParameters) -> String {
    format!(
        r#"<rect x="200" y="380" width="100" height="30" fill="url(#accentGradient2)" opacity="0.2" rx="15" ry="15"/>
<text x="250" y="400" font-family="Arial, sans-serif" font-size="14" fill="{a1}" text-anchor="middle" font-weight="bold" opacity="0.8" filter="url(#glow)">{BRAND_CAPTION}</text>
<rect x="200" y="380" width="100" height="30" fill="url(#shimmer)" rx="15" ry="15"/>"#,
        a1 = p.accent_color1,
    )
}

fn overlays(p: &VisualParameters) -> String {
    format!(
        r#"<rect width="100%" height="100%" fill="url(#noise)" opacity="0.03"/>
<rect width="100%" height="100%" fill="url(#depthGradient)" opacity="0.1"/>
<rect width="100%" height="100%" fill="none" stroke="{a1}" stroke-width="1" opacity="0.2" filter="url(#glow)"/>"#,
        a1 = p.accent_color1,
    )
}
