//! Markup helpers shared by the composer.

use quick_xml::escape::partial_escape;

/// Logical canvas size; every artwork is square.
pub const CANVAS_SIZE: u32 = 500;

/// Canvas center, used as the pivot for rotations.
pub const CENTER: f64 = 250.0;

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
pub const XHTML_NS: &str = "http://www.w3.org/1999/xhtml";

/// Format a number the way it must appear in markup: shortest round-trip
/// digits, no trailing `.0` on integral values, never `-0`.
pub fn num(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{}", value)
}

/// Escape text content for inclusion between tags. Quotes stay literal.
pub fn escape_text(text: &str) -> String {
    partial_escape(text).into_owned()
}

/// `(x, y)` on a circle of `radius` around `(cx, cy)` at `degrees`.
///
/// Trigonometry goes through `libm` so coordinates print the same digits on
/// every platform.
pub fn polar(cx: f64, cy: f64, radius: f64, degrees: f64) -> (f64, f64) {
    let rad = degrees * std::f64::consts::PI / 180.0;
    (cx + libm::cos(rad) * radius, cy + libm::sin(rad) * radius)
}
