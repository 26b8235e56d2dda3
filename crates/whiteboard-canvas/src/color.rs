//! Color parsing for the renderer
//!
//! Stored colors are arbitrary strings. The renderer understands hex
//! notation (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`), `rgb()`/`rgba()` and a
//! handful of named colors; anything else is painted black.

use tiny_skia::Color as SkColor;
use tracing::debug;
use whiteboard_core::Color;

const NAMED: &[(&str, [u8; 4])] = &[
    ("black", [0, 0, 0, 255]),
    ("white", [255, 255, 255, 255]),
    ("red", [255, 0, 0, 255]),
    ("green", [0, 128, 0, 255]),
    ("lime", [0, 255, 0, 255]),
    ("blue", [0, 0, 255, 255]),
    ("yellow", [255, 255, 0, 255]),
    ("orange", [255, 165, 0, 255]),
    ("purple", [128, 0, 128, 255]),
    ("gray", [128, 128, 128, 255]),
    ("grey", [128, 128, 128, 255]),
    ("transparent", [0, 0, 0, 0]),
];

/// Parse a color string into RGBA bytes
#[must_use]
pub fn parse_rgba(value: &str) -> Option<[u8; 4]> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_functional(args);
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgba)| *rgba)
}

/// Resolve a stored color for painting, falling back to opaque black
#[must_use]
pub fn to_paint_color(color: &Color) -> SkColor {
    match parse_rgba(color.as_str()) {
        Some([r, g, b, a]) => SkColor::from_rgba8(r, g, b, a),
        None => {
            debug!(color = %color, "unrecognized color, painting black");
            SkColor::BLACK
        }
    }
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some([nibble(0)?, nibble(1)?, nibble(2)?, 255]),
        4 => Some([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?]),
        6 => Some([byte(0)?, byte(2)?, byte(4)?, 255]),
        8 => Some([byte(0)?, byte(2)?, byte(4)?, byte(6)?]),
        _ => None,
    }
}

fn parse_functional(args: &str) -> Option<[u8; 4]> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != 3 && parts.len() != 4 {
        return None;
    }

    let channel = |s: &str| s.parse::<f32>().ok().map(|v| v.clamp(0.0, 255.0).round() as u8);
    let alpha = match parts.get(3) {
        Some(a) => {
            let a: f32 = a.parse().ok()?;
            (a.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some([
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ])
}
