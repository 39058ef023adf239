//! Provides utility functions for the IWB conversion process,
//! including number formatting, XML escaping and viewbox parsing.

use crate::models::geometry::ViewBox;

// --- Formatting ---

/// Formats a coordinate for an attribute value: at most four decimals,
/// trailing zeros trimmed, negative zero written as `0`.
pub fn format_number(value: f64) -> String {
    let rounded = (value * 10_000.0).round() / 10_000.0;
    if rounded == 0.0 || !rounded.is_finite() {
        return "0".to_string();
    }
    let text = format!("{:.4}", rounded);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    text.to_string()
}

/// Escapes special XML characters for text content.
pub fn escape_xml_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escapes special XML characters for a double-quoted attribute value.
pub fn escape_xml_attribute(value: &str) -> String {
    escape_xml_text(value)
        .replace('"', "&quot;")
        .replace('\n', "&#10;")
}

// --- Parsing ---

/// Parses the document size from the description section.
///
/// Accepts `WxH` (origin at zero) or `x y w h`. Width and height must be
/// non-zero numbers.
pub fn parse_view_box(text: &str) -> Option<ViewBox> {
    let text = text.trim();
    let parts: Vec<&str> = text.split('x').collect();
    let (x, y, width, height) = if parts.len() == 2 {
        (0.0, 0.0, parts[0], parts[1])
    } else {
        let parts: Vec<&str> = text.split_whitespace().collect();
        if parts.len() != 4 {
            return None;
        }
        (
            parts[0].parse::<f64>().ok()?,
            parts[1].parse::<f64>().ok()?,
            parts[2],
            parts[3],
        )
    };
    let width = width.trim().parse::<f64>().ok()?;
    let height = height.trim().parse::<f64>().ok()?;
    if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
        return None;
    }
    Some(ViewBox {
        x,
        y,
        width,
        height,
    })
}

/// Formats a viewbox as the IWB `viewbox` attribute (`x y w h`).
pub fn format_view_box(view_box: &ViewBox) -> String {
    format!(
        "{} {} {} {}",
        format_number(view_box.x),
        format_number(view_box.y),
        format_number(view_box.width),
        format_number(view_box.height)
    )
}

/// Reads a numeric attribute, treating a missing or unparsable value as 0.
pub fn parse_number(value: Option<&str>) -> f64 {
    value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Lower-cased extension of a reference path (`images/a.PNG` → `png`).
pub fn reference_extension(reference: &str) -> Option<String> {
    let file_name = reference.rsplit(['/', '\\']).next()?;
    let (stem, extension) = file_name.rsplit_once('.')?;
    if stem.is_empty() || extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}
