//! Resolves UBZ `transform="matrix(..)"` values into the canonical IWB
//! placement: position, scaled size, and a `rotate(..) translate(..)`
//! transform.

use log::warn;

use super::utils::format_number;
use crate::models::geometry::{GeometryResult, TransformMatrix};

/// Parses a `matrix(a,b,c,d,e,f)` string.
///
/// Malformed input (missing wrapper terms, fewer than six numbers, a token
/// that is not a number) yields the identity matrix instead of an error.
pub fn resolve_transform(raw: &str) -> TransformMatrix {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("matrix")
        .map(str::trim_start)
        .and_then(|rest| rest.strip_prefix('('))
        .and_then(|rest| rest.trim_end().strip_suffix(')'))
        .unwrap_or(trimmed);

    let tokens: Vec<&str> = inner
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .collect();

    let values: Option<Vec<f64>> = tokens
        .iter()
        .map(|token| token.parse::<f64>().ok().filter(|v| v.is_finite()))
        .collect();

    match values {
        Some(v) if v.len() >= 6 => TransformMatrix {
            a: v[0],
            b: v[1],
            c: v[2],
            d: v[3],
            e: v[4],
            f: v[5],
        },
        _ => {
            warn!(
                "Ignoring malformed transform '{}', using the identity matrix.",
                raw
            );
            TransformMatrix::IDENTITY
        }
    }
}

/// Rotation angle (degrees) carried by the matrix, in the IWB convention.
///
/// The 180° correction is applied whenever `a < 0`, whatever the sign of
/// `b`. Downstream consumers rely on this convention.
pub fn rotation_angle(matrix: &TransformMatrix) -> f64 {
    let mut angle = -matrix.b.atan2(matrix.a).to_degrees();
    if matrix.a < 0.0 {
        angle += 180.0;
    }
    if angle == 0.0 {
        0.0
    } else {
        angle
    }
}

/// Decomposes the placement of a `width × height` box at `(x, y)` under
/// `matrix`.
///
/// The box is rotated by the extracted angle around its centre before the
/// matrix is applied; the resulting scene matrix yields the horizontal and
/// vertical scale (its `a` and `d` terms) and the residual offset of the
/// box's origin.
pub fn resolve_geometry(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    matrix: &TransformMatrix,
) -> GeometryResult {
    let rotation = rotation_angle(matrix);
    let center_x = x + width / 2.0;
    let center_y = y + height / 2.0;

    let around_center = TransformMatrix::translation(center_x, center_y)
        .then_apply_to(&TransformMatrix::rotation(rotation))
        .then_apply_to(&TransformMatrix::translation(-center_x, -center_y));
    let scene = matrix.then_apply_to(&around_center);

    let (origin_x, origin_y) = scene.map_point(x, y);

    GeometryResult {
        x,
        y,
        width: width * scene.a,
        height: height * scene.d,
        rotation,
        translate_x: origin_x - x,
        translate_y: origin_y - y,
    }
}

/// The IWB transform attribute for a resolved geometry.
pub fn format_transform(geometry: &GeometryResult) -> String {
    format!(
        "rotate({}) translate({},{})",
        format_number(geometry.rotation),
        format_number(geometry.translate_x),
        format_number(geometry.translate_y)
    )
}

/// Applies `matrix` to an SVG point list (`x,y x,y ...`).
///
/// Returns `None` when the list cannot be parsed as coordinate pairs.
pub fn transform_points(points: &str, matrix: &TransformMatrix) -> Option<String> {
    let numbers: Option<Vec<f64>> = points
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(|token| token.parse::<f64>().ok())
        .collect();
    let numbers = numbers?;
    if numbers.is_empty() || numbers.len() % 2 != 0 {
        return None;
    }

    let mapped: Vec<String> = numbers
        .chunks(2)
        .map(|pair| {
            let (x, y) = matrix.map_point(pair[0], pair[1]);
            format!("{},{}", format_number(x), format_number(y))
        })
        .collect();
    Some(mapped.join(" "))
}
