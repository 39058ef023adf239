//! Raster canvas collaborator: paints page backgrounds into PNG bytes.

use thiserror::Error;
use tiny_skia::{Color, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Grid drawn over a background fill.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSpec {
    pub spacing: u32,
    pub color: String,
    pub line_width: f32,
}

/// What the converter wants painted.
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundRequest {
    pub width: u32,
    pub height: u32,
    /// CSS colour name or `#rrggbb`.
    pub fill: String,
    pub grid: Option<GridSpec>,
}

#[derive(Error, Debug)]
pub enum CanvasError {
    #[error("invalid raster size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("unknown colour '{0}'")]
    UnknownColor(String),
    #[error("png encode failed: {0}")]
    Encode(String),
}

/// Paints background rasters for the converter.
pub trait BackgroundCanvas {
    fn paint_background(&self, request: &BackgroundRequest) -> Result<Vec<u8>, CanvasError>;
}

/// [`BackgroundCanvas`] backed by `tiny-skia`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkiaCanvas;

impl BackgroundCanvas for SkiaCanvas {
    fn paint_background(&self, request: &BackgroundRequest) -> Result<Vec<u8>, CanvasError> {
        let mut pixmap =
            Pixmap::new(request.width, request.height).ok_or(CanvasError::InvalidSize {
                width: request.width,
                height: request.height,
            })?;
        pixmap.fill(parse_color(&request.fill)?);

        if let Some(grid) = request.grid.as_ref().filter(|g| g.spacing > 0) {
            let mut paint = Paint::default();
            paint.set_color(parse_color(&grid.color)?);
            paint.anti_alias = false;
            let stroke = Stroke {
                width: grid.line_width,
                ..Stroke::default()
            };

            let width = request.width as f32;
            let height = request.height as f32;
            let mut builder = PathBuilder::new();
            for x in (0..request.width).step_by(grid.spacing as usize) {
                builder.move_to(x as f32, 0.0);
                builder.line_to(x as f32, height);
            }
            for y in (0..request.height).step_by(grid.spacing as usize) {
                builder.move_to(0.0, y as f32);
                builder.line_to(width, y as f32);
            }
            if let Some(path) = builder.finish() {
                pixmap.stroke_path(&path, &paint, &stroke, Transform::identity(), None);
            }
        }

        pixmap
            .encode_png()
            .map_err(|e| CanvasError::Encode(e.to_string()))
    }
}

/// Parses the colour names the converter emits, plus `#rgb` / `#rrggbb`.
pub fn parse_color(value: &str) -> Result<Color, CanvasError> {
    let value = value.trim();
    let rgb = match value.to_ascii_lowercase().as_str() {
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "blue" => (0, 0, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "gray" | "grey" => (128, 128, 128),
        "lightgray" | "lightgrey" => (211, 211, 211),
        hex if hex.starts_with('#') => parse_hex(&hex[1..])
            .ok_or_else(|| CanvasError::UnknownColor(value.to_string()))?,
        _ => return Err(CanvasError::UnknownColor(value.to_string())),
    };
    Ok(Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255))
}

fn parse_hex(hex: &str) -> Option<(u8, u8, u8)> {
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some((
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 17);
            Some((short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Remembers every request and answers with a fixed payload.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingCanvas {
        pub requests: RefCell<Vec<BackgroundRequest>>,
    }

    impl BackgroundCanvas for RecordingCanvas {
        fn paint_background(&self, request: &BackgroundRequest) -> Result<Vec<u8>, CanvasError> {
            self.requests.borrow_mut().push(request.clone());
            Ok(b"png".to_vec())
        }
    }

    #[test]
    fn paints_a_png_of_the_requested_size() {
        let request = BackgroundRequest {
            width: 64,
            height: 48,
            fill: "black".to_string(),
            grid: Some(GridSpec {
                spacing: 16,
                color: "white".to_string(),
                line_width: 1.0,
            }),
        };
        let png = SkiaCanvas.paint_background(&request).unwrap();
        assert!(png.starts_with(b"\x89PNG"));

        let decoded = Pixmap::decode_png(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 48));
        // Centre of the first cell keeps the fill colour.
        let pixel = decoded.pixel(8, 8).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0, 0, 0));
    }

    #[test]
    fn rejects_empty_rasters_and_unknown_colours() {
        let mut request = BackgroundRequest {
            width: 0,
            height: 10,
            fill: "white".to_string(),
            grid: None,
        };
        assert!(matches!(
            SkiaCanvas.paint_background(&request),
            Err(CanvasError::InvalidSize { .. })
        ));
        request.width = 10;
        request.fill = "chartreuse-ish".to_string();
        assert!(matches!(
            SkiaCanvas.paint_background(&request),
            Err(CanvasError::UnknownColor(_))
        ));
    }

    #[test]
    fn parses_hex_colours() {
        let c = parse_color("#ff8000").unwrap();
        assert_eq!(c, Color::from_rgba8(255, 128, 0, 255));
        assert_eq!(parse_color("#fff").unwrap(), Color::WHITE);
        assert!(parse_color("#12").is_err());
    }
}
