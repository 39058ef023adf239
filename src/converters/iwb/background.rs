//! Page backgrounds: a painted raster pinned to the FixedBackground layer,
//! optionally overlaid with grid lines.

use log::{debug, warn};

use super::{
    constants::{
        ATTR_CROSSED_BACKGROUND, ATTR_DARK_BACKGROUND, DARK_FILL, DARK_GRID_COLOR,
        IWB_BACKGROUND, IWB_ELEMENT, IWB_LOCKED, LIGHT_FILL, LIGHT_GRID_COLOR, RASTER_EXTENSION,
        TRUE_VALUE, XLINK_HREF,
    },
    context::ConversionContext,
    error::{ConversionError, Result},
    layers::layer_key,
    utils::format_number,
};
use crate::{
    canvas::{BackgroundRequest, GridSpec},
    config::GridMode,
    models::{
        elements::{LayerType, OutputElement},
        geometry::ViewBox,
        source_tree::SourceElement,
    },
};

/// Whether the page root asks for a background at all.
pub fn wants_background(root: &SourceElement) -> bool {
    root.has_attribute(ATTR_DARK_BACKGROUND) || root.has_attribute(ATTR_CROSSED_BACKGROUND)
}

/// Builds the background of a page whose root carries `dark-background` or
/// `crossed-background`.
///
/// The raster is painted by the context's canvas and stored as
/// `images/<id>.png`; grid lines are emitted as `line` elements unless the
/// options ask for them to be painted into the raster.
///
/// # Arguments
/// * `root` - The page's root `svg` element.
/// * `ctx` - The page conversion context.
pub fn build_background(root: &SourceElement, ctx: &mut ConversionContext<'_>) -> Result<()> {
    let Some(view_box) = ctx.view_box else {
        warn!("Page requests a background but the document has no view box, skipping it.");
        return Ok(());
    };

    // 1. Read the page flags.
    let dark = root.attribute(ATTR_DARK_BACKGROUND) == Some(TRUE_VALUE);
    let crossed = root.attribute(ATTR_CROSSED_BACKGROUND) == Some(TRUE_VALUE);
    let grid_color = if dark { DARK_GRID_COLOR } else { LIGHT_GRID_COLOR };
    debug!("Building background (dark: {}, crossed: {})", dark, crossed);

    let grid_mode = ctx.options.grid_mode;
    let spacing = ctx.options.grid_spacing;
    let line_width = ctx.options.grid_line_width;

    // 2. Paint the fill, with the grid baked in when rastering it.
    let request = BackgroundRequest {
        width: view_box.width.ceil() as u32,
        height: view_box.height.ceil() as u32,
        fill: if dark { DARK_FILL } else { LIGHT_FILL }.to_string(),
        grid: (crossed && grid_mode == GridMode::Raster).then(|| GridSpec {
            spacing,
            color: grid_color.to_string(),
            line_width: line_width as f32,
        }),
    };
    let bytes = ctx
        .canvas
        .paint_background(&request)
        .map_err(|e| ConversionError::Canvas(e.to_string()))?;

    // 3. Store the PNG and place it locked at the bottom of the page.
    let destination = format!("images/{}.{}", ctx.next_id(), RASTER_EXTENSION);
    ctx.store_generated(&destination, &bytes)?;

    let key = layer_key(LayerType::FixedBackground, None);
    let image = OutputElement::new("image")
        .with("x", format_number(view_box.x))
        .with("y", format_number(view_box.y))
        .with("width", format_number(view_box.width))
        .with("height", format_number(view_box.height))
        .with(XLINK_HREF, destination);
    let meta = OutputElement::new(IWB_ELEMENT)
        .with(IWB_BACKGROUND, TRUE_VALUE)
        .with(IWB_LOCKED, TRUE_VALUE);
    ctx.register(image, meta, key);

    // 4. Vector grids go on top of the image, in the same band.
    if crossed && grid_mode == GridMode::Vector {
        if spacing == 0 {
            warn!("Grid spacing is zero, no grid lines emitted.");
            return Ok(());
        }
        for line in grid_lines(&view_box, spacing, grid_color, line_width) {
            let meta = OutputElement::new(IWB_ELEMENT).with(IWB_BACKGROUND, TRUE_VALUE);
            ctx.register(line, meta, key);
        }
    }
    Ok(())
}

/// Vertical lines across the view box, then horizontal ones, every
/// `spacing` units starting at its top-left corner.
fn grid_lines(view_box: &ViewBox, spacing: u32, color: &str, width: u32) -> Vec<OutputElement> {
    let step = f64::from(spacing);
    let right = view_box.x + view_box.width;
    let bottom = view_box.y + view_box.height;
    let line = |x1: f64, y1: f64, x2: f64, y2: f64| {
        OutputElement::new("line")
            .with("x1", format_number(x1))
            .with("y1", format_number(y1))
            .with("x2", format_number(x2))
            .with("y2", format_number(y2))
            .with("stroke", color)
            .with("stroke-width", width.to_string())
    };

    let mut lines = Vec::new();
    let mut x = view_box.x;
    while x < right {
        lines.push(line(x, view_box.y, x, bottom));
        x += step;
    }
    let mut y = view_box.y;
    while y < bottom {
        lines.push(line(view_box.x, y, right, y));
        y += step;
    }
    lines
}
