//! Routes every source attribute to the part of the IWB output it belongs to.
//!
//! Classification is a pure function of the attribute's local name and the
//! destination tag, driven by the constant tables below.

use super::constants::{ATTR_ID, ATTR_TRANSFORM, ATTR_TYPE, ATTR_UUID, ATTR_Z_VALUE};

/// Where an attribute ends up in the destination document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeClass {
    /// Copied onto the SVG presentation element.
    DirectSvgAttribute,
    /// Copied onto the IWB metadata element.
    IwbMetaAttribute,
    /// Resolved by the geometry resolver.
    GeometryAttribute,
    /// Points at a media asset that must be relocated.
    ContentReferenceAttribute,
    /// Dropped.
    Unrecognized,
}

/// Attributes copied verbatim onto the `iwb:element` annotation.
pub const IWB_ATTRIBUTES: &[&str] = &["locked", "background", "highlight", "editable"];

/// Attributes referencing external media.
pub const CONTENT_REFERENCE_ATTRIBUTES: &[&str] = &["href", "src"];

/// Attributes that trigger geometry resolution.
pub const GEOMETRY_ATTRIBUTES: &[&str] = &[ATTR_TRANSFORM];

/// Attributes consumed by the transcoder itself, never classified.
pub const CONTROL_ATTRIBUTES: &[&str] = &[ATTR_Z_VALUE, ATTR_TYPE, ATTR_UUID, ATTR_ID];

/// Presentation attributes a group hands down to its children.
pub const INHERITABLE_ATTRIBUTES: &[&str] = &[
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "opacity",
    "z-value",
];

const COMMON_SVG_ATTRIBUTES: &[&str] = &[
    "x",
    "y",
    "width",
    "height",
    "fill",
    "fill-opacity",
    "stroke",
    "stroke-width",
    "stroke-opacity",
    "opacity",
];

const POLY_SVG_ATTRIBUTES: &[&str] = &["points", "fill-rule", "stroke-linejoin", "stroke-linecap"];
const LINE_SVG_ATTRIBUTES: &[&str] = &["x1", "y1", "x2", "y2", "stroke-linecap"];
const MEDIA_SVG_ATTRIBUTES: &[&str] = &["preserveAspectRatio"];
const RECT_SVG_ATTRIBUTES: &[&str] = &["rx", "ry"];
const TEXT_SVG_ATTRIBUTES: &[&str] = &[
    "font-family",
    "font-size",
    "font-weight",
    "font-style",
    "text-decoration",
    "text-anchor",
];

/// Tag-specific presentation attributes, on top of the common set.
fn tag_svg_attributes(destination_tag: &str) -> &'static [&'static str] {
    match destination_tag {
        "polygon" | "polyline" => POLY_SVG_ATTRIBUTES,
        "line" => LINE_SVG_ATTRIBUTES,
        "image" | "video" | "audio" => MEDIA_SVG_ATTRIBUTES,
        "rect" => RECT_SVG_ATTRIBUTES,
        "text" | "textarea" | "tspan" => TEXT_SVG_ATTRIBUTES,
        _ => &[],
    }
}

/// Classifies `attribute_name` for an element that will be written as
/// `destination_tag`.
///
/// The IWB, content-reference and geometry tables win regardless of the
/// tag; otherwise the name must be in the tag's presentation allowlist.
pub fn classify(attribute_name: &str, destination_tag: &str) -> AttributeClass {
    if IWB_ATTRIBUTES.contains(&attribute_name) {
        AttributeClass::IwbMetaAttribute
    } else if CONTENT_REFERENCE_ATTRIBUTES.contains(&attribute_name) {
        AttributeClass::ContentReferenceAttribute
    } else if GEOMETRY_ATTRIBUTES.contains(&attribute_name) {
        AttributeClass::GeometryAttribute
    } else if COMMON_SVG_ATTRIBUTES.contains(&attribute_name)
        || tag_svg_attributes(destination_tag).contains(&attribute_name)
    {
        AttributeClass::DirectSvgAttribute
    } else {
        AttributeClass::Unrecognized
    }
}

pub fn is_control_attribute(attribute_name: &str) -> bool {
    CONTROL_ATTRIBUTES.contains(&attribute_name)
}
