//! Defines constants used throughout the UBZ to IWB conversion process.

// Package file names
pub const METADATA_FILE: &str = "metadata.rdf";
pub const CONTENT_FILE: &str = "content.xml";
pub const PAGE_PREFIX: &str = "page";
pub const PAGE_EXTENSION: &str = "svg";

// Source tag names
pub const TAG_DESCRIPTION: &str = "Description";
pub const TAG_SIZE: &str = "size";
pub const TAG_SVG: &str = "svg";
pub const TAG_GROUP_SECTION: &str = "group";

// Source attribute names (local names, prefixes stripped)
pub const ATTR_ABOUT: &str = "about";
pub const ATTR_DARK_BACKGROUND: &str = "dark-background";
pub const ATTR_CROSSED_BACKGROUND: &str = "crossed-background";
pub const ATTR_TYPE: &str = "type";
pub const ATTR_Z_VALUE: &str = "z-value";
pub const ATTR_UUID: &str = "uuid";
pub const ATTR_ID: &str = "id";
pub const ATTR_TRANSFORM: &str = "transform";
pub const ATTR_STYLE: &str = "style";

// Destination names
pub const IWB_ELEMENT: &str = "element";
pub const IWB_REF: &str = "ref";
pub const IWB_BACKGROUND: &str = "background";
pub const IWB_LOCKED: &str = "locked";
pub const XLINK_HREF: &str = "xlink:href";
pub const TRUE_VALUE: &str = "true";

// Namespaces and prefixes
pub const NS_IWB: &str = "http://www.becta.org.uk/iwb";
pub const NS_SVG: &str = "http://www.w3.org/2000/svg";
pub const NS_XLINK: &str = "http://www.w3.org/1999/xlink";
pub const NS_DC: &str = "http://purl.org/dc/elements/1.1/";
pub const NS_UB: &str = "http://uniboard.mnemis.com/document";

/// Known namespace prefixes used when writing metadata entries.
pub const KNOWN_PREFIXES: &[(&str, &str)] = &[
    (NS_DC, "dc"),
    (NS_UB, "ub"),
    (NS_IWB, "iwb"),
    (NS_SVG, "svg"),
    (NS_XLINK, "xlink"),
];

// Background defaults
pub const DARK_FILL: &str = "black";
pub const LIGHT_FILL: &str = "white";
pub const DARK_GRID_COLOR: &str = "white";
pub const LIGHT_GRID_COLOR: &str = "blue";
pub const DEFAULT_GRID_SPACING: u32 = 32;
pub const DEFAULT_GRID_LINE_WIDTH: u32 = 5;

// Extension used for re-rasterized vector images and widget previews
pub const RASTER_EXTENSION: &str = "png";
