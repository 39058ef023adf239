// src/models/elements.rs

use indexmap::IndexMap;
use serde::Serialize;

/// What kind of foreign object a UBZ `foreignObject` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ForeignObjectKind {
    /// Rich text (embedded XHTML), converted to an SVG `textarea`.
    Text,
    /// Widgets and other embedded containers, converted to a preview image.
    Other,
}

/// The closed set of source element types the transcoder understands.
///
/// Decided once per element by `classify_element_type`; every dispatch on it
/// is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    Image,
    Video,
    Audio,
    ForeignObject(ForeignObjectKind),
    Polygon,
    Polyline,
    Line,
    /// Structural container (`g`); never produces an element itself.
    Group,
}

impl ElementType {
    /// Maps a raw UBZ tag name to its element type.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "image" => Some(ElementType::Image),
            "video" => Some(ElementType::Video),
            "audio" => Some(ElementType::Audio),
            "foreignObject" => Some(ElementType::ForeignObject(ForeignObjectKind::Other)),
            "polygon" => Some(ElementType::Polygon),
            "polyline" => Some(ElementType::Polyline),
            "line" => Some(ElementType::Line),
            "g" => Some(ElementType::Group),
            _ => None,
        }
    }

    /// The SVG tag emitted for this type in the IWB document.
    pub fn destination_tag(self) -> &'static str {
        match self {
            ElementType::Image => "image",
            ElementType::Video => "video",
            ElementType::Audio => "audio",
            ElementType::ForeignObject(ForeignObjectKind::Text) => "textarea",
            ElementType::ForeignObject(ForeignObjectKind::Other) => "image",
            ElementType::Polygon => "polygon",
            ElementType::Polyline => "polyline",
            ElementType::Line => "line",
            ElementType::Group => "g",
        }
    }

    /// Base of the z-layer key for elements of this type.
    pub fn layer(self) -> LayerType {
        match self {
            ElementType::Image
            | ElementType::Video
            | ElementType::Audio
            | ElementType::ForeignObject(_) => LayerType::Object,
            ElementType::Polygon
            | ElementType::Polyline
            | ElementType::Line
            | ElementType::Group => LayerType::Graphic,
        }
    }

    /// Package folder for media referenced by this type, if it carries media.
    pub fn content_folder(self) -> Option<&'static str> {
        match self {
            ElementType::Image | ElementType::ForeignObject(ForeignObjectKind::Other) => {
                Some("images")
            }
            ElementType::Video => Some("videos"),
            ElementType::Audio => Some("audios"),
            ElementType::ForeignObject(ForeignObjectKind::Text)
            | ElementType::Polygon
            | ElementType::Polyline
            | ElementType::Line
            | ElementType::Group => None,
        }
    }

    /// Shapes described by points rather than by a box.
    pub fn is_point_based(self) -> bool {
        matches!(
            self,
            ElementType::Polygon | ElementType::Polyline | ElementType::Line
        )
    }
}

/// Paint-order bands. An element's z-layer key is its band plus its own
/// `z-value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LayerType {
    FixedBackground,
    Object,
    Graphic,
    Tool,
    Control,
}

impl LayerType {
    pub fn base_offset(self) -> i64 {
        match self {
            LayerType::FixedBackground => -2000,
            LayerType::Object => -1000,
            LayerType::Graphic => 0,
            LayerType::Tool => 1000,
            LayerType::Control => 2000,
        }
    }
}

/// A node of the generated document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputNode {
    Element(OutputElement),
    Text(String),
}

/// A generated element: local tag name, ordered attributes and children.
///
/// The namespace (SVG or IWB) is implied by where the element is written.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct OutputElement {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<OutputNode>,
}

impl OutputElement {
    pub fn new(tag: impl Into<String>) -> Self {
        OutputElement {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Sets an attribute, replacing any previous value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Builder form of [`OutputElement::set`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn push_child(&mut self, child: OutputElement) {
        self.children.push(OutputNode::Element(child));
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.children.push(OutputNode::Text(text.into()));
    }
}

/// The transcoder's unit of output: a presentation element and, when it
/// carries IWB attributes, the metadata element referencing it by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementPair {
    pub svg: OutputElement,
    pub iwb: Option<OutputElement>,
}
