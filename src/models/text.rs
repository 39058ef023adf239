use serde::Serialize;

/// One run of flattened rich text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextRun {
    /// Unstyled text.
    PlainText(String),
    /// Text with presentation attributes, written as a `tspan`.
    StyledSpan {
        attributes: Vec<(String, String)>,
        text: String,
    },
    /// Paragraph or explicit line break, written as a `tbreak`.
    LineBreak,
}
