use serde::Serialize;

use crate::models::{elements::OutputElement, geometry::ViewBox};

/// A free-form entry of the UBZ description section (e.g. `dc:title`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetaEntry {
    /// Namespace URI of the source element, used to pick the output prefix.
    pub namespace: Option<String>,
    /// Local name of the source element.
    pub name: String,
    pub value: String,
}

/// The document-level metadata read from `metadata.rdf`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentDescription {
    /// The `about` attribute of the `Description` element.
    pub about: Option<String>,
    pub entries: Vec<MetaEntry>,
    /// Parsed from the `size` entry.
    pub view_box: Option<ViewBox>,
}

/// One converted page: presentation elements in final paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IwbPage {
    /// Source file name, used as the page id in a page set.
    pub id: String,
    pub elements: Vec<OutputElement>,
}

/// The complete, ordered content handed to the document writer.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IwbDocument {
    pub description: DocumentDescription,
    pub pages: Vec<IwbPage>,
    /// IWB metadata elements of every page, emitted after all presentation
    /// elements.
    pub extended: Vec<OutputElement>,
}

impl IwbDocument {
    pub fn element_count(&self) -> usize {
        self.pages.iter().map(|page| page.elements.len()).sum()
    }
}

/// Counters describing a finished conversion, printed by `ubz2iwb --report`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionReport {
    pub pages: usize,
    pub elements: usize,
    pub extended_elements: usize,
    /// Source attributes with no place in the IWB document.
    pub dropped_attributes: usize,
    pub relocated_assets: usize,
}
