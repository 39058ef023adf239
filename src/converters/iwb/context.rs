//! Per-page conversion state shared by the transcoder and the background
//! builder.

use log::debug;

use super::{
    constants::{IWB_ELEMENT, IWB_REF},
    content::ContentRelocator,
    error::Result,
    ids::IdGenerator,
    layers::{LayerOrderer, LayeredElements},
};
use crate::{
    canvas::BackgroundCanvas,
    config::ConverterOptions,
    models::{
        elements::{ElementPair, ElementType, OutputElement},
        geometry::ViewBox,
    },
};

/// Everything a page conversion reads or mutates.
///
/// The id generator, asset store and canvas are borrowed from the document
/// conversion so ids stay unique across pages.
pub struct ConversionContext<'a> {
    pub options: &'a ConverterOptions,
    pub view_box: Option<ViewBox>,
    pub canvas: &'a dyn BackgroundCanvas,
    ids: &'a mut IdGenerator,
    relocator: ContentRelocator<'a>,
    layers: LayerOrderer,
    dropped_attributes: usize,
}

impl<'a> ConversionContext<'a> {
    pub fn new(
        options: &'a ConverterOptions,
        view_box: Option<ViewBox>,
        ids: &'a mut IdGenerator,
        relocator: ContentRelocator<'a>,
        canvas: &'a dyn BackgroundCanvas,
    ) -> Self {
        ConversionContext {
            options,
            view_box,
            canvas,
            ids,
            relocator,
            layers: LayerOrderer::new(),
            dropped_attributes: 0,
        }
    }

    pub fn next_id(&mut self) -> String {
        self.ids.next_id()
    }

    /// Relocates a media reference, returning the new package-relative path.
    pub fn relocate(&mut self, reference: &str, element_type: ElementType) -> Result<String> {
        self.relocator.relocate(reference, element_type, self.ids)
    }

    pub fn store_generated(&mut self, destination: &str, bytes: &[u8]) -> Result<()> {
        self.relocator.store_generated(destination, bytes)
    }

    /// Counts an attribute that has no place in the destination document.
    pub fn drop_attribute(&mut self, destination_tag: &str, name: &str) {
        debug!("Dropping attribute '{}' on <{}>", name, destination_tag);
        self.dropped_attributes += 1;
    }

    /// Completes an element pair and hands it to the layer orderer.
    ///
    /// When `iwb` received at least one attribute, the SVG element gets a
    /// fresh id and the metadata element a `ref` to it; otherwise the
    /// metadata element is discarded.
    pub fn register(&mut self, mut svg: OutputElement, iwb: OutputElement, key: i64) {
        let iwb = if iwb.attributes.is_empty() {
            None
        } else {
            let id = self.next_id();
            svg.set("id", id.clone());
            let mut element = OutputElement::new(IWB_ELEMENT).with(IWB_REF, id);
            element.attributes.extend(iwb.attributes);
            Some(element)
        };
        self.layers.register(ElementPair { svg, iwb }, key);
    }

    pub fn dropped_attributes(&self) -> usize {
        self.dropped_attributes
    }

    pub fn relocated_assets(&self) -> usize {
        self.relocator.relocated()
    }

    /// Ends the page, returning its elements in final order.
    pub fn finish(mut self) -> LayeredElements {
        self.layers.drain()
    }
}
