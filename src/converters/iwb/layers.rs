//! Paint-order bookkeeping for the elements of one page.

use std::collections::BTreeMap;

use crate::models::elements::{ElementPair, LayerType, OutputElement};

/// Computes the z-layer key of an element: its band's base offset plus its
/// own `z-value`. Out-of-range z-values saturate at the ends of the key
/// space.
pub fn layer_key(layer: LayerType, z_value: Option<&str>) -> i64 {
    let z = z_value
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.round() as i64)
        .unwrap_or(0);
    layer.base_offset().saturating_add(z)
}

/// Presentation elements in paint order, and the metadata elements that
/// annotate them.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LayeredElements {
    pub presentation: Vec<OutputElement>,
    pub extended: Vec<OutputElement>,
}

/// Ordered multimap of element pairs: ascending key, first-in first-out
/// within a key.
#[derive(Debug, Default)]
pub struct LayerOrderer {
    layers: BTreeMap<i64, Vec<ElementPair>>,
}

impl LayerOrderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, pair: ElementPair, key: i64) {
        self.layers.entry(key).or_default().push(pair);
    }

    pub fn len(&self) -> usize {
        self.layers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Empties the orderer, splitting the pairs into the presentation stream
    /// and the metadata stream (both in paint order).
    pub fn drain(&mut self) -> LayeredElements {
        let mut out = LayeredElements::default();
        for (_, pairs) in std::mem::take(&mut self.layers) {
            for pair in pairs {
                out.presentation.push(pair.svg);
                if let Some(iwb) = pair.iwb {
                    out.extended.push(iwb);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(name: &str, with_meta: bool) -> ElementPair {
        ElementPair {
            svg: OutputElement::new("line").with("id", name),
            iwb: with_meta.then(|| OutputElement::new("element").with("ref", name)),
        }
    }

    fn ids(elements: &[OutputElement], attr: &str) -> Vec<String> {
        elements
            .iter()
            .map(|e| e.attribute(attr).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn orders_by_key_then_encounter() {
        let mut orderer = LayerOrderer::new();
        orderer.register(pair("graphic-a", false), 0);
        orderer.register(pair("background", true), -2000);
        orderer.register(pair("tool", false), 1000);
        orderer.register(pair("graphic-b", true), 0);
        orderer.register(pair("object", false), -1000);
        assert_eq!(orderer.len(), 5);

        let drained = orderer.drain();
        assert_eq!(
            ids(&drained.presentation, "id"),
            ["background", "object", "graphic-a", "graphic-b", "tool"]
        );
        assert_eq!(ids(&drained.extended, "ref"), ["background", "graphic-b"]);
        assert!(orderer.is_empty());
    }

    #[test]
    fn computes_keys_from_band_and_z_value() {
        assert_eq!(layer_key(LayerType::FixedBackground, None), -2000);
        assert_eq!(layer_key(LayerType::Object, Some("3")), -997);
        assert_eq!(layer_key(LayerType::Graphic, Some(" 2.6 ")), 3);
        assert_eq!(layer_key(LayerType::Control, Some("bogus")), 2000);
        assert_eq!(layer_key(LayerType::Tool, Some("-5")), 995);
    }

    #[test]
    fn extreme_z_values_saturate() {
        assert_eq!(layer_key(LayerType::Object, Some("-1e300")), i64::MIN);
        assert_eq!(layer_key(LayerType::Control, Some("1e300")), i64::MAX);
        assert_eq!(layer_key(LayerType::Graphic, Some("inf")), 0);
        assert!(
            layer_key(LayerType::FixedBackground, Some("-1e300"))
                <= layer_key(LayerType::Control, Some("-1e300"))
        );
    }
}
