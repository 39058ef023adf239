//! Functions for transcoding individual UBZ page elements into IWB element
//! pairs: the SVG presentation element plus its optional metadata element.

use indexmap::IndexMap;
use log::{debug, warn};

use super::{
    attributes::{classify, is_control_attribute, AttributeClass, INHERITABLE_ATTRIBUTES},
    constants::{ATTR_TYPE, ATTR_Z_VALUE, IWB_ELEMENT, XLINK_HREF},
    content::element_type_for_extension,
    context::ConversionContext,
    error::{ConversionError, Result},
    geometry::{format_transform, resolve_geometry, resolve_transform, transform_points},
    layers::layer_key,
    text::{append_runs, flatten},
    utils::{format_number, parse_number, reference_extension},
};
use crate::models::{
    elements::{ElementType, ForeignObjectKind, OutputElement},
    geometry::TransformMatrix,
    source_tree::{NodeId, SourceElement, SourceTree},
};

/// Attributes a group hands down to its descendants, in encounter order.
pub type InheritedAttributes = IndexMap<String, String>;

const LINE_ENDPOINTS: [(&str, &str); 2] = [("x1", "y1"), ("x2", "y2")];

/// Maps the value of a UBZ `type` hint to an element type.
fn type_from_hint(hint: &str) -> Option<ElementType> {
    match hint.trim() {
        "text" => Some(ElementType::ForeignObject(ForeignObjectKind::Text)),
        "widget" | "w3c" | "apple" => Some(ElementType::ForeignObject(ForeignObjectKind::Other)),
        "image" => Some(ElementType::Image),
        "video" => Some(ElementType::Video),
        "audio" => Some(ElementType::Audio),
        _ => None,
    }
}

/// Determines the element type of a source element.
///
/// An explicit `type` hint wins, then the extension of the referenced
/// content, then the tag name itself.
///
/// # Returns
/// `None` for tags the IWB format has no counterpart for.
pub fn classify_element_type(element: &SourceElement) -> Option<ElementType> {
    if let Some(element_type) = element.attribute(ATTR_TYPE).and_then(type_from_hint) {
        return Some(element_type);
    }
    if element.name == "g" {
        return Some(ElementType::Group);
    }

    let by_extension = ["href", "src"]
        .iter()
        .find_map(|name| element.attribute(name))
        .and_then(reference_extension)
        .and_then(|extension| element_type_for_extension(&extension));

    by_extension.or_else(|| ElementType::from_tag(&element.name))
}

/// Transcodes the element at `node` (and, for groups, its descendants),
/// registering the resulting pairs with the context.
///
/// # Arguments
/// * `tree` - The parsed page.
/// * `node` - The element to transcode.
/// * `ctx` - The page conversion context.
/// * `inherited` - Attributes handed down by enclosing groups.
///
/// # Returns
/// `Ok(())` when the element was transcoded or skipped, or the first error
/// raised while transcoding it.
pub fn transcode_element(
    tree: &SourceTree,
    node: NodeId,
    ctx: &mut ConversionContext<'_>,
    inherited: &InheritedAttributes,
) -> Result<()> {
    let Some(element) = tree.element(node) else {
        return Ok(());
    };
    let Some(element_type) = classify_element_type(element) else {
        debug!("Skipping unsupported element <{}>", element.name);
        return Ok(());
    };

    match element_type {
        ElementType::Group => transcode_group(tree, node, element, ctx, inherited),
        ElementType::ForeignObject(ForeignObjectKind::Text) => {
            transcode_text(tree, node, element, ctx, inherited)
        }
        _ => transcode_leaf(element, element_type, ctx, inherited),
    }
}

fn transcode_group(
    tree: &SourceTree,
    node: NodeId,
    element: &SourceElement,
    ctx: &mut ConversionContext<'_>,
    inherited: &InheritedAttributes,
) -> Result<()> {
    let children: Vec<NodeId> = tree.child_elements(node).collect();
    if children.is_empty() {
        return Err(ConversionError::EmptyGroupSection);
    }

    let mut handed_down = inherited.clone();
    for name in INHERITABLE_ATTRIBUTES {
        if let Some(value) = element.attribute(name) {
            handed_down.insert(name.to_string(), value.to_string());
        }
    }

    for child in children {
        transcode_element(tree, child, ctx, &handed_down)?;
    }
    Ok(())
}

fn transcode_leaf(
    element: &SourceElement,
    element_type: ElementType,
    ctx: &mut ConversionContext<'_>,
    inherited: &InheritedAttributes,
) -> Result<()> {
    let attributes = effective_attributes(element, inherited);
    let Some((svg, iwb)) = route_attributes(&attributes, element_type, ctx)? else {
        return Ok(());
    };
    let key = layer_key(
        element_type.layer(),
        attributes.get(ATTR_Z_VALUE).map(String::as_str),
    );
    ctx.register(svg, iwb, key);
    Ok(())
}

fn transcode_text(
    tree: &SourceTree,
    node: NodeId,
    element: &SourceElement,
    ctx: &mut ConversionContext<'_>,
    inherited: &InheritedAttributes,
) -> Result<()> {
    let element_type = ElementType::ForeignObject(ForeignObjectKind::Text);
    let attributes = effective_attributes(element, inherited);
    let Some((mut textarea, iwb)) = route_attributes(&attributes, element_type, ctx)? else {
        return Ok(());
    };

    append_runs(&mut textarea, flatten(tree, node));

    let key = layer_key(
        element_type.layer(),
        attributes.get(ATTR_Z_VALUE).map(String::as_str),
    );
    ctx.register(textarea, iwb, key);
    Ok(())
}

/// The element's own attributes laid over the inherited ones.
fn effective_attributes(
    element: &SourceElement,
    inherited: &InheritedAttributes,
) -> IndexMap<String, String> {
    let mut attributes = inherited.clone();
    for (name, value) in &element.attributes {
        attributes.insert(name.clone(), value.clone());
    }
    attributes
}

/// Routes every attribute to the SVG element, the metadata element, the
/// geometry or the relocator.
///
/// # Returns
/// The SVG and metadata elements, or `None` when the element references
/// unsupported media and the options say to drop it.
fn route_attributes(
    attributes: &IndexMap<String, String>,
    element_type: ElementType,
    ctx: &mut ConversionContext<'_>,
) -> Result<Option<(OutputElement, OutputElement)>> {
    let destination_tag = element_type.destination_tag();
    let mut svg = OutputElement::new(destination_tag);
    let mut iwb = OutputElement::new(IWB_ELEMENT);
    let mut matrix = None;

    // 1. Route each attribute by class; the transform is held back until
    //    the box attributes it applies to are known.
    for (name, value) in attributes {
        if is_control_attribute(name) {
            continue;
        }
        match classify(name, destination_tag) {
            AttributeClass::DirectSvgAttribute => svg.set(name.as_str(), value.as_str()),
            AttributeClass::IwbMetaAttribute => iwb.set(name.as_str(), value.as_str()),
            AttributeClass::GeometryAttribute => matrix = Some(resolve_transform(value)),
            AttributeClass::ContentReferenceAttribute => {
                // 2. Media references are relocated into the package.
                if element_type.content_folder().is_none() {
                    ctx.drop_attribute(destination_tag, name);
                    continue;
                }
                match ctx.relocate(value, element_type) {
                    Ok(reference) => svg.set(XLINK_HREF, reference),
                    Err(ConversionError::UnsupportedContentFormat(reference))
                        if ctx.options.tolerate_unsupported_content =>
                    {
                        warn!(
                            "Dropping <{}> referencing unsupported content '{}'",
                            destination_tag, reference
                        );
                        return Ok(None);
                    }
                    Err(e) => return Err(e),
                }
            }
            AttributeClass::Unrecognized => ctx.drop_attribute(destination_tag, name),
        }
    }

    // 3. Resolve the transform against the routed geometry.
    if let Some(matrix) = matrix {
        apply_geometry(&mut svg, element_type, &matrix);
    }
    Ok(Some((svg, iwb)))
}

/// Applies a resolved transform to the routed SVG attributes.
///
/// Boxes get their position, scaled size and a `rotate translate`
/// transform; point-based shapes get their points mapped instead.
fn apply_geometry(svg: &mut OutputElement, element_type: ElementType, matrix: &TransformMatrix) {
    if element_type.is_point_based() {
        if let Some(points) = svg.attribute("points").map(str::to_string) {
            match transform_points(&points, matrix) {
                Some(mapped) => svg.set("points", mapped),
                None => warn!("Keeping unparsable point list '{}' untransformed", points),
            }
        }
        for (x_name, y_name) in LINE_ENDPOINTS {
            if svg.attribute(x_name).is_none() && svg.attribute(y_name).is_none() {
                continue;
            }
            let (x, y) = matrix.map_point(
                parse_number(svg.attribute(x_name)),
                parse_number(svg.attribute(y_name)),
            );
            svg.set(x_name, format_number(x));
            svg.set(y_name, format_number(y));
        }
        return;
    }

    let geometry = resolve_geometry(
        parse_number(svg.attribute("x")),
        parse_number(svg.attribute("y")),
        parse_number(svg.attribute("width")),
        parse_number(svg.attribute("height")),
        matrix,
    );
    svg.set("x", format_number(geometry.x));
    svg.set("y", format_number(geometry.y));
    svg.set("width", format_number(geometry.width));
    svg.set("height", format_number(geometry.height));
    svg.set("transform", format_transform(&geometry));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::tests::RecordingStore,
        canvas::SkiaCanvas,
        config::ConverterOptions,
        converters::iwb::{content::ContentRelocator, ids::IdGenerator, layers::LayeredElements},
        models::elements::OutputNode,
    };

    struct Outcome {
        result: Result<LayeredElements>,
        dropped: usize,
        store: RecordingStore,
    }

    fn transcode_page(body: &str, options: &ConverterOptions) -> Outcome {
        let markup = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:ub="http://uniboard.mnemis.com/document">{}</svg>"#,
            body
        );
        let tree = SourceTree::parse(&markup).unwrap();
        let mut store = RecordingStore::default();
        let mut ids = IdGenerator::sequential("id-");
        let canvas = SkiaCanvas;

        let (result, dropped) = {
            let mut ctx = ConversionContext::new(
                options,
                None,
                &mut ids,
                ContentRelocator::new(&mut store),
                &canvas,
            );
            let mut result = Ok(());
            for child in tree.child_elements(tree.root()) {
                result = transcode_element(&tree, child, &mut ctx, &InheritedAttributes::new());
                if result.is_err() {
                    break;
                }
            }
            let dropped = ctx.dropped_attributes();
            (result.map(|_| ctx.finish()), dropped)
        };

        Outcome {
            result,
            dropped,
            store,
        }
    }

    fn convert_ok(body: &str) -> LayeredElements {
        transcode_page(body, &ConverterOptions::default())
            .result
            .unwrap()
    }

    fn element(xml: &str) -> SourceElement {
        let tree = SourceTree::parse(xml).unwrap();
        tree.element(tree.root()).unwrap().clone()
    }

    #[test]
    fn classifies_by_hint_then_extension_then_tag() {
        assert_eq!(
            classify_element_type(&element(r#"<foreignObject type="text"/>"#)),
            Some(ElementType::ForeignObject(ForeignObjectKind::Text))
        );
        assert_eq!(
            classify_element_type(&element(r#"<foreignObject src="widgets/clock.wgt"/>"#)),
            Some(ElementType::ForeignObject(ForeignObjectKind::Other))
        );
        assert_eq!(
            classify_element_type(&element(r#"<image href="clip.MP4"/>"#)),
            Some(ElementType::Video)
        );
        assert_eq!(
            classify_element_type(&element(r#"<polyline points="0,0 1,1"/>"#)),
            Some(ElementType::Polyline)
        );
        assert_eq!(classify_element_type(&element("<rect/>")), None);
    }

    #[test]
    fn svg_only_attributes_produce_no_metadata() {
        let out = convert_ok(r#"<polygon points="0,0 10,0 10,10" fill="red" stroke="blue"/>"#);
        assert_eq!(out.presentation.len(), 1);
        assert!(out.extended.is_empty());
        let polygon = &out.presentation[0];
        assert_eq!(polygon.tag, "polygon");
        assert_eq!(polygon.attribute("fill"), Some("red"));
        assert_eq!(polygon.attribute("id"), None);
    }

    #[test]
    fn iwb_attribute_links_metadata_to_element() {
        let out = convert_ok(
            r#"<line x1="0" y1="0" x2="5" y2="5" ub:locked="true" ub:uuid="{abc}" ub:z-value="2"/>"#,
        );
        let line = &out.presentation[0];
        let meta = &out.extended[0];
        assert_eq!(line.attribute("id"), Some("id-0001"));
        assert_eq!(meta.attribute("ref"), line.attribute("id"));
        assert_eq!(meta.attribute("locked"), Some("true"));
        assert_eq!(meta.attributes.keys().next().map(String::as_str), Some("ref"));
    }

    #[test]
    fn malformed_transform_falls_back_to_identity() {
        let out = convert_ok(
            r#"<image xlink:href="images/photo.png" x="10" y="20" width="30" height="40" transform="matrix(1,2,3)"/>"#,
        );
        let image = &out.presentation[0];
        assert_eq!(image.attribute("width"), Some("30"));
        assert_eq!(image.attribute("height"), Some("40"));
        assert_eq!(image.attribute("transform"), Some("rotate(0) translate(0,0)"));
        assert_eq!(image.attribute("xlink:href"), Some("images/id-0001.png"));
    }

    #[test]
    fn geometry_is_applied_after_all_attributes() {
        let out = convert_ok(
            r#"<image transform="matrix(2,0,0,3,5,7)" xlink:href="a.png" x="0" y="0" width="10" height="10"/>"#,
        );
        let image = &out.presentation[0];
        assert_eq!(image.attribute("width"), Some("20"));
        assert_eq!(image.attribute("height"), Some("30"));
        assert_eq!(image.attribute("transform"), Some("rotate(0) translate(5,7)"));
    }

    #[test]
    fn point_shapes_map_their_points() {
        let out = convert_ok(
            r#"<polygon points="0,0 10,0" transform="matrix(1,0,0,1,5,5)"/><line x1="1" y1="2" x2="3" y2="4" transform="matrix(2,0,0,2,0,0)"/>"#,
        );
        assert_eq!(out.presentation[0].attribute("points"), Some("5,5 15,5"));
        assert_eq!(out.presentation[0].attribute("transform"), None);
        let line = &out.presentation[1];
        assert_eq!(line.attribute("x1"), Some("2"));
        assert_eq!(line.attribute("y2"), Some("8"));
    }

    #[test]
    fn unknown_attributes_are_dropped_and_counted() {
        let outcome = transcode_page(
            r#"<polygon points="0,0 1,1" bogus="1" ub:uuid="{x}" onclick="x()"/>"#,
            &ConverterOptions::default(),
        );
        let out = outcome.result.unwrap();
        assert_eq!(outcome.dropped, 2);
        assert_eq!(out.presentation[0].attribute("bogus"), None);
    }

    #[test]
    fn empty_group_fails() {
        let outcome = transcode_page(r#"<g fill="red"></g>"#, &ConverterOptions::default());
        assert!(matches!(
            outcome.result,
            Err(ConversionError::EmptyGroupSection)
        ));
    }

    #[test]
    fn groups_hand_down_presentation_attributes() {
        let out = convert_ok(
            r#"<g stroke="red" ub:z-value="-5" ub:locked="true">
                 <line x1="0" y1="0" x2="1" y2="1"/>
                 <line x1="0" y1="0" x2="1" y2="1" stroke="blue"/>
               </g>
               <polygon points="0,0 1,1"/>"#,
        );
        assert_eq!(out.presentation.len(), 3);
        assert_eq!(out.presentation[0].attribute("stroke"), Some("red"));
        assert_eq!(out.presentation[1].attribute("stroke"), Some("blue"));
        // z-value -5 puts both lines before the polygon
        assert_eq!(out.presentation[2].tag, "polygon");
        assert!(out.extended.is_empty());
    }

    #[test]
    fn media_is_relocated_by_category() {
        let outcome = transcode_page(
            r#"<image xlink:href="images/photo.BMP"/><audio xlink:href="audios/a.mp3"/><foreignObject ub:src="widgets/clock.wgt"/>"#,
            &ConverterOptions::default(),
        );
        let out = outcome.result.unwrap();
        assert_eq!(
            outcome.store.copies,
            vec![
                ("images/photo.BMP".to_string(), "images/id-0001.bmp".to_string()),
                ("audios/a.mp3".to_string(), "audios/id-0002.mp3".to_string()),
            ]
        );
        assert_eq!(
            outcome.store.rasterized,
            vec![("widgets/clock.wgt".to_string(), "images/id-0003.png".to_string())]
        );
        assert_eq!(out.presentation[2].tag, "image");
        assert_eq!(
            out.presentation[2].attribute("xlink:href"),
            Some("images/id-0003.png")
        );
    }

    #[test]
    fn unsupported_media_fails_unless_tolerated() {
        let body = r#"<image xlink:href="images/a.xyz"/><line x1="0" y1="0" x2="1" y2="1"/>"#;
        let outcome = transcode_page(body, &ConverterOptions::default());
        assert!(matches!(
            outcome.result,
            Err(ConversionError::UnsupportedContentFormat(ref r)) if r == "images/a.xyz"
        ));

        let tolerant = ConverterOptions {
            tolerate_unsupported_content: true,
            ..ConverterOptions::default()
        };
        let out = transcode_page(body, &tolerant).result.unwrap();
        assert_eq!(out.presentation.len(), 1);
        assert_eq!(out.presentation[0].tag, "line");
    }

    #[test]
    fn text_objects_become_textareas() {
        let out = convert_ok(
            r#"<foreignObject ub:type="text" x="1" y="2" width="100" height="50" font-size="12">
                 <html xmlns="http://www.w3.org/1999/xhtml"><body>
                   <p>Hello</p><p><span style="color:#00ff00">world</span></p>
                 </body></html>
               </foreignObject>"#,
        );
        let textarea = &out.presentation[0];
        assert_eq!(textarea.tag, "textarea");
        assert_eq!(textarea.attribute("font-size"), Some("12"));
        assert_eq!(textarea.children.len(), 3);
        assert_eq!(textarea.children[0], OutputNode::Text("Hello".to_string()));
        let OutputNode::Element(tspan) = &textarea.children[2] else {
            panic!("expected tspan");
        };
        assert_eq!(tspan.attribute("fill"), Some("#00ff00"));
    }
}
