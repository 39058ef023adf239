//! Serializes an [`IwbDocument`] into the text of `content.xml`.

use std::fmt::Write;

use super::{
    constants::{KNOWN_PREFIXES, NS_DC, NS_IWB, NS_SVG, NS_UB, NS_XLINK},
    error::Result,
    utils::{escape_xml_attribute, escape_xml_text, format_view_box},
};
use crate::models::{
    document::{IwbDocument, MetaEntry},
    elements::{OutputElement, OutputNode},
};

/// Namespaces declared on the root element, in declaration order.
const DECLARED_NAMESPACES: &[(&str, &str)] = &[
    ("svg", NS_SVG),
    ("xlink", NS_XLINK),
    ("iwb", NS_IWB),
    ("dc", NS_DC),
    ("ub", NS_UB),
];

const SVG_PREFIX: &str = "svg";
const IWB_PREFIX: &str = "iwb";

fn padding(depth: usize, indent: usize) -> String {
    " ".repeat(depth * indent)
}

/// Renders the complete `content.xml` of a document.
///
/// A single page is written directly inside `svg:svg`; several pages are
/// wrapped in an `svg:pageset` with one `svg:page` per source file. The
/// metadata elements of all pages follow the presentation section.
///
/// # Arguments
/// * `document` - The assembled document.
/// * `indent` - Number of spaces per nesting level.
///
/// # Returns
/// The XML text, or a `Format` error if writing to the buffer fails.
pub fn write_document(document: &IwbDocument, indent: usize) -> Result<String> {
    let mut out = String::new();

    // 1. Declaration and root element with every namespace used below.
    writeln!(out, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    write!(out, r#"<iwb xmlns="{}""#, NS_IWB)?;
    for (prefix, uri) in DECLARED_NAMESPACES {
        write!(out, r#" xmlns:{}="{}""#, prefix, uri)?;
    }
    writeln!(out, ">")?;

    // 2. Document metadata.
    let description = &document.description;
    if let Some(about) = &description.about {
        writeln!(
            out,
            r#"{}<iwb:meta about="{}"/>"#,
            padding(1, indent),
            escape_xml_attribute(about)
        )?;
    }
    for entry in &description.entries {
        writeln!(
            out,
            r#"{}<iwb:meta {}="{}"/>"#,
            padding(1, indent),
            qualified_name(entry),
            escape_xml_attribute(&entry.value)
        )?;
    }

    // 3. Presentation section; a single page is written without a pageset.
    write!(out, "{}<svg:svg", padding(1, indent))?;
    if let Some(view_box) = &description.view_box {
        write!(out, r#" viewbox="{}""#, format_view_box(view_box))?;
    }
    writeln!(out, ">")?;

    match document.pages.as_slice() {
        [single] => {
            for element in &single.elements {
                write_element(&mut out, element, SVG_PREFIX, 2, indent)?;
            }
        }
        pages => {
            writeln!(out, "{}<svg:pageset>", padding(2, indent))?;
            for page in pages {
                writeln!(
                    out,
                    r#"{}<svg:page id="{}">"#,
                    padding(3, indent),
                    escape_xml_attribute(&page.id)
                )?;
                for element in &page.elements {
                    write_element(&mut out, element, SVG_PREFIX, 4, indent)?;
                }
                writeln!(out, "{}</svg:page>", padding(3, indent))?;
            }
            writeln!(out, "{}</svg:pageset>", padding(2, indent))?;
        }
    }
    writeln!(out, "{}</svg:svg>", padding(1, indent))?;

    // 4. Extended metadata elements, in page order.
    for element in &document.extended {
        write_element(&mut out, element, IWB_PREFIX, 1, indent)?;
    }
    writeln!(out, "</iwb>")?;
    Ok(out)
}

/// Name of a metadata entry, prefixed when its namespace is a known one.
fn qualified_name(entry: &MetaEntry) -> String {
    let prefix = entry.namespace.as_deref().and_then(|namespace| {
        KNOWN_PREFIXES
            .iter()
            .find(|(uri, _)| *uri == namespace)
            .map(|(_, prefix)| *prefix)
    });
    match prefix {
        Some(prefix) => format!("{}:{}", prefix, entry.name),
        None => entry.name.clone(),
    }
}

fn write_attributes(out: &mut String, element: &OutputElement) -> std::fmt::Result {
    for (name, value) in &element.attributes {
        write!(out, r#" {}="{}""#, name, escape_xml_attribute(value))?;
    }
    Ok(())
}

/// Writes one element on its own line(s).
///
/// Elements holding text are written on a single line, since indentation
/// inside them would become part of the text.
fn write_element(
    out: &mut String,
    element: &OutputElement,
    prefix: &str,
    depth: usize,
    indent: usize,
) -> Result<()> {
    write!(out, "{}<{}:{}", padding(depth, indent), prefix, element.tag)?;
    write_attributes(out, element)?;

    if element.children.is_empty() {
        writeln!(out, "/>")?;
        return Ok(());
    }

    let has_text = element
        .children
        .iter()
        .any(|child| matches!(child, OutputNode::Text(_)));
    if has_text {
        write!(out, ">")?;
        for child in &element.children {
            write_inline(out, child, prefix)?;
        }
        writeln!(out, "</{}:{}>", prefix, element.tag)?;
        return Ok(());
    }

    writeln!(out, ">")?;
    for child in &element.children {
        if let OutputNode::Element(child) = child {
            write_element(out, child, prefix, depth + 1, indent)?;
        }
    }
    writeln!(out, "{}</{}:{}>", padding(depth, indent), prefix, element.tag)?;
    Ok(())
}

fn write_inline(out: &mut String, node: &OutputNode, prefix: &str) -> Result<()> {
    match node {
        OutputNode::Text(text) => out.push_str(&escape_xml_text(text)),
        OutputNode::Element(element) => {
            write!(out, "<{}:{}", prefix, element.tag)?;
            write_attributes(out, element)?;
            if element.children.is_empty() {
                write!(out, "/>")?;
            } else {
                write!(out, ">")?;
                for child in &element.children {
                    write_inline(out, child, prefix)?;
                }
                write!(out, "</{}:{}>", prefix, element.tag)?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        document::{DocumentDescription, IwbPage},
        geometry::ViewBox,
    };

    fn line(id: &str) -> OutputElement {
        OutputElement::new("line")
            .with("x1", "0")
            .with("y1", "0")
            .with("x2", "5")
            .with("y2", "5")
            .with("id", id)
    }

    fn document(pages: Vec<IwbPage>) -> IwbDocument {
        IwbDocument {
            description: DocumentDescription {
                about: Some("doc-1".to_string()),
                entries: vec![
                    MetaEntry {
                        namespace: Some(NS_DC.to_string()),
                        name: "title".to_string(),
                        value: "Fish & \"chips\"".to_string(),
                    },
                    MetaEntry {
                        namespace: Some("urn:unknown".to_string()),
                        name: "note".to_string(),
                        value: "x".to_string(),
                    },
                ],
                view_box: Some(ViewBox {
                    x: 0.0,
                    y: 0.0,
                    width: 800.0,
                    height: 600.0,
                }),
            },
            pages,
            extended: vec![OutputElement::new("element")
                .with("ref", "a")
                .with("locked", "true")],
        }
    }

    #[test]
    fn writes_single_page_without_pageset() {
        let doc = document(vec![IwbPage {
            id: "page001.svg".to_string(),
            elements: vec![line("a")],
        }]);
        let xml = write_document(&doc, 2).unwrap();
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<iwb xmlns="http://www.becta.org.uk/iwb" xmlns:svg="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:iwb="http://www.becta.org.uk/iwb" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:ub="http://uniboard.mnemis.com/document">
  <iwb:meta about="doc-1"/>
  <iwb:meta dc:title="Fish &amp; &quot;chips&quot;"/>
  <iwb:meta note="x"/>
  <svg:svg viewbox="0 0 800 600">
    <svg:line x1="0" y1="0" x2="5" y2="5" id="a"/>
  </svg:svg>
  <iwb:element ref="a" locked="true"/>
</iwb>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn wraps_several_pages_in_a_pageset() {
        let doc = document(vec![
            IwbPage {
                id: "page001.svg".to_string(),
                elements: vec![line("a")],
            },
            IwbPage {
                id: "page002.svg".to_string(),
                elements: vec![],
            },
        ]);
        let xml = write_document(&doc, 1).unwrap();
        assert!(xml.contains(
            "  <svg:pageset>\n   <svg:page id=\"page001.svg\">\n    <svg:line x1=\"0\""
        ));
        assert!(xml.contains("   <svg:page id=\"page002.svg\">\n   </svg:page>\n"));
        assert!(xml.contains(" </svg:svg>\n <iwb:element ref=\"a\""));
    }

    #[test]
    fn text_content_is_written_inline_and_escaped() {
        let mut textarea = OutputElement::new("textarea").with("x", "1");
        textarea.push_text("a < b");
        textarea.push_child(OutputElement::new("tbreak"));
        let mut span = OutputElement::new("tspan").with("fill", "red");
        span.push_text("c & d");
        textarea.push_child(span);

        let doc = IwbDocument {
            pages: vec![IwbPage {
                id: "page001.svg".to_string(),
                elements: vec![textarea],
            }],
            ..IwbDocument::default()
        };
        let xml = write_document(&doc, 2).unwrap();
        assert!(xml.contains(
            r#"    <svg:textarea x="1">a &lt; b<svg:tbreak/><svg:tspan fill="red">c &amp; d</svg:tspan></svg:textarea>"#
        ));
        assert!(xml.contains("  <svg:svg>\n"));
    }
}
