//! Functions for flattening the rich text embedded in UBZ text objects
//! (an XHTML fragment inside a `foreignObject`) into a flat sequence of
//! [`TextRun`]s, and for turning those runs into `textarea` content.

use log::debug;

use super::{
    attributes::{classify, AttributeClass},
    constants::ATTR_STYLE,
};
use crate::models::{
    elements::OutputElement,
    source_tree::{NodeId, SourceTree},
    text::TextRun,
};

type Style = Vec<(String, String)>;

/// Block tags; a block holding other blocks is a wrapper, not a paragraph.
const PARAGRAPH_TAGS: &[&str] = &["p", "div"];

/// Flattens the rich-text fragment rooted at `fragment`.
///
/// Paragraphs are separated by [`TextRun::LineBreak`]; inside a paragraph,
/// text keeps its document order and inline styling is merged from the
/// outermost to the innermost element.
///
/// # Arguments
/// * `tree` - The parsed page.
/// * `fragment` - The `foreignObject` (or any container) holding the markup.
///
/// # Returns
/// The runs in paragraph and inline order.
pub fn flatten(tree: &SourceTree, fragment: NodeId) -> Vec<TextRun> {
    let container = tree.find_descendant_by_tag(fragment, "body").unwrap_or(fragment);

    let mut paragraphs = Vec::new();
    collect_paragraphs(tree, container, &mut paragraphs);

    let mut runs = Vec::new();
    if paragraphs.is_empty() {
        walk_inline(tree, container, &Style::new(), &mut runs);
        return runs;
    }

    for (index, paragraph) in paragraphs.into_iter().enumerate() {
        if index > 0 {
            runs.push(TextRun::LineBreak);
        }
        walk_inline(tree, paragraph, &Style::new(), &mut runs);
    }
    runs
}

fn is_block(tree: &SourceTree, id: NodeId) -> bool {
    tree.element(id)
        .is_some_and(|e| PARAGRAPH_TAGS.contains(&e.name.as_str()))
}

/// Appends the innermost blocks under `node` in document order, descending
/// through blocks that only wrap other blocks.
fn collect_paragraphs(tree: &SourceTree, node: NodeId, paragraphs: &mut Vec<NodeId>) {
    for child in tree.child_elements(node).filter(|id| is_block(tree, *id)) {
        if tree.child_elements(child).any(|id| is_block(tree, id)) {
            collect_paragraphs(tree, child, paragraphs);
        } else {
            paragraphs.push(child);
        }
    }
}

/// Walks the children of an inline container, appending runs.
fn walk_inline(tree: &SourceTree, node: NodeId, inherited: &Style, runs: &mut Vec<TextRun>) {
    for child in tree.children(node) {
        if let Some(text) = tree.text(child) {
            if inherited.is_empty() {
                runs.push(TextRun::PlainText(text.to_string()));
            } else {
                runs.push(TextRun::StyledSpan {
                    attributes: inherited.clone(),
                    text: text.to_string(),
                });
            }
            continue;
        }

        let Some(element) = tree.element(child) else {
            continue;
        };
        if element.name == "br" {
            runs.push(TextRun::LineBreak);
            continue;
        }

        let mut style = inherited.clone();
        for (name, value) in implicit_style(&element.name) {
            merge_style(&mut style, name.to_string(), value.to_string());
        }
        if element.name == "font" {
            if let Some(color) = element.attribute("color") {
                merge_style(&mut style, "fill".to_string(), color.to_string());
            }
        }
        if let Some(declarations) = element.attribute(ATTR_STYLE) {
            for (name, value) in parse_style(declarations) {
                merge_style(&mut style, name, value);
            }
        }
        walk_inline(tree, child, &style, runs);
    }
}

/// Style carried by presentational inline tags.
fn implicit_style(tag: &str) -> &'static [(&'static str, &'static str)] {
    match tag {
        "b" | "strong" => &[("font-weight", "bold")],
        "i" | "em" => &[("font-style", "italic")],
        "u" => &[("text-decoration", "underline")],
        _ => &[],
    }
}

/// Inner declarations override outer ones in place, new ones are appended.
fn merge_style(style: &mut Style, name: String, value: String) {
    match style.iter_mut().find(|(existing, _)| *existing == name) {
        Some(slot) => slot.1 = value,
        None => style.push((name, value)),
    }
}

/// Parses a CSS declaration list (`name:value;name:value`) into the
/// presentation attributes a `tspan` accepts.
///
/// Fragments that are not `name:value` pairs are skipped, `color` becomes
/// `fill` and the value `text` becomes `normal`.
pub fn parse_style(declarations: &str) -> Style {
    let mut style = Style::new();
    for declaration in declarations.split(';') {
        let Some((name, value)) = declaration.split_once(':') else {
            if !declaration.trim().is_empty() {
                debug!("Skipping unparsable style fragment '{}'", declaration);
            }
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim().trim_matches(|c: char| c == '\'' || c == '"').trim();
        if name.is_empty() || value.is_empty() {
            continue;
        }

        let name = if name == "color" { "fill".to_string() } else { name };
        let value = if value == "text" { "normal" } else { value };

        if classify(&name, "tspan") == AttributeClass::DirectSvgAttribute {
            merge_style(&mut style, name, value.to_string());
        } else {
            debug!("Dropping style property '{}' from text run", name);
        }
    }
    style
}

/// Appends the runs to a `textarea` element: text nodes, `tspan` elements
/// and `tbreak` elements.
pub fn append_runs(textarea: &mut OutputElement, runs: Vec<TextRun>) {
    for run in runs {
        match run {
            TextRun::PlainText(text) => textarea.push_text(text),
            TextRun::StyledSpan { attributes, text } => {
                let mut span = OutputElement::new("tspan");
                for (name, value) in attributes {
                    span.set(name, value);
                }
                span.push_text(text);
                textarea.push_child(span);
            }
            TextRun::LineBreak => textarea.push_child(OutputElement::new("tbreak")),
        }
    }
}
