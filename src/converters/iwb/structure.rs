//! Handles the overall structure of the document conversion: reading the
//! description section, discovering the content pages and converting them
//! in order into an [`IwbDocument`].

use std::{fs, path::Path};

use log::{debug, info, warn};

use super::{
    background::{build_background, wants_background},
    constants::{
        ATTR_ABOUT, METADATA_FILE, PAGE_EXTENSION, PAGE_PREFIX, TAG_DESCRIPTION,
        TAG_GROUP_SECTION, TAG_SIZE, TAG_SVG,
    },
    content::ContentRelocator,
    context::ConversionContext,
    elements::{transcode_element, InheritedAttributes},
    error::{ConversionError, Result},
    ids::IdGenerator,
    utils::parse_view_box,
};
use crate::{
    assets::AssetStore,
    canvas::BackgroundCanvas,
    config::ConverterOptions,
    models::{
        document::{ConversionReport, DocumentDescription, IwbDocument, IwbPage, MetaEntry},
        source_tree::SourceTree,
    },
};

/// Number of characters between the page prefix and the extension
/// (`page001.svg`).
const PAGE_NUMBER_WIDTH: usize = 3;

/// Reads the document description from a `metadata.rdf` file.
///
/// # Arguments
/// * `path` - Path of the metadata file.
///
/// # Returns
/// The parsed description, `MetadataUnreadable` when the file cannot be
/// read, or `MetadataMalformed` when it is not usable.
pub fn read_description(path: &Path) -> Result<DocumentDescription> {
    let xml = fs::read_to_string(path).map_err(|source| ConversionError::MetadataUnreadable {
        path: path.display().to_string(),
        source,
    })?;
    parse_description(&xml)
}

/// Parses the text of a `metadata.rdf` file.
///
/// The first `Description` child of the root supplies the `about`
/// attribute; each of its child elements with non-blank text becomes either
/// the view box (`size`) or a free-form [`MetaEntry`].
pub fn parse_description(xml: &str) -> Result<DocumentDescription> {
    let tree =
        SourceTree::parse(xml).map_err(|e| ConversionError::MetadataMalformed(e.to_string()))?;

    let mut description = DocumentDescription::default();
    let Some(section) = tree.find_child_by_tag(tree.root(), TAG_DESCRIPTION) else {
        warn!("Metadata has no description section.");
        return Ok(description);
    };
    description.about = tree
        .element(section)
        .and_then(|e| e.attribute(ATTR_ABOUT))
        .map(str::to_string);

    for child in tree.child_elements(section) {
        let Some(element) = tree.element(child) else {
            continue;
        };
        let text = tree.text_content(child);
        let value = text.trim();
        if value.is_empty() {
            continue;
        }

        if element.name == TAG_SIZE {
            let view_box = parse_view_box(value).ok_or_else(|| {
                ConversionError::MetadataMalformed(format!("invalid document size '{}'", value))
            })?;
            description.view_box = Some(view_box);
        } else {
            description.entries.push(MetaEntry {
                namespace: element.namespace.clone(),
                name: element.name.clone(),
                value: value.to_string(),
            });
        }
    }
    Ok(description)
}

/// Whether `file_name` looks like `page???.svg`, ignoring case.
pub fn is_page_file(file_name: &str) -> bool {
    let lower = file_name.to_ascii_lowercase();
    let Some(stem) = lower
        .strip_prefix(PAGE_PREFIX)
        .and_then(|rest| rest.strip_suffix(PAGE_EXTENSION))
        .and_then(|rest| rest.strip_suffix('.'))
    else {
        return false;
    };
    stem.chars().count() == PAGE_NUMBER_WIDTH
}

/// Lists the content pages of an extracted package, sorted by name
/// ignoring case.
///
/// # Returns
/// The page file names, or `NoContentPages` when there are none.
pub fn list_pages(source_dir: &Path) -> Result<Vec<String>> {
    let no_pages = || ConversionError::NoContentPages(source_dir.display().to_string());
    let entries = fs::read_dir(source_dir).map_err(|_| no_pages())?;

    let mut pages: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_page_file(name))
        .collect();
    if pages.is_empty() {
        return Err(no_pages());
    }
    pages.sort_by_key(|name| name.to_ascii_lowercase());
    Ok(pages)
}

/// Converts one page file, registering its elements with `ctx`.
///
/// An `svg` root gets its background and every child element transcoded; a
/// `group` root and any other root produce no elements.
pub fn convert_page(source_dir: &Path, page: &str, ctx: &mut ConversionContext<'_>) -> Result<()> {
    let xml = fs::read_to_string(source_dir.join(page)).map_err(|source| {
        ConversionError::PageUnreadable {
            page: page.to_string(),
            source,
        }
    })?;
    let tree = SourceTree::parse(&xml).map_err(|e| ConversionError::PageMalformed {
        page: page.to_string(),
        message: e.to_string(),
    })?;

    let root = tree.root();
    let Some(root_element) = tree.element(root) else {
        return Ok(());
    };
    match root_element.name.as_str() {
        TAG_SVG => {
            if wants_background(root_element) {
                build_background(root_element, ctx)?;
            }
            let inherited = InheritedAttributes::new();
            for child in tree.child_elements(root) {
                transcode_element(&tree, child, ctx, &inherited)?;
            }
        }
        TAG_GROUP_SECTION => debug!("Page {} is a group section, nothing to convert", page),
        other => debug!("Page {} has unexpected root <{}>, skipping it", page, other),
    }
    Ok(())
}

/// Drives the conversion of a whole extracted package.
///
/// All pages share one id generator so ids never collide inside the
/// document.
pub struct DocumentAssembler<'a> {
    options: &'a ConverterOptions,
    store: &'a mut dyn AssetStore,
    canvas: &'a dyn BackgroundCanvas,
    ids: IdGenerator,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(
        options: &'a ConverterOptions,
        store: &'a mut dyn AssetStore,
        canvas: &'a dyn BackgroundCanvas,
    ) -> Self {
        let ids = if options.deterministic_ids {
            IdGenerator::sequential(options.id_prefix.clone())
        } else {
            IdGenerator::random()
        };
        DocumentAssembler {
            options,
            store,
            canvas,
            ids,
        }
    }

    /// Converts every page of the package at `source_dir`.
    ///
    /// # Returns
    /// The ordered document and its counters, or the first error raised by
    /// any page. Nothing is returned for a document with a failing page.
    pub fn assemble(&mut self, source_dir: &Path) -> Result<(IwbDocument, ConversionReport)> {
        // 1. Read the document description and find the pages.
        let description = read_description(&source_dir.join(METADATA_FILE))?;
        let pages = list_pages(source_dir)?;
        info!(
            "Converting {} page(s) from {}",
            pages.len(),
            source_dir.display()
        );

        let mut document = IwbDocument {
            description,
            ..IwbDocument::default()
        };
        let mut report = ConversionReport::default();

        // 2. Convert each page with its own layers, sharing ids and the store.
        for page in pages {
            let relocator = ContentRelocator::new(&mut *self.store);
            let mut ctx = ConversionContext::new(
                self.options,
                document.description.view_box,
                &mut self.ids,
                relocator,
                self.canvas,
            );
            convert_page(source_dir, &page, &mut ctx)?;

            // 3. Collect counters before the context is consumed.
            report.dropped_attributes += ctx.dropped_attributes();
            report.relocated_assets += ctx.relocated_assets();
            let layered = ctx.finish();
            debug!(
                "Page {}: {} element(s), {} metadata element(s)",
                page,
                layered.presentation.len(),
                layered.extended.len()
            );

            // 4. Page elements stay with the page, metadata joins the shared stream.
            document.pages.push(IwbPage {
                id: page,
                elements: layered.presentation,
            });
            document.extended.extend(layered.extended);
        }

        // 5. Totals.
        report.pages = document.pages.len();
        report.elements = document.element_count();
        report.extended_elements = document.extended.len();
        Ok((document, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{assets::tests::RecordingStore, canvas::tests::RecordingCanvas};

    const METADATA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:ub="http://uniboard.mnemis.com/document">
  <rdf:Description rdf:about="{8a8b6a4c}">
    <dc:title>Lesson &amp; notes</dc:title>
    <ub:size>800x600</ub:size>
    <ub:version>4.8.0</ub:version>
    <dc:date>  </dc:date>
  </rdf:Description>
</rdf:RDF>"#;

    fn page(body: &str) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" xmlns:ub="http://uniboard.mnemis.com/document">{}</svg>"#,
            body
        )
    }

    fn package(files: &[(&str, &str)]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(name), content).unwrap();
        }
        dir
    }

    fn assemble(dir: &Path) -> Result<(IwbDocument, ConversionReport)> {
        let options = ConverterOptions {
            deterministic_ids: true,
            ..ConverterOptions::default()
        };
        let mut store = RecordingStore::default();
        let canvas = RecordingCanvas::default();
        let mut assembler = DocumentAssembler::new(&options, &mut store, &canvas);
        assembler.assemble(dir)
    }

    #[test]
    fn parses_description_entries_and_size() {
        let description = parse_description(METADATA).unwrap();
        assert_eq!(description.about.as_deref(), Some("{8a8b6a4c}"));
        let view_box = description.view_box.unwrap();
        assert_eq!((view_box.width, view_box.height), (800.0, 600.0));

        let names: Vec<&str> = description.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["title", "version"]);
        assert_eq!(description.entries[0].value, "Lesson & notes");
        assert_eq!(
            description.entries[0].namespace.as_deref(),
            Some("http://purl.org/dc/elements/1.1/")
        );
    }

    #[test]
    fn rejects_unusable_metadata() {
        assert!(matches!(
            parse_description("<rdf:RDF"),
            Err(ConversionError::MetadataMalformed(_))
        ));
        assert!(matches!(
            parse_description("<RDF><Description><size>0x600</size></Description></RDF>"),
            Err(ConversionError::MetadataMalformed(_))
        ));
        assert!(matches!(
            parse_description("<RDF><Description><size>-800x600</size></Description></RDF>"),
            Err(ConversionError::MetadataMalformed(_))
        ));
        assert!(matches!(
            read_description(Path::new("/nonexistent/metadata.rdf")),
            Err(ConversionError::MetadataUnreadable { .. })
        ));
    }

    #[test]
    fn recognises_page_files() {
        assert!(is_page_file("page001.svg"));
        assert!(is_page_file("PAGE012.SVG"));
        assert!(!is_page_file("page1.svg"));
        assert!(!is_page_file("page0001.svg"));
        assert!(!is_page_file("page001.svgz"));
        assert!(!is_page_file("notes.svg"));
    }

    #[test]
    fn lists_pages_in_case_insensitive_order() {
        let dir = package(&[
            ("page002.svg", ""),
            ("PAGE001.SVG", ""),
            ("page1.svg", ""),
            ("metadata.rdf", ""),
        ]);
        assert_eq!(list_pages(dir.path()).unwrap(), ["PAGE001.SVG", "page002.svg"]);

        let empty = package(&[("metadata.rdf", METADATA)]);
        assert!(matches!(
            list_pages(empty.path()),
            Err(ConversionError::NoContentPages(_))
        ));
    }

    #[test]
    fn assembles_pages_in_order_with_shared_metadata_stream() {
        let first = page(r#"<line x1="0" y1="0" x2="1" y2="1" ub:locked="true"/>"#);
        let second = page(r#"<polygon points="0,0 1,0 1,1" ub:editable="false" ub:bogus="1"/>"#);
        let dir = package(&[
            ("metadata.rdf", METADATA),
            ("page002.svg", second.as_str()),
            ("page001.svg", first.as_str()),
        ]);

        let (document, report) = assemble(dir.path()).unwrap();
        let ids: Vec<&str> = document.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["page001.svg", "page002.svg"]);
        assert_eq!(document.pages[0].elements[0].tag, "line");
        assert_eq!(document.pages[1].elements[0].tag, "polygon");

        let refs: Vec<&str> = document
            .extended
            .iter()
            .filter_map(|e| e.attribute("ref"))
            .collect();
        assert_eq!(refs, ["id-0001", "id-0002"]);
        assert_eq!(
            report,
            ConversionReport {
                pages: 2,
                elements: 2,
                extended_elements: 2,
                dropped_attributes: 1,
                relocated_assets: 0,
            }
        );
    }

    #[test]
    fn group_and_foreign_roots_produce_empty_pages() {
        let dir = package(&[
            ("metadata.rdf", METADATA),
            ("page001.svg", r#"<group><item/></group>"#),
            ("page002.svg", r#"<html><line/></html>"#),
        ]);
        let (document, report) = assemble(dir.path()).unwrap();
        assert_eq!(report.pages, 2);
        assert!(document.pages.iter().all(|p| p.elements.is_empty()));
    }

    #[test]
    fn failing_page_aborts_the_document() {
        let good = page(r#"<line x1="0" y1="0" x2="1" y2="1"/>"#);
        let dir = package(&[
            ("metadata.rdf", METADATA),
            ("page001.svg", good.as_str()),
            ("page002.svg", "<svg><g></g></svg>"),
        ]);
        assert!(matches!(
            assemble(dir.path()),
            Err(ConversionError::EmptyGroupSection)
        ));

        let broken = package(&[("metadata.rdf", METADATA), ("page001.svg", "<svg><line")]);
        assert!(matches!(
            assemble(broken.path()),
            Err(ConversionError::PageMalformed { .. })
        ));
    }

    #[test]
    fn background_uses_the_document_view_box() {
        let dir = package(&[
            ("metadata.rdf", METADATA),
            (
                "page001.svg",
                r#"<svg dark-background="false" crossed-background="false"><line x1="0" y1="0" x2="1" y2="1"/></svg>"#,
            ),
        ]);
        let (document, _) = assemble(dir.path()).unwrap();
        let elements = &document.pages[0].elements;
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].tag, "image");
        assert_eq!(elements[0].attribute("width"), Some("800"));
        assert_eq!(elements[1].tag, "line");
    }
}
