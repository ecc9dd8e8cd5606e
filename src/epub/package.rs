//! Package document parsing (container.xml and the OPF manifest).

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};
use crate::util::{join_archive_path, local_name, resolve_entity, strip_bom};

use super::Container;

/// Fixed location of the entry that points at the package document.
pub const CONTAINER_XML: &str = "META-INF/container.xml";

/// Media type of text-bearing content documents.
pub const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

/// Order in which content documents are handed to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentOrder {
    /// Spine reading order, then any remaining XHTML manifest items in
    /// declaration order.
    #[default]
    Spine,
    /// Manifest declaration order only.
    Manifest,
}

/// One `<item>` of the OPF manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestItem {
    pub id: String,
    pub href: String,
    pub media_type: String,
}

/// Parsed OPF package document.
#[derive(Debug, Clone, Default)]
pub struct PackageDocument {
    /// Directory of the OPF inside the archive ("" for the root).
    pub root_dir: String,
    /// Manifest items in declaration order.
    pub manifest: Vec<ManifestItem>,
    /// Spine idrefs in reading order.
    pub spine: Vec<String>,
    pub title: Option<String>,
    pub language: Option<String>,
}

impl PackageDocument {
    /// Locate and parse the package document of `container`.
    pub fn load(container: &Container) -> Result<Self> {
        let container_xml = container
            .read_entry(CONTAINER_XML)
            .map_err(|_| Error::Format(format!("missing {CONTAINER_XML}")))?;
        let opf_path = parse_container_xml(&container_xml)?;

        let opf_bytes = container
            .read_entry(&opf_path)
            .map_err(|_| Error::Format(format!("package document {opf_path} not found")))?;
        let opf = std::str::from_utf8(strip_bom(&opf_bytes))
            .map_err(|e| Error::Format(format!("package document is not UTF-8: {e}")))?;

        let root_dir = opf_path
            .rsplit_once('/')
            .map(|(dir, _)| dir.to_string())
            .unwrap_or_default();
        parse_opf(opf, root_dir)
    }

    /// Archive paths of every XHTML content document.
    ///
    /// Fails with [`Error::Format`] when the manifest declares none.
    pub fn content_paths(&self, order: ContentOrder) -> Result<Vec<String>> {
        let xhtml: Vec<&ManifestItem> = self
            .manifest
            .iter()
            .filter(|item| item.media_type == XHTML_MEDIA_TYPE)
            .collect();
        if xhtml.is_empty() {
            return Err(Error::Format(
                "manifest declares no XHTML content documents".into(),
            ));
        }

        let ordered: Vec<&ManifestItem> = match order {
            ContentOrder::Manifest => xhtml,
            ContentOrder::Spine => {
                let mut ordered: Vec<&ManifestItem> = Vec::with_capacity(xhtml.len());
                for idref in &self.spine {
                    if let Some(&item) = xhtml.iter().find(|item| &item.id == idref)
                        && !ordered.iter().any(|seen| seen.id == item.id)
                    {
                        ordered.push(item);
                    }
                }
                for item in xhtml {
                    if !ordered.iter().any(|seen| seen.id == item.id) {
                        ordered.push(item);
                    }
                }
                ordered
            }
        };

        Ok(ordered
            .into_iter()
            .map(|item| join_archive_path(&self.root_dir, &item.href))
            .collect())
    }
}

/// Parse META-INF/container.xml and return the first rootfile path.
pub fn parse_container_xml(bytes: &[u8]) -> Result<String> {
    let content = std::str::from_utf8(strip_bom(bytes))
        .map_err(|e| Error::Format(format!("{CONTAINER_XML} is not UTF-8: {e}")))?;

    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"rootfile" =>
            {
                if let Some(path) = attribute(&e, b"full-path")
                    && !path.is_empty()
                {
                    return Ok(path);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Format(format!("malformed {CONTAINER_XML}: {e}"))),
            _ => {}
        }
    }

    Err(Error::Format(format!("no rootfile found in {CONTAINER_XML}")))
}

/// Parse an OPF package document.
///
/// Only the parts the analysis needs are kept: manifest, spine, title and
/// language.
pub fn parse_opf(content: &str, root_dir: String) -> Result<PackageDocument> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut package = PackageDocument {
        root_dir,
        ..Default::default()
    };
    let mut saw_package = false;
    let mut saw_manifest = false;
    let mut in_metadata = false;
    let mut current: Option<&'static str> = None;
    let mut text = String::new();

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Format(format!("malformed package document: {e}")))?;
        match event {
            Event::Start(e) => match local_name(e.name().as_ref()) {
                b"package" => saw_package = true,
                b"metadata" => in_metadata = true,
                b"manifest" => saw_manifest = true,
                b"title" if in_metadata => {
                    current = Some("title");
                    text.clear();
                }
                b"language" if in_metadata => {
                    current = Some("language");
                    text.clear();
                }
                _ => push_entry(&e, &mut package),
            },
            Event::Empty(e) => match local_name(e.name().as_ref()) {
                b"manifest" => saw_manifest = true,
                _ => push_entry(&e, &mut package),
            },
            Event::Text(e) if current.is_some() => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Event::GeneralRef(e) if current.is_some() => {
                if let Some(c) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                    text.push(c);
                }
            }
            Event::End(e) => {
                let name = e.name();
                let local = local_name(name.as_ref());
                if local == b"metadata" {
                    in_metadata = false;
                }
                match (current, local) {
                    (Some("title"), b"title") if package.title.is_none() => {
                        package.title = Some(text.trim().to_string());
                        current = None;
                    }
                    (Some("language"), b"language") if package.language.is_none() => {
                        package.language = Some(text.trim().to_string());
                        current = None;
                    }
                    (Some(_), b"title" | b"language") => current = None,
                    _ => {}
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_package {
        return Err(Error::Format("package document has no <package> root".into()));
    }
    if !saw_manifest {
        return Err(Error::Format("package document has no <manifest>".into()));
    }

    log::debug!(
        "package: {} manifest items, {} spine entries, root {:?}",
        package.manifest.len(),
        package.spine.len(),
        package.root_dir
    );
    Ok(package)
}

/// Record a manifest `item` or spine `itemref`, written either as an empty
/// element or with a separate end tag.
fn push_entry(e: &BytesStart<'_>, package: &mut PackageDocument) {
    match local_name(e.name().as_ref()) {
        b"item" => {
            if let Some(item) = manifest_item(e) {
                package.manifest.push(item);
            }
        }
        b"itemref" => {
            if let Some(idref) = attribute(e, b"idref") {
                package.spine.push(idref);
            }
        }
        _ => {}
    }
}

fn manifest_item(e: &BytesStart<'_>) -> Option<ManifestItem> {
    let id = attribute(e, b"id")?;
    let href = attribute(e, b"href")?;
    let media_type = attribute(e, b"media-type").unwrap_or_default();
    Some(ManifestItem {
        id,
        href,
        media_type,
    })
}

fn attribute(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == key)
        .map(|attr| String::from_utf8_lossy(attr.value.as_ref()).into_owned())
}
