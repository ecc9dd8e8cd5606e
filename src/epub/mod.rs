//! EPUB container access: the zip archive and its package document.

mod container;
mod package;

pub use container::{Container, EPUB_MIMETYPE};
pub use package::{
    CONTAINER_XML, ContentOrder, ManifestItem, PackageDocument, XHTML_MEDIA_TYPE,
    parse_container_xml, parse_opf,
};
