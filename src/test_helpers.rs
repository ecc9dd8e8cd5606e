//! Builders for synthetic EPUB archives used by unit tests.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write `entries` into a zip archive, in order.
///
/// `mimetype` is stored uncompressed, everything else is deflated.
pub fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, data) in entries {
        let options = if *name == "mimetype" { stored } else { deflated };
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn container_xml(opf_path: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="{opf_path}" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#
    )
}

/// An OPF listing each href as an XHTML manifest item, spine in the same order.
pub fn opf(hrefs: &[&str]) -> String {
    let mut manifest = String::new();
    let mut spine = String::new();
    for (i, href) in hrefs.iter().enumerate() {
        manifest.push_str(&format!(
            r#"    <item id="item{i}" href="{href}" media-type="application/xhtml+xml"/>
"#
        ));
        spine.push_str(&format!(
            r#"    <itemref idref="item{i}"/>
"#
        ));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Test Book</dc:title>
    <dc:language>da</dc:language>
  </metadata>
  <manifest>
    <item id="css" href="style.css" media-type="text/css"/>
{manifest}  </manifest>
  <spine>
{spine}  </spine>
</package>"#
    )
}

/// A complete EPUB with its package document at `OEBPS/content.opf`.
pub fn minimal_epub(chapters: &[(&str, &str)]) -> Vec<u8> {
    let hrefs: Vec<&str> = chapters.iter().map(|(href, _)| *href).collect();
    let container = container_xml("OEBPS/content.opf");
    let package = opf(&hrefs);

    let paths: Vec<String> = hrefs.iter().map(|href| format!("OEBPS/{href}")).collect();
    let mut entries: Vec<(&str, &[u8])> = vec![
        ("mimetype", b"application/epub+zip".as_slice()),
        ("META-INF/container.xml", container.as_bytes()),
        ("OEBPS/content.opf", package.as_bytes()),
    ];
    for (path, (_, body)) in paths.iter().zip(chapters) {
        entries.push((path.as_str(), body.as_bytes()));
    }
    build_zip(&entries)
}

/// Wrap paragraphs in an XHTML document.
pub fn xhtml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>\n")).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops">
<head><title>Chapter</title></head>
<body>
{body}</body>
</html>"#
    )
}
