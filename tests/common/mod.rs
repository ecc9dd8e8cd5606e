//! Synthetic EPUB archives for integration tests.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const CONTAINER_XML: &str = r#"<?xml version="1.0"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>"#;

/// Builder for an EPUB with its package document at `OEBPS/content.opf`.
pub struct EpubBuilder {
    mimetype: Option<String>,
    container_xml: Option<String>,
    documents: Vec<(String, String)>,
    opf: Option<String>,
}

impl EpubBuilder {
    pub fn new() -> Self {
        Self {
            mimetype: Some("application/epub+zip".to_string()),
            container_xml: Some(CONTAINER_XML.to_string()),
            documents: Vec::new(),
            opf: None,
        }
    }

    pub fn mimetype(mut self, mimetype: Option<&str>) -> Self {
        self.mimetype = mimetype.map(str::to_string);
        self
    }

    pub fn without_container_xml(mut self) -> Self {
        self.container_xml = None;
        self
    }

    /// Replace the generated package document.
    pub fn opf(mut self, opf: &str) -> Self {
        self.opf = Some(opf.to_string());
        self
    }

    /// Add an XHTML document at `OEBPS/{href}`, listed in manifest and spine.
    pub fn document(mut self, href: &str, body: &str) -> Self {
        self.documents.push((href.to_string(), body.to_string()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if let Some(mimetype) = &self.mimetype {
            zip.start_file("mimetype", stored).unwrap();
            zip.write_all(mimetype.as_bytes()).unwrap();
        }
        if let Some(container) = &self.container_xml {
            zip.start_file("META-INF/container.xml", deflated).unwrap();
            zip.write_all(container.as_bytes()).unwrap();
        }

        let opf = self.opf.clone().unwrap_or_else(|| self.generated_opf());
        zip.start_file("OEBPS/content.opf", deflated).unwrap();
        zip.write_all(opf.as_bytes()).unwrap();

        zip.start_file("OEBPS/style.css", deflated).unwrap();
        zip.write_all(b"p { margin: 0; }").unwrap();

        for (href, body) in &self.documents {
            zip.start_file(format!("OEBPS/{href}"), deflated).unwrap();
            zip.write_all(body.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    fn generated_opf(&self) -> String {
        let mut manifest = String::new();
        let mut spine = String::new();
        for (i, (href, _)) in self.documents.iter().enumerate() {
            manifest.push_str(&format!(
                "    <item id=\"doc{i}\" href=\"{href}\" media-type=\"application/xhtml+xml\"/>\n"
            ));
            spine.push_str(&format!("    <itemref idref=\"doc{i}\"/>\n"));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<package xmlns="http://www.idpf.org/2007/opf" version="3.0">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
    <dc:title>Prøvebog</dc:title>
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
}

/// An XHTML document with one `<p>` per paragraph.
pub fn xhtml(paragraphs: &[&str]) -> String {
    let body: String = paragraphs.iter().map(|p| format!("<p>{p}</p>\n")).collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<html xmlns="http://www.w3.org/1999/xhtml">
<head><title>Kapitel</title></head>
<body>
{body}</body>
</html>"#
    )
}

/// Five sentences of 20 words each, one long word per sentence.
///
/// 100 words, 5 long words, 5 sentences: LIX 100/5 + 500/100 = 25.
pub fn lix_25_paragraph() -> String {
    let sentence = format!("Vi {}forskellige ting.", "ord ".repeat(17));
    vec![sentence; 5].join(" ")
}
