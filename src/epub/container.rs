//! Random-access reader for the EPUB zip container.

use std::collections::HashMap;
use std::io::{Cursor, Read};
use std::path::Path;

use zip::{CompressionMethod, ZipArchive};

use crate::error::{Error, Result};
use crate::util::strip_bom;

/// Media type every EPUB declares in its `mimetype` entry.
pub const EPUB_MIMETYPE: &str = "application/epub+zip";

/// An EPUB archive held in memory.
///
/// The central directory is scanned once; afterwards every entry is read
/// by slicing the buffer at its recorded offset, so a `&Container` can be
/// shared between threads that read different entries at the same time.
pub struct Container {
    data: Vec<u8>,

    /// Entry path -> location of its compressed data.
    index: HashMap<String, EntryLoc>,

    /// Entry paths in central directory order.
    names: Vec<String>,
}

#[derive(Clone, Copy)]
struct EntryLoc {
    data_offset: u64,
    compressed_size: u64,
    /// Declared size after inflation; output is never allowed past it.
    size: u64,
    compression: CompressionMethod,
}

impl Container {
    /// Read an EPUB file from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Index an EPUB held in memory and check its declared media type.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let (index, names) = scan_central_directory(&data)?;
        let container = Self { data, index, names };
        container.check_mimetype()?;
        log::debug!(
            "indexed {} entries ({} bytes)",
            container.names.len(),
            container.data.len()
        );
        Ok(container)
    }

    /// Size of the archive in bytes.
    pub fn byte_size(&self) -> usize {
        self.data.len()
    }

    /// Entry paths in archive order, directories excluded.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Whether an entry exists at `path`.
    pub fn contains(&self, path: &str) -> bool {
        self.locate(path).is_some()
    }

    /// Read and decompress one entry.
    ///
    /// Falls back to the percent-decoded path, since some packages
    /// reference `My%20Chapter.xhtml` while storing `My Chapter.xhtml`.
    /// An entry that is out of bounds, undecodable, or inflates past its
    /// declared size is [`Error::NotFound`].
    pub fn read_entry(&self, path: &str) -> Result<Vec<u8>> {
        let loc = self
            .locate(path)
            .ok_or_else(|| Error::NotFound(path.to_string()))?;
        let unreadable = |why: &str| Error::NotFound(format!("{path} ({why})"));

        let raw = usize::try_from(loc.data_offset)
            .ok()
            .zip(usize::try_from(loc.compressed_size).ok())
            .and_then(|(start, len)| Some(start..start.checked_add(len)?))
            .and_then(|range| self.data.get(range))
            .ok_or_else(|| unreadable("truncated entry"))?;

        let out = match loc.compression {
            CompressionMethod::Stored => raw.to_vec(),
            CompressionMethod::Deflated => {
                let limit = loc.size.saturating_add(1);
                let mut decoder = flate2::read::DeflateDecoder::new(raw).take(limit);
                let mut out = Vec::new();
                decoder
                    .read_to_end(&mut out)
                    .map_err(|e| unreadable(&format!("corrupt deflate stream: {e}")))?;
                out
            }
            _ => return Err(unreadable("unsupported compression method")),
        };

        if out.len() as u64 > loc.size {
            return Err(unreadable(&format!(
                "larger than its declared {} bytes",
                loc.size
            )));
        }
        Ok(out)
    }

    fn locate(&self, path: &str) -> Option<EntryLoc> {
        if let Some(loc) = self.index.get(path) {
            return Some(*loc);
        }
        let decoded = percent_encoding::percent_decode_str(path)
            .decode_utf8()
            .ok()?;
        self.index.get(decoded.as_ref()).copied()
    }

    fn check_mimetype(&self) -> Result<()> {
        let declared = self
            .read_entry("mimetype")
            .map_err(|_| Error::Format("missing mimetype entry".into()))?;
        let declared = strip_bom(&declared).trim_ascii();
        if declared != EPUB_MIMETYPE.as_bytes() {
            return Err(Error::Format(format!(
                "mimetype is {:?}, expected {EPUB_MIMETYPE}",
                String::from_utf8_lossy(declared)
            )));
        }
        Ok(())
    }
}

type DirectoryScan = (HashMap<String, EntryLoc>, Vec<String>);

fn scan_central_directory(data: &[u8]) -> Result<DirectoryScan> {
    let mut archive = ZipArchive::new(Cursor::new(data))
        .map_err(|e| Error::Format(format!("not a zip archive: {e}")))?;

    let mut index = HashMap::with_capacity(archive.len());
    let mut names = Vec::with_capacity(archive.len());

    for i in 0..archive.len() {
        let file = archive.by_index_raw(i)?;
        if file.is_dir() {
            continue;
        }
        let name = file.name().to_string();
        index.insert(
            name.clone(),
            EntryLoc {
                data_offset: file.data_start(),
                compressed_size: file.compressed_size(),
                size: file.size(),
                compression: file.compression(),
            },
        );
        names.push(name);
    }

    Ok((index, names))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{build_zip, minimal_epub};

    #[test]
    fn test_reads_stored_and_deflated_entries() {
        let bytes = minimal_epub(&[("ch1.xhtml", "<html><body><p>Hej.</p></body></html>")]);
        let container = Container::from_bytes(bytes).unwrap();

        assert_eq!(container.read_entry("mimetype").unwrap(), EPUB_MIMETYPE.as_bytes());
        let chapter = container.read_entry("OEBPS/ch1.xhtml").unwrap();
        assert!(String::from_utf8(chapter).unwrap().contains("Hej."));
    }

    #[test]
    fn test_entries_in_archive_order() {
        let bytes = minimal_epub(&[("a.xhtml", "<p>a</p>"), ("b.xhtml", "<p>b</p>")]);
        let container = Container::from_bytes(bytes).unwrap();
        let entries: Vec<_> = container.entries().collect();
        assert_eq!(entries[0], "mimetype");
        assert!(entries.contains(&"OEBPS/a.xhtml"));
        assert!(entries.contains(&"OEBPS/b.xhtml"));
    }

    #[test]
    fn test_missing_entry_is_not_found() {
        let container = Container::from_bytes(minimal_epub(&[])).unwrap();
        assert!(matches!(
            container.read_entry("OEBPS/nope.xhtml"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_percent_decoded_fallback() {
        let bytes = build_zip(&[
            ("mimetype", EPUB_MIMETYPE.as_bytes()),
            ("OEBPS/My Chapter.xhtml", b"<p>x</p>".as_slice()),
        ]);
        let container = Container::from_bytes(bytes).unwrap();
        assert!(container.contains("OEBPS/My%20Chapter.xhtml"));
        assert_eq!(container.read_entry("OEBPS/My%20Chapter.xhtml").unwrap(), b"<p>x</p>");
    }

    /// Rewrite the uncompressed size recorded for `name` in the central
    /// directory.
    fn set_declared_size(archive: &mut [u8], name: &str, size: u32) {
        const CENTRAL_HEADER: &[u8] = b"PK\x01\x02";
        let pos = (0..archive.len().saturating_sub(46))
            .find(|&i| {
                archive[i..].starts_with(CENTRAL_HEADER)
                    && archive[i + 46..].starts_with(name.as_bytes())
            })
            .unwrap();
        archive[pos + 24..pos + 28].copy_from_slice(&size.to_le_bytes());
    }

    #[test]
    fn test_inflation_is_capped_at_declared_size() {
        let body = vec![b'a'; 1 << 20];
        let mut bytes = build_zip(&[
            ("mimetype", EPUB_MIMETYPE.as_bytes()),
            ("OEBPS/big.xhtml", body.as_slice()),
            ("OEBPS/bomb.xhtml", body.as_slice()),
        ]);
        set_declared_size(&mut bytes, "OEBPS/bomb.xhtml", 64);
        let container = Container::from_bytes(bytes).unwrap();

        assert_eq!(container.read_entry("OEBPS/big.xhtml").unwrap().len(), 1 << 20);
        assert!(matches!(
            container.read_entry("OEBPS/bomb.xhtml"),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_wrong_mimetype_is_format_error() {
        let bytes = build_zip(&[("mimetype", b"application/zip".as_slice())]);
        assert!(matches!(Container::from_bytes(bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_missing_mimetype_is_format_error() {
        let bytes = build_zip(&[("META-INF/container.xml", b"<container/>".as_slice())]);
        assert!(matches!(Container::from_bytes(bytes), Err(Error::Format(_))));
    }

    #[test]
    fn test_not_a_zip_is_format_error() {
        let result = Container::from_bytes(b"definitely not a zip file".to_vec());
        assert!(matches!(result, Err(Error::Format(_))));
    }

    #[test]
    fn test_container_is_sync() {
        fn assert_sync<T: Send + Sync>() {}
        assert_sync::<Container>();
    }
}
