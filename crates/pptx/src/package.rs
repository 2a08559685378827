//! ZIP package assembly for PPTX output.
//!
//! Entry order is fixed by the caller and file metadata is pinned, so
//! encoding the same presentation twice yields byte-identical output.

use deck_core::{Error, Result};
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Writer for the OOXML package parts.
pub(crate) struct PackageWriter {
    zip: ZipWriter<Cursor<Vec<u8>>>,
}

impl PackageWriter {
    pub fn new() -> Self {
        Self {
            zip: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Add one part at the given package path.
    pub fn add_part(&mut self, path: &str, content: &[u8]) -> Result<()> {
        // Pinned timestamp keeps the archive independent of wall time.
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(zip::DateTime::default());

        self.zip
            .start_file(path, options)
            .map_err(|e| Error::ZipError(format!("Failed to start part '{path}': {e}")))?;
        self.zip
            .write_all(content)
            .map_err(|e| Error::ZipError(format!("Failed to write part '{path}': {e}")))?;
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finish(mut self) -> Result<Vec<u8>> {
        let cursor = self
            .zip
            .finish()
            .map_err(|e| Error::ZipError(format!("Failed to finish package: {e}")))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_parts_round_trip() {
        let mut writer = PackageWriter::new();
        writer.add_part("a.xml", b"<a/>").unwrap();
        writer.add_part("dir/b.xml", b"<b/>").unwrap();
        let bytes = writer.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("dir/b.xml")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, "<b/>");
    }

    #[test]
    fn test_identical_input_is_byte_identical() {
        let build = || {
            let mut writer = PackageWriter::new();
            writer.add_part("a.xml", b"<a/>").unwrap();
            writer.finish().unwrap()
        };
        assert_eq!(build(), build());
    }
}
