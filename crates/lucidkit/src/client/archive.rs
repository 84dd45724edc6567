//! `.lucid` import archives
//!
//! The import endpoint takes a ZIP archive with the document JSON stored as
//! `document.json` at its root.

use std::io::{Cursor, Read, Write};

use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::core::Result;

/// Archive entry holding the document JSON
pub const DOCUMENT_ENTRY: &str = "document.json";

/// MIME type of the archive in the upload form
pub const IMPORT_MIME: &str = "x-application/vnd.lucid.standardImport";

/// File name the archive is uploaded under
pub const IMPORT_FILE_NAME: &str = "import.lucid";

pub fn build_import_archive(json: &str) -> Result<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    writer.start_file(DOCUMENT_ENTRY, options)?;
    writer.write_all(json.as_bytes())?;
    let bytes = writer.finish()?.into_inner();
    debug!(json_len = json.len(), archive_len = bytes.len(), "Built import archive");
    Ok(bytes)
}

/// Extract the document JSON from an archive
pub fn read_import_archive(bytes: &[u8]) -> Result<String> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut entry = archive.by_name(DOCUMENT_ENTRY)?;
    let mut json = String::new();
    entry.read_to_string(&mut json)?;
    Ok(json)
}

/// Whether the bytes start with a ZIP local file header
pub fn is_archive(bytes: &[u8]) -> bool {
    bytes.starts_with(b"PK\x03\x04")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LucidError;

    #[test]
    fn test_archive_holds_document_json() {
        let json = r#"{"version":1,"title":"T","pages":[]}"#;
        let bytes = build_import_archive(json).unwrap();
        assert!(is_archive(&bytes));
        assert_eq!(read_import_archive(&bytes).unwrap(), json);
    }

    #[test]
    fn test_plain_json_is_not_an_archive() {
        assert!(!is_archive(b"{\"title\": \"x\"}"));
        let err = read_import_archive(b"{\"title\": \"x\"}").unwrap_err();
        assert!(matches!(err, LucidError::Archive { .. }));
    }

    #[test]
    fn test_archive_without_document_entry() {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("other.txt", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"hello").unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        assert!(read_import_archive(&bytes).is_err());
    }
}
