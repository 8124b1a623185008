//! Whole-file document I/O. No locking, no temp-file rename, no fsync: a
//! write simply overwrites the file.

use std::fs;
use std::io;
use std::path::Path;

/// Read a whole document. A missing file or one holding only whitespace
/// reads as `None`.
pub fn read_document(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Overwrite a document with new text.
pub fn write_document(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

/// Create the document with `empty` as its content when the file is absent.
/// Returns whether the file was created.
pub fn ensure_document(path: &Path, empty: &str) -> io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_document(path, empty)?;
    Ok(true)
}
