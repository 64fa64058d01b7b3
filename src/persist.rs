//! Whole-document file access shared by the record and graph formats.

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Reads a file to a string, mapping a missing file to the caller's `not_found` variant.
pub(crate) fn read_document(path: &Path, not_found: fn(PathBuf) -> Error) -> Result<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => not_found(path.to_path_buf()),
        _ => Error::io(source, path),
    })
}

/// Writes `contents` to `path` through a sibling temporary file.
///
/// The destination is only replaced once every byte has been written and flushed, so a failure
/// part way through never leaves a truncated document behind.
pub(crate) fn write_document(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| Error::io(e, dir))?;
    file.write_all(contents).map_err(|e| Error::io(e, file.path()))?;
    file.flush().map_err(|e| Error::io(e, file.path()))?;
    file.persist(path).map_err(|e| Error::io(e.error, path))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");

        write_document(&path, "héllo".as_bytes()).unwrap();

        let text = read_document(&path, |path| Error::RecordNotFound { path }).unwrap();
        assert_eq!(text, "héllo");
    }

    #[test]
    fn overwrite_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");

        write_document(&path, b"a much longer first version").unwrap();
        write_document(&path, b"short").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "short");
        // Only the destination remains, the temporary file was renamed over it.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_file_uses_not_found_variant() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.har");

        let err = read_document(&path, |path| Error::CaptureNotFound { path }).unwrap_err();
        assert!(matches!(err, Error::CaptureNotFound { path: p } if p == path));
    }
}
