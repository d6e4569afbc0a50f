//! Archive unpacker: walks a ZIP container and yields each file entry's
//! basename and bytes, in central-directory order.

use std::fs::File;
use std::io::{Read, Seek};
use std::path::{Path, PathBuf};

use thiserror::Error;

const MAX_PREALLOC_BYTES: usize = 1024 * 1024;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid archive: {0}")]
    Invalid(String),

    #[error("entry name escapes the archive root: {0}")]
    UnsafeEntryName(String),
}

/// One file pulled out of the archive. The bytes are fully read before the
/// unpacker moves to the next entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Basename of the entry; directory components are dropped.
    pub name: String,
    pub data: Vec<u8>,
}

pub struct ResumeArchive<R> {
    inner: zip::ZipArchive<R>,
}

impl ResumeArchive<File> {
    /// Opens the archive at `path`. An archive with no entries is valid.
    pub fn open(path: &Path) -> Result<Self, ArchiveError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }
}

impl<R: Read + Seek> ResumeArchive<R> {
    pub fn from_reader(reader: R) -> Result<Self, ArchiveError> {
        let inner = zip::ZipArchive::new(reader)
            .map_err(|e| ArchiveError::Invalid(format!("failed to open ZIP archive: {e}")))?;
        Ok(Self { inner })
    }

    /// Number of raw entries in the listing, directories included.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Lazily yields file entries. Directories are skipped; an entry whose
    /// name would escape the archive root yields `UnsafeEntryName`.
    pub fn entries(&mut self) -> Entries<'_, R> {
        Entries {
            archive: &mut self.inner,
            index: 0,
        }
    }
}

pub struct Entries<'a, R> {
    archive: &'a mut zip::ZipArchive<R>,
    index: usize,
}

impl<R: Read + Seek> Entries<'_, R> {
    fn read_entry(&mut self, index: usize) -> Result<Option<ArchiveEntry>, ArchiveError> {
        let mut entry = self
            .archive
            .by_index(index)
            .map_err(|e| ArchiveError::Invalid(format!("failed to read ZIP entry {index}: {e}")))?;

        if entry.is_dir() {
            return Ok(None);
        }

        let raw_name = entry.name().to_string();
        let name = entry
            .enclosed_name()
            .as_deref()
            .and_then(basename)
            .ok_or(ArchiveError::UnsafeEntryName(raw_name))?;

        let mut data = Vec::with_capacity(capacity_hint(entry.size()));
        entry.read_to_end(&mut data)?;
        Ok(Some(ArchiveEntry { name, data }))
    }
}

impl<R: Read + Seek> Iterator for Entries<'_, R> {
    type Item = Result<ArchiveEntry, ArchiveError>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.archive.len() {
            let index = self.index;
            self.index += 1;
            match self.read_entry(index) {
                Ok(Some(entry)) => return Some(Ok(entry)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
        None
    }
}

/// Preallocation for an entry's bytes. The declared size comes from the
/// archive and is untrusted, so it only seeds the buffer up to a cap.
fn capacity_hint(declared: u64) -> usize {
    usize::try_from(declared)
        .unwrap_or(usize::MAX)
        .min(MAX_PREALLOC_BYTES)
}

/// Last normal path component, rejecting anything with `..` in it.
fn basename(path: &Path) -> Option<String> {
    if path
        .components()
        .any(|c| matches!(c, std::path::Component::ParentDir))
    {
        return None;
    }
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
}

/// Reduces an untrusted client-supplied filename to a safe basename.
/// Both `/` and `\` count as separators.
pub fn sanitize_file_name(raw: &str) -> Option<String> {
    let last = raw.rsplit(['/', '\\']).next()?.trim();
    if last.is_empty() || last == "." || last == ".." || last.contains('\0') {
        return None;
    }
    basename(&PathBuf::from(last))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    /// Builds an in-memory ZIP from `(path, content)` pairs, stored uncompressed.
    pub(crate) fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        for (path, data) in entries {
            if path.ends_with('/') {
                zip.add_directory(*path, options).unwrap();
            } else {
                zip.start_file(*path, options).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap().into_inner()
    }

    fn collect(bytes: Vec<u8>) -> Vec<Result<ArchiveEntry, ArchiveError>> {
        let mut archive = ResumeArchive::from_reader(Cursor::new(bytes)).unwrap();
        archive.entries().collect()
    }

    #[test]
    fn test_entries_follow_listing_order() {
        let bytes = build_zip(&[
            ("zeta.pdf", b"z"),
            ("alpha.pdf", b"a"),
            ("mid.txt", b"m"),
        ]);
        let names: Vec<String> = collect(bytes)
            .into_iter()
            .map(|e| e.unwrap().name)
            .collect();
        assert_eq!(names, vec!["zeta.pdf", "alpha.pdf", "mid.txt"]);
    }

    #[test]
    fn test_directories_skipped_and_nested_names_flattened() {
        let bytes = build_zip(&[
            ("resumes/", b""),
            ("resumes/jane.pdf", b"%PDF-1.4"),
        ]);
        let entries = collect(bytes);
        assert_eq!(entries.len(), 1);
        let entry = entries.into_iter().next().unwrap().unwrap();
        assert_eq!(entry.name, "jane.pdf");
        assert_eq!(entry.data, b"%PDF-1.4");
    }

    #[test]
    fn test_empty_archive_has_no_entries() {
        let mut archive = ResumeArchive::from_reader(Cursor::new(build_zip(&[]))).unwrap();
        assert_eq!(archive.len(), 0);
        assert_eq!(archive.entries().count(), 0);
    }

    #[test]
    fn test_traversal_entry_is_rejected() {
        let bytes = build_zip(&[("ok.txt", b"fine"), ("../evil.pdf", b"x")]);
        let entries = collect(bytes);
        assert!(entries[0].is_ok());
        assert!(matches!(
            entries[1],
            Err(ArchiveError::UnsafeEntryName(ref n)) if n == "../evil.pdf"
        ));
    }

    #[test]
    fn test_garbage_is_not_an_archive() {
        let err = ResumeArchive::from_reader(Cursor::new(b"not a zip".to_vec()))
            .err()
            .unwrap();
        assert!(matches!(err, ArchiveError::Invalid(_)));
    }

    #[test]
    fn test_open_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("batch.zip");
        std::fs::write(&path, build_zip(&[("a.txt", b"a")])).unwrap();
        let mut archive = ResumeArchive::open(&path).unwrap();
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.entries().count(), 1);
    }

    #[test]
    fn test_declared_size_does_not_drive_allocation() {
        assert_eq!(capacity_hint(u64::MAX - 16), MAX_PREALLOC_BYTES);
        assert_eq!(capacity_hint(0xFFFF_FFF0), MAX_PREALLOC_BYTES);
        assert_eq!(capacity_hint(512), 512);
    }

    #[test]
    fn test_sanitize_file_name() {
        assert_eq!(sanitize_file_name("batch.zip").as_deref(), Some("batch.zip"));
        assert_eq!(
            sanitize_file_name("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_file_name("C:\\Users\\me\\resumes.zip").as_deref(),
            Some("resumes.zip")
        );
        assert_eq!(sanitize_file_name("uploads/.."), None);
        assert_eq!(sanitize_file_name("   "), None);
    }
}
