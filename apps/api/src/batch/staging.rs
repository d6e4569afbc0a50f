use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::extract::DocumentFormat;

const STAGING_PREFIX: &str = "resume-";

/// A resume document written to disk so a path-based extractor can read it.
///
/// The file has a unique name and is removed when the value is dropped,
/// whether extraction succeeded or not.
pub struct StagingFile {
    file: NamedTempFile,
    format: DocumentFormat,
}

impl StagingFile {
    /// Writes `data` to a fresh file in `dir` with the suffix for `format`.
    pub fn write(dir: &Path, format: DocumentFormat, data: &[u8]) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix(STAGING_PREFIX)
            .suffix(format.suffix())
            .tempfile_in(dir)?;
        file.write_all(data)?;
        file.flush()?;
        Ok(Self { file, format })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Deletes the file now, surfacing any removal error instead of
    /// swallowing it in `Drop`.
    pub fn remove(self) -> std::io::Result<()> {
        self.file.close()
    }
}

/// Default directory for staging files.
pub fn default_staging_dir() -> PathBuf {
    std::env::temp_dir()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_staged_file_has_format_suffix_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let staged = StagingFile::write(dir.path(), DocumentFormat::Docx, b"PK\x03\x04").unwrap();
        let name = staged.path().file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with(STAGING_PREFIX), "{name}");
        assert!(name.ends_with(".docx"), "{name}");
        assert_eq!(std::fs::read(staged.path()).unwrap(), b"PK\x03\x04");
        assert_eq!(staged.format(), DocumentFormat::Docx);
    }

    #[test]
    fn test_names_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let a = StagingFile::write(dir.path(), DocumentFormat::Pdf, b"a").unwrap();
        let b = StagingFile::write(dir.path(), DocumentFormat::Pdf, b"b").unwrap();
        assert_ne!(a.path(), b.path());
    }

    #[test]
    fn test_removed_on_drop_and_on_remove() {
        let dir = tempfile::tempdir().unwrap();

        let dropped = StagingFile::write(dir.path(), DocumentFormat::Text, b"x").unwrap();
        let dropped_path = dropped.path().to_path_buf();
        drop(dropped);
        assert!(!dropped_path.exists());

        let removed = StagingFile::write(dir.path(), DocumentFormat::Text, b"y").unwrap();
        let removed_path = removed.path().to_path_buf();
        removed.remove().unwrap();
        assert!(!removed_path.exists());
    }
}
