use std::fmt;
use std::path::Path;

const PDF_MAGIC: &[u8] = b"%PDF-";
const ZIP_MAGIC: &[u8] = b"PK\x03\x04";
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Document type of a single archive entry. Determines the staging suffix
/// and which text reader the extractors use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Doc,
    Text,
    Unknown,
}

impl DocumentFormat {
    /// Sniffs the leading bytes first and falls back to the entry's extension.
    ///
    /// A ZIP signature only counts as DOCX when the extension agrees or is
    /// missing, so a nested `.zip` is not mistaken for a Word document.
    pub fn detect(name: &str, data: &[u8]) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        let by_ext = ext.as_deref().map(Self::from_extension);

        if data.starts_with(PDF_MAGIC) {
            return Self::Pdf;
        }
        if data.starts_with(OLE_MAGIC) {
            return Self::Doc;
        }
        if data.starts_with(ZIP_MAGIC) {
            return match by_ext {
                None | Some(Self::Docx) => Self::Docx,
                Some(_) => Self::Unknown,
            };
        }

        match by_ext {
            Some(Self::Text) | None if looks_like_text(data) => Self::Text,
            Some(format) => format,
            None => Self::Unknown,
        }
    }

    fn from_extension(ext: &str) -> Self {
        match ext {
            "pdf" => Self::Pdf,
            "docx" => Self::Docx,
            "doc" => Self::Doc,
            "txt" | "text" | "md" => Self::Text,
            _ => Self::Unknown,
        }
    }

    /// Suffix used when staging the document on disk.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Doc => ".doc",
            Self::Text => ".txt",
            Self::Unknown => ".bin",
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
            Self::Text => "text",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

fn looks_like_text(data: &[u8]) -> bool {
    !data.is_empty() && std::str::from_utf8(data).is_ok() && !data.contains(&0)
}
