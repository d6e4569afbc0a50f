//! Plain-text readers for staged resume documents.
//!
//! All functions here block; callers on the async runtime go through
//! [`read_document_text`], which moves the work onto the blocking pool.

use std::path::{Path, PathBuf};

use docx_rs::{read_docx, DocumentChild, ParagraphChild, RunChild};

use crate::extract::{DocumentFormat, ExtractionError};

pub async fn read_document_text(
    path: &Path,
    format: DocumentFormat,
) -> Result<String, ExtractionError> {
    let path: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || read_document_text_blocking(&path, format)).await?
}

pub fn read_document_text_blocking(
    path: &Path,
    format: DocumentFormat,
) -> Result<String, ExtractionError> {
    match format {
        DocumentFormat::Pdf => pdf_extract::extract_text(path)
            .map_err(|e| ExtractionError::Pdf(e.to_string())),
        DocumentFormat::Docx => read_docx_text(path),
        DocumentFormat::Text => {
            let bytes = std::fs::read(path)?;
            Ok(String::from_utf8_lossy(&bytes).into_owned())
        }
        DocumentFormat::Doc | DocumentFormat::Unknown => {
            Err(ExtractionError::UnsupportedFormat(format))
        }
    }
}

fn read_docx_text(path: &Path) -> Result<String, ExtractionError> {
    let bytes = std::fs::read(path)?;
    let docx = read_docx(&bytes).map_err(|e| ExtractionError::Docx(e.to_string()))?;
    Ok(paragraph_text(docx.document.children))
}

/// Body paragraphs in document order, one line each. Breaks become newlines
/// and tabs stay tabs.
fn paragraph_text(children: Vec<DocumentChild>) -> String {
    let mut text = String::new();
    for child in children {
        let DocumentChild::Paragraph(paragraph) = child else {
            continue;
        };
        for child in paragraph.children {
            let ParagraphChild::Run(run) = child else {
                continue;
            };
            for run_child in run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{BreakType, Docx, Paragraph, Run};
    use std::fs::File;

    fn write_docx(dir: &Path, paragraphs: Vec<Paragraph>) -> PathBuf {
        let path = dir.join("cv.docx");
        let file = File::create(&path).unwrap();
        let docx = paragraphs
            .into_iter()
            .fold(Docx::new(), |docx, p| docx.add_paragraph(p));
        docx.build().pack(file).unwrap();
        path
    }

    #[test]
    fn test_reads_docx_paragraphs_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            vec![
                Paragraph::new().add_run(Run::new().add_text("Jane Doe")),
                Paragraph::new().add_run(Run::new().add_text("R&D Engineer")),
            ],
        );
        let text = read_document_text_blocking(&path, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Jane Doe\nR&D Engineer\n");
    }

    #[test]
    fn test_docx_text_keeps_escaped_and_non_ascii_characters() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            vec![Paragraph::new().add_run(Run::new().add_text("O\u{2019}Neil <Acme> & \"Sons\""))],
        );
        let text = read_document_text_blocking(&path, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "O\u{2019}Neil <Acme> & \"Sons\"\n");
    }

    #[test]
    fn test_docx_breaks_and_tabs() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_docx(
            dir.path(),
            vec![Paragraph::new().add_run(
                Run::new()
                    .add_text("Skills")
                    .add_break(BreakType::TextWrapping)
                    .add_text("Rust")
                    .add_tab()
                    .add_text("Go"),
            )],
        );
        let text = read_document_text_blocking(&path, DocumentFormat::Docx).unwrap();
        assert_eq!(text, "Skills\nRust\tGo\n");
    }

    #[test]
    fn test_zip_without_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.docx");
        let file = File::create(&path).unwrap();
        zip::ZipWriter::new(file).finish().unwrap();
        let err = read_document_text_blocking(&path, DocumentFormat::Docx).unwrap_err();
        assert!(matches!(err, ExtractionError::Docx(_)));
    }

    #[test]
    fn test_text_is_read_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, b"Jane\xffDoe").unwrap();
        let text = read_document_text_blocking(&path, DocumentFormat::Text).unwrap();
        assert_eq!(text, "Jane\u{FFFD}Doe");
    }

    #[test]
    fn test_doc_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.doc");
        std::fs::write(&path, b"irrelevant").unwrap();
        let err = read_document_text_blocking(&path, DocumentFormat::Doc).unwrap_err();
        assert!(matches!(
            err,
            ExtractionError::UnsupportedFormat(DocumentFormat::Doc)
        ));
    }

    #[tokio::test]
    async fn test_async_reader_runs_on_blocking_pool() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cv.txt");
        std::fs::write(&path, "Jane Doe").unwrap();
        let text = read_document_text(&path, DocumentFormat::Text).await.unwrap();
        assert_eq!(text, "Jane Doe");
    }
}
