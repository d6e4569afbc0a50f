use std::path::Path;

use tracing::debug;

use crate::batch::models::ResumeRecord;
use crate::batch::staging::StagingFile;
use crate::extract::{DocumentFormat, ExtractionError, ResumeExtractor};

/// Stages one resume, runs the extractor over it and maps the result to a
/// [`ResumeRecord`]. The staging file is gone when this returns, on both the
/// success and the error path.
pub async fn normalize_resume(
    entry_name: &str,
    data: &[u8],
    extractor: &dyn ResumeExtractor,
    staging_dir: &Path,
) -> Result<ResumeRecord, ExtractionError> {
    let format = DocumentFormat::detect(entry_name, data);
    let staged = StagingFile::write(staging_dir, format, data)?;

    debug!(
        entry = entry_name,
        %format,
        backend = extractor.backend_name(),
        "Extracting resume fields"
    );

    // On error `staged` drops here and removes the file.
    let fields = extractor.extract(staged.path(), staged.format()).await?;
    staged.remove()?;

    Ok(ResumeRecord::from_fields(&fields))
}
