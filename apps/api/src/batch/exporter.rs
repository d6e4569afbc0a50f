//! Table exporter: header row + one row per record, written as a
//! single-sheet `.xlsx` workbook.

use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook, XlsxError};
use thiserror::Error;

use crate::batch::models::{ResumeRecord, COLUMN_HEADERS};

/// File name of the exported workbook, also used as the download name.
pub const EXPORT_FILE_NAME: &str = "extracted_data.xlsx";
pub const SHEET_NAME: &str = "Resumes";
pub const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const MIN_COLUMN_WIDTH: f64 = 12.0;
const MAX_COLUMN_WIDTH: f64 = 60.0;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("spreadsheet encoding failed: {0}")]
    Xlsx(#[from] XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered records plus the fixed header tuple. Built once per request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultTable {
    records: Vec<ResumeRecord>,
}

impl ResultTable {
    pub fn push(&mut self, record: ResumeRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The header row followed by each record's cells, in declared column order.
    pub fn grid(&self) -> Vec<Vec<String>> {
        std::iter::once(COLUMN_HEADERS.map(str::to_string).to_vec())
            .chain(
                self.records
                    .iter()
                    .map(|r| r.cells().map(str::to_string).to_vec()),
            )
            .collect()
    }

    fn build_workbook(&self) -> Result<Workbook, ExportError> {
        let mut workbook = Workbook::new();
        let header_format = Format::new().set_bold();
        let sheet = workbook.add_worksheet();
        sheet.set_name(SHEET_NAME)?;

        for (row, cells) in (0u32..).zip(self.grid()) {
            for (col, cell) in (0u16..).zip(&cells) {
                if row == 0 {
                    sheet.write_string_with_format(row, col, cell, &header_format)?;
                } else {
                    sheet.write_string(row, col, cell)?;
                }
            }
        }
        for (col, width) in (0u16..).zip(self.column_widths()) {
            sheet.set_column_width(col, width)?;
        }
        sheet.set_freeze_panes(1, 0)?;

        Ok(workbook)
    }

    /// Character width of the widest cell per column, clamped.
    fn column_widths(&self) -> [f64; 6] {
        let mut widths = COLUMN_HEADERS.map(|h| h.chars().count());
        for record in &self.records {
            for (width, cell) in widths.iter_mut().zip(record.cells()) {
                *width = (*width).max(cell.chars().count());
            }
        }
        widths.map(|w| (w as f64 + 2.0).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
    }

    /// Writes the workbook to `dir/extracted_data.xlsx`, replacing any file
    /// already there, and returns its path.
    pub fn write_xlsx(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(EXPORT_FILE_NAME);
        let mut workbook = self.build_workbook()?;
        workbook.save(&path)?;
        Ok(path)
    }

}

impl FromIterator<ResumeRecord> for ResultTable {
    fn from_iter<I: IntoIterator<Item = ResumeRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
