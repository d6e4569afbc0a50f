//! Batch extraction: a ZIP of resumes in, one spreadsheet row per resume out.
//!
//! `archive` unpacks, `normalizer` turns one document into a `ResumeRecord`,
//! `exporter` writes the table, and `pipeline` ties them together for the
//! upload handler.

pub mod archive;
pub mod exporter;
pub mod handlers;
pub mod models;
pub mod normalizer;
pub mod pipeline;
pub mod staging;

#[cfg(test)]
pub mod test_support;
