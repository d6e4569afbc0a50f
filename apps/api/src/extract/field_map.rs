//! The fixed set of fields an extractor may report for one resume.

use serde::{Deserialize, Serialize};

/// A single extracted value: either one string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Scalars are returned as-is, lists are joined with `", "`.
    pub fn joined(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items.join(", "),
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// Extractor output. Every key is optional; `null` and missing keys both
/// deserialize to `None`, unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    #[serde(default)]
    pub name: Option<FieldValue>,
    #[serde(default)]
    pub email: Option<FieldValue>,
    #[serde(default)]
    pub mobile_number: Option<FieldValue>,
    #[serde(default)]
    pub skills: Option<FieldValue>,
    #[serde(default)]
    pub company_names: Option<FieldValue>,
    #[serde(default)]
    pub college_name: Option<FieldValue>,
}
