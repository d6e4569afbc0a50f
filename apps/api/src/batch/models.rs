use crate::extract::{FieldMap, FieldValue};

/// Placeholder written for any field the extractor did not report.
pub const NOT_FOUND: &str = "Not found";

/// Column headers of the exported sheet, in column order.
pub const COLUMN_HEADERS: [&str; 6] = [
    "Name",
    "Email",
    "Phone Number",
    "Skills",
    "Companies",
    "College",
];

/// One normalized row of the export. Built once per archive entry and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeRecord {
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub skills: String,
    pub companies: String,
    pub college: String,
}

impl ResumeRecord {
    /// Applies the default-fallback rules to raw extractor output:
    /// - name, email, phone, college: value or "Not found"
    /// - skills: list joined with ", ", scalar as-is, absent → ""
    /// - companies: list joined with ", ", anything else → "Not found"
    pub fn from_fields(fields: &FieldMap) -> Self {
        Self {
            name: text_or_not_found(fields.name.as_ref()),
            email: text_or_not_found(fields.email.as_ref()),
            phone_number: text_or_not_found(fields.mobile_number.as_ref()),
            // A scalar skills value is written whole, never split into
            // its characters.
            skills: fields
                .skills
                .as_ref()
                .map(FieldValue::joined)
                .unwrap_or_default(),
            companies: fields
                .company_names
                .as_ref()
                .and_then(FieldValue::as_list)
                .map(|items| items.join(", "))
                .unwrap_or_else(|| NOT_FOUND.to_string()),
            college: text_or_not_found(fields.college_name.as_ref()),
        }
    }

    /// Cell values in `COLUMN_HEADERS` order.
    pub fn cells(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.email.as_str(),
            self.phone_number.as_str(),
            self.skills.as_str(),
            self.companies.as_str(),
            self.college.as_str(),
        ]
    }
}

fn text_or_not_found(value: Option<&FieldValue>) -> String {
    value
        .map(FieldValue::joined)
        .unwrap_or_else(|| NOT_FOUND.to_string())
}
