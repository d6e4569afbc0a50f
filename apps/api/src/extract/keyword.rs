//! Keyword/regex resume extractor: local, deterministic, no network.
//!
//! Algorithm, over the document's plain text:
//! 1. email: first RFC-ish address
//! 2. mobile_number: first run of 10–15 digits with common separators
//! 3. name: first of the leading lines made of 2–4 capitalised words
//! 4. skills: vocabulary matches of up to three tokens, first-seen order, deduplicated
//! 5. college_name: first line naming a university, college or institute
//! 6. company_names: line fragments carrying a corporate suffix
//!
//! A field the heuristics cannot find is left absent.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use async_trait::async_trait;
use regex::Regex;

use crate::extract::text::read_document_text;
use crate::extract::{DocumentFormat, ExtractionError, FieldMap, FieldValue, ResumeExtractor};

/// Lines scanned from the top of the document when looking for a name.
const NAME_SCAN_LINES: usize = 8;
const MAX_COLLEGE_LEN: usize = 120;
const MAX_COMPANY_LEN: usize = 80;
const MAX_SKILL_TOKENS: usize = 3;

const DEFAULT_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "Rust", "Go", "C", "C++", "C#", "Ruby",
    "PHP", "Kotlin", "Swift", "Scala", "R", "MATLAB", "SQL", "NoSQL", "MySQL", "PostgreSQL",
    "MongoDB", "Redis", "HTML", "CSS", "React", "Angular", "Vue", "Node.js", "Django",
    "Flask", "Spring", "Docker", "Kubernetes", "AWS", "Azure", "GCP", "Linux", "Git",
    "Excel", "Tableau", "Power BI", "Pandas", "NumPy", "TensorFlow", "PyTorch",
    "Machine Learning", "Deep Learning", "Data Analysis", "Data Science",
    "Natural Language Processing", "Computer Vision", "Project Management", "Agile",
    "Scrum", "Communication", "Leadership", "Marketing", "Sales", "Accounting",
];

const COMPANY_SUFFIXES: &str =
    r"(?i)\b(inc|llc|llp|ltd|limited|corp|corporation|co|company|technologies|solutions|pvt|gmbh|labs|systems|consulting|services)\b\.?";

const NAME_STOPWORDS: &[&str] = &["resume", "curriculum", "vitae", "cv", "profile", "contact"];

pub struct KeywordResumeExtractor {
    email: Regex,
    phone: Regex,
    college: Regex,
    company: Regex,
    /// Lowercase token key → display form.
    skills: HashMap<String, String>,
}

impl Default for KeywordResumeExtractor {
    fn default() -> Self {
        Self::with_skills(DEFAULT_SKILLS.iter().copied())
    }
}

impl KeywordResumeExtractor {
    /// Builds an extractor matching the given skill vocabulary. Skills longer
    /// than three words are ignored.
    pub fn with_skills<'a>(skills: impl IntoIterator<Item = &'a str>) -> Self {
        let skills = skills
            .into_iter()
            .filter_map(|s| {
                let tokens = tokenize(s);
                (!tokens.is_empty() && tokens.len() <= MAX_SKILL_TOKENS)
                    .then(|| (tokens.join(" "), s.to_string()))
            })
            .collect();

        Self {
            email: Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}")
                .expect("static regex is valid"),
            phone: Regex::new(r"(?:\+?\d{1,3}[\s.\-]?)?\(?\d{2,5}\)?(?:[\s.\-]?\d{2,5}){1,3}")
                .expect("static regex is valid"),
            college: Regex::new(r"(?i)\b(university|college|institute|polytechnic|school of)\b")
                .expect("static regex is valid"),
            company: Regex::new(COMPANY_SUFFIXES).expect("static regex is valid"),
            skills,
        }
    }

    /// Runs every heuristic over `text`.
    pub fn extract_fields(&self, text: &str) -> FieldMap {
        let lines: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();

        let skills = self.find_skills(text);
        let companies = self.find_companies(&lines);

        FieldMap {
            name: find_name(&lines).map(FieldValue::Text),
            email: self
                .email
                .find(text)
                .map(|m| FieldValue::from(m.as_str())),
            mobile_number: self.find_phone(text).map(FieldValue::Text),
            skills: (!skills.is_empty()).then_some(FieldValue::List(skills)),
            company_names: (!companies.is_empty()).then_some(FieldValue::List(companies)),
            college_name: lines
                .iter()
                .find(|l| l.len() <= MAX_COLLEGE_LEN && self.college.is_match(l))
                .map(|l| FieldValue::from(*l)),
        }
    }

    fn find_phone(&self, text: &str) -> Option<String> {
        self.phone.find_iter(text).map(|m| m.as_str().trim()).find_map(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            (10..=15).contains(&digits).then(|| candidate.to_string())
        })
    }

    fn find_skills(&self, text: &str) -> Vec<String> {
        let tokens = tokenize(text);
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for start in 0..tokens.len() {
            // Longest phrase first so "machine learning" wins over "machine".
            for len in (1..=MAX_SKILL_TOKENS).rev() {
                let Some(window) = tokens.get(start..start + len) else {
                    continue;
                };
                let key = window.join(" ");
                if let Some(display) = self.skills.get(&key) {
                    if seen.insert(key) {
                        found.push(display.clone());
                    }
                }
            }
        }
        found
    }

    fn find_companies(&self, lines: &[&str]) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut found = Vec::new();

        for line in lines {
            for fragment in line.split(['|', ',', '•', '\t']).flat_map(|f| f.split(" - ")) {
                let fragment = fragment.trim();
                if fragment.is_empty()
                    || fragment.len() > MAX_COMPANY_LEN
                    || !self.company.is_match(fragment)
                    || self.email.is_match(fragment)
                {
                    continue;
                }
                // A suffix alone ("Inc.") is not a company.
                if fragment.split_whitespace().count() < 2 {
                    continue;
                }
                if seen.insert(fragment.to_lowercase()) {
                    found.push(fragment.to_string());
                }
            }
        }
        found
    }
}

#[async_trait]
impl ResumeExtractor for KeywordResumeExtractor {
    async fn extract(
        &self,
        path: &Path,
        format: DocumentFormat,
    ) -> Result<FieldMap, ExtractionError> {
        let text = read_document_text(path, format).await?;
        Ok(self.extract_fields(&text))
    }

    fn backend_name(&self) -> &'static str {
        "keyword"
    }
}

/// Lowercase tokens; `+`, `#` and inner dots stay so "c++", "c#" and
/// "node.js" survive.
fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !(c.is_alphanumeric() || matches!(c, '+' | '#' | '.')))
        .map(|t| t.trim_matches('.'))
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn find_name(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(NAME_SCAN_LINES)
        .find(|line| is_name_line(line))
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn is_name_line(line: &str) -> bool {
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return false;
    }
    words.iter().all(|w| {
        let lower = w.to_lowercase();
        w.chars().next().is_some_and(char::is_uppercase)
            && w.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\''))
            && !NAME_STOPWORDS.contains(&lower.as_str())
    })
}
