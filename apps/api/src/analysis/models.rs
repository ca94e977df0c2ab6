use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Target job used as the scoring baseline. Supplied by the role catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub description: String,
    pub required_skills: Vec<String>,
}

impl RoleProfile {
    pub fn new(description: impl Into<String>, required_skills: &[&str]) -> Self {
        Self {
            description: description.into(),
            required_skills: required_skills.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Required skills normalized for comparison, deduplicated in role order.
    pub fn normalized_skills(&self) -> Vec<String> {
        let mut seen = BTreeSet::new();
        self.required_skills
            .iter()
            .map(|s| normalize_term(s))
            .filter(|s| !s.is_empty() && seen.insert(s.clone()))
            .collect()
    }
}

/// Lowercases, trims and collapses inner whitespace.
pub fn normalize_term(term: &str) -> String {
    term.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Normalized plain text of an uploaded file. Never mutated after extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    pub text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Projects,
    Other,
}

impl SectionKind {
    /// Sections counted by the section-coverage score.
    pub const CANONICAL: [SectionKind; 5] = [
        SectionKind::Contact,
        SectionKind::Summary,
        SectionKind::Skills,
        SectionKind::Experience,
        SectionKind::Education,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKind::Contact => "contact",
            SectionKind::Summary => "summary",
            SectionKind::Skills => "skills",
            SectionKind::Experience => "experience",
            SectionKind::Education => "education",
            SectionKind::Projects => "projects",
            SectionKind::Other => "other",
        }
    }
}

/// A run of lines opened by a heading (or the implicit header region when
/// `heading` is `None`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionBlock {
    pub kind: SectionKind,
    pub heading: Option<String>,
    pub lines: Vec<String>,
}

impl SectionBlock {
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|l| !l.trim().is_empty())
    }
}

/// Segmented resume. Blocks are kept in document order; `lines(kind)` gives
/// the per-section view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResumeSections {
    blocks: Vec<SectionBlock>,
}

impl ResumeSections {
    pub fn new(blocks: Vec<SectionBlock>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[SectionBlock] {
        &self.blocks
    }

    /// All lines of `kind`, in document order. Separate blocks of the same
    /// kind are joined with a blank line so entries never run together.
    pub fn lines(&self, kind: SectionKind) -> Vec<&str> {
        let mut out = Vec::new();
        for block in self.blocks.iter().filter(|b| b.kind == kind) {
            if !out.is_empty() {
                out.push("");
            }
            out.extend(block.lines.iter().map(String::as_str));
        }
        out
    }

    pub fn has_content(&self, kind: SectionKind) -> bool {
        self.blocks.iter().any(|b| b.kind == kind && b.has_content())
    }

    /// Number of recognized heading lines.
    pub fn heading_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.heading.is_some()).count()
    }

    /// Every content line in document order, headings excluded.
    pub fn all_lines(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter().map(String::as_str))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Extracted fields
// ────────────────────────────────────────────────────────────────────────────

/// One education / experience / project entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub title: String,
    pub details: Vec<String>,
    pub bullets: Vec<String>,
    pub dates: Option<String>,
}

impl Entry {
    pub fn push_line(&mut self, line: &str) {
        if self.title.is_empty() {
            self.title = line.to_string();
        } else {
            self.details.push(line.to_string());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub portfolio: Option<String>,
    pub summary: Option<String>,
    pub skills: BTreeSet<String>,
    pub education: Vec<Entry>,
    pub experience: Vec<Entry>,
    pub projects: Vec<Entry>,
}

// ────────────────────────────────────────────────────────────────────────────
// Scores and suggestions
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatch {
    pub score: u32,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionCategory {
    Contact,
    Summary,
    Skills,
    Experience,
    Education,
    Format,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorizedSuggestions {
    pub contact_suggestions: Vec<String>,
    pub summary_suggestions: Vec<String>,
    pub skills_suggestions: Vec<String>,
    pub experience_suggestions: Vec<String>,
    pub education_suggestions: Vec<String>,
    pub format_suggestions: Vec<String>,
}

impl CategorizedSuggestions {
    pub fn push(&mut self, category: SuggestionCategory, message: String) {
        self.list_mut(category).push(message);
    }

    fn list_mut(&mut self, category: SuggestionCategory) -> &mut Vec<String> {
        match category {
            SuggestionCategory::Contact => &mut self.contact_suggestions,
            SuggestionCategory::Summary => &mut self.summary_suggestions,
            SuggestionCategory::Skills => &mut self.skills_suggestions,
            SuggestionCategory::Experience => &mut self.experience_suggestions,
            SuggestionCategory::Education => &mut self.education_suggestions,
            SuggestionCategory::Format => &mut self.format_suggestions,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Document type
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotResumeKind {
    CoverLetter,
    JobDescription,
    Unknown,
}

/// Serialized as a bare string: `"resume"`, `"cover_letter"`,
/// `"job_description"` or `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Resume,
    NotResume(NotResumeKind),
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Resume => "resume",
            DocumentType::NotResume(NotResumeKind::CoverLetter) => "cover_letter",
            DocumentType::NotResume(NotResumeKind::JobDescription) => "job_description",
            DocumentType::NotResume(NotResumeKind::Unknown) => "unknown",
        }
    }

    pub fn is_resume(&self) -> bool {
        matches!(self, DocumentType::Resume)
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resume" => Ok(DocumentType::Resume),
            "cover_letter" => Ok(DocumentType::NotResume(NotResumeKind::CoverLetter)),
            "job_description" => Ok(DocumentType::NotResume(NotResumeKind::JobDescription)),
            "unknown" => Ok(DocumentType::NotResume(NotResumeKind::Unknown)),
            other => Err(format!("unknown document type '{other}'")),
        }
    }
}

impl Serialize for DocumentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for DocumentType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Result
// ────────────────────────────────────────────────────────────────────────────

/// The only externally visible record. Flattens into one JSON object whose
/// field names are part of the persisted/downloadable format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub document_type: DocumentType,
    pub ats_score: u32,
    pub keyword_match: KeywordMatch,
    pub format_score: u32,
    pub section_score: u32,
    pub suggestions: Vec<String>,
    #[serde(flatten)]
    pub categorized: CategorizedSuggestions,
    #[serde(flatten)]
    pub fields: ExtractedFields,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalized_skills_dedup_in_role_order() {
        let role = RoleProfile::new("x", &["Python", " sql ", "python", "Machine  Learning", ""]);
        assert_eq!(
            role.normalized_skills(),
            vec!["python", "sql", "machine learning"]
        );
    }

    #[test]
    fn test_document_type_serializes_as_string() {
        let json = serde_json::to_string(&DocumentType::NotResume(NotResumeKind::CoverLetter))
            .unwrap();
        assert_eq!(json, r#""cover_letter""#);
        let parsed: DocumentType = serde_json::from_str(r#""resume""#).unwrap();
        assert_eq!(parsed, DocumentType::Resume);
    }

    #[test]
    fn test_document_type_rejects_unknown_label() {
        assert!(serde_json::from_str::<DocumentType>(r#""memo""#).is_err());
    }

    #[test]
    fn test_sections_lines_join_blocks_with_blank() {
        let sections = ResumeSections::new(vec![
            SectionBlock {
                kind: SectionKind::Experience,
                heading: Some("Experience".into()),
                lines: vec!["Acme".into()],
            },
            SectionBlock {
                kind: SectionKind::Skills,
                heading: Some("Skills".into()),
                lines: vec!["Rust".into()],
            },
            SectionBlock {
                kind: SectionKind::Experience,
                heading: Some("Work History".into()),
                lines: vec!["Globex".into()],
            },
        ]);
        assert_eq!(sections.lines(SectionKind::Experience), vec!["Acme", "", "Globex"]);
        assert_eq!(sections.heading_count(), 3);
        assert!(!sections.has_content(SectionKind::Education));
    }

    #[test]
    fn test_entry_push_line_fills_title_first() {
        let mut entry = Entry::default();
        entry.push_line("Software Engineer");
        entry.push_line("Acme Corp");
        assert_eq!(entry.title, "Software Engineer");
        assert_eq!(entry.details, vec!["Acme Corp"]);
    }
}
