//! Analysis orchestrator — size guard, segmentation, field extraction,
//! document-type gate, scoring and suggestions assembled into one
//! `AnalysisResult`.
//!
//! `ResumeAnalyzer` is a plain value (limits + weights) so `AppState` can hold
//! it by copy and blocking tasks can move it freely.

use tracing::{debug, info};

use crate::analysis::error::AnalysisError;
use crate::analysis::extractor::{extract, normalize_text};
use crate::analysis::fields::extract_fields;
use crate::analysis::models::{
    AnalysisResult, DocumentType, ExtractedFields, KeywordMatch, NotResumeKind, ResumeSections,
    RoleProfile, SectionKind,
};
use crate::analysis::scoring::{score, AtsWeights};
use crate::analysis::segmenter::segment;
use crate::analysis::skills::contains_term;
use crate::analysis::suggestions::generate;

pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_TEXT_BYTES: usize = 256 * 1024;

/// Minimum section score for a document to pass as a resume.
pub const RESUME_MIN_SECTION_SCORE: u32 = 40;

const COVER_LETTER_CUES: &[&str] = &[
    "dear ",
    "to whom it may concern",
    "sincerely",
    "yours faithfully",
    "yours truly",
    "hiring manager",
    "i am writing",
];

const JOB_POSTING_CUES: &[&str] = &[
    "responsibilities",
    "requirements",
    "we are looking for",
    "what you'll do",
    "about the role",
    "qualifications",
    "you will",
];

const MIN_JOB_POSTING_CUES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisLimits {
    pub max_document_bytes: usize,
    pub max_text_bytes: usize,
}

impl Default for AnalysisLimits {
    fn default() -> Self {
        Self {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_text_bytes: DEFAULT_MAX_TEXT_BYTES,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResumeAnalyzer {
    limits: AnalysisLimits,
    weights: AtsWeights,
}

impl ResumeAnalyzer {
    pub fn new(limits: AnalysisLimits) -> Self {
        Self {
            limits,
            weights: AtsWeights::default(),
        }
    }

    pub fn limits(&self) -> AnalysisLimits {
        self.limits
    }

    /// Extracts text from an uploaded file and analyzes it.
    pub fn analyze_document(
        &self,
        bytes: &[u8],
        mime: Option<&str>,
        file_name: Option<&str>,
        role: &RoleProfile,
    ) -> Result<AnalysisResult, AnalysisError> {
        guard_size(bytes.len(), self.limits.max_document_bytes)?;
        let document = extract(bytes, mime, file_name, self.limits.max_text_bytes)?;
        self.analyze(&document.text, role)
    }

    /// Analyzes already-extracted text. Only the size guard can fail.
    pub fn analyze(&self, raw_text: &str, role: &RoleProfile) -> Result<AnalysisResult, AnalysisError> {
        guard_size(raw_text.len(), self.limits.max_text_bytes)?;

        let text = normalize_text(raw_text);
        let sections = segment(&text);
        let fields = extract_fields(&sections);
        let scores = score(&fields, &sections, role, &self.weights);
        let document_type = classify(&text, &fields, &sections, scores.section_score);
        let suggestions = generate(&fields, &sections, &scores, role);

        let found: Vec<&str> = sections.blocks().iter().map(|b| b.kind.as_str()).collect();
        debug!(
            bytes = text.len(),
            sections = ?found,
            skills = fields.skills.len(),
            "Segmented and extracted document"
        );

        let result = if document_type.is_resume() {
            AnalysisResult {
                document_type,
                ats_score: scores.ats_score,
                keyword_match: scores.keyword_match,
                format_score: scores.format_score,
                section_score: scores.section_score,
                suggestions: suggestions.top_level,
                categorized: suggestions.categorized,
                fields,
            }
        } else {
            AnalysisResult {
                document_type,
                ats_score: 0,
                keyword_match: KeywordMatch {
                    score: 0,
                    matched_skills: Vec::new(),
                    missing_skills: role.normalized_skills(),
                },
                format_score: 0,
                section_score: 0,
                suggestions: Vec::new(),
                categorized: suggestions.categorized,
                fields,
            }
        };

        info!(
            document_type = %result.document_type,
            ats_score = result.ats_score,
            keyword_score = result.keyword_match.score,
            format_score = result.format_score,
            section_score = result.section_score,
            "Analysis complete"
        );
        Ok(result)
    }
}

fn guard_size(size: usize, limit: usize) -> Result<(), AnalysisError> {
    if size > limit {
        return Err(AnalysisError::InputTooLarge { size, limit });
    }
    Ok(())
}

/// Heuristic gate: enough recognizable sections plus a way to reach the
/// candidate or a list of skills.
pub fn classify(
    text: &str,
    fields: &ExtractedFields,
    sections: &ResumeSections,
    section_score: u32,
) -> DocumentType {
    let reachable_or_skilled = fields.email.is_some()
        || fields.phone.is_some()
        || sections.has_content(SectionKind::Skills);
    if section_score >= RESUME_MIN_SECTION_SCORE && reachable_or_skilled {
        return DocumentType::Resume;
    }

    let lower = text.to_lowercase();
    let kind = if COVER_LETTER_CUES.iter().any(|cue| lower.contains(cue)) {
        NotResumeKind::CoverLetter
    } else if JOB_POSTING_CUES
        .iter()
        .filter(|cue| contains_term(&lower, cue))
        .count()
        >= MIN_JOB_POSTING_CUES
    {
        NotResumeKind::JobDescription
    } else {
        NotResumeKind::Unknown
    };
    DocumentType::NotResume(kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::roles::RoleCatalog;

    const RESUME: &str = "\
Jane Doe
jane.doe@example.com | +1 555 123 4567

Summary
Backend engineer focused on reliable Python services.

Skills: Python, SQL, Docker

Experience
Software Engineer, Acme Corp (2019 - 2023)
- Reduced checkout latency by 30%
- Helped with various migrations

Education
BSc Computer Science, 2019
";

    fn backend() -> RoleProfile {
        RoleProfile::new("Backend Engineer", &["python", "sql"])
    }

    fn analyze(text: &str, role: &RoleProfile) -> AnalysisResult {
        ResumeAnalyzer::default().analyze(text, role).unwrap()
    }

    #[test]
    fn test_listed_skills_match_role() {
        let result = analyze(RESUME, &backend());
        assert_eq!(result.document_type, DocumentType::Resume);
        assert_eq!(result.keyword_match.matched_skills, vec!["python", "sql"]);
        assert!(result.keyword_match.missing_skills.is_empty());
        assert_eq!(result.keyword_match.score, 100);
        assert_eq!(result.section_score, 100);
    }

    #[test]
    fn test_labelled_skill_lists_are_kept() {
        let text = RESUME.replace(
            "Skills: Python, SQL, Docker",
            "Skills\nLanguages: Python, Go\nFrameworks: Django",
        );
        let role = RoleProfile::new("x", &["python", "go", "django"]);
        let result = analyze(&text, &role);
        assert_eq!(result.keyword_match.matched_skills, vec!["python", "go", "django"]);
        assert_eq!(result.section_score, 100);
        assert!(!result
            .suggestions
            .iter()
            .any(|s| s.contains("dedicated Skills section")));
    }

    #[test]
    fn test_backend_catalogue_role_matches_rest_wording() {
        let (_, backend) = RoleCatalog::builtin()
            .role("Software Engineering", "Backend Engineer")
            .unwrap();
        let text = RESUME
            .replace(
                "Skills: Python, SQL, Docker",
                "Skills: Python, SQL, Docker, REST APIs, Databases",
            )
            .replace("- Helped with various migrations", "- Designed RESTful APIs for billing");
        let km = analyze(&text, &backend.profile).keyword_match;
        assert!(km.missing_skills.is_empty(), "missing {:?}", km.missing_skills);
        assert_eq!(km.score, 100);
    }

    #[test]
    fn test_no_contact_no_skills() {
        let text = "Experience\nWorked at a bakery for three years\n\nEducation\nHigh school diploma";
        let result = analyze(text, &backend());
        assert_eq!(result.keyword_match.score, 0);
        assert_eq!(result.keyword_match.missing_skills, vec!["python", "sql"]);
        assert!(result.keyword_match.matched_skills.is_empty());
        assert!(result
            .categorized
            .contact_suggestions
            .iter()
            .any(|m| m.contains("contact information")));
    }

    #[test]
    fn test_hello_is_not_a_resume() {
        let result = analyze("hello", &backend());
        assert_eq!(
            result.document_type,
            DocumentType::NotResume(NotResumeKind::Unknown)
        );
        assert_eq!(result.ats_score, 0);
        assert_eq!(result.format_score, 0);
        assert_eq!(result.section_score, 0);
        assert_eq!(result.keyword_match.score, 0);
        assert!(result.suggestions.is_empty());
    }

    #[test]
    fn test_empty_text_is_total() {
        let result = analyze("", &backend());
        assert!(!result.document_type.is_resume());
        assert_eq!(result.fields, ExtractedFields::default());
    }

    #[test]
    fn test_cover_letter_detected() {
        let text = "Dear Hiring Manager,\n\nI am writing to apply for the backend role.\n\nSincerely,\nJane Doe";
        assert_eq!(
            analyze(text, &backend()).document_type,
            DocumentType::NotResume(NotResumeKind::CoverLetter)
        );
    }

    #[test]
    fn test_job_description_detected() {
        let text = "\
About the role
We are looking for a backend engineer to join our payments team.
Responsibilities
- Build and operate APIs
Requirements
- 3+ years of Python";
        assert_eq!(
            analyze(text, &backend()).document_type,
            DocumentType::NotResume(NotResumeKind::JobDescription)
        );
    }

    #[test]
    fn test_scores_stay_in_range() {
        let noisy = format!("{}\n|||\t\t\n{}", "Skills ".repeat(40), "• ".repeat(300));
        for text in ["", "hello", RESUME, noisy.as_str()] {
            let r = analyze(text, &backend());
            for s in [r.ats_score, r.format_score, r.section_score, r.keyword_match.score] {
                assert!(s <= 100, "{s} out of range for {text:?}");
            }
        }
    }

    #[test]
    fn test_matched_and_missing_partition_required() {
        let role = RoleProfile::new("x", &["Python", "Kafka", "SQL", "Terraform"]);
        let km = analyze(RESUME, &role).keyword_match;
        assert_eq!(km.matched_skills, vec!["python", "sql"]);
        assert_eq!(km.missing_skills, vec!["kafka", "terraform"]);
    }

    #[test]
    fn test_adding_required_skill_never_lowers_keyword_score() {
        let role = RoleProfile::new("x", &["python", "sql", "kafka"]);
        let before = analyze(RESUME, &role).keyword_match.score;
        let extended = RESUME.replace("Skills: Python, SQL, Docker", "Skills: Python, SQL, Docker, kafka");
        let after = analyze(&extended, &role).keyword_match.score;
        assert!(after >= before);
        assert_eq!(after, 100);
    }

    #[test]
    fn test_identical_input_gives_identical_json() {
        let a = serde_json::to_string(&analyze(RESUME, &backend())).unwrap();
        let b = serde_json::to_string(&analyze(RESUME, &backend())).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_json_round_trip() {
        let result = analyze(RESUME, &backend());
        let json = serde_json::to_string(&result).unwrap();
        let parsed: AnalysisResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }

    #[test]
    fn test_json_is_flat() {
        let value = serde_json::to_value(analyze(RESUME, &backend())).unwrap();
        assert_eq!(value["document_type"], "resume");
        assert_eq!(value["email"], "jane.doe@example.com");
        assert!(value["contact_suggestions"].is_array());
        assert!(value["keyword_match"]["matched_skills"].is_array());
    }

    #[test]
    fn test_text_limit() {
        let analyzer = ResumeAnalyzer::new(AnalysisLimits {
            max_document_bytes: 1024,
            max_text_bytes: 16,
        });
        let err = analyzer.analyze(RESUME, &backend()).unwrap_err();
        assert!(matches!(err, AnalysisError::InputTooLarge { limit: 16, .. }));
    }

    #[test]
    fn test_document_limit_checked_before_extraction() {
        let analyzer = ResumeAnalyzer::new(AnalysisLimits {
            max_document_bytes: 8,
            max_text_bytes: 1024,
        });
        let err = analyzer
            .analyze_document(b"%PDF-1.4 not really", Some("application/pdf"), None, &backend())
            .unwrap_err();
        assert_eq!(err, AnalysisError::InputTooLarge { size: 19, limit: 8 });
    }

    #[test]
    fn test_plain_text_upload() {
        let result = ResumeAnalyzer::default()
            .analyze_document(RESUME.as_bytes(), Some("text/plain"), Some("cv.txt"), &backend())
            .unwrap();
        assert_eq!(result, analyze(RESUME, &backend()));
    }

    #[test]
    fn test_unsupported_upload() {
        let err = ResumeAnalyzer::default()
            .analyze_document(b"GIF89a", Some("image/gif"), Some("me.gif"), &backend())
            .unwrap_err();
        assert_eq!(err, AnalysisError::UnsupportedFormat("image/gif".to_string()));
    }
}
