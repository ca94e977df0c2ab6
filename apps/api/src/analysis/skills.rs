//! Skill vocabulary and term matching.
//!
//! Skills come from two places: every short list item of the Skills section
//! (kept verbatim, normalized) and every `SKILL_VOCABULARY` term found
//! anywhere in the document on word boundaries. Terms that read as ordinary
//! English ("rest", "go", "excel", "swift") are left out of the vocabulary so
//! they only count when listed under Skills, or through a longer spelling in
//! `SKILL_ALIASES` ("RESTful", "REST APIs", "Golang").

use std::collections::BTreeSet;

use crate::analysis::models::normalize_term;
use crate::analysis::segmenter::strip_bullet;

const MAX_ITEM_WORDS: usize = 4;
const MAX_ITEM_CHARS: usize = 40;
const MAX_LABEL_WORDS: usize = 3;

pub static SKILL_VOCABULARY: &[&str] = &[
    // languages
    "python", "java", "javascript", "typescript", "c++", "c#", "golang", "rust", "kotlin",
    "ruby", "php", "scala", "sql", "nosql", "html", "css", "bash",
    // web and backend
    "react", "angular", "vue", "node.js", "django", "flask", "fastapi", "spring boot",
    "graphql", "rest api", "rest apis", "restful", "apis", "microservices",
    // data stores
    "databases", "postgresql", "mysql", "mongodb", "redis", "sqlite", "elasticsearch",
    // infrastructure
    "docker", "kubernetes", "terraform", "ansible", "aws", "azure", "gcp", "linux", "git",
    "ci/cd", "jenkins", "github actions",
    // data and ml
    "pandas", "numpy", "scikit-learn", "tensorflow", "pytorch", "keras", "machine learning",
    "deep learning", "ml", "mlops", "nlp", "computer vision", "data analysis",
    "data visualization", "statistics", "tableau", "power bi", "spark", "hadoop", "airflow",
    "kafka",
    // practice
    "agile", "scrum", "jira", "figma", "communication", "leadership", "teamwork",
    "problem solving", "project management",
];

/// Longer spelling → the short skill name it implies. The short name is
/// always a substring of the alias, so derived skills still occur in the text.
pub static SKILL_ALIASES: &[(&str, &str)] = &[
    ("rest api", "rest"),
    ("rest apis", "rest"),
    ("restful", "rest"),
    ("restful api", "rest"),
    ("restful apis", "rest"),
    ("golang", "go"),
];

/// Normalized skill set of a document.
pub fn extract_skills(skills_section: &[&str], document: &str) -> BTreeSet<String> {
    let mut skills: BTreeSet<String> = skills_section
        .iter()
        .flat_map(|line| section_items(line))
        .collect();

    let haystack = document.to_lowercase();
    skills.extend(
        SKILL_VOCABULARY
            .iter()
            .filter(|term| contains_term(&haystack, term))
            .map(|term| term.to_string()),
    );

    let implied: Vec<String> = SKILL_ALIASES
        .iter()
        .filter(|(alias, _)| skills.contains(*alias))
        .map(|(_, short)| short.to_string())
        .collect();
    skills.extend(implied);
    skills
}

/// List items of one Skills line. `Languages: Python, Go` yields `python`, `go`.
fn section_items(line: &str) -> Vec<String> {
    let line = strip_bullet(line).unwrap_or(line);
    let items = match line.split_once(':') {
        Some((label, rest)) if label.split_whitespace().count() <= MAX_LABEL_WORDS => rest,
        _ => line,
    };

    items
        .split(|c: char| matches!(c, ',' | ';' | '|' | '•' | '·' | '\t'))
        .map(normalize_skill)
        .filter(|item| is_skill_item(item))
        .collect()
}

fn is_skill_item(item: &str) -> bool {
    !item.is_empty()
        && item.chars().count() <= MAX_ITEM_CHARS
        && item.split_whitespace().count() <= MAX_ITEM_WORDS
        && item.chars().any(char::is_alphabetic)
}

/// Lowercase form with surrounding punctuation removed. `+` and `#` survive so
/// `C++` and `C#` stay distinct from `C`.
pub fn normalize_skill(raw: &str) -> String {
    let trimmed = raw.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | ',' | ';' | ':' | '(' | ')' | '[' | ']' | '"' | '\'' | '*' | '-' | '•')
    });
    normalize_term(trimmed)
}

/// Case-sensitive occurrence of `term` in `haystack` with no word character
/// directly before or after it. Callers lowercase both sides.
pub fn contains_term(haystack: &str, term: &str) -> bool {
    if term.is_empty() {
        return false;
    }
    haystack.match_indices(term).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + term.len()..].chars().next();
        !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
    })
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '+' | '#' | '_')
}
