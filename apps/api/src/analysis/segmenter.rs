//! Section segmentation — splits normalized text into resume sections.
//!
//! A line is a heading when, after stripping decoration (`#`, `*`, `_`, `=`,
//! `-`, bullets, a trailing `:`), it has at most `MAX_HEADING_WORDS` words and
//! exactly matches the vocabulary in `SECTION_HEADINGS` (case-insensitive).
//! `Skills: Python, SQL` opens Skills and keeps `Python, SQL` as its first line.
//! Inside Skills, labelled lists such as `Languages: Python, Go` stay put; only
//! a bare heading or a label naming another canonical section leaves Skills.
//! Lines before the first heading form the header region, filed under Contact.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::analysis::models::{ResumeSections, SectionBlock, SectionKind};

const MAX_HEADING_WORDS: usize = 5;

const HEADING_DECORATION: &[char] = &['#', '*', '_', '=', '-', '~', '|', '•', ':'];

/// Bullet glyphs recognized at the start of a line.
pub const BULLET_GLYPHS: &[char] = &[
    '•', '-', '*', '–', '▪', '◦', '●', '■', '➢', '►', '○', '✓', '>',
];

pub static SECTION_HEADINGS: &[(SectionKind, &[&str])] = &[
    (
        SectionKind::Contact,
        &[
            "contact",
            "contact information",
            "contact info",
            "contact details",
            "personal information",
            "personal details",
        ],
    ),
    (
        SectionKind::Summary,
        &[
            "summary",
            "professional summary",
            "career summary",
            "profile",
            "professional profile",
            "objective",
            "career objective",
            "about me",
            "about",
        ],
    ),
    (
        SectionKind::Skills,
        &[
            "skills",
            "technical skills",
            "key skills",
            "core skills",
            "core competencies",
            "competencies",
            "technologies",
            "tech stack",
            "skills and abilities",
            "skills & abilities",
            "tools",
        ],
    ),
    (
        SectionKind::Experience,
        &[
            "experience",
            "work experience",
            "professional experience",
            "relevant experience",
            "work history",
            "employment",
            "employment history",
            "career history",
            "internships",
            "internship",
        ],
    ),
    (
        SectionKind::Education,
        &[
            "education",
            "academic background",
            "academics",
            "academic qualifications",
            "qualifications",
            "education and training",
            "education & training",
        ],
    ),
    (
        SectionKind::Projects,
        &[
            "projects",
            "personal projects",
            "academic projects",
            "key projects",
            "side projects",
            "selected projects",
        ],
    ),
    (
        SectionKind::Other,
        &[
            "certifications",
            "certificates",
            "awards",
            "achievements",
            "honors",
            "publications",
            "languages",
            "interests",
            "hobbies",
            "volunteering",
            "volunteer experience",
            "references",
            "activities",
            "extracurricular activities",
        ],
    ),
];

static HEADING_LOOKUP: Lazy<HashMap<&'static str, SectionKind>> = Lazy::new(|| {
    SECTION_HEADINGS
        .iter()
        .flat_map(|(kind, terms)| terms.iter().map(move |t| (*t, *kind)))
        .collect()
});

#[derive(Debug, PartialEq, Eq)]
struct HeadingMatch<'a> {
    kind: SectionKind,
    inline: Option<&'a str>,
}

pub fn segment(text: &str) -> ResumeSections {
    let mut blocks = Vec::new();
    let mut current = SectionBlock {
        kind: SectionKind::Contact,
        heading: None,
        lines: Vec::new(),
    };

    for line in text.lines() {
        let heading = match detect_heading(line) {
            Some(h) if !is_skills_sublabel(current.kind, &h) => h,
            _ => {
                current.lines.push(line.to_string());
                continue;
            }
        };
        let opened = SectionBlock {
            kind: heading.kind,
            heading: Some(line.trim().to_string()),
            lines: heading.inline.map(|s| vec![s.to_string()]).unwrap_or_default(),
        };
        blocks.push(std::mem::replace(&mut current, opened));
    }
    blocks.push(current);

    // The implicit header region only counts when it holds something.
    blocks.retain(|b| b.heading.is_some() || b.has_content());
    ResumeSections::new(blocks)
}

fn detect_heading(line: &str) -> Option<HeadingMatch<'_>> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Some(kind) = heading_kind(trimmed) {
        return Some(HeadingMatch { kind, inline: None });
    }

    let (label, rest) = trimmed.split_once(':')?;
    let rest = rest.trim_matches(|c: char| c.is_whitespace() || c == '*' || c == '_');
    if rest.is_empty() {
        return None;
    }
    heading_kind(label).map(|kind| HeadingMatch {
        kind,
        inline: Some(rest),
    })
}

fn is_skills_sublabel(current: SectionKind, heading: &HeadingMatch<'_>) -> bool {
    current == SectionKind::Skills
        && heading.inline.is_some()
        && matches!(heading.kind, SectionKind::Skills | SectionKind::Other)
}

/// Section named by a candidate heading, if any.
pub fn heading_kind(candidate: &str) -> Option<SectionKind> {
    let key = normalize_heading(candidate);
    if key.is_empty() || key.split_whitespace().count() > MAX_HEADING_WORDS {
        return None;
    }
    HEADING_LOOKUP.get(key.as_str()).copied()
}

fn normalize_heading(candidate: &str) -> String {
    candidate
        .trim_matches(|c: char| c.is_whitespace() || HEADING_DECORATION.contains(&c))
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Marker of a bullet line: the glyph, or `'#'` for numbered items (`1.`, `2)`).
pub fn bullet_marker(line: &str) -> Option<char> {
    let trimmed = line.trim_start();
    let mut chars = trimmed.chars();
    let first = chars.next()?;

    if BULLET_GLYPHS.contains(&first) {
        return match chars.next() {
            Some(c) if c.is_whitespace() => Some(first),
            _ => None,
        };
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if (1..=2).contains(&digits) {
        let mut rest = trimmed[digits..].chars();
        if matches!(rest.next(), Some('.') | Some(')'))
            && rest.next().is_some_and(char::is_whitespace)
        {
            return Some('#');
        }
    }
    None
}

/// The text of a bullet line without its marker.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let marker = bullet_marker(line)?;
    let trimmed = line.trim_start();
    let rest = if marker == '#' {
        trimmed.trim_start_matches(|c: char| c.is_ascii_digit())[1..].trim()
    } else {
        trimmed[marker.len_utf8()..].trim()
    };
    Some(rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Jane Doe\njane@example.com\n\n## SUMMARY\nBackend engineer.\n\n**Work Experience**\nAcme Corp\n- Built APIs\n\nEducation:\nBSc Computer Science\n\nSkills: Python, SQL\nDocker";

    #[test]
    fn test_header_region_is_contact() {
        let sections = segment(RESUME);
        assert_eq!(
            sections.lines(SectionKind::Contact),
            vec!["Jane Doe", "jane@example.com", ""]
        );
        assert!(sections.blocks()[0].heading.is_none());
    }

    #[test]
    fn test_decorated_headings_open_sections() {
        let sections = segment(RESUME);
        let kinds: Vec<SectionKind> = sections.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SectionKind::Contact,
                SectionKind::Summary,
                SectionKind::Experience,
                SectionKind::Education,
                SectionKind::Skills,
            ]
        );
        assert_eq!(sections.heading_count(), 4);
    }

    #[test]
    fn test_inline_heading_keeps_content() {
        let sections = segment(RESUME);
        assert_eq!(
            sections.lines(SectionKind::Skills),
            vec!["Python, SQL", "Docker"]
        );
    }

    #[test]
    fn test_each_line_belongs_to_one_section() {
        let sections = segment(RESUME);
        let content: usize = sections.blocks().iter().map(|b| b.lines.len()).sum();
        let headings_without_inline = 3;
        assert_eq!(content + headings_without_inline, RESUME.lines().count());
    }

    #[test]
    fn test_labelled_lists_stay_in_skills() {
        let text = "Skills\nLanguages: Python, Go\nTools: Git, Jira\nFrameworks: Django\n\nEducation: BSc Physics\nLanguages\nEnglish, German";
        let sections = segment(text);
        let kinds: Vec<SectionKind> = sections.blocks().iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            vec![SectionKind::Skills, SectionKind::Education, SectionKind::Other]
        );
        assert_eq!(
            sections.lines(SectionKind::Skills),
            vec!["Languages: Python, Go", "Tools: Git, Jira", "Frameworks: Django", ""]
        );
        assert_eq!(sections.lines(SectionKind::Education), vec!["BSc Physics"]);
    }

    #[test]
    fn test_long_line_is_not_heading() {
        assert_eq!(heading_kind("Experience building distributed systems at scale"), None);
        assert_eq!(heading_kind("EMPLOYMENT HISTORY"), Some(SectionKind::Experience));
        assert_eq!(heading_kind("Certifications:"), Some(SectionKind::Other));
    }

    #[test]
    fn test_segmentation_is_stable() {
        assert_eq!(segment(RESUME), segment(RESUME));
    }

    #[test]
    fn test_empty_text_has_no_blocks() {
        assert!(segment("").blocks().is_empty());
        assert!(segment("\n\n").blocks().is_empty());
    }

    #[test]
    fn test_bullet_markers() {
        assert_eq!(bullet_marker("• Shipped v2"), Some('•'));
        assert_eq!(bullet_marker("  - Led team"), Some('-'));
        assert_eq!(bullet_marker("3. Cut costs"), Some('#'));
        assert_eq!(bullet_marker("2019 - 2021"), None);
        assert_eq!(bullet_marker("-5% churn"), None);
        assert_eq!(strip_bullet("12) Cut costs by 5%"), Some("Cut costs by 5%"));
        assert_eq!(strip_bullet("● Built APIs"), Some("Built APIs"));
    }
}
