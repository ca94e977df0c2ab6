//! Suggestion checklist. Each rule is a row in `RULES`: a category, whether it
//! belongs in the top-level list, and a check that returns the message when the
//! rule fires. Rules are independent; every fired rule contributes one message.

use crate::analysis::impact::assess_entry;
use crate::analysis::models::{
    CategorizedSuggestions, Entry, ExtractedFields, ResumeSections, RoleProfile, SectionKind,
    SuggestionCategory,
};
use crate::analysis::scoring::{
    Scores, HEADINGS_FOR_FULL_CREDIT, MAX_LINE_CHARS, MAX_TABLE_LINE_SHARE,
};
use crate::analysis::skills::contains_term;

const MIN_SUMMARY_WORDS: usize = 20;
const MAX_SUMMARY_WORDS: usize = 120;
const MIN_SKILLS: usize = 5;
const KEYWORD_SCORE_TARGET: u32 = 60;
const MAX_LISTED_SKILLS: usize = 5;
const SUMMARY_SKILL_HINTS: usize = 3;

pub struct SuggestionContext<'a> {
    pub fields: &'a ExtractedFields,
    pub sections: &'a ResumeSections,
    pub scores: &'a Scores,
    pub role_skills: Vec<String>,
}

type Check = fn(&SuggestionContext<'_>) -> Option<String>;

pub struct SuggestionRule {
    pub category: SuggestionCategory,
    /// Role-agnostic rules surfaced in the top-level list.
    pub headline: bool,
    pub check: Check,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    pub top_level: Vec<String>,
    pub categorized: CategorizedSuggestions,
}

pub fn generate(
    fields: &ExtractedFields,
    sections: &ResumeSections,
    scores: &Scores,
    role: &RoleProfile,
) -> Suggestions {
    let ctx = SuggestionContext {
        fields,
        sections,
        scores,
        role_skills: role.normalized_skills(),
    };

    let mut out = Suggestions::default();
    for rule in RULES {
        let Some(message) = (rule.check)(&ctx) else {
            continue;
        };
        if rule.headline {
            out.top_level.push(message.clone());
        }
        out.categorized.push(rule.category, message);
    }
    out
}

pub static RULES: &[SuggestionRule] = &[
    // contact
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: true,
        check: |ctx| {
            (ctx.fields.email.is_none() && ctx.fields.phone.is_none()).then(|| {
                "Add contact information: recruiters need an email address or phone number to reach you."
                    .to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: false,
        check: |ctx| {
            ctx.fields
                .email
                .is_none()
                .then(|| "Add a professional email address.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: false,
        check: |ctx| {
            ctx.fields
                .phone
                .is_none()
                .then(|| "Add a phone number with country code.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: false,
        check: |ctx| {
            ctx.fields
                .name
                .is_none()
                .then(|| "Put your full name on the first line.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: false,
        check: |ctx| {
            ctx.fields
                .linkedin
                .is_none()
                .then(|| "Add your LinkedIn profile URL.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Contact,
        headline: false,
        check: |ctx| {
            (ctx.fields.github.is_none() && ctx.fields.portfolio.is_none()).then(|| {
                "Link a GitHub profile or portfolio that shows your work.".to_string()
            })
        },
    },
    // summary
    SuggestionRule {
        category: SuggestionCategory::Summary,
        headline: true,
        check: |ctx| {
            ctx.fields.summary.is_none().then(|| {
                "Add a professional summary: two or three sentences on who you are and what you bring."
                    .to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Summary,
        headline: false,
        check: |ctx| {
            let words = summary_words(ctx)?;
            (words < MIN_SUMMARY_WORDS).then(|| {
                format!(
                    "Expand your summary ({words} words) to at least {MIN_SUMMARY_WORDS} words."
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Summary,
        headline: false,
        check: |ctx| {
            let words = summary_words(ctx)?;
            (words > MAX_SUMMARY_WORDS).then(|| {
                format!("Shorten your summary ({words} words) to under {MAX_SUMMARY_WORDS} words.")
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Summary,
        headline: false,
        check: |ctx| {
            let summary = ctx.fields.summary.as_deref()?.to_lowercase();
            if ctx.role_skills.is_empty()
                || ctx.role_skills.iter().any(|s| contains_term(&summary, s))
            {
                return None;
            }
            let hints = ctx.role_skills[..ctx.role_skills.len().min(SUMMARY_SKILL_HINTS)].join(", ");
            Some(format!(
                "Mention the skills this role asks for, such as {hints}, in your summary."
            ))
        },
    },
    // skills
    SuggestionRule {
        category: SuggestionCategory::Skills,
        headline: true,
        check: |ctx| {
            (!ctx.sections.has_content(SectionKind::Skills)).then(|| {
                "Add a dedicated Skills section so keyword filters can find your skills."
                    .to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Skills,
        headline: false,
        check: |ctx| {
            let missing = &ctx.scores.keyword_match.missing_skills;
            if ctx.scores.keyword_match.score >= KEYWORD_SCORE_TARGET || missing.is_empty() {
                return None;
            }
            let listed = missing[..missing.len().min(MAX_LISTED_SKILLS)].join(", ");
            Some(format!("Add the role skills you have but did not list: {listed}."))
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Skills,
        headline: false,
        check: |ctx| {
            let found = ctx.fields.skills.len();
            (found < MIN_SKILLS).then(|| {
                format!("List at least {MIN_SKILLS} relevant skills (found {found}).")
            })
        },
    },
    // experience
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: true,
        check: |ctx| {
            ctx.fields.experience.is_empty().then(|| {
                "Add work experience with your title, employer and dates for each role."
                    .to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: true,
        check: |ctx| {
            let n = count_entries(&ctx.fields.experience, |e| !assess_entry(e).quantified);
            (n > 0).then(|| {
                format!(
                    "Quantify your impact with numbers, percentages or amounts ({n} {} without metrics).",
                    plural(n, "entry", "entries")
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: false,
        check: |ctx| {
            let n = count_entries(&ctx.fields.experience, |e| e.bullets.is_empty());
            (n > 0).then(|| {
                format!(
                    "Describe achievements as bullet points ({n} {} written as paragraphs).",
                    plural(n, "entry", "entries")
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: false,
        check: |ctx| {
            let mut terms: Vec<&str> = Vec::new();
            for entry in &ctx.fields.experience {
                for term in assess_entry(entry).vague_terms {
                    if !terms.contains(&term) {
                        terms.push(term);
                    }
                }
            }
            (!terms.is_empty()).then(|| {
                format!(
                    "Replace vague wording ({}) with specific, measurable results.",
                    terms.join(", ")
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: false,
        check: |ctx| {
            let n = count_entries(&ctx.fields.experience, |e| e.dates.is_none());
            (n > 0).then(|| {
                format!(
                    "Add start and end dates to {n} experience {}.",
                    plural(n, "entry", "entries")
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Experience,
        headline: false,
        check: |ctx| {
            ctx.fields.projects.is_empty().then(|| {
                "Add a Projects section to show hands-on work beyond your job titles.".to_string()
            })
        },
    },
    // education
    SuggestionRule {
        category: SuggestionCategory::Education,
        headline: true,
        check: |ctx| {
            ctx.fields.education.is_empty().then(|| {
                "Add your education: degree, institution and graduation year.".to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Education,
        headline: false,
        check: |ctx| {
            let n = count_entries(&ctx.fields.education, |e| e.dates.is_none());
            (n > 0).then(|| {
                format!(
                    "Add graduation dates to {n} education {}.",
                    plural(n, "entry", "entries")
                )
            })
        },
    },
    // format
    SuggestionRule {
        category: SuggestionCategory::Format,
        headline: true,
        check: |ctx| {
            (ctx.scores.format_signals.heading_count < HEADINGS_FOR_FULL_CREDIT).then(|| {
                "Use clear section headings such as Summary, Skills, Experience and Education."
                    .to_string()
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Format,
        headline: false,
        check: |ctx| {
            (ctx.scores.format_signals.bullet_lines == 0)
                .then(|| "Use bullet points instead of long paragraphs.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Format,
        headline: false,
        check: |ctx| {
            let signals = &ctx.scores.format_signals;
            (signals.bullet_lines > 0 && !signals.bullets_consistent())
                .then(|| "Use one bullet style throughout the document.".to_string())
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Format,
        headline: false,
        check: |ctx| {
            let n = ctx.scores.format_signals.long_lines;
            (n > 0).then(|| {
                format!(
                    "Break up {n} {} longer than {MAX_LINE_CHARS} characters.",
                    plural(n, "line", "lines")
                )
            })
        },
    },
    SuggestionRule {
        category: SuggestionCategory::Format,
        headline: false,
        check: |ctx| {
            let signals = &ctx.scores.format_signals;
            (signals.content_lines > 0 && signals.table_share() >= MAX_TABLE_LINE_SHARE).then(|| {
                "Avoid tables and multi-column layouts; applicant tracking systems often read them out of order."
                    .to_string()
            })
        },
    },
];

fn summary_words(ctx: &SuggestionContext<'_>) -> Option<usize> {
    ctx.fields
        .summary
        .as_deref()
        .map(|s| s.split_whitespace().count())
}

fn count_entries(entries: &[Entry], pred: impl Fn(&Entry) -> bool) -> usize {
    entries.iter().filter(|e| pred(e)).count()
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::fields::extract_fields;
    use crate::analysis::scoring::{score, AtsWeights};
    use crate::analysis::segmenter::segment;

    const STRONG_RESUME: &str = "\
Jane Doe
jane.doe@example.com
+1 555 123 4567
linkedin.com/in/janedoe
github.com/janedoe

Summary
Backend engineer with six years of experience building Python services, SQL data
pipelines and Docker based deployments for payment and logistics companies.

Skills
Python, SQL, Docker, PostgreSQL, Kubernetes

Experience
Senior Engineer, Acme Corp (2019 - 2023)
- Cut API latency by 40% by redesigning the caching layer
- Led a team of 5 engineers through a database migration

Projects
Ledger CLI (2022)
- Reconciles 10k transactions per second

Education
BSc Computer Science, State University, 2015 - 2019
";

    fn run(text: &str, skills: &[&str]) -> Suggestions {
        let sections = segment(text);
        let fields = extract_fields(&sections);
        let role = RoleProfile::new("Backend Engineer", skills);
        let scores = score(&fields, &sections, &role, &AtsWeights::default());
        generate(&fields, &sections, &scores, &role)
    }

    #[test]
    fn test_missing_contact_is_headline() {
        let s = run("Experience\nEngineer at Acme\nBuilt internal tools", &["python", "sql"]);
        assert!(s
            .categorized
            .contact_suggestions
            .iter()
            .any(|m| m.contains("contact information")));
        assert!(s.top_level.iter().any(|m| m.contains("contact information")));
    }

    #[test]
    fn test_strong_resume_has_no_headlines() {
        let s = run(STRONG_RESUME, &["python", "sql"]);
        assert!(s.top_level.is_empty(), "{:?}", s.top_level);
        assert!(s.categorized.skills_suggestions.is_empty());
        assert!(s.categorized.education_suggestions.is_empty());
        assert!(s.categorized.format_suggestions.is_empty());
    }

    #[test]
    fn test_top_level_is_subset_of_categorized() {
        let s = run("hello world", &["python"]);
        let all: Vec<&String> = [
            &s.categorized.contact_suggestions,
            &s.categorized.summary_suggestions,
            &s.categorized.skills_suggestions,
            &s.categorized.experience_suggestions,
            &s.categorized.education_suggestions,
            &s.categorized.format_suggestions,
        ]
        .into_iter()
        .flatten()
        .collect();
        assert!(!s.top_level.is_empty());
        assert!(s.top_level.iter().all(|m| all.contains(&m)));
    }

    #[test]
    fn test_top_level_is_role_agnostic() {
        let a = run(STRONG_RESUME, &["python", "sql"]);
        let b = run(STRONG_RESUME, &["tensorflow", "pytorch", "mlops"]);
        assert_eq!(a.top_level, b.top_level);
        assert_ne!(a.categorized.skills_suggestions, b.categorized.skills_suggestions);
    }

    #[test]
    fn test_missing_skills_listed_up_to_five() {
        let s = run(
            STRONG_RESUME,
            &["react", "vue", "angular", "graphql", "kafka", "spark", "airflow"],
        );
        let msg = s
            .categorized
            .skills_suggestions
            .iter()
            .find(|m| m.starts_with("Add the role skills"))
            .unwrap();
        assert!(msg.contains("react, vue, angular, graphql, kafka"));
        assert!(!msg.contains("spark"));
    }

    #[test]
    fn test_summary_without_role_skills() {
        let s = run(STRONG_RESUME, &["react", "typescript"]);
        assert!(s
            .categorized
            .summary_suggestions
            .iter()
            .any(|m| m.contains("react, typescript")));
    }

    #[test]
    fn test_vague_unquantified_experience() {
        let text = "\
Experience
Engineer, Acme (2020 - 2022)
- Helped with various migrations
Analyst, Globex
Worked on reporting
";
        let s = run(text, &["sql"]);
        let exp = &s.categorized.experience_suggestions;
        assert!(exp.iter().any(|m| m.contains("(2 entries without metrics)")));
        assert!(exp.iter().any(|m| m.contains("helped, various, worked on")));
        assert!(exp.iter().any(|m| m.contains("(1 entry written as paragraphs)")));
        assert!(exp.iter().any(|m| m.contains("dates to 1 experience entry")));
    }

    #[test]
    fn test_mixed_bullets_and_long_lines() {
        let long = "word ".repeat(30);
        let text = format!("Summary\n{long}\n\nSkills\n- Rust\n* Go\n• Python\n");
        let s = run(&text, &["rust"]);
        let fmt = &s.categorized.format_suggestions;
        assert!(fmt.iter().any(|m| m.contains("one bullet style")));
        assert!(fmt.iter().any(|m| m.contains("Break up 1 line longer")));
    }

    #[test]
    fn test_every_rule_category_is_reachable() {
        let s = run("", &["python"]);
        assert!(!s.categorized.contact_suggestions.is_empty());
        assert!(!s.categorized.summary_suggestions.is_empty());
        assert!(!s.categorized.skills_suggestions.is_empty());
        assert!(!s.categorized.experience_suggestions.is_empty());
        assert!(!s.categorized.education_suggestions.is_empty());
        assert!(!s.categorized.format_suggestions.is_empty());
    }
}
