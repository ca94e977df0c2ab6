use crate::analysis::fields::is_date_line;
use crate::analysis::models::Entry;
use crate::analysis::skills::contains_term;

const VAGUE_VERBS: &[&str] = &[
    "improved",
    "enhanced",
    "helped",
    "worked on",
    "assisted",
    "supported",
    "participated",
    "involved",
    "responsible for",
];

const VAGUE_SCALE_WORDS: &[&str] = &[
    "significant",
    "major",
    "huge",
    "massive",
    "substantial",
    "considerable",
    "numerous",
    "various",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImpactAssessment {
    pub quantified: bool,
    pub vague_terms: Vec<&'static str>,
}

/// True when the text carries a measurable outcome: a digit, `%`, or a
/// currency sign.
pub fn is_quantified(text: &str) -> bool {
    text.chars()
        .any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£'))
}

/// Checks the achievement lines of an entry: its bullets, or its detail lines
/// minus date-only ones when it has no bullets.
pub fn assess_entry(entry: &Entry) -> ImpactAssessment {
    let claims: Vec<&str> = if entry.bullets.is_empty() {
        entry
            .details
            .iter()
            .map(String::as_str)
            .filter(|line| !is_date_line(line))
            .collect()
    } else {
        entry.bullets.iter().map(String::as_str).collect()
    };

    let quantified = claims.iter().any(|c| is_quantified(c));
    let vague_terms = claims
        .iter()
        .filter(|c| !is_quantified(c))
        .flat_map(|c| vague_terms_in(c))
        .fold(Vec::new(), |mut acc, term| {
            if !acc.contains(&term) {
                acc.push(term);
            }
            acc
        });

    ImpactAssessment {
        quantified,
        vague_terms,
    }
}

fn vague_terms_in(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    VAGUE_VERBS
        .iter()
        .chain(VAGUE_SCALE_WORDS)
        .copied()
        .filter(|term| contains_term(&lower, term))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(details: &[&str], bullets: &[&str]) -> Entry {
        Entry {
            title: "Engineer, Acme (2020 - 2022)".to_string(),
            details: details.iter().map(|s| s.to_string()).collect(),
            bullets: bullets.iter().map(|s| s.to_string()).collect(),
            dates: Some("2020 - 2022".to_string()),
        }
    }

    #[test]
    fn test_pass_with_percentage() {
        assert!(is_quantified("Reduced latency by 40% through caching"));
    }

    #[test]
    fn test_pass_with_currency() {
        assert!(is_quantified("Generated €200k in new revenue"));
        assert!(is_quantified("Saved $50,000 annually"));
    }

    #[test]
    fn test_fail_without_metrics() {
        assert!(!is_quantified("Architected the authentication system"));
    }

    #[test]
    fn test_title_dates_do_not_count_as_metrics() {
        let assessment = assess_entry(&entry(&[], &["Built the billing service"]));
        assert!(!assessment.quantified);
    }

    #[test]
    fn test_one_quantified_bullet_passes_entry() {
        let assessment = assess_entry(&entry(
            &[],
            &["Built the billing service", "Cut p99 latency by 35%"],
        ));
        assert!(assessment.quantified);
    }

    #[test]
    fn test_details_used_when_no_bullets() {
        assert!(assess_entry(&entry(&["Managed 12 engineers"], &[])).quantified);
    }

    #[test]
    fn test_date_detail_line_is_not_a_metric() {
        let assessment = assess_entry(&entry(
            &["Jan 2019 - 2021", "Maintained the internal billing platform"],
            &[],
        ));
        assert!(!assessment.quantified);
    }

    #[test]
    fn test_vague_terms_match_whole_words() {
        let assessment = assess_entry(&entry(
            &[],
            &["Retired unsupported browsers for the majority of customers"],
        ));
        assert!(assessment.vague_terms.is_empty());
    }

    #[test]
    fn test_vague_terms_collected_once() {
        let assessment = assess_entry(&entry(
            &[],
            &[
                "Helped the team ship features",
                "Helped with various migrations",
                "Improved uptime to 99.9%",
            ],
        ));
        assert_eq!(assessment.vague_terms, vec!["helped", "various"]);
    }
}
