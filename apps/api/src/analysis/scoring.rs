//! Scoring — keyword match, section coverage, format and the combined ATS
//! score. Pure functions of their inputs; every score is an integer in 0..=100.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::analysis::models::{
    ExtractedFields, KeywordMatch, ResumeSections, RoleProfile, SectionKind,
};
use crate::analysis::segmenter::bullet_marker;

/// Headings needed for full heading credit.
pub const HEADINGS_FOR_FULL_CREDIT: usize = 3;
/// Lines longer than this read as walls of text.
pub const MAX_LINE_CHARS: usize = 120;
/// Share of bullets that must use the dominant glyph to count as consistent.
pub const CONSISTENT_BULLET_SHARE: f64 = 0.8;
/// Above this share of table-like lines the layout is assumed to break parsers.
pub const MAX_TABLE_LINE_SHARE: f64 = 0.10;
/// `|` separators a line needs before it reads as a table row.
const MIN_TABLE_PIPES: usize = 2;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtsWeights {
    pub keyword: f64,
    pub section: f64,
    pub format: f64,
}

impl Default for AtsWeights {
    fn default() -> Self {
        Self {
            keyword: 0.40,
            section: 0.30,
            format: 0.30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatSignal {
    SectionHeadings,
    BulletPoints,
    ConsistentBullets,
    ConciseLines,
    NoTableArtifacts,
}

/// Points per format signal; sums to 100.
pub const FORMAT_WEIGHTS: &[(FormatSignal, f64)] = &[
    (FormatSignal::SectionHeadings, 30.0),
    (FormatSignal::BulletPoints, 20.0),
    (FormatSignal::ConsistentBullets, 10.0),
    (FormatSignal::ConciseLines, 20.0),
    (FormatSignal::NoTableArtifacts, 20.0),
];

/// Raw structural measurements behind the format score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatSignals {
    pub heading_count: usize,
    pub content_lines: usize,
    pub long_lines: usize,
    pub table_lines: usize,
    pub bullet_lines: usize,
    pub dominant_bullet_lines: usize,
}

impl FormatSignals {
    pub fn measure(sections: &ResumeSections) -> Self {
        let mut signals = FormatSignals {
            heading_count: sections.heading_count(),
            ..Default::default()
        };
        let mut glyph_counts: Vec<(char, usize)> = Vec::new();

        for block in sections.blocks() {
            for line in block.lines.iter().filter(|l| !l.trim().is_empty()) {
                signals.content_lines += 1;
                if line.trim().chars().count() > MAX_LINE_CHARS {
                    signals.long_lines += 1;
                }
                // `email | phone` is the usual header layout, not a table.
                if block.kind != SectionKind::Contact && is_table_line(line) {
                    signals.table_lines += 1;
                }
                if let Some(glyph) = bullet_marker(line) {
                    signals.bullet_lines += 1;
                    match glyph_counts.iter_mut().find(|(g, _)| *g == glyph) {
                        Some((_, count)) => *count += 1,
                        None => glyph_counts.push((glyph, 1)),
                    }
                }
            }
        }

        signals.dominant_bullet_lines = glyph_counts.iter().map(|(_, c)| *c).max().unwrap_or(0);
        signals
    }

    pub fn concise_share(&self) -> f64 {
        share(self.content_lines - self.long_lines, self.content_lines)
    }

    pub fn table_share(&self) -> f64 {
        share(self.table_lines, self.content_lines)
    }

    pub fn bullets_consistent(&self) -> bool {
        self.bullet_lines > 0
            && share(self.dominant_bullet_lines, self.bullet_lines) >= CONSISTENT_BULLET_SHARE
    }
}

impl FormatSignal {
    /// Fraction (0.0 – 1.0) of this signal's points earned.
    pub fn attainment(&self, signals: &FormatSignals) -> f64 {
        match self {
            FormatSignal::SectionHeadings => {
                signals.heading_count.min(HEADINGS_FOR_FULL_CREDIT) as f64
                    / HEADINGS_FOR_FULL_CREDIT as f64
            }
            FormatSignal::BulletPoints => flag(signals.bullet_lines > 0),
            FormatSignal::ConsistentBullets => flag(signals.bullets_consistent()),
            FormatSignal::ConciseLines => signals.concise_share(),
            FormatSignal::NoTableArtifacts => flag(
                signals.content_lines > 0 && signals.table_share() < MAX_TABLE_LINE_SHARE,
            ),
        }
    }
}

/// Table/column artifacts left by multi-column layouts.
fn is_table_line(line: &str) -> bool {
    let inner = line.trim();
    inner.matches('|').count() >= MIN_TABLE_PIPES
        || inner.contains('\t')
        || inner.contains("    ")
}

fn share(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

fn flag(on: bool) -> f64 {
    if on {
        1.0
    } else {
        0.0
    }
}

fn clamp_score(value: f64) -> u32 {
    value.round().clamp(0.0, 100.0) as u32
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scores {
    pub ats_score: u32,
    pub keyword_match: KeywordMatch,
    pub format_score: u32,
    pub section_score: u32,
    pub format_signals: FormatSignals,
}

pub fn score(
    fields: &ExtractedFields,
    sections: &ResumeSections,
    role: &RoleProfile,
    weights: &AtsWeights,
) -> Scores {
    let keyword_match = match_keywords(&fields.skills, role);
    let section_score = compute_section_score(sections);
    let format_signals = FormatSignals::measure(sections);
    let format_score = compute_format_score(&format_signals);
    let ats_score =
        compute_ats_score(keyword_match.score, section_score, format_score, weights);

    Scores {
        ats_score,
        keyword_match,
        format_score,
        section_score,
        format_signals,
    }
}

/// `matched = required ∩ skills`, `missing = required − matched`, both in role
/// order. A role without required skills scores 0.
pub fn match_keywords(skills: &BTreeSet<String>, role: &RoleProfile) -> KeywordMatch {
    let required = role.normalized_skills();
    if required.is_empty() {
        return KeywordMatch::default();
    }

    let total = required.len();
    let (matched_skills, missing_skills): (Vec<String>, Vec<String>) =
        required.into_iter().partition(|s| skills.contains(s));

    KeywordMatch {
        score: clamp_score(100.0 * share(matched_skills.len(), total)),
        matched_skills,
        missing_skills,
    }
}

/// Share of the canonical sections with content.
pub fn compute_section_score(sections: &ResumeSections) -> u32 {
    let present = SectionKind::CANONICAL
        .iter()
        .filter(|kind| sections.has_content(**kind))
        .count();
    clamp_score(100.0 * share(present, SectionKind::CANONICAL.len()))
}

pub fn compute_format_score(signals: &FormatSignals) -> u32 {
    let earned: f64 = FORMAT_WEIGHTS
        .iter()
        .map(|(signal, points)| points * signal.attainment(signals))
        .sum();
    clamp_score(earned)
}

pub fn compute_ats_score(keyword: u32, section: u32, format: u32, weights: &AtsWeights) -> u32 {
    clamp_score(
        weights.keyword * keyword as f64
            + weights.section * section as f64
            + weights.format * format as f64,
    )
}
