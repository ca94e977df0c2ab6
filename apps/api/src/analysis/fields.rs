//! Field extraction — pattern rules over segmented text. Total: every field is
//! optional and a missing field is never an error.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::analysis::models::{Entry, ExtractedFields, ResumeSections, SectionKind};
use crate::analysis::segmenter::strip_bullet;
use crate::analysis::skills::extract_skills;

/// Longest line (in whitespace tokens) still accepted as a person's name.
pub const MAX_NAME_TOKENS: usize = 4;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

/// TLDs accepted for bare domains (no scheme, no `www.`) in the header.
const WEB_TLDS: &[&str] = &[
    "com", "io", "dev", "me", "org", "app", "co", "ai", "tech", "site", "xyz", "page", "info",
];

const NAME_STOPWORDS: &[&str] = &["resume", "curriculum vitae", "cv", "biodata"];

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").expect("valid regex")
});

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\(?\d[\d .()\-]{5,}\d").expect("valid regex"));

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)\b(?:https?://)?(?:www\.)?[a-z0-9][a-z0-9-]*(?:\.[a-z0-9-]+)*\.[a-z]{2,}(?:/[^\s,;|)]*)?",
    )
    .expect("valid regex")
});

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    const MONTH: &str = r"(?:jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+";
    let point = format!(r"(?:{MONTH}|\d{{1,2}}/)?(?:19|20)\d{{2}}\b");
    Regex::new(&format!(
        r"(?i)\b{point}(?:\s*(?:-|–|—|to)\s*(?:{point}|present|current|now))?"
    ))
    .expect("valid regex")
});

/// True when the whole line is a date or date range (`Jan 2019 - 2021`),
/// optionally wrapped in brackets.
pub fn is_date_line(line: &str) -> bool {
    let inner = line
        .trim()
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '|' | ','));
    DATE_RE
        .find(inner)
        .is_some_and(|m| m.start() == 0 && m.end() == inner.len())
}

pub fn extract_fields(sections: &ResumeSections) -> ExtractedFields {
    let header = sections.lines(SectionKind::Contact);
    let all: Vec<&str> = sections.all_lines().collect();
    let links = find_links(&header, &all);

    ExtractedFields {
        name: find_name(&header),
        email: find_email(&all),
        phone: find_phone(&header).or_else(|| find_phone(&all)),
        linkedin: links.linkedin,
        github: links.github,
        portfolio: links.portfolio,
        summary: find_summary(&sections.lines(SectionKind::Summary)),
        skills: extract_skills(&sections.lines(SectionKind::Skills), &all.join("\n")),
        education: parse_entries(&sections.lines(SectionKind::Education)),
        experience: parse_entries(&sections.lines(SectionKind::Experience)),
        projects: parse_entries(&sections.lines(SectionKind::Projects)),
    }
}

fn find_email(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .find_map(|line| EMAIL_RE.find(line))
        .map(|m| m.as_str().to_string())
}

fn find_phone(lines: &[&str]) -> Option<String> {
    lines.iter().find_map(|line| {
        PHONE_RE
            .find_iter(line)
            .map(|m| m.as_str().trim())
            .find(|candidate| is_phone(candidate))
            .map(str::to_string)
    })
}

fn is_phone(candidate: &str) -> bool {
    let digits = candidate.chars().filter(char::is_ascii_digit).count();
    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return false;
    }
    // "2019 - 2021" and friends are date ranges, not numbers.
    let groups: Vec<&str> = candidate
        .split(|c: char| !c.is_ascii_digit())
        .filter(|g| !g.is_empty())
        .collect();
    !groups
        .iter()
        .all(|g| g.len() == 4 && (g.starts_with("19") || g.starts_with("20")))
}

#[derive(Debug, Default)]
struct Links {
    linkedin: Option<String>,
    github: Option<String>,
    portfolio: Option<String>,
}

/// Bare domains are trusted only in the header; elsewhere a URL needs a
/// scheme or `www.` so tech names like `socket.io` are not mistaken for sites.
fn find_links(header: &[&str], all: &[&str]) -> Links {
    let mut links = Links::default();
    let candidates = header
        .iter()
        .flat_map(|line| urls_in(line, true))
        .chain(all.iter().flat_map(|line| urls_in(line, false)));

    for url in candidates {
        let lower = url.to_lowercase();
        let slot = if lower.contains("linkedin.com") {
            &mut links.linkedin
        } else if lower.contains("github.com") {
            &mut links.github
        } else {
            &mut links.portfolio
        };
        if slot.is_none() {
            *slot = Some(url);
        }
    }
    links
}

fn urls_in(line: &str, allow_bare: bool) -> Vec<String> {
    URL_RE
        .find_iter(line)
        .filter(|m| {
            // Skip both halves of an email address.
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            before != Some('@') && after != Some('@')
        })
        .map(|m| m.as_str().trim_end_matches(&['.', ':'][..]).to_string())
        .filter(|url| is_web_url(url, allow_bare))
        .collect()
}

fn is_web_url(url: &str, allow_bare: bool) -> bool {
    let lower = url.to_lowercase();
    let host = lower
        .trim_start_matches("https://")
        .trim_start_matches("http://");
    if lower.starts_with("http://") || lower.starts_with("https://") || host.starts_with("www.") {
        return true;
    }
    let host = host.split('/').next().unwrap_or(host);
    if host.ends_with("linkedin.com") || host.ends_with("github.com") {
        return true;
    }
    allow_bare
        && host
            .rsplit('.')
            .next()
            .is_some_and(|tld| WEB_TLDS.contains(&tld))
}

fn find_name(header: &[&str]) -> Option<String> {
    header.iter().find_map(|line| name_candidate(line))
}

fn name_candidate(line: &str) -> Option<String> {
    let line = line.trim();
    let line = line
        .strip_prefix("Name:")
        .or_else(|| line.strip_prefix("NAME:"))
        .unwrap_or(line);
    // "Jane Doe | Backend Engineer" keeps the part before the separator.
    let candidate = line.split(&['|', '·', '•'][..]).next().unwrap_or(line).trim();

    if candidate.is_empty()
        || EMAIL_RE.is_match(candidate)
        || PHONE_RE.is_match(candidate)
        || (URL_RE.is_match(candidate) && candidate.contains('.'))
        || NAME_STOPWORDS.contains(&candidate.to_lowercase().as_str())
    {
        return None;
    }

    let tokens: Vec<&str> = candidate.split_whitespace().collect();
    let looks_like_name = tokens.len() <= MAX_NAME_TOKENS
        && tokens.iter().all(|t| {
            t.chars().next().is_some_and(char::is_uppercase)
                && t.chars().all(|c| c.is_alphabetic() || matches!(c, '.' | '-' | '\'' | ','))
        });
    looks_like_name.then(|| tokens.join(" ").trim_end_matches(',').to_string())
}

fn find_summary(lines: &[&str]) -> Option<String> {
    let text = lines
        .iter()
        .map(|l| strip_bullet(l).unwrap_or(*l).trim())
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    (!text.is_empty()).then_some(text)
}

/// Splits a section into entries on blank lines; inside a block, a plain line
/// that follows bullets starts the next entry.
pub fn parse_entries(lines: &[&str]) -> Vec<Entry> {
    let mut entries = Vec::new();
    let mut current: Option<Entry> = None;

    for raw in lines {
        let line = raw.trim();
        if line.is_empty() {
            entries.extend(current.take());
            continue;
        }
        if let Some(bullet) = strip_bullet(line) {
            current
                .get_or_insert_with(Entry::default)
                .bullets
                .push(bullet.to_string());
            continue;
        }
        match current.as_mut() {
            Some(entry) if entry.bullets.is_empty() => entry.push_line(line),
            _ => {
                let mut next = Entry::default();
                next.push_line(line);
                entries.extend(current.replace(next));
            }
        }
    }
    entries.extend(current);

    for entry in &mut entries {
        entry.dates = find_dates(entry);
    }
    entries
}

fn find_dates(entry: &Entry) -> Option<String> {
    std::iter::once(&entry.title)
        .chain(&entry.details)
        .find_map(|line| DATE_RE.find(line))
        .map(|m| m.as_str().trim().to_string())
}
