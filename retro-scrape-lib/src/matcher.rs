//! Title normalization and candidate scoring.
//!
//! File names carry dump notes (`(USA)`, `[!]`), underscores and the
//! `Title, The` convention. Searches use the normalized title; candidates
//! are ranked by edit distance on a punctuation-free form.

use strsim::normalized_levenshtein;

use retro_scrape_core::{Candidate, Platform};

/// Outcome of ranking a candidate list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Selection {
    /// Index of the chosen candidate, `None` when nothing reached the threshold.
    pub index: Option<usize>,
    /// Best score seen, chosen or not.
    pub score: u8,
    /// Title of the best-scoring candidate, for the miss log. A candidate
    /// that scored 0 is no match at all and is not reported.
    pub closest: Option<String>,
}

/// Search title for a file base name.
pub fn normalize(base_name: &str) -> String {
    let mut stripped = String::with_capacity(base_name.len());
    let mut depth = 0usize;
    for c in base_name.chars() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.saturating_sub(1),
            '_' if depth == 0 => stripped.push(' '),
            _ if depth == 0 => stripped.push(c),
            _ => {}
        }
    }

    let title = stripped.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = title.len().saturating_sub(", the".len());
    if title.is_char_boundary(cut) && title[cut..].eq_ignore_ascii_case(", the") {
        return format!("The {}", title[..cut].trim_end());
    }
    title
}

/// The `(...)` and `[...]` groups of a base name, in order, space separated.
pub fn bracket_notes(base_name: &str) -> String {
    let mut notes = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    for c in base_name.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' if depth > 0 => {
                depth -= 1;
                current.push(c);
                if depth == 0 {
                    notes.push(std::mem::take(&mut current));
                }
            }
            _ if depth > 0 => current.push(c),
            _ => {}
        }
    }
    notes.join(" ")
}

/// Title shown in the document, with the file's bracket notes appended
/// when `keep_brackets` is set.
pub fn display_title(title: &str, base_name: &str, keep_brackets: bool) -> String {
    if !keep_brackets {
        return title.to_string();
    }
    let notes = bracket_notes(base_name);
    if notes.is_empty() || title.ends_with(&notes) {
        title.to_string()
    } else {
        format!("{title} {notes}")
    }
}

fn comparable(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity of two titles, 0-100.
pub fn score(a: &str, b: &str) -> u8 {
    let a = comparable(a);
    let b = comparable(b);
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    (normalized_levenshtein(&a, &b) * 100.0).round().clamp(0.0, 100.0) as u8
}

fn candidate_score(title: &str, candidate: &Candidate, platform: Platform) -> u8 {
    if let Some(ref p) = candidate.platform {
        if !platform.matches_alias(p) {
            return 0;
        }
    }
    std::iter::once(&candidate.title)
        .chain(candidate.alt_titles.iter())
        .map(|t| score(title, t))
        .max()
        .unwrap_or(0)
}

/// Pick the best candidate for `title`.
///
/// The first candidate wins ties. Below `min_match` nothing is selected,
/// but the best score and title are still reported.
pub fn select(title: &str, candidates: &[Candidate], platform: Platform, min_match: u8) -> Selection {
    let mut best: Option<(usize, u8)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let s = candidate_score(title, candidate, platform);
        if best.is_none_or(|(_, top)| s > top) {
            best = Some((i, s));
        }
    }

    let Some((i, s)) = best else {
        return Selection::default();
    };
    log::debug!(
        "Best match for '{title}' is '{}' ({s}%)",
        candidates[i].title
    );
    Selection {
        index: (s >= min_match).then_some(i),
        score: s,
        closest: (s > 0).then(|| candidates[i].title.clone()),
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
