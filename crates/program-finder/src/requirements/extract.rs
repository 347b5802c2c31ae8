//! Heuristic admission-signal extraction over normalized page text.
//!
//! Extraction is a fixed, ordered list of named field extractors. Each one
//! reads the flattened text and fills at most one part of the
//! [`AdmissionSignal`]; none of them can fail. A missing pattern simply
//! leaves the field empty.

use std::sync::LazyLock;

use regex::Regex;

use super::signal::{AdmissionSignal, SignalNote};

/// Lowest and highest credit figure treated as a real credit count.
pub const CREDIT_RANGE: (u16, u16) = (20, 360);
/// Credit figures above this are assumed to describe a whole programme and
/// are not used as a fallback minimum.
pub const FALLBACK_MINIMUM_CEILING: u16 = 180;
pub const NOTE_LENGTH: (usize, usize) = (40, 220);
pub const MAX_PAGE_NOTES: usize = 12;

/// One named step of the extraction pipeline.
pub type FieldExtractor = fn(&str, &mut AdmissionSignal);

/// Extraction order. Field extractors are independent of each other.
pub const PIPELINE: &[(&str, FieldExtractor)] = &[
    ("ielts", extract_ielts),
    ("toefl", extract_toefl),
    ("pte", extract_pte),
    ("ects", extract_credits),
    ("english_taught", extract_english_taught),
    ("non_eu", extract_non_eu),
    ("notes", extract_notes),
];

static IELTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bIELTS\b[^0-9]{0,24}?(\d+(?:\.\d+)?)").expect("ielts pattern compiles")
});
static TOEFL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bTOEFL\b[^0-9]{0,24}?(\d{2,3})\b").expect("toefl pattern compiles")
});
static PTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bPTE\b[^0-9]{0,24}?(\d{2,3})\b").expect("pte pattern compiles")
});
static CREDIT_FIGURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d{2,3})\s*(?:ECTS|credits?|CFU)\b").expect("credit pattern compiles")
});
static MINIMUM_CREDITS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(?:minimum|min\.|at\s+least)[^0-9]{0,30}?\b(\d{2,3})\s*(?:ECTS|credits?|CFU)\b")
        .expect("minimum credit pattern compiles")
});
static ENGLISH_TAUGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\btaught\s+(?:\w+\s+)?in\s+english\b|\benglish[-\s]taught\b|\blanguage\s+of\s+(?:instruction|teaching)\b[^.]{0,40}?\benglish\b|\binstruction\s+language\W{0,3}english\b",
    )
    .expect("english taught pattern compiles")
});
static NON_EU: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\bnon[-\s]?(?:eu|eea)\b|\binternational\s+(?:students?|applicants?)\b|\boutside\s+(?:of\s+)?the\s+(?:eu|eea|european\s+union)\b|\ball\s+nationalities\b",
    )
    .expect("non-eu pattern compiles")
});
static NOTE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)requirement|admission|entry|eligibility|prerequisite|\bIELTS\b|\bTOEFL\b|\bPTE\b|\bECTS\b|credit|\bCFU\b|\bnon[-\s]?EU\b|international",
    )
    .expect("note keyword pattern compiles")
});

/// Runs every step of [`PIPELINE`] over `text`.
pub fn extract(text: &str) -> AdmissionSignal {
    let mut signal = AdmissionSignal::default();
    for (_, step) in PIPELINE {
        step(text, &mut signal);
    }
    signal
}

/// First IELTS band score in 5.0..=9.0 that follows the keyword.
pub fn extract_ielts(text: &str, signal: &mut AdmissionSignal) {
    signal.ielts = IELTS
        .captures_iter(text)
        .filter_map(|caps| band_score(&caps[1]))
        .find(|score| (5.0..=9.0).contains(score));
}

/// A single digit with at most one decimal place; "6.55" or "65" are not bands.
fn band_score(raw: &str) -> Option<f64> {
    let (whole, fraction) = raw.split_once('.').unwrap_or((raw, ""));
    if whole.len() != 1 || fraction.len() > 1 {
        return None;
    }
    raw.parse().ok()
}

pub fn extract_toefl(text: &str, signal: &mut AdmissionSignal) {
    signal.toefl = first_score(&TOEFL, text);
}

pub fn extract_pte(text: &str, signal: &mut AdmissionSignal) {
    signal.pte = first_score(&PTE, text);
}

fn first_score(pattern: &Regex, text: &str) -> Option<u16> {
    pattern
        .captures(text)
        .and_then(|caps| caps[1].parse::<u16>().ok())
}

/// Credit heuristics. An explicit "minimum N credits" wins for `ects_min`;
/// otherwise the smallest figure up to [`FALLBACK_MINIMUM_CEILING`] is used.
/// `program_ects` is the largest figure on the page. Both are guesses from
/// free text, not a reliable classification.
pub fn extract_credits(text: &str, signal: &mut AdmissionSignal) {
    let figures = credit_figures(&CREDIT_FIGURE, text);
    let minima = credit_figures(&MINIMUM_CREDITS, text);

    signal.ects_min = minima.iter().copied().min().or_else(|| {
        figures
            .iter()
            .copied()
            .filter(|credits| *credits <= FALLBACK_MINIMUM_CEILING)
            .min()
    });
    signal.program_ects = figures.iter().copied().max();
}

fn credit_figures(pattern: &Regex, text: &str) -> Vec<u16> {
    let (low, high) = CREDIT_RANGE;
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u16>().ok())
        .filter(|credits| (low..=high).contains(credits))
        .collect()
}

pub fn extract_english_taught(text: &str, signal: &mut AdmissionSignal) {
    signal.english_taught = ENGLISH_TAUGHT.is_match(text);
}

pub fn extract_non_eu(text: &str, signal: &mut AdmissionSignal) {
    signal.non_eu = NON_EU.is_match(text);
}

/// Sentences of readable length mentioning an admission keyword, in document
/// order.
pub fn extract_notes(text: &str, signal: &mut AdmissionSignal) {
    let (shortest, longest) = NOTE_LENGTH;
    signal.notes = sentences(text)
        .filter(|sentence| {
            let length = sentence.chars().count();
            (shortest..=longest).contains(&length)
        })
        .filter(|sentence| NOTE_KEYWORD.is_match(sentence))
        .take(MAX_PAGE_NOTES)
        .map(SignalNote::new)
        .collect();
}

/// Splits on `.`, `!`, `?` or `;` followed by whitespace, so decimals such as
/// "6.5" stay inside their sentence.
fn sentences(text: &str) -> impl Iterator<Item = &str> {
    let mut spans = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if !matches!(ch, '.' | '!' | '?' | ';') {
            continue;
        }
        if let Some(&(next, following)) = chars.peek() {
            if following.is_whitespace() {
                spans.push(&text[start..index + ch.len_utf8()]);
                start = next;
            }
        }
    }
    spans.push(&text[start..]);
    spans
        .into_iter()
        .map(str::trim)
        .filter(|span| !span.is_empty())
}
