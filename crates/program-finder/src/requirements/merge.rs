use std::collections::HashSet;

use tracing::debug;

use super::signal::{AdmissionRecord, AdmissionSignal};

pub const MAX_MERGED_NOTES: usize = 8;

/// Folds per-page signals into one record.
///
/// Numeric fields take the largest value any page reports, and the boolean
/// hints are OR-ed, so those fields do not depend on page order. Notes are
/// concatenated in page order, exact duplicates dropped (first occurrence
/// wins), then truncated to [`MAX_MERGED_NOTES`]; this is the only
/// order-dependent part. `canonical` is taken from the caller, never from a
/// secondary page.
pub fn merge(signals: &[AdmissionSignal], canonical: impl Into<String>) -> AdmissionRecord {
    let mut record = AdmissionRecord {
        ielts: None,
        toefl: None,
        pte: None,
        ects_min: None,
        program_ects: None,
        notes: Vec::new(),
        english_taught: false,
        non_eu: false,
        canonical: canonical.into(),
    };
    let mut seen_notes = HashSet::new();

    for signal in signals {
        record.ielts = max_present(record.ielts, signal.ielts);
        record.toefl = max_present(record.toefl, signal.toefl);
        record.pte = max_present(record.pte, signal.pte);
        record.ects_min = max_present(record.ects_min, signal.ects_min);
        record.program_ects = max_present(record.program_ects, signal.program_ects);
        record.english_taught |= signal.english_taught;
        record.non_eu |= signal.non_eu;

        for note in &signal.notes {
            if record.notes.len() == MAX_MERGED_NOTES {
                break;
            }
            if seen_notes.insert(note.text.as_str()) {
                debug!(source = note.source.as_deref().unwrap_or("-"), "kept note");
                record.notes.push(note.text.clone());
            }
        }
    }

    record
}

/// Larger of the running value and the candidate; absence never overrides.
fn max_present<T: PartialOrd + Copy>(current: Option<T>, candidate: Option<T>) -> Option<T> {
    match (current, candidate) {
        (Some(current), Some(candidate)) if candidate > current => Some(candidate),
        (Some(current), _) => Some(current),
        (None, candidate) => candidate,
    }
}
