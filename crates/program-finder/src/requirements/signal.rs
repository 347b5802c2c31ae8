use serde::Serialize;

/// A sentence kept as evidence, tagged with the page it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalNote {
    pub text: String,
    pub source: Option<String>,
}

impl SignalNote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            source: None,
        }
    }
}

/// Partial admission hints read from a single page. Every field may be absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionSignal {
    pub ielts: Option<f64>,
    pub toefl: Option<u16>,
    pub pte: Option<u16>,
    pub ects_min: Option<u16>,
    pub program_ects: Option<u16>,
    pub english_taught: bool,
    pub non_eu: bool,
    pub notes: Vec<SignalNote>,
}

impl AdmissionSignal {
    /// Tags every note with the page URL so merged notes keep provenance.
    pub fn attributed_to(mut self, source: &str) -> Self {
        for note in &mut self.notes {
            note.source = Some(source.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.ielts.is_none()
            && self.toefl.is_none()
            && self.pte.is_none()
            && self.ects_min.is_none()
            && self.program_ects.is_none()
            && !self.english_taught
            && !self.non_eu
            && self.notes.is_empty()
    }
}

/// Canonical merged record for one program.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionRecord {
    pub ielts: Option<f64>,
    pub toefl: Option<u16>,
    pub pte: Option<u16>,
    pub ects_min: Option<u16>,
    pub program_ects: Option<u16>,
    pub notes: Vec<String>,
    pub english_taught: bool,
    pub non_eu: bool,
    pub canonical: String,
}

/// Body of `GET /requirements`. On failure every signal is empty and `error`
/// carries the marker, so the UI can always render the same shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementsResponse {
    pub ielts: Option<f64>,
    pub toefl: Option<u16>,
    pub pte: Option<u16>,
    pub ects_min: Option<u16>,
    pub program_ects: Option<u16>,
    pub notes: Vec<String>,
    pub english_taught: bool,
    pub non_eu: bool,
    pub canonical: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RequirementsResponse {
    pub fn degraded(marker: &'static str, detail: impl Into<String>) -> Self {
        Self {
            ielts: None,
            toefl: None,
            pte: None,
            ects_min: None,
            program_ects: None,
            notes: Vec::new(),
            english_taught: false,
            non_eu: false,
            canonical: None,
            error: Some(marker),
            detail: Some(detail.into()),
        }
    }
}

impl From<AdmissionRecord> for RequirementsResponse {
    fn from(record: AdmissionRecord) -> Self {
        Self {
            ielts: record.ielts,
            toefl: record.toefl,
            pte: record.pte,
            ects_min: record.ects_min,
            program_ects: record.program_ects,
            notes: record.notes,
            english_taught: record.english_taught,
            non_eu: record.non_eu,
            canonical: Some(record.canonical),
            error: None,
            detail: None,
        }
    }
}
