use std::fmt;

/// Marker separating utterances in a stored transcript
pub const DELIMITER: &str = "@@";

/// Who spoke an utterance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Doctor,
    Patient,
}

impl Speaker {
    pub fn other(self) -> Self {
        match self {
            Speaker::Doctor => Speaker::Patient,
            Speaker::Patient => Speaker::Doctor,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Doctor => write!(f, "Doctor"),
            Speaker::Patient => write!(f, "Patient"),
        }
    }
}

/// A single attributed utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance<'a> {
    pub speaker: Speaker,
    pub text: &'a str,
}

/// Split a transcript into its utterances, dropping empty pieces
pub fn utterances(transcript: &str) -> Vec<&str> {
    transcript
        .split(DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Attribute utterances to alternating speakers
///
/// The first utterance belongs to the doctor when `starts_with_doctor` is
/// set, otherwise to the patient; speakers then alternate.
pub fn attribute_speakers(transcript: &str, starts_with_doctor: bool) -> Vec<Utterance<'_>> {
    let mut speaker = if starts_with_doctor {
        Speaker::Doctor
    } else {
        Speaker::Patient
    };

    utterances(transcript)
        .into_iter()
        .map(|text| {
            let utterance = Utterance { speaker, text };
            speaker = speaker.other();
            utterance
        })
        .collect()
}
