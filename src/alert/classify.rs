//! Keyword classification and display-body extraction.

use super::AlertCategory;

/// Marker introducing the human-readable part of a message.
pub const DETAILS_MARKER: &str = "DETAILS:";
/// Ends a `DETAILS:` segment.
pub const SEGMENT_DELIMITER: char = '|';

/// Keyword table in evaluation order.  All-clear must come first so a
/// message such as "FIRE ... ALL CLEAR" clears rather than alerts.
const KEYWORDS: &[(&str, AlertCategory)] = &[
    ("ALL CLEAR", AlertCategory::AllClear),
    ("ALLCLEAR", AlertCategory::AllClear),
    ("FIRE", AlertCategory::Fire),
    ("FLOOD", AlertCategory::Flood),
    ("MEDICAL", AlertCategory::Medical),
    ("HAZMAT", AlertCategory::Hazmat),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification<'a> {
    pub category: AlertCategory,
    /// Text for the second display row; borrows from the message.
    pub body: &'a str,
}

/// Classify `text` into exactly one category and pick its display body.
pub fn classify(text: &str) -> Classification<'_> {
    Classification {
        category: category_of(text),
        body: display_body(text),
    }
}

pub fn category_of(text: &str) -> AlertCategory {
    let upper = text.to_ascii_uppercase();
    KEYWORDS
        .iter()
        .find(|(kw, _)| upper.contains(kw))
        .map_or(AlertCategory::Generic, |&(_, cat)| cat)
}

/// The trimmed `DETAILS:` segment, or the whole message when the marker is
/// absent or the segment is empty.
pub fn display_body(text: &str) -> &str {
    let Some(idx) = text.find(DETAILS_MARKER) else {
        return text;
    };
    let rest = &text[idx + DETAILS_MARKER.len()..];
    let segment = rest.split(SEGMENT_DELIMITER).next().unwrap_or("").trim();
    if segment.is_empty() { text } else { segment }
}
