//! Display-facing entry view model.
//!
//! Conversion from the persisted record is pure and infallible: malformed or
//! empty fields propagate as defaults, never as errors. View instances are
//! disposable; the store owns the durable copy.

use super::model::{DRAFT_INTERPRETATION, DreamSymbol, JournalEntry};

/// Maximum number of characters kept in the body preview.
const PREVIEW_CHARS: usize = 80;

/// A journal entry shaped for presentation.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryView {
    pub id: String,
    pub title: String,
    /// Short prefix of the body for list rows
    pub preview: String,
    /// Creation date formatted for display (e.g. "2026-08-04")
    pub date_created: String,
    pub tags: Vec<String>,
    pub mood: String,
    /// Interpretation text; the draft placeholder stands in when absent
    pub interpretation: String,
    pub guidance: Option<String>,
    pub symbols: Vec<DreamSymbol>,
    pub is_interpreted: bool,
}

impl From<&JournalEntry> for EntryView {
    fn from(entry: &JournalEntry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            preview: preview_of(&entry.body),
            date_created: entry.created_at.format("%Y-%m-%d").to_string(),
            tags: entry.tags.clone(),
            mood: entry.mood.clone(),
            interpretation: entry
                .interpretation
                .clone()
                .unwrap_or_else(|| DRAFT_INTERPRETATION.to_string()),
            guidance: entry.guidance.clone(),
            symbols: entry.symbols.clone(),
            is_interpreted: entry.is_interpreted,
        }
    }
}

/// Truncates the body to a short single-line preview on a character boundary.
fn preview_of(body: &str) -> String {
    let line = body.lines().next().unwrap_or("");
    if line.chars().count() <= PREVIEW_CHARS {
        return line.to_string();
    }
    let truncated: String = line.chars().take(PREVIEW_CHARS).collect();
    format!("{truncated}…")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_passes_fields_through() {
        let mut entry = JournalEntry::new("u", "Night flight", "I was flying over a city")
            .with_tags(vec!["flying".to_string()])
            .with_mood("positive");
        entry.attach_interpretation("Flying symbolizes freedom.", None, Vec::new());

        let view = EntryView::from(&entry);

        assert_eq!(view.id, entry.id);
        assert_eq!(view.title, "Night flight");
        assert_eq!(view.preview, "I was flying over a city");
        assert_eq!(view.tags, vec!["flying".to_string()]);
        assert_eq!(view.mood, "positive");
        assert_eq!(view.interpretation, "Flying symbolizes freedom.");
        assert!(view.is_interpreted);
    }

    #[test]
    fn test_view_substitutes_placeholder_for_missing_interpretation() {
        let entry = JournalEntry::new("u", "t", "b");
        let view = EntryView::from(&entry);

        assert_eq!(view.interpretation, DRAFT_INTERPRETATION);
        assert!(!view.is_interpreted);
    }

    #[test]
    fn test_preview_truncation() {
        let long_body = "x".repeat(200);
        let view = EntryView::from(&JournalEntry::new("u", "t", long_body));

        assert_eq!(view.preview.chars().count(), 81); // 80 + ellipsis
        assert!(view.preview.ends_with('…'));
    }

    #[test]
    fn test_preview_uses_first_line_only() {
        let entry = JournalEntry::new("u", "t", "first line\nsecond line");
        assert_eq!(EntryView::from(&entry).preview, "first line");
    }

    #[test]
    fn test_date_created_format() {
        let mut entry = JournalEntry::new("u", "t", "b");
        entry.created_at = "2026-08-04T12:30:00Z".parse().unwrap();

        assert_eq!(EntryView::from(&entry).date_created, "2026-08-04");
    }
}
