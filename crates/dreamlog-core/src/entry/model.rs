//! Journal entry domain model.
//!
//! This module contains the canonical `JournalEntry` record that both storage
//! backends persist and that presentation code derives its view models from.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder interpretation carried by entries saved before an
/// interpretation has completed.
pub const DRAFT_INTERPRETATION: &str = "Draft — no interpretation yet";

/// Number of words taken from the body when auto-deriving a title.
const TITLE_WORDS: usize = 6;

/// A dream symbol extracted alongside an interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DreamSymbol {
    /// The symbol that appeared in the dream (e.g. "water")
    pub symbol: String,
    /// What the interpretation says the symbol stands for
    pub meaning: String,
}

/// The canonical persisted journal-entry record.
///
/// An entry is created on user submission, either fully interpreted or as a
/// draft carrying [`DRAFT_INTERPRETATION`]. After creation only the
/// interpretation-related fields and the `title`/`mood` pair may change.
/// The durable copy is owned by whichever store persisted it; in-memory
/// instances are disposable and rebuilt on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry identifier (UUID format), immutable
    pub id: String,
    /// Identifier of the owning user, immutable; partitions all queries
    pub owner_id: String,
    /// Human-readable title, user-supplied or derived from the body
    pub title: String,
    /// Free-text dream content; required non-empty to be saved
    pub body: String,
    /// Ordered tags, may be empty
    #[serde(default)]
    pub tags: Vec<String>,
    /// Mood word; free-form at storage time, see [`crate::entry::mood`]
    #[serde(default)]
    pub mood: String,
    /// Timestamp set once at creation, never modified
    pub created_at: DateTime<Utc>,
    /// True once an interpretation has been attached
    #[serde(default)]
    pub is_interpreted: bool,
    /// Interpretation text, or the draft placeholder until one completes
    #[serde(default)]
    pub interpretation: Option<String>,
    /// Auxiliary advice text attached alongside the interpretation
    #[serde(default)]
    pub guidance: Option<String>,
    /// Symbols surfaced by the interpretation; empty until one completes
    #[serde(default)]
    pub symbols: Vec<DreamSymbol>,
}

impl JournalEntry {
    /// Creates a new, not-yet-interpreted entry.
    ///
    /// An empty `title` is replaced by one derived from the first words of
    /// the body.
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        let body = body.into();
        let title = title.into();
        let title = if title.trim().is_empty() {
            derive_title(&body)
        } else {
            title
        };

        Self {
            id: Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            title,
            body,
            tags: Vec::new(),
            mood: String::new(),
            created_at: Utc::now(),
            is_interpreted: false,
            interpretation: None,
            guidance: None,
            symbols: Vec::new(),
        }
    }

    /// Creates an explicit draft: auto-derived title and the placeholder
    /// interpretation text.
    pub fn draft(owner_id: impl Into<String>, body: impl Into<String>) -> Self {
        let mut entry = Self::new(owner_id, "", body);
        entry.interpretation = Some(DRAFT_INTERPRETATION.to_string());
        entry
    }

    /// Builder-style tag assignment.
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Builder-style mood assignment.
    pub fn with_mood(mut self, mood: impl Into<String>) -> Self {
        self.mood = mood.into();
        self
    }

    /// Attaches a completed interpretation, transitioning a draft into an
    /// interpreted entry.
    pub fn attach_interpretation(
        &mut self,
        interpretation: impl Into<String>,
        guidance: Option<String>,
        symbols: Vec<DreamSymbol>,
    ) {
        self.interpretation = Some(interpretation.into());
        self.guidance = guidance;
        self.symbols = symbols;
        self.is_interpreted = true;
    }

    /// Renames the entry. Title is one of the two fields editable after
    /// creation.
    pub fn rename(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Updates the mood word.
    pub fn set_mood(&mut self, mood: impl Into<String>) {
        self.mood = mood.into();
    }

    /// True while the entry still awaits an interpretation.
    pub fn is_draft(&self) -> bool {
        !self.is_interpreted
    }

    /// Checks the interpretation invariant: `is_interpreted` implies a
    /// present interpretation that is not the draft placeholder.
    pub fn interpretation_consistent(&self) -> bool {
        if !self.is_interpreted {
            return true;
        }
        match self.interpretation.as_deref() {
            Some(text) => text != DRAFT_INTERPRETATION,
            None => false,
        }
    }
}

/// Derives a display title from the first few words of the body.
pub fn derive_title(body: &str) -> String {
    let words: Vec<&str> = body.split_whitespace().take(TITLE_WORDS).collect();
    if words.is_empty() {
        return "Untitled dream".to_string();
    }
    let mut title = words.join(" ");
    if body.split_whitespace().count() > TITLE_WORDS {
        title.push('…');
    }
    title
}
