pub mod journal_service;

pub use journal_service::{InterpretationOutcome, JournalService, NewEntry, SubmissionOutcome};
