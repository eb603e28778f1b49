//! Journal entry domain: model, mood vocabulary, view conversion, and the
//! repository contract.

pub mod model;
pub mod mood;
pub mod repository;
pub mod view;

pub use model::{DRAFT_INTERPRETATION, DreamSymbol, JournalEntry, derive_title};
pub use repository::EntryRepository;
pub use view::EntryView;
