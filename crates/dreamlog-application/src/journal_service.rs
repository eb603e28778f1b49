//! Journal service.
//!
//! Orchestrates the flow the presentation layer drives: the auth gate
//! establishes a user id, entries are read through the injected repository
//! and converted for display, and a new submission is interpreted and then
//! persisted to whichever store is active.

use dreamlog_core::auth::AuthService;
use dreamlog_core::config::AppConfig;
use dreamlog_core::entry::{DRAFT_INTERPRETATION, EntryRepository, EntryView, JournalEntry};
use dreamlog_core::{DreamlogError, Result};
use dreamlog_infrastructure::{JsonFileEntryRepository, RemoteEntryClient};
use dreamlog_interaction::{FALLBACK_INTERPRETATION, Interpreter};
use std::sync::Arc;

/// A user submission, before it becomes a stored entry.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    /// Optional explicit title; derived from the body when absent
    pub title: Option<String>,
    pub body: String,
    pub mood: Option<String>,
    pub tags: Vec<String>,
}

impl NewEntry {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }
}

/// Result of submitting an entry.
///
/// Submission succeeds even when the interpretation call fails: the entry is
/// persisted as a draft and the interpreter's error message travels alongside
/// it for the presentation layer to render.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub entry: JournalEntry,
    pub interpretation_error: Option<String>,
}

impl SubmissionOutcome {
    /// Interpretation text to show: the real interpretation, or the fixed
    /// fallback when the interpretation call failed.
    pub fn display_interpretation(&self) -> &str {
        if self.interpretation_error.is_some() {
            return FALLBACK_INTERPRETATION;
        }
        self.entry
            .interpretation
            .as_deref()
            .unwrap_or(DRAFT_INTERPRETATION)
    }
}

/// A string-level interpretation result for presentation code.
#[derive(Debug, Clone)]
pub struct InterpretationOutcome {
    /// Interpretation prose, or the fixed fallback text on failure
    pub text: String,
    pub error: Option<String>,
}

/// Use case service for the journal screens.
///
/// One instance per session context; all collaborators are injected, and the
/// storage backend (on-device file vs. remote collection) is chosen by which
/// repository the caller wires in.
pub struct JournalService {
    repository: Arc<dyn EntryRepository>,
    interpreter: Arc<dyn Interpreter>,
    auth: Arc<dyn AuthService>,
}

impl JournalService {
    /// Creates a service over an explicit repository.
    pub fn new(
        repository: Arc<dyn EntryRepository>,
        interpreter: Arc<dyn Interpreter>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            repository,
            interpreter,
            auth,
        }
    }

    /// Convenience constructor wiring the on-device JSON store.
    pub fn with_local_store(
        interpreter: Arc<dyn Interpreter>,
        auth: Arc<dyn AuthService>,
    ) -> Result<Self> {
        let repository = JsonFileEntryRepository::default_location()?;
        Ok(Self::new(Arc::new(repository), interpreter, auth))
    }

    /// Convenience constructor wiring the remote document store.
    pub fn with_remote_store(
        base_url: impl Into<String>,
        interpreter: Arc<dyn Interpreter>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        let repository = RemoteEntryClient::new(base_url, Arc::clone(&auth));
        Self::new(Arc::new(repository), interpreter, auth)
    }

    /// Picks the backend from the app configuration: the remote collection
    /// when one is configured, the on-device file store otherwise.
    pub fn from_app_config(
        config: &AppConfig,
        interpreter: Arc<dyn Interpreter>,
        auth: Arc<dyn AuthService>,
    ) -> Result<Self> {
        match &config.remote {
            Some(remote) => Ok(Self::with_remote_store(
                remote.base_url.clone(),
                interpreter,
                auth,
            )),
            None => Self::with_local_store(interpreter, auth),
        }
    }

    fn require_owner(&self) -> Result<String> {
        self.auth
            .current_user_id()
            .ok_or_else(|| DreamlogError::auth("No user is signed in"))
    }

    fn build_entry(owner_id: &str, new_entry: &NewEntry) -> Result<JournalEntry> {
        if new_entry.body.trim().is_empty() {
            return Err(DreamlogError::invalid_input("entry body must not be empty"));
        }

        let mut entry = JournalEntry::new(
            owner_id,
            new_entry.title.clone().unwrap_or_default(),
            new_entry.body.clone(),
        )
        .with_tags(new_entry.tags.clone());
        if let Some(mood) = &new_entry.mood {
            entry.set_mood(mood.as_str());
        }
        Ok(entry)
    }

    /// Submits a new entry: interprets the body, then persists the combined
    /// record.
    ///
    /// When the interpretation call fails the entry is saved as a draft
    /// (placeholder interpretation, `is_interpreted = false`) and the error
    /// message is carried in the outcome; the submission itself still
    /// succeeds.
    pub async fn submit(&self, new_entry: NewEntry) -> Result<SubmissionOutcome> {
        let owner_id = self.require_owner()?;
        let mut entry = Self::build_entry(&owner_id, &new_entry)?;

        let interpretation_error = match self.interpreter.interpret(&entry.body).await {
            Ok(text) => {
                entry.attach_interpretation(text, None, Vec::new());
                None
            }
            Err(err) => {
                tracing::warn!("interpretation failed, saving draft: {}", err);
                entry.interpretation = Some(DRAFT_INTERPRETATION.to_string());
                Some(err.to_string())
            }
        };

        self.repository.add(&entry).await?;
        Ok(SubmissionOutcome {
            entry,
            interpretation_error,
        })
    }

    /// Saves an explicit draft without calling the interpreter.
    pub async fn save_draft(&self, new_entry: NewEntry) -> Result<JournalEntry> {
        let owner_id = self.require_owner()?;
        let mut entry = Self::build_entry(&owner_id, &new_entry)?;
        entry.interpretation = Some(DRAFT_INTERPRETATION.to_string());

        self.repository.add(&entry).await?;
        Ok(entry)
    }

    /// Interprets a stored draft and persists the transition.
    ///
    /// An already-interpreted entry is returned unchanged; the interpreter is
    /// not called twice for the same entry.
    pub async fn interpret_draft(&self, entry_id: &str) -> Result<JournalEntry> {
        let mut entry = self.fetch_owned(entry_id).await?;
        if entry.is_interpreted {
            return Ok(entry);
        }

        let text = self.interpreter.interpret(&entry.body).await?;
        entry.attach_interpretation(text, None, Vec::new());
        self.repository.update(&entry).await?;

        Ok(entry)
    }

    /// The current user's entries, converted for display.
    pub async fn entries(&self) -> Result<Vec<EntryView>> {
        let owner_id = self.require_owner()?;
        let entries = self.repository.fetch_by_owner(&owner_id).await?;
        Ok(entries.iter().map(EntryView::from).collect())
    }

    /// Renames a stored entry.
    pub async fn rename_entry(&self, entry_id: &str, title: &str) -> Result<JournalEntry> {
        let mut entry = self.fetch_owned(entry_id).await?;
        entry.rename(title);
        self.repository.update(&entry).await?;
        Ok(entry)
    }

    /// Updates a stored entry's mood word.
    pub async fn set_entry_mood(&self, entry_id: &str, mood: &str) -> Result<JournalEntry> {
        let mut entry = self.fetch_owned(entry_id).await?;
        entry.set_mood(mood);
        self.repository.update(&entry).await?;
        Ok(entry)
    }

    /// Deletes an entry of the current user, irreversibly. Deleting an id
    /// that is already gone is a no-op.
    pub async fn delete_entry(&self, entry_id: &str) -> Result<()> {
        let owner_id = self.require_owner()?;
        let owned = self.repository.fetch_by_owner(&owner_id).await?;
        if !owned.iter().any(|entry| entry.id == entry_id) {
            return Ok(());
        }

        self.repository.delete_by_id(entry_id).await
    }

    /// Interprets free text for immediate display, substituting the fixed
    /// fallback string on failure instead of surfacing an error.
    pub async fn interpret_for_display(&self, text: &str) -> InterpretationOutcome {
        match self.interpreter.interpret(text).await {
            Ok(interpretation) => InterpretationOutcome {
                text: interpretation,
                error: None,
            },
            Err(err) => {
                tracing::warn!("interpretation failed: {}", err);
                InterpretationOutcome {
                    text: FALLBACK_INTERPRETATION.to_string(),
                    error: Some(err.to_string()),
                }
            }
        }
    }

    async fn fetch_owned(&self, entry_id: &str) -> Result<JournalEntry> {
        let owner_id = self.require_owner()?;
        self.repository
            .fetch_by_owner(&owner_id)
            .await?
            .into_iter()
            .find(|entry| entry.id == entry_id)
            .ok_or_else(|| DreamlogError::not_found("journal_entry", entry_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use dreamlog_core::auth::AuthSession;
    use tempfile::TempDir;

    struct MockAuth {
        session: Option<AuthSession>,
    }

    impl MockAuth {
        fn signed_in(user_id: &str) -> Arc<Self> {
            Arc::new(Self {
                session: Some(AuthSession {
                    user_id: user_id.to_string(),
                    email: format!("{user_id}@example.com"),
                    id_token: "token".to_string(),
                }),
            })
        }

        fn signed_out() -> Arc<Self> {
            Arc::new(Self { session: None })
        }
    }

    #[async_trait]
    impl AuthService for MockAuth {
        async fn sign_in(&self, _email: &str, _password: &str) -> Result<AuthSession> {
            Err(DreamlogError::internal("not supported in this mock"))
        }

        async fn sign_up(
            &self,
            _email: &str,
            _password: &str,
            _username: Option<&str>,
        ) -> Result<AuthSession> {
            Err(DreamlogError::internal("not supported in this mock"))
        }

        async fn sign_out(&self) {}

        async fn request_password_reset(&self, _email: &str) -> Result<()> {
            Ok(())
        }

        fn session(&self) -> Option<AuthSession> {
            self.session.clone()
        }
    }

    struct MockInterpreter {
        reply: Result<String>,
    }

    impl MockInterpreter {
        fn returning(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(DreamlogError::interpretation("provider returned 500")),
            })
        }
    }

    #[async_trait]
    impl Interpreter for MockInterpreter {
        async fn interpret(&self, _entry_text: &str) -> Result<String> {
            self.reply.clone()
        }
    }

    fn service_in(
        dir: &TempDir,
        interpreter: Arc<dyn Interpreter>,
        auth: Arc<dyn AuthService>,
    ) -> (JournalService, Arc<JsonFileEntryRepository>) {
        let repository =
            Arc::new(JsonFileEntryRepository::new(dir.path().join("entries.json")).unwrap());
        let service = JournalService::new(
            Arc::clone(&repository) as Arc<dyn EntryRepository>,
            interpreter,
            auth,
        );
        (service, repository)
    }

    #[tokio::test]
    async fn test_submit_persists_interpreted_entry() {
        let dir = TempDir::new().unwrap();
        let (service, repository) = service_in(
            &dir,
            MockInterpreter::returning("Flying symbolizes freedom."),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service
            .submit(NewEntry::with_body("I was flying over a city"))
            .await
            .unwrap();

        assert!(outcome.interpretation_error.is_none());
        assert_eq!(outcome.display_interpretation(), "Flying symbolizes freedom.");

        let stored = repository.fetch_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].body, "I was flying over a city");
        assert_eq!(
            stored[0].interpretation.as_deref(),
            Some("Flying symbolizes freedom.")
        );
        assert!(stored[0].is_interpreted);
        assert!(stored[0].interpretation_consistent());
    }

    #[tokio::test]
    async fn test_submit_saves_draft_when_interpretation_fails() {
        let dir = TempDir::new().unwrap();
        let (service, repository) = service_in(
            &dir,
            MockInterpreter::failing(),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service
            .submit(NewEntry::with_body("I was falling"))
            .await
            .unwrap();

        assert!(outcome.interpretation_error.is_some());
        assert_eq!(outcome.display_interpretation(), FALLBACK_INTERPRETATION);

        let stored = repository.fetch_all().unwrap();
        assert!(!stored[0].is_interpreted);
        assert_eq!(stored[0].interpretation.as_deref(), Some(DRAFT_INTERPRETATION));
    }

    #[tokio::test]
    async fn test_submit_requires_authentication() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service_in(
            &dir,
            MockInterpreter::returning("x"),
            MockAuth::signed_out(),
        );

        let err = service
            .submit(NewEntry::with_body("body"))
            .await
            .unwrap_err();
        assert!(err.is_auth());
    }

    #[tokio::test]
    async fn test_submit_rejects_empty_body() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service_in(
            &dir,
            MockInterpreter::returning("x"),
            MockAuth::signed_in("user-1"),
        );

        let err = service
            .submit(NewEntry::with_body("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, DreamlogError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_draft_to_interpreted_transition_is_persisted() {
        let dir = TempDir::new().unwrap();
        let (service, repository) = service_in(
            &dir,
            MockInterpreter::returning("Mazes reflect indecision."),
            MockAuth::signed_in("user-1"),
        );

        let draft = service
            .save_draft(NewEntry::with_body("Lost in a maze"))
            .await
            .unwrap();
        assert!(!draft.is_interpreted);
        assert_eq!(draft.interpretation.as_deref(), Some(DRAFT_INTERPRETATION));

        let interpreted = service.interpret_draft(&draft.id).await.unwrap();
        assert!(interpreted.is_interpreted);

        let stored = repository.fetch_all().unwrap();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].is_interpreted);
        assert_eq!(
            stored[0].interpretation.as_deref(),
            Some("Mazes reflect indecision.")
        );
        assert!(stored[0].interpretation_consistent());
    }

    #[tokio::test]
    async fn test_interpret_draft_skips_interpreted_entries() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service_in(
            &dir,
            MockInterpreter::returning("first"),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service
            .submit(NewEntry::with_body("a dream"))
            .await
            .unwrap();

        let again = service.interpret_draft(&outcome.entry.id).await.unwrap();
        assert_eq!(again.interpretation.as_deref(), Some("first"));
    }

    #[tokio::test]
    async fn test_entries_are_scoped_to_the_current_user() {
        let dir = TempDir::new().unwrap();
        let repository =
            Arc::new(JsonFileEntryRepository::new(dir.path().join("entries.json")).unwrap());

        let alice_service = JournalService::new(
            Arc::clone(&repository) as Arc<dyn EntryRepository>,
            MockInterpreter::returning("x"),
            MockAuth::signed_in("alice"),
        );
        let bob_service = JournalService::new(
            Arc::clone(&repository) as Arc<dyn EntryRepository>,
            MockInterpreter::returning("x"),
            MockAuth::signed_in("bob"),
        );

        alice_service
            .submit(NewEntry::with_body("alice dream"))
            .await
            .unwrap();
        bob_service
            .submit(NewEntry::with_body("bob dream"))
            .await
            .unwrap();

        let views = alice_service.entries().await.unwrap();
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].preview, "alice dream");
    }

    #[tokio::test]
    async fn test_rename_and_mood_edits_are_persisted() {
        let dir = TempDir::new().unwrap();
        let (service, repository) = service_in(
            &dir,
            MockInterpreter::returning("x"),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service
            .submit(NewEntry::with_body("a dream"))
            .await
            .unwrap();

        service
            .rename_entry(&outcome.entry.id, "Renamed")
            .await
            .unwrap();
        service
            .set_entry_mood(&outcome.entry.id, "peaceful")
            .await
            .unwrap();

        let stored = repository.fetch_all().unwrap();
        assert_eq!(stored[0].title, "Renamed");
        assert_eq!(stored[0].mood, "peaceful");
    }

    #[tokio::test]
    async fn test_delete_entry_is_idempotent_and_owner_scoped() {
        let dir = TempDir::new().unwrap();
        let (service, repository) = service_in(
            &dir,
            MockInterpreter::returning("x"),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service
            .submit(NewEntry::with_body("a dream"))
            .await
            .unwrap();

        service.delete_entry(&outcome.entry.id).await.unwrap();
        service.delete_entry(&outcome.entry.id).await.unwrap();

        assert!(repository.fetch_all().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_interpret_for_display_falls_back_on_failure() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service_in(
            &dir,
            MockInterpreter::failing(),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service.interpret_for_display("a dream").await;

        assert_eq!(outcome.text, FALLBACK_INTERPRETATION);
        assert!(outcome.error.as_deref().unwrap().contains("provider returned 500"));
    }

    #[tokio::test]
    async fn test_interpret_for_display_success() {
        let dir = TempDir::new().unwrap();
        let (service, _) = service_in(
            &dir,
            MockInterpreter::returning("Flying symbolizes freedom."),
            MockAuth::signed_in("user-1"),
        );

        let outcome = service.interpret_for_display("I was flying").await;

        assert_eq!(outcome.text, "Flying symbolizes freedom.");
        assert!(outcome.error.is_none());
    }
}
