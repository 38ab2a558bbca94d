//! The progress store.
//!
//! Every read and write of the persisted record goes through here, and the
//! schema is enforced on both sides of the storage boundary. Failures are
//! reported to telemetry and recovered locally: loads fall back to the
//! default record, saves leave storage untouched and return `Err`.
//!
//! `update_answer`, `view_narrative` and `complete_journey` are independent
//! read-modify-write cycles with no compare-and-swap. Two stores sharing one
//! storage medium can clobber each other's writes; the journey assumes a
//! single active session.

use std::fmt;
use std::sync::Arc;

use journey_core::error::JourneyError;
use journey_core::storage::StoragePort;
use journey_core::telemetry::{Direction, Telemetry};

use crate::domain::progress::Progress;

/// Storage key under which the progress document is kept.
pub const PROGRESS_STORAGE_KEY: &str = "discovery-journey-progress";

/// Validates, persists and loads the single `Progress` record.
#[derive(Clone)]
pub struct ProgressStore {
    storage: Arc<dyn StoragePort>,
    telemetry: Telemetry,
}

impl fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressStore")
            .field("key", &PROGRESS_STORAGE_KEY)
            .finish_non_exhaustive()
    }
}

impl ProgressStore {
    /// Create a store over `storage`, reporting failures to `telemetry`.
    #[must_use]
    pub fn new(storage: Arc<dyn StoragePort>, telemetry: Telemetry) -> Self {
        Self { storage, telemetry }
    }

    /// The telemetry reporter this store uses.
    #[must_use]
    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    /// Loads the stored record, or the default record if nothing is stored or
    /// the stored value is unreadable or invalid.
    pub fn load(&self) -> Progress {
        match self.try_load() {
            Ok(progress) => progress,
            Err(err) => {
                tracing::warn!(error = %err, "falling back to default progress");
                self.telemetry
                    .report("loadProgress", Some(Direction::Incoming), &err);
                Progress::default()
            }
        }
    }

    fn try_load(&self) -> Result<Progress, JourneyError> {
        match self.storage.load(PROGRESS_STORAGE_KEY)? {
            Some(raw) => Progress::from_json(&raw),
            None => Ok(Progress::default()),
        }
    }

    /// Validates and persists `progress`, returning the validated record.
    ///
    /// # Errors
    ///
    /// Returns the validation or storage error if the record was not
    /// persisted. The error has already been reported; callers should treat
    /// the change as not durable.
    pub fn save(&self, progress: &Progress) -> Result<Progress, JourneyError> {
        let result = progress.clone().validate().and_then(|validated| {
            self.storage
                .save(PROGRESS_STORAGE_KEY, &validated.to_json()?)?;
            Ok(validated)
        });
        if let Err(err) = &result {
            tracing::warn!(error = %err, "progress not saved");
            self.telemetry
                .report("saveProgress", Some(Direction::Outgoing), err);
        }
        result
    }

    /// Erases the stored record and returns the default record.
    ///
    /// If the key cannot be cleared it is overwritten with the default
    /// record instead, so the next load does not bring the old progress back.
    pub fn reset(&self) -> Progress {
        let defaults = Progress::default();
        if let Err(err) = self.storage.clear(PROGRESS_STORAGE_KEY) {
            tracing::warn!(error = %err, "stored progress could not be cleared; overwriting");
            self.telemetry.report("resetProgress", None, &err);
            if self.save(&defaults).is_err() {
                tracing::warn!("stored progress could not be overwritten either");
            }
        }
        tracing::info!("progress reset");
        defaults
    }

    /// Records `answer` for `question_id` and advances to the next question.
    ///
    /// # Errors
    ///
    /// Returns the save error if the change is not durable.
    pub fn update_answer(&self, question_id: u32, answer: &str) -> Result<Progress, JourneyError> {
        let progress = self.load();
        self.save(&progress.with_answer(question_id, answer))
    }

    /// Marks `narrative_key` viewed. Viewing an already-viewed narrative is a
    /// no-op that returns the stored record without saving.
    ///
    /// # Errors
    ///
    /// Returns the save error if the change is not durable.
    pub fn view_narrative(&self, narrative_key: &str) -> Result<Progress, JourneyError> {
        let progress = self.load();
        if progress.has_viewed(narrative_key) {
            return Ok(progress);
        }
        self.save(&progress.with_viewed_narrative(narrative_key))
    }

    /// Marks the journey completed.
    ///
    /// # Errors
    ///
    /// Returns the save error if the change is not durable.
    pub fn complete_journey(&self) -> Result<Progress, JourneyError> {
        let progress = self.load();
        self.save(&progress.completed_journey())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use journey_core::error::{FailureKind, JourneyError};
    use journey_core::telemetry::Direction;
    use journey_test_support::{
        FailingStorage, InMemoryStorage, RecordingTelemetry, UnclearableStorage,
    };

    use super::{PROGRESS_STORAGE_KEY, ProgressStore};
    use crate::domain::progress::Progress;

    fn store_over(storage: &InMemoryStorage) -> (ProgressStore, Arc<RecordingTelemetry>) {
        let (sink, telemetry) = RecordingTelemetry::new();
        (
            ProgressStore::new(Arc::new(storage.clone()), telemetry),
            sink,
        )
    }

    #[test]
    fn test_load_returns_default_when_nothing_stored() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (store, sink) = store_over(&storage);

        // Act
        let progress = store.load();

        // Assert
        assert_eq!(progress, Progress::default());
        assert!(sink.reports().is_empty());
    }

    #[test]
    fn test_load_after_save_round_trips() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);
        let progress = Progress::default()
            .with_answer(1, "A")
            .with_viewed_narrative("n2")
            .with_answer(2, "C");

        // Act
        let saved = store.save(&progress).unwrap();
        let loaded = store.load();

        // Assert
        assert_eq!(saved, progress);
        assert_eq!(loaded, saved);
    }

    #[test]
    fn test_load_reports_and_defaults_on_invalid_document() {
        // Arrange
        let storage = InMemoryStorage::with_value(PROGRESS_STORAGE_KEY, r#"{"currentQuestionId":0}"#);
        let (store, sink) = store_over(&storage);

        // Act
        let progress = store.load();

        // Assert
        assert_eq!(progress, Progress::default());
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].kind, FailureKind::SchemaValidation);
        assert_eq!(reports[0].action, "loadProgress");
        assert_eq!(reports[0].direction, Some(Direction::Incoming));
    }

    #[test]
    fn test_load_reports_and_defaults_on_storage_failure() {
        let (sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(FailingStorage), telemetry);

        let progress = store.load();

        assert_eq!(progress, Progress::default());
        assert_eq!(sink.kinds(), vec![FailureKind::StorageAccess]);
    }

    #[test]
    fn test_save_rejects_invalid_record_without_persisting() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (store, sink) = store_over(&storage);
        let invalid = Progress {
            current_question_id: 0,
            ..Progress::default()
        };

        // Act
        let result = store.save(&invalid);

        // Assert
        assert!(matches!(result, Err(JourneyError::SchemaValidation(_))));
        assert!(storage.value(PROGRESS_STORAGE_KEY).is_none());
        let reports = sink.reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].action, "saveProgress");
        assert_eq!(reports[0].direction, Some(Direction::Outgoing));
    }

    #[test]
    fn test_save_returns_coerced_record() {
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);
        let mut progress = Progress::default();
        progress.viewed_narratives.push("intro".to_owned());

        let saved = store.save(&progress).unwrap();

        assert_eq!(saved.viewed_narratives, vec!["intro".to_owned()]);
    }

    #[test]
    fn test_save_reports_storage_failure() {
        let (sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(FailingStorage), telemetry);

        let result = store.save(&Progress::default());

        assert!(matches!(result, Err(JourneyError::StorageAccess(_))));
        assert_eq!(sink.kinds(), vec![FailureKind::StorageAccess]);
    }

    #[test]
    fn test_reset_erases_stored_record() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);
        store.update_answer(1, "A").unwrap();
        store.complete_journey().unwrap();

        // Act
        let progress = store.reset();

        // Assert
        assert_eq!(progress, Progress::default());
        assert!(storage.value(PROGRESS_STORAGE_KEY).is_none());
        assert_eq!(store.load(), Progress::default());
    }

    #[test]
    fn test_reset_reports_clear_failure_but_returns_default() {
        let (sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(FailingStorage), telemetry);

        let progress = store.reset();

        assert_eq!(progress, Progress::default());
        let reports = sink.reports();
        assert_eq!(reports[0].action, "resetProgress");
        assert_eq!(reports[1].action, "saveProgress");
    }

    #[test]
    fn test_reset_overwrites_record_when_clear_fails() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(
            Arc::new(UnclearableStorage::new(storage.clone())),
            telemetry,
        );
        store.update_answer(1, "A").unwrap();
        store.complete_journey().unwrap();

        // Act
        let progress = store.reset();

        // Assert
        assert_eq!(progress, Progress::default());
        assert_eq!(store.load(), Progress::default());
        assert_eq!(
            Progress::from_json(&storage.value(PROGRESS_STORAGE_KEY).unwrap()).unwrap(),
            Progress::default()
        );
        assert_eq!(sink.kinds(), vec![FailureKind::StorageAccess]);
    }

    #[test]
    fn test_view_narrative_after_failed_clear_does_not_resurrect_progress() {
        let storage = InMemoryStorage::new();
        let (_sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(UnclearableStorage::new(storage)), telemetry);
        store.update_answer(1, "A").unwrap();
        store.complete_journey().unwrap();
        store.reset();

        let progress = store.view_narrative("intro").unwrap();

        assert_eq!(progress, Progress::default());
        assert!(!progress.completed);
    }

    #[test]
    fn test_update_answer_records_answer_and_advances() {
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);

        let progress = store.update_answer(1, "B").unwrap();

        assert_eq!(progress.current_question_id, 2);
        assert_eq!(progress.answer_for(1), Some("B"));
        assert_eq!(store.load(), progress);
    }

    #[test]
    fn test_view_narrative_twice_is_a_no_op() {
        // Arrange
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);

        // Act
        let first = store.view_narrative("n2").unwrap();
        let saves_after_first = storage.save_count();
        let second = store.view_narrative("n2").unwrap();

        // Assert
        assert_eq!(first, second);
        assert_eq!(
            second.viewed_narratives,
            vec!["intro".to_owned(), "n2".to_owned()]
        );
        assert_eq!(storage.save_count(), saves_after_first);
    }

    #[test]
    fn test_view_narrative_intro_on_fresh_store_does_not_save() {
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);

        let progress = store.view_narrative("intro").unwrap();

        assert_eq!(progress, Progress::default());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn test_complete_journey_sets_completed() {
        let storage = InMemoryStorage::new();
        let (store, _sink) = store_over(&storage);
        store.update_answer(1, "A").unwrap();

        let progress = store.complete_journey().unwrap();

        assert!(progress.completed);
        assert_eq!(progress.answer_for(1), Some("A"));
        assert!(store.load().completed);
    }

    #[test]
    fn test_update_answer_on_failing_storage_is_not_durable() {
        let (sink, telemetry) = RecordingTelemetry::new();
        let store = ProgressStore::new(Arc::new(FailingStorage), telemetry);

        let result = store.update_answer(1, "A");

        assert!(result.is_err());
        // One report for the failed load, one for the failed save.
        assert_eq!(
            sink.kinds(),
            vec![FailureKind::StorageAccess, FailureKind::StorageAccess]
        );
    }

    #[test]
    fn test_stale_save_clobbers_concurrent_write() {
        // Two sessions over the same medium: the second writer wins.
        let storage = InMemoryStorage::new();
        let (tab_a, _) = store_over(&storage);
        let (tab_b, _) = store_over(&storage);
        let stale = tab_a.load();

        tab_b.update_answer(1, "B").unwrap();
        tab_a.save(&stale.with_viewed_narrative("n2")).unwrap();

        let progress = tab_b.load();
        assert_eq!(progress.current_question_id, 1);
        assert!(progress.answers.is_empty());
        assert!(progress.has_viewed("n2"));
    }
}
