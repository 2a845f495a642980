//! Habit store
//!
//! The `HabitStore` owns the canonical habit collection and the status of
//! the load operation. It is an explicit object handed to whoever needs it;
//! there is no global instance.
//!
//! ## Concurrency
//!
//! All methods take `&self`. Synchronous operations (add, remove, toggle)
//! hold the state lock only for their own duration, so they can run while a
//! load is waiting on its source. When that load settles it replaces the
//! collection wholesale, discarding any edits made in the meantime.
//! Overlapping loads are not deduplicated: each applies when it settles, so
//! the last one to settle wins.
//!
//! ## Usage
//!
//! ```ignore
//! let store = HabitStore::new(JsonFileSource::new(config.habits_path()));
//! store.load().await?;
//!
//! let habit = store.add("Drink water", Frequency::Daily)?;
//! store.toggle_completion(habit.id, today)?;
//!
//! let rate = metrics::completion_rate(&store.habits(), today);
//! ```

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{HabitError, HabitResult, LoadError};
use crate::models::{validate_name, Frequency, Habit, HabitCollectionState};
use crate::source::HabitSource;

/// Status of the load operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    /// No load outstanding, last load (if any) succeeded
    Idle,
    /// A load is waiting on its source
    Loading,
    /// The last load to settle failed
    Failed,
}

/// Owner of the habit collection
pub struct HabitStore<S> {
    /// Where loads fetch from
    source: S,
    /// Habits plus load flags
    state: Mutex<HabitCollectionState>,
    /// Current load status
    status: watch::Sender<LoadStatus>,
    /// Status receiver for external monitoring
    status_rx: watch::Receiver<LoadStatus>,
}

impl<S: HabitSource> HabitStore<S> {
    /// Create an empty store backed by `source`
    pub fn new(source: S) -> Self {
        let (status_tx, status_rx) = watch::channel(LoadStatus::Idle);
        Self {
            source,
            state: Mutex::new(HabitCollectionState::default()),
            status: status_tx,
            status_rx,
        }
    }

    /// Get the source loads fetch from
    pub fn source(&self) -> &S {
        &self.source
    }

    // ==================== Load ====================

    /// Replace the collection with a fresh fetch from the source
    ///
    /// On failure the current habits are kept and the error message is
    /// recorded in state. Returns the number of habits loaded.
    pub async fn load(&self) -> HabitResult<usize> {
        {
            let mut state = self.lock();
            state.is_loading = true;
            state.error = None;
        }
        self.status.send_replace(LoadStatus::Loading);
        info!(source = %self.source.describe(), "Loading habits");

        let result = match self.source.fetch().await {
            Ok(habits) => validate_payload(&habits).map(|()| habits),
            Err(e) => Err(e),
        };

        let mut state = self.lock();
        state.is_loading = false;

        match result {
            Ok(habits) => {
                let count = habits.len();
                state.habits = habits;
                state.error = None;
                drop(state);

                self.status.send_replace(LoadStatus::Idle);
                info!(count, "Loaded habits");
                Ok(count)
            }
            Err(err) => {
                state.error = Some(err.to_string());
                drop(state);

                self.status.send_replace(LoadStatus::Failed);
                warn!(error = %err, "Failed to load habits");
                Err(err.into())
            }
        }
    }

    // ==================== Mutations ====================

    /// Add a new habit
    ///
    /// The name is trimmed and must be 3-50 characters. Returns the created
    /// habit, which always starts with no completions.
    pub fn add(&self, name: &str, frequency: Frequency) -> HabitResult<Habit> {
        let mut habit = match Habit::new(name, frequency) {
            Ok(habit) => habit,
            Err(e) => {
                warn!(error = %e, "Rejected habit");
                return Err(e.into());
            }
        };

        let mut state = self.lock();
        while state.get(habit.id).is_some() {
            habit.id = Uuid::new_v4();
        }
        state.habits.push(habit.clone());

        debug!(id = %habit.id, name = %habit.name, "Added habit");
        Ok(habit)
    }

    /// Remove a habit
    ///
    /// Removing an unknown id is a no-op. Returns whether a habit was removed.
    pub fn remove(&self, id: Uuid) -> bool {
        let mut state = self.lock();
        let before = state.habits.len();
        state.habits.retain(|h| h.id != id);
        let removed = state.habits.len() != before;

        if removed {
            debug!(%id, "Removed habit");
        }
        removed
    }

    /// Flip completion of `date` for a habit
    ///
    /// Returns whether the habit is completed on `date` afterwards. The date
    /// is taken as given; the store does not reject future dates.
    pub fn toggle_completion(&self, id: Uuid, date: NaiveDate) -> HabitResult<bool> {
        let mut state = self.lock();
        let Some(habit) = state.get_mut(id) else {
            warn!(%id, "Toggle on unknown habit");
            return Err(HabitError::NotFound { id });
        };

        let completed = habit.toggle(date);
        debug!(%id, %date, completed, "Toggled habit");
        Ok(completed)
    }

    // ==================== Readers ====================

    /// Clone of the full state
    pub fn snapshot(&self) -> HabitCollectionState {
        self.lock().clone()
    }

    /// Clone of the habits in creation order
    pub fn habits(&self) -> Vec<Habit> {
        self.lock().habits.clone()
    }

    /// Get a habit by ID
    pub fn get(&self, id: Uuid) -> Option<Habit> {
        self.lock().get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().habits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().habits.is_empty()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    /// Message from the last failed load, cleared by the next load
    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    /// Get the current load status
    pub fn status(&self) -> LoadStatus {
        *self.status_rx.borrow()
    }

    /// Subscribe to load status changes
    pub fn subscribe_status(&self) -> watch::Receiver<LoadStatus> {
        self.status_rx.clone()
    }

    fn lock(&self) -> MutexGuard<'_, HabitCollectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Check a fetched list against the data model invariants
fn validate_payload(habits: &[Habit]) -> Result<(), LoadError> {
    let mut seen = std::collections::HashSet::with_capacity(habits.len());

    for habit in habits {
        if !seen.insert(habit.id) {
            return Err(LoadError::InvalidPayload(format!(
                "duplicate habit id {}",
                habit.id
            )));
        }

        match validate_name(&habit.name) {
            Ok(name) if name == habit.name => {}
            Ok(_) => {
                return Err(LoadError::InvalidPayload(format!(
                    "habit {} has untrimmed name '{}'",
                    habit.id, habit.name
                )))
            }
            Err(e) => {
                return Err(LoadError::InvalidPayload(format!(
                    "habit {}: {}",
                    habit.id, e
                )))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;

    use tokio::sync::oneshot;

    use crate::error::ValidationError;
    use crate::metrics;

    type Response = Result<Vec<Habit>, LoadError>;

    /// Always answers with the same habits
    struct StaticSource(Vec<Habit>);

    impl HabitSource for StaticSource {
        async fn fetch(&self) -> Response {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "static".to_string()
        }
    }

    /// Each fetch waits for the next scripted response
    #[derive(Default)]
    struct ScriptedSource {
        pending: Mutex<VecDeque<oneshot::Receiver<Response>>>,
    }

    impl ScriptedSource {
        fn expect(&self) -> oneshot::Sender<Response> {
            let (tx, rx) = oneshot::channel();
            self.pending.lock().unwrap().push_back(rx);
            tx
        }
    }

    impl HabitSource for ScriptedSource {
        async fn fetch(&self) -> Response {
            let rx = self.pending.lock().unwrap().pop_front();
            match rx {
                Some(rx) => rx
                    .await
                    .unwrap_or_else(|_| Err(LoadError::InvalidPayload("no response".into()))),
                None => Err(LoadError::InvalidPayload("unexpected fetch".into())),
            }
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn habits(names: &[&str]) -> Vec<Habit> {
        names
            .iter()
            .map(|n| Habit::new(n, Frequency::Daily).unwrap())
            .collect()
    }

    fn empty_store() -> HabitStore<StaticSource> {
        HabitStore::new(StaticSource(Vec::new()))
    }

    fn server_error() -> LoadError {
        LoadError::Status {
            url: "http://localhost/habits".to_string(),
            status: 503,
        }
    }

    #[test]
    fn test_new_store_is_idle_and_empty() {
        let store = empty_store();
        assert!(store.is_empty());
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.status(), LoadStatus::Idle);
    }

    #[test]
    fn test_add_and_get() {
        let store = empty_store();

        let habit = store.add("Drink water", Frequency::Weekly).unwrap();

        let found = store.get(habit.id).unwrap();
        assert_eq!(found.name, "Drink water");
        assert_eq!(found.frequency, Frequency::Weekly);
        assert!(found.completed_dates.is_empty());
    }

    #[test]
    fn test_add_trims_name() {
        let store = empty_store();
        let habit = store.add("   Read a book ", Frequency::Daily).unwrap();
        assert_eq!(store.get(habit.id).unwrap().name, "Read a book");
    }

    #[test]
    fn test_add_keeps_creation_order() {
        let store = empty_store();
        let a = store.add("First", Frequency::Daily).unwrap();
        let b = store.add("Second", Frequency::Daily).unwrap();
        let c = store.add("Third", Frequency::Weekly).unwrap();

        let ids: Vec<_> = store.habits().iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_add_rejects_bad_names() {
        let store = empty_store();
        store.add("Existing", Frequency::Daily).unwrap();
        let before = store.snapshot();

        let too_long = "x".repeat(51);
        for name in ["", "a", "ab", "  ab  ", too_long.as_str()] {
            let err = store.add(name, Frequency::Daily).unwrap_err();
            assert!(
                matches!(err, HabitError::Validation(_)),
                "expected validation error for {:?}",
                name
            );
        }

        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_add_empty_name_error_kind() {
        let store = empty_store();
        let err = store.add("   ", Frequency::Daily).unwrap_err();
        assert!(matches!(
            err,
            HabitError::Validation(ValidationError::EmptyName)
        ));
    }

    #[test]
    fn test_remove() {
        let store = empty_store();
        let keep = store.add("Keep me", Frequency::Daily).unwrap();
        let drop_me = store.add("Drop me", Frequency::Daily).unwrap();

        assert!(store.remove(drop_me.id));
        assert_eq!(store.len(), 1);
        assert!(store.get(drop_me.id).is_none());
        assert!(store.get(keep.id).is_some());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let store = empty_store();
        let habit = store.add("Stretch", Frequency::Daily).unwrap();
        store.add("Walk", Frequency::Daily).unwrap();

        assert!(store.remove(habit.id));
        let once = store.snapshot();

        assert!(!store.remove(habit.id));
        assert_eq!(store.snapshot(), once);

        // Unknown id is also a no-op
        assert!(!store.remove(Uuid::new_v4()));
        assert_eq!(store.snapshot(), once);
    }

    #[test]
    fn test_toggle_twice_restores() {
        let store = empty_store();
        let habit = store.add("Meditate", Frequency::Daily).unwrap();
        let day = date("2024-04-01");
        store.toggle_completion(habit.id, date("2024-03-31")).unwrap();
        let original = store.get(habit.id).unwrap().completed_dates;

        assert!(store.toggle_completion(habit.id, day).unwrap());
        assert!(store.get(habit.id).unwrap().is_completed_on(day));

        assert!(!store.toggle_completion(habit.id, day).unwrap());
        assert_eq!(store.get(habit.id).unwrap().completed_dates, original);
    }

    #[test]
    fn test_toggle_unknown_id() {
        let store = empty_store();
        store.add("Meditate", Frequency::Daily).unwrap();
        let before = store.snapshot();

        let missing = Uuid::new_v4();
        let err = store
            .toggle_completion(missing, date("2024-04-01"))
            .unwrap_err();
        assert!(matches!(err, HabitError::NotFound { id } if id == missing));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn test_toggle_accepts_future_dates() {
        let store = empty_store();
        let habit = store.add("Plan ahead", Frequency::Daily).unwrap();
        assert!(store
            .toggle_completion(habit.id, date("2999-01-01"))
            .unwrap());
    }

    #[test]
    fn test_drink_water_scenario() {
        let store = empty_store();
        let today = date("2024-07-04");

        let habit = store.add("Drink water", Frequency::Daily).unwrap();
        store.toggle_completion(habit.id, today).unwrap();

        let habits = store.habits();
        assert_eq!(metrics::completed_on(&habits, today), 1);
        assert_eq!(metrics::completion_rate(&habits, today), 100);

        store.remove(habit.id);
        let habits = store.habits();
        assert!(habits.is_empty());
        assert_eq!(metrics::completion_rate(&habits, today), 0);
    }

    #[test]
    fn test_streak_through_store() {
        let store = empty_store();
        let habit = store.add("Journal", Frequency::Daily).unwrap();
        for d in ["2024-07-04", "2024-07-03", "2024-07-02"] {
            store.toggle_completion(habit.id, date(d)).unwrap();
        }
        let today = date("2024-07-04");
        assert_eq!(
            metrics::current_streak(&store.get(habit.id).unwrap(), today),
            3
        );

        store.toggle_completion(habit.id, date("2024-07-03")).unwrap();
        assert_eq!(
            metrics::current_streak(&store.get(habit.id).unwrap(), today),
            1
        );
    }

    #[tokio::test]
    async fn test_load_replaces_collection() {
        let payload = habits(&["Read", "Walk", "Code"]);
        let store = HabitStore::new(StaticSource(payload.clone()));
        store.add("Local only", Frequency::Daily).unwrap();

        let count = store.load().await.unwrap();

        assert_eq!(count, 3);
        assert_eq!(store.habits(), payload);
        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.status(), LoadStatus::Idle);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_habits() {
        let source = ScriptedSource::default();
        let tx = source.expect();
        let store = HabitStore::new(source);
        let habit = store.add("Keep me", Frequency::Daily).unwrap();

        tx.send(Err(server_error())).unwrap();
        let err = store.load().await.unwrap_err();

        assert!(matches!(err, HabitError::Load(LoadError::Status { status: 503, .. })));
        assert!(!store.is_loading());
        assert!(store.error().unwrap().contains("503"));
        assert_eq!(store.habits().len(), 1);
        assert_eq!(store.habits()[0].id, habit.id);
        assert_eq!(store.status(), LoadStatus::Failed);
    }

    #[tokio::test]
    async fn test_load_success_clears_previous_error() {
        let source = ScriptedSource::default();
        let fail = source.expect();
        let succeed = source.expect();
        let store = Arc::new(HabitStore::new(source));

        fail.send(Err(server_error())).unwrap();
        store.load().await.unwrap_err();
        assert!(store.error().is_some());

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load().await }
        });
        tokio::task::yield_now().await;

        // A fresh attempt clears the error before it settles
        assert!(store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.status(), LoadStatus::Loading);

        let payload = habits(&["Read", "Walk", "Code"]);
        succeed.send(Ok(payload.clone())).unwrap();
        assert_eq!(task.await.unwrap().unwrap(), 3);

        assert!(!store.is_loading());
        assert!(store.error().is_none());
        assert_eq!(store.habits(), payload);
    }

    #[tokio::test]
    async fn test_edits_during_load_are_discarded() {
        let source = ScriptedSource::default();
        let tx = source.expect();
        let store = Arc::new(HabitStore::new(source));

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load().await }
        });
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        // Mutations are not blocked by the outstanding load
        let local = store.add("Added meanwhile", Frequency::Daily).unwrap();
        assert!(store.get(local.id).is_some());

        let payload = habits(&["From source"]);
        tx.send(Ok(payload.clone())).unwrap();
        task.await.unwrap().unwrap();

        assert!(store.get(local.id).is_none());
        assert_eq!(store.habits(), payload);
    }

    #[tokio::test]
    async fn test_overlapping_loads_last_settled_wins() {
        let source = ScriptedSource::default();
        let first_tx = source.expect();
        let second_tx = source.expect();
        let store = Arc::new(HabitStore::new(source));

        let first = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load().await }
        });
        tokio::task::yield_now().await;
        let second = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load().await }
        });
        tokio::task::yield_now().await;

        let first_payload = habits(&["From first call"]);
        let second_payload = habits(&["From second", "call"]);

        // The later call settles first
        second_tx.send(Ok(second_payload.clone())).unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(store.habits(), second_payload);

        // The earlier call settles last and overwrites it
        first_tx.send(Ok(first_payload.clone())).unwrap();
        first.await.unwrap().unwrap();
        assert_eq!(store.habits(), first_payload);
        assert!(!store.is_loading());
    }

    #[tokio::test]
    async fn test_stalled_load_stays_loading() {
        let source = ScriptedSource::default();
        let tx = source.expect();
        let store = Arc::new(HabitStore::new(source));
        let mut status = store.subscribe_status();

        let task = tokio::spawn({
            let store = Arc::clone(&store);
            async move { store.load().await }
        });
        status.changed().await.unwrap();
        assert_eq!(*status.borrow_and_update(), LoadStatus::Loading);
        assert!(store.is_loading());

        // Source gives up without an answer
        drop(tx);
        task.await.unwrap().unwrap_err();
        assert!(!store.is_loading());
        assert_eq!(store.status(), LoadStatus::Failed);
    }

    #[tokio::test]
    async fn test_load_rejects_duplicate_ids() {
        let habit = Habit::new("Read", Frequency::Daily).unwrap();
        let store = HabitStore::new(StaticSource(vec![habit.clone(), habit]));
        store.add("Local", Frequency::Daily).unwrap();

        let err = store.load().await.unwrap_err();
        assert!(matches!(err, HabitError::Load(LoadError::InvalidPayload(_))));
        assert!(store.error().unwrap().contains("duplicate"));
        assert_eq!(store.habits()[0].name, "Local");
    }

    #[tokio::test]
    async fn test_load_rejects_invalid_names() {
        let mut habit = Habit::new("Read", Frequency::Daily).unwrap();
        habit.name = "ab".to_string();
        let store = HabitStore::new(StaticSource(vec![habit]));
        assert!(store.load().await.is_err());

        let mut habit = Habit::new("Read", Frequency::Daily).unwrap();
        habit.name = " Read ".to_string();
        let store = HabitStore::new(StaticSource(vec![habit]));
        assert!(store.load().await.is_err());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_load_then_add_avoids_loaded_ids() {
        let payload = habits(&["Read", "Walk"]);
        let store = HabitStore::new(StaticSource(payload.clone()));
        store.load().await.unwrap();

        let added = store.add("Code", Frequency::Daily).unwrap();
        assert!(payload.iter().all(|h| h.id != added.id));
        assert_eq!(store.len(), 3);
    }
}
