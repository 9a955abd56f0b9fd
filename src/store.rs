//! This module provides the task store, the single owner of the task collection

use std::collections::HashSet;

use crate::error::{AgendaError, ValidationError};
use crate::task::{Task, TaskId};
use crate::traits::PersistenceSlot;


/// The task collection, backed by a [`PersistenceSlot`].
///
/// Every successful mutation writes the whole collection to the slot.
#[derive(Debug)]
pub struct TaskStore<S: PersistenceSlot> {
    slot: S,
    tasks: Vec<Task>,
}

impl<S: PersistenceSlot> TaskStore<S> {
    /// Initialize a store from the content of its slot.
    ///
    /// An empty slot, an unreadable slot or a malformed content all give an empty collection. \
    /// Records that break a task invariant (see [`Task::validate`]), or that reuse the ID of an earlier record, are dropped.
    pub fn load(slot: S) -> Self {
        let tasks = match Self::read_slot(&slot) {
            Ok(tasks) => {
                log::info!("Loaded {} tasks", tasks.len());
                tasks
            },
            Err(err) => {
                log::warn!("Unable to restore tasks ({}). Starting with an empty collection", err);
                Vec::new()
            },
        };

        Self { slot, tasks }
    }

    fn read_slot(slot: &S) -> Result<Vec<Task>, AgendaError> {
        let content = match slot.load()? {
            None => return Ok(Vec::new()),
            Some(content) => content,
        };
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(keep_valid_records(decode(&content)?))
    }

    /// Returns the current collection
    pub fn snapshot(&self) -> &[Task] {
        &self.tasks
    }

    /// Returns the task with this ID
    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    /// Returns the persistence slot
    pub fn slot(&self) -> &S {
        &self.slot
    }

    /// Append a new task
    pub fn add(&mut self, task: Task) -> Result<(), AgendaError> {
        task.validate()?;
        if self.get(task.id()).is_some() {
            return Err(ValidationError::DuplicateId(task.id().clone()).into());
        }

        log::debug!("Adding task {} ({})", task.title(), task.id());
        self.tasks.push(task);
        self.save();
        Ok(())
    }

    /// Replace the task that has the same ID
    pub fn update(&mut self, task: Task) -> Result<(), AgendaError> {
        task.validate()?;
        let existing = match self.tasks.iter_mut().find(|t| t.id() == task.id()) {
            None => return Err(AgendaError::NotFound(task.id().clone())),
            Some(existing) => existing,
        };

        log::debug!("Updating task {} ({})", task.title(), task.id());
        *existing = task;
        self.save();
        Ok(())
    }

    /// Delete a task. Returns whether it existed
    pub fn remove(&mut self, id: &TaskId) -> bool {
        let count_before = self.tasks.len();
        self.tasks.retain(|t| t.id() != id);
        if self.tasks.len() == count_before {
            log::debug!("No task {} to remove", id);
            return false;
        }

        log::debug!("Removed task {}", id);
        self.save();
        true
    }

    /// Store the current collection to the slot.
    ///
    /// A failure is logged, and does not undo the mutation: the next successful save will contain it.
    fn save(&mut self) {
        let content = match encode(&self.tasks) {
            Err(err) => {
                log::warn!("Unable to serialize tasks: {}", err);
                return;
            },
            Ok(content) => content,
        };

        if let Err(err) = self.slot.save(&content) {
            log::warn!("Unable to save tasks: {}", err);
        }
    }
}

/// Drop the records that could not have been stored by [`TaskStore::add`] or [`TaskStore::update`]
fn keep_valid_records(records: Vec<Task>) -> Vec<Task> {
    let mut seen_ids = HashSet::new();
    let mut tasks = Vec::with_capacity(records.len());
    for task in records {
        if let Err(err) = task.validate() {
            log::warn!("Dropping stored task {}: {}", task.id(), err);
            continue;
        }
        if seen_ids.insert(task.id().clone()) == false {
            log::warn!("Dropping stored task {}: this ID is already used by a previous task", task.id());
            continue;
        }
        tasks.push(task);
    }
    tasks
}

fn encode(tasks: &[Task]) -> Result<String, serde_json::Error> {
    serde_json::to_string(tasks)
}

fn decode(content: &str) -> Result<Vec<Task>, serde_json::Error> {
    serde_json::from_str(content)
}


#[cfg(test)]
mod tests {
    use super::*;

    use crate::storage::{JsonFileSlot, MemorySlot};
    use crate::{Category, TaskDraft};

    fn gym() -> Task {
        Task::new(TaskDraft::new("Leg day", "Gym", Category::Training).with_date("2024-05-01").with_time("08:00"))
    }

    fn office() -> Task {
        Task::new(TaskDraft::new("Standup", "Office", Category::Work).with_time("09:00"))
    }

    #[test]
    fn load_empty_slot() {
        let store = TaskStore::load(MemorySlot::new());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn load_malformed_slot() {
        let _ = env_logger::builder().is_test(true).try_init();

        for garbage in &["{not json", "{\"id\": 3}", "[{\"title\": \"no id\"}]", "   "] {
            let store = TaskStore::load(MemorySlot::with_content(garbage));
            assert!(store.snapshot().is_empty());
        }
    }

    #[test]
    fn load_drops_duplicate_ids() {
        let _ = env_logger::builder().is_test(true).try_init();

        let content = r#"[
            {"id": "1", "title": "Standup", "location": "Office", "category": "Work", "date": "2024-05-09"},
            {"id": "1", "title": "Leg day", "location": "Gym", "category": "Training", "date": "2024-05-10"},
            {"id": "2", "title": "Laundry", "location": "Home", "category": "Home"}
        ]"#;
        let mut store = TaskStore::load(MemorySlot::with_content(content));

        let titles: Vec<&str> = store.snapshot().iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Standup", "Laundry"]);

        assert!(store.remove(&TaskId::from("1")));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn load_drops_invalid_records() {
        let _ = env_logger::builder().is_test(true).try_init();

        let content = r#"[
            {"id": "1", "title": "Standup", "location": "Office", "category": "Work", "date": "2024-5-9"},
            {"id": "2", "title": "Leg day", "location": "Gym", "category": "Training", "date": "2024-05-10"},
            {"id": "3", "title": "", "location": "", "category": "Home"},
            {"id": "4", "title": "Swim", "location": "Pool", "category": "Training", "time": "7:30"}
        ]"#;
        let store = TaskStore::load(MemorySlot::with_content(content));

        let ids: Vec<&str> = store.snapshot().iter().map(|t| t.id().as_str()).collect();
        assert_eq!(ids, vec!["2"]);
        assert_eq!(crate::schedule::derive_global_itinerary(store.snapshot()), vec!["Gym"]);
    }

    #[test]
    fn load_restores_saved_tasks() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());
        store.add(gym()).unwrap();
        store.add(office()).unwrap();

        let restored = TaskStore::load(slot);
        assert_eq!(restored.snapshot(), store.snapshot());
    }

    #[test]
    fn add_rejects_invalid_tasks() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());

        let err = store.add(Task::new(TaskDraft::new("", "Gym", Category::Training))).unwrap_err();
        assert!(matches!(err, AgendaError::Validation(ValidationError::EmptyTitle)));

        let err = store.add(Task::new(TaskDraft::new("Run", " ", Category::Training))).unwrap_err();
        assert!(matches!(err, AgendaError::Validation(ValidationError::EmptyLocation)));

        let err = store.add(Task::new(TaskDraft::new("Run", "Park", Category::Training).with_date("1/5/2024"))).unwrap_err();
        assert!(matches!(err, AgendaError::Validation(ValidationError::InvalidDate(_))));

        assert!(store.snapshot().is_empty());
        assert_eq!(slot.save_count(), 0);
    }

    #[test]
    fn add_rejects_duplicate_ids() {
        let mut store = TaskStore::load(MemorySlot::new());
        let task = gym();
        store.add(task.clone()).unwrap();

        let err = store.add(task).unwrap_err();
        assert!(matches!(err, AgendaError::Validation(ValidationError::DuplicateId(_))));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn add_then_remove_is_a_round_trip() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());
        store.add(office()).unwrap();
        let before = store.snapshot().to_vec();
        let saved_before = slot.content();

        let task = gym();
        let id = task.id().clone();
        store.add(task).unwrap();
        assert_eq!(store.snapshot().len(), 2);

        assert!(store.remove(&id));
        assert_eq!(store.snapshot(), &before[..]);
        assert_eq!(slot.content(), saved_before);
    }

    #[test]
    fn remove_unknown_id_is_a_no_op() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());
        store.add(office()).unwrap();

        assert_eq!(store.remove(&TaskId::from("nope")), false);
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(slot.save_count(), 1);
    }

    #[test]
    fn update_keeps_unchanged_fields() {
        let mut store = TaskStore::load(MemorySlot::new());
        let mut task = gym();
        task.set_location_info(crate::assistant::LocationInfo::fallback("Gym"));
        store.add(task.clone()).unwrap();
        store.add(office()).unwrap();

        let mut edited = store.get(task.id()).unwrap().clone();
        edited.set_time(Some("18:30".to_string()));
        store.update(edited).unwrap();

        let updated = store.get(task.id()).unwrap();
        assert_eq!(updated.id(), task.id());
        assert_eq!(updated.time(), Some("18:30"));
        assert_eq!(updated.title(), task.title());
        assert_eq!(updated.description(), task.description());
        assert_eq!(updated.location(), task.location());
        assert_eq!(updated.category(), task.category());
        assert_eq!(updated.date(), task.date());
        assert_eq!(updated.maps_url(), task.maps_url());
        assert_eq!(updated.maps_details(), task.maps_details());
        // Position in the collection does not change either
        assert_eq!(store.snapshot()[0].id(), task.id());
    }

    #[test]
    fn update_unknown_task() {
        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());
        store.add(office()).unwrap();

        let err = store.update(gym()).unwrap_err();
        assert!(matches!(err, AgendaError::NotFound(_)));
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(slot.save_count(), 1);
    }

    #[test]
    fn failed_saves_do_not_lose_mutations() {
        let _ = env_logger::builder().is_test(true).try_init();

        let slot = MemorySlot::new();
        let mut store = TaskStore::load(slot.clone());
        slot.set_fail_saves(true);
        store.add(office()).unwrap();
        assert_eq!(store.snapshot().len(), 1);
        assert_eq!(slot.content(), None);

        slot.set_fail_saves(false);
        store.add(gym()).unwrap();
        assert_eq!(TaskStore::load(slot).snapshot().len(), 2);
    }

    #[test]
    fn serde_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.json");

        let mut store = TaskStore::load(JsonFileSlot::new(&path));
        store.add(gym()).unwrap();
        store.add(office()).unwrap();

        let retrieved = TaskStore::load(JsonFileSlot::new(&path));
        assert_eq!(retrieved.snapshot(), store.snapshot());
    }
}
