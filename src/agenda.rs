//! This module ties the task store, the scheduling functions and an assistant together
//!
//! It implements the flows a user goes through: creating, editing and deleting tasks, looking at the board,
//! getting the itinerary of the day, and asking for advice on it.

use url::Url;

use crate::assistant::Coordinates;
use crate::error::{AgendaError, ValidationError};
use crate::schedule::{self, Column};
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft, TaskId};
use crate::traits::{Assistant, PersistenceSlot};

/// How many tasks are needed before asking the assistant for an optimized plan
pub const MIN_TASKS_TO_OPTIMIZE: usize = 2;


/// A task board backed by a persistence slot and an assistant.
///
/// Every method that may call the assistant takes `&mut self`, so that only one such request is in flight at a time.
pub struct Agenda<S, A>
where
    S: PersistenceSlot,
    A: Assistant,
{
    store: TaskStore<S>,
    assistant: A,
}

impl<S, A> Agenda<S, A>
where
    S: PersistenceSlot,
    A: Assistant,
{
    pub fn new(store: TaskStore<S>, assistant: A) -> Self {
        Self { store, assistant }
    }

    /// Load the tasks from `slot`, see [`TaskStore::load`]
    pub fn load(slot: S, assistant: A) -> Self {
        Self::new(TaskStore::load(slot), assistant)
    }

    pub fn store(&self) -> &TaskStore<S> { &self.store }
    pub fn assistant(&self) -> &A { &self.assistant }
    pub fn tasks(&self) -> &[Task] { self.store.snapshot() }

    /// Create a task, and look its location up.
    ///
    /// `position` (if known) biases the lookup. A failed lookup does not prevent the task from being created.
    pub async fn create_task(&mut self, draft: TaskDraft, position: Option<Coordinates>) -> Result<TaskId, AgendaError> {
        draft.validate()?;

        let info = self.assistant.enrich_location(&draft.location, position).await;
        let mut task = Task::new(draft);
        task.set_location_info(info);

        let id = task.id().clone();
        self.store.add(task)?;
        log::info!("Created task {}", id);
        Ok(id)
    }

    /// Replace the user-editable fields of a task.
    ///
    /// The location is looked up again only if it has changed; otherwise the cached details are kept.
    pub async fn edit_task(&mut self, id: &TaskId, draft: TaskDraft, position: Option<Coordinates>) -> Result<(), AgendaError> {
        draft.validate()?;
        let mut task = match self.store.get(id) {
            None => return Err(AgendaError::NotFound(id.clone())),
            Some(task) => task.clone(),
        };

        let location_changed = task.location() != draft.location;
        task.apply_draft(draft);
        if location_changed {
            log::debug!("Location of task {} has changed, looking it up", id);
            let info = self.assistant.enrich_location(task.location(), position).await;
            task.set_location_info(info);
        }

        self.store.update(task)
    }

    /// Delete a task. Deleting an unknown task does nothing
    pub fn delete_task(&mut self, id: &TaskId) -> bool {
        self.store.remove(id)
    }

    /// The four columns of the board, chronologically sorted
    pub fn board(&self) -> Vec<Column<'_>> {
        schedule::board(self.store.snapshot())
    }

    /// Tasks that have a location, in the order they should be visited
    pub fn itinerary(&self) -> Vec<&Task> {
        schedule::global_itinerary_tasks(self.store.snapshot())
    }

    /// A maps link going through every location of the day, or `None` if there is nowhere to go
    pub fn itinerary_url(&self) -> Option<Url> {
        let locations = schedule::derive_global_itinerary(self.store.snapshot());
        crate::maps::itinerary_url(&locations)
    }

    /// The maps link of a single task: the one found by the assistant, or a plain search for its location
    pub fn route_url(&self, id: &TaskId) -> Result<String, AgendaError> {
        match self.store.get(id) {
            None => Err(AgendaError::NotFound(id.clone())),
            Some(task) => Ok(task.maps_url_or_default()),
        }
    }

    /// Ask the assistant for the best order to go through the tasks.
    ///
    /// The answer is free text, to be shown as is.
    pub async fn optimize(&mut self) -> Result<String, AgendaError> {
        let tasks = self.store.snapshot();
        if tasks.len() < MIN_TASKS_TO_OPTIMIZE {
            return Err(ValidationError::NotEnoughTasks { required: MIN_TASKS_TO_OPTIMIZE, found: tasks.len() }.into());
        }

        match self.assistant.suggest_order(tasks).await {
            Some(advice) => Ok(advice),
            // suggest_order only skips empty lists
            None => Err(ValidationError::NotEnoughTasks { required: MIN_TASKS_TO_OPTIMIZE, found: 0 }.into()),
        }
    }
}
