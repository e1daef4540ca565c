use tracing::{debug, info, warn};

use crate::io::store::{KeyValueStore, StoreError};
use crate::model::task::{Summary, Task};
use crate::ops::frontend::{Frontend, RenderSurface};
use crate::ops::task_ops::{self, IdAllocator, TaskError};

pub const MSG_EMPTY_INPUT: &str = "Please write something first!";
pub const MSG_ADDED: &str = "Task added successfully!";
pub const MSG_COMPLETED: &str = "Task marked as complete!";
pub const MSG_REOPENED: &str = "Task marked as incomplete!";
pub const MSG_CONFIRM_DELETE: &str = "Are you sure you want to delete this task?";
pub const MSG_DELETED: &str = "Task deleted!";
pub const MSG_EDIT_PROMPT: &str = "Edit task:";
pub const MSG_UPDATED: &str = "Task updated!";

/// Outcome of an operation the user can back out of
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// The operation went through; carries the affected task
    Applied(Task),
    /// The user declined or cancelled; nothing changed
    Cancelled,
}

/// The working list plus the durable store it mirrors.
///
/// Every mutating operation validates first, then mutates the stored list
/// and writes it back under the store's lock, re-renders, and finally
/// notifies. If the write fails the working list is left untouched and
/// nothing is rendered.
pub struct TaskStore<S: KeyValueStore> {
    store: S,
    key: String,
    tasks: Vec<Task>,
    ids: IdAllocator,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// An empty working list over `store`. Call `reload` to read it.
    pub fn new(store: S, key: impl Into<String>) -> Self {
        TaskStore {
            store,
            key: key.into(),
            tasks: Vec::new(),
            ids: IdAllocator::default(),
        }
    }

    /// Build and load in one step, rendering the initial state
    pub fn open<U: RenderSurface + ?Sized>(
        store: S,
        key: impl Into<String>,
        ui: &mut U,
    ) -> Result<Self, TaskError> {
        let mut this = Self::new(store, key);
        this.reload(ui)?;
        Ok(this)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn summary(&self) -> Summary {
        Summary::of(&self.tasks)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Replace the working list with what the store holds.
    /// A missing or blank key reads as an empty list.
    #[tracing::instrument(skip(self), fields(key = %self.key))]
    pub fn load(&mut self) -> Result<(), TaskError> {
        let raw = self.store.get(&self.key)?;
        self.tasks = decode_list(raw.as_deref())?;
        if let Some(max) = max_id(&self.tasks) {
            self.ids.observe(max);
        }
        Ok(())
    }

    /// Load, then rebuild the surface from scratch
    pub fn reload<U: RenderSurface + ?Sized>(&mut self, ui: &mut U) -> Result<(), TaskError> {
        self.load()?;
        self.render(ui);
        Ok(())
    }

    /// Write the working list under the store key
    #[tracing::instrument(skip(self), fields(key = %self.key, count = self.tasks.len()))]
    pub fn persist(&mut self) -> Result<(), TaskError> {
        let json = serde_json::to_string(&self.tasks)?;
        self.store.set(&self.key, &json)?;
        Ok(())
    }

    /// Push fresh counts to the surface
    pub fn refresh_summary<U: RenderSurface + ?Sized>(&self, ui: &mut U) {
        ui.render_summary(&self.summary());
    }

    fn render<U: RenderSurface + ?Sized>(&self, ui: &mut U) {
        ui.render_tasks(&self.tasks);
        self.refresh_summary(ui);
    }

    /// Apply `mutate` to the list as currently stored and write it back,
    /// all under one store update so other writers can't slip in between.
    ///
    /// On success the mutated list becomes the working list. On any failure
    /// the working list and the store are both left as they were.
    fn transact<T>(
        &mut self,
        mut mutate: impl FnMut(&mut Vec<Task>, &mut IdAllocator) -> Result<T, TaskError>,
    ) -> Result<T, TaskError> {
        let ids = &mut self.ids;
        let mut outcome = None;
        let written = self.store.update(&self.key, &mut |raw| {
            let step = decode_list(raw.as_deref()).and_then(|mut tasks| {
                if let Some(max) = max_id(&tasks) {
                    ids.observe(max);
                }
                let value = mutate(&mut tasks, ids)?;
                let json = serde_json::to_string(&tasks)?;
                Ok((tasks, value, json))
            });
            match step {
                Ok((tasks, value, json)) => {
                    outcome = Some(Ok((tasks, value)));
                    Some(json)
                }
                Err(e) => {
                    outcome = Some(Err(e));
                    None
                }
            }
        });
        if let Err(e) = written {
            warn!(error = %e, "store update failed, working list unchanged");
            return Err(e.into());
        }

        let (tasks, value) = outcome.unwrap_or_else(|| {
            Err(TaskError::Store(StoreError::UpdateSkipped {
                key: self.key.clone(),
            }))
        })?;
        self.tasks = tasks;
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Add a task. Blank input raises an alert and changes nothing.
    #[tracing::instrument(skip(self, ui))]
    pub fn create<U: Frontend + ?Sized>(&mut self, raw: &str, ui: &mut U) -> Result<Task, TaskError> {
        let text = match task_ops::normalize_text(raw) {
            Ok(text) => text,
            Err(e) => {
                ui.alert(MSG_EMPTY_INPUT);
                return Err(e);
            }
        };

        let now = task_ops::now_millis();
        let task = self.transact(|tasks, ids| {
            let task = Task::new(ids.next(now)?, text.clone());
            tasks.push(task.clone());
            Ok(task)
        })?;

        self.render(ui);
        ui.notify(MSG_ADDED);
        info!(id = task.id, "task created");
        Ok(task)
    }

    /// Flip a task's completion flag
    #[tracing::instrument(skip(self, ui))]
    pub fn toggle<U: Frontend + ?Sized>(&mut self, id: u64, ui: &mut U) -> Result<Task, TaskError> {
        let task = self.transact(|tasks, _| Ok(task_ops::toggle_task(tasks, id)?.clone()))?;

        self.render(ui);
        ui.notify(if task.completed {
            MSG_COMPLETED
        } else {
            MSG_REOPENED
        });
        info!(id, completed = task.completed, "task toggled");
        Ok(task)
    }

    /// Remove a task after the user confirms.
    ///
    /// The confirmation is asked against the working list; the removal is
    /// applied to the stored list, so a task deleted elsewhere meanwhile
    /// comes back as `NotFound`.
    #[tracing::instrument(skip(self, ui))]
    pub fn delete<U: Frontend + ?Sized>(&mut self, id: u64, ui: &mut U) -> Result<Change, TaskError> {
        if self.get(id).is_none() {
            return Err(TaskError::NotFound(id));
        }
        if !ui.confirm(MSG_CONFIRM_DELETE).is_confirmed() {
            debug!(id, "delete declined");
            return Ok(Change::Cancelled);
        }

        let removed = self.transact(|tasks, _| task_ops::remove_task(tasks, id))?;

        self.render(ui);
        ui.notify(MSG_DELETED);
        info!(id, "task deleted");
        Ok(Change::Applied(removed))
    }

    /// Replace a task's text with whatever the user types into the prompt
    #[tracing::instrument(skip(self, ui))]
    pub fn edit<U: Frontend + ?Sized>(&mut self, id: u64, ui: &mut U) -> Result<Change, TaskError> {
        let current = self.get(id).ok_or(TaskError::NotFound(id))?.text.clone();
        let Some(answer) = ui.prompt(MSG_EDIT_PROMPT, &current) else {
            debug!(id, "edit cancelled");
            return Ok(Change::Cancelled);
        };
        let text = task_ops::normalize_text(&answer)?;

        let task = self.transact(|tasks, _| {
            Ok(task_ops::retitle_task(tasks, id, text.clone())?.clone())
        })?;

        self.render(ui);
        ui.notify(MSG_UPDATED);
        info!(id, "task edited");
        Ok(Change::Applied(task))
    }
}

/// Decode a stored payload, dropping records that break the list invariants
fn decode_list(raw: Option<&str>) -> Result<Vec<Task>, TaskError> {
    let parsed: Vec<Task> = match raw.map(str::trim) {
        None | Some("") => Vec::new(),
        Some(json) => serde_json::from_str(json)?,
    };
    let loaded = parsed.len();
    let tasks = task_ops::sanitize_loaded(parsed);
    debug!(loaded, kept = tasks.len(), "decoded task list");
    Ok(tasks)
}

fn max_id(tasks: &[Task]) -> Option<u64> {
    tasks.iter().map(|t| t.id).max()
}
