// In-memory task list and its edit state

use crate::filter::{Filter, Match};
use crate::task::{Task, is_blank};
use eyre::{Result, eyre};
use tracing::debug;

/// Message surfaced when an edit is saved with no text
pub const EMPTY_TASK_MESSAGE: &str = "Task cannot be empty!";

/// The one task currently being edited
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    /// Position of the edited task in the unfiltered list
    pub index: usize,
    /// Working text, seeded from the task when the edit begins
    pub draft: String,
}

/// Ordered task list plus the single shared edit slot
///
/// Every operation that touches a task takes its index in the unfiltered
/// list. Mutating operations return whether the list changed so the caller
/// knows when to persist.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    editing: Option<EditSession>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a previously loaded list
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        Self { tasks, editing: None }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.editing.as_ref()
    }

    /// Append a task unless `raw_text` is blank
    ///
    /// The blank check uses the trimmed text, but the stored text is exactly
    /// what was passed in.
    pub fn add(&mut self, raw_text: &str) -> bool {
        if is_blank(raw_text) {
            debug!("add: rejected blank text");
            return false;
        }

        self.tasks.push(Task::new(raw_text));
        debug!(index = self.tasks.len() - 1, "add: appended task");
        true
    }

    /// Enter edit mode for `index`, returning the seeded draft
    pub fn begin_edit(&mut self, index: usize) -> Option<&str> {
        let text = self.tasks.get(index)?.text.clone();
        debug!(index, "begin_edit");
        let session = self.editing.insert(EditSession { index, draft: text });
        Some(session.draft.as_str())
    }

    /// Replace the draft of the active edit
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let Some(session) = self.editing.as_mut() {
            session.draft = text.into();
        }
    }

    /// Replace the text of the task at `index` and leave edit mode
    ///
    /// Blank text is rejected with an error and edit mode stays active.
    pub fn save_edit(&mut self, index: usize, new_text: &str) -> Result<bool> {
        if is_blank(new_text) {
            debug!(index, "save_edit: rejected blank text");
            return Err(eyre!(EMPTY_TASK_MESSAGE));
        }

        self.editing = None;
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.text = new_text.to_string();
                debug!(index, "save_edit: text replaced");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Save the active edit's draft back to its task
    pub fn commit_edit(&mut self) -> Result<bool> {
        match self.editing.clone() {
            Some(session) => self.save_edit(session.index, &session.draft),
            None => Ok(false),
        }
    }

    /// Flip the completion flag of the task at `index`
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.completed = !task.completed;
                debug!(index, completed = task.completed, "toggle");
                true
            }
            None => false,
        }
    }

    /// Remove the task at `index` if `confirm` agrees
    ///
    /// `confirm` is only consulted for an index that exists.
    pub fn delete<F>(&mut self, index: usize, confirm: F) -> bool
    where
        F: FnOnce(&Task) -> bool,
    {
        let Some(task) = self.tasks.get(index) else {
            return false;
        };

        if !confirm(task) {
            debug!(index, "delete: not confirmed");
            return false;
        }

        self.tasks.remove(index);
        self.editing = match self.editing.take() {
            Some(session) if session.index == index => None,
            Some(mut session) if session.index > index => {
                session.index -= 1;
                Some(session)
            }
            other => other,
        };
        debug!(index, remaining = self.tasks.len(), "delete: removed task");
        true
    }

    /// Tasks whose text contains `query`, ignoring case
    pub fn filter(&self, query: &str) -> Vec<Match<'_>> {
        Filter::new(query).apply(&self.tasks)
    }
}
