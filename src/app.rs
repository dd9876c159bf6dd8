// Controller tying the task store to persistence and the user

use crate::filter::Match;
use crate::persist::Persistence;
use crate::prompt::Prompt;
use crate::slot::Slot;
use crate::store::{EditSession, TaskStore};
use crate::task::Task;
use tracing::info;

/// Question asked before a task is deleted
pub const DELETE_CONFIRM_MESSAGE: &str = "Are you sure you want to delete this task?";

/// Owns the task list and saves it after every change
///
/// All indices are positions in the unfiltered list. Use the `index` of a
/// [`Match`] returned by [`App::search`] to act on a search result.
pub struct App<S: Slot, P: Prompt> {
    store: TaskStore,
    persistence: Persistence<S>,
    prompt: P,
}

impl<S: Slot, P: Prompt> App<S, P> {
    /// Load the stored list and start a session
    pub fn open(persistence: Persistence<S>, prompt: P) -> Self {
        let store = TaskStore::with_tasks(persistence.load());
        info!(count = store.len(), key = persistence.key(), "Task list opened");
        Self {
            store,
            persistence,
            prompt,
        }
    }

    pub fn tasks(&self) -> &[Task] {
        self.store.tasks()
    }

    pub fn persistence(&self) -> &Persistence<S> {
        &self.persistence
    }

    pub fn prompt(&self) -> &P {
        &self.prompt
    }

    pub fn editing(&self) -> Option<&EditSession> {
        self.store.editing()
    }

    pub fn search(&self, query: &str) -> Vec<Match<'_>> {
        self.store.filter(query)
    }

    pub fn add(&mut self, text: &str) -> bool {
        let changed = self.store.add(text);
        self.persist_if(changed)
    }

    /// Enter edit mode; returns the text to seed the editor with
    pub fn begin_edit(&mut self, index: usize) -> Option<String> {
        self.store.begin_edit(index).map(str::to_string)
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.store.set_draft(text);
    }

    /// Save an edit, showing a notice if the text is blank
    pub fn save_edit(&mut self, index: usize, text: &str) -> bool {
        match self.store.save_edit(index, text) {
            Ok(changed) => self.persist_if(changed),
            Err(e) => {
                self.prompt.notice(&e.to_string());
                false
            }
        }
    }

    /// Save the active edit's draft
    pub fn commit_edit(&mut self) -> bool {
        match self.store.commit_edit() {
            Ok(changed) => self.persist_if(changed),
            Err(e) => {
                self.prompt.notice(&e.to_string());
                false
            }
        }
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        let changed = self.store.toggle(index);
        self.persist_if(changed)
    }

    /// Delete after asking the user
    pub fn delete(&mut self, index: usize) -> bool {
        let prompt = &mut self.prompt;
        let changed = self.store.delete(index, |_| prompt.confirm(DELETE_CONFIRM_MESSAGE));
        self.persist_if(changed)
    }

    fn persist_if(&mut self, changed: bool) -> bool {
        if changed {
            self.persistence.save(self.store.tasks());
        }
        changed
    }
}
