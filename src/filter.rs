// Text search over the task list

use crate::task::Task;

/// Case-insensitive substring query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    /// Lowercased search text; empty matches everything
    needle: String,
}

impl Filter {
    pub fn new(query: &str) -> Self {
        Self {
            needle: query.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.is_empty() || task.text.to_lowercase().contains(&self.needle)
    }

    /// Project `tasks` down to the matches, keeping list order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<Match<'a>> {
        tasks
            .iter()
            .enumerate()
            .filter(|(_, task)| self.matches(task))
            .map(|(index, task)| Match { index, task })
            .collect()
    }
}

/// A task that survived a filter
///
/// `index` is the task's position in the unfiltered list, which is what
/// every mutating operation expects. The position of the match inside the
/// filtered result is only meaningful for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match<'a> {
    pub index: usize,
    pub task: &'a Task,
}
