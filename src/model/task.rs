use serde::{Deserialize, Serialize};

/// A single entry in the task file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Creation time in milliseconds since the epoch, bumped forward on collision
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Task {
            id,
            title: title.into(),
            completed: false,
        }
    }

    /// The glyph shown in the status column
    pub fn status_glyph(&self) -> char {
        if self.completed { '✓' } else { '✗' }
    }
}

/// The whole task file: an ordered list, serialized as a bare JSON array.
///
/// Insertion order is the only order. Nothing here sorts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    pub tasks: Vec<Task>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn push(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// First task with the given id (linear scan)
    pub fn find_mut(&mut self, id: i64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove every task with the given id, returning how many went away
    pub fn remove_all(&mut self, id: i64) -> usize {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        before - self.tasks.len()
    }

    pub fn max_id(&self) -> Option<i64> {
        self.tasks.iter().map(|t| t.id).max()
    }
}
