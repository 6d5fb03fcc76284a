use std::collections::HashSet;

use chrono::Utc;

use crate::io::{StoreError, TaskStore};
use crate::model::{Task, TaskList};

/// What a single command did to the task list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Added { task: Task },
    Listing { tasks: Vec<Task> },
    Updated { task: Task },
    Deleted { id: i64, removed: usize },
    Cleared { removed: usize },
    /// No task matched; carries the id text as given
    NotFound { id: String },
}

// ---------------------------------------------------------------------------
// Ids
// ---------------------------------------------------------------------------

/// Parse a user-supplied id. Anything that is not a base-10 integer is `None`.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse().ok()
}

/// Pick the id for a new task: the current time in milliseconds, moved past
/// the largest existing id if the clock has not advanced beyond it.
///
/// When the largest id is already `i64::MAX` the first unused value at or
/// after `now_millis` (wrapping around) is taken instead.
pub fn next_id(list: &TaskList, now_millis: i64) -> i64 {
    match list.max_id() {
        Some(max) if now_millis <= max => match max.checked_add(1) {
            Some(id) => id,
            None => first_unused_id(list, now_millis),
        },
        _ => now_millis,
    }
}

fn first_unused_id(list: &TaskList, from: i64) -> i64 {
    let used: HashSet<i64> = list.tasks.iter().map(|t| t.id).collect();
    (from..=i64::MAX)
        .chain(i64::MIN..from)
        .find(|id| !used.contains(id))
        .unwrap_or(from)
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Append a pending task with `title` stored verbatim
pub fn add(store: &TaskStore, title: &str) -> Result<Outcome, StoreError> {
    add_at(store, title, now_millis())
}

/// [`add`] with an explicit clock reading
pub fn add_at(store: &TaskStore, title: &str, now_millis: i64) -> Result<Outcome, StoreError> {
    let mut list = store.load();
    let task = Task::new(next_id(&list, now_millis), title);
    list.push(task.clone());
    store.save(&list)?;
    Ok(Outcome::Added { task })
}

/// All tasks in insertion order. Never writes.
pub fn list(store: &TaskStore) -> Outcome {
    Outcome::Listing {
        tasks: store.load().tasks,
    }
}

pub fn complete(store: &TaskStore, id: &str) -> Result<Outcome, StoreError> {
    set_completed(store, id, true)
}

pub fn uncomplete(store: &TaskStore, id: &str) -> Result<Outcome, StoreError> {
    set_completed(store, id, false)
}

fn set_completed(store: &TaskStore, raw_id: &str, completed: bool) -> Result<Outcome, StoreError> {
    let mut list = store.load();
    let Some(task) = parse_id(raw_id).and_then(|id| list.find_mut(id)) else {
        return Ok(Outcome::NotFound {
            id: raw_id.to_string(),
        });
    };
    task.completed = completed;
    let task = task.clone();
    store.save(&list)?;
    Ok(Outcome::Updated { task })
}

/// Remove every task carrying `id`; saves only if something was removed
pub fn delete(store: &TaskStore, raw_id: &str) -> Result<Outcome, StoreError> {
    let not_found = || Outcome::NotFound {
        id: raw_id.to_string(),
    };
    let Some(id) = parse_id(raw_id) else {
        return Ok(not_found());
    };
    let mut list = store.load();
    let removed = list.remove_all(id);
    if removed == 0 {
        return Ok(not_found());
    }
    store.save(&list)?;
    Ok(Outcome::Deleted { id, removed })
}

/// Save an empty list unconditionally
pub fn delete_all(store: &TaskStore) -> Result<Outcome, StoreError> {
    let removed = store.load().len();
    store.save(&TaskList::default())?;
    Ok(Outcome::Cleared { removed })
}
