use crossterm::style::{Color, Stylize};
use serde::Serialize;

use crate::model::Task;
use crate::ops::task_ops::Outcome;
use crate::util::unicode::{display_width, escape_control, pad_to_width};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OutcomeJson<'a> {
    Added { task: &'a Task },
    Updated { task: &'a Task },
    Deleted { id: i64, removed: usize },
    Cleared { removed: usize },
    NotFound { id: &'a str },
}

/// JSON text for an outcome. A listing prints as the bare task array.
pub fn outcome_to_json(outcome: &Outcome) -> Result<String, serde_json::Error> {
    let value = match outcome {
        Outcome::Listing { tasks } => return serde_json::to_string_pretty(tasks),
        Outcome::Added { task } => OutcomeJson::Added { task },
        Outcome::Updated { task } => OutcomeJson::Updated { task },
        Outcome::Deleted { id, removed } => OutcomeJson::Deleted {
            id: *id,
            removed: *removed,
        },
        Outcome::Cleared { removed } => OutcomeJson::Cleared { removed: *removed },
        Outcome::NotFound { id } => OutcomeJson::NotFound { id },
    };
    serde_json::to_string_pretty(&value)
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Foreground color, applied only when `color` is set
fn paint(text: &str, fg: Color, color: bool) -> String {
    if color {
        text.with(fg).to_string()
    } else {
        text.to_string()
    }
}

/// Banner shown when `task` runs without a command
pub fn welcome_lines(color: bool) -> Vec<String> {
    let commands = [
        ("list", "Displays the list of all tasks"),
        ("add <task>", "Adds the task in the task list"),
        ("done <id>", "Marks the task as complete"),
        ("undone <id>", "Marks the task as incomplete"),
        ("delete <id>", "Deletes the task from the task list"),
        ("delete-all", "Deletes all tasks"),
    ];
    let name_width = commands
        .iter()
        .map(|(name, _)| display_width(name))
        .max()
        .unwrap_or(0);

    let mut lines = vec![
        String::new(),
        "-".repeat(55),
        paint("Welcome to the CLI Task Manager", Color::Green, color),
        String::new(),
        paint("Commands:", Color::Green, color),
    ];
    for (name, help) in commands {
        let name = format!("  {} :", pad_to_width(name, name_width));
        lines.push(format!("{} {}", paint(&name, Color::Green, color), help));
    }
    lines
}

/// Table of tasks: status glyph, id, title
pub fn task_table_lines(tasks: &[Task], color: bool) -> Vec<String> {
    const STATUS: &str = "status";
    const ID: &str = "task id";
    const TITLE: &str = "task description";

    let id_width = tasks
        .iter()
        .map(|t| t.id.to_string().len())
        .chain(std::iter::once(ID.len()))
        .max()
        .unwrap_or(0);
    let titles: Vec<String> = tasks.iter().map(|t| escape_control(&t.title)).collect();
    let title_width = titles
        .iter()
        .map(|t| display_width(t))
        .chain(std::iter::once(TITLE.len()))
        .max()
        .unwrap_or(0);
    let rule = |l: char, r: char| {
        format!(
            "{l}{}{r}",
            [STATUS.len(), id_width, title_width]
                .iter()
                .map(|w| "─".repeat(w + 2))
                .collect::<Vec<_>>()
                .join("┼")
        )
    };

    let mut lines = Vec::with_capacity(tasks.len() + 4);
    lines.push(rule('┌', '┐').replace('┼', "┬"));
    lines.push(format!(
        "│ {} │ {} │ {} │",
        STATUS,
        pad_to_width(ID, id_width),
        pad_to_width(TITLE, title_width)
    ));
    lines.push(rule('├', '┤'));
    for (task, title) in tasks.iter().zip(&titles) {
        let glyph = task.status_glyph().to_string();
        let glyph = paint(
            &glyph,
            if task.completed { Color::Green } else { Color::Red },
            color,
        );
        lines.push(format!(
            "│ {}{} │ {} │ {} │",
            glyph,
            " ".repeat(STATUS.len() - 1),
            pad_to_width(&task.id.to_string(), id_width),
            pad_to_width(title, title_width)
        ));
    }
    lines.push(rule('└', '┘').replace('┼', "┴"));
    lines
}

/// Human-readable lines for an outcome
pub fn outcome_lines(outcome: &Outcome, color: bool) -> Vec<String> {
    match outcome {
        Outcome::Added { task } => vec![paint(
            &format!("Task added successfully! (id {})", task.id),
            Color::Green,
            color,
        )],
        Outcome::Listing { tasks } if tasks.is_empty() => {
            vec![paint("No tasks found.", Color::Yellow, color)]
        }
        Outcome::Listing { tasks } => task_table_lines(tasks, color),
        Outcome::Updated { task } if task.completed => {
            vec![paint("Task marked as complete", Color::Green, color)]
        }
        Outcome::Updated { .. } => vec![paint("Task marked as incomplete", Color::Green, color)],
        Outcome::Deleted { removed, .. } if *removed > 1 => vec![paint(
            &format!("Task deleted successfully! ({} entries shared that id)", removed),
            Color::Green,
            color,
        )],
        Outcome::Deleted { .. } => vec![paint("Task deleted successfully!", Color::Green, color)],
        Outcome::Cleared { .. } => vec![paint("All tasks deleted", Color::Green, color)],
        Outcome::NotFound { id } => vec![paint(
            &format!("Task not found: {}", id),
            Color::Red,
            color,
        )],
    }
}
