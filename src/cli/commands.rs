use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "task", about = concat!("task v", env!("CARGO_PKG_VERSION"), " - a task list in task.json"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use task.json in a different directory
    #[arg(short = 'C', long = "dir", global = true)]
    pub dir: Option<String>,

    /// Log more to stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a new task
    Add(AddArgs),
    /// Show all tasks
    List,
    /// Mark a task as completed
    Done(IdArg),
    /// Mark a task as incomplete
    Undone(IdArg),
    /// Delete a task
    Delete(IdArg),
    /// Delete all tasks
    #[command(name = "delete-all")]
    DeleteAll,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title (multiple words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub title: Vec<String>,
}

impl AddArgs {
    pub fn title(&self) -> String {
        self.title.join(" ")
    }
}

#[derive(Args)]
pub struct IdArg {
    /// Task id, as shown by `task list`
    #[arg(allow_hyphen_values = true)]
    pub id: String,
}
