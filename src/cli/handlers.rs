use std::io::IsTerminal;

use tracing::{debug, warn};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::TaskStore;
use crate::ops::task_ops::{self, Outcome};

/// How results are printed
#[derive(Debug, Clone, Copy)]
struct Render {
    json: bool,
    color: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let render = Render {
        json: cli.json,
        color: !cli.json && std::io::stdout().is_terminal(),
    };

    let Some(command) = cli.command else {
        print_lines(&welcome_lines(render.color));
        return Ok(());
    };

    let store = open_store(cli.dir.as_deref())?;
    if let Err(e) = store.ensure_exists() {
        // Reads degrade to an empty list; a later save reports the real failure
        warn!(error = %e, "task file could not be created");
    }

    let outcome = match command {
        Commands::Add(args) => cmd_add(&store, args)?,
        Commands::List => task_ops::list(&store),
        Commands::Done(arg) => task_ops::complete(&store, &arg.id)?,
        Commands::Undone(arg) => task_ops::uncomplete(&store, &arg.id)?,
        Commands::Delete(arg) => task_ops::delete(&store, &arg.id)?,
        Commands::DeleteAll => task_ops::delete_all(&store)?,
    };
    print_outcome(&outcome, render)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Store for `-C <dir>` if given, otherwise the current directory
fn open_store(dir: Option<&str>) -> Result<TaskStore, Box<dyn std::error::Error>> {
    let dir = match dir {
        Some(d) => std::fs::canonicalize(d)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", d, e))?,
        None => std::env::current_dir()?,
    };
    let store = TaskStore::in_dir(&dir);
    debug!(path = %store.path().display(), "using task file");
    Ok(store)
}

fn cmd_add(store: &TaskStore, args: AddArgs) -> Result<Outcome, Box<dyn std::error::Error>> {
    let title = args.title();
    if title.trim().is_empty() {
        return Err("task title cannot be empty".into());
    }
    Ok(task_ops::add(store, &title)?)
}

fn print_outcome(outcome: &Outcome, render: Render) -> Result<(), Box<dyn std::error::Error>> {
    if render.json {
        println!("{}", outcome_to_json(outcome)?);
    } else {
        print_lines(&outcome_lines(outcome, render.color));
    }
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

