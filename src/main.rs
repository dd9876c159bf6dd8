use chrono::Utc;
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use dialoguer::Input;
use eyre::{Result, eyre};
use std::path::PathBuf;
use tasklist::{App, Config, Persistence, Slot, TerminalPrompt};
use tracing::Level;

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "TaskList CLI - Keep a short list of things to do")]
#[command(version = env!("GIT_DESCRIBE"))]
struct Cli {
    /// Directory holding the task list (overrides config and TASKLIST_DIR)
    #[arg(short, long)]
    store_path: Option<PathBuf>,

    /// Path to a YAML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log more (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a task
    Add {
        /// Task text; multiple words are joined with spaces
        text: Vec<String>,
    },

    /// List tasks with their index
    List {
        /// Only show tasks containing this text (case-insensitive)
        #[arg(short, long, default_value = "")]
        search: String,
    },

    /// Mark a task done, or not done again
    Toggle { index: usize },

    /// Change the text of a task
    Edit {
        index: usize,
        /// New text; prompts with the current text when omitted
        text: Option<String>,
    },

    /// Delete a task
    Delete {
        index: usize,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(path) = cli.store_path {
        config.data_dir = path;
    }

    let assume_yes = matches!(cli.command, Commands::Delete { yes: true, .. });
    let persistence = Persistence::with_key(config.open_slot()?, config.key.clone())?;
    let mut app = App::open(persistence, TerminalPrompt::new(assume_yes));

    match cli.command {
        Commands::Add { text } => {
            let text = text.join(" ");
            if app.add(&text) {
                println!("Added task {}: {}", app.tasks().len() - 1, text);
            } else {
                println!("Nothing added: task text is empty");
            }
        }
        Commands::List { search } => list(&app, &search),
        Commands::Toggle { index } => {
            if !app.toggle(index) {
                return Err(eyre!("No task at index {}", index));
            }
            let task = &app.tasks()[index];
            let state = if task.completed { "done" } else { "not done" };
            println!("Marked task {} as {}", index, state);
        }
        Commands::Edit { index, text } => edit(&mut app, index, text)?,
        Commands::Delete { index, .. } => {
            if index >= app.tasks().len() {
                return Err(eyre!("No task at index {}", index));
            }
            if app.delete(index) {
                println!("Deleted task {}", index);
            } else {
                println!("Kept task {}", index);
            }
        }
    }

    Ok(())
}

fn list<S: Slot>(app: &App<S, TerminalPrompt>, search: &str) {
    let matches = app.search(search);
    if matches.is_empty() {
        if app.tasks().is_empty() {
            println!("No tasks yet");
        } else {
            println!("No tasks match \"{}\"", search);
        }
        return;
    }

    let now = Utc::now();
    for m in matches {
        let task = m.task;
        let (mark, text) = if task.completed {
            ("✓".green(), task.text.strikethrough().dimmed())
        } else {
            (" ".normal(), task.text.bold())
        };
        println!("{:>3} [{}] {}  {}", m.index, mark, text, task.age(now).dimmed().italic());
    }
}

fn edit<S: Slot>(app: &mut App<S, TerminalPrompt>, index: usize, text: Option<String>) -> Result<()> {
    if app.begin_edit(index).is_none() {
        return Err(eyre!("No task at index {}", index));
    }

    if let Some(text) = text {
        if !app.save_edit(index, &text) {
            return Err(eyre!("Task {} was not updated", index));
        }
        println!("Updated task {}", index);
        return Ok(());
    }

    // Keep asking until the edit is accepted
    while let Some(session) = app.editing() {
        let draft: String = Input::new()
            .with_prompt("Task")
            .with_initial_text(session.draft.clone())
            .allow_empty(true)
            .interact_text()?;
        app.set_draft(draft);
        if app.commit_edit() {
            println!("Updated task {}", index);
        }
    }

    Ok(())
}
