//! Example 01: Basic Usage
//!
//! This example walks a task list through add, toggle, edit, search and
//! delete, printing what ends up in the persisted slot after each step.
//!
//! Run with: cargo run --example 01_basic_usage

use eyre::Result;
use tasklist::{App, FileSlot, Persistence, ScriptedPrompt, Slot};

fn show<S: Slot>(label: &str, app: &App<S, ScriptedPrompt>) -> Result<()> {
    let stored = app.persistence().slot().read(app.persistence().key())?;
    println!("{}", label);
    println!("   slot: {}\n", stored.unwrap_or_else(|| "<empty>".to_string()));
    Ok(())
}

fn main() -> Result<()> {
    // Create a temporary directory for this example
    let temp_dir = tempfile::tempdir()?;

    println!("TaskList Basic Usage Example");
    println!("============================\n");
    println!("Slot directory: {}\n", temp_dir.path().display());

    // The scripted prompt answers "yes" to the one delete confirmation below
    let slot = FileSlot::open(temp_dir.path())?;
    let mut app = App::open(Persistence::new(slot), ScriptedPrompt::answering([true]));

    app.add("Buy milk");
    show("1. ADD - \"Buy milk\"", &app)?;

    app.add("Clean house");
    show("2. ADD - \"Clean house\"", &app)?;

    app.add("   ");
    show("3. ADD - blank text is ignored", &app)?;

    app.toggle(0);
    show("4. TOGGLE - task 0 is done", &app)?;

    app.begin_edit(1);
    app.save_edit(1, "");
    println!("5. EDIT - blank text is rejected");
    println!("   notices: {:?}\n", app.prompt().notices);

    app.save_edit(1, "Clean the house");
    show("6. EDIT - task 1 renamed", &app)?;

    println!("7. SEARCH - \"CLEAN\"");
    for m in app.search("CLEAN") {
        println!("   [{}] {}", m.index, m.task.text);
    }
    println!();

    app.delete(0);
    show("8. DELETE - task 0 removed after confirmation", &app)?;

    println!("Example complete!");
    Ok(())
}
