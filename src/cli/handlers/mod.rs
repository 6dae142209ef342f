use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::store::{FileKv, TaskStore};
use crate::model::{Filter, Task};
use crate::ops::task_ops::{self, IdGenerator};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run one subcommand against the task list in `data_dir`
pub fn dispatch(command: Commands, json: bool, data_dir: &Path) -> CmdResult {
    let mut store = TaskStore::new(FileKv::new(data_dir));
    match command {
        // Read commands
        Commands::List(args) => cmd_list(&store, args, json),
        Commands::Progress => cmd_progress(&store, json),

        // Write commands
        Commands::Add(args) => cmd_add(&mut store, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut store, args, json),
        Commands::Title(args) => cmd_title(&mut store, args, json),
        Commands::Delete(args) => cmd_delete(&mut store, args),
    }
}

fn find_or_err<'a>(tasks: &'a [Task], id: &str) -> Result<&'a Task, Box<dyn std::error::Error>> {
    task_ops::find_task(tasks, id).ok_or_else(|| format!("task not found: {}", id).into())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &TaskStore<FileKv>, args: ListArgs, json: bool) -> CmdResult {
    let filter = Filter::parse_filter(&args.filter).ok_or_else(|| {
        format!(
            "unknown filter '{}' (expected all, active or completed)",
            args.filter
        )
    })?;
    let tasks = store.load_readonly();
    let visible: Vec<&Task> = task_ops::filter(&tasks, filter).collect();

    if json {
        let out = TaskListJson::new(filter, visible, task_ops::progress(&tasks));
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for task in visible {
            println!("{}", format_task_line(task));
        }
    }
    Ok(())
}

fn cmd_progress(store: &TaskStore<FileKv>, json: bool) -> CmdResult {
    let tasks = store.load_readonly();
    let progress = task_ops::progress(&tasks);
    if json {
        println!("{}", serde_json::to_string_pretty(&progress)?);
    } else {
        println!("{}", format_progress(&progress));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut TaskStore<FileKv>, args: AddArgs, json: bool) -> CmdResult {
    let tasks = store.load_or_empty();
    let mut ids = IdGenerator::new();
    let next = task_ops::add(&tasks, &args.title, &mut ids);
    if next == tasks {
        // Blank title: nothing to add
        return Ok(());
    }
    store.save(&next)?;

    let Some(task) = next.last() else {
        return Ok(());
    };
    tracing::debug!(id = %task.id, "added task from cli");
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{}", task.id);
    }
    Ok(())
}

fn cmd_toggle(store: &mut TaskStore<FileKv>, args: IdArg, json: bool) -> CmdResult {
    let tasks = store.load_or_empty();
    find_or_err(&tasks, &args.id)?;
    let next = task_ops::toggle(&tasks, &args.id);
    store.save(&next)?;

    let task = find_or_err(&next, &args.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else if task.completed {
        println!("{} completed", task.id);
    } else {
        println!("{} reopened", task.id);
    }
    Ok(())
}

fn cmd_title(store: &mut TaskStore<FileKv>, args: TitleArgs, json: bool) -> CmdResult {
    let tasks = store.load_or_empty();
    if find_or_err(&tasks, &args.id)?.completed {
        return Err(format!("task {} is completed; toggle it open before renaming", args.id).into());
    }
    if task_ops::normalize_title(&args.title).is_none() {
        eprintln!("title is blank; {} unchanged", args.id);
        return Ok(());
    }
    let next = task_ops::update(&tasks, &args.id, &args.title);
    store.save(&next)?;

    let task = find_or_err(&next, &args.id)?;
    if json {
        println!("{}", serde_json::to_string_pretty(task)?);
    } else {
        println!("{} title updated", task.id);
    }
    Ok(())
}

fn cmd_delete(store: &mut TaskStore<FileKv>, args: DeleteArgs) -> CmdResult {
    let tasks = store.load_or_empty();
    find_or_err(&tasks, &args.id)?;

    let mut prompt_err = None;
    let next = task_ops::delete_if(&tasks, &args.id, |task| {
        if args.yes {
            return true;
        }
        let question = format!("Delete \"{}\"?", task.title);
        prompt_yes_no(&question, &mut io::stdin().lock()).unwrap_or_else(|e| {
            prompt_err = Some(e);
            false
        })
    });
    if let Some(e) = prompt_err {
        return Err(e.into());
    }

    match next {
        Some(next) => {
            store.save(&next)?;
            println!("{} deleted", args.id);
        }
        None => println!("cancelled"),
    }
    Ok(())
}

/// Ask on stderr, read one line. Only `y`/`yes` counts as agreement.
fn prompt_yes_no(question: &str, input: &mut impl BufRead) -> io::Result<bool> {
    eprint!("{} [y/n] ", question);
    io::stderr().flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
