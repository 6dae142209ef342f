use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tn", about = concat!("[x] tasknest v", env!("CARGO_PKG_VERSION"), " - one list, done right"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding the task list, config.toml and logs
    #[arg(short = 'C', long = "data-dir", env = "TASKNEST_DIR", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List tasks
    List(ListArgs),
    /// Add a task to the end of the list
    Add(AddArgs),
    /// Flip a task between open and completed
    Toggle(IdArg),
    /// Change a task's title
    Title(TitleArgs),
    /// Permanently delete a task
    Delete(DeleteArgs),
    /// Show how many tasks are completed
    Progress,
}

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show (all, active, completed)
    #[arg(long, default_value = "all")]
    pub filter: String,
}

#[derive(Args)]
pub struct AddArgs {
    /// Task title; surrounding whitespace is trimmed
    pub title: String,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct TitleArgs {
    /// Task ID
    pub id: String,
    /// New title
    pub title: String,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Task ID
    pub id: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}
