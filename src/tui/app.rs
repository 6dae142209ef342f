use std::io;
use std::path::Path;
use std::time::Duration;

use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEventKind,
};
use crossterm::{cursor, execute};
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::io::config_io::read_config_or_default;
use crate::io::saver::{SaveOutcome, Saver};
use crate::io::store::{FileKv, TaskStore};
use crate::model::{Config, Filter, Progress, Task};
use crate::ops::task_ops::{self, IdGenerator};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Moving around the list
    Navigate,
    /// Typing into the new-task input
    Input,
    /// Editing the title of an existing task
    Edit,
    /// Waiting for a y/n answer
    Confirm,
}

/// An in-progress title edit
#[derive(Debug, Clone)]
pub struct EditState {
    pub task_id: String,
    pub input: TextInput,
}

/// Actions that need a y/n answer first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteTask { task_id: String },
}

#[derive(Debug, Clone)]
pub struct ConfirmState {
    pub message: String,
    pub action: ConfirmAction,
}

/// Main application state. Owns the task list, the filter and the draft;
/// every change to the list goes through `commit`, which hands the
/// new snapshot to the background saver.
pub struct App {
    pub tasks: Vec<Task>,
    pub filter: Filter,
    /// New-task input (never persisted)
    pub draft: TextInput,
    pub mode: Mode,
    pub edit: Option<EditState>,
    pub confirm_state: Option<ConfirmState>,
    /// Index into the filtered list
    pub cursor: usize,
    /// First visible row of the list
    pub scroll_offset: usize,
    pub status_message: Option<String>,
    /// Last save failure, cleared by the next successful save
    pub save_warning: Option<String>,
    pub should_quit: bool,
    pub theme: Theme,
    pub show_key_hints: bool,
    pub confirm_delete: bool,
    ids: IdGenerator,
    saver: Option<Saver>,
}

impl App {
    pub fn new(tasks: Vec<Task>, config: &Config, saver: Option<Saver>) -> Self {
        App {
            tasks,
            filter: Filter::All,
            draft: TextInput::new(),
            mode: Mode::Navigate,
            edit: None,
            confirm_state: None,
            cursor: 0,
            scroll_offset: 0,
            status_message: None,
            save_warning: None,
            should_quit: false,
            theme: Theme::from_config(&config.ui),
            show_key_hints: config.ui.show_key_hints,
            confirm_delete: config.ui.confirm_delete,
            ids: IdGenerator::new(),
            saver,
        }
    }

    // -----------------------------------------------------------------------
    // Derived view
    // -----------------------------------------------------------------------

    /// Tasks visible under the current filter
    pub fn visible_tasks(&self) -> Vec<&Task> {
        task_ops::filter(&self.tasks, self.filter).collect()
    }

    pub fn progress(&self) -> Progress {
        task_ops::progress(&self.tasks)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        task_ops::filter(&self.tasks, self.filter).nth(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let count = task_ops::filter(&self.tasks, self.filter).count();
        self.cursor = self.cursor.min(count.saturating_sub(1));
    }

    pub fn move_cursor(&mut self, delta: i32) {
        let count = task_ops::filter(&self.tasks, self.filter).count();
        if count == 0 {
            return;
        }
        let next = (self.cursor as i64 + delta as i64).clamp(0, count as i64 - 1);
        self.cursor = next as usize;
    }

    pub fn jump_to_top(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_to_bottom(&mut self) {
        let count = task_ops::filter(&self.tasks, self.filter).count();
        self.cursor = count.saturating_sub(1);
    }

    /// Switch filter, keeping the selected task under the cursor if it is
    /// still visible.
    pub fn set_filter(&mut self, filter: Filter) {
        if filter == self.filter {
            return;
        }
        let selected = self.selected_task().map(|t| t.id.clone());
        self.filter = filter;
        self.cursor = selected
            .and_then(|id| task_ops::filter(&self.tasks, filter).position(|t| t.id == id))
            .unwrap_or(0);
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Replace the task list and queue a save. No-op results are dropped.
    fn commit(&mut self, next: Vec<Task>) -> bool {
        if next == self.tasks {
            return false;
        }
        self.tasks = next;
        self.clamp_cursor();
        if let Some(saver) = &self.saver {
            saver.submit(self.tasks.clone());
        }
        true
    }

    /// Append a task. Returns its id, or None for a blank title.
    pub fn add_task(&mut self, title: &str) -> Option<String> {
        let next = task_ops::add(&self.tasks, title, &mut self.ids);
        if !self.commit(next) {
            return None;
        }
        let id = self.tasks.last().map(|t| t.id.clone());
        tracing::debug!(id = ?id, "added task");
        id
    }

    pub fn toggle_task(&mut self, id: &str) -> bool {
        let next = task_ops::toggle(&self.tasks, id);
        self.commit(next)
    }

    /// Rename a task. Blank titles and unknown ids leave the list unchanged.
    pub fn update_title(&mut self, id: &str, title: &str) -> bool {
        let next = task_ops::update(&self.tasks, id, title);
        self.commit(next)
    }

    /// Delete a task if `confirm` agrees. The gate only runs for tasks that
    /// exist; returns whether anything was removed.
    pub fn delete_with(&mut self, id: &str, confirm: impl FnOnce(&Task) -> bool) -> bool {
        match task_ops::delete_if(&self.tasks, id, confirm) {
            Some(next) => self.commit(next),
            None => false,
        }
    }

    // -----------------------------------------------------------------------
    // UI actions
    // -----------------------------------------------------------------------

    pub fn focus_input(&mut self) {
        self.mode = Mode::Input;
    }

    /// Add the draft as a new task. A blank draft is kept as typed.
    pub fn submit_draft(&mut self) {
        let title = self.draft.text().to_string();
        if self.add_task(&title).is_some() {
            self.draft.clear();
            // Show the new task: it lands at the end, and is active
            if self.filter == Filter::Completed {
                self.set_filter(Filter::All);
            }
            self.jump_to_bottom();
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id.clone()) {
            self.toggle_task(&id);
        }
    }

    /// Start editing the selected task's title. Completed tasks must be
    /// reopened first.
    pub fn begin_edit(&mut self) {
        let Some(task) = self.selected_task() else {
            return;
        };
        if task.completed {
            self.status_message = Some("reopen the task to edit it".to_string());
            return;
        }
        self.edit = Some(EditState {
            task_id: task.id.clone(),
            input: TextInput::with_text(&task.title),
        });
        self.mode = Mode::Edit;
    }

    /// Apply the edit. A blank title is rejected and the old one stays.
    pub fn commit_edit(&mut self) {
        let Some(edit) = self.edit.take() else {
            self.mode = Mode::Navigate;
            return;
        };
        self.mode = Mode::Navigate;
        if task_ops::normalize_title(edit.input.text()).is_none() {
            self.status_message = Some("title can't be empty; kept the old one".to_string());
            return;
        }
        self.update_title(&edit.task_id, edit.input.text());
    }

    pub fn cancel_edit(&mut self) {
        self.edit = None;
        self.mode = Mode::Navigate;
    }

    /// Delete the selected task, asking first unless confirmation is off.
    pub fn request_delete(&mut self) {
        let Some((task_id, title)) = self.selected_task().map(|t| (t.id.clone(), t.title.clone()))
        else {
            return;
        };
        if !self.confirm_delete {
            self.delete_with(&task_id, |_| true);
            return;
        }
        self.confirm_state = Some(ConfirmState {
            message: format!("Delete \"{}\"?", title),
            action: ConfirmAction::DeleteTask { task_id },
        });
        self.mode = Mode::Confirm;
    }

    /// Resolve the pending confirmation
    pub fn answer_confirm(&mut self, yes: bool) {
        self.mode = Mode::Navigate;
        let Some(state) = self.confirm_state.take() else {
            return;
        };
        match state.action {
            ConfirmAction::DeleteTask { task_id } => {
                if self.delete_with(&task_id, |_| yes) {
                    self.status_message = Some("deleted".to_string());
                }
            }
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Pick up finished background saves
    pub fn poll_saves(&mut self) {
        let Some(saver) = &self.saver else {
            return;
        };
        for outcome in saver.poll() {
            match outcome {
                SaveOutcome::Saved { .. } => self.save_warning = None,
                SaveOutcome::Failed(msg) => self.save_warning = Some(msg),
            }
        }
    }

    /// Block until queued saves are written
    pub fn flush_saves(&self) {
        if let Some(saver) = &self.saver {
            saver.flush();
        }
    }

    /// Stop the saver, writing anything still queued
    pub fn shutdown(&mut self) {
        if let Some(saver) = self.saver.take() {
            for outcome in saver.shutdown() {
                if let SaveOutcome::Failed(msg) = outcome {
                    tracing::error!(error = %msg, "final save failed");
                }
            }
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = read_config_or_default(data_dir);

    enable_raw_mode()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));

    with_restore(|| run_in_terminal(data_dir, &config), restore_terminal)
}

/// Run `body`, then `restore` whether or not `body` failed. The body's error
/// wins over a restore error.
fn with_restore<T>(
    body: impl FnOnce() -> Result<T, Box<dyn std::error::Error>>,
    restore: impl FnOnce() -> io::Result<()>,
) -> Result<T, Box<dyn std::error::Error>> {
    let result = body();
    let restored = restore();
    let value = result?;
    restored?;
    Ok(value)
}

fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        io::stdout(),
        DisableBracketedPaste,
        LeaveAlternateScreen,
        cursor::Show
    )
}

fn run_in_terminal(data_dir: &Path, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Nothing is accepted until the list is loaded
    let theme = Theme::from_config(&config.ui);
    terminal.draw(|frame| render::render_loading(frame, &theme))?;

    load_and_run(&mut terminal, data_dir, config)
}

fn load_and_run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    data_dir: &Path,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = TaskStore::new(FileKv::new(data_dir));
    let tasks = store.load_or_empty();
    let saver = Saver::spawn(store)?;
    let mut app = App::new(tasks, config, Some(saver));

    let result = run_event_loop(terminal, &mut app);
    app.shutdown();
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(250))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::handle_key(app, key);
                }
                Event::Paste(text) => input::handle_paste(app, &text),
                _ => {}
            }
        }
        app.poll_saves();

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryKv;
    use pretty_assertions::assert_eq;

    fn titles(app: &App) -> Vec<&str> {
        app.visible_tasks().iter().map(|t| t.title.as_str()).collect()
    }

    fn app_with_store() -> (App, MemoryKv) {
        let kv = MemoryKv::new();
        let saver = Saver::spawn(TaskStore::new(kv.clone())).unwrap();
        (App::new(Vec::new(), &Config::default(), Some(saver)), kv)
    }

    fn stored(kv: &MemoryKv) -> Vec<Task> {
        TaskStore::new(kv.clone()).load().unwrap()
    }

    #[test]
    fn every_mutation_is_persisted() {
        let (mut app, kv) = app_with_store();
        let id = app.add_task("Buy milk").unwrap();
        app.flush_saves();
        assert_eq!(stored(&kv), app.tasks);

        app.toggle_task(&id);
        app.flush_saves();
        assert!(stored(&kv)[0].completed);

        app.delete_with(&id, |_| true);
        app.flush_saves();
        assert!(stored(&kv).is_empty());
    }

    #[test]
    fn blank_draft_is_kept_and_not_added() {
        let (mut app, _kv) = app_with_store();
        app.draft = TextInput::with_text("   ");
        app.submit_draft();
        assert!(app.tasks.is_empty());
        assert_eq!(app.draft.text(), "   ");

        app.draft = TextInput::with_text(" Walk dog ");
        app.submit_draft();
        assert_eq!(titles(&app), vec!["Walk dog"]);
        assert!(app.draft.is_empty());
    }

    #[test]
    fn filter_view_and_progress() {
        let (mut app, _kv) = app_with_store();
        app.add_task("A");
        let b = app.add_task("B").unwrap();
        app.add_task("C");
        app.toggle_task(&b);

        app.set_filter(Filter::Active);
        assert_eq!(titles(&app), vec!["A", "C"]);
        app.set_filter(Filter::Completed);
        assert_eq!(titles(&app), vec!["B"]);
        // Progress ignores the filter
        assert_eq!(app.progress().total, 3);
        assert_eq!(app.progress().percentage, 33);
    }

    #[test]
    fn filter_switch_keeps_selection_when_visible() {
        let (mut app, _kv) = app_with_store();
        app.add_task("A");
        app.add_task("B");
        app.add_task("C");
        app.cursor = 2;
        app.set_filter(Filter::Active);
        assert_eq!(app.selected_task().unwrap().title, "C");
        app.set_filter(Filter::Completed);
        assert_eq!(app.cursor, 0);
        assert!(app.selected_task().is_none());
    }

    #[test]
    fn blank_edit_falls_back_to_old_title() {
        let (mut app, _kv) = app_with_store();
        app.add_task("B");
        app.begin_edit();
        assert_eq!(app.mode, Mode::Edit);
        app.edit.as_mut().unwrap().input.clear();
        app.commit_edit();
        assert_eq!(app.mode, Mode::Navigate);
        assert_eq!(titles(&app), vec!["B"]);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn edit_renames() {
        let (mut app, _kv) = app_with_store();
        app.add_task("Bye milk");
        app.begin_edit();
        app.edit.as_mut().unwrap().input = TextInput::with_text("Buy milk ");
        app.commit_edit();
        assert_eq!(titles(&app), vec!["Buy milk"]);
    }

    #[test]
    fn completed_tasks_cannot_be_edited() {
        let (mut app, _kv) = app_with_store();
        let id = app.add_task("Done thing").unwrap();
        app.toggle_task(&id);
        app.begin_edit();
        assert_eq!(app.mode, Mode::Navigate);
        assert!(app.edit.is_none());
    }

    #[test]
    fn delete_waits_for_confirmation() {
        let (mut app, _kv) = app_with_store();
        app.add_task("A");
        app.add_task("B");

        app.request_delete();
        assert_eq!(app.mode, Mode::Confirm);
        app.answer_confirm(false);
        assert_eq!(titles(&app), vec!["A", "B"]);

        app.request_delete();
        app.answer_confirm(true);
        assert_eq!(titles(&app), vec!["B"]);
        assert_eq!(app.mode, Mode::Navigate);
    }

    #[test]
    fn delete_gate_sees_the_task_and_skips_unknown_ids() {
        let (mut app, _kv) = app_with_store();
        let id = app.add_task("Keep me").unwrap();
        let mut asked = Vec::new();
        assert!(!app.delete_with(&id, |t| {
            asked.push(t.title.clone());
            false
        }));
        assert_eq!(asked, vec!["Keep me"]);
        assert!(!app.delete_with("missing", |_| panic!("gate must not run")));
        assert_eq!(app.tasks.len(), 1);
    }

    #[test]
    fn cursor_is_clamped_after_delete() {
        let (mut app, _kv) = app_with_store();
        app.add_task("A");
        app.add_task("B");
        app.jump_to_bottom();
        let id = app.selected_task().unwrap().id.clone();
        app.delete_with(&id, |_| true);
        assert_eq!(app.cursor, 0);
    }

    #[test]
    fn terminal_is_restored_when_setup_fails() {
        let mut restored = false;
        let result: Result<(), _> = with_restore(
            || Err("could not draw".into()),
            || {
                restored = true;
                Ok(())
            },
        );
        assert!(restored);
        assert_eq!(result.unwrap_err().to_string(), "could not draw");

        let mut restored = false;
        let value = with_restore(
            || Ok(7),
            || {
                restored = true;
                Ok(())
            },
        )
        .unwrap();
        assert!(restored);
        assert_eq!(value, 7);
    }

    #[test]
    fn save_failure_becomes_warning() {
        let saver = Saver::spawn(TaskStore::new(MemoryKv::failing())).unwrap();
        let mut app = App::new(Vec::new(), &Config::default(), Some(saver));
        app.add_task("A");
        app.flush_saves();
        app.poll_saves();
        assert!(app.save_warning.is_some());
        // In-memory state is untouched
        assert_eq!(app.tasks.len(), 1);
    }
}
