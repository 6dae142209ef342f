use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{Config, Task};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

fn buffer_to_string(terminal: &Terminal<TestBackend>) -> String {
    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();
    buffer_to_string(&terminal)
}

/// Like [`render_to_string`], also returning where the terminal cursor was left.
pub fn render_with_cursor<F>(w: u16, h: u16, f: F) -> (String, (u16, u16))
where
    F: FnOnce(&mut ratatui::Frame),
{
    let mut terminal = Terminal::new(TestBackend::new(w, h)).unwrap();
    terminal.draw(f).unwrap();
    let pos = terminal.get_cursor_position().unwrap();
    (buffer_to_string(&terminal), (pos.x, pos.y))
}

/// Build an App (no saver) holding the given `(title, completed)` tasks,
/// with ids "1", "2", ...
pub fn app_with_tasks(specs: &[(&str, bool)]) -> App {
    let tasks = specs
        .iter()
        .enumerate()
        .map(|(i, (title, completed))| Task {
            id: (i + 1).to_string(),
            title: title.to_string(),
            completed: *completed,
        })
        .collect();
    App::new(tasks, &Config::default(), None)
}
