pub mod header;
pub mod input_line;
pub mod status_row;
pub mod tab_bar;
pub mod task_list;

#[cfg(test)]
pub(crate) mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::{Block, Paragraph};

use super::app::App;
use super::theme::Theme;

/// Main render function. Dispatches to sub-renderers.
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2) | input (2) | filter tabs (2) | list | status row (1)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + progress bar
            Constraint::Length(2), // input line + gap
            Constraint::Length(2), // tabs + separator
            Constraint::Min(1),    // task list
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);
    input_line::render_input_line(frame, app, chunks[1]);
    tab_bar::render_tab_bar(frame, app, chunks[2]);
    task_list::render_task_list(frame, app, chunks[3]);
    status_row::render_status_row(frame, app, chunks[4]);
}

/// Placeholder frame shown while the task list is read from disk
pub fn render_loading(frame: &mut Frame, theme: &Theme) {
    let area = frame.area();
    let loading = Paragraph::new(" Loading\u{2026}")
        .style(Style::default().fg(theme.dim).bg(theme.background));
    frame.render_widget(loading, area);
}
