use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::{Filter, Task};
use crate::tui::app::{App, Mode};
use crate::tui::text_input::{display_width, truncate_to_width};

/// Cursor accent (1) + checkbox and space (4)
const PREFIX_W: usize = 5;

fn checkbox(completed: bool) -> &'static str {
    if completed { "[x]" } else { "[ ]" }
}

fn empty_message(filter: Filter) -> &'static str {
    match filter {
        Filter::All => " No tasks yet",
        Filter::Active => " No active tasks",
        Filter::Completed => " No completed tasks",
    }
}

/// Render the filtered task list, scrolling to keep the cursor row visible
pub fn render_task_list(frame: &mut Frame, app: &mut App, area: Rect) {
    let count = app.visible_tasks().len();
    let visible_height = area.height as usize;

    app.scroll_offset = app.scroll_offset.min(count.saturating_sub(visible_height));
    if app.cursor < app.scroll_offset {
        app.scroll_offset = app.cursor;
    } else if visible_height > 0 && app.cursor >= app.scroll_offset + visible_height {
        app.scroll_offset = app.cursor + 1 - visible_height;
    }

    let bg = app.theme.background;
    if count == 0 {
        let empty = Paragraph::new(empty_message(app.filter))
            .style(Style::default().fg(app.theme.dim).bg(bg));
        frame.render_widget(empty, area);
        return;
    }

    let app = &*app;
    let width = area.width as usize;
    let mut lines: Vec<Line> = Vec::with_capacity(visible_height);
    let mut edit_cursor: Option<Position> = None;

    for (row, task) in app
        .visible_tasks()
        .into_iter()
        .enumerate()
        .skip(app.scroll_offset)
        .take(visible_height)
    {
        let is_cursor = row == app.cursor;
        let editing = app
            .edit
            .as_ref()
            .filter(|e| app.mode == Mode::Edit && e.task_id == task.id);

        let mut spans = task_prefix(app, task, is_cursor);
        let avail = width.saturating_sub(PREFIX_W + 1);
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

        if let Some(edit) = editing {
            let (visible, col) = edit.input.window(avail);
            spans.push(Span::styled(
                visible.to_string(),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(row_bg)
                    .add_modifier(Modifier::UNDERLINED),
            ));
            edit_cursor = Some(Position::new(
                area.x + (PREFIX_W + col) as u16,
                area.y + (row - app.scroll_offset) as u16,
            ));
        } else {
            let title_style = if task.completed {
                Style::default()
                    .fg(app.theme.dim)
                    .bg(row_bg)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if is_cursor {
                Style::default().fg(app.theme.text_bright).bg(row_bg)
            } else {
                Style::default().fg(app.theme.text).bg(row_bg)
            };
            spans.push(Span::styled(
                truncate_to_width(&task.title, avail),
                title_style,
            ));
        }

        // Fill the rest of the row so the cursor highlight spans the width
        let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if used < width {
            spans.push(Span::styled(
                " ".repeat(width - used),
                Style::default().bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);

    if let Some(pos) = edit_cursor {
        frame.set_cursor_position(pos);
    }
}

/// Cursor accent and checkbox
fn task_prefix(app: &App, task: &Task, is_cursor: bool) -> Vec<Span<'static>> {
    let bg = app.theme.background;
    let row_bg = if is_cursor { app.theme.selection_bg } else { bg };

    let accent = if is_cursor {
        Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.highlight).bg(row_bg),
        )
    } else {
        Span::styled(" ", Style::default().bg(bg))
    };

    let box_color = if task.completed {
        app.theme.green
    } else {
        app.theme.text
    };
    let mut box_style = Style::default().fg(box_color).bg(row_bg);
    if is_cursor {
        box_style = box_style.add_modifier(Modifier::BOLD);
    }

    vec![
        accent,
        Span::styled(checkbox(task.completed), box_style),
        Span::styled(" ", Style::default().bg(row_bg)),
    ]
}
