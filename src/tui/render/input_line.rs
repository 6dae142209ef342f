use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

pub const PLACEHOLDER: &str = "What do you need to do?";

/// Width of the " › " prompt
const PROMPT_W: u16 = 3;

/// Render the new-task input on the first row of `area`
pub fn render_input_line(frame: &mut Frame, app: &App, area: Rect) {
    if area.height == 0 {
        return;
    }
    let bg = app.theme.background;
    let focused = app.mode == Mode::Input;
    let row = Rect { height: 1, ..area };

    let prompt_style = if focused {
        Style::default()
            .fg(app.theme.highlight)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.dim).bg(bg)
    };

    let avail = row.width.saturating_sub(PROMPT_W + 1) as usize;
    let (visible, cursor_col) = app.draft.window(avail);

    let text_span = if app.draft.is_empty() && !focused {
        Span::styled(
            PLACEHOLDER,
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        )
    } else if app.draft.is_empty() {
        // Focused: keep the hint but make room for the cursor
        Span::styled(PLACEHOLDER, Style::default().fg(app.theme.track).bg(bg))
    } else {
        Span::styled(
            visible.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        )
    };

    let line = Line::from(vec![Span::styled(" \u{203A} ", prompt_style), text_span]);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), row);

    if focused {
        frame.set_cursor_position(Position::new(
            row.x + PROMPT_W + cursor_col as u16,
            row.y,
        ));
    }
}
