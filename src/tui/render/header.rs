use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Progress;
use crate::tui::app::App;
use crate::tui::text_input::display_width;

const TITLE: &str = " TaskNest";

/// Render the header: title and count on the first row, progress bar below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title + count
            Constraint::Length(1), // progress bar
        ])
        .split(area);

    let progress = app.progress();
    render_title_row(frame, app, &progress, chunks[0]);
    render_progress_bar(frame, app, &progress, chunks[1]);
}

fn render_title_row(frame: &mut Frame, app: &App, progress: &Progress, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let mut spans = vec![Span::styled(
        TITLE,
        Style::default()
            .fg(app.theme.purple)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )];

    let count = format!("{}/{}", progress.completed, progress.total);
    // +1 keeps a space at the right edge
    let used = display_width(TITLE) + count.len() + 1;
    if used <= width {
        spans.push(Span::styled(" ".repeat(width - used), Style::default().bg(bg)));
        spans.push(Span::styled(
            count,
            Style::default().fg(app.theme.text).bg(bg),
        ));
    }

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

fn render_progress_bar(frame: &mut Frame, app: &App, progress: &Progress, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let label = format!(" {}% completed", progress.percentage);
    // One leading and one trailing space around bar + label
    let bar_width = width.saturating_sub(label.len() + 2);
    let filled = bar_width * progress.percentage as usize / 100;

    let fill_color = if progress.total > 0 && progress.completed == progress.total {
        app.theme.green
    } else {
        app.theme.highlight
    };

    let spans = vec![
        Span::styled(" ", Style::default().bg(bg)),
        Span::styled(
            "\u{2588}".repeat(filled),
            Style::default().fg(fill_color).bg(bg),
        ),
        Span::styled(
            "\u{2591}".repeat(bar_width - filled),
            Style::default().fg(app.theme.track).bg(bg),
        ),
        Span::styled(label, Style::default().fg(app.theme.dim).bg(bg)),
    ];

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}
