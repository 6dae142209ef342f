use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Filter;
use crate::tui::app::App;
use crate::tui::text_input::display_width;

/// Render the filter tabs with a separator line below
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tabs
            Constraint::Length(1), // separator
        ])
        .split(area);

    let sep_cols = render_tabs(frame, app, chunks[0]);
    render_separator(frame, app, chunks[1], &sep_cols);
}

/// Render tabs and return the column of each `│` so the separator can join it.
fn render_tabs(frame: &mut Frame, app: &App, area: Rect) -> Vec<usize> {
    let bg = app.theme.background;
    let mut spans: Vec<Span> = vec![Span::styled(" ", Style::default().bg(bg))];
    let mut sep_cols: Vec<usize> = Vec::new();
    let sep = Span::styled("\u{2502}", Style::default().fg(app.theme.dim).bg(bg));

    for filter in Filter::TABS {
        let is_current = app.filter == filter;
        spans.push(Span::styled(
            format!(" {} ", filter.label()),
            tab_style(app, is_current),
        ));
        sep_cols.push(spans.iter().map(|s| display_width(&s.content)).sum());
        spans.push(sep.clone());
    }

    let line = Line::from(spans);
    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
    sep_cols
}

fn render_separator(frame: &mut Frame, app: &App, area: Rect, sep_cols: &[usize]) {
    let width = area.width as usize;
    let line: String = (0..width)
        .map(|col| {
            if sep_cols.contains(&col) {
                '\u{2534}'
            } else {
                '\u{2500}'
            }
        })
        .collect();
    let sep_widget =
        Paragraph::new(line).style(Style::default().fg(app.theme.dim).bg(app.theme.background));
    frame.render_widget(sep_widget, area);
}

/// Style for a tab: highlighted if current, normal otherwise
fn tab_style(app: &App, is_current: bool) -> Style {
    if is_current {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(app.theme.selection_bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(app.theme.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use insta::assert_snapshot;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn tabs_and_joined_separator() {
        let app = app_with_tasks(&[]);
        let output = render_to_string(30, 2, |frame, area| {
            render_tab_bar(frame, &app, area);
        });
        assert_snapshot!(output, @r"
          ALL │ ACTIVE │ COMPLETED │
        ──────┴────────┴───────────┴──
        ");
    }

    #[test]
    fn current_tab_is_highlighted() {
        let mut app = app_with_tasks(&[]);
        app.set_filter(Filter::Active);
        let mut terminal = Terminal::new(TestBackend::new(30, 2)).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                render_tab_bar(frame, &app, area);
            })
            .unwrap();
        let buf = terminal.backend().buffer();
        // "A" of ACTIVE sits at column 8
        assert_eq!(buf[(8, 0)].symbol(), "A");
        assert_eq!(buf[(8, 0)].bg, app.theme.selection_bg);
        assert_eq!(buf[(2, 0)].bg, app.theme.background);
    }
}
