use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};
use crate::tui::text_input::display_width;

fn key_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::Navigate => "a add  space toggle  e edit  d delete  tab filter  q quit",
        Mode::Input => "Enter add  Esc done",
        Mode::Edit => "Enter save  Esc cancel",
        Mode::Confirm => "y delete  n keep",
    }
}

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // Left side: prompt > save warning > status message
    let mut spans: Vec<Span> = Vec::new();
    if let (Mode::Confirm, Some(confirm)) = (app.mode, &app.confirm_state) {
        spans.push(Span::styled(
            format!(" {} ", confirm.message),
            Style::default()
                .fg(app.theme.text_bright)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(
            "y/n",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    } else if let Some(ref msg) = app.status_message {
        // Lasts one key press, so it goes ahead of a standing warning
        spans.push(Span::styled(
            format!(" {}", msg),
            Style::default().fg(app.theme.text).bg(bg),
        ));
    } else if let Some(ref warning) = app.save_warning {
        spans.push(Span::styled(
            format!(" \u{26A0} not saved: {}", warning),
            Style::default().fg(app.theme.red).bg(bg),
        ));
    }

    // Right side: key hints, only if they fit
    if app.show_key_hints {
        let hint = key_hints(app.mode);
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(hint) + 1;
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn navigate_hints_right_aligned() {
        let app = app_with_tasks(&[]);
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        let hint = key_hints(Mode::Navigate);
        // Right-aligned with one cell to spare
        assert_eq!(output.trim_start(), hint);
        assert_eq!(display_width(&output), TERM_W as usize - 1);
    }

    #[test]
    fn hints_dropped_when_too_narrow() {
        let app = app_with_tasks(&[]);
        let output = render_to_string(30, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, "");
    }

    #[test]
    fn confirm_prompt_replaces_message() {
        let mut app = app_with_tasks(&[("Buy milk", false)]);
        app.status_message = Some("something else".into());
        app.request_delete();
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert!(output.starts_with(" Delete \"Buy milk\"? y/n"));
        assert!(output.ends_with("y delete  n keep"));
    }

    #[test]
    fn save_warning_shown() {
        let mut app = app_with_tasks(&[]);
        app.show_key_hints = false;
        app.save_warning = Some("disk full".into());
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, " \u{26A0} not saved: disk full");
    }

    #[test]
    fn fresh_message_shown_over_save_warning() {
        let mut app = app_with_tasks(&[("Done thing", true)]);
        app.show_key_hints = false;
        app.save_warning = Some("disk full".into());
        app.begin_edit();
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, " reopen the task to edit it");

        // Once the message is gone the warning is back
        app.status_message = None;
        let output = render_to_string(TERM_W, 1, |frame, area| {
            render_status_row(frame, &app, area);
        });
        assert_eq!(output, " \u{26A0} not saved: disk full");
    }
}
