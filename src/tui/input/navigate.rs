use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::Filter;
use crate::tui::app::App;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,

        // Movement
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => app.move_cursor(1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => app.move_cursor(-1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.jump_to_top(),
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => app.jump_to_bottom(),
        (_, KeyCode::PageDown) => app.move_cursor(10),
        (_, KeyCode::PageUp) => app.move_cursor(-10),

        // New task input
        (_, KeyCode::Char('a')) | (_, KeyCode::Char('i')) | (_, KeyCode::Char('/')) => {
            app.focus_input()
        }

        // Task actions
        (KeyModifiers::NONE, KeyCode::Char(' ')) | (_, KeyCode::Char('x')) => {
            app.toggle_selected()
        }
        (_, KeyCode::Char('e')) | (_, KeyCode::Enter) => app.begin_edit(),
        (_, KeyCode::Char('d')) | (_, KeyCode::Delete) => app.request_delete(),

        // Filters
        (_, KeyCode::Tab) | (_, KeyCode::Char('l')) | (_, KeyCode::Right) => {
            app.set_filter(app.filter.next())
        }
        (_, KeyCode::BackTab) | (_, KeyCode::Char('h')) | (_, KeyCode::Left) => {
            app.set_filter(app.filter.prev())
        }
        (_, KeyCode::Char('1')) => app.set_filter(Filter::All),
        (_, KeyCode::Char('2')) => app.set_filter(Filter::Active),
        (_, KeyCode::Char('3')) => app.set_filter(Filter::Completed),

        _ => {}
    }
}
