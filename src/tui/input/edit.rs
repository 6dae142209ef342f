use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::tui::app::{App, Mode};
use crate::tui::text_input::TextInput;

/// Keys shared by both text fields. Returns false for keys it doesn't handle.
fn edit_text(input: &mut TextInput, key: KeyEvent) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Char('a') if ctrl => input.home(),
        KeyCode::Char('e') if ctrl => input.end(),
        KeyCode::Char('u') if ctrl => input.kill_to_start(),
        KeyCode::Char('w') if ctrl => input.delete_word_back(),
        KeyCode::Backspace if alt || ctrl => input.delete_word_back(),
        KeyCode::Left if alt || ctrl => input.word_left(),
        KeyCode::Right if alt || ctrl => input.word_right(),
        KeyCode::Char('b') if alt => input.word_left(),
        KeyCode::Char('f') if alt => input.word_right(),
        KeyCode::Char(c) if !ctrl && !alt => input.insert_char(c),
        KeyCode::Backspace => input.backspace(),
        KeyCode::Delete => input.delete(),
        KeyCode::Left => input.left(),
        KeyCode::Right => input.right(),
        KeyCode::Home => input.home(),
        KeyCode::End => input.end(),
        _ => return false,
    }
    true
}

/// New-task input. Enter adds and keeps focus for the next task.
pub(super) fn handle_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_draft(),
        KeyCode::Esc => app.mode = Mode::Navigate,
        _ => {
            edit_text(&mut app.draft, key);
        }
    }
}

/// Inline title edit. Enter commits, Esc restores the old title.
pub(super) fn handle_edit(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_edit(),
        KeyCode::Esc => app.cancel_edit(),
        _ => {
            if let Some(edit) = &mut app.edit {
                edit_text(&mut edit.input, key);
            }
        }
    }
}
