mod confirm;
mod edit;
mod navigate;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Mode};

use confirm::handle_confirm;
use edit::{handle_edit, handle_input};
use navigate::handle_navigate;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }

    // Ctrl+C quits from anywhere; queued saves are flushed on the way out
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // Messages last until the next key
    app.status_message = None;

    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Input => handle_input(app, key),
        Mode::Edit => handle_edit(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// Handle a bracketed paste event (terminal sends pasted text as a single string).
/// Goes into whichever text field has focus; ignored otherwise.
pub fn handle_paste(app: &mut App, text: &str) {
    match app.mode {
        Mode::Input => app.draft.insert_str(text),
        Mode::Edit => {
            if let Some(edit) = &mut app.edit {
                edit.input.insert_str(text);
            }
        }
        Mode::Navigate | Mode::Confirm => {}
    }
}
