use crate::app::{AppState, UiMode};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input events. Returns true when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    match app.ui_mode() {
        UiMode::Notice => handle_notice_mode(app, key),
        UiMode::Form => handle_input_form_mode(app, key),
        UiMode::Normal => handle_normal_mode(app, key),
    }
}

/// Handle keys in normal mode
fn handle_normal_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.move_selection_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_selection_down(),

        // Add task / subtask
        KeyCode::Char('a') => app.start_add_task(),
        KeyCode::Char('A') => app.start_add_subtask(),

        KeyCode::Char('e') | KeyCode::Char('E') => app.start_edit_selected(),
        KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Delete => app.delete_selected(),

        // Toggle subtask completion
        KeyCode::Enter | KeyCode::Char(' ') => app.toggle_selected_completed(),
        KeyCode::Char('h') | KeyCode::Char('H') => app.toggle_hide_completed(),

        // Pomodoro
        KeyCode::Char('p') | KeyCode::Char('P') => app.start_pomodoro(),
        KeyCode::Char('s') | KeyCode::Char('S') => app.stop_pomodoro(),
        KeyCode::Char('r') | KeyCode::Char('R') => app.reset_pomodoro(),

        KeyCode::Char('d') | KeyCode::Char('D') => app.toggle_dark_mode(),

        KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(true),

        _ => {}
    }
    Ok(false)
}

/// Handle keys while a notification is shown
fn handle_notice_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
        app.dismiss_notification();
    }
    Ok(false)
}

/// Handle keys in input form mode (adding/editing)
fn handle_input_form_mode(app: &mut AppState, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Enter => app.submit_input_form(),
        KeyCode::Esc => app.cancel_input_form(),
        KeyCode::Tab => app.input_form_next_field(),
        KeyCode::Backspace => app.input_form_backspace(),
        KeyCode::Char(c) => app.input_form_add_char(c),
        _ => {}
    }
    Ok(false)
}
