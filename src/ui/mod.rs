pub mod header;
pub mod input_form;
pub mod keybindings;
pub mod layout;
pub mod list_pane;
pub mod modal;
pub mod styles;

use crate::app::{AppState, UiMode};
use header::render_header;
use input_form::render_input_form;
use keybindings::render_keybindings;
use layout::create_layout;
use list_pane::render_list_pane;
use modal::render_notification_modal;
use ratatui::{widgets::Block, Frame};
use styles::Palette;

/// Main render function - draws the entire UI
pub fn render(f: &mut Frame, app: &AppState) {
    let size = f.size();
    let palette = Palette::new(app.dark_mode);
    let layout = create_layout(size);

    f.render_widget(Block::default().style(palette.default_style()), size);

    render_header(f, app, layout.header_area);
    render_list_pane(f, app, layout.list_area);
    render_keybindings(f, layout.keybindings_area, &palette);

    // Notifications sit above the form
    if app.input_form.is_some() {
        render_input_form(f, app, size);
    }
    if app.ui_mode() == UiMode::Notice {
        render_notification_modal(f, app, size);
    }
}
