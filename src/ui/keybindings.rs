use crate::ui::styles::Palette;
use ratatui::{layout::Rect, text::{Line, Span}, widgets::Paragraph, Frame};

/// Render the keybindings hint bar
pub fn render_keybindings(f: &mut Frame, area: Rect, palette: &Palette) {
    let hints = Line::from(vec![
        Span::raw(" ↑/↓ select   "),
        Span::raw("a add   "),
        Span::raw("A subtask   "),
        Span::raw("e edit   "),
        Span::raw("x delete   "),
        Span::raw("Enter done   "),
        Span::raw("h hide done   "),
        Span::raw("p/s/r pomodoro   "),
        Span::raw("d theme   "),
        Span::raw("q quit"),
    ]);

    let paragraph = Paragraph::new(hints).style(palette.hint_style());
    f.render_widget(paragraph, area);
}
