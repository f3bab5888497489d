use crate::app::AppState;
use crate::pomodoro::{PomodoroPhase, PomodoroTimer};
use crate::ui::styles::Palette;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the header bar with the pomodoro timer and theme indicator
pub fn render_header(f: &mut Frame, app: &AppState, area: Rect) {
    let palette = Palette::new(app.dark_mode);

    let paragraph = Paragraph::new(create_header_line(&app.pomodoro, &palette))
        .style(palette.default_style())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border_style())
                .title(Span::styled(" Timebox ", palette.title_style())),
        );

    f.render_widget(paragraph, area);
}

fn create_header_line(pomodoro: &PomodoroTimer, palette: &Palette) -> Line<'static> {
    let mut spans = vec![
        Span::raw(" Pomodoro "),
        Span::styled(format!(" {} ", pomodoro.display()), palette.timer_style()),
    ];

    if pomodoro.phase() != PomodoroPhase::Idle {
        spans.push(Span::raw(format!("  {}", pomodoro.phase().label())));
    }

    let theme = if palette.is_dark() { "dark" } else { "light" };
    spans.push(Span::styled(format!("   [{}]", theme), palette.hint_style()));

    Line::from(spans)
}
