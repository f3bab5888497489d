use crate::app::AppState;
use crate::notifications::Notification;
use crate::ui::{layout::create_modal_area, styles::Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the oldest pending notification
pub fn render_notification_modal(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(notification) = app.notifications.current() {
        let palette = Palette::new(app.dark_mode);
        let modal_area = create_modal_area(area, 9);

        // Clear the area behind the modal
        f.render_widget(Clear, modal_area);

        let lines = notification_lines(
            notification,
            app.notifications.pending_count().saturating_sub(1),
            &palette,
        );

        let paragraph = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(
                        format!(" {} ", notification.title()),
                        palette.modal_title_style(),
                    ))
                    .style(palette.modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn notification_lines(
    notification: &Notification,
    queued: usize,
    palette: &Palette,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::raw(""),
        Line::raw(format!("  {}", notification)),
        Line::raw(""),
    ];

    if queued > 0 {
        lines.push(Line::raw(format!("  ({} more waiting)", queued)));
        lines.push(Line::raw(""));
    }

    lines.push(Line::from(vec![
        Span::styled("  [Enter]", palette.modal_title_style()),
        Span::raw(" OK"),
    ]));

    lines
}
