use crate::app::{AppState, InputFormState};
use crate::ui::{layout::create_modal_area, styles::Palette};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Render the input form for adding and editing tasks/subtasks
pub fn render_input_form(f: &mut Frame, app: &AppState, area: Rect) {
    if let Some(form) = &app.input_form {
        let palette = Palette::new(app.dark_mode);
        let height = if form.kind.has_times() { 16 } else { 9 };
        let modal_area = create_modal_area(area, height);

        // Clear the area behind the form
        f.render_widget(Clear, modal_area);

        let paragraph = Paragraph::new(form_lines(form, &palette))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(Span::styled(form.kind.title(), palette.modal_title_style()))
                    .style(palette.modal_bg_style()),
            )
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, modal_area);
    }
}

fn form_lines(form: &InputFormState, palette: &Palette) -> Vec<Line<'static>> {
    let mut lines = vec![Line::raw("")];

    push_field(&mut lines, "Name:", &form.name, form.editing_field == 0, palette);

    if form.kind.has_times() {
        push_field(
            &mut lines,
            "Start (YYYY-MM-DD HH:MM):",
            &form.start,
            form.editing_field == 1,
            palette,
        );
        push_field(
            &mut lines,
            "End (YYYY-MM-DD HH:MM):",
            &form.end,
            form.editing_field == 2,
            palette,
        );
    }

    if let Some(error) = &form.error {
        lines.push(Line::styled(error.clone(), palette.error_style()));
        lines.push(Line::raw(""));
    }

    let hint = if form.kind.has_times() {
        "Tab to switch fields  ·  Enter to submit  ·  Esc to cancel"
    } else {
        "Enter to submit  ·  Esc to cancel"
    };
    lines.push(Line::raw(hint));

    lines
}

fn push_field(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    value: &str,
    editing: bool,
    palette: &Palette,
) {
    let label = if editing {
        format!("{} (editing)", label)
    } else {
        label.to_string()
    };
    lines.push(Line::raw(label));

    let mut spans = vec![
        Span::raw("> "),
        Span::styled(value.to_string(), palette.modal_title_style()),
    ];
    if editing {
        spans.push(Span::styled("█", palette.modal_title_style())); // Cursor
    }
    lines.push(Line::from(spans));
    lines.push(Line::raw(""));
}
