use crate::domain::SubtaskState;
use ratatui::style::{Color, Modifier, Style};

const ACTIVE_BG: Color = Color::Rgb(0xe0, 0xf7, 0xfa);
const COMPLETED_BG: Color = Color::Rgb(0xe6, 0xff, 0xe6);
const ENDED_BG: Color = Color::Rgb(0xff, 0xe0, 0xb2);
const TIMER_BG: Color = Color::Rgb(0xbb, 0xbb, 0xbb);

/// Light or dark colour scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    dark: bool,
}

impl Palette {
    pub fn new(dark: bool) -> Self {
        Self { dark }
    }

    pub fn is_dark(&self) -> bool {
        self.dark
    }

    /// Default text style
    pub fn default_style(&self) -> Style {
        if self.dark {
            Style::default().fg(Color::Gray).bg(Color::Black)
        } else {
            Style::default().fg(Color::Black).bg(Color::White)
        }
    }

    /// Selected row highlight style
    pub fn selected_style(&self) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED);
        if self.dark {
            style.fg(Color::LightCyan)
        } else {
            style.fg(Color::Blue)
        }
    }

    /// Row style for a subtask in the given state
    pub fn subtask_style(&self, state: &SubtaskState) -> Style {
        let base = self.default_style();
        match (state, self.dark) {
            (SubtaskState::Active { .. }, false) => base.bg(ACTIVE_BG),
            (SubtaskState::Completed, false) => base.bg(COMPLETED_BG),
            (SubtaskState::Ended, false) => base.bg(ENDED_BG),
            (SubtaskState::Active { .. }, true) => base.fg(Color::Cyan),
            (SubtaskState::Completed, true) => base.fg(Color::Green),
            (SubtaskState::Ended, true) => base.fg(Color::LightRed),
            (SubtaskState::Upcoming { .. }, _) => base,
        }
    }

    /// Countdown badge style
    pub fn timer_style(&self) -> Style {
        Style::default()
            .fg(Color::White)
            .bg(if self.dark { Color::DarkGray } else { TIMER_BG })
            .add_modifier(Modifier::BOLD)
    }

    /// Title style for panes
    pub fn title_style(&self) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        if self.dark {
            style.fg(Color::Cyan)
        } else {
            style.fg(Color::Blue)
        }
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(if self.dark { Color::Gray } else { Color::DarkGray })
    }

    /// Tree connector style (for subtasks)
    pub fn tree_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    /// Keybinding hint style
    pub fn hint_style(&self) -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn modal_bg_style(&self) -> Style {
        if self.dark {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        } else {
            Style::default().bg(Color::Gray).fg(Color::Black)
        }
    }

    pub fn modal_title_style(&self) -> Style {
        Style::default()
            .fg(if self.dark { Color::Yellow } else { Color::Blue })
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    }
}
