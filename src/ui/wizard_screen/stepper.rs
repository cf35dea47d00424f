//! Stepper panel rendering

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use super::{ScreenMode, WizardScreen};
use crate::wizard::{StepStatus, WizardSession};

impl WizardScreen {
    pub(super) fn render_stepper(&mut self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let stepper = session.stepper();
        let jumping = self.mode == ScreenMode::Jump;

        let items: Vec<ListItem> = stepper
            .rows
            .iter()
            .map(|row| {
                let (marker, marker_style) = match row.status {
                    StepStatus::Completed => ("✓", Style::default().fg(Color::Green)),
                    StepStatus::Active => (
                        "●",
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    StepStatus::Pending => ("○", Style::default().fg(Color::DarkGray)),
                };
                let label_style = match (row.status, row.depth) {
                    (StepStatus::Active, 0) => Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                    (StepStatus::Active, _) => Style::default().fg(Color::Cyan),
                    (StepStatus::Completed, _) => Style::default().fg(Color::Gray),
                    (StepStatus::Pending, _) => Style::default().fg(Color::DarkGray),
                };
                let indent = if row.depth == 0 { "" } else { "   " };

                ListItem::new(Line::from(vec![
                    Span::raw(indent),
                    Span::styled(marker, marker_style),
                    Span::raw(" "),
                    Span::styled(row.label.clone(), label_style),
                ]))
            })
            .collect();

        let (title, border) = if jumping {
            (" Jump to ", Color::Yellow)
        } else {
            (" Add Building ", Color::Cyan)
        };
        let list = List::new(items)
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(border)),
            )
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");

        if jumping {
            frame.render_stateful_widget(list, area, &mut self.jump_state);
        } else {
            frame.render_widget(list, area);
        }
    }
}
