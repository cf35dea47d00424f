//! Completion screen rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph},
    Frame,
};

use super::WizardScreen;
use crate::ui::centered_rect;
use crate::wizard::WizardSession;

impl WizardScreen {
    pub(super) fn render_completion(&self, frame: &mut Frame, session: &WizardSession) {
        let area = centered_rect(60, 50, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Add Building ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(2), // Message
                Constraint::Length(1), // Progress
                Constraint::Min(1),    // Spacer
                Constraint::Length(1), // Footer
            ])
            .split(inner);

        let title = Paragraph::new(Line::from(Span::styled(
            "Building Setup Completed!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        let saved = session.form_data().len();
        let message = Paragraph::new(vec![
            Line::from("All information has been saved successfully."),
            Line::from(Span::styled(
                format!("{saved} sections stored"),
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .alignment(Alignment::Center);
        frame.render_widget(message, chunks[1]);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(session.progress()))
            .label(format!("{}% completed", session.progress()));
        frame.render_widget(gauge, chunks[2]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("n", Style::default().fg(Color::Yellow)),
            Span::raw(" add another building  "),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, chunks[4]);
    }
}
