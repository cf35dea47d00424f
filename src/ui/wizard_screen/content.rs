//! Rendering of the current sub-step: header, fields and actions

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use super::WizardScreen;
use crate::wizard::{ContentState, WizardSession};

/// Lines taken by one field: label, input and issue
const ROW_HEIGHT: u16 = 3;

impl WizardScreen {
    pub(super) fn render_header(&self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let Some(info) = session.current_step_info() else {
            return;
        };

        let mut title = vec![Span::styled(
            info.title,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(sub) = session.sub_step_progress() {
            title.push(Span::styled(
                format!("  {} out of {} steps", sub.current, sub.total),
                Style::default().fg(Color::DarkGray),
            ));
        }

        let lines = vec![
            Line::from(Span::styled(
                info.step_name,
                Style::default().fg(Color::Gray),
            )),
            Line::from(title),
            Line::from(Span::styled(
                info.description,
                Style::default().fg(Color::Gray),
            )),
        ];
        frame.render_widget(
            Paragraph::new(lines).wrap(Wrap { trim: true }),
            area.inner(Margin::new(1, 0)),
        );
    }

    pub(super) fn render_progress(&self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let percent = session.progress();
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Green).bg(Color::Black))
            .percent(u16::from(percent))
            .label(format!("{percent}% completed"));
        frame.render_widget(gauge, area.inner(Margin::new(1, 0)));
    }

    pub(super) fn render_content(&self, frame: &mut Frame, area: Rect, session: &WizardSession) {
        let heading = match session.content() {
            ContentState::Ready(content) => content.heading.clone(),
            _ => None,
        }
        .or_else(|| session.current_sub_step().map(|s| s.name.clone()))
        .unwrap_or_default();

        let block = Block::default()
            .title(format!(" {heading} "))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        match session.content() {
            ContentState::Idle | ContentState::Loading(_) => {
                let loading = Paragraph::new(Line::from(Span::styled(
                    "Loading...",
                    Style::default().fg(Color::DarkGray),
                )))
                .alignment(Alignment::Center);
                frame.render_widget(loading, inner);
            }
            ContentState::Failed { component, message } => {
                let lines = vec![
                    Line::from(Span::styled(
                        format!("Failed to load component '{component}'"),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        message.as_str(),
                        Style::default().fg(Color::Gray),
                    )),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("F5", Style::default().fg(Color::Yellow)),
                        Span::raw(" retry"),
                    ]),
                ];
                frame.render_widget(
                    Paragraph::new(lines)
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true }),
                    inner,
                );
            }
            ContentState::Ready(_) => self.render_fields(frame, inner),
        }
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect) {
        if self.rows.is_empty() {
            let empty = Paragraph::new(Line::from(Span::styled(
                "Nothing to fill in here.",
                Style::default().fg(Color::DarkGray),
            )))
            .alignment(Alignment::Center);
            frame.render_widget(empty, area);
            return;
        }

        // Scroll so the focused field stays visible
        let visible = usize::from((area.height / ROW_HEIGHT).max(1));
        let first = self.focus.saturating_sub(visible - 1);

        let mut y = area.y;
        for (index, row) in self.rows.iter().enumerate().skip(first).take(visible) {
            let focused = index == self.focus;

            let mut label = vec![Span::styled(
                row.spec.label.clone(),
                if focused {
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::White)
                },
            )];
            if row.spec.required {
                label.push(Span::styled(" *", Style::default().fg(Color::Red)));
            }
            if let Some(unit) = &row.spec.unit {
                label.push(Span::styled(
                    format!(" ({unit})"),
                    Style::default().fg(Color::DarkGray),
                ));
            }

            let line_area =
                |offset: u16| Rect::new(area.x + 1, y + offset, area.width.saturating_sub(2), 1);
            frame.render_widget(Paragraph::new(Line::from(label)), line_area(0));

            let input_area = line_area(1);
            let prefix = if focused { "> " } else { "  " };
            frame.render_widget(
                Paragraph::new(Span::styled(prefix, Style::default().fg(Color::Yellow))),
                Rect::new(input_area.x, input_area.y, 2, 1),
            );
            row.widget.render(
                frame,
                Rect::new(
                    input_area.x + 2,
                    input_area.y,
                    input_area.width.saturating_sub(2),
                    1,
                ),
                focused,
            );

            if let Some(issue) = self.issue_for(&row.spec.name) {
                frame.render_widget(
                    Paragraph::new(Span::styled(
                        format!("  {issue}"),
                        Style::default().fg(Color::Red),
                    )),
                    line_area(2),
                );
            }

            y += ROW_HEIGHT;
        }
    }

    pub(super) fn issue_for(&self, field: &str) -> Option<&str> {
        if !self.show_issues {
            return None;
        }
        self.verdict.as_ref()?.issue_for(field)
    }

    pub(super) fn render_footer(
        &self,
        frame: &mut Frame,
        area: Rect,
        status_area: Rect,
        session: &WizardSession,
    ) {
        if let Some(message) = &self.status_message {
            frame.render_widget(
                Paragraph::new(Span::styled(
                    message.as_str(),
                    Style::default().fg(Color::LightRed),
                ))
                .alignment(Alignment::Center),
                status_area,
            );
        }

        let actions = session.actions();
        if !actions.visible {
            return;
        }

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let button = |label: &str, enabled: bool, color: Color| {
            if enabled {
                Span::styled(
                    format!(" {label} "),
                    Style::default()
                        .fg(Color::Black)
                        .bg(color)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::styled(format!(" {label} "), Style::default().fg(Color::DarkGray))
            }
        };

        let buttons = Line::from(vec![
            button("Go back", actions.can_go_back, Color::Gray),
            Span::raw("   "),
            button("Skip", actions.can_skip, Color::Gray),
            Span::raw("   "),
            button(actions.continue_label, actions.can_continue, Color::Green),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            rows[0],
        );

        let hints = Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::raw(" continue  "),
            Span::styled("Ctrl+B", Style::default().fg(Color::Yellow)),
            Span::raw(" back  "),
            Span::styled("Ctrl+S", Style::default().fg(Color::Yellow)),
            Span::raw(" skip  "),
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::raw(" next field  "),
            Span::styled("F2", Style::default().fg(Color::Yellow)),
            Span::raw(" jump  "),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::raw(" save & quit"),
        ]);
        frame.render_widget(
            Paragraph::new(hints).alignment(Alignment::Center),
            rows[1],
        );
    }
}
