use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Regions of the wizard screen
pub(super) struct ScreenAreas {
    pub stepper: Rect,
    pub header: Rect,
    pub progress: Rect,
    pub content: Rect,
    pub status: Rect,
    pub footer: Rect,
}

pub(super) fn split(area: Rect) -> ScreenAreas {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(34), Constraint::Min(40)])
        .split(area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Title and description
            Constraint::Length(1), // Progress
            Constraint::Min(6),    // Fields
            Constraint::Length(1), // Status message
            Constraint::Length(2), // Buttons and key hints
        ])
        .split(columns[1]);

    ScreenAreas {
        stepper: columns[0],
        header: rows[0],
        progress: rows[1],
        content: rows[2],
        status: rows[3],
        footer: rows[4],
    }
}
