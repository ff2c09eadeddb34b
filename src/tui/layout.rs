use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub header_area: Rect,
    pub sidebar_area: Rect,
    pub main_area: Rect,
    pub add_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Minimum inner terminal size.
    /// Width fits a 25 column plant list next to a 12 column detail pane;
    /// height fits header, one content row, the 3 line add bar and status.
    pub const MIN_WIDTH: u16 = 38;
    pub const MIN_HEIGHT: u16 = 10;

    pub fn calculate(size: Rect, sidebar_width_percent: u16, sidebar_collapsed: bool) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Plant list: requested percent, at least 25 columns, at most 50%,
        // and never squeezing the detail pane under 12 columns
        let sidebar_width = if sidebar_collapsed {
            0
        } else {
            let requested = (inner_area.width * sidebar_width_percent) / 100;
            let max_width = (inner_area.width * 50) / 100;
            requested
                .max(25)
                .min(max_width.max(25))
                .min(inner_area.width.saturating_sub(12))
        };

        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(1),    // Plant list + details
                Constraint::Length(3), // Add bar
                Constraint::Length(1), // Status
            ])
            .split(inner_area);

        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(sidebar_width), Constraint::Min(1)])
            .split(vertical[1]);

        Self {
            inner_area,
            header_area: vertical[0],
            sidebar_area: horizontal[0],
            main_area: horizontal[1],
            add_area: vertical[2],
            status_area: vertical[3],
        }
    }
}
