//! Layout helpers shared by the screens and modals.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Braille spinner frames advanced by `Msg::Tick` while a request runs.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn throbber_frame(index: usize) -> &'static str {
    THROBBER_FRAMES[index % THROBBER_FRAMES.len()]
}

/// Create a centered rectangle within a given area.
///
/// Percentages are of the parent; the result is used for modals.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_stays_inside_parent() {
        let parent = Rect::new(0, 0, 100, 50);
        let centered = centered_rect(60, 40, parent);
        assert_eq!(centered.width, 60);
        assert_eq!(centered.height, 20);
        assert_eq!(centered.x, 20);
        assert_eq!(centered.y, 15);
    }

    #[test]
    fn throbber_wraps() {
        assert_eq!(throbber_frame(0), throbber_frame(10));
    }
}
