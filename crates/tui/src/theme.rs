//! Colors and styles for the registration wizard.
//!
//! A dark theme with a single blue accent. Components reach for the style
//! helpers rather than constructing colors inline so the screens stay
//! visually consistent.

use ratatui::{
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

/// Accent color for highlights and focus indicators.
pub const ACCENT: Color = Color::Rgb(8, 171, 237);

/// Primary foreground color for normal text.
pub const FG: Color = Color::Rgb(224, 224, 230);

/// Secondary text such as hints and labels.
pub const FG_MUTED: Color = Color::Rgb(168, 168, 175);

pub const BORDER: Color = Color::Rgb(72, 72, 80);
pub const BORDER_FOCUS: Color = ACCENT;

/// Background color for panels and containers.
pub const BG_PANEL: Color = Color::Rgb(18, 18, 24);

/// Background for the focused input row.
pub const BG_HIGHLIGHT: Color = Color::Rgb(20, 32, 44);

/// Validation failures and errors.
pub const WARN: Color = Color::Rgb(220, 96, 110);

/// Completed steps and paid tickets.
pub const SUCCESS: Color = Color::Rgb(98, 196, 122);

/// Pending payment.
pub const PENDING: Color = Color::Rgb(230, 180, 80);

pub fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BORDER_FOCUS)
    } else {
        Style::default().fg(BORDER)
    }
}

pub fn title_style() -> Style {
    Style::default().fg(FG_MUTED).add_modifier(Modifier::BOLD)
}

pub fn text_style() -> Style {
    Style::default().fg(FG)
}

pub fn text_muted() -> Style {
    Style::default().fg(FG_MUTED)
}

/// Focused input rows keep a subtle background hint.
pub fn highlight_style() -> Style {
    Style::default().fg(FG).bg(BG_HIGHLIGHT)
}

/// Selected list items: accent and bold, no fill.
pub fn list_highlight_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn error_style() -> Style {
    Style::default().fg(WARN)
}

pub fn success_style() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

pub fn pending_style() -> Style {
    Style::default().fg(PENDING).add_modifier(Modifier::BOLD)
}

/// Standard bordered panel with an optional title.
pub fn panel_block(title: Option<&str>, focused: bool) -> Block<'_> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Plain)
        .border_style(border_style(focused))
        .style(Style::default().bg(BG_PANEL).fg(FG));
    if let Some(title) = title {
        block = block.title(Span::styled(format!(" {title} "), title_style()));
    }
    block
}

/// Key/description pairs rendered as hint spans.
pub fn hint_spans(hints: &[(&str, &str)]) -> Vec<Span<'static>> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, description) in hints {
        spans.push(Span::styled(key.to_string(), list_highlight_style()));
        spans.push(Span::styled(format!(" {description}  "), text_muted()));
    }
    spans
}
