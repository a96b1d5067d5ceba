//! Component system for the registration TUI.
//!
//! Components are self-contained UI elements. They read and mutate the
//! shared [`App`] in response to keys, render themselves into a `Rect`, and
//! report side effects back as [`Effect`]s rather than performing them.

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

use crate::app::{App, Effect};

/// A UI element with local behavior.
///
/// # Lifecycle
///
/// 1. **Event handling**: the main view forwards keys through
///    `handle_key_events()` to the component that owns the screen.
/// 2. **Rendering**: `render()` draws into the provided area each frame.
/// 3. **Hints**: `get_hint_spans()` feeds the hint bar while the component
///    is active.
pub(crate) trait Component {
    /// Handle a key press. Returns effects for the command layer.
    fn handle_key_events(&mut self, _app: &mut App, _key: KeyEvent) -> Vec<Effect> {
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App);

    /// Key hints shown in the footer while this component is active.
    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        Vec::new()
    }
}
