//! Event-selection step: up to three events from the catalog.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use regdesk_engine::FormData;
use regdesk_types::{FormField, MAX_SELECTED_EVENTS};

use crate::app::{App, Effect};
use crate::theme;
use crate::ui::components::Component;

#[derive(Debug, Default)]
pub struct EventsComponent {
    list_state: ListState,
}

impl Component for EventsComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let count = app.config.events.len();
        match key.code {
            KeyCode::Down | KeyCode::Char('j') if count > 0 => app.events_cursor = (app.events_cursor + 1) % count,
            KeyCode::Up | KeyCode::Char('k') if count > 0 => app.events_cursor = (app.events_cursor + count - 1) % count,
            KeyCode::Char(' ') => app.toggle_event_at_cursor(),
            KeyCode::Enter => app.advance(),
            KeyCode::Esc | KeyCode::BackTab => app.retreat(),
            _ => {}
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some("Select Events"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        let [summary_area, list_area, error_area] =
            Layout::vertical([Constraint::Length(2), Constraint::Min(1), Constraint::Length(1)]).areas(inner);

        let selected = app.form.selected_events().len();
        let summary = Line::from(vec![
            Span::styled(format!("{selected}/{MAX_SELECTED_EVENTS} selected"), theme::title_style()),
            Span::styled("  choose at least one event", theme::text_muted()),
        ]);
        frame.render_widget(Paragraph::new(summary), summary_area);

        let items: Vec<ListItem> = app
            .config
            .events
            .iter()
            .map(|entry| {
                let checked = app.form.is_event_selected(&entry.id);
                let marker = if checked { "[x]" } else { "[ ]" };
                let style = if checked { theme::success_style() } else { theme::text_style() };
                ListItem::new(Line::from(Span::styled(format!("{marker} {}", entry.label), style)))
            })
            .collect();
        self.list_state.select(Some(app.events_cursor));
        let list = List::new(items).highlight_style(theme::highlight_style()).highlight_symbol("› ");
        frame.render_stateful_widget(list, list_area, &mut self.list_state);

        if let Some(error) = app.field_error(FormField::Events) {
            frame.render_widget(Paragraph::new(Span::styled(error.message.clone(), theme::error_style())), error_area);
        }
    }

    fn get_hint_spans(&self, _app: &App) -> Vec<Span<'static>> {
        theme::hint_spans(&[("↑/↓", "move"), ("Space", "toggle"), ("Enter", "next step"), ("Esc", "back")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::{fill_personal, test_app};
    use regdesk_engine::WizardStep;

    #[tokio::test]
    async fn space_toggles_and_esc_goes_back() {
        let mut app = test_app();
        fill_personal(&mut app);
        app.advance();
        let mut component = EventsComponent::default();

        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Down));
        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char(' ')));
        assert!(app.form.is_event_selected(&app.config.events[1].id));

        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Char(' ')));
        assert!(app.form.selected_events().is_empty());

        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Enter));
        assert_eq!(app.wizard.current_step(), WizardStep::EventSelection);
        assert!(app.field_error(FormField::Events).is_some());

        component.handle_key_events(&mut app, KeyEvent::from(KeyCode::Esc));
        assert_eq!(app.wizard.current_step(), WizardStep::PersonalInfo);
    }
}
