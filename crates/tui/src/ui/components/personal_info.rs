//! Personal-info step: contact details, college, year, and department.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use regdesk_types::FormField;

use crate::app::{App, Effect, PERSONAL_FIELDS, is_choice_field};
use crate::theme;
use crate::ui::components::Component;

const LABEL_WIDTH: u16 = 16;

#[derive(Debug, Default)]
pub struct PersonalInfoComponent;

impl PersonalInfoComponent {
    fn display_value(app: &App, field: FormField) -> String {
        if is_choice_field(field) {
            let value = app.form.field(field);
            return app
                .choices_for(field)
                .iter()
                .find(|entry| entry.id == value)
                .map(|entry| format!("‹ {} ›", entry.label))
                .unwrap_or_else(|| "‹ select ›".to_string());
        }
        app.personal.input(field).map(|input| input.input().to_string()).unwrap_or_default()
    }

    fn label(field: FormField) -> String {
        match field {
            FormField::ProjectLink => format!("{} (optional)", field.label()),
            _ => field.label().to_string(),
        }
    }
}

impl Component for PersonalInfoComponent {
    fn handle_key_events(&mut self, app: &mut App, key: KeyEvent) -> Vec<Effect> {
        let field = app.personal.focused_field();
        match key.code {
            KeyCode::Tab | KeyCode::Down => app.personal.focus_next(),
            KeyCode::BackTab | KeyCode::Up => app.personal.focus_prev(),
            KeyCode::Enter => app.advance(),
            KeyCode::Left if is_choice_field(field) => app.cycle_choice(field, -1),
            KeyCode::Right | KeyCode::Char(' ') if is_choice_field(field) => app.cycle_choice(field, 1),
            _ => {
                let changed = app
                    .personal
                    .input_mut(field)
                    .is_some_and(|input| input.handle_edit_key(key));
                if changed {
                    app.sync_personal_field(field);
                }
            }
        }
        Vec::new()
    }

    fn render(&mut self, frame: &mut Frame, rect: Rect, app: &mut App) {
        let block = theme::panel_block(Some("Personal Information"), true);
        let inner = block.inner(rect);
        frame.render_widget(block, rect);

        let rows = Layout::vertical(PERSONAL_FIELDS.iter().map(|_| Constraint::Length(2))).split(inner);
        let focused = app.personal.focused_field();
        for (field, row) in PERSONAL_FIELDS.iter().zip(rows.iter()) {
            let is_focused = *field == focused;
            let value_style = if is_focused { theme::highlight_style() } else { theme::text_style() };
            let label_style = if is_focused { theme::list_highlight_style() } else { theme::text_muted() };
            let mut lines = vec![Line::from(vec![
                Span::styled(format!("{:<width$}", Self::label(*field), width = LABEL_WIDTH as usize), label_style),
                Span::styled(Self::display_value(app, *field), value_style),
            ])];
            if let Some(error) = app.field_error(*field) {
                lines.push(Line::from(Span::styled(
                    format!("{:<width$}{}", "", error.message, width = LABEL_WIDTH as usize),
                    theme::error_style(),
                )));
            }
            frame.render_widget(Paragraph::new(lines), *row);

            if is_focused && let Some(input) = app.personal.input(*field) {
                let x = row.x + LABEL_WIDTH + input.cursor_column();
                frame.set_cursor_position(Position::new(x.min(row.right().saturating_sub(1)), row.y));
            }
        }
    }

    fn get_hint_spans(&self, app: &App) -> Vec<Span<'static>> {
        if is_choice_field(app.personal.focused_field()) {
            theme::hint_spans(&[("Tab/↑↓", "field"), ("←/→", "choose"), ("Enter", "next step"), ("Ctrl+C", "quit")])
        } else {
            theme::hint_spans(&[("Tab/↑↓", "field"), ("Enter", "next step"), ("Ctrl+C", "quit")])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::test_app;
    use regdesk_engine::WizardStep;

    fn press(component: &mut PersonalInfoComponent, app: &mut App, code: KeyCode) {
        component.handle_key_events(app, KeyEvent::from(code));
    }

    fn type_text(component: &mut PersonalInfoComponent, app: &mut App, text: &str) {
        for c in text.chars() {
            press(component, app, KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn typing_fills_form_and_enter_advances() {
        let mut app = test_app();
        let mut component = PersonalInfoComponent;
        for value in ["Asha Rao", "asha@example.com", "9876543210", "9123456780", "City College"] {
            type_text(&mut component, &mut app, value);
            press(&mut component, &mut app, KeyCode::Tab);
        }
        press(&mut component, &mut app, KeyCode::Right);
        press(&mut component, &mut app, KeyCode::Tab);
        press(&mut component, &mut app, KeyCode::Right);

        assert_eq!(app.form.field(FormField::Email), "asha@example.com");
        assert_eq!(app.form.field(FormField::Year), "1");
        press(&mut component, &mut app, KeyCode::Enter);
        assert_eq!(app.wizard.current_step(), WizardStep::EventSelection);
    }

    #[tokio::test]
    async fn short_phone_stays_on_step() {
        let mut app = test_app();
        let mut component = PersonalInfoComponent;
        press(&mut component, &mut app, KeyCode::Tab);
        press(&mut component, &mut app, KeyCode::Tab);
        type_text(&mut component, &mut app, "12345");
        press(&mut component, &mut app, KeyCode::Enter);

        assert_eq!(app.wizard.current_step(), WizardStep::PersonalInfo);
        assert_eq!(
            app.field_error(FormField::Phone).map(|error| error.message.as_str()),
            Some("Phone number must be exactly 10 digits")
        );
    }
}
