//! UI module for rendering the TUI

mod dialog;
mod field_renderer;
mod layout;

use crate::app::{App, Screen};
use lead_form::Field;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let [header_area, main_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match &app.screen {
        Screen::Form => {
            layout::draw_progress(frame, header_area, app);
            draw_step(frame, main_area, app);
        }
        Screen::Confirmation { destination } => draw_confirmation(frame, main_area, destination),
    }
    layout::draw_status_bar(frame, status_area, app);

    if let Some(message) = app.form.submission_result().error_message() {
        dialog::render_error_dialog(frame, message);
    }
}

/// Fields of the current step, stacked top to bottom
fn draw_step(frame: &mut Frame, area: Rect, app: &App) {
    let fields = app.form.current_fields();
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|f| Constraint::Length(field_height(*f)))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let rows = Layout::vertical(constraints).split(area);

    let active = app.active();
    for (field, row) in fields.iter().zip(rows.iter()) {
        // The category picker shows the highlighted choice until it is committed
        let value = if *field == Field::Category {
            app.category_choice
                .map(|i| field.options()[i])
                .unwrap_or_default()
        } else {
            app.form.draft().value(*field).unwrap_or_default()
        };
        field_renderer::draw_field(
            frame,
            *row,
            *field,
            value,
            app.form.field_errors().get(*field),
            active == Some(*field),
        );
    }
}

fn field_height(field: Field) -> u16 {
    // Borders plus one line for the inline error
    if field.is_multiline() {
        6
    } else {
        4
    }
}

fn draw_confirmation(frame: &mut Frame, area: Rect, destination: &str) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Grazie! La tua richiesta è stata inviata.",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Un nostro consulente ti contatterà al più presto."),
        Line::from(""),
        Line::from(Span::styled(
            format!("Pagina: {destination}"),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .title(" Richiesta inviata ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    frame.render_widget(
        Paragraph::new(content)
            .wrap(Wrap { trim: false })
            .block(block),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lead_form::{Acknowledgement, LeadPayload, LeadSink, SinkError};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct RejectingSink;

    #[async_trait]
    impl LeadSink for RejectingSink {
        async fn send(&self, _payload: &LeadPayload) -> Result<Acknowledgement, SinkError> {
            Err(SinkError::Rejected {
                status: 409,
                reason: Some("Email già registrata".into()),
            })
        }
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_first_step_shows_progress_and_contact_fields() {
        let app = App::with_sink(Arc::new(RejectingSink), "/grazie");
        let screen = render(&app);
        assert!(screen.contains("Passo 1 di 2 (50%)"));
        assert!(screen.contains("Nome e cognome"));
        assert!(screen.contains("Numero di telefono"));
    }

    #[test]
    fn test_inline_errors_are_rendered() {
        let mut app = App::with_sink(Arc::new(RejectingSink), "/grazie");
        assert!(app.form.advance().is_err());
        let screen = render(&app);
        assert!(screen.contains("Nome e cognome"));
        assert!(app
            .form
            .field_errors()
            .get(Field::Email)
            .is_some_and(|message| screen.contains(message)));
    }

    #[test]
    fn test_confirmation_screen() {
        let mut app = App::with_sink(Arc::new(RejectingSink), "/grazie");
        app.screen = Screen::Confirmation {
            destination: "/grazie".to_string(),
        };
        let screen = render(&app);
        assert!(screen.contains("Pagina: /grazie"));
        assert!(!screen.contains("Passo"));
    }
}
