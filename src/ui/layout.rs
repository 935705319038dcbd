//! Header and status bar

use crate::app::{App, Screen};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

/// Progress header, e.g. "Passo 3 di 7"
pub fn draw_progress(frame: &mut Frame, area: Rect, app: &App) {
    let form = &app.form;
    let title = match form.category() {
        Some(category) => format!(" Richiedi una consulenza · {category} "),
        None => " Richiedi una consulenza ".to_string(),
    };

    let gauge = Gauge::default()
        .block(Block::default().title(title).borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .percent(u16::from(form.progress_percent()))
        .label(format!(
            "Passo {} di {} ({}%)",
            form.current_step(),
            form.total_steps(),
            form.progress_percent()
        ));
    frame.render_widget(gauge, area);
}

pub fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];

    if app.is_submitting() {
        spans.push(Span::styled(
            " ● Invio in corso... ",
            Style::default().fg(Color::Yellow),
        ));
    } else {
        spans.push(Span::styled(
            get_hints(app),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if let Some(msg) = &app.status_message {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(msg, Style::default().fg(Color::Yellow)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn get_hints(app: &App) -> &'static str {
    match app.screen {
        Screen::Confirmation { .. } => " Invio: nuova richiesta | q: esci",
        Screen::Form if app.form.is_at_final_step() => {
            " Invio: invia | Esc: indietro | Tab: campo | ←/→: scegli | Ctrl+R: ricomincia"
        }
        Screen::Form if app.form.current_step() == 1 => {
            " Invio: avanti | Tab: campo | Ctrl+P: cambia categoria | Ctrl+C: esci"
        }
        Screen::Form => {
            " Invio: avanti | Esc: indietro | Tab: campo | ←/→: scegli | Ctrl+R: ricomincia"
        }
    }
}
