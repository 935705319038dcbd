//! Field rendering for the form steps

use lead_form::Field;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Draw one input with its label and inline error
pub fn draw_field(
    frame: &mut Frame,
    area: Rect,
    field: Field,
    value: &str,
    error: Option<&str>,
    is_active: bool,
) {
    let style = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else {
        style
    };

    let mut lines = if field.options().is_empty() {
        text_lines(field, value, style, is_active)
    } else {
        vec![choice_line(value, style, is_active)]
    };

    if let Some(message) = error {
        lines.push(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let title = if field.is_optional() {
        format!(" {} (facoltativo) ", field.label())
    } else {
        format!(" {} ", field.label())
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);

    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn text_lines(field: Field, value: &str, style: Style, is_active: bool) -> Vec<Line<'static>> {
    let cursor = if is_active { "▌" } else { "" };
    let display = if value.is_empty() && !is_active {
        "(vuoto)"
    } else {
        value
    };

    let mut lines: Vec<Line> = if field.is_multiline() {
        display
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), style)))
            .collect()
    } else {
        vec![Line::from(Span::styled(display.to_string(), style))]
    };

    if is_active {
        let cursor = Span::styled(cursor, Style::default().fg(Color::Cyan));
        match lines.last_mut() {
            Some(last) => last.spans.push(cursor),
            None => lines.push(Line::from(cursor)),
        }
    }
    lines
}

/// Selector shown as `◀ value ▶`
fn choice_line(value: &str, style: Style, is_active: bool) -> Line<'static> {
    let shown = if value.is_empty() {
        "seleziona".to_string()
    } else {
        value.to_string()
    };
    let arrow = if is_active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Line::from(vec![
        Span::styled("◀ ", arrow),
        Span::styled(shown, style),
        Span::styled(" ▶", arrow),
    ])
}
