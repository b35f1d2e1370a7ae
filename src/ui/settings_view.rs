use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{App, SettingsField};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Settings ");

    let mut lines: Vec<Line> = Vec::new();
    lines.push(section("Jira"));
    for field in [
        SettingsField::JiraUrl,
        SettingsField::JiraUser,
        SettingsField::JiraPass,
    ] {
        lines.push(field_line(app, field));
    }
    lines.push(Line::from(""));
    lines.push(section("Harvest"));
    for field in [SettingsField::HarvestUser, SettingsField::HarvestPass] {
        lines.push(field_line(app, field));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "enter to save",
        Style::default().fg(Color::DarkGray),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
}

fn field_line(app: &App, field: SettingsField) -> Line<'static> {
    let form = &app.settings_form;
    let focused = form.focused() == field;

    let value = if field.is_secret() {
        "•".repeat(form.field(field).chars().count())
    } else {
        form.field(field).to_string()
    };

    let marker = if focused { "> " } else { "  " };
    let value_style = if focused {
        Style::default().fg(Color::Black).bg(Color::Green)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::raw(marker.to_string()),
        Span::styled(
            format!("{:<20}", field.label()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(value, value_style),
        Span::raw(if focused { "▏" } else { "" }),
    ])
}
