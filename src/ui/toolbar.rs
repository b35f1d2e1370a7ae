use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Screen};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let tab = |label: &'static str, screen: Screen| {
        let style = if app.view.active() == screen {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        Span::styled(format!(" {label} "), style)
    };

    let line = Line::from(vec![
        Span::styled(
            " harvester ",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        tab("timers", Screen::Timers),
        tab("timesheet", Screen::Timesheet),
        tab("settings", Screen::Settings),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}
