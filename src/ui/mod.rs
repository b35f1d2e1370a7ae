use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

use crate::app::{App, Screen};

mod settings_view;
mod timers_view;
mod timesheet_view;
mod toolbar;

pub fn render(frame: &mut Frame, app: &App) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    toolbar::render(frame, root[0], app);

    match app.view.active() {
        Screen::Timers => timers_view::render(frame, root[1], app),
        Screen::Timesheet => timesheet_view::render(frame, root[1], app),
        Screen::Settings => settings_view::render(frame, root[1], app),
    }

    render_status_line(frame, root[2], app);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    // A backend error outranks transient status messages until the next
    // successful navigation clears it.
    let line = if let Some(error) = app.view.last_error() {
        Line::from(Span::styled(
            format!(" error: {error}"),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
        ))
    } else if let Some(status) = app.status() {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        let hints = match app.view.active() {
            Screen::Timers => " enter start/stop · o open · r refresh · t timesheet · s settings · q quit",
            Screen::Timesheet => " d/w tabs · ←/→ navigate · c copy · r refresh · t close · q quit",
            Screen::Settings => " tab next field · enter save · esc close",
        };
        Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
    };

    frame.render_widget(ratatui::widgets::Paragraph::new(line), area);
}
