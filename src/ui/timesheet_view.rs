use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::protocol::command::Tab;

const DAY_NAMES: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const KEY_WIDTH: usize = 14;
const CELL_WIDTH: usize = 7;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let navigator = &app.navigator;
    let range = format!(
        " {} — {} to {} ",
        navigator.active_tab().verb(),
        navigator.time_start().date(),
        navigator.time_end().date(),
    );
    let block = Block::default().borders(Borders::ALL).title(range);

    let mut lines: Vec<Line> = Vec::new();
    let header_style = Style::default().add_modifier(Modifier::BOLD);

    match navigator.active_tab() {
        Tab::Day => {
            lines.push(Line::from(Span::styled(
                format!("{:<KEY_WIDTH$}{:>CELL_WIDTH$}", "Jira", "Hours"),
                header_style,
            )));
            for task in navigator.tasks() {
                lines.push(Line::from(format!(
                    "{:<KEY_WIDTH$}{:>CELL_WIDTH$.2}",
                    task.key, task.total_time
                )));
            }
        }
        Tab::Week => {
            let mut header = format!("{:<KEY_WIDTH$}", "Jira");
            for name in DAY_NAMES {
                header.push_str(&format!("{:>CELL_WIDTH$}", name));
            }
            header.push_str(&format!("{:>CELL_WIDTH$}", "Total"));
            lines.push(Line::from(Span::styled(header, header_style)));

            for task in navigator.tasks() {
                let mut row = format!("{:<KEY_WIDTH$}", task.key);
                for slot in 0..7 {
                    let hours = task.durations.get(slot).copied().unwrap_or(0.0);
                    row.push_str(&format!("{:>CELL_WIDTH$.2}", hours));
                }
                row.push_str(&format!("{:>CELL_WIDTH$.2}", task.total_time));
                lines.push(Line::from(row));
            }
        }
    }

    if navigator.tasks().is_empty() {
        lines.push(Line::from(Span::styled(
            "no times tracked in this range",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.push(Line::from(""));
        let mut total_row = format!("{:<KEY_WIDTH$}", "Total");
        if navigator.active_tab() == Tab::Week {
            for slot in 0..7 {
                let hours = navigator.days_total().get(slot).copied().unwrap_or(0.0);
                total_row.push_str(&format!("{:>CELL_WIDTH$.2}", hours));
            }
        }
        total_row.push_str(&format!("{:>CELL_WIDTH$.2}", navigator.total()));
        lines.push(Line::from(Span::styled(total_row, header_style)));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
