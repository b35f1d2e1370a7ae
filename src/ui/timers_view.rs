use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::protocol::push::TimerSource;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Timers ");

    if app.registry.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "no timers — press r to refresh",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .registry
        .entries()
        .iter()
        .map(|timer| {
            let tag_style = match timer.source {
                TimerSource::Jira { .. } => Style::default().fg(Color::Blue),
                TimerSource::Harvest { .. } => Style::default().fg(Color::Rgb(241, 93, 34)),
            };
            let mut spans = vec![
                Span::styled(format!("[{}] ", timer.source_tag()), tag_style),
                Span::styled(
                    timer.key.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!(": {}", timer.description())),
            ];
            if timer.running {
                spans.push(Span::styled(
                    format!("  ● {}", timer.runtime),
                    Style::default().fg(Color::Green),
                ));
            } else {
                spans.push(Span::styled("  ▶", Style::default().fg(Color::DarkGray)));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(app.registry.selected_index());
    frame.render_stateful_widget(list, area, &mut state);
}
