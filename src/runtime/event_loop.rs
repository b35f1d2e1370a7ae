use anyhow::Result;
use crossterm::event::{self, Event};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::app::App;
use crate::protocol::channel::MessageChannel;
use crate::protocol::push::Push;
use crate::ui;

use super::action_queue::channel;
use super::actions::run_action;
use super::views::handle_view_key;

/// The single-threaded cooperative loop: repaint when the state revision
/// moved, poll key events, then drain pushes and queued actions. Awaiting
/// a reply inside `run_action` suspends the loop, which serializes all
/// logically-dependent sends.
pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    message_channel: &MessageChannel,
    push_rx: &mut UnboundedReceiver<Push>,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let mut last_painted: Option<u64> = None;

    loop {
        if last_painted != Some(app.revision()) {
            terminal.draw(|frame| ui::render(frame, app))?;
            last_painted = Some(app.revision());
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => handle_view_key(key, app, &action_tx),
                Event::Resize(_, _) => app.touch(),
                _ => {}
            }
        }

        while let Ok(push) = push_rx.try_recv() {
            app.apply_push(push);
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, message_channel).await?;
        }

        if !app.running {
            break;
        }
    }

    Ok(())
}
