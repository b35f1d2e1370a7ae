use anyhow::Result;

use crate::app::App;
use crate::protocol::channel::MessageChannel;
use crate::protocol::command::Command;

/// First contact with the backend: ask for the timer list. The reply is
/// ignored; the `renderTimers` push that follows populates the registry.
pub fn initialize_app_state(app: &mut App, channel: &MessageChannel) -> Result<()> {
    let _ = channel.send(&Command::refresh())?;
    app.set_status("loading timers...".to_string());
    Ok(())
}
