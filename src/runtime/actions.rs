use anyhow::Result;

use crate::app::{App, Screen};
use crate::protocol::channel::MessageChannel;
use crate::protocol::command::Command;
use crate::protocol::push::{self, TimesheetSheet};

use super::action_queue::Action;

pub(super) async fn run_action(
    action: Action,
    app: &mut App,
    channel: &MessageChannel,
) -> Result<()> {
    match action {
        // Fire-and-forget commands: the reply carries no state. Timer
        // updates arrive exclusively via the renderTimers push, so a
        // start/stop click must not flip anything locally.
        Action::RefreshTimers => {
            channel.send(&Command::refresh())?;
        }
        Action::OpenHarvest => {
            channel.send(&Command::open_harvest())?;
        }
        Action::StartTimer { key } => {
            channel.send(&Command::start(&key))?;
        }
        Action::StopTimer { key } => {
            channel.send(&Command::stop(&key))?;
        }
        Action::OpenLink { key } => {
            channel.send(&Command::open(&key))?;
        }
        Action::ToggleTimesheet => toggle_screen(app, channel, Screen::Timesheet).await?,
        Action::ToggleSettings => toggle_screen(app, channel, Screen::Settings).await?,
        Action::SelectTab { tab } => {
            let (generation, command) = if app.navigator.active_tab() == tab {
                app.navigator.activate()?
            } else {
                app.navigator.switch_tab(tab)?
            };
            app.touch();
            fetch_sheet(app, channel, generation, command).await?;
        }
        Action::RefetchSheet => {
            let (generation, command) = app.navigator.activate()?;
            fetch_sheet(app, channel, generation, command).await?;
        }
        Action::SheetBack => {
            let (generation, command) = app.navigator.back()?;
            fetch_sheet(app, channel, generation, command).await?;
        }
        Action::SheetForward => {
            let (generation, command) = app.navigator.forward()?;
            fetch_sheet(app, channel, generation, command).await?;
        }
        Action::CopyRange => {
            // Backend-side clipboard export; the reply is opaque.
            channel.send(&app.navigator.copy_range()?)?;
            app.set_status("Copied current range on the backend");
        }
        Action::SaveSettings => save_settings(app, channel).await?,
    }
    Ok(())
}

async fn toggle_screen(app: &mut App, channel: &MessageChannel, target: Screen) -> Result<()> {
    let command = match target {
        Screen::Timesheet => Command::toggle_timesheet(),
        Screen::Settings => Command::toggle_settings(),
        Screen::Timers => return Ok(()),
    };

    let pending = channel.send(&command)?;
    match pending.resolve().await {
        Ok(reply) => {
            let transitioned = app.view.apply_toggle(target, push::is_truthy(&reply));
            app.touch();
            if transitioned && app.view.active() == Screen::Timesheet {
                // First render of the timesheet always fetches the active
                // tab; switch_tab also drops whatever sheet is cached.
                let tab = app.navigator.active_tab();
                let (generation, command) = app.navigator.switch_tab(tab)?;
                fetch_sheet(app, channel, generation, command).await?;
            }
        }
        Err(err) => app.set_status(format!("Backend not responding: {err}")),
    }
    Ok(())
}

async fn fetch_sheet(
    app: &mut App,
    channel: &MessageChannel,
    generation: u64,
    command: Command,
) -> Result<()> {
    let pending = channel.send(&command)?;
    match pending.resolve().await {
        Ok(reply) => {
            match serde_json::from_value::<TimesheetSheet>(reply) {
                Ok(sheet) => {
                    app.navigator.apply(generation, sheet);
                }
                Err(err) => app.set_status(format!("Bad timesheet reply: {err}")),
            }
            app.touch();
        }
        Err(err) => app.set_status(format!("Timesheet fetch failed: {err}")),
    }
    Ok(())
}

async fn save_settings(app: &mut App, channel: &MessageChannel) -> Result<()> {
    let command = Command::save_settings(app.settings_form.values())?;
    let pending = channel.send(&command)?;
    match pending.resolve().await {
        Ok(reply) => {
            if push::is_truthy(&reply) {
                // The backend returns to the main view after persisting.
                app.view.return_to_timers();
                app.set_status("Settings saved");
            } else {
                app.set_status("Settings were not saved");
            }
        }
        Err(err) => app.set_status(format!("Settings save failed: {err}")),
    }
    Ok(())
}
