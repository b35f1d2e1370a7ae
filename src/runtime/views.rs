use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Screen};
use crate::protocol::command::Tab;

use super::action_queue::{Action, ActionTx};

pub(super) fn handle_view_key(key: KeyEvent, app: &mut App, actions: &ActionTx) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    match app.view.active() {
        Screen::Timers => handle_timers_key(key, app, actions),
        Screen::Timesheet => handle_timesheet_key(key, app, actions),
        Screen::Settings => handle_settings_key(key, app, actions),
    }
}

fn handle_timers_key(key: KeyEvent, app: &mut App, actions: &ActionTx) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('r') => {
            let _ = actions.send(Action::RefreshTimers);
        }
        KeyCode::Char('t') => {
            let _ = actions.send(Action::ToggleTimesheet);
        }
        KeyCode::Char('s') => {
            let _ = actions.send(Action::ToggleSettings);
        }
        KeyCode::Char('g') => {
            let _ = actions.send(Action::OpenHarvest);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.registry.select_prev();
            app.touch();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.registry.select_next();
            app.touch();
        }
        KeyCode::Enter | KeyCode::Char(' ') => {
            // Fire-and-forget: the running state only flips when the next
            // renderTimers push arrives.
            if let Some(timer) = app.registry.selected() {
                let action = if timer.running {
                    Action::StopTimer {
                        key: timer.key.clone(),
                    }
                } else {
                    Action::StartTimer {
                        key: timer.key.clone(),
                    }
                };
                let _ = actions.send(action);
            }
        }
        KeyCode::Char('o') => {
            if let Some(timer) = app.registry.selected() {
                let _ = actions.send(Action::OpenLink {
                    key: timer.key.clone(),
                });
            }
        }
        _ => {}
    }
}

fn handle_timesheet_key(key: KeyEvent, app: &mut App, actions: &ActionTx) {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('t') | KeyCode::Esc => {
            let _ = actions.send(Action::ToggleTimesheet);
        }
        KeyCode::Char('s') => {
            let _ = actions.send(Action::ToggleSettings);
        }
        KeyCode::Char('d') => {
            let _ = actions.send(Action::SelectTab { tab: Tab::Day });
        }
        KeyCode::Char('w') => {
            let _ = actions.send(Action::SelectTab { tab: Tab::Week });
        }
        KeyCode::Tab => {
            let tab = match app.navigator.active_tab() {
                Tab::Day => Tab::Week,
                Tab::Week => Tab::Day,
            };
            let _ = actions.send(Action::SelectTab { tab });
        }
        KeyCode::Left | KeyCode::Char('h') => {
            let _ = actions.send(Action::SheetBack);
        }
        KeyCode::Right | KeyCode::Char('l') => {
            let _ = actions.send(Action::SheetForward);
        }
        KeyCode::Char('r') => {
            let _ = actions.send(Action::RefetchSheet);
        }
        KeyCode::Char('c') => {
            let _ = actions.send(Action::CopyRange);
        }
        _ => {}
    }
}

fn handle_settings_key(key: KeyEvent, app: &mut App, actions: &ActionTx) {
    match key.code {
        KeyCode::Esc => {
            let _ = actions.send(Action::ToggleSettings);
        }
        KeyCode::Enter => {
            let _ = actions.send(Action::SaveSettings);
        }
        KeyCode::Tab | KeyCode::Down => {
            app.settings_form.focus_next();
            app.touch();
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.settings_form.focus_prev();
            app.touch();
        }
        KeyCode::Backspace => {
            app.settings_form.backspace();
            app.touch();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.settings_form.insert(c);
            app.touch();
        }
        _ => {}
    }
}
