use crate::protocol::command::SettingsValues;
use crate::protocol::push::{entries_from_records, Push};

mod settings;
mod timers;
mod timesheet;
mod view;

pub use settings::{SettingsField, SettingsForm};
pub use timers::TimerRegistry;
pub use timesheet::TimesheetNavigator;
pub use view::{Screen, ViewController};

/// The application state tree. Constructor-injected into the runtime;
/// every mutation goes through the event-loop task, so no locking is
/// needed. `revision` is the notify side of subscribe/notify: the event
/// loop repaints whenever the revision it last painted is stale.
pub struct App {
    pub running: bool,
    pub view: ViewController,
    pub registry: TimerRegistry,
    pub navigator: TimesheetNavigator,
    pub settings_form: SettingsForm,
    status: Option<String>,
    revision: u64,
}

impl App {
    pub fn new(settings_defaults: SettingsValues) -> Self {
        Self {
            running: true,
            view: ViewController::new(),
            registry: TimerRegistry::new(),
            navigator: TimesheetNavigator::new(),
            settings_form: SettingsForm::new(settings_defaults),
            status: None,
            revision: 0,
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Mark the state tree changed so subscribers repaint.
    pub fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
        self.touch();
    }

    pub fn clear_status(&mut self) {
        if self.status.take().is_some() {
            self.touch();
        }
    }

    /// Apply one backend push. Pushes update state directly without having
    /// been requested; unknown types are ignored without any mutation.
    pub fn apply_push(&mut self, push: Push) {
        match push {
            Push::Error { message } => {
                tracing::warn!(error = %message, "backend error push");
                self.view.on_error(message);
                self.touch();
            }
            Push::RenderTimers { timers } => {
                // The registry always updates, whatever screen is active;
                // only the visual refresh depends on the view.
                self.registry.replace_all(entries_from_records(timers));
                // A fresh timer list supersedes any transient status, so
                // the key hints come back once the data is in.
                self.clear_status();
                self.touch();
            }
            Push::Unknown => {
                tracing::debug!("ignoring unknown push type");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render_timers_push(key: &str, running: bool) -> Push {
        serde_json::from_value(json!({
            "Type": "renderTimers",
            "Timers": [{
                "key": key,
                "running": running,
                "runtime": if running { "0:01" } else { "" },
                "jira": {"fields": {"summary": "s"}}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn error_push_forces_timers_and_records_the_message() {
        let mut app = App::new(SettingsValues::default());
        app.view.apply_toggle(Screen::Timesheet, true);

        app.apply_push(Push::Error {
            message: "harvest sync failed".to_string(),
        });
        assert_eq!(app.view.active(), Screen::Timers);
        assert_eq!(app.view.last_error(), Some("harvest sync failed"));
    }

    #[test]
    fn render_timers_push_updates_registry_on_any_screen() {
        let mut app = App::new(SettingsValues::default());
        app.view.apply_toggle(Screen::Settings, true);

        app.apply_push(render_timers_push("HARV-1", true));
        assert_eq!(app.view.active(), Screen::Settings, "no screen transition");
        assert!(app.registry.get("HARV-1").unwrap().running);
    }

    #[test]
    fn render_timers_push_clears_transient_status() {
        let mut app = App::new(SettingsValues::default());
        app.set_status("loading timers...".to_string());

        app.apply_push(render_timers_push("HARV-1", false));
        assert_eq!(app.status(), None, "status line is transient");
        assert!(app.registry.get("HARV-1").is_some());
    }

    #[test]
    fn unknown_push_mutates_nothing() {
        let mut app = App::new(SettingsValues::default());
        let revision = app.revision();
        app.apply_push(Push::Unknown);
        assert_eq!(app.revision(), revision);
        assert!(app.registry.is_empty());
        assert_eq!(app.view.active(), Screen::Timers);
    }
}
