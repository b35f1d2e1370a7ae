/// Which screen is active. Exactly one at a time; Timers is initial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Timers,
    Timesheet,
    Settings,
}

/// Top-level screen state machine. Transitions are driven by toggle
/// replies and error pushes, never by the view layer directly.
#[derive(Debug)]
pub struct ViewController {
    active: Screen,
    last_error: Option<String>,
}

impl ViewController {
    pub fn new() -> Self {
        Self {
            active: Screen::Timers,
            last_error: None,
        }
    }

    pub fn active(&self) -> Screen {
        self.active
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Apply a toggle command's reply. A truthy reply flips the screen:
    /// to `target`, or back to Timers when `target` was already active.
    /// A falsy/null reply is a no-op acknowledgment. Returns whether a
    /// transition happened.
    pub fn apply_toggle(&mut self, target: Screen, accepted: bool) -> bool {
        if !accepted {
            return false;
        }
        self.active = if self.active == target {
            Screen::Timers
        } else {
            target
        };
        self.last_error = None;
        true
    }

    /// An `error` push forces the timer list regardless of prior state.
    pub fn on_error(&mut self, message: String) {
        self.active = Screen::Timers;
        self.last_error = Some(message);
    }

    /// Explicit return to the timer list (e.g. after a settings save).
    pub fn return_to_timers(&mut self) {
        self.active = Screen::Timers;
        self.last_error = None;
    }
}

impl Default for ViewController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_reply_opens_target_screen() {
        let mut view = ViewController::new();
        assert!(view.apply_toggle(Screen::Timesheet, true));
        assert_eq!(view.active(), Screen::Timesheet);
    }

    #[test]
    fn falsy_reply_leaves_screen_unchanged() {
        let mut view = ViewController::new();
        assert!(!view.apply_toggle(Screen::Timesheet, false));
        assert_eq!(view.active(), Screen::Timers);

        view.apply_toggle(Screen::Settings, true);
        assert!(!view.apply_toggle(Screen::Timesheet, false));
        assert_eq!(view.active(), Screen::Settings);
    }

    #[test]
    fn truthy_reply_on_active_screen_toggles_back_to_timers() {
        let mut view = ViewController::new();
        view.apply_toggle(Screen::Settings, true);
        assert!(view.apply_toggle(Screen::Settings, true));
        assert_eq!(view.active(), Screen::Timers);
    }

    #[test]
    fn error_push_forces_timers_from_any_screen() {
        for screen in [Screen::Timers, Screen::Timesheet, Screen::Settings] {
            let mut view = ViewController::new();
            view.apply_toggle(screen, true);
            view.on_error("backend failed".to_string());
            assert_eq!(view.active(), Screen::Timers);
            assert_eq!(view.last_error(), Some("backend failed"));
        }
    }

    #[test]
    fn error_clears_on_next_successful_transition() {
        let mut view = ViewController::new();
        view.on_error("boom".to_string());
        assert!(view.last_error().is_some());

        view.apply_toggle(Screen::Timesheet, false);
        assert!(view.last_error().is_some(), "no-op reply keeps the error");

        view.apply_toggle(Screen::Timesheet, true);
        assert!(view.last_error().is_none());
    }
}
