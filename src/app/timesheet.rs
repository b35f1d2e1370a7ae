use time::OffsetDateTime;

use crate::protocol::command::{Command, NavOp, Tab};
use crate::protocol::push::{TaskTimes, TimesheetSheet};

/// State machine over the visible timesheet range. A thin request/response
/// cache: the backend computes every date range, the navigator only echoes
/// the `timeStart` it was last given.
///
/// Every state-changing request bumps a generation counter; a reply whose
/// generation no longer matches the current one is discarded, so a stale
/// reply can never overwrite a newer tab or range.
#[derive(Debug)]
pub struct TimesheetNavigator {
    active_tab: Tab,
    time_start: OffsetDateTime,
    time_end: OffsetDateTime,
    tasks: Vec<TaskTimes>,
    days_total: Vec<f64>,
    total: f64,
    generation: u64,
}

impl TimesheetNavigator {
    pub fn new() -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            active_tab: Tab::Day,
            time_start: now,
            time_end: now,
            tasks: Vec::new(),
            days_total: Vec::new(),
            total: 0.0,
            generation: 0,
        }
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn time_start(&self) -> OffsetDateTime {
        self.time_start
    }

    pub fn time_end(&self) -> OffsetDateTime {
        self.time_end
    }

    pub fn tasks(&self) -> &[TaskTimes] {
        &self.tasks
    }

    pub fn days_total(&self) -> &[f64] {
        &self.days_total
    }

    pub fn total(&self) -> f64 {
        self.total
    }

    fn request(&mut self, op: NavOp) -> Result<(u64, Command), time::error::Format> {
        self.generation += 1;
        let command = Command::navigate(self.active_tab, self.time_start, op)?;
        Ok((self.generation, command))
    }

    /// `=` for the current tab: first render of the screen and refresh.
    pub fn activate(&mut self) -> Result<(u64, Command), time::error::Format> {
        self.request(NavOp::Current)
    }

    /// Switch tabs and fetch the new tab's range. The previous tab's sheet
    /// is discarded up front so stale data is never shown combined with
    /// the new tab while the reply is outstanding.
    pub fn switch_tab(&mut self, tab: Tab) -> Result<(u64, Command), time::error::Format> {
        self.active_tab = tab;
        self.tasks.clear();
        self.days_total.clear();
        self.total = 0.0;
        self.request(NavOp::Current)
    }

    pub fn back(&mut self) -> Result<(u64, Command), time::error::Format> {
        self.request(NavOp::Back)
    }

    pub fn forward(&mut self) -> Result<(u64, Command), time::error::Format> {
        self.request(NavOp::Forward)
    }

    /// Clipboard export for the current range. No local state change and
    /// no generation bump; the reply is opaque.
    pub fn copy_range(&self) -> Result<Command, time::error::Format> {
        Command::navigate(self.active_tab, self.time_start, NavOp::Copy)
    }

    /// Apply a sheet reply, replacing the cached state wholesale. Returns
    /// false when the reply is stale and was discarded.
    pub fn apply(&mut self, generation: u64, sheet: TimesheetSheet) -> bool {
        if generation != self.generation {
            tracing::debug!(
                reply = generation,
                current = self.generation,
                "discarding stale timesheet reply"
            );
            return false;
        }
        self.time_start = sheet.time_start;
        self.time_end = sheet.time_end;
        self.tasks = sheet.tasks;
        self.days_total = sheet.days_total;
        self.total = sheet.total;
        true
    }
}

impl Default for TimesheetNavigator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn sheet(start: OffsetDateTime, days: usize) -> TimesheetSheet {
        TimesheetSheet {
            time_start: start,
            time_end: start + time::Duration::days(days as i64) - time::Duration::minutes(1),
            tasks: vec![TaskTimes {
                key: "HARV-1".to_string(),
                durations: vec![1.0; days],
                total_time: days as f64,
            }],
            days_total: vec![1.0; days],
            total: days as f64,
        }
    }

    #[test]
    fn switch_tab_clears_tasks_before_the_reply_lands() {
        let mut navigator = TimesheetNavigator::new();
        let (generation, _) = navigator.activate().unwrap();
        assert!(navigator.apply(generation, sheet(datetime!(2024-01-10 00:00:00 UTC), 1)));
        assert!(!navigator.tasks().is_empty());

        let (generation, command) = navigator.switch_tab(Tab::Week).unwrap();
        assert!(navigator.tasks().is_empty(), "cleared before the reply");
        assert_eq!(navigator.total(), 0.0);
        assert_eq!(command.verb, "week");
        assert_eq!(command.args[1], "=");

        let week = sheet(datetime!(2024-01-08 00:00:00 UTC), 7);
        assert!(navigator.apply(generation, week));
        assert_eq!(navigator.days_total().len(), 7);
    }

    #[test]
    fn stale_reply_is_discarded() {
        let mut navigator = TimesheetNavigator::new();
        let (stale_generation, _) = navigator.forward().unwrap();
        let (fresh_generation, _) = navigator.switch_tab(Tab::Week).unwrap();

        assert!(!navigator.apply(stale_generation, sheet(datetime!(2024-01-11 00:00:00 UTC), 1)));
        assert!(navigator.tasks().is_empty());

        assert!(navigator.apply(fresh_generation, sheet(datetime!(2024-01-08 00:00:00 UTC), 7)));
        assert_eq!(navigator.time_start(), datetime!(2024-01-08 00:00:00 UTC));
    }

    #[test]
    fn navigation_echoes_the_backend_supplied_time_start() {
        let mut navigator = TimesheetNavigator::new();
        let (generation, _) = navigator.activate().unwrap();
        navigator.apply(generation, sheet(datetime!(2024-01-10 00:00:00 UTC), 1));

        let (_, command) = navigator.back().unwrap();
        assert_eq!(command.encode(), "day|2024-01-10T00:00:00Z|-");
    }

    #[test]
    fn copy_changes_no_state() {
        let mut navigator = TimesheetNavigator::new();
        let (generation, _) = navigator.activate().unwrap();
        navigator.apply(generation, sheet(datetime!(2024-01-10 00:00:00 UTC), 1));

        let command = navigator.copy_range().unwrap();
        assert_eq!(command.args[1], "copy");
        // A sheet for the still-current generation applies fine afterwards.
        assert!(navigator.apply(generation, sheet(datetime!(2024-01-10 00:00:00 UTC), 1)));
    }
}
