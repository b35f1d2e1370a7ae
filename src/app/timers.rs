use crate::protocol::push::TimerEntry;

/// The set of currently known timers, in backend order, plus the list
/// cursor. State changes arrive exclusively via `renderTimers` pushes:
/// starting or stopping a timer never flips its running state locally.
#[derive(Debug, Default)]
pub struct TimerRegistry {
    entries: Vec<TimerEntry>,
    selected: usize,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TimerEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&TimerEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Wholesale replacement; no diffing against the prior sequence.
    pub fn replace_all(&mut self, entries: Vec<TimerEntry>) {
        self.entries = entries;
        if self.selected >= self.entries.len() {
            self.selected = self.entries.len().saturating_sub(1);
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        (!self.entries.is_empty()).then_some(self.selected)
    }

    pub fn selected(&self) -> Option<&TimerEntry> {
        self.entries.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::push::TimerSource;

    fn entry(key: &str, running: bool) -> TimerEntry {
        TimerEntry {
            key: key.to_string(),
            source: TimerSource::Jira {
                summary: format!("summary for {key}"),
            },
            running,
            runtime: if running { "0:05".to_string() } else { String::new() },
        }
    }

    #[test]
    fn replace_all_swaps_the_whole_sequence() {
        let mut registry = TimerRegistry::new();
        registry.replace_all(vec![entry("A", false), entry("B", false)]);
        registry.replace_all(vec![entry("B", true)]);

        assert_eq!(registry.entries().len(), 1);
        assert!(registry.get("A").is_none());
        assert!(registry.get("B").unwrap().running);
    }

    #[test]
    fn selection_clamps_when_the_list_shrinks() {
        let mut registry = TimerRegistry::new();
        registry.replace_all(vec![entry("A", false), entry("B", false), entry("C", false)]);
        registry.select_next();
        registry.select_next();
        assert_eq!(registry.selected().unwrap().key, "C");

        registry.replace_all(vec![entry("A", false)]);
        assert_eq!(registry.selected().unwrap().key, "A");

        registry.replace_all(vec![]);
        assert!(registry.selected().is_none());
        assert_eq!(registry.selected_index(), None);
    }
}
