use crate::protocol::command::SettingsValues;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    JiraUrl,
    JiraUser,
    JiraPass,
    HarvestUser,
    HarvestPass,
}

impl SettingsField {
    pub const ALL: [SettingsField; 5] = [
        SettingsField::JiraUrl,
        SettingsField::JiraUser,
        SettingsField::JiraPass,
        SettingsField::HarvestUser,
        SettingsField::HarvestPass,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SettingsField::JiraUrl => "Jira URL",
            SettingsField::JiraUser => "Jira username",
            SettingsField::JiraPass => "Jira password",
            SettingsField::HarvestUser => "Harvest account id",
            SettingsField::HarvestPass => "Harvest token",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(self, SettingsField::JiraPass | SettingsField::HarvestPass)
    }
}

/// The settings form. Write-only: values are sent as `settings|<json>`
/// and never round-tripped back; the initial defaults come from the local
/// config file at load time.
#[derive(Debug)]
pub struct SettingsForm {
    values: SettingsValues,
    focused: SettingsField,
}

impl SettingsForm {
    pub fn new(defaults: SettingsValues) -> Self {
        Self {
            values: defaults,
            focused: SettingsField::JiraUrl,
        }
    }

    pub fn values(&self) -> &SettingsValues {
        &self.values
    }

    pub fn focused(&self) -> SettingsField {
        self.focused
    }

    pub fn field(&self, field: SettingsField) -> &str {
        match field {
            SettingsField::JiraUrl => &self.values.jira.url,
            SettingsField::JiraUser => &self.values.jira.user,
            SettingsField::JiraPass => &self.values.jira.pass,
            SettingsField::HarvestUser => &self.values.harvest.user,
            SettingsField::HarvestPass => &self.values.harvest.pass,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.focused {
            SettingsField::JiraUrl => &mut self.values.jira.url,
            SettingsField::JiraUser => &mut self.values.jira.user,
            SettingsField::JiraPass => &mut self.values.jira.pass,
            SettingsField::HarvestUser => &mut self.values.harvest.user,
            SettingsField::HarvestPass => &mut self.values.harvest.pass,
        }
    }

    pub fn focus_next(&mut self) {
        let idx = Self::position(self.focused);
        self.focused = SettingsField::ALL[(idx + 1) % SettingsField::ALL.len()];
    }

    pub fn focus_prev(&mut self) {
        let idx = Self::position(self.focused);
        self.focused =
            SettingsField::ALL[(idx + SettingsField::ALL.len() - 1) % SettingsField::ALL.len()];
    }

    pub fn insert(&mut self, c: char) {
        self.field_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.field_mut().pop();
    }

    fn position(field: SettingsField) -> usize {
        SettingsField::ALL
            .iter()
            .position(|f| *f == field)
            .expect("field is in ALL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = SettingsForm::new(SettingsValues::default());
        assert_eq!(form.focused(), SettingsField::JiraUrl);
        form.focus_prev();
        assert_eq!(form.focused(), SettingsField::HarvestPass);
        form.focus_next();
        assert_eq!(form.focused(), SettingsField::JiraUrl);
    }

    #[test]
    fn editing_targets_the_focused_field() {
        let mut form = SettingsForm::new(SettingsValues::default());
        form.focus_next(); // JiraUser
        for c in "alice".chars() {
            form.insert(c);
        }
        form.backspace();
        assert_eq!(form.values().jira.user, "alic");
        assert_eq!(form.values().jira.url, "");
    }

    #[test]
    fn defaults_seed_the_form() {
        let mut defaults = SettingsValues::default();
        defaults.harvest.user = "acct-1".to_string();
        let form = SettingsForm::new(defaults);
        assert_eq!(form.field(SettingsField::HarvestUser), "acct-1");
    }
}
