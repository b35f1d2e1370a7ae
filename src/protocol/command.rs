use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// Field separator of the wire protocol. Args must never contain it; the
/// protocol has no escaping (known limitation of the backend).
pub const DELIMITER: char = '|';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("malformed command: missing verb")]
    MalformedCommand,
}

/// One of the two timesheet aggregation granularities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Day,
    Week,
}

impl Tab {
    pub fn verb(&self) -> &'static str {
        match self {
            Tab::Day => "day",
            Tab::Week => "week",
        }
    }
}

/// Timesheet navigation operator. The backend owns all date arithmetic;
/// the client only ever echoes back the `timeStart` it was last given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOp {
    /// `=` — fetch the current range for the tab (first render, tab click).
    Current,
    /// `-` — one day/week back.
    Back,
    /// `+` — one day/week forward.
    Forward,
    /// `copy` — clipboard export on the backend side, opaque reply.
    Copy,
}

impl NavOp {
    pub fn token(&self) -> &'static str {
        match self {
            NavOp::Current => "=",
            NavOp::Back => "-",
            NavOp::Forward => "+",
            NavOp::Copy => "copy",
        }
    }
}

/// Settings payload sent as `settings|<json>`. Write-only from the UI's
/// perspective; initial form defaults come from the local config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsValues {
    #[serde(default)]
    pub jira: JiraSettings,
    #[serde(default)]
    pub harvest: HarvestSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JiraSettings {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestSettings {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub pass: String,
}

/// A single wire command: a verb plus ordered string args, serialized as
/// `verb` or `verb|arg1|arg2|...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: String,
    pub args: Vec<String>,
}

impl Command {
    pub fn new(verb: impl Into<String>, args: Vec<String>) -> Self {
        let verb = verb.into();
        debug_assert!(!verb.is_empty(), "command verb must be non-empty");
        debug_assert!(
            !verb.contains(DELIMITER) && args.iter().all(|a| !a.contains(DELIMITER)),
            "command fields must not contain the delimiter"
        );
        Self { verb, args }
    }

    /// Re-fetch the current timer list; the fresh list arrives as a
    /// `renderTimers` push, not as the reply.
    pub fn refresh() -> Self {
        Self::new("refresh", vec![])
    }

    /// Toggle the timesheet screen.
    pub fn toggle_timesheet() -> Self {
        Self::new("timesheet", vec![])
    }

    /// Toggle the settings screen.
    pub fn toggle_settings() -> Self {
        Self::new("settings", vec![])
    }

    /// Trigger a harvest-side sync on the backend.
    pub fn open_harvest() -> Self {
        Self::new("harvest", vec![])
    }

    pub fn start(key: &str) -> Self {
        Self::new("start", vec![key.to_string()])
    }

    pub fn stop(key: &str) -> Self {
        Self::new("stop", vec![key.to_string()])
    }

    /// Open the external link for `key` in the backend's UI shell.
    pub fn open(key: &str) -> Self {
        Self::new("open", vec![key.to_string()])
    }

    /// Timesheet navigation: `day|<timeStart>|<op>` / `week|<timeStart>|<op>`.
    pub fn navigate(
        tab: Tab,
        time_start: OffsetDateTime,
        op: NavOp,
    ) -> Result<Self, time::error::Format> {
        let stamp = time_start.format(&Rfc3339)?;
        Ok(Self::new(
            tab.verb(),
            vec![stamp, op.token().to_string()],
        ))
    }

    /// Persist a settings payload: `settings|<json>`.
    pub fn save_settings(values: &SettingsValues) -> Result<Self, serde_json::Error> {
        let json = serde_json::to_string(values)?;
        Ok(Self::new("settings", vec![json]))
    }

    pub fn encode(&self) -> String {
        if self.args.is_empty() {
            return self.verb.clone();
        }
        let mut out = self.verb.clone();
        for arg in &self.args {
            out.push(DELIMITER);
            out.push_str(arg);
        }
        out
    }

    pub fn decode(raw: &str) -> Result<Self, CodecError> {
        let mut parts = raw.split(DELIMITER);
        let verb = match parts.next() {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => return Err(CodecError::MalformedCommand),
        };
        Ok(Self {
            verb,
            args: parts.map(str::to_string).collect(),
        })
    }
}
