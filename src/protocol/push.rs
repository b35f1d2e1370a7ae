use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// A backend-initiated message, not correlated to any prior request.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "Type")]
pub enum Push {
    #[serde(rename = "error")]
    Error {
        #[serde(rename = "Message")]
        message: String,
    },
    #[serde(rename = "renderTimers")]
    RenderTimers {
        #[serde(rename = "Timers", default)]
        timers: Vec<TimerRecord>,
    },
    /// Unrecognized push type; ignored without mutating any state.
    #[serde(other)]
    Unknown,
}

/// A timer record as the backend emits it: duck-typed, with optional
/// `jira`/`harvest` sub-objects selecting the source.
#[derive(Debug, Clone, Deserialize)]
pub struct TimerRecord {
    pub key: String,
    #[serde(default)]
    pub running: bool,
    #[serde(default)]
    pub runtime: String,
    #[serde(default)]
    pub jira: Option<JiraRecord>,
    #[serde(default)]
    pub harvest: Option<HarvestRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraRecord {
    #[serde(default)]
    pub fields: JiraFields,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JiraFields {
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HarvestRecord {
    #[serde(default)]
    pub project: HarvestProject,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HarvestProject {
    #[serde(default)]
    pub name: String,
}

/// Which source system a timer belongs to, with the source-specific
/// description. Explicit discriminant instead of field probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerSource {
    Jira { summary: String },
    Harvest { project_name: String },
}

/// A known timer and its running state. Owned exclusively by the registry;
/// mutated only by push handling, never by the view layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerEntry {
    pub key: String,
    pub source: TimerSource,
    pub running: bool,
    pub runtime: String,
}

impl TimerEntry {
    /// `harvest` wins over `jira` when both are present (mirrors the
    /// original icon selection). Records with neither source are dropped.
    pub fn from_record(record: TimerRecord) -> Option<Self> {
        let source = if let Some(harvest) = record.harvest {
            TimerSource::Harvest {
                project_name: harvest.project.name,
            }
        } else if let Some(jira) = record.jira {
            TimerSource::Jira {
                summary: jira.fields.summary,
            }
        } else {
            return None;
        };

        Some(Self {
            key: record.key,
            source,
            running: record.running,
            runtime: record.runtime,
        })
    }

    pub fn description(&self) -> &str {
        match &self.source {
            TimerSource::Jira { summary } => summary,
            TimerSource::Harvest { project_name } => project_name,
        }
    }

    pub fn source_tag(&self) -> &'static str {
        match self.source {
            TimerSource::Jira { .. } => "jira",
            TimerSource::Harvest { .. } => "harvest",
        }
    }
}

pub fn entries_from_records(records: Vec<TimerRecord>) -> Vec<TimerEntry> {
    records
        .into_iter()
        .filter_map(|record| {
            let key = record.key.clone();
            let entry = TimerEntry::from_record(record);
            if entry.is_none() {
                tracing::warn!(key, "dropping timer record with no source");
            }
            entry
        })
        .collect()
}

/// One task row in a timesheet reply. `durations` has one slot per day of
/// the range (1 for the day tab, 7 for the week tab).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskTimes {
    pub key: String,
    #[serde(default)]
    pub durations: Vec<f64>,
    #[serde(default)]
    pub total_time: f64,
}

/// A full timesheet reply. The backend computes the range; the client
/// replaces its cached sheet wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetSheet {
    #[serde(with = "time::serde::rfc3339")]
    pub time_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub time_end: OffsetDateTime,
    #[serde(default)]
    pub tasks: Vec<TaskTimes>,
    #[serde(default)]
    pub days_total: Vec<f64>,
    #[serde(default)]
    pub total: f64,
}

/// An inbound wire message after classification.
#[derive(Debug)]
pub enum Inbound {
    Push(Push),
    Reply(Value),
}

/// Classify one inbound JSON message. A JSON object carrying a string
/// `Type` field is a push; everything else is a reply and resolves the
/// oldest outstanding request.
pub fn classify(raw: &str) -> Result<Inbound, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let is_push = value
        .as_object()
        .and_then(|obj| obj.get("Type"))
        .is_some_and(Value::is_string);

    if !is_push {
        return Ok(Inbound::Reply(value));
    }

    match serde_json::from_value::<Push>(value) {
        Ok(push) => Ok(Inbound::Push(push)),
        Err(err) => {
            tracing::warn!(%err, "ignoring undecodable push");
            Ok(Inbound::Push(Push::Unknown))
        }
    }
}

/// JS-style truthiness for toggle replies: `null`, `false`, `0` and `""`
/// are falsy, everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_error_push() {
        let raw = r#"{"Type":"error","Message":"jira unreachable"}"#;
        match classify(raw).unwrap() {
            Inbound::Push(Push::Error { message }) => assert_eq!(message, "jira unreachable"),
            other => panic!("expected error push, got {:?}", other),
        }
    }

    #[test]
    fn decodes_render_timers_push_with_tagged_sources() {
        let raw = json!({
            "Type": "renderTimers",
            "Timers": [
                {
                    "key": "HARV-12",
                    "running": true,
                    "runtime": "0:42",
                    "jira": {"fields": {"summary": "Fix login flow"}}
                },
                {
                    "key": "billing",
                    "running": false,
                    "runtime": "",
                    "harvest": {"project": {"name": "Internal"}}
                },
                {"key": "orphan"}
            ]
        })
        .to_string();

        let Inbound::Push(Push::RenderTimers { timers }) = classify(&raw).unwrap() else {
            panic!("expected renderTimers push");
        };
        let entries = entries_from_records(timers);
        assert_eq!(entries.len(), 2, "sourceless record is dropped");
        assert_eq!(
            entries[0].source,
            TimerSource::Jira {
                summary: "Fix login flow".to_string()
            }
        );
        assert!(entries[0].running);
        assert_eq!(
            entries[1].source,
            TimerSource::Harvest {
                project_name: "Internal".to_string()
            }
        );
    }

    #[test]
    fn harvest_wins_when_both_sources_present() {
        let raw = json!({
            "key": "X",
            "jira": {"fields": {"summary": "s"}},
            "harvest": {"project": {"name": "p"}}
        });
        let record: TimerRecord = serde_json::from_value(raw).unwrap();
        let entry = TimerEntry::from_record(record).unwrap();
        assert_eq!(entry.source_tag(), "harvest");
    }

    #[test]
    fn unknown_push_type_is_ignored() {
        let raw = r#"{"Type":"somethingNew","Payload":1}"#;
        assert!(matches!(
            classify(raw).unwrap(),
            Inbound::Push(Push::Unknown)
        ));
    }

    #[test]
    fn non_tagged_messages_are_replies() {
        assert!(matches!(
            classify("true").unwrap(),
            Inbound::Reply(Value::Bool(true))
        ));
        assert!(matches!(classify("null").unwrap(), Inbound::Reply(Value::Null)));
        assert!(matches!(
            classify(r#"{"timeStart":"2024-01-10T00:00:00Z"}"#).unwrap(),
            Inbound::Reply(Value::Object(_))
        ));
    }

    #[test]
    fn timesheet_reply_parses() {
        let raw = json!({
            "timeStart": "2024-01-08T00:00:00Z",
            "timeEnd": "2024-01-14T23:59:00Z",
            "tasks": [
                {"key": "HARV-1", "durations": [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.5], "totalTime": 3.5}
            ],
            "daysTotal": [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 2.5],
            "total": 3.5
        });
        let sheet: TimesheetSheet = serde_json::from_value(raw).unwrap();
        assert_eq!(sheet.days_total.len(), 7);
        assert_eq!(sheet.tasks[0].total_time, 3.5);
    }

    #[test]
    fn truthiness_matches_toggle_semantics() {
        assert!(!is_truthy(&Value::Null));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("timesheet")));
        assert!(is_truthy(&json!({})));
    }
}
