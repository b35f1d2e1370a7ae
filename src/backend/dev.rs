use std::collections::BTreeMap;

use serde_json::{json, Value};
use time::format_description::well_known::Rfc3339;
use time::{Date, Duration, OffsetDateTime};

use crate::protocol::channel::{Transport, TransportPeer};
use crate::protocol::command::{Command, SettingsValues};
use crate::protocol::push::{TaskTimes, TimesheetSheet};

/// In-process fake backend speaking the full wire protocol, used by
/// `harvester-tui dev` and the integration tests. Seeded with a couple of
/// timers and tracked hours around `today`.
pub struct DevBackend {
    view: &'static str,
    timers: Vec<DevTimer>,
    // Tracked hours per (timer key, day). BTreeMap keeps replies stable.
    tracked: BTreeMap<(String, Date), f64>,
    settings: SettingsValues,
    today: Date,
}

#[derive(Debug, Clone)]
struct DevTimer {
    key: String,
    summary: String,
    harvest_project: Option<String>,
    running: bool,
    runtime: String,
}

impl DevBackend {
    pub fn new() -> Self {
        Self::with_today(OffsetDateTime::now_utc().date())
    }

    pub fn with_today(today: Date) -> Self {
        let timers = vec![
            DevTimer {
                key: "HARV-1".to_string(),
                summary: "Fix login flow".to_string(),
                harvest_project: None,
                running: false,
                runtime: String::new(),
            },
            DevTimer {
                key: "HARV-2".to_string(),
                summary: "Timesheet export".to_string(),
                harvest_project: None,
                running: false,
                runtime: String::new(),
            },
            DevTimer {
                key: "internal".to_string(),
                summary: String::new(),
                harvest_project: Some("Internal Tools".to_string()),
                running: false,
                runtime: String::new(),
            },
        ];

        let mut tracked = BTreeMap::new();
        let mut track = |key: &str, offset: i64, hours: f64| {
            tracked.insert((key.to_string(), today + Duration::days(offset)), hours);
        };
        track("HARV-1", 0, 1.5);
        track("HARV-1", -1, 2.0);
        track("HARV-2", 0, 0.75);
        track("HARV-2", -2, 1.25);
        track("internal", -1, 0.5);

        Self {
            view: "main",
            timers,
            tracked,
            settings: SettingsValues::default(),
            today,
        }
    }

    /// Runs the backend on its own task, returning the UI-side transport.
    pub fn spawn(mut self) -> Transport {
        let (transport, peer) = Transport::pair();
        let TransportPeer { mut from_ui, to_ui } = peer;
        tokio::spawn(async move {
            while let Some(line) = from_ui.recv().await {
                for message in self.handle_line(&line) {
                    if to_ui.send(message).is_err() {
                        return;
                    }
                }
            }
        });
        transport
    }

    /// Handles one command line, returning the reply followed by any
    /// pushes it triggers. Every command gets exactly one reply.
    pub fn handle_line(&mut self, line: &str) -> Vec<String> {
        let command = match Command::decode(line) {
            Ok(command) => command,
            Err(err) => {
                return vec![
                    Value::Null.to_string(),
                    error_push(&format!("bad command: {err}")),
                ];
            }
        };

        match command.verb.as_str() {
            "refresh" => vec![Value::Null.to_string(), self.render_timers_push()],
            "harvest" => vec![Value::Null.to_string()],
            "timesheet" => {
                self.view = if self.view == "timesheet" { "main" } else { "timesheet" };
                vec![json!(true).to_string()]
            }
            "settings" if command.args.is_empty() => {
                self.view = if self.view == "settings" { "main" } else { "settings" };
                vec![json!(true).to_string()]
            }
            "settings" => match serde_json::from_str::<SettingsValues>(&command.args[0]) {
                Ok(values) => {
                    self.settings = values;
                    self.view = "main";
                    vec![json!(true).to_string()]
                }
                Err(err) => vec![
                    Value::Null.to_string(),
                    error_push(&format!("bad settings payload: {err}")),
                ],
            },
            "start" => self.start_timer(command.args.first().map(String::as_str)),
            "stop" => self.stop_timer(command.args.first().map(String::as_str)),
            "open" => vec![Value::Null.to_string()],
            "day" | "week" => self.navigate(&command),
            other => {
                tracing::debug!(verb = other, "dev backend ignoring unknown verb");
                vec![Value::Null.to_string()]
            }
        }
    }

    pub fn settings(&self) -> &SettingsValues {
        &self.settings
    }

    fn start_timer(&mut self, key: Option<&str>) -> Vec<String> {
        let Some(key) = key else {
            return vec![Value::Null.to_string()];
        };
        if !self.timers.iter().any(|t| t.key == key) {
            return vec![
                Value::Null.to_string(),
                error_push(&format!("timer not found: {key}")),
            ];
        }
        // Only one timer runs at a time, as the real backend enforces.
        for timer in &mut self.timers {
            timer.running = timer.key == key;
            timer.runtime = if timer.running {
                "0:00".to_string()
            } else {
                String::new()
            };
        }
        vec![Value::Null.to_string(), self.render_timers_push()]
    }

    fn stop_timer(&mut self, key: Option<&str>) -> Vec<String> {
        let Some(key) = key else {
            return vec![Value::Null.to_string()];
        };
        for timer in &mut self.timers {
            if timer.key == key {
                timer.running = false;
                timer.runtime = String::new();
            }
        }
        vec![Value::Null.to_string(), self.render_timers_push()]
    }

    fn navigate(&mut self, command: &Command) -> Vec<String> {
        if command.args.len() < 2 {
            return vec![Value::Null.to_string()];
        }
        let days: i64 = if command.verb == "week" { 7 } else { 1 };
        let op = command.args[1].as_str();

        let start = match op {
            "=" => {
                if days == 7 {
                    monday_of(self.today)
                } else {
                    self.today
                }
            }
            "-" | "+" | "copy" => {
                let parsed = OffsetDateTime::parse(&command.args[0], &Rfc3339);
                let base = match parsed {
                    Ok(stamp) => stamp.date(),
                    Err(err) => {
                        return vec![
                            Value::Null.to_string(),
                            error_push(&format!("bad timeStart: {err}")),
                        ];
                    }
                };
                match op {
                    "-" => base - Duration::days(days),
                    "+" => base + Duration::days(days),
                    _ => base,
                }
            }
            other => {
                return vec![
                    Value::Null.to_string(),
                    error_push(&format!("bad navigation op: {other}")),
                ];
            }
        };

        if op == "copy" {
            return vec![json!(self.clipboard_export(start, days)).to_string()];
        }

        let sheet = self.build_sheet(start, days);
        match serde_json::to_string(&sheet) {
            Ok(reply) => vec![reply],
            Err(err) => vec![
                Value::Null.to_string(),
                error_push(&format!("timesheet build failed: {err}")),
            ],
        }
    }

    fn build_sheet(&self, start: Date, days: i64) -> TimesheetSheet {
        let end = start + Duration::days(days - 1);
        let mut tasks: BTreeMap<&str, TaskTimes> = BTreeMap::new();
        let mut days_total = vec![0.0; days as usize];
        let mut total = 0.0;

        for ((key, day), hours) in &self.tracked {
            if *day < start || *day > end {
                continue;
            }
            let slot = if days == 1 {
                0
            } else {
                day.weekday().number_days_from_monday() as usize
            };
            let task = tasks.entry(key.as_str()).or_insert_with(|| TaskTimes {
                key: key.clone(),
                durations: vec![0.0; days as usize],
                total_time: 0.0,
            });
            task.durations[slot] += hours;
            task.total_time += hours;
            days_total[slot] += hours;
            total += hours;
        }

        let time_start = start.midnight().assume_utc();
        TimesheetSheet {
            time_start,
            time_end: time_start + Duration::days(days) - Duration::minutes(1),
            tasks: tasks.into_values().collect(),
            days_total,
            total,
        }
    }

    fn clipboard_export(&self, start: Date, days: i64) -> String {
        let sheet = self.build_sheet(start, days);
        let mut out = String::new();
        for task in &sheet.tasks {
            out.push_str(&format!("{}\t{:.2}\n", task.key, task.total_time));
        }
        out
    }

    fn render_timers_push(&self) -> String {
        let timers: Vec<Value> = self
            .timers
            .iter()
            .map(|timer| {
                let mut record = json!({
                    "key": timer.key,
                    "running": timer.running,
                    "runtime": timer.runtime,
                });
                match &timer.harvest_project {
                    Some(name) => {
                        record["harvest"] = json!({"project": {"name": name}});
                    }
                    None => {
                        record["jira"] = json!({"fields": {"summary": timer.summary}});
                    }
                }
                record
            })
            .collect();

        json!({"Type": "renderTimers", "Timers": timers}).to_string()
    }
}

impl Default for DevBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn monday_of(date: Date) -> Date {
    date - Duration::days(date.weekday().number_days_from_monday() as i64)
}

fn error_push(message: &str) -> String {
    json!({"Type": "error", "Message": message}).to_string()
}
