use crate::error::TaskError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Recurrence label. Repeating tasks stay in the live list after completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Repeat {
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Custom(String),
}

impl Repeat {
    /// Parses a user-supplied label. Blank input means no repeat rule.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Some(match label.to_lowercase().as_str() {
            "daily" => Repeat::Daily,
            "weekly" => Repeat::Weekly,
            "monthly" => Repeat::Monthly,
            "yearly" => Repeat::Yearly,
            _ => Repeat::Custom(label.to_string()),
        })
    }

    pub fn as_str(&self) -> &str {
        match self {
            Repeat::Daily => "daily",
            Repeat::Weekly => "weekly",
            Repeat::Monthly => "monthly",
            Repeat::Yearly => "yearly",
            Repeat::Custom(label) => label,
        }
    }
}

impl fmt::Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn serialize_repeat<S: Serializer>(repeat: &Option<Repeat>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(repeat.as_ref().map(Repeat::as_str).unwrap_or(""))
}

fn deserialize_repeat<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Repeat>, D::Error> {
    let raw: Option<String> = Option::deserialize(d)?;
    Ok(raw.as_deref().and_then(Repeat::parse))
}

/// A single to-do item. Field names on the wire and in local storage follow
/// the backend's camelCase layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub text: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub remind_at: Option<DateTime<Utc>>,
    /// Set by the backend once a reminder email went out.
    #[serde(default)]
    pub emailed: bool,
    #[serde(
        default,
        serialize_with = "serialize_repeat",
        deserialize_with = "deserialize_repeat"
    )]
    pub repeat: Option<Repeat>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(text: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            done: false,
            remind_at: None,
            emailed: false,
            repeat: None,
            tags: Vec::new(),
            completed_at: None,
        }
    }

    /// Flips completion. `completed_at` is set and cleared together with `done`.
    pub fn toggle_done(&mut self, now: DateTime<Utc>) -> bool {
        self.done = !self.done;
        self.completed_at = if self.done { Some(now) } else { None };
        self.done
    }

    pub fn is_repeating(&self) -> bool {
        self.repeat.is_some()
    }
}

/// Raw form fields for a new task, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskInput {
    pub text: String,
    pub remind_at: String,
    pub repeat: String,
    pub tags: String,
}

impl TaskInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    pub fn remind_at(mut self, remind_at: impl Into<String>) -> Self {
        self.remind_at = remind_at.into();
        self
    }

    pub fn repeat(mut self, repeat: impl Into<String>) -> Self {
        self.repeat = repeat.into();
        self
    }

    pub fn tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }
}

/// Splits a comma-delimited tag string, trimming entries and dropping empties.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses reminder text. Zone-less input is read as local time.
pub fn parse_reminder(input: &str) -> Result<DateTime<Utc>, TaskError> {
    let input = input.trim();
    let invalid = || TaskError::InvalidReminder(input.to_string());

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}
