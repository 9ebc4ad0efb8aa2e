use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::time_utils::{hour_period, month_name, weekday_name};

/// Author assigned to system events that have no human sender.
pub const GROUP_NOTIFICATION: &str = "group_notification";

/// Body written by the exporter in place of an attachment.
pub const MEDIA_OMITTED: &str = "<Media omitted>";

/// Selection label meaning "no author restriction".
pub const OVERALL: &str = "Overall";

/// One parsed chat message plus its derived time-part columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Local time the message was sent, minute precision.
    pub timestamp: NaiveDateTime,
    /// Sender name, or [`GROUP_NOTIFICATION`] for system events.
    pub author: String,
    /// Raw message text; continuation lines are joined with `\n`.
    pub body: String,
    pub year: i32,
    /// 1-based month number.
    pub month_num: u32,
    /// English month name, e.g. `"March"`.
    pub month: String,
    pub day: u32,
    /// English weekday name, e.g. `"Wednesday"`.
    pub day_name: String,
    pub hour: u32,
    pub minute: u32,
    pub only_date: NaiveDate,
    /// Hour bucket label, e.g. `"21-22"`.
    pub period: String,
}

impl Message {
    /// Build a message and derive every time-part column from `timestamp`.
    pub fn new(
        timestamp: NaiveDateTime,
        author: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            timestamp,
            author: author.into(),
            body: body.into(),
            year: timestamp.year(),
            month_num: timestamp.month(),
            month: month_name(timestamp.month()).to_string(),
            day: timestamp.day(),
            day_name: weekday_name(timestamp.weekday()).to_string(),
            hour: timestamp.hour(),
            minute: timestamp.minute(),
            only_date: timestamp.date(),
            period: hour_period(timestamp.hour()),
        }
    }

    /// `true` for system events without a human author.
    pub fn is_notification(&self) -> bool {
        self.author == GROUP_NOTIFICATION
    }

    /// `true` when the body is exactly the media placeholder.
    pub fn is_media(&self, marker: &str) -> bool {
        self.body.trim() == marker
    }

    /// Append a continuation line to the body.
    pub fn append_line(&mut self, line: &str) {
        self.body.push('\n');
        self.body.push_str(line);
    }
}

/// Which author an aggregation is restricted to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Selection {
    /// Every message, notifications included.
    #[default]
    Overall,
    /// Only messages whose author equals the name.
    User(String),
}

impl Selection {
    /// Parse a selection label; the literal `"Overall"` means no restriction.
    pub fn from_label(label: &str) -> Self {
        if label == OVERALL {
            Selection::Overall
        } else {
            Selection::User(label.to_string())
        }
    }

    /// Returns `true` when `message` passes this selection.
    pub fn matches(&self, message: &Message) -> bool {
        match self {
            Selection::Overall => true,
            Selection::User(name) => message.author == *name,
        }
    }

    pub fn is_overall(&self) -> bool {
        matches!(self, Selection::Overall)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::Overall => f.write_str(OVERALL),
            Selection::User(name) => f.write_str(name),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
