use serde::Serialize;
use std::fmt;

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: i64,
    pub date: String,
    pub name: String,
    pub description: String,
    pub time: String,
    pub location: String,
    pub file_path: String,
    pub is_completed: bool,
}

impl Task {
    /// Returns display icon: x=done, .=pending
    pub fn icon(&self) -> &'static str {
        if self.is_completed {
            "x"
        } else {
            "."
        }
    }

    pub fn has_attachment(&self) -> bool {
        !self.file_path.is_empty()
    }

    pub fn fields(&self) -> TaskFields {
        TaskFields {
            name: self.name.clone(),
            description: self.description.clone(),
            time: self.time.clone(),
            location: self.location.clone(),
            file_path: self.file_path.clone(),
        }
    }
}

/// Everything about a task that can change after creation. The date and
/// completion flag are handled separately.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub name: String,
    pub description: String,
    pub time: String,
    pub location: String,
    pub file_path: String,
}

impl TaskFields {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.time = time.to_string();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleEntry {
    pub id: i64,
    pub day_of_week: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Self::Monday,
        Self::Tuesday,
        Self::Wednesday,
        Self::Thursday,
        Self::Friday,
        Self::Saturday,
        Self::Sunday,
    ];

    pub fn parse(s: &str) -> Result<Self, StoreError> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|d| {
                let full = d.as_str().to_ascii_lowercase();
                lower == full || (lower.len() == 3 && full.starts_with(&lower))
            })
            .ok_or_else(|| StoreError::Invalid(format!("invalid day of week '{s}'")))
    }

    /// Canonical name as stored in the `day_of_week` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }

    /// Position in a Monday-first week.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
