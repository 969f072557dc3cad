use serde::Serialize;

use crate::model::{ScheduleEntry, Task, Weekday};
use crate::ops::TasksByDate;
use crate::week::{date_key, day_label, Week};

/// One day of a week listing, as emitted by `week --json`.
#[derive(Serialize)]
pub struct DayListing<'a> {
    pub date: String,
    pub day_of_week: &'static str,
    pub schedule: Vec<&'a ScheduleEntry>,
    pub tasks: &'a [Task],
}

pub fn week_listing<'a>(
    week: &Week,
    tasks: &'a TasksByDate,
    schedule: &'a [ScheduleEntry],
) -> Vec<DayListing<'a>> {
    week.days()
        .into_iter()
        .zip(Weekday::ALL)
        .map(|(date, day)| {
            let key = date_key(date);
            let tasks = tasks.get(&key).map(Vec::as_slice).unwrap_or(&[]);
            DayListing {
                date: key,
                day_of_week: day.as_str(),
                schedule: schedule
                    .iter()
                    .filter(|e| e.day_of_week == day.as_str())
                    .collect(),
                tasks,
            }
        })
        .collect()
}

pub fn format_task_detail(task: &Task) -> String {
    let mut out = String::new();
    out.push_str(&format!("Id:          {}\n", task.id));
    out.push_str(&format!("Name:        {}\n", task.name));
    out.push_str(&format!("Date:        {}\n", task.date));
    out.push_str(&format!(
        "Status:      {}\n",
        if task.is_completed { "done" } else { "pending" }
    ));
    if !task.time.is_empty() {
        out.push_str(&format!("Time:        {}\n", task.time));
    }
    if !task.location.is_empty() {
        out.push_str(&format!("Location:    {}\n", task.location));
    }
    if task.has_attachment() {
        out.push_str(&format!("Attachment:  {}\n", task.file_path));
    }
    if !task.description.is_empty() {
        out.push_str(&format!("Description: {}\n", task.description));
    }
    out
}

pub fn format_task_line(task: &Task) -> String {
    let mut line = format!("{} {:>4}", task.icon(), task.id);
    if !task.time.is_empty() {
        line.push_str(&format!("  {}", task.time));
    }
    line.push_str(&format!("  {}", task.name));
    if !task.location.is_empty() {
        line.push_str(&format!(" @ {}", task.location));
    }
    if task.has_attachment() {
        line.push_str(" [file]");
    }
    line
}

pub fn format_schedule_line(entry: &ScheduleEntry) -> String {
    let mut line = format!(
        "{}-{} {}",
        entry.start_time, entry.end_time, entry.entry_type
    );
    if !entry.description.is_empty() {
        line.push_str(&format!(": {}", entry.description));
    }
    line
}

pub fn format_week(week: &Week, tasks: &TasksByDate, schedule: &[ScheduleEntry]) -> String {
    let mut out = format!("{}\n", week.title());
    for (date, day) in week.days().into_iter().zip(week_listing(week, tasks, schedule)) {
        out.push('\n');
        out.push_str(&day_label(date));
        out.push('\n');
        for entry in &day.schedule {
            out.push_str(&format!("  | {}\n", format_schedule_line(entry)));
        }
        for task in day.tasks {
            out.push_str(&format!("  {}\n", format_task_line(task)));
        }
        if day.schedule.is_empty() && day.tasks.is_empty() {
            out.push_str("  -\n");
        }
    }
    out
}

pub fn format_schedule(entries: &[ScheduleEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!(
            "{:>4}  {:<9}  {}\n",
            entry.id,
            entry.day_of_week,
            format_schedule_line(entry)
        ));
    }
    out
}
