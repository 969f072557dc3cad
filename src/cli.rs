use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "weekplan", about = "Weekly planner with a terminal week grid", version)]
pub struct Cli {
    /// Path to the SQLite database [default: ~/.weekplan/planner.db]
    #[arg(long, env = "WEEKPLAN_DB", global = true)]
    pub db: Option<String>,

    /// Directory for attachment copies [default: uploads/ beside the database]
    #[arg(long, env = "WEEKPLAN_UPLOADS", global = true)]
    pub uploads: Option<PathBuf>,

    /// Defaults to the interactive week grid
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a task on a date
    Add {
        /// Date (YYYY-MM-DD)
        date: String,
        /// Task name
        name: String,
        /// Longer description
        #[arg(short, long, default_value = "")]
        desc: String,
        /// Time, usually HH:MM
        #[arg(short, long, default_value = "")]
        time: String,
        /// Location
        #[arg(short, long, default_value = "")]
        location: String,
        /// File to copy in as an attachment
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show task details
    Show {
        /// Task id
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List the week containing a date
    Week {
        /// Any date in the week (YYYY-MM-DD) [default: today]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a task's fields (the date cannot change)
    Edit {
        /// Task id
        id: i64,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New description
        #[arg(short, long)]
        desc: Option<String>,
        /// New time
        #[arg(short, long)]
        time: Option<String>,
        /// New location
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Mark a task as completed
    Done {
        /// Task id
        id: i64,
    },

    /// Mark a task as not completed
    Undone {
        /// Task id
        id: i64,
    },

    /// Remove a task and its stored attachment
    Rm {
        /// Task id
        id: i64,
        /// Keep the attachment copy on disk
        #[arg(long)]
        keep_file: bool,
    },

    /// Attach a file to a task, replacing any previous attachment
    Attach {
        /// Task id
        id: i64,
        /// File to copy into the uploads directory
        file: PathBuf,
    },

    /// Remove a task's attachment
    Detach {
        /// Task id
        id: i64,
    },

    /// Recurring weekly schedule blocks
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// Launch the interactive week grid
    Ui {
        /// Poll interval in milliseconds
        #[arg(long, default_value = "1000")]
        poll_interval: u64,
    },
}

#[derive(Subcommand)]
pub enum ScheduleCommand {
    /// Add a block to a weekday
    Add {
        /// Day of week (Monday..Sunday, or Mon..Sun)
        day: String,
        /// Start time (HH:MM)
        start: String,
        /// End time (HH:MM)
        end: String,
        /// Category, e.g. Work or Class
        #[arg(value_name = "TYPE")]
        entry_type: String,
        /// Description
        #[arg(short, long, default_value = "")]
        desc: String,
    },

    /// List blocks, optionally for one weekday
    List {
        /// Day of week
        day: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a block
    Edit {
        /// Schedule entry id
        id: i64,
        /// New day of week
        #[arg(long)]
        day: Option<String>,
        /// New start time (HH:MM)
        #[arg(long)]
        start: Option<String>,
        /// New end time (HH:MM)
        #[arg(long)]
        end: Option<String>,
        /// New category
        #[arg(long = "type", value_name = "TYPE")]
        entry_type: Option<String>,
        /// New description
        #[arg(short, long)]
        desc: Option<String>,
    },

    /// Remove a block
    Rm {
        /// Schedule entry id
        id: i64,
    },
}
