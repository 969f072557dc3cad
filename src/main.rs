mod cli;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rusqlite::Connection;

use cli::{Cli, Command, ScheduleCommand};
use weekplan::attachments::AttachmentStore;
use weekplan::model::{TaskFields, Weekday};
use weekplan::planner::{self, Planner};
use weekplan::validate::{validate_clock_time, validate_date};
use weekplan::week::Week;
use weekplan::{logging, ops, output, paths, tui};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Ui {
        poll_interval: 1000,
    });
    logging::init(matches!(command, Command::Ui { .. }));

    let db_path = paths::resolve_db_path(cli.db)?;
    paths::ensure_db_dir(&db_path)?;
    let upload_dir = paths::resolve_upload_dir(cli.uploads, &db_path);

    let mut planner = Planner::initialize(&db_path, &upload_dir);
    let result = if let Command::Ui { poll_interval } = command {
        if !planner.is_available() {
            bail!("cannot open database {db_path}");
        }
        tui::run(&db_path, &planner, poll_interval)
    } else {
        let conn = planner
            .connection()
            .with_context(|| format!("cannot open database {db_path}"))?;
        dispatch(conn, planner.attachments(), command)
    };
    planner.shutdown();
    result
}

fn require_store(store: Option<&AttachmentStore>) -> Result<&AttachmentStore> {
    store.context("uploads directory is not available")
}

fn check_schedule_times(start: &str, end: &str) -> Result<()> {
    validate_clock_time(start)?;
    validate_clock_time(end)?;
    if end < start {
        tracing::warn!(start, end, "schedule block ends before it starts");
    }
    Ok(())
}

fn dispatch(conn: &Connection, store: Option<&AttachmentStore>, command: Command) -> Result<()> {
    match command {
        Command::Add {
            date,
            name,
            desc,
            time,
            location,
            file,
            json,
        } => {
            if let Some(path) = &file {
                if !path.is_file() {
                    bail!("file '{}' not found", path.display());
                }
            }
            let store = match &file {
                Some(_) => Some(require_store(store)?),
                None => None,
            };
            let fields = TaskFields {
                name,
                description: desc,
                time,
                location,
                file_path: String::new(),
            };
            // A failed copy must not leave the row behind.
            let tx = conn.unchecked_transaction()?;
            let id = ops::add_task(&tx, &date, &fields)?;
            if let (Some(path), Some(store)) = (&file, store) {
                planner::attach_file(&tx, store, id, path)?;
            }
            tx.commit()?;
            if json {
                let task = ops::get_task(conn, id)?;
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                println!("{id}");
            }
            eprintln!("Added task {id} '{}' on {date}", fields.name);
        }

        Command::Show { id, json } => {
            let task = ops::get_task(conn, id)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&task)?);
            } else {
                print!("{}", output::format_task_detail(&task));
            }
        }

        Command::Week { date, json } => {
            let week = match date {
                Some(d) => Week::containing(validate_date(&d)?),
                None => Week::current(),
            };
            let (start, end) = week.range_strings();
            let tasks = ops::tasks_for_week(conn, &start, &end)?;
            let schedule = ops::list_schedule(conn)?;
            if json {
                let days = output::week_listing(&week, &tasks, &schedule);
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                print!("{}", output::format_week(&week, &tasks, &schedule));
            }
        }

        Command::Edit {
            id,
            name,
            desc,
            time,
            location,
        } => {
            let task = ops::get_task(conn, id)?;
            let mut fields = task.fields();
            if let Some(name) = name {
                fields.name = name;
            }
            if let Some(desc) = desc {
                fields.description = desc;
            }
            if let Some(time) = time {
                fields.time = time;
            }
            if let Some(location) = location {
                fields.location = location;
            }
            ops::update_task(conn, id, &fields)?;
            eprintln!("Updated task {id}");
        }

        Command::Done { id } => {
            ops::update_task_status(conn, id, true)?;
            eprintln!("Marked task {id} as done");
        }

        Command::Undone { id } => {
            ops::update_task_status(conn, id, false)?;
            eprintln!("Marked task {id} as not done");
        }

        Command::Rm { id, keep_file } => {
            let store = if keep_file { None } else { store };
            let task = planner::delete_task_and_file(conn, store, id)?;
            eprintln!("Removed task {id} '{}'", task.name);
        }

        Command::Attach { id, file } => {
            let dest = planner::attach_file(conn, require_store(store)?, id, &file)?;
            println!("{}", dest.display());
            eprintln!("Attached to task {id}");
        }

        Command::Detach { id } => {
            if planner::detach_file(conn, store, id)? {
                eprintln!("Removed attachment from task {id}");
            } else {
                eprintln!("Task {id} has no attachment");
            }
        }

        Command::Schedule(cmd) => dispatch_schedule(conn, cmd)?,

        Command::Ui { .. } => unreachable!("handled before dispatch"),
    }

    Ok(())
}

fn dispatch_schedule(conn: &Connection, command: ScheduleCommand) -> Result<()> {
    match command {
        ScheduleCommand::Add {
            day,
            start,
            end,
            entry_type,
            desc,
        } => {
            let day = Weekday::parse(&day)?;
            check_schedule_times(&start, &end)?;
            let id = ops::add_schedule_entry(conn, day, &start, &end, &entry_type, &desc)?;
            println!("{id}");
            eprintln!("Added {entry_type} block on {day} {start}-{end}");
        }

        ScheduleCommand::List { day, json } => {
            let entries = match day {
                Some(d) => ops::schedule_for_day(conn, Weekday::parse(&d)?)?,
                None => ops::list_schedule(conn)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print!("{}", output::format_schedule(&entries));
            }
        }

        ScheduleCommand::Edit {
            id,
            day,
            start,
            end,
            entry_type,
            desc,
        } => {
            let mut entry = ops::get_schedule_entry(conn, id)?;
            if let Some(day) = day {
                entry.day_of_week = Weekday::parse(&day)?.as_str().to_string();
            }
            if let Some(start) = start {
                entry.start_time = start;
            }
            if let Some(end) = end {
                entry.end_time = end;
            }
            if let Some(entry_type) = entry_type {
                entry.entry_type = entry_type;
            }
            if let Some(desc) = desc {
                entry.description = desc;
            }
            check_schedule_times(&entry.start_time, &entry.end_time)?;
            ops::update_schedule_entry(conn, &entry)?;
            eprintln!("Updated schedule entry {id}");
        }

        ScheduleCommand::Rm { id } => {
            ops::delete_schedule_entry(conn, id)?;
            eprintln!("Removed schedule entry {id}");
        }
    }
    Ok(())
}
