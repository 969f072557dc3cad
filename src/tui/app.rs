use std::path::Path;

use chrono::NaiveDate;

use crate::error::StoreError;
use crate::model::{ScheduleEntry, Task, TaskFields, Weekday};
use crate::ops::TasksByDate;
use crate::planner::Planner;
use crate::validate::{validate_clock_time, validate_name};
use crate::week::{date_key, day_label, Week};

pub const NAME: usize = 0;
pub const DESCRIPTION: usize = 1;
pub const TIME: usize = 2;
pub const LOCATION: usize = 3;
pub const ATTACHMENT: usize = 4;

pub const START: usize = 0;
pub const END: usize = 1;
pub const TYPE: usize = 2;
pub const NOTE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
    ConfirmDelete { id: i64, name: String },
}

#[derive(Debug, Clone)]
pub enum FormPurpose {
    AddTask(NaiveDate),
    EditTask(Task),
    AddSchedule(Weekday),
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, value: &str) -> Self {
        Self {
            label,
            value: value.to_string(),
        }
    }
}

pub struct Form {
    pub purpose: FormPurpose,
    pub fields: Vec<FormField>,
    pub focused: usize,
    pub error: Option<String>,
}

impl Form {
    fn task_fields(fields: &TaskFields) -> Vec<FormField> {
        vec![
            FormField::new("Name:", &fields.name),
            FormField::new("Description:", &fields.description),
            FormField::new("Time:", &fields.time),
            FormField::new("Location:", &fields.location),
            FormField::new("Attachment (file path):", &fields.file_path),
        ]
    }

    pub fn add_task(date: NaiveDate) -> Self {
        Self {
            purpose: FormPurpose::AddTask(date),
            fields: Self::task_fields(&TaskFields::default()),
            focused: NAME,
            error: None,
        }
    }

    pub fn edit_task(task: Task) -> Self {
        let fields = Self::task_fields(&task.fields());
        Self {
            purpose: FormPurpose::EditTask(task),
            fields,
            focused: NAME,
            error: None,
        }
    }

    pub fn add_schedule(day: Weekday) -> Self {
        Self {
            purpose: FormPurpose::AddSchedule(day),
            fields: vec![
                FormField::new("Start (HH:MM):", ""),
                FormField::new("End (HH:MM):", ""),
                FormField::new("Type:", ""),
                FormField::new("Description:", ""),
            ],
            focused: START,
            error: None,
        }
    }

    pub fn title(&self) -> String {
        match &self.purpose {
            FormPurpose::AddTask(date) => format!(" Add Task: {} ", day_label(*date)),
            FormPurpose::EditTask(task) => format!(" Edit Task {} ", task.id),
            FormPurpose::AddSchedule(day) => format!(" Add Schedule Block: {day} "),
        }
    }

    pub fn value(&self, idx: usize) -> &str {
        self.fields[idx].value.trim()
    }

    pub fn focused_buf_mut(&mut self) -> &mut String {
        &mut self.fields[self.focused].value
    }

    /// Whether Ctrl-E should open an external editor for the focused field.
    pub fn focused_is_description(&self) -> bool {
        match self.purpose {
            FormPurpose::AddSchedule(_) => self.focused == NOTE,
            _ => self.focused == DESCRIPTION,
        }
    }

    pub fn next_field(&mut self) {
        self.focused = (self.focused + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focused = (self.focused + self.fields.len() - 1) % self.fields.len();
    }

    pub fn validate(&mut self) -> bool {
        let result = match self.purpose {
            FormPurpose::AddSchedule(_) => validate_clock_time(self.value(START))
                .and_then(|_| validate_clock_time(self.value(END)))
                .and_then(|_| {
                    if self.value(TYPE).is_empty() {
                        Err(StoreError::Invalid("type must not be empty".into()))
                    } else {
                        Ok(())
                    }
                }),
            _ => validate_name(self.value(NAME)),
        };
        match result {
            Ok(()) => {
                self.error = None;
                true
            }
            Err(e) => {
                self.error = Some(e.to_string());
                false
            }
        }
    }

    fn task_fields_from_input(&self, file_path: &str) -> TaskFields {
        TaskFields {
            name: self.value(NAME).to_string(),
            description: self.value(DESCRIPTION).to_string(),
            time: self.value(TIME).to_string(),
            location: self.value(LOCATION).to_string(),
            file_path: file_path.to_string(),
        }
    }
}

pub struct App {
    pub week: Week,
    pub today: NaiveDate,
    pub day: usize,
    pub cursor: usize,
    pub tasks: TasksByDate,
    pub schedule: Vec<Vec<ScheduleEntry>>,
    pub mode: Mode,
    pub form: Option<Form>,
    pub error: Option<String>,
    pub message: Option<String>,
}

impl App {
    pub fn new(planner: &Planner, today: NaiveDate) -> Self {
        let week = Week::containing(today);
        let day = week
            .days()
            .iter()
            .position(|d| *d == today)
            .unwrap_or(0);
        let mut app = App {
            week,
            today,
            day,
            cursor: 0,
            tasks: TasksByDate::new(),
            schedule: vec![Vec::new(); 7],
            mode: Mode::Normal,
            form: None,
            error: None,
            message: None,
        };
        app.refresh(planner);
        app
    }

    pub fn refresh(&mut self, planner: &Planner) {
        if !planner.is_available() {
            self.error = Some("database unavailable; changes will not be saved".into());
        }
        let (start, end) = self.week.range_strings();
        self.tasks = planner.get_tasks_for_week(&start, &end);
        self.schedule = Weekday::ALL
            .iter()
            .map(|d| planner.get_schedule_for_day(*d))
            .collect();
        self.clamp_cursor();
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.week.days()[self.day]
    }

    pub fn day_tasks(&self, day: usize) -> &[Task] {
        let key = date_key(self.week.days()[day]);
        self.tasks.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.day_tasks(self.day).get(self.cursor)
    }

    fn clamp_cursor(&mut self) {
        let len = self.day_tasks(self.day).len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.day_tasks(self.day).len() {
            self.cursor += 1;
        }
    }

    pub fn move_left(&mut self, planner: &Planner) {
        if self.day == 0 {
            self.day = 6;
            self.prev_week(planner);
        } else {
            self.day -= 1;
            self.clamp_cursor();
        }
    }

    pub fn move_right(&mut self, planner: &Planner) {
        if self.day == 6 {
            self.day = 0;
            self.next_week(planner);
        } else {
            self.day += 1;
            self.clamp_cursor();
        }
    }

    pub fn prev_week(&mut self, planner: &Planner) {
        self.week = self.week.prev();
        self.refresh(planner);
    }

    pub fn next_week(&mut self, planner: &Planner) {
        self.week = self.week.next();
        self.refresh(planner);
    }

    pub fn go_today(&mut self, planner: &Planner) {
        self.week = Week::containing(self.today);
        self.day = self
            .week
            .days()
            .iter()
            .position(|d| *d == self.today)
            .unwrap_or(0);
        self.refresh(planner);
    }

    pub fn enter_add_task(&mut self) {
        self.form = Some(Form::add_task(self.selected_date()));
    }

    pub fn enter_edit_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.form = Some(Form::edit_task(task.clone()));
        }
    }

    pub fn enter_add_schedule(&mut self) {
        self.form = Some(Form::add_schedule(Weekday::ALL[self.day]));
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    pub fn request_delete(&mut self) {
        if let Some(task) = self.selected_task() {
            self.mode = Mode::ConfirmDelete {
                id: task.id,
                name: task.name.clone(),
            };
        }
    }

    pub fn confirm_delete(&mut self, planner: &Planner) {
        if let Mode::ConfirmDelete { id, name } = std::mem::replace(&mut self.mode, Mode::Normal) {
            planner.delete_task(id);
            self.message = Some(format!("Deleted '{name}'"));
            self.refresh(planner);
        }
    }

    pub fn cancel_delete(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn toggle_selected(&mut self, planner: &Planner) {
        if let Some(task) = self.selected_task() {
            planner.update_task_status(task.id, !task.is_completed);
            self.refresh(planner);
        }
    }

    /// Validate and apply the open form. The form stays open with an error
    /// message when input is rejected or the store refuses the change.
    pub fn submit_form(&mut self, planner: &Planner) {
        let Some(form) = self.form.as_mut() else {
            return;
        };
        if !form.validate() {
            return;
        }
        let outcome = match &form.purpose {
            FormPurpose::AddTask(date) => submit_add_task(planner, form, *date),
            FormPurpose::EditTask(task) => submit_edit_task(planner, form, task),
            FormPurpose::AddSchedule(day) => submit_add_schedule(planner, form, *day),
        };
        match outcome {
            Ok(message) => {
                self.form = None;
                self.message = Some(message);
                self.refresh(planner);
            }
            Err(e) => form.error = Some(e),
        }
    }
}

fn check_source(path: &str) -> Result<(), String> {
    if Path::new(path).is_file() {
        Ok(())
    } else {
        Err(format!("file '{path}' not found"))
    }
}

fn submit_add_task(planner: &Planner, form: &Form, date: NaiveDate) -> Result<String, String> {
    let fields = form.task_fields_from_input("");
    let source = form.value(ATTACHMENT);
    let key = date_key(date);
    let id = if source.is_empty() {
        planner.add_task(&key, &fields)
    } else {
        check_source(source)?;
        planner.add_task_with_attachment(&key, &fields, Path::new(source))
    };
    match id {
        Some(_) => Ok(format!("Added '{}'", fields.name)),
        None => Err("failed to add task to database".into()),
    }
}

fn submit_edit_task(planner: &Planner, form: &Form, task: &Task) -> Result<String, String> {
    let source = form.value(ATTACHMENT);
    let attachment_changed = source != task.file_path;
    if attachment_changed && !source.is_empty() {
        check_source(source)?;
    }
    planner.update_task(task.id, &form.task_fields_from_input(&task.file_path));
    if attachment_changed {
        if source.is_empty() {
            planner.clear_attachment(task.id);
        } else if planner.replace_attachment(task.id, Path::new(source)).is_none() {
            return Err(format!("could not attach '{source}'"));
        }
    }
    Ok(format!("Updated '{}'", form.value(NAME)))
}

fn submit_add_schedule(planner: &Planner, form: &Form, day: Weekday) -> Result<String, String> {
    let (start, end) = (form.value(START), form.value(END));
    if end < start {
        tracing::warn!(start, end, "schedule block ends before it starts");
    }
    planner
        .add_schedule_entry(day, start, end, form.value(TYPE), form.value(NOTE))
        .map(|_| format!("Added {} block on {day}", form.value(TYPE)))
        .ok_or_else(|| "failed to add schedule entry".to_string())
}
