//! Subcommands and their handlers.
//!
//! One-shot mutations go through the same dialog workflows the shell uses,
//! so `create --email bob@example` is rejected locally with the same message
//! the Add Employee dialog shows.

use std::io::{BufRead, Write};

use anyhow::{anyhow, Context, Result};
use clap::{Args, Subcommand};
use ems_core::workflow::DialogSlot;
use ems_core::{
    Dialog, Employee, EmployeeApi, EmployeeFilter, EmployeeId, FormField, MutationOutcome, Pagination, Route, Sort,
    SortDirection, Transport,
};

use crate::config::Settings;
use crate::render;
use crate::shell::Shell;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive list and detail screens (the default).
    Shell(ShellArgs),
    /// Print one page of employees.
    List(ListArgs),
    /// Print one employee.
    Get(IdArgs),
    /// Add an employee.
    Create(FormArgs),
    /// Change an employee. Omitted fields keep their current value.
    Update(UpdateArgs),
    /// Remove an employee.
    Delete(IdArgs),
}

#[derive(Args, Debug)]
pub struct ShellArgs {
    /// Screen to open first: `/` or `/employee/{id}`.
    #[arg(long, default_value = "/")]
    pub route: String,
}

impl Default for ShellArgs {
    fn default() -> Self {
        Self { route: "/".to_string() }
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Page number, starting at 1.
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Match against first name, last name and email.
    #[arg(long)]
    pub search: Option<String>,

    /// Exact department name.
    #[arg(long)]
    pub department: Option<String>,

    /// Ordering as `field,asc` or `field,desc`.
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<Sort>,
}

#[derive(Args, Debug)]
pub struct IdArgs {
    pub id: EmployeeId,
}

#[derive(Args, Debug, Default)]
pub struct FormArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub department: Option<String>,
}

impl FormArgs {
    fn changes(&self) -> impl Iterator<Item = (FormField, &str)> {
        [
            (FormField::FirstName, &self.first_name),
            (FormField::LastName, &self.last_name),
            (FormField::Email, &self.email),
            (FormField::Department, &self.department),
        ]
        .into_iter()
        .filter_map(|(field, value)| Some((field, value.as_deref()?)))
    }
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: EmployeeId,

    #[command(flatten)]
    pub form: FormArgs,
}

fn parse_sort(raw: &str) -> Result<Sort, String> {
    let (field, direction) = match raw.split_once(',') {
        Some((field, direction)) => (field, direction),
        None => (raw, "asc"),
    };
    let direction = match direction.trim().to_ascii_lowercase().as_str() {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => return Err(format!("unknown sort direction `{other}`")),
    };
    let field = field.trim();
    if field.is_empty() {
        return Err("sort field is empty".to_string());
    }
    Ok(Sort {
        field: field.to_string(),
        direction,
    })
}

/// Run one subcommand. `input` is only read by the shell.
pub fn run<T, R, W>(command: Command, settings: &Settings, api: &EmployeeApi<T>, input: R, mut out: W) -> Result<()>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    match command {
        Command::Shell(args) => {
            let route = Route::parse(&args.route).ok_or_else(|| anyhow!("unknown route `{}`", args.route))?;
            Shell::new(api, input, out, settings).run(route)
        }
        Command::List(args) => list(args, settings, api, &mut out),
        Command::Get(args) => {
            let employee = api
                .get_employee(args.id)
                .with_context(|| format!("failed to fetch employee {}", args.id))?;
            print(settings, &mut out, &employee, render::card)
        }
        Command::Create(form) => {
            let mut slot = DialogSlot::default();
            slot.open_create();
            fill(&mut slot, &form);
            match submit(api, &mut slot)? {
                MutationOutcome::Created(employee) => print(settings, &mut out, &employee, render::card),
                other => Err(anyhow!("unexpected outcome {other:?}")),
            }
        }
        Command::Update(args) => {
            let current = api
                .get_employee(args.id)
                .with_context(|| format!("failed to fetch employee {}", args.id))?;
            let mut slot = DialogSlot::default();
            slot.open_edit(&current);
            fill(&mut slot, &args.form);
            match submit(api, &mut slot)? {
                MutationOutcome::Updated(employee) => print(settings, &mut out, &employee, render::card),
                other => Err(anyhow!("unexpected outcome {other:?}")),
            }
        }
        Command::Delete(args) => {
            let current = api
                .get_employee(args.id)
                .with_context(|| format!("failed to fetch employee {}", args.id))?;
            let mut slot = DialogSlot::default();
            slot.open_delete(&current);
            submit(api, &mut slot)?;
            if settings.json {
                writeln!(out, "{}", serde_json::json!({ "deleted": current.id }))?;
            } else {
                writeln!(out, "Deleted {} (#{})", current.full_name(), current.id)?;
            }
            Ok(())
        }
    }
}

fn list<T: Transport, W: Write>(args: ListArgs, settings: &Settings, api: &EmployeeApi<T>, out: &mut W) -> Result<()> {
    let filter = EmployeeFilter {
        page: Some(args.page - 1),
        size: Some(settings.page_size),
        search: args.search.filter(|s| !s.is_empty()),
        department: args.department.filter(|s| !s.is_empty()),
        sort: args.sort,
    };
    let page = api.list_employees(&filter).context("failed to load employees")?;
    if settings.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&page)?)?;
        return Ok(());
    }
    write!(out, "{}", render::table(&page.content))?;
    writeln!(
        out,
        "{}",
        render::pagination_bar(Pagination::new(page.number, page.total_pages))
    )?;
    Ok(())
}

fn fill(slot: &mut DialogSlot, form: &FormArgs) {
    if let Some(dialog) = slot.current_mut() {
        for (field, value) in form.changes() {
            dialog.set_field(field, value);
        }
    }
}

/// Submit the open dialog and wait for its reply. Rejections come back as
/// the message the dialog would display.
fn submit<T: Transport>(api: &EmployeeApi<T>, slot: &mut DialogSlot) -> Result<MutationOutcome> {
    let client = api.client();
    let mutation = slot.submit(client).ok_or_else(|| dialog_error(slot))?;
    let reply = api.transport().execute(mutation.request);
    slot.settle(client, &mutation.ticket, reply)
        .ok_or_else(|| dialog_error(slot))
}

fn dialog_error(slot: &DialogSlot) -> anyhow::Error {
    let message = slot.current().and_then(Dialog::error).unwrap_or("request was not sent");
    anyhow!("{message}")
}

fn print<W, F>(settings: &Settings, out: &mut W, employee: &Employee, text: F) -> Result<()>
where
    W: Write,
    F: Fn(&Employee) -> String,
{
    if settings.json {
        let json = serde_json::to_string_pretty(employee).context("failed to encode employee")?;
        writeln!(out, "{json}")?;
    } else {
        write!(out, "{}", text(employee))?;
    }
    Ok(())
}
