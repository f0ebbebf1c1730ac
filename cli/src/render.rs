//! Plain-text rendering of the screens and dialogs.

use std::fmt::Write as _;

use ems_core::{DetailState, DetailView, Dialog, Employee, FormField, ListView, Pagination};

const RULE: &str = "----------------------------------------------------------------------";

/// Table, filters and pagination bar for the list screen. The load error is
/// only shown when `surface_errors` is set.
pub fn list(view: &ListView, surface_errors: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Employee Management");
    let _ = writeln!(
        out,
        "Search: {}   Department: {}",
        or_placeholder(view.search(), "(none)"),
        or_placeholder(view.department(), "All Departments"),
    );
    let _ = writeln!(out, "{RULE}");

    if let Some(message) = view.load_error().filter(|_| surface_errors) {
        let _ = writeln!(out, "! {message}");
    }

    out.push_str(&table(view.employees()));
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", pagination_bar(view.pagination()));
    out
}

/// Rows are numbered from 1; the shell's `open`, `edit` and `delete`
/// commands take the same numbers.
pub fn table(employees: &[Employee]) -> String {
    if employees.is_empty() {
        return "No employees found\n".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "{:>3}  {:<24} {:<14} {}", "#", "Name", "Department", "Email");
    for (index, employee) in employees.iter().enumerate() {
        let _ = writeln!(out, "{}", row(index, employee));
    }
    out
}

fn row(index: usize, employee: &Employee) -> String {
    format!(
        "{:>3}  {:<24} {:<14} {}",
        index + 1,
        employee.full_name(),
        employee.department,
        employee.email
    )
}

/// `« prev  [1]  2  next »` with disabled controls shown as dots. Page
/// numbers are 1-based.
pub fn pagination_bar(p: Pagination) -> String {
    let mut parts = vec![if p.can_previous() { "« prev" } else { "  ·   " }.to_string()];
    for page in p.window_pages() {
        if page == p.page {
            parts.push(format!("[{}]", page + 1));
        } else {
            parts.push(format!(" {} ", page + 1));
        }
    }
    parts.push(if p.can_next() { "next »" } else { "  ·   " }.to_string());

    let position = if p.total_pages == 0 {
        "no pages".to_string()
    } else {
        format!("page {} of {}", p.page + 1, p.total_pages)
    };
    format!("{}   ({position})", parts.join(" "))
}

pub fn detail(view: &DetailView) -> String {
    match view.state() {
        DetailState::Loading => "Loading...\n".to_string(),
        DetailState::Failed(message) => format!("{message}\n"),
        DetailState::Loaded(employee) => card(employee),
    }
}

/// Avatar initials, name and the remaining fields of one record.
pub fn card(employee: &Employee) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "({})  {}", employee.initials(), employee.full_name());
    let _ = writeln!(out, "      ID:          {}", employee.id);
    let _ = writeln!(out, "      Email:       {}", employee.email);
    let _ = writeln!(out, "      Department:  {}", or_placeholder(&employee.department, "-"));
    out
}

pub fn dialog(dialog: &Dialog) -> String {
    let mut out = String::new();
    let (title, subtitle) = match dialog {
        Dialog::Create(_) => ("Add Employee", "Create a new employee.".to_string()),
        Dialog::Edit(w) => ("Edit Employee", format!("Update employee #{}.", w.target())),
        Dialog::Delete(w) => ("Delete Employee", w.prompt()),
    };
    let _ = writeln!(out, "== {title} ==");
    let _ = writeln!(out, "{subtitle}");

    if let Some(form) = dialog.form() {
        for field in FormField::ALL {
            let _ = writeln!(out, "  {:<12} {}", format!("{}:", field.label()), form.get(field));
        }
    }
    if let Some(message) = dialog.error() {
        let _ = writeln!(out, "! {message}");
    }

    let controls = match (dialog, dialog.is_submitting()) {
        (Dialog::Delete(_), true) => "Deleting...",
        (Dialog::Delete(_), false) => "[yes] delete   [no] cancel",
        (_, true) => "Saving...",
        (Dialog::Create(_), false) => "[submit] create   [cancel]   [set <field> <value>]   [fill]",
        (Dialog::Edit(_), false) => "[submit] update   [cancel]   [set <field> <value>]   [fill]",
    };
    let _ = writeln!(out, "{controls}");
    out
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() {
        placeholder
    } else {
        value
    }
}
