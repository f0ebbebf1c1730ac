//! Interactive shell over the list and detail screens.
//!
//! # Design
//! The shell is the host for the `ems-core` state machines: it executes every
//! request they hand out on the calling thread and feeds the reply straight
//! back. While a dialog is open every input line goes to the dialog.
//! Navigating to a screen mounts a fresh view, so returning to the list
//! starts over at page 1 with no filters.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use ems_core::{
    DetailAction, DetailView, Dialog, EmployeeApi, EmployeeFilter, FormField, ListView, Mutation, Route, RowTarget,
    Transport,
};
use tracing::debug;

use crate::config::Settings;
use crate::render;

const LIST_HELP: &str = "\
commands:
  n, next             next page
  p, prev             previous page
  page <n>            jump to page n
  search [text]       filter by name or email (empty clears)
  dept [name]         filter by department (empty clears)
  open <row>          show an employee
  edit <row>          edit an employee
  delete <row>        delete an employee
  add                 add an employee
  r, refresh          reload this page
  q, quit             exit";

const DETAIL_HELP: &str = "\
commands:
  edit                edit this employee
  delete              delete this employee
  b, back             back to the list
  r, refresh          reload this employee
  q, quit             exit";

const DIALOG_HELP: &str = "\
commands:
  set <field> <value> change a field (first, last, email, dept)
  fill                step through every field
  s, submit           save
  c, cancel           close without saving
  y, yes / n, no      confirm or cancel a delete";

/// Input on the list screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListCommand {
    Next,
    Previous,
    Jump(String),
    Search(String),
    Department(String),
    Row(usize, RowTarget),
    Add,
    Refresh,
    Help,
    Quit,
}

impl ListCommand {
    /// Rows are given 1-based, as rendered.
    pub fn parse(line: &str) -> Option<Self> {
        let (word, rest) = split(line);
        let command = match word {
            "n" | "next" => Self::Next,
            "p" | "prev" | "previous" => Self::Previous,
            "page" | "g" => Self::Jump(rest.to_string()),
            "search" | "s" | "/" => Self::Search(rest.to_string()),
            "dept" | "department" | "d" => Self::Department(rest.to_string()),
            "open" | "o" => Self::Row(row(rest)?, RowTarget::Row),
            "edit" | "e" => Self::Row(row(rest)?, RowTarget::Edit),
            "delete" | "del" | "rm" => Self::Row(row(rest)?, RowTarget::Delete),
            "add" | "new" | "a" => Self::Add,
            "r" | "refresh" => Self::Refresh,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Input on the detail screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailCommand {
    Edit,
    Delete,
    Back,
    Refresh,
    Help,
    Quit,
}

impl DetailCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let command = match split(line).0 {
            "edit" | "e" => Self::Edit,
            "delete" | "del" | "rm" => Self::Delete,
            "b" | "back" => Self::Back,
            "r" | "refresh" => Self::Refresh,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            _ => return None,
        };
        Some(command)
    }
}

/// Input while a dialog is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogCommand {
    Set(FormField, String),
    Fill,
    Submit,
    Cancel,
    Help,
}

impl DialogCommand {
    pub fn parse(line: &str) -> Option<Self> {
        let (word, rest) = split(line);
        let command = match word {
            "set" => {
                let (name, value) = split(rest);
                Self::Set(field(name)?, value.to_string())
            }
            "fill" | "f" => Self::Fill,
            "s" | "submit" | "save" | "y" | "yes" | "confirm" => Self::Submit,
            "c" | "cancel" | "n" | "no" => Self::Cancel,
            "h" | "help" | "?" => Self::Help,
            _ => return None,
        };
        Some(command)
    }
}

fn split(line: &str) -> (&str, &str) {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    }
}

fn row(raw: &str) -> Option<usize> {
    raw.parse::<usize>().ok()?.checked_sub(1)
}

fn field(name: &str) -> Option<FormField> {
    match name.to_ascii_lowercase().as_str() {
        "first" | "firstname" | "first_name" => Some(FormField::FirstName),
        "last" | "lastname" | "last_name" => Some(FormField::LastName),
        "email" => Some(FormField::Email),
        "dept" | "department" => Some(FormField::Department),
        _ => None,
    }
}

enum Screen {
    List(ListView),
    Detail(DetailView),
}

enum Flow {
    Stay,
    Navigate(Route),
    Quit,
}

pub struct Shell<'a, T, R, W> {
    api: &'a EmployeeApi<T>,
    input: R,
    out: W,
    page_size: u32,
    surface_list_errors: bool,
}

impl<'a, T, R, W> Shell<'a, T, R, W>
where
    T: Transport,
    R: BufRead,
    W: Write,
{
    pub fn new(api: &'a EmployeeApi<T>, input: R, out: W, settings: &Settings) -> Self {
        Self {
            api,
            input,
            out,
            page_size: settings.page_size,
            surface_list_errors: settings.surface_list_errors,
        }
    }

    /// Run until `quit` or end of input.
    pub fn run(mut self, start: Route) -> Result<()> {
        let mut screen = self.mount(start);
        loop {
            self.draw(&screen)?;
            let prompt = match &screen {
                Screen::List(view) if view.dialog().is_some() => "dialog> ",
                Screen::Detail(view) if view.dialog().is_some() => "dialog> ",
                Screen::List(_) => "list> ",
                Screen::Detail(_) => "employee> ",
            };
            let Some(line) = self.read_line(prompt)? else {
                break;
            };
            if line.trim().is_empty() {
                continue;
            }
            let flow = match &mut screen {
                Screen::List(view) => self.on_list(view, &line)?,
                Screen::Detail(view) => self.on_detail(view, &line)?,
            };
            match flow {
                Flow::Stay => {}
                Flow::Navigate(route) => screen = self.mount(route),
                Flow::Quit => break,
            }
        }
        self.out.flush().context("failed to flush output")
    }

    fn mount(&mut self, route: Route) -> Screen {
        debug!(%route, "mounting screen");
        match route {
            Route::List => {
                let mut view = ListView::new(self.page_size);
                let filter = view.filter();
                self.load_list(&mut view, filter);
                Screen::List(view)
            }
            Route::Detail(id) => {
                let mut view = DetailView::new(id);
                let client = self.api.client();
                let reply = self.api.transport().execute(view.request(client));
                view.receive(client, id, reply);
                Screen::Detail(view)
            }
        }
    }

    fn draw(&mut self, screen: &Screen) -> Result<()> {
        let (body, dialog) = match screen {
            Screen::List(view) => (render::list(view, self.surface_list_errors), view.dialog()),
            Screen::Detail(view) => (render::detail(view), view.dialog()),
        };
        writeln!(self.out)?;
        write!(self.out, "{body}")?;
        if let Some(dialog) = dialog {
            writeln!(self.out)?;
            write!(self.out, "{}", render::dialog(dialog))?;
        }
        Ok(())
    }

    fn load_list(&self, view: &mut ListView, filter: EmployeeFilter) {
        let client = self.api.client();
        let reply = self.api.transport().execute(client.build_list_employees(&filter));
        view.receive(client, reply);
    }

    fn on_list(&mut self, view: &mut ListView, line: &str) -> Result<Flow> {
        if view.dialog().is_some() {
            return self.on_list_dialog(view, line);
        }
        let Some(command) = ListCommand::parse(line) else {
            return self.unknown(line);
        };
        let refetch = match command {
            ListCommand::Next => view.next(),
            ListCommand::Previous => view.previous(),
            ListCommand::Jump(input) => view.jump(&input),
            ListCommand::Search(term) => view.set_search(&term),
            ListCommand::Department(term) => view.set_department(&term),
            ListCommand::Refresh => Some(view.refresh()),
            ListCommand::Row(index, target) => {
                if index >= view.employees().len() {
                    writeln!(self.out, "no row {}", index + 1)?;
                    return Ok(Flow::Stay);
                }
                if let Some(route) = view.click(index, target) {
                    return Ok(Flow::Navigate(route));
                }
                if target == RowTarget::Edit {
                    if let Some(dialog) = view.dialog_mut() {
                        self.fill(dialog)?;
                    }
                }
                None
            }
            ListCommand::Add => {
                view.open_create();
                if let Some(dialog) = view.dialog_mut() {
                    self.fill(dialog)?;
                }
                None
            }
            ListCommand::Help => {
                writeln!(self.out, "{LIST_HELP}")?;
                None
            }
            ListCommand::Quit => return Ok(Flow::Quit),
        };
        if let Some(filter) = refetch {
            self.load_list(view, filter);
        }
        Ok(Flow::Stay)
    }

    fn on_list_dialog(&mut self, view: &mut ListView, line: &str) -> Result<Flow> {
        let api = self.api;
        let client = api.client();
        match self.dialog_step(view.dialog_mut(), line)? {
            DialogStep::Submit => {
                if let Some(mutation) = view.submit_dialog(client) {
                    let Mutation { ticket, request } = mutation;
                    let reply = self.api.transport().execute(request);
                    if let Some(filter) = view.settle_dialog(client, &ticket, reply) {
                        self.load_list(view, filter);
                    }
                }
            }
            DialogStep::Cancel => {
                if !view.close_dialog() {
                    writeln!(self.out, "busy; try again when the request finishes")?;
                }
            }
            DialogStep::Handled => {}
        }
        Ok(Flow::Stay)
    }

    fn on_detail(&mut self, view: &mut DetailView, line: &str) -> Result<Flow> {
        if view.dialog().is_some() {
            return self.on_detail_dialog(view, line);
        }
        let Some(command) = DetailCommand::parse(line) else {
            return self.unknown(line);
        };
        match command {
            DetailCommand::Edit => {
                if view.open_edit() {
                    if let Some(dialog) = view.dialog_mut() {
                        self.fill(dialog)?;
                    }
                }
            }
            DetailCommand::Delete => {
                view.open_delete();
            }
            DetailCommand::Back => return Ok(Flow::Navigate(view.back())),
            DetailCommand::Refresh => {
                let client = self.api.client();
                let id = view.id();
                let reply = self.api.transport().execute(view.request(client));
                view.receive(client, id, reply);
            }
            DetailCommand::Help => writeln!(self.out, "{DETAIL_HELP}")?,
            DetailCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Stay)
    }

    fn on_detail_dialog(&mut self, view: &mut DetailView, line: &str) -> Result<Flow> {
        let api = self.api;
        let client = api.client();
        match self.dialog_step(view.dialog_mut(), line)? {
            DialogStep::Submit => {
                let Some(Mutation { ticket, request }) = view.submit_dialog(client) else {
                    return Ok(Flow::Stay);
                };
                let reply = self.api.transport().execute(request);
                match view.settle_dialog(client, &ticket, reply) {
                    Some(DetailAction::Reload(request)) => {
                        let id = view.id();
                        let reply = self.api.transport().execute(request);
                        view.receive(client, id, reply);
                    }
                    Some(DetailAction::Navigate(route)) => return Ok(Flow::Navigate(route)),
                    None => {}
                }
            }
            DialogStep::Cancel => {
                if !view.close_dialog() {
                    writeln!(self.out, "busy; try again when the request finishes")?;
                }
            }
            DialogStep::Handled => {}
        }
        Ok(Flow::Stay)
    }

    /// Apply one dialog input line. Submit and cancel are left to the caller,
    /// which owns the view that hosts the dialog.
    fn dialog_step(&mut self, dialog: Option<&mut Dialog>, line: &str) -> Result<DialogStep> {
        let Some(dialog) = dialog else {
            return Ok(DialogStep::Handled);
        };
        let Some(command) = DialogCommand::parse(line) else {
            writeln!(self.out, "unknown input `{}`; type `help`", line.trim())?;
            return Ok(DialogStep::Handled);
        };
        match command {
            DialogCommand::Submit => return Ok(DialogStep::Submit),
            DialogCommand::Cancel => return Ok(DialogStep::Cancel),
            DialogCommand::Set(field, value) => {
                if !dialog.set_field(field, value) {
                    writeln!(self.out, "this dialog has no fields")?;
                }
            }
            DialogCommand::Fill => self.fill(dialog)?,
            DialogCommand::Help => writeln!(self.out, "{DIALOG_HELP}")?,
        }
        Ok(DialogStep::Handled)
    }

    /// Prompt for every form field. An empty answer keeps the current value
    /// and `-` clears it. Stops early at end of input.
    fn fill(&mut self, dialog: &mut Dialog) -> Result<()> {
        for field in FormField::ALL {
            let Some(current) = dialog.form().map(|form| form.get(field).to_string()) else {
                return Ok(());
            };
            let prompt = format!("{} [{current}]: ", field.label());
            let Some(answer) = self.read_line(&prompt)? else {
                return Ok(());
            };
            match answer.trim() {
                "" => {}
                "-" => {
                    dialog.set_field(field, "");
                }
                value => {
                    dialog.set_field(field, value);
                }
            }
        }
        Ok(())
    }

    fn unknown(&mut self, line: &str) -> Result<Flow> {
        writeln!(self.out, "unknown command `{}`; type `help`", line.trim())?;
        Ok(Flow::Stay)
    }

    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt}")?;
        self.out.flush()?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(&['\r', '\n'][..]).to_string()))
    }
}

enum DialogStep {
    Submit,
    Cancel,
    Handled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_commands() {
        assert_eq!(ListCommand::parse("n"), Some(ListCommand::Next));
        assert_eq!(ListCommand::parse(" prev "), Some(ListCommand::Previous));
        assert_eq!(ListCommand::parse("page 3"), Some(ListCommand::Jump("3".to_string())));
        assert_eq!(ListCommand::parse("search ann lee"), Some(ListCommand::Search("ann lee".to_string())));
        assert_eq!(ListCommand::parse("search"), Some(ListCommand::Search(String::new())));
        assert_eq!(ListCommand::parse("dept HR"), Some(ListCommand::Department("HR".to_string())));
        assert_eq!(ListCommand::parse("open 2"), Some(ListCommand::Row(1, RowTarget::Row)));
        assert_eq!(ListCommand::parse("delete 1"), Some(ListCommand::Row(0, RowTarget::Delete)));
        assert_eq!(ListCommand::parse("q"), Some(ListCommand::Quit));
    }

    #[test]
    fn row_numbers_start_at_one() {
        assert_eq!(ListCommand::parse("open 0"), None);
        assert_eq!(ListCommand::parse("edit x"), None);
        assert_eq!(ListCommand::parse("open"), None);
    }

    #[test]
    fn page_jump_keeps_raw_input() {
        // The view decides whether the entry is a valid page.
        assert_eq!(ListCommand::parse("page abc"), Some(ListCommand::Jump("abc".to_string())));
    }

    #[test]
    fn detail_commands() {
        assert_eq!(DetailCommand::parse("back"), Some(DetailCommand::Back));
        assert_eq!(DetailCommand::parse("delete"), Some(DetailCommand::Delete));
        assert_eq!(DetailCommand::parse("next"), None);
    }

    #[test]
    fn dialog_commands() {
        assert_eq!(
            DialogCommand::parse("set email ann@corp.io"),
            Some(DialogCommand::Set(FormField::Email, "ann@corp.io".to_string()))
        );
        assert_eq!(
            DialogCommand::parse("set dept"),
            Some(DialogCommand::Set(FormField::Department, String::new()))
        );
        assert_eq!(DialogCommand::parse("set salary 10"), None);
        assert_eq!(DialogCommand::parse("yes"), Some(DialogCommand::Submit));
        assert_eq!(DialogCommand::parse("cancel"), Some(DialogCommand::Cancel));
    }
}
