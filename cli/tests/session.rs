//! Scripted shell sessions and one-shot commands against the live mock server.

use std::io::Cursor;

use ems_cli::commands::{self, Command, FormArgs, IdArgs, ListArgs, ShellArgs, UpdateArgs};
use ems_cli::config::Settings;
use ems_cli::transport::UreqTransport;
use ems_core::{EmployeeApi, EmployeeClient, EmployeeFilter, EmployeeForm, EmployeeId};

/// Start the mock server on a random port and return its base URL.
fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

struct Harness {
    settings: Settings,
    api: EmployeeApi<UreqTransport>,
}

impl Harness {
    fn new() -> Self {
        let settings = Settings {
            base_url: start_server(),
            ..Settings::default()
        };
        let api = settings.api();
        Self { settings, api }
    }

    fn seed(&self, first: &str, last: &str, email: &str, department: &str) -> EmployeeId {
        let form = EmployeeForm {
            first_name: first.to_string(),
            last_name: last.to_string(),
            email: email.to_string(),
            department: department.to_string(),
        };
        self.api.create_employee(&form).unwrap().id
    }

    fn shell(&self, route: &str, script: &str) -> String {
        let args = ShellArgs {
            route: route.to_string(),
        };
        self.run(Command::Shell(args), script).unwrap()
    }

    fn run(&self, command: Command, script: &str) -> anyhow::Result<String> {
        let mut out = Vec::new();
        commands::run(command, &self.settings, &self.api, Cursor::new(script.to_string()), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn count(&self) -> usize {
        self.api.list_employees(&EmployeeFilter::default()).unwrap().total_elements as usize
    }
}

#[test]
fn empty_list_then_quit() {
    let h = Harness::new();
    let out = h.shell("/", "q\n");
    assert!(out.contains("Employee Management"));
    assert!(out.contains("No employees found"));
}

#[test]
fn add_employee_through_the_dialog() {
    let h = Harness::new();
    // Guided fill, a rejected submit, a correction, then a successful submit.
    let script = "add\nAnn\nLee\nbob@example\nHR\nsubmit\nset email ann@corp.io\nsubmit\nq\n";
    let out = h.shell("/", script);

    assert!(out.contains("== Add Employee =="));
    assert!(out.contains("! Invalid email format"));
    assert!(out.contains("Ann Lee"));
    assert_eq!(h.count(), 1);
}

#[test]
fn backend_rejection_stays_in_the_dialog() {
    let h = Harness::new();
    h.seed("Ann", "Lee", "ann@corp.io", "HR");
    let out = h.shell("/", "add\nBob\nKim\nann@corp.io\n\nsubmit\ncancel\nq\n");

    assert!(out.contains("! Email already exists: ann@corp.io"));
    assert_eq!(h.count(), 1);
}

#[test]
fn paging_and_filters() {
    let h = Harness::new();
    for i in 0..12 {
        let department = if i < 4 { "HR" } else { "IT" };
        h.seed(&format!("Emp{i}"), "Test", &format!("emp{i}@corp.io"), department);
    }
    let out = h.shell("/", "n\npage 3\npage 9\ndept HR\nsearch emp2\nq\n");

    assert!(out.contains("(page 1 of 3)"));
    assert!(out.contains("(page 2 of 3)"));
    assert!(out.contains("(page 3 of 3)"));
    assert!(out.contains("(page 1 of 1)"), "department filter resets to the first page");

    let last = out.rsplit("Employee Management").next().unwrap();
    assert!(last.contains("Search: emp2   Department: HR"));
    assert!(last.contains("Emp2 Test"));
    assert!(!last.contains("Emp3 Test"));
}

#[test]
fn detail_edit_then_delete_returns_to_list() {
    let h = Harness::new();
    let id = h.seed("Ann", "Lee", "ann@corp.io", "");
    let script = "edit\n\n\n\nFinance\nsubmit\ndelete\nno\ndelete\nyes\nq\n";
    let out = h.shell(&format!("/employee/{id}"), script);

    assert!(out.contains("(AL)  Ann Lee"));
    assert!(out.contains("Department:  Finance"));
    assert!(out.contains("Are you sure you want to delete Ann Lee?"));
    assert!(out.contains("No employees found"), "delete navigates back to the list");
    assert_eq!(h.count(), 0);
}

#[test]
fn open_row_and_go_back() {
    let h = Harness::new();
    h.seed("Ann", "Lee", "ann@corp.io", "HR");
    let out = h.shell("/", "open 1\nback\nq\n");
    assert!(out.contains("employee> "));
    assert!(out.contains("ann@corp.io"));
    assert!(out.matches("Employee Management").count() >= 2);
}

#[test]
fn missing_employee_shows_backend_message() {
    let h = Harness::new();
    let out = h.shell("/employee/77", "q\n");
    assert!(out.contains("Employee not found with id: 77"));
}

#[test]
fn unknown_route_is_an_error() {
    let h = Harness::new();
    let args = ShellArgs {
        route: "/nowhere".to_string(),
    };
    assert!(h.run(Command::Shell(args), "").is_err());
}

#[test]
fn one_shot_commands() {
    let h = Harness::new();

    let out = h
        .run(
            Command::Create(FormArgs {
                first_name: Some("Ann".to_string()),
                last_name: Some("Lee".to_string()),
                email: Some("ann@corp.io".to_string()),
                department: Some("HR".to_string()),
            }),
            "",
        )
        .unwrap();
    assert!(out.contains("(AL)  Ann Lee"));

    let out = h
        .run(
            Command::List(ListArgs {
                page: 1,
                search: Some("ann".to_string()),
                department: None,
                sort: None,
            }),
            "",
        )
        .unwrap();
    assert!(out.contains("ann@corp.io"));

    let out = h
        .run(
            Command::Update(UpdateArgs {
                id: EmployeeId(1),
                form: FormArgs {
                    department: Some("Finance".to_string()),
                    ..Default::default()
                },
            }),
            "",
        )
        .unwrap();
    assert!(out.contains("Department:  Finance"));
    assert!(out.contains("ann@corp.io"), "other fields are kept");

    let out = h.run(Command::Get(IdArgs { id: EmployeeId(1) }), "").unwrap();
    assert!(out.contains("Finance"));

    let out = h.run(Command::Delete(IdArgs { id: EmployeeId(1) }), "").unwrap();
    assert_eq!(out, "Deleted Ann Lee (#1)\n");

    let err = h.run(Command::Get(IdArgs { id: EmployeeId(1) }), "").unwrap_err();
    assert!(format!("{err:#}").contains("Employee not found with id: 1"));
}

#[test]
fn one_shot_create_validates_locally() {
    let h = Harness::new();
    let err = h
        .run(
            Command::Create(FormArgs {
                first_name: Some("Bob".to_string()),
                last_name: Some("Kim".to_string()),
                email: Some("bob@example".to_string()),
                department: None,
            }),
            "",
        )
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email format");
    assert_eq!(h.count(), 0);
}

#[test]
fn client_trims_trailing_slash() {
    let h = Harness::new();
    let api = EmployeeApi::new(
        EmployeeClient::new(&format!("{}/", h.settings.base_url)),
        UreqTransport::new(),
    );
    assert!(api.list_employees(&EmployeeFilter::default()).is_ok());
}
