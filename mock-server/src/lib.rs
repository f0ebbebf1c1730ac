//! In-memory stand-in for the employee REST backend.
//!
//! Mirrors the production contract: paginated and filtered listing, full
//! replacement on update, unique emails, and a JSON error body with a
//! human-readable `message` on every failure.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub department: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub department: Option<String>,
}

/// Spring-style page envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBody {
    pub content: Vec<Employee>,
    pub total_pages: u64,
    pub total_elements: u64,
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub timestamp: NaiveDateTime,
    pub status: u16,
    pub error: String,
    pub message: String,
    pub validation_errors: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default)]
pub struct Store {
    next_id: i64,
    employees: BTreeMap<i64, Employee>,
}

impl Store {
    fn email_taken(&self, email: &str, except: Option<i64>) -> bool {
        self.employees
            .values()
            .any(|e| e.email == email && Some(e.id) != except)
    }
}

pub type Db = Arc<RwLock<Store>>;

#[derive(Debug)]
pub struct Failure {
    status: StatusCode,
    message: String,
    validation_errors: Option<BTreeMap<String, String>>,
}

impl Failure {
    fn not_found(id: i64) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: format!("Employee not found with id: {id}"),
            validation_errors: None,
        }
    }

    fn conflict(email: &str) -> Self {
        Self {
            status: StatusCode::CONFLICT,
            message: format!("Email already exists: {email}"),
            validation_errors: None,
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            validation_errors: None,
        }
    }

    fn invalid(errors: BTreeMap<String, String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "Invalid input data".to_string(),
            validation_errors: Some(errors),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let error = match self.status {
            StatusCode::BAD_REQUEST if self.validation_errors.is_some() => "Validation Failed".to_string(),
            other => other.canonical_reason().unwrap_or("Error").to_string(),
        };
        let body = ErrorResponse {
            timestamp: Local::now().naive_local(),
            status: self.status.as_u16(),
            error,
            message: self.message,
            validation_errors: self.validation_errors,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for Failure {
    fn from(rejection: JsonRejection) -> Self {
        Failure::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for Failure {
    fn from(rejection: PathRejection) -> Self {
        Failure::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for Failure {
    fn from(rejection: QueryRejection) -> Self {
        Failure::bad_request(rejection.body_text())
    }
}

pub fn app() -> Router {
    router(Db::default())
}

pub fn router(db: Db) -> Router {
    Router::new()
        .route("/api/employees", get(list_employees).post(create_employee))
        .route(
            "/api/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "employee backend listening");
    }
    axum::serve(listener, app()).await
}

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub search: Option<String>,
    pub department: Option<String>,
    pub sort: Option<String>,
}

fn matches_filter(employee: &Employee, search: Option<&str>, department: Option<&str>) -> bool {
    let search_ok = match search {
        Some(term) => {
            let term = term.to_lowercase();
            [&employee.first_name, &employee.last_name, &employee.email]
                .iter()
                .any(|field| field.to_lowercase().contains(&term))
        }
        None => true,
    };
    let department_ok = department.map_or(true, |d| employee.department == d);
    search_ok && department_ok
}

fn sort_employees(employees: &mut [Employee], sort: &str) -> Result<(), Failure> {
    let (field, direction) = sort.split_once(',').unwrap_or((sort, "asc"));
    match field {
        "id" => employees.sort_by_key(|e| e.id),
        "firstName" => employees.sort_by(|a, b| a.first_name.cmp(&b.first_name)),
        "lastName" => employees.sort_by(|a, b| a.last_name.cmp(&b.last_name)),
        "email" => employees.sort_by(|a, b| a.email.cmp(&b.email)),
        "department" => employees.sort_by(|a, b| a.department.cmp(&b.department)),
        other => return Err(Failure::bad_request(format!("No property '{other}' found for type 'Employee'"))),
    }
    if direction.eq_ignore_ascii_case("desc") {
        employees.reverse();
    }
    Ok(())
}

async fn list_employees(
    State(db): State<Db>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<PageBody>, Failure> {
    let Query(params) = params?;
    let page = params.page.unwrap_or(0);
    let size = params.size.unwrap_or(5);
    if size == 0 {
        return Err(Failure::bad_request("Page size must not be less than one"));
    }
    let search = params.search.as_deref().filter(|s| !s.is_empty());
    let department = params.department.as_deref().filter(|s| !s.is_empty());

    let store = db.read().await;
    let mut hits: Vec<Employee> = store
        .employees
        .values()
        .filter(|e| matches_filter(e, search, department))
        .cloned()
        .collect();
    drop(store);
    sort_employees(&mut hits, params.sort.as_deref().unwrap_or("id,asc"))?;

    let total_elements = hits.len() as u64;
    let total_pages = total_elements.div_ceil(u64::from(size));
    let content: Vec<Employee> = hits
        .into_iter()
        .skip(page as usize * size as usize)
        .take(size as usize)
        .collect();

    Ok(Json(PageBody {
        number_of_elements: content.len(),
        empty: content.is_empty(),
        first: page == 0,
        last: u64::from(page) + 1 >= total_pages,
        content,
        total_pages,
        total_elements,
        number: page,
        size,
    }))
}

/// Field checks applied on create and update.
fn validate(input: EmployeeInput) -> Result<(String, String, String, String), Failure> {
    let mut errors = BTreeMap::new();
    let first_name = input.first_name.unwrap_or_default();
    let last_name = input.last_name.unwrap_or_default();
    let email = input.email.unwrap_or_default();
    if first_name.trim().is_empty() {
        errors.insert("firstName".to_string(), "must not be blank".to_string());
    }
    if last_name.trim().is_empty() {
        errors.insert("lastName".to_string(), "must not be blank".to_string());
    }
    if email.trim().is_empty() {
        errors.insert("email".to_string(), "must not be blank".to_string());
    } else if !looks_like_email(&email) {
        errors.insert("email".to_string(), "must be a well-formed email address".to_string());
    }
    if !errors.is_empty() {
        return Err(Failure::invalid(errors));
    }
    Ok((first_name, last_name, email, input.department.unwrap_or_default()))
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}

async fn create_employee(
    State(db): State<Db>,
    input: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Employee>), Failure> {
    let Json(input) = input?;
    let (first_name, last_name, email, department) = validate(input)?;
    let mut store = db.write().await;
    if store.email_taken(&email, None) {
        return Err(Failure::conflict(&email));
    }
    store.next_id += 1;
    let employee = Employee {
        id: store.next_id,
        first_name,
        last_name,
        email,
        department,
    };
    store.employees.insert(employee.id, employee.clone());
    Ok((StatusCode::CREATED, Json(employee)))
}

async fn get_employee(State(db): State<Db>, id: Result<Path<i64>, PathRejection>) -> Result<Json<Employee>, Failure> {
    let Path(id) = id?;
    let store = db.read().await;
    store
        .employees
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| Failure::not_found(id))
}

async fn update_employee(
    State(db): State<Db>,
    id: Result<Path<i64>, PathRejection>,
    input: Result<Json<EmployeeInput>, JsonRejection>,
) -> Result<Json<Employee>, Failure> {
    let Path(id) = id?;
    let Json(input) = input?;
    // A malformed body is rejected before the record is looked up.
    let (first_name, last_name, email, department) = validate(input)?;
    let mut store = db.write().await;
    if !store.employees.contains_key(&id) {
        return Err(Failure::not_found(id));
    }
    if store.email_taken(&email, Some(id)) {
        return Err(Failure::conflict(&email));
    }
    let employee = Employee {
        id,
        first_name,
        last_name,
        email,
        department,
    };
    store.employees.insert(id, employee.clone());
    Ok(Json(employee))
}

async fn delete_employee(State(db): State<Db>, id: Result<Path<i64>, PathRejection>) -> Result<StatusCode, Failure> {
    let Path(id) = id?;
    let mut store = db.write().await;
    store
        .employees
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| Failure::not_found(id))
}
