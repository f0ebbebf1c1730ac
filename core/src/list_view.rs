//! State machine behind the employee list screen.
//!
//! # Design
//! `ListView` owns page index, page size, filters and the last fetched page.
//! Every state change that calls for a new fetch returns the
//! `EmployeeFilter` to fetch with; the host builds and executes the request
//! and hands the reply to [`ListView::receive`]. Nothing is fetched
//! implicitly and no reply is cached.
//!
//! List-load failures are logged and kept in `load_error`. Whether to show
//! them is the host's call.

use tracing::{debug, error};

use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Reply};
use crate::pagination::Pagination;
use crate::route::Route;
use crate::types::{Employee, EmployeeFilter, Page};
use crate::workflow::{Dialog, DialogSlot, Mutation, MutationTicket};

pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Which part of a table row was clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTarget {
    /// The row itself: navigate to the detail screen.
    Row,
    /// The row's Edit button.
    Edit,
    /// The row's Delete button.
    Delete,
}

#[derive(Debug, Clone)]
pub struct ListView {
    page: u32,
    size: u32,
    total_pages: u32,
    search: String,
    department: String,
    employees: Vec<Employee>,
    load_error: Option<String>,
    dialogs: DialogSlot,
}

impl Default for ListView {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl ListView {
    pub fn new(size: u32) -> Self {
        Self {
            page: 0,
            size: size.max(1),
            total_pages: 0,
            search: String::new(),
            department: String::new(),
            employees: Vec::new(),
            load_error: None,
            dialogs: DialogSlot::default(),
        }
    }

    /// Query for the current state. Empty terms are omitted.
    pub fn filter(&self) -> EmployeeFilter {
        EmployeeFilter {
            page: Some(self.page),
            size: Some(self.size),
            search: non_empty(&self.search),
            department: non_empty(&self.department),
            sort: None,
        }
    }

    pub fn request(&self, client: &EmployeeClient) -> HttpRequest {
        client.build_list_employees(&self.filter())
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.total_pages)
    }

    /// Move to `page`. Returns the filter to fetch with when the index
    /// actually changed.
    pub fn set_page(&mut self, page: u32) -> Option<EmployeeFilter> {
        if page == self.page {
            return None;
        }
        self.page = page;
        Some(self.filter())
    }

    pub fn previous(&mut self) -> Option<EmployeeFilter> {
        let page = self.pagination().previous()?;
        self.set_page(page)
    }

    pub fn next(&mut self) -> Option<EmployeeFilter> {
        let page = self.pagination().next()?;
        self.set_page(page)
    }

    /// Confirmed page-jump entry (one-based). Invalid input is ignored.
    pub fn jump(&mut self, input: &str) -> Option<EmployeeFilter> {
        let page = self.pagination().jump(input)?;
        self.set_page(page)
    }

    /// New search term; resets to the first page.
    pub fn set_search(&mut self, term: &str) -> Option<EmployeeFilter> {
        let changed = self.page != 0 || self.search != term;
        self.page = 0;
        self.search = term.to_string();
        changed.then(|| self.filter())
    }

    /// New department term; resets to the first page.
    pub fn set_department(&mut self, term: &str) -> Option<EmployeeFilter> {
        let changed = self.page != 0 || self.department != term;
        self.page = 0;
        self.department = term.to_string();
        changed.then(|| self.filter())
    }

    /// Refetch with the current state, e.g. after a mutation.
    pub fn refresh(&self) -> EmployeeFilter {
        self.filter()
    }

    pub fn receive(&mut self, client: &EmployeeClient, reply: Reply) {
        let result = reply.and_then(|response| client.parse_list_employees(response));
        self.apply(result);
    }

    pub fn apply(&mut self, result: Result<Page<Employee>, ApiError>) {
        match result {
            Ok(page) => {
                debug!(count = page.content.len(), total_pages = page.total_pages, "employee page loaded");
                self.employees = page.content;
                self.total_pages = page.total_pages;
                self.load_error = None;
            }
            Err(e) => {
                error!(error = %e, "error fetching employees");
                self.load_error = Some(e.user_message("Failed to load employees"));
            }
        }
    }

    /// Handle a click on row `index`. Only a click on the row itself
    /// navigates; the action buttons open their dialog instead.
    pub fn click(&mut self, index: usize, target: RowTarget) -> Option<Route> {
        let employee = self.employees.get(index)?;
        match target {
            RowTarget::Row => Some(Route::Detail(employee.id)),
            RowTarget::Edit => {
                self.dialogs.open_edit(employee);
                None
            }
            RowTarget::Delete => {
                self.dialogs.open_delete(employee);
                None
            }
        }
    }

    pub fn open_create(&mut self) {
        self.dialogs.open_create();
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialogs.current()
    }

    pub fn dialog_mut(&mut self) -> Option<&mut Dialog> {
        self.dialogs.current_mut()
    }

    pub fn close_dialog(&mut self) -> bool {
        self.dialogs.close()
    }

    pub fn submit_dialog(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        self.dialogs.submit(client)
    }

    /// Deliver a mutation reply. On success the list is refetched in place.
    pub fn settle_dialog(
        &mut self,
        client: &EmployeeClient,
        ticket: &MutationTicket,
        reply: Reply,
    ) -> Option<EmployeeFilter> {
        self.dialogs
            .settle(client, ticket, reply)
            .map(|_| self.refresh())
    }
}

fn non_empty(term: &str) -> Option<String> {
    (!term.is_empty()).then(|| term.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::types::{EmployeeId, FormField};
    use crate::workflow::MutationKind;

    fn client() -> EmployeeClient {
        EmployeeClient::new("http://localhost:8080")
    }

    fn employee(id: i64) -> Employee {
        Employee {
            id: EmployeeId(id),
            first_name: format!("First{id}"),
            last_name: format!("Last{id}"),
            email: format!("e{id}@corp.io"),
            department: "IT".to_string(),
        }
    }

    fn page_of(ids: std::ops::RangeInclusive<i64>, total_pages: u32) -> Page<Employee> {
        Page {
            content: ids.map(employee).collect(),
            total_pages,
            total_elements: 0,
            number: 0,
            size: 5,
        }
    }

    fn reply(status: u16, body: &str) -> Reply {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    fn loaded(page: u32, total_pages: u32) -> ListView {
        let mut view = ListView::new(5);
        view.apply(Ok(page_of(1..=5, total_pages)));
        view.set_page(page);
        view
    }

    #[test]
    fn initial_filter_omits_empty_terms() {
        let view = ListView::default();
        let filter = view.filter();
        assert_eq!(filter.page, Some(0));
        assert_eq!(filter.size, Some(5));
        assert!(filter.search.is_none());
        assert!(filter.department.is_none());
        assert_eq!(view.request(&client()).path, "http://localhost:8080/api/employees?page=0&size=5");
    }

    #[test]
    fn twelve_records_three_pages() {
        let mut view = ListView::new(5);
        view.apply(Ok(page_of(1..=5, 3)));
        let p = view.pagination();
        assert_eq!(p.total_pages, 3);
        assert!(p.can_next());
        assert!(!p.can_previous());
        let labels: Vec<u32> = p.window_pages().iter().map(|i| i + 1).collect();
        assert_eq!(labels, vec![1, 2]);
    }

    #[test]
    fn search_resets_page_before_fetch() {
        let mut view = loaded(2, 3);
        let filter = view.set_search("ann").unwrap();
        assert_eq!(filter.page, Some(0));
        assert_eq!(filter.search.as_deref(), Some("ann"));
        assert_eq!(view.page(), 0);
    }

    #[test]
    fn department_resets_page_before_fetch() {
        for start in 0..3 {
            let mut view = loaded(start, 3);
            view.set_search("x");
            view.set_page(start);
            let filter = view.set_department("HR").unwrap();
            assert_eq!(filter.page, Some(0));
            assert_eq!(filter.department.as_deref(), Some("HR"));
            assert_eq!(filter.search.as_deref(), Some("x"));
        }
    }

    #[test]
    fn unchanged_term_on_first_page_does_not_refetch() {
        let mut view = loaded(0, 3);
        assert!(view.set_search("").is_none());
        assert!(view.set_department("").is_none());
    }

    #[test]
    fn same_term_on_later_page_still_resets() {
        let mut view = loaded(1, 3);
        let filter = view.set_search("").unwrap();
        assert_eq!(filter.page, Some(0));
    }

    #[test]
    fn clearing_a_term_omits_it() {
        let mut view = loaded(0, 3);
        view.set_search("bob");
        let filter = view.set_search("").unwrap();
        assert!(filter.search.is_none());
    }

    #[test]
    fn previous_and_next_respect_bounds() {
        let mut view = loaded(0, 3);
        assert!(view.previous().is_none());
        assert_eq!(view.next().unwrap().page, Some(1));
        assert_eq!(view.next().unwrap().page, Some(2));
        assert!(view.next().is_none());
        assert_eq!(view.previous().unwrap().page, Some(1));
    }

    #[test]
    fn jump_only_within_range() {
        let mut view = loaded(0, 3);
        assert!(view.jump("9").is_none());
        assert!(view.jump("0").is_none());
        assert!(view.jump("abc").is_none());
        assert_eq!(view.page(), 0);
        assert_eq!(view.jump("3").unwrap().page, Some(2));
        assert!(view.jump("3").is_none(), "already there");
    }

    #[test]
    fn load_failure_keeps_previous_rows() {
        let mut view = loaded(0, 3);
        view.receive(&client(), reply(500, r#"{"message":"db down"}"#));
        assert_eq!(view.employees().len(), 5);
        assert_eq!(view.load_error(), Some("db down"));
        view.receive(&client(), reply(200, r#"{"content":[],"totalPages":0}"#));
        assert!(view.load_error().is_none());
        assert!(view.employees().is_empty());
    }

    #[test]
    fn row_click_navigates_but_buttons_do_not() {
        let mut view = loaded(0, 1);
        assert_eq!(view.click(1, RowTarget::Row), Some(Route::Detail(EmployeeId(2))));
        assert!(view.dialog().is_none());
        assert_eq!(view.click(1, RowTarget::Edit), None);
        assert!(matches!(view.dialog(), Some(Dialog::Edit(_))));
        assert_eq!(view.click(2, RowTarget::Delete), None);
        assert!(matches!(view.dialog(), Some(Dialog::Delete(_))));
        assert_eq!(view.click(42, RowTarget::Row), None);
    }

    #[test]
    fn successful_create_refetches_current_page() {
        let mut view = loaded(1, 3);
        view.open_create();
        if let Some(Dialog::Create(w)) = view.dialog_mut() {
            w.set(FormField::Email, "new@corp.io");
        }
        let mutation = view.submit_dialog(&client()).unwrap();
        assert_eq!(mutation.ticket.kind, MutationKind::Create);
        let refetch = view
            .settle_dialog(
                &client(),
                &mutation.ticket,
                reply(201, r#"{"id":77,"firstName":"","lastName":"","email":"new@corp.io","department":""}"#),
            )
            .unwrap();
        assert_eq!(refetch.page, Some(1));
        assert!(view.dialog().is_none());
    }

    #[test]
    fn invalid_create_never_reaches_network() {
        let mut view = loaded(0, 1);
        view.open_create();
        if let Some(Dialog::Create(w)) = view.dialog_mut() {
            w.set(FormField::Email, "bob@example");
        }
        assert!(view.submit_dialog(&client()).is_none());
        assert_eq!(view.dialog().unwrap().error(), Some("Invalid email format"));
    }

    #[test]
    fn failed_delete_does_not_refetch() {
        let mut view = loaded(0, 1);
        view.click(0, RowTarget::Delete);
        let mutation = view.submit_dialog(&client()).unwrap();
        assert!(view.settle_dialog(&client(), &mutation.ticket, reply(500, "")).is_none());
        assert_eq!(view.dialog().unwrap().error(), Some("Failed to delete employee"));
    }
}
