//! State machine behind the single-employee screen.

use tracing::debug;

use crate::client::EmployeeClient;
use crate::http::{HttpRequest, Reply};
use crate::route::Route;
use crate::types::{Employee, EmployeeId};
use crate::workflow::{Dialog, DialogSlot, Mutation, MutationOutcome, MutationTicket};

/// Shown when fetching the record fails without a backend message.
pub const FETCH_FALLBACK: &str = "Failed to fetch employee";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    Loading,
    Failed(String),
    Loaded(Employee),
}

/// What the host should do after a dialog settles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    /// Refetch this record in place.
    Reload(HttpRequest),
    /// Leave the screen.
    Navigate(Route),
}

#[derive(Debug, Clone)]
pub struct DetailView {
    id: EmployeeId,
    state: DetailState,
    dialogs: DialogSlot,
}

impl DetailView {
    pub fn new(id: EmployeeId) -> Self {
        Self {
            id,
            state: DetailState::Loading,
            dialogs: DialogSlot::default(),
        }
    }

    pub fn id(&self) -> EmployeeId {
        self.id
    }

    pub fn state(&self) -> &DetailState {
        &self.state
    }

    pub fn employee(&self) -> Option<&Employee> {
        match &self.state {
            DetailState::Loaded(employee) => Some(employee),
            _ => None,
        }
    }

    pub fn request(&self, client: &EmployeeClient) -> HttpRequest {
        client.build_get_employee(self.id)
    }

    /// Point the screen at another record. Returns the fetch to issue when
    /// the id changed.
    pub fn set_id(&mut self, client: &EmployeeClient, id: EmployeeId) -> Option<HttpRequest> {
        if id == self.id {
            return None;
        }
        self.id = id;
        self.state = DetailState::Loading;
        self.dialogs.reset();
        Some(self.request(client))
    }

    /// Apply the reply to a fetch of `requested`. Replies for a record the
    /// screen no longer shows are dropped.
    pub fn receive(&mut self, client: &EmployeeClient, requested: EmployeeId, reply: Reply) {
        if requested != self.id {
            debug!(%requested, current = %self.id, "dropping stale employee reply");
            return;
        }
        match reply.and_then(|response| client.parse_get_employee(response)) {
            Ok(employee) => {
                self.dialogs.retarget(&employee);
                self.state = DetailState::Loaded(employee);
            }
            Err(e) => {
                debug!(id = %self.id, error = %e, "employee fetch failed");
                self.dialogs.reset();
                self.state = DetailState::Failed(e.user_message(FETCH_FALLBACK));
            }
        }
    }

    pub fn back(&self) -> Route {
        Route::List
    }

    /// Open the edit dialog. Only available once the record is loaded.
    pub fn open_edit(&mut self) -> bool {
        let DetailState::Loaded(employee) = &self.state else {
            return false;
        };
        self.dialogs.open_edit(employee);
        true
    }

    pub fn open_delete(&mut self) -> bool {
        let DetailState::Loaded(employee) = &self.state else {
            return false;
        };
        self.dialogs.open_delete(employee);
        true
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

    /// Deliver a mutation reply. An edit reloads this record; a delete sends
    /// the user back to the list.
    pub fn settle_dialog(
        &mut self,
        client: &EmployeeClient,
        ticket: &MutationTicket,
        reply: Reply,
    ) -> Option<DetailAction> {
        match self.dialogs.settle(client, ticket, reply)? {
            MutationOutcome::Deleted(id) if id == self.id => Some(DetailAction::Navigate(Route::List)),
            _ => Some(DetailAction::Reload(self.request(client))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::types::FormField;

    const ANN: &str = r#"{"id":4,"firstName":"Ann","lastName":"Lee","email":"ann@corp.io","department":"HR"}"#;

    fn client() -> EmployeeClient {
        EmployeeClient::new("http://localhost:8080")
    }

    fn reply(status: u16, body: &str) -> Reply {
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        })
    }

    fn loaded() -> DetailView {
        let mut view = DetailView::new(EmployeeId(4));
        view.receive(&client(), EmployeeId(4), reply(200, ANN));
        view
    }

    #[test]
    fn starts_loading_and_fetches_by_id() {
        let view = DetailView::new(EmployeeId(4));
        assert_eq!(view.state(), &DetailState::Loading);
        let req = view.request(&client());
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/api/employees/4");
    }

    #[test]
    fn not_found_shows_backend_message() {
        let mut view = DetailView::new(EmployeeId(4));
        view.receive(
            &client(),
            EmployeeId(4),
            reply(404, r#"{"message":"Employee not found with id: 4"}"#),
        );
        assert_eq!(
            view.state(),
            &DetailState::Failed("Employee not found with id: 4".to_string())
        );
        assert!(!view.open_edit());
    }

    #[test]
    fn network_failure_uses_fallback() {
        let mut view = DetailView::new(EmployeeId(4));
        view.receive(&client(), EmployeeId(4), Err(crate::ApiError::Transport("down".into())));
        assert_eq!(view.state(), &DetailState::Failed(FETCH_FALLBACK.to_string()));
    }

    #[test]
    fn stale_reply_is_ignored() {
        let mut view = loaded();
        let req = view.set_id(&client(), EmployeeId(5)).unwrap();
        assert!(req.path.ends_with("/5"));
        view.receive(&client(), EmployeeId(4), reply(200, ANN));
        assert_eq!(view.state(), &DetailState::Loading);
        assert!(view.set_id(&client(), EmployeeId(5)).is_none());
    }

    #[test]
    fn edit_success_reloads_in_place() {
        let mut view = loaded();
        assert!(view.open_edit());
        if let Some(Dialog::Edit(w)) = view.dialog_mut() {
            w.set(FormField::Department, "IT");
        }
        let mutation = view.submit_dialog(&client()).unwrap();
        let updated = ANN.replace("HR", "IT");
        let action = view.settle_dialog(&client(), &mutation.ticket, reply(200, &updated)).unwrap();
        assert_eq!(action, DetailAction::Reload(view.request(&client())));
        assert!(view.dialog().is_none());

        view.receive(&client(), EmployeeId(4), reply(200, &updated));
        assert_eq!(view.employee().unwrap().department, "IT");
    }

    #[test]
    fn delete_success_navigates_to_list() {
        let mut view = loaded();
        assert!(view.open_delete());
        let mutation = view.submit_dialog(&client()).unwrap();
        let action = view.settle_dialog(&client(), &mutation.ticket, reply(204, "")).unwrap();
        assert_eq!(action, DetailAction::Navigate(Route::List));
    }

    #[test]
    fn refetch_repopulates_open_edit_dialog() {
        let mut view = loaded();
        view.open_edit();
        view.receive(&client(), EmployeeId(4), reply(200, &ANN.replace("Ann", "Annie")));
        let Some(Dialog::Edit(w)) = view.dialog() else { panic!("edit dialog expected") };
        assert_eq!(w.state().form().first_name, "Annie");
    }

    #[test]
    fn edit_reply_after_switching_records_leaves_new_dialog_alone() {
        let mut view = loaded();
        assert!(view.open_edit());
        let old = view.submit_dialog(&client()).unwrap();

        view.set_id(&client(), EmployeeId(5)).unwrap();
        let bob = r#"{"id":5,"firstName":"Bob","lastName":"Kim","email":"bob@corp.io","department":"IT"}"#;
        view.receive(&client(), EmployeeId(5), reply(200, bob));
        assert!(view.open_delete());
        assert_ne!(view.dialog().unwrap().id(), old.ticket.dialog);

        let action = view.settle_dialog(&client(), &old.ticket, reply(200, ANN));
        assert_eq!(action, Some(DetailAction::Reload(view.request(&client()))));
        let Some(Dialog::Delete(w)) = view.dialog() else { panic!("delete dialog expected") };
        assert_eq!(w.target().id, EmployeeId(5));
        assert!(view.dialog().unwrap().error().is_none());
    }

    #[test]
    fn failed_refetch_closes_open_dialog() {
        let mut view = loaded();
        assert!(view.open_edit());
        view.receive(&client(), EmployeeId(4), Err(crate::ApiError::Transport("down".into())));
        assert_eq!(view.state(), &DetailState::Failed(FETCH_FALLBACK.to_string()));
        assert!(view.dialog().is_none());
    }
}
