//! Modal workflows: create, edit and delete.
//!
//! # Design
//! A workflow never performs I/O. Submitting hands back a [`Mutation`]: the
//! request to execute plus a [`MutationTicket`] naming the dialog instance
//! and the operation. The host executes the request and returns the reply
//! together with the ticket to [`DialogSlot::settle`]. If the dialog has been
//! closed or replaced in the meantime the reply no longer touches it, but a
//! successful mutation is still reported so the host can refresh.

mod create;
mod delete;
mod edit;
mod slot;

pub use create::CreateWorkflow;
pub use delete::DeleteWorkflow;
pub use edit::EditWorkflow;
pub use slot::DialogSlot;

use tracing::warn;

use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, Reply};
use crate::types::{Employee, EmployeeForm, EmployeeId, FormField};
use crate::validation::validate_form;

/// Shown when a create or edit fails without a backend message.
pub const SUBMIT_FALLBACK: &str = "Something went wrong";

/// Shown when a delete fails without a backend message.
pub const DELETE_FALLBACK: &str = "Failed to delete employee";

/// Identity of one opened dialog. Never reused within a [`DialogSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DialogId(pub(crate) u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update(EmployeeId),
    Delete(EmployeeId),
}

impl MutationKind {
    /// Interpret a reply for this operation.
    pub fn resolve(&self, client: &EmployeeClient, reply: Reply) -> Result<MutationOutcome, ApiError> {
        let response = reply?;
        match *self {
            MutationKind::Create => client.parse_create_employee(response).map(MutationOutcome::Created),
            MutationKind::Update(_) => client.parse_update_employee(response).map(MutationOutcome::Updated),
            MutationKind::Delete(id) => client
                .parse_delete_employee(response)
                .map(|()| MutationOutcome::Deleted(id)),
        }
    }
}

/// Correlates a reply with the dialog that issued the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationTicket {
    pub dialog: DialogId,
    pub kind: MutationKind,
}

/// A request a workflow wants executed.
#[derive(Debug, Clone)]
pub struct Mutation {
    pub ticket: MutationTicket,
    pub request: HttpRequest,
}

/// What a successful workflow reports to its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    Created(Employee),
    Updated(Employee),
    Deleted(EmployeeId),
}

/// Form fields plus submission status, shared by create and edit.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    form: EmployeeForm,
    error: Option<String>,
    submitting: bool,
}

impl FormState {
    fn with_form(form: EmployeeForm) -> Self {
        Self {
            form,
            ..Default::default()
        }
    }

    pub fn form(&self) -> &EmployeeForm {
        &self.form
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    fn replace(&mut self, form: EmployeeForm) {
        self.form = form;
    }

    /// Validate and build. Returns `None` while a request is outstanding or
    /// when the form is rejected; the rejection is kept in `error`.
    fn begin<F>(&mut self, build: F) -> Option<HttpRequest>
    where
        F: FnOnce(&EmployeeForm) -> Result<HttpRequest, ApiError>,
    {
        if self.submitting {
            return None;
        }
        if let Err(e) = validate_form(&self.form) {
            self.error = Some(e.to_string());
            return None;
        }
        match build(&self.form) {
            Ok(request) => {
                self.error = None;
                self.submitting = true;
                Some(request)
            }
            Err(e) => {
                self.error = Some(e.user_message(SUBMIT_FALLBACK));
                None
            }
        }
    }

    fn finish(&mut self, result: Result<MutationOutcome, ApiError>) -> Option<MutationOutcome> {
        self.submitting = false;
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(error = %e, "employee submission failed");
                self.error = Some(e.user_message(SUBMIT_FALLBACK));
                None
            }
        }
    }
}

/// The dialog currently shown by a host view.
#[derive(Debug, Clone)]
pub enum Dialog {
    Create(CreateWorkflow),
    Edit(EditWorkflow),
    Delete(DeleteWorkflow),
}

impl Dialog {
    pub fn id(&self) -> DialogId {
        match self {
            Dialog::Create(w) => w.id(),
            Dialog::Edit(w) => w.id(),
            Dialog::Delete(w) => w.id(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Dialog::Create(w) => w.state().error(),
            Dialog::Edit(w) => w.state().error(),
            Dialog::Delete(w) => w.error(),
        }
    }

    pub fn is_submitting(&self) -> bool {
        match self {
            Dialog::Create(w) => w.state().is_submitting(),
            Dialog::Edit(w) => w.state().is_submitting(),
            Dialog::Delete(w) => w.is_submitting(),
        }
    }

    /// Form being edited; `None` for the delete confirmation.
    pub fn form(&self) -> Option<&EmployeeForm> {
        match self {
            Dialog::Create(w) => Some(w.state().form()),
            Dialog::Edit(w) => Some(w.state().form()),
            Dialog::Delete(_) => None,
        }
    }

    /// Returns `false` when the dialog has no form.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
        match self {
            Dialog::Create(w) => w.set(field, value),
            Dialog::Edit(w) => w.set(field, value),
            Dialog::Delete(_) => return false,
        }
        true
    }

    /// Create and edit can always be cancelled; delete locks both controls
    /// while its request is outstanding.
    pub fn can_dismiss(&self) -> bool {
        match self {
            Dialog::Delete(w) => !w.is_submitting(),
            _ => true,
        }
    }

    pub fn submit(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        match self {
            Dialog::Create(w) => w.submit(client),
            Dialog::Edit(w) => w.submit(client),
            Dialog::Delete(w) => w.confirm(client),
        }
    }

    fn finish(&mut self, result: Result<MutationOutcome, ApiError>) -> Option<MutationOutcome> {
        match self {
            Dialog::Create(w) => w.finish(result),
            Dialog::Edit(w) => w.finish(result),
            Dialog::Delete(w) => w.finish(result),
        }
    }
}
