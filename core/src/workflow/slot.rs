use tracing::warn;

use crate::client::EmployeeClient;
use crate::http::Reply;
use crate::types::Employee;

use super::{
    CreateWorkflow, DeleteWorkflow, Dialog, DialogId, EditWorkflow, Mutation, MutationOutcome, MutationTicket,
};

/// Holds at most one open dialog for a host view and routes replies back
/// to it.
#[derive(Debug, Clone, Default)]
pub struct DialogSlot {
    current: Option<Dialog>,
    issued: u64,
}

impl DialogSlot {
    fn next_id(&mut self) -> DialogId {
        self.issued += 1;
        DialogId(self.issued)
    }

    pub fn current(&self) -> Option<&Dialog> {
        self.current.as_ref()
    }

    pub fn current_mut(&mut self) -> Option<&mut Dialog> {
        self.current.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    /// Opening replaces any dialog already shown; a request it had in flight
    /// becomes defunct.
    pub fn open_create(&mut self) {
        let id = self.next_id();
        self.current = Some(Dialog::Create(CreateWorkflow::new(id)));
    }

    pub fn open_edit(&mut self, employee: &Employee) {
        let id = self.next_id();
        self.current = Some(Dialog::Edit(EditWorkflow::new(id, employee)));
    }

    pub fn open_delete(&mut self, employee: &Employee) {
        let id = self.next_id();
        self.current = Some(Dialog::Delete(DeleteWorkflow::new(id, employee)));
    }

    /// Close the dialog if its cancel control is enabled. Returns whether a
    /// dialog was closed.
    pub fn close(&mut self) -> bool {
        match &self.current {
            Some(dialog) if dialog.can_dismiss() => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    /// Drop the dialog regardless of its cancel control. Ids already issued
    /// stay spent, so replies for the dropped dialog become defunct.
    pub fn reset(&mut self) {
        self.current = None;
    }

    pub fn submit(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        self.current.as_mut()?.submit(client)
    }

    /// Feed a fresh snapshot to an open edit dialog for the same record.
    pub fn retarget(&mut self, employee: &Employee) {
        if let Some(Dialog::Edit(edit)) = &mut self.current {
            if edit.target() == employee.id {
                edit.retarget(employee);
            }
        }
    }

    /// Deliver the reply for `ticket`. Returns the outcome when the mutation
    /// succeeded, whether or not its dialog is still open. An open dialog is
    /// closed on success and keeps its values and error on failure.
    pub fn settle(&mut self, client: &EmployeeClient, ticket: &MutationTicket, reply: Reply) -> Option<MutationOutcome> {
        let result = ticket.kind.resolve(client, reply);
        match self.current.as_mut().filter(|d| d.id() == ticket.dialog) {
            Some(dialog) => {
                let outcome = dialog.finish(result);
                if outcome.is_some() {
                    self.current = None;
                }
                outcome
            }
            None => match result {
                Ok(outcome) => {
                    warn!(kind = ?ticket.kind, "mutation finished after its dialog closed");
                    Some(outcome)
                }
                Err(e) => {
                    warn!(kind = ?ticket.kind, error = %e, "dropping failure for closed dialog");
                    None
                }
            },
        }
    }
}
