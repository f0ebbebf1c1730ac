use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::types::{Employee, EmployeeForm, EmployeeId, FormField};

use super::{DialogId, FormState, Mutation, MutationKind, MutationOutcome, MutationTicket};

/// "Edit Employee" dialog, pre-populated from a fetched snapshot.
#[derive(Debug, Clone)]
pub struct EditWorkflow {
    id: DialogId,
    target: EmployeeId,
    state: FormState,
}

impl EditWorkflow {
    pub(crate) fn new(id: DialogId, employee: &Employee) -> Self {
        Self {
            id,
            target: employee.id,
            state: FormState::with_form(EmployeeForm::from(employee)),
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn target(&self) -> EmployeeId {
        self.target
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.state.set(field, value);
    }

    /// Re-populate from a newer snapshot of the same record.
    pub fn retarget(&mut self, employee: &Employee) {
        self.target = employee.id;
        self.state.replace(EmployeeForm::from(employee));
    }

    pub fn submit(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        let target = self.target;
        let request = self
            .state
            .begin(|form| client.build_update_employee(target, form))?;
        Some(Mutation {
            ticket: MutationTicket {
                dialog: self.id,
                kind: MutationKind::Update(target),
            },
            request,
        })
    }

    pub(crate) fn finish(&mut self, result: Result<MutationOutcome, ApiError>) -> Option<MutationOutcome> {
        self.state.finish(result)
    }
}
