use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::types::FormField;

use super::{DialogId, FormState, Mutation, MutationKind, MutationOutcome, MutationTicket};

/// "Add Employee" dialog. All fields start empty.
#[derive(Debug, Clone)]
pub struct CreateWorkflow {
    id: DialogId,
    state: FormState,
}

impl CreateWorkflow {
    pub(crate) fn new(id: DialogId) -> Self {
        Self {
            id,
            state: FormState::default(),
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        self.state.set(field, value);
    }

    pub fn submit(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        let request = self.state.begin(|form| client.build_create_employee(form))?;
        Some(Mutation {
            ticket: MutationTicket {
                dialog: self.id,
                kind: MutationKind::Create,
            },
            request,
        })
    }

    pub(crate) fn finish(&mut self, result: Result<MutationOutcome, ApiError>) -> Option<MutationOutcome> {
        self.state.finish(result)
    }
}
