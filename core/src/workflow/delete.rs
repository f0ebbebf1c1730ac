use tracing::warn;

use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::types::Employee;

use super::{DialogId, Mutation, MutationKind, MutationOutcome, MutationTicket, DELETE_FALLBACK};

/// Delete confirmation. No form; confirm or cancel.
#[derive(Debug, Clone)]
pub struct DeleteWorkflow {
    id: DialogId,
    target: Employee,
    error: Option<String>,
    submitting: bool,
}

impl DeleteWorkflow {
    pub(crate) fn new(id: DialogId, employee: &Employee) -> Self {
        Self {
            id,
            target: employee.clone(),
            error: None,
            submitting: false,
        }
    }

    pub fn id(&self) -> DialogId {
        self.id
    }

    pub fn target(&self) -> &Employee {
        &self.target
    }

    pub fn prompt(&self) -> String {
        format!("Are you sure you want to delete {}?", self.target.full_name())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn confirm(&mut self, client: &EmployeeClient) -> Option<Mutation> {
        if self.submitting {
            return None;
        }
        self.error = None;
        self.submitting = true;
        Some(Mutation {
            ticket: MutationTicket {
                dialog: self.id,
                kind: MutationKind::Delete(self.target.id),
            },
            request: client.build_delete_employee(self.target.id),
        })
    }

    pub(crate) fn finish(&mut self, result: Result<MutationOutcome, ApiError>) -> Option<MutationOutcome> {
        self.submitting = false;
        match result {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                warn!(id = %self.target.id, error = %e, "employee delete failed");
                self.error = Some(e.user_message(DELETE_FALLBACK));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpResponse};
    use crate::types::EmployeeId;

    fn client() -> EmployeeClient {
        EmployeeClient::new("http://localhost:8080")
    }

    fn ann() -> Employee {
        serde_json::from_str(r#"{"id":8,"firstName":"Ann","lastName":"Lee","email":"ann@corp.io","department":"HR"}"#)
            .unwrap()
    }

    #[test]
    fn prompt_names_the_employee() {
        let w = DeleteWorkflow::new(DialogId(1), &ann());
        assert!(w.prompt().contains("Ann Lee"));
    }

    #[test]
    fn confirm_issues_delete_once() {
        let mut w = DeleteWorkflow::new(DialogId(1), &ann());
        let mutation = w.confirm(&client()).unwrap();
        assert_eq!(mutation.request.method, HttpMethod::Delete);
        assert_eq!(mutation.ticket.kind, MutationKind::Delete(EmployeeId(8)));
        assert!(w.is_submitting());
        assert!(w.confirm(&client()).is_none());
    }

    #[test]
    fn failure_without_message_uses_fallback() {
        let mut w = DeleteWorkflow::new(DialogId(1), &ann());
        let mutation = w.confirm(&client()).unwrap();
        let reply = Ok(HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: String::new(),
        });
        assert!(w.finish(mutation.ticket.kind.resolve(&client(), reply)).is_none());
        assert_eq!(w.error(), Some("Failed to delete employee"));
        assert!(!w.is_submitting());
    }

    #[test]
    fn success_reports_deleted_id() {
        let mut w = DeleteWorkflow::new(DialogId(1), &ann());
        let mutation = w.confirm(&client()).unwrap();
        let reply = Ok(HttpResponse {
            status: 204,
            headers: Vec::new(),
            body: String::new(),
        });
        let outcome = w.finish(mutation.ticket.kind.resolve(&client(), reply));
        assert_eq!(outcome, Some(MutationOutcome::Deleted(EmployeeId(8))));
    }
}
