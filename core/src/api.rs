//! One-call API operations over a [`Transport`].
//!
//! Each method is a single round trip: build, execute, parse. Nothing is
//! retried or cached.

use tracing::debug;

use crate::client::EmployeeClient;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Employee, EmployeeFilter, EmployeeForm, EmployeeId, Page};

#[derive(Debug, Clone)]
pub struct EmployeeApi<T> {
    client: EmployeeClient,
    transport: T,
}

impl<T: Transport> EmployeeApi<T> {
    pub fn new(client: EmployeeClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &EmployeeClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_employees(&self, filter: &EmployeeFilter) -> Result<Page<Employee>, ApiError> {
        let request = self.client.build_list_employees(filter);
        debug!(path = %request.path, "listing employees");
        let response = self.transport.execute(request)?;
        self.client.parse_list_employees(response)
    }

    pub fn get_employee(&self, id: EmployeeId) -> Result<Employee, ApiError> {
        debug!(%id, "fetching employee");
        let response = self.transport.execute(self.client.build_get_employee(id))?;
        self.client.parse_get_employee(response)
    }

    pub fn create_employee(&self, input: &EmployeeForm) -> Result<Employee, ApiError> {
        debug!(email = %input.email, "creating employee");
        let response = self.transport.execute(self.client.build_create_employee(input)?)?;
        self.client.parse_create_employee(response)
    }

    pub fn update_employee(&self, id: EmployeeId, input: &EmployeeForm) -> Result<Employee, ApiError> {
        debug!(%id, "updating employee");
        let response = self.transport.execute(self.client.build_update_employee(id, input)?)?;
        self.client.parse_update_employee(response)
    }

    pub fn delete_employee(&self, id: EmployeeId) -> Result<(), ApiError> {
        debug!(%id, "deleting employee");
        let response = self.transport.execute(self.client.build_delete_employee(id))?;
        self.client.parse_delete_employee(response)
    }
}
