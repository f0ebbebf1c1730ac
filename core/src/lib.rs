//! Client core for the employee-records service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of that sit IO-free
//! state machines for the list screen, the detail screen and the
//! create/edit/delete dialogs; a front end drives them by executing the
//! requests they hand out and feeding the replies back.
//!
//! # Design
//! - `EmployeeClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - `EmployeeApi` wraps a [`Transport`] for callers that just want one call
//!   per operation.
//! - Views keep private snapshots. Mutations end in a targeted refetch of
//!   the hosting view, never a global reload.

pub mod api;
pub mod client;
pub mod detail_view;
pub mod error;
pub mod http;
pub mod list_view;
pub mod pagination;
pub mod route;
pub mod types;
pub mod validation;
pub mod workflow;

pub use api::EmployeeApi;
pub use client::EmployeeClient;
pub use detail_view::{DetailAction, DetailState, DetailView};
pub use error::{ApiError, ValidationError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Reply, Transport};
pub use list_view::{ListView, RowTarget};
pub use pagination::Pagination;
pub use route::Route;
pub use types::{Employee, EmployeeFilter, EmployeeForm, EmployeeId, FormField, Page, Sort, SortDirection};
pub use workflow::{Dialog, Mutation, MutationKind, MutationOutcome, MutationTicket};
