//! Settings shared by every subcommand.
//!
//! Each flag can also come from the environment, so a deployment can point
//! the CLI at its backend without wrapping it in a script.

use clap::Args;
use ems_core::list_view::DEFAULT_PAGE_SIZE;
use ems_core::{EmployeeApi, EmployeeClient};

use crate::transport::UreqTransport;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Base URL of the employee service.
    #[arg(long, global = true, env = "EMS_API_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Rows per list page.
    #[arg(
        long,
        global = true,
        env = "EMS_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub page_size: u32,

    /// Show list-load failures on screen instead of only logging them.
    #[arg(long, global = true)]
    pub surface_list_errors: bool,

    /// Print one-shot results as JSON.
    #[arg(long, global = true)]
    pub json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            surface_list_errors: false,
            json: false,
        }
    }
}

impl Settings {
    pub fn api(&self) -> EmployeeApi<UreqTransport> {
        EmployeeApi::new(EmployeeClient::new(&self.base_url), UreqTransport::new())
    }
}
