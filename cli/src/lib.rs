//! # ems-cli: terminal front end for the employee-records service
//!
//! ## Subcommands
//!
//! - `shell`: interactive list/detail screens with create, edit and delete dialogs
//! - `list`, `get`: one-shot reads
//! - `create`, `update`, `delete`: one-shot mutations, validated the same way
//!   the dialogs validate
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in [`config`] and [`commands`]; screen state lives
//!   in `ems-core`. This crate only executes requests and prints.
//! - All network I/O goes through [`transport::UreqTransport`].

pub mod commands;
pub mod config;
pub mod render;
pub mod shell;
pub mod transport;
