//! Command dispatch: bridges CLI args to the API client, list controller
//! and output formatting.

pub mod branches;
pub mod browse;
pub mod categories;
pub mod config_cmd;
pub mod crud;
pub mod options;
pub mod orients;
pub mod people;
pub mod roles;
pub mod session;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Backend;
use crate::error::CliError;

/// Dispatch a backend-bound command to its handler.
pub async fn dispatch(cmd: Command, backend: &Backend, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Branches(args) => branches::handle(backend, args, global).await,
        Command::Orients(args) => orients::handle(backend, args, global).await,
        Command::Categories(args) => categories::handle(backend, args, global).await,
        Command::Clients(args) => people::handle_clients(backend, args, global).await,
        Command::Employees(args) => people::handle_employees(backend, args, global).await,
        Command::Roles(args) => roles::handle(backend, args, global).await,
        Command::Options(args) => options::handle(backend, args, global).await,
        Command::Browse(args) => browse::handle(backend, args, global).await,
        Command::Login(args) => session::login(backend, args, global).await,
        Command::Logout => session::logout(backend, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Err(CliError::Internal(
            "command does not need a backend connection".into(),
        )),
    }
}
