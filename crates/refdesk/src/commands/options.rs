//! Picklist command handlers.

use refdesk_api::types::NamedRef;
use refdesk_core::Column;

use crate::cli::{GlobalOpts, OptionsArgs, OptionsCommand};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::{self, TextColumn};

fn columns() -> Vec<TextColumn<NamedRef>> {
    vec![Column::text("id", "ID"), Column::text("name", "Name")]
}

pub async fn handle(
    backend: &Backend,
    args: OptionsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let api = &backend.api;
    let options = match args.command {
        // Same picker order as `branches tree`.
        OptionsCommand::Branches => {
            return super::branches::handle(
                backend,
                crate::cli::BranchesArgs {
                    command: crate::cli::BranchesCommand::Tree { nested: false },
                },
                global,
            )
            .await;
        }
        OptionsCommand::Roles { without } => api.role_options(without.as_deref()).await,
        OptionsCommand::Orients { branch } => api.orient_options(branch).await,
        OptionsCommand::Managers => api.manager_options().await,
        OptionsCommand::Permissions => api.permission_options().await,
    }
    .map_err(|e| backend.error(e))?;

    let out = output::render_rows(global.output, &options, &columns(), |o| o.id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}
