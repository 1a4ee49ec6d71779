//! Role command handlers.

use refdesk_api::Roles;
use refdesk_api::types::{Role, RoleInput};
use refdesk_core::Column;

use crate::cli::{GlobalOpts, RoleFields, RolesArgs, RolesCommand};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::TextColumn;

use super::crud::{self, CliResource};

impl CliResource for Roles {
    const COMMAND: &'static str = "roles";

    fn columns() -> Vec<TextColumn<Role>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
            Column::custom("permissions", "Permissions", |r: &Role| {
                r.permissions
                    .iter()
                    .map(|p| p.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            }),
        ]
    }

    fn row_id(row: &Role) -> u64 {
        row.id
    }
}

async fn save(
    backend: &Backend,
    id: Option<u64>,
    fields: RoleFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input = crud::base_input::<Roles>(backend, id, fields.from_file.as_deref(), |role| {
        RoleInput::from(&role)
    })
    .await?;
    if let Some(name) = fields.name {
        input.name = name;
    }
    if !fields.permissions.is_empty() {
        input.permissions = fields.permissions;
    }
    crud::save::<Roles>(backend, id, input, global).await
}

pub async fn handle(backend: &Backend, args: RolesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RolesCommand::List(list) => crud::list::<Roles>(backend, &list, &[], global).await,
        RolesCommand::Get { id } => crud::get::<Roles>(backend, id, global).await,
        RolesCommand::Create(fields) => save(backend, None, fields, global).await,
        RolesCommand::Update { id, fields } => save(backend, Some(id), fields, global).await,
        RolesCommand::Delete { id } => crud::delete::<Roles>(backend, id, global).await,
    }
}
