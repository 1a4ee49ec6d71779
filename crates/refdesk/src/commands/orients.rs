//! Orient command handlers.

use refdesk_api::Orients;
use refdesk_api::types::{Label, Orient, OrientInput};
use refdesk_core::{Column, ListFilter};

use crate::cli::{GlobalOpts, OrientFields, OrientsArgs, OrientsCommand};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::TextColumn;

use super::crud::{self, CliResource};

impl CliResource for Orients {
    const COMMAND: &'static str = "orients";

    fn columns() -> Vec<TextColumn<Orient>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
            Column::text("branch_id", "Branch"),
        ]
    }

    fn row_id(row: &Orient) -> u64 {
        row.id
    }
}

fn input_from(orient: Orient) -> OrientInput {
    OrientInput {
        name: orient.name,
        branch_id: match orient.branch_id {
            Some(Label::Id(id)) => Some(id),
            Some(Label::Text(_)) | None => None,
        },
    }
}

async fn save(
    backend: &Backend,
    id: Option<u64>,
    fields: OrientFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input =
        crud::base_input::<Orients>(backend, id, fields.from_file.as_deref(), input_from).await?;
    if let Some(name) = fields.name {
        input.name = name;
    }
    if fields.branch.is_some() {
        input.branch_id = fields.branch;
    }
    crud::save::<Orients>(backend, id, input, global).await
}

pub async fn handle(
    backend: &Backend,
    args: OrientsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        OrientsCommand::List { list, branch } => {
            let filters: Vec<ListFilter> = branch.map(ListFilter::Branch).into_iter().collect();
            crud::list::<Orients>(backend, &list, &filters, global).await
        }
        OrientsCommand::Get { id } => crud::get::<Orients>(backend, id, global).await,
        OrientsCommand::Create(fields) => save(backend, None, fields, global).await,
        OrientsCommand::Update { id, fields } => save(backend, Some(id), fields, global).await,
        OrientsCommand::Delete { id } => crud::delete::<Orients>(backend, id, global).await,
    }
}
