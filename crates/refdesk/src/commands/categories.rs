//! Category command handlers.

use refdesk_api::Categories;
use refdesk_api::types::{Category, CategoryInput};
use refdesk_core::Column;

use crate::cli::{CategoriesArgs, CategoriesCommand, CategoryFields, GlobalOpts};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::TextColumn;

use super::crud::{self, CliResource};

impl CliResource for Categories {
    const COMMAND: &'static str = "categories";

    fn columns() -> Vec<TextColumn<Category>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
        ]
    }

    fn row_id(row: &Category) -> u64 {
        row.id
    }
}

async fn save(
    backend: &Backend,
    id: Option<u64>,
    fields: CategoryFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input = crud::base_input::<Categories>(backend, id, fields.from_file.as_deref(), |c| {
        CategoryInput { name: c.name }
    })
    .await?;
    if let Some(name) = fields.name {
        input.name = name;
    }
    crud::save::<Categories>(backend, id, input, global).await
}

pub async fn handle(
    backend: &Backend,
    args: CategoriesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        CategoriesCommand::List(list) => {
            crud::list::<Categories>(backend, &list, &[], global).await
        }
        CategoriesCommand::Get { id } => crud::get::<Categories>(backend, id, global).await,
        CategoriesCommand::Create(fields) => save(backend, None, fields, global).await,
        CategoriesCommand::Update { id, fields } => save(backend, Some(id), fields, global).await,
        CategoriesCommand::Delete { id } => crud::delete::<Categories>(backend, id, global).await,
    }
}
