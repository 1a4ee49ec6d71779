//! Branch command handlers.

use refdesk_api::types::{Branch, BranchInput, BranchOption};
use refdesk_api::Branches;
use refdesk_core::{Column, TreeRow, flatten_tree, flatten_two_level};

use crate::cli::{BranchFields, BranchesArgs, BranchesCommand, GlobalOpts};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::{self, TextColumn};

use super::crud::{self, CliResource};

impl CliResource for Branches {
    const COMMAND: &'static str = "branches";

    fn columns() -> Vec<TextColumn<Branch>> {
        vec![
            Column::text("id", "ID").sortable(),
            Column::text("name", "Name").sortable(),
            Column::custom("parent_id", "Parent", |b: &Branch| {
                if b.parent_id == 0 {
                    String::new()
                } else {
                    b.parent_id.to_string()
                }
            }),
            Column::boolean("warehouse", "Warehouse"),
            Column::custom("childrens", "Sub-regions", |b: &Branch| {
                b.childrens.len().to_string()
            }),
        ]
    }

    fn row_id(row: &Branch) -> u64 {
        row.id
    }
}

fn input_from(branch: Branch) -> BranchInput {
    BranchInput {
        name: branch.name,
        parent_id: (branch.parent_id != 0).then_some(branch.parent_id),
        warehouse: branch.warehouse,
    }
}

fn apply(fields: BranchFields, input: &mut BranchInput) {
    if let Some(name) = fields.name {
        input.name = name;
    }
    if let Some(parent) = fields.parent {
        input.parent_id = (parent != 0).then_some(parent);
    }
    if let Some(warehouse) = fields.warehouse {
        input.warehouse = warehouse;
    }
}

fn tree_columns<'a>() -> Vec<TextColumn<&'a BranchOption>> {
    vec![
        Column::text("id", "ID"),
        Column::custom("name", "Name", |b: &&BranchOption| {
            if b.parent_id == 0 {
                b.name.clone()
            } else {
                format!("  └ {}", b.name)
            }
        }),
        Column::boolean("warehouse", "Warehouse"),
    ]
}

fn nested_columns<'a>() -> Vec<TextColumn<TreeRow<'a>>> {
    vec![
        Column::text("id", "ID"),
        Column::custom("name", "Name", |r: &TreeRow<'_>| {
            if r.depth == 0 {
                r.name.to_owned()
            } else {
                format!("  └ {}", r.name)
            }
        }),
    ]
}

async fn save(
    backend: &Backend,
    id: Option<u64>,
    fields: BranchFields,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut input =
        crud::base_input::<Branches>(backend, id, fields.from_file.as_deref(), input_from).await?;
    apply(fields, &mut input);
    crud::save::<Branches>(backend, id, input, global).await
}

pub async fn handle(
    backend: &Backend,
    args: BranchesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        BranchesCommand::List(list) => crud::list::<Branches>(backend, &list, &[], global).await,

        BranchesCommand::Tree { nested: false } => {
            let options = backend
                .api
                .branch_options()
                .await
                .map_err(|e| backend.error(e))?;
            let ordered = flatten_two_level(&options);
            let out = output::render_rows(global.output, &ordered, &tree_columns(), |b| {
                b.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Tree { nested: true } => {
            let tree = backend
                .api
                .branch_tree()
                .await
                .map_err(|e| backend.error(e))?;
            let rows = flatten_tree(&tree);
            let out = output::render_rows(global.output, &rows, &nested_columns(), |r| {
                r.id.to_string()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        BranchesCommand::Get { id } => crud::get::<Branches>(backend, id, global).await,
        BranchesCommand::Create(fields) => save(backend, None, fields, global).await,
        BranchesCommand::Update { id, fields } => save(backend, Some(id), fields, global).await,
        BranchesCommand::Delete { id } => crud::delete::<Branches>(backend, id, global).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_edit_view_becomes_a_parentless_form() {
        let input = input_from(Branch {
            id: 1,
            name: "North".into(),
            warehouse: true,
            parent_id: 0,
            childrens: Vec::new(),
        });
        assert_eq!(input.parent_id, None);
        assert!(input.warehouse);
    }

    #[test]
    fn parent_zero_flag_promotes_to_region() {
        let mut input = BranchInput {
            name: "North-A".into(),
            parent_id: Some(1),
            warehouse: false,
        };
        apply(
            BranchFields {
                name: None,
                parent: Some(0),
                warehouse: None,
                from_file: None,
            },
            &mut input,
        );
        assert_eq!(input.parent_id, None);
        assert_eq!(input.name, "North-A");
    }
}
