//! List / get / save / delete shared by every entity command.

use std::path::Path;
use std::sync::Arc;

use refdesk_api::{Resource, SortDirection};
use refdesk_core::{
    CoreError, FormSubmission, ListFilter, ListQueryController, ListSource, ListView, RemoteList,
    SortState, SubmitState, split_display_errors,
};
use serde::de::DeserializeOwned;

use crate::cli::{GlobalOpts, ListArgs, OutputFormat};
use crate::config::Backend;
use crate::error::CliError;
use crate::output::{self, TextColumn};

use super::util;

/// CLI-side description of a resource: its command name and table layout.
pub trait CliResource: Resource {
    /// Top-level subcommand, e.g. `"employees"`.
    const COMMAND: &'static str;

    fn columns() -> Vec<TextColumn<Self::Row>>;

    fn row_id(row: &Self::Row) -> u64;
}

// ── List ─────────────────────────────────────────────────────────────

/// A controller configured from list flags and filters.
pub fn controller_for<R: CliResource>(
    backend: &Backend,
    args: &ListArgs,
    filters: &[ListFilter],
) -> Result<ListQueryController<R::Row>, CliError> {
    let mut list = ListQueryController::with_system_clock(backend.list_settings());
    if let Some(size) = args.per_page {
        list.set_page_size(size)?;
    }
    let direction = if args.desc {
        SortDirection::Desc
    } else {
        SortDirection::Asc
    };
    list.set_sort(SortState::new(args.sort.as_str(), direction));
    if let Some(ref search) = args.search {
        list.set_search(search.as_str());
        list.commit_search_now();
    }
    for filter in filters {
        list.set_filter(filter);
    }
    list.set_page(args.page);
    Ok(list)
}

pub async fn list<R: CliResource>(
    backend: &Backend,
    args: &ListArgs,
    filters: &[ListFilter],
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut list = controller_for::<R>(backend, args, filters)?;
    let source = RemoteList::<R>::new(Arc::clone(&backend.api));

    let ticket = list.begin_fetch();
    let page = source
        .fetch(&ticket.key().to_params())
        .await
        .map_err(|e| backend.error(e))?;
    list.complete_fetch(ticket, Ok(page));

    let view = list.view();
    let out = output::render_rows(global.output, view.rows, &R::columns(), |r| {
        R::row_id(r).to_string()
    })?;
    output::print_output(&out, global.quiet);
    if global.output == OutputFormat::Table && !global.quiet {
        eprintln!("{}", footer(&view));
    }
    Ok(())
}

/// One-line pager summary under a table.
pub fn footer<T>(view: &ListView<'_, T>) -> String {
    if view.is_empty_result() {
        return "Nothing found".into();
    }
    format!(
        "Page {} of {} · {} total · {} per page · sorted by {}",
        view.page, view.page_count, view.total, view.page_size, view.sort
    )
}

// ── Get ──────────────────────────────────────────────────────────────

pub async fn fetch_detail<R: CliResource>(backend: &Backend, id: u64) -> Result<R::Detail, CliError> {
    backend.api.fetch::<R>(id).await.map_err(|e| {
        let err = CoreError::from(e);
        if err.is_not_found() {
            CliError::NotFound {
                resource_type: R::NAME.into(),
                identifier: id.to_string(),
                list_command: format!("{} list", R::COMMAND),
            }
        } else {
            backend.error(err)
        }
    })
}

pub async fn get<R: CliResource>(
    backend: &Backend,
    id: u64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let detail = fetch_detail::<R>(backend, id).await?;
    let out = output::render_single(global.output, &detail, |_| id.to_string())?;
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Create / update ──────────────────────────────────────────────────

/// Starting values for a form, before flags are applied.
///
/// `--from-file` wins; an update otherwise starts from the record's edit
/// view, a create from the empty form.
pub async fn base_input<R>(
    backend: &Backend,
    id: Option<u64>,
    from_file: Option<&Path>,
    from_detail: impl FnOnce(R::Detail) -> R::Input,
) -> Result<R::Input, CliError>
where
    R: CliResource,
    R::Input: DeserializeOwned + Default,
{
    match (from_file, id) {
        (Some(path), _) => util::read_json_file(path),
        (None, Some(id)) => Ok(from_detail(fetch_detail::<R>(backend, id).await?)),
        (None, None) => Ok(R::Input::default()),
    }
}

/// Submit a form: create when `id` is `None`, update otherwise.
///
/// Field errors are printed under their field names, one message per line.
pub async fn save<R>(
    backend: &Backend,
    id: Option<u64>,
    input: R::Input,
    global: &GlobalOpts,
) -> Result<(), CliError>
where
    R: CliResource,
    R::Input: Clone,
{
    let api = Arc::clone(&backend.api);
    let mut form = FormSubmission::new(input);
    let state = form
        .submit(|values| async move {
            let response = match id {
                Some(id) => api.update::<R>(id, &values).await,
                None => api.create::<R>(&values).await,
            };
            response.map(|r| r.message).map_err(CoreError::from)
        })
        .await
        .cloned()
        .ok_or_else(|| CliError::Internal("a submission is already in flight".into()))?;

    let color = output::should_color(global.color);
    match state {
        SubmitState::Success { message } => {
            if !global.quiet {
                output::success(&message, color);
            }
            Ok(())
        }
        SubmitState::FieldErrors => {
            for (field, joined) in form.form().field_errors() {
                eprintln!("{field}:");
                for message in split_display_errors(joined) {
                    eprintln!("  {message}");
                }
            }
            Err(CliError::FieldErrors {
                message: format!("The {} form has invalid fields", R::NAME),
            })
        }
        SubmitState::TopLevelError { message } => Err(CliError::Rejected { message }),
        SubmitState::Unauthorized => Err(CliError::AuthRequired {
            profile: backend.profile_name.clone(),
        }),
        SubmitState::Idle | SubmitState::Submitting => Err(CliError::Internal(
            "submission finished without an outcome".into(),
        )),
    }
}

// ── Delete ───────────────────────────────────────────────────────────

pub async fn delete<R: CliResource>(
    backend: &Backend,
    id: u64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !util::confirm(&format!("Delete {} {id}?", R::NAME), global.yes)? {
        return Ok(());
    }
    let response = backend
        .api
        .remove::<R>(id)
        .await
        .map_err(|e| backend.error(e))?;
    if !global.quiet {
        output::success(&response.message, output::should_color(global.color));
    }
    Ok(())
}
