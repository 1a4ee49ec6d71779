//! Interactive pager over any list, driven by the list controller.
//!
//! Fetches run on spawned tasks and report back over a channel, so typing
//! ahead never blocks on the network. Responses for keys the user has
//! already moved past are dropped by the controller.

use std::sync::Arc;
use std::time::Instant;

use refdesk_api::{Branches, Categories, Clients, Employees, Orients, Roles};
use refdesk_core::{
    CoreError, FetchTicket, ListQueryController, ListResult, ListSource, Notice, RemoteList,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use crate::cli::{BrowseArgs, Entity, GlobalOpts};
use crate::config::Backend;
use crate::error::CliError;
use crate::output;

use super::crud::{self, CliResource};

type Outcome<T> = (FetchTicket, Result<ListResult<T>, CoreError>);

const PROMPT_HELP: &str =
    "n/p page · page N · size N · sort FIELD · /TEXT search · filter K V · unfilter K · del ID · r · q";

enum Step {
    Continue,
    Quit,
}

pub async fn handle(
    backend: &Backend,
    args: BrowseArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.entity {
        Entity::Branches => run::<Branches>(backend, args.per_page, global).await,
        Entity::Orients => run::<Orients>(backend, args.per_page, global).await,
        Entity::Categories => run::<Categories>(backend, args.per_page, global).await,
        Entity::Clients => run::<Clients>(backend, args.per_page, global).await,
        Entity::Employees => run::<Employees>(backend, args.per_page, global).await,
        Entity::Roles => run::<Roles>(backend, args.per_page, global).await,
    }
}

async fn run<R: CliResource>(
    backend: &Backend,
    per_page: Option<u32>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let source = RemoteList::<R>::new(Arc::clone(&backend.api));
    let mut list: ListQueryController<R::Row> =
        ListQueryController::with_system_clock(backend.list_settings());
    if let Some(size) = per_page {
        list.set_page_size(size)?;
    }

    let color = output::should_color(global.color);
    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome<R::Row>>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    eprintln!("{PROMPT_HELP}");

    loop {
        if list.needs_fetch() {
            spawn_fetch(&mut list, &source, &tx);
            eprintln!("loading…");
        }

        tokio::select! {
            Some((ticket, outcome)) = rx.recv() => {
                if list.complete_fetch(ticket, outcome) {
                    report(&mut list, backend, color)?;
                    render::<R>(&list, global)?;
                }
            }
            () = sleep_until_opt(list.search_deadline()) => {
                list.poll_search();
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if let Step::Quit = apply::<R>(&mut list, &source, line.trim(), color).await {
                    break;
                }
                report(&mut list, backend, color)?;
            }
        }
    }
    Ok(())
}

fn spawn_fetch<R: CliResource>(
    list: &mut ListQueryController<R::Row>,
    source: &RemoteList<R>,
    tx: &mpsc::UnboundedSender<Outcome<R::Row>>,
) {
    let ticket = list.begin_fetch();
    let params = ticket.key().to_params();
    let source = source.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = source.fetch(&params).await;
        // The receiver only goes away when the pager exits.
        let _ = tx.send((ticket, outcome));
    });
}

async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await,
        None => std::future::pending().await,
    }
}

/// Apply one typed command to the controller.
async fn apply<R: CliResource>(
    list: &mut ListQueryController<R::Row>,
    source: &RemoteList<R>,
    input: &str,
    color: bool,
) -> Step {
    if let Some(term) = input.strip_prefix('/') {
        list.set_search(term.trim());
        return Step::Continue;
    }

    let words: Vec<&str> = input.split_whitespace().collect();
    match words.as_slice() {
        [] => {}
        ["q" | "quit"] => return Step::Quit,
        ["n"] if list.pending_delete().is_some() => {
            list.cancel_delete();
            eprintln!("Delete cancelled");
        }
        ["y"] if list.pending_delete().is_some() => {
            list.confirm_delete(source).await;
        }
        ["n" | "next"] => list.next_page(),
        ["p" | "prev"] => list.prev_page(),
        ["r" | "refresh"] => list.invalidate(),
        ["page", n] => match n.parse() {
            Ok(page) => list.set_page(page),
            Err(_) => output::failure(&format!("not a page number: {n}"), color),
        },
        ["size", n] => match n.parse() {
            Ok(size) => {
                if let Err(e) = list.set_page_size(size) {
                    output::failure(&e.to_string(), color);
                }
            }
            Err(_) => output::failure(&format!("not a page size: {n}"), color),
        },
        ["sort", field] => {
            if let Err(message) = sort_by_name::<R>(list, field) {
                output::failure(&message, color);
            }
        }
        ["filter", name, value] => list.set_raw_filter(*name, *value),
        ["unfilter", name] => list.clear_filter(name),
        ["del", id] => match id.parse() {
            Ok(id) => {
                list.request_delete(id);
                eprintln!("Delete {} {id}? (y/n)", R::NAME);
            }
            Err(_) => output::failure(&format!("not an id: {id}"), color),
        },
        _ => output::failure(&format!("unknown command: {input}"), color),
    }
    Step::Continue
}

/// Sort by the column whose key is `field`, the way clicking its header would.
fn sort_by_name<R: CliResource>(
    list: &mut ListQueryController<R::Row>,
    field: &str,
) -> Result<(), String> {
    let columns = R::columns();
    let Some(column) = columns.iter().find(|c| c.key == field) else {
        let sortable: Vec<&str> = columns
            .iter()
            .filter(|c| c.sortable)
            .map(|c| c.key.as_str())
            .collect();
        return Err(format!(
            "unknown column: {field} (sortable: {})",
            sortable.join(", ")
        ));
    };
    if list.sort_by_column(column) {
        Ok(())
    } else {
        Err(format!("{field} is not sortable"))
    }
}

/// Print queued notices. A lost session ends the pager.
fn report<T>(
    list: &mut ListQueryController<T>,
    backend: &Backend,
    color: bool,
) -> Result<(), CliError> {
    for notice in list.take_notices() {
        match notice {
            Notice::Success(message) => output::success(&message, color),
            Notice::Error(message) => output::failure(&message, color),
            Notice::LoginRequired => {
                return Err(CliError::AuthRequired {
                    profile: backend.profile_name.clone(),
                });
            }
        }
    }
    Ok(())
}

fn render<R: CliResource>(
    list: &ListQueryController<R::Row>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let view = list.view();
    let out = output::render_rows(global.output, view.rows, &R::columns(), |r| {
        R::row_id(r).to_string()
    })?;
    output::print_output(&out, global.quiet);
    eprintln!("{}", crud::footer(&view));
    if !view.search_input.is_empty() {
        eprintln!("search: {}", view.search_input);
    }
    Ok(())
}
