// ── List Query Controller ──
//
// Owns the observable state of one list view (page, page size, sort,
// search, filters), derives the fetch key from it, and decides which fetch
// responses are allowed to reach the view. Also coordinates the delete
// confirmation and the page clamp that follows a delete.
//
// The controller never spawns anything. Callers either `refresh()` inline,
// or split a fetch into `begin_fetch()` / `complete_fetch()` and run the
// request wherever they like; only the response matching the newest ticket
// and the current key is applied.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::ListSettings;
use crate::debounce::Debouncer;
use crate::error::CoreError;
use crate::query::{ListFilter, ListQuery};
use crate::sort::SortState;
use crate::source::{ListResult, ListSource};

/// Something the view layer should tell the user about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A mutation succeeded; carries the backend's message.
    Success(String),
    /// A fetch or mutation failed.
    Error(String),
    /// The session is gone. The view should go to its login boundary.
    LoginRequired,
}

/// Identifies one issued fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    key: ListQuery,
    generation: u64,
}

impl FetchTicket {
    pub fn key(&self) -> &ListQuery {
        &self.key
    }
}

/// What became of a delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Row removed. `page` is the page the list will show next.
    Deleted { message: String, page: u32 },
    Failed { message: String },
    LoginRequired,
}

/// Read-only snapshot handed to a table view.
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub rows: &'a [T],
    pub page: u32,
    pub page_count: u32,
    pub page_size: u32,
    pub page_size_options: &'a [u32],
    pub total: u64,
    pub sort: &'a SortState,
    /// What the search box shows (not yet necessarily committed).
    pub search_input: &'a str,
    pub loading: bool,
    pub error: Option<&'a str>,
}

impl<T> ListView<'_, T> {
    /// "Nothing found": settled, no error, no rows.
    pub fn is_empty_result(&self) -> bool {
        !self.loading && self.error.is_none() && self.rows.is_empty()
    }
}

/// Coordinator of pagination, sort, search and filters for one list view.
pub struct ListQueryController<T> {
    settings: ListSettings,
    clock: Arc<dyn Clock>,

    page: u32,
    page_size: u32,
    sort: SortState,
    search_input: String,
    search: String,
    debouncer: Debouncer<String>,
    filters: BTreeMap<String, String>,

    result: Option<ListResult<T>>,
    /// Key whose outcome (rows or error) is currently shown.
    settled: Option<ListQuery>,
    in_flight: Option<FetchTicket>,
    generation: u64,
    error: Option<String>,

    pending_delete: Option<u64>,
    notices: VecDeque<Notice>,
}

impl<T> ListQueryController<T> {
    pub fn new(settings: ListSettings, clock: Arc<dyn Clock>) -> Self {
        let debouncer = Debouncer::new(settings.search_debounce);
        Self {
            page: 1,
            page_size: settings.page_size,
            sort: SortState::default(),
            search_input: String::new(),
            search: String::new(),
            debouncer,
            filters: BTreeMap::new(),
            result: None,
            settled: None,
            in_flight: None,
            generation: 0,
            error: None,
            pending_delete: None,
            notices: VecDeque::new(),
            settings,
            clock,
        }
    }

    pub fn with_system_clock(settings: ListSettings) -> Self {
        Self::new(settings, Arc::new(SystemClock))
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> &SortState {
        &self.sort
    }

    /// Raw search box contents.
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    /// Committed search term, the one that is part of the fetch key.
    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn filters(&self) -> &BTreeMap<String, String> {
        &self.filters
    }

    pub fn result(&self) -> Option<&ListResult<T>> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The current fetch key.
    pub fn key(&self) -> ListQuery {
        ListQuery {
            page: self.page,
            per_page: self.page_size,
            sort: self.sort.clone(),
            search: self.search.clone(),
            filters: self.filters.clone(),
        }
    }

    // ── Search ───────────────────────────────────────────────────────

    /// Update the search box. The term is committed one quiet period after
    /// the last call; earlier pending terms are dropped.
    pub fn set_search(&mut self, raw: impl Into<String>) {
        self.search_input = raw.into();
        self.debouncer.schedule(self.search_input.clone(), self.clock.now());
    }

    /// When the pending search term becomes due, if there is one.
    pub fn search_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }

    /// Commit the pending search term if its quiet period has elapsed.
    /// Returns `true` if a term was committed.
    pub fn poll_search(&mut self) -> bool {
        let Some(term) = self.debouncer.poll(self.clock.now()) else {
            return false;
        };
        self.commit_search(term);
        true
    }

    /// Commit the pending search term immediately (e.g. on Enter).
    pub fn commit_search_now(&mut self) -> bool {
        let Some(term) = self.debouncer.flush() else {
            return false;
        };
        self.commit_search(term);
        true
    }

    fn commit_search(&mut self, term: String) {
        debug!(search = %term, "search committed");
        self.search = term;
        self.page = 1;
    }

    // ── Sort / pagination / filters ──────────────────────────────────

    /// Column-header click. See [`SortState::toggle`].
    pub fn sort_by(&mut self, field: &str) {
        self.sort.toggle(field);
    }

    /// Explicit sort, replacing field and direction.
    pub fn set_sort(&mut self, sort: SortState) {
        self.sort = sort;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        let last = self.result.as_ref().map_or(1, ListResult::page_count);
        if self.page < last {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.page.saturating_sub(1));
    }

    /// Change rows per page. Only sizes from the configured option set are
    /// accepted. Always returns to page 1.
    pub fn set_page_size(&mut self, size: u32) -> Result<(), CoreError> {
        if !self.settings.page_size_options.contains(&size) {
            return Err(CoreError::InvalidInput {
                message: format!(
                    "page size {size} is not one of {:?}",
                    self.settings.page_size_options
                ),
            });
        }
        self.page_size = size;
        self.page = 1;
        Ok(())
    }

    pub fn set_filter(&mut self, filter: &ListFilter) {
        self.set_raw_filter(filter.name(), filter.value());
    }

    /// Set a filter by wire name. Returns to page 1.
    pub fn set_raw_filter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        debug!(filter = %name, value = %value, "filter set");
        self.filters.insert(name, value);
        self.page = 1;
    }

    /// Remove a filter. Returns to page 1 if one was set.
    pub fn clear_filter(&mut self, name: &str) {
        if self.filters.remove(name).is_some() {
            debug!(filter = %name, "filter cleared");
            self.page = 1;
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────

    /// Whether the current key still needs a fetch.
    pub fn needs_fetch(&self) -> bool {
        let key = self.key();
        if self.in_flight.as_ref().is_some_and(|t| t.key == key) {
            return false;
        }
        self.settled.as_ref() != Some(&key)
    }

    /// Force the current key to be fetched again.
    ///
    /// A fetch already in flight for this key was issued before whatever
    /// prompted the invalidation, so its ticket is dropped and its response
    /// will be discarded.
    pub fn invalidate(&mut self) {
        self.settled = None;
        let key = self.key();
        if self.in_flight.as_ref().is_some_and(|t| t.key == key) {
            debug!("dropping in-flight fetch for an invalidated key");
            self.in_flight = None;
        }
    }

    /// Issue a fetch for the current key. Any earlier ticket is superseded.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        let ticket = FetchTicket {
            key: self.key(),
            generation: self.generation,
        };
        debug!(generation = ticket.generation, page = ticket.key.page, "list fetch issued");
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Deliver the outcome of a fetch. Returns `false` if it was stale and
    /// dropped.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        outcome: Result<ListResult<T>, CoreError>,
    ) -> bool {
        let newest = self
            .in_flight
            .as_ref()
            .is_some_and(|t| t.generation == ticket.generation);
        if !newest {
            debug!(generation = ticket.generation, "discarding superseded list response");
            return false;
        }
        self.in_flight = None;
        if ticket.key != self.key() {
            debug!(generation = ticket.generation, "discarding list response for an old key");
            return false;
        }

        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error = None;
            }
            Err(e) if e.is_unauthorized() => {
                warn!("list fetch unauthorized");
                self.error = None;
                self.notices.push_back(Notice::LoginRequired);
            }
            Err(e) => {
                let message = e.to_string();
                warn!(error = %message, "list fetch failed");
                self.error = Some(message.clone());
                self.notices.push_back(Notice::Error(message));
            }
        }
        self.settled = Some(ticket.key);
        true
    }

    /// Fetch the current key from `source` if it needs fetching.
    /// Returns `true` if a response was applied.
    pub async fn refresh<S>(&mut self, source: &S) -> bool
    where
        S: ListSource<Item = T>,
    {
        if !self.needs_fetch() {
            return false;
        }
        let ticket = self.begin_fetch();
        let outcome = source.fetch(&ticket.key.to_params()).await;
        self.complete_fetch(ticket, outcome)
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Open the confirmation for deleting `id`.
    pub fn request_delete(&mut self, id: u64) {
        self.pending_delete = Some(id);
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Row awaiting confirmation, if the dialog is open.
    pub fn pending_delete(&self) -> Option<u64> {
        self.pending_delete
    }

    /// Run the delete the open confirmation is asking about.
    pub async fn confirm_delete<S>(&mut self, source: &S) -> Option<DeleteOutcome>
    where
        S: ListSource<Item = T>,
    {
        let id = self.pending_delete?;
        Some(self.delete(source, id).await)
    }

    /// Delete `id` and bring the list state in line with the result.
    ///
    /// Removing the only row of a page past the first moves back one page;
    /// any other success re-fetches the current page. The confirmation is
    /// closed whatever happens.
    pub async fn delete<S>(&mut self, source: &S, id: u64) -> DeleteOutcome
    where
        S: ListSource<Item = T>,
    {
        let result = source.delete(id).await;
        self.pending_delete = None;

        match result {
            Ok(message) => {
                let rows = self.result.as_ref().map_or(0, |r| r.items.len());
                if rows == 1 && self.page > 1 {
                    self.page -= 1;
                } else {
                    self.invalidate();
                }
                info!(id, page = self.page, "row deleted");
                self.notices.push_back(Notice::Success(message.clone()));
                DeleteOutcome::Deleted {
                    message,
                    page: self.page,
                }
            }
            Err(e) if e.is_unauthorized() => {
                warn!(id, "delete unauthorized");
                self.notices.push_back(Notice::LoginRequired);
                DeleteOutcome::LoginRequired
            }
            Err(e) => {
                let message = e.to_string();
                warn!(id, error = %message, "delete failed");
                self.notices.push_back(Notice::Error(message.clone()));
                DeleteOutcome::Failed { message }
            }
        }
    }

    // ── Output ───────────────────────────────────────────────────────

    /// Drain queued notices, oldest first.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.drain(..).collect()
    }

    /// Snapshot for rendering. Previous rows stay visible while a fetch for
    /// a new key is in flight.
    pub fn view(&self) -> ListView<'_, T> {
        let (rows, page_count, total) = match &self.result {
            Some(r) => (r.items.as_slice(), r.page_count(), r.pagination.total),
            None => (&[][..], 1, 0),
        };
        ListView {
            rows,
            page: self.page,
            page_count,
            page_size: self.page_size,
            page_size_options: &self.settings.page_size_options,
            total,
            sort: &self.sort,
            search_input: &self.search_input,
            loading: self.is_loading(),
            error: self.error.as_deref(),
        }
    }
}
