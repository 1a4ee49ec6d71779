// refdesk-core: List query controller, form error mapping and view contracts
// shared by refdesk front ends.

pub mod clock;
pub mod column;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
pub mod form;
pub mod hierarchy;
pub mod query;
pub mod sort;
pub mod source;

// ── Primary re-exports ──────────────────────────────────────────────
pub use clock::{Clock, ManualClock, SystemClock};
pub use column::{Align, Cell, Column, ColumnKind, row_cells};
pub use config::{AdminConfig, ListSettings, TlsVerification};
pub use controller::{DeleteOutcome, FetchTicket, ListQueryController, ListView, Notice};
pub use debounce::Debouncer;
pub use error::CoreError;
pub use form::{
    ERROR_DELIMITER, FieldErrorMap, FieldErrorSink, FormState, FormSubmission, SubmitState,
    apply_errors, map_errors, split_display_errors,
};
pub use hierarchy::{HierarchyNode, TreeRow, flatten_tree, flatten_two_level};
pub use query::{Activity, ListFilter, ListQuery, Verification};
pub use sort::{SortDirection, SortState};
pub use source::{ListResult, ListSource, RemoteList};
