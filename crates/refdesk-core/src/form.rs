// ── Form submission & validation error mapping ──
//
// A rejected create/update comes back as an ordered list of
// `{input, message}` violations. They are grouped per field and written
// into the form as one comma-joined string per field; display code splits
// on the same delimiter. A message containing a comma will therefore show
// as two lines.

use std::future::Future;

use indexmap::IndexMap;
use refdesk_api::types::FieldViolation;
use tracing::{debug, warn};

use crate::error::CoreError;

/// Joins a field's messages for display.
pub const ERROR_DELIMITER: char = ',';

/// Messages per field, in the order fields first appeared.
pub type FieldErrorMap = IndexMap<String, Vec<String>>;

/// Group violations by field, keeping message order and duplicates.
pub fn map_errors(errors: &[FieldViolation]) -> FieldErrorMap {
    let mut map = FieldErrorMap::new();
    for violation in errors {
        map.entry(violation.input.clone())
            .or_default()
            .push(violation.message.clone());
    }
    map
}

/// Where per-field error text is written.
pub trait FieldErrorSink {
    fn set_field_error(&mut self, field: &str, message: String);
}

/// Push every field's messages into `sink`, joined with [`ERROR_DELIMITER`].
pub fn apply_errors(map: &FieldErrorMap, sink: &mut impl FieldErrorSink) {
    let delimiter = ERROR_DELIMITER.to_string();
    for (field, messages) in map {
        sink.set_field_error(field, messages.join(&delimiter));
    }
}

/// Display-side inverse of [`apply_errors`]: one line per message.
pub fn split_display_errors(joined: &str) -> Vec<&str> {
    if joined.is_empty() {
        return Vec::new();
    }
    joined.split(ERROR_DELIMITER).collect()
}

// ── Form state ───────────────────────────────────────────────────────

/// Values of one form plus the errors currently shown on it.
#[derive(Debug, Clone)]
pub struct FormState<V> {
    baseline: V,
    values: V,
    field_errors: IndexMap<String, String>,
    banner: Option<String>,
}

impl<V: Clone> FormState<V> {
    /// A form whose values start at (and reset to) `baseline`.
    pub fn new(baseline: V) -> Self {
        Self {
            values: baseline.clone(),
            baseline,
            field_errors: IndexMap::new(),
            banner: None,
        }
    }

    pub fn values(&self) -> &V {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut V {
        &mut self.values
    }

    /// Back to the baseline, with no errors shown.
    pub fn reset(&mut self) {
        self.values = self.baseline.clone();
        self.clear_errors();
    }

    pub fn clear_errors(&mut self) {
        self.field_errors.clear();
        self.banner = None;
    }

    /// Joined error text for `field`.
    pub fn field_error(&self, field: &str) -> Option<&str> {
        self.field_errors.get(field).map(String::as_str)
    }

    pub fn field_errors(&self) -> &IndexMap<String, String> {
        &self.field_errors
    }

    /// Form-level error, shown above the fields.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn set_banner(&mut self, message: impl Into<String>) {
        self.banner = Some(message.into());
    }
}

impl<V> FieldErrorSink for FormState<V> {
    fn set_field_error(&mut self, field: &str, message: String) {
        self.field_errors.insert(field.to_owned(), message);
    }
}

// ── Submission ───────────────────────────────────────────────────────

/// Where one submission stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SubmitState {
    #[default]
    Idle,
    /// Request in flight. Submitting again is refused.
    Submitting,
    /// Saved; carries the backend's message.
    Success { message: String },
    /// Field errors were written into the form.
    FieldErrors,
    /// A single message for the banner.
    TopLevelError { message: String },
    /// Session expired. Takes precedence over any field errors.
    Unauthorized,
}

/// Drives a [`FormState`] through submit attempts.
#[derive(Debug, Clone)]
pub struct FormSubmission<V> {
    form: FormState<V>,
    state: SubmitState,
}

impl<V: Clone> FormSubmission<V> {
    pub fn new(baseline: V) -> Self {
        Self {
            form: FormState::new(baseline),
            state: SubmitState::Idle,
        }
    }

    pub fn form(&self) -> &FormState<V> {
        &self.form
    }

    pub fn state(&self) -> &SubmitState {
        &self.state
    }

    pub fn can_submit(&self) -> bool {
        self.state != SubmitState::Submitting
    }

    /// Edit the values. Counts as acknowledging the last outcome.
    pub fn edit(&mut self) -> &mut V {
        self.acknowledge();
        self.form.values_mut()
    }

    /// Return to `Idle` after the caller has shown the last outcome.
    pub fn acknowledge(&mut self) {
        if self.state != SubmitState::Submitting {
            self.state = SubmitState::Idle;
        }
    }

    /// Enter `Submitting` and hand out the values to send. `None` if a
    /// submission is already in flight.
    pub fn start(&mut self) -> Option<V> {
        if !self.can_submit() {
            return None;
        }
        self.form.clear_errors();
        self.state = SubmitState::Submitting;
        Some(self.form.values().clone())
    }

    /// Record the outcome of the submission begun by [`start`](Self::start).
    pub fn finish(&mut self, outcome: Result<String, CoreError>) -> &SubmitState {
        self.state = match outcome {
            Ok(message) => {
                debug!("form saved");
                self.form.reset();
                SubmitState::Success { message }
            }
            Err(e) if e.is_unauthorized() => {
                warn!("form submission unauthorized");
                SubmitState::Unauthorized
            }
            Err(e) => match e.field_violations() {
                Some(violations) => {
                    debug!(count = violations.len(), "form rejected with field errors");
                    apply_errors(&map_errors(violations), &mut self.form);
                    SubmitState::FieldErrors
                }
                None => {
                    let message = e.to_string();
                    self.form.set_banner(message.clone());
                    SubmitState::TopLevelError { message }
                }
            },
        };
        &self.state
    }

    /// `start`, run `action` with the values, `finish`.
    ///
    /// Returns `None` without calling `action` while another submission is
    /// in flight.
    pub async fn submit<F, Fut>(&mut self, action: F) -> Option<&SubmitState>
    where
        F: FnOnce(V) -> Fut,
        Fut: Future<Output = Result<String, CoreError>>,
    {
        let values = self.start()?;
        let outcome = action(values).await;
        Some(self.finish(outcome))
    }
}
