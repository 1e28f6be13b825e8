//! Validation composer
//!
//! Builds one composite validator for a form field out of the caller's own
//! validators and the validators derived from the field's server-side
//! constraints.
//!
//! # Validation trains
//!
//! Every call of [`CompositeValidator::validate`] is a *train*:
//!
//! 1. The train becomes current and cancels the pending debounce of any
//!    older train.
//! 2. Synchronous-phase validators run concurrently. Any errors are returned
//!    at once, in validator order.
//! 3. Otherwise the train waits out the debounce. A train that is superseded
//!    while waiting returns `None`.
//! 4. Asynchronous-phase validators run concurrently. If a newer train started
//!    in the meantime the results are dropped and the train returns `None`.
//!
//! Only the most recent train ever reports asynchronous errors.

use std::{fmt, sync::Arc, time::Duration};

use futures::future::join_all;
use tokio::sync::Mutex;

use crate::{
    classifier::classify,
    debounce::{self, CancelHandle, DelayOutcome},
    errors::ValidationError,
    model::{Constraints, FieldConstraint, FieldMeta, FieldType, FieldValue, FormValues},
    patterns::{self, FractionPattern},
    resolver::resolve,
    store::ConstraintStore,
    validators::{self, ValidatorRef},
};

/// Delay before the asynchronous phase starts
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(200);

// ═══════════════════════════════════════════════════════════════════════════
// DERIVATION
// ═══════════════════════════════════════════════════════════════════════════

/// Validators implied by one constraint record, in reporting order:
/// required, length (min, max), range (min, max), then number format.
pub fn derive_validators(
    constraint: &FieldConstraint,
    label: &str,
    fraction_pattern: &FractionPattern,
) -> Vec<ValidatorRef> {
    let field_type = classify(constraint.types.as_deref());
    let mut derived = Vec::new();

    if constraint.is_required() {
        derived.push(if field_type == FieldType::Boolean {
            validators::boolean_required(label)
        } else {
            validators::required(label)
        });
    }

    if field_type == FieldType::Text {
        if let Some(minimum_length) = constraint.minimum_length {
            derived.push(validators::minimum_length(label, minimum_length));
        }
        if let Some(maximum_length) = constraint.maximum_length {
            derived.push(validators::maximum_length(label, maximum_length));
        }
    }

    if let Some(min) = constraint.min {
        derived.push(validators::min_value(label, min));
    }
    if let Some(max) = constraint.max {
        derived.push(validators::max_value(label, max));
    }

    if field_type == FieldType::Number {
        derived.push(match constraint.fraction_length {
            Some(fraction_length) if fraction_length > 0 => {
                validators::number_fraction(label, fraction_length, Arc::clone(fraction_pattern))
            }
            _ => validators::number(label),
        });
    }

    derived
}

// ═══════════════════════════════════════════════════════════════════════════
// COMPOSER
// ═══════════════════════════════════════════════════════════════════════════

/// Collects everything needed to build a [`CompositeValidator`] for one field.
#[derive(Clone)]
pub struct ValidationComposer {
    key: String,
    label: String,
    validators: Vec<ValidatorRef>,
    async_validators: Vec<ValidatorRef>,
    fraction_pattern: FractionPattern,
    debounce: Duration,
}

impl ValidationComposer {
    /// `key` is the `Entity.property` constraint key, `label` is passed
    /// through to every error record.
    #[must_use]
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            validators: Vec::new(),
            async_validators: Vec::new(),
            fraction_pattern: patterns::default_fraction_pattern(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Validators run before the derived ones, in the synchronous phase.
    #[must_use]
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = ValidatorRef>) -> Self {
        self.validators.extend(validators);
        self
    }

    /// Validators run after the debounce, only when the synchronous phase passed.
    #[must_use]
    pub fn with_async_validators(
        mut self,
        validators: impl IntoIterator<Item = ValidatorRef>,
    ) -> Self {
        self.async_validators.extend(validators);
        self
    }

    #[must_use]
    pub fn with_fraction_pattern(mut self, fraction_pattern: FractionPattern) -> Self {
        self.fraction_pattern = fraction_pattern;
        self
    }

    #[must_use]
    pub const fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Build the composite validator against the store's current document.
    ///
    /// A missing document or an unknown key is logged and only the caller's
    /// validators are used. Returns `None` when no validator at all would run.
    pub fn build(&self, store: &ConstraintStore) -> Option<CompositeValidator> {
        self.build_from(store.get().as_deref())
    }

    /// Build the composite validator against one constraint document.
    ///
    /// Callers that read the document for other purposes pass the same
    /// snapshot here so both readings agree.
    pub fn build_from(&self, constraints: Option<&Constraints>) -> Option<CompositeValidator> {
        let mut working = self.validators.clone();

        match constraints {
            None => tracing::warn!(
                "constraints are empty, but a field for \"{}\" was bound. Load the constraints before the form is displayed",
                self.key
            ),
            Some(constraints) => match resolve(&self.key, constraints) {
                None => tracing::warn!(
                    "constraints for \"{}\" not found, but a field was bound. Check the constraint key",
                    self.key
                ),
                Some(constraint) => working.extend(derive_validators(
                    constraint,
                    &self.label,
                    &self.fraction_pattern,
                )),
            },
        }

        if working.is_empty() && self.async_validators.is_empty() {
            return None;
        }

        Some(CompositeValidator::new(
            working,
            self.async_validators.clone(),
            self.debounce,
        ))
    }
}

impl fmt::Debug for ValidationComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationComposer")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("validators", &self.validators.len())
            .field("async_validators", &self.async_validators.len())
            .field("debounce", &self.debounce)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// COMPOSITE VALIDATOR
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
struct TrainState {
    current: u64,
    pending: Option<(u64, CancelHandle)>,
}

struct CompositeInner {
    validators: Vec<ValidatorRef>,
    async_validators: Vec<ValidatorRef>,
    debounce: Duration,
    trains: Mutex<TrainState>,
}

/// The validator of one form field.
///
/// Clones share train state, so a call through any clone supersedes earlier
/// calls through every other clone.
#[derive(Clone)]
pub struct CompositeValidator {
    inner: Arc<CompositeInner>,
}

impl CompositeValidator {
    fn new(
        validators: Vec<ValidatorRef>,
        async_validators: Vec<ValidatorRef>,
        debounce: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(CompositeInner {
                validators,
                async_validators,
                debounce,
                trains: Mutex::new(TrainState::default()),
            }),
        }
    }

    /// Number of synchronous-phase validators, derived ones included
    pub fn validator_count(&self) -> usize {
        self.inner.validators.len()
    }

    pub fn async_validator_count(&self) -> usize {
        self.inner.async_validators.len()
    }

    pub fn debounce(&self) -> Duration {
        self.inner.debounce
    }

    /// Run one validation train for `value`.
    ///
    /// `None` means "no errors to report", which includes a train that was
    /// superseded by a newer call.
    pub async fn validate(
        &self,
        value: &FieldValue,
        values: &FormValues,
        meta: Option<&FieldMeta>,
    ) -> Option<Vec<ValidationError>> {
        let train = self.start_train().await;

        let errors = run_all(&self.inner.validators, value, values, meta).await;
        if !errors.is_empty() {
            tracing::debug!(train, errors = errors.len(), "Synchronous validation failed");
            return Some(errors);
        }

        let delay = {
            let mut trains = self.inner.trains.lock().await;
            if trains.current != train {
                tracing::debug!(train, "Train superseded before debounce");
                return None;
            }
            let (delay, handle) = debounce::cancellable(self.inner.debounce);
            trains.pending = Some((train, handle));
            delay
        };

        if delay.wait().await == DelayOutcome::Cancelled {
            tracing::debug!(train, "Debounce cancelled by a newer train");
            return None;
        }

        let async_errors = run_all(&self.inner.async_validators, value, values, meta).await;

        let mut trains = self.inner.trains.lock().await;
        if trains.current != train {
            tracing::debug!(train, "Discarding stale asynchronous results");
            return None;
        }
        if trains.pending.as_ref().is_some_and(|(id, _)| *id == train) {
            trains.pending = None;
        }
        drop(trains);

        (!async_errors.is_empty()).then_some(async_errors)
    }

    async fn start_train(&self) -> u64 {
        let mut trains = self.inner.trains.lock().await;
        trains.current = trains.current.wrapping_add(1);

        if let Some((_, pending)) = trains.pending.take() {
            pending.cancel();
        }

        trains.current
    }
}

impl fmt::Debug for CompositeValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeValidator")
            .field("validators", &self.inner.validators.len())
            .field("async_validators", &self.inner.async_validators.len())
            .field("debounce", &self.inner.debounce)
            .finish_non_exhaustive()
    }
}

/// Run `validators` concurrently; errors come back in validator order.
async fn run_all(
    validators: &[ValidatorRef],
    value: &FieldValue,
    values: &FormValues,
    meta: Option<&FieldMeta>,
) -> Vec<ValidationError> {
    join_all(
        validators
            .iter()
            .map(|validator| validator.validate(value, values, meta)),
    )
    .await
    .into_iter()
    .flatten()
    .collect()
}
