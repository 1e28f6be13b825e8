//! Field adapter
//!
//! [`FieldProps`] describes a form field the way a form layer declares one:
//! its name in the form, its constraint key and label, and any extra
//! validators. Binding it against a [`ConstraintStore`] builds the composite
//! validator once and yields a [`BoundField`] the form layer keeps for the
//! lifetime of the field.

use std::time::Duration;

use crate::{
    classifier::classify,
    composer::{CompositeValidator, ValidationComposer},
    errors::ValidationError,
    model::{Constraints, FieldMeta, FieldType, FormValues},
    patterns::FractionPattern,
    resolver::resolve,
    store::ConstraintStore,
    validators::ValidatorRef,
};

/// Declaration of one constrained form field.
#[derive(Debug, Clone)]
pub struct FieldProps {
    name: String,
    composer: ValidationComposer,
}

impl FieldProps {
    /// `name` is the field's key in the form values, `key` its
    /// `Entity.property` constraint key.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            composer: ValidationComposer::new(key, label),
        }
    }

    #[must_use]
    pub fn with_validators(mut self, validators: impl IntoIterator<Item = ValidatorRef>) -> Self {
        self.composer = self.composer.with_validators(validators);
        self
    }

    #[must_use]
    pub fn with_async_validators(
        mut self,
        validators: impl IntoIterator<Item = ValidatorRef>,
    ) -> Self {
        self.composer = self.composer.with_async_validators(validators);
        self
    }

    #[must_use]
    pub fn with_fraction_pattern(mut self, fraction_pattern: FractionPattern) -> Self {
        self.composer = self.composer.with_fraction_pattern(fraction_pattern);
        self
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.composer = self.composer.with_debounce(debounce);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &str {
        self.composer.key()
    }

    pub fn label(&self) -> &str {
        self.composer.label()
    }

    /// Resolve the field against the store's current document.
    ///
    /// Later changes to the store do not affect the returned binding; bind
    /// again after loading a new document.
    pub fn bind(&self, store: &ConstraintStore) -> BoundField {
        self.bind_with(store.get().as_deref())
    }

    /// Resolve the field against one constraint document.
    ///
    /// The input type and the validator both come from `constraints`.
    pub fn bind_with(&self, constraints: Option<&Constraints>) -> BoundField {
        let input_type = constraints
            .and_then(|constraints| resolve(self.composer.key(), constraints))
            .map_or(FieldType::Text, |constraint| classify(constraint.types.as_deref()));

        BoundField {
            name: self.name.clone(),
            input_type,
            validator: self.composer.build_from(constraints),
        }
    }
}

/// A form field with its validator attached.
#[derive(Debug, Clone)]
pub struct BoundField {
    name: String,
    input_type: FieldType,
    validator: Option<CompositeValidator>,
}

impl BoundField {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The most specific input type for rendering, `Text` when unresolved
    pub const fn input_type(&self) -> FieldType {
        self.input_type
    }

    /// The validation hook, `None` when no validator is attached.
    pub const fn validator(&self) -> Option<&CompositeValidator> {
        self.validator.as_ref()
    }

    /// Validate this field's entry in `values`; a missing entry is null.
    ///
    /// Always `None` when no validator is attached.
    pub async fn validate(
        &self,
        values: &FormValues,
        meta: Option<&FieldMeta>,
    ) -> Option<Vec<ValidationError>> {
        let validator = self.validator.as_ref()?;
        let value = values.get(&self.name).cloned().unwrap_or_default();
        validator.validate(&value, values, meta).await
    }
}
