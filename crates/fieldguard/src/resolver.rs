//! Constraint lookup by `Entity.property` key
//!
//! Only the first dot separates the entity from the property, so
//! `"Hero.address.city"` looks up property `"address.city"` of `"Hero"`.

use crate::model::{Constraints, FieldConstraint};

/// A constraint key split into entity and property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldKey<'a> {
    pub entity: &'a str,
    pub property: &'a str,
}

impl<'a> FieldKey<'a> {
    /// Split `key` on its first dot.
    ///
    /// A key without a dot names an entity with an empty property.
    pub fn parse(key: &'a str) -> Self {
        let (entity, property) = key.split_once('.').unwrap_or((key, ""));
        Self { entity, property }
    }
}

/// Find the constraint record for `key`; `None` when entity or property is unknown.
pub fn resolve<'c>(key: &str, constraints: &'c Constraints) -> Option<&'c FieldConstraint> {
    let FieldKey { entity, property } = FieldKey::parse(key);
    constraints.entity(entity)?.get(property)
}
