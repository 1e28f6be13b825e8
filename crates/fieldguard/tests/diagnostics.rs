//! Diagnostics for resolution misses and failed loads
//!
//! Feature: Observable misconfiguration
//!   As a developer wiring forms to constraints
//!   I want a warning when a field cannot be resolved
//!   So that a typo in a constraint key does not go unnoticed

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use async_trait::async_trait;
use common::{capture_events, hero_store, messages_at};
use fieldguard::{
    validators, Config, ConstraintSource, ConstraintStore, Constraints, Error, ValidationComposer,
};
use tracing::Level;

struct UnreachableSource;

#[async_trait]
impl ConstraintSource for UnreachableSource {
    async fn fetch(&self, _config: &Config) -> fieldguard::Result<Constraints> {
        Err(Error::Request("connection refused".to_string()))
    }
}

#[test]
fn empty_document_warns() {
    let composer = ValidationComposer::new("Hero.name", "Name")
        .with_validators([validators::required("Name")]);

    let (validator, events) = capture_events(|| composer.build(&ConstraintStore::new()));

    assert!(validator.is_some());
    let warnings = messages_at(&events, Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("constraints are empty"), "{warnings:?}");
}

#[test]
fn unknown_key_warns_with_key() {
    let store = hero_store();
    let composer = ValidationComposer::new("Hero.power", "Power");

    let (validator, events) = capture_events(|| composer.build(&store));

    assert!(validator.is_none());
    let warnings = messages_at(&events, Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert!(
        warnings[0].contains("constraints for \"Hero.power\" not found"),
        "{warnings:?}"
    );
}

#[test]
fn misses_are_distinct_diagnostics() {
    let composer = ValidationComposer::new("Hero.power", "Power");

    let (_, empty) = capture_events(|| composer.build(&ConstraintStore::new()));
    let (_, missing) = capture_events(|| composer.build(&hero_store()));

    assert_ne!(
        messages_at(&empty, Level::WARN),
        messages_at(&missing, Level::WARN)
    );
}

#[test]
fn resolved_key_is_silent() {
    let store = hero_store();
    let composer = ValidationComposer::new("Hero.name", "Name");

    let (validator, events) = capture_events(|| composer.build(&store));

    assert!(validator.is_some());
    assert!(messages_at(&events, Level::WARN).is_empty());
}

#[test]
fn failed_load_warns_and_keeps_document() {
    let store = hero_store();
    store
        .configure(Config::new("http://127.0.0.1:9/constraints"))
        .unwrap();

    let (result, events) =
        capture_events(|| tokio_test::block_on(store.load_from(&UnreachableSource)));

    assert!(result.is_err_and(|e| e.is_transport()));
    assert!(store.get().is_some_and(|c| c.entity("Hero").is_some()));

    let warnings = messages_at(&events, Level::WARN);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("connection refused"), "{warnings:?}");
}
