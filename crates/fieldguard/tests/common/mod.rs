//! Shared fixtures for fieldguard integration tests

#![allow(dead_code)]
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::{Arc, Mutex};

use fieldguard::{ConstraintStore, Constraints};
use serde_json::json;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Constraint fixtures
// ============================================================================

/// The `Hero` entity used across scenarios.
pub fn hero_constraints() -> Constraints {
    Constraints::from_json_value(json!({
        "Hero": {
            "name": {
                "javaType": "java.lang.String",
                "types": ["text"],
                "required": true,
                "minimumLength": 3,
                "maximumLength": 255,
                "fractionLength": null,
                "radix": null,
                "pattern": null,
                "min": null,
                "max": null,
                "name": "name"
            },
            "email": {
                "types": ["email", "text"],
                "required": true,
                "maximumLength": 255,
                "name": "email"
            },
            "age": {
                "javaType": "java.lang.Integer",
                "types": ["number"],
                "required": null,
                "min": 16,
                "max": 99,
                "name": "age"
            },
            "salary": {
                "types": ["number"],
                "fractionLength": 4,
                "name": "salary"
            },
            "active": {
                "types": ["boolean"],
                "required": true,
                "name": "active"
            },
            "address.city": {
                "types": ["text"],
                "minimumLength": 2,
                "name": "address.city"
            }
        }
    }))
    .unwrap()
}

pub fn hero_store() -> ConstraintStore {
    let store = ConstraintStore::new();
    store.set(Some(hero_constraints()));
    store
}

// ============================================================================
// Event capture
// ============================================================================

#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: Level,
    pub message: String,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct MessageVisitor(String);

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.0 = value.to_string();
        }
    }
}

impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for EventCapture {
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = MessageVisitor(String::new());
        event.record(&mut visitor);

        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message: visitor.0,
        });
    }
}

/// Run `f` with a subscriber that records every event, and return them.
pub fn capture_events<F, T>(f: F) -> (T, Vec<CapturedEvent>)
where
    F: FnOnce() -> T,
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);

    let result = tracing::subscriber::with_default(subscriber, f);
    let captured = events.lock().unwrap().clone();
    (result, captured)
}

/// Messages of the captured events at `level`.
pub fn messages_at(events: &[CapturedEvent], level: Level) -> Vec<String> {
    events
        .iter()
        .filter(|e| e.level == level)
        .map(|e| e.message.clone())
        .collect()
}
