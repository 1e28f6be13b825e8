//! # Fieldguard
//!
//! Constraint-driven field validation for form libraries.
//!
//! A back-end publishes a constraints document describing, per entity and
//! property, which values are acceptable. Fieldguard resolves the constraints
//! for one form field, derives validators from them, appends them to the
//! caller's own validators and runs everything as one composite validator
//! with a debounced asynchronous phase.
//!
//! ## Laws (Compiler Enforced)
//!
//! - No `unwrap()` - returns `Result` instead
//! - No `expect()` - returns `Result` instead
//! - No `panic!()` - returns `Result` instead
//! - No `unsafe` - safe Rust only
//!
//! ## Example
//!
//! ```rust,no_run
//! use fieldguard::{Constraints, ConstraintStore, FieldValue, FormValues, ValidationComposer};
//!
//! # async fn example() -> fieldguard::Result<()> {
//! let store = ConstraintStore::new();
//! store.set(Some(Constraints::from_json_str(
//!     r#"{ "Hero": { "name": { "types": ["text"], "required": true, "minimumLength": 3 } } }"#,
//! )?));
//!
//! if let Some(validator) = ValidationComposer::new("Hero.name", "Name").build(&store) {
//!     let errors = validator
//!         .validate(&FieldValue::from("ab"), &FormValues::new(), None)
//!         .await;
//!     assert!(errors.is_some());
//! }
//! # Ok(())
//! # }
//! ```

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]
#![cfg_attr(test, allow(clippy::panic))]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod classifier;
pub mod composer;
pub mod config;
pub mod debounce;
mod error;
pub mod errors;
pub mod field;
pub mod model;
pub mod patterns;
pub mod resolver;
pub mod store;
pub mod telemetry;
pub mod validators;

pub use classifier::classify;
pub use composer::{derive_validators, CompositeValidator, ValidationComposer, DEFAULT_DEBOUNCE};
pub use config::Config;
pub use error::{Error, Result};
pub use errors::{ErrorType, ValidationError};
pub use field::{BoundField, FieldProps};
pub use model::{Constraints, FieldConstraint, FieldMeta, FieldType, FieldValue, FormValues};
pub use patterns::FractionPattern;
pub use resolver::{resolve, FieldKey};
pub use store::{ConstraintSource, ConstraintStore, HttpConstraintSource};
pub use validators::{FieldValidator, ValidatorRef};
