//! Domain module containing core business logic and data types
//!
//! This module defines the `Report` entity, its value types, the payload
//! validator, and the clock abstraction the rest of the crate uses.

pub mod clock;
pub mod report;
pub mod types;
pub mod validation;

// Re-export public types for easy access
pub use clock::*;
pub use report::*;
pub use types::*;
pub use validation::*;

use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;

/// Field-level validation failures for a report payload
///
/// Maps each failing field name to a user-facing message. Nothing is ever
/// written when this error is returned.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("Validation failed: {}", summarize(.errors))]
pub struct ValidationError {
    pub errors: BTreeMap<String, String>,
}

impl ValidationError {
    /// Build an error for a single field
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.insert(field, message);
        error
    }

    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

fn summarize(errors: &BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{}: {}", field, message))
        .collect::<Vec<_>>()
        .join("; ")
}
