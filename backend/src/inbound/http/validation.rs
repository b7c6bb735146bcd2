//! Aggregating field validation for inbound payloads.
//!
//! Mirrors the transport layer's input-binding step: every violated field
//! of a payload is collected and reported in one failure, each with its
//! argument path, instead of stopping at the first problem.

use serde_json::json;

use crate::domain::error::Error;

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Violation {
    path: String,
    reason: String,
}

/// Collector for field-level constraint violations.
#[derive(Debug, Default)]
pub(crate) struct Violations {
    items: Vec<Violation>,
}

impl Violations {
    /// Record one violation against an argument path.
    pub(crate) fn add(&mut self, path: impl Into<String>, reason: impl Into<String>) {
        self.items.push(Violation {
            path: path.into(),
            reason: reason.into(),
        });
    }

    /// Pass a required value through, recording a violation when missing.
    pub(crate) fn require<T>(&mut self, value: Option<T>, path: &str, reason: &str) -> Option<T> {
        if value.is_none() {
            self.add(path, reason);
        }
        value
    }

    /// Pass required text through, recording a violation when missing or
    /// blank.
    pub(crate) fn require_text(
        &mut self,
        value: Option<String>,
        path: &str,
        reason: &str,
    ) -> Option<String> {
        match value {
            Some(text) if !text.trim().is_empty() => Some(text),
            _ => {
                self.add(path, reason);
                None
            }
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Aggregate every recorded violation into a single validation error.
    ///
    /// The message lists every `[path] reason` pair; the structured field
    /// errors ride along in the details payload.
    pub(crate) fn into_error(self) -> Error {
        let mut message = String::from("Validation error(s): ");
        for violation in &self.items {
            message.push('[');
            message.push_str(&violation.path);
            message.push_str("] ");
            message.push_str(&violation.reason);
            message.push_str("; ");
        }
        let fields: Vec<_> = self
            .items
            .iter()
            .map(|violation| json!({ "path": violation.path, "reason": violation.reason }))
            .collect();
        Error::validation(message).with_details(json!({ "fieldErrors": fields }))
    }
}
