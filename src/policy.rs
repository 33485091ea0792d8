//! Failure handling policy, injected per network instance.

use serde::{Deserialize, Serialize};

/// How validation failures are handled.
///
/// `Strict` raises a typed [`crate::Error`] at the violating call and is the
/// default. `Lenient` logs a warning and continues with a best-effort default
/// where one exists (negative interaction bounds are clamped to zero);
/// failures with no meaningful default still return an error after logging.
///
/// The policy is carried by each component at construction rather than read
/// from a process-wide global, so two networks in one process can differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ErrorPolicy {
    #[default]
    Strict,
    Lenient,
}

impl ErrorPolicy {
    pub fn is_lenient(self) -> bool {
        matches!(self, ErrorPolicy::Lenient)
    }

    pub fn is_strict(self) -> bool {
        matches!(self, ErrorPolicy::Strict)
    }
}
