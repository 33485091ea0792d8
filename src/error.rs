//! Error types shared by every graph component.

use thiserror::Error;

/// Errors raised by graph operations.
///
/// All validation failures are raised synchronously at the violating call;
/// nothing is retried automatically and no partially-constructed entity is
/// ever observable after an `Err`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required entity reference is absent (stale or foreign handle,
    /// lookup against a component that was never attached).
    #[error("required reference is absent: {what}")]
    NullReference { what: String },

    /// An argument violates an invariant (empty id, negative timestamp
    /// or duration, self-loop edge).
    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },

    /// The operation is not valid in the current graph state (alter
    /// requested on an edge that does not contain the ego, cross-network
    /// component mixing).
    #[error("invalid state: {reason}")]
    InvalidState { reason: String },

    /// A module data value could not be built, or a cached value has a
    /// different concrete type than the one requested.
    #[error("module data '{key}': {reason}")]
    Construction { key: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
