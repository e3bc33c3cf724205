//! Error types surfaced by discovery and invocation.

use thiserror::Error;

/// Result alias for scanning and descriptor construction.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors produced while building descriptors or scanning types.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScanError {
    /// A required input was absent.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// Human-readable reason for rejection.
        reason: String,
    },

    /// Two marked methods on the same type share a name.
    #[error("method overloading is not supported: {type_name}.{method_name}")]
    DuplicateMethodName {
        /// Simple name of the scanned type.
        type_name: String,
        /// The repeated method name.
        method_name: String,
    },
}

impl ScanError {
    /// Creates an invalid-argument error from the supplied reason.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// Errors raised by an [`InvocationHandle`](crate::InvocationHandle) when the
/// supplied receiver or arguments do not fit the bound method.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvokeError {
    /// An instance method was invoked without a receiver.
    #[error("instance method requires a receiver")]
    MissingReceiver,

    /// The receiver was not of the declaring type, or was borrowed shared
    /// where an exclusive borrow is needed.
    #[error("receiver must be an {access} `{expected}`")]
    ReceiverType {
        /// Type name the method expects.
        expected: &'static str,
        /// `shared` or `exclusive`.
        access: &'static str,
    },

    /// Wrong number of arguments.
    #[error("expected {expected} argument(s), found {found}")]
    Arity {
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        found: usize,
    },

    /// An argument could not be downcast to its declared type.
    #[error("argument {index} (`{name}`) must be of type `{expected}`")]
    ArgumentType {
        /// Zero-based parameter position.
        index: usize,
        /// Declared parameter name.
        name: &'static str,
        /// Declared parameter type.
        expected: &'static str,
    },
}
