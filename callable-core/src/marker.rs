//! The callable marker attached to method declarations.

use serde::Serialize;

/// Metadata carried by a `#[callable(...)]` annotation.
///
/// A marker is a passive record: it holds the description shown to callers
/// and whether the method only reads state. It has no behaviour of its own.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Marker {
    description: String,
    read_only: bool,
}

impl Marker {
    /// Creates a marker with the given description. `read_only` defaults to
    /// `false`.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            read_only: false,
        }
    }

    /// Sets the read-only flag.
    #[must_use]
    pub fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns whether the method is declared read-only.
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.read_only
    }
}
