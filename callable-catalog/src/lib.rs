//! Declare callable methods and discover them as a catalog.
//!
//! Depend on this crate rather than on its parts. It re-exports the discovery
//! core and, behind the default `macros` feature, the `#[callables]` and
//! `#[callable]` attributes whose generated code refers back to this crate.

#![warn(missing_docs, clippy::pedantic)]

pub use callable_core::*;

/// Declarative attributes (enabled by the `macros` feature).
#[cfg(feature = "macros")]
pub use callable_macros::{callable, callables};

/// Builds the registered [`Unit`] of the crate this macro is invoked in.
///
/// Expands to [`Unit::registered`] with the calling crate's name, so it
/// returns a [`ScanResult<Unit>`].
#[macro_export]
macro_rules! this_unit {
    () => {
        $crate::Unit::registered(::core::env!("CARGO_CRATE_NAME"))
    };
}

#[doc(hidden)]
pub mod __private {
    pub use callable_core::{
        Arguments, CallTarget, Introspect, InvocationHandle, InvokeResult, Marker, MethodInfo,
        MethodKind, TypeInfo, TypeRef, TypeRegistration, Visibility, inventory,
    };
}
