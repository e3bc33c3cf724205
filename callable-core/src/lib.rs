//! Discovery of methods marked as callable.
//!
//! Types describe their methods through [`Introspect`] (usually generated by
//! the `#[callables]` attribute). The [`scanner`] walks those descriptions,
//! keeps the public methods carrying a [`Marker`], and returns one immutable
//! [`Descriptor`] per method for an external dispatcher to list, validate and
//! invoke.

#![warn(missing_docs, clippy::pedantic)]

mod descriptor;
mod error;
mod invoke;
mod marker;
mod model;
pub mod registry;
pub mod scanner;

pub use descriptor::Descriptor;
pub use error::{InvokeError, ScanError, ScanResult};
pub use invoke::{Arguments, CallTarget, InvocationHandle, InvokeFn, InvokeResult};
pub use marker::Marker;
pub use model::{
    Introspect, MethodInfo, MethodInfoBuilder, MethodKind, ParameterInfo, TypeInfo, TypeRef,
    Visibility,
};
pub use registry::{TypeRegistration, Unit};
pub use scanner::{scan, scan_type, scan_types, scan_unit, scan_unit_named, scan_units};

#[doc(hidden)]
pub use inventory;
