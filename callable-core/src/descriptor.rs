//! Immutable records describing discovered callable methods.

use std::fmt;

use serde::Serialize;

use crate::error::{ScanError, ScanResult};
use crate::invoke::InvocationHandle;
use crate::marker::Marker;
use crate::model::{MethodInfo, ParameterInfo, TypeRef};

/// Everything a dispatcher needs to list, validate and call one method.
///
/// Equality covers the metadata fields only; invocation handles are not
/// compared.
#[derive(Clone, Debug, Serialize)]
pub struct Descriptor {
    declaring_type_name: String,
    method_name: String,
    description: String,
    read_only: bool,
    parameters: Vec<ParameterInfo>,
    return_type: TypeRef,
    #[serde(skip)]
    handle: InvocationHandle,
}

impl Descriptor {
    /// Builds a descriptor from a method and the marker attached to it.
    ///
    /// The declaring type name falls back to an empty string when the method
    /// has no recorded owner.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidArgument`] when the method carries no
    /// invocation handle.
    pub fn new(method: &MethodInfo, marker: &Marker) -> ScanResult<Self> {
        let handle = method.handle().ok_or_else(|| {
            ScanError::invalid_argument(format!(
                "method `{}` has no invocation handle",
                method.name()
            ))
        })?;

        Ok(Self {
            declaring_type_name: method.declaring_type().unwrap_or_default().to_owned(),
            method_name: method.name().to_owned(),
            description: marker.description().to_owned(),
            read_only: marker.read_only(),
            parameters: method.parameters().to_vec(),
            return_type: method.return_type(),
            handle,
        })
    }

    /// Builds a descriptor from a method using its own marker.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidArgument`] when the method carries no
    /// marker or no invocation handle.
    pub fn from_method(method: &MethodInfo) -> ScanResult<Self> {
        let marker = method.marker().ok_or_else(|| {
            ScanError::invalid_argument(format!(
                "method `{}` carries no callable marker",
                method.name()
            ))
        })?;
        Self::new(method, marker)
    }

    /// Simple name of the declaring type, or empty when unknown.
    #[must_use]
    pub fn declaring_type_name(&self) -> &str {
        &self.declaring_type_name
    }

    /// Method name as addressed by callers.
    #[must_use]
    pub fn method_name(&self) -> &str {
        &self.method_name
    }

    /// Description copied from the marker.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Read-only flag copied from the marker.
    #[must_use]
    pub fn read_only(&self) -> bool {
        self.read_only
    }

    /// Parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Declared return type.
    #[must_use]
    pub fn return_type(&self) -> TypeRef {
        self.return_type
    }

    /// Handle for calling the underlying method.
    #[must_use]
    pub fn handle(&self) -> &InvocationHandle {
        &self.handle
    }
}

impl PartialEq for Descriptor {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type_name == other.declaring_type_name
            && self.method_name == other.method_name
            && self.description == other.description
            && self.read_only == other.read_only
            && self.parameters == other.parameters
            && self.return_type == other.return_type
    }
}

impl Eq for Descriptor {}

impl fmt::Display for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [ReadOnly={}]: {}",
            self.method_name, self.read_only, self.description
        )
    }
}

#[cfg(test)]
mod tests {
    use std::any::Any;

    use super::*;
    use crate::invoke::{CallTarget, InvokeResult};
    use crate::model::MethodKind;

    fn noop(_: CallTarget<'_>, _: Vec<Box<dyn Any>>) -> InvokeResult {
        Ok(Box::new(()))
    }

    fn lookup() -> MethodInfo {
        MethodInfo::builder("lookup")
            .declared_by("Directory")
            .kind(MethodKind::Static)
            .parameter("id", TypeRef::of::<i32>())
            .returns(TypeRef::of::<String>())
            .marker(Marker::new("Look up an entry").with_read_only(true))
            .handle(InvocationHandle::new(noop))
            .build()
    }

    #[test]
    fn copies_method_and_marker_fields() {
        let descriptor = Descriptor::from_method(&lookup()).expect("descriptor");

        assert_eq!(descriptor.declaring_type_name(), "Directory");
        assert_eq!(descriptor.method_name(), "lookup");
        assert_eq!(descriptor.description(), "Look up an entry");
        assert!(descriptor.read_only());
        assert_eq!(descriptor.parameters().len(), 1);
        assert!(descriptor.parameters()[0].ty().is::<i32>());
        assert!(descriptor.return_type().is::<String>());
    }

    #[test]
    fn explicit_marker_overrides_method_marker() {
        let marker = Marker::new("Replacement");
        let descriptor = Descriptor::new(&lookup(), &marker).expect("descriptor");

        assert_eq!(descriptor.description(), "Replacement");
        assert!(!descriptor.read_only());
    }

    #[test]
    fn missing_owner_falls_back_to_empty_name() {
        let method = MethodInfo::builder("orphan")
            .marker(Marker::new("No owner"))
            .handle(InvocationHandle::new(noop))
            .build();

        let descriptor = Descriptor::from_method(&method).expect("descriptor");
        assert_eq!(descriptor.declaring_type_name(), "");
    }

    #[test]
    fn missing_marker_is_invalid_argument() {
        let method = MethodInfo::builder("plain")
            .handle(InvocationHandle::new(noop))
            .build();

        let err = Descriptor::from_method(&method).expect_err("unmarked method");
        assert!(matches!(err, ScanError::InvalidArgument { .. }));
    }

    #[test]
    fn missing_handle_is_invalid_argument() {
        let method = MethodInfo::builder("unbound").build();

        let err = Descriptor::new(&method, &Marker::new("Unbound")).expect_err("no handle");
        assert!(matches!(err, ScanError::InvalidArgument { reason } if reason.contains("unbound")));
    }

    #[test]
    fn display_renders_name_flag_and_description() {
        let descriptor = Descriptor::from_method(&lookup()).expect("descriptor");
        assert_eq!(
            descriptor.to_string(),
            "lookup [ReadOnly=true]: Look up an entry"
        );
    }

    #[test]
    fn serializes_metadata_without_handle() {
        let descriptor = Descriptor::from_method(&lookup()).expect("descriptor");
        let json = serde_json::to_value(&descriptor).expect("serialize");

        assert_eq!(json["method_name"], "lookup");
        assert_eq!(json["read_only"], true);
        assert_eq!(json["parameters"][0]["name"], "id");
        assert_eq!(json["parameters"][0]["type"]["name"], "i32");
        assert!(json.get("handle").is_none());
    }
}
