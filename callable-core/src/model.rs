//! Introspection side-table describing types and their methods.
//!
//! Rust has no runtime reflection, so the scanner works over explicit
//! [`TypeInfo`] values. The `#[callables]` attribute generates them through
//! [`Introspect`]; the builders below produce the same records by hand.

use std::any::{TypeId, type_name};
use std::fmt;

use serde::Serialize;

use crate::invoke::InvocationHandle;
use crate::marker::Marker;

/// Semantic identity of a parameter or return type.
#[derive(Clone, Copy, Serialize)]
pub struct TypeRef {
    name: &'static str,
    #[serde(skip)]
    id: Option<TypeId>,
}

impl TypeRef {
    /// Resolves the identity of `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            name: type_name::<T>(),
            id: Some(TypeId::of::<T>()),
        }
    }

    /// Records a type by name only, for types whose identity cannot be
    /// resolved (borrowed or otherwise non-`'static` types).
    #[must_use]
    pub const fn named(name: &'static str) -> Self {
        Self { name, id: None }
    }

    /// The unit type, returned by methods without a declared return value.
    #[must_use]
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    /// Returns the type's name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the resolved [`TypeId`], if any.
    #[must_use]
    pub fn id(&self) -> Option<TypeId> {
        self.id
    }

    /// Returns `true` when this reference denotes `T`.
    #[must_use]
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == Some(TypeId::of::<T>())
    }

    /// Final path segment of the type name, e.g. `String` for
    /// `alloc::string::String`. Arrays, slices, tuples, references, pointers
    /// and trait objects keep their full name.
    #[must_use]
    pub fn short_name(&self) -> &'static str {
        if self.name.starts_with(['[', '&', '(', '*']) || self.name.starts_with("dyn ") {
            return self.name;
        }
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(index) => &self.name[index + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self.id, other.id) {
            (Some(left), Some(right)) => left == right,
            _ => self.name == other.name,
        }
    }
}

impl Eq for TypeRef {}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// A single declared parameter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ParameterInfo {
    name: String,
    #[serde(rename = "type")]
    ty: TypeRef,
}

impl ParameterInfo {
    /// Creates parameter metadata.
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    /// Returns the declared parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared parameter type.
    #[must_use]
    pub fn ty(&self) -> TypeRef {
        self.ty
    }
}

/// Declared visibility of a method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// `pub`
    Public,
    /// `pub(crate)`, `pub(super)`, `pub(in path)` or `pub(self)`.
    Restricted,
    /// No visibility qualifier.
    Private,
}

/// Whether a method takes a receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Takes `self` in some form.
    Instance,
    /// Associated function without a receiver.
    Static,
}

/// Metadata for one method declared on a type.
#[derive(Clone, Debug)]
pub struct MethodInfo {
    name: String,
    declaring_type: Option<String>,
    visibility: Visibility,
    kind: MethodKind,
    parameters: Vec<ParameterInfo>,
    return_type: TypeRef,
    marker: Option<Marker>,
    handle: Option<InvocationHandle>,
}

impl MethodInfo {
    /// Starts building metadata for the named method. The method defaults to a
    /// public instance method with no parameters returning `()`.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> MethodInfoBuilder {
        MethodInfoBuilder {
            info: MethodInfo {
                name: name.into(),
                declaring_type: None,
                visibility: Visibility::Public,
                kind: MethodKind::Instance,
                parameters: Vec::new(),
                return_type: TypeRef::unit(),
                marker: None,
                handle: None,
            },
        }
    }

    /// Returns the method name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the simple name of the declaring type, if known.
    #[must_use]
    pub fn declaring_type(&self) -> Option<&str> {
        self.declaring_type.as_deref()
    }

    /// Returns the declared visibility.
    #[must_use]
    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Returns whether the method takes a receiver.
    #[must_use]
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Returns the parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterInfo] {
        &self.parameters
    }

    /// Returns the declared return type.
    #[must_use]
    pub fn return_type(&self) -> TypeRef {
        self.return_type
    }

    /// Returns the callable marker attached to the method, if any.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Returns the invocation handle, if one was bound.
    #[must_use]
    pub fn handle(&self) -> Option<InvocationHandle> {
        self.handle
    }
}

/// Builder for [`MethodInfo`].
#[derive(Debug)]
pub struct MethodInfoBuilder {
    info: MethodInfo,
}

impl MethodInfoBuilder {
    /// Records the declaring type's simple name.
    #[must_use]
    pub fn declared_by(mut self, type_name: impl Into<String>) -> Self {
        self.info.declaring_type = Some(type_name.into());
        self
    }

    /// Sets the visibility.
    #[must_use]
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.info.visibility = visibility;
        self
    }

    /// Sets whether the method takes a receiver.
    #[must_use]
    pub fn kind(mut self, kind: MethodKind) -> Self {
        self.info.kind = kind;
        self
    }

    /// Appends a parameter.
    #[must_use]
    pub fn parameter(mut self, name: impl Into<String>, ty: TypeRef) -> Self {
        self.info.parameters.push(ParameterInfo::new(name, ty));
        self
    }

    /// Sets the return type.
    #[must_use]
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.info.return_type = ty;
        self
    }

    /// Attaches the callable marker.
    #[must_use]
    pub fn marker(mut self, marker: Marker) -> Self {
        self.info.marker = Some(marker);
        self
    }

    /// Binds the invocation handle.
    #[must_use]
    pub fn handle(mut self, handle: InvocationHandle) -> Self {
        self.info.handle = Some(handle);
        self
    }

    /// Finalises the method metadata.
    #[must_use]
    pub fn build(self) -> MethodInfo {
        self.info
    }
}

/// Metadata for one type and the methods declared on it.
#[derive(Clone, Debug)]
pub struct TypeInfo {
    name: String,
    module_path: String,
    methods: Vec<MethodInfo>,
}

impl TypeInfo {
    /// Creates an empty record for the type with the given simple name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module_path: String::new(),
            methods: Vec::new(),
        }
    }

    /// Records the module the type is declared in.
    #[must_use]
    pub fn in_module(mut self, module_path: impl Into<String>) -> Self {
        self.module_path = module_path.into();
        self
    }

    /// Appends a method, keeping declaration order.
    #[must_use]
    pub fn with_method(mut self, method: MethodInfo) -> Self {
        self.methods.push(method);
        self
    }

    /// Returns the simple type name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declaring module path; empty when unknown.
    #[must_use]
    pub fn module_path(&self) -> &str {
        &self.module_path
    }

    /// Returns every recorded method, regardless of visibility or marker.
    #[must_use]
    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }
}

/// Types that can describe their own methods.
///
/// Implemented by the `#[callables]` attribute; implement it by hand with the
/// [`TypeInfo`] and [`MethodInfo`] builders when the attribute cannot be used.
pub trait Introspect {
    /// Builds the type's metadata.
    fn type_info() -> TypeInfo;
}
