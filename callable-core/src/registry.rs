//! Link-time registry of introspectable types, grouped into units.
//!
//! A unit is the crate a type is declared in. Every `#[callables]` impl
//! submits a [`TypeRegistration`] through `inventory`; [`Unit::registered`]
//! collects the registrations of one crate back into a scannable unit.

use std::collections::BTreeSet;

use tracing::debug;

use crate::error::{ScanError, ScanResult};
use crate::model::TypeInfo;

/// Registration submitted for each type annotated with `#[callables]`.
#[derive(Debug)]
pub struct TypeRegistration {
    module_path: &'static str,
    exported: bool,
    type_info: fn() -> TypeInfo,
}

impl TypeRegistration {
    /// Creates a registration for a type declared in `module_path`.
    #[must_use]
    pub const fn new(
        module_path: &'static str,
        exported: bool,
        type_info: fn() -> TypeInfo,
    ) -> Self {
        Self {
            module_path,
            exported,
            type_info,
        }
    }

    /// Name of the unit (crate) the type belongs to.
    #[must_use]
    pub fn unit_name(&self) -> &'static str {
        unit_of(self.module_path)
    }

    /// Module the type is declared in.
    #[must_use]
    pub fn module_path(&self) -> &'static str {
        self.module_path
    }

    /// Whether the type is part of its unit's exported set.
    #[must_use]
    pub fn exported(&self) -> bool {
        self.exported
    }

    /// Builds the type's metadata.
    #[must_use]
    pub fn type_info(&self) -> TypeInfo {
        (self.type_info)()
    }
}

inventory::collect!(TypeRegistration);

fn unit_of(module_path: &str) -> &str {
    module_path.split("::").next().unwrap_or(module_path)
}

#[derive(Clone, Debug)]
struct UnitEntry {
    info: TypeInfo,
    exported: bool,
}

/// A loadable collection of types: the assembly-equivalent that can be
/// scanned as a whole.
#[derive(Clone, Debug)]
pub struct Unit {
    name: String,
    entries: Vec<UnitEntry>,
}

impl Unit {
    /// Creates an empty unit.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Adds a type to the unit's exported set.
    #[must_use]
    pub fn with_type(mut self, info: TypeInfo) -> Self {
        self.entries.push(UnitEntry {
            info,
            exported: true,
        });
        self
    }

    /// Adds a type that belongs to the unit but is not exported.
    #[must_use]
    pub fn with_internal_type(mut self, info: TypeInfo) -> Self {
        self.entries.push(UnitEntry {
            info,
            exported: false,
        });
        self
    }

    /// Builds the unit for the named crate from the link-time registry.
    ///
    /// Types are ordered by module path, then type name.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidArgument`] when no type is registered
    /// under `name`.
    pub fn registered(name: &str) -> ScanResult<Self> {
        let mut registrations: Vec<_> = inventory::iter::<TypeRegistration>
            .into_iter()
            .filter(|registration| registration.unit_name() == name)
            .map(|registration| (registration, registration.type_info()))
            .collect();

        if registrations.is_empty() {
            return Err(ScanError::invalid_argument(format!(
                "no types registered for unit `{name}`"
            )));
        }

        registrations.sort_by(|(_, left), (_, right)| {
            (left.module_path(), left.name()).cmp(&(right.module_path(), right.name()))
        });

        let unit = registrations
            .into_iter()
            .fold(Self::new(name), |unit, (registration, info)| {
                if registration.exported() {
                    unit.with_type(info)
                } else {
                    unit.with_internal_type(info)
                }
            });

        debug!(unit = name, types = unit.entries.len(), "loaded registered unit");
        Ok(unit)
    }

    /// Builds every unit present in the link-time registry, ordered by name.
    #[must_use]
    pub fn all_registered() -> Vec<Self> {
        let names: BTreeSet<&str> = inventory::iter::<TypeRegistration>
            .into_iter()
            .map(TypeRegistration::unit_name)
            .collect();

        names
            .into_iter()
            .filter_map(|name| Self::registered(name).ok())
            .collect()
    }

    /// Returns the unit name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the publicly exported types.
    pub fn exported_types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.entries
            .iter()
            .filter(|entry| entry.exported)
            .map(|entry| &entry.info)
    }

    /// Returns every type in the unit, exported or not.
    pub fn types(&self) -> impl Iterator<Item = &TypeInfo> {
        self.entries.iter().map(|entry| &entry.info)
    }

    /// Looks up a type by simple name.
    #[must_use]
    pub fn get(&self, type_name: &str) -> Option<&TypeInfo> {
        self.types().find(|info| info.name() == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> TypeInfo {
        TypeInfo::new("Widget").in_module("registry_fixture::widgets")
    }

    fn gadget() -> TypeInfo {
        TypeInfo::new("Gadget").in_module("registry_fixture")
    }

    inventory::submit! {
        TypeRegistration::new("registry_fixture::widgets", true, widget)
    }

    inventory::submit! {
        TypeRegistration::new("registry_fixture", false, gadget)
    }

    #[test]
    fn unit_name_is_first_module_segment() {
        assert_eq!(unit_of("app::ops::users"), "app");
        assert_eq!(unit_of("app"), "app");
    }

    #[test]
    fn registered_unit_collects_and_orders_types() {
        let unit = Unit::registered("registry_fixture").expect("unit");

        let names: Vec<_> = unit.types().map(TypeInfo::name).collect();
        assert_eq!(names, ["Gadget", "Widget"]);

        let exported: Vec<_> = unit.exported_types().map(TypeInfo::name).collect();
        assert_eq!(exported, ["Widget"]);
        assert!(unit.get("Gadget").is_some());
    }

    #[test]
    fn unknown_unit_is_invalid_argument() {
        let err = Unit::registered("no_such_unit").expect_err("unknown unit");
        assert!(matches!(err, ScanError::InvalidArgument { .. }));
    }

    #[test]
    fn all_registered_includes_fixture_unit() {
        let units = Unit::all_registered();
        assert!(units.iter().any(|unit| unit.name() == "registry_fixture"));
    }

    #[test]
    fn hand_built_unit_separates_internal_types() {
        let unit = Unit::new("manual")
            .with_type(widget())
            .with_internal_type(gadget());

        assert_eq!(unit.name(), "manual");
        assert_eq!(unit.types().count(), 2);
        assert_eq!(unit.exported_types().count(), 1);
    }
}
