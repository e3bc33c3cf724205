//! Discovery of callable methods over types and units.
//!
//! [`scan_type`] carries the filtering and validation logic; the other entry
//! points fan out over their inputs and concatenate results in input order.
//! Every batch entry point aborts on the first failure and returns no partial
//! result.

use std::collections::HashSet;

use tracing::{debug, trace, warn};

use crate::descriptor::Descriptor;
use crate::error::{ScanError, ScanResult};
use crate::model::{Introspect, MethodKind, TypeInfo, Visibility};
use crate::registry::Unit;

/// Discovers the public callable methods declared on one type.
///
/// Public instance and static methods carrying a marker produce one
/// descriptor each, in enumeration order. Methods that are not `pub`, or that
/// carry no marker, are skipped.
///
/// # Errors
///
/// Returns [`ScanError::DuplicateMethodName`] when two marked public methods
/// share a name, and propagates [`ScanError::InvalidArgument`] from
/// descriptor construction.
pub fn scan_type(ty: &TypeInfo) -> ScanResult<Vec<Descriptor>> {
    let mut seen = HashSet::new();
    let mut descriptors = Vec::new();

    let candidates = ty.methods().iter().filter(|method| {
        method.visibility() == Visibility::Public
            && matches!(method.kind(), MethodKind::Instance | MethodKind::Static)
    });

    for method in candidates {
        let Some(marker) = method.marker() else {
            trace!(type_name = ty.name(), method = method.name(), "skipping unmarked method");
            continue;
        };

        if !seen.insert(method.name()) {
            warn!(
                type_name = ty.name(),
                method = method.name(),
                "duplicate callable method name"
            );
            return Err(ScanError::DuplicateMethodName {
                type_name: ty.name().to_owned(),
                method_name: method.name().to_owned(),
            });
        }

        descriptors.push(Descriptor::new(method, marker)?);
    }

    debug!(
        type_name = ty.name(),
        callables = descriptors.len(),
        "scanned type"
    );
    Ok(descriptors)
}

/// Discovers the callable methods of `T`.
///
/// # Errors
///
/// See [`scan_type`].
pub fn scan<T: Introspect>() -> ScanResult<Vec<Descriptor>> {
    scan_type(&T::type_info())
}

/// Scans each type in turn and concatenates the results.
///
/// # Errors
///
/// Returns the first error raised by [`scan_type`].
pub fn scan_types<'a, I>(types: I) -> ScanResult<Vec<Descriptor>>
where
    I: IntoIterator<Item = &'a TypeInfo>,
{
    let mut descriptors = Vec::new();
    for ty in types {
        descriptors.extend(scan_type(ty)?);
    }
    Ok(descriptors)
}

/// Scans every exported type of a unit.
///
/// # Errors
///
/// Returns the first error raised by [`scan_type`].
pub fn scan_unit(unit: &Unit) -> ScanResult<Vec<Descriptor>> {
    let descriptors = scan_types(unit.exported_types())?;
    debug!(
        unit = unit.name(),
        callables = descriptors.len(),
        "scanned unit"
    );
    Ok(descriptors)
}

/// Scans the registered unit with the given crate name.
///
/// # Errors
///
/// Returns [`ScanError::InvalidArgument`] when nothing is registered under
/// `name`, or the first error raised by [`scan_type`].
pub fn scan_unit_named(name: &str) -> ScanResult<Vec<Descriptor>> {
    scan_unit(&Unit::registered(name)?)
}

/// Scans each unit in turn and concatenates the results.
///
/// # Errors
///
/// Returns the first error raised by [`scan_unit`].
pub fn scan_units<'a, I>(units: I) -> ScanResult<Vec<Descriptor>>
where
    I: IntoIterator<Item = &'a Unit>,
{
    let mut descriptors = Vec::new();
    for unit in units {
        descriptors.extend(scan_unit(unit)?);
    }
    Ok(descriptors)
}
