use callable_catalog::{
    ScanError, TypeInfo, Unit, callables, scan_type, scan_unit, scan_unit_named, scan_units,
    this_unit,
};

pub mod accounts {
    use callable_catalog::callables;

    pub struct AccountOps;

    #[callables]
    impl AccountOps {
        #[callable("Close an account")]
        pub fn close(&mut self, account_id: u64) {
            let _ = account_id;
        }

        #[callable("Account balance", read_only)]
        pub fn balance(&self, account_id: u64) -> i64 {
            i64::try_from(account_id).unwrap_or_default()
        }
    }
}

pub struct AuditOps;

#[callables]
impl AuditOps {
    #[callable("Export the audit log", read_only)]
    pub fn export() -> Vec<String> {
        Vec::new()
    }
}

pub struct MaintenanceOps;

#[callables(internal)]
impl MaintenanceOps {
    #[callable("Rebuild indexes")]
    pub fn rebuild(&self) {}
}

fn crate_unit() -> Unit {
    this_unit!().expect("this crate registers types")
}

#[test]
fn registered_unit_holds_every_annotated_type() {
    let unit = crate_unit();

    assert_eq!(unit.name(), env!("CARGO_CRATE_NAME"));
    let names: Vec<_> = unit.types().map(TypeInfo::name).collect();
    assert_eq!(names, ["AuditOps", "MaintenanceOps", "AccountOps"]);
    assert_eq!(
        unit.get("AccountOps").map(TypeInfo::module_path),
        Some(concat!(env!("CARGO_CRATE_NAME"), "::accounts"))
    );
}

#[test]
fn internal_types_are_not_exported() {
    let unit = crate_unit();

    let exported: Vec<_> = unit.exported_types().map(TypeInfo::name).collect();
    assert_eq!(exported, ["AuditOps", "AccountOps"]);

    let internal = unit.get("MaintenanceOps").expect("registered");
    assert_eq!(scan_type(internal).expect("scan").len(), 1);
}

#[test]
fn scan_unit_covers_exported_types_only() {
    let descriptors = scan_unit(&crate_unit()).expect("scan unit");

    let mut names: Vec<_> = descriptors
        .iter()
        .map(|descriptor| {
            format!(
                "{}.{}",
                descriptor.declaring_type_name(),
                descriptor.method_name()
            )
        })
        .collect();
    names.sort();
    assert_eq!(
        names,
        ["AccountOps.balance", "AccountOps.close", "AuditOps.export"]
    );
}

#[test]
fn scan_unit_named_resolves_registered_crates() {
    let descriptors = scan_unit_named(env!("CARGO_CRATE_NAME")).expect("scan");
    assert_eq!(descriptors.len(), 3);

    let err = scan_unit_named("not_a_linked_crate").expect_err("unknown unit");
    assert!(matches!(err, ScanError::InvalidArgument { .. }));
}

#[test]
fn scan_units_concatenates_units() {
    let registered = Unit::all_registered();
    assert!(registered.iter().any(|unit| unit.name() == env!("CARGO_CRATE_NAME")));

    let empty = Unit::new("empty");
    let descriptors = scan_units([&crate_unit(), &empty, &crate_unit()]).expect("scan units");
    assert_eq!(descriptors.len(), 6);

    assert!(scan_units(std::iter::empty()).expect("no units").is_empty());
}
