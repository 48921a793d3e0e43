//! Standard layout rules.

use crate::{
    graph::{EntityKey, EntityView, Layout},
    validate::{Issues, Validators},
};
use prodspec_schema::types::{Cardinality, EntityKind};
use std::{collections::HashMap, ops::RangeInclusive};

/// Accepted AS link MTUs.
pub const MTU_RANGE: RangeInclusive<i64> = 1280..=65535;

/// Every rule a deployable layout must pass.
#[must_use]
pub fn standard() -> Validators {
    let mut validators = Validators::new();

    for kind in EntityKind::ALL {
        validators.add_entity(kind, singular_slots_set);
    }
    for kind in EntityKind::SERVICES {
        validators
            .add_entity(kind, service_named)
            .add_entity(kind, service_id_scoped);
    }
    validators
        .add_entity(EntityKind::Interface, interface_id_scoped)
        .add_entity(EntityKind::As, mtu_in_range)
        .add_entity(EntityKind::Isd, isd_number)
        .add_layout(as_assigned_to_isd)
        .add_layout(service_names_unique);

    validators
}

/// Every singular relation slot is set.
pub fn singular_slots_set(view: EntityView<'_>) -> Result<(), String> {
    let missing: Vec<_> = view
        .kind()
        .model()
        .relations
        .iter()
        .filter(|rel| rel.cardinality == Cardinality::One)
        .filter(|rel| matches!(view.one(rel.name), Ok(None)))
        .map(|rel| format!("'{}'", rel.name))
        .collect();

    match missing.as_slice() {
        [] => Ok(()),
        [one] => Err(format!("relation {one} is not set")),
        many => Err(format!("relations {} are not set", many.join(", "))),
    }
}

/// Service roles carry a non-empty `Name`.
pub fn service_named(view: EntityView<'_>) -> Result<(), String> {
    if view.text("Name").is_empty() {
        return Err("Name is empty".to_string());
    }

    Ok(())
}

/// A service id is scoped by its AS: `<AS id>/<name>`.
pub fn service_id_scoped(view: EntityView<'_>) -> Result<(), String> {
    scoped_by(view, "AS")
}

/// An interface id is scoped by its host: `<Host id>/<name>`.
pub fn interface_id_scoped(view: EntityView<'_>) -> Result<(), String> {
    scoped_by(view, "Host")
}

/// AS `MTU` is set and within [`MTU_RANGE`].
pub fn mtu_in_range(view: EntityView<'_>) -> Result<(), String> {
    match view.int("MTU") {
        0 => Err("MTU is not set".to_string()),
        mtu if MTU_RANGE.contains(&mtu) => Ok(()),
        mtu => Err(format!(
            "MTU {mtu} is outside {}..={}",
            MTU_RANGE.start(),
            MTU_RANGE.end()
        )),
    }
}

/// ISD ids are 16-bit ISD numbers.
pub fn isd_number(view: EntityView<'_>) -> Result<(), String> {
    view.id()
        .parse::<u16>()
        .map(|_| ())
        .map_err(|_| "id is not a 16-bit ISD number".to_string())
}

/// Every AS belongs to at least one ISD.
pub fn as_assigned_to_isd(layout: &Layout, issues: &mut Issues) {
    for view in layout.views(EntityKind::As) {
        if view.many("ISD").is_ok_and(|isds| isds.len() == 0) {
            issues.entity(view.key(), "is not assigned to any ISD");
        }
    }
}

/// Service `Name`s are unique across every service role.
pub fn service_names_unique(layout: &Layout, issues: &mut Issues) {
    let mut seen: HashMap<&str, EntityKey> = HashMap::new();

    for kind in EntityKind::SERVICES {
        for view in layout.views(kind) {
            let name = view.text("Name");
            if name.is_empty() {
                continue;
            }

            match seen.get(name) {
                Some(first) => {
                    let message = format!("Name '{name}' is already used by {first}");
                    issues.entity(view.key(), message);
                }
                None => {
                    seen.insert(name, view.key());
                }
            }
        }
    }
}

// Unlinked owners are reported by the completeness rule.
fn scoped_by(view: EntityView<'_>, owner: &str) -> Result<(), String> {
    let Ok(Some(owner)) = view.one(owner) else {
        return Ok(());
    };

    let prefix = format!("{}/", owner.id());
    if view.id().starts_with(&prefix) && view.id().len() > prefix.len() {
        Ok(())
    } else {
        Err(format!("id must start with '{prefix}' of {}", owner.key()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{graph::EntityRef, validate::ValidateError};

    // ISD 1, org acme, AS 110 with a border router, host with one interface.
    fn valid_layout() -> (Layout, EntityRef) {
        let mut layout = Layout::new();
        let isd = layout.create(EntityKind::Isd, "1").unwrap();
        let org = layout.create(EntityKind::Organization, "acme").unwrap();
        let site = layout.create(EntityKind::Site, "zrh.acme").unwrap();
        let host = layout.create(EntityKind::Host, "h1.zrh.acme").unwrap();
        let eth0 = layout.create(EntityKind::Interface, "h1.zrh.acme/eth0").unwrap();
        let asys = layout.create(EntityKind::As, "110").unwrap();
        let br = layout.create(EntityKind::Br, "110/br1").unwrap();

        layout.set_attr(asys, "MTU", 1472_i64).unwrap();
        layout.set_attr(br, "Name", "br1-110-br1").unwrap();
        layout.add(asys, "ISD", isd).unwrap();
        layout.set(asys, "Organization", org).unwrap();
        layout.set(br, "AS", asys).unwrap();
        layout.set(site, "Organization", org).unwrap();
        layout.set(host, "Site", site).unwrap();
        layout.set(eth0, "Host", host).unwrap();

        (layout, asys)
    }

    fn messages(layout: &Layout) -> Vec<String> {
        match standard().validate(layout) {
            Ok(()) => Vec::new(),
            Err(ValidateError::ValidationFailed(issues)) => {
                issues.iter().map(ToString::to_string).collect()
            }
        }
    }

    #[test]
    fn valid_layout_passes() {
        let (layout, _) = valid_layout();
        assert_eq!(messages(&layout), Vec::<String>::new());
    }

    #[test]
    fn missing_singular_relations_are_reported() {
        let mut layout = Layout::new();
        layout.create(EntityKind::Host, "h1").unwrap();

        assert_eq!(messages(&layout), ["Host 'h1': relation 'Site' is not set"]);
    }

    #[test]
    fn service_rules() {
        let (mut layout, asys) = valid_layout();
        let cs = layout.create(EntityKind::Cs, "111/cs1").unwrap();
        layout.set(cs, "AS", asys).unwrap();
        let ps = layout.create(EntityKind::Ps, "110/ps1").unwrap();
        layout.set(ps, "AS", asys).unwrap();
        layout.set_attr(ps, "Name", "br1-110-br1").unwrap();

        assert_eq!(
            messages(&layout),
            [
                "CS '111/cs1': Name is empty",
                "CS '111/cs1': id must start with '110/' of AS '110'",
                "PS '110/ps1': Name 'br1-110-br1' is already used by BR '110/br1'",
            ]
        );
    }

    #[test]
    fn mtu_and_isd_rules() {
        let (mut layout, asys) = valid_layout();
        layout.set_attr(asys, "MTU", 9_000_000_i64).unwrap();
        let lonely = layout.create(EntityKind::As, "112").unwrap();
        layout.set_attr(lonely, "MTU", 1472_i64).unwrap();
        let org = layout.get(EntityKind::Organization, "acme").unwrap();
        layout.add(org, "AS", lonely).unwrap();
        layout.create(EntityKind::Isd, "70000").unwrap();

        assert_eq!(
            messages(&layout),
            [
                "AS '110': MTU 9000000 is outside 1280..=65535",
                "ISD '70000': id is not a 16-bit ISD number",
                "AS '112': is not assigned to any ISD",
            ]
        );
    }

    #[test]
    fn interface_must_be_scoped_by_host() {
        let (mut layout, _) = valid_layout();
        let host = layout.get(EntityKind::Host, "h1.zrh.acme").unwrap();
        let bad = layout.create(EntityKind::Interface, "eth1").unwrap();
        layout.add(host, "Interface", bad).unwrap();

        assert_eq!(
            messages(&layout),
            ["Interface 'eth1': id must start with 'h1.zrh.acme/' of Host 'h1.zrh.acme'"]
        );
    }
}
