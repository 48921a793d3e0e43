use crate::{
    BuildError,
    input::{AsInput, Isds, OrganizationInput},
};
use prodspec_core::graph::{EntityRef, Layout};
use prodspec_schema::types::EntityKind;
use serde_yaml::Value as YamlValue;
use std::collections::BTreeMap;

///
/// Builder
///
/// Turns one organization document plus the ISD table into a layout.
/// Ids are derived from input keys:
///
/// * Site `<site>.<shortname>`
/// * Host `<host>.<site id>` with an optional `.<host domain>` suffix
/// * Interface `<host id>/<interface>`
/// * services `<AS id>/<name>`, named `<role><first ISD>-<AS id>-<name>`
///

#[derive(Clone, Debug, Default)]
pub struct Builder {
    host_domain: Option<String>,
}

impl Builder {
    #[must_use]
    pub const fn new() -> Self {
        Self { host_domain: None }
    }

    /// Domain appended to every host id.
    #[must_use]
    pub fn host_domain(mut self, domain: impl Into<String>) -> Self {
        let domain = domain.into();
        self.host_domain = (!domain.is_empty()).then_some(domain);
        self
    }

    pub fn build(&self, isds: &Isds, org: &OrganizationInput) -> Result<Layout, BuildError> {
        let mut layout = Layout::new();

        for (number, isd) in isds {
            let handle = layout.create(EntityKind::Isd, number.to_string())?;
            layout.set_attr(handle, "Name", isd.name.as_str())?;
        }

        let organization = layout.create(EntityKind::Organization, org.shortname.as_str())?;
        layout.set_attr(organization, "Name", org.name.as_str())?;

        self.build_sites(&mut layout, organization, org)?;

        for (as_id, asys) in &org.ases {
            build_as(&mut layout, organization, as_id, asys)?;
        }

        tracing::info!(
            organization = %org.shortname,
            entities = layout.total(),
            "built layout"
        );

        Ok(layout)
    }

    fn build_sites(
        &self,
        layout: &mut Layout,
        organization: EntityRef,
        org: &OrganizationInput,
    ) -> Result<(), BuildError> {
        for (site_name, site) in &org.sites {
            let site_id = format!("{site_name}.{}", org.shortname);
            let site_ref = layout.create(EntityKind::Site, site_id.as_str())?;
            layout.set_attr(site_ref, "Location", site.location.as_str())?;
            layout.add(organization, "Site", site_ref)?;

            for (host_name, host) in &site.hosts {
                let host_id = match &self.host_domain {
                    Some(domain) => format!("{host_name}.{site_id}.{domain}"),
                    None => format!("{host_name}.{site_id}"),
                };
                let host_ref = layout.create(EntityKind::Host, host_id.as_str())?;
                layout.set_attr(host_ref, "MachineType", host.machinetype)?;
                layout.set_attr(host_ref, "SerialNumber", host.serialnumber.as_str())?;
                layout.add(site_ref, "Host", host_ref)?;

                for (iface_name, attrs) in &host.interfaces {
                    let iface_id = format!("{host_id}/{iface_name}");
                    let iface = layout.create(EntityKind::Interface, iface_id.as_str())?;
                    set_interface_attrs(layout, iface, &iface_id, attrs)?;
                    layout.add(host_ref, "Interface", iface)?;
                }
            }
        }

        Ok(())
    }
}

fn build_as(
    layout: &mut Layout,
    organization: EntityRef,
    as_id: &str,
    asys: &AsInput,
) -> Result<(), BuildError> {
    let Some(&first_isd) = asys.isds.first() else {
        return Err(BuildError::MissingIsd {
            as_id: as_id.to_string(),
        });
    };

    let as_ref = layout.create(EntityKind::As, as_id)?;
    layout.set_attr(as_ref, "Core", asys.core)?;
    layout.set_attr(as_ref, "MTU", asys.mtu)?;

    for isd in &asys.isds {
        let isd_ref = layout
            .find(EntityKind::Isd, &isd.to_string())
            .ok_or_else(|| BuildError::UnknownIsd {
                as_id: as_id.to_string(),
                isd: *isd,
            })?;
        layout.add(as_ref, "ISD", isd_ref)?;
    }
    layout.add(organization, "AS", as_ref)?;

    let services = [
        (EntityKind::Br, "br", &asys.br),
        (EntityKind::Bs, "bs", &asys.bs),
        (EntityKind::Cs, "cs", &asys.cs),
        (EntityKind::Ps, "ps", &asys.ps),
        (EntityKind::Sig, "sig", &asys.sig),
    ];
    for (kind, prefix, names) in services {
        for name in names.keys() {
            let service = layout.create(kind, format!("{as_id}/{name}"))?;
            layout.set_attr(service, "Name", format!("{prefix}{first_isd}-{as_id}-{name}"))?;
            layout.add(as_ref, kind.as_str(), service)?;
        }
    }

    Ok(())
}

// Attribute keys match Interface fields ignoring case.
fn set_interface_attrs(
    layout: &mut Layout,
    iface: EntityRef,
    iface_id: &str,
    attrs: &BTreeMap<String, YamlValue>,
) -> Result<(), BuildError> {
    let model = EntityKind::Interface.model();

    for (key, raw) in attrs {
        let field = model
            .field_ignore_case(key)
            .ok_or_else(|| BuildError::UnknownAttribute {
                interface: iface_id.to_string(),
                attribute: key.clone(),
            })?;

        let text = match raw {
            YamlValue::Null => continue,
            YamlValue::String(s) => s.clone(),
            YamlValue::Number(n) => n.to_string(),
            YamlValue::Bool(b) => b.to_string(),
            _ => {
                return Err(BuildError::InvalidAttribute {
                    interface: iface_id.to_string(),
                    attribute: key.clone(),
                });
            }
        };
        layout.set_attr(iface, field.name, text)?;
    }

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use prodspec_core::ErrorKind;

    const ISDS: &str = "1:\n  name: Switzerland\n2:\n  name: Germany\n";

    const ORG: &str = "
name: Acme Networks
shortname: acme
sites:
  zrh:
    location: Zurich
    hosts:
      h1:
        machinetype: 3
        serialnumber: SN-1
        interfaces:
          eth0:
            SIMNumber: '8941'
            ip4ptp: 10.0.0.1/31
            phonenumber: 41791234567
ases:
  ff00:0:110:
    isds: [2, 1]
    core: true
    mtu: 1472
    br:
      br2:
      br1:
    ps:
      ps1:
    sig:
      sig1:
";

    fn inputs(org: &str) -> (Isds, OrganizationInput) {
        (
            serde_yaml::from_str(ISDS).unwrap(),
            serde_yaml::from_str(org).unwrap(),
        )
    }

    fn ids(layout: &Layout, kind: EntityKind) -> Vec<String> {
        layout.views(kind).map(|v| v.id().to_string()).collect()
    }

    #[test]
    fn ids_follow_the_input_structure() {
        let (isds, org) = inputs(ORG);
        let layout = Builder::new()
            .host_domain("example.net")
            .build(&isds, &org)
            .unwrap();

        assert_eq!(ids(&layout, EntityKind::Isd), ["1", "2"]);
        assert_eq!(ids(&layout, EntityKind::Organization), ["acme"]);
        assert_eq!(ids(&layout, EntityKind::Site), ["zrh.acme"]);
        assert_eq!(ids(&layout, EntityKind::Host), ["h1.zrh.acme.example.net"]);
        assert_eq!(
            ids(&layout, EntityKind::Interface),
            ["h1.zrh.acme.example.net/eth0"]
        );
        assert_eq!(ids(&layout, EntityKind::Br), ["ff00:0:110/br1", "ff00:0:110/br2"]);
        assert_eq!(ids(&layout, EntityKind::Ps), ["ff00:0:110/ps1"]);
        layout.check_integrity().unwrap();
    }

    #[test]
    fn services_are_named_after_the_first_isd() {
        let (isds, org) = inputs(ORG);
        let layout = Builder::new().build(&isds, &org).unwrap();

        let names: Vec<_> = [EntityKind::Br, EntityKind::Ps, EntityKind::Sig]
            .into_iter()
            .flat_map(|kind| layout.views(kind))
            .map(|v| v.text("Name").to_string())
            .collect();
        assert_eq!(
            names,
            [
                "br2-ff00:0:110-br1",
                "br2-ff00:0:110-br2",
                "ps2-ff00:0:110-ps1",
                "sig2-ff00:0:110-sig1",
            ]
        );
    }

    #[test]
    fn scalars_and_interface_attributes_are_copied() {
        let (isds, org) = inputs(ORG);
        let layout = Builder::new().build(&isds, &org).unwrap();

        let asys = layout.view(layout.get(EntityKind::As, "ff00:0:110").unwrap()).unwrap();
        assert!(asys.flag("Core"));
        assert_eq!(asys.int("MTU"), 1472);
        let isds: Vec<_> = asys.many("ISD").unwrap().map(|v| v.id()).collect();
        assert_eq!(isds, ["2", "1"], "ISD order follows the input list");

        let iface = layout
            .view(layout.get(EntityKind::Interface, "h1.zrh.acme/eth0").unwrap())
            .unwrap();
        assert_eq!(iface.text("SIMNumber"), "8941");
        assert_eq!(iface.text("IP4PTP"), "10.0.0.1/31");
        assert_eq!(iface.text("PhoneNumber"), "41791234567");

        let host = iface.one("Host").unwrap().unwrap();
        assert_eq!(host.int("MachineType"), 3);
        assert_eq!(host.text("SerialNumber"), "SN-1");
        assert_eq!(host.one("Site").unwrap().unwrap().text("Location"), "Zurich");
    }

    #[test]
    fn unknown_isd_is_rejected() {
        let (isds, org) = inputs("shortname: acme\nases:\n  '110':\n    isds: [7]\n");
        let err = Builder::new().build(&isds, &org).unwrap_err();
        assert!(matches!(err, BuildError::UnknownIsd { isd: 7, .. }));
        assert_eq!(err.to_string(), "AS '110' references unknown ISD 7");
    }

    #[test]
    fn as_without_isd_is_rejected() {
        let (isds, org) = inputs("shortname: acme\nases:\n  '110':\n    mtu: 1472\n");
        let err = Builder::new().build(&isds, &org).unwrap_err();
        assert!(matches!(err, BuildError::MissingIsd { .. }));
    }

    #[test]
    fn unknown_interface_attribute_is_rejected() {
        let org = "
shortname: acme
sites:
  zrh:
    hosts:
      h1:
        interfaces:
          eth0:
            speed: 10G
";
        let (isds, org) = inputs(org);
        let err = Builder::new().build(&isds, &org).unwrap_err();
        assert!(matches!(err, BuildError::UnknownAttribute { .. }));
    }

    #[test]
    fn missing_shortname_is_a_core_error() {
        let (isds, org) = inputs("name: Acme\n");
        let err = Builder::new().build(&isds, &org).unwrap_err();
        assert_eq!(err.core_kind(), Some(ErrorKind::InvalidId));
    }
}
