use crate::{
    node::{EntityModel, FieldModel, RelationModel},
    types::EntityKind,
};

// Service roles share one shape: a display name and the owning AS.
const SERVICE_FIELDS: &[FieldModel] = &[FieldModel::text("Name")];

const fn service(kind: EntityKind, relations: &'static [RelationModel]) -> EntityModel {
    EntityModel {
        kind,
        fields: SERVICE_FIELDS,
        relations,
    }
}

const BR_RELATIONS: &[RelationModel] = &[RelationModel::one("AS", EntityKind::As, "BR")];
const BS_RELATIONS: &[RelationModel] = &[RelationModel::one("AS", EntityKind::As, "BS")];
const CS_RELATIONS: &[RelationModel] = &[RelationModel::one("AS", EntityKind::As, "CS")];
const PS_RELATIONS: &[RelationModel] = &[RelationModel::one("AS", EntityKind::As, "PS")];
const SIG_RELATIONS: &[RelationModel] = &[RelationModel::one("AS", EntityKind::As, "SIG")];

///
/// ENTITIES
///
/// The layout schema, indexed by [`EntityKind::index`].
///

pub static ENTITIES: [EntityModel; 11] = [
    EntityModel {
        kind: EntityKind::As,
        fields: &[FieldModel::flag("Core"), FieldModel::int("MTU")],
        relations: &[
            RelationModel::many("BR", EntityKind::Br, "AS"),
            RelationModel::many("BS", EntityKind::Bs, "AS"),
            RelationModel::many("CS", EntityKind::Cs, "AS"),
            RelationModel::many("ISD", EntityKind::Isd, "AS"),
            RelationModel::one("Organization", EntityKind::Organization, "AS"),
            RelationModel::many("PS", EntityKind::Ps, "AS"),
            RelationModel::many("SIG", EntityKind::Sig, "AS"),
        ],
    },
    service(EntityKind::Br, BR_RELATIONS),
    service(EntityKind::Bs, BS_RELATIONS),
    service(EntityKind::Cs, CS_RELATIONS),
    EntityModel {
        kind: EntityKind::Host,
        fields: &[
            FieldModel::text("Location"),
            FieldModel::int("MachineType"),
            FieldModel::text("SerialNumber"),
        ],
        relations: &[
            RelationModel::many("Interface", EntityKind::Interface, "Host"),
            RelationModel::one("Site", EntityKind::Site, "Host"),
        ],
    },
    EntityModel {
        kind: EntityKind::Interface,
        fields: &[
            FieldModel::text("IMEI"),
            FieldModel::text("IP4MaskExt"),
            FieldModel::text("IP4MaskInt"),
            FieldModel::text("IP4PTP"),
            FieldModel::text("IP4Peer"),
            FieldModel::text("IP6MaskInt"),
            FieldModel::text("OSName"),
            FieldModel::text("PeerName"),
            FieldModel::text("PhoneNumber"),
            FieldModel::text("PhysicalName"),
            FieldModel::text("PublicKey"),
            FieldModel::text("Routes4"),
            FieldModel::text("Routes6"),
            FieldModel::text("SIMNumber"),
            FieldModel::text("SerialNumber"),
        ],
        relations: &[RelationModel::one("Host", EntityKind::Host, "Interface")],
    },
    EntityModel {
        kind: EntityKind::Isd,
        fields: &[FieldModel::text("Name")],
        relations: &[RelationModel::many("AS", EntityKind::As, "ISD")],
    },
    EntityModel {
        kind: EntityKind::Organization,
        fields: &[FieldModel::text("Name")],
        relations: &[
            RelationModel::many("AS", EntityKind::As, "Organization"),
            RelationModel::many("Site", EntityKind::Site, "Organization"),
        ],
    },
    service(EntityKind::Ps, PS_RELATIONS),
    service(EntityKind::Sig, SIG_RELATIONS),
    EntityModel {
        kind: EntityKind::Site,
        fields: &[FieldModel::text("Location")],
        relations: &[
            RelationModel::many("Host", EntityKind::Host, "Site"),
            RelationModel::one("Organization", EntityKind::Organization, "Site"),
        ],
    },
];

///
/// TESTS
///
