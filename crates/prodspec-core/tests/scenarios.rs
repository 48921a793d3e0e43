use prodspec_core::{
    Error, ErrorKind,
    codec::{self, Generator},
    gate::Gate,
    graph::{Layout, RelationError, StoreError},
};
use prodspec_schema::types::EntityKind;
use std::fs;
use tempfile::TempDir;

#[test]
fn as_linked_to_isd_survives_save_and_reload() {
    let dir = TempDir::new().unwrap();
    let gate = Gate::new(dir.path().join("prodspec.toml"));

    let mut layout = Layout::new();
    let asys = layout.create(EntityKind::As, "110").unwrap();
    let isd = layout.create(EntityKind::Isd, "1").unwrap();
    layout.add(asys, "ISD", isd).unwrap();
    gate.save(&layout, &Generator::default()).unwrap();

    let (back, _) = gate.load_unvalidated().unwrap();
    let asys = back.get(EntityKind::As, "110").unwrap();
    let isds: Vec<_> = back
        .view(asys)
        .unwrap()
        .many("ISD")
        .unwrap()
        .map(|v| v.id())
        .collect();
    assert_eq!(isds, ["1"]);

    let isd = back.get(EntityKind::Isd, "1").unwrap();
    assert_eq!(back.related(isd, "AS").unwrap(), [asys]);
}

#[test]
fn duplicate_border_router_keeps_the_first_linked() {
    let mut layout = Layout::new();
    let asys = layout.create(EntityKind::As, "110").unwrap();
    let br = layout.create(EntityKind::Br, "110/br1").unwrap();
    layout.set(br, "AS", asys).unwrap();

    let err = layout.create(EntityKind::Br, "110/br1").unwrap_err();
    assert!(matches!(err, StoreError::DuplicateId { .. }));
    assert_eq!(Error::from(err).kind(), ErrorKind::DuplicateId);

    assert_eq!(layout.len(EntityKind::Br), 1);
    assert_eq!(layout.related(asys, "BR").unwrap(), [br]);
    assert_eq!(layout.related(br, "AS").unwrap(), [asys]);
}

#[test]
fn dangling_reference_in_a_file_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("prodspec.toml");
    fs::write(&path, "[BR.\"110/br1\"]\nAS = \"110\"\n").unwrap();

    let err = Gate::new(&path).load_unvalidated().unwrap_err();
    let message = err.to_string();
    assert_eq!(Error::from(err).kind(), ErrorKind::DanglingReference);
    assert!(message.contains("BR '110/br1': relation 'AS' references missing AS '110'"));
}

#[test]
fn rejected_links_leave_both_sides_unchanged() {
    let mut layout = Layout::new();
    let site_a = layout.create(EntityKind::Site, "a.acme").unwrap();
    let site_b = layout.create(EntityKind::Site, "b.acme").unwrap();
    let host = layout.create(EntityKind::Host, "h1.a.acme").unwrap();
    layout.add(site_a, "Host", host).unwrap();
    let before = codec::encode(&layout, None).unwrap();

    let err = layout.add(site_b, "Host", host).unwrap_err();
    assert!(matches!(err, RelationError::AlreadySet { .. }));
    assert_eq!(Error::from(err).kind(), ErrorKind::RelationAlreadySet);

    assert_eq!(codec::encode(&layout, None).unwrap(), before);
}
