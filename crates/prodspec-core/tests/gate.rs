use prodspec_core::{
    Error, ErrorKind,
    codec::Generator,
    gate::{Fingerprint, Gate, GateError, GateStatus, NotValidatedReason},
    graph::Layout,
    validate::{ValidateError, Validators, rules},
};
use prodspec_schema::types::EntityKind;
use std::fs;
use tempfile::TempDir;

fn generator() -> Generator {
    Generator::new("prodspec", "0.4.0", "rustc test")
}

// A layout that passes every standard rule.
fn deployable() -> Layout {
    let mut layout = Layout::new();
    let isd = layout.create(EntityKind::Isd, "1").unwrap();
    let org = layout.create(EntityKind::Organization, "acme").unwrap();
    let asys = layout.create(EntityKind::As, "110").unwrap();
    let br = layout.create(EntityKind::Br, "110/br1").unwrap();

    layout.set_attr(asys, "MTU", 1472_i64).unwrap();
    layout.set_attr(br, "Name", "br1-110-br1").unwrap();
    layout.add(asys, "ISD", isd).unwrap();
    layout.set(asys, "Organization", org).unwrap();
    layout.set(br, "AS", asys).unwrap();

    layout
}

fn gate_in(dir: &TempDir) -> Gate {
    Gate::new(dir.path().join("prodspec.toml"))
}

fn kind_of(err: GateError) -> ErrorKind {
    Error::from(err).kind()
}

#[test]
fn validated_marker_holds_the_hash_of_the_exact_bytes() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);

    let saved = gate.save(&deployable(), &generator()).unwrap();
    let validated = gate.run_validation(&rules::standard()).unwrap();
    assert_eq!(saved, validated);

    let bytes = fs::read(gate.layout_path()).unwrap();
    let marker = fs::read_to_string(gate.marker_path()).unwrap();
    assert_eq!(marker, Fingerprint::of(&bytes).as_hex());
    assert_eq!(marker.len(), 64);
    assert!(!marker.ends_with('\n'));

    let layout = gate.load_validated().unwrap();
    assert_eq!(layout.fingerprint(), validated);
    assert_eq!(layout.len(EntityKind::As), 1);
    assert_eq!(layout.generator(), Some(&generator()));
}

#[test]
fn appending_one_character_revokes_trust() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);
    gate.save(&deployable(), &generator()).unwrap();
    gate.run_validation(&rules::standard()).unwrap();
    assert!(gate.load_validated().is_ok());

    let mut text = fs::read_to_string(gate.layout_path()).unwrap();
    text.push('x');
    fs::write(gate.layout_path(), text).unwrap();

    let err = gate.load_validated().unwrap_err();
    assert!(matches!(
        err,
        GateError::NotValidated {
            reason: NotValidatedReason::Mismatch { .. },
            ..
        }
    ));
    assert_eq!(kind_of(err), ErrorKind::NotValidated);
}

#[test]
fn flipping_any_byte_revokes_trust() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);
    gate.save(&deployable(), &generator()).unwrap();
    gate.run_validation(&rules::standard()).unwrap();

    let original = fs::read(gate.layout_path()).unwrap();
    for i in [0, original.len() / 2, original.len() - 1] {
        let mut bytes = original.clone();
        bytes[i] ^= 0x01;
        fs::write(gate.layout_path(), &bytes).unwrap();

        let err = gate.load_validated().unwrap_err();
        assert_eq!(kind_of(err), ErrorKind::NotValidated, "byte {i}");
    }

    fs::write(gate.layout_path(), &original).unwrap();
    assert!(gate.load_validated().is_ok(), "restored bytes match again");
}

#[test]
fn missing_marker_is_not_validated() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);
    let fingerprint = gate.save(&deployable(), &generator()).unwrap();

    assert_eq!(
        gate.status().unwrap(),
        GateStatus::Unvalidated {
            fingerprint,
            reason: NotValidatedReason::MissingMarker,
        }
    );
    assert_eq!(
        kind_of(gate.load_validated().unwrap_err()),
        ErrorKind::NotValidated
    );

    // unvalidated reads are always allowed
    let (layout, loaded) = gate.load_unvalidated().unwrap();
    assert_eq!(loaded, fingerprint);
    assert_eq!(layout.total(), 4);
}

#[test]
fn failed_validation_leaves_the_marker_alone() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);
    gate.save(&deployable(), &generator()).unwrap();
    let good = gate.run_validation(&rules::standard()).unwrap();

    let mut broken = deployable();
    let asys = broken.get(EntityKind::As, "110").unwrap();
    broken.set_attr(asys, "MTU", 100_i64).unwrap();
    broken.create(EntityKind::Host, "h1").unwrap();
    gate.save(&broken, &generator()).unwrap();

    let err = gate.run_validation(&rules::standard()).unwrap_err();
    let GateError::Validate(ValidateError::ValidationFailed(issues)) = &err else {
        panic!("expected validation failure, got {err}");
    };
    let lines: Vec<_> = issues.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        [
            "AS '110': MTU 100 is outside 1280..=65535",
            "Host 'h1': relation 'Site' is not set",
        ]
    );
    assert_eq!(kind_of(err), ErrorKind::ValidationFailed);

    let marker = fs::read_to_string(gate.marker_path()).unwrap();
    assert_eq!(marker, good.as_hex());
    assert!(!gate.status().unwrap().is_validated());
}

#[test]
fn saving_does_not_touch_the_marker() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);
    gate.save(&deployable(), &generator()).unwrap();
    gate.run_validation(&Validators::new()).unwrap();
    assert!(gate.status().unwrap().is_validated());

    // identical content keeps the same fingerprint and stays trusted
    gate.save(&deployable(), &generator()).unwrap();
    assert!(gate.status().unwrap().is_validated());

    let mut changed = deployable();
    changed.create(EntityKind::Isd, "2").unwrap();
    gate.save(&changed, &generator()).unwrap();
    assert!(!gate.status().unwrap().is_validated());
}

#[test]
fn marker_path_is_configurable() {
    let dir = TempDir::new().unwrap();
    let marker = dir.path().join("state.hash");
    let gate = gate_in(&dir).with_marker(&marker);

    gate.save(&deployable(), &generator()).unwrap();
    gate.run_validation(&rules::standard()).unwrap();

    assert!(marker.exists());
    assert!(!dir.path().join("prodspec.toml.validated").exists());
    assert!(gate.load_validated().is_ok());
}

#[test]
fn missing_layout_is_an_io_error_with_its_path() {
    let dir = TempDir::new().unwrap();
    let gate = gate_in(&dir);

    let err = gate.load_unvalidated().unwrap_err();
    assert!(err.to_string().contains("prodspec.toml"));
    assert_eq!(kind_of(err), ErrorKind::Io);
}
