//! Scenario tests built around the standard's worked CHANNEL example:
//! a set with template LONG-NAME / ELEMENT-LIMIT / REPRESENTATION-CODE /
//! UNITS / DIMENSION and objects TIME, PRESSURE and PAD-ARRAY.

use rp66_eflr::{DuplicatePolicy, EflrTable};
use rp66_error::DecodeError;
use rp66_types::{ByteCursor, ObjectName, Value};

const SET_TN: u8 = 0xF8;
const OBJECT_N: u8 = 0x70;
const ATTR: u8 = 0x20;
const L: u8 = 0x10;
const C: u8 = 0x08;
const R: u8 = 0x04;
const U: u8 = 0x02;
const V: u8 = 0x01;

const ASCII: u8 = 20;
const UNORM: u8 = 16;
const USHORT: u8 = 15;
const SNORM: u8 = 13;
const UNITS_CODE: u8 = 27;

fn push_ident(out: &mut Vec<u8>, s: &[u8]) {
    out.push(u8::try_from(s.len()).unwrap());
    out.extend_from_slice(s);
}

fn push_obname(out: &mut Vec<u8>, origin: u8, copy: u8, ident: &[u8]) {
    out.push(origin);
    out.push(copy);
    push_ident(out, ident);
}

fn push_unorm(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_be_bytes());
}

fn push_ascii_value(out: &mut Vec<u8>, s: &[u8]) {
    out.push(u8::try_from(s.len()).unwrap());
    out.extend_from_slice(s);
}

/// Template entry with label and representation code.
fn template_attr(out: &mut Vec<u8>, label: &[u8], rep: u8, count: Option<u16>) {
    let mut desc = ATTR | L | R;
    if count.is_some() {
        desc |= C;
    }
    out.push(desc);
    push_ident(out, label);
    if let Some(n) = count {
        assert!(n < 128, "test counts stay in the one-byte UVARI form");
        out.push(n as u8);
    }
    out.push(rep);
}

/// The worked example set, returned as sealed record bytes.
fn channel_set_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    out.push(SET_TN);
    push_ident(&mut out, b"CHANNEL");
    push_ident(&mut out, b"0");

    template_attr(&mut out, b"LONG-NAME", ASCII, None);
    template_attr(&mut out, b"ELEMENT-LIMIT", UNORM, Some(1));
    template_attr(&mut out, b"REPRESENTATION-CODE", USHORT, None);
    template_attr(&mut out, b"UNITS", UNITS_CODE, None);
    template_attr(&mut out, b"DIMENSION", UNORM, Some(1));

    // TIME: every attribute states only its value.
    out.push(OBJECT_N);
    push_obname(&mut out, 2, 0, b"TIME");
    out.push(ATTR | V);
    push_ascii_value(&mut out, b"Time");
    out.push(ATTR | V);
    push_unorm(&mut out, 1);
    out.push(ATTR | V);
    out.push(2); // FSINGL
    out.push(ATTR | V);
    push_ident(&mut out, b"S");
    out.push(ATTR | V);
    push_unorm(&mut out, 1);

    // PRESSURE.
    out.push(OBJECT_N);
    push_obname(&mut out, 2, 0, b"PRESSURE");
    out.push(ATTR | V);
    push_ascii_value(&mut out, b"Pressure");
    out.push(ATTR | V);
    push_unorm(&mut out, 1);
    out.push(ATTR | V);
    out.push(7); // FDOUBL
    out.push(ATTR | V);
    push_ident(&mut out, b"psi");
    out.push(ATTR | V);
    push_unorm(&mut out, 1);

    // PAD-ARRAY: two-element limits, units omitted entirely.
    out.push(OBJECT_N);
    push_obname(&mut out, 2, 0, b"PAD-ARRAY");
    out.push(ATTR | V);
    push_ascii_value(&mut out, b"Pad Array");
    out.push(ATTR | C | V);
    out.push(2);
    push_unorm(&mut out, 8);
    push_unorm(&mut out, 20);
    out.push(ATTR | V);
    out.push(SNORM);
    out.push(ATTR); // no characteristics at all
    out.push(ATTR | C | V);
    out.push(2);
    push_unorm(&mut out, 8);
    push_unorm(&mut out, 20);

    out
}

fn parse(bytes: &[u8], policy: DuplicatePolicy) -> Result<EflrTable, DecodeError> {
    let mut cur = ByteCursor::new(bytes);
    EflrTable::parse(3, &mut cur, policy)
}

#[test]
fn worked_example_decodes_to_three_objects() {
    let table = parse(&channel_set_bytes(), DuplicatePolicy::AcceptFirst).unwrap();
    assert_eq!(table.set.set_type, b"CHANNEL");
    assert_eq!(table.set.name, b"0");
    assert_eq!(table.shape(), (3, 5));

    let names: Vec<_> = table
        .objects()
        .iter()
        .map(|o| o.name.ident.clone())
        .collect();
    assert_eq!(names, vec![b"TIME".to_vec(), b"PRESSURE".to_vec(), b"PAD-ARRAY".to_vec()]);
}

#[test]
fn pad_array_element_limit_and_units() {
    let table = parse(&channel_set_bytes(), DuplicatePolicy::AcceptFirst).unwrap();
    let pad = table
        .object(&ObjectName::new(2, 0, b"PAD-ARRAY".to_vec()))
        .unwrap();

    let limit = pad.attribute(b"ELEMENT-LIMIT").unwrap();
    assert_eq!(limit.count, 2);
    assert_eq!(
        limit.value.as_deref(),
        Some(&[Value::Uint(8), Value::Uint(20)][..])
    );

    // Units characteristic inherited from the template, value absent and
    // not inherited.
    let units = pad.attribute(b"UNITS").unwrap();
    assert_eq!(units.label, b"UNITS");
    assert_eq!(units.rep_code.code(), UNITS_CODE);
    assert!(units.value.is_none());
}

#[test]
fn omitted_characteristics_equal_the_templates() {
    let table = parse(&channel_set_bytes(), DuplicatePolicy::AcceptFirst).unwrap();
    let time = table.object(&ObjectName::new(2, 0, b"TIME".to_vec())).unwrap();

    let limit = time.attribute(b"ELEMENT-LIMIT").unwrap();
    let tmpl = &table.template.attrs()[table.template.index_of(b"ELEMENT-LIMIT").unwrap()].attr;
    assert_eq!(limit.label, tmpl.label);
    assert_eq!(limit.count, tmpl.count);
    assert_eq!(limit.rep_code, tmpl.rep_code);
    assert_eq!(limit.units, tmpl.units);
    assert_eq!(limit.value.as_deref(), Some(&[Value::Uint(1)][..]));

    let rep = time.attribute(b"REPRESENTATION-CODE").unwrap();
    assert_eq!(rep.value.as_deref(), Some(&[Value::Uint(2)][..]));
    let units = time.attribute(b"UNITS").unwrap();
    assert_eq!(units.value.as_deref(), Some(&[Value::Units(b"S".to_vec())][..]));
}

#[test]
fn template_with_all_five_characteristics_inherits_all_but_value() {
    let mut out = Vec::new();
    out.push(0xF0); // set with type only
    push_ident(&mut out, b"PARAMETER");
    // Template attribute with L, C, R, U and V present.
    out.push(ATTR | L | C | R | U | V);
    push_ident(&mut out, b"VALUES");
    out.push(2);
    out.push(UNORM);
    push_ident(&mut out, b"m");
    push_unorm(&mut out, 7);
    push_unorm(&mut out, 9);
    // One object whose attribute omits everything.
    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"P1");
    out.push(ATTR);

    let table = parse(&out, DuplicatePolicy::Raise).unwrap();
    assert_eq!(table.set.name, b"");
    let p1 = table.object(&ObjectName::new(1, 0, b"P1".to_vec())).unwrap();
    let attr = p1.attribute(b"VALUES").unwrap();
    assert_eq!(attr.label, b"VALUES");
    assert_eq!(attr.count, 2);
    assert_eq!(attr.rep_code.code(), UNORM);
    assert_eq!(attr.units, b"m");
    // The template's default value exists, but the object does not
    // inherit it.
    let tmpl = &table.template.attrs()[0].attr;
    assert_eq!(
        tmpl.value.as_deref(),
        Some(&[Value::Uint(7), Value::Uint(9)][..])
    );
    assert!(attr.value.is_none());
}

#[test]
fn duplicate_terminal_object_accept_first() {
    let mut bytes = channel_set_bytes();
    // Duplicate the PAD-ARRAY object byte for byte.
    let start = bytes
        .windows(13)
        .position(|w| w[0] == OBJECT_N && &w[4..13] == b"PAD-ARRAY")
        .unwrap();
    let dup = bytes[start..].to_vec();
    bytes.extend_from_slice(&dup);

    let table = parse(&bytes, DuplicatePolicy::AcceptFirst).unwrap();
    assert_eq!(table.len(), 3);
}

#[test]
fn duplicate_terminal_object_raise() {
    let mut bytes = channel_set_bytes();
    let start = bytes
        .windows(13)
        .position(|w| w[0] == OBJECT_N && &w[4..13] == b"PAD-ARRAY")
        .unwrap();
    let dup = bytes[start..].to_vec();
    bytes.extend_from_slice(&dup);

    let err = parse(&bytes, DuplicatePolicy::Raise).unwrap_err();
    match err {
        DecodeError::DuplicateObject { set_type, name } => {
            assert_eq!(set_type, "CHANNEL");
            assert_eq!(name, "PAD-ARRAY");
        }
        other => panic!("unexpected error {other}"),
    }
}

#[test]
fn duplicate_terminal_object_replace_keeps_last() {
    let mut bytes = channel_set_bytes();
    let start = bytes
        .windows(13)
        .position(|w| w[0] == OBJECT_N && &w[4..13] == b"PAD-ARRAY")
        .unwrap();
    let mut dup = bytes[start..].to_vec();
    // Change the duplicate's LONG-NAME value from "Pad Array" to
    // "Pad Xrray" so the replacement is observable.
    let pos = dup.windows(9).position(|w| w == b"Pad Array").unwrap();
    dup[pos + 4] = b'X';
    bytes.extend_from_slice(&dup);

    let table = parse(&bytes, DuplicatePolicy::Replace).unwrap();
    assert_eq!(table.len(), 3);
    let pad = table
        .object(&ObjectName::new(2, 0, b"PAD-ARRAY".to_vec()))
        .unwrap();
    assert_eq!(
        pad.attribute(b"LONG-NAME").unwrap().value.as_deref(),
        Some(&[Value::Ascii(b"Pad Xrray".to_vec())][..])
    );
}

#[test]
fn set_only_record_is_a_valid_empty_table() {
    let mut out = Vec::new();
    out.push(0xF0);
    push_ident(&mut out, b"UPDATE");
    let table = parse(&out, DuplicatePolicy::Raise).unwrap();
    assert_eq!(table.shape(), (0, 0));
    assert!(table.is_empty());
}

#[test]
fn record_not_opening_with_a_set_is_an_error() {
    let mut out = Vec::new();
    out.push(ATTR | L);
    push_ident(&mut out, b"LOOSE");
    let err = parse(&out, DuplicatePolicy::Raise).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnexpectedRole { expected: "set", .. }
    ));
}

#[test]
fn truncated_object_inherits_template_tail_without_values() {
    let mut out = Vec::new();
    out.push(0xF0);
    push_ident(&mut out, b"TOOL");
    template_attr(&mut out, b"NAME", ASCII, None);
    template_attr(&mut out, b"SERIAL", ASCII, None);
    // Object with only the first attribute present.
    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"T1");
    out.push(ATTR | V);
    push_ascii_value(&mut out, b"caliper");

    let table = parse(&out, DuplicatePolicy::Raise).unwrap();
    let tool = table.object(&ObjectName::new(1, 0, b"T1".to_vec())).unwrap();
    assert_eq!(tool.len(), 2);
    let serial = tool.attribute(b"SERIAL").unwrap();
    assert_eq!(serial.label, b"SERIAL");
    assert!(serial.value.is_none());
}
