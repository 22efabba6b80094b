//! End-to-end index tests over a synthetic file: storage label, file
//! header, origin, channel and frame definitions, then frame data.

use std::io::Cursor;

use rp66_eflr::DuplicatePolicy;
use rp66_error::{Rp66Error, ScanError};
use rp66_index::{ErrorMode, FileIndex, IndexEntry, IndexOptions};
use rp66_types::ObjectName;

const EFLR: u8 = 0x80;
const ENCRYPTED: u8 = 0x10;
const PADDING: u8 = 0x01;

const SET_T: u8 = 0xF0;
const OBJECT_N: u8 = 0x70;
const ATTR: u8 = 0x20;
const A_LABEL: u8 = 0x10;
const A_COUNT: u8 = 0x08;
const A_REP: u8 = 0x04;
const A_VALUE: u8 = 0x01;

const ASCII: u8 = 20;
const USHORT: u8 = 15;
const UNITS_CODE: u8 = 27;
const OBNAME_CODE: u8 = 23;
const UVARI_CODE: u8 = 18;
const FSINGL: u8 = 2;

fn push_ident(out: &mut Vec<u8>, s: &[u8]) {
    out.push(u8::try_from(s.len()).unwrap());
    out.extend_from_slice(s);
}

fn push_obname(out: &mut Vec<u8>, origin: u8, copy: u8, ident: &[u8]) {
    out.push(origin);
    out.push(copy);
    push_ident(out, ident);
}

/// Template entry carrying label and representation code.
fn template_attr(out: &mut Vec<u8>, label: &[u8], rep: u8) {
    out.push(ATTR | A_LABEL | A_REP);
    push_ident(out, label);
    out.push(rep);
}

fn ascii_value(out: &mut Vec<u8>, s: &[u8]) {
    out.push(ATTR | A_VALUE);
    out.push(u8::try_from(s.len()).unwrap());
    out.extend_from_slice(s);
}

fn file_header_eflr() -> (u8, Vec<u8>) {
    let mut out = Vec::new();
    out.push(SET_T);
    push_ident(&mut out, b"FILE-HEADER");
    template_attr(&mut out, b"SEQUENCE-NUMBER", ASCII);
    template_attr(&mut out, b"ID", ASCII);
    out.push(OBJECT_N);
    push_obname(&mut out, 0, 0, b"5");
    ascii_value(&mut out, b"199");
    ascii_value(&mut out, b"SYNTHETIC LOG");
    (0, out)
}

fn origin_eflr() -> (u8, Vec<u8>) {
    let mut out = Vec::new();
    out.push(SET_T);
    push_ident(&mut out, b"ORIGIN");
    template_attr(&mut out, b"FILE-ID", ASCII);
    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"DLIS-1");
    ascii_value(&mut out, b"synthetic");
    (1, out)
}

fn channel_eflr() -> (u8, Vec<u8>) {
    let mut out = Vec::new();
    out.push(SET_T);
    push_ident(&mut out, b"CHANNEL");
    template_attr(&mut out, b"LONG-NAME", ASCII);
    template_attr(&mut out, b"REPRESENTATION-CODE", USHORT);
    template_attr(&mut out, b"UNITS", UNITS_CODE);
    template_attr(&mut out, b"DIMENSION", UVARI_CODE);

    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"TIME");
    ascii_value(&mut out, b"Time");
    out.push(ATTR | A_VALUE);
    out.push(FSINGL);
    out.push(ATTR | A_VALUE);
    push_ident(&mut out, b"s");
    out.push(ATTR | A_VALUE);
    out.push(1);

    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"PRESSURE");
    ascii_value(&mut out, b"Pressure");
    out.push(ATTR | A_VALUE);
    out.push(FSINGL);
    out.push(ATTR | A_VALUE);
    push_ident(&mut out, b"psi");
    out.push(ATTR | A_VALUE);
    out.push(1);

    (3, out)
}

fn frame_eflr() -> (u8, Vec<u8>) {
    let mut out = Vec::new();
    out.push(SET_T);
    push_ident(&mut out, b"FRAME");
    template_attr(&mut out, b"DESCRIPTION", ASCII);
    template_attr(&mut out, b"CHANNELS", OBNAME_CODE);
    out.push(OBJECT_N);
    push_obname(&mut out, 1, 0, b"60B");
    ascii_value(&mut out, b"time pass");
    out.push(ATTR | A_COUNT | A_VALUE);
    out.push(2);
    push_obname(&mut out, 1, 0, b"TIME");
    push_obname(&mut out, 1, 0, b"PRESSURE");
    (4, out)
}

fn frame_data(frame_number: u32, time: f32, pressure: f32) -> Vec<u8> {
    let mut out = Vec::new();
    push_obname(&mut out, 1, 0, b"60B");
    assert!(frame_number < (1 << 14));
    if frame_number < 128 {
        out.push(frame_number as u8);
    } else {
        out.extend_from_slice(&(0x8000 | frame_number as u16).to_be_bytes());
    }
    out.extend_from_slice(&time.to_be_bytes());
    out.extend_from_slice(&pressure.to_be_bytes());
    out
}

/// Wrap one logical record payload as a single-segment visible record,
/// padding up to the 16-byte segment minimum and to even length.
fn wrap(attrs: u8, record_type: u8, payload: &[u8]) -> Vec<u8> {
    let unpadded = 4 + payload.len();
    let padded = unpadded.max(16).next_multiple_of(2);
    let pad = padded - unpadded;
    let mut attrs = attrs;
    if pad > 0 {
        assert!(
            attrs & ENCRYPTED == 0,
            "the builder cannot pad encrypted payloads"
        );
        attrs |= PADDING;
    }

    let seg_len = u16::try_from(padded).unwrap();
    let vr_len = seg_len + 4;
    let mut out = Vec::with_capacity(usize::from(vr_len));
    out.extend_from_slice(&vr_len.to_be_bytes());
    out.extend_from_slice(&0xFF01u16.to_be_bytes());
    out.extend_from_slice(&seg_len.to_be_bytes());
    out.push(attrs);
    out.push(record_type);
    out.extend_from_slice(payload);
    if pad > 0 {
        out.extend_from_slice(&vec![0u8; pad - 1]);
        out.push(u8::try_from(pad).unwrap());
    }
    out
}

fn storage_label() -> Vec<u8> {
    let mut bytes = Vec::with_capacity(80);
    bytes.extend_from_slice(b"   1V1.00RECORD 8192");
    bytes.extend_from_slice(&[b' '; 60]);
    bytes
}

/// The complete synthetic file: metadata, one encrypted record, then
/// `frames` uniformly spaced frame-data records.
fn synthetic_file(frames: u32) -> Vec<u8> {
    let mut bytes = storage_label();
    for (lr_type, payload) in [file_header_eflr(), origin_eflr(), channel_eflr(), frame_eflr()] {
        bytes.extend_from_slice(&wrap(EFLR, lr_type, &payload));
    }
    // An encrypted static record: indexed as a stub, never decoded. The
    // payload must already satisfy the minimum segment size.
    bytes.extend_from_slice(&wrap(EFLR | ENCRYPTED, 5, b"0123456789ab"));
    for i in 0..frames {
        let payload = frame_data(i + 1, i as f32 * 0.5, 1000.0 + i as f32);
        bytes.extend_from_slice(&wrap(0, 0, &payload));
    }
    bytes
}

fn options() -> IndexOptions {
    IndexOptions {
        duplicate_policy: DuplicatePolicy::AcceptFirst,
        error_mode: ErrorMode::Strict,
    }
}

fn frame_array_name() -> ObjectName {
    ObjectName::new(1, 0, b"60B".to_vec())
}

#[test]
fn index_classifies_every_record() {
    let index = FileIndex::build(Cursor::new(synthetic_file(100)), options()).unwrap();
    assert_eq!(index.entries().len(), 4 + 1 + 100);
    assert_eq!(index.logical_files().len(), 1);
    assert_eq!(index.skipped(), 0);

    let structured = index
        .entries()
        .iter()
        .filter(|e| matches!(e, IndexEntry::Structured(_)))
        .count();
    let encrypted = index
        .entries()
        .iter()
        .filter(|e| matches!(e, IndexEntry::Encrypted(_)))
        .count();
    let unstructured = index
        .entries()
        .iter()
        .filter(|e| matches!(e, IndexEntry::Unstructured(_)))
        .count();
    assert_eq!((structured, encrypted, unstructured), (4, 1, 100));

    let IndexEntry::Structured(channel_entry) = &index.entries()[2] else {
        panic!("third entry is the channel set");
    };
    assert_eq!(channel_entry.table.set.set_type, b"CHANNEL");
    assert_eq!(channel_entry.table.len(), 2);
}

#[test]
fn uniform_stride_over_1000_frames_is_one_run() {
    let index = FileIndex::build(Cursor::new(synthetic_file(1000)), options()).unwrap();
    let trace = index.trace(&frame_array_name()).unwrap();
    assert_eq!(trace.count(), 1000);
    assert_eq!(trace.x().runs().len(), 1);
    let run = trace.x().runs()[0];
    assert_eq!(run.datum, 0.0);
    assert_eq!(run.stride, 0.5);
    assert_eq!(run.repeat, 999);

    let summary = trace.summary().unwrap();
    assert_eq!(summary.min, 0.0);
    assert_eq!(summary.max, 499.5);
    assert_eq!(summary.count, 1000);
    let spacing = summary.spacing.unwrap();
    assert_eq!(spacing.counts.normal, 999);
    assert_eq!(spacing.counts.total(), 999);
}

#[test]
fn nearest_preceding_frame() {
    let index = FileIndex::build(Cursor::new(synthetic_file(64)), options()).unwrap();
    let trace = index.trace(&frame_array_name()).unwrap();
    let frame = trace.nearest_preceding(10.3).unwrap();
    assert_eq!(frame.x, 10.0);
    assert_eq!(frame.frame_number, 21);
}

#[test]
fn locate_re_reads_identical_bytes() {
    let mut index = FileIndex::build(Cursor::new(synthetic_file(16)), options()).unwrap();
    let entries: Vec<_> = index.entries().to_vec();
    for entry in entries {
        let record = index.locate(entry.position()).unwrap();
        assert_eq!(record.content_hash(), entry.content_hash());
        assert_eq!(record.record_type(), entry.lr_type());
    }
}

#[test]
fn indexing_twice_is_idempotent() {
    let bytes = synthetic_file(64);
    let first = FileIndex::build(Cursor::new(bytes.clone()), options()).unwrap();
    let second = FileIndex::build(Cursor::new(bytes), options()).unwrap();
    assert_eq!(first.entries().len(), second.entries().len());
    for (a, b) in first.entries().iter().zip(second.entries()) {
        assert_eq!(a.position(), b.position());
        assert_eq!(a.lr_type(), b.lr_type());
        assert_eq!(a.content_hash(), b.content_hash());
    }
}

#[test]
fn populate_all_rows_and_channels() {
    let mut index = FileIndex::build(Cursor::new(synthetic_file(50)), options()).unwrap();
    let data = index.populate(&frame_array_name(), None, None).unwrap();
    assert_eq!(data.rows, 50);
    assert_eq!(data.channels.len(), 2);
    assert_eq!(data.sample_count(), 100);

    let time = &data.channels[0];
    assert_eq!(time.name.ident, b"TIME");
    assert_eq!(time.units, b"s");
    assert_eq!(time.values.len(), 50);
    assert_eq!(time.values[10], 5.0);

    let pressure = &data.channels[1];
    assert_eq!(pressure.name.ident, b"PRESSURE");
    assert_eq!(pressure.values[49], 1049.0);
}

#[test]
fn populate_row_window_and_channel_subset() {
    let mut index = FileIndex::build(Cursor::new(synthetic_file(50)), options()).unwrap();
    // The x channel is always included, so an empty subset yields just
    // the x axis.
    let data = index
        .populate(&frame_array_name(), Some(10..20), Some(&[]))
        .unwrap();
    assert_eq!(data.rows, 10);
    assert_eq!(data.channels.len(), 1);
    assert_eq!(data.channels[0].name.ident, b"TIME");
    assert_eq!(data.channels[0].values, (10..20).map(|i| f64::from(i) * 0.5).collect::<Vec<_>>());

    let subset = [ObjectName::new(1, 0, b"PRESSURE".to_vec())];
    let data = index
        .populate(&frame_array_name(), Some(48..200), Some(&subset))
        .unwrap();
    assert_eq!(data.rows, 2);
    assert_eq!(data.channels.len(), 2);
    assert_eq!(data.channels[1].values, vec![1048.0, 1049.0]);
}

#[test]
fn populate_unknown_array_fails() {
    let mut index = FileIndex::build(Cursor::new(synthetic_file(4)), options()).unwrap();
    let missing = ObjectName::new(1, 0, b"NOPE".to_vec());
    assert!(matches!(
        index.populate(&missing, None, None),
        Err(Rp66Error::NoSuchFrameArray { .. })
    ));
}

#[test]
fn frame_data_before_schema_is_fatal() {
    let mut bytes = storage_label();
    for (lr_type, payload) in [file_header_eflr(), origin_eflr()] {
        bytes.extend_from_slice(&wrap(EFLR, lr_type, &payload));
    }
    bytes.extend_from_slice(&wrap(0, 0, &frame_data(1, 0.0, 0.0)));

    for mode in [ErrorMode::Strict, ErrorMode::KeepGoing] {
        let result = FileIndex::build(
            Cursor::new(bytes.clone()),
            IndexOptions {
                duplicate_policy: DuplicatePolicy::AcceptFirst,
                error_mode: mode,
            },
        );
        assert!(matches!(
            result,
            Err(Rp66Error::Scan(ScanError::MissingFrameSchema { .. }))
        ));
    }
}

#[test]
fn record_before_file_header_is_fatal() {
    let mut bytes = storage_label();
    let (lr_type, payload) = origin_eflr();
    bytes.extend_from_slice(&wrap(EFLR, lr_type, &payload));
    let result = FileIndex::build(Cursor::new(bytes), options());
    assert!(matches!(
        result,
        Err(Rp66Error::Scan(ScanError::RecordBeforeFileHeader { .. }))
    ));
}

#[test]
fn keep_going_skips_undecodable_records() {
    // Surface the skip warnings when the test runs with --nocapture.
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut bytes = storage_label();
    for (lr_type, payload) in [file_header_eflr(), origin_eflr(), channel_eflr(), frame_eflr()] {
        bytes.extend_from_slice(&wrap(EFLR, lr_type, &payload));
    }
    // A structured record that opens with an attribute descriptor instead
    // of a set.
    bytes.extend_from_slice(&wrap(EFLR, 5, &[ATTR | A_VALUE, 0x01, 0x02, 0x03]));
    for i in 0..4u32 {
        bytes.extend_from_slice(&wrap(0, 0, &frame_data(i + 1, i as f32, 0.0)));
    }

    let strict = FileIndex::build(Cursor::new(bytes.clone()), options());
    assert!(matches!(strict, Err(Rp66Error::Decode(_))));

    let index = FileIndex::build(
        Cursor::new(bytes),
        IndexOptions {
            duplicate_policy: DuplicatePolicy::AcceptFirst,
            error_mode: ErrorMode::KeepGoing,
        },
    )
    .unwrap();
    assert_eq!(index.skipped(), 1);
    assert_eq!(index.entries().len(), 4 + 4);
    assert_eq!(index.trace(&frame_array_name()).unwrap().count(), 4);
}

#[test]
fn traces_serialize_for_persistence() {
    let index = FileIndex::build(Cursor::new(synthetic_file(32)), options()).unwrap();
    let trace = index.trace(&frame_array_name()).unwrap();
    let json = serde_json::to_string(trace).unwrap();
    let back: rp66_index::XAxisTrace = serde_json::from_str(&json).unwrap();
    assert_eq!(trace, &back);
    assert_eq!(back.count(), 32);
}
