//! Error taxonomy for the rp66 workspace.
//!
//! Errors come in two tiers with different recoverability:
//!
//! - [`ScanError`]: the physical byte stream is broken (bad framing, torn
//!   segment sequence, premature EOF). Framing loss cannot be repaired
//!   locally, so these abort the whole file scan.
//! - [`DecodeError`]: one logical record failed to decode (unknown
//!   representation code, component descriptor out of place, short data).
//!   The enclosing scan may skip the record and continue when the caller
//!   asked for that.
//!
//! [`Rp66Error`] wraps both so APIs that surface either tier can return a
//! single type while callers still match on recoverability.

use thiserror::Error;

/// Fatal errors: the file-level scan cannot continue past these.
#[derive(Error, Debug)]
pub enum ScanError {
    // === Storage unit label ===
    /// The 80-byte storage unit label did not parse.
    #[error("bad storage unit label: {detail}")]
    StorageLabel { detail: String },

    /// The file starts with TIF markers; it must be de-TIFed first.
    #[error("file has TIF markers, strip them before reading")]
    TifMarkers,

    // === Visible records ===
    /// EOF while reading a visible record header.
    #[error("EOF in visible record header at 0x{offset:x}")]
    VisibleRecordEof { offset: u64 },

    /// Visible record format version is not the fixed constant 0xFF01.
    #[error("visible record at 0x{offset:x} has version 0x{version:04x}, expected 0xff01")]
    VisibleRecordVersion { offset: u64, version: u16 },

    /// Visible record length outside [20, 16384].
    #[error("visible record at 0x{offset:x} has length {length}, must be in [{min}, {max}]")]
    VisibleRecordLength {
        offset: u64,
        length: u16,
        min: u16,
        max: u16,
    },

    // === Segment headers ===
    /// EOF while reading a segment header or its payload.
    #[error("EOF in logical record segment at 0x{offset:x}")]
    SegmentEof { offset: u64 },

    /// Segment length out of range for its enclosing visible record.
    #[error("segment at 0x{offset:x} has length {length}, must be in [{min}, {max}]")]
    SegmentLength {
        offset: u64,
        length: u16,
        min: u16,
        max: u16,
    },

    /// First/last flags inconsistent across consecutive segments.
    #[error("segment sequence broken at 0x{offset:x}: {detail}")]
    SegmentSequence { offset: u64, detail: &'static str },

    /// Declared pad length exceeds the segment payload.
    #[error("segment at 0x{offset:x} declares {pad} pad bytes but has only {payload}")]
    SegmentPadding { offset: u64, pad: u8, payload: usize },

    /// A logical record position failed its bound checks.
    #[error("bad logical record position: {detail}")]
    RecordPosition { detail: String },

    // === Record ordering ===
    /// A logical record arrived before any FILE-HEADER record.
    #[error("logical record at 0x{offset:x} precedes the first FILE-HEADER")]
    RecordBeforeFileHeader { offset: u64 },

    /// Frame data arrived before a CHANNEL/FRAME pair defined its layout.
    #[error("frame data at 0x{offset:x} (type {record_type}) has no frame schema yet")]
    MissingFrameSchema { offset: u64, record_type: u8 },

    /// Structured records arrived in an order the format forbids.
    #[error("record ordering violation at 0x{offset:x}: {detail}")]
    RecordOrder { offset: u64, detail: &'static str },

    // === I/O ===
    /// Underlying file I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Record-scoped errors: decoding of one logical record failed.
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Representation code byte outside the 27 known codes.
    #[error("unknown representation code {code}")]
    UnknownRepCode { code: u8 },

    /// A read ran past the end of the sealed record buffer.
    #[error("short logical data: needed {needed} bytes, {remain} remain")]
    ShortData { needed: usize, remain: usize },

    /// UVARI value too large for any of the 1/2/4-byte encodings.
    #[error("value {value} does not fit a variable-length unsigned integer")]
    UvariOverflow { value: u64 },

    /// `encode` was handed a value of the wrong shape for the code.
    #[error("cannot encode {got} as representation code {code}")]
    ValueShape { code: &'static str, got: &'static str },

    /// `encode` was handed a value outside the code's representable range.
    #[error("value out of range for {code}: {value}")]
    ValueRange { code: &'static str, value: String },

    /// Component descriptor role does not fit the current parse state.
    #[error("component descriptor 0x{descriptor:02x} is {found}, expected {expected}")]
    UnexpectedRole {
        descriptor: u8,
        found: &'static str,
        expected: &'static str,
    },

    /// Component descriptor violates a structural rule of its role.
    #[error("component descriptor 0x{descriptor:02x} invalid: {detail}")]
    DescriptorInvalid { descriptor: u8, detail: &'static str },

    /// Two template attributes share one label.
    #[error("duplicate template label {label}")]
    DuplicateTemplateLabel { label: String },

    /// Two attributes of one object share one label.
    #[error("duplicate attribute label {label}")]
    DuplicateAttributeLabel { label: String },

    /// Duplicate object name in one set under the raise policy.
    #[error("duplicate object {name} in {set_type} set")]
    DuplicateObject { set_type: String, name: String },

    /// The x-axis channel uses a representation code that is not scalar.
    #[error("index channel representation code {code} is not scalar")]
    NonScalarIndexChannel { code: &'static str },

    /// A channel uses a representation code with no numeric interpretation.
    #[error("channel {channel} representation code {code} is not numeric")]
    NonNumericChannel { channel: String, code: &'static str },

    /// FRAME record references a channel absent from the CHANNEL record.
    #[error("frame array {frame_array} references unknown channel {channel}")]
    UnknownChannel { frame_array: String, channel: String },

    /// Frame data references a frame array the schema does not define.
    #[error("frame data references unknown frame array {name}")]
    UnknownFrameArray { name: String },

    /// An object lacks an attribute its consumers require.
    #[error("object {object} has no usable {label} attribute")]
    MissingAttribute { object: String, label: &'static str },

    /// An EFLR of a given logical record type was required.
    #[error("expected a {expected} record, got set type {got}")]
    WrongSetType { expected: &'static str, got: String },
}

/// Primary error type for rp66 operations.
#[derive(Error, Debug)]
pub enum Rp66Error {
    /// Fatal scan-tier error; the file scan stopped here.
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// Record-scoped decode-tier error.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Lookup of a frame array by name failed.
    #[error("no frame array named {name}")]
    NoSuchFrameArray { name: String },
}

impl Rp66Error {
    /// Whether this error aborted the whole file scan.
    ///
    /// Scan-tier errors mean framing was lost; nothing after the failure
    /// offset can be trusted.
    pub const fn is_scan_fatal(&self) -> bool {
        matches!(self, Self::Scan(_))
    }

    /// Whether this error is scoped to a single logical record.
    ///
    /// Record-scoped failures leave the framing intact; a keep-going scan
    /// may skip the record and continue at the next one.
    pub const fn is_record_scoped(&self) -> bool {
        matches!(self, Self::Decode(_))
    }
}

impl ScanError {
    /// Create a storage-label error.
    pub fn storage_label(detail: impl Into<String>) -> Self {
        Self::StorageLabel {
            detail: detail.into(),
        }
    }

    /// Create a record-position error.
    pub fn record_position(detail: impl Into<String>) -> Self {
        Self::RecordPosition {
            detail: detail.into(),
        }
    }
}

impl DecodeError {
    /// Create a short-data error.
    pub const fn short(needed: usize, remain: usize) -> Self {
        Self::ShortData { needed, remain }
    }
}

/// Result type alias using [`Rp66Error`].
pub type Result<T> = std::result::Result<T, Rp66Error>;
