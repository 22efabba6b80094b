//! Core type definitions for the rp66 workspace.
//!
//! Everything here is independent of file I/O: byte cursors over sealed
//! record buffers, object names, the decoded value sum type, and the
//! logical-record addressing scheme.

pub mod cursor;
pub mod dtime;
pub mod limits;
pub mod name;
pub mod value;

pub use cursor::ByteCursor;
pub use dtime::DateTime;
pub use name::{AttrRef, ObjectName, ObjectRef};
pub use value::Value;

use std::fmt;

use rp66_error::ScanError;

/// Address of a logical record: the byte offsets of the enclosing visible
/// record and of the record's first segment header.
///
/// This pair is the sole key for random access. Both offsets are absolute
/// file positions.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct LogicalRecordPosition {
    /// File offset of the visible record holding the first segment.
    pub visible_record: u64,
    /// File offset of the first segment header.
    pub segment: u64,
}

impl LogicalRecordPosition {
    /// Validate and build a position from the framing values it was read at.
    ///
    /// The visible record must sit past the storage unit label, the segment
    /// header must sit inside the visible record with room for a minimum
    /// size segment, and both lengths must be in range.
    pub fn new(
        vr_position: u64,
        vr_length: u16,
        segment_position: u64,
        segment_length: u16,
    ) -> Result<Self, ScanError> {
        let sul = limits::STORAGE_LABEL_LEN as u64;
        if vr_position < sul {
            return Err(ScanError::record_position(format!(
                "visible record at 0x{vr_position:x} must be >= 0x{sul:x}"
            )));
        }
        if vr_length < limits::SEGMENT_MIN_LEN {
            return Err(ScanError::record_position(format!(
                "visible record at 0x{vr_position:x} length {vr_length} below minimum"
            )));
        }
        if vr_length > limits::VISIBLE_RECORD_MAX_LEN {
            return Err(ScanError::record_position(format!(
                "visible record at 0x{vr_position:x} length {vr_length} above maximum"
            )));
        }
        let min_segment = sul + u64::from(limits::VISIBLE_RECORD_HEADER_LEN);
        if segment_position < min_segment {
            return Err(ScanError::record_position(format!(
                "segment at 0x{segment_position:x} must be >= 0x{min_segment:x}"
            )));
        }
        let last_start = vr_position + u64::from(vr_length) - u64::from(limits::SEGMENT_MIN_LEN);
        if segment_position > last_start {
            return Err(ScanError::record_position(format!(
                "segment at 0x{segment_position:x} must be <= 0x{last_start:x}"
            )));
        }
        if segment_length < limits::SEGMENT_MIN_LEN {
            return Err(ScanError::record_position(format!(
                "segment at 0x{segment_position:x} length {segment_length} below minimum"
            )));
        }
        if segment_length > vr_length - limits::VISIBLE_RECORD_HEADER_LEN {
            return Err(ScanError::record_position(format!(
                "segment at 0x{segment_position:x} length {segment_length} overruns visible record"
            )));
        }
        Ok(Self {
            visible_record: vr_position,
            segment: segment_position,
        })
    }
}

impl fmt::Display for LogicalRecordPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "VR 0x{:08x} LRSH 0x{:08x}",
            self.visible_record, self.segment
        )
    }
}
