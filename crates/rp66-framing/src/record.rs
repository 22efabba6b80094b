//! Reassembled logical records.
//!
//! A record is *open* while segments are being appended and *sealed* once
//! its last segment has arrived. The transition is one-way: [`RecordBuilder`]
//! is consumed by [`RecordBuilder::seal`], so no append can follow it.

use std::sync::OnceLock;

use rp66_error::ScanError;
use rp66_types::{ByteCursor, LogicalRecordPosition};

use crate::segment::{SegmentAttributes, SegmentHeader};
use crate::visible::VisibleRecord;

/// An open logical record accumulating segment payloads.
#[derive(Debug)]
pub struct RecordBuilder {
    position: LogicalRecordPosition,
    record_type: u8,
    is_eflr: bool,
    is_encrypted: bool,
    bytes: Vec<u8>,
}

impl RecordBuilder {
    /// Start a record at its first segment.
    ///
    /// Validates the position invariants and requires the segment to be
    /// flagged as first.
    pub fn new(
        visible_record: &VisibleRecord,
        segment: &SegmentHeader,
    ) -> Result<Self, ScanError> {
        if !segment.attributes.is_first() {
            return Err(ScanError::SegmentSequence {
                offset: segment.position,
                detail: "record must start at a first segment",
            });
        }
        let position = LogicalRecordPosition::new(
            visible_record.position,
            visible_record.length,
            segment.position,
            segment.length,
        )?;
        Ok(Self {
            position,
            record_type: segment.record_type,
            is_eflr: segment.attributes.contains(SegmentAttributes::EFLR),
            is_encrypted: segment.attributes.contains(SegmentAttributes::ENCRYPTED),
            bytes: Vec::new(),
        })
    }

    /// Append one segment's stripped payload.
    pub fn extend(&mut self, payload: &[u8]) {
        self.bytes.extend_from_slice(payload);
    }

    /// Bytes accumulated so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when nothing has been appended yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Seal the record. No further appends are possible.
    #[must_use]
    pub fn seal(self) -> LogicalRecord {
        LogicalRecord {
            position: self.position,
            record_type: self.record_type,
            is_eflr: self.is_eflr,
            is_encrypted: self.is_encrypted,
            bytes: self.bytes,
            hash: OnceLock::new(),
        }
    }
}

/// A sealed, immutable logical record.
#[derive(Debug)]
pub struct LogicalRecord {
    position: LogicalRecordPosition,
    record_type: u8,
    is_eflr: bool,
    is_encrypted: bool,
    bytes: Vec<u8>,
    hash: OnceLock<[u8; 32]>,
}

impl LogicalRecord {
    /// Address of the record's first segment.
    #[must_use]
    pub const fn position(&self) -> LogicalRecordPosition {
        self.position
    }

    /// Logical record type tag.
    #[must_use]
    pub const fn record_type(&self) -> u8 {
        self.record_type
    }

    /// True for structured (explicitly formatted) records.
    #[must_use]
    pub const fn is_eflr(&self) -> bool {
        self.is_eflr
    }

    /// True when the payload is encrypted.
    #[must_use]
    pub const fn is_encrypted(&self) -> bool {
        self.is_encrypted
    }

    /// The sealed payload bytes.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True for an empty payload.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// A cursor over the payload.
    #[must_use]
    pub fn cursor(&self) -> ByteCursor<'_> {
        ByteCursor::new(&self.bytes)
    }

    /// Content hash of the payload, computed on first use.
    pub fn content_hash(&self) -> [u8; 32] {
        *self
            .hash
            .get_or_init(|| *blake3::hash(&self.bytes).as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_segment() -> (VisibleRecord, SegmentHeader) {
        let vr = VisibleRecord {
            position: 80,
            length: 0x2000,
            version: 0xFF01,
        };
        let seg = SegmentHeader {
            position: 84,
            length: 124,
            attributes: SegmentAttributes::EFLR,
            record_type: 3,
        };
        (vr, seg)
    }

    #[test]
    fn build_and_seal() {
        let (vr, seg) = first_segment();
        let mut builder = RecordBuilder::new(&vr, &seg).unwrap();
        builder.extend(b"abc");
        builder.extend(b"def");
        let record = builder.seal();
        assert_eq!(record.bytes(), b"abcdef");
        assert_eq!(record.record_type(), 3);
        assert!(record.is_eflr());
        assert!(!record.is_encrypted());
        assert_eq!(record.position().segment, 84);
    }

    #[test]
    fn rejects_non_first_segment() {
        let (vr, mut seg) = first_segment();
        seg.attributes |= SegmentAttributes::PREDECESSOR;
        assert!(matches!(
            RecordBuilder::new(&vr, &seg),
            Err(ScanError::SegmentSequence { .. })
        ));
    }

    #[test]
    fn content_hash_is_stable() {
        let (vr, seg) = first_segment();
        let mut builder = RecordBuilder::new(&vr, &seg).unwrap();
        builder.extend(b"payload");
        let record = builder.seal();
        let first = record.content_hash();
        assert_eq!(first, record.content_hash());
        assert_eq!(first, *blake3::hash(b"payload").as_bytes());
    }
}
