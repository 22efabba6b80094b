//! Logical record segment headers: the inner framing unit.

use std::io::{Read, Seek};

use bitflags::bitflags;
use rp66_error::ScanError;
use rp66_types::limits::{SEGMENT_HEADER_LEN, SEGMENT_MIN_LEN};

use crate::io::{read_u8, read_u16_be, stream_offset};
use crate::visible::VisibleRecord;

bitflags! {
    /// The segment attribute byte.
    ///
    /// The first/last flags are inverted on the wire: a set bit means the
    /// segment has a predecessor/successor. Use [`SegmentAttributes::is_first`]
    /// and [`SegmentAttributes::is_last`] rather than testing bits directly.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SegmentAttributes: u8 {
        /// Structured (explicitly formatted) logical record.
        const EFLR = 0x80;
        /// A prior segment of the same logical record exists.
        const PREDECESSOR = 0x40;
        /// A later segment of the same logical record exists.
        const SUCCESSOR = 0x20;
        /// Payload is encrypted.
        const ENCRYPTED = 0x10;
        /// An encryption packet precedes the payload.
        const ENCRYPTION_PACKET = 0x08;
        /// A 2-byte checksum trails the payload.
        const CHECKSUM = 0x04;
        /// A 2-byte copy of the length trails the payload.
        const TRAILING_LENGTH = 0x02;
        /// Pad bytes trail the payload, count in the last pad byte.
        const PADDING = 0x01;
    }
}

impl SegmentAttributes {
    /// First segment of its logical record.
    #[must_use]
    pub const fn is_first(self) -> bool {
        !self.contains(Self::PREDECESSOR)
    }

    /// Last segment of its logical record.
    #[must_use]
    pub const fn is_last(self) -> bool {
        !self.contains(Self::SUCCESSOR)
    }

    /// Padding is only visible when the payload is not encrypted.
    #[must_use]
    pub const fn must_strip_padding(self) -> bool {
        self.contains(Self::PADDING) && !self.contains(Self::ENCRYPTED)
    }
}

/// One segment header: an owned snapshot, never a view into reader state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentHeader {
    /// File offset of the header's first byte.
    pub position: u64,
    /// Declared segment length, header included.
    pub length: u16,
    /// Attribute flags.
    pub attributes: SegmentAttributes,
    /// Logical record type tag.
    pub record_type: u8,
}

impl SegmentHeader {
    /// Header size: 2-byte length, 1-byte attributes, 1-byte type.
    pub const HEADER_LEN: u16 = SEGMENT_HEADER_LEN;

    /// Read and validate a segment header at the current stream position,
    /// checking its length against the enclosing visible record.
    pub fn read<R: Read + Seek>(
        file: &mut R,
        visible_record: &VisibleRecord,
    ) -> Result<Self, ScanError> {
        let position = stream_offset(file)?;
        let eof = |err: std::io::Error| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                ScanError::SegmentEof { offset: position }
            } else {
                ScanError::Io(err)
            }
        };
        let length = read_u16_be(file).map_err(eof)?;
        let attributes = SegmentAttributes::from_bits_retain(read_u8(file).map_err(eof)?);
        let record_type = read_u8(file).map_err(eof)?;
        let remaining = visible_record.next_position().saturating_sub(position);
        let max = u16::try_from(remaining).unwrap_or(u16::MAX);
        if length < SEGMENT_MIN_LEN || u64::from(length) > remaining {
            return Err(ScanError::SegmentLength {
                offset: position,
                length,
                min: SEGMENT_MIN_LEN,
                max,
            });
        }
        Ok(Self {
            position,
            length,
            attributes,
            record_type,
        })
    }

    /// File offset of the next segment header (or of the next visible
    /// record header when this segment is the last in its record).
    #[must_use]
    pub const fn next_position(&self) -> u64 {
        self.position + self.length as u64
    }

    /// File offset of the payload.
    #[must_use]
    pub const fn payload_position(&self) -> u64 {
        self.position + Self::HEADER_LEN as u64
    }

    /// Payload length: declared length minus the header and any checksum
    /// or trailing-length trailer. Pad bytes are still included.
    #[must_use]
    pub fn payload_length(&self) -> usize {
        let mut len = usize::from(self.length) - usize::from(Self::HEADER_LEN);
        if self.attributes.contains(SegmentAttributes::CHECKSUM) {
            len -= 2;
        }
        if self.attributes.contains(SegmentAttributes::TRAILING_LENGTH) {
            len -= 2;
        }
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn visible(position: u64, length: u16) -> VisibleRecord {
        VisibleRecord {
            position,
            length,
            version: 0xFF01,
        }
    }

    #[test]
    fn attribute_flags() {
        let attrs = SegmentAttributes::EFLR | SegmentAttributes::PADDING;
        assert!(attrs.is_first());
        assert!(attrs.is_last());
        assert!(attrs.must_strip_padding());

        let attrs = SegmentAttributes::PREDECESSOR
            | SegmentAttributes::SUCCESSOR
            | SegmentAttributes::ENCRYPTED
            | SegmentAttributes::PADDING;
        assert!(!attrs.is_first());
        assert!(!attrs.is_last());
        assert!(!attrs.must_strip_padding());
    }

    #[test]
    fn read_header_within_visible_record() {
        // Visible record spans [0, 0x100); segment header right after the
        // 4-byte visible record header.
        let mut bytes = vec![0u8; 0x100];
        bytes[4..8].copy_from_slice(&[0x00, 0x7C, 0x80, 0x03]);
        let mut stream = Cursor::new(bytes);
        stream.set_position(4);
        let seg = SegmentHeader::read(&mut stream, &visible(0, 0x100)).unwrap();
        assert_eq!(seg.position, 4);
        assert_eq!(seg.length, 0x7C);
        assert!(seg.attributes.contains(SegmentAttributes::EFLR));
        assert_eq!(seg.record_type, 3);
        assert_eq!(seg.payload_position(), 8);
        assert_eq!(seg.payload_length(), 0x78);
        assert_eq!(seg.next_position(), 4 + 0x7C);
    }

    #[test]
    fn trailer_flags_shrink_payload() {
        let seg = SegmentHeader {
            position: 4,
            length: 32,
            attributes: SegmentAttributes::CHECKSUM | SegmentAttributes::TRAILING_LENGTH,
            record_type: 0,
        };
        assert_eq!(seg.payload_length(), 32 - 4 - 2 - 2);
    }

    #[test]
    fn rejects_overrun_and_short_lengths() {
        // Declared segment length runs past the visible record.
        let mut bytes = vec![0u8; 0x40];
        bytes[4..8].copy_from_slice(&[0x00, 0x40, 0x00, 0x00]);
        let mut stream = Cursor::new(bytes);
        stream.set_position(4);
        assert!(matches!(
            SegmentHeader::read(&mut stream, &visible(0, 0x40)),
            Err(ScanError::SegmentLength { length: 0x40, .. })
        ));

        // Below the 16-byte minimum.
        let mut bytes = vec![0u8; 0x40];
        bytes[4..8].copy_from_slice(&[0x00, 0x08, 0x00, 0x00]);
        let mut stream = Cursor::new(bytes);
        stream.set_position(4);
        assert!(matches!(
            SegmentHeader::read(&mut stream, &visible(0, 0x40)),
            Err(ScanError::SegmentLength { length: 8, .. })
        ));
    }
}
