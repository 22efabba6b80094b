//! Visible records: the outer physical framing unit.

use std::io::{Read, Seek};

use rp66_error::ScanError;
use rp66_types::limits::{
    VISIBLE_RECORD_HEADER_LEN, VISIBLE_RECORD_MAX_LEN, VISIBLE_RECORD_MIN_LEN,
    VISIBLE_RECORD_VERSION,
};

use crate::io::{read_u16_be, stream_offset};

/// One visible record header: an owned snapshot, never a view into reader
/// state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRecord {
    /// File offset of the record's first header byte.
    pub position: u64,
    /// Total record length, header included.
    pub length: u16,
    /// Format version tag; always 0xFF01 once validated.
    pub version: u16,
}

impl VisibleRecord {
    /// Header size: 2-byte length plus 2-byte version.
    pub const HEADER_LEN: u16 = VISIBLE_RECORD_HEADER_LEN;

    /// Read and validate a visible record header at the current stream
    /// position.
    pub fn read<R: Read + Seek>(file: &mut R) -> Result<Self, ScanError> {
        let position = stream_offset(file)?;
        let eof = |err: std::io::Error| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                ScanError::VisibleRecordEof { offset: position }
            } else {
                ScanError::Io(err)
            }
        };
        let length = read_u16_be(file).map_err(eof)?;
        let version = read_u16_be(file).map_err(eof)?;
        if version != VISIBLE_RECORD_VERSION {
            return Err(ScanError::VisibleRecordVersion { offset: position, version });
        }
        if !(VISIBLE_RECORD_MIN_LEN..=VISIBLE_RECORD_MAX_LEN).contains(&length) {
            return Err(ScanError::VisibleRecordLength {
                offset: position,
                length,
                min: VISIBLE_RECORD_MIN_LEN,
                max: VISIBLE_RECORD_MAX_LEN,
            });
        }
        Ok(Self {
            position,
            length,
            version,
        })
    }

    /// File offset of the next visible record.
    #[must_use]
    pub const fn next_position(&self) -> u64 {
        self.position + self.length as u64
    }
}
