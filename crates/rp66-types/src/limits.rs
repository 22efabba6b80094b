//! Fixed sizes and bounds of the RP66 v1 physical format.

/// Size of the storage unit label at the start of every file.
pub const STORAGE_LABEL_LEN: usize = 80;

/// Visible record header: 2-byte length plus 2-byte format version.
pub const VISIBLE_RECORD_HEADER_LEN: u16 = 4;

/// The only valid visible record format version.
pub const VISIBLE_RECORD_VERSION: u16 = 0xFF01;

/// Smallest legal logical record segment, header included.
pub const SEGMENT_MIN_LEN: u16 = 16;

/// Segment header: 2-byte length, 1-byte attributes, 1-byte record type.
pub const SEGMENT_HEADER_LEN: u16 = 4;

/// Smallest legal visible record: one minimum segment plus the header.
pub const VISIBLE_RECORD_MIN_LEN: u16 = SEGMENT_MIN_LEN + VISIBLE_RECORD_HEADER_LEN;

/// Largest legal visible record.
pub const VISIBLE_RECORD_MAX_LEN: u16 = 0x4000;

/// Widest fixed-length scalar representation (a double), in bytes. Used to
/// bound partial reads that only need a frame's index channel.
pub const MAX_SCALAR_LEN: usize = 8;
