//! Physical framing and logical-record reassembly.
//!
//! The on-disk layout is a fixed preamble followed by visible records, each
//! wrapping one or more logical record segments:
//!
//! ```text
//! [Storage Unit Label: 80 bytes]
//! [Visible Record: 2-byte length, 2-byte version 0xFF01]
//!   [Segment: 2-byte length, 1-byte attributes, 1-byte type | payload | trailers]
//!   [Segment: ...]
//! [Visible Record: ...]
//!   [Segment: ...]
//! ...
//! ```
//!
//! A logical record may span segments, and therefore visible records; the
//! reader strips per-segment trailers (checksum, trailing length, padding)
//! and reassembles the payload into a sealed [`LogicalRecord`]. Sequential
//! iteration and positional random access share the same assembly path.

pub mod io;
pub mod label;
pub mod reader;
pub mod record;
pub mod segment;
pub mod visible;

pub use label::StorageUnitLabel;
pub use reader::{RecordReader, Records};
pub use record::{LogicalRecord, RecordBuilder};
pub use segment::{SegmentAttributes, SegmentHeader};
pub use visible::VisibleRecord;
