//! Reader for RP66 v1 ("DLIS") well-log files.
//!
//! The workspace is layered, leaves first: representation-code codec,
//! physical framing and record reassembly, the set/template/object model
//! of structured records, and the file/frame indexer. This crate
//! re-exports the public API and adds the path-based entry point.
//!
//! ```no_run
//! use rp66::{DuplicatePolicy, ErrorMode, IndexOptions};
//!
//! let options = IndexOptions {
//!     duplicate_policy: DuplicatePolicy::AcceptFirst,
//!     error_mode: ErrorMode::Strict,
//! };
//! let index = rp66::open("example.dlis", options)?;
//! for entry in index.entries() {
//!     println!("{} type {}", entry.position(), entry.lr_type());
//! }
//! # Ok::<(), rp66::Rp66Error>(())
//! ```

use std::fs::File;
use std::path::Path;

pub use rp66_error::{DecodeError, Result, Rp66Error, ScanError};
pub use rp66_types::{
    AttrRef, ByteCursor, DateTime, LogicalRecordPosition, ObjectName, ObjectRef, Value,
};

pub use rp66_repcode::{RepCode, ValueClass, decode, encode};

pub use rp66_framing::{
    LogicalRecord, RecordReader, SegmentAttributes, SegmentHeader, StorageUnitLabel, VisibleRecord,
};

pub use rp66_eflr::{
    Attribute, ComponentDescriptor, ComponentRole, DuplicatePolicy, EflrTable, IflrHeader, Object,
    SetHeader, Template, codes,
};

pub use rp66_index::{
    ChannelSamples, ErrorMode, FileIndex, FrameArray, FrameChannel, FrameData, FrameRef,
    IndexEntry, IndexOptions, LogPass, Rle, SpacingCounts, SpacingSummary, XAxisSummary,
    XAxisTrace,
};

/// Open a file on disk and build its index.
///
/// The file handle is owned by the returned index and reused for random
/// access.
pub fn open(path: impl AsRef<Path>, options: IndexOptions) -> Result<FileIndex<File>> {
    let file = File::open(path).map_err(ScanError::Io)?;
    FileIndex::build(file, options)
}
