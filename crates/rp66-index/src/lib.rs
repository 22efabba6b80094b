//! File and frame indexing.
//!
//! One forward scan classifies every logical record (structured,
//! unstructured, encrypted), segments the stream into logical files at
//! FILE-HEADER records, materializes frame-array schemas from each
//! CHANNEL/FRAME pair, and compresses the x-axis progression of frame
//! data into run-length traces. The result supports ordered iteration,
//! positional re-reads and lazy materialization of numeric sample
//! columns.

pub mod index;
pub mod logpass;
pub mod rle;
pub mod xaxis;

pub use index::{
    ChannelSamples, EncryptedEntry, ErrorMode, FileIndex, FrameData, IndexEntry, IndexOptions,
    LogicalFile, StructuredEntry, UnstructuredEntry,
};
pub use logpass::{FrameArray, FrameChannel, LogPass};
pub use rle::{Rle, RleRun, RleValue};
pub use xaxis::{FrameRef, SpacingCounts, SpacingSummary, XAxisSummary, XAxisTrace};
