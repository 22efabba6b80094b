//! The file index: one forward scan, then random access.

use std::io::{Read, Seek};
use std::ops::Range;

use hashbrown::HashMap;
use smallvec::SmallVec;

use rp66_error::{DecodeError, Result, Rp66Error, ScanError};
use rp66_eflr::{DuplicatePolicy, EflrTable, IflrHeader, codes};
use rp66_framing::{LogicalRecord, RecordReader, StorageUnitLabel};
use rp66_types::{LogicalRecordPosition, ObjectName};
use tracing::{debug, warn};

use crate::logpass::LogPass;
use crate::xaxis::XAxisTrace;

/// How the index build reacts to record-scoped decode failures.
///
/// Scan-tier failures (framing, sequencing, EOF) abort the build in
/// either mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMode {
    /// The first decode failure aborts the build.
    Strict,
    /// Decode failures skip the offending record and are counted.
    KeepGoing,
}

/// Build-time options. Both fields are deliberately mandatory.
#[derive(Debug, Clone, Copy)]
pub struct IndexOptions {
    /// Duplicate-object policy handed to every set decode.
    pub duplicate_policy: DuplicatePolicy,
    /// Decode-failure behavior.
    pub error_mode: ErrorMode,
}

/// Index entry for a structured record: framing metadata plus the decoded
/// table.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuredEntry {
    pub position: LogicalRecordPosition,
    pub lr_type: u8,
    pub content_hash: [u8; 32],
    /// The decoded set, template and objects.
    pub table: EflrTable,
}

/// Index entry for an unstructured record.
#[derive(Debug, Clone, PartialEq)]
pub struct UnstructuredEntry {
    pub position: LogicalRecordPosition,
    pub lr_type: u8,
    pub content_hash: [u8; 32],
    /// The frame array (or other target object) the record references.
    pub frame_array: ObjectName,
    /// Frame ordinal from the record header.
    pub frame_number: u64,
    /// Decoded x-axis value for frame data; `None` otherwise.
    pub x: Option<f64>,
}

/// Index entry stub for an encrypted record: framing metadata and content
/// hash only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncryptedEntry {
    pub position: LogicalRecordPosition,
    pub lr_type: u8,
    pub is_eflr: bool,
    pub content_hash: [u8; 32],
}

/// One logical record in the index.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexEntry {
    /// Structured record with its decoded table.
    Structured(StructuredEntry),
    /// Unstructured (frame data or no-format) record.
    Unstructured(UnstructuredEntry),
    /// Encrypted record, surfaced but not decrypted.
    Encrypted(EncryptedEntry),
}

impl IndexEntry {
    /// The record's address.
    #[must_use]
    pub const fn position(&self) -> LogicalRecordPosition {
        match self {
            Self::Structured(e) => e.position,
            Self::Unstructured(e) => e.position,
            Self::Encrypted(e) => e.position,
        }
    }

    /// The record's type tag.
    #[must_use]
    pub const fn lr_type(&self) -> u8 {
        match self {
            Self::Structured(e) => e.lr_type,
            Self::Unstructured(e) => e.lr_type,
            Self::Encrypted(e) => e.lr_type,
        }
    }

    /// Content hash of the sealed record payload.
    #[must_use]
    pub const fn content_hash(&self) -> [u8; 32] {
        match self {
            Self::Structured(e) => e.content_hash,
            Self::Unstructured(e) => e.content_hash,
            Self::Encrypted(e) => e.content_hash,
        }
    }
}

/// One logical file: the records between consecutive FILE-HEADER sets.
#[derive(Debug, Default)]
pub struct LogicalFile {
    entries: Vec<usize>,
    eflr_seen: usize,
    log_pass: Option<LogPass>,
    traces: HashMap<ObjectName, XAxisTrace>,
    pending_channels: Option<EflrTable>,
    pending_frame: Option<EflrTable>,
}

impl LogicalFile {
    /// Ordinals of this file's entries in the index.
    #[must_use]
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// The frame-array schemas, once CHANNEL and FRAME have both been
    /// seen.
    #[must_use]
    pub const fn log_pass(&self) -> Option<&LogPass> {
        self.log_pass.as_ref()
    }

    /// X-axis trace of one frame array.
    #[must_use]
    pub fn trace(&self, name: &ObjectName) -> Option<&XAxisTrace> {
        self.traces.get(name)
    }

    /// Every (frame array, trace) pair of this file.
    pub fn traces(&self) -> impl Iterator<Item = (&ObjectName, &XAxisTrace)> {
        self.traces.iter()
    }

    fn absorb_eflr(
        &mut self,
        position: LogicalRecordPosition,
        table: &EflrTable,
        options: IndexOptions,
        skipped: &mut u64,
    ) -> Result<()> {
        self.eflr_seen += 1;
        let set_type = table.set.set_type.as_slice();
        let is_origin = set_type == b"ORIGIN" || set_type == b"WELL-REFERENCE";
        if self.eflr_seen == 2 && !is_origin {
            return Err(ScanError::RecordOrder {
                offset: position.segment,
                detail: "second structured record must be an origin",
            }
            .into());
        }
        if self.eflr_seen > 2 && is_origin {
            warn!(%position, "multiple origin records in one logical file");
        }
        if set_type == b"CHANNEL" {
            if self.pending_channels.is_some() || self.log_pass.is_some() {
                return Err(ScanError::RecordOrder {
                    offset: position.segment,
                    detail: "multiple CHANNEL records in one logical file",
                }
                .into());
            }
            self.pending_channels = Some(table.clone());
        } else if set_type == b"FRAME" {
            if self.pending_frame.is_some() || self.log_pass.is_some() {
                return Err(ScanError::RecordOrder {
                    offset: position.segment,
                    detail: "multiple FRAME records in one logical file",
                }
                .into());
            }
            self.pending_frame = Some(table.clone());
        }
        if let (Some(frame), Some(channels)) = (&self.pending_frame, &self.pending_channels) {
            match LogPass::from_eflrs(frame, channels) {
                Ok(pass) => {
                    debug!(arrays = pass.len(), "frame schema materialized");
                    self.log_pass = Some(pass);
                }
                Err(err) => match options.error_mode {
                    ErrorMode::Strict => return Err(err.into()),
                    ErrorMode::KeepGoing => {
                        warn!(%position, error = %err, "skipping unusable frame schema");
                        *skipped += 1;
                    }
                },
            }
            self.pending_frame = None;
            self.pending_channels = None;
        }
        Ok(())
    }
}

/// Samples of one channel over a populated row window, flattened row
/// major.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChannelSamples {
    pub name: ObjectName,
    pub units: Vec<u8>,
    pub dimensions: SmallVec<[u32; 2]>,
    pub values: Vec<f64>,
}

/// The materialized samples of one `populate` call.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameData {
    pub frame_array: ObjectName,
    /// Number of rows materialized.
    pub rows: u64,
    /// One column per selected channel, in frame order.
    pub channels: Vec<ChannelSamples>,
}

impl FrameData {
    /// Total number of samples across all selected channels.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.channels.iter().map(|c| c.values.len()).sum()
    }
}

/// Random-access index over one file.
///
/// Built by a single forward scan; afterwards the same handle serves
/// positional re-reads. Not internally synchronized.
#[derive(Debug)]
pub struct FileIndex<R> {
    reader: RecordReader<R>,
    entries: Vec<IndexEntry>,
    logical_files: Vec<LogicalFile>,
    skipped: u64,
}

impl<R: Read + Seek> FileIndex<R> {
    /// Scan the whole stream and build the index.
    pub fn build(file: R, options: IndexOptions) -> Result<Self> {
        let mut reader = RecordReader::new(file)?;
        let mut entries: Vec<IndexEntry> = Vec::new();
        let mut files: Vec<LogicalFile> = Vec::new();
        let mut skipped = 0u64;

        for record in reader.records() {
            let record = record?;
            if let Err(err) =
                Self::absorb_record(&record, options, &mut entries, &mut files, &mut skipped)
            {
                match (&err, options.error_mode) {
                    (Rp66Error::Decode(_), ErrorMode::KeepGoing) => {
                        warn!(position = %record.position(), error = %err, "skipping record");
                        skipped += 1;
                    }
                    _ => return Err(err),
                }
            }
        }
        debug!(
            entries = entries.len(),
            logical_files = files.len(),
            skipped,
            "index build complete"
        );
        Ok(Self {
            reader,
            entries,
            logical_files: files,
            skipped,
        })
    }

    fn absorb_record(
        record: &LogicalRecord,
        options: IndexOptions,
        entries: &mut Vec<IndexEntry>,
        files: &mut Vec<LogicalFile>,
        skipped: &mut u64,
    ) -> Result<()> {
        let position = record.position();
        let content_hash = record.content_hash();
        let lr_type = record.record_type();

        if record.is_encrypted() {
            let ordinal = entries.len();
            entries.push(IndexEntry::Encrypted(EncryptedEntry {
                position,
                lr_type,
                is_eflr: record.is_eflr(),
                content_hash,
            }));
            if let Some(file) = files.last_mut() {
                file.entries.push(ordinal);
            }
            return Ok(());
        }

        if record.is_eflr() {
            let mut cursor = record.cursor();
            let table = EflrTable::parse(lr_type, &mut cursor, options.duplicate_policy)?;
            if table.set.set_type == b"FILE-HEADER" {
                files.push(LogicalFile {
                    eflr_seen: 1,
                    ..LogicalFile::default()
                });
            } else {
                let file = files
                    .last_mut()
                    .ok_or(ScanError::RecordBeforeFileHeader {
                        offset: position.segment,
                    })?;
                file.absorb_eflr(position, &table, options, skipped)?;
            }
            let ordinal = entries.len();
            entries.push(IndexEntry::Structured(StructuredEntry {
                position,
                lr_type,
                content_hash,
                table,
            }));
            if let Some(file) = files.last_mut() {
                file.entries.push(ordinal);
            }
            return Ok(());
        }

        // Unstructured record.
        if record.is_empty() {
            debug!(%position, "ignoring empty unstructured record");
            return Ok(());
        }
        let mut cursor = record.cursor();
        let header = IflrHeader::parse(&mut cursor)?;
        let file = files.last_mut().ok_or(ScanError::RecordBeforeFileHeader {
            offset: position.segment,
        })?;
        let mut x = None;
        if lr_type == codes::IFLR_FRAME_DATA && header.remaining > 0 {
            let log_pass = file.log_pass.as_ref().ok_or(ScanError::MissingFrameSchema {
                offset: position.segment,
                record_type: lr_type,
            })?;
            let array = log_pass
                .get(&header.frame_array)
                .ok_or_else(|| DecodeError::UnknownFrameArray {
                    name: header.frame_array.ident_str(),
                })?;
            let x_axis = array.x_axis().ok_or(DecodeError::ShortData {
                needed: 1,
                remain: 0,
            })?;
            let value = array.read_x(&mut cursor)?;
            let trace = file
                .traces
                .entry(header.frame_array.clone())
                .or_insert_with(|| {
                    XAxisTrace::new(
                        x_axis.name.clone(),
                        x_axis.long_name.clone(),
                        x_axis.units.clone(),
                    )
                });
            trace.append(position, u64::from(header.frame_number), value);
            x = Some(value);
        }
        let ordinal = entries.len();
        entries.push(IndexEntry::Unstructured(UnstructuredEntry {
            position,
            lr_type,
            content_hash,
            frame_array: header.frame_array,
            frame_number: u64::from(header.frame_number),
            x,
        }));
        file.entries.push(ordinal);
        Ok(())
    }

    /// The storage unit label.
    #[must_use]
    pub const fn label(&self) -> &StorageUnitLabel {
        self.reader.label()
    }

    /// Every index entry, in file order.
    #[must_use]
    pub fn entries(&self) -> &[IndexEntry] {
        &self.entries
    }

    /// The logical files, in file order.
    #[must_use]
    pub fn logical_files(&self) -> &[LogicalFile] {
        &self.logical_files
    }

    /// Number of records skipped under [`ErrorMode::KeepGoing`].
    #[must_use]
    pub const fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Re-read one sealed logical record by position.
    pub fn locate(&mut self, position: LogicalRecordPosition) -> Result<LogicalRecord> {
        Ok(self.reader.read_at(position, 0, None)?)
    }

    /// X-axis trace of a frame array, searching every logical file.
    #[must_use]
    pub fn trace(&self, frame_array: &ObjectName) -> Option<&XAxisTrace> {
        self.logical_files.iter().find_map(|f| f.trace(frame_array))
    }

    /// Materialize numeric samples for a row window and channel subset.
    ///
    /// The x-axis channel is always included. `rows: None` means every
    /// frame; `channels: None` means every channel. Returns the decoded
    /// columns; frames are re-read through the index's file handle.
    pub fn populate(
        &mut self,
        frame_array: &ObjectName,
        rows: Option<Range<u64>>,
        channels: Option<&[ObjectName]>,
    ) -> Result<FrameData> {
        let no_such = || Rp66Error::NoSuchFrameArray {
            name: frame_array.ident_str(),
        };
        let file = self
            .logical_files
            .iter()
            .find(|f| {
                f.log_pass
                    .as_ref()
                    .is_some_and(|pass| pass.get(frame_array).is_some())
            })
            .ok_or_else(no_such)?;
        let array = file
            .log_pass
            .as_ref()
            .and_then(|pass| pass.get(frame_array))
            .ok_or_else(no_such)?;

        let selected: Vec<bool> = array
            .channels()
            .iter()
            .enumerate()
            .map(|(i, channel)| {
                i == 0 || channels.is_none_or(|subset| subset.contains(&channel.name))
            })
            .collect();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); array.channels().len()];

        let mut populated = 0u64;
        if let Some(trace) = file.traces.get(frame_array) {
            let total = trace.count();
            let range = rows.unwrap_or(0..total);
            let start = range.start.min(total);
            let end = range.end.min(total);
            let reader = &mut self.reader;
            for i in start..end {
                let Some(frame) = trace.get(i) else { break };
                let record = reader.read_at(frame.position, 0, None)?;
                let mut cursor = record.cursor();
                IflrHeader::parse(&mut cursor)?;
                array.read_frame(&mut cursor, &selected, &mut columns)?;
                populated += 1;
            }
        }

        let channels_out = array
            .channels()
            .iter()
            .enumerate()
            .filter(|(i, _)| selected[*i])
            .map(|(i, channel)| ChannelSamples {
                name: channel.name.clone(),
                units: channel.units.clone(),
                dimensions: channel.dimensions.clone(),
                values: std::mem::take(&mut columns[i]),
            })
            .collect();
        Ok(FrameData {
            frame_array: frame_array.clone(),
            rows: populated,
            channels: channels_out,
        })
    }
}
