//! Sequential and random-access reading of logical records.

use std::io::{Read, Seek};

use rp66_error::ScanError;
use rp66_types::LogicalRecordPosition;
use tracing::debug;

use crate::io::{read_exact_vec, seek_to};
use crate::label::StorageUnitLabel;
use crate::record::{LogicalRecord, RecordBuilder};
use crate::segment::SegmentHeader;
use crate::visible::VisibleRecord;

/// Reader over one open file handle.
///
/// The handle is held for the lifetime of the reader; callers that need
/// concurrent access must serialize it themselves.
#[derive(Debug)]
pub struct RecordReader<R> {
    file: R,
    label: StorageUnitLabel,
}

impl<R: Read + Seek> RecordReader<R> {
    /// Open a stream: reads and validates the storage unit label.
    pub fn new(mut file: R) -> Result<Self, ScanError> {
        seek_to(&mut file, 0)?;
        let bytes = read_exact_vec(&mut file, StorageUnitLabel::SIZE).map_err(|err| {
            if err.kind() == std::io::ErrorKind::UnexpectedEof {
                ScanError::storage_label("file shorter than the storage unit label")
            } else {
                ScanError::Io(err)
            }
        })?;
        let label = StorageUnitLabel::parse(&bytes)?;
        debug!(
            sequence = label.sequence_number,
            max_record_length = label.max_record_length,
            "storage unit label read"
        );
        Ok(Self { file, label })
    }

    /// The parsed storage unit label.
    #[must_use]
    pub const fn label(&self) -> &StorageUnitLabel {
        &self.label
    }

    /// Give the file handle back.
    pub fn into_inner(self) -> R {
        self.file
    }

    /// Iterate every logical record from the start of the file.
    pub fn records(&mut self) -> Records<'_, R> {
        Records {
            reader: self,
            state: ScanState::Start,
        }
    }

    /// Re-read one logical record at a known position.
    ///
    /// `offset`/`length` select a byte window of the reassembled payload;
    /// `length == None` means to the end. Reading stops early once the
    /// window is filled, so a small window of a large record touches only
    /// its leading segments.
    pub fn read_at(
        &mut self,
        position: LogicalRecordPosition,
        offset: usize,
        length: Option<usize>,
    ) -> Result<LogicalRecord, ScanError> {
        seek_to(&mut self.file, position.visible_record)?;
        let mut vr = VisibleRecord::read(&mut self.file)?;
        seek_to(&mut self.file, position.segment)?;
        let mut seg = SegmentHeader::read(&mut self.file, &vr)?;
        let mut builder = RecordBuilder::new(&vr, &seg)?;

        let window_end = length.map(|len| offset.saturating_add(len));
        let mut logical_offset = 0usize;
        loop {
            let payload = read_stripped_payload(&mut self.file, &seg)?;
            let seg_start = logical_offset;
            let seg_end = logical_offset + payload.len();
            let lo = offset.clamp(seg_start, seg_end);
            let hi = window_end.map_or(seg_end, |end| end.clamp(seg_start, seg_end));
            if hi > lo {
                builder.extend(&payload[lo - seg_start..hi - seg_start]);
            }
            logical_offset = seg_end;
            if seg.attributes.is_last() {
                break;
            }
            if window_end.is_some_and(|end| logical_offset >= end) {
                break;
            }
            seg = match advance_header(&mut self.file, &mut vr, &seg)? {
                Some(next) => next,
                None => {
                    return Err(ScanError::SegmentEof {
                        offset: seg.next_position(),
                    });
                }
            };
        }
        Ok(builder.seal())
    }
}

/// Read the current segment's payload and strip its declared trailers.
///
/// Seeks to the payload, reads it minus any checksum/trailing-length
/// trailer, then drops pad bytes when they are visible.
fn read_stripped_payload<R: Read + Seek>(
    file: &mut R,
    seg: &SegmentHeader,
) -> Result<Vec<u8>, ScanError> {
    seek_to(file, seg.payload_position())?;
    let mut payload = read_exact_vec(file, seg.payload_length()).map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ScanError::SegmentEof {
                offset: seg.payload_position(),
            }
        } else {
            ScanError::Io(err)
        }
    })?;
    if seg.attributes.must_strip_padding() {
        let pad = *payload.last().ok_or(ScanError::SegmentPadding {
            offset: seg.position,
            pad: 0,
            payload: 0,
        })?;
        if usize::from(pad) > payload.len() {
            return Err(ScanError::SegmentPadding {
                offset: seg.position,
                pad,
                payload: payload.len(),
            });
        }
        payload.truncate(payload.len() - usize::from(pad));
    }
    Ok(payload)
}

/// Step to the next segment header, crossing into the next visible record
/// when the current one is exhausted. `Ok(None)` is a clean end of file at
/// a visible record boundary.
fn advance_header<R: Read + Seek>(
    file: &mut R,
    vr: &mut VisibleRecord,
    seg: &SegmentHeader,
) -> Result<Option<SegmentHeader>, ScanError> {
    let next = seg.next_position();
    seek_to(file, next)?;
    if next == vr.next_position() {
        *vr = match VisibleRecord::read(file) {
            Ok(new_vr) => new_vr,
            Err(ScanError::VisibleRecordEof { .. }) => return Ok(None),
            Err(err) => return Err(err),
        };
    }
    Ok(Some(SegmentHeader::read(file, vr)?))
}

enum ScanState {
    Start,
    Within {
        vr: VisibleRecord,
        seg: SegmentHeader,
    },
    Done,
}

/// Iterator over every logical record in the file.
///
/// The first error ends the iteration; a clean end of file simply stops.
pub struct Records<'a, R> {
    reader: &'a mut RecordReader<R>,
    state: ScanState,
}

impl<R: Read + Seek> Records<'_, R> {
    fn start(&mut self) -> Result<(VisibleRecord, SegmentHeader), ScanError> {
        let file = &mut self.reader.file;
        seek_to(file, StorageUnitLabel::SIZE as u64)?;
        let vr = VisibleRecord::read(file)?;
        let seg = SegmentHeader::read(file, &vr)?;
        Ok((vr, seg))
    }

    fn assemble(
        &mut self,
        mut vr: VisibleRecord,
        mut seg: SegmentHeader,
    ) -> Result<(LogicalRecord, ScanState), ScanError> {
        let file = &mut self.reader.file;
        // RecordBuilder::new rejects a non-first segment here, which covers
        // the "continuation without an open record" sequencing violation.
        let mut builder = RecordBuilder::new(&vr, &seg)?;
        let payload = read_stripped_payload(file, &seg)?;
        builder.extend(&payload);
        while !seg.attributes.is_last() {
            seg = match advance_header(file, &mut vr, &seg)? {
                Some(next) => next,
                None => {
                    return Err(ScanError::SegmentEof {
                        offset: seg.next_position(),
                    });
                }
            };
            if seg.attributes.is_first() {
                return Err(ScanError::SegmentSequence {
                    offset: seg.position,
                    detail: "first segment while the previous record is open",
                });
            }
            let payload = read_stripped_payload(file, &seg)?;
            builder.extend(&payload);
        }
        let record = builder.seal();
        let next_state = match advance_header(file, &mut vr, &seg)? {
            Some(next) => ScanState::Within { vr, seg: next },
            None => ScanState::Done,
        };
        Ok((record, next_state))
    }
}

impl<R: Read + Seek> Iterator for Records<'_, R> {
    type Item = Result<LogicalRecord, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        let (vr, seg) = match std::mem::replace(&mut self.state, ScanState::Done) {
            ScanState::Done => return None,
            ScanState::Start => match self.start() {
                Ok(pair) => pair,
                Err(err) => return Some(Err(err)),
            },
            ScanState::Within { vr, seg } => (vr, seg),
        };
        match self.assemble(vr, seg) {
            Ok((record, next_state)) => {
                self.state = next_state;
                Some(Ok(record))
            }
            Err(err) => Some(Err(err)),
        }
    }
}
