//! Unstructured (indirectly formatted) logical record headers.

use rp66_error::DecodeError;
use rp66_repcode::{read_obname, read_uvari};
use rp66_types::{ByteCursor, ObjectName};
use tracing::warn;

/// The front of an unstructured record: the frame array it belongs to and
/// its frame number. The sample bytes follow and are interpreted against
/// the frame array's schema.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IflrHeader {
    /// Name of the frame array the record carries samples for.
    pub frame_array: ObjectName,
    /// Frame ordinal, counting from one.
    pub frame_number: u32,
    /// Byte length of the header itself.
    pub header_len: usize,
    /// Sample bytes remaining after the header.
    pub remaining: usize,
}

impl IflrHeader {
    /// Parse the header off the front of a sealed unstructured record.
    ///
    /// Frame numbers count from one, but zero-numbered records exist in
    /// the wild; those only warrant a warning when they carry data.
    pub fn parse(ld: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        ld.rewind();
        let frame_array = read_obname(ld)?;
        let frame_number = read_uvari(ld)?;
        let header_len = ld.position();
        let remaining = ld.remaining();
        if frame_number == 0 && remaining != 0 {
            warn!(
                frame_array = %frame_array,
                "frame number 0 on a record that carries data"
            );
        }
        Ok(Self {
            frame_array,
            frame_number,
            header_len,
            remaining,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_header_and_leave_cursor_at_samples() {
        // OBNAME(1, 0, "800T"), frame number 5, then two sample bytes.
        let bytes = [0x01, 0x00, 0x04, b'8', b'0', b'0', b'T', 0x05, 0xAA, 0xBB];
        let mut cur = ByteCursor::new(&bytes);
        let header = IflrHeader::parse(&mut cur).unwrap();
        assert_eq!(header.frame_array, ObjectName::new(1, 0, b"800T".to_vec()));
        assert_eq!(header.frame_number, 5);
        assert_eq!(header.header_len, 8);
        assert_eq!(header.remaining, 2);
        assert_eq!(cur.take(2).unwrap(), &[0xAA, 0xBB]);
    }

    #[test]
    fn short_header_is_an_error() {
        let bytes = [0x01, 0x00, 0x04, b'8'];
        let mut cur = ByteCursor::new(&bytes);
        assert!(matches!(
            IflrHeader::parse(&mut cur),
            Err(DecodeError::ShortData { .. })
        ));
    }
}
