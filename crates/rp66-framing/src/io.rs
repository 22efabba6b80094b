//! Small read helpers shared by the framing readers.

use std::io::{Read, Seek, SeekFrom};

use rp66_error::ScanError;

/// Current stream offset.
pub fn stream_offset<R: Seek>(file: &mut R) -> Result<u64, ScanError> {
    file.stream_position().map_err(ScanError::Io)
}

/// Seek to an absolute offset.
pub fn seek_to<R: Seek>(file: &mut R, offset: u64) -> Result<(), ScanError> {
    file.seek(SeekFrom::Start(offset)).map_err(ScanError::Io)?;
    Ok(())
}

/// Read a big-endian u16. Callers map the raw I/O error (including
/// `UnexpectedEof`) to the framing error that knows the offset.
pub fn read_u16_be<R: Read>(file: &mut R) -> Result<u16, std::io::Error> {
    let mut buf = [0u8; 2];
    file.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

/// Read a single byte.
pub fn read_u8<R: Read>(file: &mut R) -> Result<u8, std::io::Error> {
    let mut buf = [0u8; 1];
    file.read_exact(&mut buf)?;
    Ok(buf[0])
}

/// Read exactly `len` bytes into a fresh buffer.
pub fn read_exact_vec<R: Read>(file: &mut R, len: usize) -> Result<Vec<u8>, std::io::Error> {
    let mut buf = vec![0u8; len];
    file.read_exact(&mut buf)?;
    Ok(buf)
}
