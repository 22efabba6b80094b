//! The 80-byte storage unit label at the start of every file.

use rp66_error::ScanError;
use rp66_types::limits::STORAGE_LABEL_LEN;

/// Parsed storage unit label.
///
/// The label is fixed-width ASCII: a 4-byte sequence number, a 5-byte
/// version tag, a 6-byte structure word, a 5-byte maximum record length and
/// a 60-byte storage set identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageUnitLabel {
    /// Ordinal of this storage unit within its storage set.
    pub sequence_number: u32,
    /// Version tag, e.g. `V1.00`.
    pub dlis_version: [u8; 5],
    /// Declared maximum visible record length.
    pub max_record_length: u32,
    /// Free-form storage set identifier.
    pub storage_set_identifier: [u8; 60],
}

impl StorageUnitLabel {
    /// Label size in bytes.
    pub const SIZE: usize = STORAGE_LABEL_LEN;

    /// Parse the label from its 80 bytes.
    pub fn parse(bytes: &[u8]) -> Result<Self, ScanError> {
        if bytes.len() != Self::SIZE {
            return Err(ScanError::storage_label(format!(
                "expected {} bytes, got {}",
                Self::SIZE,
                bytes.len()
            )));
        }
        // TIF markers start with a zero type word where the label has ASCII
        // digits; reject those files outright.
        if bytes[..4] == [0, 0, 0, 0] {
            return Err(ScanError::TifMarkers);
        }
        let sequence_number = parse_padded_int(&bytes[0..4])
            .ok_or_else(|| ScanError::storage_label("bad storage unit sequence number"))?;
        let version: [u8; 5] = bytes[4..9].try_into().expect("slice length is 5");
        if &version[0..3] != b"V1." || !version[3..5].iter().all(u8::is_ascii_digit) {
            return Err(ScanError::storage_label(format!(
                "bad version tag {:?}",
                String::from_utf8_lossy(&version)
            )));
        }
        if &bytes[9..15] != b"RECORD" {
            return Err(ScanError::storage_label(format!(
                "bad storage unit structure {:?}",
                String::from_utf8_lossy(&bytes[9..15])
            )));
        }
        let max_record_length = parse_padded_int(&bytes[15..20])
            .ok_or_else(|| ScanError::storage_label("bad maximum record length"))?;
        let storage_set_identifier: [u8; 60] =
            bytes[20..80].try_into().expect("slice length is 60");
        Ok(Self {
            sequence_number,
            dlis_version: version,
            max_record_length,
            storage_set_identifier,
        })
    }
}

/// Parse a right-justified ASCII integer padded with spaces or zeros.
fn parse_padded_int(bytes: &[u8]) -> Option<u32> {
    let trimmed: &[u8] = {
        let mut rest = bytes;
        while let [b' ' | b'0', tail @ ..] = rest {
            rest = tail;
        }
        rest
    };
    if trimmed.is_empty() || !trimmed.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(trimmed).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"   1");
        bytes.extend_from_slice(b"V1.00");
        bytes.extend_from_slice(b"RECORD");
        bytes.extend_from_slice(b" 8192");
        bytes.extend_from_slice(&[b' '; 60]);
        bytes
    }

    #[test]
    fn parse_minimal_label() {
        let label = StorageUnitLabel::parse(&label_bytes()).unwrap();
        assert_eq!(label.sequence_number, 1);
        assert_eq!(&label.dlis_version, b"V1.00");
        assert_eq!(label.max_record_length, 8192);
    }

    #[test]
    fn rejects_wrong_size() {
        assert!(StorageUnitLabel::parse(&[0u8; 79]).is_err());
    }

    #[test]
    fn rejects_tif_prefix() {
        let mut bytes = label_bytes();
        bytes[0..4].copy_from_slice(&[0, 0, 0, 0]);
        assert!(matches!(
            StorageUnitLabel::parse(&bytes),
            Err(ScanError::TifMarkers)
        ));
    }

    #[test]
    fn rejects_bad_version_and_structure() {
        let mut bytes = label_bytes();
        bytes[4..9].copy_from_slice(b"V2.00");
        assert!(StorageUnitLabel::parse(&bytes).is_err());

        let mut bytes = label_bytes();
        bytes[9..15].copy_from_slice(b"STREAM");
        assert!(StorageUnitLabel::parse(&bytes).is_err());
    }

    #[test]
    fn padded_int_forms() {
        assert_eq!(parse_padded_int(b"0001"), Some(1));
        assert_eq!(parse_padded_int(b"  12"), Some(12));
        assert_eq!(parse_padded_int(b"    "), None);
        assert_eq!(parse_padded_int(b"  1x"), None);
    }
}
