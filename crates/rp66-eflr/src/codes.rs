//! Public logical-record type codes and their allowable set types.
//!
//! Codes 0-127 are public, 128-255 private. For structured records the
//! code constrains which set types the record may carry; for unstructured
//! records code 0 is frame data and 1 is unformatted data.

/// Structured record type: file header.
pub const EFLR_FILE_HEADER: u8 = 0;
/// Structured record type: origin.
pub const EFLR_ORIGIN: u8 = 1;
/// Structured record type: coordinate axis.
pub const EFLR_AXIS: u8 = 2;
/// Structured record type: channel definitions.
pub const EFLR_CHANNEL: u8 = 3;
/// Structured record type: frame definitions.
pub const EFLR_FRAME: u8 = 4;

/// Unstructured record type: frame data.
pub const IFLR_FRAME_DATA: u8 = 0;
/// Unstructured record type: unformatted data.
pub const IFLR_NO_FORMAT: u8 = 1;
/// Unstructured record type: end of data.
pub const IFLR_EOD: u8 = 127;

/// True for publicly defined record type codes.
pub const fn is_public(code: u8) -> bool {
    code < 128
}

/// True for privately defined record type codes.
pub const fn is_private(code: u8) -> bool {
    !is_public(code)
}

/// Mnemonic for a public structured record type code.
pub const fn eflr_mnemonic(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("FHLR"),
        1 => Some("OLR"),
        2 => Some("AXIS"),
        3 => Some("CHANNL"),
        4 => Some("FRAME"),
        5 => Some("STATIC"),
        6 => Some("SCRIPT"),
        7 => Some("UPDATE"),
        8 => Some("UDI"),
        9 => Some("LNAME"),
        10 => Some("SPEC"),
        11 => Some("DICT"),
        _ => None,
    }
}

/// Mnemonic for a public unstructured record type code.
pub const fn iflr_mnemonic(code: u8) -> Option<&'static str> {
    match code {
        0 => Some("FDATA"),
        1 => Some("NOFORMAT"),
        127 => Some("EOD"),
        _ => None,
    }
}

/// The set types a public structured record type may carry.
pub const fn eflr_allowable_set_types(code: u8) -> &'static [&'static [u8]] {
    match code {
        0 => &[b"FILE-HEADER"],
        1 => &[b"ORIGIN", b"WELL-REFERENCE"],
        2 => &[b"AXIS"],
        3 => &[b"CHANNEL"],
        4 => &[b"FRAME", b"PATH"],
        5 => &[
            b"CALIBRATION",
            b"CALIBRATION-COEFFICIENT",
            b"CALIBRATION-MEASUREMENT",
            b"COMPUTATION",
            b"EQUIPMENT",
            b"GROUP",
            b"PARAMETER",
            b"PROCESS",
            b"SPICE",
            b"TOOL",
            b"ZONE",
        ],
        6 => &[b"COMMENT", b"MESSAGE"],
        7 => &[b"UPDATE"],
        8 => &[b"NO-FORMAT"],
        9 => &[b"LONG-NAME"],
        10 => &[
            b"ATTRIBUTE",
            b"CODE",
            b"EFLR",
            b"IFLR",
            b"OBJECT-TYPE",
            b"REPRESENTATION-CODE",
            b"SPECIFICATION",
            b"UNIT-SYMBOL",
        ],
        11 => &[b"BASE-DICTIONARY", b"IDENTIFIER", b"LEXICON", b"OPTION"],
        _ => &[],
    }
}

/// Whether `set_type` is allowable for the public record type `code`.
///
/// Undefined/reserved codes constrain nothing.
pub fn set_type_allowed(code: u8, set_type: &[u8]) -> bool {
    let allowed = eflr_allowable_set_types(code);
    allowed.is_empty() || allowed.contains(&set_type)
}

/// Structured record type code for a set type, for the public set types.
pub fn eflr_code_for_set_type(set_type: &[u8]) -> Option<u8> {
    for code in 0..12u8 {
        if eflr_allowable_set_types(code).contains(&set_type) {
            return Some(code);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_private_split() {
        assert!(is_public(0));
        assert!(is_public(127));
        assert!(is_private(128));
        assert!(is_private(255));
    }

    #[test]
    fn mnemonics() {
        assert_eq!(eflr_mnemonic(0), Some("FHLR"));
        assert_eq!(eflr_mnemonic(3), Some("CHANNL"));
        assert_eq!(eflr_mnemonic(12), None);
        assert_eq!(iflr_mnemonic(0), Some("FDATA"));
        assert_eq!(iflr_mnemonic(127), Some("EOD"));
        assert_eq!(iflr_mnemonic(2), None);
    }

    #[test]
    fn allowable_set_types() {
        assert!(set_type_allowed(EFLR_CHANNEL, b"CHANNEL"));
        assert!(!set_type_allowed(EFLR_CHANNEL, b"FRAME"));
        assert!(set_type_allowed(EFLR_FRAME, b"PATH"));
        // Reserved codes are unconstrained.
        assert!(set_type_allowed(100, b"ANYTHING"));
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(eflr_code_for_set_type(b"FILE-HEADER"), Some(0));
        assert_eq!(eflr_code_for_set_type(b"CHANNEL"), Some(EFLR_CHANNEL));
        assert_eq!(eflr_code_for_set_type(b"FRAME"), Some(EFLR_FRAME));
        assert_eq!(eflr_code_for_set_type(b"PARAMETER"), Some(5));
        assert_eq!(eflr_code_for_set_type(b"NOT-A-SET"), None);
    }
}
