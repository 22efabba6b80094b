//! Object naming: OBNAME, OBJREF and ATTREF.

use std::fmt;

/// The three-part name that identifies an object within a set:
/// origin reference, copy number, identifier.
///
/// Identifiers are kept as raw bytes; the standard restricts them to a
/// printable subset but real files are not always compliant.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct ObjectName {
    /// Origin reference (a variable-length unsigned integer on the wire).
    pub origin: u32,
    /// Copy number, distinguishing otherwise identical names.
    pub copy: u8,
    /// Identifier bytes.
    pub ident: Vec<u8>,
}

impl ObjectName {
    /// Build a name from its parts.
    #[must_use]
    pub fn new(origin: u32, copy: u8, ident: impl Into<Vec<u8>>) -> Self {
        Self {
            origin,
            copy,
            ident: ident.into(),
        }
    }

    /// The identifier as lossily-decoded UTF-8, for display and error text.
    #[must_use]
    pub fn ident_str(&self) -> String {
        String::from_utf8_lossy(&self.ident).into_owned()
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "O: {} C: {} I: {}",
            self.origin,
            self.copy,
            self.ident_str()
        )
    }
}

/// A reference to an object in another set: set type plus object name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ObjectRef {
    /// The referenced set's type identifier.
    pub object_type: Vec<u8>,
    /// The referenced object's name.
    pub name: ObjectName,
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T: {} N: ({})",
            String::from_utf8_lossy(&self.object_type),
            self.name
        )
    }
}

/// A reference to a single attribute of an object in another set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AttrRef {
    /// The referenced set's type identifier.
    pub object_type: Vec<u8>,
    /// The referenced object's name.
    pub name: ObjectName,
    /// The referenced attribute's label.
    pub label: Vec<u8>,
}

impl fmt::Display for AttrRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "T: {} N: ({}) L: {}",
            String::from_utf8_lossy(&self.object_type),
            self.name,
            String::from_utf8_lossy(&self.label)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let name = ObjectName::new(2, 0, b"PRESSURE".to_vec());
        assert_eq!(name.to_string(), "O: 2 C: 0 I: PRESSURE");
    }

    #[test]
    fn equality_covers_all_parts() {
        let a = ObjectName::new(1, 0, b"TIME".to_vec());
        assert_eq!(a, ObjectName::new(1, 0, b"TIME".to_vec()));
        assert_ne!(a, ObjectName::new(2, 0, b"TIME".to_vec()));
        assert_ne!(a, ObjectName::new(1, 1, b"TIME".to_vec()));
        assert_ne!(a, ObjectName::new(1, 0, b"DEPTH".to_vec()));
    }

    #[test]
    fn ordering_is_origin_copy_ident() {
        let mut names = vec![
            ObjectName::new(2, 0, b"A".to_vec()),
            ObjectName::new(1, 1, b"B".to_vec()),
            ObjectName::new(1, 0, b"C".to_vec()),
        ];
        names.sort();
        assert_eq!(names[0].ident, b"C");
        assert_eq!(names[1].ident, b"B");
        assert_eq!(names[2].ident, b"A");
    }
}
