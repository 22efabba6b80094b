//! The sum type over every decodable representation.

use std::fmt;

use crate::dtime::DateTime;
use crate::name::{AttrRef, ObjectName, ObjectRef};

/// One decoded value.
///
/// Variants keep the precision of the wire form: 4-byte floats stay `f32`
/// so that re-encoding reproduces the original bytes.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    /// Signed integer (1, 2 or 4 bytes on the wire).
    Int(i64),
    /// Unsigned integer, including the variable-length form.
    Uint(u64),
    /// Single precision float (IEEE, IBM, VAX or low-precision forms).
    F32(f32),
    /// IEEE double precision float.
    F64(f64),
    /// Single precision value with a symmetric error bound.
    ValidatedF32 { value: f32, error: f32 },
    /// Single precision value with separate plus/minus error bounds.
    TwoWayValidatedF32 { value: f32, plus: f32, minus: f32 },
    /// Double precision value with a symmetric error bound.
    ValidatedF64 { value: f64, error: f64 },
    /// Double precision value with separate plus/minus error bounds.
    TwoWayValidatedF64 { value: f64, plus: f64, minus: f64 },
    /// Single precision complex number.
    ComplexF32 { real: f32, imag: f32 },
    /// Double precision complex number.
    ComplexF64 { real: f64, imag: f64 },
    /// Identifier bytes (length-prefixed on the wire, up to 255 bytes).
    Ident(Vec<u8>),
    /// ASCII text (variable-length prefix, up to 2^30 - 1 bytes).
    Ascii(Vec<u8>),
    /// Units expression (identifier syntax, restricted character set).
    Units(Vec<u8>),
    /// Packed date-time.
    DateTime(DateTime),
    /// Object name (origin, copy, identifier).
    Name(ObjectName),
    /// Object reference (set type plus object name).
    ObjectRef(ObjectRef),
    /// Attribute reference (set type, object name, label).
    AttrRef(AttrRef),
    /// Boolean status.
    Status(bool),
}

impl Value {
    /// Short shape name, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "signed integer",
            Self::Uint(_) => "unsigned integer",
            Self::F32(_) => "single",
            Self::F64(_) => "double",
            Self::ValidatedF32 { .. } => "validated single",
            Self::TwoWayValidatedF32 { .. } => "two-way validated single",
            Self::ValidatedF64 { .. } => "validated double",
            Self::TwoWayValidatedF64 { .. } => "two-way validated double",
            Self::ComplexF32 { .. } => "complex single",
            Self::ComplexF64 { .. } => "complex double",
            Self::Ident(_) => "identifier",
            Self::Ascii(_) => "ascii",
            Self::Units(_) => "units",
            Self::DateTime(_) => "date-time",
            Self::Name(_) => "object name",
            Self::ObjectRef(_) => "object reference",
            Self::AttrRef(_) => "attribute reference",
            Self::Status(_) => "status",
        }
    }

    /// Numeric view of the value as f64, if it has one.
    ///
    /// Validated forms yield their nominal value; compound and string forms
    /// yield `None`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Uint(u) => Some(*u as f64),
            Self::F32(f) => Some(f64::from(*f)),
            Self::F64(f) => Some(*f),
            Self::ValidatedF32 { value, .. } | Self::TwoWayValidatedF32 { value, .. } => {
                Some(f64::from(*value))
            }
            Self::ValidatedF64 { value, .. } | Self::TwoWayValidatedF64 { value, .. } => {
                Some(*value)
            }
            _ => None,
        }
    }

    /// Unsigned view, if the value is a non-negative integer.
    #[must_use]
    pub const fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Uint(u) => Some(*u),
            Self::Int(i) if *i >= 0 => Some(*i as u64),
            _ => None,
        }
    }

    /// Byte-string view for identifier-like values.
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Ident(b) | Self::Ascii(b) | Self::Units(b) => Some(b),
            _ => None,
        }
    }

    /// Object-name view.
    #[must_use]
    pub const fn as_name(&self) -> Option<&ObjectName> {
        match self {
            Self::Name(n) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "{i}"),
            Self::Uint(u) => write!(f, "{u}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::ValidatedF32 { value, error } => write!(f, "{value} (+/-{error})"),
            Self::ValidatedF64 { value, error } => write!(f, "{value} (+/-{error})"),
            Self::TwoWayValidatedF32 { value, plus, minus } => {
                write!(f, "{value} (+{plus}/-{minus})")
            }
            Self::TwoWayValidatedF64 { value, plus, minus } => {
                write!(f, "{value} (+{plus}/-{minus})")
            }
            Self::ComplexF32 { real, imag } => write!(f, "{real}+{imag}i"),
            Self::ComplexF64 { real, imag } => write!(f, "{real}+{imag}i"),
            Self::Ident(b) | Self::Ascii(b) | Self::Units(b) => {
                write!(f, "{}", String::from_utf8_lossy(b))
            }
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Name(n) => write!(f, "{n}"),
            Self::ObjectRef(r) => write!(f, "{r}"),
            Self::AttrRef(r) => write!(f, "{r}"),
            Self::Status(s) => write!(f, "{}", u8::from(*s)),
        }
    }
}
