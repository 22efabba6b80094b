//! Representation-code codec: the 27 primitive binary encodings.
//!
//! Every scalar in the format carries (explicitly or via a template) one of
//! these codes:
//!
//! | Code | Name   | Size      | Description                              |
//! |------|--------|-----------|------------------------------------------|
//! | 1    | FSHORT | 2         | Low precision floating point             |
//! | 2    | FSINGL | 4         | IEEE single precision floating point     |
//! | 3    | FSING1 | 8         | Validated single precision               |
//! | 4    | FSING2 | 12        | Two-way validated single precision       |
//! | 5    | ISINGL | 4         | IBM single precision floating point      |
//! | 6    | VSINGL | 4         | VAX single precision floating point      |
//! | 7    | FDOUBL | 8         | IEEE double precision floating point     |
//! | 8    | FDOUB1 | 16        | Validated double precision               |
//! | 9    | FDOUB2 | 24        | Two-way validated double precision       |
//! | 10   | CSINGL | 8         | Single precision complex                 |
//! | 11   | CDOUBL | 16        | Double precision complex                 |
//! | 12   | SSHORT | 1         | Short signed integer                     |
//! | 13   | SNORM  | 2         | Normal signed integer                    |
//! | 14   | SLONG  | 4         | Long signed integer                      |
//! | 15   | USHORT | 1         | Short unsigned integer                   |
//! | 16   | UNORM  | 2         | Normal unsigned integer                  |
//! | 17   | ULONG  | 4         | Long unsigned integer                    |
//! | 18   | UVARI  | 1, 2 or 4 | Variable-length unsigned integer         |
//! | 19   | IDENT  | variable  | Variable-length identifier               |
//! | 20   | ASCII  | variable  | Variable-length character string         |
//! | 21   | DTIME  | 8         | Date and time                            |
//! | 22   | ORIGIN | variable  | Origin reference                         |
//! | 23   | OBNAME | variable  | Object name                              |
//! | 24   | OBJREF | variable  | Object reference                         |
//! | 25   | ATTREF | variable  | Attribute reference                      |
//! | 26   | STATUS | 1         | Boolean status                           |
//! | 27   | UNITS  | variable  | Units expression                         |
//!
//! All multi-byte integers and IEEE floats are big-endian. The code table is
//! the closed [`RepCode`] enum; there is no runtime registry to initialize.

pub mod float;

use rp66_error::DecodeError;
use rp66_types::{AttrRef, ByteCursor, DateTime, ObjectName, ObjectRef, Value};
use tracing::warn;

/// One of the 27 representation codes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[repr(u8)]
pub enum RepCode {
    Fshort = 1,
    Fsingl = 2,
    Fsing1 = 3,
    Fsing2 = 4,
    Isingl = 5,
    Vsingl = 6,
    Fdoubl = 7,
    Fdoub1 = 8,
    Fdoub2 = 9,
    Csingl = 10,
    Cdoubl = 11,
    Sshort = 12,
    Snorm = 13,
    Slong = 14,
    Ushort = 15,
    Unorm = 16,
    Ulong = 17,
    Uvari = 18,
    Ident = 19,
    Ascii = 20,
    Dtime = 21,
    Origin = 22,
    Obname = 23,
    Objref = 24,
    Attref = 25,
    Status = 26,
    Units = 27,
}

/// Broad classification of what a code's decoded value is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueClass {
    /// Integers, floats, validated floats, complex numbers.
    Number,
    /// Identifier, ASCII and units byte strings.
    String,
    /// Date-time.
    Time,
    /// Boolean status.
    Status,
    /// Origin, object and attribute references.
    Reference,
}

impl RepCode {
    /// All codes in numeric order.
    pub const ALL: [Self; 27] = [
        Self::Fshort,
        Self::Fsingl,
        Self::Fsing1,
        Self::Fsing2,
        Self::Isingl,
        Self::Vsingl,
        Self::Fdoubl,
        Self::Fdoub1,
        Self::Fdoub2,
        Self::Csingl,
        Self::Cdoubl,
        Self::Sshort,
        Self::Snorm,
        Self::Slong,
        Self::Ushort,
        Self::Unorm,
        Self::Ulong,
        Self::Uvari,
        Self::Ident,
        Self::Ascii,
        Self::Dtime,
        Self::Origin,
        Self::Obname,
        Self::Objref,
        Self::Attref,
        Self::Status,
        Self::Units,
    ];

    /// Look a code up by its numeric value.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Fshort),
            2 => Some(Self::Fsingl),
            3 => Some(Self::Fsing1),
            4 => Some(Self::Fsing2),
            5 => Some(Self::Isingl),
            6 => Some(Self::Vsingl),
            7 => Some(Self::Fdoubl),
            8 => Some(Self::Fdoub1),
            9 => Some(Self::Fdoub2),
            10 => Some(Self::Csingl),
            11 => Some(Self::Cdoubl),
            12 => Some(Self::Sshort),
            13 => Some(Self::Snorm),
            14 => Some(Self::Slong),
            15 => Some(Self::Ushort),
            16 => Some(Self::Unorm),
            17 => Some(Self::Ulong),
            18 => Some(Self::Uvari),
            19 => Some(Self::Ident),
            20 => Some(Self::Ascii),
            21 => Some(Self::Dtime),
            22 => Some(Self::Origin),
            23 => Some(Self::Obname),
            24 => Some(Self::Objref),
            25 => Some(Self::Attref),
            26 => Some(Self::Status),
            27 => Some(Self::Units),
            _ => None,
        }
    }

    /// Numeric code value.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Symbolic name from the standard.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Fshort => "FSHORT",
            Self::Fsingl => "FSINGL",
            Self::Fsing1 => "FSING1",
            Self::Fsing2 => "FSING2",
            Self::Isingl => "ISINGL",
            Self::Vsingl => "VSINGL",
            Self::Fdoubl => "FDOUBL",
            Self::Fdoub1 => "FDOUB1",
            Self::Fdoub2 => "FDOUB2",
            Self::Csingl => "CSINGL",
            Self::Cdoubl => "CDOUBL",
            Self::Sshort => "SSHORT",
            Self::Snorm => "SNORM",
            Self::Slong => "SLONG",
            Self::Ushort => "USHORT",
            Self::Unorm => "UNORM",
            Self::Ulong => "ULONG",
            Self::Uvari => "UVARI",
            Self::Ident => "IDENT",
            Self::Ascii => "ASCII",
            Self::Dtime => "DTIME",
            Self::Origin => "ORIGIN",
            Self::Obname => "OBNAME",
            Self::Objref => "OBJREF",
            Self::Attref => "ATTREF",
            Self::Status => "STATUS",
            Self::Units => "UNITS",
        }
    }

    /// Value classification.
    pub const fn value_class(self) -> ValueClass {
        match self {
            Self::Fshort
            | Self::Fsingl
            | Self::Fsing1
            | Self::Fsing2
            | Self::Isingl
            | Self::Vsingl
            | Self::Fdoubl
            | Self::Fdoub1
            | Self::Fdoub2
            | Self::Csingl
            | Self::Cdoubl
            | Self::Sshort
            | Self::Snorm
            | Self::Slong
            | Self::Ushort
            | Self::Unorm
            | Self::Ulong
            | Self::Uvari => ValueClass::Number,
            Self::Ident | Self::Ascii | Self::Units => ValueClass::String,
            Self::Dtime => ValueClass::Time,
            Self::Status => ValueClass::Status,
            Self::Origin | Self::Obname | Self::Objref | Self::Attref => ValueClass::Reference,
        }
    }

    /// Encoded size in bytes for fixed-length codes, `None` for the
    /// variable-length ones.
    pub const fn fixed_length(self) -> Option<usize> {
        match self {
            Self::Sshort | Self::Ushort | Self::Status => Some(1),
            Self::Fshort | Self::Snorm | Self::Unorm => Some(2),
            Self::Fsingl | Self::Isingl | Self::Vsingl | Self::Slong | Self::Ulong => Some(4),
            Self::Fsing1 | Self::Fdoubl | Self::Csingl | Self::Dtime => Some(8),
            Self::Fsing2 => Some(12),
            Self::Fdoub1 | Self::Cdoubl => Some(16),
            Self::Fdoub2 => Some(24),
            Self::Uvari
            | Self::Ident
            | Self::Ascii
            | Self::Origin
            | Self::Obname
            | Self::Objref
            | Self::Attref
            | Self::Units => None,
        }
    }

    /// True for the fixed-length numeric codes an index channel may use.
    ///
    /// The standard requires the index channel to be scalar without saying
    /// which codes qualify; this is the set observed in practice.
    pub const fn is_scalar(self) -> bool {
        matches!(
            self,
            Self::Fshort
                | Self::Fsingl
                | Self::Isingl
                | Self::Vsingl
                | Self::Fdoubl
                | Self::Fdoub1
                | Self::Sshort
                | Self::Snorm
                | Self::Slong
                | Self::Ushort
                | Self::Unorm
                | Self::Ulong
        )
    }

    /// True for codes whose decoded value has a single f64 view, i.e. the
    /// codes a frame channel can materialize into a sample array.
    pub const fn is_numeric(self) -> bool {
        matches!(self.value_class(), ValueClass::Number)
            && !matches!(self, Self::Csingl | Self::Cdoubl)
    }
}

// === Primitive reads ===
//
// These are used both by `decode` and directly by the object-model decoder,
// which reads attribute characteristics with fixed codes.

/// Read a 1-byte unsigned integer (USHORT).
pub fn read_ushort(ld: &mut ByteCursor<'_>) -> Result<u8, DecodeError> {
    ld.read_u8()
}

/// Read a variable-length unsigned integer (UVARI).
///
/// The top two bits of the first byte select the form: `0x` one byte,
/// `10` two bytes, `11` four bytes.
pub fn read_uvari(ld: &mut ByteCursor<'_>) -> Result<u32, DecodeError> {
    let first = ld.read_u8()?;
    match first & 0xC0 {
        0x80 => {
            let second = ld.read_u8()?;
            Ok((u32::from(first & 0x7F) << 8) | u32::from(second))
        }
        0xC0 => {
            let rest = ld.take(3)?;
            Ok((u32::from(first & 0x3F) << 24)
                | (u32::from(rest[0]) << 16)
                | (u32::from(rest[1]) << 8)
                | u32::from(rest[2]))
        }
        _ => Ok(u32::from(first)),
    }
}

/// Read a length-prefixed identifier (IDENT).
pub fn read_ident(ld: &mut ByteCursor<'_>) -> Result<Vec<u8>, DecodeError> {
    let len = ld.read_u8()?;
    Ok(ld.take(usize::from(len))?.to_vec())
}

/// Characters the standard allows in a units expression, plus `%` which is
/// common in real files.
fn is_units_char(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || matches!(byte, b' ' | b'-' | b'.' | b'/' | b'(' | b')' | b'%')
}

/// Read a units expression (UNITS): identifier syntax with a restricted
/// character set. Violations are logged, not fatal.
pub fn read_units(ld: &mut ByteCursor<'_>) -> Result<Vec<u8>, DecodeError> {
    let bytes = read_ident(ld)?;
    if !bytes.iter().copied().all(is_units_char) {
        warn!(
            units = %String::from_utf8_lossy(&bytes),
            "units expression has characters outside the allowed set"
        );
    }
    Ok(bytes)
}

/// Read an object name (OBNAME): origin, copy number, identifier.
pub fn read_obname(ld: &mut ByteCursor<'_>) -> Result<ObjectName, DecodeError> {
    let origin = read_uvari(ld)?;
    let copy = ld.read_u8()?;
    let ident = read_ident(ld)?;
    Ok(ObjectName {
        origin,
        copy,
        ident,
    })
}

fn read_dtime(ld: &mut ByteCursor<'_>) -> Result<DateTime, DecodeError> {
    let year = 1900 + u16::from(ld.read_u8()?);
    let tz_month = ld.read_u8()?;
    Ok(DateTime {
        year,
        tz: (tz_month >> 4) & 0x0F,
        month: tz_month & 0x0F,
        day: ld.read_u8()?,
        hour: ld.read_u8()?,
        minute: ld.read_u8()?,
        second: ld.read_u8()?,
        millisecond: ld.read_u16()?,
    })
}

fn read_f32(ld: &mut ByteCursor<'_>) -> Result<f32, DecodeError> {
    let chunk = ld.take(4)?;
    Ok(f32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
}

fn read_f64(ld: &mut ByteCursor<'_>) -> Result<f64, DecodeError> {
    let chunk = ld.take(8)?;
    Ok(f64::from_be_bytes([
        chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5], chunk[6], chunk[7],
    ]))
}

fn take4(ld: &mut ByteCursor<'_>) -> Result<[u8; 4], DecodeError> {
    let chunk = ld.take(4)?;
    Ok([chunk[0], chunk[1], chunk[2], chunk[3]])
}

// === Decode ===

/// Decode one value of the given code, advancing the cursor by exactly the
/// value's encoded size.
pub fn decode(code: RepCode, ld: &mut ByteCursor<'_>) -> Result<Value, DecodeError> {
    match code {
        RepCode::Fshort => {
            let word = ld.read_u16()?;
            Ok(Value::F32(float::fshort_to_f32(word)))
        }
        RepCode::Fsingl => Ok(Value::F32(read_f32(ld)?)),
        RepCode::Fsing1 => Ok(Value::ValidatedF32 {
            value: read_f32(ld)?,
            error: read_f32(ld)?,
        }),
        RepCode::Fsing2 => Ok(Value::TwoWayValidatedF32 {
            value: read_f32(ld)?,
            plus: read_f32(ld)?,
            minus: read_f32(ld)?,
        }),
        RepCode::Isingl => Ok(Value::F32(float::ibm_to_f64(take4(ld)?) as f32)),
        RepCode::Vsingl => Ok(Value::F32(float::vax_to_f32(take4(ld)?))),
        RepCode::Fdoubl => Ok(Value::F64(read_f64(ld)?)),
        RepCode::Fdoub1 => Ok(Value::ValidatedF64 {
            value: read_f64(ld)?,
            error: read_f64(ld)?,
        }),
        RepCode::Fdoub2 => Ok(Value::TwoWayValidatedF64 {
            value: read_f64(ld)?,
            plus: read_f64(ld)?,
            minus: read_f64(ld)?,
        }),
        RepCode::Csingl => Ok(Value::ComplexF32 {
            real: read_f32(ld)?,
            imag: read_f32(ld)?,
        }),
        RepCode::Cdoubl => Ok(Value::ComplexF64 {
            real: read_f64(ld)?,
            imag: read_f64(ld)?,
        }),
        RepCode::Sshort => Ok(Value::Int(i64::from(ld.read_u8()? as i8))),
        RepCode::Snorm => Ok(Value::Int(i64::from(ld.read_u16()? as i16))),
        RepCode::Slong => Ok(Value::Int(i64::from(ld.read_u32()? as i32))),
        RepCode::Ushort => Ok(Value::Uint(u64::from(ld.read_u8()?))),
        RepCode::Unorm => Ok(Value::Uint(u64::from(ld.read_u16()?))),
        RepCode::Ulong => Ok(Value::Uint(u64::from(ld.read_u32()?))),
        RepCode::Uvari | RepCode::Origin => Ok(Value::Uint(u64::from(read_uvari(ld)?))),
        RepCode::Ident => Ok(Value::Ident(read_ident(ld)?)),
        RepCode::Ascii => {
            let len = read_uvari(ld)?;
            Ok(Value::Ascii(ld.take(len as usize)?.to_vec()))
        }
        RepCode::Dtime => Ok(Value::DateTime(read_dtime(ld)?)),
        RepCode::Obname => Ok(Value::Name(read_obname(ld)?)),
        RepCode::Objref => Ok(Value::ObjectRef(ObjectRef {
            object_type: read_ident(ld)?,
            name: read_obname(ld)?,
        })),
        RepCode::Attref => Ok(Value::AttrRef(AttrRef {
            object_type: read_ident(ld)?,
            name: read_obname(ld)?,
            label: read_ident(ld)?,
        })),
        RepCode::Status => Ok(Value::Status(ld.read_u8()? != 0)),
        RepCode::Units => Ok(Value::Units(read_units(ld)?)),
    }
}

/// Decode the code byte itself, then one value of that code.
pub fn decode_tagged(ld: &mut ByteCursor<'_>) -> Result<Value, DecodeError> {
    let raw = ld.read_u8()?;
    let code = RepCode::from_code(raw).ok_or(DecodeError::UnknownRepCode { code: raw })?;
    decode(code, ld)
}

// === Encode ===

fn shape_err(code: RepCode, value: &Value) -> DecodeError {
    DecodeError::ValueShape {
        code: code.name(),
        got: value.kind(),
    }
}

fn range_err(code: RepCode, value: impl std::fmt::Display) -> DecodeError {
    DecodeError::ValueRange {
        code: code.name(),
        value: value.to_string(),
    }
}

/// Append the UVARI encoding of `value`, using the smallest of the 1/2/4
/// byte forms that fits.
pub fn write_uvari(out: &mut Vec<u8>, value: u64) -> Result<(), DecodeError> {
    if value < 1 << 7 {
        out.push(value as u8);
    } else if value < 1 << 14 {
        out.extend_from_slice(&(0x8000 | value as u16).to_be_bytes());
    } else if value < 1 << 30 {
        out.extend_from_slice(&(0xC000_0000 | value as u32).to_be_bytes());
    } else {
        return Err(DecodeError::UvariOverflow { value });
    }
    Ok(())
}

fn write_ident(out: &mut Vec<u8>, code: RepCode, bytes: &[u8]) -> Result<(), DecodeError> {
    let len = u8::try_from(bytes.len())
        .map_err(|_| range_err(code, format!("{} byte identifier", bytes.len())))?;
    out.push(len);
    out.extend_from_slice(bytes);
    Ok(())
}

fn write_obname(out: &mut Vec<u8>, name: &ObjectName) -> Result<(), DecodeError> {
    write_uvari(out, u64::from(name.origin))?;
    out.push(name.copy);
    write_ident(out, RepCode::Obname, &name.ident)
}

fn signed_in_range(code: RepCode, value: &Value, min: i64, max: i64) -> Result<i64, DecodeError> {
    match value {
        Value::Int(i) if (min..=max).contains(i) => Ok(*i),
        Value::Int(i) => Err(range_err(code, i)),
        other => Err(shape_err(code, other)),
    }
}

fn unsigned_in_range(code: RepCode, value: &Value, max: u64) -> Result<u64, DecodeError> {
    match value {
        Value::Uint(u) if *u <= max => Ok(*u),
        Value::Uint(u) => Err(range_err(code, u)),
        other => Err(shape_err(code, other)),
    }
}

fn f32_of(code: RepCode, value: &Value) -> Result<f32, DecodeError> {
    match value {
        Value::F32(f) => Ok(*f),
        other => Err(shape_err(code, other)),
    }
}

/// Encode one value as the given code, appending to `out`.
///
/// The value must have the shape the code decodes to; integers are also
/// range checked.
pub fn encode(code: RepCode, value: &Value, out: &mut Vec<u8>) -> Result<(), DecodeError> {
    match code {
        RepCode::Fshort => {
            let f = f32_of(code, value)?;
            let word = float::f32_to_fshort(f).ok_or_else(|| range_err(code, f))?;
            out.extend_from_slice(&word.to_be_bytes());
        }
        RepCode::Fsingl => out.extend_from_slice(&f32_of(code, value)?.to_be_bytes()),
        RepCode::Fsing1 => match value {
            Value::ValidatedF32 { value, error } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&error.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Fsing2 => match value {
            Value::TwoWayValidatedF32 { value, plus, minus } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&plus.to_be_bytes());
                out.extend_from_slice(&minus.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Isingl => {
            let f = f32_of(code, value)?;
            let bytes = float::f64_to_ibm(f64::from(f)).ok_or_else(|| range_err(code, f))?;
            out.extend_from_slice(&bytes);
        }
        RepCode::Vsingl => {
            let f = f32_of(code, value)?;
            let bytes = float::f32_to_vax(f).ok_or_else(|| range_err(code, f))?;
            out.extend_from_slice(&bytes);
        }
        RepCode::Fdoubl => match value {
            Value::F64(f) => out.extend_from_slice(&f.to_be_bytes()),
            other => return Err(shape_err(code, other)),
        },
        RepCode::Fdoub1 => match value {
            Value::ValidatedF64 { value, error } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&error.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Fdoub2 => match value {
            Value::TwoWayValidatedF64 { value, plus, minus } => {
                out.extend_from_slice(&value.to_be_bytes());
                out.extend_from_slice(&plus.to_be_bytes());
                out.extend_from_slice(&minus.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Csingl => match value {
            Value::ComplexF32 { real, imag } => {
                out.extend_from_slice(&real.to_be_bytes());
                out.extend_from_slice(&imag.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Cdoubl => match value {
            Value::ComplexF64 { real, imag } => {
                out.extend_from_slice(&real.to_be_bytes());
                out.extend_from_slice(&imag.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Sshort => {
            let i = signed_in_range(code, value, i64::from(i8::MIN), i64::from(i8::MAX))?;
            out.push(i as u8);
        }
        RepCode::Snorm => {
            let i = signed_in_range(code, value, i64::from(i16::MIN), i64::from(i16::MAX))?;
            out.extend_from_slice(&(i as i16).to_be_bytes());
        }
        RepCode::Slong => {
            let i = signed_in_range(code, value, i64::from(i32::MIN), i64::from(i32::MAX))?;
            out.extend_from_slice(&(i as i32).to_be_bytes());
        }
        RepCode::Ushort => {
            let u = unsigned_in_range(code, value, u64::from(u8::MAX))?;
            out.push(u as u8);
        }
        RepCode::Unorm => {
            let u = unsigned_in_range(code, value, u64::from(u16::MAX))?;
            out.extend_from_slice(&(u as u16).to_be_bytes());
        }
        RepCode::Ulong => {
            let u = unsigned_in_range(code, value, u64::from(u32::MAX))?;
            out.extend_from_slice(&(u as u32).to_be_bytes());
        }
        RepCode::Uvari | RepCode::Origin => match value {
            Value::Uint(u) => write_uvari(out, *u)?,
            other => return Err(shape_err(code, other)),
        },
        RepCode::Ident => match value {
            Value::Ident(b) => write_ident(out, code, b)?,
            other => return Err(shape_err(code, other)),
        },
        RepCode::Ascii => match value {
            Value::Ascii(b) => {
                write_uvari(out, b.len() as u64)?;
                out.extend_from_slice(b);
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Dtime => match value {
            Value::DateTime(dt) => {
                if !(1900..1900 + 256).contains(&i32::from(dt.year)) {
                    return Err(range_err(code, dt.year));
                }
                out.push((dt.year - 1900) as u8);
                out.push((dt.tz << 4) | (dt.month & 0x0F));
                out.extend_from_slice(&[dt.day, dt.hour, dt.minute, dt.second]);
                out.extend_from_slice(&dt.millisecond.to_be_bytes());
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Obname => match value {
            Value::Name(name) => write_obname(out, name)?,
            other => return Err(shape_err(code, other)),
        },
        RepCode::Objref => match value {
            Value::ObjectRef(r) => {
                write_ident(out, code, &r.object_type)?;
                write_obname(out, &r.name)?;
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Attref => match value {
            Value::AttrRef(r) => {
                write_ident(out, code, &r.object_type)?;
                write_obname(out, &r.name)?;
                write_ident(out, code, &r.label)?;
            }
            other => return Err(shape_err(code, other)),
        },
        RepCode::Status => match value {
            Value::Status(s) => out.push(u8::from(*s)),
            other => return Err(shape_err(code, other)),
        },
        RepCode::Units => match value {
            Value::Units(b) => write_ident(out, code, b)?,
            other => return Err(shape_err(code, other)),
        },
    }
    Ok(())
}
