//! The component descriptor: one byte in front of every structural unit of
//! a structured logical record.
//!
//! The top three bits carry the role, the low five bits are per-role
//! presence flags:
//!
//! ```text
//! role  SET:        T N x x x     (T required)
//! role  OBJECT:     N x x x x     (N required)
//! role  ATTRIBUTE:  L C R U V
//! ```

use rp66_error::DecodeError;

/// Structural role of a component, from the descriptor's top three bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentRole {
    /// Attribute absent from this object.
    AbsentAttribute,
    /// Ordinary attribute.
    Attribute,
    /// Invariant attribute: stated once in the template, identical in
    /// every object.
    InvariantAttribute,
    /// Object.
    Object,
    /// Reserved role bits; never valid.
    Reserved,
    /// Redundant set (an identical copy of an earlier set).
    RedundantSet,
    /// Replacement set (supersedes an earlier set).
    ReplacementSet,
    /// Set.
    Set,
}

impl ComponentRole {
    /// Human-readable role name for error text.
    pub const fn name(self) -> &'static str {
        match self {
            Self::AbsentAttribute => "absent attribute",
            Self::Attribute => "attribute",
            Self::InvariantAttribute => "invariant attribute",
            Self::Object => "object",
            Self::Reserved => "reserved",
            Self::RedundantSet => "redundant set",
            Self::ReplacementSet => "replacement set",
            Self::Set => "set",
        }
    }
}

const ROLE_MASK: u8 = 0xE0;
const SET_TYPE: u8 = 0x10;
const SET_NAME: u8 = 0x08;
const SET_RESERVED: u8 = 0x07;
const OBJECT_NAME: u8 = 0x10;
const OBJECT_RESERVED: u8 = 0x0F;
const ATTR_LABEL: u8 = 0x10;
const ATTR_COUNT: u8 = 0x08;
const ATTR_REP_CODE: u8 = 0x04;
const ATTR_UNITS: u8 = 0x02;
const ATTR_VALUE: u8 = 0x01;

/// A validated component descriptor byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentDescriptor(u8);

impl ComponentDescriptor {
    /// Validate a descriptor byte.
    ///
    /// Reserved bits must be clear, a set must carry its type and an
    /// object must carry its name.
    pub fn new(byte: u8) -> Result<Self, DecodeError> {
        let desc = Self(byte);
        if desc.is_set_group() {
            if byte & SET_RESERVED != 0 {
                return Err(DecodeError::DescriptorInvalid {
                    descriptor: byte,
                    detail: "reserved bits set on a set component",
                });
            }
            if byte & SET_TYPE == 0 {
                return Err(DecodeError::DescriptorInvalid {
                    descriptor: byte,
                    detail: "set component without a type",
                });
            }
        }
        if desc.role() == ComponentRole::Object {
            if byte & OBJECT_RESERVED != 0 {
                return Err(DecodeError::DescriptorInvalid {
                    descriptor: byte,
                    detail: "reserved bits set on an object component",
                });
            }
            if byte & OBJECT_NAME == 0 {
                return Err(DecodeError::DescriptorInvalid {
                    descriptor: byte,
                    detail: "object component without a name",
                });
            }
        }
        Ok(desc)
    }

    /// The raw descriptor byte.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// The role encoded in the top three bits.
    pub const fn role(self) -> ComponentRole {
        match self.0 & ROLE_MASK {
            0x00 => ComponentRole::AbsentAttribute,
            0x20 => ComponentRole::Attribute,
            0x40 => ComponentRole::InvariantAttribute,
            0x60 => ComponentRole::Object,
            0xA0 => ComponentRole::RedundantSet,
            0xC0 => ComponentRole::ReplacementSet,
            0xE0 => ComponentRole::Set,
            _ => ComponentRole::Reserved,
        }
    }

    /// Attribute, absent attribute or invariant attribute.
    pub const fn is_attribute_group(self) -> bool {
        self.0 & ROLE_MASK < 0x60
    }

    /// Set, redundant set or replacement set.
    pub const fn is_set_group(self) -> bool {
        self.0 & ROLE_MASK > 0x80
    }

    /// Set name presence (set group only).
    pub const fn set_has_name(self) -> bool {
        self.0 & SET_NAME != 0
    }

    /// Attribute label presence.
    pub const fn attr_has_label(self) -> bool {
        self.0 & ATTR_LABEL != 0
    }

    /// Attribute count presence.
    pub const fn attr_has_count(self) -> bool {
        self.0 & ATTR_COUNT != 0
    }

    /// Attribute representation-code presence.
    pub const fn attr_has_rep_code(self) -> bool {
        self.0 & ATTR_REP_CODE != 0
    }

    /// Attribute units presence.
    pub const fn attr_has_units(self) -> bool {
        self.0 & ATTR_UNITS != 0
    }

    /// Attribute value presence.
    pub const fn attr_has_value(self) -> bool {
        self.0 & ATTR_VALUE != 0
    }
}
