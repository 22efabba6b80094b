//! Set / Template / Object / Attribute decoding.
//!
//! A structured logical record opens with a set component, carries a
//! template that defines the positional schema, then zero or more objects
//! whose attributes inherit omitted characteristics from the template.

use hashbrown::HashMap;

use rp66_error::DecodeError;
use rp66_repcode::{RepCode, decode, read_ident, read_obname, read_units, read_ushort, read_uvari};
use rp66_types::{ByteCursor, ObjectName, Value};
use tracing::{debug, warn};

use crate::codes;
use crate::component::{ComponentDescriptor, ComponentRole};

/// What to do with a duplicate object name within one set.
///
/// There is deliberately no default: the reference implementation's call
/// sites disagree, so the choice belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum DuplicatePolicy {
    /// Keep the first object, ignore later ones.
    AcceptFirst,
    /// Fail the record decode.
    Raise,
    /// Keep the last object seen.
    Replace,
}

/// The set component: a type and an optional name.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetHeader {
    /// Set type, e.g. `CHANNEL`.
    pub set_type: Vec<u8>,
    /// Set name; empty when the name characteristic is absent.
    pub name: Vec<u8>,
}

/// One attribute: the five characteristics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Attribute {
    /// Label identifying the attribute within its template.
    pub label: Vec<u8>,
    /// Number of value elements.
    pub count: u32,
    /// Representation code of the value elements.
    pub rep_code: RepCode,
    /// Units of measure; empty when unspecified.
    pub units: Vec<u8>,
    /// Decoded value elements, or `None` when the value is absent.
    pub value: Option<Vec<Value>>,
}

impl Attribute {
    /// The global characteristic defaults: empty label, count 1, IDENT,
    /// no units, no value.
    fn global_default() -> Self {
        Self {
            label: Vec::new(),
            count: 1,
            rep_code: RepCode::Ident,
            units: Vec::new(),
            value: None,
        }
    }

    /// First value element, if any.
    #[must_use]
    pub fn scalar(&self) -> Option<&Value> {
        self.value.as_ref().and_then(|v| v.first())
    }
}

/// Read the characteristics flagged by `desc` on top of `base`.
///
/// `base` supplies the inherited label, count, representation code and
/// units. The value characteristic never comes from `base`: it is decoded
/// when present and absent otherwise.
fn read_characteristics(
    desc: ComponentDescriptor,
    ld: &mut ByteCursor<'_>,
    mut base: Attribute,
) -> Result<Attribute, DecodeError> {
    if desc.attr_has_label() {
        base.label = read_ident(ld)?;
    }
    if desc.attr_has_count() {
        base.count = read_uvari(ld)?;
    }
    if desc.attr_has_rep_code() {
        let raw = read_ushort(ld)?;
        base.rep_code = RepCode::from_code(raw).ok_or(DecodeError::UnknownRepCode { code: raw })?;
    }
    if desc.attr_has_units() {
        base.units = read_units(ld)?;
    }
    base.value = if desc.attr_has_value() {
        let mut values = Vec::with_capacity(base.count as usize);
        for _ in 0..base.count {
            values.push(decode(base.rep_code, ld)?);
        }
        Some(values)
    } else {
        None
    };
    Ok(base)
}

/// One template entry: the descriptor (whose role matters for invariant
/// and absent attributes) plus the attribute defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateAttribute {
    /// The component descriptor the entry was read from.
    pub descriptor: ComponentDescriptor,
    /// The entry's characteristics, defaults for every object.
    pub attr: Attribute,
}

/// The positional schema shared by every object in a set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Template {
    attrs: Vec<TemplateAttribute>,
    label_map: HashMap<Vec<u8>, usize>,
}

impl Template {
    /// Read template entries until an object component is next (or the
    /// record ends).
    fn read(ld: &mut ByteCursor<'_>) -> Result<Self, DecodeError> {
        let mut template = Self::default();
        loop {
            let desc = ComponentDescriptor::new(ld.read_u8()?)?;
            if !desc.is_attribute_group() {
                return Err(DecodeError::UnexpectedRole {
                    descriptor: desc.raw(),
                    found: desc.role().name(),
                    expected: "template attribute",
                });
            }
            let attr = read_characteristics(desc, ld, Attribute::global_default())?;
            if template.label_map.contains_key(&attr.label) {
                return Err(DecodeError::DuplicateTemplateLabel {
                    label: String::from_utf8_lossy(&attr.label).into_owned(),
                });
            }
            template
                .label_map
                .insert(attr.label.clone(), template.attrs.len());
            template.attrs.push(TemplateAttribute {
                descriptor: desc,
                attr,
            });
            if ld.remaining() == 0 {
                break;
            }
            if ComponentDescriptor::new(ld.peek_u8()?)?.role() == ComponentRole::Object {
                break;
            }
        }
        Ok(template)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// True when the template is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// The entries in order.
    #[must_use]
    pub fn attrs(&self) -> &[TemplateAttribute] {
        &self.attrs
    }

    /// Ordinal of the entry with the given label.
    #[must_use]
    pub fn index_of(&self, label: &[u8]) -> Option<usize> {
        self.label_map.get(label).copied()
    }
}

/// One object: a name and one attribute slot per template entry.
///
/// A slot is `None` when the attribute is absent for this object.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    /// The object's name, unique within its set and origin.
    pub name: ObjectName,
    attrs: Vec<Option<Attribute>>,
    label_map: HashMap<Vec<u8>, usize>,
}

impl Object {
    fn read(ld: &mut ByteCursor<'_>, template: &Template) -> Result<Self, DecodeError> {
        let desc = ComponentDescriptor::new(ld.read_u8()?)?;
        if desc.role() != ComponentRole::Object {
            return Err(DecodeError::UnexpectedRole {
                descriptor: desc.raw(),
                found: desc.role().name(),
                expected: "object",
            });
        }
        let name = read_obname(ld)?;
        let mut attrs: Vec<Option<Attribute>> = Vec::with_capacity(template.len());
        while attrs.len() < template.len() && ld.remaining() > 0 {
            let entry = &template.attrs[attrs.len()];
            let desc = ComponentDescriptor::new(ld.read_u8()?)?;
            if !desc.is_attribute_group() {
                return Err(DecodeError::UnexpectedRole {
                    descriptor: desc.raw(),
                    found: desc.role().name(),
                    expected: "object attribute",
                });
            }
            match entry.descriptor.role() {
                // Invariant attributes are fixed by the template, value
                // included; the object's descriptor byte is a placeholder.
                ComponentRole::InvariantAttribute => attrs.push(Some(entry.attr.clone())),
                ComponentRole::AbsentAttribute => attrs.push(None),
                _ => {
                    let mut base = entry.attr.clone();
                    base.value = None;
                    attrs.push(Some(read_characteristics(desc, ld, base)?));
                }
            }
            if ld.remaining() > 0
                && ComponentDescriptor::new(ld.peek_u8()?)?.role() == ComponentRole::Object
            {
                break;
            }
        }
        // A truncated object inherits the tail of the template: the
        // characteristics apply, the values are absent.
        while attrs.len() < template.len() {
            let entry = &template.attrs[attrs.len()];
            match entry.descriptor.role() {
                ComponentRole::InvariantAttribute => attrs.push(Some(entry.attr.clone())),
                ComponentRole::AbsentAttribute => attrs.push(None),
                _ => {
                    let mut attr = entry.attr.clone();
                    attr.value = None;
                    attrs.push(Some(attr));
                }
            }
        }
        let mut label_map = HashMap::with_capacity(attrs.len());
        for (index, slot) in attrs.iter().enumerate() {
            let label = slot
                .as_ref()
                .map_or_else(|| template.attrs[index].attr.label.clone(), |a| a.label.clone());
            if label_map.insert(label.clone(), index).is_some() {
                return Err(DecodeError::DuplicateAttributeLabel {
                    label: String::from_utf8_lossy(&label).into_owned(),
                });
            }
        }
        Ok(Self {
            name,
            attrs,
            label_map,
        })
    }

    /// Attribute slots in template order.
    #[must_use]
    pub fn attrs(&self) -> &[Option<Attribute>] {
        &self.attrs
    }

    /// Attribute by template label; `None` for unknown labels and absent
    /// attributes alike.
    #[must_use]
    pub fn attribute(&self, label: &[u8]) -> Option<&Attribute> {
        self.label_map
            .get(label)
            .and_then(|&index| self.attrs[index].as_ref())
    }

    /// Number of attribute slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// True when the object has no attribute slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

/// A fully decoded structured logical record.
#[derive(Debug, Clone, PartialEq)]
pub struct EflrTable {
    /// Logical record type tag of the carrying record.
    pub lr_type: u8,
    /// The set component.
    pub set: SetHeader,
    /// The positional schema.
    pub template: Template,
    objects: Vec<Object>,
    name_map: HashMap<ObjectName, usize>,
}

impl EflrTable {
    /// Decode a sealed structured record.
    ///
    /// `policy` governs duplicate object names and must be chosen by the
    /// caller.
    pub fn parse(
        lr_type: u8,
        ld: &mut ByteCursor<'_>,
        policy: DuplicatePolicy,
    ) -> Result<Self, DecodeError> {
        let desc = ComponentDescriptor::new(ld.read_u8()?)?;
        if !desc.is_set_group() {
            return Err(DecodeError::UnexpectedRole {
                descriptor: desc.raw(),
                found: desc.role().name(),
                expected: "set",
            });
        }
        let set_type = read_ident(ld)?;
        let name = if desc.set_has_name() {
            read_ident(ld)?
        } else {
            Vec::new()
        };
        if codes::is_public(lr_type) && !codes::set_type_allowed(lr_type, &set_type) {
            warn!(
                lr_type,
                set_type = %String::from_utf8_lossy(&set_type),
                "set type not allowable for this logical record type"
            );
        }
        let mut table = Self {
            lr_type,
            set: SetHeader { set_type, name },
            template: Template::default(),
            objects: Vec::new(),
            name_map: HashMap::new(),
        };
        if ld.remaining() == 0 {
            return Ok(table);
        }
        table.template = Template::read(ld)?;
        while ld.remaining() > 0 {
            let object = Object::read(ld, &table.template)?;
            table.add_object(object, policy)?;
        }
        Ok(table)
    }

    fn add_object(&mut self, object: Object, policy: DuplicatePolicy) -> Result<(), DecodeError> {
        match self.name_map.get(&object.name) {
            None => {
                self.name_map.insert(object.name.clone(), self.objects.len());
                self.objects.push(object);
            }
            Some(&index) => match policy {
                DuplicatePolicy::AcceptFirst => {
                    if self.objects[index] == object {
                        debug!(name = %object.name, "ignoring identical duplicate object");
                    } else {
                        warn!(name = %object.name, "ignoring differing duplicate object");
                    }
                }
                DuplicatePolicy::Raise => {
                    return Err(DecodeError::DuplicateObject {
                        set_type: String::from_utf8_lossy(&self.set.set_type).into_owned(),
                        name: object.name.ident_str(),
                    });
                }
                DuplicatePolicy::Replace => {
                    warn!(name = %object.name, "replacing duplicate object");
                    self.objects[index] = object;
                }
            },
        }
        Ok(())
    }

    /// Objects in file order (duplicates excluded per the policy).
    #[must_use]
    pub fn objects(&self) -> &[Object] {
        &self.objects
    }

    /// Object by name.
    #[must_use]
    pub fn object(&self, name: &ObjectName) -> Option<&Object> {
        self.name_map.get(name).map(|&index| &self.objects[index])
    }

    /// Number of objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// True when the set holds no objects.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// (rows, columns): object count by template width.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.objects.len(), self.template.len())
    }
}
