//! Decoding of structured (explicitly formatted) logical records and the
//! headers of unstructured ones.
//!
//! A structured record is a table: a set component names it, a template
//! defines the columns (attributes), and each object is a row. Attribute
//! characteristics omitted by an object come from the template; the value
//! itself is never inherited.

pub mod codes;
pub mod component;
pub mod eflr;
pub mod iflr;

pub use component::{ComponentDescriptor, ComponentRole};
pub use eflr::{Attribute, DuplicatePolicy, EflrTable, Object, SetHeader, Template, TemplateAttribute};
pub use iflr::IflrHeader;
