//! Tags compiled into the engine.
//!
//! Each module submits a [`BuiltinPlugin`](crate::BuiltinPlugin); they are
//! registered by [`Registry::with_builtins`](crate::Registry::with_builtins).

use crate::field::FieldDescriptor;
use crate::schema::DescriptionTable;

pub mod acfta;
pub mod piaeqa;
pub mod sensra;

const fn alpha(width: usize, label: &'static str, tag: &'static str) -> FieldDescriptor {
	FieldDescriptor::alpha(width, label, tag)
}

const fn numeric(width: usize, label: &'static str, tag: &'static str) -> FieldDescriptor {
	FieldDescriptor::numeric(width, label, tag)
}

fn table(fields: &[FieldDescriptor]) -> DescriptionTable {
	fields.iter().cloned().collect()
}
