//! Description tables, description sets and variant selection.
//!
//! # Invariants
//!
//! Checked by [`DescriptionSet::validate`] before a set can be registered:
//!
//! - Every table is non-empty, field widths are positive and field tags are
//!   unique within their table.
//! - Numeric fields are at most [`MAX_NUMERIC_WIDTH`](crate::field::MAX_NUMERIC_WIDTH)
//!   bytes wide, so their digits always fit the 64-bit mantissa.
//! - Fixed-length variants carry no hooks and their widths sum to the
//!   declared length.
//! - Fixed lengths are pairwise distinct and at most one variant is
//!   variable-length.

mod set;
mod table;

pub use set::{DescriptionSet, Variant, VariantLength};
pub use table::DescriptionTable;

use thiserror::Error;

use crate::tag::Tag;

/// Schema construction and schema-driven walk failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
	#[error("tag {0} is already registered")]
	DuplicateTag(Tag),

	#[error("description set {set:?} has no variants")]
	EmptySet { set: String },

	#[error("variant {variant:?} has no fields")]
	EmptyTable { variant: String },

	#[error("variant {variant:?}: field {field:?} has zero width")]
	ZeroWidth { variant: String, field: String },

	#[error("variant {variant:?}: field {field:?} is declared twice")]
	DuplicateField { variant: String, field: String },

	#[error("description set {set:?}: variant {variant:?} is declared twice")]
	DuplicateVariant { set: String, variant: String },

	#[error("variant {variant:?}: field {field:?} has range [{min}, {max}]")]
	InvalidRange {
		variant: String,
		field: String,
		min: i64,
		max: i64,
	},

	#[error("variant {variant:?}: numeric field {field:?} is {width} bytes wide, above 19")]
	NumericTooWide {
		variant: String,
		field: String,
		width: usize,
	},

	#[error("variants {first:?} and {second:?} both declare {length} bytes")]
	AmbiguousVariants {
		first: String,
		second: String,
		length: usize,
	},

	#[error("variants {first:?} and {second:?} are both variable-length")]
	MultipleVariable { first: String, second: String },

	#[error("variant {variant:?} declares {declared} bytes but its fields sum to {actual}")]
	LengthMismatch {
		variant: String,
		declared: usize,
		actual: usize,
	},

	#[error("fixed-length variant {variant:?}: field {field:?} has a length or condition hook")]
	HookInFixedVariant { variant: String, field: String },

	#[error("description set {set:?} has no default variant {variant:?}")]
	UnknownDefault { set: String, variant: String },

	#[error("hook on field {field:?} at offset {offset} could not be resolved")]
	UnresolvedHook { field: String, offset: usize },

	#[error("record has no value for field {field:?}")]
	MissingField { field: String },

	#[error("field {field:?} holds a value but its condition marks it absent")]
	ConditionalFieldPresent { field: String },

	#[error("variant {variant:?} has no field {field:?}")]
	UnknownField { variant: String, field: String },

	#[error("tag {tag} has no variant named {variant:?}")]
	UnknownVariantName { tag: Tag, variant: String },
}

/// Variant selection failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
	#[error("no variant of {tag} matches {raw_len} bytes")]
	UnknownVariant { tag: Tag, raw_len: usize },
}

#[cfg(test)]
mod tests;
