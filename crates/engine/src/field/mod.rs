//! Field descriptors and the per-field codec.
//!
//! A [`FieldDescriptor`] is one row of a description table: character class,
//! byte width, display label, short tag, presence rule, range rule and two
//! optional hooks for variable-length layouts.

use std::borrow::Cow;
use std::fmt;

pub mod codec;
mod map;
mod value;

pub use codec::{decode, encode};
pub use map::FieldMap;
pub use value::{FieldValue, Numeric};

use thiserror::Error;

/// Widest numeric field accepted by table validation. Nineteen digits always
/// fit in a `u64` mantissa.
pub const MAX_NUMERIC_WIDTH: usize = 19;

/// Character class of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
	/// Printable ASCII, left-justified and space padded.
	AlphaText,
	/// Optionally signed ASCII digits, zero padded on the left.
	NumericText,
}

impl fmt::Display for FieldKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::AlphaText => f.write_str("alpha"),
			Self::NumericText => f.write_str("numeric"),
		}
	}
}

/// Whether an all-blank field is acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
	#[default]
	Unconstrained,
	NonBlankRequired,
}

/// Inclusive value bounds for numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Range {
	#[default]
	Unbounded,
	Bounded { min: i64, max: i64 },
}

/// Computes the actual width of a field from the fields decoded before it.
///
/// `None` means the hook cannot decide, which fails the walk.
pub type LengthHook = fn(&FieldMap) -> Option<usize>;

/// Decides whether a field is present from the fields decoded before it.
///
/// `None` means the hook cannot decide, which fails the walk.
pub type CondHook = fn(&FieldMap) -> Option<bool>;

/// Schema for a single field.
#[derive(Debug, Clone)]
pub struct FieldDescriptor {
	pub kind: FieldKind,
	pub width: usize,
	pub label: Cow<'static, str>,
	/// Short identifier, unique within the owning table.
	pub tag: Cow<'static, str>,
	pub presence: Presence,
	pub range: Range,
	pub length_hook: Option<LengthHook>,
	pub cond_hook: Option<CondHook>,
}

impl FieldDescriptor {
	pub const fn alpha(width: usize, label: &'static str, tag: &'static str) -> Self {
		Self::with_kind(FieldKind::AlphaText, width, label, tag)
	}

	pub const fn numeric(width: usize, label: &'static str, tag: &'static str) -> Self {
		Self::with_kind(FieldKind::NumericText, width, label, tag)
	}

	const fn with_kind(
		kind: FieldKind,
		width: usize,
		label: &'static str,
		tag: &'static str,
	) -> Self {
		Self {
			kind,
			width,
			label: Cow::Borrowed(label),
			tag: Cow::Borrowed(tag),
			presence: Presence::Unconstrained,
			range: Range::Unbounded,
			length_hook: None,
			cond_hook: None,
		}
	}

	/// Creates a descriptor with runtime-owned names.
	pub fn new(
		kind: FieldKind,
		width: usize,
		label: impl Into<Cow<'static, str>>,
		tag: impl Into<Cow<'static, str>>,
	) -> Self {
		Self {
			label: label.into(),
			tag: tag.into(),
			..Self::with_kind(kind, width, "", "")
		}
	}

	/// Rejects all-blank values.
	pub fn required(mut self) -> Self {
		self.presence = Presence::NonBlankRequired;
		self
	}

	/// Restricts numeric values to `min..=max`.
	pub fn bounded(mut self, min: i64, max: i64) -> Self {
		self.range = Range::Bounded { min, max };
		self
	}

	pub fn with_length_hook(mut self, hook: LengthHook) -> Self {
		self.length_hook = Some(hook);
		self
	}

	pub fn with_cond_hook(mut self, hook: CondHook) -> Self {
		self.cond_hook = Some(hook);
		self
	}

	/// Returns true if either hook is set.
	pub fn has_hooks(&self) -> bool {
		self.length_hook.is_some() || self.cond_hook.is_some()
	}
}

/// Field-level codec failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	#[error("byte 0x{byte:02x} at position {position} is outside the {kind} character set")]
	CharsetViolation {
		kind: FieldKind,
		byte: u8,
		position: usize,
	},

	#[error("field must not be blank")]
	BlankViolation,

	#[error("value {value} is outside [{min}, {max}]")]
	RangeViolation { value: String, min: i64, max: i64 },

	#[error("value needs {len} bytes but the field is {width} wide")]
	ValueTooLong { len: usize, width: usize },

	#[error("expected a {expected} value")]
	TypeMismatch { expected: FieldKind },

	/// Only reachable with descriptors wider than [`MAX_NUMERIC_WIDTH`], which
	/// table validation rejects.
	#[error("numeric value {digits:?} does not fit in 64 bits")]
	Overflow { digits: String },

	#[error("field needs {needed} bytes but {available} remain")]
	Truncated { needed: usize, available: usize },
}

#[cfg(test)]
mod tests;
