use std::borrow::Cow;

use rustc_hash::FxHashSet as HashSet;
use tracing::debug;

use super::{DescriptionTable, SchemaError, SelectionError};
use crate::tag::Tag;

/// Expected total byte length of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantLength {
	Fixed(usize),
	/// Walked field by field; hooks decide widths and presence.
	Variable,
}

/// One named layout within a [`DescriptionSet`].
#[derive(Debug, Clone)]
pub struct Variant {
	pub name: Cow<'static, str>,
	pub table: DescriptionTable,
	pub length: VariantLength,
}

impl Variant {
	pub fn new(
		name: impl Into<Cow<'static, str>>,
		table: DescriptionTable,
		length: VariantLength,
	) -> Self {
		Self {
			name: name.into(),
			table,
			length,
		}
	}

	pub fn is_variable(&self) -> bool {
		self.length == VariantLength::Variable
	}
}

/// Competing layouts registered under one tag.
#[derive(Debug, Clone)]
pub struct DescriptionSet {
	name: Cow<'static, str>,
	variants: Vec<Variant>,
	default: Option<Cow<'static, str>>,
}

impl DescriptionSet {
	pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
		Self {
			name: name.into(),
			variants: Vec::new(),
			default: None,
		}
	}

	/// One-variant set named after the set itself.
	///
	/// The variant is fixed at the table width unless the table has hooks.
	pub fn single(name: impl Into<Cow<'static, str>>, table: DescriptionTable) -> Self {
		let name = name.into();
		let length = if table.has_hooks() {
			VariantLength::Variable
		} else {
			VariantLength::Fixed(table.fixed_width())
		};
		Self::new(name.clone()).with_variant(name, table, length)
	}

	pub fn with_variant(
		mut self,
		name: impl Into<Cow<'static, str>>,
		table: DescriptionTable,
		length: VariantLength,
	) -> Self {
		self.push(Variant::new(name, table, length));
		self
	}

	/// Names the variant used for blank records.
	pub fn with_default(mut self, name: impl Into<Cow<'static, str>>) -> Self {
		self.default = Some(name.into());
		self
	}

	pub fn push(&mut self, variant: Variant) {
		self.variants.push(variant);
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn variants(&self) -> &[Variant] {
		&self.variants
	}

	pub fn variant(&self, name: &str) -> Option<&Variant> {
		self.variants.iter().find(|v| v.name == name)
	}

	/// The named default, or the first variant.
	pub fn default_variant(&self) -> Option<&Variant> {
		match &self.default {
			Some(name) => self.variant(name),
			None => self.variants.first(),
		}
	}

	/// Checks every structural invariant of the set and its tables.
	pub fn validate(&self) -> Result<(), SchemaError> {
		if self.variants.is_empty() {
			return Err(SchemaError::EmptySet {
				set: self.name.to_string(),
			});
		}

		let mut names = HashSet::default();
		let mut variable: Option<&Variant> = None;
		for (i, variant) in self.variants.iter().enumerate() {
			if !names.insert(variant.name.as_ref()) {
				return Err(SchemaError::DuplicateVariant {
					set: self.name.to_string(),
					variant: variant.name.to_string(),
				});
			}
			variant.table.validate(&variant.name)?;

			match variant.length {
				VariantLength::Variable => {
					if let Some(first) = variable {
						return Err(SchemaError::MultipleVariable {
							first: first.name.to_string(),
							second: variant.name.to_string(),
						});
					}
					variable = Some(variant);
				}
				VariantLength::Fixed(declared) => {
					if let Some(field) = variant.table.iter().find(|f| f.has_hooks()) {
						return Err(SchemaError::HookInFixedVariant {
							variant: variant.name.to_string(),
							field: field.tag.to_string(),
						});
					}
					let actual = variant.table.fixed_width();
					if actual != declared {
						return Err(SchemaError::LengthMismatch {
							variant: variant.name.to_string(),
							declared,
							actual,
						});
					}
					if let Some(first) = self.variants[..i]
						.iter()
						.find(|v| v.length == variant.length)
					{
						return Err(SchemaError::AmbiguousVariants {
							first: first.name.to_string(),
							second: variant.name.to_string(),
							length: declared,
						});
					}
				}
			}
		}

		if let Some(default) = &self.default
			&& self.variant(default).is_none()
		{
			return Err(SchemaError::UnknownDefault {
				set: self.name.to_string(),
				variant: default.to_string(),
			});
		}
		Ok(())
	}

	/// Picks the variant for an instance of `raw_len` bytes.
	///
	/// An exact fixed-length match wins; otherwise the variable-length variant
	/// is used if the set has one. No nearest-fit matching is attempted.
	pub fn select(&self, tag: Tag, raw_len: usize) -> Result<&Variant, SelectionError> {
		let exact = self
			.variants
			.iter()
			.find(|v| v.length == VariantLength::Fixed(raw_len));
		let chosen = exact.or_else(|| self.variants.iter().find(|v| v.is_variable()));

		match chosen {
			Some(variant) => {
				debug!(
					tag = %tag,
					raw_len,
					variant = %variant.name,
					fallback = exact.is_none(),
					"selected variant"
				);
				Ok(variant)
			}
			None => Err(SelectionError::UnknownVariant { tag, raw_len }),
		}
	}
}
