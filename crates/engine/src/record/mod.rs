//! Decoded record instances.

use std::borrow::Cow;

use chrono::NaiveDateTime;

use crate::date::{DateError, DateFormat};
use crate::error::Result;
use crate::field::{FieldKind, FieldMap, FieldValue, Numeric};
use crate::schema::{DescriptionSet, SchemaError, VariantLength};
use crate::tag::Tag;

mod walk;

/// One decoded TRE: the chosen variant and its field values in table order.
///
/// A plain value; equal instances encode to equal bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInstance {
	tag: Tag,
	variant: Cow<'static, str>,
	fields: FieldMap,
	raw_len: usize,
}

impl RecordInstance {
	/// Selects a variant of `set` by length and decodes `bytes` with it.
	pub fn decode(tag: Tag, set: &DescriptionSet, bytes: &[u8]) -> Result<Self> {
		let variant = set.select(tag, bytes.len())?;
		walk::decode_variant(tag, variant, bytes)
	}

	/// Encodes with the variant this instance was decoded from.
	pub fn encode(&self, set: &DescriptionSet) -> Result<Vec<u8>> {
		let variant = set
			.variant(&self.variant)
			.ok_or_else(|| SchemaError::UnknownVariantName {
				tag: self.tag,
				variant: self.variant.to_string(),
			})?;
		walk::encode_variant(self, variant)
	}

	/// A blank record for the set's default variant.
	///
	/// Alpha fields start empty and numeric fields blank, so required fields
	/// must be set before encoding.
	pub fn empty(tag: Tag, set: &DescriptionSet) -> Result<Self> {
		let variant = set.default_variant().ok_or_else(|| SchemaError::EmptySet {
			set: set.name().to_owned(),
		})?;
		let mut fields = FieldMap::with_capacity(variant.table.len());
		for desc in &variant.table {
			let value = match desc.kind {
				FieldKind::AlphaText => FieldValue::Text(String::new()),
				FieldKind::NumericText => FieldValue::Blank,
			};
			fields.insert(desc.tag.clone(), value);
		}
		let raw_len = match variant.length {
			VariantLength::Fixed(n) => n,
			VariantLength::Variable => variant.table.fixed_width(),
		};
		Ok(Self {
			tag,
			variant: variant.name.clone(),
			fields,
			raw_len,
		})
	}

	pub fn tag(&self) -> Tag {
		self.tag
	}

	pub fn variant_name(&self) -> &str {
		&self.variant
	}

	/// Byte length of the input this instance was decoded from.
	pub fn raw_len(&self) -> usize {
		self.raw_len
	}

	pub fn fields(&self) -> &FieldMap {
		&self.fields
	}

	pub fn get(&self, tag: &str) -> Option<&FieldValue> {
		self.fields.get(tag)
	}

	pub fn text(&self, tag: &str) -> Option<&str> {
		self.fields.text(tag)
	}

	pub fn number(&self, tag: &str) -> Option<Numeric> {
		self.get(tag).and_then(FieldValue::as_number)
	}

	pub fn integer(&self, tag: &str) -> Option<i64> {
		self.fields.integer(tag)
	}

	/// Replaces a field value; returns the previous one.
	///
	/// Unknown tags are accepted here and rejected by `encode`.
	pub fn set(&mut self, tag: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
		self.fields.insert(tag.to_owned(), value.into())
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.fields.iter()
	}

	/// Parses a text field as a date.
	pub fn date(&self, tag: &str, format: &DateFormat) -> Result<NaiveDateTime> {
		let text = self.text(tag).ok_or_else(|| DateError::NotText {
			field: tag.to_owned(),
		})?;
		Ok(format.parse(text)?)
	}

	pub fn set_date(&mut self, tag: &str, value: &NaiveDateTime, format: &DateFormat) -> Result<()> {
		let text = format.format(value)?;
		self.set(tag, text);
		Ok(())
	}
}
