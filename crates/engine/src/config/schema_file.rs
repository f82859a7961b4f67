//! Description sets declared in TOML.
//!
//! ```toml
//! tag = "PIAEQA"
//!
//! [[variants]]
//! name = "PIAEQA"
//! length = 130
//!
//! [[variants.fields]]
//! tag = "EQPCODE"
//! label = "Equipment Code"
//! kind = "alpha"
//! width = 7
//! ```
//!
//! Omitting `length` declares a variable-length variant. Hooks cannot be
//! expressed in files.

use std::path::Path;

use serde::Deserialize;

use super::{ConfigError, read};
use crate::field::{FieldDescriptor, FieldKind};
use crate::schema::{DescriptionSet, DescriptionTable, VariantLength};
use crate::tag::{Tag, TagError};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
	pub tag: String,
	/// Set name; defaults to the tag.
	#[serde(default)]
	pub name: Option<String>,
	/// Variant used for blank records; defaults to the first.
	#[serde(default)]
	pub default: Option<String>,
	pub variants: Vec<VariantSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantSpec {
	pub name: String,
	#[serde(default)]
	pub length: Option<usize>,
	pub fields: Vec<FieldSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldSpec {
	pub tag: String,
	#[serde(default)]
	pub label: Option<String>,
	pub kind: SchemaFieldKind,
	pub width: usize,
	#[serde(default)]
	pub required: bool,
	/// Inclusive `[min, max]`.
	#[serde(default)]
	pub range: Option<[i64; 2]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaFieldKind {
	Alpha,
	Numeric,
}

impl From<SchemaFieldKind> for FieldKind {
	fn from(kind: SchemaFieldKind) -> Self {
		match kind {
			SchemaFieldKind::Alpha => Self::AlphaText,
			SchemaFieldKind::Numeric => Self::NumericText,
		}
	}
}

impl SchemaFile {
	pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
		toml::from_str(text)
	}

	/// Reads, parses and validates a schema file.
	pub fn load(path: impl AsRef<Path>) -> Result<(Tag, DescriptionSet), ConfigError> {
		let path = path.as_ref();
		let file = Self::parse(&read(path)?).map_err(|source| ConfigError::Toml {
			path: path.to_owned(),
			source,
		})?;
		let tag = file.tag().map_err(|source| ConfigError::Tag {
			path: path.to_owned(),
			source,
		})?;
		let set = file.to_set();
		set.validate().map_err(|source| ConfigError::Schema {
			path: path.to_owned(),
			source,
		})?;
		Ok((tag, set))
	}

	pub fn tag(&self) -> Result<Tag, TagError> {
		Tag::new(&self.tag)
	}

	/// Builds the described set without validating it.
	pub fn to_set(&self) -> DescriptionSet {
		let name = self.name.clone().unwrap_or_else(|| self.tag.clone());
		let mut set = DescriptionSet::new(name);
		for variant in &self.variants {
			let table: DescriptionTable = variant.fields.iter().map(FieldSpec::to_descriptor).collect();
			let length = variant
				.length
				.map_or(VariantLength::Variable, VariantLength::Fixed);
			set = set.with_variant(variant.name.clone(), table, length);
		}
		if let Some(default) = &self.default {
			set = set.with_default(default.clone());
		}
		set
	}
}

impl FieldSpec {
	fn to_descriptor(&self) -> FieldDescriptor {
		let label = self.label.clone().unwrap_or_else(|| self.tag.clone());
		let mut desc = FieldDescriptor::new(self.kind.into(), self.width, label, self.tag.clone());
		if self.required {
			desc = desc.required();
		}
		if let Some([min, max]) = self.range {
			desc = desc.bounded(min, max);
		}
		desc
	}
}
