use rustc_hash::FxHashSet as HashSet;

use super::SchemaError;
use crate::field::{FieldDescriptor, FieldKind, MAX_NUMERIC_WIDTH, Range};

/// Ordered field descriptors for one concrete layout.
#[derive(Debug, Clone, Default)]
pub struct DescriptionTable {
	fields: Vec<FieldDescriptor>,
}

impl DescriptionTable {
	pub fn new(fields: Vec<FieldDescriptor>) -> Self {
		Self { fields }
	}

	pub fn fields(&self) -> &[FieldDescriptor] {
		&self.fields
	}

	pub fn iter(&self) -> std::slice::Iter<'_, FieldDescriptor> {
		self.fields.iter()
	}

	pub fn len(&self) -> usize {
		self.fields.len()
	}

	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	pub fn field(&self, tag: &str) -> Option<&FieldDescriptor> {
		self.fields.iter().find(|f| f.tag == tag)
	}

	/// Sum of the static widths.
	pub fn fixed_width(&self) -> usize {
		self.fields.iter().map(|f| f.width).sum()
	}

	pub fn has_hooks(&self) -> bool {
		self.fields.iter().any(FieldDescriptor::has_hooks)
	}

	/// Checks per-field invariants. `variant` names the table in errors.
	pub(crate) fn validate(&self, variant: &str) -> Result<(), SchemaError> {
		if self.fields.is_empty() {
			return Err(SchemaError::EmptyTable {
				variant: variant.to_owned(),
			});
		}

		let mut seen = HashSet::default();
		for field in &self.fields {
			// Hooked fields may resolve to zero width at walk time.
			if field.width == 0 && field.length_hook.is_none() {
				return Err(SchemaError::ZeroWidth {
					variant: variant.to_owned(),
					field: field.tag.to_string(),
				});
			}
			if field.kind == FieldKind::NumericText && field.width > MAX_NUMERIC_WIDTH {
				return Err(SchemaError::NumericTooWide {
					variant: variant.to_owned(),
					field: field.tag.to_string(),
					width: field.width,
				});
			}
			if let Range::Bounded { min, max } = field.range
				&& min > max
			{
				return Err(SchemaError::InvalidRange {
					variant: variant.to_owned(),
					field: field.tag.to_string(),
					min,
					max,
				});
			}
			if !seen.insert(field.tag.as_ref()) {
				return Err(SchemaError::DuplicateField {
					variant: variant.to_owned(),
					field: field.tag.to_string(),
				});
			}
		}
		Ok(())
	}
}

impl FromIterator<FieldDescriptor> for DescriptionTable {
	fn from_iter<I: IntoIterator<Item = FieldDescriptor>>(iter: I) -> Self {
		Self::new(iter.into_iter().collect())
	}
}

impl<'a> IntoIterator for &'a DescriptionTable {
	type Item = &'a FieldDescriptor;
	type IntoIter = std::slice::Iter<'a, FieldDescriptor>;

	fn into_iter(self) -> Self::IntoIter {
		self.fields.iter()
	}
}
