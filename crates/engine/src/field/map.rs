use std::borrow::Cow;

use indexmap::IndexMap;

use super::FieldValue;

/// Field values keyed by field tag, in table order.
///
/// Length and condition hooks receive the map as decoded so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap {
	inner: IndexMap<Cow<'static, str>, FieldValue>,
}

impl FieldMap {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_capacity(n: usize) -> Self {
		Self {
			inner: IndexMap::with_capacity(n),
		}
	}

	pub fn get(&self, tag: &str) -> Option<&FieldValue> {
		self.inner.get(tag)
	}

	/// Text of an alpha field.
	pub fn text(&self, tag: &str) -> Option<&str> {
		self.get(tag).and_then(FieldValue::as_text)
	}

	/// Integer value of a numeric field.
	pub fn integer(&self, tag: &str) -> Option<i64> {
		self.get(tag).and_then(FieldValue::as_i64)
	}

	pub fn contains(&self, tag: &str) -> bool {
		self.inner.contains_key(tag)
	}

	/// Inserts or replaces a value, keeping the original position on replace.
	pub fn insert(
		&mut self,
		tag: impl Into<Cow<'static, str>>,
		value: FieldValue,
	) -> Option<FieldValue> {
		self.inner.insert(tag.into(), value)
	}

	pub fn len(&self) -> usize {
		self.inner.len()
	}

	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
		self.inner.iter().map(|(k, v)| (&**k, v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.inner.keys().map(|k| &**k)
	}
}

impl<'a> IntoIterator for &'a FieldMap {
	type Item = (&'a Cow<'static, str>, &'a FieldValue);
	type IntoIter = indexmap::map::Iter<'a, Cow<'static, str>, FieldValue>;

	fn into_iter(self) -> Self::IntoIter {
		self.inner.iter()
	}
}
