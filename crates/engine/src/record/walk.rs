//! Table walks for decode and encode.

use super::RecordInstance;
use crate::error::{Error, Result};
use crate::field::codec::{decode_span, encode_into};
use crate::field::{FieldDescriptor, FieldMap};
use crate::schema::{SchemaError, Variant, VariantLength};
use crate::tag::Tag;

/// Width of `desc` at this point of the walk, or `None` if the field is absent.
fn resolve_layout(
	desc: &FieldDescriptor,
	fields: &FieldMap,
	offset: usize,
) -> std::result::Result<Option<usize>, SchemaError> {
	let unresolved = || SchemaError::UnresolvedHook {
		field: desc.tag.to_string(),
		offset,
	};
	if let Some(cond) = desc.cond_hook {
		match cond(fields) {
			Some(true) => {}
			Some(false) => return Ok(None),
			None => return Err(unresolved()),
		}
	}
	match desc.length_hook {
		Some(hook) => hook(fields).map(Some).ok_or_else(unresolved),
		None => Ok(Some(desc.width)),
	}
}

pub(super) fn decode_variant(tag: Tag, variant: &Variant, bytes: &[u8]) -> Result<RecordInstance> {
	let mut fields = FieldMap::with_capacity(variant.table.len());
	let mut offset = 0;

	for desc in &variant.table {
		let Some(width) = resolve_layout(desc, &fields, offset)? else {
			continue;
		};
		let end = offset.checked_add(width).ok_or_else(|| SchemaError::UnresolvedHook {
			field: desc.tag.to_string(),
			offset,
		})?;
		if end > bytes.len() {
			return Err(Error::Format {
				expected: end,
				actual: bytes.len(),
			});
		}
		let value = decode_span(&bytes[offset..end], desc).map_err(|source| Error::Field {
			field: desc.tag.to_string(),
			offset,
			source,
		})?;
		fields.insert(desc.tag.clone(), value);
		offset = end;
	}

	if offset != bytes.len() {
		return Err(Error::Format {
			expected: offset,
			actual: bytes.len(),
		});
	}
	Ok(RecordInstance {
		tag,
		variant: variant.name.clone(),
		fields,
		raw_len: bytes.len(),
	})
}

/// Hooks see the full instance map; they only consult fields preceding their own.
pub(super) fn encode_variant(instance: &RecordInstance, variant: &Variant) -> Result<Vec<u8>> {
	if let Some(extra) = instance
		.fields
		.keys()
		.find(|tag| variant.table.field(tag).is_none())
	{
		return Err(SchemaError::UnknownField {
			variant: variant.name.to_string(),
			field: extra.to_owned(),
		}
		.into());
	}

	let capacity = match variant.length {
		VariantLength::Fixed(n) => n,
		VariantLength::Variable => instance.raw_len,
	};
	let mut out = Vec::with_capacity(capacity);

	for desc in &variant.table {
		let offset = out.len();
		let Some(width) = resolve_layout(desc, &instance.fields, offset)? else {
			if instance.fields.get(&desc.tag).is_some_and(|v| !v.is_blank()) {
				return Err(SchemaError::ConditionalFieldPresent {
					field: desc.tag.to_string(),
				}
				.into());
			}
			continue;
		};
		let value = instance
			.fields
			.get(&desc.tag)
			.ok_or_else(|| SchemaError::MissingField {
				field: desc.tag.to_string(),
			})?;
		encode_into(value, desc, width, &mut out).map_err(|source| Error::Field {
			field: desc.tag.to_string(),
			offset,
			source,
		})?;
	}

	if let VariantLength::Fixed(expected) = variant.length
		&& out.len() != expected
	{
		return Err(Error::Format {
			expected,
			actual: out.len(),
		});
	}
	Ok(out)
}
