//! Per-field encode and decode.
//!
//! Pure functions over caller-owned buffers; no knowledge of other fields.

use std::cmp::Ordering;

use super::value::MAX_SCALE;
use super::{FieldDescriptor, FieldError, FieldKind, FieldValue, Numeric, Presence, Range};

const PAD: u8 = b' ';

/// Decodes the field at `offset` using the descriptor's static width.
pub fn decode(
	buf: &[u8],
	offset: usize,
	desc: &FieldDescriptor,
) -> Result<FieldValue, FieldError> {
	let available = buf.len().saturating_sub(offset);
	if available < desc.width {
		return Err(FieldError::Truncated {
			needed: desc.width,
			available,
		});
	}
	decode_span(&buf[offset..offset + desc.width], desc)
}

/// Encodes a value to exactly `desc.width` bytes.
pub fn encode(value: &FieldValue, desc: &FieldDescriptor) -> Result<Vec<u8>, FieldError> {
	let mut out = Vec::with_capacity(desc.width);
	encode_into(value, desc, desc.width, &mut out)?;
	Ok(out)
}

/// Decodes a span whose width has already been resolved.
pub(crate) fn decode_span(span: &[u8], desc: &FieldDescriptor) -> Result<FieldValue, FieldError> {
	match desc.kind {
		FieldKind::AlphaText => decode_alpha(span, desc.presence),
		FieldKind::NumericText => decode_numeric(span, desc),
	}
}

/// Appends exactly `width` bytes for `value` to `out`.
pub(crate) fn encode_into(
	value: &FieldValue,
	desc: &FieldDescriptor,
	width: usize,
	out: &mut Vec<u8>,
) -> Result<(), FieldError> {
	match (desc.kind, value) {
		(FieldKind::AlphaText, FieldValue::Text(s)) => {
			encode_alpha(s.as_bytes(), desc.presence, width, out)
		}
		(FieldKind::AlphaText, FieldValue::Blank) => encode_alpha(b"", desc.presence, width, out),
		(FieldKind::NumericText, FieldValue::Number(n)) => encode_numeric(n, desc, width, out),
		(FieldKind::NumericText, FieldValue::Blank) => {
			if desc.presence == Presence::NonBlankRequired {
				return Err(FieldError::BlankViolation);
			}
			out.resize(out.len() + width, PAD);
			Ok(())
		}
		(expected, _) => Err(FieldError::TypeMismatch { expected }),
	}
}

/// Strips trailing pad characters.
pub(crate) fn trim_pad(raw: &[u8]) -> &[u8] {
	let end = raw.iter().rposition(|&b| b != PAD).map_or(0, |i| i + 1);
	&raw[..end]
}

fn decode_alpha(span: &[u8], presence: Presence) -> Result<FieldValue, FieldError> {
	check_printable(span)?;
	let text = trim_pad(span);
	if text.is_empty() && presence == Presence::NonBlankRequired {
		return Err(FieldError::BlankViolation);
	}
	Ok(FieldValue::Text(String::from_utf8_lossy(text).into_owned()))
}

fn encode_alpha(
	text: &[u8],
	presence: Presence,
	width: usize,
	out: &mut Vec<u8>,
) -> Result<(), FieldError> {
	check_printable(text)?;
	let text = trim_pad(text);
	if text.len() > width {
		return Err(FieldError::ValueTooLong {
			len: text.len(),
			width,
		});
	}
	if text.is_empty() && presence == Presence::NonBlankRequired {
		return Err(FieldError::BlankViolation);
	}
	out.extend_from_slice(text);
	out.resize(out.len() + width - text.len(), PAD);
	Ok(())
}

fn check_printable(bytes: &[u8]) -> Result<(), FieldError> {
	match bytes.iter().position(|b| !(0x20..=0x7e).contains(b)) {
		Some(position) => Err(FieldError::CharsetViolation {
			kind: FieldKind::AlphaText,
			byte: bytes[position],
			position,
		}),
		None => Ok(()),
	}
}

fn decode_numeric(span: &[u8], desc: &FieldDescriptor) -> Result<FieldValue, FieldError> {
	if span.iter().all(|&b| b == PAD) {
		return match desc.presence {
			Presence::NonBlankRequired => Err(FieldError::BlankViolation),
			Presence::Unconstrained => Ok(FieldValue::Blank),
		};
	}
	let n = parse_numeric(span)?;
	check_range(&n, desc.range)?;
	Ok(FieldValue::Number(n))
}

/// Parses `[+-]digits[.digits]`. A trailing decimal point is rejected so the
/// text re-encodes unchanged.
fn parse_numeric(span: &[u8]) -> Result<Numeric, FieldError> {
	let charset = |position: usize| FieldError::CharsetViolation {
		kind: FieldKind::NumericText,
		byte: span[position],
		position,
	};
	let overflow = || FieldError::Overflow {
		digits: String::from_utf8_lossy(span).into_owned(),
	};

	let (negative, signed, start) = match span.first() {
		Some(b'-') => (true, true, 1),
		Some(b'+') => (false, true, 1),
		_ => (false, false, 0),
	};

	let mut magnitude: u64 = 0;
	let mut scale: u8 = 0;
	let mut point = false;
	let mut digits = 0usize;
	for (i, &b) in span.iter().enumerate().skip(start) {
		match b {
			b'0'..=b'9' => {
				magnitude = magnitude
					.checked_mul(10)
					.and_then(|m| m.checked_add(u64::from(b - b'0')))
					.ok_or_else(overflow)?;
				digits += 1;
				if point {
					scale += 1;
					if scale > MAX_SCALE {
						return Err(overflow());
					}
				}
			}
			b'.' if !point && i + 1 < span.len() => point = true,
			_ => return Err(charset(i)),
		}
	}
	if digits == 0 {
		return Err(charset(span.len() - 1));
	}
	Ok(Numeric::from_parts(magnitude, scale, negative, signed))
}

fn check_range(n: &Numeric, range: Range) -> Result<(), FieldError> {
	if let Range::Bounded { min, max } = range
		&& (n.cmp_integer(min) == Ordering::Less || n.cmp_integer(max) == Ordering::Greater)
	{
		return Err(FieldError::RangeViolation {
			value: n.to_string(),
			min,
			max,
		});
	}
	Ok(())
}

fn encode_numeric(
	n: &Numeric,
	desc: &FieldDescriptor,
	width: usize,
	out: &mut Vec<u8>,
) -> Result<(), FieldError> {
	check_range(n, desc.range)?;

	let sign = n.has_sign();
	let avail = width.saturating_sub(usize::from(sign));
	let mut body = n.digits();
	// ".5" decodes to 0.5; drop the leading zero again when it does not fit.
	if body.len() > avail && body.starts_with("0.") {
		body.remove(0);
	}

	let needed = body.len() + usize::from(sign);
	if needed > width {
		return Err(FieldError::ValueTooLong { len: needed, width });
	}
	if sign {
		out.push(if n.is_negative() { b'-' } else { b'+' });
	}
	out.resize(out.len() + avail - body.len(), b'0');
	out.extend_from_slice(body.as_bytes());
	Ok(())
}
