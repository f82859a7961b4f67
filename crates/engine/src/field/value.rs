use std::cmp::Ordering;
use std::fmt;

/// Decoded logical value of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
	/// Alpha text with trailing pad removed.
	Text(String),
	/// Parsed numeric text.
	Number(Numeric),
	/// A numeric field filled entirely with spaces.
	Blank,
}

impl FieldValue {
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Self::Text(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_number(&self) -> Option<Numeric> {
		match self {
			Self::Number(n) => Some(*n),
			_ => None,
		}
	}

	/// Integer value of a numeric field without a fractional part.
	pub fn as_i64(&self) -> Option<i64> {
		self.as_number().and_then(|n| n.as_i64())
	}

	pub fn is_blank(&self) -> bool {
		match self {
			Self::Blank => true,
			Self::Text(s) => s.trim_start().is_empty(),
			Self::Number(_) => false,
		}
	}
}

impl From<&str> for FieldValue {
	fn from(s: &str) -> Self {
		Self::Text(s.to_owned())
	}
}

impl From<String> for FieldValue {
	fn from(s: String) -> Self {
		Self::Text(s)
	}
}

impl From<i64> for FieldValue {
	fn from(v: i64) -> Self {
		Self::Number(Numeric::from_i64(v))
	}
}

impl From<Numeric> for FieldValue {
	fn from(n: Numeric) -> Self {
		Self::Number(n)
	}
}

impl fmt::Display for FieldValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Text(s) => f.write_str(s),
			Self::Number(n) => n.fmt(f),
			Self::Blank => Ok(()),
		}
	}
}

/// Fixed-point decimal as read from numeric text.
///
/// Keeps the scale and whether the wire form carried a sign character, so an
/// unmodified value re-encodes to the same bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Numeric {
	magnitude: u64,
	scale: u8,
	negative: bool,
	signed: bool,
}

/// Largest supported number of fractional digits.
pub(crate) const MAX_SCALE: u8 = 18;

impl Numeric {
	pub const fn from_i64(v: i64) -> Self {
		Self {
			magnitude: v.unsigned_abs(),
			scale: 0,
			negative: v < 0,
			signed: v < 0,
		}
	}

	/// `mantissa * 10^-scale`. Scales above 18 are clamped.
	pub const fn decimal(mantissa: i64, scale: u8) -> Self {
		Self {
			magnitude: mantissa.unsigned_abs(),
			scale: if scale > MAX_SCALE { MAX_SCALE } else { scale },
			negative: mantissa < 0,
			signed: mantissa < 0,
		}
	}

	pub(crate) const fn from_parts(magnitude: u64, scale: u8, negative: bool, signed: bool) -> Self {
		Self {
			magnitude,
			scale,
			negative,
			signed,
		}
	}

	/// Forces a leading sign character (`+` or `-`) when encoded.
	pub const fn with_sign(mut self) -> Self {
		self.signed = true;
		self
	}

	pub const fn scale(&self) -> u8 {
		self.scale
	}

	pub const fn is_negative(&self) -> bool {
		self.negative
	}

	/// True if the encoded form carries a sign character.
	pub const fn has_sign(&self) -> bool {
		self.signed || self.negative
	}

	/// Signed mantissa, `None` if it exceeds `i64`.
	pub fn mantissa(&self) -> Option<i64> {
		let m = i64::try_from(self.magnitude).ok()?;
		Some(if self.negative { -m } else { m })
	}

	/// Integer value when the scale is zero.
	pub fn as_i64(&self) -> Option<i64> {
		if self.scale == 0 { self.mantissa() } else { None }
	}

	pub fn as_f64(&self) -> f64 {
		let v = self.magnitude as f64 / 10f64.powi(i32::from(self.scale));
		if self.negative { -v } else { v }
	}

	/// Compares against an integer bound without floating point.
	pub(crate) fn cmp_integer(&self, bound: i64) -> Ordering {
		let mut lhs = i128::from(self.magnitude);
		if self.negative {
			lhs = -lhs;
		}
		let rhs = i128::from(bound) * 10i128.pow(u32::from(self.scale));
		lhs.cmp(&rhs)
	}

	/// Unsigned digits with the decimal point, without padding.
	pub(crate) fn digits(&self) -> String {
		if self.scale == 0 {
			return self.magnitude.to_string();
		}
		let scale = usize::from(self.scale);
		let raw = format!("{:0>width$}", self.magnitude, width = scale + 1);
		let (int, frac) = raw.split_at(raw.len() - scale);
		format!("{int}.{frac}")
	}
}

impl From<i64> for Numeric {
	fn from(v: i64) -> Self {
		Self::from_i64(v)
	}
}

impl fmt::Display for Numeric {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.negative {
			f.write_str("-")?;
		}
		f.write_str(&self.digits())
	}
}
