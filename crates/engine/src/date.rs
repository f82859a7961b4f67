//! Date/time text for date-valued alpha fields.
//!
//! Patterns use `strftime` syntax plus one extension: `%.<n>S` prints the
//! seconds followed by exactly `n` fractional digits (truncated, zero padded),
//! e.g. `%Y%m%d%H%M%.3S` formats as `20240131235959.125`. The digit count is
//! fixed so formatted text always fills the same field width.
//!
//! When parsing, every seconds token accepts an optional `.fraction`, so
//! `%S` reads both `59` and `59.25`.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
	#[error("invalid date pattern {pattern:?}")]
	Pattern { pattern: String },

	#[error("{text:?} does not match pattern {pattern:?}: {source}")]
	Parse {
		text: String,
		pattern: String,
		#[source]
		source: chrono::ParseError,
	},

	#[error("failed to format date with pattern {pattern:?}")]
	Format { pattern: String },

	#[error("field {field:?} does not hold text")]
	NotText { field: String },
}

/// A validated date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormat {
	pattern: String,
	/// Chrono parse pattern: `%.<n>S` becomes `%S`, and every `%S` takes an
	/// optional fraction.
	parse_pattern: String,
	seconds: Option<FractionalSeconds>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FractionalSeconds {
	prefix: String,
	suffix: String,
	digits: usize,
}

impl DateFormat {
	pub fn new(pattern: impl Into<String>) -> Result<Self, DateError> {
		let pattern = pattern.into();
		let seconds = split_fractional(&pattern);
		let parse_pattern = match &seconds {
			Some(s) => optional_fraction(&format!("{}%S{}", s.prefix, s.suffix)),
			None => optional_fraction(&pattern),
		};

		if StrftimeItems::new(&parse_pattern).any(|item| matches!(item, Item::Error)) {
			return Err(DateError::Pattern { pattern });
		}
		Ok(Self {
			pattern,
			parse_pattern,
			seconds,
		})
	}

	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Parses `text`; date-only patterns yield midnight.
	pub fn parse(&self, text: &str) -> Result<NaiveDateTime, DateError> {
		NaiveDateTime::parse_from_str(text, &self.parse_pattern)
			.or_else(|err| match NaiveDate::parse_from_str(text, &self.parse_pattern) {
				Ok(date) => Ok(date.and_time(chrono::NaiveTime::MIN)),
				Err(_) => Err(err),
			})
			.map_err(|source| DateError::Parse {
				text: text.to_owned(),
				pattern: self.pattern.clone(),
				source,
			})
	}

	pub fn format(&self, value: &NaiveDateTime) -> Result<String, DateError> {
		let mut out = String::new();
		let result = match &self.seconds {
			None => write!(out, "{}", value.format(&self.pattern)),
			Some(s) => write_fractional(&mut out, value, s),
		};
		result.map_err(|_| DateError::Format {
			pattern: self.pattern.clone(),
		})?;
		Ok(out)
	}
}

/// Finds the first `%.<n>S` token.
fn split_fractional(pattern: &str) -> Option<FractionalSeconds> {
	let mut search = 0;
	while let Some(found) = pattern[search..].find("%.") {
		let start = search + found;
		let rest = &pattern[start + 2..];
		let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
		if digits_len > 0 && rest[digits_len..].starts_with('S') {
			let digits = rest[..digits_len].parse().ok()?;
			return Some(FractionalSeconds {
				prefix: pattern[..start].to_owned(),
				suffix: rest[digits_len + 1..].to_owned(),
				digits,
			});
		}
		search = start + 2;
	}
	None
}

/// Follows each `%S` with `%.f`, which chrono treats as optional when parsing.
fn optional_fraction(pattern: &str) -> String {
	let mut out = String::with_capacity(pattern.len() + 4);
	let mut chars = pattern.chars();
	while let Some(c) = chars.next() {
		out.push(c);
		if c != '%' {
			continue;
		}
		match chars.next() {
			Some('S') => out.push_str("S%.f"),
			Some(next) => out.push(next),
			None => {}
		}
	}
	out
}

fn write_fractional(
	out: &mut String,
	value: &NaiveDateTime,
	s: &FractionalSeconds,
) -> std::fmt::Result {
	write!(out, "{}{:02}", value.format(&s.prefix), value.second())?;
	if s.digits > 0 {
		// Leap-second nanos exceed 1e9; keep only the sub-second part.
		let nanos = format!("{:09}", value.nanosecond() % 1_000_000_000);
		let kept = &nanos[..s.digits.min(9)];
		write!(out, ".{kept:0<width$}", width = s.digits)?;
	}
	write!(out, "{}", value.format(&s.suffix))
}
