//! Fixed-width TRE identifiers.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::field::codec::trim_pad;

/// Width of a tag on the wire.
pub const TAG_LEN: usize = 6;

/// A TRE tag: up to six printable ASCII characters, right-padded with spaces.
///
/// `"ACFTA"` and `"ACFTA "` name the same tag.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; TAG_LEN]);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
	#[error("tag is empty")]
	Empty,
	#[error("tag {0:?} is longer than 6 characters")]
	TooLong(String),
	#[error("tag {tag:?} contains invalid byte 0x{byte:02x}")]
	InvalidByte { tag: String, byte: u8 },
}

impl Tag {
	/// Parses a tag from its logical name.
	pub fn new(name: &str) -> Result<Self, TagError> {
		Self::from_bytes(name.as_bytes())
	}

	/// Parses a tag from raw wire bytes, accepting trailing pad.
	pub fn from_bytes(raw: &[u8]) -> Result<Self, TagError> {
		let trimmed = trim_pad(raw);
		if trimmed.is_empty() {
			return Err(TagError::Empty);
		}
		if trimmed.len() > TAG_LEN {
			return Err(TagError::TooLong(String::from_utf8_lossy(raw).into_owned()));
		}
		if let Some(&byte) = trimmed.iter().find(|b| !b.is_ascii_graphic()) {
			return Err(TagError::InvalidByte {
				tag: String::from_utf8_lossy(raw).into_owned(),
				byte,
			});
		}

		let mut buf = [b' '; TAG_LEN];
		buf[..trimmed.len()].copy_from_slice(trimmed);
		Ok(Self(buf))
	}

	/// Space-padded wire form.
	pub fn as_bytes(&self) -> &[u8; TAG_LEN] {
		&self.0
	}

	/// Logical name without trailing pad.
	pub fn as_str(&self) -> &str {
		// Construction only admits ASCII graphic bytes and spaces.
		std::str::from_utf8(trim_pad(&self.0)).unwrap_or_default()
	}
}

impl FromStr for Tag {
	type Err = TagError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::new(s)
	}
}

impl TryFrom<&str> for Tag {
	type Error = TagError;

	fn try_from(s: &str) -> Result<Self, Self::Error> {
		Self::new(s)
	}
}

impl fmt::Display for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl fmt::Debug for Tag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Tag({:?})", self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn pads_short_names() {
		let tag = Tag::new("ACFTA").unwrap();
		assert_eq!(tag.as_bytes(), b"ACFTA ");
		assert_eq!(tag.as_str(), "ACFTA");
		assert_eq!(tag, Tag::from_bytes(b"ACFTA ").unwrap());
	}

	#[test]
	fn rejects_malformed_names() {
		assert_eq!(Tag::new("   "), Err(TagError::Empty));
		assert!(matches!(Tag::new("SENSRAX"), Err(TagError::TooLong(_))));
		assert!(matches!(
			Tag::new("AB\tC"),
			Err(TagError::InvalidByte { byte: b'\t', .. })
		));
		assert!(matches!(
			Tag::new("AB C"),
			Err(TagError::InvalidByte { byte: b' ', .. })
		));
	}
}
