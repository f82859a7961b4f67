//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::date::DateError;
use crate::field::FieldError;
use crate::plugin::PluginError;
use crate::schema::{SchemaError, SelectionError};
use crate::tag::{Tag, TagError};

/// Errors surfaced by registry, decode and encode operations.
#[derive(Debug, Error)]
pub enum Error {
	#[error(transparent)]
	Schema(#[from] SchemaError),

	#[error(transparent)]
	Selection(#[from] SelectionError),

	/// A single field failed to decode or encode.
	#[error("field {field} at offset {offset}: {source}")]
	Field {
		field: String,
		offset: usize,
		#[source]
		source: FieldError,
	},

	/// The table walk consumed a different number of bytes than supplied.
	#[error("record length mismatch: layout needs {expected} bytes, got {actual}")]
	Format { expected: usize, actual: usize },

	#[error(transparent)]
	Plugin(#[from] PluginError),

	#[error("no plugin registered for tag {0}")]
	NotFound(Tag),

	/// The tag's handler refused a structurally valid record.
	#[error("handler for {tag} rejected record: {reason}")]
	Rejected { tag: Tag, reason: String },

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Date(#[from] DateError),

	#[error(transparent)]
	Tag(#[from] TagError),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
