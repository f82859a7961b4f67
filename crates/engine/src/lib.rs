//! Schema-driven codec and plugin registry for Tagged Record Extensions (TREs).
//!
//! A TRE is a fixed or variable width block of ASCII fields identified by a
//! six character tag. The same tag has often been written with several
//! historical byte layouts, so each tag is described by a [`DescriptionSet`]
//! of competing [`DescriptionTable`]s keyed by their total byte length.
//!
//! # Flow
//!
//! ```text
//! (tag, bytes) -> Registry::lookup -> DescriptionSet::select(len) -> field walk -> RecordInstance
//! RecordInstance -> variant by name -> field encode -> bytes
//! ```
//!
//! # Extending
//!
//! New layouts are added without touching this crate in three ways:
//!
//! 1. Statically, by calling [`Registry::register`] or submitting a
//!    [`BuiltinPlugin`] through `inventory`.
//! 2. From TOML schema files, see [`config::SchemaFile`].
//! 3. From shared libraries implementing the `trex-abi` module contract, see
//!    [`Registry::load_external`].

/// Builtin tag descriptions compiled into the engine.
#[cfg(feature = "builtins")]
pub mod builtins;
/// Engine configuration and TOML schema files.
pub mod config;
/// Date/time parsing and formatting for date-valued text fields.
pub mod date;
pub mod error;
/// Field descriptors, values and the per-field codec.
pub mod field;
/// Handler trait, builtin plugin submission and module loading.
pub mod plugin;
/// Decoded record instances and the table walker.
pub mod record;
/// Process-wide tag registry.
pub mod registry;
/// Description tables, sets and variant selection.
pub mod schema;
pub mod tag;

pub use config::{ConfigError, EngineConfig, SchemaFile};
pub use date::{DateError, DateFormat};
pub use error::{Error, Result};
pub use field::{
	CondHook, FieldDescriptor, FieldError, FieldKind, FieldMap, FieldValue, LengthHook, Numeric,
	Presence, Range,
};
pub use plugin::{
	BuiltinPlugin, LoadedModule, ModuleLoader, PluginError, StaticHandler, SymbolAddr, TreHandler,
};
pub use record::RecordInstance;
pub use registry::{AutoloadReport, PluginEntry, PluginOrigin, PluginRef, Registry};
pub use schema::{
	DescriptionSet, DescriptionTable, SchemaError, SelectionError, Variant, VariantLength,
};
pub use tag::{Tag, TagError};
