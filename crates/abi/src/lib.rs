//! C ABI for dynamically loaded TRE handler modules.
//!
//! A module is a shared library exporting three symbols:
//!
//! - [`SYMBOL_INITIALIZE`]: fills a [`TrexPluginInfoV1`] with the ABI version
//!   and the number of handlers the module provides.
//! - [`SYMBOL_RETRIEVE_HANDLER`]: fills a [`TrexHandlerV1`] for one handler index.
//! - [`SYMBOL_FINALIZE`]: releases module state before the library is unloaded.
//!
//! Description data handed across the boundary must stay valid until
//! `finalize` returns. The host copies it into owned values during load.

/// Current ABI revision. Hosts reject modules reporting anything else.
pub const TREX_ABI_VERSION: u32 = 1;

/// Sentinel for [`TrexVariantV1::length`] marking a variable-length variant.
pub const TREX_NO_LENGTH: u64 = u64::MAX;

pub const SYMBOL_INITIALIZE: &str = "trex_plugin_initialize";
pub const SYMBOL_RETRIEVE_HANDLER: &str = "trex_plugin_retrieve_handler";
pub const SYMBOL_FINALIZE: &str = "trex_plugin_finalize";

/// Result code returned by every module entry point.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexStatus {
	Ok = 0,
	Failed = 1,
	Incompatible = 2,
	OutOfRange = 3,
	Rejected = 4,
}

/// Borrowed UTF-8 string (not nul terminated).
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexStr {
	pub ptr: *const u8,
	pub len: usize,
}

impl TrexStr {
	pub const EMPTY: Self = Self {
		ptr: core::ptr::null(),
		len: 0,
	};

	pub const fn new(s: &'static str) -> Self {
		Self {
			ptr: s.as_ptr(),
			len: s.len(),
		}
	}
}

/// Field character class. `End` terminates a field array.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrexFieldKind {
	End = 0,
	Alpha = 1,
	Numeric = 2,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexFieldV1 {
	pub kind: TrexFieldKind,
	pub width: u32,
	pub label: TrexStr,
	pub tag: TrexStr,
	/// Non-zero when an all-blank field is a violation.
	pub required: u8,
	/// Non-zero when `range_min..=range_max` applies.
	pub has_range: u8,
	pub range_min: i64,
	pub range_max: i64,
}

impl TrexFieldV1 {
	pub const END: Self = Self {
		kind: TrexFieldKind::End,
		width: 0,
		label: TrexStr::EMPTY,
		tag: TrexStr::EMPTY,
		required: 0,
		has_range: 0,
		range_min: 0,
		range_max: 0,
	};

	pub const fn alpha(width: u32, label: &'static str, tag: &'static str) -> Self {
		Self {
			kind: TrexFieldKind::Alpha,
			width,
			label: TrexStr::new(label),
			tag: TrexStr::new(tag),
			..Self::END
		}
	}

	pub const fn numeric(width: u32, label: &'static str, tag: &'static str) -> Self {
		Self {
			kind: TrexFieldKind::Numeric,
			..Self::alpha(width, label, tag)
		}
	}

	pub const fn required(self) -> Self {
		Self {
			required: 1,
			..self
		}
	}

	pub const fn bounded(self, min: i64, max: i64) -> Self {
		Self {
			has_range: 1,
			range_min: min,
			range_max: max,
			..self
		}
	}
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexVariantV1 {
	pub name: TrexStr,
	/// Field array terminated by a [`TrexFieldKind::End`] entry.
	pub fields: *const TrexFieldV1,
	/// Expected byte length, or [`TREX_NO_LENGTH`].
	pub length: u64,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexDescriptionSetV1 {
	pub tag: TrexStr,
	pub name: TrexStr,
	pub variants: *const TrexVariantV1,
	pub variant_count: usize,
	pub default_variant: usize,
}

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexPluginInfoV1 {
	pub abi_version: u32,
	pub handler_count: usize,
}

pub type TrexDescribeFn = unsafe extern "C" fn() -> *const TrexDescriptionSetV1;
pub type TrexValidateFn = unsafe extern "C" fn(record: *const u8, len: usize) -> TrexStatus;

#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct TrexHandlerV1 {
	pub describe: Option<TrexDescribeFn>,
	/// Optional record-level check run on raw bytes after decode and before encode returns.
	pub validate: Option<TrexValidateFn>,
}

impl TrexHandlerV1 {
	pub const EMPTY: Self = Self {
		describe: None,
		validate: None,
	};
}

pub type TrexInitializeFn = unsafe extern "C" fn(out: *mut TrexPluginInfoV1) -> TrexStatus;
pub type TrexRetrieveHandlerFn =
	unsafe extern "C" fn(index: usize, out: *mut TrexHandlerV1) -> TrexStatus;
pub type TrexFinalizeFn = unsafe extern "C" fn();

// SAFETY: these descriptors only ever point at immutable data that lives as
// long as the module, so sharing them between threads is sound.
unsafe impl Sync for TrexStr {}
unsafe impl Send for TrexStr {}
unsafe impl Sync for TrexVariantV1 {}
unsafe impl Send for TrexVariantV1 {}
unsafe impl Sync for TrexDescriptionSetV1 {}
unsafe impl Send for TrexDescriptionSetV1 {}
