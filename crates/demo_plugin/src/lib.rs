//! Example TRE handler module.
//!
//! Built as a `cdylib`, the library can be handed to
//! `Registry::load_external`. It provides one tag, `DEMOTA`, a fixed 24-byte
//! record:
//!
//! | Tag       | Kind    | Width |
//! |-----------|---------|-------|
//! | `MISSION` | alpha   | 10    |
//! | `COUNT`   | numeric | 4     |
//! | `NOTE`    | alpha   | 10    |
//!
//! Records with a `COUNT` of zero are rejected by the module's validator.

use std::sync::atomic::{AtomicBool, Ordering};

use trex_abi::{
	TREX_ABI_VERSION, TrexDescriptionSetV1, TrexFieldV1, TrexHandlerV1, TrexPluginInfoV1,
	TrexStatus, TrexStr, TrexVariantV1,
};

pub const TAG: &str = "DEMOTA";
pub const RECORD_LEN: usize = 24;

static FIELDS: [TrexFieldV1; 4] = [
	TrexFieldV1::alpha(10, "Mission", "MISSION").required(),
	TrexFieldV1::numeric(4, "Item Count", "COUNT").bounded(0, 9999),
	TrexFieldV1::alpha(10, "Note", "NOTE"),
	TrexFieldV1::END,
];

static VARIANTS: [TrexVariantV1; 1] = [TrexVariantV1 {
	name: TrexStr::new(TAG),
	fields: FIELDS.as_ptr(),
	length: RECORD_LEN as u64,
}];

static DESCRIPTION: TrexDescriptionSetV1 = TrexDescriptionSetV1 {
	tag: TrexStr::new(TAG),
	name: TrexStr::new("Demo Mission Summary"),
	variants: VARIANTS.as_ptr(),
	variant_count: VARIANTS.len(),
	default_variant: 0,
};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Whether the module is between initialize and finalize.
pub fn is_initialized() -> bool {
	INITIALIZED.load(Ordering::Acquire)
}

unsafe extern "C" fn describe() -> *const TrexDescriptionSetV1 {
	&DESCRIPTION
}

unsafe extern "C" fn validate(record: *const u8, len: usize) -> TrexStatus {
	if record.is_null() || len != RECORD_LEN {
		return TrexStatus::Rejected;
	}
	// SAFETY: the host passes a live buffer of `len` bytes.
	let bytes = unsafe { std::slice::from_raw_parts(record, len) };
	if &bytes[10..14] == b"0000" {
		TrexStatus::Rejected
	} else {
		TrexStatus::Ok
	}
}

/// # Safety
///
/// `out` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn trex_plugin_initialize(out: *mut TrexPluginInfoV1) -> TrexStatus {
	if out.is_null() {
		return TrexStatus::Failed;
	}
	unsafe {
		*out = TrexPluginInfoV1 {
			abi_version: TREX_ABI_VERSION,
			handler_count: 1,
		};
	}
	INITIALIZED.store(true, Ordering::Release);
	TrexStatus::Ok
}

/// # Safety
///
/// `out` must be valid for writes.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn trex_plugin_retrieve_handler(
	index: usize,
	out: *mut TrexHandlerV1,
) -> TrexStatus {
	if index != 0 {
		return TrexStatus::OutOfRange;
	}
	if out.is_null() {
		return TrexStatus::Failed;
	}
	unsafe {
		*out = TrexHandlerV1 {
			describe: Some(describe),
			validate: Some(validate),
		};
	}
	TrexStatus::Ok
}

/// # Safety
///
/// Must not be called while the host still uses the description.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn trex_plugin_finalize() {
	INITIALIZED.store(false, Ordering::Release);
}
