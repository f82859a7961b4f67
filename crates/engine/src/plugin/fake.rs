//! In-process module loader for tests.
//!
//! Exports point at `extern "C"` functions compiled into the test binary, so
//! the full ABI path runs without building a shared library.

use std::cell::Cell;
use std::ffi::c_void;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use trex_abi::*;

use super::{LoadedModule, ModuleLoader, PluginError, SymbolAddr};

thread_local! {
	static FINALIZED: Cell<usize> = const { Cell::new(0) };
}

/// Finalize calls made on this thread.
pub(crate) fn finalized() -> usize {
	FINALIZED.with(Cell::get)
}

static FAKETA_FIELDS: [TrexFieldV1; 3] = [
	TrexFieldV1::alpha(4, "Name", "NAME").required(),
	TrexFieldV1::numeric(2, "Count", "COUNT").bounded(0, 50),
	TrexFieldV1::END,
];

static FAKETA_VARIANTS: [TrexVariantV1; 1] = [TrexVariantV1 {
	name: TrexStr::new("FAKETA"),
	fields: FAKETA_FIELDS.as_ptr(),
	length: 6,
}];

static FAKETA: TrexDescriptionSetV1 = TrexDescriptionSetV1 {
	tag: TrexStr::new("FAKETA"),
	name: TrexStr::new("Fake A"),
	variants: FAKETA_VARIANTS.as_ptr(),
	variant_count: 1,
	default_variant: 0,
};

static FAKETB_FIELDS: [TrexFieldV1; 2] = [TrexFieldV1::alpha(3, "Code", "CODE"), TrexFieldV1::END];

static FAKETB_VARIANTS: [TrexVariantV1; 1] = [TrexVariantV1 {
	name: TrexStr::new("FAKETB"),
	fields: FAKETB_FIELDS.as_ptr(),
	length: 3,
}];

static FAKETB: TrexDescriptionSetV1 = TrexDescriptionSetV1 {
	tag: TrexStr::new("FAKETB"),
	name: TrexStr::new("Fake B"),
	variants: FAKETB_VARIANTS.as_ptr(),
	variant_count: 1,
	default_variant: 0,
};

/// Two variants of the same length.
static AMBIGUOUS_VARIANTS: [TrexVariantV1; 2] = [
	TrexVariantV1 {
		name: TrexStr::new("FIRST"),
		fields: FAKETB_FIELDS.as_ptr(),
		length: 3,
	},
	TrexVariantV1 {
		name: TrexStr::new("SECOND"),
		fields: FAKETB_FIELDS.as_ptr(),
		length: 3,
	},
];

static AMBIGUOUS: TrexDescriptionSetV1 = TrexDescriptionSetV1 {
	tag: TrexStr::new("FAKETC"),
	name: TrexStr::new("Ambiguous"),
	variants: AMBIGUOUS_VARIANTS.as_ptr(),
	variant_count: 2,
	default_variant: 0,
};

unsafe fn report(out: *mut TrexPluginInfoV1, abi_version: u32, handler_count: usize) -> TrexStatus {
	unsafe {
		*out = TrexPluginInfoV1 {
			abi_version,
			handler_count,
		};
	}
	TrexStatus::Ok
}

pub(crate) unsafe extern "C" fn init_one(out: *mut TrexPluginInfoV1) -> TrexStatus {
	unsafe { report(out, TREX_ABI_VERSION, 1) }
}

pub(crate) unsafe extern "C" fn init_two(out: *mut TrexPluginInfoV1) -> TrexStatus {
	unsafe { report(out, TREX_ABI_VERSION, 2) }
}

pub(crate) unsafe extern "C" fn init_future_abi(out: *mut TrexPluginInfoV1) -> TrexStatus {
	unsafe { report(out, TREX_ABI_VERSION + 1, 1) }
}

pub(crate) unsafe extern "C" fn init_failing(_out: *mut TrexPluginInfoV1) -> TrexStatus {
	TrexStatus::Failed
}

unsafe extern "C" fn describe_a() -> *const TrexDescriptionSetV1 {
	&FAKETA
}

unsafe extern "C" fn describe_b() -> *const TrexDescriptionSetV1 {
	&FAKETB
}

unsafe extern "C" fn describe_ambiguous() -> *const TrexDescriptionSetV1 {
	&AMBIGUOUS
}

/// Rejects records whose name is `NONE`.
unsafe extern "C" fn validate_a(record: *const u8, len: usize) -> TrexStatus {
	let bytes = unsafe { std::slice::from_raw_parts(record, len) };
	if bytes.starts_with(b"NONE") {
		TrexStatus::Rejected
	} else {
		TrexStatus::Ok
	}
}

/// Handler 0 is FAKETA, handler 1 is FAKETB.
pub(crate) unsafe extern "C" fn retrieve_ab(index: usize, out: *mut TrexHandlerV1) -> TrexStatus {
	let handler = match index {
		0 => TrexHandlerV1 {
			describe: Some(describe_a),
			validate: Some(validate_a),
		},
		1 => TrexHandlerV1 {
			describe: Some(describe_b),
			validate: None,
		},
		_ => return TrexStatus::OutOfRange,
	};
	unsafe { *out = handler };
	TrexStatus::Ok
}

pub(crate) unsafe extern "C" fn retrieve_ambiguous(
	_index: usize,
	out: *mut TrexHandlerV1,
) -> TrexStatus {
	unsafe {
		*out = TrexHandlerV1 {
			describe: Some(describe_ambiguous),
			validate: None,
		};
	}
	TrexStatus::Ok
}

pub(crate) unsafe extern "C" fn finalize() {
	FINALIZED.with(|n| n.set(n.get() + 1));
}

/// Loader handing out in-process modules with a fixed export table.
///
/// Paths whose file name starts with `broken` fail to load.
pub(crate) struct FakeLoader {
	exports: Vec<(&'static str, SymbolAddr)>,
	loads: Arc<AtomicUsize>,
	unloads: Arc<AtomicUsize>,
}

impl FakeLoader {
	pub fn empty() -> Self {
		Self {
			exports: Vec::new(),
			loads: Arc::default(),
			unloads: Arc::default(),
		}
	}

	/// FAKETA only, with all three entry points.
	pub fn standard() -> Self {
		Self::empty()
			.export(SYMBOL_INITIALIZE, init_one as *const ())
			.export(SYMBOL_RETRIEVE_HANDLER, retrieve_ab as *const ())
			.export(SYMBOL_FINALIZE, finalize as *const ())
	}

	pub fn export(mut self, symbol: &'static str, addr: *const ()) -> Self {
		self.exports.retain(|(name, _)| *name != symbol);
		if let Some(addr) = SymbolAddr::new(addr.cast_mut().cast::<c_void>()) {
			self.exports.push((symbol, addr));
		}
		self
	}

	pub fn without(mut self, symbol: &str) -> Self {
		self.exports.retain(|(name, _)| *name != symbol);
		self
	}

	pub fn loads(&self) -> usize {
		self.loads.load(Ordering::SeqCst)
	}

	pub fn unloads(&self) -> usize {
		self.unloads.load(Ordering::SeqCst)
	}

	/// Modules currently open.
	pub fn open_modules(&self) -> usize {
		self.loads() - self.unloads()
	}
}

struct FakeModule {
	path: PathBuf,
	exports: Vec<(&'static str, SymbolAddr)>,
	unloads: Arc<AtomicUsize>,
}

impl ModuleLoader for FakeLoader {
	fn load(&self, path: &Path) -> Result<Box<dyn LoadedModule>, PluginError> {
		let broken = path
			.file_name()
			.and_then(|n| n.to_str())
			.is_some_and(|n| n.starts_with("broken"));
		if broken {
			return Err(PluginError::Load {
				path: path.to_owned(),
				reason: "not a module".into(),
			});
		}
		self.loads.fetch_add(1, Ordering::SeqCst);
		Ok(Box::new(FakeModule {
			path: path.to_owned(),
			exports: self.exports.clone(),
			unloads: Arc::clone(&self.unloads),
		}))
	}
}

impl LoadedModule for FakeModule {
	fn path(&self) -> &Path {
		&self.path
	}

	fn resolve(&self, symbol: &str) -> Result<SymbolAddr, PluginError> {
		self.exports
			.iter()
			.find(|(name, _)| *name == symbol)
			.map(|(_, addr)| *addr)
			.ok_or_else(|| PluginError::MissingSymbol {
				path: self.path.clone(),
				symbol: symbol.to_owned(),
			})
	}

	fn unload(self: Box<Self>) -> Result<(), PluginError> {
		self.unloads.fetch_add(1, Ordering::SeqCst);
		Ok(())
	}
}
