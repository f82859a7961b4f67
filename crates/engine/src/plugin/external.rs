//! Opening `trex-abi` modules and copying their descriptions.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};
use trex_abi::{
	SYMBOL_FINALIZE, SYMBOL_INITIALIZE, SYMBOL_RETRIEVE_HANDLER, TREX_ABI_VERSION, TREX_NO_LENGTH,
	TrexDescriptionSetV1, TrexFieldKind, TrexFieldV1, TrexFinalizeFn, TrexHandlerV1,
	TrexInitializeFn, TrexPluginInfoV1, TrexRetrieveHandlerFn, TrexStatus, TrexStr,
	TrexValidateFn,
};

use super::{LoadedModule, ModuleLoader, PluginError, TreHandler};
use crate::field::{FieldDescriptor, FieldKind};
use crate::schema::{DescriptionSet, DescriptionTable, VariantLength};
use crate::tag::Tag;

/// Upper bound on fields per variant when scanning for the terminator.
const MAX_FIELDS: usize = 4096;

/// A successfully initialized module and the handlers it provides.
pub(crate) struct ExternalModule {
	pub module: Box<dyn LoadedModule>,
	pub finalize: TrexFinalizeFn,
	pub handlers: Vec<ExternalHandler>,
}

pub(crate) struct ExternalHandler {
	pub tag: Tag,
	pub set: Arc<DescriptionSet>,
	pub handler: Arc<dyn TreHandler>,
}

/// Handler whose validate hook lives in a loaded module.
///
/// Only reachable through the registry, which unloads modules under its
/// write lock, so the function pointer never outlives the library.
struct DynamicHandler {
	set: Arc<DescriptionSet>,
	validate: Option<TrexValidateFn>,
}

impl TreHandler for DynamicHandler {
	fn describe(&self) -> Arc<DescriptionSet> {
		Arc::clone(&self.set)
	}

	fn validate(&self, raw: &[u8]) -> Result<(), String> {
		let Some(validate) = self.validate else {
			return Ok(());
		};
		// SAFETY: the module is loaded and the slice is valid for the call.
		match unsafe { validate(raw.as_ptr(), raw.len()) } {
			TrexStatus::Ok => Ok(()),
			status => Err(format!("module returned {status:?}")),
		}
	}
}

struct Entrypoints {
	initialize: TrexInitializeFn,
	retrieve: TrexRetrieveHandlerFn,
	finalize: TrexFinalizeFn,
}

/// Opens a module, runs its initializer and copies every handler description.
///
/// On failure the module is finalized (if initialized) and unloaded before
/// the error is returned.
pub(crate) fn open(loader: &dyn ModuleLoader, path: &Path) -> Result<ExternalModule, PluginError> {
	let module = loader.load(path)?;

	let entry = match resolve_entrypoints(module.as_ref()) {
		Ok(entry) => entry,
		Err(e) => return Err(discard(module, e)),
	};

	let mut info = TrexPluginInfoV1 {
		abi_version: 0,
		handler_count: 0,
	};
	// SAFETY: symbol resolved from a module implementing the ABI.
	let status = unsafe { (entry.initialize)(&mut info) };
	if status != TrexStatus::Ok {
		let err = PluginError::EntryPoint {
			path: path.to_owned(),
			entry: SYMBOL_INITIALIZE,
			status,
		};
		return Err(discard(module, err));
	}

	match collect_handlers(&entry, &info, path) {
		Ok(handlers) => {
			debug!(path = %path.display(), handlers = handlers.len(), "module initialized");
			Ok(ExternalModule {
				module,
				finalize: entry.finalize,
				handlers,
			})
		}
		Err(e) => {
			// SAFETY: initialize succeeded, so finalize is due exactly once.
			unsafe { (entry.finalize)() };
			Err(discard(module, e))
		}
	}
}

/// Unloads a module after a failed open, keeping the original error.
fn discard(module: Box<dyn LoadedModule>, err: PluginError) -> PluginError {
	let path = module.path().to_owned();
	if let Err(unload) = module.unload() {
		warn!(path = %path.display(), error = %unload, "failed to unload module after error");
	}
	err
}

fn resolve_entrypoints(module: &dyn LoadedModule) -> Result<Entrypoints, PluginError> {
	let initialize = module.resolve(SYMBOL_INITIALIZE)?;
	let retrieve = module.resolve(SYMBOL_RETRIEVE_HANDLER)?;
	let finalize = module.resolve(SYMBOL_FINALIZE)?;
	// SAFETY: the ABI fixes the signature of each exported symbol.
	unsafe {
		Ok(Entrypoints {
			initialize: std::mem::transmute::<*mut std::ffi::c_void, TrexInitializeFn>(
				initialize.as_ptr(),
			),
			retrieve: std::mem::transmute::<*mut std::ffi::c_void, TrexRetrieveHandlerFn>(
				retrieve.as_ptr(),
			),
			finalize: std::mem::transmute::<*mut std::ffi::c_void, TrexFinalizeFn>(
				finalize.as_ptr(),
			),
		})
	}
}

fn collect_handlers(
	entry: &Entrypoints,
	info: &TrexPluginInfoV1,
	path: &Path,
) -> Result<Vec<ExternalHandler>, PluginError> {
	if info.abi_version != TREX_ABI_VERSION {
		return Err(PluginError::AbiMismatch {
			path: path.to_owned(),
			expected: TREX_ABI_VERSION,
			actual: info.abi_version,
		});
	}
	let invalid = |reason: String| PluginError::InvalidDescription {
		path: path.to_owned(),
		reason,
	};
	if info.handler_count == 0 {
		return Err(invalid("module provides no handlers".into()));
	}

	let mut handlers = Vec::with_capacity(info.handler_count);
	for index in 0..info.handler_count {
		let mut raw = TrexHandlerV1::EMPTY;
		// SAFETY: symbol resolved from a module implementing the ABI.
		let status = unsafe { (entry.retrieve)(index, &mut raw) };
		if status != TrexStatus::Ok {
			return Err(PluginError::EntryPoint {
				path: path.to_owned(),
				entry: SYMBOL_RETRIEVE_HANDLER,
				status,
			});
		}
		let describe = raw
			.describe
			.ok_or_else(|| invalid(format!("handler {index} has no describe entry")))?;

		// SAFETY: the module keeps description data alive until finalize.
		let (tag, set) = unsafe { copy_description(describe()) }.map_err(&invalid)?;
		set.validate().map_err(|e| invalid(format!("{tag}: {e}")))?;

		let set = Arc::new(set);
		handlers.push(ExternalHandler {
			tag,
			set: Arc::clone(&set),
			handler: Arc::new(DynamicHandler {
				set,
				validate: raw.validate,
			}),
		});
	}
	Ok(handlers)
}

/// Copies an ABI description into owned values.
///
/// # Safety
///
/// `raw` must be null or point at a description whose pointers are valid.
unsafe fn copy_description(
	raw: *const TrexDescriptionSetV1,
) -> Result<(Tag, DescriptionSet), String> {
	// SAFETY: guaranteed by the caller.
	let Some(raw) = (unsafe { raw.as_ref() }) else {
		return Err("describe returned null".into());
	};
	let tag_name = unsafe { read_str(raw.tag) }?;
	let tag = Tag::new(&tag_name).map_err(|e| e.to_string())?;
	let name = unsafe { read_str(raw.name) }?;

	if raw.variants.is_null() || raw.variant_count == 0 {
		return Err(format!("{tag} declares no variants"));
	}
	let variants = unsafe { std::slice::from_raw_parts(raw.variants, raw.variant_count) };
	let default = variants
		.get(raw.default_variant)
		.ok_or_else(|| format!("{tag}: default variant index {} out of range", raw.default_variant))?;
	let default_name = unsafe { read_str(default.name) }?;

	let mut set = DescriptionSet::new(name).with_default(default_name);
	for variant in variants {
		let variant_name = unsafe { read_str(variant.name) }?;
		let table = unsafe { copy_fields(variant.fields) }
			.map_err(|e| format!("{tag}/{variant_name}: {e}"))?;
		let length = match variant.length {
			TREX_NO_LENGTH => VariantLength::Variable,
			n => VariantLength::Fixed(
				usize::try_from(n).map_err(|_| format!("{tag}/{variant_name}: length {n} too large"))?,
			),
		};
		set = set.with_variant(variant_name, table, length);
	}
	Ok((tag, set))
}

/// # Safety
///
/// `fields` must be null or point at an `End`-terminated array.
unsafe fn copy_fields(fields: *const TrexFieldV1) -> Result<DescriptionTable, String> {
	if fields.is_null() {
		return Err("null field array".into());
	}
	let mut table = Vec::new();
	for i in 0..MAX_FIELDS {
		// SAFETY: the array is terminated before or at the End entry.
		let raw = unsafe { &*fields.add(i) };
		let kind = match raw.kind {
			TrexFieldKind::End => return Ok(DescriptionTable::new(table)),
			TrexFieldKind::Alpha => FieldKind::AlphaText,
			TrexFieldKind::Numeric => FieldKind::NumericText,
		};
		let tag = unsafe { read_str(raw.tag) }?;
		let label = unsafe { read_str(raw.label) }?;
		let width = usize::try_from(raw.width).map_err(|e| e.to_string())?;

		let mut desc = FieldDescriptor::new(kind, width, label, tag);
		if raw.required != 0 {
			desc = desc.required();
		}
		if raw.has_range != 0 {
			desc = desc.bounded(raw.range_min, raw.range_max);
		}
		table.push(desc);
	}
	Err(format!("no End terminator within {MAX_FIELDS} fields"))
}

/// # Safety
///
/// `s.ptr` must be valid for `s.len` bytes when `s.len` is non-zero.
unsafe fn read_str(s: TrexStr) -> Result<String, String> {
	if s.len == 0 {
		return Ok(String::new());
	}
	if s.ptr.is_null() {
		return Err("null string".into());
	}
	let bytes = unsafe { std::slice::from_raw_parts(s.ptr, s.len) };
	std::str::from_utf8(bytes)
		.map(str::to_owned)
		.map_err(|e| format!("invalid UTF-8: {e}"))
}

/// Finalizes and unloads a module returned by [`open`].
pub(crate) fn release(
	module: Box<dyn LoadedModule>,
	finalize: TrexFinalizeFn,
) -> Result<(), PluginError> {
	// SAFETY: called once per opened module, before its library is closed.
	unsafe { finalize() };
	debug!(path = %module.path().display(), "module finalized");
	module.unload()
}
