//! Named highlight sets merged from independent instances.
//!
//! [`HighlightRegistry`] can be used standalone; the free functions in this
//! crate operate on one process-wide registry created on first use.

mod backend;
mod registry;

use std::sync::{Arc, OnceLock};

use parking_lot::Mutex;
use spanmark_dom::TextSpan;

pub use backend::{HighlightBackend, HighlightTable, Unsupported};
pub use registry::{HighlightRegistry, InstanceId};

pub type SharedRegistry = Arc<Mutex<HighlightRegistry>>;

static GLOBAL_REGISTRY: OnceLock<SharedRegistry> = OnceLock::new();

/// The process-wide registry, backed by a [`HighlightTable`] unless
/// [`install_global`] ran first.
pub fn global() -> SharedRegistry {
    GLOBAL_REGISTRY
        .get_or_init(|| Arc::new(Mutex::new(HighlightRegistry::new(HighlightTable::new()))))
        .clone()
}

/// Installs the backend of the process-wide registry.
///
/// Only the first initialization wins; returns `false` if the registry
/// already existed.
pub fn install_global(backend: impl HighlightBackend + 'static) -> bool {
    let mut installed = false;
    GLOBAL_REGISTRY.get_or_init(|| {
        installed = true;
        Arc::new(Mutex::new(HighlightRegistry::new(backend)))
    });
    installed
}

pub fn is_highlighting_supported() -> bool {
    global().lock().is_supported()
}

pub fn register_highlight(
    name: &str,
    spans: Vec<TextSpan>,
    instance: Option<InstanceId>,
) -> InstanceId {
    global().lock().register(name, spans, instance)
}

pub fn unregister_highlight(name: &str, instance: InstanceId) {
    global().lock().unregister(name, instance);
}

/// The merged span set currently registered under `name`.
pub fn highlight_spans(name: &str) -> Vec<TextSpan> {
    global().lock().spans(name)
}
