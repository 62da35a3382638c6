use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;
use spanmark_dom::TextSpan;

use crate::backend::HighlightBackend;

/// Opaque token identifying one contributor to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Mints a token that is unique within the process.
    pub fn new() -> Self {
        static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_INSTANCE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "instance-{}", self.0)
    }
}

/// Per-name span sets, merged from any number of instances.
///
/// Each instance owns one slice per name and only ever replaces its own
/// slice. After every change the full union for the name is recomputed and
/// handed to the backend. An instance contributes to at most one name at a
/// time: registering under a new name drops its slice from the old one.
pub struct HighlightRegistry {
    backend: Box<dyn HighlightBackend>,
    entries: HashMap<String, BTreeMap<InstanceId, Vec<TextSpan>>>,
    names: HashMap<InstanceId, String>,
}

impl fmt::Debug for HighlightRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HighlightRegistry")
            .field("supported", &self.is_supported())
            .field("entries", &self.entries)
            .finish()
    }
}

impl HighlightRegistry {
    pub fn new(backend: impl HighlightBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            entries: HashMap::new(),
            names: HashMap::new(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.backend.is_supported()
    }

    pub fn backend(&self) -> &dyn HighlightBackend {
        self.backend.as_ref()
    }

    /// Replaces `instance`'s contribution under `name` and republishes the
    /// union. Mints an id when none is given; the returned id must be passed
    /// on later calls.
    pub fn register(
        &mut self,
        name: &str,
        spans: Vec<TextSpan>,
        instance: Option<InstanceId>,
    ) -> InstanceId {
        let instance = instance.unwrap_or_default();
        if !self.is_supported() {
            return instance;
        }

        if let Some(previous) = self.names.get(&instance).cloned()
            && previous != name
        {
            self.unregister(&previous, instance);
        }

        if spans.is_empty() {
            self.unregister(name, instance);
            return instance;
        }

        debug!("{} registers {} spans under {:?}", instance, spans.len(), name);
        self.entries
            .entry(name.to_string())
            .or_default()
            .insert(instance, spans);
        self.names.insert(instance, name.to_string());
        self.publish(name);
        instance
    }

    /// Drops `instance`'s contribution under `name`. When nothing is left
    /// under the name, its highlight is deleted from the backend.
    pub fn unregister(&mut self, name: &str, instance: InstanceId) {
        if !self.is_supported() {
            return;
        }

        if self.names.get(&instance).is_some_and(|current| current == name) {
            self.names.remove(&instance);
        }

        let Some(entry) = self.entries.get_mut(name) else {
            return;
        };
        if entry.remove(&instance).is_none() {
            return;
        }

        debug!("{} unregisters from {:?}", instance, name);
        if entry.is_empty() {
            self.entries.remove(name);
            self.backend.delete(name);
        } else {
            self.publish(name);
        }
    }

    /// Drops `instance` from whichever name it contributes to.
    pub fn unregister_instance(&mut self, instance: InstanceId) {
        if let Some(name) = self.names.get(&instance).cloned() {
            self.unregister(&name, instance);
        }
    }

    /// The merged span set for `name`, ordered by instance.
    pub fn spans(&self, name: &str) -> Vec<TextSpan> {
        self.entries
            .get(name)
            .map(|entry| entry.values().flatten().copied().collect())
            .unwrap_or_default()
    }

    #[cfg(test)]
    fn instance_spans(&self, name: &str, instance: InstanceId) -> Option<&[TextSpan]> {
        self.entries.get(name)?.get(&instance).map(Vec::as_slice)
    }

    fn publish(&mut self, name: &str) {
        let union = self.spans(name);
        self.backend.set(name, union);
    }
}
