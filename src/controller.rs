use std::sync::{Arc, Weak};
use std::time::Duration;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::{debug, warn};
use parking_lot::Mutex;
use spanmark_dom::{NodeId, SharedDocument};
use spanmark_highlight::{InstanceId, SharedRegistry};
use spanmark_search::find_text_matches;

use crate::error::HighlightError;
use crate::options::{HighlightOptions, OptionsUpdate};

type CountCallback = Arc<dyn Fn(usize) + Send + Sync>;
type ErrorCallback = Arc<dyn Fn(&HighlightError) + Send + Sync>;

/// Identifies one requested scan. Only the most recently issued token may
/// apply its results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanToken(u64);

enum ScanOutcome {
    Count(usize),
    Error(HighlightError),
    Silent,
}

struct ControllerState {
    instance: InstanceId,
    document: SharedDocument,
    root: Option<NodeId>,
    options: HighlightOptions,
    registry: SharedRegistry,
    match_count: usize,
    error: Option<HighlightError>,
    scan_token: u64,
    destroyed: bool,
    on_change: Option<CountCallback>,
    on_error: Option<ErrorCallback>,
}

impl ControllerState {
    fn next_token(&mut self) -> ScanToken {
        self.scan_token = self.scan_token.wrapping_add(1);
        ScanToken(self.scan_token)
    }

    fn clear_registration(&mut self) {
        self.registry.lock().unregister_instance(self.instance);
    }

    fn scan(&mut self) -> ScanOutcome {
        if self.destroyed {
            return ScanOutcome::Silent;
        }

        let supported = self.registry.lock().is_supported();

        let Some(root) = self.root else {
            debug!("{} has no root to scan", self.instance);
            self.clear_registration();
            self.match_count = 0;
            self.error = None;
            return ScanOutcome::Silent;
        };

        let terms = self.options.search.terms();
        let results = if terms.is_empty() {
            None
        } else {
            let document = self.document.read();
            if document.node(root).is_none() {
                drop(document);
                self.clear_registration();
                self.match_count = 0;
                let error = HighlightError::UnknownRoot(root);
                self.error = Some(error.clone());
                return ScanOutcome::Error(error);
            }
            Some(find_text_matches(
                &document,
                Some(root),
                &terms,
                &self.options.find_options(),
            ))
        };
        self.match_count = results.as_ref().map_or(0, |results| results.count());

        if !supported {
            self.error = Some(HighlightError::Unsupported);
            return ScanOutcome::Error(HighlightError::Unsupported);
        }

        match results {
            Some(results) => {
                self.registry.lock().register(
                    &self.options.highlight_name,
                    results.into_spans(),
                    Some(self.instance),
                );
            }
            None => self.clear_registration(),
        }

        debug!(
            "{} highlighted {} matches under {:?}",
            self.instance, self.match_count, self.options.highlight_name
        );
        self.error = None;
        ScanOutcome::Count(self.match_count)
    }

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.next_token();
        self.clear_registration();
        self.match_count = 0;
        self.destroyed = true;
    }
}

/// One highlight session over a subtree of a shared document.
///
/// The controller owns a single [`InstanceId`] in the registry, so several
/// controllers can share a highlight name without overwriting each other.
/// Dropping the controller removes its highlights.
pub struct HighlightController {
    state: Arc<Mutex<ControllerState>>,
}

impl HighlightController {
    /// Creates a controller registering into the process-wide registry.
    pub fn new(document: SharedDocument, root: Option<NodeId>, options: HighlightOptions) -> Self {
        Self::with_registry(document, root, options, spanmark_highlight::global())
    }

    pub fn with_registry(
        document: SharedDocument,
        root: Option<NodeId>,
        options: HighlightOptions,
        registry: SharedRegistry,
    ) -> Self {
        let state = ControllerState {
            instance: InstanceId::new(),
            document,
            root,
            options,
            registry,
            match_count: 0,
            error: None,
            scan_token: 0,
            destroyed: false,
            on_change: None,
            on_error: None,
        };
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Called with the match count after every successful scan.
    pub fn on_highlight_change(&self, callback: impl Fn(usize) + Send + Sync + 'static) {
        self.state.lock().on_change = Some(Arc::new(callback));
    }

    /// Called instead of the count callback when a scan fails.
    pub fn on_error(&self, callback: impl Fn(&HighlightError) + Send + Sync + 'static) {
        self.state.lock().on_error = Some(Arc::new(callback));
    }

    pub fn instance_id(&self) -> InstanceId {
        self.state.lock().instance
    }

    pub fn match_count(&self) -> usize {
        self.state.lock().match_count
    }

    pub fn error(&self) -> Option<HighlightError> {
        self.state.lock().error.clone()
    }

    pub fn is_supported(&self) -> bool {
        let registry = self.state.lock().registry.clone();
        registry.lock().is_supported()
    }

    pub fn options(&self) -> HighlightOptions {
        self.state.lock().options.clone()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.state.lock().root
    }

    pub fn set_root(&self, root: Option<NodeId>) {
        self.state.lock().root = root;
    }

    /// Merges `update` into the current options without scanning.
    ///
    /// Pending scans are cancelled. When the highlight name changes, the old
    /// highlight is removed right away.
    pub fn set_options(&self, update: OptionsUpdate) {
        let mut state = self.state.lock();
        let previous_name = state.options.highlight_name.clone();
        state.options.apply(update);
        state.next_token();
        if state.options.highlight_name != previous_name {
            state.clear_registration();
        }
    }

    /// Merges `update` and rescans immediately.
    pub fn update(&self, update: OptionsUpdate) {
        self.set_options(update);
        self.refresh();
    }

    /// Scans now, superseding any pending scheduled scan.
    pub fn refresh(&self) {
        let token = self.begin_scan();
        self.apply_scan(token);
    }

    /// Issues a new scan token, invalidating every earlier one.
    pub fn begin_scan(&self) -> ScanToken {
        self.state.lock().next_token()
    }

    /// Runs the scan for `token` if it is still the latest one. Returns
    /// whether the scan ran.
    pub fn apply_scan(&self, token: ScanToken) -> bool {
        apply_scan(&self.state, token)
    }

    /// Invalidates pending scheduled scans.
    pub fn cancel_pending(&self) {
        self.state.lock().next_token();
    }

    /// Returns a future that waits for the configured debounce delay and
    /// then scans, unless a newer scan was requested in the meantime.
    ///
    /// The future only holds a weak reference to the controller; it resolves
    /// to `false` if it was superseded or the controller went away.
    pub fn schedule_refresh(&self) -> BoxFuture<'static, bool> {
        let (token, delay) = {
            let mut state = self.state.lock();
            (state.next_token(), state.options.debounce_ms)
        };
        let state = Arc::downgrade(&self.state);

        async move {
            if delay > 0 {
                smol::Timer::after(Duration::from_millis(delay)).await;
            }
            let Some(state) = Weak::upgrade(&state) else {
                return false;
            };
            apply_scan(&state, token)
        }
        .boxed()
    }

    /// Merges `update` and schedules a debounced rescan.
    pub fn schedule_update(&self, update: OptionsUpdate) -> BoxFuture<'static, bool> {
        self.set_options(update);
        self.schedule_refresh()
    }

    /// Cancels pending scans and removes this controller's highlights.
    /// Later scans are ignored.
    pub fn destroy(&self) {
        self.state.lock().destroy();
    }
}

impl Drop for HighlightController {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn apply_scan(state: &Mutex<ControllerState>, token: ScanToken) -> bool {
    let (outcome, on_change, on_error) = {
        let mut state = state.lock();
        if state.destroyed || ScanToken(state.scan_token) != token {
            debug!("{} dropped a superseded scan", state.instance);
            return false;
        }
        (state.scan(), state.on_change.clone(), state.on_error.clone())
    };

    // Callbacks run without the lock held so they may call back into the
    // controller.
    match outcome {
        ScanOutcome::Count(count) => {
            if let Some(callback) = on_change {
                callback(count);
            }
        }
        ScanOutcome::Error(error) => {
            warn!("Highlight scan failed: {}", error);
            if let Some(callback) = on_error {
                callback(&error);
            }
        }
        ScanOutcome::Silent => {}
    }
    true
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::options::Search;
    use spanmark_dom::{Document, shared};
    use spanmark_highlight::{HighlightRegistry, HighlightTable, Unsupported};

    fn fixture() -> (SharedDocument, NodeId) {
        let mut doc = Document::new();
        let body = doc.append_element(Document::ROOT, "body").unwrap();
        let p = doc.append_element(body, "p").unwrap();
        doc.append_text(p, "error: disk full. warning: retrying. error again")
            .unwrap();
        let script = doc.append_element(body, "script").unwrap();
        doc.append_text(script, "throw error").unwrap();
        (shared(doc), body)
    }

    fn registry() -> SharedRegistry {
        Arc::new(Mutex::new(HighlightRegistry::new(HighlightTable::new())))
    }

    fn controller(
        document: &SharedDocument,
        root: NodeId,
        options: HighlightOptions,
        registry: &SharedRegistry,
    ) -> HighlightController {
        HighlightController::with_registry(document.clone(), Some(root), options, registry.clone())
    }

    fn visible(registry: &SharedRegistry, name: &str) -> usize {
        registry.lock().backend().get(name).map_or(0, |spans| spans.len())
    }

    #[test]
    fn test_refresh_registers_matches() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);

        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let seen_in_callback = seen.clone();
        ctrl.on_highlight_change(move |count| seen_in_callback.store(count, Ordering::SeqCst));

        ctrl.refresh();
        assert_eq!(ctrl.match_count(), 2);
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert_eq!(visible(&registry, "highlight"), 2);
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_controllers_merge_under_one_name() {
        let (doc, body) = fixture();
        let registry = registry();
        let errors = controller(&doc, body, HighlightOptions::new("error"), &registry);
        let warnings = controller(&doc, body, HighlightOptions::new("warning"), &registry);

        errors.refresh();
        warnings.refresh();
        assert_eq!(visible(&registry, "highlight"), 3);

        errors.destroy();
        assert_eq!(visible(&registry, "highlight"), 1);

        drop(warnings);
        assert_eq!(visible(&registry, "highlight"), 0);
        assert!(registry.lock().backend().get("highlight").is_none());
    }

    #[test]
    fn test_update_renames_highlight() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();

        ctrl.update(OptionsUpdate::highlight_name("highlight-error"));
        assert_eq!(visible(&registry, "highlight"), 0);
        assert_eq!(visible(&registry, "highlight-error"), 2);
    }

    #[test]
    fn test_blank_search_clears_and_reports_zero() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();

        let seen = Arc::new(AtomicUsize::new(usize::MAX));
        let seen_in_callback = seen.clone();
        ctrl.on_highlight_change(move |count| seen_in_callback.store(count, Ordering::SeqCst));

        ctrl.update(OptionsUpdate::search(Search::from(["", "   "])));
        assert_eq!(ctrl.match_count(), 0);
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(visible(&registry, "highlight"), 0);
        assert!(ctrl.error().is_none());
    }

    #[test]
    fn test_missing_root_is_silent() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();

        let calls = Arc::new(AtomicUsize::new(0));
        let change_calls = calls.clone();
        ctrl.on_highlight_change(move |_| {
            change_calls.fetch_add(1, Ordering::SeqCst);
        });
        let error_calls = calls.clone();
        ctrl.on_error(move |_| {
            error_calls.fetch_add(1, Ordering::SeqCst);
        });

        ctrl.set_root(None);
        ctrl.refresh();
        assert_eq!(ctrl.match_count(), 0);
        assert!(ctrl.error().is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(visible(&registry, "highlight"), 0);
    }

    #[test]
    fn test_unknown_root_reports_error() {
        let (doc, _) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, NodeId(999), HighlightOptions::new("error"), &registry);

        let failures = Arc::new(AtomicUsize::new(0));
        let failures_in_callback = failures.clone();
        ctrl.on_error(move |error| {
            assert_eq!(*error, HighlightError::UnknownRoot(NodeId(999)));
            failures_in_callback.fetch_add(1, Ordering::SeqCst);
        });

        ctrl.refresh();
        assert_eq!(failures.load(Ordering::SeqCst), 1);
        assert_eq!(ctrl.error(), Some(HighlightError::UnknownRoot(NodeId(999))));
    }

    #[test]
    fn test_unknown_root_clears_previous_highlight() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();
        assert_eq!(visible(&registry, "highlight"), 2);

        ctrl.set_root(Some(NodeId(999)));
        ctrl.refresh();
        assert_eq!(ctrl.error(), Some(HighlightError::UnknownRoot(NodeId(999))));
        assert_eq!(ctrl.match_count(), 0);
        assert_eq!(visible(&registry, "highlight"), 0);
    }

    #[test]
    fn test_unsupported_reports_error_but_counts() {
        let (doc, body) = fixture();
        let registry: SharedRegistry = Arc::new(Mutex::new(HighlightRegistry::new(Unsupported)));
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);

        let changes = Arc::new(AtomicUsize::new(0));
        let changes_in_callback = changes.clone();
        ctrl.on_highlight_change(move |_| {
            changes_in_callback.fetch_add(1, Ordering::SeqCst);
        });
        let failures = Arc::new(AtomicUsize::new(0));
        let failures_in_callback = failures.clone();
        ctrl.on_error(move |_| {
            failures_in_callback.fetch_add(1, Ordering::SeqCst);
        });

        ctrl.refresh();
        assert!(!ctrl.is_supported());
        assert_eq!(ctrl.match_count(), 2);
        assert_eq!(ctrl.error(), Some(HighlightError::Unsupported));
        assert_eq!(changes.load(Ordering::SeqCst), 0);
        assert_eq!(failures.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_stale_token_is_not_applied() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);

        let first = ctrl.begin_scan();
        let second = ctrl.begin_scan();
        assert!(!ctrl.apply_scan(first));
        assert_eq!(visible(&registry, "highlight"), 0);
        assert!(ctrl.apply_scan(second));
        assert_eq!(visible(&registry, "highlight"), 2);
    }

    #[test]
    fn test_last_scheduled_refresh_wins() {
        let (doc, body) = fixture();
        let registry = registry();
        let mut options = HighlightOptions::new("error");
        options.debounce_ms = 5;
        let ctrl = controller(&doc, body, options, &registry);

        let stale = ctrl.schedule_refresh();
        let latest = ctrl.schedule_update(OptionsUpdate::search("warning"));

        let (stale_applied, latest_applied) =
            smol::block_on(async { futures::join!(stale, latest) });
        assert!(!stale_applied);
        assert!(latest_applied);
        assert_eq!(ctrl.match_count(), 1);
        assert_eq!(visible(&registry, "highlight"), 1);
    }

    #[test]
    fn test_cancel_pending() {
        let (doc, body) = fixture();
        let registry = registry();
        let mut options = HighlightOptions::new("error");
        options.debounce_ms = 0;
        let ctrl = controller(&doc, body, options, &registry);

        let pending = ctrl.schedule_refresh();
        ctrl.cancel_pending();
        assert!(!smol::block_on(pending));
        assert_eq!(visible(&registry, "highlight"), 0);
    }

    #[test]
    fn test_scheduled_refresh_after_drop() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);

        let pending = ctrl.schedule_refresh();
        drop(ctrl);
        assert!(!smol::block_on(pending));
        assert_eq!(visible(&registry, "highlight"), 0);
    }

    #[test]
    fn test_destroy_ignores_later_scans() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();

        ctrl.destroy();
        assert_eq!(visible(&registry, "highlight"), 0);
        ctrl.refresh();
        assert_eq!(ctrl.match_count(), 0);
        assert_eq!(visible(&registry, "highlight"), 0);
    }

    #[test]
    fn test_rescan_sees_document_changes() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = controller(&doc, body, HighlightOptions::new("error"), &registry);
        ctrl.refresh();
        assert_eq!(ctrl.match_count(), 2);

        {
            let mut document = doc.write();
            let p = document.append_element(body, "p").unwrap();
            document.append_text(p, "one more error").unwrap();
        }
        ctrl.refresh();
        assert_eq!(ctrl.match_count(), 3);
        assert_eq!(visible(&registry, "highlight"), 3);
    }

    #[test]
    fn test_callback_may_reenter_controller() {
        let (doc, body) = fixture();
        let registry = registry();
        let ctrl = Arc::new(controller(&doc, body, HighlightOptions::new("error"), &registry));

        let observed = Arc::new(AtomicUsize::new(0));
        let observed_in_callback = observed.clone();
        let weak = Arc::downgrade(&ctrl);
        ctrl.on_highlight_change(move |_| {
            if let Some(ctrl) = weak.upgrade() {
                observed_in_callback.store(ctrl.match_count(), Ordering::SeqCst);
            }
        });

        ctrl.refresh();
        assert_eq!(observed.load(Ordering::SeqCst), 2);
    }
}
