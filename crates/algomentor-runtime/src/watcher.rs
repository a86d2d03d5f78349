//! SPA navigation detection and widget mount/unmount.

use tracing::debug;

use algomentor_protocols::{WidgetState, WidgetSurface};

/// Route prefix of problem pages. The bare prefix is the listing page
/// and does not qualify.
const PROBLEMS_PREFIX: &str = "/problems/";

/// Outcome of comparing the current path against the last observed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteChange {
    Changed,
    Unchanged,
}

/// Detects logical page changes from a stream of mutation notifications.
///
/// The host is a single-page application, so there are no full-document
/// reload events to key off; instead every DOM mutation funnels through
/// [`PageWatcher::handle_mutation`]. The last-path comparison is the
/// debounce that keeps the watcher from reacting to its own widget
/// insertions, which are mutations themselves.
pub struct PageWatcher {
    last_path: String,
}

impl PageWatcher {
    pub fn new() -> Self {
        Self {
            last_path: String::new(),
        }
    }

    /// Compare against the last observed path, recording the new one on
    /// change. Idempotent while the path stays the same.
    pub fn check_for_change(&mut self, current_path: &str) -> RouteChange {
        if self.last_path == current_path {
            return RouteChange::Unchanged;
        }
        self.last_path = current_path.to_string();
        RouteChange::Changed
    }

    /// Whether the path denotes a specific problem page.
    pub fn is_qualifying_route(path: &str) -> bool {
        path.starts_with(PROBLEMS_PREFIX) && path.len() > PROBLEMS_PREFIX.len()
    }

    /// React to one mutation notification.
    ///
    /// Returns the widget state the page is left in, or `None` when the
    /// path has not actually changed. On every real change existing
    /// widget nodes are torn down first; the entry-point button is then
    /// re-inserted only on qualifying pages. Infallible: no component
    /// failure may stop future change detection.
    pub fn handle_mutation(
        &mut self,
        current_path: &str,
        surface: &dyn WidgetSurface,
    ) -> Option<WidgetState> {
        if self.check_for_change(current_path) == RouteChange::Unchanged {
            return None;
        }

        debug!("Route changed to {}", current_path);
        surface.remove_panel();
        surface.remove_button();

        if Self::is_qualifying_route(current_path) && surface.mount_button() {
            Some(WidgetState::ButtonVisible)
        } else {
            Some(WidgetState::Hidden)
        }
    }
}

impl Default for PageWatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
