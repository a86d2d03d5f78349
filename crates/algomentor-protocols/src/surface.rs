//! Host-page widget rendering seam.

use crate::types::ChatMessage;

/// Rendering adapter for the host page.
///
/// All widget DOM lives inside a single fixed container owned by the
/// host; when that container is missing, mounts return `false` and the
/// feature silently does not appear. Everything here is infallible by
/// design so no rendering failure can escape into the watcher loop.
pub trait WidgetSurface: Send + Sync {
    /// Insert the entry-point button. `false` when the container is absent.
    fn mount_button(&self) -> bool;

    /// Remove the entry-point button if present.
    fn remove_button(&self);

    /// Insert the chat panel. `false` when the container is absent.
    fn mount_panel(&self) -> bool;

    /// Remove the chat panel if present.
    fn remove_panel(&self);

    /// Drop every rendered message from the panel.
    fn clear_messages(&self);

    /// Append a message bubble to the panel.
    fn render_message(&self, message: &ChatMessage);

    /// Show a transient, never-persisted notice in the panel.
    fn render_notice(&self, text: &str);

    /// Show or hide the "thinking" indicator.
    fn set_pending(&self, pending: bool);

    /// Enable or disable the input controls.
    fn set_input_enabled(&self, enabled: bool);

    /// Ask the user to confirm a destructive clear.
    fn confirm_clear(&self) -> bool;

    /// Whether the panel is still attached. Completions that land after
    /// the panel was torn down check this before rendering.
    fn is_live(&self) -> bool;
}
