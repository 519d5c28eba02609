//! Modal gate: a blocking overlay with explicit focus hand-off.
//!
//! ```text
//!            open(focus_target)
//!   Closed ─────────────────────→ Open
//!     ↑                            │
//!     └──── close(return_focus) ───┘   (cancel button, backdrop click, Escape)
//! ```
//!
//! The gate doesn't remember who opened it. Whoever closes it says where
//! focus goes next, so keyboard users always land back on the control
//! that opened the dialog, however it was dismissed.

use ordergate_surface::{ElementId, Surface};

/// One blocking overlay, identified by its backdrop element.
#[derive(Debug, Clone)]
pub struct ModalGate {
    backdrop: ElementId,
    open: bool,
}

impl ModalGate {
    /// Creates a closed gate for the overlay rooted at `backdrop`.
    pub fn new(backdrop: ElementId) -> Self {
        Self {
            backdrop,
            open: false,
        }
    }

    /// Shows the overlay, exposes it to assistive tech, and focuses
    /// `focus_target` (usually the dialog's first input or its close
    /// button).
    ///
    /// Opening an already open gate just moves focus again.
    pub fn open<S: Surface>(&mut self, surface: &mut S, focus_target: &ElementId) {
        surface.set_displayed(&self.backdrop, true);
        surface.set_assistive_hidden(&self.backdrop, false);
        surface.focus(focus_target);

        if !self.open {
            tracing::debug!(backdrop = %self.backdrop, "modal opened");
        }
        self.open = true;
    }

    /// Hides the overlay and returns focus to `return_focus`.
    ///
    /// Returns `true` if the gate was open. Closing a closed gate changes
    /// nothing, focus included.
    pub fn close<S: Surface>(
        &mut self,
        surface: &mut S,
        return_focus: &ElementId,
    ) -> bool {
        if !self.open {
            return false;
        }

        surface.set_displayed(&self.backdrop, false);
        surface.set_assistive_hidden(&self.backdrop, true);
        surface.focus(return_focus);
        self.open = false;

        tracing::debug!(backdrop = %self.backdrop, "modal closed");
        true
    }

    /// Whether a click on `target` should dismiss this gate.
    ///
    /// Only a click whose target is the backdrop itself counts. Clicks
    /// inside the dialog content bubble up to the backdrop too, but their
    /// target is the inner element.
    pub fn is_backdrop_click(&self, target: &ElementId) -> bool {
        self.open && *target == self.backdrop
    }

    /// Returns `true` while the overlay is shown.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// The overlay's backdrop element.
    pub fn backdrop(&self) -> &ElementId {
        &self.backdrop
    }
}
