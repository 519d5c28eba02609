//! Page abstraction layer for ordergate.
//!
//! Provides the [`Surface`] trait: everything the interaction layer is
//! allowed to do to the page. Components never look elements up on their
//! own; they are handed [`ElementId`]s and write through a `Surface`.
//!
//! # Feature Flags
//!
//! - `headless` (default): [`HeadlessSurface`], an in-memory page used
//!   by tests and the demo.
//!
//! # Missing elements
//!
//! Some affordances only exist in some page variants (no account menu, no
//! toast container). Every `Surface` method must treat an unknown element
//! as a no-op, never as an error, so callers can write to optional
//! elements without checking first.

#[cfg(feature = "headless")]
mod headless;

#[cfg(feature = "headless")]
pub use headless::{ElementState, HeadlessSurface};
pub use ordergate_protocol::ElementId;

/// The writable (and minimally readable) view of the page.
///
/// All methods are infallible. The page is a single-threaded UI, so the
/// trait takes `&mut self` for writes and never needs `Send`/`Sync`.
pub trait Surface: 'static {
    /// Shows or hides an element (`display: none` when hidden).
    fn set_displayed(&mut self, el: &ElementId, displayed: bool);

    /// Whether the element is currently displayed.
    ///
    /// Returns `false` for elements that don't exist.
    fn is_displayed(&self, el: &ElementId) -> bool;

    /// Removes the element from (or restores it to) the accessibility tree
    /// (`aria-hidden`).
    fn set_assistive_hidden(&mut self, el: &ElementId, hidden: bool);

    /// Adds (`enabled = true`) or removes a styling class.
    fn set_class(&mut self, el: &ElementId, class: &str, enabled: bool);

    /// Replaces the element's text content.
    fn set_text(&mut self, el: &ElementId, text: &str);

    /// Sets an attribute, or removes it when `value` is `None`.
    fn set_attribute(&mut self, el: &ElementId, name: &str, value: Option<&str>);

    /// Moves keyboard focus to the element.
    fn focus(&mut self, el: &ElementId);

    /// Shows a blocking message (the browser's `alert`).
    fn alert(&mut self, message: &str);

    /// Leaves the page for another URL.
    fn navigate(&mut self, url: &str);
}
