//! In-memory [`Surface`] implementation.
//!
//! `HeadlessSurface` keeps a map of element states plus a log of the
//! side effects a browser would show (focus moves, alerts, navigations).
//! Tests drive the page through it and then assert on what a user would
//! have seen.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use ordergate_protocol::ElementId;

use crate::Surface;

// ---------------------------------------------------------------------------
// ElementState
// ---------------------------------------------------------------------------

/// Observable state of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementState {
    /// `false` when the element is `display: none`.
    pub displayed: bool,
    /// `true` when the element carries `aria-hidden="true"`.
    pub assistive_hidden: bool,
    /// Styling classes currently applied.
    pub classes: BTreeSet<String>,
    /// Text content.
    pub text: String,
    /// Attributes other than `aria-hidden` (e.g. `title`, `aria-expanded`).
    pub attributes: BTreeMap<String, String>,
}

impl ElementState {
    /// A visible, accessible element with no text.
    pub fn shown() -> Self {
        Self {
            displayed: true,
            assistive_hidden: false,
            classes: BTreeSet::new(),
            text: String::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// An element that starts out hidden from both sight and assistive tech,
    /// like an overlay backdrop before it is opened.
    pub fn hidden() -> Self {
        Self {
            displayed: false,
            assistive_hidden: true,
            ..Self::shown()
        }
    }

    /// Builder-style text setter.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }
}

impl Default for ElementState {
    fn default() -> Self {
        Self::shown()
    }
}

// ---------------------------------------------------------------------------
// HeadlessSurface
// ---------------------------------------------------------------------------

/// A page that lives entirely in memory.
///
/// Only elements registered with [`with_element`](Self::with_element) or
/// [`insert`](Self::insert) exist. Writes to anything else are dropped,
/// the same way the interaction layer must tolerate a page variant that
/// lacks an optional affordance.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    elements: HashMap<ElementId, ElementState>,
    focused: Option<ElementId>,
    focus_history: Vec<ElementId>,
    alerts: Vec<String>,
    navigations: Vec<String>,
}

impl HeadlessSurface {
    /// Creates an empty page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style element registration.
    pub fn with_element(
        mut self,
        id: impl Into<ElementId>,
        state: ElementState,
    ) -> Self {
        self.insert(id, state);
        self
    }

    /// Registers (or replaces) an element.
    pub fn insert(&mut self, id: impl Into<ElementId>, state: ElementState) {
        self.elements.insert(id.into(), state);
    }

    /// Looks up an element's state.
    pub fn element(&self, id: &ElementId) -> Option<&ElementState> {
        self.elements.get(id)
    }

    /// Whether the element exists on this page.
    pub fn contains(&self, id: &ElementId) -> bool {
        self.elements.contains_key(id)
    }

    /// The element that currently holds focus.
    pub fn focused(&self) -> Option<&ElementId> {
        self.focused.as_ref()
    }

    /// Every element that received focus, oldest first.
    pub fn focus_history(&self) -> &[ElementId] {
        &self.focus_history
    }

    /// Every blocking message shown so far, oldest first.
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    /// The most recent blocking message.
    pub fn last_alert(&self) -> Option<&str> {
        self.alerts.last().map(String::as_str)
    }

    /// Drains the alert log.
    pub fn take_alerts(&mut self) -> Vec<String> {
        std::mem::take(&mut self.alerts)
    }

    /// Every URL the page navigated to.
    pub fn navigations(&self) -> &[String] {
        &self.navigations
    }

    /// Whether the element has the given class. `false` if it doesn't exist.
    pub fn has_class(&self, id: &ElementId, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|el| el.classes.contains(class))
    }

    /// The element's text content, if the element exists.
    pub fn text(&self, id: &ElementId) -> Option<&str> {
        self.elements.get(id).map(|el| el.text.as_str())
    }

    /// An attribute value, if both the element and the attribute exist.
    pub fn attribute(&self, id: &ElementId, name: &str) -> Option<&str> {
        self.elements
            .get(id)
            .and_then(|el| el.attributes.get(name))
            .map(String::as_str)
    }

    /// Whether the element is hidden from assistive tech.
    /// `true` for elements that don't exist.
    pub fn is_assistive_hidden(&self, id: &ElementId) -> bool {
        self.elements.get(id).is_none_or(|el| el.assistive_hidden)
    }

    fn element_mut(&mut self, id: &ElementId) -> Option<&mut ElementState> {
        let el = self.elements.get_mut(id);
        if el.is_none() {
            tracing::trace!(element = %id, "write to missing element ignored");
        }
        el
    }
}

impl Surface for HeadlessSurface {
    fn set_displayed(&mut self, el: &ElementId, displayed: bool) {
        if let Some(state) = self.element_mut(el) {
            state.displayed = displayed;
        }
    }

    fn is_displayed(&self, el: &ElementId) -> bool {
        self.elements.get(el).is_some_and(|state| state.displayed)
    }

    fn set_assistive_hidden(&mut self, el: &ElementId, hidden: bool) {
        if let Some(state) = self.element_mut(el) {
            state.assistive_hidden = hidden;
        }
    }

    fn set_class(&mut self, el: &ElementId, class: &str, enabled: bool) {
        if let Some(state) = self.element_mut(el) {
            if enabled {
                state.classes.insert(class.to_owned());
            } else {
                state.classes.remove(class);
            }
        }
    }

    fn set_text(&mut self, el: &ElementId, text: &str) {
        if let Some(state) = self.element_mut(el) {
            text.clone_into(&mut state.text);
        }
    }

    fn set_attribute(&mut self, el: &ElementId, name: &str, value: Option<&str>) {
        if let Some(state) = self.element_mut(el) {
            match value {
                Some(value) => {
                    state.attributes.insert(name.to_owned(), value.to_owned());
                }
                None => {
                    state.attributes.remove(name);
                }
            }
        }
    }

    fn focus(&mut self, el: &ElementId) {
        if self.elements.contains_key(el) {
            self.focused = Some(el.clone());
            self.focus_history.push(el.clone());
        } else {
            tracing::trace!(element = %el, "focus on missing element ignored");
        }
    }

    fn alert(&mut self, message: &str) {
        tracing::debug!(%message, "alert");
        self.alerts.push(message.to_owned());
    }

    fn navigate(&mut self, url: &str) {
        tracing::debug!(%url, "navigate");
        self.navigations.push(url.to_owned());
    }
}
