//! Toast notifier: one transient message at a time.
//!
//! # Lifecycle
//!
//! ```text
//!            show(msg)                       duration elapses / hide()
//!   Hidden ────────────→ Visible ──────────────────────────────────────→ Retracting
//!     ↑                   ↑  │ show(msg2): cancel timers, replace text      │
//!     │                   └──┘                                              │
//!     └──────────────────────── EXIT_GRACE elapses ─────────────────────────┘
//! ```
//!
//! Retraction is two-phase: the `show` class comes off immediately (which
//! starts the CSS exit transition), and only after [`EXIT_GRACE`] is the
//! toast taken out of the layout and the accessibility tree.
//!
//! # Timers
//!
//! The notifier owns a private [`TimerQueue`]. The page loop waits on
//! [`ToastNotifier::next_timer`] and feeds whatever fires back into
//! [`ToastNotifier::handle_timer`]. Every `show` cancels the previous
//! auto-dismiss and exit-grace timers before scheduling a new one, so a
//! re-shown toast is only ever dismissed once.

use std::time::Duration;

use ordergate_surface::{ElementId, Surface};
use ordergate_timer::{Expired, TimerHandle, TimerQueue};
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::ToastConfig;

/// Fixed delay between removing the `show` class and hiding the element.
///
/// Matches the length of the stylesheet's exit transition.
pub const EXIT_GRACE: Duration = Duration::from_millis(260);

/// The styling class that makes the toast visible.
pub const VISIBLE_CLASS: &str = "show";

/// The deferred steps of a toast's life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTimer {
    /// The visible duration is over; start retracting.
    AutoDismiss,
    /// The exit transition is over; hide the element.
    ExitGrace,
}

/// The page elements a toast renders into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastElements {
    /// The element that is shown, styled and hidden.
    pub container: ElementId,
    /// The element whose text is the message. Often the container itself.
    pub message: ElementId,
}

impl ToastElements {
    /// A toast whose container also holds the text.
    pub fn single(id: impl Into<ElementId>) -> Self {
        let id = id.into();
        Self {
            container: id.clone(),
            message: id,
        }
    }
}

/// What the toast currently looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastState {
    /// The `show` class is on.
    pub visible: bool,
    /// Out of the layout and the accessibility tree.
    pub hidden: bool,
    /// The last message shown.
    pub message: String,
}

impl Default for ToastState {
    fn default() -> Self {
        Self {
            visible: false,
            hidden: true,
            message: String::new(),
        }
    }
}

/// Shows and retracts the page's toast.
pub struct ToastNotifier {
    elements: Option<ToastElements>,
    duration: Duration,
    state: ToastState,
    dismiss: Option<TimerHandle>,
    grace: Option<TimerHandle>,
    timers: TimerQueue<ToastTimer>,
}

impl ToastNotifier {
    /// Creates a notifier for `elements`.
    ///
    /// `None` means the page has no toast; every operation is then a
    /// no-op.
    pub fn new(elements: Option<ToastElements>, config: &ToastConfig) -> Self {
        Self {
            elements,
            duration: config.duration(),
            state: ToastState::default(),
            dismiss: None,
            grace: None,
            timers: TimerQueue::new(),
        }
    }

    /// Shows `message` for the configured duration.
    pub fn show<S: Surface>(&mut self, surface: &mut S, message: &str) {
        self.show_for(surface, message, self.duration);
    }

    /// Shows `message` for `duration`, pre-empting whatever is on screen.
    pub fn show_for<S: Surface>(
        &mut self,
        surface: &mut S,
        message: &str,
        duration: Duration,
    ) {
        if self.elements.is_none() {
            trace!("no toast element, show ignored");
            return;
        }
        self.cancel_timers();

        let Some(elements) = &self.elements else {
            return;
        };
        surface.set_text(&elements.message, message);
        surface.set_displayed(&elements.container, true);
        surface.set_assistive_hidden(&elements.container, false);
        surface.set_class(&elements.container, VISIBLE_CLASS, true);

        self.state = ToastState {
            visible: true,
            hidden: false,
            message: message.to_owned(),
        };
        self.dismiss = Some(self.timers.schedule(duration, ToastTimer::AutoDismiss));

        debug!(%message, ?duration, "toast shown");
    }

    /// Starts retracting the toast.
    ///
    /// Does nothing if the toast is already retracting or hidden.
    pub fn hide<S: Surface>(&mut self, surface: &mut S) {
        let Some(elements) = &self.elements else {
            return;
        };
        if !self.state.visible {
            return;
        }

        if let Some(handle) = self.dismiss.take() {
            self.timers.cancel(handle);
        }
        surface.set_class(&elements.container, VISIBLE_CLASS, false);
        self.state.visible = false;
        self.grace = Some(self.timers.schedule(EXIT_GRACE, ToastTimer::ExitGrace));

        debug!("toast retracting");
    }

    /// Runs a fired timer.
    ///
    /// Returns `false` if the timer was stale: its handle is no longer the
    /// one this notifier is waiting on.
    pub fn handle_timer<S: Surface>(
        &mut self,
        surface: &mut S,
        expired: Expired<ToastTimer>,
    ) -> bool {
        match expired.task {
            ToastTimer::AutoDismiss => {
                if self.dismiss != Some(expired.handle) {
                    trace!(handle = %expired.handle, "stale auto-dismiss ignored");
                    return false;
                }
                self.dismiss = None;
                self.hide(surface);
            }
            ToastTimer::ExitGrace => {
                if self.grace != Some(expired.handle) {
                    trace!(handle = %expired.handle, "stale exit grace ignored");
                    return false;
                }
                self.grace = None;
                if let Some(elements) = &self.elements {
                    surface.set_displayed(&elements.container, false);
                    surface.set_assistive_hidden(&elements.container, true);
                }
                self.state.hidden = true;
                trace!("toast hidden");
            }
        }
        true
    }

    /// Waits for the next toast timer. Pends forever when none is
    /// scheduled. Cancel-safe.
    pub async fn next_timer(&mut self) -> Expired<ToastTimer> {
        self.timers.wait_next().await
    }

    /// Runs every timer due at or before `now`. Returns how many ran.
    pub fn fire_due<S: Surface>(&mut self, surface: &mut S, now: Instant) -> usize {
        let mut fired = 0;
        // One at a time: a firing AutoDismiss schedules an ExitGrace that
        // may itself already be due.
        while let Some(expired) = self.timers.pop_due(now) {
            if self.handle_timer(surface, expired) {
                fired += 1;
            }
        }
        fired
    }

    /// The current toast state.
    pub fn state(&self) -> &ToastState {
        &self.state
    }

    /// Whether the `show` class is on.
    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    /// Number of scheduled toast timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// When the next toast timer fires.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    /// The configured visible duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    fn cancel_timers(&mut self) {
        if let Some(handle) = self.dismiss.take() {
            self.timers.cancel(handle);
        }
        if let Some(handle) = self.grace.take() {
            self.timers.cancel(handle);
        }
    }
}

impl std::fmt::Debug for ToastNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToastNotifier")
            .field("elements", &self.elements)
            .field("state", &self.state)
            .field("pending_timers", &self.timers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use ordergate_surface::{ElementState, HeadlessSurface};

    use super::*;

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw)
    }

    fn page() -> HeadlessSurface {
        HeadlessSurface::new().with_element("toast", ElementState::hidden())
    }

    fn notifier() -> ToastNotifier {
        ToastNotifier::new(Some(ToastElements::single("toast")), &ToastConfig::default())
    }

    // =====================================================================
    // show()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_show_renders_message_and_schedules_dismiss() {
        let mut surface = page();
        let mut toast = notifier();

        toast.show(&mut surface, "hello");

        assert!(toast.is_visible());
        assert_eq!(toast.state().message, "hello");
        assert_eq!(surface.text(&id("toast")), Some("hello"));
        assert!(surface.is_displayed(&id("toast")));
        assert!(!surface.is_assistive_hidden(&id("toast")));
        assert!(surface.has_class(&id("toast"), VISIBLE_CLASS));
        assert_eq!(toast.pending_timers(), 1);
        assert_eq!(
            toast.next_deadline(),
            Some(Instant::now() + Duration::from_millis(3200))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_twice_keeps_single_dismiss_timer() {
        let mut surface = page();
        let mut toast = notifier();

        toast.show(&mut surface, "first");
        toast.show(&mut surface, "second");

        assert_eq!(toast.pending_timers(), 1);
        assert_eq!(surface.text(&id("toast")), Some("second"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_show_during_exit_grace_cancels_grace() {
        let mut surface = page();
        let mut toast = notifier();
        toast.show(&mut surface, "first");
        toast.hide(&mut surface);

        toast.show(&mut surface, "second");

        // Only the new auto-dismiss remains.
        assert_eq!(toast.pending_timers(), 1);
        assert!(surface.has_class(&id("toast"), VISIBLE_CLASS));
    }

    #[test]
    fn test_show_without_toast_element_is_noop() {
        let mut surface = page();
        let mut toast = ToastNotifier::new(None, &ToastConfig::default());

        toast.show(&mut surface, "hello");
        toast.hide(&mut surface);

        assert!(!toast.is_visible());
        assert_eq!(toast.pending_timers(), 0);
        assert_eq!(surface.text(&id("toast")), Some(""));
    }

    // =====================================================================
    // hide()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_hide_removes_class_then_waits_for_grace() {
        let mut surface = page();
        let mut toast = notifier();
        toast.show(&mut surface, "hello");

        toast.hide(&mut surface);

        assert!(!toast.is_visible());
        assert!(!surface.has_class(&id("toast"), VISIBLE_CLASS));
        // Still in the layout until the grace elapses.
        assert!(surface.is_displayed(&id("toast")));
        assert!(!toast.state().hidden);
        assert_eq!(toast.next_deadline(), Some(Instant::now() + EXIT_GRACE));
    }

    #[tokio::test(start_paused = true)]
    async fn test_hide_twice_schedules_one_grace() {
        let mut surface = page();
        let mut toast = notifier();
        toast.show(&mut surface, "hello");

        toast.hide(&mut surface);
        toast.hide(&mut surface);

        assert_eq!(toast.pending_timers(), 1);
    }

    #[test]
    fn test_hide_when_never_shown_is_noop() {
        let mut surface = page();
        let mut toast = notifier();

        toast.hide(&mut surface);

        assert_eq!(toast.pending_timers(), 0);
        assert!(toast.state().hidden);
    }

    // =====================================================================
    // fire_due() / handle_timer()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_fire_due_runs_full_retraction() {
        let mut surface = page();
        let mut toast = notifier();
        toast.show(&mut surface, "hello");

        let later = Instant::now() + Duration::from_millis(3200) + EXIT_GRACE;
        let fired = toast.fire_due(&mut surface, later);

        assert_eq!(fired, 2);
        assert!(toast.state().hidden);
        assert!(!surface.is_displayed(&id("toast")));
        assert!(surface.is_assistive_hidden(&id("toast")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_fire_due_before_deadline_does_nothing() {
        let mut surface = page();
        let mut toast = notifier();
        toast.show(&mut surface, "hello");

        let fired = toast.fire_due(&mut surface, Instant::now() + Duration::from_millis(3199));

        assert_eq!(fired, 0);
        assert!(toast.is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_handle_timer_superseded_dismiss_is_ignored() {
        let mut surface = page();
        let mut toast = notifier();
        // First show takes handle timer-1, the re-show cancels it and
        // takes timer-2.
        toast.show(&mut surface, "first");
        toast.show(&mut surface, "second");

        // Rebuild what a late timer-1 expiry would look like.
        let mut other = TimerQueue::new();
        other.schedule(Duration::ZERO, ToastTimer::AutoDismiss);
        let stale = other.pop_due(Instant::now()).unwrap();

        assert!(!toast.handle_timer(&mut surface, stale));
        assert!(toast.is_visible());
        assert_eq!(toast.pending_timers(), 1);
    }
}
