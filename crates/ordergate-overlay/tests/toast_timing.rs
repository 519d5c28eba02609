//! Toast timing against tokio's paused clock.
//!
//! These tests drive the notifier the way the page loop does: wait on
//! `next_timer`, hand the result to `handle_timer`.

use std::time::Duration;

use ordergate_overlay::{
    EXIT_GRACE, ToastConfig, ToastElements, ToastNotifier, ToastTimer, VISIBLE_CLASS,
};
use ordergate_surface::{ElementId, ElementState, HeadlessSurface, Surface};
use tokio::time::Instant;

fn toast_id() -> ElementId {
    ElementId::new("toast")
}

fn setup() -> (ToastNotifier, HeadlessSurface) {
    let surface = HeadlessSurface::new().with_element("toast", ElementState::hidden());
    let toast = ToastNotifier::new(
        Some(ToastElements::single("toast")),
        &ToastConfig::default(),
    );
    (toast, surface)
}

#[tokio::test(start_paused = true)]
async fn test_auto_dismiss_fires_after_default_duration() {
    let (mut toast, mut surface) = setup();
    let start = Instant::now();
    toast.show(&mut surface, "hello");

    let expired = toast.next_timer().await;

    assert_eq!(expired.task, ToastTimer::AutoDismiss);
    assert!(start.elapsed() >= Duration::from_millis(3200));
    assert!(toast.handle_timer(&mut surface, expired));
    assert!(!surface.has_class(&toast_id(), VISIBLE_CLASS));
    assert!(surface.is_displayed(&toast_id()));
}

#[tokio::test(start_paused = true)]
async fn test_exit_grace_hides_toast_after_260ms() {
    let (mut toast, mut surface) = setup();
    toast.show(&mut surface, "hello");
    let dismiss = toast.next_timer().await;
    toast.handle_timer(&mut surface, dismiss);
    let retract_started = Instant::now();

    let grace = toast.next_timer().await;

    assert_eq!(grace.task, ToastTimer::ExitGrace);
    assert!(retract_started.elapsed() >= EXIT_GRACE);
    toast.handle_timer(&mut surface, grace);
    assert!(!surface.is_displayed(&toast_id()));
    assert!(surface.is_assistive_hidden(&toast_id()));
    assert!(toast.state().hidden);
    assert_eq!(toast.pending_timers(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_reshown_toast_is_dismissed_once_from_second_show() {
    let (mut toast, mut surface) = setup();
    toast.show(&mut surface, "first");

    tokio::time::advance(Duration::from_millis(2000)).await;
    toast.show(&mut surface, "second");
    let second_shown = Instant::now();

    // At the first show's deadline nothing may fire.
    tokio::time::advance(Duration::from_millis(1300)).await;
    assert_eq!(toast.fire_due(&mut surface, Instant::now()), 0);
    assert!(toast.is_visible());
    assert_eq!(surface.text(&toast_id()), Some("second"));

    let expired = toast.next_timer().await;
    assert_eq!(expired.task, ToastTimer::AutoDismiss);
    assert!(second_shown.elapsed() >= Duration::from_millis(3200));
    assert!(toast.handle_timer(&mut surface, expired));

    // Only the exit grace remains: one dismissal in total.
    assert_eq!(toast.pending_timers(), 1);
    let grace = toast.next_timer().await;
    assert_eq!(grace.task, ToastTimer::ExitGrace);
}

#[tokio::test(start_paused = true)]
async fn test_manual_hide_cancels_auto_dismiss() {
    let (mut toast, mut surface) = setup();
    toast.show(&mut surface, "hello");
    tokio::time::advance(Duration::from_millis(500)).await;

    toast.hide(&mut surface);

    let expired = toast.next_timer().await;
    assert_eq!(expired.task, ToastTimer::ExitGrace);
}

#[tokio::test(start_paused = true)]
async fn test_custom_duration_from_config() {
    let mut surface = HeadlessSurface::new().with_element("toast", ElementState::hidden());
    let mut toast = ToastNotifier::new(
        Some(ToastElements::single("toast")),
        &ToastConfig { duration_ms: 1000 },
    );
    let start = Instant::now();
    toast.show(&mut surface, "quick");

    let expired = toast.next_timer().await;

    assert_eq!(expired.task, ToastTimer::AutoDismiss);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(1000));
    assert!(elapsed < Duration::from_millis(3200));
}
