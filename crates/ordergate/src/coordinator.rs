//! The pending-action coordinator: gating orders behind login.
//!
//! # States
//!
//! ```text
//!                 request (guest)              login submitted
//!   Idle ───────────────────────────→ AwaitingAuth ─────────────────→ Idle
//!    │  ↑                               │   ↑  │                (intent resumed)
//!    │  └── request (signed in):        │   │  └── request: intent overwritten
//!    │      executes immediately        │   │
//!    └──────────────────────────────────┘   └──── modal cancelled: gate closes,
//!                                                  intent is kept
//! ```
//!
//! "AwaitingAuth" means an intent is pending. Cancelling the login dialog
//! does not forget it: the next successful login, from this page or from
//! the standalone login page, resumes it.
//!
//! # Ownership
//!
//! The coordinator owns the session manager, the login gate, the toast,
//! and the page surface. The page chrome borrows the surface through
//! [`PendingActionCoordinator::surface_mut`] between calls.

use ordergate_overlay::{ModalGate, ToastNotifier, ToastTimer};
use ordergate_protocol::ElementId;
use ordergate_session::{AuthSessionManager, KeyValueStore, Session};
use ordergate_surface::Surface;
use ordergate_timer::Expired;
use tokio::time::Instant;

/// Toast shown when a guest tries to order.
pub const LOGIN_REQUIRED_TOAST: &str = "Oops — looks like you need to log in to order.";

/// Alert shown after signing out.
pub const SIGNED_OUT_ALERT: &str = "You have been signed out (demo).";

// ---------------------------------------------------------------------------
// State and outcomes
// ---------------------------------------------------------------------------

/// Whether an order is waiting on a login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    Idle,
    AwaitingAuth,
}

impl std::fmt::Display for CoordinatorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "Idle"),
            Self::AwaitingAuth => write!(f, "AwaitingAuth"),
        }
    }
}

/// What [`PendingActionCoordinator::request_guarded_action`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardedOutcome {
    /// Signed in: the order went straight through.
    Executed,
    /// Guest: the order is now pending and the login dialog is open.
    /// `replaced` is the intent it overwrote, if any.
    Deferred { replaced: Option<String> },
}

/// What [`PendingActionCoordinator::on_login_submitted`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// A pending order was resumed and cleared.
    Resumed { intent: String },
    /// Nothing was pending; just signed in.
    SignedIn,
    /// The identity was blank. Nothing changed: the dialog stays as it
    /// was and any pending order is kept.
    Refused,
}

// ---------------------------------------------------------------------------
// PendingActionCoordinator
// ---------------------------------------------------------------------------

/// Owns the single pending intent and decides when it runs.
pub struct PendingActionCoordinator<S, K> {
    surface: S,
    auth: AuthSessionManager<K>,
    login_gate: ModalGate,
    toast: ToastNotifier,
    identity_input: ElementId,
    pending: Option<String>,
    /// Where focus goes when the login dialog closes.
    return_focus: Option<ElementId>,
}

impl<S: Surface, K: KeyValueStore> PendingActionCoordinator<S, K> {
    /// Assembles a coordinator. The session is whatever `auth` holds;
    /// call [`restore`](Self::restore) to load the persisted one.
    pub fn new(
        surface: S,
        auth: AuthSessionManager<K>,
        login_gate: ModalGate,
        toast: ToastNotifier,
        identity_input: ElementId,
    ) -> Self {
        Self {
            surface,
            auth,
            login_gate,
            toast,
            identity_input,
            pending: None,
            return_focus: None,
        }
    }

    /// Restores the persisted session and renders the account label.
    pub fn restore(&mut self) {
        self.auth.restore(&mut self.surface);
    }

    /// A guest or a signed-in user asked to order `name`.
    ///
    /// If the login dialog opens, closing it returns focus to the account
    /// button.
    pub fn request_guarded_action(&mut self, name: &str) -> GuardedOutcome {
        self.guard(name, None)
    }

    /// Like [`request_guarded_action`](Self::request_guarded_action), for
    /// a request made by activating `opener`. Closing the login dialog
    /// returns focus to `opener`.
    pub fn request_guarded_action_from(
        &mut self,
        name: &str,
        opener: &ElementId,
    ) -> GuardedOutcome {
        self.guard(name, Some(opener))
    }

    fn guard(&mut self, name: &str, opener: Option<&ElementId>) -> GuardedOutcome {
        if self.auth.is_authenticated() {
            tracing::info!(intent = %name, "order executed");
            self.surface
                .alert(&format!("Proceed to order: {name} (demo)"));
            return GuardedOutcome::Executed;
        }

        let replaced = self.pending.replace(name.to_string());
        tracing::info!(
            intent = %name,
            replaced = ?replaced,
            "order deferred until login"
        );

        self.return_focus = opener.cloned();
        self.toast.show(&mut self.surface, LOGIN_REQUIRED_TOAST);
        self.login_gate.open(&mut self.surface, &self.identity_input);

        GuardedOutcome::Deferred { replaced }
    }

    /// A login completed, either in the page's dialog or in another
    /// context. Signs in, closes the dialog, and resumes the pending order
    /// if there is one.
    pub fn on_login_submitted(&mut self, identity: &str) -> LoginOutcome {
        if !self.auth.login(identity, &mut self.surface) {
            return LoginOutcome::Refused;
        }
        self.close_login_gate();

        match self.pending.take() {
            Some(intent) => {
                tracing::info!(%intent, "pending order resumed");
                self.surface.alert(&format!(
                    "Signed in as {identity}. You can now order: {intent} (demo)"
                ));
                LoginOutcome::Resumed { intent }
            }
            None => {
                self.surface.alert(&format!("Signed in as {identity} (demo)"));
                LoginOutcome::SignedIn
            }
        }
    }

    /// The login dialog was dismissed without logging in.
    ///
    /// The pending intent stays. Returns `false` if the dialog was already
    /// closed.
    pub fn on_modal_cancelled(&mut self) -> bool {
        let was_open = self.login_gate.is_open();
        self.close_login_gate();
        if was_open {
            tracing::debug!(pending = ?self.pending, "login dialog cancelled");
        }
        was_open
    }

    /// Signs out. The pending intent, if any, is untouched.
    pub fn on_logout(&mut self) {
        self.auth.logout(&mut self.surface);
        self.surface.alert(SIGNED_OUT_ALERT);
    }

    // -- Toast timers ------------------------------------------------------

    /// Waits for the next toast timer. Pends forever when none is due.
    pub async fn next_toast_timer(&mut self) -> Expired<ToastTimer> {
        self.toast.next_timer().await
    }

    /// Runs a fired toast timer.
    pub fn handle_toast_timer(&mut self, expired: Expired<ToastTimer>) -> bool {
        self.toast.handle_timer(&mut self.surface, expired)
    }

    /// Runs every toast timer due at or before `now`.
    pub fn fire_due_timers(&mut self, now: Instant) -> usize {
        self.toast.fire_due(&mut self.surface, now)
    }

    // -- Accessors ---------------------------------------------------------

    pub fn state(&self) -> CoordinatorState {
        if self.pending.is_some() {
            CoordinatorState::AwaitingAuth
        } else {
            CoordinatorState::Idle
        }
    }

    /// The order waiting on a login.
    pub fn pending_intent(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    pub fn current_identity(&self) -> Option<&str> {
        self.auth.current_identity()
    }

    pub fn session(&self) -> &Session {
        self.auth.session()
    }

    pub fn auth(&self) -> &AuthSessionManager<K> {
        &self.auth
    }

    pub fn login_gate(&self) -> &ModalGate {
        &self.login_gate
    }

    pub fn toast(&self) -> &ToastNotifier {
        &self.toast
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Tears the coordinator down into its surface and session manager.
    pub fn into_parts(self) -> (S, AuthSessionManager<K>) {
        (self.surface, self.auth)
    }

    /// Closes the login dialog (focus back on whoever opened it) and
    /// retracts the toast.
    fn close_login_gate(&mut self) {
        let return_focus = self
            .return_focus
            .take()
            .unwrap_or_else(|| self.auth.affordance().button.clone());
        self.login_gate.close(&mut self.surface, &return_focus);
        self.toast.hide(&mut self.surface);
    }
}

impl<S, K> std::fmt::Debug for PendingActionCoordinator<S, K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingActionCoordinator")
            .field("pending", &self.pending)
            .field("login_gate", &self.login_gate)
            .field("toast", &self.toast)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for `PendingActionCoordinator`.
    //!
    //! Naming convention: `test_{function}_{scenario}_{expected}`.

    use ordergate_overlay::{ToastConfig, ToastElements, VISIBLE_CLASS};
    use ordergate_session::{
        AccountAffordance, MemoryStore, PersistentSessionStore, UnavailableStore,
    };
    use ordergate_surface::{ElementState, HeadlessSurface};

    use super::*;

    // -- Helpers ----------------------------------------------------------

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw)
    }

    fn page() -> HeadlessSurface {
        HeadlessSurface::new()
            .with_element("loginBtn", ElementState::shown().with_text("Log in"))
            .with_element("accountMenu", ElementState::hidden())
            .with_element("modalBackdrop", ElementState::hidden())
            .with_element("email", ElementState::shown())
            .with_element("toast", ElementState::hidden())
    }

    fn coordinator<K: KeyValueStore>(
        backend: K,
    ) -> PendingActionCoordinator<HeadlessSurface, K> {
        let auth = AuthSessionManager::new(
            PersistentSessionStore::new(backend),
            AccountAffordance {
                button: id("loginBtn"),
                menu: Some(id("accountMenu")),
            },
        );
        let mut coordinator = PendingActionCoordinator::new(
            page(),
            auth,
            ModalGate::new(id("modalBackdrop")),
            ToastNotifier::new(Some(ToastElements::single("toast")), &ToastConfig::default()),
            id("email"),
        );
        coordinator.restore();
        coordinator
    }

    // =====================================================================
    // request_guarded_action()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_request_as_guest_defers_and_opens_gate() {
        let mut c = coordinator(MemoryStore::new());

        let outcome = c.request_guarded_action("Veggie Combo");

        assert_eq!(outcome, GuardedOutcome::Deferred { replaced: None });
        assert_eq!(c.state(), CoordinatorState::AwaitingAuth);
        assert_eq!(c.pending_intent(), Some("Veggie Combo"));
        assert!(c.login_gate().is_open());
        assert_eq!(c.surface().focused(), Some(&id("email")));
        assert_eq!(c.surface().text(&id("toast")), Some(LOGIN_REQUIRED_TOAST));
        assert!(c.surface().alerts().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_request_twice_last_write_wins() {
        let mut c = coordinator(MemoryStore::new());

        c.request_guarded_action("Soup");
        let outcome = c.request_guarded_action("Salad");

        assert_eq!(
            outcome,
            GuardedOutcome::Deferred {
                replaced: Some("Soup".into())
            }
        );
        assert_eq!(c.pending_intent(), Some("Salad"));
    }

    #[test]
    fn test_request_when_signed_in_executes_without_modal() {
        let backend = MemoryStore::new()
            .with_entry(ordergate_session::LOGGED_IN_KEY, "1")
            .with_entry(ordergate_session::IDENTITY_KEY, "a@b.com");
        let mut c = coordinator(backend);

        let outcome = c.request_guarded_action("Soup");

        assert_eq!(outcome, GuardedOutcome::Executed);
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(!c.login_gate().is_open());
        assert!(!c.toast().is_visible());
        assert_eq!(c.surface().last_alert(), Some("Proceed to order: Soup (demo)"));
    }

    // =====================================================================
    // on_login_submitted()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_login_with_pending_resumes_and_clears() {
        let mut c = coordinator(MemoryStore::new());
        c.request_guarded_action("Veggie Combo");

        let outcome = c.on_login_submitted("a@b.com");

        assert_eq!(
            outcome,
            LoginOutcome::Resumed {
                intent: "Veggie Combo".into()
            }
        );
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(!c.login_gate().is_open());
        assert_eq!(c.surface().focused(), Some(&id("loginBtn")));
        assert!(!c.surface().has_class(&id("toast"), VISIBLE_CLASS));
        assert_eq!(
            c.surface().last_alert(),
            Some("Signed in as a@b.com. You can now order: Veggie Combo (demo)")
        );
    }

    #[test]
    fn test_login_without_pending_signs_in_only() {
        let mut c = coordinator(MemoryStore::new());

        let outcome = c.on_login_submitted("a@b.com");

        assert_eq!(outcome, LoginOutcome::SignedIn);
        assert!(c.is_authenticated());
        assert_eq!(c.surface().last_alert(), Some("Signed in as a@b.com (demo)"));
        assert_eq!(c.surface().text(&id("loginBtn")), Some("Account"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_blank_identity_refused_keeps_pending() {
        let mut c = coordinator(MemoryStore::new());
        c.request_guarded_action("Soup");

        let outcome = c.on_login_submitted("");

        assert_eq!(outcome, LoginOutcome::Refused);
        assert!(!c.is_authenticated());
        assert!(c.login_gate().is_open());
        assert_eq!(c.pending_intent(), Some("Soup"));
        assert_eq!(c.state(), CoordinatorState::AwaitingAuth);
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_with_unavailable_storage_still_resumes() {
        let mut c = coordinator(UnavailableStore);
        c.request_guarded_action("Soup");

        let outcome = c.on_login_submitted("a@b.com");

        assert!(matches!(outcome, LoginOutcome::Resumed { .. }));
        assert_eq!(c.current_identity(), Some("a@b.com"));
    }

    // =====================================================================
    // on_modal_cancelled()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_cancel_keeps_intent_and_returns_focus() {
        let mut c = coordinator(MemoryStore::new());
        c.request_guarded_action("Soup");

        assert!(c.on_modal_cancelled());

        assert_eq!(c.pending_intent(), Some("Soup"));
        assert_eq!(c.state(), CoordinatorState::AwaitingAuth);
        assert!(!c.login_gate().is_open());
        assert_eq!(c.surface().focused(), Some(&id("loginBtn")));
        assert!(!c.toast().is_visible());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_returns_focus_to_opener() {
        let mut c = coordinator(MemoryStore::new());
        c.surface_mut()
            .insert("item-soup", ElementState::shown());
        c.request_guarded_action_from("Soup", &id("item-soup"));

        c.on_modal_cancelled();

        assert_eq!(c.surface().focused(), Some(&id("item-soup")));
    }

    #[test]
    fn test_cancel_when_closed_returns_false() {
        let mut c = coordinator(MemoryStore::new());
        assert!(!c.on_modal_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_then_later_login_resumes_stale_intent() {
        let mut c = coordinator(MemoryStore::new());
        c.request_guarded_action("Soup");
        c.on_modal_cancelled();

        let outcome = c.on_login_submitted("a@b.com");

        assert_eq!(
            outcome,
            LoginOutcome::Resumed {
                intent: "Soup".into()
            }
        );
    }

    // =====================================================================
    // on_logout()
    // =====================================================================

    #[tokio::test(start_paused = true)]
    async fn test_logout_keeps_pending_intent() {
        let mut c = coordinator(MemoryStore::new());
        c.on_login_submitted("a@b.com");
        c.on_logout();
        c.request_guarded_action("Soup");
        c.on_modal_cancelled();

        c.on_logout();

        assert_eq!(c.pending_intent(), Some("Soup"));
        assert!(!c.is_authenticated());
        assert_eq!(c.surface().last_alert(), Some(SIGNED_OUT_ALERT));
    }

    #[test]
    fn test_logout_resets_label() {
        let mut c = coordinator(MemoryStore::new());
        c.on_login_submitted("a@b.com");

        c.on_logout();

        assert_eq!(c.surface().text(&id("loginBtn")), Some("Log in"));
        assert_eq!(c.surface().attribute(&id("loginBtn"), "title"), None);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(CoordinatorState::Idle.to_string(), "Idle");
        assert_eq!(CoordinatorState::AwaitingAuth.to_string(), "AwaitingAuth");
    }
}
