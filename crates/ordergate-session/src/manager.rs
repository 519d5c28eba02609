//! The auth session manager: the only place the session changes.
//!
//! ```text
//! restore() ──→ [Guest | Authenticated]      (once, at startup)
//! login(id) ──→ [Authenticated]  ──→ persist ──→ refresh label
//! logout()  ──→ [Guest]          ──→ clear   ──→ refresh label
//! ```
//!
//! Every transition ends with a UI refresh: the account button's label is
//! rewritten and the account menu (if the page has one) is closed, since
//! its entries only make sense for the state it was opened in.

use ordergate_surface::{ElementId, Surface};

use crate::{AccountLabel, KeyValueStore, PersistentSessionStore, Session};

/// The page elements whose content depends on the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountAffordance {
    /// The account / "Log in" button in the header.
    pub button: ElementId,
    /// The dropdown opened from that button. Not every page has one.
    pub menu: Option<ElementId>,
}

/// Owns the [`Session`] and keeps storage and the page in step with it.
///
/// Generic over the storage backend `K` so tests can swap in a store that
/// fails on every call.
pub struct AuthSessionManager<K> {
    session: Session,
    store: PersistentSessionStore<K>,
    affordance: AccountAffordance,
}

impl<K: KeyValueStore> AuthSessionManager<K> {
    /// Creates a manager holding a guest session.
    ///
    /// Call [`restore`](Self::restore) once the page is ready.
    pub fn new(
        store: PersistentSessionStore<K>,
        affordance: AccountAffordance,
    ) -> Self {
        Self {
            session: Session::guest(),
            store,
            affordance,
        }
    }

    /// Loads the persisted session and renders the matching label.
    ///
    /// A missing, partial, or unreadable record restores as a guest.
    pub fn restore<S: Surface>(&mut self, surface: &mut S) {
        self.session = self.store.load();
        tracing::info!(session = %self.session, "session restored");
        self.refresh(surface);
    }

    /// Signs in as `identity`.
    ///
    /// No credential check happens here. The new session is persisted
    /// best-effort; if storage fails the page stays signed in for its
    /// lifetime anyway.
    ///
    /// A blank identity is refused and leaves the session, storage and
    /// page untouched. Returns `true` if the visitor is now signed in.
    pub fn login<S: Surface>(
        &mut self,
        identity: impl Into<String>,
        surface: &mut S,
    ) -> bool {
        let session = Session::authenticated(identity);
        if !session.is_authenticated() {
            tracing::debug!("blank identity, login refused");
            return false;
        }
        self.session = session;
        self.store.save(&self.session);
        tracing::info!(session = %self.session, "signed in");
        self.refresh(surface);
        true
    }

    /// Signs out and forgets the persisted identity.
    pub fn logout<S: Surface>(&mut self, surface: &mut S) {
        self.session = Session::guest();
        self.store.clear();
        tracing::info!("signed out");
        self.refresh(surface);
    }

    /// Returns `true` while signed in.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// The signed-in identity, if any.
    pub fn current_identity(&self) -> Option<&str> {
        self.session.identity()
    }

    /// The current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// The label the account button should show right now.
    pub fn label(&self) -> AccountLabel {
        AccountLabel::for_session(&self.session)
    }

    /// The elements this manager keeps up to date.
    pub fn affordance(&self) -> &AccountAffordance {
        &self.affordance
    }

    /// The persistence layer.
    pub fn store(&self) -> &PersistentSessionStore<K> {
        &self.store
    }

    /// Gives up the persistence layer (to "reload" into a new page).
    pub fn into_store(self) -> PersistentSessionStore<K> {
        self.store
    }

    fn refresh<S: Surface>(&self, surface: &mut S) {
        let label = self.label();
        let button = &self.affordance.button;
        surface.set_text(button, label.text);
        surface.set_attribute(button, "title", label.title.as_deref());

        if let Some(menu) = &self.affordance.menu {
            surface.set_displayed(menu, false);
        }
    }
}
