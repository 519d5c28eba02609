//! `MenuPage` builder and event loop.
//!
//! This is the entry point for running a menu page. It ties together all
//! the layers: surface → session → overlay → coordinator, and routes
//! [`PageEvent`]s to them.
//!
//! ```text
//!  PageHandle ──(mpsc)──→ MenuPage::run ──→ dispatch ──→ coordinator / chrome
//!                              ↑
//!                  toast timer expiries
//! ```
//!
//! Everything happens on one task. Events and timer expiries are handled
//! strictly one at a time, in arrival order.

use ordergate_overlay::{ModalGate, ToastNotifier};
use ordergate_protocol::{Codec, ElementId, InboundMessage, JsonCodec};
use ordergate_session::{
    AccountAffordance, AuthSessionManager, KeyValueStore, PersistentSessionStore,
    StorageBackend, StorageConfig,
};
use ordergate_surface::{HeadlessSurface, Surface};
use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::chrome::{AccountButtonAction, PageChrome};
use crate::coordinator::{
    CoordinatorState, GuardedOutcome, LoginOutcome, PendingActionCoordinator,
};
use crate::event::{Key, PageEvent};
use crate::{OrdergateError, PageConfig};

// ---------------------------------------------------------------------------
// Dispatched
// ---------------------------------------------------------------------------

/// What a single event ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    /// A guarded menu item was activated.
    Order(GuardedOutcome),
    /// A login arrived (form or cross-context message).
    Login(LoginOutcome),
    /// The login dialog was cancelled.
    LoginCancelled,
    /// Escape was pressed.
    Escape {
        login_closed: bool,
        notice_closed: bool,
        nav_collapsed: bool,
    },
    Account(AccountButtonAction),
    LoggedOut,
    ProfileOpened,
    NoticeClosed,
    /// The mobile nav was toggled to the given state.
    Nav(bool),
    /// The event reached nothing the page handles.
    Ignored,
}

// ---------------------------------------------------------------------------
// MenuPageBuilder
// ---------------------------------------------------------------------------

type StoreFactory<K> = Box<dyn FnOnce(&StorageConfig) -> K + Send>;

/// Builder for assembling a [`MenuPage`].
///
/// # Example
///
/// ```rust,ignore
/// let page = MenuPage::builder()
///     .config(PageConfig::load("page.json")?)
///     .surface(my_surface)
///     .build();
/// ```
pub struct MenuPageBuilder<S, K, C> {
    config: PageConfig,
    surface: S,
    store: StoreFactory<K>,
    codec: C,
}

impl MenuPageBuilder<HeadlessSurface, StorageBackend, JsonCodec> {
    /// Creates a builder with the default config, an empty headless
    /// surface, the storage backend named by the config, and `JsonCodec`.
    pub fn new() -> Self {
        Self {
            config: PageConfig::default(),
            surface: HeadlessSurface::new(),
            store: Box::new(StorageBackend::from_config),
            codec: JsonCodec,
        }
    }
}

impl Default for MenuPageBuilder<HeadlessSurface, StorageBackend, JsonCodec> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, K, C> MenuPageBuilder<S, K, C> {
    /// Sets the page configuration.
    pub fn config(mut self, config: PageConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the surface the page renders to.
    pub fn surface<S2: Surface>(self, surface: S2) -> MenuPageBuilder<S2, K, C> {
        MenuPageBuilder {
            config: self.config,
            surface,
            store: self.store,
            codec: self.codec,
        }
    }

    /// Uses `store` for persistence instead of the config's `storage`.
    pub fn store<K2>(self, store: K2) -> MenuPageBuilder<S, K2, C>
    where
        K2: KeyValueStore + Send + 'static,
    {
        MenuPageBuilder {
            config: self.config,
            surface: self.surface,
            store: Box::new(move |_: &StorageConfig| store),
            codec: self.codec,
        }
    }

    /// Sets the codec for cross-context messages.
    pub fn codec<C2: Codec>(self, codec: C2) -> MenuPageBuilder<S, K, C2> {
        MenuPageBuilder {
            config: self.config,
            surface: self.surface,
            store: self.store,
            codec,
        }
    }
}

impl<S: Surface, K: KeyValueStore, C: Codec> MenuPageBuilder<S, K, C> {
    /// Assembles the page and restores the persisted session.
    pub fn build(self) -> MenuPage<S, K, C> {
        let config = self.config.validated();
        let elements = &config.elements;

        let backend = (self.store)(&config.storage);
        let auth = AuthSessionManager::new(
            PersistentSessionStore::new(backend),
            AccountAffordance {
                button: elements.account_button.clone(),
                menu: elements.account_menu.clone(),
            },
        );
        let coordinator = PendingActionCoordinator::new(
            self.surface,
            auth,
            ModalGate::new(elements.login_backdrop.clone()),
            ToastNotifier::new(elements.toast_elements(), &config.toast),
            elements.identity_input.clone(),
        );
        let chrome = PageChrome::from_config(&config);

        let mut page = MenuPage {
            config,
            coordinator,
            chrome,
            codec: self.codec,
        };
        page.coordinator.restore();

        tracing::info!(
            menu_items = page.config.menu_items.len(),
            authenticated = page.coordinator.is_authenticated(),
            "menu page ready"
        );
        page
    }
}

// ---------------------------------------------------------------------------
// MenuPage
// ---------------------------------------------------------------------------

/// A running menu page.
///
/// Drive it synchronously with [`dispatch`](Self::dispatch) and
/// [`fire_due_timers`](Self::fire_due_timers), or hand it a channel and
/// call [`run`](Self::run).
pub struct MenuPage<S, K, C = JsonCodec> {
    config: PageConfig,
    coordinator: PendingActionCoordinator<S, K>,
    chrome: PageChrome,
    codec: C,
}

impl MenuPage<HeadlessSurface, StorageBackend, JsonCodec> {
    /// Creates a new builder.
    pub fn builder() -> MenuPageBuilder<HeadlessSurface, StorageBackend, JsonCodec> {
        MenuPageBuilder::new()
    }
}

impl<S: Surface, K: KeyValueStore, C: Codec> MenuPage<S, K, C> {
    /// Runs the page loop until every [`PageHandle`] is dropped, then
    /// hands the page back.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<PageEvent>) -> Self {
        tracing::info!("menu page running");

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        self.dispatch(event);
                    }
                    None => break,
                },
                expired = self.coordinator.next_toast_timer() => {
                    self.coordinator.handle_toast_timer(expired);
                }
            }
        }

        tracing::info!("menu page stopped");
        self
    }

    /// Routes one event.
    pub fn dispatch(&mut self, event: PageEvent) -> Dispatched {
        tracing::debug!(kind = event.kind(), "page event");
        match event {
            PageEvent::Click { target, path } => self.on_click(&target, &path),
            PageEvent::KeyDown { target, key } => self.on_key(&target, &key),
            PageEvent::Submit { form, identity } => self.on_submit(&form, &identity),
            PageEvent::Message(raw) => self.on_message(&raw),
        }
    }

    /// Runs toast timers due at or before `now`.
    pub fn fire_due_timers(&mut self, now: Instant) -> usize {
        self.coordinator.fire_due_timers(now)
    }

    fn on_click(&mut self, target: &ElementId, path: &[ElementId]) -> Dispatched {
        let routed = self.route_click(target, path);

        // Document-level listener: runs after the target's own handler.
        self.chrome
            .dismiss_account_menu(self.coordinator.surface_mut(), path);

        routed
    }

    fn route_click(&mut self, target: &ElementId, path: &[ElementId]) -> Dispatched {
        if let Some((item, name)) = self.menu_item_in(path) {
            return Dispatched::Order(
                self.coordinator.request_guarded_action_from(&name, &item),
            );
        }

        let elements = &self.config.elements;
        if *target == elements.login_cancel
            || self.coordinator.login_gate().is_backdrop_click(target)
        {
            self.coordinator.on_modal_cancelled();
            return Dispatched::LoginCancelled;
        }

        if *target == elements.account_button {
            let authenticated = self.coordinator.is_authenticated();
            let action = self
                .chrome
                .on_account_button(self.coordinator.surface_mut(), authenticated);
            return Dispatched::Account(action);
        }

        if elements.account_logout.as_ref() == Some(target) {
            self.coordinator.on_logout();
            self.chrome.close_account_menu(self.coordinator.surface_mut());
            return Dispatched::LoggedOut;
        }

        if elements.account_profile.as_ref() == Some(target) {
            self.chrome.open_profile(self.coordinator.surface_mut());
            return Dispatched::ProfileOpened;
        }

        let notice_backdrop_click = self
            .chrome
            .notice_gate()
            .is_some_and(|gate| gate.is_backdrop_click(target));
        if elements.notice_close.as_ref() == Some(target) || notice_backdrop_click {
            self.chrome.close_notice(self.coordinator.surface_mut());
            return Dispatched::NoticeClosed;
        }

        if self.chrome.hamburger() == Some(target) {
            let expanded = self.chrome.toggle_nav(self.coordinator.surface_mut());
            return Dispatched::Nav(expanded);
        }

        Dispatched::Ignored
    }

    fn on_key(&mut self, target: &ElementId, key: &Key) -> Dispatched {
        if *key == Key::Escape {
            // Fixed order: login dialog, notice, nav.
            let login_closed = self.coordinator.login_gate().is_open()
                && self.coordinator.on_modal_cancelled();
            let notice_closed = self.chrome.close_notice(self.coordinator.surface_mut());
            let nav_collapsed = self.chrome.collapse_nav(self.coordinator.surface_mut());
            return Dispatched::Escape {
                login_closed,
                notice_closed,
                nav_collapsed,
            };
        }

        if key.is_activation() {
            if let Some(item) = self.config.menu_item(target) {
                let name = item.display_name().to_string();
                return Dispatched::Order(
                    self.coordinator.request_guarded_action_from(&name, target),
                );
            }
        }

        Dispatched::Ignored
    }

    fn on_submit(&mut self, form: &ElementId, identity: &str) -> Dispatched {
        if *form != self.config.elements.login_form {
            return Dispatched::Ignored;
        }
        let identity = identity.trim();
        if identity.is_empty() {
            tracing::debug!("login form submitted without identity, ignored");
            return Dispatched::Ignored;
        }
        Dispatched::Login(self.coordinator.on_login_submitted(identity))
    }

    fn on_message(&mut self, raw: &[u8]) -> Dispatched {
        match InboundMessage::decode(&self.codec, raw) {
            Ok(InboundMessage::Login { identity }) => {
                tracing::debug!(%identity, "cross-context login received");
                Dispatched::Login(self.coordinator.on_login_submitted(&identity))
            }
            Err(e) => {
                tracing::debug!(error = %e, "cross-context message ignored");
                Dispatched::Ignored
            }
        }
    }

    /// The innermost menu item on `path` and its display name.
    fn menu_item_in(&self, path: &[ElementId]) -> Option<(ElementId, String)> {
        path.iter()
            .find_map(|el| self.config.menu_item(el))
            .map(|item| (item.element.clone(), item.display_name().to_string()))
    }

    // -- Accessors ---------------------------------------------------------

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn coordinator(&self) -> &PendingActionCoordinator<S, K> {
        &self.coordinator
    }

    pub fn chrome(&self) -> &PageChrome {
        &self.chrome
    }

    pub fn surface(&self) -> &S {
        self.coordinator.surface()
    }

    pub fn surface_mut(&mut self) -> &mut S {
        self.coordinator.surface_mut()
    }

    pub fn state(&self) -> CoordinatorState {
        self.coordinator.state()
    }

    pub fn pending_intent(&self) -> Option<&str> {
        self.coordinator.pending_intent()
    }

    pub fn is_authenticated(&self) -> bool {
        self.coordinator.is_authenticated()
    }

    pub fn current_identity(&self) -> Option<&str> {
        self.coordinator.current_identity()
    }

    /// Tears the page down into its surface and storage backend, e.g. to
    /// build a "reloaded" page on the same storage.
    pub fn into_parts(self) -> (S, K) {
        let (surface, auth) = self.coordinator.into_parts();
        (surface, auth.into_store().into_backend())
    }
}

impl<S, K, C> std::fmt::Debug for MenuPage<S, K, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MenuPage")
            .field("coordinator", &self.coordinator)
            .field("chrome", &self.chrome)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// PageHandle
// ---------------------------------------------------------------------------

/// Cloneable sender of events into a running [`MenuPage`].
///
/// Dropping every handle stops the page loop.
#[derive(Debug, Clone)]
pub struct PageHandle<C = JsonCodec> {
    tx: mpsc::UnboundedSender<PageEvent>,
    codec: C,
}

impl PageHandle<JsonCodec> {
    /// Creates a handle and the receiver to pass to [`MenuPage::run`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        Self::with_codec(JsonCodec)
    }
}

impl<C: Codec> PageHandle<C> {
    /// Like [`channel`](PageHandle::channel) with a custom codec for
    /// [`post_message`](Self::post_message).
    pub fn with_codec(codec: C) -> (Self, mpsc::UnboundedReceiver<PageEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, codec }, rx)
    }

    /// Sends any event.
    ///
    /// # Errors
    /// [`OrdergateError::ChannelClosed`] if the page has stopped.
    pub fn send(&self, event: PageEvent) -> Result<(), OrdergateError> {
        self.tx
            .send(event)
            .map_err(|_| OrdergateError::ChannelClosed)
    }

    /// Clicks `target`.
    pub fn click(&self, target: impl Into<ElementId>) -> Result<(), OrdergateError> {
        self.send(PageEvent::click(target))
    }

    /// Presses `key` on `target`.
    pub fn key(&self, target: impl Into<ElementId>, key: Key) -> Result<(), OrdergateError> {
        self.send(PageEvent::key(target, key))
    }

    /// Submits `form` with `identity` in its identity field.
    pub fn submit(
        &self,
        form: impl Into<ElementId>,
        identity: impl Into<String>,
    ) -> Result<(), OrdergateError> {
        self.send(PageEvent::submit(form, identity))
    }

    /// Posts a message as another browsing context would.
    ///
    /// # Errors
    /// [`OrdergateError::Protocol`] if encoding fails,
    /// [`OrdergateError::ChannelClosed`] if the page has stopped.
    pub fn post_message(&self, message: &InboundMessage) -> Result<(), OrdergateError> {
        let raw = self.codec.encode(message)?;
        self.send(PageEvent::Message(raw))
    }
}

#[cfg(test)]
mod tests {
    use ordergate_session::MemoryStore;
    use ordergate_surface::ElementState;

    use super::*;

    fn id(raw: &str) -> ElementId {
        ElementId::new(raw)
    }

    fn page() -> MenuPage<HeadlessSurface, MemoryStore, JsonCodec> {
        let surface = HeadlessSurface::new()
            .with_element("loginBtn", ElementState::shown())
            .with_element("modalBackdrop", ElementState::hidden())
            .with_element("email", ElementState::shown());
        MenuPage::builder()
            .surface(surface)
            .store(MemoryStore::new())
            .build()
    }

    #[test]
    fn test_build_restores_guest_label() {
        let page = page();
        assert!(!page.is_authenticated());
        assert_eq!(page.surface().text(&id("loginBtn")), Some("Log in"));
    }

    #[test]
    fn test_dispatch_unknown_click_is_ignored() {
        let mut page = page();
        assert_eq!(page.dispatch(PageEvent::click("footer")), Dispatched::Ignored);
    }

    #[test]
    fn test_dispatch_submit_other_form_is_ignored() {
        let mut page = page();
        let result = page.dispatch(PageEvent::submit("newsletter", "a@b.com"));
        assert_eq!(result, Dispatched::Ignored);
        assert!(!page.is_authenticated());
    }

    #[test]
    fn test_dispatch_blank_submit_is_ignored() {
        let mut page = page();
        let result = page.dispatch(PageEvent::submit("loginForm", "   "));
        assert_eq!(result, Dispatched::Ignored);
        assert!(!page.is_authenticated());
    }

    #[test]
    fn test_dispatch_malformed_message_is_ignored() {
        let mut page = page();
        let result = page.dispatch(PageEvent::Message(b"{not json".to_vec()));
        assert_eq!(result, Dispatched::Ignored);
    }

    #[test]
    fn test_page_handle_send_after_receiver_dropped_fails() {
        let (handle, rx) = PageHandle::channel();
        drop(rx);
        let err = handle.click("loginBtn").unwrap_err();
        assert!(matches!(err, OrdergateError::ChannelClosed));
    }

    #[test]
    fn test_page_handle_post_message_encodes_json() {
        let (handle, mut rx) = PageHandle::channel();
        handle.post_message(&InboundMessage::login("a@b.com")).unwrap();

        let Ok(PageEvent::Message(raw)) = rx.try_recv() else {
            panic!("expected a message event");
        };
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(value["type"], "login");
        assert_eq!(value["identity"], "a@b.com");
    }
}
