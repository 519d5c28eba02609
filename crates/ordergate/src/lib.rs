//! # Ordergate
//!
//! Session-gated ordering for a menu page.
//!
//! A guest who tries to order is asked to log in; the order they tried to
//! place is remembered and resumed as soon as the login completes, whether
//! it happens in the page's own dialog or on the standalone login page.
//! Signed-in visitors order straight away.
//!
//! The page itself is abstract: everything is written through a
//! [`Surface`](ordergate_surface::Surface), and
//! [`HeadlessSurface`](ordergate_surface::HeadlessSurface) lets the whole
//! page run without a browser.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ordergate::prelude::*;
//!
//! # async fn demo() -> Result<(), OrdergateError> {
//! let page = MenuPage::builder()
//!     .config(PageConfig::default())
//!     .surface(HeadlessSurface::new())
//!     .build();
//!
//! let (handle, events) = PageHandle::channel();
//! handle.click("item-soup")?;
//! handle.submit("loginForm", "a@b.com")?;
//! drop(handle);
//!
//! let page = page.run(events).await;
//! assert!(page.is_authenticated());
//! # Ok(())
//! # }
//! ```

mod chrome;
mod config;
mod coordinator;
mod error;
mod event;
mod page;

pub use chrome::{AccountButtonAction, NOT_IMPLEMENTED_NOTICE, PageChrome};
pub use config::{DEFAULT_LOGIN_PAGE, MenuItem, PageConfig, PageElements};
pub use coordinator::{
    CoordinatorState, GuardedOutcome, LOGIN_REQUIRED_TOAST, LoginOutcome,
    PendingActionCoordinator, SIGNED_OUT_ALERT,
};
pub use error::OrdergateError;
pub use event::{Key, PageEvent};
pub use page::{Dispatched, MenuPage, MenuPageBuilder, PageHandle};

/// Installs a `tracing` subscriber that honors `RUST_LOG`, falling back to
/// `default_filter` when it is unset or invalid.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(default_filter: &str) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
}

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::{
        Dispatched, GuardedOutcome, Key, LoginOutcome, MenuItem, MenuPage,
        OrdergateError, PageConfig, PageElements, PageEvent, PageHandle,
        PendingActionCoordinator,
    };
    pub use ordergate_overlay::{ModalGate, ToastConfig, ToastNotifier};
    pub use ordergate_protocol::{Codec, ElementId, InboundMessage, JsonCodec};
    pub use ordergate_session::{
        JsonFileStore, KeyValueStore, MemoryStore, Session, StorageBackend,
        StorageConfig, UnavailableStore,
    };
    pub use ordergate_surface::{ElementState, HeadlessSurface, Surface};
}
