//! Page configuration: which elements the page has and how it behaves.

use std::collections::HashSet;
use std::path::Path;

use ordergate_overlay::{ToastConfig, ToastElements};
use ordergate_protocol::ElementId;
use ordergate_session::StorageConfig;
use serde::{Deserialize, Serialize};

use crate::OrdergateError;

/// Where a guest is sent when they activate the account button.
pub const DEFAULT_LOGIN_PAGE: &str = "login.html";

// ---------------------------------------------------------------------------
// MenuItem
// ---------------------------------------------------------------------------

/// A guarded, orderable entry on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// The element that is clicked or key-activated to order.
    pub element: ElementId,
    /// The item's name (`data-name`).
    #[serde(default)]
    pub name: Option<String>,
    /// The item's accessible label, used when there is no name.
    #[serde(default)]
    pub label: Option<String>,
}

impl MenuItem {
    /// An item with an explicit name.
    pub fn named(element: impl Into<ElementId>, name: impl Into<String>) -> Self {
        Self {
            element: element.into(),
            name: Some(name.into()),
            label: None,
        }
    }

    /// The name used in order messages: the name, else the label, else
    /// `"item"`. Empty strings don't count.
    pub fn display_name(&self) -> &str {
        [&self.name, &self.label]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.is_empty())
            .unwrap_or("item")
    }
}

// ---------------------------------------------------------------------------
// PageElements
// ---------------------------------------------------------------------------

/// Element ids for every affordance the page knows about.
///
/// Required elements are plain ids. Optional ones are `Option`s: pages
/// that lack them simply don't get that behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageElements {
    /// The "Log in" / "Account" button in the header.
    pub account_button: ElementId,
    pub account_menu: Option<ElementId>,
    /// Container of the account button and menu. Clicks outside it close
    /// the menu.
    pub account_wrap: Option<ElementId>,
    pub account_profile: Option<ElementId>,
    pub account_logout: Option<ElementId>,

    pub login_backdrop: ElementId,
    pub login_form: ElementId,
    pub login_cancel: ElementId,
    /// Receives focus when the login dialog opens.
    pub identity_input: ElementId,

    pub toast: Option<ElementId>,
    /// Inner text element of the toast. When absent the toast container
    /// holds the text itself.
    pub toast_message: Option<ElementId>,

    pub notice_backdrop: Option<ElementId>,
    pub notice_close: Option<ElementId>,
    pub notice_message: Option<ElementId>,

    pub hamburger: Option<ElementId>,
    pub nav: Option<ElementId>,
    /// Focused when the mobile nav expands.
    pub nav_first_link: Option<ElementId>,
}

impl Default for PageElements {
    fn default() -> Self {
        let id = ElementId::new;
        Self {
            account_button: id("loginBtn"),
            account_menu: Some(id("accountMenu")),
            account_wrap: Some(id("accountWrap")),
            account_profile: Some(id("accountProfile")),
            account_logout: Some(id("accountLogout")),
            login_backdrop: id("modalBackdrop"),
            login_form: id("loginForm"),
            login_cancel: id("cancelLogin"),
            identity_input: id("email"),
            toast: Some(id("toast")),
            toast_message: Some(id("toastInner")),
            notice_backdrop: Some(id("noticeBackdrop")),
            notice_close: Some(id("noticeClose")),
            notice_message: Some(id("noticeMessage")),
            hamburger: Some(id("hamburger")),
            nav: Some(id("main-nav")),
            nav_first_link: Some(id("navHome")),
        }
    }
}

impl PageElements {
    /// The toast's elements, if the page has a toast.
    pub fn toast_elements(&self) -> Option<ToastElements> {
        let container = self.toast.clone()?;
        let message = self.toast_message.clone().unwrap_or_else(|| container.clone());
        Some(ToastElements { container, message })
    }
}

// ---------------------------------------------------------------------------
// PageConfig
// ---------------------------------------------------------------------------

/// Everything needed to assemble a [`MenuPage`](crate::MenuPage).
///
/// Every field has a default matching the stock menu page, so a JSON
/// config only needs the parts that differ:
///
/// ```json
/// {
///   "menu_items": [{ "element": "item-soup", "name": "Soup" }],
///   "toast": { "duration_ms": 2000 },
///   "storage": { "kind": "file", "path": "session.json" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub elements: PageElements,
    pub menu_items: Vec<MenuItem>,
    pub toast: ToastConfig,
    /// URL of the standalone login page.
    pub login_page: String,
    pub storage: StorageConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            elements: PageElements::default(),
            menu_items: vec![
                MenuItem::named("item-veggie-combo", "Veggie Combo"),
                MenuItem::named("item-soup", "Soup"),
            ],
            toast: ToastConfig::default(),
            login_page: DEFAULT_LOGIN_PAGE.to_string(),
            storage: StorageConfig::default(),
        }
    }
}

impl PageConfig {
    /// Parses a JSON config. Missing fields take their defaults.
    ///
    /// # Errors
    /// [`OrdergateError::Config`] if the text isn't a valid config.
    pub fn from_json(text: &str) -> Result<Self, OrdergateError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.validated())
    }

    /// Reads and parses a JSON config file.
    ///
    /// # Errors
    /// [`OrdergateError::ConfigIo`] if the file can't be read,
    /// [`OrdergateError::Config`] if its contents aren't a valid config.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, OrdergateError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            OrdergateError::ConfigIo {
                path: path.to_path_buf(),
                source,
            }
        })?;
        tracing::debug!(path = %path.display(), "loaded page config");
        Self::from_json(&text)
    }

    /// Fixes values the page can't work with.
    ///
    /// - zero toast duration → default
    /// - empty login page → `login.html`
    /// - a menu element listed twice → later entries dropped
    pub fn validated(mut self) -> Self {
        self.toast = self.toast.validated();

        if self.login_page.trim().is_empty() {
            tracing::warn!("login_page is empty, using {DEFAULT_LOGIN_PAGE}");
            self.login_page = DEFAULT_LOGIN_PAGE.to_string();
        }

        let mut seen = HashSet::new();
        self.menu_items.retain(|item| {
            let first = seen.insert(item.element.clone());
            if !first {
                tracing::warn!(element = %item.element, "duplicate menu item dropped");
            }
            first
        });

        self
    }

    /// Looks up the menu item behind `element`.
    pub fn menu_item(&self, element: &ElementId) -> Option<&MenuItem> {
        self.menu_items.iter().find(|item| item.element == *element)
    }
}
