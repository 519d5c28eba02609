//! Page chrome: mobile nav, account menu, and the notice dialog.
//!
//! None of this touches the session or the pending intent. It is the
//! show/hide plumbing around them, kept apart from the coordinator so the
//! coordinator's rules stay readable.

use ordergate_overlay::ModalGate;
use ordergate_protocol::ElementId;
use ordergate_surface::Surface;

use crate::PageConfig;

/// Shown by the account menu's "Profile" entry.
pub const NOT_IMPLEMENTED_NOTICE: &str =
    "Oops — we haven't been able to code that yet. Please wait for a future update.";

/// What activating the account button did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountButtonAction {
    /// Signed in: the account menu was opened (`true`) or closed.
    MenuToggled(bool),
    /// Signed in, but the page has no account menu.
    NoMenu,
    /// Guest: sent to the standalone login page.
    Redirected(String),
}

/// Navigation, account menu and notice dialog state.
#[derive(Debug)]
pub struct PageChrome {
    account_button: ElementId,
    account_menu: Option<ElementId>,
    /// Elements that count as "inside the account area" for outside-click
    /// dismissal.
    account_area: Vec<ElementId>,
    hamburger: Option<ElementId>,
    nav: Option<ElementId>,
    nav_first_link: Option<ElementId>,
    nav_expanded: bool,
    notice_gate: Option<ModalGate>,
    notice_message: Option<ElementId>,
    notice_focus: Option<ElementId>,
    login_page: String,
}

impl PageChrome {
    /// Builds the chrome for the elements `config` names.
    pub fn from_config(config: &PageConfig) -> Self {
        let el = &config.elements;
        let account_area = [
            Some(&el.account_button),
            el.account_wrap.as_ref(),
            el.account_menu.as_ref(),
            el.account_profile.as_ref(),
            el.account_logout.as_ref(),
        ]
        .into_iter()
        .flatten()
        .cloned()
        .collect();

        Self {
            account_button: el.account_button.clone(),
            account_menu: el.account_menu.clone(),
            account_area,
            hamburger: el.hamburger.clone(),
            nav: el.nav.clone(),
            nav_first_link: el.nav_first_link.clone(),
            nav_expanded: false,
            notice_gate: el.notice_backdrop.clone().map(ModalGate::new),
            notice_message: el.notice_message.clone(),
            notice_focus: el.notice_close.clone().or_else(|| el.notice_backdrop.clone()),
            login_page: config.login_page.clone(),
        }
    }

    // -- Mobile nav --------------------------------------------------------

    /// Expands or collapses the mobile nav. Returns the new state.
    ///
    /// Expanding moves focus to the first nav link.
    pub fn toggle_nav<S: Surface>(&mut self, surface: &mut S) -> bool {
        let expand = !self.nav_expanded;
        self.set_nav(surface, expand);
        if let (true, Some(link)) = (expand, &self.nav_first_link) {
            surface.focus(link);
        }
        expand
    }

    /// Collapses the mobile nav. Returns `true` if it was expanded.
    pub fn collapse_nav<S: Surface>(&mut self, surface: &mut S) -> bool {
        if !self.nav_expanded {
            return false;
        }
        self.set_nav(surface, false);
        true
    }

    pub fn is_nav_expanded(&self) -> bool {
        self.nav_expanded
    }

    pub fn hamburger(&self) -> Option<&ElementId> {
        self.hamburger.as_ref()
    }

    fn set_nav<S: Surface>(&mut self, surface: &mut S, expanded: bool) {
        if let Some(hamburger) = &self.hamburger {
            let value = if expanded { "true" } else { "false" };
            surface.set_attribute(hamburger, "aria-expanded", Some(value));
        }
        if let Some(nav) = &self.nav {
            surface.set_displayed(nav, expanded);
        }
        self.nav_expanded = expanded;
        tracing::debug!(expanded, "nav toggled");
    }

    // -- Account menu ------------------------------------------------------

    /// The account button was activated.
    pub fn on_account_button<S: Surface>(
        &mut self,
        surface: &mut S,
        authenticated: bool,
    ) -> AccountButtonAction {
        if !authenticated {
            tracing::debug!(url = %self.login_page, "guest sent to login page");
            surface.navigate(&self.login_page);
            return AccountButtonAction::Redirected(self.login_page.clone());
        }

        let Some(menu) = &self.account_menu else {
            return AccountButtonAction::NoMenu;
        };
        let open = !surface.is_displayed(menu);
        surface.set_displayed(menu, open);
        AccountButtonAction::MenuToggled(open)
    }

    /// Hides the account menu.
    pub fn close_account_menu<S: Surface>(&self, surface: &mut S) {
        if let Some(menu) = &self.account_menu {
            surface.set_displayed(menu, false);
        }
    }

    /// Whether a click along `path` landed outside the account area.
    pub fn is_outside_account(&self, path: &[ElementId]) -> bool {
        !path.iter().any(|el| self.account_area.contains(el))
    }

    /// Closes an open account menu if the click along `path` was outside
    /// it. Returns `true` if the menu was closed.
    pub fn dismiss_account_menu<S: Surface>(
        &self,
        surface: &mut S,
        path: &[ElementId],
    ) -> bool {
        let Some(menu) = &self.account_menu else {
            return false;
        };
        if !surface.is_displayed(menu) || !self.is_outside_account(path) {
            return false;
        }
        surface.set_displayed(menu, false);
        tracing::debug!("account menu closed by outside click");
        true
    }

    pub fn account_button(&self) -> &ElementId {
        &self.account_button
    }

    // -- Notice dialog -----------------------------------------------------

    /// Shows `message` in the notice dialog, or as an alert if the page
    /// has none.
    pub fn show_notice<S: Surface>(&mut self, surface: &mut S, message: &str) {
        let Some(gate) = &mut self.notice_gate else {
            surface.alert(message);
            return;
        };
        if let Some(el) = &self.notice_message {
            surface.set_text(el, message);
        }
        let focus = self
            .notice_focus
            .clone()
            .unwrap_or_else(|| gate.backdrop().clone());
        gate.open(surface, &focus);
    }

    /// Closes the notice dialog, returning focus to the account button.
    /// Returns `true` if it was open.
    pub fn close_notice<S: Surface>(&mut self, surface: &mut S) -> bool {
        match &mut self.notice_gate {
            Some(gate) => gate.close(surface, &self.account_button),
            None => false,
        }
    }

    pub fn notice_gate(&self) -> Option<&ModalGate> {
        self.notice_gate.as_ref()
    }

    pub fn is_notice_open(&self) -> bool {
        self.notice_gate.as_ref().is_some_and(ModalGate::is_open)
    }

    /// The account menu's "Profile" entry.
    pub fn open_profile<S: Surface>(&mut self, surface: &mut S) {
        self.show_notice(surface, NOT_IMPLEMENTED_NOTICE);
        self.close_account_menu(surface);
    }
}
