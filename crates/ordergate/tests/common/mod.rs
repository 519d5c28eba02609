//! Shared fixtures: the stock menu page, rendered headless.

#![allow(dead_code)]

use ordergate::prelude::*;

/// Every element the default `PageConfig` names, in its initial state.
pub fn stock_surface() -> HeadlessSurface {
    HeadlessSurface::new()
        .with_element("loginBtn", ElementState::shown().with_text("Log in"))
        .with_element("accountWrap", ElementState::shown())
        .with_element("accountMenu", ElementState::hidden())
        .with_element("accountProfile", ElementState::shown())
        .with_element("accountLogout", ElementState::shown())
        .with_element("modalBackdrop", ElementState::hidden())
        .with_element("loginForm", ElementState::shown())
        .with_element("cancelLogin", ElementState::shown())
        .with_element("email", ElementState::shown())
        .with_element("toast", ElementState::hidden())
        .with_element("toastInner", ElementState::shown())
        .with_element("noticeBackdrop", ElementState::hidden())
        .with_element("noticeClose", ElementState::shown())
        .with_element("noticeMessage", ElementState::shown())
        .with_element("hamburger", ElementState::shown())
        .with_element("main-nav", ElementState::hidden())
        .with_element("navHome", ElementState::shown())
        .with_element("item-veggie-combo", ElementState::shown())
        .with_element("item-soup", ElementState::shown())
}

/// The stock page on `store`.
pub fn stock_page<K>(store: K) -> MenuPage<HeadlessSurface, K>
where
    K: KeyValueStore + Send + 'static,
{
    MenuPage::builder()
        .surface(stock_surface())
        .store(store)
        .build()
}

/// Drops `page` and builds a fresh stock page on the same storage, the
/// way a browser reload keeps `localStorage`.
pub fn reload<K>(page: MenuPage<HeadlessSurface, K>) -> MenuPage<HeadlessSurface, K>
where
    K: KeyValueStore + Send + 'static,
{
    let (_surface, store) = page.into_parts();
    stock_page(store)
}

pub fn id(raw: &str) -> ElementId {
    ElementId::new(raw)
}
