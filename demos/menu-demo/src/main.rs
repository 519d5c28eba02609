use std::time::Duration;

use ordergate::prelude::*;

// ---------------------------------------------------------------------------
// Page fixture
// ---------------------------------------------------------------------------

/// A headless page containing every element `config` names.
fn surface_for(config: &PageConfig) -> HeadlessSurface {
    let el = &config.elements;
    let hidden = [
        el.account_menu.as_ref(),
        Some(&el.login_backdrop),
        el.toast.as_ref(),
        el.notice_backdrop.as_ref(),
        el.nav.as_ref(),
    ];
    let shown = [
        Some(&el.account_button),
        el.account_wrap.as_ref(),
        el.account_profile.as_ref(),
        el.account_logout.as_ref(),
        Some(&el.login_form),
        Some(&el.login_cancel),
        Some(&el.identity_input),
        el.toast_message.as_ref(),
        el.notice_close.as_ref(),
        el.notice_message.as_ref(),
        el.hamburger.as_ref(),
        el.nav_first_link.as_ref(),
    ];

    let mut surface = HeadlessSurface::new();
    for id in hidden.into_iter().flatten() {
        surface.insert(id.clone(), ElementState::hidden());
    }
    for id in shown.into_iter().flatten() {
        surface.insert(id.clone(), ElementState::shown());
    }
    for item in &config.menu_items {
        surface.insert(item.element.clone(), ElementState::shown());
    }
    surface
}

type DemoPage = MenuPage<HeadlessSurface, StorageBackend>;

fn open_page(config: &PageConfig, store: StorageBackend) -> DemoPage {
    MenuPage::builder()
        .config(config.clone())
        .surface(surface_for(config))
        .store(store)
        .build()
}

/// Drops `page` and opens a fresh one on the same storage.
fn reload(config: &PageConfig, page: DemoPage) -> DemoPage {
    let (_surface, store) = page.into_parts();
    open_page(config, store)
}

fn report(step: &str, page: &DemoPage) {
    let button = &page.config().elements.account_button;
    println!("== {step}");
    println!("   session:  {}", page.coordinator().session());
    println!("   state:    {}", page.state());
    println!("   pending:  {}", page.pending_intent().unwrap_or("-"));
    println!("   button:   {}", page.surface().text(button).unwrap_or(""));
    let dialog = if page.coordinator().login_gate().is_open() { "open" } else { "closed" };
    let toast = if page.coordinator().toast().is_visible() { "visible" } else { "hidden" };
    println!("   dialog:   {dialog}");
    println!("   toast:    {toast}");
    if let Some(alert) = page.surface().last_alert() {
        println!("   alert:    {alert}");
    }
}

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

async fn walkthrough(config: PageConfig) -> Result<(), OrdergateError> {
    let store = StorageBackend::from_config(&config.storage);
    let mut page = open_page(&config, store);
    report("page opened", &page);

    let Some(first) = config.menu_items.first() else {
        tracing::warn!("config has no menu items, nothing to order");
        return Ok(());
    };
    let second = config.menu_items.get(1).unwrap_or(first);

    // A guest orders, is asked to log in, and the order resumes.
    page.dispatch(PageEvent::click(first.element.clone()));
    report(&format!("guest orders {}", first.display_name()), &page);

    page.dispatch(PageEvent::submit(config.elements.login_form.clone(), "a@b.com"));
    report("login submitted", &page);

    // The session survives a reload, so the next order goes through.
    let mut page = reload(&config, page);
    page.dispatch(PageEvent::click(second.element.clone()));
    report(&format!("reloaded, orders {}", second.display_name()), &page);

    // Sign out through the account menu.
    page.dispatch(PageEvent::click(config.elements.account_button.clone()));
    if let Some(logout) = &config.elements.account_logout {
        page.dispatch(PageEvent::click(logout.clone()));
    }
    let page = reload(&config, page);
    report("signed out and reloaded", &page);

    // Same flow through the event loop, with the login arriving from the
    // standalone login page and the toast retracting on its own.
    let (handle, events) = PageHandle::channel();
    let target = first.element.clone();
    let wait = config.toast.duration() + Duration::from_millis(300);
    let driver = async move {
        handle.click(target)?;
        tokio::time::sleep(wait).await;
        handle.post_message(&InboundMessage::login("c@d.com"))?;
        Ok::<_, OrdergateError>(())
    };
    let (page, sent) = tokio::join!(page.run(events), driver);
    sent?;
    report("login via message", &page);

    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    ordergate::init_tracing("info,ordergate=debug");

    let config = match std::env::args().nth(1) {
        Some(path) => PageConfig::load(&path)?,
        None => PageConfig::default(),
    };
    tracing::info!(items = config.menu_items.len(), "starting menu demo");

    walkthrough(config).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_for_contains_every_configured_element() {
        let config = PageConfig::default();
        let surface = surface_for(&config);

        assert!(surface.contains(&config.elements.account_button));
        assert!(surface.contains(&ElementId::new("item-soup")));
        assert!(!surface.is_displayed(&config.elements.login_backdrop));
    }

    #[tokio::test(start_paused = true)]
    async fn test_walkthrough_default_config_completes() {
        walkthrough(PageConfig::default()).await.unwrap();
    }
}
