use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::dom;
use crate::error::SiteError;

/// Target id of an in-page anchor, `None` for `#` alone or non-fragment links.
pub fn fragment_id(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Offset that leaves the target just below the fixed navbar.
pub fn scroll_target(target_top: f64, navbar_height: f64) -> f64 {
    target_top - navbar_height
}

pub fn scroll_window_to(window: &Window, top: f64, smooth: bool) {
    let options = ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(if smooth {
        ScrollBehavior::Smooth
    } else {
        ScrollBehavior::Instant
    });
    window.scroll_to_with_scroll_to_options(&options);
}

fn navbar_height(document: &Document) -> f64 {
    match document
        .query_selector(".navbar")
        .ok()
        .flatten()
        .and_then(|navbar| navbar.dyn_into::<HtmlElement>().ok())
    {
        Some(navbar) => f64::from(navbar.offset_height()),
        None => {
            warn!("No .navbar to offset smooth scrolling against");
            0.0
        }
    }
}

fn scroll_to_anchor(window: &Window, document: &Document, link: &Element, smooth: bool) {
    let href = link.get_attribute("href").unwrap_or_default();
    let Some(target) = fragment_id(&href)
        .and_then(|id| document.get_element_by_id(id))
        .and_then(|target| target.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };

    let top = scroll_target(f64::from(target.offset_top()), navbar_height(document));
    scroll_window_to(window, top, smooth);
}

/// Intercepts `a[href^="#"]` clicks and scrolls to the target ourselves.
pub fn install(window: &Window, document: &Document, smooth: bool) -> Result<(), SiteError> {
    let links = dom::query_all(document, "a[href^=\"#\"]")?;
    for link in &links {
        let window = window.clone();
        let document = document.clone();
        let anchor = link.clone();
        dom::listen(link, "click", move |event| {
            event.prevent_default();
            scroll_to_anchor(&window, &document, &anchor, smooth);
        })?;
    }

    debug!("Smooth scrolling installed on {} anchors", links.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fragment_id_strips_the_hash() {
        assert_eq!(fragment_id("#contact"), Some("contact"));
        assert_eq!(fragment_id("#"), None);
        assert_eq!(fragment_id(""), None);
        assert_eq!(fragment_id("/about#team"), None);
    }

    #[test]
    fn target_compensates_for_navbar() {
        assert_eq!(scroll_target(1200.0, 70.0), 1130.0);
        assert_eq!(scroll_target(0.0, 70.0), -70.0);
        assert_eq!(scroll_target(300.0, 0.0), 300.0);
    }
}
