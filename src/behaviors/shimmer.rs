use std::cell::Cell;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement};

use crate::dom;
use crate::error::SiteError;

pub const STYLE_ID: &str = "shimmer-style";

const OVERLAY_STYLE: &str = "
    position: absolute;
    top: 0;
    left: -100%;
    width: 100%;
    height: 100%;
    background: linear-gradient(90deg, transparent, rgba(255,255,255,0.2), transparent);
    animation: shimmer 2s infinite;
";

const KEYFRAMES: &str = "
    @keyframes shimmer {
        0% { left: -100%; }
        100% { left: 100%; }
    }
";

/// Where `<style>` blocks are registered. Implemented by `Document`.
pub trait StyleHost {
    fn has_style(&self, id: &str) -> bool;
    fn insert_style(&self, id: &str, css: &str) -> Result<(), SiteError>;
}

impl StyleHost for Document {
    fn has_style(&self, id: &str) -> bool {
        self.get_element_by_id(id).is_some()
    }

    fn insert_style(&self, id: &str, css: &str) -> Result<(), SiteError> {
        let head = self.head().ok_or(SiteError::MissingElement("head"))?;
        let style = self.create_element("style")?;
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style)?;
        Ok(())
    }
}

/// Registers the shimmer keyframes at most once per page.
#[derive(Debug, Default)]
pub struct KeyframesGuard {
    registered: Cell<bool>,
}

impl KeyframesGuard {
    /// Adds the keyframes block unless this guard or the page already did. Returns whether it inserted.
    pub fn ensure<H: StyleHost>(&self, host: &H) -> Result<bool, SiteError> {
        if self.registered.get() || host.has_style(STYLE_ID) {
            self.registered.set(true);
            return Ok(false);
        }
        host.insert_style(STYLE_ID, KEYFRAMES)?;
        self.registered.set(true);
        Ok(true)
    }
}

/// Shimmer overlays for `.image-placeholder` containers.
pub struct ShimmerEffects {
    document: Document,
    keyframes: KeyframesGuard,
}

impl ShimmerEffects {
    pub fn new(document: &Document) -> Self {
        Self {
            document: document.clone(),
            keyframes: KeyframesGuard::default(),
        }
    }

    pub fn ensure_keyframes(&self) -> Result<(), SiteError> {
        self.keyframes.ensure(&self.document)?;
        Ok(())
    }

    pub fn decorate(&self, container: &HtmlElement) -> Result<(), SiteError> {
        dom::set_styles(container, &[("position", "relative"), ("overflow", "hidden")])?;

        let overlay: HtmlElement = self.document.create_element("div")?.unchecked_into();
        overlay.style().set_css_text(OVERLAY_STYLE);
        container.append_child(&overlay)?;
        Ok(())
    }

    pub fn decorate_all(&self) -> Result<usize, SiteError> {
        let containers = dom::query_all_as::<HtmlElement>(&self.document, ".image-placeholder")?;
        for container in &containers {
            self.decorate(container)?;
        }
        self.ensure_keyframes()?;
        Ok(containers.len())
    }
}

pub fn install(document: &Document, reduced_motion: bool) -> Result<(), SiteError> {
    if reduced_motion {
        debug!("Reduced motion requested, skipping shimmer");
        return Ok(());
    }
    let decorated = ShimmerEffects::new(document).decorate_all()?;
    debug!("Shimmer added to {} placeholders", decorated);
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct FakeHead {
        styles: RefCell<Vec<(String, String)>>,
    }

    impl StyleHost for FakeHead {
        fn has_style(&self, id: &str) -> bool {
            self.styles.borrow().iter().any(|(existing, _)| existing == id)
        }

        fn insert_style(&self, id: &str, css: &str) -> Result<(), SiteError> {
            self.styles.borrow_mut().push((id.to_string(), css.to_string()));
            Ok(())
        }
    }

    #[test]
    fn keyframes_are_inserted_once() {
        let head = FakeHead::default();
        let guard = KeyframesGuard::default();

        assert!(guard.ensure(&head).unwrap());
        assert!(!guard.ensure(&head).unwrap());

        let styles = head.styles.borrow();
        assert_eq!(styles.len(), 1);
        assert_eq!(styles[0].0, STYLE_ID);
        assert!(styles[0].1.contains("@keyframes shimmer"));
    }

    #[test]
    fn existing_page_style_is_reused() {
        let head = FakeHead::default();
        head.insert_style(STYLE_ID, "/* shipped with the page */").unwrap();

        let guard = KeyframesGuard::default();
        assert!(!guard.ensure(&head).unwrap());
        assert_eq!(head.styles.borrow().len(), 1);
    }

    #[test]
    fn separate_guards_still_share_the_page_check() {
        let head = FakeHead::default();
        assert!(KeyframesGuard::default().ensure(&head).unwrap());
        assert!(!KeyframesGuard::default().ensure(&head).unwrap());
        assert_eq!(head.styles.borrow().len(), 1);
    }
}
