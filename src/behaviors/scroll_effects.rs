//! Navbar styling, active-link highlighting and back-to-top visibility, all
//! driven from one read of the window's scroll offset.

use std::cell::Cell;
use std::rc::Rc;

use log::{debug, warn};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::browser::frame::request_frame;
use crate::config::{ScrollDispatch, SiteConfig};
use crate::dom;
use crate::error::SiteError;

const NAVBAR_SCROLLED: [(&str, &str); 2] = [
    ("background", "rgba(255, 255, 255, 0.98)"),
    ("box-shadow", "0 2px 20px rgba(0, 0, 0, 0.15)"),
];
const NAVBAR_RESTING: [(&str, &str); 2] = [
    ("background", "rgba(255, 255, 255, 0.95)"),
    ("box-shadow", "0 2px 10px rgba(0, 0, 0, 0.1)"),
];

/// Vertical extent of a `section[id]`, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionSpan {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionSpan {
    pub fn contains(&self, point: f64) -> bool {
        point >= self.top && point < self.top + self.height
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScrollState {
    pub navbar_scrolled: bool,
    pub back_to_top_visible: bool,
    pub current_section: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollThresholds {
    pub navbar: f64,
    pub back_to_top: f64,
    pub probe_offset: f64,
}

impl Default for ScrollThresholds {
    fn default() -> Self {
        Self::from(&SiteConfig::default())
    }
}

impl From<&SiteConfig> for ScrollThresholds {
    fn from(config: &SiteConfig) -> Self {
        Self {
            navbar: config.navbar_scroll_threshold,
            back_to_top: config.back_to_top_threshold,
            probe_offset: config.section_probe_offset,
        }
    }
}

impl ScrollThresholds {
    pub fn evaluate(&self, scroll_y: f64, sections: &[SectionSpan]) -> ScrollState {
        ScrollState {
            navbar_scrolled: scroll_y > self.navbar,
            back_to_top_visible: scroll_y > self.back_to_top,
            current_section: active_section(sections, scroll_y + self.probe_offset)
                .map(|section| section.id.clone()),
        }
    }
}

/// Last section in document order whose span contains `probe`.
pub fn active_section(sections: &[SectionSpan], probe: f64) -> Option<&SectionSpan> {
    sections.iter().filter(|section| section.contains(probe)).last()
}

/// Whether a nav link `href` points at the current section.
pub fn link_is_current(href: &str, current: Option<&str>) -> bool {
    match current {
        Some(id) => href.strip_prefix('#') == Some(id),
        None => false,
    }
}

pub struct ScrollEffects {
    window: Window,
    thresholds: ScrollThresholds,
    navbar: Option<HtmlElement>,
    sections: Vec<HtmlElement>,
    links: Vec<Element>,
    back_to_top: Option<HtmlElement>,
}

impl ScrollEffects {
    pub fn new(
        window: &Window,
        document: &Document,
        thresholds: ScrollThresholds,
        back_to_top: Option<HtmlElement>,
    ) -> Result<Self, SiteError> {
        let navbar = dom::query_as::<HtmlElement>(document, ".navbar")?;
        let mut sections = dom::query_all_as::<HtmlElement>(document, "section[id]")?;
        let mut links = dom::query_all(document, ".nav-link[href^=\"#\"]")?;

        // Highlighting needs both sides present.
        if sections.is_empty() || links.is_empty() {
            debug!("No sections or anchor links, skipping active-link highlighting");
            sections.clear();
            links.clear();
        }

        Ok(Self {
            window: window.clone(),
            thresholds,
            navbar,
            sections,
            links,
            back_to_top,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.navbar.is_none() && self.links.is_empty() && self.back_to_top.is_none()
    }

    fn section_spans(&self) -> Vec<SectionSpan> {
        self.sections
            .iter()
            .map(|section| SectionSpan {
                id: section.id(),
                top: f64::from(section.offset_top()),
                height: f64::from(section.offset_height()),
            })
            .collect()
    }

    pub fn update(&self) -> Result<(), SiteError> {
        let scroll_y = self.window.scroll_y()?;
        let state = self.thresholds.evaluate(scroll_y, &self.section_spans());

        if let Some(navbar) = &self.navbar {
            let treatment = if state.navbar_scrolled {
                &NAVBAR_SCROLLED
            } else {
                &NAVBAR_RESTING
            };
            dom::set_styles(navbar, treatment)?;
        }

        for link in &self.links {
            let href = link.get_attribute("href").unwrap_or_default();
            if link_is_current(&href, state.current_section.as_deref()) {
                link.class_list().add_1("active")?;
            } else {
                link.class_list().remove_1("active")?;
            }
        }

        if let Some(button) = &self.back_to_top {
            let (opacity, visibility) = if state.back_to_top_visible {
                ("1", "visible")
            } else {
                ("0", "hidden")
            };
            dom::set_styles(button, &[("opacity", opacity), ("visibility", visibility)])?;
        }
        Ok(())
    }
}

fn refresh(effects: &ScrollEffects) {
    if let Err(err) = effects.update() {
        warn!("Scroll effects update failed: {}", err);
    }
}

/// Routes every scroll and resize event through one `ScrollEffects` update.
pub fn install(window: &Window, effects: ScrollEffects, mode: ScrollDispatch) -> Result<(), SiteError> {
    if effects.is_empty() {
        debug!("Nothing to update on scroll");
        return Ok(());
    }

    let effects = Rc::new(effects);
    effects.update()?;

    let frame_pending = Rc::new(Cell::new(false));
    for event in ["scroll", "resize"] {
        let effects = Rc::clone(&effects);
        let frame_pending = Rc::clone(&frame_pending);
        let frame_window = window.clone();

        dom::listen(window, event, move |_| match mode {
            ScrollDispatch::Immediate => refresh(&effects),
            ScrollDispatch::FrameAligned => {
                if frame_pending.replace(true) {
                    return;
                }
                let effects = Rc::clone(&effects);
                let pending = Rc::clone(&frame_pending);
                let scheduled = request_frame(&frame_window, move || {
                    pending.set(false);
                    refresh(&effects);
                });
                if let Err(err) = scheduled {
                    warn!("Could not schedule scroll frame: {}", err);
                    frame_pending.set(false);
                }
            }
        })?;
    }

    debug!("Scroll effects installed ({:?})", mode);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(id: &str, top: f64, height: f64) -> SectionSpan {
        SectionSpan {
            id: id.to_string(),
            top,
            height,
        }
    }

    fn page() -> Vec<SectionSpan> {
        vec![
            span("home", 0.0, 600.0),
            span("services", 600.0, 800.0),
            span("contact", 1400.0, 500.0),
        ]
    }

    #[test]
    fn navbar_threshold_is_strict() {
        let thresholds = ScrollThresholds::default();
        assert!(!thresholds.evaluate(0.0, &[]).navbar_scrolled);
        assert!(!thresholds.evaluate(100.0, &[]).navbar_scrolled);
        assert!(thresholds.evaluate(100.5, &[]).navbar_scrolled);
        assert!(thresholds.evaluate(101.0, &[]).navbar_scrolled);
    }

    #[test]
    fn back_to_top_threshold_is_strict() {
        let thresholds = ScrollThresholds::default();
        assert!(!thresholds.evaluate(499.0, &[]).back_to_top_visible);
        assert!(!thresholds.evaluate(500.0, &[]).back_to_top_visible);
        assert!(thresholds.evaluate(501.0, &[]).back_to_top_visible);
    }

    #[test]
    fn probe_sits_200px_below_the_scroll_offset() {
        let thresholds = ScrollThresholds::default();
        let sections = page();

        let state = thresholds.evaluate(0.0, &sections);
        assert_eq!(state.current_section.as_deref(), Some("home"));

        // 399 + 200 = 599, still inside home
        let state = thresholds.evaluate(399.0, &sections);
        assert_eq!(state.current_section.as_deref(), Some("home"));

        // 400 + 200 = 600, first pixel of services
        let state = thresholds.evaluate(400.0, &sections);
        assert_eq!(state.current_section.as_deref(), Some("services"));
    }

    #[test]
    fn no_section_past_the_end() {
        let thresholds = ScrollThresholds::default();
        let state = thresholds.evaluate(1700.0, &page());
        assert_eq!(state.current_section, None);
    }

    #[test]
    fn overlapping_sections_pick_the_last_in_document_order() {
        let sections = vec![span("outer", 0.0, 1000.0), span("inner", 100.0, 200.0)];
        assert_eq!(active_section(&sections, 150.0).map(|s| s.id.as_str()), Some("inner"));
        assert_eq!(active_section(&sections, 500.0).map(|s| s.id.as_str()), Some("outer"));
    }

    #[test]
    fn links_match_only_the_current_fragment() {
        assert!(link_is_current("#services", Some("services")));
        assert!(!link_is_current("#home", Some("services")));
        assert!(!link_is_current("services", Some("services")));
        assert!(!link_is_current("#", None));
        assert!(!link_is_current("#services", None));
    }

    #[test]
    fn thresholds_follow_config() {
        let config = SiteConfig {
            navbar_scroll_threshold: 10.0,
            back_to_top_threshold: 20.0,
            section_probe_offset: 0.0,
            ..SiteConfig::default()
        };
        let thresholds = ScrollThresholds::from(&config);
        let state = thresholds.evaluate(15.0, &page());
        assert!(state.navbar_scrolled);
        assert!(!state.back_to_top_visible);
        assert_eq!(state.current_section.as_deref(), Some("home"));
    }
}
