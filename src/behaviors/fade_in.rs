use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement};

use crate::browser::observer::{observe_visibility, ObservePolicy, ObserverOptions};
use crate::dom;
use crate::error::SiteError;

pub const FADE_IN_SELECTOR: &str = ".service-card, .team-member, .mv-card, .faq-item";

const HIDDEN: [(&str, &str); 3] = [
    ("opacity", "0"),
    ("transform", "translateY(30px)"),
    ("transition", "opacity 0.6s ease, transform 0.6s ease"),
];
const SHOWN: [(&str, &str); 2] = [("opacity", "1"), ("transform", "translateY(0)")];

fn reveal(element: &Element) {
    let Some(element) = element.dyn_ref::<HtmlElement>() else {
        return;
    };
    if let Err(err) = dom::set_styles(element, &SHOWN) {
        warn!("Could not reveal element: {}", err);
    }
}

/// Hides the cards up front and slides them in once 10% is on screen.
pub fn install(document: &Document, reduced_motion: bool) -> Result<(), SiteError> {
    if reduced_motion {
        debug!("Reduced motion requested, fade-ins disabled");
        return Ok(());
    }

    let elements = dom::query_all_as::<HtmlElement>(document, FADE_IN_SELECTOR)?;
    if elements.is_empty() {
        return Ok(());
    }

    for element in &elements {
        dom::set_styles(element, &HIDDEN)?;
    }

    let options = ObserverOptions {
        threshold: Some(0.1),
        root_margin: Some("0px 0px -50px 0px"),
    };
    let targets: Vec<Element> = elements.into_iter().map(Element::from).collect();
    // Revealing is idempotent, so elements stay observed.
    observe_visibility(&targets, &options, ObservePolicy::Repeat, reveal)?;

    debug!("Fade-in installed on {} elements", targets.len());
    Ok(())
}
