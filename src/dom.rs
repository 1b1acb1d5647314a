use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, Window};

use crate::error::SiteError;

pub fn window() -> Result<Window, SiteError> {
    web_sys::window().ok_or(SiteError::NoWindow)
}

pub fn document(window: &Window) -> Result<Document, SiteError> {
    window.document().ok_or(SiteError::NoDocument)
}

/// All elements matching `selector`, in document order.
pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>, SiteError> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|index| nodes.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Like [`query_all`], keeping only elements of type `T`.
pub fn query_all_as<T: JsCast>(document: &Document, selector: &str) -> Result<Vec<T>, SiteError> {
    Ok(query_all(document, selector)?
        .into_iter()
        .filter_map(|element| element.dyn_into::<T>().ok())
        .collect())
}

pub fn query_as<T: JsCast>(document: &Document, selector: &str) -> Result<Option<T>, SiteError> {
    Ok(document
        .query_selector(selector)?
        .and_then(|element| element.dyn_into::<T>().ok()))
}

/// Registers `handler` for the lifetime of the page.
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), SiteError>
where
    F: FnMut(Event) + 'static,
{
    let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, callback.as_ref().unchecked_ref())?;
    callback.forget();
    Ok(())
}

pub fn set_styles(element: &HtmlElement, properties: &[(&str, &str)]) -> Result<(), SiteError> {
    let style = element.style();
    for (name, value) in properties {
        style.set_property(name, value)?;
    }
    Ok(())
}
