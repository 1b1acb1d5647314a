use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, Window};

use crate::behaviors::smooth_scroll::scroll_window_to;
use crate::dom;
use crate::error::SiteError;

const BUTTON_STYLE: &str = "
    position: fixed;
    bottom: 20px;
    right: 20px;
    width: 50px;
    height: 50px;
    border-radius: 50%;
    background-color: #3498db;
    color: white;
    border: none;
    font-size: 1.5rem;
    cursor: pointer;
    opacity: 0;
    visibility: hidden;
    transition: all 0.3s ease;
    z-index: 1000;
    box-shadow: 0 4px 12px rgba(52, 152, 219, 0.3);
";

/// Appends the hidden back-to-top button. Its visibility is driven by the scroll effects.
pub fn install(window: &Window, document: &Document, smooth: bool) -> Result<HtmlElement, SiteError> {
    let body = document.body().ok_or(SiteError::MissingElement("body"))?;

    let button: HtmlElement = document.create_element("button")?.unchecked_into();
    button.set_text_content(Some("↑"));
    button.set_class_name("back-to-top");
    button.style().set_css_text(BUTTON_STYLE);
    body.append_child(&button)?;

    let window = window.clone();
    dom::listen(&button, "click", move |_| scroll_window_to(&window, 0.0, smooth))?;

    debug!("Back-to-top button added");
    Ok(button)
}
