use log::{debug, warn};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

use crate::dom;
use crate::error::SiteError;

const FOCUSED: &str = "focused";

fn field_value(field: &Element) -> String {
    if let Some(input) = field.dyn_ref::<HtmlInputElement>() {
        input.value()
    } else if let Some(area) = field.dyn_ref::<HtmlTextAreaElement>() {
        area.value()
    } else if let Some(select) = field.dyn_ref::<HtmlSelectElement>() {
        select.value()
    } else {
        String::new()
    }
}

fn set_focused(field: &Element, focused: bool) {
    let Some(group) = field.parent_element() else {
        return;
    };
    let classes = group.class_list();
    let updated = if focused {
        classes.add_1(FOCUSED)
    } else {
        classes.remove_1(FOCUSED)
    };
    if let Err(err) = updated {
        warn!("Could not update floating label: {:?}", err);
    }
}

/// Labels stay floated after blur only while the field holds a value.
pub fn stays_floated(value: &str) -> bool {
    !value.is_empty()
}

/// Keeps `.form-group` labels floated while the field has focus or content.
pub fn install(document: &Document) -> Result<(), SiteError> {
    let fields = dom::query_all(
        document,
        ".form-group input, .form-group textarea, .form-group select",
    )?;

    for field in &fields {
        let focused = field.clone();
        dom::listen(field, "focus", move |_| set_focused(&focused, true))?;

        let blurred = field.clone();
        dom::listen(field, "blur", move |_| {
            if !stays_floated(&field_value(&blurred)) {
                set_focused(&blurred, false);
            }
        })?;

        // Autofilled or server-rendered values
        if stays_floated(&field_value(field)) {
            set_focused(field, true);
        }
    }

    debug!("Floating labels on {} fields", fields.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_filled_fields_keep_the_label_up() {
        assert!(stays_floated("Ada"));
        assert!(stays_floated(" "));
        assert!(!stays_floated(""));
    }
}
