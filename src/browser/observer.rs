use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::error::SiteError;

/// Whether an element stays observed after its first visible notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObservePolicy {
    Once,
    Repeat,
}

#[derive(Debug, Clone, Default)]
pub struct ObserverOptions {
    pub threshold: Option<f64>,
    pub root_margin: Option<&'static str>,
}

/// What to do with one batch of intersection notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch<T> {
    pub unobserve: Vec<T>,
    pub visible: Vec<T>,
}

/// Splits `(target, is_intersecting)` pairs into targets to reveal and targets to stop watching.
pub fn dispatch<T: Clone>(policy: ObservePolicy, entries: impl IntoIterator<Item = (T, bool)>) -> Dispatch<T> {
    let visible: Vec<T> = entries
        .into_iter()
        .filter(|(_, intersecting)| *intersecting)
        .map(|(target, _)| target)
        .collect();
    let unobserve = match policy {
        ObservePolicy::Once => visible.clone(),
        ObservePolicy::Repeat => Vec::new(),
    };
    Dispatch { unobserve, visible }
}

/// Calls `on_visible` for each observed element that starts intersecting the viewport.
pub fn observe_visibility<F>(
    elements: &[Element],
    options: &ObserverOptions,
    policy: ObservePolicy,
    mut on_visible: F,
) -> Result<IntersectionObserver, SiteError>
where
    F: FnMut(&Element) + 'static,
{
    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        let batch = dispatch(
            policy,
            entries.iter().map(|entry| {
                let entry: IntersectionObserverEntry = entry.unchecked_into();
                (entry.target(), entry.is_intersecting())
            }),
        );
        for target in &batch.unobserve {
            observer.unobserve(target);
        }
        for target in &batch.visible {
            on_visible(target);
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    if let Some(threshold) = options.threshold {
        init.set_threshold(&JsValue::from_f64(threshold));
    }
    if let Some(margin) = options.root_margin {
        init.set_root_margin(margin);
    }

    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    // Observers live as long as the page does.
    callback.forget();

    for element in elements {
        observer.observe(element);
    }
    Ok(observer)
}
