use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::Window;

use crate::error::SiteError;

/// Runs `callback` once before the next repaint. The closure frees itself after it fires.
pub fn request_frame<F>(window: &Window, callback: F) -> Result<i32, SiteError>
where
    F: FnOnce() + 'static,
{
    let callback = Closure::once_into_js(callback);
    Ok(window.request_animation_frame(callback.unchecked_ref())?)
}
