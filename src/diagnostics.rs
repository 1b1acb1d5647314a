use log::{debug, info};
use web_sys::Window;

use crate::dom;
use crate::error::SiteError;

pub fn welcome() {
    info!("Welcome to the TechFlow website. Page behavior is running from WebAssembly.");
}

/// `performance.now()` read inside the `load` handler is the time since navigation
/// start at which the load event fired, not `loadEventEnd`.
pub fn load_message(since_navigation_ms: f64) -> String {
    format!("Load event fired {:.0}ms after navigation start", since_navigation_ms)
}

pub fn log_load_time(window: &Window) -> Result<(), SiteError> {
    let Some(performance) = window.performance() else {
        debug!("No performance timing available");
        return Ok(());
    };

    dom::listen(window, "load", move |_| {
        info!("{}", load_message(performance.now()));
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_message_names_what_was_measured() {
        assert_eq!(
            load_message(1234.6),
            "Load event fired 1235ms after navigation start"
        );
    }
}
