use log::{info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use techflow_site::{config, SiteConfig};

fn run(config: SiteConfig) {
    if let Err(err) = techflow_site::start(&config) {
        log::error!("Page behavior failed to start: {}", err);
    }
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    let loaded = config::load();
    let level = match &loaded {
        Ok(config) => config.log_level(),
        Err(_) => config::default_log_level(),
    };
    console_log::init_with_level(level).expect("error initializing log");

    let config = loaded.unwrap_or_else(|err| {
        warn!("Using default site config: {}", err);
        SiteConfig::default()
    });

    info!("Starting page behavior");

    // The module can load before or after the markup is parsed.
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        warn!("No document, nothing to attach to");
        return;
    };
    if document.ready_state() == "loading" {
        let on_ready = Closure::once(move || run(config));
        let _ = document.add_event_listener_with_callback(
            "DOMContentLoaded",
            on_ready.as_ref().unchecked_ref(),
        );
        on_ready.forget();
    } else {
        run(config);
    }
}
