use log::{error, info};

pub mod config;
pub mod error;
pub mod scheduler;
pub mod utils;
mod diagnostics;
mod dom;

pub mod behaviors {
    pub mod back_to_top;
    pub mod contact_form;
    pub mod counter;
    pub mod fade_in;
    pub mod floating_labels;
    pub mod navigation;
    pub mod scroll_effects;
    pub mod shimmer;
    pub mod smooth_scroll;
}

mod browser {
    pub mod frame;
    pub mod observer;
}

pub use config::SiteConfig;
pub use error::SiteError;
pub use utils::{debounce, prefers_reduced_motion, throttle};

use behaviors::{
    back_to_top, contact_form, counter, fade_in, floating_labels, navigation, scroll_effects,
    shimmer, smooth_scroll,
};

/// One component failing to install should not take the rest of the page down.
fn report(component: &str, result: Result<(), SiteError>) {
    if let Err(err) = result {
        error!("Failed to install {}: {}", component, err);
    }
}

/// Attaches every page behavior. Call once the document has loaded.
pub fn start(config: &SiteConfig) -> Result<(), SiteError> {
    let window = dom::window()?;
    let document = dom::document(&window)?;

    let reduced_motion = config.respect_reduced_motion && prefers_reduced_motion();
    if reduced_motion {
        info!("Reduced motion requested, animations are toned down");
    }
    let smooth = !reduced_motion;

    report("navigation", navigation::install(&document));
    report("smooth scrolling", smooth_scroll::install(&window, &document, smooth));

    let back_to_top = match back_to_top::install(&window, &document, smooth) {
        Ok(button) => Some(button),
        Err(err) => {
            error!("Failed to install back-to-top button: {}", err);
            None
        }
    };
    let effects = scroll_effects::ScrollEffects::new(
        &window,
        &document,
        scroll_effects::ScrollThresholds::from(config),
        back_to_top,
    );
    report(
        "scroll effects",
        effects.and_then(|effects| scroll_effects::install(&window, effects, config.scroll_dispatch)),
    );

    report("contact form", contact_form::install(&document, config));
    report("counters", counter::install(&window, &document, config, reduced_motion));
    report("fade-in", fade_in::install(&document, reduced_motion));
    report("floating labels", floating_labels::install(&document));
    report("shimmer", shimmer::install(&document, reduced_motion));

    diagnostics::welcome();
    report("load timing", diagnostics::log_load_time(&window));
    Ok(())
}
