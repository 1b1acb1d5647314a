//! Counts `.stat-number` values up from zero the first time they scroll into view.

use log::{debug, warn};
use web_sys::{Document, Element, Window};

use crate::browser::frame::request_frame;
use crate::browser::observer::{observe_visibility, ObservePolicy, ObserverOptions};
use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;

/// Parses a counter target. Only bare digit strings qualify, so "50+" or "4.5" stay as written.
pub fn parse_target(text: &str) -> Option<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RampStep {
    Progress(u64),
    Done(u64),
}

impl RampStep {
    pub fn value(self) -> u64 {
        match self {
            RampStep::Progress(value) | RampStep::Done(value) => value,
        }
    }
}

/// Linear ramp with a fixed per-frame increment. Slower frame rates simply take longer.
#[derive(Debug, Clone)]
pub struct CounterRamp {
    target: u64,
    current: f64,
    increment: f64,
}

impl CounterRamp {
    pub fn new(target: u64, duration_ms: u32, frame_ms: u32) -> Self {
        let frames = f64::from(duration_ms) / f64::from(frame_ms.max(1));
        let increment = if frames > 0.0 {
            target as f64 / frames
        } else {
            target as f64
        };
        Self {
            target,
            current: 0.0,
            increment,
        }
    }

    pub fn step(&mut self) -> RampStep {
        self.current += self.increment;
        let target = self.target as f64;
        if self.current < target {
            RampStep::Progress(self.current.floor() as u64)
        } else {
            self.current = target;
            RampStep::Done(self.target)
        }
    }
}

fn run_frames(window: Window, element: Element, mut ramp: CounterRamp) {
    let step = ramp.step();
    element.set_text_content(Some(&step.value().to_string()));
    if let RampStep::Progress(_) = step {
        let next_window = window.clone();
        if let Err(err) = request_frame(&window, move || run_frames(next_window, element, ramp)) {
            warn!("Counter animation stopped: {}", err);
        }
    }
}

/// Starts the count-up on `element`, or leaves it alone when its text is not a plain integer.
pub fn animate(window: &Window, element: &Element, duration_ms: u32, frame_ms: u32, reduced_motion: bool) {
    let text = element.text_content().unwrap_or_default();
    let Some(target) = parse_target(&text) else {
        debug!("Counter text {:?} is not a number, leaving it", text);
        return;
    };

    if reduced_motion {
        element.set_text_content(Some(&target.to_string()));
        return;
    }

    element.set_text_content(Some("0"));
    run_frames(window.clone(), element.clone(), CounterRamp::new(target, duration_ms, frame_ms));
}

pub fn install(window: &Window, document: &Document, config: &SiteConfig, reduced_motion: bool) -> Result<(), SiteError> {
    let counters = dom::query_all(document, ".stat-number")?;
    if counters.is_empty() {
        debug!("No counters on this page");
        return Ok(());
    }

    let window = window.clone();
    let duration_ms = config.counter_duration_ms;
    let frame_ms = config.counter_frame_ms;
    observe_visibility(&counters, &ObserverOptions::default(), ObservePolicy::Once, move |element| {
        animate(&window, element, duration_ms, frame_ms, reduced_motion);
    })?;

    debug!("Watching {} counters", counters.len());
    Ok(())
}
