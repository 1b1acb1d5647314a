use std::str::FromStr;

use log::Level;
use serde::Deserialize;
use web_sys::Document;

use crate::error::SiteError;

/// Id of the optional `<script type="application/json">` block holding overrides.
pub const CONFIG_ELEMENT_ID: &str = "site-config";

#[cfg(debug_assertions)]
pub fn default_log_level() -> Level {
    Level::Debug // Chatty logs while developing locally
}

#[cfg(not(debug_assertions))]
pub fn default_log_level() -> Level {
    Level::Info
}

/// How scroll-driven updates are dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ScrollDispatch {
    /// Recompute on every scroll event.
    Immediate,
    /// Coalesce scroll events into one update per animation frame.
    #[default]
    FrameAligned,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    pub navbar_scroll_threshold: f64,
    pub back_to_top_threshold: f64,
    pub section_probe_offset: f64,
    pub form_submit_delay_ms: u32,
    pub form_reset_delay_ms: u32,
    pub form_message_lifetime_ms: u32,
    pub counter_duration_ms: u32,
    pub counter_frame_ms: u32,
    pub scroll_dispatch: ScrollDispatch,
    pub respect_reduced_motion: bool,
    pub log_level: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            navbar_scroll_threshold: 100.0,
            back_to_top_threshold: 500.0,
            section_probe_offset: 200.0,
            form_submit_delay_ms: 2000,
            form_reset_delay_ms: 5000,
            form_message_lifetime_ms: 5000,
            counter_duration_ms: 2000,
            counter_frame_ms: 16,
            scroll_dispatch: ScrollDispatch::default(),
            respect_reduced_motion: true,
            log_level: None,
        }
    }
}

impl SiteConfig {
    pub fn from_json(text: &str) -> Result<Self, SiteError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads overrides from the page, falling back to defaults when the block is absent.
    pub fn from_document(document: &Document) -> Result<Self, SiteError> {
        let text = document
            .get_element_by_id(CONFIG_ELEMENT_ID)
            .and_then(|element| element.text_content())
            .filter(|text| !text.trim().is_empty());

        match text {
            Some(text) => Self::from_json(&text),
            None => Ok(Self::default()),
        }
    }

    /// Unknown level names fall back to the build default.
    pub fn log_level(&self) -> Level {
        self.log_level
            .as_deref()
            .and_then(|name| Level::from_str(name).ok())
            .unwrap_or_else(default_log_level)
    }
}

/// Loads the page config through the global window.
pub fn load() -> Result<SiteConfig, SiteError> {
    let window = web_sys::window().ok_or(SiteError::NoWindow)?;
    let document = window.document().ok_or(SiteError::NoDocument)?;
    SiteConfig::from_document(&document)
}
