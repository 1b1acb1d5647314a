use std::rc::Rc;

use log::{debug, warn};
use web_sys::{Document, Element};

use crate::dom;
use crate::error::SiteError;

const ACTIVE: &str = "active";

/// Something carrying the menu's open flag.
pub trait ActiveFlag {
    fn toggle_active(&self) -> Result<(), SiteError>;
    fn clear_active(&self) -> Result<(), SiteError>;
}

impl ActiveFlag for Element {
    fn toggle_active(&self) -> Result<(), SiteError> {
        self.class_list().toggle(ACTIVE)?;
        Ok(())
    }

    fn clear_active(&self) -> Result<(), SiteError> {
        self.class_list().remove_1(ACTIVE)?;
        Ok(())
    }
}

/// The nav menu and its hamburger, opened and closed together.
pub struct Menu<E: ActiveFlag> {
    menu: E,
    hamburger: E,
}

impl<E: ActiveFlag> Menu<E> {
    pub fn new(menu: E, hamburger: E) -> Self {
        Self { menu, hamburger }
    }

    pub fn toggle(&self) {
        for part in [&self.menu, &self.hamburger] {
            if let Err(err) = part.toggle_active() {
                warn!("Could not toggle menu: {}", err);
            }
        }
    }

    pub fn close(&self) {
        for part in [&self.menu, &self.hamburger] {
            if let Err(err) = part.clear_active() {
                warn!("Could not close menu: {}", err);
            }
        }
    }
}

/// Mobile menu toggle: the hamburger flips both elements, any nav link closes them.
pub fn install(document: &Document) -> Result<(), SiteError> {
    let hamburger = document.query_selector(".hamburger")?;
    let menu = document.query_selector(".nav-menu")?;
    let (Some(hamburger), Some(menu)) = (hamburger, menu) else {
        debug!("No hamburger menu on this page");
        return Ok(());
    };

    let controls = Rc::new(Menu::new(menu, hamburger.clone()));
    {
        let controls = Rc::clone(&controls);
        dom::listen(&hamburger, "click", move |_| controls.toggle())?;
    }

    for link in dom::query_all(document, ".nav-link")? {
        let controls = Rc::clone(&controls);
        dom::listen(&link, "click", move |_| controls.close())?;
    }

    debug!("Navigation menu installed");
    Ok(())
}
