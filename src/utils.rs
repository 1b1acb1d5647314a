//! Reusable timing wrappers and the reduced-motion check.
//!
//! `prefers_reduced_motion` is also exported to page scripts as
//! `prefersReducedMotion`. `debounce` and `throttle` wrap Rust closures and
//! are available to Rust callers only.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::wasm_bindgen;

use crate::scheduler::Scheduler;

pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Whether the platform asks for reduced motion. `false` outside a browser.
#[wasm_bindgen(js_name = prefersReducedMotion)]
pub fn prefers_reduced_motion() -> bool {
    web_sys::window()
        .and_then(|window| window.match_media(REDUCED_MOTION_QUERY).ok().flatten())
        .map_or(false, |query| query.matches())
}

/// Runs `func` once calls have been quiet for `wait_ms`, with the last call's arguments.
pub fn debounce<A, S, F>(scheduler: S, wait_ms: u32, func: F) -> Debounced<A, S>
where
    A: 'static,
    S: Scheduler,
    F: Fn(A) + 'static,
{
    Debounced {
        scheduler,
        wait_ms,
        func: Rc::new(func),
        pending: Rc::new(RefCell::new(None)),
    }
}

/// Runs `func` on the leading edge, then drops calls until `limit_ms` has passed.
pub fn throttle<A, S, F>(scheduler: S, limit_ms: u32, func: F) -> Throttled<A, S>
where
    A: 'static,
    S: Scheduler,
    F: Fn(A) + 'static,
{
    Throttled {
        scheduler,
        limit_ms,
        func: Rc::new(func),
        cooling: Rc::new(Cell::new(false)),
        window: Rc::new(RefCell::new(None)),
    }
}

pub struct Debounced<A, S: Scheduler> {
    scheduler: S,
    wait_ms: u32,
    func: Rc<dyn Fn(A)>,
    pending: Rc<RefCell<Option<S::Pending>>>,
}

impl<A: 'static, S: Scheduler> Debounced<A, S> {
    pub fn call(&self, args: A) {
        let func = Rc::clone(&self.func);
        let next = self.scheduler.after(self.wait_ms, Box::new(move || func(args)));
        // Replacing the handle drops, and so cancels, the superseded call.
        let superseded = self.pending.borrow_mut().replace(next);
        drop(superseded);
    }

    pub fn cancel(&self) {
        let pending = self.pending.borrow_mut().take();
        drop(pending);
    }
}

impl<A, S: Scheduler> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            wait_ms: self.wait_ms,
            func: Rc::clone(&self.func),
            pending: Rc::clone(&self.pending),
        }
    }
}

pub struct Throttled<A, S: Scheduler> {
    scheduler: S,
    limit_ms: u32,
    func: Rc<dyn Fn(A)>,
    cooling: Rc<Cell<bool>>,
    window: Rc<RefCell<Option<S::Pending>>>,
}

impl<A: 'static, S: Scheduler> Throttled<A, S> {
    /// Returns whether `func` ran for this call.
    pub fn call(&self, args: A) -> bool {
        if self.cooling.get() {
            return false;
        }
        self.cooling.set(true);

        let cooling = Rc::clone(&self.cooling);
        let reopen = self
            .scheduler
            .after(self.limit_ms, Box::new(move || cooling.set(false)));
        *self.window.borrow_mut() = Some(reopen);

        (self.func)(args);
        true
    }
}

impl<A, S: Scheduler> Clone for Throttled<A, S> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            limit_ms: self.limit_ms,
            func: Rc::clone(&self.func),
            cooling: Rc::clone(&self.cooling),
            window: Rc::clone(&self.window),
        }
    }
}
