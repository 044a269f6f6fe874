use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Window};

use crate::utils::debug;

/// Periodic removal of injected chat widgets.
///
/// Runs one pass on `start`, then every `interval_ms` until `stop` is called
/// or the task is dropped.
pub struct SweepTask {
    window: Window,
    document: Document,
    query: String,
    interval_ms: u32,
    handle: Option<i32>,
    tick: Option<Closure<dyn FnMut()>>,
}

impl SweepTask {
    pub fn start(
        window: &Window,
        document: &Document,
        query: String,
        interval_ms: u32,
    ) -> Result<Self, JsValue> {
        let mut task = SweepTask {
            window: window.clone(),
            document: document.clone(),
            query,
            interval_ms,
            handle: None,
            tick: None,
        };
        task.resume()?;
        Ok(task)
    }

    /// Restart after `stop` (e.g. when the page comes back from the
    /// back/forward cache). No-op while running.
    pub fn resume(&mut self) -> Result<(), JsValue> {
        if self.is_running() {
            return Ok(());
        }
        sweep_once(&self.document, &self.query);
        if self.interval_ms == 0 {
            return Ok(());
        }
        let doc = self.document.clone();
        let query = self.query.clone();
        let tick = Closure::<dyn FnMut()>::new(move || {
            sweep_once(&doc, &query);
        });
        let handle = self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                tick.as_ref().unchecked_ref(),
                i32::try_from(self.interval_ms).unwrap_or(i32::MAX),
            )?;
        self.handle = Some(handle);
        self.tick = Some(tick);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.window.clear_interval_with_handle(handle);
            debug("widget sweep stopped");
        }
        self.tick = None;
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Remove every element matching `query`; returns how many went.
pub fn sweep_once(document: &Document, query: &str) -> u32 {
    let list = match document.query_selector_all(query) {
        Ok(list) => list,
        Err(e) => {
            debug(&format!("widget sweep query failed: {e:?}"));
            return 0;
        }
    };
    let mut removed = 0;
    for i in 0..list.length() {
        if let Some(el) = list.item(i).and_then(|n| n.dyn_into::<Element>().ok()) {
            el.remove();
            removed += 1;
        }
    }
    if removed > 0 {
        debug(&format!("widget sweep removed {removed} element(s)"));
    }
    removed
}
