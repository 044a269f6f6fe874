//! Browser side of the landing page: KPI ring animation and the widget sweep.

use std::cell::RefCell;
use std::rc::Rc;

use landing_core::{LandingConfig, LandingError};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Event, PageTransitionEvent, Window};

mod constants;
mod kpi;
mod observer;
mod state;
mod sweep;
mod utils;

use crate::constants::{CONFIG_ELEMENT_ID, DEBUG_QUERY_PARAM};
use crate::state::{PageState, STATE, with_state};
use crate::sweep::SweepTask;
use crate::utils::{debug, error, flag_enabled, get_query_param, log, warn};

fn js_err(e: LandingError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let window = web_sys::window().ok_or_else(|| js_err(LandingError::MissingElement("window")))?;
    let document = window
        .document()
        .ok_or_else(|| js_err(LandingError::MissingElement("document")))?;
    if document.ready_state() == "loading" {
        let cb = Closure::once_into_js(guarded_setup);
        document.add_event_listener_with_callback("DOMContentLoaded", cb.unchecked_ref())?;
    } else {
        guarded_setup();
    }
    Ok(())
}

/// Failures are logged and never reach the page.
fn guarded_setup() {
    if let Err(err) = setup() {
        error(&LandingError::Dom(describe(&err)).to_string());
    }
}

fn setup() -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| js_err(LandingError::MissingElement("window")))?;
    let document = window
        .document()
        .ok_or_else(|| js_err(LandingError::MissingElement("document")))?;
    let config = load_config(&window, &document);
    utils::set_debug(config.debug);
    if config.debug {
        log(&format!(
            "config {}",
            serde_json::to_string(&config).unwrap_or_default()
        ));
    }

    if let Some(body) = document.body()
        && let Err(e) = body.class_list().add_1(&config.scope_class)
    {
        warn(&format!("scope class not applied: {}", describe(&e)));
    }

    let state = Rc::new(RefCell::new(PageState::new(window.clone(), config)));
    STATE.with(|st| st.replace(Some(state.clone())));

    // Each behaviour is wired on its own so one failing leaves the other running.
    if let Err(e) = start_sweep(&state, &document) {
        warn(&format!("widget sweep disabled: {}", describe(&e)));
    }
    if let Err(e) = attach_lifecycle(&window) {
        warn(&format!("lifecycle hooks not attached: {}", describe(&e)));
    }

    let group = {
        let s = state.borrow();
        kpi::collect_views(&document, &s.config)
    };
    debug(&format!("{} KPI card(s) found", group.views.len()));
    {
        let mut s = state.borrow_mut();
        s.views = group.views;
        s.sentinel = group.sentinel;
    }
    observer::attach_kpi_trigger(state)?;
    Ok(())
}

/// Defaults, overridden by the page's JSON config block and `?eg_debug`.
fn load_config(window: &Window, document: &Document) -> LandingConfig {
    let text = document
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .unwrap_or_default();
    let mut config = match LandingConfig::from_json(&text) {
        Ok(c) => c,
        Err(e) => {
            warn(&format!("{e}; using defaults"));
            LandingConfig::default()
        }
    };
    if let Ok(search) = window.location().search()
        && let Some(v) = get_query_param(&search, DEBUG_QUERY_PARAM)
    {
        config.debug = flag_enabled(&v);
    }
    config
}

fn start_sweep(state: &Rc<RefCell<PageState>>, document: &Document) -> Result<(), JsValue> {
    let mut s = state.borrow_mut();
    let Some(query) = s.config.sweep_query() else {
        return Ok(());
    };
    let task = SweepTask::start(&s.window, document, query, s.config.sweep_interval_ms)?;
    s.sweep = Some(task);
    Ok(())
}

/// Stop background work on `pagehide`; resume it when the page is restored
/// from the back/forward cache.
fn attach_lifecycle(window: &Window) -> Result<(), JsValue> {
    let on_leave = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |_e: Event| {
        with_state(|st| {
            if let Some(task) = st.borrow_mut().sweep.as_mut() {
                task.stop();
            }
        });
    }));
    window.add_event_listener_with_callback("pagehide", on_leave.as_ref().unchecked_ref())?;
    on_leave.forget();

    let on_show = Closure::<dyn FnMut(Event)>::wrap(Box::new(move |e: Event| {
        let persisted = e
            .dyn_ref::<PageTransitionEvent>()
            .is_some_and(PageTransitionEvent::persisted);
        if !persisted {
            return;
        }
        with_state(|st| {
            if let Some(task) = st.borrow_mut().sweep.as_mut()
                && let Err(err) = task.resume()
            {
                warn(&format!("widget sweep not resumed: {}", describe(&err)));
            }
        });
    }));
    window.add_event_listener_with_callback("pageshow", on_show.as_ref().unchecked_ref())?;
    on_show.forget();
    Ok(())
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use wasm_bindgen_test::*;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn sweep_running() -> bool {
        with_state(|st| st.borrow().sweep.as_ref().is_some_and(SweepTask::is_running))
            .unwrap_or(false)
    }

    #[wasm_bindgen_test]
    fn pagehide_stops_sweep_and_beforeunload_does_not() {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();
        let mut page = PageState::new(window.clone(), LandingConfig::default());
        page.sweep = Some(
            SweepTask::start(&window, &document, ".lifecycle-test-widget".into(), 1000).unwrap(),
        );
        let state = Rc::new(RefCell::new(page));
        STATE.with(|st| st.replace(Some(state)));
        attach_lifecycle(&window).unwrap();

        window
            .dispatch_event(&Event::new("beforeunload").unwrap())
            .unwrap();
        assert!(sweep_running());

        window.dispatch_event(&Event::new("pagehide").unwrap()).unwrap();
        assert!(!sweep_running());

        // A plain pageshow is not a back/forward restore.
        window.dispatch_event(&Event::new("pageshow").unwrap()).unwrap();
        assert!(!sweep_running());
    }
}
