use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use landing_core::{crosses_threshold, in_view_on_load};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::kpi::fire_group;
use crate::state::{ObserverCallback, PageState};
use crate::utils::debug;

/// Watch the first KPI card and fire the group once it is visible enough.
/// Also fires straight away when the grid is already on screen at setup.
pub fn attach_kpi_trigger(state: Rc<RefCell<PageState>>) -> Result<(), JsValue> {
    let (window, sentinel, threshold) = {
        let s = state.borrow();
        let Some(sentinel) = s.sentinel.clone() else {
            debug("no KPI cards to animate");
            return Ok(());
        };
        (s.window.clone(), sentinel, s.config.visibility_threshold)
    };

    match build_observer(state.clone(), threshold) {
        Ok((observer, cb)) => {
            observer.observe(&sentinel);
            let mut s = state.borrow_mut();
            s.observer = Some(observer);
            s.observer_cb = Some(cb);
        }
        // Without an observer only the fallback below can fire.
        Err(e) => debug(&format!("IntersectionObserver unavailable: {e:?}")),
    }

    let rect = sentinel.get_bounding_client_rect();
    let scroll_y = window.scroll_y().unwrap_or(0.0);
    let viewport_h = window.inner_height()?.as_f64().unwrap_or(0.0);
    if in_view_on_load(scroll_y, viewport_h, rect.top()) {
        debug("KPI grid already in view");
        if let Some(observer) = state.borrow().observer.as_ref() {
            observer.disconnect();
        }
        fire_group(&state);
    }
    Ok(())
}

fn build_observer(
    state: Rc<RefCell<PageState>>,
    threshold: f64,
) -> Result<(IntersectionObserver, ObserverCallback), JsValue> {
    let cb: ObserverCallback = Closure::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if crosses_threshold(entry.is_intersecting(), entry.intersection_ratio(), threshold) {
                observer.unobserve(&entry.target());
                fire_group(&state);
            }
        }
    });
    let init = IntersectionObserverInit::new();
    init.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(cb.as_ref().unchecked_ref(), &init)?;
    Ok((observer, cb))
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use landing_core::LandingConfig;
    use wasm_bindgen_test::*;
    use web_sys::Element;

    use super::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn state_with_sentinel(sentinel: Option<Element>) -> Rc<RefCell<PageState>> {
        let window = web_sys::window().unwrap();
        let mut state = PageState::new(window, LandingConfig::default());
        state.sentinel = sentinel;
        Rc::new(RefCell::new(state))
    }

    #[wasm_bindgen_test]
    fn no_cards_leaves_trigger_armed() {
        let state = state_with_sentinel(None);
        attach_kpi_trigger(state.clone()).unwrap();
        let mut s = state.borrow_mut();
        assert!(s.observer.is_none());
        assert!(s.trigger.fire());
    }

    #[wasm_bindgen_test]
    fn visible_sentinel_fires_on_attach() {
        let document = web_sys::window().unwrap().document().unwrap();
        let card = document.create_element("div").unwrap();
        card.set_class_name("eg-kpi");
        card.set_text_content(Some("KPI"));
        document.body().unwrap().prepend_with_node_1(&card).unwrap();

        let state = state_with_sentinel(Some(card.clone()));
        attach_kpi_trigger(state.clone()).unwrap();
        assert!(state.borrow().observer.is_some());
        assert!(!state.borrow_mut().trigger.fire());
        card.remove();
    }

    #[wasm_bindgen_test]
    fn offscreen_sentinel_waits_for_observer() {
        let document = web_sys::window().unwrap().document().unwrap();
        let spacer = document.create_element("div").unwrap();
        spacer.set_attribute("style", "height: 400vh").unwrap();
        let card = document.create_element("div").unwrap();
        card.set_class_name("eg-kpi");
        let body = document.body().unwrap();
        body.prepend_with_node_1(&card).unwrap();
        body.prepend_with_node_1(&spacer).unwrap();

        let state = state_with_sentinel(Some(card.clone()));
        attach_kpi_trigger(state.clone()).unwrap();
        assert!(state.borrow().observer.is_some());
        assert!(state.borrow_mut().trigger.fire());
        card.remove();
        spacer.remove();
    }
}
