use std::cell::RefCell;
use std::rc::Rc;

use landing_core::{CounterFrame, KpiMachine, KpiPhase, LandingConfig, RingTarget, parse_percent};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CssStyleDeclaration, Document, Element, Window};

use crate::constants::{
    CIRC_CSS_VAR, COUNTER_SELECTOR, KPI_CARD_SELECTOR, KPI_GRID_SELECTOR, PERCENT_ATTR,
    RING_FILL_SELECTOR,
};
use crate::state::PageState;
use crate::utils::{debug, inline_style, now_ms};

/// Typed handle on one KPI card, built once at setup.
pub struct KpiView {
    /// Position among all `.eg-kpi` siblings, skipped ones included.
    pub index: usize,
    pub root: Element,
    pub fill_style: CssStyleDeclaration,
    pub counter: Element,
    pub machine: KpiMachine,
}

pub type SharedView = Rc<RefCell<KpiView>>;

impl KpiView {
    /// `None` when the card lacks its ring or counter.
    pub fn from_element(index: usize, root: Element, config: &LandingConfig) -> Option<Self> {
        let fill = root.query_selector(RING_FILL_SELECTOR).ok().flatten()?;
        let counter = root.query_selector(COUNTER_SELECTOR).ok().flatten()?;
        let fill_style = inline_style(&fill)?;
        let pct = parse_percent(root.get_attribute(PERCENT_ATTR).as_deref());
        Some(KpiView {
            index,
            root,
            fill_style,
            counter,
            machine: KpiMachine::from_config(pct, config),
        })
    }

    /// Reset the ring to empty with transitions off, then force a style
    /// flush so the next offset change animates from here.
    pub fn prepare(&self) -> Result<(), JsValue> {
        let circ = self.machine.ring().circumference().to_string();
        self.fill_style.set_property(CIRC_CSS_VAR, &circ)?;
        self.fill_style.set_property("stroke-dasharray", &circ)?;
        self.fill_style.set_property(
            "stroke-dashoffset",
            &self.machine.ring().initial_offset().to_string(),
        )?;
        self.fill_style.set_property("transition", "none")?;
        let _ = self.root.get_bounding_client_rect();
        Ok(())
    }

    pub fn apply_ring(&self, target: &RingTarget) -> Result<(), JsValue> {
        self.fill_style.set_property("transition", &target.transition)?;
        self.fill_style
            .set_property("stroke-dashoffset", &target.offset.to_string())
    }

    pub fn render_counter(&self, value: u32) {
        self.counter.set_text_content(Some(&value.to_string()));
    }
}

/// The KPI grid as found at setup.
#[derive(Default)]
pub struct KpiGroup {
    /// First `.eg-kpi` element, watched for visibility even if it was skipped.
    pub sentinel: Option<Element>,
    pub views: Vec<SharedView>,
}

/// Cards inside the KPI grid, in DOM order. Cards missing a ring or counter
/// are skipped but keep their sibling index.
pub fn collect_views(document: &Document, config: &LandingConfig) -> KpiGroup {
    let Some(grid) = document.query_selector(KPI_GRID_SELECTOR).ok().flatten() else {
        debug("no KPI grid on this page");
        return KpiGroup::default();
    };
    let Ok(cards) = grid.query_selector_all(KPI_CARD_SELECTOR) else {
        return KpiGroup::default();
    };
    let mut group = KpiGroup::default();
    for i in 0..cards.length() {
        let Some(el) = cards.item(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
            continue;
        };
        if group.sentinel.is_none() {
            group.sentinel = Some(el.clone());
        }
        match KpiView::from_element(i as usize, el, config) {
            Some(view) => {
                debug(&format!(
                    "KPI card {i} targets {}%",
                    view.machine.target_percent()
                ));
                group.views.push(Rc::new(RefCell::new(view)));
            }
            None => debug(&format!("KPI card {i} has no ring or counter; skipped")),
        }
    }
    group
}

/// Fire the group trigger and start every card on its stagger slot.
/// Returns how many cards were scheduled; 0 after the first call.
pub fn fire_group(state: &Rc<RefCell<PageState>>) -> usize {
    let (window, jobs) = {
        let mut s = state.borrow_mut();
        let now = now_ms(&s.window);
        let stagger = s.config.stagger();
        let views = s.views.clone();
        let mut cards: Vec<_> = views.iter().map(|v| v.borrow_mut()).collect();
        let indexed = cards.iter_mut().map(|c| {
            let view: &mut KpiView = c;
            (view.index, &mut view.machine)
        });
        let schedule = s.trigger.fire_into(indexed, now, stagger);
        drop(cards);
        let jobs: Vec<(SharedView, u32)> = views
            .iter()
            .filter_map(|v| {
                let index = v.borrow().index;
                schedule
                    .iter()
                    .find(|(i, _)| *i == index)
                    .map(|&(_, delay)| (v.clone(), delay))
            })
            .collect();
        (s.window.clone(), jobs)
    };
    if jobs.is_empty() {
        return 0;
    }
    debug(&format!("KPI group fired with {} cards", jobs.len()));
    let scheduled = jobs.len();
    for (view, delay) in jobs {
        if let Err(e) = view.borrow().prepare() {
            debug(&format!("failed to reset KPI ring: {e:?}"));
        }
        schedule_card(&window, view, delay);
    }
    scheduled
}

fn schedule_card(window: &Window, view: SharedView, delay_ms: u32) {
    let win = window.clone();
    let cb = Closure::once_into_js(move || try_start(win, view));
    let timeout = i32::try_from(delay_ms).unwrap_or(i32::MAX);
    if let Err(e) =
        window.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), timeout)
    {
        debug(&format!("failed to schedule KPI card: {e:?}"));
    }
}

// Timers and the performance clock can disagree by a fraction of a
// millisecond, so an early wake-up retries on the next frame.
fn try_start(window: Window, view: SharedView) {
    let started = view.borrow_mut().machine.start(now_ms(&window));
    match started {
        Some(target) => {
            let v = view.clone();
            let apply = Closure::once_into_js(move |_ts: f64| {
                if let Err(e) = v.borrow().apply_ring(&target) {
                    debug(&format!("failed to animate KPI ring: {e:?}"));
                }
            });
            let _ = window.request_animation_frame(apply.unchecked_ref());
            start_counter(&window, view);
        }
        None if matches!(view.borrow().machine.phase(), KpiPhase::Armed { .. }) => {
            let win = window.clone();
            let retry = Closure::once_into_js(move |_ts: f64| try_start(win, view));
            let _ = window.request_animation_frame(retry.unchecked_ref());
        }
        None => {}
    }
}

/// Per-frame counter loop; stops scheduling once the run is finished.
fn start_counter(window: &Window, view: SharedView) {
    type RafClosure = Closure<dyn FnMut(f64)>;
    let f: Rc<RefCell<Option<RafClosure>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let win = window.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        let frame = {
            let mut v = view.borrow_mut();
            let frame = v.machine.tick(ts);
            if let Some(CounterFrame { value, .. }) = frame {
                v.render_counter(value);
            }
            frame
        };
        match frame {
            Some(CounterFrame {
                finished: false, ..
            }) => {
                if let Some(cb) = f.borrow().as_ref() {
                    let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
                }
            }
            _ => {
                debug(&format!("KPI counter settled at {}", view.borrow().machine.shown()));
                let _ = f.borrow_mut().take();
            }
        }
    }) as Box<dyn FnMut(f64)>));
    if let Some(cb) = g.borrow().as_ref() {
        let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
