use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Array;
use landing_core::{GroupTrigger, LandingConfig};
use wasm_bindgen::closure::Closure;
use web_sys::{Element, IntersectionObserver, Window};

use crate::kpi::SharedView;
use crate::sweep::SweepTask;

pub type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// Page-wide state stored behind an `Rc<RefCell<_>>` so it can be shared
/// across the WASM callbacks.
pub struct PageState {
    pub window: Window,
    pub config: LandingConfig,
    pub views: Vec<SharedView>,
    /// Element whose visibility fires the KPI group.
    pub sentinel: Option<Element>,
    pub trigger: GroupTrigger,
    pub observer: Option<IntersectionObserver>,
    /// Kept alive for as long as `observer` may call it.
    pub observer_cb: Option<ObserverCallback>,
    pub sweep: Option<SweepTask>,
}

impl PageState {
    pub fn new(window: Window, config: LandingConfig) -> Self {
        PageState {
            window,
            config,
            views: Vec::new(),
            sentinel: None,
            trigger: GroupTrigger::new(),
            observer: None,
            observer_cb: None,
            sweep: None,
        }
    }
}

/// Thread local storage for the single runtime state instance.
thread_local! {
    pub static STATE: RefCell<Option<Rc<RefCell<PageState>>>> = const { RefCell::new(None) };
}

pub fn with_state<R>(f: impl FnOnce(&Rc<RefCell<PageState>>) -> R) -> Option<R> {
    STATE.with(|st| st.borrow().as_ref().map(f))
}
