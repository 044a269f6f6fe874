use std::cell::Cell;

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CssStyleDeclaration, Element, Window};

use crate::constants::LOG_PREFIX;

thread_local! {
    static DEBUG: Cell<bool> = const { Cell::new(false) };
}

pub fn set_debug(on: bool) {
    DEBUG.with(|d| d.set(on));
}

/// Log a message to the browser console.
pub fn log(s: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("{LOG_PREFIX}: {s}")));
}

pub fn warn(s: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{LOG_PREFIX}: {s}")));
}

pub fn error(s: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{LOG_PREFIX}: {s}")));
}

/// Only printed when debug logging is on.
pub fn debug(s: &str) {
    if DEBUG.with(Cell::get) {
        web_sys::console::debug_1(&JsValue::from_str(&format!("{LOG_PREFIX}: {s}")));
    }
}

/// Inline style of an HTML or SVG element.
pub fn inline_style(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(html) = el.dyn_ref::<web_sys::HtmlElement>() {
        return Some(html.style());
    }
    el.dyn_ref::<web_sys::SvgElement>().map(|svg| svg.style())
}

/// High resolution timestamp on the same clock as animation frames.
pub fn now_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Simple query string parser used at start-up.
pub fn get_query_param(search: &str, key: &str) -> Option<String> {
    let s = search.trim_start_matches('?');
    for pair in s.split('&') {
        let mut it = pair.splitn(2, '=');
        let k = it.next()?;
        let v = it.next().unwrap_or("");
        if k == key {
            return Some(url_decode(v));
        }
    }
    None
}

fn url_decode(s: &str) -> String {
    let s = s.replace('+', " ");
    percent_encoding::percent_decode_str(&s)
        .decode_utf8_lossy()
        .to_string()
}

/// Truthy query flag: present with no value, `1`, `true`, `on` or `yes`.
pub fn flag_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "1" | "true" | "on" | "yes"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_param_lookup() {
        assert_eq!(
            get_query_param("?a=1&eg_debug=on", "eg_debug").as_deref(),
            Some("on")
        );
        assert_eq!(get_query_param("?eg_debug", "eg_debug").as_deref(), Some(""));
        assert_eq!(get_query_param("?a=1", "eg_debug"), None);
        assert_eq!(get_query_param("", "eg_debug"), None);
    }

    #[test]
    fn query_values_are_decoded() {
        assert_eq!(
            get_query_param("?note=hello+world%21", "note").as_deref(),
            Some("hello world!")
        );
    }

    #[test]
    fn debug_flag_values() {
        assert!(flag_enabled(""));
        assert!(flag_enabled("1"));
        assert!(flag_enabled("TRUE"));
        assert!(!flag_enabled("0"));
        assert!(!flag_enabled("off"));
    }
}
