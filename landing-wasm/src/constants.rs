//! Markup hooks the host page provides.

/// Container grouping all KPI cards.
pub const KPI_GRID_SELECTOR: &str = ".eg-kpi-grid";
pub const KPI_CARD_SELECTOR: &str = ".eg-kpi";
/// Ring stroke inside a card.
pub const RING_FILL_SELECTOR: &str = "[data-fill]";
/// Numeric label inside a card.
pub const COUNTER_SELECTOR: &str = "[data-count]";
pub const PERCENT_ATTR: &str = "data-percent";
/// Optional `<script type="application/json">` holding config overrides.
pub const CONFIG_ELEMENT_ID: &str = "eg-config";
/// Query parameter that turns on debug logging.
pub const DEBUG_QUERY_PARAM: &str = "eg_debug";
/// Custom property mirroring the ring circumference for page CSS.
pub const CIRC_CSS_VAR: &str = "--eg-circ";
/// Prefix for console messages.
pub const LOG_PREFIX: &str = "EG landing";
