/// In-page helper used by CDP backends to resolve selectors and draw markers.
/// Installs `window.__lumen`; evaluating it twice is harmless.
pub const OVERLAY_JS: &str = include_str!("overlay.js");

/// Global the helper installs.
pub const OVERLAY_GLOBAL: &str = "__lumen";
