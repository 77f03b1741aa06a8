//! Scroll progress indicator

/// How far down the page the visitor has scrolled, in percent [0, 100].
/// Pages that do not scroll report 0.
pub fn scroll_progress(scroll_y: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let scrollable = scroll_height - viewport_height;
    if scrollable.is_nan() || scrollable <= 0.0 || scroll_y.is_nan() {
        return 0.0;
    }
    (scroll_y / scrollable * 100.0).clamp(0.0, 100.0)
}
