//! Browser implementations of the scheduling seams
//!
//! Each scheduler shares one callback with its owner and keeps the gloo handle
//! of its outstanding request. Dropping or replacing that handle cancels the
//! request, so a scheduler that is gone never calls back. The callbacks only
//! hold a `Weak` reference back to the component.

use std::rc::Rc;

use gloo_render::{AnimationFrame, request_animation_frame};
use gloo_timers::callback::Timeout;
use web_sys::HtmlCanvasElement;

use super::{FrameHandle, FrameScheduler, TimerHandle, TimerScheduler};
use crate::field::Viewport;

/// `requestAnimationFrame` with a fixed callback
pub struct RafScheduler {
    callback: Rc<dyn Fn(f64)>,
    pending: Option<AnimationFrame>,
    next: i32,
}

impl RafScheduler {
    pub fn new(callback: Rc<dyn Fn(f64)>) -> Self {
        Self {
            callback,
            pending: None,
            next: 0,
        }
    }
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        let callback = Rc::clone(&self.callback);
        self.pending = Some(request_animation_frame(move |time| callback(time)));
        self.next = self.next.wrapping_add(1);
        Some(FrameHandle(self.next))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if handle.0 == self.next {
            self.pending = None;
        }
    }
}

/// `setTimeout` with a fixed callback
pub struct TimeoutScheduler {
    callback: Rc<dyn Fn()>,
    pending: Option<Timeout>,
    next: i32,
}

impl TimeoutScheduler {
    pub fn new(callback: Rc<dyn Fn()>) -> Self {
        Self {
            callback,
            pending: None,
            next: 0,
        }
    }
}

impl TimerScheduler for TimeoutScheduler {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerHandle> {
        let callback = Rc::clone(&self.callback);
        self.pending = Some(Timeout::new(delay_ms, move || callback()));
        self.next = self.next.wrapping_add(1);
        Some(TimerHandle(self.next))
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        if handle.0 == self.next {
            self.pending = None;
        }
    }
}

/// `performance.now()` in ms (0 if unavailable)
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

/// Current window viewport in CSS px
pub fn window_viewport() -> Viewport {
    let Some(window) = web_sys::window() else {
        return Viewport::new(0.0, 0.0, 1.0);
    };
    let width = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    let height = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    Viewport::new(width as f32, height as f32, window.device_pixel_ratio() as f32)
}

/// Size the canvas backing store in device pixels and its CSS box in CSS px
pub fn size_canvas(canvas: &HtmlCanvasElement, viewport: Viewport) -> (u32, u32) {
    let (width, height) = viewport.pixel_size();
    canvas.set_width(width.max(1));
    canvas.set_height(height.max(1));
    let style = canvas.style();
    let _ = style.set_property("width", &format!("{}px", viewport.width));
    let _ = style.set_property("height", &format!("{}px", viewport.height));
    (width, height)
}
