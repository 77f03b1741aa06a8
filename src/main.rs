//! Portfolio FX entry point
//!
//! Handles platform-specific initialization: the page effects in the browser,
//! a headless run of the same components natively.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod web_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use gloo_events::{EventListener, EventListenerOptions};
    use wasm_bindgen::JsCast;
    use web_sys::{Document, Element, Event, HtmlCanvasElement, HtmlElement, MouseEvent, TouchEvent};

    use portfolio_fx::consts::{TRAIL_CAPACITY, TRAIL_DOT_SIZE};
    use portfolio_fx::field::{CursorTrail, FieldConfig, ParticleField, TouchCapture, Viewport};
    use portfolio_fx::intro::{IntroSequencer, IntroState, WORD_COUNT};
    use portfolio_fx::loader::LoaderOverlay;
    use portfolio_fx::platform::web::{
        RafScheduler, TimeoutScheduler, now_ms, size_canvas, window_viewport,
    };
    use portfolio_fx::renderer::{RenderState, SurfaceAction, SurfaceHealth};
    use portfolio_fx::scroll::scroll_progress;
    use portfolio_fx::{FxError, QualityPreset, Settings};

    // Host page element ids
    const INTRO_ID: &str = "intro";
    const STARS_ID: &str = "intro-stars";
    const WORDS_ID: &str = "intro-words";
    const BOX_ID: &str = "intro-box";
    const NAME_ID: &str = "intro-name";
    const MAIN_ID: &str = "main";
    const CANVAS_ID: &str = "field";
    const TRAIL_ID: &str = "cursor-trail";
    const SCROLL_ID: &str = "scroll-progress";
    const LOADER_ID: &str = "loader";
    const LOADER_PERCENT_ID: &str = "loader-percent";
    const LOADER_MESSAGE_ID: &str = "loader-message";
    const LOADER_BAR_ID: &str = "loader-bar";

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn toggle_class(document: &Document, id: &str, class: &str, on: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force(class, on);
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Page state shared by every callback
    struct App {
        this: Weak<RefCell<App>>,
        settings: Settings,
        seed: u64,
        canvas: HtmlCanvasElement,

        intro: Option<IntroSequencer<TimeoutScheduler>>,
        intro_started: f64,

        field: Option<ParticleField<RafScheduler>>,
        renderer: Option<RenderState>,
        health: SurfaceHealth,

        touch: TouchCapture,
        trail: CursorTrail,
        trail_dots: Vec<HtmlElement>,
        loader: LoaderOverlay,

        /// Persistent frame callback; it only holds a `Weak` back to the app
        frame_cb: Rc<dyn Fn(f64)>,
        /// Unregistered on drop
        _listeners: Vec<EventListener>,
    }

    impl App {
        fn new(settings: Settings, seed: u64, canvas: HtmlCanvasElement) -> Rc<RefCell<Self>> {
            Rc::new_cyclic(|weak: &Weak<RefCell<App>>| {
                let frame_cb: Rc<dyn Fn(f64)> = {
                    let weak = weak.clone();
                    Rc::new(move |time: f64| {
                        if let Some(app) = weak.upgrade() {
                            app.borrow_mut().on_frame(time);
                        }
                    })
                };
                let timer_cb: Rc<dyn Fn()> = {
                    let weak = weak.clone();
                    Rc::new(move || {
                        if let Some(app) = weak.upgrade() {
                            app.borrow_mut().on_intro_timer();
                        }
                    })
                };

                let on_complete = {
                    let weak = weak.clone();
                    // Runs inside the timer callback; swap pages once it has returned
                    move || App::finish_intro_later(weak)
                };
                let intro = match IntroSequencer::mount(TimeoutScheduler::new(timer_cb), seed, on_complete) {
                    Ok(intro) if intro.is_stalled() => {
                        log::warn!("No timer for the intro, skipping it");
                        App::finish_intro_later(weak.clone());
                        None
                    }
                    Ok(intro) => Some(intro),
                    Err(e) => {
                        log::warn!("Intro unavailable, skipping: {}", e);
                        App::finish_intro_later(weak.clone());
                        None
                    }
                };

                let mut app = App {
                    this: weak.clone(),
                    settings,
                    seed,
                    canvas,
                    intro,
                    intro_started: now_ms(),
                    field: None,
                    renderer: None,
                    health: SurfaceHealth::new(),
                    touch: TouchCapture::default(),
                    trail: CursorTrail::default(),
                    trail_dots: Vec::new(),
                    loader: LoaderOverlay::new(),
                    frame_cb,
                    _listeners: Vec::new(),
                };
                app.build_stars();
                app.build_trail();
                app.render_scroll_bar();
                RefCell::new(app)
            })
        }

        // === Intro ===

        fn build_stars(&self) {
            let (Some(document), Some(intro)) = (document(), self.intro.as_ref()) else {
                return;
            };
            let Some(container) = document.get_element_by_id(STARS_ID) else {
                return;
            };
            for star in intro.stars() {
                if let Ok(el) = document.create_element("div") {
                    el.set_class_name("star");
                    let _ = el.set_attribute("style", &star.style());
                    let _ = container.append_child(&el);
                }
            }
        }

        fn on_intro_timer(&mut self) {
            let elapsed = (now_ms() - self.intro_started).max(0.0) as u32;
            let Some(intro) = self.intro.as_mut() else {
                return;
            };
            intro.on_timer(elapsed);
            let state = intro.state().clone();
            let stalled = intro.is_stalled();
            Self::render_intro(&state);
            if stalled {
                log::warn!("Intro stalled at {}ms, skipping the rest", elapsed);
                Self::finish_intro_later(self.this.clone());
            }
        }

        fn render_intro(state: &IntroState) {
            let Some(document) = document() else {
                return;
            };
            for i in 0..WORD_COUNT {
                toggle_class(&document, &format!("intro-word-{}", i), "visible", state.words[i]);
            }
            toggle_class(&document, WORDS_ID, "exit", state.words_exit);
            if let Some(el) = document.get_element_by_id(BOX_ID) {
                el.set_class_name(&format!("intro-box {}", state.box_phase.css_class()));
            }
            toggle_class(&document, NAME_ID, "visible", state.name_revealed);
        }

        /// Finish the intro from a fresh task, outside any callback borrowing the app
        fn finish_intro_later(app: Weak<RefCell<App>>) {
            wasm_bindgen_futures::spawn_local(async move {
                if let Some(app) = app.upgrade() {
                    App::finish_intro(&app);
                }
            });
        }

        /// Hide the intro, reveal the page and start the backdrop
        fn finish_intro(app: &Rc<RefCell<App>>) {
            {
                let mut a = app.borrow_mut();
                if a.field.is_some() {
                    return;
                }
                a.intro = None;
                if let Some(document) = document() {
                    toggle_class(&document, INTRO_ID, "hidden", true);
                    toggle_class(&document, MAIN_ID, "hidden", false);
                }
                a.mount_field();
            }
            wasm_bindgen_futures::spawn_local(acquire_renderer(Rc::downgrade(app)));
        }

        // === Field ===

        fn mount_field(&mut self) {
            let viewport = window_viewport();
            size_canvas(&self.canvas, viewport);

            let config = FieldConfig::from_settings(&self.settings);
            let style = self.canvas.style();
            let _ = style.set_property("z-index", &config.z_index.to_string());
            let _ = style.set_property("background", config.background.css_value());

            let scheduler = RafScheduler::new(self.frame_cb.clone());
            self.field = Some(ParticleField::mount(config, viewport, self.seed, scheduler));
        }

        fn on_frame(&mut self, time: f64) {
            let Some(field) = self.field.as_mut() else {
                return;
            };
            let renderer = &mut self.renderer;
            let health = &mut self.health;
            let mut disable = false;
            let ran = field.on_frame_with(time, |state, frame| {
                let Some(renderer) = renderer.as_mut() else {
                    return;
                };
                match renderer.render(frame, state.viewport) {
                    Ok(()) => health.record_success(),
                    Err(e) => match health.record_failure(&e) {
                        SurfaceAction::Reconfigure => renderer.reconfigure(),
                        SurfaceAction::Skip => {}
                        SurfaceAction::Disable => disable = true,
                    },
                }
            });
            if !ran {
                return;
            }
            if disable {
                self.renderer = None;
            }

            self.render_trail(time);

            let before = self.loader.progress();
            self.loader.tick(time);
            if self.loader.progress() != before {
                self.render_loader();
            }
        }

        fn on_resize(&mut self) {
            let viewport = window_viewport();
            let (width, height) = size_canvas(&self.canvas, viewport);
            if let Some(field) = self.field.as_mut() {
                field.resize(viewport);
            }
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.resize(width, height);
            }
            self.render_scroll_bar();
        }

        /// Pointer position in canvas CSS px
        fn canvas_point(&self, client_x: f32, client_y: f32) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            Vec2::new(client_x - rect.left() as f32, client_y - rect.top() as f32)
        }

        fn pointer_move(&mut self, client_x: f32, client_y: f32) {
            let now = now_ms();
            let point = self.canvas_point(client_x, client_y);
            if let Some(field) = self.field.as_mut() {
                field.pointer_move(point.x, point.y, now);
            }
            if self.settings.effective_cursor_trail() {
                self.trail.push(Vec2::new(client_x, client_y), now);
            }
        }

        fn pointer_down(&mut self) {
            if let Some(field) = self.field.as_mut() {
                field.pointer_down();
            }
        }

        fn pointer_up(&mut self) {
            if let Some(field) = self.field.as_mut() {
                field.pointer_up();
            }
        }

        fn touch_start(&mut self, on_backdrop: bool, client_x: f32, client_y: f32) {
            let claim = on_backdrop && self.field.is_some() && self.settings.pointer_interaction;
            if self.touch.begin(claim) {
                self.pointer_move(client_x, client_y);
                self.pointer_down();
            }
        }

        fn touch_end(&mut self) {
            if self.touch.end() {
                self.pointer_up();
            }
        }

        // === Page chrome ===

        fn build_trail(&mut self) {
            if !self.settings.effective_cursor_trail() {
                return;
            }
            let Some(document) = document() else {
                return;
            };
            let Some(container) = document.get_element_by_id(TRAIL_ID) else {
                return;
            };
            for _ in 0..TRAIL_CAPACITY {
                let Some(dot) = document
                    .create_element("div")
                    .ok()
                    .and_then(|el| el.dyn_into::<HtmlElement>().ok())
                else {
                    continue;
                };
                dot.set_class_name("trail-dot");
                let _ = container.append_child(&dot);
                self.trail_dots.push(dot);
            }
        }

        fn render_trail(&mut self, now: f64) {
            if self.trail_dots.is_empty() {
                return;
            }
            self.trail.prune(now);
            let dots = self.trail.dots(now);
            for (i, el) in self.trail_dots.iter().enumerate() {
                let style = el.style();
                match dots.get(i) {
                    Some(dot) => {
                        let offset = TRAIL_DOT_SIZE * 0.5;
                        let _ = style.set_property(
                            "transform",
                            &format!(
                                "translate({:.1}px, {:.1}px) scale({:.3})",
                                dot.pos.x - offset,
                                dot.pos.y - offset,
                                dot.scale
                            ),
                        );
                        let _ = style.set_property("opacity", &format!("{:.3}", dot.opacity));
                    }
                    None => {
                        let _ = style.set_property("opacity", "0");
                    }
                }
            }
        }

        fn render_scroll_bar(&self) {
            let (Some(window), Some(document)) = (web_sys::window(), document()) else {
                return;
            };
            let Some(bar) = document
                .get_element_by_id(SCROLL_ID)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            else {
                return;
            };
            if !self.settings.scroll_indicator {
                let _ = bar.style().set_property("display", "none");
                return;
            }
            let scroll_y = window.scroll_y().unwrap_or(0.0);
            let scroll_height = document
                .document_element()
                .map(|el| el.scroll_height() as f64)
                .unwrap_or(0.0);
            let viewport_height = window
                .inner_height()
                .ok()
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            let progress = scroll_progress(scroll_y, scroll_height, viewport_height);
            let _ = bar.style().set_property("height", &format!("{:.2}%", progress));
        }

        fn render_loader(&self) {
            let Some(document) = document() else {
                return;
            };
            let percent = format!("{}%", self.loader.percent());
            toggle_class(&document, LOADER_ID, "hidden", !self.loader.is_visible());
            set_text(&document, LOADER_PERCENT_ID, &percent);
            set_text(&document, LOADER_MESSAGE_ID, self.loader.message());
            if let Some(bar) = document
                .get_element_by_id(LOADER_BAR_ID)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
            {
                let _ = bar.style().set_property("width", &percent);
            }
        }

        fn set_loader_progress(&mut self, progress: f32) {
            self.loader.update_progress(progress);
            self.render_loader();
        }
    }

    /// Acquire the GPU surface behind the loader overlay. On failure the field
    /// keeps running without drawing.
    async fn acquire_renderer(app: Weak<RefCell<App>>) {
        let (canvas, viewport) = {
            let Some(strong) = app.upgrade() else {
                return;
            };
            let mut a = strong.borrow_mut();
            a.loader.show();
            a.set_loader_progress(0.0);
            let viewport = a
                .field
                .as_ref()
                .map(|f| f.state().viewport)
                .unwrap_or_else(window_viewport);
            (a.canvas.clone(), viewport)
        };

        let result = create_renderer(canvas, viewport, &app).await;

        let Some(strong) = app.upgrade() else {
            return;
        };
        let mut a = strong.borrow_mut();
        match result {
            Ok(renderer) => {
                a.renderer = Some(renderer);
                a.health = SurfaceHealth::new();
                log::info!("Renderer ready");
            }
            Err(e) => log::warn!("WebGPU unavailable, particle field runs undrawn: {}", e),
        }
        a.set_loader_progress(1.0);
        a.loader.hide(now_ms());
        a.render_loader();
    }

    fn report_progress(app: &Weak<RefCell<App>>, progress: f32) {
        if let Some(app) = app.upgrade() {
            app.borrow_mut().set_loader_progress(progress);
        }
    }

    async fn create_renderer(
        canvas: HtmlCanvasElement,
        viewport: Viewport,
        app: &Weak<RefCell<App>>,
    ) -> Result<RenderState, FxError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas))?;
        report_progress(app, 0.25);

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);
        report_progress(app, 0.5);

        let (width, height) = viewport.pixel_size();
        let renderer = RenderState::new(surface, &adapter, width, height).await?;
        report_progress(app, 0.75);
        Ok(renderer)
    }

    fn install_listeners(app: &Rc<RefCell<App>>) {
        let (Some(window), Some(document)) = (web_sys::window(), document()) else {
            return;
        };
        let mut listeners = Vec::new();

        // Weak handle for one listener
        let handle = || Rc::downgrade(app);
        let active = EventListenerOptions::enable_prevent_default();

        {
            let app = handle();
            listeners.push(EventListener::new(&window, "resize", move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().on_resize();
                }
            }));
        }
        {
            let app = handle();
            listeners.push(EventListener::new(&window, "scroll", move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow().render_scroll_bar();
                }
            }));
        }
        {
            let app = handle();
            listeners.push(EventListener::new(&window, "mousemove", move |event: &Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                if let Some(app) = app.upgrade() {
                    app.borrow_mut()
                        .pointer_move(event.client_x() as f32, event.client_y() as f32);
                }
            }));
        }
        {
            let app = handle();
            listeners.push(EventListener::new(&window, "mousedown", move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().pointer_down();
                }
            }));
        }
        for name in ["mouseup", "blur"] {
            let app = handle();
            listeners.push(EventListener::new(&window, name, move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().pointer_up();
                }
            }));
        }
        if let Some(root) = document.document_element() {
            let app = handle();
            listeners.push(EventListener::new(&root, "mouseleave", move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().pointer_up();
                }
            }));
        }

        // Touch on the window: content sits above the canvas. Gestures that
        // start on the backdrop press the field and suppress scrolling.
        {
            let app = handle();
            listeners.push(EventListener::new(&window, "touchstart", move |event: &Event| {
                let Some(touch) = event.dyn_ref::<TouchEvent>().and_then(|e| e.touches().get(0)) else {
                    return;
                };
                if let Some(app) = app.upgrade() {
                    app.borrow_mut()
                        .touch_start(on_backdrop(event), touch.client_x() as f32, touch.client_y() as f32);
                }
            }));
        }
        {
            let app = handle();
            listeners.push(EventListener::new_with_options(&window, "touchmove", active, move |event: &Event| {
                let Some(event) = event.dyn_ref::<TouchEvent>() else {
                    return;
                };
                let Some(app) = app.upgrade() else {
                    return;
                };
                let mut a = app.borrow_mut();
                if !a.touch.suppress_scroll() {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    a.pointer_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            }));
        }
        for name in ["touchend", "touchcancel"] {
            let app = handle();
            listeners.push(EventListener::new(&window, name, move |_: &Event| {
                if let Some(app) = app.upgrade() {
                    app.borrow_mut().touch_end();
                }
            }));
        }

        app.borrow_mut()._listeners = listeners;
    }

    /// Touch landed on the page background rather than on content
    fn on_backdrop(event: &Event) -> bool {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return false;
        };
        matches!(target.id().as_str(), CANVAS_ID | MAIN_ID) || matches!(target.tag_name().as_str(), "BODY" | "HTML")
    }

    /// Quality preset requested in the page URL
    fn query_preset() -> Option<QualityPreset> {
        let search = web_sys::window()?.location().search().ok()?;
        QualityPreset::from_query(&search)
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .is_some_and(|query| query.matches())
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Portfolio FX starting...");

        let Some(document) = document() else {
            log::warn!("No document, nothing to animate");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id(CANVAS_ID)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No #{} canvas on the page", CANVAS_ID);
            return;
        };

        let mut settings = Settings::load();
        if let Some(preset) = query_preset() {
            if settings.apply_preset(preset) {
                settings.save();
            }
        }
        if prefers_reduced_motion() {
            settings.reduced_motion = true;
        }

        let seed = js_sys::Date::now() as u64;
        log::info!("Seed: {}, quality: {}", seed, settings.quality.as_str());

        let app = App::new(settings, seed, canvas);
        install_listeners(&app);
        APP.with(|slot| *slot.borrow_mut() = Some(app));

        log::info!("Portfolio FX running!");
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    web_app::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    //! Drives the intro and the field with fake time and logs what happens

    use std::cell::Cell;
    use std::rc::Rc;

    use portfolio_fx::Settings;
    use portfolio_fx::field::{FieldConfig, ParticleField, Viewport};
    use portfolio_fx::intro::IntroSequencer;
    use portfolio_fx::platform::{FrameHandle, FrameScheduler, TimerHandle, TimerScheduler};

    /// Remembers the last armed delay so the demo can jump straight to it
    #[derive(Clone, Default)]
    struct ManualTimers {
        armed: Rc<Cell<Option<u32>>>,
        next: i32,
    }

    impl TimerScheduler for ManualTimers {
        fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerHandle> {
            self.next += 1;
            self.armed.set(Some(delay_ms));
            Some(TimerHandle(self.next))
        }

        fn clear_timeout(&mut self, _handle: TimerHandle) {
            self.armed.set(None);
        }
    }

    #[derive(Default)]
    struct ManualFrames {
        next: i32,
    }

    impl FrameScheduler for ManualFrames {
        fn request_frame(&mut self) -> Option<FrameHandle> {
            self.next += 1;
            Some(FrameHandle(self.next))
        }

        fn cancel_frame(&mut self, _handle: FrameHandle) {}
    }

    pub fn run_intro(seed: u64) -> portfolio_fx::Result<u32> {
        let timers = ManualTimers::default();
        let armed = timers.armed.clone();
        let finished = Rc::new(Cell::new(false));
        let finished_cb = finished.clone();

        let mut intro = IntroSequencer::mount(timers, seed, move || finished_cb.set(true))?;
        let mut now = 0;
        while let Some(delay) = armed.take() {
            now += delay;
            intro.on_timer(now);
            log::info!("{:>5}ms  {:?}", now, intro.phase());
        }
        if !finished.get() {
            log::warn!("Intro ran out of steps without completing");
        }
        Ok(now)
    }

    pub fn run_field(seed: u64, frames: u32) {
        let config = FieldConfig::from_settings(&Settings::default());
        let mut field = ParticleField::mount(
            config,
            Viewport::new(800.0, 600.0, 1.0),
            seed,
            ManualFrames::default(),
        );
        field.pointer_move(400.0, 300.0, 0.0);
        field.pointer_down();

        for i in 0..frames {
            let time = i as f64 * 1000.0 / 60.0;
            if let Some(frame) = field.on_frame(time) {
                if i % 30 == 0 {
                    log::info!(
                        "frame {:>3}: {} circles, {} lines",
                        i,
                        frame.circles().count(),
                        frame.lines().count()
                    );
                }
            }
        }

        let state = field.state();
        let bounds = state.viewport.size();
        let inside = state.particles.iter().filter(|p| p.in_bounds(bounds)).count();
        log::info!(
            "{} of {} particles in bounds after {} frames",
            inside,
            state.particles.len(),
            field.frames()
        );
        field.unmount();
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Portfolio FX (native) starting...");
    log::info!("Rendering needs a browser - run with `trunk serve` for the web version");

    let seed = 7;
    match headless::run_intro(seed) {
        Ok(ms) => log::info!("Intro finished after {}ms", ms),
        Err(e) => log::error!("Intro failed: {}", e),
    }
    headless::run_field(seed, 120);
}

#[cfg(target_arch = "wasm32")]
fn main() {
}
