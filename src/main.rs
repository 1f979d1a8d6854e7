//! Fog Sleigh entry point
//!
//! Browser: wires DOM, sensors and WebGPU to a [`Session`] and runs the
//! animation-frame loop. Native: runs a headless autopilot demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{
        DeviceMotionEvent, DeviceOrientationEvent, Document, HtmlCanvasElement, KeyboardEvent,
        PointerEvent,
    };

    use fog_sleigh::events::Presenter;
    use fog_sleigh::haptics::Haptics;
    use fog_sleigh::input::{Direction, InputEvent};
    use fog_sleigh::persistence::LocalStorage;
    use fog_sleigh::platform::{FrameTimer, KeyAction, key_action};
    use fog_sleigh::renderer::{RenderState, scene};
    use fog_sleigh::session::{SensorAccess, Session, SessionState};
    use fog_sleigh::tuning::Tuning;

    // Motion sensor access. iOS gates both events behind requestPermission,
    // which must be called from a user gesture.
    #[wasm_bindgen(inline_js = "
        export function sensor_support() {
            if (typeof DeviceOrientationEvent === 'undefined') {
                return 'unavailable';
            }
            if (typeof DeviceOrientationEvent.requestPermission === 'function') {
                return 'prompt';
            }
            return 'granted';
        }

        export async function request_motion_permission() {
            try {
                const orientation = await DeviceOrientationEvent.requestPermission();
                let motion = 'granted';
                if (typeof DeviceMotionEvent !== 'undefined'
                    && typeof DeviceMotionEvent.requestPermission === 'function') {
                    motion = await DeviceMotionEvent.requestPermission();
                }
                return orientation === 'granted' && motion === 'granted';
            } catch (e) {
                console.warn('Motion permission request failed:', e);
                return false;
            }
        }
    ")]
    extern "C" {
        fn sensor_support() -> String;
        fn request_motion_permission() -> js_sys::Promise;
    }

    /// Screens toggled by session state
    const SCREENS: [(SessionState, &str); 6] = [
        (SessionState::Menu, "menu"),
        (SessionState::Permission, "permission-screen"),
        (SessionState::Calibrating, "calibration-screen"),
        (SessionState::Paused, "pause-menu"),
        (SessionState::Success, "success-screen"),
        (SessionState::GameOver, "gameover-screen"),
    ];

    /// HUD and screens backed by the page's DOM
    struct DomHud {
        document: Document,
    }

    impl DomHud {
        fn text(&self, selector: &str, text: &str) {
            if let Some(el) = self.document.query_selector(selector).ok().flatten() {
                el.set_text_content(Some(text));
            }
        }

        fn show(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let classes = el.class_list();
                let _ = if visible {
                    classes.remove_1("hidden")
                } else {
                    classes.add_1("hidden")
                };
            }
        }

        /// Restart an element's CSS animation
        fn flash(&self, id: &str, style: Option<&str>) {
            if let Some(el) = self.document.get_element_by_id(id) {
                if let Some(style) = style {
                    let _ = el.set_attribute("style", style);
                }
                let classes = el.class_list();
                let _ = classes.remove_1("show");
                // Reflow so re-adding the class restarts the animation
                let _ = el.get_bounding_client_rect();
                let _ = classes.add_1("show");
            }
        }
    }

    impl Presenter for DomHud {
        fn update_score(&mut self, score: u64) {
            self.text("#hud-score .hud-value", &score.to_string());
        }

        fn update_timer(&mut self, secs: u32) {
            self.text("#hud-timer .hud-value", &secs.to_string());
            if let Some(el) = self.document.get_element_by_id("hud-timer") {
                let _ = el.class_list().toggle_with_force("low", secs <= 10);
            }
        }

        fn update_targets_found(&mut self, found: usize, total: usize) {
            self.text("#hud-found .hud-value", &format!("{found}/{total}"));
        }

        fn update_boost_charges(&mut self, charges: u8) {
            self.text("#hud-boosts .hud-value", &charges.to_string());
        }

        fn show_success(&mut self, score: u64, time_left_secs: u32, stars: u8) {
            let stars = stars.min(3) as usize;
            self.text("#success-score", &score.to_string());
            self.text("#success-time", &format!("{time_left_secs}s"));
            self.text("#success-stars", &format!("{}{}", "★".repeat(stars), "☆".repeat(3 - stars)));
        }

        fn show_failure(&mut self, found: usize, total: usize, score: u64) {
            self.text("#gameover-found", &format!("{found}/{total}"));
            self.text("#gameover-score", &score.to_string());
        }

        fn show_toast(&mut self, message: &str) {
            self.text("#toast", message);
            self.flash("toast", None);
        }

        fn show_score_popup(&mut self, pos: Vec2, points: u64, perfect: bool) {
            let label = if perfect {
                format!("+{points} Perfect!")
            } else {
                format!("+{points}")
            };
            self.text("#score-popup", &label);
            self.flash(
                "score-popup",
                Some(&format!("left:{:.0}px;top:{:.0}px", pos.x, pos.y)),
            );
        }

        fn show_direction_indicator(&mut self, angle: f32) {
            self.flash(
                "radar-arrow",
                Some(&format!("transform:translate(-50%,-50%) rotate({angle:.3}rad)")),
            );
        }

        fn show_calibration_progress(&mut self, fraction: f32) {
            if let Some(el) = self.document.get_element_by_id("calibration-bar") {
                let pct = (fraction.clamp(0.0, 1.0) * 100.0).round();
                let _ = el.set_attribute("style", &format!("width:{pct}%"));
            }
        }

        fn show_error(&mut self, message: &str) {
            self.text("#error-message", message);
            self.show("error-banner", true);
        }

        fn state_changed(&mut self, state: SessionState) {
            for (screen, id) in SCREENS {
                self.show(id, screen == state);
            }
            self.show(
                "hud",
                matches!(state, SessionState::Playing | SessionState::Paused),
            );
            if state == SessionState::Playing {
                self.show("error-banner", false);
            }
        }
    }

    /// Everything the page holds on to
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
        timer: FrameTimer,
        hud: DomHud,
        haptics: Haptics,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = self.timer.frame(time);
            self.session.frame(dt);
            self.render();
            self.session.flush(&mut self.hud, &self.haptics);
            if self.session.state() == SessionState::Menu {
                self.update_menu();
            }
        }

        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = scene::build(&self.session);
            let view = self.session.world().view.to_array();
            match render_state.render(&vertices, view) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    render_state.resize(render_state.size.0, render_state.size.1);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        fn update_menu(&self) {
            let progress = self.session.progress();
            self.hud
                .text("#menu-level", &(progress.furthest_unlocked() + 1).to_string());
            self.hud.text("#menu-stars", &progress.total_stars().to_string());
        }

        /// Match the canvas backing store and the session view to the page
        fn fit_canvas(&mut self, canvas: &HtmlCanvasElement) {
            let dpr = web_sys::window().map_or(1.0, |w| w.device_pixel_ratio());
            let client_w = canvas.client_width().max(1);
            let client_h = canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(render_state) = self.render_state.as_mut() {
                render_state.resize(width, height);
            }
            self.session.resize(client_w as f32, client_h as f32);
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Fog Sleigh starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()
            .map_err(|_| "not a canvas")?;

        let seed = js_sys::Date::now() as u64;
        let session = Session::new(Tuning::default(), Box::new(LocalStorage::new()), seed);
        let mut haptics = Haptics::from_navigator();
        haptics.set_enabled(session.settings().haptics);

        let game = Rc::new(RefCell::new(Game {
            session,
            render_state: None,
            timer: FrameTimer::new(),
            hud: DomHud {
                document: document.clone(),
            },
            haptics,
        }));
        log::info!("Session created with seed: {}", seed);

        let access = match sensor_support().as_str() {
            "unavailable" => SensorAccess::Unavailable,
            "granted" => SensorAccess::Granted,
            _ => SensorAccess::Unknown,
        };
        game.borrow_mut().session.set_sensor_access(access);
        log::info!("Motion sensors: {:?}", access);

        // WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let width = canvas.width().max(1);
        let height = canvas.height().max(1);
        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        {
            let mut g = game.borrow_mut();
            g.render_state = Some(render_state);
            g.fit_canvas(&canvas);
            g.hud.state_changed(SessionState::Menu);
            g.update_menu();
        }

        setup_sensor_handlers(&window, game.clone());
        setup_pointer_handlers(&canvas, game.clone());
        setup_keyboard(&window, game.clone());
        setup_buttons(&document, game.clone());
        setup_resize(&window, &canvas, game.clone());
        setup_auto_pause(&window, &document, game.clone());

        request_animation_frame(game);
        log::info!("Fog Sleigh running!");
        Ok(())
    }

    fn listen<E: wasm_bindgen::convert::FromWasmAbi + 'static>(
        target: &web_sys::EventTarget,
        event: &str,
        handler: impl FnMut(E) + 'static,
    ) {
        let closure = Closure::<dyn FnMut(E)>::new(handler);
        let _ = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_sensor_handlers(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(window, "deviceorientation", move |event: DeviceOrientationEvent| {
                if let (Some(gamma), Some(beta)) = (event.gamma(), event.beta()) {
                    game.borrow_mut().session.push_input(InputEvent::Orientation {
                        gamma: gamma as f32,
                        beta: beta as f32,
                    });
                }
            });
        }
        listen(window, "devicemotion", move |event: DeviceMotionEvent| {
            let Some(accel) = event.acceleration_including_gravity() else {
                return;
            };
            if let (Some(x), Some(y), Some(z)) = (accel.x(), accel.y(), accel.z()) {
                game.borrow_mut().session.push_input(InputEvent::Motion {
                    x: x as f32,
                    y: y as f32,
                    z: z as f32,
                });
            }
        });
    }

    fn pointer_pos(event: &PointerEvent) -> Vec2 {
        Vec2::new(event.offset_x() as f32, event.offset_y() as f32)
    }

    fn setup_pointer_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(canvas, "pointerdown", move |event: PointerEvent| {
                event.prevent_default();
                game.borrow_mut().session.push_input(InputEvent::PointerDown {
                    id: event.pointer_id(),
                    pos: pointer_pos(&event),
                });
            });
        }
        {
            let game = game.clone();
            listen(canvas, "pointermove", move |event: PointerEvent| {
                game.borrow_mut().session.push_input(InputEvent::PointerMove {
                    id: event.pointer_id(),
                    pos: pointer_pos(&event),
                });
            });
        }
        {
            let game = game.clone();
            listen(canvas, "pointerup", move |event: PointerEvent| {
                game.borrow_mut().session.push_input(InputEvent::PointerUp {
                    id: event.pointer_id(),
                    pos: pointer_pos(&event),
                });
            });
        }
        listen(canvas, "pointercancel", move |event: PointerEvent| {
            game.borrow_mut().session.push_input(InputEvent::PointerCancel {
                id: event.pointer_id(),
            });
        });
    }

    fn setup_keyboard(window: &web_sys::Window, game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            listen(window, "keydown", move |event: KeyboardEvent| {
                let Some(action) = key_action(&event.key()) else {
                    return;
                };
                let mut g = game.borrow_mut();
                match action {
                    KeyAction::Steer(dir) => g.session.push_input(InputEvent::Direction {
                        dir,
                        pressed: true,
                    }),
                    KeyAction::Boost if !event.repeat() => {
                        g.session.push_input(InputEvent::BoostButton)
                    }
                    KeyAction::Boost => {}
                    KeyAction::Pause => match g.session.state() {
                        SessionState::Playing => g.session.pause(),
                        SessionState::Paused => g.session.resume(),
                        _ => {}
                    },
                    KeyAction::ToggleAutopilot => {
                        let on = !g.session.autopilot();
                        g.session.set_autopilot(on);
                    }
                }
            });
        }
        listen(window, "keyup", move |event: KeyboardEvent| {
            if let Some(KeyAction::Steer(dir)) = key_action(&event.key()) {
                game.borrow_mut().session.push_input(InputEvent::Direction {
                    dir,
                    pressed: false,
                });
            }
        });
    }

    fn on_click(document: &Document, id: &str, game: &Rc<RefCell<Game>>, action: fn(&mut Game)) {
        let Some(btn) = document.get_element_by_id(id) else {
            log::debug!("No #{id} button on the page");
            return;
        };
        let game = game.clone();
        listen(&btn, "click", move |_event: web_sys::MouseEvent| {
            action(&mut game.borrow_mut());
        });
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        on_click(document, "play-btn", &game, |g| {
            let level = g.session.progress().furthest_unlocked();
            g.session.play(level);
        });
        on_click(document, "permission-deny-btn", &game, |g| {
            g.session.grant_permission(false)
        });
        on_click(document, "skip-calibration-btn", &game, |g| {
            g.session.skip_calibration()
        });
        on_click(document, "pause-btn", &game, |g| g.session.pause());
        on_click(document, "resume-btn", &game, |g| {
            g.timer.reset();
            g.session.resume();
        });
        for id in ["pause-quit-btn", "success-quit-btn", "gameover-quit-btn"] {
            on_click(document, id, &game, |g| g.session.quit());
        }
        for id in ["success-retry-btn", "gameover-retry-btn"] {
            on_click(document, id, &game, |g| g.session.retry());
        }
        on_click(document, "next-btn", &game, |g| {
            g.session.next_level();
        });
        on_click(document, "boost-btn", &game, |g| {
            g.session.push_input(InputEvent::BoostButton)
        });

        // The permission prompt must start inside the click handler
        if let Some(btn) = document.get_element_by_id("permission-btn") {
            let game = game.clone();
            listen(&btn, "click", move |_event: web_sys::MouseEvent| {
                let request = request_motion_permission();
                let game = game.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let granted = JsFuture::from(request)
                        .await
                        .ok()
                        .and_then(|v| v.as_bool())
                        .unwrap_or(false);
                    game.borrow_mut().session.grant_permission(granted);
                });
            });
        }

        // On-screen arrows for button steering
        for (id, dir) in [
            ("arrow-up", Direction::Up),
            ("arrow-down", Direction::Down),
            ("arrow-left", Direction::Left),
            ("arrow-right", Direction::Right),
        ] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            for (event, pressed) in [
                ("pointerdown", true),
                ("pointerup", false),
                ("pointerleave", false),
                ("pointercancel", false),
            ] {
                let game = game.clone();
                listen(&btn, event, move |_event: PointerEvent| {
                    game.borrow_mut()
                        .session
                        .push_input(InputEvent::Direction { dir, pressed });
                });
            }
        }
    }

    fn setup_resize(window: &web_sys::Window, canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let canvas = canvas.clone();
        listen(window, "resize", move |_event: web_sys::Event| {
            game.borrow_mut().fit_canvas(&canvas);
        });
    }

    fn setup_auto_pause(window: &web_sys::Window, document: &Document, game: Rc<RefCell<Game>>) {
        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            listen(document, "visibilitychange", move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    if g.session.state() == SessionState::Playing {
                        g.session.pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                    g.timer.reset();
                }
            });
        }
        // Window blur (click outside)
        listen(window, "blur", move |_event: web_sys::FocusEvent| {
            let mut g = game.borrow_mut();
            if g.session.state() == SessionState::Playing {
                g.session.pause();
                log::info!("Auto-paused (window blur)");
            }
        });
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Fog Sleigh failed to start: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use fog_sleigh::consts::SIM_DT_MS;
    use fog_sleigh::persistence::MemoryStorage;
    use fog_sleigh::session::SensorAccess;
    use fog_sleigh::sim::levels;
    use fog_sleigh::{GameEvent, Session, SessionState, Tuning};

    env_logger::init();
    log::info!("Fog Sleigh (native) starting...");
    log::info!("The playable build runs in the browser; running an autopilot demo");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2024);
    let mut session = Session::new(Tuning::default(), Box::new(MemoryStorage::default()), seed);
    session.set_sensor_access(SensorAccess::Unavailable);
    session.set_autopilot(true);
    session.play(0);

    loop {
        while session.state().is_active() {
            session.frame(SIM_DT_MS);
        }
        let level = session.level_index() + 1;
        for event in session.drain_events() {
            match event {
                GameEvent::Success { score, time_left_secs, stars } => println!(
                    "Level {level}: delivered, score {score}, {time_left_secs}s left, {stars} stars"
                ),
                GameEvent::Failure { found, total, score } => {
                    println!("Level {level}: out of time, {found}/{total} found, score {score}")
                }
                GameEvent::Error(message) => println!("Level {level}: {message}"),
                _ => {}
            }
        }
        if session.state() != SessionState::Success
            || session.level_index() + 1 >= levels::authored_count() as u32
            || !session.next_level()
        {
            break;
        }
    }
    println!("Total stars: {}", session.progress().total_stars());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
