//! Moto Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use moto_chase::audio::AudioManager;
    use moto_chase::platform::{Joystick, LocalStorageStore, Viewport, apply_key};
    use moto_chase::renderer::{BlinkTimer, RenderState, build_scene};
    use moto_chase::sim::{GameEvent, TickInput};
    use moto_chase::{Session, SessionPhase, Settings, Tuning};

    /// Game instance holding all state
    struct Game {
        session: Session<LocalStorageStore>,
        render_state: Option<RenderState>,
        input: TickInput,
        joystick: Joystick,
        blink: BlinkTimer,
        audio: AudioManager,
        settings: Settings,
        canvas: HtmlCanvasElement,
        /// A requestAnimationFrame chain is live
        loop_running: bool,
    }

    impl Game {
        fn new(canvas: HtmlCanvasElement, viewport: Viewport) -> Self {
            let settings = Settings::load();
            let audio = AudioManager::new(&settings);
            Self {
                session: Session::new(LocalStorageStore, viewport, Tuning::default()),
                render_state: None,
                input: TickInput::default(),
                joystick: Joystick::new(&viewport),
                blink: BlinkTimer::new(),
                audio,
                settings,
                canvas,
                loop_running: false,
            }
        }

        /// Start (or restart) a session from a button press
        fn start(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.session.start(seed);
            self.input = TickInput::default();
            self.joystick.release();
            self.audio.resume();
            self.audio.stop_all();
            self.audio.start_music();
            set_visible("playButton", false);
            set_visible("restartButton", false);
        }

        /// One display refresh. Returns true to keep the loop going.
        fn step(&mut self, time: f64) -> bool {
            self.input.joystick = self.joystick.direction();
            let running = self.session.tick(&self.input);
            // Kick is edge-triggered
            self.input.kick = false;

            let events = self.session.drain_events();
            self.audio.play_events(&events);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { .. }))
            {
                self.audio.stop_music();
                set_visible("restartButton", true);
            }

            self.blink.update(time);
            self.render();
            self.update_hud();
            running
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(self.session.state(), &self.joystick, &self.blink);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let state = self.session.state();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&format!("Score: {}", state.score)));
            }
            if let Some(el) = document.get_element_by_id("bestScore") {
                el.set_text_content(Some(&format!("Best Score: {}", state.best_score)));
            }
            if let Some(el) = document.get_element_by_id("kickButton") {
                let class = if state.bike.kick_cooldown > 0 {
                    "game-button kick-button disabled"
                } else {
                    "game-button kick-button"
                };
                let _ = el.set_attribute("class", class);
            }
        }

        /// Window resized: refit the canvas and everything laid out on it
        fn resize(&mut self) {
            let Some(window) = web_sys::window() else { return };
            let viewport = fit_canvas(&window, &self.canvas);
            self.session.resize(viewport);
            self.joystick.layout(&viewport);
            if let Some(ref mut render_state) = self.render_state {
                render_state.set_viewport(viewport);
                render_state.resize(self.canvas.width(), self.canvas.height());
            }
            if !self.loop_running {
                self.render();
            }
            log::info!("Resized to {}x{}", viewport.width, viewport.height);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.settings.save();
            self.audio.set_muted(self.settings.muted);
            if let Some(btn) = web_sys::window()
                .and_then(|w| w.document())
                .and_then(|d| d.get_element_by_id("muteButton"))
            {
                btn.set_text_content(Some(if self.settings.muted { "🔇" } else { "🔊" }));
            }
        }

        /// Map a touch to logical canvas coordinates
        fn touch_point(&self, touch: &web_sys::Touch) -> Vec2 {
            let rect = self.canvas.get_bounding_client_rect();
            let viewport = self.session.state().viewport;
            let sx = if rect.width() > 0.0 {
                viewport.width / rect.width() as f32
            } else {
                1.0
            };
            let sy = if rect.height() > 0.0 {
                viewport.height / rect.height() as f32
            } else {
                1.0
            };
            Vec2::new(
                (touch.client_x() as f32 - rect.left() as f32) * sx,
                (touch.client_y() as f32 - rect.top() as f32) * sy,
            )
        }
    }

    /// Size the canvas for the window; the backing store follows devicePixelRatio
    fn fit_canvas(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> Viewport {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(600.0) as f32;
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        let viewport = Viewport::fit(inner_w, inner_h);

        let dpr = window.device_pixel_ratio();
        canvas.set_width((viewport.width as f64 * dpr) as u32);
        canvas.set_height((viewport.height as f64 * dpr) as u32);
        let _ = canvas.set_attribute(
            "style",
            &format!("width:{}px;height:{}px", viewport.width, viewport.height),
        );
        viewport
    }

    fn set_visible(id: &str, visible: bool) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            let class = if visible {
                "game-button"
            } else {
                "game-button hidden"
            };
            let _ = el.set_attribute("class", class);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Moto Chase starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let viewport = fit_canvas(&window, &canvas);
        let (width, height) = (canvas.width(), canvas.height());

        let game = Rc::new(RefCell::new(Game::new(canvas.clone(), viewport)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, viewport).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        {
            let mut g = game.borrow_mut();
            if let Some(btn) = document.get_element_by_id("muteButton") {
                btn.set_text_content(Some(if g.settings.muted { "🔇" } else { "🔊" }));
            }
            g.render();
            g.update_hud();
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());
        setup_resize(game.clone());

        // Ready: offer the play button
        set_visible("playButton", true);

        log::info!("Moto Chase ready");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Touch start - grab the joystick
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    let mut g = game.borrow_mut();
                    let point = g.touch_point(&touch);
                    if g.joystick.press(point) {
                        event.prevent_default();
                    }
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move - drag the knob
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                let mut g = game.borrow_mut();
                if !g.joystick.is_dragging() {
                    return;
                }
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let point = g.touch_point(&touch);
                    g.joystick.drag(point);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end - recenter
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                game.borrow_mut().joystick.release();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();
                if apply_key(&mut g.input.keys, &key, true) {
                    event.prevent_default();
                } else if key == " " && g.session.is_running() {
                    g.input.kick = true;
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                apply_key(&mut g.input.keys, &event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .expect("no document");

        // Play and restart share the reset path
        for id in ["playButton", "restartButton"] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let start_loop = {
                        let mut g = game.borrow_mut();
                        g.start();
                        !std::mem::replace(&mut g.loop_running, true)
                    };
                    if start_loop {
                        request_animation_frame(game.clone());
                    }
                });
                let _ =
                    btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }

        if let Some(btn) = document.get_element_by_id("kickButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                if g.session.phase() == SessionPhase::Running {
                    g.input.kick = true;
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("muteButton") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().toggle_mute();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("fullScreenButton") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                    return;
                };
                if document.fullscreen_element().is_some() {
                    document.exit_fullscreen();
                } else if let Some(container) = document.get_element_by_id("gameContainer") {
                    if let Err(e) = container.request_fullscreen() {
                        log::warn!("Fullscreen request failed: {:?}", e);
                    }
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Entering/leaving fullscreen changes the window size too
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize();
            });
            let _ = document.add_event_listener_with_callback(
                "fullscreenchange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            let keep_going = g.step(time);
            g.loop_running = keep_going;
            keep_going
        };

        // Stop scheduling once the session ends
        if keep_going {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

/// Headless autoplay: `moto-chase [seed] [max_ticks] [tuning.json]`
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use moto_chase::platform::{MemoryStore, Viewport};
    use moto_chase::sim::autopilot_input;
    use moto_chase::{Session, Tuning};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Moto Chase (native) starting headless autoplay...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let max_ticks: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60 * 60 * 5);
    let tuning = match args.next() {
        Some(path) => match std::fs::read_to_string(&path) {
            Ok(json) => Tuning::from_json(&json),
            Err(e) => {
                log::warn!("Could not read tuning file {}: {}", path, e);
                Tuning::default()
            }
        },
        None => Tuning::default(),
    };

    let mut session = Session::new(MemoryStore::new(), Viewport::default(), tuning);
    session.start(seed);

    let mut ticks = 0;
    while ticks < max_ticks {
        let input = autopilot_input(session.state());
        ticks += 1;
        if !session.tick(&input) {
            break;
        }
        for event in session.drain_events() {
            log::debug!("tick {}: {:?}", ticks, event);
        }
    }

    let state = session.state();
    log::info!(
        "Autoplay finished after {} ticks ({:.1}s): score {}, phase {:?}, obstacle speed {:.1}",
        ticks,
        ticks as f64 / moto_chase::consts::TICKS_PER_SECOND as f64,
        state.score,
        session.phase(),
        state.obstacle_speed
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
