//! Flappy Pipes entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use flappy_pipes::renderer::{RenderState, scene};
    use flappy_pipes::sim::GameEvent;
    use flappy_pipes::{FrameOutcome, FrameTicket, GameConfig, Session, TriggerOutcome};

    /// Game instance holding all state
    struct Game {
        session: Session,
        render_state: Option<RenderState>,
    }

    impl Game {
        fn new(session: Session) -> Self {
            Self {
                session,
                render_state: None,
            }
        }

        /// Jump input from any device
        fn trigger(&mut self) -> Option<FrameTicket> {
            match self.session.trigger(js_sys::Date::now()) {
                TriggerOutcome::Started(ticket) => {
                    set_hidden("start-prompt", true);
                    set_hidden("game-over", true);
                    Some(ticket)
                }
                TriggerOutcome::Jumped | TriggerOutcome::Ignored => None,
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                let vertices = scene::build(self.session.state());
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

        /// Push queued game events to the DOM
        fn update_hud(&mut self) {
            for event in self.session.drain_events() {
                match event {
                    GameEvent::Scored { score } => set_score(score),
                    GameEvent::GameOver { score } => {
                        set_text("final-score", &score.to_string());
                        set_hidden("game-over", false);
                    }
                    GameEvent::Jumped | GameEvent::PipeSpawned => {}
                }
            }
        }

        /// Throw away the current run and show the start screen
        fn restart(&mut self, seed: u64) {
            self.session.restart(seed);
            set_score(0);
            set_hidden("game-over", true);
            set_hidden("start-prompt", false);
            self.render();
        }
    }

    fn set_text(id: &str, text: &str) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_score(score: u32) {
        set_text("score", &format!("Score: {}", score));
    }

    /// Toggle the `d-none` class on an element
    fn set_hidden(id: &str, hidden: bool) {
        let document = web_sys::window().and_then(|w| w.document());
        if let Some(el) = document.and_then(|d| d.get_element_by_id(id)) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("d-none")
            } else {
                classes.remove_1("d-none")
            };
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("Flappy Pipes starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };
        let Some(canvas) = document
            .get_element_by_id("gameCanvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #gameCanvas element");
            return;
        };

        let config = GameConfig::load();
        let field = (config.width, config.height);

        // Backing store matches the playfield at device resolution
        let dpr = window.device_pixel_ratio();
        let width = (config.width as f64 * dpr) as u32;
        let height = (config.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let session = match Session::new(config, seed) {
            Ok(session) => session,
            Err(e) => {
                log::error!("Cannot start a session: {}", e);
                return;
            }
        };
        let game = Rc::new(RefCell::new(Game::new(session)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU; the game stays playable without it
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        match instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone())) {
            Ok(surface) => {
                match instance
                    .request_adapter(&wgpu::RequestAdapterOptions {
                        power_preference: wgpu::PowerPreference::LowPower,
                        compatible_surface: Some(&surface),
                        force_fallback_adapter: false,
                    })
                    .await
                {
                    Ok(adapter) => {
                        log::info!("Using adapter: {:?}", adapter.get_info().name);
                        match RenderState::new(surface, &adapter, width, height, field).await {
                            Ok(render_state) => {
                                game.borrow_mut().render_state = Some(render_state);
                            }
                            Err(e) => log::error!("Renderer unavailable: {}", e),
                        }
                    }
                    Err(e) => log::error!("No GPU adapter: {}", e),
                }
            }
            Err(e) => log::error!("Failed to create surface: {}", e),
        }

        setup_input_handlers(&canvas, game.clone());
        setup_restart_button(game.clone());

        set_score(0);
        set_hidden("game-over", true);
        set_hidden("start-prompt", false);
        game.borrow_mut().render();

        log::info!("Flappy Pipes ready!");
    }

    /// Start the frame loop if this trigger began the game
    fn on_trigger(game: &Rc<RefCell<Game>>) {
        let ticket = game.borrow_mut().trigger();
        if let Some(ticket) = ticket {
            request_animation_frame(game.clone(), ticket);
        }
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                on_trigger(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                on_trigger(&game);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        if let Some(window) = web_sys::window() {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.code() == "Space" {
                    event.prevent_default();
                    if !event.repeat() {
                        on_trigger(&game);
                    }
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, ticket);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, ticket: FrameTicket) {
        let outcome = {
            let mut g = game.borrow_mut();
            let outcome = g.session.frame(ticket, js_sys::Date::now());
            if outcome != FrameOutcome::Stale {
                g.render();
                g.update_hud();
            }
            outcome
        };

        match outcome {
            FrameOutcome::Continue => request_animation_frame(game, ticket),
            FrameOutcome::Finished { score } => {
                log::info!("Final score: {}", score);
            }
            FrameOutcome::Stale => log::debug!("Dropped frame from a finished session"),
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_pipes::GameConfig;
    use flappy_pipes::session::run_headless;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Pipes (native) starting...");
    log::info!("Native mode runs a headless autopilot demo - run with `trunk serve` to play");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let max_frames = args.next().and_then(|s| s.parse().ok()).unwrap_or(3600);

    let report = match run_headless(GameConfig::load(), seed, max_frames) {
        Ok(report) => report,
        Err(e) => {
            log::error!("Invalid config: {}", e);
            std::process::exit(2);
        }
    };
    if report.game_over {
        log::info!(
            "Crashed after {} frames with score {}",
            report.frames,
            report.score
        );
    } else {
        log::info!(
            "Survived {} frames with score {}",
            report.frames,
            report.score
        );
    }
    println!("seed={} frames={} score={}", seed, report.frames, report.score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
