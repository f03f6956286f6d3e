//! ID Runner entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, KeyboardEvent, TouchEvent};

    use id_runner::consts::*;
    use id_runner::platform::input;
    use id_runner::sim::{GamePhase, HoldSource, ObstacleKind, Snapshot};
    use id_runner::{Game, Settings, Tuning};

    /// Browser-side wrapper: the game plus frame timing and the DOM it draws to
    struct App {
        game: Game,
        document: Document,
        last_time: f64,
    }

    impl App {
        fn new(game: Game, document: Document) -> Self {
            Self {
                game,
                document,
                last_time: 0.0,
            }
        }

        fn html(&self, id: &str) -> Option<HtmlElement> {
            self.document
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        }

        fn set_visible(&self, id: &str, visible: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
            }
        }

        fn set_style(&self, id: &str, property: &str, value: &str) {
            if let Some(el) = self.html(id) {
                let _ = el.style().set_property(property, value);
            }
        }

        /// Push the latest snapshot into the page
        fn render(&self) {
            let snap: Snapshot = self.game.snapshot();

            self.set_style(
                "runner",
                "transform",
                &format!("translateY({:.1}px)", -snap.runner_vertical_offset),
            );

            let (shown, hidden) = match snap.active_obstacle {
                ObstacleKind::Villain => ("villain", "good-guy"),
                ObstacleKind::GoodGuy => ("good-guy", "villain"),
            };
            let playing = snap.phase == GamePhase::Playing;
            self.set_visible(shown, playing);
            self.set_visible(hidden, false);
            self.set_style(
                shown,
                "left",
                &format!("{:.1}px", snap.obstacle_horizontal_position),
            );
            if let Some(el) = self.document.get_element_by_id(shown) {
                let _ = el.set_attribute("data-frame", &snap.active_obstacle_index.to_string());
            }

            self.set_visible("hold-bar", playing && snap.holding);
            self.set_style(
                "hold-progress",
                "width",
                &format!("{:.0}%", snap.gesture_progress_percent),
            );
            self.set_visible("miss-notice", snap.miss_notice);

            self.set_visible("intro", snap.phase == GamePhase::Intro);
            self.set_visible("game-over", snap.phase == GamePhase::GameOver);
            self.set_visible("win", snap.phase == GamePhase::Win);
            if snap.phase.is_terminal() {
                if let Some(el) = self.document.get_element_by_id("ending") {
                    let _ = el.set_attribute("data-ending", &snap.ending_index.to_string());
                }
            }
        }
    }

    fn viewport_width() -> f32 {
        web_sys::window()
            .and_then(|w| w.inner_width().ok())
            .and_then(|v| v.as_f64())
            .map(|w| w as f32)
            .unwrap_or(DEFAULT_VIEWPORT_WIDTH)
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::error_1(&format!("Failed to init logger: {}", e).into());
        }

        log::info!("ID Runner starting...");

        let Some(window) = web_sys::window() else {
            log::error!("No window");
            return;
        };
        let Some(document) = window.document() else {
            log::error!("No document");
            return;
        };

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let mut game = Game::new(seed, Settings::load(), Tuning::load(), viewport_width());
        game.on_phase_change(|phase| log::info!("Phase: {:?}", phase));
        game.on_obstacle_cycle(|next| log::debug!("Next obstacle: {:?}", next));
        game.on_gesture_complete(|| log::info!("Hold complete"));
        log::info!("Game initialized with seed: {}", seed);

        let app = Rc::new(RefCell::new(App::new(game, document)));
        app.borrow().render();

        setup_input_handlers(app.clone());
        setup_resize(app.clone());
        setup_visibility(app.clone());

        request_animation_frame(app);

        log::info!("ID Runner running!");
    }

    fn setup_input_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let phase = a.game.phase();
                if let Some(command) =
                    input::key_down(&event.key(), &event.code(), event.repeat(), phase)
                {
                    // Space would otherwise scroll the page
                    event.prevent_default();
                    a.game.apply(command);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(command) = input::key_up(&event.key()) {
                    app.borrow_mut().game.apply(command);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                let command = input::touch_start(a.game.phase());
                a.game.apply(command);
            });
            let _ = window
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                app.borrow_mut().game.apply(input::touch_end());
            });
            let _ = window
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            app.borrow_mut().game.resize(viewport_width());
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// A hidden tab never sees the keyup, so let go of any hold
    fn setup_visibility(app: Rc<RefCell<App>>) {
        let document = app.borrow().document.clone();
        let watched = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if watched.visibility_state() == web_sys::VisibilityState::Hidden {
                let mut a = app.borrow_mut();
                a.game.end_hold(HoldSource::Keyboard);
                a.game.end_hold(HoldSource::Touch);
                a.last_time = 0.0;
                log::info!("Tab hidden, hold released");
            }
        });
        let _ = document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            a.last_time = time;

            a.game.advance(dt);
            a.render();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Headless demo: the autopilot plays one run and the log narrates it
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use id_runner::consts::{DEFAULT_VIEWPORT_WIDTH, SIM_DT};
    use id_runner::sim::GamePhase;
    use id_runner::{Game, Settings, Tuning};

    env_logger::init();
    log::info!("ID Runner (native) starting...");
    log::info!("Native mode runs the autopilot headless - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let settings = Settings {
        intro_screen: false,
        autopilot: true,
        ..Settings::load()
    };
    let mut game = Game::new(seed, settings, Tuning::load(), DEFAULT_VIEWPORT_WIDTH);
    game.on_phase_change(|phase| log::info!("Phase: {:?}", phase));
    game.on_obstacle_cycle(|next| log::info!("Next obstacle: {:?}", next));
    game.on_gesture_complete(|| log::info!("Hold complete"));

    // Two minutes of simulated time at most
    let max_steps = (120.0 / SIM_DT) as u32;
    let mut steps = 0;
    while steps < max_steps && !game.phase().is_terminal() {
        steps += game.advance(SIM_DT);
    }

    let snap = game.snapshot();
    match snap.phase {
        GamePhase::Playing => log::info!("Still running after {} steps", steps),
        phase => log::info!(
            "{:?} after {:.1}s, ending {}",
            phase,
            game.clock_ms() / 1000.0,
            snap.ending_index
        ),
    }
    println!(
        "{}",
        serde_json::to_string(&snap).unwrap_or_else(|e| format!("snapshot error: {}", e))
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
