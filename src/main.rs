//! Sky Jump entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;

    use skyjump::Settings;
    use skyjump::consts::*;
    use skyjump::sim::{GameEvent, GameState, TickInput, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        accumulator: f32,
        last_time: f64,
        input: TickInput,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64) -> Self {
            Self {
                state: GameState::new(seed),
                settings: Settings::load(),
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input;
                tick(&mut self.state, &input, SIM_DT);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Push this frame's simulation events into the DOM
        fn handle_events(&mut self) {
            let window = match web_sys::window() {
                Some(w) => w,
                None => return,
            };
            let document = match window.document() {
                Some(d) => d,
                None => return,
            };

            for event in self.state.drain_events() {
                match event {
                    GameEvent::Jumped => {}
                    GameEvent::CarrotCollected { carrot_score } => {
                        if let Some(el) = document.get_element_by_id("hud-carrots") {
                            el.set_text_content(Some(&carrot_score.to_string()));
                        }
                    }
                    GameEvent::ScoreChanged { height, total } => {
                        if let Some(el) = document.get_element_by_id("hud-height") {
                            el.set_text_content(Some(&format!("{height} m")));
                        }
                        if let Some(el) = document.get_element_by_id("hud-score") {
                            el.set_text_content(Some(&total.to_string()));
                        }
                    }
                    GameEvent::BackgroundChanged { blend } => {
                        if self.settings.reduced_motion {
                            continue;
                        }
                        if let Some(el) = document.get_element_by_id("bg-night") {
                            let _ = el
                                .set_attribute("style", &format!("opacity:{:.3}", blend.night));
                        }
                        if let Some(el) = document.get_element_by_id("bg-space") {
                            let _ = el
                                .set_attribute("style", &format!("opacity:{:.3}", blend.space));
                        }
                    }
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            if !self.settings.show_fps {
                return;
            }
            let document = web_sys::window().and_then(|w| w.document());
            if let Some(document) = document {
                if let Some(el) = document.get_element_by_id("hud-fps") {
                    el.set_text_content(Some(&self.fps.to_string()));
                }
            }
        }

        /// Reset game state for restart
        fn restart(&mut self, seed: u64) {
            self.state.teardown();
            self.state = GameState::new(seed);
            self.accumulator = 0.0;
            self.input = TickInput::default();
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed)));

        setup_input_handlers(game.clone());
        setup_restart_button(game.clone());

        request_animation_frame(game);

        log::info!("Sky Jump running with seed {seed}");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = true,
                    "ArrowRight" | "d" | "D" => g.input.right = true,
                    " " | "ArrowUp" | "w" | "W" => g.input.jump = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "ArrowLeft" | "a" | "A" => g.input.left = false,
                    "ArrowRight" | "d" | "D" => g.input.right = false,
                    " " | "ArrowUp" | "w" | "W" => g.input.jump = false,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_restart_button(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().and_then(|w| w.document());
        let Some(document) = document else { return };

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let seed = js_sys::Date::now() as u64;
                game.borrow_mut().restart(seed);
                log::info!("Game restarted with seed: {seed}");
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.handle_events();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use skyjump::consts::SIM_DT;
    use skyjump::sim::{GameState, tick};

    env_logger::init();
    log::info!("Sky Jump (native) starting...");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(42);
    let seconds: f32 = std::env::args()
        .nth(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(60.0);

    let mut state = GameState::new(seed);
    let ticks = (seconds / SIM_DT) as u64;
    for _ in 0..ticks {
        let input = auto_pilot::decide(&state);
        tick(&mut state, &input, SIM_DT);
        state.drain_events();
    }

    let summary = DemoSummary {
        seed,
        sim_seconds: seconds,
        ticks,
        best_height_m: state.height.max_height,
        carrot_score: state.carrot_score,
        total_score: state.total_score(),
        platforms_built: state.platforms.len(),
        platforms_active: state.platforms.iter().filter(|p| p.active).count(),
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => log::error!("Failed to serialize run summary: {e}"),
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[derive(serde::Serialize)]
struct DemoSummary {
    seed: u64,
    sim_seconds: f32,
    ticks: u64,
    best_height_m: u32,
    carrot_score: u32,
    total_score: u32,
    platforms_built: usize,
    platforms_active: usize,
}

/// Simple climbing policy for the headless demo: walk under the nearest
/// platform overhead and jump when grounded.
#[cfg(not(target_arch = "wasm32"))]
mod auto_pilot {
    use skyjump::sim::{GameState, TickInput};

    const STEER_DEADBAND: f32 = 8.0;
    const MAX_REACH: f32 = 220.0;

    pub fn decide(state: &GameState) -> TickInput {
        let pos = state.player.body.pos;
        let target = state
            .platforms
            .iter()
            .filter(|p| p.collidable && !p.permanent)
            .filter(|p| {
                let rise = pos.y - p.top();
                rise > 10.0 && rise < MAX_REACH
            })
            .min_by(|a, b| {
                let cost = |p: &skyjump::sim::Platform| (p.pos.x - pos.x).abs() + (pos.y - p.top());
                cost(a).total_cmp(&cost(b))
            })
            .cloned();

        let mut input = TickInput::default();
        if let Some(p) = target {
            if p.pos.x < pos.x - STEER_DEADBAND {
                input.left = true;
            } else if p.pos.x > pos.x + STEER_DEADBAND {
                input.right = true;
            }
            let under = (p.pos.x - pos.x).abs() < p.width / 2.0;
            // Hold jump through the ascent for full height
            input.jump = (state.player.grounded && under) || state.player.body.vel.y < 0.0;
        }
        input
    }
}
