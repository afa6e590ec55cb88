//! Browser host: owns the canvas, feeds `GameState` with animation frames and
//! key presses, and draws each frame.
//!
//! Nothing in here decides game rules. Keys are translated by `handle_key`,
//! which is plain Rust and tested natively; the rest is web-sys plumbing.

use std::cell::RefCell;
use std::f64::consts::TAU;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, window};

use crate::error::GameError;
use crate::game::{GameState, POP_LINGER_MS};
use crate::particles::CONFETTI_LIFETIME_MS;

pub const MAX_CHARACTERS_TO_TOP: u32 = 50;
pub const FALL_SPEED_STEP: f64 = 0.25;
pub const MAX_FALL_SPEED: f64 = 5.0;

const CANVAS_ID: &str = "rt-canvas";
const SCORE_ID: &str = "rt-score";
const SCORE_PULSE_CLASS: &str = "score-updated";
const SCORE_STYLE: &str = "position:fixed; top:10px; left:12px; font-family:'Fira Code', monospace; font-size:18px; padding:4px 10px; background:rgba(0,0,0,0.42); border:1px solid #333; border-radius:6px; color:#ffd166; z-index:45;";

thread_local! {
    static GAME: RefCell<GameState> = RefCell::new(GameState::new());
    static VIEW: RefCell<Option<CanvasView>> = const { RefCell::new(None) };
}

struct CanvasView {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

// --- Key translation --------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum KeyOutcome {
    /// Not ours; let the browser have it.
    Ignored,
    Handled,
    /// A character was popped (score changed).
    Popped,
}

/// Menu: Enter starts, Tab toggles settings, arrows tune them, Escape closes them.
/// In game: Escape restarts, everything else goes to the matcher.
pub(crate) fn handle_key(game: &mut GameState, key: &str, now: f64) -> KeyOutcome {
    if game.show_water() {
        if key == "Escape" {
            game.restart();
            return KeyOutcome::Handled;
        }
        return match game.press_key(key, now) {
            Some(_) => KeyOutcome::Popped,
            None => KeyOutcome::Handled,
        };
    }
    match key {
        "Enter" => {
            game.close_config();
            game.start(now);
            KeyOutcome::Handled
        }
        "Tab" => {
            game.toggle_config();
            KeyOutcome::Handled
        }
        "Escape" => {
            game.close_config();
            KeyOutcome::Handled
        }
        "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight" if game.show_config() => {
            nudge_config(game, key);
            KeyOutcome::Handled
        }
        _ => KeyOutcome::Ignored,
    }
}

fn nudge_config(game: &mut GameState, key: &str) {
    let mut cfg = game.config();
    match key {
        "ArrowUp" => cfg.characters_to_top = (cfg.characters_to_top + 1).min(MAX_CHARACTERS_TO_TOP),
        "ArrowDown" => cfg.characters_to_top = cfg.characters_to_top.saturating_sub(1).max(1),
        "ArrowRight" => cfg.fall_speed = (cfg.fall_speed + FALL_SPEED_STEP).min(MAX_FALL_SPEED),
        "ArrowLeft" => cfg.fall_speed = (cfg.fall_speed - FALL_SPEED_STEP).max(FALL_SPEED_STEP),
        _ => return,
    }
    if let Err(e) = game.set_config(cfg) {
        warn!("config not changed: {e}");
    }
}

fn js_err(e: GameError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn now_ms() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or(0.0)
}

// --- Exports ----------------------------------------------------------------

/// Create the canvas and overlays, hook up input and start the frame loop.
/// Calling it again is a no-op.
pub fn start_canvas_host() -> Result<(), JsValue> {
    if VIEW.with(|v| v.borrow().is_some()) {
        return Ok(());
    }
    let win = window().ok_or_else(|| JsValue::from_str("no window"))?;
    let doc = win
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))?;
    let body = doc.body().ok_or_else(|| JsValue::from_str("no body"))?;

    let canvas: HtmlCanvasElement = if let Some(el) = doc.get_element_by_id(CANVAS_ID) {
        el.dyn_into()?
    } else {
        let c: HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        c.set_id(CANVAS_ID);
        c.set_attribute("style", "position:fixed; inset:0; display:block; z-index:10;")?;
        body.append_child(&c)?;
        c
    };
    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;
    ensure_score_overlay(&doc)?;

    VIEW.with(|v| v.replace(Some(CanvasView { canvas, ctx })));

    // Keyboard listener
    {
        let closure = Closure::wrap(Box::new(move |evt: web_sys::KeyboardEvent| {
            let key = evt.key();
            let outcome = GAME.with(|cell| handle_key(&mut cell.borrow_mut(), &key, now_ms()));
            if outcome != KeyOutcome::Ignored {
                evt.prevent_default();
            }
            if outcome == KeyOutcome::Popped {
                pulse_score();
            }
        }) as Box<dyn FnMut(_)>);
        doc.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    start_frame_loop();
    Ok(())
}

#[wasm_bindgen]
pub fn restart_game() {
    GAME.with(|g| g.borrow_mut().restart());
}

#[wasm_bindgen]
pub fn toggle_config() {
    GAME.with(|g| g.borrow_mut().toggle_config());
}

#[wasm_bindgen]
pub fn close_config() {
    GAME.with(|g| g.borrow_mut().close_config());
}

#[wasm_bindgen]
pub fn set_characters_to_top(n: u32) -> Result<(), JsValue> {
    GAME.with(|g| {
        let mut game = g.borrow_mut();
        let cfg = crate::GameConfig { characters_to_top: n, ..game.config() };
        game.set_config(cfg).map_err(js_err)
    })
}

#[wasm_bindgen]
pub fn set_fall_speed(speed: f64) -> Result<(), JsValue> {
    GAME.with(|g| {
        let mut game = g.borrow_mut();
        let cfg = crate::GameConfig { fall_speed: speed, ..game.config() };
        game.set_config(cfg).map_err(js_err)
    })
}

/// Replace both knobs from a JSON object such as `{"characters_to_top": 12}`.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn configure(json: &str) -> Result<(), JsValue> {
    let cfg = crate::GameConfig::from_json(json).map_err(js_err)?;
    GAME.with(|g| g.borrow_mut().set_config(cfg)).map_err(js_err)
}

/// Current frame as JSON, for hosts that draw the game themselves.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn game_snapshot() -> Result<String, JsValue> {
    GAME.with(|g| {
        g.borrow()
            .snapshot()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    })
}

// --- Frame loop -------------------------------------------------------------

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

fn start_frame_loop() {
    let f: FrameCallback = Rc::new(RefCell::new(None));
    let g = f.clone();
    *g.borrow_mut() = Some(Closure::wrap(Box::new(move |ts: f64| {
        frame(ts);
        if let (Some(w), Some(cb)) = (window(), f.borrow().as_ref()) {
            let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut(f64)>));
    if let (Some(w), Some(cb)) = (window(), g.borrow().as_ref()) {
        let _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}

fn frame(now: f64) {
    let (w, h) = window()
        .map(|win| {
            let w = win.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(800.0);
            let h = win.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(600.0);
            (w, h)
        })
        .unwrap_or((800.0, 600.0));

    GAME.with(|cell| {
        let mut game = cell.borrow_mut();
        game.set_viewport(w, h);
        game.tick(now);
        VIEW.with(|v| {
            if let Some(view) = v.borrow().as_ref() {
                view.fit(w, h);
                view.draw(&game, now);
            }
        });
        update_score_overlay(game.score(), game.show_water());
    });
}

// --- DOM overlays -----------------------------------------------------------

fn ensure_score_overlay(doc: &Document) -> Result<(), JsValue> {
    if doc.get_element_by_id(SCORE_ID).is_some() {
        return Ok(());
    }
    let Some(body) = doc.body() else {
        return Ok(());
    };
    let style = doc.create_element("style")?;
    style.set_text_content(Some(
        "@keyframes rt-pulse { 0% { transform: scale(1); } 40% { transform: scale(1.5); } 100% { transform: scale(1); } }\
         .score-number { display:inline-block; }\
         .score-number.score-updated { animation: rt-pulse 0.3s ease-out; }",
    ));
    body.append_child(&style)?;

    let div = doc.create_element("div")?;
    div.set_id(SCORE_ID);
    div.set_inner_html("Score: <span class='score-number'>0</span>");
    div.set_attribute("style", &format!("{SCORE_STYLE} display:none;"))?;
    body.append_child(&div)?;
    Ok(())
}

fn update_score_overlay(score: u32, visible: bool) {
    let Some(doc) = window().and_then(|w| w.document()) else {
        return;
    };
    if let Some(el) = doc.get_element_by_id(SCORE_ID) {
        let display = if visible { "block" } else { "none" };
        let _ = el.set_attribute("style", &format!("{SCORE_STYLE} display:{display};"));
    }
    if let Ok(Some(num)) = doc.query_selector(".score-number") {
        num.set_text_content(Some(&score.to_string()));
    }
}

/// Restart the score pulse animation. Missing element is fine.
fn pulse_score() {
    let Some(win) = window() else { return };
    let Some(el) = win
        .document()
        .and_then(|d| d.query_selector(".score-number").ok().flatten())
    else {
        return;
    };
    let _ = el.class_list().remove_1(SCORE_PULSE_CLASS);
    // Freed by JS once the timeout has fired.
    let cb = Closure::once_into_js(move || {
        let _ = el.class_list().add_1(SCORE_PULSE_CLASS);
    });
    let _ = win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), 10);
}

// --- Rendering --------------------------------------------------------------

impl CanvasView {
    fn fit(&self, w: f64, h: f64) {
        let (w, h) = (w as u32, h as u32);
        if self.canvas.width() != w || self.canvas.height() != h {
            self.canvas.set_width(w);
            self.canvas.set_height(h);
        }
    }

    fn draw(&self, game: &GameState, now: f64) {
        if game.show_water() {
            self.draw_game(game, now);
        } else {
            self.draw_menu(game);
        }
    }

    fn fill(&self, color: &str) {
        self.ctx.set_fill_style_str(color);
    }

    fn draw_background(&self, game: &GameState, w: f64, h: f64) {
        match game.danger_gradient() {
            Some(gradient) => {
                let grad = self.ctx.create_linear_gradient(0.0, 0.0, 0.0, h);
                for (offset, color) in &gradient.stops {
                    let _ = grad.add_color_stop((*offset / 100.0) as f32, color);
                }
                self.ctx.set_fill_style_canvas_gradient(&grad);
            }
            None => self.fill("#0b1a2e"),
        }
        self.ctx.fill_rect(0.0, 0.0, w, h);
    }

    fn draw_menu(&self, game: &GameState) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.draw_background(game, w, h);
        self.ctx.set_text_align("center");
        self.ctx.set_text_baseline("middle");
        self.fill("#7fd4ff");
        self.ctx.set_font("bold 64px 'Fira Code', monospace");
        self.ctx.fill_text("Rising Tide", w / 2.0, h / 3.0).ok();
        self.fill("#ffffff");
        self.ctx.set_font("22px 'Fira Code', monospace");
        self.ctx.fill_text("Press Enter to start", w / 2.0, h / 2.0).ok();
        self.ctx.set_font("16px 'Fira Code', monospace");
        self.fill("#9fb3c8");
        self.ctx.fill_text("Tab: settings", w / 2.0, h / 2.0 + 34.0).ok();

        if game.show_config() {
            let cfg = game.config();
            let (pw, ph) = (420.0, 150.0);
            let (px, py) = ((w - pw) / 2.0, h / 2.0 + 70.0);
            self.fill("rgba(0,0,0,0.55)");
            self.ctx.fill_rect(px, py, pw, ph);
            self.fill("#ffd166");
            self.ctx.set_font("18px 'Fira Code', monospace");
            let rows = [
                format!("Characters to top: {}  (Up/Down)", cfg.characters_to_top),
                format!("Fall speed: x{:.2}  (Left/Right)", cfg.fall_speed),
                "Escape: close".to_string(),
            ];
            for (i, row) in rows.iter().enumerate() {
                self.ctx.fill_text(row, w / 2.0, py + 35.0 + i as f64 * 40.0).ok();
            }
        }
    }

    fn draw_game(&self, game: &GameState, now: f64) {
        let w = self.canvas.width() as f64;
        let h = self.canvas.height() as f64;
        self.draw_background(game, w, h);

        // Water
        let surface = game.water().surface_y(h);
        self.fill("rgba(30,144,255,0.55)");
        self.ctx.fill_rect(0.0, surface, w, h - surface);
        self.fill("rgba(176,224,230,0.8)");
        self.ctx.fill_rect(0.0, surface, w, 3.0);

        // Characters
        self.ctx.set_text_align("left");
        self.ctx.set_text_baseline("top");
        for c in game.chars() {
            let alpha = match c.popped_at {
                Some(at) => (1.0 - (now - at) / POP_LINGER_MS).clamp(0.0, 1.0),
                None => 1.0,
            };
            self.ctx.set_global_alpha(alpha);
            self.ctx.set_font(&format!("{} {:.0}px '{}'", c.weight, c.size, c.font));
            self.fill(c.color);
            let mut buf = [0u8; 4];
            self.ctx.fill_text(c.glyph.encode_utf8(&mut buf), c.x, c.y).ok();
        }

        // Confetti
        for p in game.confetti() {
            let age = now - p.created_at - p.delay;
            if age < 0.0 {
                continue;
            }
            self.ctx.set_global_alpha((1.0 - age / CONFETTI_LIFETIME_MS).clamp(0.0, 1.0));
            self.fill(p.color);
            self.ctx.fill_rect(p.x - 4.0, p.y - 4.0 + age * 0.05, 8.0, 8.0);
        }
        self.ctx.set_global_alpha(1.0);

        // Splashes
        for s in game.splashes() {
            self.fill(s.color);
            self.ctx.begin_path();
            if self.ctx.arc(s.x, s.y, s.size / 2.0, 0.0, TAU).is_ok() {
                self.ctx.fill();
            }
        }

        if game.is_game_over() {
            self.fill("rgba(0,0,0,0.5)");
            self.ctx.fill_rect(0.0, 0.0, w, h);
            self.ctx.set_text_align("center");
            self.ctx.set_text_baseline("middle");
            self.fill("#ffffff");
            self.ctx.set_font("bold 56px 'Fira Code', monospace");
            self.ctx.fill_text("Game over", w / 2.0, h / 2.0 - 30.0).ok();
            self.ctx.set_font("20px 'Fira Code', monospace");
            self.ctx
                .fill_text(&format!("Score {}  -  Escape to play again", game.score()), w / 2.0, h / 2.0 + 24.0)
                .ok();
        }
    }
}
