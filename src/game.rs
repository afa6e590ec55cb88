//! Game state and the rules that mutate it.
//!
//! `GameState` owns everything on screen. A host drives it with three calls:
//! `start` when the player leaves the menu, `tick` once per animation frame and
//! `press_key` for each keydown. All timing comes in through the `now`
//! argument (milliseconds, monotonic), so tests can run the game on a fake
//! clock.

use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::GameConfig;
use crate::danger::{DangerGradient, danger_gradient};
use crate::error::GameError;
use crate::particles::{
    ConfettiParticle, FallingChar, GLYPH_HALF, SplashParticle, confetti_burst, splash_burst,
};
use crate::spawner::{START_DELAY_MS, Spawner};
use crate::water::Water;

pub const POP_SCORE: u32 = 10;
/// How long a popped character stays on screen for its pop animation.
pub const POP_LINGER_MS: f64 = 500.0;
/// Characters this far below the viewport bottom are dropped.
pub const OFFSCREEN_MARGIN: f64 = 100.0;
/// Water level above which each landing counts as danger.
pub const DANGER_LEVEL: f64 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

/// What changed during one `tick`, so the host knows what to react to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: usize,
    pub landed: usize,
    /// True only on the frame the water reached the top.
    pub game_over: bool,
}

pub struct GameState {
    config: GameConfig,
    viewport: Viewport,
    water: Water,
    score: u32,
    popped: u32,
    danger: u32,
    landings: u32,
    chars: Vec<FallingChar>,
    confetti: Vec<ConfettiParticle>,
    splashes: Vec<SplashParticle>,
    spawner: Spawner,
    // --- View gates ---
    show_water: bool,
    show_config: bool,
    game_over: bool,
    // --- Id sources ---
    next_char_id: u64,
    next_particle_id: u64,
    rng: SmallRng,
}

impl Default for GameState {
    fn default() -> Self {
        Self::with_rng(SmallRng::from_entropy())
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deterministic game, for tests and replays.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(SmallRng::seed_from_u64(seed))
    }

    fn with_rng(rng: SmallRng) -> Self {
        Self {
            config: GameConfig::default(),
            viewport: Viewport::default(),
            water: Water::default(),
            score: 0,
            popped: 0,
            danger: 0,
            landings: 0,
            chars: Vec::new(),
            confetti: Vec::new(),
            splashes: Vec::new(),
            spawner: Spawner::default(),
            show_water: false,
            show_config: false,
            game_over: false,
            next_char_id: 0,
            next_particle_id: 0,
            rng,
        }
    }

    // --- Accessors ---------------------------------------------------------

    pub fn config(&self) -> GameConfig {
        self.config
    }
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }
    pub fn water(&self) -> Water {
        self.water
    }
    pub fn score(&self) -> u32 {
        self.score
    }
    pub fn popped(&self) -> u32 {
        self.popped
    }
    pub fn danger(&self) -> u32 {
        self.danger
    }
    pub fn landings(&self) -> u32 {
        self.landings
    }
    pub fn chars(&self) -> &[FallingChar] {
        &self.chars
    }
    pub fn confetti(&self) -> &[ConfettiParticle] {
        &self.confetti
    }
    pub fn splashes(&self) -> &[SplashParticle] {
        &self.splashes
    }
    pub fn show_water(&self) -> bool {
        self.show_water
    }
    pub fn show_config(&self) -> bool {
        self.show_config
    }
    pub fn is_game_over(&self) -> bool {
        self.game_over
    }
    pub fn is_spawning(&self) -> bool {
        self.spawner.is_running()
    }

    pub fn danger_gradient(&self) -> Option<DangerGradient> {
        danger_gradient(self.show_water, self.water.level, self.danger)
    }

    // --- View gates & config -----------------------------------------------

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport { width, height };
    }

    pub fn set_config(&mut self, config: GameConfig) -> Result<(), GameError> {
        config.validate()?;
        debug!("config set: {config:?}");
        self.config = config;
        Ok(())
    }

    pub fn toggle_config(&mut self) {
        self.show_config = !self.show_config;
    }

    pub fn close_config(&mut self) {
        self.show_config = false;
    }

    /// Leave the menu and start the water; the first character drops shortly after.
    pub fn start(&mut self, now: f64) {
        if self.show_water {
            return;
        }
        info!(
            "game start: {} characters to top, fall speed x{}",
            self.config.characters_to_top, self.config.fall_speed
        );
        self.show_water = true;
        self.game_over = false;
        self.spawner.start(now + START_DELAY_MS);
    }

    /// Back to the menu with a fresh board and default settings.
    pub fn restart(&mut self) {
        info!("game restart (score was {})", self.score);
        self.spawner.stop();
        self.show_water = false;
        self.show_config = false;
        self.game_over = false;
        self.water = Water::default();
        self.score = 0;
        self.popped = 0;
        self.danger = 0;
        self.landings = 0;
        self.chars.clear();
        self.confetti.clear();
        self.splashes.clear();
        self.config = GameConfig::default();
    }

    // --- Simulation --------------------------------------------------------

    fn spawn_char(&mut self) {
        let id = self.next_char_id;
        self.next_char_id += 1;
        let c = FallingChar::random(&mut self.rng, id, self.viewport.width, self.config.fall_speed);
        self.chars.push(c);
    }

    /// Advance one animation frame.
    pub fn tick(&mut self, now: f64) -> FrameReport {
        let mut report = FrameReport::default();
        if !self.show_water {
            return report;
        }
        // Surface is taken before this frame's easing step.
        let water_top = self.water.surface_y(self.viewport.height);

        self.water.ease();
        if self.water.is_full() && !self.game_over {
            self.spawner.stop();
            self.game_over = true;
            report.game_over = true;
            info!("water reached the top, final score {}", self.score);
        }

        let due = self.spawner.poll(now, self.popped);
        for _ in 0..due {
            self.spawn_char();
        }
        report.spawned = due;

        let mut landings: Vec<f64> = Vec::new();
        for c in self.chars.iter_mut().filter(|c| !c.is_popped()) {
            let was_above = c.y < water_top;
            c.y += c.speed;
            if was_above && c.y >= water_top && c.speed > 0.0 {
                c.speed = 0.0;
                landings.push(c.x + GLYPH_HALF);
            }
        }

        if !landings.is_empty() {
            for x in &landings {
                let burst = splash_burst(&mut self.rng, &mut self.next_particle_id, *x, water_top);
                self.splashes.extend(burst);
                if self.water.level > DANGER_LEVEL {
                    self.danger += 1;
                }
                self.landings += 1;
                self.water.raise_to(self.config.water_target(self.landings));
            }
            debug!(
                "{} landed, water target now {:.1}",
                landings.len(),
                self.water.target
            );
            // One batch above water at a time.
            self.chars.retain(|c| c.is_popped() || c.speed == 0.0);
            report.landed = landings.len();
        }

        let bottom = self.viewport.height + OFFSCREEN_MARGIN;
        self.chars.retain(|c| {
            c.y < bottom && c.popped_at.is_none_or(|at| now - at < POP_LINGER_MS)
        });

        self.confetti.retain(|p| !p.expired(now));

        let height = self.viewport.height;
        for s in &mut self.splashes {
            s.step();
        }
        self.splashes.retain(|s| s.is_alive(height));

        report
    }

    /// Pop the first live character matching `key`; returns its id.
    /// Keys that are not a single character (Shift, Enter, ...) never match.
    pub fn press_key(&mut self, key: &str, now: f64) -> Option<u64> {
        if !self.show_water || self.game_over {
            return None;
        }
        let mut it = key.chars();
        let (Some(k), None) = (it.next(), it.next()) else {
            return None;
        };
        let c = self
            .chars
            .iter_mut()
            .find(|c| !c.is_popped() && c.matches_key(k))?;
        c.popped_at = Some(now);
        let (id, (cx, cy)) = (c.id, c.centre());

        self.score += POP_SCORE;
        self.popped += 1;
        let burst = confetti_burst(&mut self.rng, &mut self.next_particle_id, cx, cy, now);
        self.confetti.extend(burst);
        debug!("popped '{k}' (#{id}), score {}", self.score);
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::particles::SPAWN_Y;
    use crate::water::FULL_LEVEL;

    fn started(seed: u64) -> GameState {
        let mut g = GameState::with_seed(seed);
        g.set_viewport(800.0, 600.0);
        g.start(0.0);
        g
    }

    fn place(g: &mut GameState, glyph: char, x: f64, y: f64, speed: f64) -> u64 {
        g.spawn_char();
        let c = g.chars.last_mut().unwrap();
        c.glyph = glyph;
        c.x = x;
        c.y = y;
        c.speed = speed;
        c.id
    }

    #[test]
    fn tick_is_noop_on_menu() {
        let mut g = GameState::with_seed(1);
        assert_eq!(g.tick(5_000.0), FrameReport::default());
        assert!(g.chars().is_empty());
    }

    #[test]
    fn first_character_spawns_after_start_delay() {
        let mut g = started(1);
        assert_eq!(g.tick(50.0).spawned, 0);
        assert_eq!(g.tick(100.0).spawned, 1);
        assert_eq!(g.chars().len(), 1);
        // spawned above the viewport then moved one frame
        assert!(g.chars()[0].y > SPAWN_Y);
    }

    #[test]
    fn crossing_zeroes_speed_and_purges_other_fallers() {
        let mut g = started(2);
        // water top at 540 for level 10 in a 600px viewport
        let lander = place(&mut g, 'a', 100.0, 539.5, 1.0);
        let faller = place(&mut g, 'b', 200.0, 100.0, 1.0);
        let popped = place(&mut g, 'c', 300.0, 200.0, 1.0);
        assert!(g.press_key("c", 0.0).is_some());

        let report = g.tick(16.0);
        assert_eq!(report.landed, 1);
        let ids: Vec<u64> = g.chars().iter().map(|c| c.id).collect();
        assert!(ids.contains(&lander));
        assert!(ids.contains(&popped));
        assert!(!ids.contains(&faller));
        let landed = g.chars().iter().find(|c| c.id == lander).unwrap();
        assert_eq!(landed.speed, 0.0);
        assert!(landed.has_landed());
        assert_eq!(g.splashes().len(), 22);
        assert!((g.water().target - 19.0).abs() < 1e-9);
    }

    #[test]
    fn landed_character_stays_put() {
        let mut g = started(3);
        let id = place(&mut g, 'z', 10.0, 539.9, 0.5);
        g.tick(16.0);
        let y = g.chars().iter().find(|c| c.id == id).unwrap().y;
        for i in 0..10 {
            g.tick(32.0 + i as f64);
        }
        assert_eq!(g.chars().iter().find(|c| c.id == id).unwrap().y, y);
    }

    #[test]
    fn press_key_scores_and_emits_confetti() {
        let mut g = started(4);
        let id = place(&mut g, 'K', 10.0, 10.0, 1.0);
        assert_eq!(g.press_key("k", 1_000.0), Some(id));
        assert_eq!(g.score(), POP_SCORE);
        assert_eq!(g.popped(), 1);
        assert_eq!(g.confetti().len(), 12);
        // already popped: nothing left to match
        assert_eq!(g.press_key("k", 1_001.0), None);
        assert_eq!(g.score(), POP_SCORE);
    }

    #[test]
    fn press_key_ignores_non_matching_and_multi_char_keys() {
        let mut g = started(5);
        place(&mut g, 'x', 10.0, 10.0, 1.0);
        assert_eq!(g.press_key("y", 0.0), None);
        assert_eq!(g.press_key("Shift", 0.0), None);
        assert_eq!(g.press_key("", 0.0), None);
        assert_eq!(g.score(), 0);
        assert!(g.confetti().is_empty());
    }

    #[test]
    fn press_key_picks_first_match() {
        let mut g = started(6);
        let first = place(&mut g, 'q', 10.0, 10.0, 1.0);
        let second = place(&mut g, 'Q', 20.0, 20.0, 1.0);
        assert_eq!(g.press_key("Q", 0.0), Some(first));
        assert_eq!(g.press_key("q", 0.0), Some(second));
    }

    #[test]
    fn popped_character_removed_after_linger() {
        let mut g = started(7);
        let id = place(&mut g, 'p', 10.0, 10.0, 1.0);
        g.press_key("p", 1_000.0);
        g.tick(1_499.0);
        assert!(g.chars().iter().any(|c| c.id == id));
        g.tick(1_500.0);
        assert!(!g.chars().iter().any(|c| c.id == id));
    }

    #[test]
    fn popped_character_is_frozen() {
        let mut g = started(8);
        let id = place(&mut g, 'p', 10.0, 10.0, 3.0);
        g.press_key("p", 0.0);
        g.tick(16.0);
        assert_eq!(g.chars().iter().find(|c| c.id == id).unwrap().y, 10.0);
    }

    #[test]
    fn danger_counts_only_high_water_landings() {
        let mut g = started(9);
        g.water = Water { level: 60.0, target: 60.0 };
        // surface at 240 for level 60
        place(&mut g, 'a', 10.0, 239.5, 1.0);
        g.tick(16.0);
        assert_eq!(g.danger(), 1);
        assert!(g.danger_gradient().is_some());

        let mut low = started(9);
        place(&mut low, 'a', 10.0, 539.5, 1.0);
        low.tick(16.0);
        assert_eq!(low.danger(), 0);
        assert!(low.danger_gradient().is_none());
    }

    #[test]
    fn restart_resets_everything() {
        let mut g = started(10);
        g.set_config(GameConfig { characters_to_top: 3, fall_speed: 2.0 }).unwrap();
        place(&mut g, 'a', 10.0, 539.5, 1.0);
        g.tick(16.0);
        g.toggle_config();
        g.restart();
        assert!(!g.show_water());
        assert!(!g.show_config());
        assert!(!g.is_spawning());
        assert_eq!(g.water(), Water::default());
        assert!(g.chars().is_empty() && g.splashes().is_empty() && g.confetti().is_empty());
        assert_eq!(g.config(), GameConfig::default());
        assert_eq!(g.tick(10_000.0), FrameReport::default());
    }

    #[test]
    fn invalid_config_is_rejected_and_kept() {
        let mut g = GameState::with_seed(11);
        let bad = GameConfig { characters_to_top: 0, fall_speed: 1.0 };
        assert!(g.set_config(bad).is_err());
        assert_eq!(g.config(), GameConfig::default());
    }

    #[test]
    fn fall_speed_scales_new_characters() {
        let mut g = GameState::with_seed(12);
        g.set_config(GameConfig { characters_to_top: 10, fall_speed: 4.0 }).unwrap();
        g.start(0.0);
        g.tick(100.0);
        assert!(g.chars()[0].speed >= 0.421875 * 4.0);
    }

    #[test]
    fn long_frame_gap_spawns_one_wave() {
        let mut g = started(14);
        assert_eq!(g.tick(100.0).spawned, 1);
        // a hidden tab pauses the frame loop for ten minutes
        let report = g.tick(600_000.0);
        assert!(report.spawned <= crate::spawner::MAX_WAVE_SIZE as usize);
        assert_eq!(report.spawned, 1);
    }

    #[test]
    fn game_over_after_exactly_characters_to_top_landings() {
        for n in 1..=50 {
            let mut g = started(15);
            g.set_config(GameConfig { characters_to_top: n, fall_speed: 1.0 }).unwrap();
            g.spawner.stop();
            let mut now = 0.0;
            for k in 1..=n {
                let top = g.water().surface_y(600.0);
                place(&mut g, 'a', 10.0, top - 0.5, 1.0);
                now += 16.0;
                assert_eq!(g.tick(now).landed, 1, "n = {n}, landing {k}");
                assert_eq!(g.landings(), k);
                assert!(!g.is_game_over(), "n = {n}, landing {k}");
                if k < n {
                    assert!(g.water().target < FULL_LEVEL, "n = {n}, landing {k}");
                }
            }
            assert_eq!(g.water().target, FULL_LEVEL, "n = {n}");
            let mut frames = 0;
            while !g.is_game_over() {
                now += 16.0;
                g.tick(now);
                frames += 1;
                assert!(frames < 1_000, "n = {n}: water never filled");
            }
            assert_eq!(g.landings(), n);
        }
    }

    #[test]
    fn input_is_ignored_after_game_over() {
        let mut g = started(16);
        g.water = Water { level: FULL_LEVEL, target: FULL_LEVEL };
        assert!(g.tick(16.0).game_over);
        place(&mut g, 'g', 10.0, 10.0, 0.0);
        assert_eq!(g.press_key("g", 32.0), None);
        assert_eq!(g.score(), 0);
        assert_eq!(g.popped(), 0);
        assert!(g.confetti().is_empty());
        assert!(!g.chars()[0].is_popped());
    }

    #[test]
    fn simultaneous_crossings_each_raise_the_target() {
        let mut g = started(17);
        let first = place(&mut g, 'a', 10.0, 539.5, 1.0);
        let second = place(&mut g, 'b', 200.0, 539.8, 2.0);
        let report = g.tick(16.0);
        assert_eq!(report.landed, 2);
        assert_eq!(g.landings(), 2);
        assert!((g.water().target - 28.0).abs() < 1e-9);
        assert_eq!(g.splashes().len(), 44);
        for id in [first, second] {
            assert!(g.chars().iter().any(|c| c.id == id && c.has_landed()));
        }
    }

    #[test]
    fn shrinking_viewport_prunes_characters_past_the_new_bottom() {
        let mut g = started(18);
        g.spawner.stop();
        let deep = place(&mut g, 'd', 10.0, 450.0, 0.0);
        let shallow = place(&mut g, 's', 60.0, 350.0, 0.0);
        g.tick(16.0);
        assert_eq!(g.chars().len(), 2);
        // new bottom cut-off: 300 + 100
        g.set_viewport(800.0, 300.0);
        g.tick(32.0);
        let ids: Vec<u64> = g.chars().iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![shallow]);
        assert!(!ids.contains(&deep));
    }

    #[test]
    fn config_gate_toggles() {
        let mut g = GameState::with_seed(13);
        g.toggle_config();
        assert!(g.show_config());
        g.toggle_config();
        assert!(!g.show_config());
        g.toggle_config();
        g.close_config();
        assert!(!g.show_config());
    }
}
