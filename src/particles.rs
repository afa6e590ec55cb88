//! Entities the frame updater moves around: falling characters plus the two
//! kinds of feedback particles (confetti on a pop, splash on a landing).

use std::f64::consts::TAU;

use rand::Rng;

use crate::palette::{
    CHAR_COLORS, CONFETTI_COLORS, DROPLET_COLOR, FONTS, GLYPHS, SPLASH_COLORS, WEIGHTS,
};

/// Spawn height, above the top edge of the viewport.
pub const SPAWN_Y: f64 = -50.0;
/// Half the nominal glyph box; bursts are centred on `x + GLYPH_HALF`.
pub const GLYPH_HALF: f64 = 25.0;
pub const BASE_SPEED_MIN: f64 = 0.421875;
pub const BASE_SPEED_SPREAD: f64 = 0.6328125;

pub const CONFETTI_PER_BURST: usize = 12;
pub const CONFETTI_SPREAD: f64 = 100.0;
pub const CONFETTI_STAGGER_MS: f64 = 50.0;
pub const CONFETTI_LIFETIME_MS: f64 = 1000.0;

pub const SPLASH_RING: usize = 16;
pub const SPLASH_DROPLETS: usize = 6;
pub const SPLASH_GRAVITY: f64 = 0.4;
pub const SPLASH_SHRINK: f64 = 0.96;
/// Particles at or below this size are gone.
pub const SPLASH_MIN_SIZE: f64 = 1.0;

fn pick<R: Rng>(rng: &mut R, palette: &'static [&'static str]) -> &'static str {
    palette[rng.gen_range(0..palette.len())]
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FallingChar {
    pub id: u64,
    pub glyph: char,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    pub font: &'static str,
    pub size: f64,
    pub weight: &'static str,
    /// Pixels per frame; zero once the character has landed in the water.
    pub speed: f64,
    /// Timestamp of the pop, if popped.
    pub popped_at: Option<f64>,
}

impl FallingChar {
    /// Random glyph and styling, placed just above the viewport somewhere across its width.
    pub fn random<R: Rng>(rng: &mut R, id: u64, viewport_width: f64, fall_speed: f64) -> Self {
        let glyphs = GLYPHS.as_bytes();
        let glyph = glyphs[rng.gen_range(0..glyphs.len())] as char;
        let span = (viewport_width - 2.0 * GLYPH_HALF).max(0.0);
        Self {
            id,
            glyph,
            x: rng.gen_range(0.0..1.0) * span,
            y: SPAWN_Y,
            color: pick(rng, CHAR_COLORS),
            font: pick(rng, FONTS),
            size: 50.0 + rng.gen_range(0.0..30.0),
            weight: pick(rng, WEIGHTS),
            speed: (BASE_SPEED_MIN + rng.gen_range(0.0..BASE_SPEED_SPREAD)) * fall_speed,
            popped_at: None,
        }
    }

    pub fn is_popped(&self) -> bool {
        self.popped_at.is_some()
    }

    pub fn has_landed(&self) -> bool {
        !self.is_popped() && self.speed == 0.0
    }

    pub fn matches_key(&self, key: char) -> bool {
        self.glyph.to_lowercase().eq(key.to_lowercase())
    }

    /// Centre of the glyph box, where pop feedback is anchored.
    pub fn centre(&self) -> (f64, f64) {
        (self.x + GLYPH_HALF, self.y + GLYPH_HALF)
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ConfettiParticle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub color: &'static str,
    /// Animation start offset for the renderer, in ms.
    pub delay: f64,
    pub created_at: f64,
}

impl ConfettiParticle {
    pub fn expired(&self, now: f64) -> bool {
        now - self.created_at >= CONFETTI_LIFETIME_MS
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SplashParticle {
    pub id: u64,
    pub x: f64,
    pub y: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub color: &'static str,
    pub size: f64,
}

impl SplashParticle {
    /// One ballistic step: move, fall, shrink.
    pub fn step(&mut self) {
        self.x += self.velocity_x;
        self.y += self.velocity_y;
        self.velocity_y += SPLASH_GRAVITY;
        self.size *= SPLASH_SHRINK;
    }

    pub fn is_alive(&self, viewport_height: f64) -> bool {
        self.y < viewport_height + 50.0 && self.size > SPLASH_MIN_SIZE
    }
}

/// Scatter a confetti burst around `(x, y)`.
pub fn confetti_burst<R: Rng>(
    rng: &mut R,
    next_id: &mut u64,
    x: f64,
    y: f64,
    now: f64,
) -> Vec<ConfettiParticle> {
    (0..CONFETTI_PER_BURST)
        .map(|i| {
            let id = *next_id;
            *next_id += 1;
            ConfettiParticle {
                id,
                x: x + (rng.gen_range(0.0..1.0) - 0.5) * CONFETTI_SPREAD,
                y: y + (rng.gen_range(0.0..1.0) - 0.5) * CONFETTI_SPREAD,
                color: pick(rng, CONFETTI_COLORS),
                delay: i as f64 * CONFETTI_STAGGER_MS,
                created_at: now,
            }
        })
        .collect()
}

/// Splash at the water surface: an even ring of fast drops plus a few heavy droplets
/// thrown higher.
pub fn splash_burst<R: Rng>(rng: &mut R, next_id: &mut u64, x: f64, y: f64) -> Vec<SplashParticle> {
    let mut out = Vec::with_capacity(SPLASH_RING + SPLASH_DROPLETS);
    for i in 0..SPLASH_RING {
        let angle = i as f64 / SPLASH_RING as f64 * TAU;
        let speed = 4.0 + rng.gen_range(0.0..6.0);
        out.push(SplashParticle {
            id: *next_id,
            x,
            y,
            velocity_x: angle.cos() * speed,
            velocity_y: angle.sin() * speed - 4.0,
            color: pick(rng, SPLASH_COLORS),
            size: 6.0 + rng.gen_range(0.0..12.0),
        });
        *next_id += 1;
    }
    for _ in 0..SPLASH_DROPLETS {
        let angle = rng.gen_range(0.0..TAU);
        let speed = 2.0 + rng.gen_range(0.0..4.0);
        out.push(SplashParticle {
            id: *next_id,
            x: x + (rng.gen_range(0.0..1.0) - 0.5) * 40.0,
            y,
            velocity_x: angle.cos() * speed,
            velocity_y: angle.sin() * speed - 6.0,
            color: DROPLET_COLOR,
            size: 12.0 + rng.gen_range(0.0..8.0),
        });
        *next_id += 1;
    }
    out
}
