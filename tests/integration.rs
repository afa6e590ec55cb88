// Integration tests (native) for the `rising-tide` crate.
// These drive `GameState` on a fake 16ms clock and never touch browser APIs.

use rising_tide::spawner::wave_size;
use rising_tide::water::FULL_LEVEL;
use rising_tide::{GameConfig, GameState};

const FRAME_MS: f64 = 16.0;

fn started(seed: u64, config: GameConfig) -> GameState {
    let mut g = GameState::with_seed(seed);
    g.set_viewport(800.0, 600.0);
    g.set_config(config).unwrap();
    g.start(0.0);
    g
}

// Ten landings with characters_to_top = 10 fill the water and stop spawning.
#[test]
fn ten_landings_fill_the_water() {
    let mut g = started(2024, GameConfig::default());
    let mut now = 0.0;
    let mut landed = 0;
    let mut saw_game_over = false;
    for _ in 0..200_000 {
        now += FRAME_MS;
        let report = g.tick(now);
        landed += report.landed;
        assert!(g.water().level <= FULL_LEVEL);
        // 10 + 9 * 9 = 91 until the tenth landing, full from then on
        if landed < 10 {
            assert!(g.water().target < FULL_LEVEL);
        } else {
            assert_eq!(g.water().target, FULL_LEVEL);
        }
        if report.game_over {
            saw_game_over = true;
            break;
        }
    }
    assert!(saw_game_over, "water never reached the top");
    assert!(landed >= 10);
    assert_eq!(g.water().level, FULL_LEVEL);
    assert!(g.is_game_over());
    assert!(!g.is_spawning());

    // Nothing new appears once the game is over.
    let count = g.chars().len();
    for _ in 0..500 {
        now += FRAME_MS;
        assert_eq!(g.tick(now).spawned, 0);
    }
    assert!(g.chars().len() <= count);
}

// The water is full on the n-th landing for every setting the config screen offers,
// never one landing early or late.
#[test]
fn every_characters_to_top_setting_fills_on_its_last_landing() {
    for n in 1..=50 {
        let mut g = started(u64::from(n), GameConfig { characters_to_top: n, fall_speed: 3.0 });
        let mut now = 0.0;
        loop {
            now += FRAME_MS;
            let report = g.tick(now);
            assert_eq!(
                g.landings() >= n,
                g.water().target == FULL_LEVEL,
                "n = {n}, landings = {}, target = {}",
                g.landings(),
                g.water().target
            );
            if report.game_over {
                break;
            }
            assert!(now < 50_000_000.0, "n = {n}: water never reached the top");
        }
        assert!(g.landings() >= n);
    }
}

#[test]
fn target_rises_by_ninety_over_characters_to_top() {
    let mut g = started(7, GameConfig { characters_to_top: 4, fall_speed: 3.0 });
    let mut now = 0.0;
    let mut landings = 0;
    while landings == 0 {
        now += FRAME_MS;
        landings += g.tick(now).landed;
        assert!(now < 1_000_000.0);
    }
    let expected = (10.0 + landings as f64 * 90.0 / 4.0).min(FULL_LEVEL);
    assert!((g.water().target - expected).abs() < 1e-9);
}

// Typing every character as soon as it shows keeps the water at its start level.
#[test]
fn popping_everything_keeps_water_low_and_grows_waves() {
    let mut g = started(99, GameConfig::default());
    let mut now = 0.0;
    while g.popped() < 25 {
        now += FRAME_MS;
        let report = g.tick(now);
        assert_eq!(report.landed, 0);
        let glyphs: Vec<String> = g
            .chars()
            .iter()
            .filter(|c| !c.is_popped())
            .map(|c| c.glyph.to_string())
            .collect();
        for glyph in glyphs {
            g.press_key(&glyph, now);
        }
        assert!(now < 10_000_000.0);
    }
    assert_eq!(g.score(), g.popped() * 10);
    assert_eq!(g.water().target, 10.0);
    assert_eq!(wave_size(g.popped()), 3);
}

#[test]
fn unmatched_input_changes_nothing() {
    let mut g = started(5, GameConfig::default());
    g.tick(100.0);
    let glyph = g.chars()[0].glyph;
    let other = if glyph == '0' { "1" } else { "0" };
    // '0' and '1' have no case twin, so a different digit can never match.
    let before = g.chars().to_vec();
    assert_eq!(g.press_key(other, 110.0), None);
    assert_eq!(g.score(), 0);
    assert_eq!(g.popped(), 0);
    assert!(g.confetti().is_empty());
    assert_eq!(g.chars(), &before[..]);
}

#[test]
fn input_before_start_is_ignored() {
    let mut g = GameState::with_seed(3);
    assert_eq!(g.press_key("a", 0.0), None);
    assert_eq!(g.score(), 0);
}
