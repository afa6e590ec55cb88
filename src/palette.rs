// -----------------------------------------------------------------------------
// Fixed palettes that spawned characters and particles draw from.
// -----------------------------------------------------------------------------

/// Glyphs a falling character can show. Matching is case-insensitive.
pub const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

pub const CHAR_COLORS: &[&str] = &[
    "#ffff00", "#00ff00", "#ff00ff", "#00ffff", "#ffffff", "#ffa500", "#ff1493", "#32cd32", "#ff4500",
    "#9400d3", "#00ff7f", "#ff6347", "#1e90ff", "#ffd700", "#adff2f", "#ff69b4", "#00bfff", "#ffb347",
];

pub const FONTS: &[&str] = &[
    "Arial", "Helvetica", "Georgia", "Times New Roman", "Courier New", "Verdana", "Comic Sans MS",
];

/// CSS font-weight values.
pub const WEIGHTS: &[&str] = &["normal", "bold", "300", "600", "800"];

pub const CONFETTI_COLORS: &[&str] = &["#ff6b6b", "#feca57", "#48dbfb", "#ff9ff3", "#54a0ff", "#5f27cd"];

pub const SPLASH_COLORS: &[&str] = &[
    "rgba(135,206,250,0.9)",
    "rgba(176,224,230,1)",
    "rgba(255,255,255,0.9)",
    "rgba(100,200,255,0.8)",
];

/// Color of the large droplets thrown up on top of the splash ring.
pub const DROPLET_COLOR: &str = "rgba(255,255,255,0.95)";

/// Danger background ramps: (calm, drowning) per gradient stop, top to bottom.
pub const DANGER_STOPS: [(f64, &str, &str); 5] = [
    (0.0, "#3d1a1a", "#1a0000"),
    (25.0, "#5c2828", "#330000"),
    (60.0, "#8b3a3a", "#660000"),
    (80.0, "#d65555", "#990000"),
    (100.0, "#ff7777", "#cc0000"),
];
