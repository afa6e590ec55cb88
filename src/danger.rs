//! Red background that darkens as characters keep landing in high water.
//! Purely presentational.

use crate::palette::DANGER_STOPS;

/// Landings above half-full at which the background reaches its darkest.
pub const MAX_DANGER: u32 = 8;
/// The background only turns red once the water is above this level.
pub const DANGER_THRESHOLD: f64 = 50.0;

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let v = u32::from_str_radix(hex, 16).ok()?;
    Some(((v >> 16) as u8, (v >> 8) as u8, v as u8))
}

/// Channel-wise linear blend of two `#rrggbb` colors, `factor` 0 → `from`, 1 → `to`.
/// Unparseable input falls back to `from` unchanged.
pub fn interpolate_color(from: &str, to: &str, factor: f64) -> String {
    let (Some(a), Some(b)) = (parse_hex(from), parse_hex(to)) else {
        return from.to_string();
    };
    let t = factor.clamp(0.0, 1.0);
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    format!("#{:02x}{:02x}{:02x}", mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

#[derive(Clone, Debug, PartialEq)]
pub struct DangerGradient {
    /// (offset in percent, color) from top to bottom.
    pub stops: Vec<(f64, String)>,
}

impl DangerGradient {
    pub fn for_danger(danger: u32) -> Self {
        let intensity = (danger as f64 / MAX_DANGER as f64).min(1.0);
        let stops = DANGER_STOPS
            .iter()
            .map(|&(offset, calm, dark)| (offset, interpolate_color(calm, dark, intensity)))
            .collect();
        Self { stops }
    }

    pub fn css(&self) -> String {
        let parts: Vec<String> = self.stops.iter().map(|(o, c)| format!("{c} {o}%")).collect();
        format!("linear-gradient(to bottom, {})", parts.join(", "))
    }
}

/// Background for the current frame, or `None` when the default background applies.
pub fn danger_gradient(show_water: bool, water_level: f64, danger: u32) -> Option<DangerGradient> {
    if !show_water || water_level <= DANGER_THRESHOLD {
        return None;
    }
    Some(DangerGradient::for_danger(danger))
}
