/// Percentage the water starts at (and returns to on restart).
pub const START_LEVEL: f64 = 10.0;
pub const FULL_LEVEL: f64 = 100.0;
/// Per-frame easing step of the visible level toward its target.
pub const RISE_PER_FRAME: f64 = 0.5;

/// Water fill as two scalars: what is drawn (`level`) and where it is heading (`target`).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Water {
    pub level: f64,
    pub target: f64,
}

impl Default for Water {
    fn default() -> Self {
        Self { level: START_LEVEL, target: START_LEVEL }
    }
}

impl Water {
    /// Move `level` one step toward `target` without overshooting.
    pub fn ease(&mut self) {
        if self.level < self.target {
            self.level = (self.level + RISE_PER_FRAME).min(self.target);
        }
    }

    /// Move the target up to `target` (capped); never lowers it.
    pub fn raise_to(&mut self, target: f64) {
        self.target = self.target.max(target.min(FULL_LEVEL));
    }

    pub fn is_full(&self) -> bool {
        self.level >= FULL_LEVEL
    }

    /// Screen y of the water surface for a viewport of the given height.
    pub fn surface_y(&self, viewport_height: f64) -> f64 {
        viewport_height - viewport_height * self.level / 100.0
    }
}
