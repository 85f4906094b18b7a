use traj_core::vector::Vector2;

/// Position (m) and velocity (m/s) in the vertical plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct State {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl State {
    pub fn new(x: f64, y: f64, vx: f64, vy: f64) -> Self {
        Self { x, y, vx, vy }
    }

    pub fn position(&self) -> Vector2 {
        [self.x, self.y]
    }

    pub fn velocity(&self) -> Vector2 {
        [self.vx, self.vy]
    }

    /// Flat `[x, y, vx, vy]` layout used by the integrators.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.vx, self.vy]
    }

    pub fn from_array(y: [f64; 4]) -> Self {
        Self::new(y[0], y[1], y[2], y[3])
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}
