//! Core units, constants, and shared primitives for the Trajectory Simulator workspace.

/// Physical constants and reference defaults expressed in SI units.
pub mod constants {
    /// Default gravitational acceleration used by the simulator (m/s²).
    pub const DEFAULT_GRAVITY: f64 = 9.81;
    /// Sea-level air density (kg/m³).
    pub const DEFAULT_AIR_DENSITY: f64 = 1.225;
    /// Drag coefficient of a sphere.
    pub const DEFAULT_DRAG_COEFFICIENT: f64 = 0.47;
    /// Default spacing of the output sample grid (s).
    pub const DEFAULT_TIME_STEP: f64 = 0.1;
    /// Default simulated horizon (s).
    pub const DEFAULT_MAX_TIME: f64 = 10.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Convert radians to degrees.
    #[inline]
    pub fn rad_to_deg(v: f64) -> f64 {
        v.to_degrees()
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 2]` math everywhere.
pub mod vector {
    /// Alias for a planar vector in metres or m/s depending on context.
    pub type Vector2 = [f64; 2];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector2) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector2, b: &Vector2) -> f64 {
        a[0] * b[0] + a[1] * b[1]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] + b[0], a[1] + b[1]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector2, b: &Vector2) -> Vector2 {
        [a[0] - b[0], a[1] - b[1]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector2, s: f64) -> Vector2 {
        [v[0] * s, v[1] * s]
    }

    /// True when both components are finite.
    #[inline]
    pub fn is_finite(v: &Vector2) -> bool {
        v[0].is_finite() && v[1].is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::vector::*;

    #[test]
    fn norm_of_three_four_is_five() {
        assert_eq!(norm(&[3.0, 4.0]), 5.0);
    }

    #[test]
    fn sub_then_add_restores_vector() {
        let a = [1.5, -2.0];
        let b = [0.25, 4.0];
        assert_eq!(add(&sub(&a, &b), &b), a);
        assert_eq!(scale(&a, 2.0), [3.0, -4.0]);
    }
}
