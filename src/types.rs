#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

impl Vector2D {
    pub fn new(x: f64, y: f64) -> Self {
        Vector2D { x, y }
    }

    pub fn zero() -> Self {
        Vector2D::new(0.0, 0.0)
    }

    /// Unit vector for an angle in radians, screen convention (y down).
    pub fn from_angle(angle: f64) -> Self {
        Vector2D::new(angle.cos(), angle.sin())
    }

    pub fn scale(&self, scalar: f64) -> Self {
        Vector2D::new(self.x * scalar, self.y * scalar)
    }

    pub fn add(&self, other: Vector2D) -> Self {
        Vector2D::new(self.x + other.x, self.y + other.y)
    }

    pub fn distance_to(&self, other: Vector2D) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Angle from this point to another, in radians.
    pub fn angle_to(&self, other: Vector2D) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }
}
