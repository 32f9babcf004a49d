use rand::Rng;

use crate::constants::*;
use crate::types::Vector2D;

pub struct Ship {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
}

impl Ship {
    pub fn new(position: Vector2D) -> Self {
        Ship {
            position,
            velocity: Vector2D::zero(),
            radius: SHIP_RADIUS,
        }
    }

    /// Applies one frame of movement from the held-key axes.
    ///
    /// The direction is normalized so diagonals are no faster than a
    /// single axis; with no input the divisor falls back to 1 and the
    /// velocity is zero. Position is clamped per axis so the hull stays
    /// fully inside the arena (hard stop, no bounce).
    pub fn steer(&mut self, move_x: f64, move_y: f64, dt: f64) {
        let magnitude = match move_x.hypot(move_y) {
            m if m == 0.0 => 1.0,
            m => m,
        };
        self.velocity = Vector2D::new(move_x / magnitude, move_y / magnitude).scale(SHIP_SPEED);
        self.position = self.position.add(self.velocity.scale(dt));
        self.position.x = self.position.x.clamp(self.radius, WORLD_WIDTH - self.radius);
        self.position.y = self.position.y.clamp(self.radius, WORLD_HEIGHT - self.radius);
    }

    /// Muzzle point, one radius above the hull center.
    pub fn nose(&self) -> Vector2D {
        Vector2D::new(self.position.x, self.position.y - self.radius)
    }
}

pub struct Bullet {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
}

impl Bullet {
    /// Bullets leave the ship's nose travelling straight up, regardless
    /// of how the ship is moving.
    pub fn fired_from(ship: &Ship) -> Self {
        Bullet {
            position: ship.nose(),
            velocity: Vector2D::new(0.0, -BULLET_SPEED),
            radius: BULLET_RADIUS,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.position = self.position.add(self.velocity.scale(dt));
    }

    /// Bullets only travel up, so expiry checks the top bound alone.
    pub fn live(&self) -> bool {
        self.position.y > BULLET_EXPIRY_Y
    }
}

pub struct Asteroid {
    pub position: Vector2D,
    pub velocity: Vector2D,
    pub radius: f64,
    pub rotation: f64,
    pub spin: f64,
}

impl Asteroid {
    /// Rolls a spawn on a uniformly chosen arena edge, just outside the
    /// boundary, aimed loosely at `target` (the ship's position right now).
    pub fn spawn_at_edge(rng: &mut impl Rng, target: Vector2D) -> Self {
        let side = rng.gen_range(0..4);
        let (x, y) = match side {
            0 => (rng.gen_range(0.0..WORLD_WIDTH), -ASTEROID_SPAWN_OFFSET),
            1 => (WORLD_WIDTH + ASTEROID_SPAWN_OFFSET, rng.gen_range(0.0..WORLD_HEIGHT)),
            2 => (rng.gen_range(0.0..WORLD_WIDTH), WORLD_HEIGHT + ASTEROID_SPAWN_OFFSET),
            _ => (-ASTEROID_SPAWN_OFFSET, rng.gen_range(0.0..WORLD_HEIGHT)),
        };
        Asteroid::aimed(
            Vector2D::new(x, y),
            target,
            rng.gen_range(-ASTEROID_MAX_WOBBLE..ASTEROID_MAX_WOBBLE),
            rng.gen_range(ASTEROID_MIN_SPEED..ASTEROID_MAX_SPEED),
            rng.gen_range(ASTEROID_MIN_RADIUS..ASTEROID_MAX_RADIUS),
            rng.gen_range(0.0..2.0 * std::f64::consts::PI),
            rng.gen_range(-ASTEROID_MAX_SPIN..ASTEROID_MAX_SPIN),
        )
    }

    /// Deterministic constructor: heading is the straight-line angle to
    /// `target` perturbed by `wobble` radians.
    pub fn aimed(
        position: Vector2D,
        target: Vector2D,
        wobble: f64,
        speed: f64,
        radius: f64,
        rotation: f64,
        spin: f64,
    ) -> Self {
        let heading = position.angle_to(target) + wobble;
        Asteroid {
            position,
            velocity: Vector2D::from_angle(heading).scale(speed),
            radius,
            rotation,
            spin,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.position = self.position.add(self.velocity.scale(dt));
        self.rotation += self.spin * dt;
    }

    /// Live while inside the arena expanded by the despawn margin on
    /// every side.
    pub fn in_bounds(&self) -> bool {
        self.position.x > -ASTEROID_DESPAWN_MARGIN
            && self.position.x < WORLD_WIDTH + ASTEROID_DESPAWN_MARGIN
            && self.position.y > -ASTEROID_DESPAWN_MARGIN
            && self.position.y < WORLD_HEIGHT + ASTEROID_DESPAWN_MARGIN
    }
}
