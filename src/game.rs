use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use log::{error, info};
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::constants::*;
use crate::entities::{Asteroid, Bullet, Ship};
use crate::input::InputState;
use crate::rendering::Renderer;
use crate::store::HighScoreStore;
use crate::types::Vector2D;

/// Everything the simulation mutates frame to frame. Owned by `Game`;
/// no ambient globals.
pub struct GameState {
    pub ship: Ship,
    pub bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub score: u32,
    pub high_score: u32,
    pub game_over: bool,
    pub last_fire_ms: f64,
    pub last_spawn_ms: f64,
}

impl GameState {
    fn new(high_score: u32) -> Self {
        GameState {
            ship: Ship::new(Vector2D::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5)),
            bullets: Vec::new(),
            asteroids: Vec::new(),
            score: 0,
            high_score,
            game_over: false,
            last_fire_ms: 0.0,
            last_spawn_ms: 0.0,
        }
    }
}

pub struct Game<S> {
    pub state: GameState,
    store: S,
    rng: StdRng,
}

impl<S: HighScoreStore> Game<S> {
    pub fn new(store: S) -> Self {
        Game::with_rng(store, StdRng::from_entropy())
    }

    pub fn with_rng(store: S, rng: StdRng) -> Self {
        let high_score = store.load();
        Game {
            state: GameState::new(high_score),
            store,
            rng,
        }
    }

    /// Full in-place reset: score zeroed, entities cleared, ship
    /// re-centered, timers stamped to `now_ms`. The high score survives.
    pub fn reset(&mut self, now_ms: f64) {
        let high_score = self.state.high_score;
        self.state = GameState::new(high_score);
        self.state.last_fire_ms = now_ms;
        self.state.last_spawn_ms = now_ms;
        info!("game reset");
    }

    /// Advances the world by one frame and resolves collisions.
    /// `dt_raw` is clamped so a frame hitch cannot tunnel entities
    /// through each other. Does nothing once the game is over.
    pub fn step(&mut self, input: &InputState, now_ms: f64, dt_raw: f64) {
        if self.state.game_over {
            return;
        }
        let dt = dt_raw.min(MAX_FRAME_DT);
        let state = &mut self.state;

        let move_x = (input.right_held() as i32 - input.left_held() as i32) as f64;
        let move_y = (input.down_held() as i32 - input.up_held() as i32) as f64;
        state.ship.steer(move_x, move_y, dt);

        // Monotonic cooldown gate; rapid taps cannot bank shots.
        if input.fire_held() && now_ms - state.last_fire_ms >= BULLET_COOLDOWN_MS {
            state.last_fire_ms = now_ms;
            state.bullets.push(Bullet::fired_from(&state.ship));
        }

        if now_ms - state.last_spawn_ms > ASTEROID_SPAWN_MS {
            state.last_spawn_ms = now_ms;
            let target = state.ship.position;
            state.asteroids.push(Asteroid::spawn_at_edge(&mut self.rng, target));
        }

        for bullet in &mut state.bullets {
            bullet.advance(dt);
        }
        state.bullets.retain(Bullet::live);

        for asteroid in &mut state.asteroids {
            asteroid.advance(dt);
        }
        state.asteroids.retain(Asteroid::in_bounds);

        self.resolve_collisions();
    }

    /// Asteroids are walked last to first so in-place removal never
    /// shifts an index we have yet to visit. The ship test comes first;
    /// a hit ends the frame immediately, leaving the remaining
    /// asteroids and bullets exactly as they are.
    fn resolve_collisions(&mut self) {
        let state = &mut self.state;
        let mut i = state.asteroids.len();
        while i > 0 {
            i -= 1;
            let a_pos = state.asteroids[i].position;
            let a_radius = state.asteroids[i].radius;

            let hit_window = a_radius + state.ship.radius - SHIP_HIT_FUDGE;
            if a_pos.distance_to(state.ship.position) < hit_window {
                state.game_over = true;
                info!("ship destroyed, final score {}", state.score);
                if state.score > state.high_score {
                    state.high_score = state.score;
                    if let Err(err) = self.store.save(state.high_score) {
                        // Best-effort write; the in-memory value stands.
                        error!("failed to persist high score: {}", err);
                    }
                }
                return;
            }

            // First bullet in list order wins; one bullet per asteroid.
            let hit = state
                .bullets
                .iter()
                .position(|b| a_pos.distance_to(b.position) < a_radius + b.radius);
            if let Some(j) = hit {
                state.asteroids.remove(i);
                state.bullets.remove(j);
                state.score += SCORE_PER_ASTEROID;
            }
        }
    }

    /// Frame-driven loop: drain input, sample the clock once, step the
    /// simulation, then render. Returns when the player quits.
    pub fn run<W: Write>(
        &mut self,
        out: &mut W,
        renderer: &mut Renderer,
        report_release: bool,
    ) -> io::Result<()> {
        let started = Instant::now();
        let mut input = InputState::new(report_release);
        let mut prev_ms = 0.0;

        loop {
            // Block up to one frame budget for the first event, then drain
            // whatever else is queued without waiting.
            let mut pending = event::poll(Duration::from_millis(FRAME_INTERVAL_MS))?;
            let now_ms = started.elapsed().as_secs_f64() * 1000.0;
            while pending {
                match event::read()? {
                    Event::Key(key) => match key.code {
                        KeyCode::Char('q') | KeyCode::Esc
                            if key.kind == KeyEventKind::Press =>
                        {
                            info!("quit requested");
                            return Ok(());
                        }
                        _ => input.apply(&key, now_ms),
                    },
                    Event::Resize(cols, rows) => renderer.resize(cols, rows),
                    _ => {}
                }
                pending = event::poll(Duration::ZERO)?;
            }
            input.decay(now_ms);

            // Restart is consumed every frame so a press during play
            // cannot bank a reset for later.
            if input.take_restart() && self.state.game_over {
                self.reset(now_ms);
                prev_ms = now_ms;
            }

            let dt = (now_ms - prev_ms) / 1000.0;
            prev_ms = now_ms;

            self.step(&input, now_ms, dt);
            renderer.draw(&self.state, now_ms);
            renderer.present(out)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crossterm::event::{KeyEvent, KeyModifiers};

    fn game() -> Game<MemoryStore> {
        Game::with_rng(MemoryStore::new(), StdRng::seed_from_u64(42))
    }

    fn idle() -> InputState {
        InputState::new(true)
    }

    fn holding(codes: &[KeyCode]) -> InputState {
        let mut input = InputState::new(true);
        for &code in codes {
            input.apply(&KeyEvent::new(code, KeyModifiers::NONE), 0.0);
        }
        input
    }

    fn asteroid_at(x: f64, y: f64, radius: f64) -> Asteroid {
        let mut a = Asteroid::aimed(
            Vector2D::new(x, y),
            Vector2D::new(x + 1.0, y),
            0.0,
            0.0,
            radius,
            0.0,
            0.0,
        );
        a.velocity = Vector2D::zero();
        a
    }

    fn bullet_at(x: f64, y: f64) -> Bullet {
        Bullet {
            position: Vector2D::new(x, y),
            velocity: Vector2D::zero(),
            radius: BULLET_RADIUS,
        }
    }

    #[test]
    fn opposite_keys_cancel_on_an_axis() {
        let mut g = game();
        let input = holding(&[KeyCode::Left, KeyCode::Right, KeyCode::Up]);
        g.step(&input, 0.0, 0.016);
        assert_eq!(g.state.ship.velocity.x, 0.0);
        assert!(g.state.ship.velocity.y < 0.0);
        assert_eq!(g.state.ship.position.x, WORLD_WIDTH * 0.5);
    }

    #[test]
    fn huge_dt_is_clamped() {
        let mut g = game();
        let input = holding(&[KeyCode::Right]);
        g.step(&input, 0.0, 1.0);
        let moved = g.state.ship.position.x - WORLD_WIDTH * 0.5;
        assert!((moved - SHIP_SPEED * MAX_FRAME_DT).abs() < 1e-9);
    }

    #[test]
    fn fire_cooldown_allows_one_shot_per_window() {
        let mut g = game();
        let input = holding(&[KeyCode::Char(' ')]);
        g.step(&input, 200.0, 0.0);
        assert_eq!(g.state.bullets.len(), 1);
        // Second attempt lands inside the cooldown window.
        g.step(&input, 300.0, 0.0);
        assert_eq!(g.state.bullets.len(), 1);
        // Full cooldown elapsed since the shot at t=200.
        g.step(&input, 385.0, 0.0);
        assert_eq!(g.state.bullets.len(), 2);
    }

    #[test]
    fn spawn_gate_fires_once_per_interval() {
        let mut g = game();
        g.step(&idle(), 1000.0, 0.0);
        assert_eq!(g.state.asteroids.len(), 1);
        g.step(&idle(), 1500.0, 0.0);
        assert_eq!(g.state.asteroids.len(), 1);
        g.step(&idle(), 2000.0, 0.0);
        assert_eq!(g.state.asteroids.len(), 2);
    }

    #[test]
    fn tangency_is_not_a_hit() {
        let mut g = game();
        g.state.asteroids.push(asteroid_at(400.0, 100.0, 20.0));
        g.state.bullets.push(bullet_at(400.0 + 20.0 + BULLET_RADIUS, 100.0));
        g.step(&idle(), 0.0, 0.0);
        assert_eq!(g.state.score, 0);
        assert_eq!(g.state.asteroids.len(), 1);
        assert_eq!(g.state.bullets.len(), 1);

        // One unit inside the sum of radii counts.
        g.state.bullets[0].position.x -= 1.0;
        g.step(&idle(), 0.0, 0.0);
        assert_eq!(g.state.score, SCORE_PER_ASTEROID);
        assert!(g.state.asteroids.is_empty());
        assert!(g.state.bullets.is_empty());
    }

    #[test]
    fn only_first_bullet_in_order_is_consumed() {
        let mut g = game();
        g.state.asteroids.push(asteroid_at(400.0, 100.0, 20.0));
        g.state.bullets.push(bullet_at(400.0, 100.0));
        g.state.bullets.push(bullet_at(401.0, 100.0));
        g.step(&idle(), 0.0, 0.0);
        assert_eq!(g.state.score, SCORE_PER_ASTEROID);
        assert!(g.state.asteroids.is_empty());
        assert_eq!(g.state.bullets.len(), 1);
        assert_eq!(g.state.bullets[0].position.x, 401.0);
    }

    #[test]
    fn ship_hit_window_is_fudged() {
        let ship_center = Vector2D::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5);
        let radius = 20.0;

        // Exactly on the fudged threshold: no hit (strict comparison).
        let mut g = game();
        let gap = radius + SHIP_RADIUS - SHIP_HIT_FUDGE;
        g.state.asteroids.push(asteroid_at(ship_center.x + gap, ship_center.y, radius));
        g.step(&idle(), 0.0, 0.0);
        assert!(!g.state.game_over);

        // A hair inside it: game over.
        let mut g = game();
        g.state
            .asteroids
            .push(asteroid_at(ship_center.x + gap - 0.1, ship_center.y, radius));
        g.step(&idle(), 0.0, 0.0);
        assert!(g.state.game_over);
    }

    #[test]
    fn ship_hit_stops_the_collision_pass() {
        let mut g = game();
        g.state.score = 50;
        // Index 0 has a bullet sitting inside it, but the pass runs last
        // to first and the ship hit at index 1 ends the frame before
        // index 0 is ever examined.
        g.state.asteroids.push(asteroid_at(100.0, 100.0, 20.0));
        g.state.bullets.push(bullet_at(100.0, 100.0));
        let ship_center = g.state.ship.position;
        g.state.asteroids.push(asteroid_at(ship_center.x, ship_center.y, 20.0));

        g.step(&idle(), 0.0, 0.0);
        assert!(g.state.game_over);
        assert_eq!(g.state.score, 50);
        assert_eq!(g.state.asteroids.len(), 2);
        assert_eq!(g.state.bullets.len(), 1);
        assert_eq!(g.state.high_score, 50);
    }

    #[test]
    fn high_score_is_persisted_on_game_over() {
        let mut g = game();
        g.state.score = 70;
        let center = g.state.ship.position;
        g.state.asteroids.push(asteroid_at(center.x, center.y, 20.0));
        g.step(&idle(), 0.0, 0.0);
        assert_eq!(g.store.saved, Some(70));
    }

    #[test]
    fn failed_persist_is_swallowed() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let mut g = Game::with_rng(store, StdRng::seed_from_u64(1));
        g.state.score = 30;
        let center = g.state.ship.position;
        g.state.asteroids.push(asteroid_at(center.x, center.y, 20.0));
        g.step(&idle(), 0.0, 0.0);
        assert!(g.state.game_over);
        assert_eq!(g.state.high_score, 30);
        assert_eq!(g.store.saved, None);
    }

    #[test]
    fn high_score_never_decreases() {
        let mut store = MemoryStore::new();
        store.saved = Some(100);
        let mut g = Game::with_rng(store, StdRng::seed_from_u64(1));
        assert_eq!(g.state.high_score, 100);
        g.state.score = 40;
        let center = g.state.ship.position;
        g.state.asteroids.push(asteroid_at(center.x, center.y, 20.0));
        g.step(&idle(), 0.0, 0.0);
        assert_eq!(g.state.high_score, 100);
        assert_eq!(g.store.saved, Some(100));
    }

    #[test]
    fn step_is_inert_while_game_over() {
        let mut g = game();
        g.state.game_over = true;
        g.state.bullets.push(bullet_at(100.0, 100.0));
        let input = holding(&[KeyCode::Right, KeyCode::Char(' ')]);
        g.step(&input, 5000.0, 0.016);
        assert_eq!(g.state.ship.position.x, WORLD_WIDTH * 0.5);
        assert_eq!(g.state.bullets.len(), 1);
        assert!(g.state.asteroids.is_empty());
    }

    #[test]
    fn restart_resets_everything_but_high_score() {
        let mut g = game();
        g.state.score = 30;
        let center = g.state.ship.position;
        g.state.asteroids.push(asteroid_at(center.x, center.y, 20.0));
        g.state.bullets.push(bullet_at(100.0, 100.0));
        g.step(&idle(), 0.0, 0.0);
        assert!(g.state.game_over);

        g.reset(4000.0);
        assert_eq!(g.state.score, 0);
        assert!(g.state.bullets.is_empty());
        assert!(g.state.asteroids.is_empty());
        assert!(!g.state.game_over);
        assert_eq!(g.state.high_score, 30);
        assert_eq!(
            g.state.ship.position,
            Vector2D::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5)
        );
        assert_eq!(g.state.last_fire_ms, 4000.0);
        assert_eq!(g.state.last_spawn_ms, 4000.0);
    }

    #[test]
    fn expired_entities_are_pruned_in_order() {
        let mut g = game();
        g.state.bullets.push(bullet_at(100.0, -30.0));
        g.state.bullets.push(bullet_at(200.0, 100.0));
        g.state.bullets.push(bullet_at(300.0, -25.0));
        g.state.bullets.push(bullet_at(400.0, 200.0));
        let mut far = asteroid_at(400.0, 300.0, 20.0);
        far.position = Vector2D::new(-100.0, 300.0);
        g.state.asteroids.push(far);
        g.step(&idle(), 0.0, 0.0);
        let xs: Vec<f64> = g.state.bullets.iter().map(|b| b.position.x).collect();
        assert_eq!(xs, vec![200.0, 400.0]);
        assert!(g.state.asteroids.is_empty());
    }

    #[test]
    fn idle_thousand_frames_stays_at_rest() {
        let mut g = game();
        let input = idle();
        // The clock is held below the spawn interval so nothing is ever
        // spawned; each frame still integrates a full 16 ms of motion.
        for _ in 0..1000 {
            g.step(&input, 500.0, 0.016);
        }
        assert_eq!(g.state.score, 0);
        assert!(!g.state.game_over);
        assert!(g.state.asteroids.is_empty());
        assert_eq!(
            g.state.ship.position,
            Vector2D::new(WORLD_WIDTH * 0.5, WORLD_HEIGHT * 0.5)
        );
    }
}
