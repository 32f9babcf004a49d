use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::Print;

use crate::constants::*;
use crate::entities::{Asteroid, Bullet, Ship};
use crate::game::GameState;
use crate::types::Vector2D;

const STAR_COUNT: u32 = 120;
const OCTAGON_POINTS: usize = 8;

// Fixed hull silhouette in world units, relative to the ship center.
// The ship never visually rotates.
const SHIP_SILHOUETTE: [(f64, f64); 4] = [(0.0, -18.0), (14.0, 14.0), (0.0, 8.0), (-14.0, 14.0)];
const SHIP_ENGINE_OFFSET: (f64, f64) = (0.0, 11.0);

/// One frame's worth of terminal cells.
pub struct GameGrid {
    cells: Vec<Vec<char>>,
    width: u16,
    height: u16,
}

impl GameGrid {
    pub fn new(width: u16, height: u16) -> Self {
        GameGrid {
            cells: vec![vec![' '; width as usize]; height as usize],
            width,
            height,
        }
    }

    pub fn clear(&mut self) {
        self.cells = vec![vec![' '; self.width as usize]; self.height as usize];
    }

    /// Out-of-range cells (entities beyond the arena) are silently dropped.
    pub fn set(&mut self, x: i32, y: i32, c: char) {
        if x >= 0 && (x as u16) < self.width && y >= 0 && (y as u16) < self.height {
            self.cells[y as usize][x as usize] = c;
        }
    }

    pub fn get(&self, x: i32, y: i32) -> char {
        if x >= 0 && (x as u16) < self.width && y >= 0 && (y as u16) < self.height {
            self.cells[y as usize][x as usize]
        } else {
            ' '
        }
    }

    pub fn write_str(&mut self, x: i32, y: i32, s: &str) {
        for (offset, c) in s.chars().enumerate() {
            self.set(x + offset as i32, y, c);
        }
    }

    /// Replaces every occupied cell with a faint dot; the terminal
    /// stand-in for a translucent scrim.
    pub fn dim(&mut self) {
        for row in &mut self.cells {
            for cell in row {
                if *cell != ' ' {
                    *cell = '.';
                }
            }
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn row_string(&self, y: u16) -> String {
        self.cells[y as usize].iter().collect()
    }
}

/// Pure reader of `GameState`: maps world coordinates onto terminal
/// cells and draws back to front — starfield, bullets, asteroids, ship,
/// HUD, then the game-over overlay.
pub struct Renderer {
    grid: GameGrid,
}

impl Renderer {
    pub fn new(cols: u16, rows: u16) -> Self {
        Renderer {
            grid: GameGrid::new(cols, rows),
        }
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.grid = GameGrid::new(cols, rows);
    }

    pub fn grid(&self) -> &GameGrid {
        &self.grid
    }

    fn to_cell(&self, p: Vector2D) -> (i32, i32) {
        let x = (p.x * self.grid.width() as f64 / WORLD_WIDTH).floor() as i32;
        let y = (p.y * self.grid.height() as f64 / WORLD_HEIGHT).floor() as i32;
        (x, y)
    }

    pub fn draw(&mut self, state: &GameState, now_ms: f64) {
        self.grid.clear();
        self.draw_starfield(now_ms);
        for bullet in &state.bullets {
            self.draw_bullet(bullet);
        }
        for asteroid in &state.asteroids {
            self.draw_asteroid(asteroid);
        }
        self.draw_ship(&state.ship);
        self.draw_hud(state);
        if state.game_over {
            self.draw_game_over();
        }
    }

    pub fn present<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for y in 0..self.grid.height() {
            queue!(out, MoveTo(0, y), Print(self.grid.row_string(y)))?;
        }
        out.flush()
    }

    /// Star positions derive from the index alone; only the brightness
    /// pulses with time. Strictly cosmetic.
    fn draw_starfield(&mut self, now_ms: f64) {
        for i in 0..STAR_COUNT {
            let wx = (i * 137) as f64 % WORLD_WIDTH;
            let wy = (i * 97) as f64 % WORLD_HEIGHT;
            let twinkle = 0.5 + 0.5 * (now_ms / 500.0 + i as f64).sin();
            let c = if twinkle > 0.85 {
                '+'
            } else if twinkle > 0.45 {
                '.'
            } else {
                continue; // Dimmest stars wink out entirely
            };
            let (x, y) = self.to_cell(Vector2D::new(wx, wy));
            self.grid.set(x, y, c);
        }
    }

    fn draw_bullet(&mut self, bullet: &Bullet) {
        let (x, y) = self.to_cell(bullet.position);
        self.grid.set(x, y, 'o');
    }

    /// Jagged octagon: alternating vertex radii, spun by the asteroid's
    /// current rotation, outlined edge by edge.
    fn draw_asteroid(&mut self, asteroid: &Asteroid) {
        let mut points = [(0i32, 0i32); OCTAGON_POINTS];
        for (p, point) in points.iter_mut().enumerate() {
            let angle = asteroid.rotation
                + p as f64 / OCTAGON_POINTS as f64 * 2.0 * std::f64::consts::PI;
            let r = asteroid.radius * (0.76 + (p % 2) as f64 * 0.24);
            let vertex = asteroid.position.add(Vector2D::from_angle(angle).scale(r));
            *point = self.to_cell(vertex);
        }
        for p in 0..OCTAGON_POINTS {
            let (x0, y0) = points[p];
            let (x1, y1) = points[(p + 1) % OCTAGON_POINTS];
            self.plot_line(x0, y0, x1, y1, '@');
        }
    }

    fn draw_ship(&mut self, ship: &Ship) {
        let mut points = [(0i32, 0i32); SHIP_SILHOUETTE.len()];
        for (p, point) in points.iter_mut().enumerate() {
            let (dx, dy) = SHIP_SILHOUETTE[p];
            *point = self.to_cell(ship.position.add(Vector2D::new(dx, dy)));
        }
        for p in 0..points.len() {
            let (x0, y0) = points[p];
            let (x1, y1) = points[(p + 1) % points.len()];
            self.plot_line(x0, y0, x1, y1, '#');
        }
        let (ex, ey) = SHIP_ENGINE_OFFSET;
        let (x, y) = self.to_cell(ship.position.add(Vector2D::new(ex, ey)));
        self.grid.set(x, y, '=');
    }

    fn draw_hud(&mut self, state: &GameState) {
        let hud = format!("Score: {}   High: {}", state.score, state.high_score);
        self.grid.write_str(1, 0, &hud);
    }

    fn draw_game_over(&mut self) {
        self.grid.dim();
        let mid_x = self.grid.width() as i32 / 2;
        let mid_y = self.grid.height() as i32 / 2;
        let title = "GAME OVER";
        let hint = "Press R to restart";
        self.grid
            .write_str(mid_x - title.len() as i32 / 2, mid_y - 1, title);
        self.grid
            .write_str(mid_x - hint.len() as i32 / 2, mid_y + 1, hint);
    }

    fn plot_line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, c: char) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.grid.set(x0, y0, c);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}
