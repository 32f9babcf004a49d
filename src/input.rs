use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::constants::KEY_HOLD_WINDOW_MS;

#[derive(Clone, Copy, Debug, Default)]
struct HeldKey {
    down: bool,
    last_seen_ms: f64,
}

impl HeldKey {
    fn press(&mut self, now_ms: f64) {
        self.down = true;
        self.last_seen_ms = now_ms;
    }

    fn release(&mut self) {
        self.down = false;
    }

    fn decay(&mut self, now_ms: f64) {
        if self.down && now_ms - self.last_seen_ms > KEY_HOLD_WINDOW_MS {
            self.down = false;
        }
    }
}

/// Tracks which movement/fire keys are currently held, plus the
/// edge-triggered restart key.
///
/// When the terminal reports key release events the held set is exact.
/// Otherwise a press only opens a short hold window that terminal
/// autorepeat keeps refreshing; `decay` closes it once repeats stop.
#[derive(Clone, Copy, Debug)]
pub struct InputState {
    left: HeldKey,
    right: HeldKey,
    up: HeldKey,
    down: HeldKey,
    fire: HeldKey,
    restart: bool,
    report_release: bool,
}

impl InputState {
    pub fn new(report_release: bool) -> Self {
        InputState {
            left: HeldKey::default(),
            right: HeldKey::default(),
            up: HeldKey::default(),
            down: HeldKey::default(),
            fire: HeldKey::default(),
            restart: false,
            report_release,
        }
    }

    pub fn apply(&mut self, event: &KeyEvent, now_ms: f64) {
        let pressed = matches!(event.kind, KeyEventKind::Press | KeyEventKind::Repeat);
        let key = match event.code {
            KeyCode::Left => &mut self.left,
            KeyCode::Right => &mut self.right,
            KeyCode::Up => &mut self.up,
            KeyCode::Down => &mut self.down,
            KeyCode::Char(' ') => &mut self.fire,
            KeyCode::Char('r') | KeyCode::Char('R') => {
                if event.kind == KeyEventKind::Press {
                    self.restart = true;
                }
                return;
            }
            _ => return,
        };
        if pressed {
            key.press(now_ms);
        } else {
            key.release();
        }
    }

    /// Expires stale holds when the terminal cannot report key release.
    pub fn decay(&mut self, now_ms: f64) {
        if self.report_release {
            return;
        }
        self.left.decay(now_ms);
        self.right.decay(now_ms);
        self.up.decay(now_ms);
        self.down.decay(now_ms);
        self.fire.decay(now_ms);
    }

    pub fn left_held(&self) -> bool {
        self.left.down
    }

    pub fn right_held(&self) -> bool {
        self.right.down
    }

    pub fn up_held(&self) -> bool {
        self.up.down
    }

    pub fn down_held(&self) -> bool {
        self.down.down
    }

    pub fn fire_held(&self) -> bool {
        self.fire.down
    }

    /// Returns whether restart was pressed since the last call, clearing it.
    pub fn take_restart(&mut self) -> bool {
        std::mem::replace(&mut self.restart, false)
    }
}
