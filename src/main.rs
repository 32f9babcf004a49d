use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use crossterm::terminal::{
    self, Clear, ClearType, disable_raw_mode, enable_raw_mode,
};
use log::{error, info};

mod constants;
mod entities;
mod game;
mod input;
mod rendering;
mod store;
mod types;

use constants::HIGH_SCORE_FILE;
use game::Game;
use rendering::Renderer;
use store::FileStore;

fn main() -> io::Result<()> {
    simple_logging::log_to_file("asteroids.log", log::LevelFilter::Info)?;
    info!("starting arcade-asteroids");

    enable_raw_mode()?;
    let mut stdout = io::stdout();

    // Without release events a held key is tracked through autorepeat.
    let report_release = terminal::supports_keyboard_enhancement().unwrap_or(false);
    execute!(stdout, Clear(ClearType::All), Hide)?;
    if report_release {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
        )?;
    }

    let (cols, rows) = terminal::size()?;
    info!(
        "terminal {}x{}, key release events: {}",
        cols, rows, report_release
    );

    let mut game = Game::new(FileStore::new(HIGH_SCORE_FILE));
    let mut renderer = Renderer::new(cols, rows);
    let result = game.run(&mut stdout, &mut renderer, report_release);

    if report_release {
        let _ = execute!(stdout, PopKeyboardEnhancementFlags);
    }
    let _ = execute!(stdout, Show, Clear(ClearType::All));
    let _ = disable_raw_mode();

    if let Err(ref err) = result {
        error!("game loop failed: {}", err);
    }
    result
}
