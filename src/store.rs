use std::fs;
use std::io;
use std::path::PathBuf;

/// Single-slot persistence for the high score.
///
/// Saving is best-effort: callers log a failed write and keep playing
/// with the in-memory value.
pub trait HighScoreStore {
    fn load(&self) -> u32;
    fn save(&mut self, score: u32) -> io::Result<()>;
}

/// Stores the high score as a base-10 integer string in a single file.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl HighScoreStore for FileStore {
    /// A missing or malformed file reads as zero.
    fn load(&self) -> u32 {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|contents| contents.trim().parse().ok())
            .unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        fs::write(&self.path, score.to_string())
    }
}

/// In-memory store for tests; can be told to fail writes.
#[cfg(test)]
pub struct MemoryStore {
    pub saved: Option<u32>,
    pub fail_writes: bool,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            saved: None,
            fail_writes: false,
        }
    }
}

#[cfg(test)]
impl HighScoreStore for MemoryStore {
    fn load(&self) -> u32 {
        self.saved.unwrap_or(0)
    }

    fn save(&mut self, score: u32) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "store unavailable"));
        }
        self.saved = Some(score);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("asteroids-store-test-{}-{}", std::process::id(), name));
        path
    }

    #[test]
    fn missing_file_loads_as_zero() {
        let store = FileStore::new(temp_path("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn malformed_contents_load_as_zero() {
        let path = temp_path("malformed");
        fs::write(&path, "not a number").unwrap();
        let store = FileStore::new(&path);
        assert_eq!(store.load(), 0);
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = temp_path("roundtrip");
        let mut store = FileStore::new(&path);
        store.save(420).unwrap();
        assert_eq!(store.load(), 420);
        // Whitespace around the digits is tolerated.
        fs::write(&path, " 77\n").unwrap();
        assert_eq!(store.load(), 77);
        fs::remove_file(&path).unwrap();
    }
}
