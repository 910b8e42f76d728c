// Application state module
// Immutable per-process state shared by every connection

use std::io;
use std::path::PathBuf;

use super::types::Config;

/// Application state
pub struct AppState {
    pub config: Config,
    /// Canonical serving root, resolved once at startup
    pub root: PathBuf,
}

impl AppState {
    /// Fails when the serving root does not exist or cannot be resolved
    pub fn new(config: Config) -> io::Result<Self> {
        let root = config.serve.root.canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("serving root is not a directory: {}", root.display()),
            ));
        }
        Ok(Self { config, root })
    }
}
