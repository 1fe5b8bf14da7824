use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the TUI writes its log, since it owns the terminal
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("swat");
            Some(state_dir.join("swat.log"))
        } else {
            ProjectDirs::from("", "", "swat")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("swat.log"))
        }
    }
}
