use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn config_path() -> PathBuf {
        ProjectDirs::from("", "", "flashgrid")
            .map(|pd| pd.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("flashgrid_config.json"))
    }

    /// Diagnostic log; the terminal itself is owned by the game screen.
    pub fn log_path() -> PathBuf {
        if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("flashgrid")
                .join("flashgrid.log")
        } else {
            ProjectDirs::from("", "", "flashgrid")
                .map(|pd| pd.data_local_dir().join("flashgrid.log"))
                .unwrap_or_else(|| PathBuf::from("flashgrid.log"))
        }
    }
}
