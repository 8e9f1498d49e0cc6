use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "typewriter";

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Directory for the history log and the tracing log
    pub fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(PathBuf::from(home).join(".local").join("state").join(APP_NAME))
        } else {
            ProjectDirs::from("", "", APP_NAME).map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }

    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|pd| pd.config_dir().join("config.json"))
    }

    pub fn history_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("history.csv"))
    }

    pub fn log_file_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("typewriter.log"))
    }
}
