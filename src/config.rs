use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::engine::TransitionSettings;

pub const MIN_ADVANCE_DELAY_MS: u64 = 1000;
pub const MAX_ADVANCE_DELAY_MS: u64 = 5000;
pub const ADVANCE_DELAY_STEP_MS: u64 = 250;

/// User preferences persisted between runs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub auto_advance: bool,
    pub advance_delay_ms: u64,
    pub show_stats: bool,
    pub sound_enabled: bool,
    pub sound_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auto_advance: true,
            advance_delay_ms: 1500,
            show_stats: true,
            sound_enabled: true,
            sound_volume: 0.5,
        }
    }
}

impl Settings {
    /// Pulls out-of-range values back into their bounds
    pub fn clamped(mut self) -> Self {
        self.advance_delay_ms = self
            .advance_delay_ms
            .clamp(MIN_ADVANCE_DELAY_MS, MAX_ADVANCE_DELAY_MS);
        self.sound_volume = if self.sound_volume.is_finite() {
            self.sound_volume.clamp(0.0, 1.0)
        } else {
            Settings::default().sound_volume
        };
        self
    }

    pub fn transition(&self) -> TransitionSettings {
        TransitionSettings {
            auto_advance: self.auto_advance,
            advance_delay: Duration::from_millis(self.advance_delay_ms),
        }
    }

    pub fn increase_delay(&mut self) {
        self.advance_delay_ms =
            (self.advance_delay_ms + ADVANCE_DELAY_STEP_MS).min(MAX_ADVANCE_DELAY_MS);
    }

    pub fn decrease_delay(&mut self) {
        self.advance_delay_ms = self
            .advance_delay_ms
            .saturating_sub(ADVANCE_DELAY_STEP_MS)
            .max(MIN_ADVANCE_DELAY_MS);
    }
}

/// Command line values that win over the stored settings for one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsOverrides {
    pub auto_advance: Option<bool>,
    pub advance_delay_ms: Option<u64>,
    pub show_stats: Option<bool>,
    pub sound_enabled: Option<bool>,
}

impl SettingsOverrides {
    pub fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(auto_advance) = self.auto_advance {
            settings.auto_advance = auto_advance;
        }
        if let Some(delay) = self.advance_delay_ms {
            settings.advance_delay_ms = delay;
        }
        if let Some(show_stats) = self.show_stats {
            settings.show_stats = show_stats;
        }
        if let Some(sound_enabled) = self.sound_enabled {
            settings.sound_enabled = sound_enabled;
        }
        settings.clamped()
    }
}

pub trait ConfigStore {
    fn load(&self) -> Settings;
    fn save(&self, settings: &Settings) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        let path = AppDirs::config_path().unwrap_or_else(|| PathBuf::from("typewriter_config.json"));
        Self { path }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Settings {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Settings::default(),
        };
        match serde_json::from_slice::<Settings>(&bytes) {
            Ok(settings) => settings.clamped(),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring malformed settings file");
                Settings::default()
            }
        }
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(settings).map_err(std::io::Error::other)?;
        fs::write(&self.path, data)
    }
}

/// Store that keeps settings in memory only
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    settings: std::cell::RefCell<Option<Settings>>,
}

impl ConfigStore for MemoryConfigStore {
    fn load(&self) -> Settings {
        self.settings.borrow().clone().unwrap_or_default()
    }

    fn save(&self, settings: &Settings) -> std::io::Result<()> {
        *self.settings.borrow_mut() = Some(settings.clone());
        Ok(())
    }
}
