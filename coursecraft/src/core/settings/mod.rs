//! Authoring Settings
//!
//! Persistent settings for the course builder:
//! - Preview surface defaults (geometry, auto-open behaviour, viewport)
//! - Editor collaborator timeouts
//! - Undo history depth
//!
//! Storage location: {config_dir}/settings.json, written atomically under an
//! advisory lock.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::core::{
    fs::{atomic_write_json_pretty, read_json},
    preview::{MAX_PREVIEW_SCALE, MIN_PREVIEW_HEIGHT, MIN_PREVIEW_SCALE, MIN_PREVIEW_WIDTH},
    CoreResult, Point2D, Size2D,
};

/// Settings schema version for migration support
pub const SETTINGS_VERSION: u32 = 1;

/// Settings file name
pub const SETTINGS_FILE: &str = "settings.json";

/// Lock file name (advisory lock to prevent concurrent writers)
pub const SETTINGS_LOCK_FILE: &str = "settings.json.lock";

/// Authoring settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthoringSettings {
    /// Schema version for migrations
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub preview: PreviewSettings,

    #[serde(default)]
    pub editor: EditorSettings,

    #[serde(default)]
    pub history: HistorySettings,
}

fn default_version() -> u32 {
    SETTINGS_VERSION
}

impl Default for AuthoringSettings {
    fn default() -> Self {
        Self {
            version: SETTINGS_VERSION,
            preview: PreviewSettings::default(),
            editor: EditorSettings::default(),
            history: HistorySettings::default(),
        }
    }
}

impl AuthoringSettings {
    /// Corrects out-of-range values instead of failing, so a damaged file
    /// still yields a usable configuration.
    pub fn normalize(&mut self) {
        self.version = SETTINGS_VERSION;

        let preview = &mut self.preview;
        preview.viewport_width = clamp_f64(preview.viewport_width, 320.0, 7680.0);
        preview.viewport_height = clamp_f64(preview.viewport_height, 240.0, 4320.0);
        preview.default_scale =
            clamp_f64(preview.default_scale, MIN_PREVIEW_SCALE, MAX_PREVIEW_SCALE);
        preview.default_size = Size2D::new(
            clamp_f64(
                preview.default_size.width,
                MIN_PREVIEW_WIDTH,
                preview.viewport_width,
            ),
            clamp_f64(
                preview.default_size.height,
                MIN_PREVIEW_HEIGHT,
                preview.viewport_height,
            ),
        );
        preview.default_position = Point2D::new(
            clamp_f64(preview.default_position.x, 0.0, preview.viewport_width),
            clamp_f64(preview.default_position.y, 0.0, preview.viewport_height),
        );

        self.editor.transcript_timeout_secs = self.editor.transcript_timeout_secs.clamp(1, 300);
        self.history.max_undo = self.history.max_undo.clamp(1, 1000);
    }
}

fn clamp_f64(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.clamp(min, max.max(min))
}

/// Live preview settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSettings {
    #[serde(default = "default_scale")]
    pub default_scale: f64,

    #[serde(default)]
    pub default_position: Point2D,

    #[serde(default)]
    pub default_size: Size2D,

    /// Viewport the floating preview is clamped to
    #[serde(default = "default_viewport_width")]
    pub viewport_width: f64,

    #[serde(default = "default_viewport_height")]
    pub viewport_height: f64,

    /// Force the preview open when a theme is applied
    #[serde(default = "default_true")]
    pub open_on_theme_apply: bool,

    /// Reopen the preview when an editor dialog closes, if it was open before
    #[serde(default)]
    pub reopen_after_edit: bool,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            default_scale: default_scale(),
            default_position: Point2D::default(),
            default_size: Size2D::default(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            open_on_theme_apply: true,
            reopen_after_edit: false,
        }
    }
}

fn default_scale() -> f64 {
    1.0
}

fn default_viewport_width() -> f64 {
    1280.0
}

fn default_viewport_height() -> f64 {
    800.0
}

fn default_true() -> bool {
    true
}

/// Content editor settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EditorSettings {
    /// Upper bound on a transcript provider call
    #[serde(default = "default_transcript_timeout")]
    pub transcript_timeout_secs: u64,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            transcript_timeout_secs: default_transcript_timeout(),
        }
    }
}

fn default_transcript_timeout() -> u64 {
    30
}

/// Undo/redo settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HistorySettings {
    #[serde(default = "default_max_undo")]
    pub max_undo: usize,
}

impl Default for HistorySettings {
    fn default() -> Self {
        Self {
            max_undo: default_max_undo(),
        }
    }
}

fn default_max_undo() -> usize {
    100
}

// =============================================================================
// Settings Manager
// =============================================================================

/// Loads, saves and resets the settings file
pub struct SettingsManager {
    settings_path: PathBuf,
}

impl SettingsManager {
    /// Creates a manager for `{config_dir}/settings.json`
    pub fn new(config_dir: PathBuf) -> Self {
        Self {
            settings_path: config_dir.join(SETTINGS_FILE),
        }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    fn lock_path(&self) -> PathBuf {
        self.settings_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(SETTINGS_LOCK_FILE)
    }

    fn with_lock<T>(&self, exclusive: bool, op: impl FnOnce() -> CoreResult<T>) -> CoreResult<T> {
        if let Some(parent) = self.settings_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let lock_file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(self.lock_path())?;

        if exclusive {
            fs2::FileExt::lock_exclusive(&lock_file)?;
        } else {
            fs2::FileExt::lock_shared(&lock_file)?;
        }

        let result = op();

        if let Err(e) = fs2::FileExt::unlock(&lock_file) {
            warn!("Failed to unlock settings lock file: {}", e);
        }

        result
    }

    /// Loads settings, falling back to defaults when missing or unreadable
    pub fn load(&self) -> AuthoringSettings {
        let result = self.with_lock(false, || {
            if !self.settings_path.exists() {
                info!("Settings file not found, using defaults");
                return Ok(AuthoringSettings::default());
            }

            let mut settings: AuthoringSettings = read_json(&self.settings_path)?;
            if settings.version < SETTINGS_VERSION {
                info!(
                    "Migrating settings from version {} to {}",
                    settings.version, SETTINGS_VERSION
                );
            }
            settings.normalize();
            Ok(settings)
        });

        match result {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
                AuthoringSettings::default()
            }
        }
    }

    /// Normalizes and persists settings, returning what was written
    pub fn save(&self, settings: &AuthoringSettings) -> CoreResult<AuthoringSettings> {
        self.with_lock(true, || {
            let mut normalized = settings.clone();
            normalized.normalize();
            atomic_write_json_pretty(&self.settings_path, &normalized)?;
            info!("Settings saved to {:?}", self.settings_path);
            Ok(normalized)
        })
    }

    /// Deletes the settings file and returns defaults
    pub fn reset(&self) -> CoreResult<AuthoringSettings> {
        self.with_lock(true, || {
            if self.settings_path.exists() {
                fs::remove_file(&self.settings_path)?;
                info!("Settings file deleted");
            }
            Ok(AuthoringSettings::default())
        })
    }
}
