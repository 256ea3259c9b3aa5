use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use mandelzoom_core::{PrecisionTier, ViewSnapshot, ViewState};
use mandelzoom_render::{ExportFormat, DEFAULT_EXPORT_SCALE};

// ---------------------------------------------------------------------------
// Application preferences
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppPreferences {
    #[serde(default = "default_window_width")]
    pub window_width: f32,
    #[serde(default = "default_window_height")]
    pub window_height: f32,
    #[serde(default = "default_true")]
    pub restore_last_view: bool,
    /// View on exit, with full hi/lo center parts.
    #[serde(default)]
    pub last_view: Option<ViewSnapshot>,
    #[serde(default)]
    pub precision: PrecisionTier,
    /// Export resolution as a multiple of the on-screen physical size.
    #[serde(default = "default_export_scale")]
    pub export_scale: u32,
    #[serde(default)]
    pub export_format: ExportFormat,
    /// Custom export directory. When empty, the user's pictures folder is used.
    #[serde(default)]
    pub export_dir: String,
    #[serde(default = "default_true")]
    pub show_hud: bool,
    /// HUD panel background opacity 0.0..=1.0.
    #[serde(default = "default_hud_panel_opacity")]
    pub hud_panel_opacity: f32,
}

fn default_window_width() -> f32 {
    1280.0
}
fn default_window_height() -> f32 {
    800.0
}
fn default_true() -> bool {
    true
}
fn default_export_scale() -> u32 {
    DEFAULT_EXPORT_SCALE
}
fn default_hud_panel_opacity() -> f32 {
    0.65
}

impl Default for AppPreferences {
    fn default() -> Self {
        Self {
            window_width: default_window_width(),
            window_height: default_window_height(),
            restore_last_view: true,
            last_view: None,
            precision: PrecisionTier::default(),
            export_scale: default_export_scale(),
            export_format: ExportFormat::default(),
            export_dir: String::new(),
            show_hud: true,
            hud_panel_opacity: default_hud_panel_opacity(),
        }
    }
}

impl AppPreferences {
    /// Load preferences from next to the executable, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            debug!("No preferences file at {}", path.display());
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<AppPreferences>(&json) {
                Ok(prefs) => {
                    info!("Loaded preferences from {}", path.display());
                    return prefs.sanitized();
                }
                Err(e) => error!("Failed to parse preferences: {e}"),
            },
            Err(e) => error!("Failed to read preferences file: {e}"),
        }
        Self::default()
    }

    /// Persist preferences to disk.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                error!("Failed to create config directory: {e}");
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, &json) {
                    error!("Failed to write preferences: {e}");
                } else {
                    debug!("Saved preferences");
                }
            }
            Err(e) => error!("Failed to serialize preferences: {e}"),
        }
    }

    /// The view to start from, if one was saved and is still valid.
    pub fn restored_view(&self) -> Option<ViewState> {
        if !self.restore_last_view {
            return None;
        }
        let snapshot = self.last_view?;
        match ViewState::try_from(snapshot) {
            Ok(view) => {
                info!(zoom = view.zoom, "Restoring last view");
                Some(view)
            }
            Err(e) => {
                warn!("Ignoring saved view: {e}");
                None
            }
        }
    }

    fn sanitized(mut self) -> Self {
        if self.export_scale == 0 {
            self.export_scale = default_export_scale();
        }
        if let ExportFormat::Jpeg { quality } = &mut self.export_format {
            *quality = (*quality).clamp(1, 100);
        }
        self.hud_panel_opacity = self.hud_panel_opacity.clamp(0.0, 1.0);
        self
    }
}

fn config_path() -> PathBuf {
    crate::app_dir::exe_directory().join("preferences.json")
}
